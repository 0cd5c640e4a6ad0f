//! End-to-end tests for the `validate` command.
//!
//! These tests invoke the actual CLI binary and validate the behavior of the
//! `validate` subcommand from a user's perspective.

mod common;
use common::prelude::*;

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_validate_valid_settings() {
    let fixture = TestFixture::new().with_settings(settings::BASIC);

    fixture
        .command()
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Environments: Staging, Production"))
        .stdout(predicate::str::contains("Settings document is valid"));
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_validate_explicit_path() {
    let fixture = TestFixture::new().with_file("config/natrium.yml", settings::BASIC);

    fixture
        .command()
        .arg("validate")
        .arg("--config")
        .arg(fixture.path().join("config/natrium.yml"))
        .args(["--configuration", "Release"])
        .assert()
        .success()
        .stdout(predicate::str::contains("configuration 'Release'"));
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_validate_invalid_yaml() {
    let fixture = TestFixture::new().with_settings(settings::INVALID_YAML);

    fixture
        .command()
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: [Natrium] Error parsing settings document"));
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_validate_reserved_name() {
    let fixture = TestFixture::new().with_settings(settings::RESERVED);

    fixture
        .command()
        .arg("validate")
        .arg("--color")
        .arg("never")
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "[ERR] Cannot use 'environment' as a variable name. Reserved.",
        ));
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_validate_missing_file() {
    let fixture = TestFixture::new();

    fixture
        .command()
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot find file"));
}
