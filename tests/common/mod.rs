//! Shared test utilities for integration and E2E tests.
//!
//! This module provides common fixtures and helpers to reduce duplication
//! across test files.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_project().with_settings(settings::BASIC);
//!     fixture.apply("Staging", "Debug").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::settings;
    pub use super::TestFixture;
}

/// A `project.pbxproj` with targets `App` (Swift 5) and `LegacyApp`
/// (Swift 2.3), both with `Debug` and `Release` configurations.
pub const PBXPROJ: &str = include_str!("../fixtures/project.pbxproj");

/// A minimal XML Info.plist.
pub const INFO_PLIST: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
	<key>CFBundleDisplayName</key>
	<string>App</string>
	<key>CFBundleVersion</key>
	<string>1</string>
</dict>
</plist>
"#;

/// Settings documents for testing.
#[allow(dead_code)]
pub mod settings {
    /// Every category the apply command consumes.
    pub const BASIC: &str = r#"
environments:
  - Staging
  - Production

natrium_variables:
  host:
    Staging: staging.example.com
    Production: example.com

xcconfig:
  PRODUCT_BUNDLE_IDENTIFIER:
    Staging: com.example.app.staging
    Production: com.example.app
  API_URL: https://${host}
  DEBUG_INFORMATION_FORMAT:
    "*":
      Debug: dwarf
      Release: dwarf-with-dsym

variables:
  apiHost: ${host}
  retries: 3
  timeout: 2.5
  debugMenu:
    Staging: true
    Production:
      Debug: true
      Release: false

infoplist:
  CFBundleDisplayName:
    Staging: App β
    Production: App
"#;

    /// Uses a reserved variable name.
    pub const RESERVED: &str = r#"
environments: [Staging]
variables:
  environment: nope
"#;

    /// Invalid YAML for error testing.
    pub const INVALID_YAML: &str = "environments: [Staging\n";
}

/// A test fixture holding a project directory.
///
/// # Example
///
/// ```rust,ignore
/// let fixture = TestFixture::new()
///     .with_project()
///     .with_settings(settings::BASIC);
///
/// fixture.apply("Staging", "Debug").assert().success();
/// ```
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Add `App.xcodeproj` and `App/Info.plist`.
    pub fn with_project(self) -> Self {
        self.with_file("App.xcodeproj/project.pbxproj", PBXPROJ)
            .with_file("App/Info.plist", INFO_PLIST)
    }

    /// Add a `build-config.yml` with the given content.
    pub fn with_settings(self, content: &str) -> Self {
        self.with_file("build-config.yml", content)
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Path of a generated artifact in the default output directory.
    pub fn output(&self, name: &str) -> PathBuf {
        self.path().join("Natrium").join(name)
    }

    /// Read a file relative to the project directory.
    pub fn read(&self, path: impl AsRef<Path>) -> String {
        std::fs::read_to_string(self.path().join(path)).expect("Failed to read file")
    }

    /// Create a child path in the temp directory.
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Create a command configured to run in this fixture's directory.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("natrium");
        cmd.current_dir(self.path());
        cmd.env_remove("RUST_LOG");
        cmd
    }

    /// An `apply` command for target `App` with the given environment and
    /// configuration.
    pub fn apply(&self, environment: &str, configuration: &str) -> assert_cmd::Command {
        let mut cmd = self.command();
        cmd.arg("apply")
            .arg("--project-dir")
            .arg(self.path())
            .args(["--infoplist-file", "App/Info.plist"])
            .args(["--environment", environment])
            .args(["--configuration", configuration])
            .args(["--target", "App"]);
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_with_project() {
        let fixture = TestFixture::new().with_project();
        assert!(fixture.path().join("App.xcodeproj/project.pbxproj").exists());
        assert!(fixture.path().join("App/Info.plist").exists());
    }

    #[test]
    fn test_settings_are_valid_yaml() {
        for content in [settings::BASIC, settings::RESERVED] {
            let result: Result<serde_yaml::Value, _> = serde_yaml::from_str(content);
            assert!(result.is_ok(), "Settings should be valid YAML: {}", content);
        }
    }
}
