//! Load phase
//!
//! Reads every input of the run before anything is written and validates
//! the requested parameters against them. Produces the [`RunContext`] shared
//! by the later phases.

use log::debug;

use crate::config::SettingsDocument;
use crate::context::{RunContext, RunOptions};
use crate::defaults;
use crate::error::{Error, Result};
use crate::project::ProjectDescriptor;

/// Inputs of a run after validation.
#[derive(Debug, Clone)]
pub struct Loaded {
    pub document: SettingsDocument,
    pub context: RunContext,
}

/// Execute the load phase.
///
/// Checks, in order: the Info.plist exists, the settings document parses,
/// the environment is declared, the target exists, the target has build
/// configurations, and the configuration is one of them.
pub fn execute(options: &RunOptions, project: &dyn ProjectDescriptor) -> Result<Loaded> {
    let infoplist_path = options.project_dir.join(&options.infoplist_file);
    if !infoplist_path.is_file() {
        return Err(Error::FileNotFound {
            path: infoplist_path.display().to_string(),
        });
    }

    let settings_file = options
        .settings_file
        .clone()
        .unwrap_or_else(|| defaults::default_settings_file(&options.project_dir));
    debug!("Loading settings from {}", settings_file.display());
    let document = SettingsDocument::from_file(&settings_file)?;
    let environments = document.validate_environment(&options.environment)?;

    let configurations =
        project
            .configurations(&options.target)
            .ok_or_else(|| Error::TargetNotFound {
                target: options.target.clone(),
                project: project.location(),
            })?;
    if configurations.is_empty() {
        return Err(Error::NoConfigurations {
            project: project.location(),
        });
    }
    if !configurations.contains(&options.configuration) {
        return Err(Error::InvalidConfiguration {
            configuration: options.configuration.clone(),
            available: configurations,
        });
    }

    let language_version = project.language_version(&options.target, &options.configuration);
    debug!(
        "Target '{}' ({}) uses language version {}",
        options.target, options.configuration, language_version
    );

    let output_dir = options
        .output_dir
        .clone()
        .unwrap_or_else(|| defaults::default_output_dir(&options.project_dir));

    Ok(Loaded {
        document,
        context: RunContext {
            project_dir: options.project_dir.clone(),
            infoplist_file: options.infoplist_file.clone(),
            environment: options.environment.clone(),
            configuration: options.configuration.clone(),
            target: options.target.clone(),
            environments,
            configurations,
            language_version,
            output_dir,
        },
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::project::tests::PBXPROJ;
    use crate::project::XcodeProject;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    pub(crate) const SETTINGS: &str = r#"
environments: [Staging, Production]
natrium_variables:
  host:
    Staging: staging.example.com
    Production: example.com
xcconfig:
  API_URL: https://${host}
  DEBUG_MENU:
    "*":
      Debug: "YES"
      "*": "NO"
variables:
  apiHost: ${host}
  retries: 3
"#;

    /// A project directory with settings, an Info.plist and no xcodeproj.
    pub(crate) fn project_dir(settings: &str) -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("build-config.yml"), settings).unwrap();
        fs::create_dir_all(temp.path().join("App")).unwrap();
        fs::write(
            temp.path().join("App/Info.plist"),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<plist version=\"1.0\">\n<dict/>\n</plist>\n",
        )
        .unwrap();
        temp
    }

    pub(crate) fn options(root: &Path) -> RunOptions {
        RunOptions {
            project_dir: root.to_path_buf(),
            infoplist_file: PathBuf::from("App/Info.plist"),
            configuration: "Debug".to_string(),
            environment: "Staging".to_string(),
            target: "App".to_string(),
            ..RunOptions::default()
        }
    }

    pub(crate) fn project() -> XcodeProject {
        XcodeProject::parse(PBXPROJ).unwrap()
    }

    #[test]
    fn test_load_builds_context() {
        let temp = project_dir(SETTINGS);
        let loaded = execute(&options(temp.path()), &project()).unwrap();

        let ctx = loaded.context;
        assert_eq!(ctx.environments, vec!["Staging", "Production"]);
        assert_eq!(ctx.configurations, vec!["Debug", "Release", "App Store"]);
        assert_eq!(ctx.language_version.to_string(), "5.0");
        assert_eq!(ctx.output_dir, temp.path().join("Natrium"));
    }

    #[test]
    fn test_missing_infoplist() {
        let temp = project_dir(SETTINGS);
        let mut opts = options(temp.path());
        opts.infoplist_file = PathBuf::from("Missing/Info.plist");

        let err = execute(&opts, &project()).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[test]
    fn test_missing_settings_file() {
        let temp = project_dir(SETTINGS);
        let mut opts = options(temp.path());
        opts.settings_file = Some(temp.path().join("other.yml"));

        let err = execute(&opts, &project()).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[test]
    fn test_invalid_environment() {
        let temp = project_dir(SETTINGS);
        let mut opts = options(temp.path());
        opts.environment = "Beta".to_string();

        let err = execute(&opts, &project()).unwrap_err();
        assert!(matches!(err, Error::InvalidEnvironment { ref available, .. } if available.len() == 2));
    }

    #[test]
    fn test_unknown_target() {
        let temp = project_dir(SETTINGS);
        let mut opts = options(temp.path());
        opts.target = "Widget".to_string();

        let err = execute(&opts, &project()).unwrap_err();
        assert!(matches!(err, Error::TargetNotFound { ref target, .. } if target == "Widget"));
    }

    #[test]
    fn test_invalid_configuration() {
        let temp = project_dir(SETTINGS);
        let mut opts = options(temp.path());
        opts.configuration = "Profile".to_string();

        let err = execute(&opts, &project()).unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration { .. }));
    }
}
