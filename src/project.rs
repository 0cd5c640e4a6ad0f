//! # Project Descriptor
//!
//! The native project descriptor tells a run which targets exist, which build
//! configurations a target has, and which Swift language version each
//! configuration uses. The language version only selects the output
//! [`Dialect`].
//!
//! [`ProjectDescriptor`] is the seam the rest of the crate uses. The default
//! implementation, [`XcodeProject`], reads the `project.pbxproj` file of the
//! first `*.xcodeproj` bundle in the project directory. Tests substitute their
//! own implementation.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use regex::Regex;
use semver::Version;

use crate::error::{Error, Result};

/// Output dialect of generated source code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Swift 2: enum cases keep the declared casing.
    Legacy,
    /// Swift 3 and later: enum cases are lower-camel-cased.
    Modern,
}

/// A Swift language version such as `5.0` or `4.2`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct LanguageVersion(Version);

impl LanguageVersion {
    /// The oldest supported version, used when a configuration declares none.
    pub fn oldest() -> Self {
        Self(Version::new(2, 2, 0))
    }

    /// Parse `5`, `4.2` or `5.0.1`.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let padded = match trimmed.matches('.').count() {
            0 => format!("{}.0.0", trimmed),
            1 => format!("{}.0", trimmed),
            _ => trimmed.to_string(),
        };
        Ok(Self(Version::parse(&padded)?))
    }

    pub fn is_oldest(&self) -> bool {
        *self == Self::oldest()
    }

    pub fn dialect(&self) -> Dialect {
        if self.0.major >= 3 {
            Dialect::Modern
        } else {
            Dialect::Legacy
        }
    }
}

impl Default for LanguageVersion {
    fn default() -> Self {
        Self::oldest()
    }
}

impl std::fmt::Display for LanguageVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.0.major, self.0.minor)
    }
}

/// Read access to the native project descriptor.
pub trait ProjectDescriptor {
    /// Human-readable location of the descriptor, for error messages.
    fn location(&self) -> String;

    /// Names of all targets.
    fn targets(&self) -> Vec<String>;

    /// Build configurations of `target`, or `None` if the target is unknown.
    fn configurations(&self, target: &str) -> Option<Vec<String>>;

    /// Language version of `configuration` in `target`.
    fn language_version(&self, target: &str, configuration: &str) -> LanguageVersion;
}

#[derive(Debug, Clone)]
struct BuildConfiguration {
    name: String,
    swift_version: Option<String>,
}

#[derive(Debug, Clone)]
struct Target {
    name: String,
    configurations: Vec<BuildConfiguration>,
}

/// A project read from an `.xcodeproj` bundle.
#[derive(Debug, Clone)]
pub struct XcodeProject {
    path: PathBuf,
    targets: Vec<Target>,
    project_configurations: Vec<BuildConfiguration>,
}

#[derive(Debug)]
struct PbxObject {
    id: String,
    isa: String,
    body: String,
}

impl XcodeProject {
    /// Open the first `*.xcodeproj` found directly in `project_dir`.
    pub fn discover(project_dir: &Path) -> Result<Self> {
        let pattern = project_dir.join("*.xcodeproj");
        let mut candidates: Vec<PathBuf> = glob::glob(&pattern.to_string_lossy())?
            .filter_map(|entry| entry.ok())
            .collect();
        candidates.sort();
        let Some(path) = candidates.into_iter().next() else {
            return Err(Error::ProjectNotFound {
                dir: project_dir.display().to_string(),
            });
        };
        Self::open(&path)
    }

    /// Open an `.xcodeproj` bundle.
    pub fn open(path: &Path) -> Result<Self> {
        let pbxproj = path.join("project.pbxproj");
        let content = fs::read_to_string(&pbxproj).map_err(|e| Error::Project {
            project: path.display().to_string(),
            message: format!("cannot read {}: {}", pbxproj.display(), e),
        })?;
        let mut project = Self::parse(&content)?;
        project.path = path.to_path_buf();
        Ok(project)
    }

    /// Parse the contents of a `project.pbxproj` file.
    pub fn parse(content: &str) -> Result<Self> {
        let objects = parse_objects(content)?;

        let configurations_of = |list_id: Option<String>| -> Result<Vec<BuildConfiguration>> {
            let Some(list_id) = list_id else {
                return Ok(Vec::new());
            };
            let Some(list) = objects.iter().find(|o| o.id == list_id) else {
                return Ok(Vec::new());
            };
            let ids = list_members(&list.body, "buildConfigurations")?;
            let mut configurations = Vec::new();
            for id in ids {
                let Some(object) = objects.iter().find(|o| o.id == id) else {
                    continue;
                };
                if let Some(name) = property(&object.body, "name")? {
                    configurations.push(BuildConfiguration {
                        name,
                        swift_version: build_setting(&object.body, "SWIFT_VERSION")?,
                    });
                }
            }
            Ok(configurations)
        };

        let mut targets = Vec::new();
        let mut project_configurations = Vec::new();
        for object in &objects {
            let list_id = property(&object.body, "buildConfigurationList")?
                .and_then(|v| v.split_whitespace().next().map(str::to_string));
            if object.isa == "PBXProject" {
                project_configurations = configurations_of(list_id)?;
            } else if object.isa.ends_with("Target") && object.isa != "PBXTargetDependency" {
                let Some(name) = property(&object.body, "name")? else {
                    continue;
                };
                targets.push(Target {
                    name,
                    configurations: configurations_of(list_id)?,
                });
            }
        }

        debug!(
            "Parsed project: {} targets, {} project configurations",
            targets.len(),
            project_configurations.len()
        );
        Ok(Self {
            path: PathBuf::new(),
            targets,
            project_configurations,
        })
    }

    fn target(&self, name: &str) -> Option<&Target> {
        self.targets.iter().find(|t| t.name == name)
    }
}

impl ProjectDescriptor for XcodeProject {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn targets(&self) -> Vec<String> {
        self.targets.iter().map(|t| t.name.clone()).collect()
    }

    fn configurations(&self, target: &str) -> Option<Vec<String>> {
        self.target(target)
            .map(|t| t.configurations.iter().map(|c| c.name.clone()).collect())
    }

    fn language_version(&self, target: &str, configuration: &str) -> LanguageVersion {
        let declared = |configurations: &[BuildConfiguration]| {
            configurations
                .iter()
                .find(|c| c.name == configuration)
                .and_then(|c| c.swift_version.clone())
                .filter(|v| !v.is_empty())
        };
        let raw = self
            .target(target)
            .and_then(|t| declared(&t.configurations))
            .or_else(|| declared(&self.project_configurations));
        match raw {
            Some(raw) => LanguageVersion::parse(&raw).unwrap_or_else(|e| {
                warn!("Ignoring SWIFT_VERSION '{}' of {}: {}", raw, configuration, e);
                LanguageVersion::oldest()
            }),
            None => LanguageVersion::oldest(),
        }
    }
}

fn parse_objects(content: &str) -> Result<Vec<PbxObject>> {
    let block = Regex::new(r"(?m)^\t\t([0-9A-Fa-f]{24})(?: /\*[^\n]*?\*/)? = \{\n((?s:.*?))^\t\t\};")?;
    let isa = Regex::new(r"(?m)^\t\t\tisa = (\w+);")?;
    Ok(block
        .captures_iter(content)
        .filter_map(|caps| {
            let body = caps[2].to_string();
            let kind = isa.captures(&body)?[1].to_string();
            Some(PbxObject {
                id: caps[1].to_string(),
                isa: kind,
                body,
            })
        })
        .collect())
}

fn unquote(raw: &str) -> String {
    let raw = raw.trim();
    match raw.strip_prefix('"').and_then(|r| r.strip_suffix('"')) {
        Some(inner) => inner.replace("\\\"", "\"").replace("\\\\", "\\"),
        None => raw.to_string(),
    }
}

/// An object-level `key = value;` property.
fn property(body: &str, key: &str) -> Result<Option<String>> {
    let re = Regex::new(&format!(
        r#"(?m)^\t\t\t{} = ("(?:[^"\\]|\\.)*"|[^;\n]+);"#,
        regex::escape(key)
    ))?;
    Ok(re.captures(body).map(|caps| unquote(&caps[1])))
}

/// A `key = value;` entry inside an object's `buildSettings`.
fn build_setting(body: &str, key: &str) -> Result<Option<String>> {
    let re = Regex::new(&format!(
        r#"(?m)^\t\t\t\t{} = ("(?:[^"\\]|\\.)*"|[^;\n]+);"#,
        regex::escape(key)
    ))?;
    Ok(re.captures(body).map(|caps| unquote(&caps[1])))
}

/// Object identifiers listed in a `key = ( ... );` property.
fn list_members(body: &str, key: &str) -> Result<Vec<String>> {
    let re = Regex::new(&format!(r"(?m)^\t\t\t{} = \(([^)]*)\);", regex::escape(key)))?;
    let id = Regex::new(r"\b[0-9A-Fa-f]{24}\b")?;
    Ok(re
        .captures(body)
        .map(|caps| id.find_iter(&caps[1]).map(|m| m.as_str().to_string()).collect())
        .unwrap_or_default())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A trimmed-down `project.pbxproj` with one app target.
    pub(crate) const PBXPROJ: &str = "// !$*UTF8*$!
{
\tarchiveVersion = 1;
\tobjects = {

/* Begin PBXBuildFile section */
\t\tAA0000000000000000000001 /* AppDelegate.swift in Sources */ = {isa = PBXBuildFile; fileRef = AA0000000000000000000002 /* AppDelegate.swift */; };
/* End PBXBuildFile section */

/* Begin PBXNativeTarget section */
\t\tAA0000000000000000000010 /* App */ = {
\t\t\tisa = PBXNativeTarget;
\t\t\tbuildConfigurationList = AA0000000000000000000020 /* Build configuration list for PBXNativeTarget \"App\" */;
\t\t\tbuildPhases = (
\t\t\t);
\t\t\tname = App;
\t\t\tproductName = App;
\t\t};
/* End PBXNativeTarget section */

/* Begin PBXProject section */
\t\tAA0000000000000000000030 /* Project object */ = {
\t\t\tisa = PBXProject;
\t\t\tbuildConfigurationList = AA0000000000000000000021 /* Build configuration list for PBXProject \"App\" */;
\t\t\ttargets = (
\t\t\t\tAA0000000000000000000010 /* App */,
\t\t\t);
\t\t};
/* End PBXProject section */

/* Begin XCBuildConfiguration section */
\t\tAA0000000000000000000040 /* Debug */ = {
\t\t\tisa = XCBuildConfiguration;
\t\t\tbuildSettings = {
\t\t\t\tPRODUCT_NAME = \"$(TARGET_NAME)\";
\t\t\t\tSWIFT_VERSION = 5.0;
\t\t\t};
\t\t\tname = Debug;
\t\t};
\t\tAA0000000000000000000041 /* Release */ = {
\t\t\tisa = XCBuildConfiguration;
\t\t\tbuildSettings = {
\t\t\t\tPRODUCT_NAME = \"$(TARGET_NAME)\";
\t\t\t};
\t\t\tname = Release;
\t\t};
\t\tAA0000000000000000000042 /* App Store */ = {
\t\t\tisa = XCBuildConfiguration;
\t\t\tbuildSettings = {
\t\t\t};
\t\t\tname = \"App Store\";
\t\t};
\t\tAA0000000000000000000050 /* Debug */ = {
\t\t\tisa = XCBuildConfiguration;
\t\t\tbuildSettings = {
\t\t\t\tSWIFT_VERSION = 4.2;
\t\t\t};
\t\t\tname = Debug;
\t\t};
\t\tAA0000000000000000000051 /* Release */ = {
\t\t\tisa = XCBuildConfiguration;
\t\t\tbuildSettings = {
\t\t\t\tSWIFT_VERSION = 4.2;
\t\t\t};
\t\t\tname = Release;
\t\t};
/* End XCBuildConfiguration section */

/* Begin XCConfigurationList section */
\t\tAA0000000000000000000020 /* Build configuration list for PBXNativeTarget \"App\" */ = {
\t\t\tisa = XCConfigurationList;
\t\t\tbuildConfigurations = (
\t\t\t\tAA0000000000000000000040 /* Debug */,
\t\t\t\tAA0000000000000000000041 /* Release */,
\t\t\t\tAA0000000000000000000042 /* App Store */,
\t\t\t);
\t\t\tdefaultConfigurationName = Release;
\t\t};
\t\tAA0000000000000000000021 /* Build configuration list for PBXProject \"App\" */ = {
\t\t\tisa = XCConfigurationList;
\t\t\tbuildConfigurations = (
\t\t\t\tAA0000000000000000000050 /* Debug */,
\t\t\t\tAA0000000000000000000051 /* Release */,
\t\t\t);
\t\t\tdefaultConfigurationName = Release;
\t\t};
/* End XCConfigurationList section */
\t};
\trootObject = AA0000000000000000000030 /* Project object */;
}
";

    #[test]
    fn test_language_version_parse() {
        assert_eq!(LanguageVersion::parse("5").unwrap().to_string(), "5.0");
        assert_eq!(LanguageVersion::parse("4.2").unwrap().to_string(), "4.2");
        assert_eq!(LanguageVersion::parse("5.0.1").unwrap().to_string(), "5.0");
        assert!(LanguageVersion::parse("five").is_err());
    }

    #[test]
    fn test_language_version_dialect() {
        assert_eq!(LanguageVersion::oldest().dialect(), Dialect::Legacy);
        assert!(LanguageVersion::oldest().is_oldest());
        assert_eq!(LanguageVersion::parse("3.0").unwrap().dialect(), Dialect::Modern);
        assert_eq!(LanguageVersion::parse("5.9").unwrap().dialect(), Dialect::Modern);
    }

    #[test]
    fn test_parse_targets_and_configurations() {
        let project = XcodeProject::parse(PBXPROJ).unwrap();
        assert_eq!(project.targets(), vec!["App"]);
        assert_eq!(
            project.configurations("App").unwrap(),
            vec!["Debug", "Release", "App Store"]
        );
        assert!(project.configurations("Missing").is_none());
    }

    #[test]
    fn test_language_version_fallbacks() {
        let project = XcodeProject::parse(PBXPROJ).unwrap();
        // Target-level setting wins.
        assert_eq!(project.language_version("App", "Debug").to_string(), "5.0");
        // Falls back to the project-level setting.
        assert_eq!(project.language_version("App", "Release").to_string(), "4.2");
        // Neither declares one.
        assert!(project.language_version("App", "App Store").is_oldest());
    }

    #[test]
    fn test_discover_missing_project() {
        let temp = tempfile::TempDir::new().unwrap();
        let err = XcodeProject::discover(temp.path()).unwrap_err();
        assert!(matches!(err, Error::ProjectNotFound { .. }));
    }

    #[test]
    fn test_discover_and_open() {
        let temp = tempfile::TempDir::new().unwrap();
        let bundle = temp.path().join("App.xcodeproj");
        fs::create_dir_all(&bundle).unwrap();
        fs::write(bundle.join("project.pbxproj"), PBXPROJ).unwrap();

        let project = XcodeProject::discover(temp.path()).unwrap();
        assert!(project.location().ends_with("App.xcodeproj"));
        assert_eq!(project.targets(), vec!["App"]);
    }
}
