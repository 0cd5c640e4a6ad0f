//! Build-settings emitter
//!
//! Writes `ProjectEnvironment.xcconfig` with the wildcard bucket and one
//! `ProjectEnvironment.<configuration>.xcconfig` per build configuration
//! (lower-cased) that includes the base file and adds its own bucket.
//!
//! When the project uses CocoaPods, each per-configuration Pods xcconfig is
//! made to include the matching generated file, so that both sets of
//! settings reach the build.

use std::fmt::Write as _;
use std::fs;
use std::path::{Component, Path, PathBuf};

use log::{debug, info};

use super::Emitter;
use crate::context::RunContext;
use crate::defaults::XCCONFIG_BASENAME;
use crate::error::{Error, Result};
use crate::filesystem::MemoryFS;
use crate::resolved::{OrderedMap, ResolvedMap};

/// Emits xcconfig files for the build settings.
#[derive(Debug, Clone, Copy, Default)]
pub struct XcconfigEmitter;

impl Emitter for XcconfigEmitter {
    fn name(&self) -> &'static str {
        "xcconfig"
    }

    fn stale_patterns(&self) -> Vec<String> {
        vec![format!("{}*.xcconfig", XCCONFIG_BASENAME)]
    }

    fn emit(&self, ctx: &RunContext, resolved: &ResolvedMap, out: &mut MemoryFS) -> Result<()> {
        let settings = resolved.build_settings();
        let header = format!("// Natrium environment: {}\n\n", ctx.environment);

        let mut base = header.clone();
        if let Some(wildcard) = settings.wildcard() {
            write_settings(&mut base, wildcard)?;
        }
        out.add_file_string(base_file_name(), &base)?;

        for configuration in &ctx.configurations {
            let mut content = header.clone();
            writeln!(content, "#include \"./{}\"", base_file_name()).map_err(|e| emit_error(e.to_string()))?;
            writeln!(content).map_err(|e| emit_error(e.to_string()))?;
            if let Some(bucket) = settings.bucket(configuration) {
                write_settings(&mut content, bucket)?;
            }
            out.add_file_string(configuration_file_name(configuration), &content)?;
        }

        for (bucket, _) in settings.buckets() {
            if bucket != crate::resolved::WILDCARD && !ctx.configurations.iter().any(|c| c == bucket) {
                debug!("Build settings for unknown configuration '{}' are not written", bucket);
            }
        }

        link_pods(ctx, out)
    }
}

pub fn base_file_name() -> String {
    format!("{}.xcconfig", XCCONFIG_BASENAME)
}

pub fn configuration_file_name(configuration: &str) -> String {
    format!("{}.{}.xcconfig", XCCONFIG_BASENAME, configuration.to_lowercase())
}

fn write_settings(s: &mut String, settings: &OrderedMap<String>) -> Result<()> {
    for (key, value) in settings.iter() {
        if key.contains(['\n', '\r']) || value.contains(['\n', '\r']) {
            return Err(emit_error(format!("build setting '{}' spans several lines", key.trim())));
        }
        writeln!(s, "{} = {}", key, value).map_err(|e| emit_error(e.to_string()))?;
    }
    Ok(())
}

fn emit_error(message: String) -> Error {
    Error::Emit {
        emitter: "xcconfig".to_string(),
        message,
    }
}

/// Path of the CocoaPods xcconfig of `target` for `configuration`.
pub fn pods_xcconfig_path(project_dir: &Path, target: &str, configuration: &str) -> PathBuf {
    project_dir
        .join("Pods")
        .join("Target Support Files")
        .join(format!("Pods-{}", target))
        .join(format!("Pods-{}.{}.xcconfig", target, configuration.to_lowercase()))
}

/// Prepend an include of the generated file to every Pods xcconfig that
/// lacks it.
fn link_pods(ctx: &RunContext, out: &mut MemoryFS) -> Result<()> {
    for configuration in &ctx.configurations {
        let pods = pods_xcconfig_path(&ctx.project_dir, &ctx.target, configuration);
        if !pods.is_file() {
            continue;
        }
        let existing = fs::read_to_string(&pods).map_err(|e| emit_error(format!("Cannot read '{}': {}", pods.display(), e)))?;
        let file_name = configuration_file_name(configuration);
        let generated = ctx.output_dir.join(&file_name);
        if is_linked(&existing, &file_name) {
            continue;
        }
        let pods_dir = pods.parent().unwrap_or(&ctx.project_dir);
        let target = relative_path(&generated, pods_dir).unwrap_or_else(|| generated.clone());
        let include = format!("#include \"{}\"", target.display());
        info!("Linking {} into {}", generated.display(), pods.display());
        out.add_file_string(&pods, &format!("{}\n\n{}", include, existing))?;
    }
    Ok(())
}

/// Whether a Pods xcconfig already includes a generated file named
/// `file_name`, wherever it was linked from.
fn is_linked(pods_xcconfig: &str, file_name: &str) -> bool {
    let suffix = format!("/{}\"", file_name);
    pods_xcconfig.lines().map(str::trim).any(|line| {
        line.strip_prefix("#include")
            .map(str::trim_start)
            .is_some_and(|included| included.ends_with(&suffix) || included == format!("\"{}\"", file_name))
    })
}

/// `path` expressed relative to the directory `base`, or `None` when the
/// two share no root (one absolute and one relative).
fn relative_path(path: &Path, base: &Path) -> Option<PathBuf> {
    if path.is_absolute() != base.is_absolute() {
        return None;
    }
    let path = components(path);
    let base = components(base);
    let common = path.iter().zip(&base).take_while(|(a, b)| a == b).count();
    if base[common..].iter().any(|c| matches!(c, Component::ParentDir)) {
        return None;
    }

    let mut relative = PathBuf::new();
    for _ in common..base.len() {
        relative.push("..");
    }
    for component in &path[common..] {
        relative.push(component.as_os_str());
    }
    Some(relative)
}

fn components(path: &Path) -> Vec<Component<'_>> {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::tests::staging_debug;
    use tempfile::TempDir;

    fn resolved() -> ResolvedMap {
        let mut resolved = ResolvedMap::new();
        let settings = resolved.build_settings_mut();
        settings.set("*", "ENVIRONMENT", "Staging");
        settings.set("*", "PRODUCT_NAME", "App");
        settings.set("Debug", "API_URL", "https://debug.example.com");
        settings.set("Release", "API_URL", "https://example.com");
        resolved
    }

    #[test]
    fn test_base_file() {
        let ctx = staging_debug(Path::new("/work"));
        let mut out = MemoryFS::new();
        XcconfigEmitter.emit(&ctx, &resolved(), &mut out).unwrap();

        assert_eq!(
            out.read_string("ProjectEnvironment.xcconfig").unwrap(),
            "// Natrium environment: Staging\n\nENVIRONMENT = Staging\nPRODUCT_NAME = App\n"
        );
    }

    #[test]
    fn test_configuration_files() {
        let ctx = staging_debug(Path::new("/work"));
        let mut out = MemoryFS::new();
        XcconfigEmitter.emit(&ctx, &resolved(), &mut out).unwrap();

        assert_eq!(
            out.read_string("ProjectEnvironment.debug.xcconfig").unwrap(),
            "// Natrium environment: Staging\n\n#include \"./ProjectEnvironment.xcconfig\"\n\nAPI_URL = https://debug.example.com\n"
        );
        assert!(out
            .read_string("ProjectEnvironment.release.xcconfig")
            .unwrap()
            .ends_with("API_URL = https://example.com\n"));
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn test_configuration_without_bucket_still_includes_base() {
        let mut ctx = staging_debug(Path::new("/work"));
        ctx.configurations.push("App Store".to_string());
        let mut out = MemoryFS::new();
        XcconfigEmitter.emit(&ctx, &resolved(), &mut out).unwrap();

        assert_eq!(
            out.read_string("ProjectEnvironment.app store.xcconfig").unwrap(),
            "// Natrium environment: Staging\n\n#include \"./ProjectEnvironment.xcconfig\"\n\n"
        );
    }

    #[test]
    fn test_pods_are_linked_once() {
        let temp = TempDir::new().unwrap();
        let ctx = staging_debug(temp.path());
        let pods = pods_xcconfig_path(temp.path(), "App", "Debug");
        fs::create_dir_all(pods.parent().unwrap()).unwrap();
        fs::write(&pods, "PODS_ROOT = ${SRCROOT}/Pods\n").unwrap();

        let mut out = MemoryFS::new();
        XcconfigEmitter.emit(&ctx, &resolved(), &mut out).unwrap();

        let linked = out.read_string(&pods).unwrap().to_string();
        assert!(linked.starts_with(
            "#include \"../../../Natrium/ProjectEnvironment.debug.xcconfig\"\n\nPODS_ROOT"
        ));

        fs::write(&pods, &linked).unwrap();
        let mut again = MemoryFS::new();
        XcconfigEmitter.emit(&ctx, &resolved(), &mut again).unwrap();
        assert!(!again.exists(&pods));
    }

    #[test]
    fn test_pods_linked_from_another_location_are_not_relinked() {
        let temp = TempDir::new().unwrap();
        let ctx = staging_debug(temp.path());
        let pods = pods_xcconfig_path(temp.path(), "App", "Debug");
        fs::create_dir_all(pods.parent().unwrap()).unwrap();
        fs::write(
            &pods,
            "#include \"/Users/old/App/Natrium/ProjectEnvironment.debug.xcconfig\"\n\nPODS_ROOT = ${SRCROOT}/Pods\n",
        )
        .unwrap();

        let mut out = MemoryFS::new();
        XcconfigEmitter.emit(&ctx, &resolved(), &mut out).unwrap();
        assert!(!out.exists(&pods));
    }

    #[test]
    fn test_relative_path() {
        assert_eq!(
            relative_path(Path::new("/p/Natrium/a.xcconfig"), Path::new("/p/Pods/Target Support Files/Pods-App")),
            Some(PathBuf::from("../../../Natrium/a.xcconfig"))
        );
        assert_eq!(
            relative_path(Path::new("./p/Natrium/a.xcconfig"), Path::new("p")),
            Some(PathBuf::from("Natrium/a.xcconfig"))
        );
        assert_eq!(relative_path(Path::new("/p/a"), Path::new("p")), None);
    }

    #[test]
    fn test_multiline_value_is_rejected() {
        let ctx = staging_debug(Path::new("/work"));
        let mut resolved = resolved();
        resolved.build_settings_mut().set("*", "BROKEN", "first\nsecond");

        let mut out = MemoryFS::new();
        let err = XcconfigEmitter.emit(&ctx, &resolved, &mut out).unwrap_err();
        assert!(matches!(err, Error::Emit { ref message, .. } if message.contains("BROKEN")));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_stale_patterns() {
        assert_eq!(XcconfigEmitter.stale_patterns(), vec!["ProjectEnvironment*.xcconfig"]);
    }
}
