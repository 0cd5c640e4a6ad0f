//! File copies and the app icon ribbon
//!
//! The `files` category maps destination paths to source paths, both
//! relative to the project directory. The `appicon` category names an
//! original icon set, the `.appiconset` to generate, and the ribbon text
//! stamped onto every PNG.
//!
//! Missing sources are fatal and are checked before anything is written.
//! Drawing the ribbon needs ImageMagick; when it is unavailable the failure
//! is reported as a warning.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::{debug, info};
use walkdir::WalkDir;

use crate::config::Category;
use crate::context::RunContext;
use crate::error::{Error, Result};
use crate::filesystem::MemoryFS;
use crate::resolved::ResolvedMap;

/// A file to copy into the project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCopy {
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// Copies requested by the `files` category, in document order.
///
/// Entries whose value is not a string are ignored.
pub fn file_copies(ctx: &RunContext, resolved: &ResolvedMap) -> Vec<FileCopy> {
    let Some(entries) = resolved.category(Category::FILES) else {
        return Vec::new();
    };
    entries
        .iter()
        .filter_map(|(destination, source)| match source.as_str() {
            Some(source) => Some(FileCopy {
                source: ctx.project_path(source),
                destination: ctx.project_path(destination),
            }),
            None => {
                debug!("Ignoring non-path file entry '{}'", destination);
                None
            }
        })
        .collect()
}

/// Stage every copy into `out`.
pub fn stage_copies(copies: &[FileCopy], out: &mut MemoryFS) -> Result<()> {
    for copy in copies {
        let content = fs::read(&copy.source).map_err(|_| Error::FileNotFound {
            path: copy.source.display().to_string(),
        })?;
        info!("Copy {} to {}", copy.source.display(), copy.destination.display());
        out.add_file_content(&copy.destination, content)?;
    }
    Ok(())
}

/// Settings of the `appicon` category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconRequest {
    /// Directory holding the source icon set.
    pub original: PathBuf,
    /// The `.appiconset` directory to generate.
    pub appiconset: PathBuf,
    /// Ribbon text; empty copies the icons unchanged.
    pub ribbon: String,
}

impl IconRequest {
    pub const ORIGINAL: &'static str = "original";
    pub const APPICONSET: &'static str = "appiconset";
    pub const RIBBON: &'static str = "ribbon";

    /// Read the request from the resolved map. Without both an `original`
    /// and an `appiconset` there is nothing to do.
    pub fn from_resolved(ctx: &RunContext, resolved: &ResolvedMap) -> Option<Self> {
        let entries = resolved.category(Category::APPICON)?;
        let original = entries.get(Self::ORIGINAL).and_then(|v| v.as_str());
        let appiconset = entries.get(Self::APPICONSET).and_then(|v| v.as_str());
        let (Some(original), Some(appiconset)) = (original, appiconset) else {
            debug!("appicon needs both '{}' and '{}'", Self::ORIGINAL, Self::APPICONSET);
            return None;
        };
        let ribbon = entries
            .get(Self::RIBBON)
            .filter(|v| !v.is_null())
            .map(ToString::to_string)
            .unwrap_or_default();
        Some(Self {
            original: ctx.project_path(original),
            appiconset: ctx.project_path(appiconset),
            ribbon,
        })
    }
}

/// Paths referenced by the resolved map that must exist before emission.
pub fn referenced_sources(ctx: &RunContext, resolved: &ResolvedMap) -> Vec<PathBuf> {
    let mut sources: Vec<PathBuf> = file_copies(ctx, resolved)
        .into_iter()
        .map(|copy| copy.source)
        .collect();
    if let Some(request) = IconRequest::from_resolved(ctx, resolved) {
        sources.push(request.original);
    }
    sources
}

/// Fail with [`Error::FileNotFound`] for the first missing path.
pub fn check_sources(paths: &[PathBuf]) -> Result<()> {
    match paths.iter().find(|path| !path.exists()) {
        Some(missing) => Err(Error::FileNotFound {
            path: missing.display().to_string(),
        }),
        None => Ok(()),
    }
}

/// Generates the ribboned icon set.
pub trait IconRibbon {
    fn name(&self) -> &'static str;

    /// Stage the icon set described by `request` into `out`.
    fn generate(&self, request: &IconRequest, out: &mut MemoryFS) -> Result<()>;
}

/// [`IconRibbon`] backed by the ImageMagick `convert` and `identify` tools.
#[derive(Debug, Clone)]
pub struct ImageMagick {
    convert: String,
    identify: String,
}

impl Default for ImageMagick {
    fn default() -> Self {
        Self {
            convert: "convert".to_string(),
            identify: "identify".to_string(),
        }
    }
}

impl ImageMagick {
    fn tool_error(&self, message: impl Into<String>) -> Error {
        Error::Tool {
            tool: self.name().to_string(),
            message: message.into(),
        }
    }

    fn run(&self, program: &str, args: &[String]) -> Result<Vec<u8>> {
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|e| self.tool_error(format!("cannot run '{}': {}", program, e)))?;
        if !output.status.success() {
            return Err(self.tool_error(format!(
                "'{}' failed: {}",
                program,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(output.stdout)
    }

    fn dimensions(&self, image: &Path) -> Result<(u32, u32)> {
        let stdout = self.run(
            &self.identify,
            &["-format".to_string(), "%w %h".to_string(), image.display().to_string()],
        )?;
        let text = String::from_utf8_lossy(&stdout);
        let mut parts = text.split_whitespace().map(str::parse::<u32>);
        match (parts.next(), parts.next()) {
            (Some(Ok(w)), Some(Ok(h))) => Ok((w, h)),
            _ => Err(self.tool_error(format!("unexpected size '{}' for {}", text.trim(), image.display()))),
        }
    }

    fn stamp(&self, source: &Path, destination: &Path, ribbon: &str) -> Result<()> {
        let (width, height) = self.dimensions(source)?;
        self.run(&self.convert, &ribbon_args(source, destination, ribbon, width, height))?;
        Ok(())
    }
}

/// `convert` arguments drawing a translucent band with `ribbon` across the
/// bottom quarter of the image.
pub fn ribbon_args(source: &Path, destination: &Path, ribbon: &str, width: u32, height: u32) -> Vec<String> {
    let band = (height / 4).max(1);
    let point_size = (band * 3 / 5).max(1);
    vec![
        source.display().to_string(),
        "(".to_string(),
        "-size".to_string(),
        format!("{}x{}", width, band),
        "xc:#000000A0".to_string(),
        "-fill".to_string(),
        "white".to_string(),
        "-gravity".to_string(),
        "center".to_string(),
        "-pointsize".to_string(),
        point_size.to_string(),
        "-annotate".to_string(),
        "+0+0".to_string(),
        ribbon.to_string(),
        ")".to_string(),
        "-gravity".to_string(),
        "south".to_string(),
        "-composite".to_string(),
        destination.display().to_string(),
    ]
}

impl IconRibbon for ImageMagick {
    fn name(&self) -> &'static str {
        "imagemagick"
    }

    fn generate(&self, request: &IconRequest, out: &mut MemoryFS) -> Result<()> {
        if !request.ribbon.is_empty() {
            self.run(&self.convert, &["-version".to_string()])?;
        }
        fs::create_dir_all(&request.appiconset)?;

        for entry in WalkDir::new(&request.original)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| Error::Filesystem {
                message: format!("Failed to read '{}': {}", request.original.display(), e),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let destination = request.appiconset.join(entry.file_name());
            let is_png = entry
                .path()
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));

            if is_png && !request.ribbon.is_empty() {
                debug!("Stamping '{}' onto {}", request.ribbon, destination.display());
                self.stamp(entry.path(), &destination, &request.ribbon)?;
            } else {
                out.add_file_content(&destination, fs::read(entry.path())?)?;
            }
        }
        Ok(())
    }
}
