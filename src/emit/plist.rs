//! Property-list editor
//!
//! Entries of the `infoplist` category go into the Info.plist given for the
//! run; entries of categories named after a `.plist` or `.entitlements` file
//! go into that file, relative to the project directory.
//!
//! Keys may address nested dictionaries with `:` separators
//! (`NSAppTransportSecurity:NSAllowsArbitraryLoads`). An existing key is set
//! in place; a missing key is added, creating intermediate dictionaries.
//! Values keep their resolved type. Binary property lists stay binary.
//!
//! The file is only staged when an edit changed it.

use std::fs;
use std::path::PathBuf;

use log::{debug, info};
use plist::{Dictionary, Value as PlistValue};

use super::Emitter;
use crate::config::Category;
use crate::context::RunContext;
use crate::error::{Error, Result};
use crate::filesystem::MemoryFS;
use crate::resolved::{OrderedMap, ResolvedMap};
use crate::value::Value;

const BINARY_MAGIC: &[u8] = b"bplist00";

/// Edits Info.plist and other property-list files in place.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlistEmitter;

/// A single change to a property list.
#[derive(Debug, Clone, PartialEq)]
pub enum PlistEdit {
    /// Create the key, and any missing parent dictionaries.
    Add { path: Vec<String>, value: PlistValue },
    /// Replace the value of an existing key.
    Set { path: Vec<String>, value: PlistValue },
}

impl PlistEdit {
    fn path(&self) -> &[String] {
        match self {
            PlistEdit::Add { path, .. } | PlistEdit::Set { path, .. } => path,
        }
    }
}

impl Emitter for PlistEmitter {
    fn name(&self) -> &'static str {
        "plist"
    }

    fn emit(&self, ctx: &RunContext, resolved: &ResolvedMap, out: &mut MemoryFS) -> Result<()> {
        for (category, entries) in resolved.plist_categories() {
            let path = plist_path(ctx, category);
            if !path.is_file() {
                return Err(Error::FileNotFound {
                    path: path.display().to_string(),
                });
            }
            let data = fs::read(&path)?;
            let binary = data.starts_with(BINARY_MAGIC);
            let mut root = parse_dictionary(&data).map_err(|message| Error::Emit {
                emitter: self.name().to_string(),
                message: format!("{}: {}", path.display(), message),
            })?;

            let original = root.clone();
            for edit in plan(&root, entries) {
                log_edit(&path, &edit);
                apply(&mut root, edit).map_err(|message| Error::Emit {
                    emitter: self.name().to_string(),
                    message: format!("{}: {}", path.display(), message),
                })?;
            }
            if root == original {
                debug!("{} is up to date", path.display());
                continue;
            }

            let mut buffer = Vec::new();
            let value = PlistValue::Dictionary(root);
            if binary {
                value.to_writer_binary(&mut buffer)?;
            } else {
                value.to_writer_xml(&mut buffer)?;
            }
            out.add_file_content(&path, buffer)?;
        }
        Ok(())
    }
}

/// Location of the property list a plist category writes to.
pub fn plist_path(ctx: &RunContext, category: &str) -> PathBuf {
    match Category::from_name(category) {
        Category::InfoPlist => ctx.infoplist_path(),
        _ => ctx.project_path(category),
    }
}

fn parse_dictionary(data: &[u8]) -> std::result::Result<Dictionary, String> {
    let value: PlistValue = plist::from_bytes(data).map_err(|e| e.to_string())?;
    match value {
        PlistValue::Dictionary(dict) => Ok(dict),
        _ => Err("root is not a dictionary".to_string()),
    }
}

/// Decide for every entry whether it is added or set. Null values are
/// skipped.
pub fn plan(root: &Dictionary, entries: &OrderedMap<Value>) -> Vec<PlistEdit> {
    entries
        .iter()
        .filter_map(|(key, value)| {
            let value = to_plist(value)?;
            let path: Vec<String> = key.split(':').map(str::to_string).collect();
            Some(if lookup(root, &path).is_some() {
                PlistEdit::Set { path, value }
            } else {
                PlistEdit::Add { path, value }
            })
        })
        .collect()
}

fn to_plist(value: &Value) -> Option<PlistValue> {
    match value {
        Value::String(s) => Some(PlistValue::String(s.clone())),
        Value::Bool(b) => Some(PlistValue::Boolean(*b)),
        Value::Int(i) => Some(PlistValue::Integer((*i).into())),
        Value::Float(f) => Some(PlistValue::Real(*f)),
        Value::Null => None,
    }
}

fn lookup<'a>(root: &'a Dictionary, path: &[String]) -> Option<&'a PlistValue> {
    let (last, parents) = path.split_last()?;
    let mut dict = root;
    for segment in parents {
        dict = dict.get(segment)?.as_dictionary()?;
    }
    dict.get(last)
}

/// Apply one edit to `root`.
pub fn apply(root: &mut Dictionary, edit: PlistEdit) -> std::result::Result<(), String> {
    let Some((last, parents)) = edit.path().split_last() else {
        return Err("empty key".to_string());
    };
    let last = last.clone();
    let parents = parents.to_vec();

    let mut dict = root;
    for segment in &parents {
        if !dict.contains_key(segment) {
            dict.insert(segment.clone(), PlistValue::Dictionary(Dictionary::new()));
        }
        dict = dict
            .get_mut(segment)
            .and_then(PlistValue::as_dictionary_mut)
            .ok_or_else(|| format!("'{}' is not a dictionary", segment))?;
    }

    let value = match edit {
        PlistEdit::Add { value, .. } | PlistEdit::Set { value, .. } => value,
    };
    dict.insert(last, value);
    Ok(())
}

fn log_edit(path: &std::path::Path, edit: &PlistEdit) {
    match edit {
        PlistEdit::Add { path: key, value } => {
            info!("{}: Add :{} {:?}", path.display(), key.join(":"), value)
        }
        PlistEdit::Set { path: key, value } => {
            info!("{}: Set :{} {:?}", path.display(), key.join(":"), value)
        }
    }
}
