//! Swift source emitter
//!
//! Generates a single `Config.swift` declaring the environment and
//! configuration enums, the active values, and one typed constant per
//! custom variable. The dialect decides the enum case casing: legacy sources
//! keep the label's casing, modern sources lower-case the first character.

use std::fmt::Write as _;

use log::debug;

use super::{escape_string, identifier, Emitter};
use crate::context::RunContext;
use crate::defaults;
use crate::error::{Error, Result};
use crate::filesystem::MemoryFS;
use crate::project::Dialect;
use crate::resolved::ResolvedMap;
use crate::value::{Value, ValueType};

/// Emits the Swift configuration class.
#[derive(Debug, Clone)]
pub struct SwiftEmitter {
    class_name: String,
    file_name: String,
}

impl Default for SwiftEmitter {
    fn default() -> Self {
        Self {
            class_name: defaults::SWIFT_CLASS.to_string(),
            file_name: defaults::SWIFT_FILE.to_string(),
        }
    }
}

impl Emitter for SwiftEmitter {
    fn name(&self) -> &'static str {
        "swift"
    }

    fn emit(&self, ctx: &RunContext, resolved: &ResolvedMap, out: &mut MemoryFS) -> Result<()> {
        let source = self.render(ctx, resolved).map_err(|e| Error::Emit {
            emitter: self.name().to_string(),
            message: e.to_string(),
        })?;
        out.add_file_string(&self.file_name, &source)
    }
}

impl SwiftEmitter {
    pub fn render(&self, ctx: &RunContext, resolved: &ResolvedMap) -> std::result::Result<String, std::fmt::Error> {
        let dialect = ctx.dialect();
        let mut s = String::new();

        writeln!(s, "import Foundation")?;
        writeln!(s)?;
        writeln!(s, "public class {} {{", self.class_name)?;
        write_enum(&mut s, "EnvironmentType", &ctx.environments, dialect)?;
        writeln!(s)?;
        write_enum(&mut s, "ConfigurationType", &ctx.configurations, dialect)?;
        writeln!(s)?;
        writeln!(
            s,
            "    public static let environment: EnvironmentType = .{}",
            case_name(&ctx.environment, dialect)
        )?;
        writeln!(
            s,
            "    public static let configuration: ConfigurationType = .{}",
            case_name(&ctx.configuration, dialect)
        )?;

        let mut first = true;
        for (name, value) in resolved.custom_variables() {
            let Some((ty, literal)) = literal(value) else {
                debug!("Skipping null variable '{}' in {}", name, self.file_name);
                continue;
            };
            if first {
                writeln!(s)?;
                first = false;
            }
            writeln!(s, "    public static let {}: {} = {}", name, ty, literal)?;
        }

        writeln!(s, "}}")?;
        Ok(s)
    }
}

fn write_enum(s: &mut String, name: &str, labels: &[String], dialect: Dialect) -> std::fmt::Result {
    writeln!(s, "    public enum {}: String {{", name)?;
    for label in labels {
        writeln!(
            s,
            "        case {} = \"{}\"",
            case_name(label, dialect),
            escape_string(label)
        )?;
    }
    writeln!(s, "    }}")
}

/// Enum case name for a label in the given dialect.
pub fn case_name(label: &str, dialect: Dialect) -> String {
    let ident = identifier(label);
    match dialect {
        Dialect::Legacy => ident,
        Dialect::Modern => {
            let mut chars = ident.chars();
            match chars.next() {
                Some(first) => first.to_lowercase().chain(chars).collect(),
                None => ident,
            }
        }
    }
}

/// Swift type and literal of a value; `None` for null.
fn literal(value: &Value) -> Option<(&'static str, String)> {
    let ty = match value.value_type() {
        ValueType::String => "String",
        ValueType::Bool => "Bool",
        ValueType::Int => "Int",
        ValueType::Float => "Double",
        ValueType::Null => return None,
    };
    let literal = match value {
        Value::String(s) => format!("\"{}\"", escape_string(s)),
        other => other.to_string(),
    };
    Some((ty, literal))
}
