//! Objective-C source emitter
//!
//! Generates `NatriumConfig.h` and `NatriumConfig.m`: `NS_ENUM` types for the
//! environments and configurations, class methods returning the active
//! values, and one class method per custom variable.

use std::fmt::Write as _;

use super::{escape_string, identifier, Emitter};
use crate::context::RunContext;
use crate::defaults;
use crate::error::{Error, Result};
use crate::filesystem::MemoryFS;
use crate::resolved::ResolvedMap;
use crate::value::Value;

const CLASS_NAME: &str = "NatriumConfig";

/// Emits the Objective-C header and implementation.
#[derive(Debug, Clone)]
pub struct ObjcEmitter {
    header_file: String,
    implementation_file: String,
}

impl Default for ObjcEmitter {
    fn default() -> Self {
        Self {
            header_file: defaults::OBJC_HEADER_FILE.to_string(),
            implementation_file: defaults::OBJC_IMPLEMENTATION_FILE.to_string(),
        }
    }
}

impl Emitter for ObjcEmitter {
    fn name(&self) -> &'static str {
        "objc"
    }

    fn emit(&self, ctx: &RunContext, resolved: &ResolvedMap, out: &mut MemoryFS) -> Result<()> {
        let to_emit_error = |e: std::fmt::Error| Error::Emit {
            emitter: self.name().to_string(),
            message: e.to_string(),
        };
        let header = self.render_header(ctx, resolved).map_err(to_emit_error)?;
        let implementation = self.render_implementation(ctx, resolved).map_err(to_emit_error)?;
        out.add_file_string(&self.header_file, &header)?;
        out.add_file_string(&self.implementation_file, &implementation)
    }
}

impl ObjcEmitter {
    pub fn render_header(&self, ctx: &RunContext, resolved: &ResolvedMap) -> std::result::Result<String, std::fmt::Error> {
        let mut s = String::new();
        write_banner(&mut s, &self.header_file)?;
        writeln!(s, "#import <Foundation/Foundation.h>")?;
        writeln!(s)?;
        write_enum(&mut s, "EnvironmentType", &ctx.environments)?;
        writeln!(s)?;
        write_enum(&mut s, "ConfigurationType", &ctx.configurations)?;
        writeln!(s)?;
        writeln!(s, "@interface {} : NSObject", CLASS_NAME)?;
        writeln!(s)?;
        writeln!(s, "+ (EnvironmentType)environment;")?;
        writeln!(s, "+ (ConfigurationType)configuration;")?;
        for (name, value) in resolved.custom_variables() {
            writeln!(s, "+ ({}){};", objc_type(value), name)?;
        }
        writeln!(s)?;
        writeln!(s, "@end")?;
        Ok(s)
    }

    pub fn render_implementation(
        &self,
        ctx: &RunContext,
        resolved: &ResolvedMap,
    ) -> std::result::Result<String, std::fmt::Error> {
        let mut s = String::new();
        write_banner(&mut s, &self.implementation_file)?;
        writeln!(s, "#import \"{}\"", self.header_file)?;
        writeln!(s)?;
        writeln!(s, "@implementation {}", CLASS_NAME)?;
        writeln!(s)?;
        write_method(
            &mut s,
            "EnvironmentType",
            "environment",
            &format!("EnvironmentType{}", identifier(&ctx.environment)),
        )?;
        write_method(
            &mut s,
            "ConfigurationType",
            "configuration",
            &format!("ConfigurationType{}", identifier(&ctx.configuration)),
        )?;
        for (name, value) in resolved.custom_variables() {
            write_method(&mut s, objc_type(value), name, &objc_literal(value))?;
        }
        writeln!(s, "@end")?;
        Ok(s)
    }
}

fn write_banner(s: &mut String, file_name: &str) -> std::fmt::Result {
    writeln!(s, "//")?;
    writeln!(s, "// {}", file_name)?;
    writeln!(s, "// Generated by natrium. Do not edit.")?;
    writeln!(s, "//")?;
    writeln!(s)
}

fn write_enum(s: &mut String, name: &str, labels: &[String]) -> std::fmt::Result {
    writeln!(s, "typedef NS_ENUM(NSInteger, {}) {{", name)?;
    let cases: Vec<String> = labels
        .iter()
        .map(|label| format!("    {}{}", name, identifier(label)))
        .collect();
    writeln!(s, "{}", cases.join(",\n"))?;
    writeln!(s, "}};")
}

fn write_method(s: &mut String, ty: &str, name: &str, body: &str) -> std::fmt::Result {
    writeln!(s, "+ ({}){} {{", ty, name)?;
    writeln!(s, "    return {};", body)?;
    writeln!(s, "}}")?;
    writeln!(s)
}

fn objc_type(value: &Value) -> &'static str {
    match value {
        Value::String(_) => "NSString *",
        Value::Bool(_) => "BOOL",
        Value::Int(_) => "NSInteger",
        Value::Float(_) => "CGFloat",
        Value::Null => "NSObject *",
    }
}

fn objc_literal(value: &Value) -> String {
    match value {
        Value::String(s) => format!("@\"{}\"", escape_string(s)),
        Value::Bool(true) => "YES".to_string(),
        Value::Bool(false) => "NO".to_string(),
        Value::Null => "NULL".to_string(),
        other => other.to_string(),
    }
}
