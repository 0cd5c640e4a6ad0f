//! Artifact emitters
//!
//! Each emitter turns the resolved map into one family of artifacts and
//! stages them in a [`MemoryFS`]. Relative paths land in the output
//! directory; absolute paths (project files such as Info.plist) are written
//! where they point.
//!
//! Emitters never write to disk themselves. The emission phase flushes each
//! emitter's staging area right after it succeeded, so the artifacts of
//! earlier emitters survive a later failure.

pub mod objc;
pub mod plist;
pub mod swift;
pub mod xcconfig;

use crate::context::RunContext;
use crate::error::Result;
use crate::filesystem::MemoryFS;
use crate::resolved::ResolvedMap;

pub use self::objc::ObjcEmitter;
pub use self::plist::PlistEmitter;
pub use self::swift::SwiftEmitter;
pub use self::xcconfig::XcconfigEmitter;

/// Renders one family of artifacts from a resolved map.
pub trait Emitter {
    /// Short name used in log lines and error messages.
    fn name(&self) -> &'static str;

    /// Glob patterns, relative to the output directory, matching artifacts
    /// of previous runs that must be removed before this emitter's files
    /// are written.
    fn stale_patterns(&self) -> Vec<String> {
        Vec::new()
    }

    /// Stage this emitter's artifacts into `out`.
    fn emit(&self, ctx: &RunContext, resolved: &ResolvedMap, out: &mut MemoryFS) -> Result<()>;
}

/// The emitters of a run, in emission order.
pub fn emitters(objc: bool) -> Vec<Box<dyn Emitter>> {
    let mut emitters: Vec<Box<dyn Emitter>> = vec![
        Box::new(PlistEmitter),
        Box::new(SwiftEmitter::default()),
    ];
    if objc {
        emitters.push(Box::new(ObjcEmitter::default()));
    }
    emitters.push(Box::new(XcconfigEmitter));
    emitters
}

/// Turn an arbitrary label into a valid source identifier.
///
/// Characters other than ASCII letters, digits and `_` are dropped, and a
/// leading digit gets a `_` prefix. An empty result becomes `_`.
pub(crate) fn identifier(name: &str) -> String {
    let mut ident: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    if ident.chars().next().is_none_or(|c| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    ident
}

/// Escape a string for a double-quoted C-family literal.
pub(crate) fn escape_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c => escaped.push(c),
        }
    }
    escaped
}
