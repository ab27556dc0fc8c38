//! Line parser for `Builtins.def` declarations.
//!
//! Two record shapes are recognised:
//!
//! ```text
//! LIBBUILTIN(cabs, "dXd", "Fne", complex.h, ALL_LANGUAGES)
//! BUILTIN(__builtin_cabs, "dXd", "Fne")
//! ```
//!
//! Every other line, including marker lines that do not fit their pattern,
//! is skipped so that new syntax in the declaration file does not break the
//! generator.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

pub const LIBBUILTIN_MARKER: &str = "LIBBUILTIN";
pub const BUILTIN_MARKER: &str = "BUILTIN";

/// Attribute flag marking a library function that clang also exposes as
/// `__builtin_<name>`.
pub const REDIRECTED_FLAG: char = 'F';

static LIBBUILTIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^LIBBUILTIN\((?P<name>\w+)[, ]+"(?P<type>[\w*.]+)"[, ]+"(?P<attrs>[\w+:]+)"[, ]+(?P<header>[\w./-]+)[, ]+(?P<langs>\w+)\)"#,
    )
    .expect("Invalid regex for LIBBUILTIN declarations")
});

static BUILTIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^BUILTIN\((?P<name>\w+)[, ]+"(?P<type>[\w*.]+)"[, ]+"(?P<attrs>[\w+:]+)"\)"#)
        .expect("Invalid regex for BUILTIN declarations")
});

/// Which declaration form a record came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuiltinKind {
    /// `BUILTIN(...)`
    Plain,
    /// `LIBBUILTIN(...)`, naming the C library header and language dialects.
    Library { header: String, languages: String },
}

/// A single declared builtin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltinRecord {
    pub name: String,
    /// Raw type string, e.g. `"dXd"`; see [`crate::typecode`].
    pub type_signature: String,
    pub attributes: String,
    pub kind: BuiltinKind,
}

impl BuiltinRecord {
    pub fn plain(
        name: impl Into<String>,
        type_signature: impl Into<String>,
        attributes: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            type_signature: type_signature.into(),
            attributes: attributes.into(),
            kind: BuiltinKind::Plain,
        }
    }

    pub fn library(
        name: impl Into<String>,
        type_signature: impl Into<String>,
        attributes: impl Into<String>,
        header: impl Into<String>,
        languages: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            type_signature: type_signature.into(),
            attributes: attributes.into(),
            kind: BuiltinKind::Library {
                header: header.into(),
                languages: languages.into(),
            },
        }
    }

    pub fn is_library(&self) -> bool {
        matches!(self.kind, BuiltinKind::Library { .. })
    }

    pub fn header(&self) -> Option<&str> {
        match &self.kind {
            BuiltinKind::Library { header, .. } => Some(header),
            BuiltinKind::Plain => None,
        }
    }

    pub fn languages(&self) -> Option<&str> {
        match &self.kind {
            BuiltinKind::Library { languages, .. } => Some(languages),
            BuiltinKind::Plain => None,
        }
    }

    /// Whether the attributes carry the [`REDIRECTED_FLAG`].
    pub fn is_redirected(&self) -> bool {
        self.attributes.contains(REDIRECTED_FLAG)
    }
}

/// Classifies a line by its marker and parses it.
pub fn parse_line(line: &str) -> Option<BuiltinRecord> {
    let record = if line.starts_with(LIBBUILTIN_MARKER) {
        parse_lib_builtin(line)
    } else if line.starts_with(BUILTIN_MARKER) {
        parse_builtin(line)
    } else {
        return None;
    };

    if record.is_none() {
        trace!(line = line.trim_end(), "Skipping unrecognised declaration");
    }
    record
}

/// Parses a `LIBBUILTIN(name, "type", "attrs", header, langs)` line.
pub fn parse_lib_builtin(line: &str) -> Option<BuiltinRecord> {
    let caps = LIBBUILTIN_RE.captures(line)?;
    Some(BuiltinRecord::library(
        &caps["name"],
        &caps["type"],
        &caps["attrs"],
        &caps["header"],
        &caps["langs"],
    ))
}

/// Parses a `BUILTIN(name, "type", "attrs")` line.
pub fn parse_builtin(line: &str) -> Option<BuiltinRecord> {
    let caps = BUILTIN_RE.captures(line)?;
    Some(BuiltinRecord::plain(
        &caps["name"],
        &caps["type"],
        &caps["attrs"],
    ))
}
