//! Inline forwarding functions for library builtins.
//!
//! For a library function such as `cabs` that clang also exposes as
//! `__builtin_cabs`, the generated wrapper is
//!
//! ```c
//! static inline double ADD_WRAPPER_PREFIX(cabs)(_Complex double arg0)
//! {
//!   return __builtin_cabs(arg0);
//! }
//! ```

use crate::declaration::BuiltinRecord;
use crate::error::{GenError, Result};
use crate::registry::BuiltinRegistry;
use crate::typecode::decode_types;
use std::fmt;
use tracing::debug;

/// Prefix clang puts on the builtin spelling of a library function.
pub const BUILTIN_PREFIX: &str = "__builtin_";

/// Token-pasting macro that prepends the wrapper prefix to a name.
pub const PREFIX_MACRO: &str = "ADD_WRAPPER_PREFIX";

/// Why a wrapper cannot be generated for a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ineligibility {
    /// No declaration with the target's own name.
    MissingLibraryBuiltin,
    /// The target is declared with `BUILTIN` rather than `LIBBUILTIN`.
    NotLibraryBuiltin,
    /// No `__builtin_` counterpart is declared.
    MissingWrappedBuiltin(String),
    /// The `__builtin_` counterpart lacks the `F` attribute.
    NotRedirected(String),
    /// The library signature decodes to no types at all.
    EmptySignature(String),
}

impl fmt::Display for Ineligibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ineligibility::MissingLibraryBuiltin => write!(f, "no LIBBUILTIN declaration"),
            Ineligibility::NotLibraryBuiltin => write!(f, "declared as a plain BUILTIN"),
            Ineligibility::MissingWrappedBuiltin(name) => write!(f, "{} is not declared", name),
            Ineligibility::NotRedirected(name) => {
                write!(f, "{} does not carry the 'F' attribute", name)
            }
            Ineligibility::EmptySignature(sig) => {
                write!(f, "type signature {:?} has no return type", sig)
            }
        }
    }
}

/// The name clang uses for the builtin spelling of `name`.
pub fn wrapped_builtin_name(name: &str) -> String {
    format!("{}{}", BUILTIN_PREFIX, name)
}

/// Returns the library record for `name` if a wrapper can forward it to its
/// `__builtin_` counterpart.
pub fn check_eligibility<'r>(
    registry: &'r BuiltinRegistry,
    name: &str,
) -> std::result::Result<&'r BuiltinRecord, Ineligibility> {
    let library = registry
        .lookup(name)
        .ok_or(Ineligibility::MissingLibraryBuiltin)?;
    if !library.is_library() {
        return Err(Ineligibility::NotLibraryBuiltin);
    }

    let wrapped_name = wrapped_builtin_name(name);
    let wrapped = registry
        .lookup(&wrapped_name)
        .ok_or_else(|| Ineligibility::MissingWrappedBuiltin(wrapped_name.clone()))?;
    if !wrapped.is_redirected() {
        return Err(Ineligibility::NotRedirected(wrapped_name));
    }

    Ok(library)
}

/// A wrapper ready to be rendered as C source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wrapper {
    pub name: String,
    pub return_type: String,
    /// `(type, name)` pairs in declaration order.
    pub parameters: Vec<(String, String)>,
}

impl Wrapper {
    /// Builds the wrapper from the library record's own signature.
    pub fn from_library(record: &BuiltinRecord) -> std::result::Result<Self, Ineligibility> {
        let mut types = decode_types(&record.type_signature);
        let return_type = types
            .next()
            .ok_or_else(|| Ineligibility::EmptySignature(record.type_signature.clone()))?;
        let parameters = types
            .by_ref()
            .enumerate()
            .map(|(i, ty)| (ty, format!("arg{}", i)))
            .collect();

        if !types.remainder().is_empty() {
            debug!(
                name = %record.name,
                dropped = types.remainder(),
                "Ignoring undecodable signature suffix"
            );
        }

        Ok(Self {
            name: record.name.clone(),
            return_type,
            parameters,
        })
    }

    /// Renders the `static inline` definition, ending in a newline.
    pub fn render(&self) -> String {
        let params = self
            .parameters
            .iter()
            .map(|(ty, name)| format!("{} {}", ty, name))
            .collect::<Vec<_>>()
            .join(", ");
        let args = self
            .parameters
            .iter()
            .map(|(_, name)| name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "static inline {ret} {PREFIX_MACRO}({name})({params})\n{{\n  return {builtin}({args});\n}}\n",
            ret = self.return_type,
            name = self.name,
            builtin = wrapped_builtin_name(&self.name),
        )
    }
}

/// Checks `name` and renders its wrapper, failing with
/// [`GenError::Ineligible`] when it cannot be wrapped.
pub fn generate_wrapper(registry: &BuiltinRegistry, name: &str) -> Result<String> {
    let wrapper = check_eligibility(registry, name)
        .and_then(Wrapper::from_library)
        .map_err(|reason| GenError::ineligible(name, reason))?;
    Ok(wrapper.render())
}
