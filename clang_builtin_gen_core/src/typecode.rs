//! Decoder for the compact type strings used in `Builtins.def`.
//!
//! A signature such as `"dXd"` is a run of type units, one character per
//! qualifier or base type. Each unit is read in three phases (prefix
//! qualifiers, base types, postfix qualifiers), and the first unit of a
//! signature is the return type:
//!
//! ```
//! use clang_builtin_gen_core::typecode::decode_types;
//!
//! let types: Vec<String> = decode_types("dXd").collect();
//! assert_eq!(types, ["double", "_Complex double"]);
//! ```

use std::iter::FusedIterator;
use tracing::trace;

/// Qualifiers that precede the base type (`X`, `L`, `S`, `U`).
pub fn prefix_qualifier(code: char) -> Option<&'static str> {
    match code {
        'X' => Some("_Complex"),
        'L' => Some("long"),
        'S' => Some("signed"),
        'U' => Some("unsigned"),
        _ => None,
    }
}

/// Primitive base types.
pub fn base_type(code: char) -> Option<&'static str> {
    match code {
        'v' => Some("void"),
        'b' => Some("boolean"),
        'c' => Some("char"),
        's' => Some("short"),
        'i' => Some("int"),
        'h' => Some("half"),
        'f' => Some("float"),
        'd' => Some("double"),
        'z' => Some("size_t"),
        'w' => Some("wchar_t"),
        _ => None,
    }
}

/// Pointer and cv-qualifiers that follow the base type.
pub fn postfix_qualifier(code: char) -> Option<&'static str> {
    match code {
        '*' => Some("*"),
        'C' => Some("const"),
        'D' => Some("volatile"),
        _ => None,
    }
}

type CodeTable = fn(char) -> Option<&'static str>;

const PHASES: [CodeTable; 3] = [prefix_qualifier, base_type, postfix_qualifier];

/// Decodes one type unit from the front of `input`.
///
/// Returns the undecoded remainder together with the space-joined tokens, or
/// `None` once `input` is empty. A unit that matches no code at all comes back
/// as an empty string with `input` unchanged; [`TypeCodes`] treats that as the
/// end of the signature.
pub fn decode_unit(input: &str) -> Option<(&str, String)> {
    if input.is_empty() {
        return None;
    }

    let mut tokens = Vec::new();
    let mut rest = input;
    for table in PHASES {
        rest = take_codes(rest, table, &mut tokens);
    }

    Some((rest, tokens.join(" ")))
}

fn take_codes<'a>(input: &'a str, table: CodeTable, tokens: &mut Vec<&'static str>) -> &'a str {
    for (idx, code) in input.char_indices() {
        match table(code) {
            Some(token) => tokens.push(token),
            None => return &input[idx..],
        }
    }
    ""
}

/// Lazily decodes every type unit in a signature.
pub fn decode_types(signature: &str) -> TypeCodes<'_> {
    TypeCodes {
        rest: signature,
        stalled: false,
    }
}

/// Iterator returned by [`decode_types`].
#[derive(Debug, Clone)]
pub struct TypeCodes<'a> {
    rest: &'a str,
    stalled: bool,
}

impl<'a> TypeCodes<'a> {
    /// The part of the signature not decoded so far. After the iterator is
    /// exhausted this is the dropped suffix (e.g. `"."` for variadics).
    pub fn remainder(&self) -> &'a str {
        self.rest
    }
}

impl Iterator for TypeCodes<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.stalled {
            return None;
        }

        let (rest, decoded) = decode_unit(self.rest)?;
        if rest.len() == self.rest.len() {
            trace!(remainder = rest, "Dropping undecodable type-code suffix");
            self.stalled = true;
            return None;
        }

        self.rest = rest;
        Some(decoded)
    }
}

impl FusedIterator for TypeCodes<'_> {}
