//! Rendering and writing of the two generated headers.

use crate::wrapper::PREFIX_MACRO;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

pub const BANNER: &str = "/* Generated by clang-builtin-gen based on clang's Builtins.def */";

/// Relative path of the license-stamping script under the installation root.
pub const LICENSE_SCRIPT: &str = "util/buildRelease/add_license_to_sources.py";

/// Name of the C++ set listing every wrapped builtin.
pub const WRAPPED_SET_NAME: &str = "chplClangBuiltinWrappedFunctions";

/// The two headers this tool produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderKind {
    /// Runtime header with the inline wrapper definitions.
    Wrapper,
    /// Compiler header with the set of wrapped names.
    WrappedSet,
}

impl HeaderKind {
    /// Location of this header relative to the installation root.
    pub fn relative_path(&self) -> &'static str {
        match self {
            HeaderKind::Wrapper => "runtime/include/llvm/clang_builtins_wrapper.h",
            HeaderKind::WrappedSet => "compiler/include/clangBuiltinsWrappedSet.h",
        }
    }

    pub fn path_under(&self, root: &Path) -> PathBuf {
        root.join(self.relative_path())
    }

    /// Label used in the "saved to" message.
    pub fn description(&self) -> &'static str {
        match self {
            HeaderKind::Wrapper => "Wrapper header",
            HeaderKind::WrappedSet => "Wrapper header for compiler",
        }
    }
}

/// Hook run on each header after it has been written.
#[cfg_attr(test, mockall::automock)]
pub trait PostProcessor {
    fn process(&self, path: &Path);
}

/// Runs the license-stamping script on a file and waits for it. The outcome
/// is not checked.
#[derive(Debug, Clone)]
pub struct LicenseScript {
    script: PathBuf,
}

impl LicenseScript {
    pub fn new(script: impl Into<PathBuf>) -> Self {
        Self {
            script: script.into(),
        }
    }

    /// The script at its usual place under `root`.
    pub fn under_root(root: &Path) -> Self {
        Self::new(root.join(LICENSE_SCRIPT))
    }

    pub fn script(&self) -> &Path {
        &self.script
    }
}

impl PostProcessor for LicenseScript {
    fn process(&self, path: &Path) {
        let status = Command::new(&self.script).arg(path).status();
        debug!(script = ?self.script, file = ?path, ?status, "License script finished");
    }
}

/// Leaves written files untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPostProcessor;

impl PostProcessor for NoopPostProcessor {
    fn process(&self, _path: &Path) {}
}

/// Renders the runtime header from already-rendered wrapper definitions.
///
/// Lines are joined with `\n` and no trailing newline is added; each wrapper
/// already ends in one.
pub fn render_wrapper_header<S: AsRef<str>>(wrapper_prefix: &str, wrappers: &[S]) -> String {
    let mut lines = vec![
        BANNER.to_string(),
        format!("#define {}(S) {}##S", PREFIX_MACRO, wrapper_prefix),
    ];
    lines.extend(wrappers.iter().map(|w| w.as_ref().to_string()));
    lines.join("\n")
}

/// Renders the compiler header holding the set of wrapped names.
pub fn render_wrapped_set_header<'a>(
    wrapper_prefix: &str,
    names: impl IntoIterator<Item = &'a str>,
) -> String {
    let entries = names
        .into_iter()
        .map(quote)
        .collect::<Vec<_>>()
        .join(",\n");

    let lines = [
        BANNER.to_string(),
        "#ifdef HAVE_LLVM".to_string(),
        "#include <unordered_set>".to_string(),
        "#include <string>".to_string(),
        format!("#define WRAPPER_PREFIX {}", quote(wrapper_prefix)),
        format!("std::unordered_set<std::string> {} =", WRAPPED_SET_NAME),
        "{".to_string(),
        entries,
        "};\n".to_string(),
        "#endif".to_string(),
    ];

    let mut output = lines.join("\n");
    output.push('\n');
    output
}

fn quote(s: &str) -> String {
    format!("\"{}\"", s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_header_paths() {
        let root = Path::new("/opt/chapel");
        assert_eq!(
            HeaderKind::Wrapper.path_under(root),
            PathBuf::from("/opt/chapel/runtime/include/llvm/clang_builtins_wrapper.h")
        );
        assert_eq!(
            HeaderKind::WrappedSet.path_under(root),
            PathBuf::from("/opt/chapel/compiler/include/clangBuiltinsWrappedSet.h")
        );
    }

    #[test]
    fn test_render_wrapper_header_without_wrappers() {
        let header = render_wrapper_header::<&str>("pre_", &[]);
        assert_eq!(
            header,
            "/* Generated by clang-builtin-gen based on clang's Builtins.def */\n\
             #define ADD_WRAPPER_PREFIX(S) pre_##S"
        );
    }

    #[test]
    fn test_render_wrapper_header_separates_wrappers() {
        let header = render_wrapper_header("pre_", &["a\n", "b\n"]);
        assert!(header.ends_with("pre_##S\na\n\nb\n"));
    }

    #[test]
    fn test_render_wrapped_set_header() {
        let header = render_wrapped_set_header("pre_", ["cabs", "conj"]);
        assert_eq!(
            header,
            "/* Generated by clang-builtin-gen based on clang's Builtins.def */\n\
             #ifdef HAVE_LLVM\n\
             #include <unordered_set>\n\
             #include <string>\n\
             #define WRAPPER_PREFIX \"pre_\"\n\
             std::unordered_set<std::string> chplClangBuiltinWrappedFunctions =\n\
             {\n\
             \"cabs\",\n\
             \"conj\"\n\
             };\n\
             \n\
             #endif\n"
        );
    }

    #[test]
    fn test_license_script_under_root() {
        let hook = LicenseScript::under_root(Path::new("/opt/chapel"));
        assert_eq!(
            hook.script(),
            Path::new("/opt/chapel/util/buildRelease/add_license_to_sources.py")
        );
    }

    #[test]
    fn test_missing_license_script_is_ignored() {
        let hook = LicenseScript::new("/nonexistent/add_license_to_sources.py");
        hook.process(Path::new("/tmp/whatever.h"));
    }
}
