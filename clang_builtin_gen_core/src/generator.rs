//! The full pipeline: registry -> wrappers -> headers on disk.

use crate::config::GeneratorConfig;
use crate::emit::{HeaderKind, PostProcessor, render_wrapped_set_header, render_wrapper_header};
use crate::error::Result;
use crate::registry::BuiltinRegistry;
use crate::wrapper::generate_wrapper;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Both headers rendered in memory, before anything touches the disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedHeaders {
    pub wrapper: String,
    pub wrapped_set: String,
    /// Number of wrapper definitions in `wrapper`.
    pub wrapper_count: usize,
}

impl GeneratedHeaders {
    pub fn content(&self, kind: HeaderKind) -> &str {
        match kind {
            HeaderKind::Wrapper => &self.wrapper,
            HeaderKind::WrappedSet => &self.wrapped_set,
        }
    }
}

/// Information about a generated file.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    /// The path where the file was written.
    pub path: PathBuf,
    /// The number of bytes written.
    pub bytes_written: usize,
    pub kind: HeaderKind,
}

/// Report of the generation process.
#[derive(Debug, Clone, Default)]
pub struct GenerationReport {
    /// Files in the order they were written.
    pub files: Vec<GeneratedFile>,
    pub builtins_scanned: usize,
    pub wrappers_generated: usize,
}

impl GenerationReport {
    pub fn total_bytes(&self) -> usize {
        self.files.iter().map(|f| f.bytes_written).sum()
    }
}

/// Renders and writes the wrapper headers for one configuration.
pub struct HeaderGenerator {
    config: GeneratorConfig,
}

impl HeaderGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Renders both headers. Fails on the first delegated builtin that cannot
    /// be wrapped.
    pub fn render(&self, registry: &BuiltinRegistry) -> Result<GeneratedHeaders> {
        info!(
            "Generating wrappers for {} builtins",
            self.config.delegated_builtins.len()
        );

        let wrappers = self
            .config
            .delegated_builtins
            .iter()
            .map(|name| {
                debug!("Generating wrapper for {}", name);
                generate_wrapper(registry, name)
            })
            .collect::<Result<Vec<_>>>()?;

        let wrapper = render_wrapper_header(&self.config.wrapper_prefix, &wrappers);
        let wrapped_set =
            render_wrapped_set_header(&self.config.wrapper_prefix, self.config.wrapped_names());

        Ok(GeneratedHeaders {
            wrapper,
            wrapped_set,
            wrapper_count: wrappers.len(),
        })
    }

    /// Writes both headers under the configured root, then runs `hook` on
    /// each written file in the same order. Parent directories must exist.
    pub fn write(
        &self,
        headers: &GeneratedHeaders,
        hook: &dyn PostProcessor,
    ) -> Result<Vec<GeneratedFile>> {
        let mut files = Vec::new();
        for kind in [HeaderKind::Wrapper, HeaderKind::WrappedSet] {
            let path = kind.path_under(&self.config.root);
            let content = headers.content(kind);
            fs::write(&path, content)?;
            debug!("Wrote {} bytes to {:?}", content.len(), path);
            files.push(GeneratedFile {
                path,
                bytes_written: content.len(),
                kind,
            });
        }

        for file in &files {
            hook.process(&file.path);
        }

        Ok(files)
    }

    /// Scans `input`, renders both headers, and writes them.
    pub fn generate_from_file(
        &self,
        input: impl AsRef<Path>,
        hook: &dyn PostProcessor,
    ) -> Result<GenerationReport> {
        let registry = BuiltinRegistry::from_file(input)?;
        let headers = self.render(&registry)?;
        let files = self.write(&headers, hook)?;

        let report = GenerationReport {
            files,
            builtins_scanned: registry.len(),
            wrappers_generated: headers.wrapper_count,
        };
        info!(
            "Generated {} files ({} bytes)",
            report.files.len(),
            report.total_bytes()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::{MockPostProcessor, NoopPostProcessor};
    use crate::error::GenError;
    use crate::wrapper::Ineligibility;
    use mockall::Sequence;
    use mockall::predicate::eq;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const BUILTINS_DEF: &str = r#"
// Complex functions
BUILTIN(__builtin_cabs, "dXd", "Fne")
BUILTIN(__builtin_cabsf, "fXf", "Fne")
BUILTIN(__builtin_conj, "XdXd", "Fnc")
BUILTIN(__builtin_creall, "LdXLd", "Fnc")
BUILTIN(__builtin_cexp, "XdXd", "Fne")

LIBBUILTIN(cabs, "dXd", "fne", complex.h, ALL_LANGUAGES)
LIBBUILTIN(cabsf, "fXf", "fne", complex.h, ALL_LANGUAGES)
LIBBUILTIN(conj, "XdXd", "fnc", complex.h, ALL_LANGUAGES)
LIBBUILTIN(creall, "LdXLd", "fnc", complex.h, ALL_LANGUAGES)
LIBBUILTIN(cexp, "XdXd", "fne", complex.h, ALL_LANGUAGES)
"#;

    fn config(root: &Path) -> GeneratorConfig {
        GeneratorConfig::builder()
            .root(root)
            .delegated(["cabs", "cabsf", "conj", "creall"])
            .build()
    }

    fn install_root() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("runtime/include/llvm")).unwrap();
        fs::create_dir_all(dir.path().join("compiler/include")).unwrap();
        dir
    }

    #[test]
    fn test_render_snapshot() {
        let registry = BuiltinRegistry::from_source(BUILTINS_DEF);
        let headers = HeaderGenerator::new(config(Path::new("/unused")))
            .render(&registry)
            .unwrap();

        assert_eq!(headers.wrapper_count, 4);
        insta::assert_snapshot!("wrapper_header", headers.wrapper);
        insta::assert_snapshot!("wrapped_set_header", headers.wrapped_set);
    }

    #[test]
    fn test_render_is_deterministic() {
        let generator = HeaderGenerator::new(config(Path::new("/unused")));
        let first = generator
            .render(&BuiltinRegistry::from_source(BUILTINS_DEF))
            .unwrap();
        let second = generator
            .render(&BuiltinRegistry::from_source(BUILTINS_DEF))
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_rewritten_names_are_listed_but_not_wrapped() {
        let registry = BuiltinRegistry::from_source(BUILTINS_DEF);
        let config = GeneratorConfig::builder()
            .delegated(["cabs"])
            .rewritten(["cexp"])
            .build();
        let headers = HeaderGenerator::new(config).render(&registry).unwrap();

        assert!(!headers.wrapper.contains("ADD_WRAPPER_PREFIX(cexp)"));
        assert!(headers.wrapped_set.contains("{\n\"cexp\",\n\"cabs\"\n};"));
    }

    #[test]
    fn test_render_fails_on_first_ineligible() {
        let registry = BuiltinRegistry::from_source(BUILTINS_DEF);
        let config = GeneratorConfig::builder()
            .delegated(["cabs", "cimag", "cabsf"])
            .build();

        let err = HeaderGenerator::new(config).render(&registry).unwrap_err();
        match err {
            GenError::Ineligible { name, reason } => {
                assert_eq!(name, "cimag");
                assert_eq!(reason, Ineligibility::MissingLibraryBuiltin);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_generate_from_file_writes_both_headers() {
        let root = install_root();
        let input = root.path().join("Builtins.def");
        fs::write(&input, BUILTINS_DEF).unwrap();

        let mut hook = MockPostProcessor::new();
        let mut seq = Sequence::new();
        for kind in [HeaderKind::Wrapper, HeaderKind::WrappedSet] {
            hook.expect_process()
                .with(eq(kind.path_under(root.path())))
                .times(1)
                .in_sequence(&mut seq)
                .return_const(());
        }

        let report = HeaderGenerator::new(config(root.path()))
            .generate_from_file(&input, &hook)
            .unwrap();

        assert_eq!(report.builtins_scanned, 10);
        assert_eq!(report.wrappers_generated, 4);
        assert_eq!(report.files.len(), 2);
        assert_eq!(report.files[0].kind, HeaderKind::Wrapper);

        let wrapper = fs::read_to_string(&report.files[0].path).unwrap();
        assert_eq!(wrapper.len(), report.files[0].bytes_written);
        assert!(wrapper.contains("return __builtin_creall(arg0);"));
        let wrapped_set = fs::read_to_string(&report.files[1].path).unwrap();
        assert!(wrapped_set.ends_with("#endif\n"));
        assert_eq!(report.total_bytes(), wrapper.len() + wrapped_set.len());
    }

    #[test]
    fn test_ineligible_builtin_writes_nothing() {
        let root = install_root();
        let input = root.path().join("Builtins.def");
        fs::write(&input, "LIBBUILTIN(cabs, \"dXd\", \"fne\", complex.h, ALL_LANGUAGES)\n").unwrap();

        let mut hook = MockPostProcessor::new();
        hook.expect_process().never();

        let err = HeaderGenerator::new(config(root.path()))
            .generate_from_file(&input, &hook)
            .unwrap_err();

        assert!(err.is_user_facing());
        assert!(!HeaderKind::Wrapper.path_under(root.path()).exists());
        assert!(!HeaderKind::WrappedSet.path_under(root.path()).exists());
    }

    #[test]
    fn test_missing_output_directory_fails() {
        let root = TempDir::new().unwrap();
        let headers = HeaderGenerator::new(config(root.path()))
            .render(&BuiltinRegistry::from_source(BUILTINS_DEF))
            .unwrap();

        let err = HeaderGenerator::new(config(root.path()))
            .write(&headers, &NoopPostProcessor)
            .unwrap_err();
        assert!(matches!(err, GenError::Io(_)));
    }
}
