// clang-builtin-gen - inline wrappers for clang's library builtins

pub mod config;
pub mod declaration;
pub mod emit;
pub mod error;
pub mod generator;
pub mod registry;
pub mod typecode;
pub mod wrapper;

// Re-export commonly used items for convenience
pub use config::GeneratorConfig;
pub use declaration::{BuiltinKind, BuiltinRecord};
pub use emit::{HeaderKind, LicenseScript, NoopPostProcessor, PostProcessor};
pub use error::{GenError, Result};
pub use generator::{GeneratedFile, GeneratedHeaders, GenerationReport, HeaderGenerator};
pub use registry::BuiltinRegistry;
