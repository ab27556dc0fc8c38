//! Generator configuration: the curated builtin lists, the wrapper prefix,
//! and the installation root the headers are written under.

use crate::error::{GenError, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming the installation root.
pub const ROOT_ENV_VAR: &str = "CHPL_HOME";

pub const DEFAULT_WRAPPER_PREFIX: &str = "chpl_clang_builtin_wrapper_";

/// Library builtins that get a generated wrapper.
pub const DEFAULT_DELEGATED_BUILTINS: &[&str] = &[
    "cabs", "cabsf", "cabsl", "cimag", "cimagf", "cimagl", "creal", "crealf", "creall", "conj",
    "conjf", "conjl",
];

/// Builtins wrapped by hand in `chapel_libc_wrapper.h`. They are listed in
/// the wrapped set but get no generated wrapper.
pub const DEFAULT_REWRITTEN_BUILTINS: &[&str] = &[];

/// Configuration for one generator run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub delegated_builtins: Vec<String>,
    pub rewritten_builtins: Vec<String>,
    pub wrapper_prefix: String,
    /// Installation root; output paths and the license script hang off it.
    pub root: PathBuf,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            delegated_builtins: to_owned_list(DEFAULT_DELEGATED_BUILTINS),
            rewritten_builtins: to_owned_list(DEFAULT_REWRITTEN_BUILTINS),
            wrapper_prefix: DEFAULT_WRAPPER_PREFIX.to_string(),
            root: PathBuf::from("."),
        }
    }
}

fn to_owned_list(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    builtins: BuiltinsSection,
    #[serde(default)]
    output: OutputSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct BuiltinsSection {
    delegated: Option<Vec<String>>,
    rewritten: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct OutputSection {
    wrapper_prefix: Option<String>,
}

impl GeneratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> GeneratorConfigBuilder {
        GeneratorConfigBuilder::default()
    }

    /// Loads the curated lists and prefix from a TOML file. Keys that are
    /// absent keep their defaults.
    pub fn from_toml_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading generator configuration from {:?}", path);
        let content = fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    fn parse_toml(content: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content)?;
        let mut config = Self::default();

        if let Some(delegated) = file.builtins.delegated {
            config.delegated_builtins = delegated;
        }
        if let Some(rewritten) = file.builtins.rewritten {
            config.rewritten_builtins = rewritten;
        }
        if let Some(prefix) = file.output.wrapper_prefix {
            config.wrapper_prefix = prefix;
        }

        config.validate()?;
        debug!(
            "Configuration: {} delegated, {} rewritten, prefix {:?}",
            config.delegated_builtins.len(),
            config.rewritten_builtins.len(),
            config.wrapper_prefix
        );
        Ok(config)
    }

    /// Rejects prefixes and names that would not paste into a C identifier.
    pub fn validate(&self) -> Result<()> {
        if !is_c_identifier(&self.wrapper_prefix) {
            return Err(GenError::config(format!(
                "wrapper_prefix {:?} is not a valid C identifier",
                self.wrapper_prefix
            )));
        }
        for name in self.delegated_builtins.iter().chain(&self.rewritten_builtins) {
            if !is_c_identifier(name) {
                return Err(GenError::config(format!(
                    "builtin name {:?} is not a valid C identifier",
                    name
                )));
            }
        }
        Ok(())
    }

    /// Names recorded in the wrapped set, rewritten ones first.
    pub fn wrapped_names(&self) -> impl Iterator<Item = &str> {
        self.rewritten_builtins
            .iter()
            .chain(&self.delegated_builtins)
            .map(String::as_str)
    }
}

fn is_c_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Resolves the installation root from `explicit` or [`ROOT_ENV_VAR`],
/// loading a `.env` file first if one is present.
pub fn resolve_root(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(root) = explicit {
        return Ok(root);
    }
    dotenv::dotenv().ok();
    env::var_os(ROOT_ENV_VAR)
        .map(PathBuf::from)
        .ok_or_else(|| GenError::EnvVarNotSet(ROOT_ENV_VAR.to_string()))
}

/// Builder for [`GeneratorConfig`].
#[derive(Debug, Default)]
pub struct GeneratorConfigBuilder {
    config: GeneratorConfig,
}

impl GeneratorConfigBuilder {
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.root = root.into();
        self
    }

    pub fn wrapper_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.wrapper_prefix = prefix.into();
        self
    }

    /// Replaces the delegated list.
    pub fn delegated<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.delegated_builtins = names.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the rewritten list.
    pub fn rewritten<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.rewritten_builtins = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn build(self) -> GeneratorConfig {
        self.config
    }
}
