use crate::declaration::{BuiltinRecord, parse_line};
use crate::error::{GenError, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Builtins declared in a `Builtins.def` file, keyed by name.
///
/// Later declarations replace earlier ones with the same name.
#[derive(Debug, Clone, Default)]
pub struct BuiltinRegistry {
    entries: HashMap<String, BuiltinRecord>,
}

impl BuiltinRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the whole file into memory and scans it.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Reading builtin declarations from {:?}", path);
        let contents = fs::read_to_string(path).map_err(|e| GenError::read_input(path, e))?;
        debug!("Declaration file size: {} bytes", contents.len());
        Ok(Self::from_source(&contents))
    }

    /// Parses every line of `source` and registers the matches.
    pub fn from_source(source: &str) -> Self {
        let mut registry = Self::new();
        for line in source.lines() {
            if let Some(record) = parse_line(line) {
                registry.register(record);
            }
        }
        debug!("Registered {} builtins", registry.len());
        registry
    }

    /// Stores `record`, returning the entry it replaced.
    pub fn register(&mut self, record: BuiltinRecord) -> Option<BuiltinRecord> {
        self.entries.insert(record.name.clone(), record)
    }

    pub fn lookup(&self, name: &str) -> Option<&BuiltinRecord> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BuiltinRecord> {
        self.entries.values()
    }
}
