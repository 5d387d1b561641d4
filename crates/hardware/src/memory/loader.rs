//! Resource Loading.
//!
//! The configuration string names an initialization resource; where the bytes come from
//! is the host's business. This module defines the lookup seam and two implementations.
//! It provides:
//! 1. **`ResourceLoader`:** Resolves a resource name to a buffered byte stream.
//! 2. **`FsLoader`:** Resolves names as paths, relative ones against a root directory.
//! 3. **`MemoryLoader`:** Serves named resources from memory.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor};
use std::path::{Path, PathBuf};

/// Resolves resource names to readable streams.
pub trait ResourceLoader {
    /// Opens `name` for reading.
    ///
    /// # Errors
    ///
    /// Any I/O failure, including `NotFound` for an unknown name.
    fn open(&self, name: &str) -> io::Result<Box<dyn BufRead>>;
}

/// Loads resources from the file system.
#[derive(Debug, Clone, Default)]
pub struct FsLoader {
    root: PathBuf,
}

impl FsLoader {
    /// Creates a loader that resolves relative names against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the path `name` resolves to.
    pub fn resolve(&self, name: &str) -> PathBuf {
        let path = Path::new(name);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl ResourceLoader for FsLoader {
    fn open(&self, name: &str) -> io::Result<Box<dyn BufRead>> {
        let file = File::open(self.resolve(name))?;
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Serves resources registered in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    resources: HashMap<String, Vec<u8>>,
}

impl MemoryLoader {
    /// Creates an empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `contents` under `name`, replacing any previous entry.
    #[must_use]
    pub fn with(mut self, name: &str, contents: impl Into<Vec<u8>>) -> Self {
        drop(self.resources.insert(name.to_string(), contents.into()));
        self
    }
}

impl ResourceLoader for MemoryLoader {
    fn open(&self, name: &str) -> io::Result<Box<dyn BufRead>> {
        let bytes = self.resources.get(name).ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("no resource named '{name}'"))
        })?;
        Ok(Box::new(Cursor::new(bytes.clone())))
    }
}
