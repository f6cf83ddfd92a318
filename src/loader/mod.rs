//! Input loaders
//!
//! Loaders open the raw bytes that the row source parses:
//! - StringLoader: in-memory text (tests, stdin)
//! - LocalFileLoader: a path on the local file system

pub mod reader;

use std::fmt;
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

pub use reader::{Row, RowSource};

/// Error type for loading and reading input sources
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("Unable to load {source_name}. Got: {reason}")]
    Io { source_name: String, reason: String },
    #[error("Unable to parse CSV: {0}")]
    Parse(String),
}

/// Trait for input sources
///
/// The `Display` implementation is the source description used in reports,
/// e.g. `LocalFileLoader('data/orders.csv')`.
pub trait Loader: fmt::Display {
    /// Open the source for reading
    fn open(&self) -> Result<Box<dyn Read>, LoaderError>;
}

impl<L: Loader + ?Sized> Loader for Box<L> {
    fn open(&self) -> Result<Box<dyn Read>, LoaderError> {
        (**self).open()
    }
}

/// Loads CSV text held in memory
#[derive(Debug, Clone)]
pub struct StringLoader {
    name: String,
    content: Arc<[u8]>,
}

impl StringLoader {
    /// Create a loader over the given text
    pub fn new(content: impl Into<String>) -> Self {
        Self::named("<string>", content)
    }

    /// Create a loader with a custom description (for example `<stdin>`)
    pub fn named(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: Arc::from(content.into().into_bytes()),
        }
    }
}

impl Loader for StringLoader {
    fn open(&self) -> Result<Box<dyn Read>, LoaderError> {
        Ok(Box::new(Cursor::new(Arc::clone(&self.content))))
    }
}

impl fmt::Display for StringLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StringLoader('{}')", self.name)
    }
}

/// Loads CSV text from a local file path
#[derive(Debug, Clone)]
pub struct LocalFileLoader {
    path: PathBuf,
}

impl LocalFileLoader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Loader for LocalFileLoader {
    fn open(&self) -> Result<Box<dyn Read>, LoaderError> {
        let file = File::open(&self.path).map_err(|e| LoaderError::Io {
            source_name: format!("local file {}", self.path.display()),
            reason: e.to_string(),
        })?;
        Ok(Box::new(BufReader::new(file)))
    }
}

impl fmt::Display for LocalFileLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LocalFileLoader('{}')", self.path.display())
    }
}
