use crate::error::{Error, Result};
use log::error;
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Locator of an XML document.
///
/// A source can be opened any number of times, each time yielding a fresh stream
/// positioned at the start of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// A document on the file system.
    Path(PathBuf),
    /// A document held in memory, identified by `uri` in diagnostics.
    Memory {
        /// Identifier reported as the base URI and in errors.
        uri: String,
        /// Raw document bytes.
        bytes: Arc<[u8]>,
    },
}

impl Source {
    /// Creates an in-memory source.
    pub fn memory(uri: impl Into<String>, text: impl AsRef<[u8]>) -> Self {
        Source::Memory {
            uri: uri.into(),
            bytes: Arc::from(text.as_ref()),
        }
    }

    /// Identifier of the source, used as base URI and in diagnostics.
    pub fn uri(&self) -> String {
        match self {
            Source::Path(path) => path.display().to_string(),
            Source::Memory { uri, .. } => uri.clone(),
        }
    }

    pub(crate) fn open(&self) -> Result<Box<dyn BufRead>> {
        match self {
            Source::Path(path) => {
                let file = File::open(path).map_err(|err| {
                    error!(target: "xmlfold", "failed to open '{}': {err}", path.display());
                    Error::Open {
                        uri: self.uri(),
                        err,
                    }
                })?;
                Ok(Box::new(BufReader::new(file)))
            }
            Source::Memory { bytes, .. } => Ok(Box::new(Cursor::new(Arc::clone(bytes)))),
        }
    }
}

impl From<PathBuf> for Source {
    fn from(value: PathBuf) -> Self {
        Source::Path(value)
    }
}

impl From<&Path> for Source {
    fn from(value: &Path) -> Self {
        Source::Path(value.to_owned())
    }
}

impl From<&str> for Source {
    fn from(value: &str) -> Self {
        Source::Path(PathBuf::from(value))
    }
}
