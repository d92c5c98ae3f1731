//! Error types shared by every operation in this crate.

use std::path::PathBuf;
use thiserror::Error;

/// A rejection reported by a cloud provider (SDK or API error), carried as text.
///
/// Provider implementations flatten their SDK errors into this type so the core
/// stays independent of any particular SDK.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ProviderError {
    message: String,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Error, Debug)]
pub enum Error {
    /// A path could not be stat'ed, listed or opened.
    #[error("filesystem error at {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The object store rejected a single object.
    #[error("upload of {key} failed: {source}")]
    Upload {
        key: String,
        #[source]
        source: ProviderError,
    },

    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// A hosted zone (or other named resource) lookup found nothing.
    #[error("Could not find hosted zone for {0}")]
    NotFound(String),
}

impl Error {
    pub(crate) fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Filesystem {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
