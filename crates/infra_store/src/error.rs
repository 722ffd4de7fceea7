//! Record store error types

use std::path::PathBuf;

use thiserror::Error;

use core_kernel::PortError;

/// Errors that can occur while reading or writing collections
#[derive(Debug, Error)]
pub enum StoreError {
    /// A collection file or the data directory could not be accessed
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Records could not be converted to or from JSON
    #[error("Serialization error in collection '{collection}': {source}")]
    Serialization {
        collection: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn serialization(collection: &'static str, source: serde_json::Error) -> Self {
        StoreError::Serialization { collection, source }
    }

    /// Checks if this error comes from the file system
    pub fn is_io(&self) -> bool {
        matches!(self, StoreError::Io { .. })
    }
}

impl From<StoreError> for PortError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Serialization { .. } => PortError::Transformation {
                message: error.to_string(),
            },
            StoreError::Io { .. } => {
                let message = error.to_string();
                PortError::storage(message, error)
            }
        }
    }
}
