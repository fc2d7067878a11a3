//! Per-operation failures.
//! Everything here is recoverable: the generator logs it, records it in the run report, and moves on.
//! Fatal input problems never use this type; they travel as `anyhow::Error` straight out of `main`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("failed to {action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize manifest {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl GenerateError {
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GenerateError::Io {
            action,
            path: path.into(),
            source,
        }
    }
}
