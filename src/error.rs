//! Error type for the fallible outer layers
//!
//! The simulation itself never fails: bad pointer input is sanitised and
//! integration bugs panic. Only seeds, settings and replay files can be
//! rejected at runtime.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LockError {
    /// Seed that xorshift cannot use (zero)
    #[error("invalid seed {0}: xorshift32 is degenerate at zero")]
    InvalidSeed(u32),
    /// I/O failure while reading or writing a file
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// JSON (de)serialization failure
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    /// Settings file parsed but holds unusable values
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
    /// Replay file parsed but cannot be played back
    #[error("invalid replay: {0}")]
    InvalidReplay(String),
}

impl LockError {
    /// I/O error tagged with the file it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_names_the_file() {
        let err = LockError::io(
            "saves/disklock.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(&err, LockError::Io { path, .. } if path.ends_with("disklock.json")));
        assert!(err.to_string().contains("saves/disklock.json"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
