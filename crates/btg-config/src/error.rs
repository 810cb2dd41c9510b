//! Error types for btg-config

use std::path::PathBuf;

/// Result type for btg-config operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or saving the configuration
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration file not found at expected path
    #[error("Configuration not found at {path}")]
    NotFound { path: PathBuf },

    /// The document parsed, but a known field holds a value of the wrong type
    #[error("Invalid configuration document at {path}: {source}")]
    Schema {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The in-memory configuration could not be turned into a document
    #[error("Failed to encode configuration: {0}")]
    Encode(#[source] serde_json::Error),

    /// Filesystem error from btg-fs
    #[error(transparent)]
    Fs(#[from] btg_fs::Error),
}

impl Error {
    /// True for failures caused by the file's content rather than access to it.
    pub fn is_parse(&self) -> bool {
        match self {
            Self::Schema { .. } => true,
            Self::Fs(e) => e.is_parse(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json_error() -> serde_json::Error {
        serde_json::from_str::<serde_json::Value>("{").unwrap_err()
    }

    #[test]
    fn schema_and_fs_parse_errors_count_as_parse() {
        let schema = Error::Schema {
            path: "config.json".into(),
            source: json_error(),
        };
        let fs_parse = Error::Fs(btg_fs::Error::Parse {
            path: "config.json".into(),
            source: json_error(),
        });

        assert!(schema.is_parse());
        assert!(fs_parse.is_parse());
    }

    #[test]
    fn not_found_and_io_are_not_parse_errors() {
        let missing = Error::NotFound {
            path: "config.json".into(),
        };
        let io = Error::Fs(btg_fs::Error::io(
            "config.json",
            std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        ));

        assert!(!missing.is_parse());
        assert!(!io.is_parse());
        assert_eq!(missing.to_string(), "Configuration not found at config.json");
    }
}
