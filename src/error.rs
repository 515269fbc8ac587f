//! Error types for the cleanup run.
//!
//! Every variant is terminal for the run, there is no retry policy.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while inventorying or cleaning up Edge Connector groups.
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or invalid credentials / run settings.
    #[error("configuration error: {0}")]
    Config(String),

    /// The management API answered with a non-success status.
    #[error("API request failed: {method} {path} -> {status} {body}")]
    Api {
        method: &'static str,
        path: String,
        status: u16,
        body: String,
    },

    /// Transport level failure (connect, TLS, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Pagination over a collection resource failed.
    #[error("failed to fetch {resource}: {source}")]
    Fetch {
        resource: String,
        #[source]
        source: Box<Error>,
    },

    /// Raw payload could not be decoded into groups.
    #[error("failed to decode record {record} at path '{path}': {message}{}", saved_note(.raw_saved))]
    Decode {
        record: String,
        path: String,
        message: String,
        raw_saved: Option<PathBuf>,
    },

    /// The API rejected a VM delete call.
    #[error("failed to delete {path}: {source}")]
    Delete {
        path: String,
        #[source]
        source: Box<Error>,
    },

    /// Filesystem error on the debug side channel.
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The confirmation prompt could not be read.
    #[error("prompt failed: {0}")]
    Prompt(String),
}

impl Error {
    /// Attach the location of the saved raw payload to a decode error.
    pub fn with_raw_saved(self, saved: PathBuf) -> Self {
        match self {
            Error::Decode {
                record,
                path,
                message,
                ..
            } => Error::Decode {
                record,
                path,
                message,
                raw_saved: Some(saved),
            },
            other => other,
        }
    }
}

fn saved_note(raw_saved: &Option<PathBuf>) -> String {
    match raw_saved {
        Some(p) => format!(" (raw JSON saved to {})", p.display()),
        None => String::new(),
    }
}

/// Result type for cleanup operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_mentions_saved_file() {
        let err = Error::Decode {
            record: "#0".to_string(),
            path: "ecVMs[0].id".to_string(),
            message: "invalid type".to_string(),
            raw_saved: None,
        }
        .with_raw_saved(PathBuf::from("out/ecgroups_1.json"));
        let msg = err.to_string();
        assert!(msg.contains("ecVMs[0].id"), "{msg}");
        assert!(msg.contains("out/ecgroups_1.json"), "{msg}");
    }

    #[test]
    fn test_with_raw_saved_leaves_other_errors() {
        let err = Error::Config("x".to_string()).with_raw_saved(PathBuf::from("a"));
        assert!(matches!(err, Error::Config(_)));
    }
}
