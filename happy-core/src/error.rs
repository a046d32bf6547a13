/// Structured error types for happy-core.
///
/// Uses `thiserror` so the controller can hand a concrete rejection reason
/// back to the host. Binary crates (happy-cli) still use `anyhow` for
/// convenience.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Longest response body kept in a [`HappyError::Rejected`] error.
pub const MAX_ERROR_BODY: usize = 500;

/// Main error type for happy-core operations
#[derive(Error, Debug)]
pub enum HappyError {
    /// No map click was recorded before submitting
    #[error("Select the orphanage location on the map before submitting")]
    MissingPosition,

    /// An image could not be read when building the request
    #[error("Failed to read image {path:?}: {source}")]
    ImageRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The API answered with a non-success status
    #[error("API rejected the request ({status}): {body}")]
    Rejected { status: u16, body: String },

    /// The request never produced a response
    #[error("Request failed: {source}")]
    Transport {
        #[from]
        source: reqwest::Error,
    },

    /// The API base URL could not be parsed or joined
    #[error("Invalid API URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Submit was called after the page already navigated away
    #[error("The form was already submitted")]
    NotEditing,
}

/// Result type alias for happy-core operations
pub type Result<T> = std::result::Result<T, HappyError>;

impl HappyError {
    /// Create an image read error
    pub fn image_read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::ImageRead {
            path: path.into(),
            source,
        }
    }

    /// Create a rejection error, truncating the body so large error pages
    /// don't end up in notices or logs
    pub fn rejected(status: u16, body: impl Into<String>) -> Self {
        let mut body = body.into();
        if body.len() > MAX_ERROR_BODY {
            let mut cut = MAX_ERROR_BODY;
            while !body.is_char_boundary(cut) {
                cut -= 1;
            }
            body.truncate(cut);
            body.push_str("...");
        }
        Self::Rejected { status, body }
    }

    /// Create an invalid URL error
    pub fn invalid_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }
}
