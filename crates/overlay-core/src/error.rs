//! Error taxonomy shared by the editor and the I/O surfaces.
//!
//! Nothing here is fatal: every variant maps to either "state unchanged,
//! user informed" or a per-node fallback that the caller logs and skips.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OverlayError {
    /// The input could not be parsed as JSON at all.
    #[error("invalid overlay JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),

    /// Parsed JSON whose shape is not an overlay document.
    #[error("not an overlay document: {0}")]
    InvalidDocument(String),

    /// A file handed to the import surface that is neither an image nor JSON.
    #[error("unsupported file type: {name}")]
    UnsupportedFile { name: String },

    /// An image reference that could not be fetched for embedding.
    #[error("failed to fetch asset `{reference}`: {reason}")]
    AssetFetch { reference: String, reason: String },

    /// The template store answered with anything other than `201 Created`.
    #[error("template upload rejected ({status}): {body}")]
    UploadRejected { status: u16, body: String },

    /// The template store could not be reached.
    #[error("template upload failed: {0}")]
    Transport(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = OverlayError> = std::result::Result<T, E>;
