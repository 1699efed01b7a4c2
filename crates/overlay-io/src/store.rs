//! Template storage: where uploaded overlay documents go.

use overlay_core::{OverlayError, Result};
use std::path::{Path, PathBuf};

/// Status and body returned by a template store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResponse {
    pub status: u16,
    pub body: String,
}

impl UploadResponse {
    pub const CREATED: u16 = 201;

    pub fn created(body: impl Into<String>) -> Self {
        Self {
            status: Self::CREATED,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Self::CREATED
    }

    /// `Ok` for 201, otherwise `UploadRejected` carrying the body verbatim.
    pub fn into_result(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(OverlayError::UploadRejected {
                status: self.status,
                body: self.body,
            })
        }
    }
}

/// Accepts a named blob as one multipart field.
///
/// Transport failures are `OverlayError::Transport`; a reachable store that
/// refuses the upload answers with a non-201 `UploadResponse` instead.
#[allow(async_fn_in_trait)]
pub trait TemplateStore {
    async fn upload(&self, field: &str, filename: &str, bytes: Vec<u8>) -> Result<UploadResponse>;
}

/// Stores templates as files in one directory, answering like the upload
/// endpoint: 201 on success, 400 for a missing field or unusable filename.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    dir: PathBuf,
    field: String,
}

impl DirectoryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            field: "template".to_string(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl TemplateStore for DirectoryStore {
    async fn upload(&self, field: &str, filename: &str, bytes: Vec<u8>) -> Result<UploadResponse> {
        if field != self.field {
            return Ok(UploadResponse {
                status: 400,
                body: r#"{"error": "No file uploaded"}"#.to_string(),
            });
        }
        if !is_plain_filename(filename) {
            return Ok(UploadResponse {
                status: 400,
                body: r#"{"error": "Invalid filename"}"#.to_string(),
            });
        }

        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(filename);
        tokio::fs::write(&path, bytes).await?;
        log::info!("stored overlay template {}", path.display());
        Ok(UploadResponse::created(
            r#"{"message": "Template uploaded successfully"}"#,
        ))
    }
}

fn is_plain_filename(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}
