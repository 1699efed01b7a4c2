//! Import surface: classify a user-chosen file and hand it to the editor.
//!
//! An image file becomes the base image; a JSON file is parsed and imported.
//! Anything else, and any parse failure, leaves the editor untouched.

use crate::export::filename_from_stem;
use overlay_core::data_url;
use overlay_core::{OverlayError, Result};
use overlay_editor::OverlayEditor;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileKind {
    Image { mime_type: String },
    Document,
    Unsupported,
}

/// Classify by content type first, then by extension.
pub fn classify(name: &str, content_type: Option<&str>) -> FileKind {
    let content_type = content_type
        .map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_ascii_lowercase())
        .filter(|ct| !ct.is_empty() && ct != "application/octet-stream");

    if let Some(ct) = content_type {
        if ct.starts_with("image/") {
            return FileKind::Image { mime_type: ct };
        }
        if ct == "application/json" || ct.ends_with("+json") {
            return FileKind::Document;
        }
    }

    match data_url::guess_mime(name) {
        "application/json" => FileKind::Document,
        mime if mime.starts_with("image/") => FileKind::Image {
            mime_type: mime.to_string(),
        },
        _ => FileKind::Unsupported,
    }
}

/// What an import changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Imported {
    /// The file became the base image. `suggested_filename` is the export
    /// name derived from it.
    BaseImage { suggested_filename: String },
    /// Nodes reconstructed from a document.
    Nodes { count: usize },
}

/// Import one file into the editor.
pub fn import_file(
    editor: &mut OverlayEditor,
    name: &str,
    content_type: Option<&str>,
    bytes: &[u8],
) -> Result<Imported> {
    match classify(name, content_type) {
        FileKind::Image { mime_type } => {
            editor.set_base_image(Some(data_url::encode(&mime_type, bytes)));
            log::debug!("base image set from {} ({} bytes)", name, bytes.len());
            Ok(Imported::BaseImage {
                suggested_filename: filename_from_stem(name),
            })
        }
        FileKind::Document => {
            let text = std::str::from_utf8(bytes)
                .map_err(|e| OverlayError::InvalidDocument(format!("{name}: {e}")))?;
            let count = editor.import_json(text)?;
            Ok(Imported::Nodes { count })
        }
        FileKind::Unsupported => {
            log::warn!("unsupported import: {name}");
            Err(OverlayError::UnsupportedFile {
                name: name.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_by_content_type_then_extension() {
        assert_eq!(
            classify("upload", Some("image/png")),
            FileKind::Image {
                mime_type: "image/png".into()
            }
        );
        assert_eq!(
            classify("x.bin", Some("application/json; charset=utf-8")),
            FileKind::Document
        );
        assert_eq!(classify("overlay.JSON", None), FileKind::Document);
        assert_eq!(
            classify("photo.jpg", Some("application/octet-stream")),
            FileKind::Image {
                mime_type: "image/jpeg".into()
            }
        );
        assert_eq!(classify("notes.txt", Some("text/plain")), FileKind::Unsupported);
    }
}
