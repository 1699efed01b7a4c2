//! `data:` URL helpers for self-contained image payloads.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;

/// A decoded `data:` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

pub fn is_data_url(reference: &str) -> bool {
    reference.trim_start().starts_with("data:")
}

/// Encode bytes as `data:<mime>;base64,<payload>`.
pub fn encode(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, BASE64_STANDARD.encode(bytes))
}

/// Decode a `data:` URL. Non-base64 payloads are taken verbatim.
pub fn decode(reference: &str) -> Option<DataUrl> {
    let rest = reference.trim().strip_prefix("data:")?;
    let (meta, payload) = rest.split_once(',')?;
    let (mime_type, is_base64) = match meta.strip_suffix(";base64") {
        Some(mime) => (mime, true),
        None => (meta, false),
    };
    let bytes = if is_base64 {
        BASE64_STANDARD.decode(payload.trim()).ok()?
    } else {
        payload.as_bytes().to_vec()
    };
    let mime_type = if mime_type.is_empty() {
        "text/plain".to_string()
    } else {
        mime_type.to_string()
    };
    Some(DataUrl { mime_type, bytes })
}

/// Guess an image MIME type from a file name or URL path.
pub fn guess_mime(name: &str) -> &'static str {
    let path = name.split(['?', '#']).next().unwrap_or(name);
    let ext = path
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "tif" | "tiff" => "image/tiff",
        "json" => "application/json",
        _ => "application/octet-stream",
    }
}
