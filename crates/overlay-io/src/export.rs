//! Export: snapshot, image embedding, filenames, local save and upload.
//!
//! The snapshot is taken synchronously before the first `.await`, so edits
//! made while images are being fetched never leak into the document being
//! exported. A failed fetch keeps that image's original reference and the
//! export carries on.

use crate::fetch::AssetFetcher;
use crate::store::{TemplateStore, UploadResponse};
use chrono::{SecondsFormat, Utc};
use overlay_core::data_url;
use overlay_core::{OverlayDocument, Result};
use overlay_editor::OverlayEditor;
use std::path::{Path, PathBuf};

pub const DEFAULT_FILENAME: &str = "overlay.json";

#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// User-supplied filename; derived from the document when `None`.
    pub filename: Option<String>,
    /// Multipart field the template store expects.
    pub field: String,
    pub pretty: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            filename: None,
            field: "template".to_string(),
            pretty: true,
        }
    }
}

/// Outcome of embedding one document's images.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmbedReport {
    pub embedded: usize,
    /// References kept as-is because they could not be fetched.
    pub retained: usize,
}

/// ISO-8601 UTC timestamp with milliseconds, e.g. `2024-05-01T12:00:00.000Z`.
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Synchronous half of an export: the editor's state, stamped.
pub fn prepare(editor: &OverlayEditor) -> OverlayDocument {
    let mut document = editor.snapshot();
    document.exported_at = Some(timestamp());
    document
}

/// Replace every non-embedded image reference (node `src` and the base
/// `image`) with a `data:` URL. Each reference is fetched independently.
pub async fn embed_images<F: AssetFetcher>(
    document: &mut OverlayDocument,
    fetcher: &F,
) -> EmbedReport {
    let mut report = EmbedReport::default();

    if let Some(image) = document.image.as_mut() {
        embed_one(image, fetcher, &mut report).await;
    }
    for record in document.nodes.iter_mut().flatten() {
        if !record.is_image() {
            continue;
        }
        if let Some(src) = record.src.as_mut() {
            embed_one(src, fetcher, &mut report).await;
        }
    }

    log::debug!(
        "embedded {} images, kept {} references",
        report.embedded,
        report.retained
    );
    report
}

async fn embed_one<F: AssetFetcher>(reference: &mut String, fetcher: &F, report: &mut EmbedReport) {
    if reference.is_empty() || data_url::is_data_url(reference) {
        return;
    }
    match fetcher.fetch(reference).await {
        Ok(asset) => {
            *reference = asset.to_data_url();
            report.embedded += 1;
        }
        Err(e) => {
            log::warn!("keeping original image reference: {e}");
            report.retained += 1;
        }
    }
}

/// Snapshot the editor and embed its images.
pub async fn export_document<F: AssetFetcher>(
    editor: &OverlayEditor,
    fetcher: &F,
) -> OverlayDocument {
    let mut document = prepare(editor);
    embed_images(&mut document, fetcher).await;
    document
}

/// Document bytes as written to disk or uploaded.
pub fn encode(document: &OverlayDocument, pretty: bool) -> Result<Vec<u8>> {
    Ok(if pretty {
        serde_json::to_vec_pretty(document)?
    } else {
        serde_json::to_vec(document)?
    })
}

// ─── Filenames ───────────────────────────────────────────────────────────

/// Add `.json` unless the name already ends with it (any case).
pub fn ensure_json_suffix(name: &str) -> String {
    if name.to_ascii_lowercase().ends_with(".json") {
        name.to_string()
    } else {
        format!("{name}.json")
    }
}

/// `<stem>.json` for a file name or path; `DEFAULT_FILENAME` when there is
/// no usable stem.
pub fn filename_from_stem(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name).trim();
    let stem = match base.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => base,
    };
    if stem.is_empty() {
        DEFAULT_FILENAME.to_string()
    } else {
        format!("{stem}.json")
    }
}

/// The filename an export is written under: the user's choice if given,
/// else derived from `fallback` (document name or base image file name),
/// else `overlay.json`. Always ends in `.json`.
pub fn resolve_filename(requested: Option<&str>, fallback: Option<&str>) -> String {
    if let Some(name) = requested.map(str::trim).filter(|n| !n.is_empty()) {
        return ensure_json_suffix(name);
    }
    match fallback.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => filename_from_stem(name),
        None => DEFAULT_FILENAME.to_string(),
    }
}

// ─── Destinations ────────────────────────────────────────────────────────

/// Write the document into `dir` as `filename` (the download path).
pub async fn save_local(
    dir: &Path,
    filename: &str,
    document: &OverlayDocument,
    pretty: bool,
) -> Result<PathBuf> {
    let bytes = encode(document, pretty)?;
    let path = dir.join(ensure_json_suffix(filename));
    tokio::fs::write(&path, bytes).await?;
    log::info!("saved overlay to {}", path.display());
    Ok(path)
}

/// Upload the document as one multipart field. Only 201 counts as success.
pub async fn upload<S: TemplateStore>(
    store: &S,
    field: &str,
    filename: &str,
    document: &OverlayDocument,
    pretty: bool,
) -> Result<UploadResponse> {
    let filename = ensure_json_suffix(filename);
    let bytes = encode(document, pretty)?;
    let response = store.upload(field, &filename, bytes).await?;
    if !response.is_success() {
        log::warn!(
            "upload of {} rejected with {}: {}",
            filename,
            response.status,
            response.body
        );
    }
    response.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_enforced_once() {
        assert_eq!(ensure_json_suffix("promo"), "promo.json");
        assert_eq!(ensure_json_suffix("promo.JSON"), "promo.JSON");
        assert_eq!(ensure_json_suffix("promo.txt"), "promo.txt.json");
    }

    #[test]
    fn filename_resolution() {
        assert_eq!(resolve_filename(Some("  mine "), Some("x")), "mine.json");
        assert_eq!(resolve_filename(Some(""), Some("Spring promo")), "Spring promo.json");
        assert_eq!(resolve_filename(None, Some("photos/beach.jpg")), "beach.json");
        assert_eq!(resolve_filename(None, Some("template.json")), "template.json");
        assert_eq!(resolve_filename(None, None), "overlay.json");
        assert_eq!(resolve_filename(None, Some("   ")), "overlay.json");
    }

    #[test]
    fn stem_edge_cases() {
        assert_eq!(filename_from_stem(".hidden"), ".hidden.json");
        assert_eq!(filename_from_stem("dir/"), "overlay.json");
        assert_eq!(filename_from_stem("C:\\pics\\logo.png"), "logo.json");
    }

    #[test]
    fn timestamp_is_utc_millis() {
        let ts = timestamp();
        assert!(ts.ends_with('Z'), "{ts}");
        assert_eq!(ts.len(), "2024-05-01T12:00:00.000Z".len());
    }
}
