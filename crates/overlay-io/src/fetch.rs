//! Asset fetching for export-time image embedding.

use overlay_core::data_url;
use overlay_core::{OverlayError, Result};
use std::path::{Path, PathBuf};

/// Raw bytes of a fetched image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl Asset {
    pub fn to_data_url(&self) -> String {
        data_url::encode(&self.mime_type, &self.bytes)
    }
}

/// Resolves an image reference (URL or path) to its bytes.
///
/// Used through generics only, so the returned future need not be `Send`.
#[allow(async_fn_in_trait)]
pub trait AssetFetcher {
    async fn fetch(&self, reference: &str) -> Result<Asset>;
}

/// Reads `file://` URLs and plain paths from disk. Relative paths and
/// root-relative URL paths (`/static/a.png`) resolve against `root` when set.
#[derive(Debug, Clone, Default)]
pub struct FsFetcher {
    root: Option<PathBuf>,
}

impl FsFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    /// Map a reference to a file path, or `None` for schemes this fetcher
    /// cannot serve.
    pub fn resolve(&self, reference: &str) -> Option<PathBuf> {
        let reference = reference.trim();
        if let Some(path) = reference.strip_prefix("file://") {
            return Some(PathBuf::from(path));
        }
        if reference.contains("://") || data_url::is_data_url(reference) {
            return None;
        }
        let path = reference
            .split(['?', '#'])
            .next()
            .unwrap_or(reference);
        match &self.root {
            Some(root) => Some(root.join(path.trim_start_matches('/'))),
            None => Some(PathBuf::from(path)),
        }
    }
}

impl AssetFetcher for FsFetcher {
    async fn fetch(&self, reference: &str) -> Result<Asset> {
        let path = self
            .resolve(reference)
            .ok_or_else(|| OverlayError::AssetFetch {
                reference: reference.to_string(),
                reason: "unsupported scheme".to_string(),
            })?;
        read_asset(&path).await.map_err(|e| OverlayError::AssetFetch {
            reference: reference.to_string(),
            reason: e.to_string(),
        })
    }
}

async fn read_asset(path: &Path) -> std::io::Result<Asset> {
    let bytes = tokio::fs::read(path).await?;
    let mime_type = data_url::guess_mime(&path.to_string_lossy()).to_string();
    log::trace!("read {} ({} bytes, {})", path.display(), bytes.len(), mime_type);
    Ok(Asset { mime_type, bytes })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_paths_and_file_urls() {
        let plain = FsFetcher::new();
        assert_eq!(
            plain.resolve("file:///tmp/a.png"),
            Some(PathBuf::from("/tmp/a.png"))
        );
        assert_eq!(plain.resolve("img/a.png?v=3"), Some(PathBuf::from("img/a.png")));
        assert_eq!(plain.resolve("https://example.com/a.png"), None);
        assert_eq!(plain.resolve("data:image/png;base64,AAA="), None);

        let rooted = FsFetcher::with_root("/srv/static");
        assert_eq!(
            rooted.resolve("/overlay/a.png"),
            Some(PathBuf::from("/srv/static/overlay/a.png"))
        );
    }

    #[tokio::test]
    async fn missing_file_is_fetch_error() {
        let fetcher = FsFetcher::with_root(std::env::temp_dir());
        let err = fetcher
            .fetch("definitely-not-here-7f3a.png")
            .await
            .unwrap_err();
        assert!(matches!(err, OverlayError::AssetFetch { .. }));
    }
}
