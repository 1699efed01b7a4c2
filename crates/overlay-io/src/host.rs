//! The editor as seen by the rest of the application.
//!
//! A template panel only ever needs `serialize()` and `import_object()`;
//! the toolbar additionally drives file import, save and upload.

use crate::export::{self, EmbedReport, ExportOptions};
use crate::fetch::AssetFetcher;
use crate::import::{self, Imported};
use crate::store::{TemplateStore, UploadResponse};
use overlay_core::{OverlayDocument, Result};
use overlay_editor::OverlayEditor;
use serde_json::Value;
use std::path::{Path, PathBuf};

pub struct OverlaySession<F, S> {
    pub editor: OverlayEditor,
    pub options: ExportOptions,
    fetcher: F,
    store: S,
    /// Derived from the last imported base image file.
    suggested_filename: Option<String>,
}

impl<F: AssetFetcher, S: TemplateStore> OverlaySession<F, S> {
    pub fn new(editor: OverlayEditor, fetcher: F, store: S) -> Self {
        Self {
            editor,
            options: ExportOptions::default(),
            fetcher,
            store,
            suggested_filename: None,
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Current state as a self-contained document value.
    pub async fn serialize(&self) -> Result<Value> {
        let (document, _) = self.export().await;
        document.to_value()
    }

    /// Replace the editor state from a document value.
    pub fn import_object(&mut self, value: &Value) -> Result<usize> {
        self.editor.import_value(value)
    }

    pub fn import_file(
        &mut self,
        name: &str,
        content_type: Option<&str>,
        bytes: &[u8],
    ) -> Result<Imported> {
        let imported = import::import_file(&mut self.editor, name, content_type, bytes)?;
        if let Imported::BaseImage { suggested_filename } = &imported {
            self.suggested_filename = Some(suggested_filename.clone());
        }
        Ok(imported)
    }

    /// The filename the next save or upload uses.
    pub fn filename(&self) -> String {
        let fallback = self
            .editor
            .name()
            .or(self.suggested_filename.as_deref());
        export::resolve_filename(self.options.filename.as_deref(), fallback)
    }

    async fn export(&self) -> (OverlayDocument, EmbedReport) {
        let mut document = export::prepare(&self.editor);
        let report = export::embed_images(&mut document, &self.fetcher).await;
        (document, report)
    }

    /// Export into `dir` under the resolved filename.
    pub async fn save(&self, dir: &Path) -> Result<PathBuf> {
        let filename = self.filename();
        let (document, _) = self.export().await;
        export::save_local(dir, &filename, &document, self.options.pretty).await
    }

    /// Export and upload under the resolved filename.
    pub async fn upload(&self) -> Result<UploadResponse> {
        let filename = self.filename();
        let (document, _) = self.export().await;
        export::upload(
            &self.store,
            &self.options.field,
            &filename,
            &document,
            self.options.pretty,
        )
        .await
    }
}
