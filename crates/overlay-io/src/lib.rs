pub mod export;
pub mod fetch;
pub mod host;
pub mod import;
pub mod store;

pub use export::{EmbedReport, ExportOptions, embed_images, export_document, resolve_filename};
pub use fetch::{Asset, AssetFetcher, FsFetcher};
pub use host::OverlaySession;
pub use import::{FileKind, Imported, classify, import_file};
pub use store::{DirectoryStore, TemplateStore, UploadResponse};
