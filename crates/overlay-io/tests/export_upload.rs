//! Integration tests: export with image embedding, upload, save and the
//! host-facing session API.

use overlay_core::data_url;
use overlay_core::{NodeKind, OverlayError, Result, Size};
use overlay_editor::{EditorConfig, OverlayEditor};
use overlay_io::export::{self, prepare};
use overlay_io::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;

// ─── Fakes ──────────────────────────────────────────────────────────────

/// Serves a fixed set of references; everything else is unreachable.
#[derive(Default)]
struct MapFetcher {
    assets: HashMap<String, Asset>,
    requests: RefCell<Vec<String>>,
}

impl MapFetcher {
    fn with(mut self, reference: &str, mime_type: &str, bytes: &[u8]) -> Self {
        self.assets.insert(
            reference.to_string(),
            Asset {
                mime_type: mime_type.to_string(),
                bytes: bytes.to_vec(),
            },
        );
        self
    }
}

impl AssetFetcher for MapFetcher {
    async fn fetch(&self, reference: &str) -> Result<Asset> {
        self.requests.borrow_mut().push(reference.to_string());
        tokio::task::yield_now().await;
        self.assets
            .get(reference)
            .cloned()
            .ok_or_else(|| OverlayError::AssetFetch {
                reference: reference.to_string(),
                reason: "404".to_string(),
            })
    }
}

/// Records uploads and answers with a canned response.
struct FakeStore {
    response: UploadResponse,
    uploads: RefCell<Vec<(String, String, Vec<u8>)>>,
}

impl FakeStore {
    fn answering(status: u16, body: &str) -> Self {
        Self {
            response: UploadResponse {
                status,
                body: body.to_string(),
            },
            uploads: RefCell::new(Vec::new()),
        }
    }
}

impl TemplateStore for FakeStore {
    async fn upload(&self, field: &str, filename: &str, bytes: Vec<u8>) -> Result<UploadResponse> {
        self.uploads
            .borrow_mut()
            .push((field.to_string(), filename.to_string(), bytes));
        Ok(self.response.clone())
    }
}

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn editor() -> OverlayEditor {
    init_logs();
    OverlayEditor::new(EditorConfig::default().with_stage(800.0, 600.0))
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("overlay-io-{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn image_srcs(document: &overlay_core::OverlayDocument) -> Vec<String> {
    document
        .nodes
        .iter()
        .flatten()
        .filter_map(|r| r.src.clone())
        .collect()
}

// ─── Embedding ──────────────────────────────────────────────────────────

#[tokio::test]
async fn export_embeds_reachable_images_and_keeps_the_rest() {
    let mut ed = editor();
    ed.add_image("/static/logo.png", None);
    ed.add_image("https://cdn.example.com/missing.png", None);
    ed.add_image("data:image/gif;base64,R0lG", None);
    ed.add_text();

    let fetcher = MapFetcher::default().with("/static/logo.png", "image/png", &[1, 2, 3]);
    let document = export_document(&ed, &fetcher).await;

    assert_eq!(
        image_srcs(&document),
        vec![
            data_url::encode("image/png", &[1, 2, 3]),
            "https://cdn.example.com/missing.png".to_string(),
            "data:image/gif;base64,R0lG".to_string(),
        ]
    );
    // Already-embedded payloads are never fetched
    assert_eq!(
        *fetcher.requests.borrow(),
        vec![
            "/static/logo.png".to_string(),
            "https://cdn.example.com/missing.png".to_string()
        ]
    );
    assert_eq!(document.nodes.as_ref().map(Vec::len), Some(4));
    assert!(document.exported_at.is_some());
}

#[tokio::test]
async fn embed_report_counts() {
    let mut ed = editor();
    ed.set_base_image(Some("bg.jpg".into()));
    ed.add_image("a.png", None);
    ed.add_image("b.png", None);

    let fetcher = MapFetcher::default()
        .with("bg.jpg", "image/jpeg", &[9])
        .with("a.png", "image/png", &[7]);
    let mut document = prepare(&ed);
    let report = embed_images(&mut document, &fetcher).await;

    assert_eq!(
        report,
        EmbedReport {
            embedded: 2,
            retained: 1
        }
    );
    assert_eq!(document.image, Some(data_url::encode("image/jpeg", &[9])));
}

#[tokio::test]
async fn snapshot_is_isolated_from_later_edits() {
    let mut ed = editor();
    ed.add_image("a.png", None);
    ed.add_text();

    let mut document = prepare(&ed);
    // Edits land while the export is suspended on fetches
    ed.delete_selected();
    ed.add_image("late.png", Some(Size::new(10.0, 10.0)));
    ed.clear_nodes();

    let fetcher = MapFetcher::default().with("a.png", "image/png", &[5]);
    embed_images(&mut document, &fetcher).await;

    let nodes = document.nodes.unwrap();
    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[0].src, Some(data_url::encode("image/png", &[5])));
    assert_eq!(nodes[1].text.as_deref(), Some("Double-click to edit"));
}

#[tokio::test]
async fn embedded_export_round_trips_by_bytes() {
    let mut ed = editor();
    ed.add_image("photo.webp", Some(Size::new(64.0, 48.0)));
    let fetcher = MapFetcher::default().with("photo.webp", "image/webp", b"RIFF....WEBP");
    let json = export_document(&ed, &fetcher)
        .await
        .to_json_pretty()
        .unwrap();

    let mut restored = editor();
    restored.import_json(&json).unwrap();
    let NodeKind::Image { source, .. } = &restored.nodes()[0].kind else {
        panic!("expected image");
    };
    assert_eq!(data_url::decode(source).unwrap().bytes, b"RIFF....WEBP".to_vec());
    assert_eq!(
        restored.bounds(restored.nodes()[0].id).unwrap().size(),
        Size::new(64.0, 48.0)
    );
}

// ─── Upload ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn upload_201_is_success() {
    let mut ed = editor();
    ed.add_text();
    let document = prepare(&ed);
    let store = FakeStore::answering(201, r#"{"message": "ok"}"#);

    let response = export::upload(&store, "template", "promo", &document, true)
        .await
        .unwrap();
    assert!(response.is_success());

    let uploads = store.uploads.borrow();
    let (field, filename, bytes) = &uploads[0];
    assert_eq!(field, "template");
    assert_eq!(filename, "promo.json");
    let value: serde_json::Value = serde_json::from_slice(bytes).unwrap();
    assert_eq!(value["nodes"][0]["type"], json!("text"));
}

#[tokio::test]
async fn upload_failure_surfaces_body_and_keeps_state() {
    let mut ed = editor();
    ed.add_text();
    let before = ed.snapshot();
    let session = OverlaySession::new(
        ed,
        MapFetcher::default(),
        FakeStore::answering(413, "payload too large"),
    );

    let err = session.upload().await.unwrap_err();
    match err {
        OverlayError::UploadRejected { status, body } => {
            assert_eq!(status, 413);
            assert_eq!(body, "payload too large");
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(session.editor.snapshot(), before);
    assert_eq!(session.store().uploads.borrow().len(), 1);
}

#[tokio::test]
async fn directory_store_mirrors_endpoint() {
    let dir = scratch_dir("store");
    let store = DirectoryStore::new(&dir);

    let ok = store
        .upload("template", "a.json", b"{}".to_vec())
        .await
        .unwrap();
    assert_eq!(ok.status, 201);
    assert_eq!(std::fs::read(dir.join("a.json")).unwrap(), b"{}".to_vec());

    let missing = store.upload("file", "a.json", Vec::new()).await.unwrap();
    assert_eq!(missing.status, 400);
    let sneaky = store
        .upload("template", "../a.json", Vec::new())
        .await
        .unwrap();
    assert_eq!(sneaky.status, 400);
}

// ─── Session API ────────────────────────────────────────────────────────

#[tokio::test]
async fn serialize_then_import_object() {
    let mut ed = editor();
    ed.add_text();
    ed.add_image("logo.png", None);
    let session = OverlaySession::new(
        ed,
        MapFetcher::default().with("logo.png", "image/png", &[0, 0]),
        FakeStore::answering(201, ""),
    );

    let value = session.serialize().await.unwrap();
    assert!(value["exportedAt"].is_string());
    assert_eq!(value["image"], serde_json::Value::Null);
    assert_eq!(value["nodes"][1]["src"], json!("data:image/png;base64,AAA="));

    let mut other = OverlaySession::new(editor(), MapFetcher::default(), FakeStore::answering(201, ""));
    assert_eq!(other.import_object(&value).unwrap(), 2);
    assert_eq!(
        other.editor.snapshot().nodes,
        session.editor.snapshot().nodes.map(|mut nodes| {
            nodes[1].src = Some("data:image/png;base64,AAA=".into());
            nodes
        })
    );
}

#[tokio::test]
async fn image_file_sets_base_image_and_filename() {
    let mut session = OverlaySession::new(editor(), MapFetcher::default(), FakeStore::answering(201, ""));
    let imported = session
        .import_file("beach-2024.PNG", Some("image/png"), &[0x89, b'P'])
        .unwrap();
    assert_eq!(
        imported,
        Imported::BaseImage {
            suggested_filename: "beach-2024.json".into()
        }
    );
    assert_eq!(session.filename(), "beach-2024.json");
    assert_eq!(
        session.editor.base_image(),
        Some(data_url::encode("image/png", &[0x89, b'P']).as_str())
    );

    // An explicit filename wins, with the suffix enforced
    session.options.filename = Some("final".into());
    assert_eq!(session.filename(), "final.json");
}

#[tokio::test]
async fn bad_files_leave_editor_untouched() {
    let mut ed = editor();
    ed.add_text();
    let mut session = OverlaySession::new(ed, MapFetcher::default(), FakeStore::answering(201, ""));
    let before = session.editor.snapshot();

    let err = session
        .import_file("broken.json", Some("application/json"), b"{not json")
        .unwrap_err();
    assert!(matches!(err, OverlayError::MalformedJson(_)));

    let err = session
        .import_file("notes.txt", Some("text/plain"), b"hello")
        .unwrap_err();
    assert!(matches!(err, OverlayError::UnsupportedFile { .. }));

    assert_eq!(session.editor.snapshot(), before);
}

#[tokio::test]
async fn json_file_replaces_nodes() {
    let mut session = OverlaySession::new(editor(), MapFetcher::default(), FakeStore::answering(201, ""));
    session.editor.add_text();
    let doc = json!({
        "name": "Menu board",
        "nodes": [
            { "type": "text", "left": "50%", "top": "10%", "text": "Today" },
            { "type": "image", "src": "dish.png", "zIndex": 4 }
        ]
    });
    let bytes = serde_json::to_vec(&doc).unwrap();
    let imported = session.import_file("menu.json", None, &bytes).unwrap();
    assert_eq!(imported, Imported::Nodes { count: 2 });
    assert_eq!(session.filename(), "Menu board.json");

    let nodes = session.editor.nodes();
    assert_eq!(nodes[0].origin, overlay_core::Point::new(400.0, 60.0));
    assert_eq!(nodes[1].z_index, 4);
}

#[tokio::test]
async fn save_writes_pretty_json() {
    let dir = scratch_dir("save");
    let mut ed = editor();
    ed.set_name(Some("Door sign".into()));
    ed.add_text();
    let session = OverlaySession::new(ed, MapFetcher::default(), FakeStore::answering(201, ""));

    let path = session.save(&dir).await.unwrap();
    assert_eq!(path, dir.join("Door sign.json"));
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("\n  \"nodes\": ["), "{text}");

    let mut restored = editor();
    restored.import_json(&text).unwrap();
    assert_eq!(restored.name(), Some("Door sign"));
    assert_eq!(restored.nodes().len(), 1);
}
