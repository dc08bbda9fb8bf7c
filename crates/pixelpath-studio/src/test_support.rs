//! Scripted collaborators for studio tests.

use crate::collaborator::{
    BoxError, Collaborators, ImageEditor, ThumbnailRenderer, TitleGenerator, Upload, UploadIngestor,
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Titles are `"Title: <prompt>"`; fails when told to.
#[derive(Default)]
pub struct FakeTitles {
    pub fail: AtomicBool,
}

#[async_trait]
impl TitleGenerator for FakeTitles {
    async fn generate_title(&self, prompt: &str) -> Result<String, BoxError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err("title service unavailable".into());
        }
        Ok(format!("Title: {prompt}"))
    }
}

/// Produces `"<base>|<prompt>"` and records every call. When `gate` is set,
/// each call waits for a permit before returning.
#[derive(Default)]
pub struct FakeEditor {
    pub fail: AtomicBool,
    pub calls: Mutex<Vec<(String, String)>>,
    pub gate: Option<Arc<Notify>>,
}

#[async_trait]
impl ImageEditor for FakeEditor {
    async fn edit_image(&self, base_image: &str, prompt: &str) -> Result<String, BoxError> {
        self.calls
            .lock()
            .unwrap()
            .push((base_image.to_string(), prompt.to_string()));
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err("edit rejected".into());
        }
        Ok(format!("{base_image}|{prompt}"))
    }
}

#[derive(Default)]
pub struct FakeThumbnails {
    pub fail: AtomicBool,
}

#[async_trait]
impl ThumbnailRenderer for FakeThumbnails {
    async fn derive_thumbnail(&self, image: &str, max_size: u32) -> Result<String, BoxError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err("cannot decode image".into());
        }
        Ok(format!("thumb{max_size}({image})"))
    }
}

#[derive(Default)]
pub struct FakeIngestor {
    pub fail: AtomicBool,
}

#[async_trait]
impl UploadIngestor for FakeIngestor {
    async fn ingest_upload(&self, upload: &Upload) -> Result<String, BoxError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err("unsupported file".into());
        }
        Ok(format!("data:{};{}", upload.mime_type, String::from_utf8_lossy(&upload.bytes)))
    }
}

/// Handles to every fake, so tests can flip failures and inspect calls.
pub struct Fakes {
    pub titles: Arc<FakeTitles>,
    pub editor: Arc<FakeEditor>,
    pub thumbnails: Arc<FakeThumbnails>,
    pub ingestor: Arc<FakeIngestor>,
}

impl Fakes {
    pub fn new() -> Self {
        Self::with_editor(FakeEditor::default())
    }

    pub fn with_editor(editor: FakeEditor) -> Self {
        Self {
            titles: Arc::new(FakeTitles::default()),
            editor: Arc::new(editor),
            thumbnails: Arc::new(FakeThumbnails::default()),
            ingestor: Arc::new(FakeIngestor::default()),
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            titles: self.titles.clone(),
            editor: self.editor.clone(),
            thumbnails: self.thumbnails.clone(),
            ingestor: self.ingestor.clone(),
        }
    }

    pub fn editor_calls(&self) -> Vec<(String, String)> {
        self.editor.calls.lock().unwrap().clone()
    }
}
