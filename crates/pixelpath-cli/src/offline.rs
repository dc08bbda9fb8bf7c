//! Collaborators that need no network: images pass through unchanged, and
//! titles are cut from the instruction text.

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use pixelpath_studio::{
    BoxError, Collaborators, ImageEditor, ThumbnailRenderer, TitleGenerator, Upload, UploadIngestor,
};
use std::path::Path;
use std::sync::Arc;

const TITLE_MAX_CHARS: usize = 40;

/// First line of the instruction, truncated.
pub struct PromptTitles;

#[async_trait]
impl TitleGenerator for PromptTitles {
    async fn generate_title(&self, prompt: &str) -> Result<String, BoxError> {
        let line = prompt.lines().map(str::trim).find(|l| !l.is_empty());
        let Some(line) = line else {
            return Err("cannot title an empty instruction".into());
        };
        if line.chars().count() > TITLE_MAX_CHARS {
            let truncated: String = line.chars().take(TITLE_MAX_CHARS).collect();
            Ok(format!("{}...", truncated))
        } else {
            Ok(line.to_string())
        }
    }
}

/// Returns the base image untouched.
pub struct IdentityEditor;

#[async_trait]
impl ImageEditor for IdentityEditor {
    async fn edit_image(&self, base_image: &str, _prompt: &str) -> Result<String, BoxError> {
        Ok(base_image.to_string())
    }
}

pub struct PassthroughThumbnails;

#[async_trait]
impl ThumbnailRenderer for PassthroughThumbnails {
    async fn derive_thumbnail(&self, image: &str, _max_size: u32) -> Result<String, BoxError> {
        Ok(image.to_string())
    }
}

/// Encodes uploads as base64 `data:` URLs. Only `image/*` types are accepted.
pub struct DataUrlIngestor;

#[async_trait]
impl UploadIngestor for DataUrlIngestor {
    async fn ingest_upload(&self, upload: &Upload) -> Result<String, BoxError> {
        if !upload.mime_type.starts_with("image/") {
            return Err(format!("unsupported file type {}", upload.mime_type).into());
        }
        if upload.bytes.is_empty() {
            return Err("file is empty".into());
        }
        Ok(format!(
            "data:{};base64,{}",
            upload.mime_type,
            STANDARD.encode(&upload.bytes)
        ))
    }
}

pub fn collaborators() -> Collaborators {
    Collaborators {
        titles: Arc::new(PromptTitles),
        editor: Arc::new(IdentityEditor),
        thumbnails: Arc::new(PassthroughThumbnails),
        ingestor: Arc::new(DataUrlIngestor),
    }
}

/// Guess an image MIME type from a file extension.
pub fn mime_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}
