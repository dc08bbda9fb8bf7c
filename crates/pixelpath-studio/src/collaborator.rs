//! Contracts for the external capabilities a studio drives.
//!
//! The studio never edits pixels or decodes files itself. It sequences these
//! calls and records the results; any failure aborts the enclosing operation.

use async_trait::async_trait;
use std::sync::Arc;

/// Error type collaborators report. Only its message is surfaced.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Raw bytes of a user-supplied image file.
#[derive(Debug, Clone)]
pub struct Upload {
    pub bytes: Vec<u8>,
    /// MIME type as reported by the source (e.g. `"image/png"`).
    pub mime_type: String,
}

impl Upload {
    pub fn new(bytes: impl Into<Vec<u8>>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            mime_type: mime_type.into(),
        }
    }
}

/// Derives a short commit title from an instruction.
#[async_trait]
pub trait TitleGenerator: Send + Sync {
    async fn generate_title(&self, prompt: &str) -> Result<String, BoxError>;
}

/// Produces a new image from a base image and an instruction.
#[async_trait]
pub trait ImageEditor: Send + Sync {
    async fn edit_image(&self, base_image: &str, prompt: &str) -> Result<String, BoxError>;
}

/// Produces a small preview of an image, fitting within `max_size` pixels on
/// its longer side.
#[async_trait]
pub trait ThumbnailRenderer: Send + Sync {
    async fn derive_thumbnail(&self, image: &str, max_size: u32) -> Result<String, BoxError>;
}

/// Turns an uploaded file into a display-ready image payload.
#[async_trait]
pub trait UploadIngestor: Send + Sync {
    async fn ingest_upload(&self, upload: &Upload) -> Result<String, BoxError>;
}

/// The full set of collaborators a [`Studio`](crate::Studio) needs.
#[derive(Clone)]
pub struct Collaborators {
    pub titles: Arc<dyn TitleGenerator>,
    pub editor: Arc<dyn ImageEditor>,
    pub thumbnails: Arc<dyn ThumbnailRenderer>,
    pub ingestor: Arc<dyn UploadIngestor>,
}
