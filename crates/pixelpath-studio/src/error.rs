use crate::collaborator::BoxError;
use pixelpath::v1::GraphError;
use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StudioError>;

/// The point an operation had reached when it suspended or failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Stage {
    IngestingUpload,
    GeneratingTitle,
    EditingImage,
    RenderingThumbnail,
}

impl Stage {
    /// Progress text for presenters while this stage is pending.
    pub fn message(&self) -> &'static str {
        match self {
            Stage::IngestingUpload => "Preparing initial image...",
            Stage::GeneratingTitle => "Generating commit title...",
            Stage::EditingImage => "Applying visual changes...",
            Stage::RenderingThumbnail => "Creating thumbnail...",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::IngestingUpload => write!(f, "upload ingestion"),
            Stage::GeneratingTitle => write!(f, "title generation"),
            Stage::EditingImage => write!(f, "image edit"),
            Stage::RenderingThumbnail => write!(f, "thumbnail rendering"),
        }
    }
}

/// Errors from studio operations.
#[derive(Debug, Error)]
pub enum StudioError {
    /// An external collaborator failed; the operation was abandoned.
    #[error("{stage} failed: {source}")]
    Collaborator {
        stage: Stage,
        #[source]
        source: BoxError,
    },

    #[error("commit graph rejected insert: {0}")]
    Graph(#[from] GraphError),
}

impl StudioError {
    pub(crate) fn collaborator(stage: Stage) -> impl FnOnce(BoxError) -> Self {
        move |source| StudioError::Collaborator { stage, source }
    }

    /// Text suitable for a transient user-facing notice.
    pub fn user_message(&self) -> String {
        match self {
            StudioError::Collaborator {
                stage: Stage::IngestingUpload,
                ..
            } => "Failed to load image. Please try another one.".to_string(),
            StudioError::Collaborator { source, .. } => {
                let text = source.to_string();
                if text.trim().is_empty() {
                    "An unknown error occurred during commit.".to_string()
                } else {
                    text
                }
            }
            StudioError::Graph(e) => e.to_string(),
        }
    }
}
