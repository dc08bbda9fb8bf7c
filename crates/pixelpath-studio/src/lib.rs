#![doc = include_str!("../README.md")]

mod clock;
mod collaborator;
mod config;
mod error;
mod notice;
mod snapshot;
mod studio;
mod workspace;

#[cfg(test)]
mod test_support;

pub use clock::{Clock, ManualClock, SystemClock};
pub use collaborator::{
    BoxError, Collaborators, ImageEditor, ThumbnailRenderer, TitleGenerator, Upload, UploadIngestor,
};
pub use config::StudioConfig;
pub use error::{Result, Stage, StudioError};
pub use notice::Notice;
pub use snapshot::{Comparison, Snapshot, Status};
pub use studio::{Outcome, SkipReason, Studio, merge_instruction};
