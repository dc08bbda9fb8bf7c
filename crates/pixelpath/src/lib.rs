#![doc = include_str!("../README.md")]

mod error;
mod query;
mod selection;
mod store;
mod types;

pub mod v1 {
    //! Versioned public API for pixelpath types and queries.
    //!
    //! # Data
    //!
    //! - [`Commit`]: one image state, its instruction, and its parent links
    //! - [`CommitId`]: opaque commit identifier (UUID v4 when generated)
    //!
    //! # State
    //!
    //! - [`CommitGraph`]: append-only store that maintains child backlinks
    //! - [`MergeSelection`]: two-slot rolling selection of merge parents
    //! - [`merge_base`]: which merge parent supplies the base image
    //!
    //! # Errors
    //!
    //! - [`GraphError`]: why an insertion was refused

    /// Traversal and query functions over a [`CommitGraph`].
    ///
    /// [`render_order`](query::render_order) produces the display order used
    /// by presenters: depth-first from the root, each commit exactly once.
    pub mod query {
        pub use crate::query::{
            RenderEntry, ancestors, heads, merges, render_order, render_order_with,
        };
    }
    pub use crate::error::{GraphError, Result};
    pub use crate::selection::{MergeSelection, merge_base};
    pub use crate::store::CommitGraph;
    pub use crate::types::{Commit, CommitId};
}
