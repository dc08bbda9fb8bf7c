use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

// ============================================================================
// CommitId
// ============================================================================

/// Opaque identifier of a [`Commit`].
///
/// Freshly generated ids are version-4 UUIDs. No ordering is implied by id
/// values; the `Ord` impl exists only so ids can live in sorted collections.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommitId(String);

impl CommitId {
    /// Wrap an existing id string without validation.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh, collision-resistant id.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The first `len` characters, for compact labels.
    pub fn short(&self, len: usize) -> &str {
        match self.0.char_indices().nth(len) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CommitId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for CommitId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Borrow<str> for CommitId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for CommitId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for CommitId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

// ============================================================================
// Commit
// ============================================================================

/// One image state plus the provenance that produced it.
///
/// A commit is immutable once it has been inserted into a
/// [`CommitGraph`](crate::store::CommitGraph). The single exception is
/// `children_ids`, which only the graph appends to as later commits name this
/// one as a parent. That field is therefore read through
/// [`Commit::children_ids`] and cannot be set by callers.
///
/// Parent count encodes the kind of commit:
///
/// | parents | meaning                          |
/// |---------|----------------------------------|
/// | 0       | root (the uploaded image)        |
/// | 1       | edit, branch, or revert          |
/// | 2       | merge, in selection order        |
///
/// # Builder API
///
/// ```
/// use pixelpath::v1::{Commit, CommitId};
/// use chrono::Utc;
///
/// let commit = Commit::new(CommitId::generate(), Utc::now())
///     .with_parent("root")
///     .with_title("Add hat")
///     .with_prompt("add a red hat")
///     .with_images("data:image/png;base64,AAAA", "data:image/jpeg;base64,BBBB");
///
/// assert_eq!(commit.parent_ids.len(), 1);
/// assert!(commit.children_ids().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commit {
    pub id: CommitId,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parent_ids: Vec<CommitId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) children_ids: Vec<CommitId>,
    pub title: String,
    pub prompt: String,
    pub image_data_url: String,
    pub thumbnail_data_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_name: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl Commit {
    /// Create a commit with no parents and empty content.
    pub fn new(id: impl Into<CommitId>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            parent_ids: Vec::new(),
            children_ids: Vec::new(),
            title: String::new(),
            prompt: String::new(),
            image_data_url: String::new(),
            thumbnail_data_url: String::new(),
            branch_name: None,
            timestamp,
        }
    }

    /// Add a parent reference
    pub fn with_parent(mut self, parent: impl Into<CommitId>) -> Self {
        self.parent_ids.push(parent.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Set the full image and its preview together.
    pub fn with_images(mut self, image: impl Into<String>, thumbnail: impl Into<String>) -> Self {
        self.image_data_url = image.into();
        self.thumbnail_data_url = thumbnail.into();
        self
    }

    pub fn with_branch_name(mut self, name: impl Into<String>) -> Self {
        self.branch_name = Some(name.into());
        self
    }

    /// Commits that named this one as a parent, in insertion order.
    pub fn children_ids(&self) -> &[CommitId] {
        &self.children_ids
    }

    pub fn is_root(&self) -> bool {
        self.parent_ids.is_empty()
    }

    pub fn is_merge(&self) -> bool {
        self.parent_ids.len() == 2
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
