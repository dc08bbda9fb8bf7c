//! Single-flight orchestration of image edits over a commit graph.
//!
//! A [`Studio`] is either idle or running exactly one operation. An operation
//! suspends at each collaborator call ([`Stage`]) and resumes when it
//! completes; only then is the new commit built, inserted, and made current.
//! Requests arriving while an operation runs are skipped, not queued.
//!
//! Selection changes (`select_current`, `toggle_merge_selection`) are
//! synchronous and allowed at any time, including mid-operation.

use crate::clock::{Clock, SystemClock};
use crate::collaborator::{Collaborators, Upload};
use crate::config::StudioConfig;
use crate::error::{Result, Stage, StudioError};
use crate::notice::Notice;
use crate::snapshot::{Snapshot, Status};
use crate::workspace::Workspace;
use pixelpath::v1::{Commit, CommitId, merge_base};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, instrument, warn};

// ============================================================================
// Outcomes
// ============================================================================

/// What a request did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A commit was inserted and is now current.
    Created(CommitId),
    /// The request was not admitted; nothing changed.
    Skipped(SkipReason),
}

impl Outcome {
    pub fn created(&self) -> Option<&CommitId> {
        match self {
            Outcome::Created(id) => Some(id),
            Outcome::Skipped(_) => None,
        }
    }
}

/// Why a request was not admitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Another operation is running.
    Busy,
    /// Nothing has been uploaded yet, so there is no commit to build on.
    NoCurrentCommit,
    BlankPrompt,
    /// Merge requested without exactly two selected commits.
    MergeNotReady,
    UnknownCommit(CommitId),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Busy => write!(f, "another operation is running"),
            SkipReason::NoCurrentCommit => write!(f, "no current commit"),
            SkipReason::BlankPrompt => write!(f, "prompt is blank"),
            SkipReason::MergeNotReady => write!(f, "merge needs exactly two selected commits"),
            SkipReason::UnknownCommit(id) => write!(f, "unknown commit {}", id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditKind {
    Commit,
    Branch,
    Merge,
}

/// Everything an edit needs, resolved from the workspace before the first
/// suspension point.
struct EditPlan {
    parent_ids: Vec<CommitId>,
    base_image: String,
    prompt: String,
    branch_name: Option<String>,
}

/// Collaborator results for one edit.
struct Produced {
    title: String,
    image: String,
    thumbnail: String,
}

// ============================================================================
// Studio
// ============================================================================

/// Owns a session's commit graph, pointers, and merge selection, and runs
/// edit operations against external collaborators one at a time.
pub struct Studio {
    collaborators: Collaborators,
    config: StudioConfig,
    clock: Arc<dyn Clock>,
    running: AtomicBool,
    workspace: Mutex<Workspace>,
}

/// Holds the running flag; releases it (and clears the stage) on drop.
struct RunGuard<'a> {
    studio: &'a Studio,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.studio.workspace().stage = None;
        self.studio.running.store(false, Ordering::Release);
    }
}

impl Studio {
    pub fn new(collaborators: Collaborators) -> Self {
        Self {
            collaborators,
            config: StudioConfig::default(),
            clock: Arc::new(SystemClock),
            running: AtomicBool::new(false),
            workspace: Mutex::new(Workspace::default()),
        }
    }

    pub fn with_config(mut self, config: StudioConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    // The lock is never held across an await, so a poisoned lock only means
    // a panic elsewhere mid-update; the graph itself is still consistent.
    fn workspace(&self) -> MutexGuard<'_, Workspace> {
        self.workspace.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn try_start(&self) -> Option<RunGuard<'_>> {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RunGuard { studio: self })
    }

    fn set_stage(&self, stage: Stage) {
        debug!(%stage, "awaiting collaborator");
        self.workspace().stage = Some(stage);
    }

    fn skip(&self, reason: SkipReason) -> Outcome {
        warn!(%reason, "request skipped");
        Outcome::Skipped(reason)
    }

    /// Record a user-visible notice for `err` and hand it back.
    fn fail(&self, err: StudioError) -> StudioError {
        warn!(error = %err, "operation failed");
        let notice = Notice::new(
            err.user_message(),
            self.clock.now(),
            self.config.notice_duration(),
        );
        self.workspace().notice = Some(notice);
        err
    }

    // ── Operations ─────────────────────────────────────────────────────

    /// Start a new session from an uploaded image.
    ///
    /// On success the previous graph, pointers, and selection are discarded
    /// and the new root becomes current. On failure the previous session is
    /// left as it was.
    #[instrument(skip(self, upload), fields(bytes = upload.bytes.len()))]
    pub async fn upload_root(&self, upload: Upload) -> Result<Outcome> {
        let Some(_run) = self.try_start() else {
            return Ok(self.skip(SkipReason::Busy));
        };

        self.set_stage(Stage::IngestingUpload);
        let prepared = async {
            let to_err = StudioError::collaborator;
            let image = self
                .collaborators
                .ingestor
                .ingest_upload(&upload)
                .await
                .map_err(to_err(Stage::IngestingUpload))?;
            let thumbnail = self
                .collaborators
                .thumbnails
                .derive_thumbnail(&image, self.config.thumbnail_size)
                .await
                .map_err(to_err(Stage::IngestingUpload))?;
            Ok::<_, StudioError>((image, thumbnail))
        }
        .await;
        let (image, thumbnail) = prepared.map_err(|e| self.fail(e))?;

        let root = Commit::new(CommitId::generate(), self.clock.now())
            .with_title(&self.config.root_title)
            .with_prompt(&self.config.root_prompt)
            .with_images(image, thumbnail);
        let reset = self.workspace().reset(root);
        let id = reset.map_err(|e| self.fail(e.into()))?;

        info!(root = %id, "started new session");
        Ok(Outcome::Created(id))
    }

    /// Edit the current commit's image and record the result as its child.
    #[instrument(skip(self))]
    pub async fn commit(&self, prompt: &str) -> Result<Outcome> {
        self.run_edit(EditKind::Commit, prompt).await
    }

    /// Like [`commit`](Self::commit), but labels the new commit as a branch
    /// of its parent.
    #[instrument(skip(self))]
    pub async fn branch(&self, prompt: &str) -> Result<Outcome> {
        self.run_edit(EditKind::Branch, prompt).await
    }

    /// Combine the two selected commits.
    ///
    /// The later of the two (first-selected on a tie) supplies the base
    /// image. The new commit's parents are the selections in selection
    /// order, and the selection is cleared on success.
    #[instrument(skip(self))]
    pub async fn merge(&self, prompt: &str) -> Result<Outcome> {
        self.run_edit(EditKind::Merge, prompt).await
    }

    /// Record a new commit on top of the current one that restores the
    /// image of `target_id`. No collaborators are called.
    #[instrument(skip(self))]
    pub fn revert(&self, target_id: &str) -> Result<Outcome> {
        let Some(_run) = self.try_start() else {
            return Ok(self.skip(SkipReason::Busy));
        };

        let inserted = {
            let mut ws = self.workspace();
            let Some(current) = ws.current_id().cloned() else {
                return Ok(self.skip(SkipReason::NoCurrentCommit));
            };
            let Some(target) = ws.graph().get(target_id) else {
                return Ok(self.skip(SkipReason::UnknownCommit(target_id.into())));
            };
            let commit = Commit::new(CommitId::generate(), self.clock.now())
                .with_parent(current)
                .with_title(format!("Revert to: \"{}\"", target.title))
                .with_prompt(format!(
                    "Reverted to commit {}: \"{}\"",
                    target.id, target.prompt
                ))
                .with_images(
                    target.image_data_url.clone(),
                    target.thumbnail_data_url.clone(),
                );
            ws.append(commit)
        };
        let id = inserted.map_err(|e| self.fail(e.into()))?;

        info!(commit = %id, target = %target_id, "reverted");
        Ok(Outcome::Created(id))
    }

    /// Point the view at `id` and clear the merge selection. Returns false
    /// (and changes nothing) if `id` is unknown.
    pub fn select_current(&self, id: &str) -> bool {
        let selected = self.workspace().select_current(id);
        if !selected {
            warn!(commit = %id, "cannot select unknown commit");
        }
        selected
    }

    /// Toggle `id` in the merge selection. Returns false if `id` is unknown.
    pub fn toggle_merge_selection(&self, id: &str) -> bool {
        self.workspace().toggle_selection(id)
    }

    pub fn dismiss_notice(&self) {
        self.workspace().notice = None;
    }

    /// Copy the current state for presentation.
    pub fn snapshot(&self) -> Snapshot {
        let now = self.clock.now();
        let running = self.is_running();
        let mut ws = self.workspace();
        if ws.notice.as_ref().is_some_and(|n| n.is_expired(now)) {
            ws.notice = None;
        }
        Snapshot {
            commits: ws.graph().clone(),
            root_id: ws.graph().root_id().cloned(),
            current_id: ws.current_id().cloned(),
            selection: ws.selection.clone(),
            status: if running {
                Status::Running { stage: ws.stage }
            } else {
                Status::Idle
            },
            notice: ws.notice.clone(),
        }
    }

    // ── Edit pipeline ──────────────────────────────────────────────────

    async fn run_edit(&self, kind: EditKind, prompt: &str) -> Result<Outcome> {
        if prompt.trim().is_empty() {
            return Ok(self.skip(SkipReason::BlankPrompt));
        }
        let Some(_run) = self.try_start() else {
            return Ok(self.skip(SkipReason::Busy));
        };

        let plan = match self.plan(kind, prompt) {
            Ok(plan) => plan,
            Err(reason) => return Ok(self.skip(reason)),
        };
        let produced = self.produce(&plan).await.map_err(|e| self.fail(e))?;

        let mut commit = Commit::new(CommitId::generate(), self.clock.now())
            .with_title(produced.title)
            .with_prompt(plan.prompt)
            .with_images(produced.image, produced.thumbnail);
        for parent in plan.parent_ids {
            commit = commit.with_parent(parent);
        }
        if let Some(name) = plan.branch_name {
            commit = commit.with_branch_name(name);
        }

        let inserted = {
            let mut ws = self.workspace();
            let result = ws.append(commit);
            if result.is_ok() && kind == EditKind::Merge {
                ws.selection.clear();
            }
            result
        };
        let id = inserted.map_err(|e| self.fail(e.into()))?;

        info!(commit = %id, ?kind, "created commit");
        Ok(Outcome::Created(id))
    }

    fn plan(&self, kind: EditKind, prompt: &str) -> std::result::Result<EditPlan, SkipReason> {
        let ws = self.workspace();
        let graph = ws.graph();

        if kind == EditKind::Merge {
            let (first_id, second_id) = ws.selection.pair().ok_or(SkipReason::MergeNotReady)?;
            let first = graph
                .get(first_id.as_str())
                .ok_or_else(|| SkipReason::UnknownCommit(first_id.clone()))?;
            let second = graph
                .get(second_id.as_str())
                .ok_or_else(|| SkipReason::UnknownCommit(second_id.clone()))?;
            let base = merge_base(first, second);
            return Ok(EditPlan {
                parent_ids: vec![first.id.clone(), second.id.clone()],
                base_image: base.image_data_url.clone(),
                prompt: merge_instruction(&first.title, &second.title, prompt),
                branch_name: None,
            });
        }

        let current_id = ws.current_id().ok_or(SkipReason::NoCurrentCommit)?;
        let parent = graph
            .get(current_id.as_str())
            .ok_or_else(|| SkipReason::UnknownCommit(current_id.clone()))?;
        let branch_name = (kind == EditKind::Branch).then(|| {
            format!(
                "Branch from {}",
                parent.id.short(self.config.branch_label_len)
            )
        });
        Ok(EditPlan {
            parent_ids: vec![parent.id.clone()],
            base_image: parent.image_data_url.clone(),
            prompt: prompt.to_string(),
            branch_name,
        })
    }

    async fn produce(&self, plan: &EditPlan) -> Result<Produced> {
        let to_err = StudioError::collaborator;

        self.set_stage(Stage::GeneratingTitle);
        let title = self
            .collaborators
            .titles
            .generate_title(&plan.prompt)
            .await
            .map_err(to_err(Stage::GeneratingTitle))?;

        self.set_stage(Stage::EditingImage);
        let image = self
            .collaborators
            .editor
            .edit_image(&plan.base_image, &plan.prompt)
            .await
            .map_err(to_err(Stage::EditingImage))?;

        self.set_stage(Stage::RenderingThumbnail);
        let thumbnail = self
            .collaborators
            .thumbnails
            .derive_thumbnail(&image, self.config.thumbnail_size)
            .await
            .map_err(to_err(Stage::RenderingThumbnail))?;

        Ok(Produced {
            title,
            image,
            thumbnail,
        })
    }
}

/// The instruction sent to the editor for a merge of `first` and `second`
/// (in selection order).
pub fn merge_instruction(first_title: &str, second_title: &str, prompt: &str) -> String {
    format!(
        "Merge the following changes into the base image. The desired outcome should \
         incorporate elements from the version titled \"{second_title}\" with elements from \
         the version titled \"{first_title}\". Specifically, apply this instruction: \"{prompt}\""
    )
}
