//! Editor State Management
//!
//! Centralized state shared between the XR editing tools of the Pulsar Engine.
//! Provides thread-safe storage for:
//! - Scene objects (poses, bounds, locking)
//! - The editor selection
//! - The undo journal
//! - Pose math shared by every manipulation tool

pub mod pose;
mod scene;
mod selection;
mod undo;

pub use pose::{Bounds, Pose};
pub use scene::{ObjectId, SceneGraph, SceneObject};
pub use selection::Selection;
pub use undo::UndoJournal;

use parking_lot::RwLock;
use std::sync::Arc;

/// Global editor state
#[derive(Clone)]
pub struct EditorState {
    inner: Arc<RwLock<EditorStateInner>>,
}

struct EditorStateInner {
    scene: SceneGraph,
    selection: Selection,
    undo: UndoJournal,
}

impl EditorState {
    /// Create new editor state
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(EditorStateInner {
                scene: SceneGraph::new(),
                selection: Selection::new(),
                undo: UndoJournal::new(),
            })),
        }
    }

    /// Get scene registry
    pub fn scene(&self) -> SceneGraph {
        self.inner.read().scene.clone()
    }

    /// Spawn a scene object (convenience method)
    pub fn spawn(&self, object: SceneObject) -> ObjectId {
        self.scene().spawn(object)
    }

    pub fn pose(&self, id: ObjectId) -> Option<Pose> {
        self.scene().pose(id)
    }

    pub fn set_pose(&self, id: ObjectId, pose: Pose) {
        self.scene().set_pose(id, pose);
    }

    /// Snapshot of the current selection
    pub fn selection(&self) -> Selection {
        self.inner.read().selection.clone()
    }

    pub fn selection_generation(&self) -> u64 {
        self.inner.read().selection.generation()
    }

    /// Replace the selection. Missing objects are filtered out.
    pub fn select(&self, objects: impl IntoIterator<Item = ObjectId>, active: Option<ObjectId>) {
        let mut inner = self.inner.write();
        let scene = inner.scene.clone();
        inner
            .selection
            .set(objects.into_iter().filter(|id| scene.contains(*id)), active);
        tracing::debug!(count = inner.selection.len(), "Selection changed");
    }

    pub fn clear_selection(&self) {
        self.inner.write().selection.clear();
    }

    /// Union of the world bounds of every selected object
    pub fn selection_bounds(&self) -> Option<Bounds> {
        let inner = self.inner.read();
        let mut bounds: Option<Bounds> = None;
        for id in inner.selection.objects() {
            let Some(object_bounds) = inner.scene.world_bounds(*id) else {
                continue;
            };
            bounds = Some(match bounds {
                Some(mut b) => {
                    b.encapsulate(&object_bounds);
                    b
                }
                None => object_bounds,
            });
        }
        bounds
    }

    /// Open a new undo checkpoint
    pub fn increment_undo_group(&self) -> u64 {
        self.inner.write().undo.increment_group()
    }

    /// Record pre-mutation poses into the current undo checkpoint
    pub fn record_undo(&self, objects: &[ObjectId], label: &str) {
        let mut inner = self.inner.write();
        let scene = inner.scene.clone();
        inner.undo.record(&scene, objects, label);
    }

    /// Roll back the latest checkpoint
    pub fn perform_undo(&self) -> bool {
        let mut inner = self.inner.write();
        let scene = inner.scene.clone();
        inner.undo.perform_undo(&scene)
    }

    pub fn undo_depth(&self) -> usize {
        self.inner.read().undo.depth()
    }

    /// Set global instance
    pub fn set_global(self) {
        GLOBAL_STATE.set(self).ok();
    }

    /// Get global instance
    pub fn global() -> Option<&'static Self> {
        GLOBAL_STATE.get()
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new()
    }
}

use std::sync::OnceLock;
static GLOBAL_STATE: OnceLock<EditorState> = OnceLock::new();
