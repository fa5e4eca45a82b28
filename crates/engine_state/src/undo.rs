//! Undo Journal
//!
//! Pose snapshots grouped into checkpoints. Every mutation records the
//! pre-mutation pose of each touched object once per group; undo restores the
//! most recent group that recorded anything.

use crate::pose::Pose;
use crate::scene::{ObjectId, SceneGraph};

#[derive(Debug, Clone)]
struct UndoGroup {
    id: u64,
    label: String,
    snapshots: Vec<(ObjectId, Pose)>,
}

#[derive(Debug, Default)]
pub struct UndoJournal {
    groups: Vec<UndoGroup>,
    current_group: u64,
}

impl UndoJournal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new checkpoint. Later records land in the new group.
    pub fn increment_group(&mut self) -> u64 {
        self.current_group += 1;
        self.current_group
    }

    pub fn current_group(&self) -> u64 {
        self.current_group
    }

    /// Snapshot `objects` into the current group unless already captured there
    pub fn record(&mut self, scene: &SceneGraph, objects: &[ObjectId], label: &str) {
        if objects.is_empty() {
            return;
        }

        let current = self.current_group;
        if self.groups.last().map_or(true, |g| g.id != current) {
            self.groups.push(UndoGroup {
                id: current,
                label: label.to_string(),
                snapshots: Vec::new(),
            });
        }

        let Some(group) = self.groups.last_mut() else {
            return;
        };
        for &id in objects {
            if group.snapshots.iter().any(|(captured, _)| *captured == id) {
                continue;
            }
            if let Some(pose) = scene.pose(id) {
                group.snapshots.push((id, pose));
            }
        }
    }

    /// Restore the latest non-empty group. Returns false when there was nothing to undo.
    pub fn perform_undo(&mut self, scene: &SceneGraph) -> bool {
        while let Some(group) = self.groups.pop() {
            if group.snapshots.is_empty() {
                continue;
            }
            tracing::debug!(group = group.id, label = %group.label, objects = group.snapshots.len(), "Undo");
            for (id, pose) in group.snapshots {
                scene.set_pose(id, pose);
            }
            // Anything recorded after an undo starts a fresh group
            self.current_group += 1;
            return true;
        }
        false
    }

    pub fn depth(&self) -> usize {
        self.groups.iter().filter(|g| !g.snapshots.is_empty()).count()
    }
}
