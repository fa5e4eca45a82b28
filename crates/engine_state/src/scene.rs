//! Scene Object Registry
//!
//! Thread-safe registry of editable scene objects indexed by object ID

use bevy_math::Vec3;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::pose::{Bounds, Pose};

/// Opaque handle to a scene object
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(pub u64);

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "object_{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct SceneObject {
    pub name: String,
    pub pose: Pose,
    /// Half-size of the object's box at unit scale
    pub extents: Vec3,
    /// Locked objects resolve to no selection candidate
    pub locked: bool,
}

impl SceneObject {
    pub fn new(name: impl Into<String>, pose: Pose) -> Self {
        Self {
            name: name.into(),
            pose,
            extents: Vec3::splat(0.5),
            locked: false,
        }
    }

    pub fn with_extents(mut self, extents: Vec3) -> Self {
        self.extents = extents;
        self
    }

    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }

    pub fn world_bounds(&self) -> Bounds {
        Bounds::from_oriented_box(&self.pose, self.extents)
    }
}

#[derive(Clone)]
pub struct SceneGraph {
    objects: Arc<DashMap<ObjectId, SceneObject>>,
    next_id: Arc<AtomicU64>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self {
            objects: Arc::new(DashMap::new()),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Register an object and return its freshly allocated ID
    pub fn spawn(&self, object: SceneObject) -> ObjectId {
        let id = ObjectId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.objects.insert(id, object);
        id
    }

    pub fn remove(&self, id: ObjectId) -> Option<SceneObject> {
        self.objects.remove(&id).map(|(_, v)| v)
    }

    pub fn get(&self, id: ObjectId) -> Option<SceneObject> {
        self.objects.get(&id).map(|v| v.clone())
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    pub fn pose(&self, id: ObjectId) -> Option<Pose> {
        self.objects.get(&id).map(|v| v.pose)
    }

    /// Overwrite an object's pose. Unknown IDs are ignored.
    pub fn set_pose(&self, id: ObjectId, pose: Pose) {
        if let Some(mut object) = self.objects.get_mut(&id) {
            object.pose = pose;
        }
    }

    pub fn is_locked(&self, id: ObjectId) -> bool {
        self.objects.get(&id).is_some_and(|v| v.locked)
    }

    pub fn set_locked(&self, id: ObjectId, locked: bool) {
        if let Some(mut object) = self.objects.get_mut(&id) {
            object.locked = locked;
        }
    }

    pub fn world_bounds(&self, id: ObjectId) -> Option<Bounds> {
        self.objects.get(&id).map(|v| v.world_bounds())
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}
