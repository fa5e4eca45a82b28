//! Collaborator services
//!
//! The manipulation engine owns no scene data, input devices or UI. Everything
//! it reads or writes outside its own bookkeeping goes through these traits.
//! Optional collaborators come with default methods that behave like the
//! collaborator is absent.

use bevy_math::{Quat, Vec3};
use engine_state::{Bounds, EditorState, ObjectId, Pose};

use super::feedback::{FeedbackRequest, HapticPulse};
use super::manipulator::{AxisFlags, PivotMode};
use crate::subsystems::input::{Endpoint, RayOrigin};

/// A pointer touching an object this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectHover {
    pub ray_origin: RayOrigin,
    pub object: ObjectId,
}

pub trait DirectSelectionProvider {
    /// Every pointer currently touching an object
    fn direct_selection(&self) -> Vec<DirectHover>;
}

pub trait SelectionCandidateResolver {
    /// The object that should be treated as selected for `hovered`, or `None`
    /// when it may not be selected (locked, static)
    fn selection_candidate(&self, hovered: ObjectId) -> Option<ObjectId> {
        Some(hovered)
    }

    fn can_grab_object(&self, _object: ObjectId, _ray_origin: RayOrigin) -> bool {
        true
    }
}

/// Pointer poses and their owning hands
pub trait RayOriginProvider {
    fn ray_origin_pose(&self, ray_origin: RayOrigin) -> Option<Pose>;
    fn node_from_ray_origin(&self, ray_origin: RayOrigin) -> Endpoint;
    fn ray_origin_for(&self, endpoint: Endpoint) -> Option<RayOrigin>;
}

pub trait SelectionStore {
    fn selected_objects(&self) -> Vec<ObjectId>;
    fn active_object(&self) -> Option<ObjectId>;
    /// Changes whenever the selection changes
    fn selection_generation(&self) -> u64;
    fn object_pose(&self, object: ObjectId) -> Option<Pose>;
    fn set_object_pose(&mut self, object: ObjectId, pose: Pose);
    fn selection_bounds(&self) -> Option<Bounds>;
}

pub trait UndoLog {
    fn increment_current_group(&mut self);
    /// Snapshot `objects` before they are mutated
    fn record_objects(&mut self, objects: &[ObjectId], label: &str);
    /// Roll back the latest checkpoint; false when there is nothing to undo
    fn perform_undo(&mut self) -> bool;
}

pub trait SnapProvider {
    /// Snap a directly held object. `position`/`rotation` arrive as the
    /// object's current pose and are overwritten with the snapped pose when
    /// this returns true.
    fn direct_snap(
        &mut self,
        _ray_origin: RayOrigin,
        _object: ObjectId,
        _position: &mut Vec3,
        _rotation: &mut Quat,
        _target_position: Vec3,
        _target_rotation: Quat,
    ) -> bool {
        false
    }

    /// Apply a constrained manipulator translation to the pivot target.
    /// Returns true while a snap is engaged.
    #[allow(clippy::too_many_arguments)]
    fn manipulator_snap(
        &mut self,
        _ray_origin: RayOrigin,
        _objects: &[ObjectId],
        position: &mut Vec3,
        _rotation: &mut Quat,
        delta: Vec3,
        _constraints: AxisFlags,
        _pivot_mode: PivotMode,
    ) -> bool {
        *position += delta;
        false
    }

    fn clear_snapping_state(&mut self, _ray_origin: RayOrigin) {}
}

pub trait FeedbackSink {
    fn add_feedback_request(&mut self, request: &FeedbackRequest);
    fn remove_feedback_request(&mut self, request: &FeedbackRequest);

    fn pulse(&mut self, _endpoint: Endpoint, _pulse: &HapticPulse) {}
}

/// Ray interaction suppression while a pointer is busy with direct manipulation
pub trait RayVisibility {
    fn add_ray_visibility_settings(&mut self, ray_origin: RayOrigin, ray_visible: bool, cone_visible: bool);
    fn remove_ray_visibility_settings(&mut self, ray_origin: RayOrigin);

    fn is_cone_visible(&self, _ray_origin: RayOrigin) -> bool {
        true
    }
}

pub trait MenuVisibility {
    /// Whether the pointer is currently over transient menu UI
    fn is_main_menu_visible(&self, _ray_origin: RayOrigin) -> bool {
        false
    }
}

/// Everything the engine needs from its surroundings
pub trait ManipulationHost:
    DirectSelectionProvider
    + SelectionCandidateResolver
    + RayOriginProvider
    + SelectionStore
    + UndoLog
    + SnapProvider
    + FeedbackSink
    + RayVisibility
    + MenuVisibility
{
}

impl<T> ManipulationHost for T where
    T: DirectSelectionProvider
        + SelectionCandidateResolver
        + RayOriginProvider
        + SelectionStore
        + UndoLog
        + SnapProvider
        + FeedbackSink
        + RayVisibility
        + MenuVisibility
{
}

impl SelectionStore for EditorState {
    fn selected_objects(&self) -> Vec<ObjectId> {
        self.selection().objects().to_vec()
    }

    fn active_object(&self) -> Option<ObjectId> {
        self.selection().active()
    }

    fn selection_generation(&self) -> u64 {
        EditorState::selection_generation(self)
    }

    fn object_pose(&self, object: ObjectId) -> Option<Pose> {
        self.pose(object)
    }

    fn set_object_pose(&mut self, object: ObjectId, pose: Pose) {
        self.set_pose(object, pose);
    }

    fn selection_bounds(&self) -> Option<Bounds> {
        EditorState::selection_bounds(self)
    }
}

impl UndoLog for EditorState {
    fn increment_current_group(&mut self) {
        self.increment_undo_group();
    }

    fn record_objects(&mut self, objects: &[ObjectId], label: &str) {
        self.record_undo(objects, label);
    }

    fn perform_undo(&mut self) -> bool {
        EditorState::perform_undo(self)
    }
}

/// Resolves hovered objects through the scene's locking state
impl SelectionCandidateResolver for EditorState {
    fn selection_candidate(&self, hovered: ObjectId) -> Option<ObjectId> {
        let scene = self.scene();
        (scene.contains(hovered) && !scene.is_locked(hovered)).then_some(hovered)
    }
}
