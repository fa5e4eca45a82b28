//! Manipulator widget and pivot bookkeeping
//!
//! The manipulator is the indirect editing widget shown over the selection
//! when no hand is grabbing. It comes in two variants sharing one capability
//! set (drag deltas, visibility, dragging flag):
//!
//! - **Standard** - translate arrows/planes and rotation rings
//! - **Scale** - per-axis and uniform scale handles
//!
//! `PivotState` holds the accumulated drag targets and the per-object offsets
//! captured when the pivot was last anchored.

use bevy_math::{Quat, Vec3};
use engine_state::pose::lazy_follow_factor;
use engine_state::{ObjectId, Pose};
use std::collections::BTreeMap;

/// Where the pivot sits relative to the selection
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum PivotMode {
    /// Active object's own position
    #[default]
    Pivot,
    /// Center of the selection bounds
    Center,
}

impl PivotMode {
    pub fn toggled(self) -> Self {
        match self {
            PivotMode::Pivot => PivotMode::Center,
            PivotMode::Center => PivotMode::Pivot,
        }
    }
}

/// Orientation of the pivot
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum PivotRotation {
    /// Active object's rotation
    #[default]
    Local,
    /// World axes
    Global,
}

impl PivotRotation {
    pub fn toggled(self) -> Self {
        match self {
            PivotRotation::Local => PivotRotation::Global,
            PivotRotation::Global => PivotRotation::Local,
        }
    }
}

/// Which manipulator variant is in use
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ManipulatorKind {
    #[default]
    Standard,
    Scale,
}

impl ManipulatorKind {
    pub fn toggled(self) -> Self {
        match self {
            ManipulatorKind::Standard => ManipulatorKind::Scale,
            ManipulatorKind::Scale => ManipulatorKind::Standard,
        }
    }
}

/// Axes a translate drag is constrained to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Hash)]
pub struct AxisFlags(u8);

impl AxisFlags {
    pub const NONE: Self = Self(0);
    pub const X: Self = Self(1);
    pub const Y: Self = Self(2);
    pub const Z: Self = Self(4);

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, other: AxisFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Exactly two axes set (a plane handle)
    pub fn is_plane(self) -> bool {
        self.0.count_ones() == 2 && self.0 & !0b111 == 0
    }
}

impl std::ops::BitOr for AxisFlags {
    type Output = Self;
    fn bitor(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

/// One manipulator widget instance
#[derive(Debug, Clone)]
pub struct ManipulatorWidget {
    kind: ManipulatorKind,
    pub pose: Pose,
    pub active: bool,
    pub dragging: bool,
}

impl ManipulatorWidget {
    pub fn new(kind: ManipulatorKind) -> Self {
        Self {
            kind,
            pose: Pose::IDENTITY,
            active: false,
            dragging: false,
        }
    }

    pub fn kind(&self) -> ManipulatorKind {
        self.kind
    }

    /// Whether this variant turns with the pivot in local rotation mode
    pub fn follows_rotation(&self, pivot_rotation: PivotRotation) -> bool {
        self.kind == ManipulatorKind::Standard && pivot_rotation == PivotRotation::Local
    }
}

/// Selected object's pose relative to the pivot at anchor time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PivotOffset {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

#[derive(Debug, Clone)]
pub struct PivotState {
    pub target_position: Vec3,
    pub target_rotation: Quat,
    /// Accumulated scale delta, starts at one
    pub target_scale: Vec3,
    pub start_rotation: Quat,
    /// Damped rotation applied to position offsets in center mode
    pub position_offset_rotation: Quat,
    offsets: BTreeMap<ObjectId, PivotOffset>,
}

impl Default for PivotState {
    fn default() -> Self {
        Self {
            target_position: Vec3::ZERO,
            target_rotation: Quat::IDENTITY,
            target_scale: Vec3::ONE,
            start_rotation: Quat::IDENTITY,
            position_offset_rotation: Quat::IDENTITY,
            offsets: BTreeMap::new(),
        }
    }
}

impl PivotState {
    /// Reset targets to `pivot` and capture offsets for `objects`
    pub fn anchor(&mut self, pivot_position: Vec3, pivot_rotation: Quat, objects: &[(ObjectId, Pose)]) {
        self.target_position = pivot_position;
        self.target_rotation = pivot_rotation;
        self.start_rotation = pivot_rotation;
        self.position_offset_rotation = Quat::IDENTITY;
        self.target_scale = Vec3::ONE;

        let inverse_rotation = pivot_rotation.inverse();
        self.offsets.clear();
        for (id, pose) in objects {
            self.offsets.insert(
                *id,
                PivotOffset {
                    position: pose.position - pivot_position,
                    rotation: inverse_rotation * pose.rotation,
                    scale: pose.scale,
                },
            );
        }
    }

    /// Drop captured offsets; they are stale until the next anchor
    pub fn invalidate(&mut self) {
        self.offsets.clear();
    }

    pub fn offset(&self, id: ObjectId) -> Option<&PivotOffset> {
        self.offsets.get(&id)
    }

    /// Advance the center-mode offset rotation one frame toward the drag rotation
    pub fn follow_offset_rotation(&mut self, rotate_factor: f32) {
        let goal = self.target_rotation * self.start_rotation.inverse();
        self.position_offset_rotation = self.position_offset_rotation.slerp(goal, rotate_factor);
    }

    /// One lazy-follow step of a selected object toward its pivot-relative target
    pub fn follow(
        &self,
        current: &Pose,
        offset: &PivotOffset,
        widget_position: Vec3,
        pivot_mode: PivotMode,
        translate_factor: f32,
        rotate_factor: f32,
    ) -> Pose {
        let rotation = current
            .rotation
            .slerp(self.target_rotation * offset.rotation, rotate_factor);

        let position = match pivot_mode {
            PivotMode::Center => widget_position + self.position_offset_rotation * offset.position,
            PivotMode::Pivot => widget_position + offset.position,
        };

        let scale = current.scale.lerp(self.target_scale * offset.scale, translate_factor);

        Pose {
            position,
            rotation,
            scale,
        }
    }
}

/// Follow rates per second for the indirect manipulator
#[derive(Debug, Clone, Copy)]
pub struct FollowRates {
    pub translate: f32,
    pub rotate: f32,
}

impl FollowRates {
    pub fn factors(&self, delta_time: f32) -> (f32, f32) {
        (
            lazy_follow_factor(self.translate, delta_time),
            lazy_follow_factor(self.rotate, delta_time),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_axis_flags_plane_detection() {
        assert!((AxisFlags::X | AxisFlags::Y).is_plane());
        assert!((AxisFlags::Y | AxisFlags::Z).is_plane());
        assert!(!AxisFlags::X.is_plane());
        assert!(!(AxisFlags::X | AxisFlags::Y | AxisFlags::Z).is_plane());
        assert!(AxisFlags::NONE.is_empty());
        assert!((AxisFlags::X | AxisFlags::Z).contains(AxisFlags::Z));
    }

    #[test]
    fn test_anchor_captures_offsets_relative_to_pivot() {
        let mut pivot = PivotState::default();
        let rotation = Quat::from_rotation_y(FRAC_PI_2);
        let object = Pose::new(Vec3::new(3.0, 0.0, 0.0), rotation).with_scale(Vec3::splat(2.0));

        pivot.anchor(Vec3::new(1.0, 0.0, 0.0), rotation, &[(ObjectId(1), object)]);

        let offset = pivot.offset(ObjectId(1)).expect("offset captured");
        assert!(offset.position.abs_diff_eq(Vec3::new(2.0, 0.0, 0.0), 1e-5));
        assert!(offset.rotation.abs_diff_eq(Quat::IDENTITY, 1e-5));
        assert_eq!(offset.scale, Vec3::splat(2.0));
        assert_eq!(pivot.target_scale, Vec3::ONE);
    }

    #[test]
    fn test_full_step_reaches_target() {
        let mut pivot = PivotState::default();
        let object = Pose::from_position(Vec3::new(1.0, 0.0, 0.0));
        pivot.anchor(Vec3::ZERO, Quat::IDENTITY, &[(ObjectId(1), object)]);
        pivot.target_scale = Vec3::splat(3.0);

        let offset = *pivot.offset(ObjectId(1)).unwrap();
        let next = pivot.follow(&object, &offset, Vec3::new(0.0, 5.0, 0.0), PivotMode::Pivot, 1.0, 1.0);

        assert!(next.position.abs_diff_eq(Vec3::new(1.0, 5.0, 0.0), 1e-5));
        assert!(next.scale.abs_diff_eq(Vec3::splat(3.0), 1e-5));
    }

    #[test]
    fn test_center_mode_rotates_offsets() {
        let mut pivot = PivotState::default();
        let object = Pose::from_position(Vec3::X);
        pivot.anchor(Vec3::ZERO, Quat::IDENTITY, &[(ObjectId(1), object)]);
        pivot.target_rotation = Quat::from_rotation_y(FRAC_PI_2);
        pivot.follow_offset_rotation(1.0);

        let offset = *pivot.offset(ObjectId(1)).unwrap();
        let next = pivot.follow(&object, &offset, Vec3::ZERO, PivotMode::Center, 1.0, 1.0);

        assert!(next.position.abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), 1e-5));
    }

    #[test]
    fn test_toggles_flip() {
        assert_eq!(PivotMode::Pivot.toggled(), PivotMode::Center);
        assert_eq!(PivotRotation::Global.toggled(), PivotRotation::Local);
        assert_eq!(ManipulatorKind::Standard.toggled(), ManipulatorKind::Scale);
    }
}
