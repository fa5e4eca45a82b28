//! Pose Math
//!
//! Offsets between a pointer pose and an object pose, plus the damped
//! interpolation helpers used by every lazy-follow update.

use bevy_math::{Quat, Vec3};

/// World-space position, rotation and local scale of a scene object or pointer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Pose {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            scale: Vec3::ONE,
        }
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Approximate equality used by tests and jump detection
    pub fn abs_diff_eq(&self, other: &Pose, epsilon: f32) -> bool {
        self.position.abs_diff_eq(other.position, epsilon)
            && self.scale.abs_diff_eq(other.scale, epsilon)
            // q and -q describe the same rotation
            && self.rotation.dot(other.rotation).abs() >= 1.0 - epsilon
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Offset of `object` expressed in the local frame of `origin`.
///
/// Returns `(position_offset, rotation_offset)` such that
/// [`apply_offset`] with the same origin reproduces the object's pose.
pub fn transform_offset(origin: &Pose, object: &Pose) -> (Vec3, Quat) {
    let inverse_rotation = origin.rotation.inverse();
    let position_offset = inverse_rotation * (object.position - origin.position);
    let rotation_offset = inverse_rotation * object.rotation;
    (position_offset, rotation_offset)
}

/// Compose a captured offset back onto an origin
pub fn apply_offset(origin: &Pose, position_offset: Vec3, rotation_offset: Quat) -> (Vec3, Quat) {
    (
        origin.position + origin.rotation * position_offset,
        origin.rotation * rotation_offset,
    )
}

/// Interpolation factor for one frame of exponential follow at `rate` per second
pub fn lazy_follow_factor(rate: f32, delta_time: f32) -> f32 {
    (rate * delta_time).clamp(0.0, 1.0)
}

/// Axis-aligned world bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub center: Vec3,
    pub extents: Vec3,
}

impl Bounds {
    pub fn new(center: Vec3, extents: Vec3) -> Self {
        Self { center, extents }
    }

    pub fn from_min_max(min: Vec3, max: Vec3) -> Self {
        Self {
            center: (min + max) * 0.5,
            extents: (max - min) * 0.5,
        }
    }

    /// Bounds of a box with local half-size `extents` placed at `pose`
    pub fn from_oriented_box(pose: &Pose, extents: Vec3) -> Self {
        let half = extents * pose.scale.abs();
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for corner in 0..8u8 {
            let local = Vec3::new(
                if corner & 1 == 0 { -half.x } else { half.x },
                if corner & 2 == 0 { -half.y } else { half.y },
                if corner & 4 == 0 { -half.z } else { half.z },
            );
            let world = pose.position + pose.rotation * local;
            min = min.min(world);
            max = max.max(world);
        }
        Self::from_min_max(min, max)
    }

    pub fn min(&self) -> Vec3 {
        self.center - self.extents
    }

    pub fn max(&self) -> Vec3 {
        self.center + self.extents
    }

    /// Grow to contain `other`
    pub fn encapsulate(&mut self, other: &Bounds) {
        *self = Self::from_min_max(self.min().min(other.min()), self.max().max(other.max()));
    }
}
