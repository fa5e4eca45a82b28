//! Grab records
//!
//! One record per hand that is directly holding objects. The record captures
//! each object's pose relative to the pointer at grab time and replays it as
//! the pointer moves.

use bevy_math::{Quat, Vec3};
use engine_state::pose::{apply_offset, lazy_follow_factor, transform_offset};
use engine_state::{ObjectId, Pose};

use super::services::{SelectionStore, SnapProvider, UndoLog};
use crate::subsystems::input::{Endpoint, RayOrigin};

pub(crate) const MOVE_UNDO_LABEL: &str = "Move";

/// Object pose relative to the grabbing pointer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrabOffset {
    pub position: Vec3,
    pub rotation: Quat,
    pub initial_scale: Vec3,
}

impl Default for GrabOffset {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            initial_scale: Vec3::ONE,
        }
    }
}

/// Follow rates used while a direct snap is engaged
#[derive(Debug, Clone, Copy)]
pub struct DirectFollowRates {
    pub translate: f32,
    pub rotate: f32,
}

#[derive(Debug, Clone)]
pub struct GrabRecord {
    endpoint: Endpoint,
    ray_origin: RayOrigin,
    objects: Vec<ObjectId>,
    offsets: Vec<GrabOffset>,
    suspended: bool,
}

impl GrabRecord {
    /// Start holding `objects` with the pointer at `origin`
    pub fn new<S: SelectionStore + ?Sized>(
        endpoint: Endpoint,
        ray_origin: RayOrigin,
        objects: Vec<ObjectId>,
        origin: &Pose,
        scene: &S,
    ) -> Self {
        let mut record = Self {
            endpoint,
            ray_origin,
            offsets: vec![GrabOffset::default(); objects.len()],
            objects,
            suspended: false,
        };
        record.reset(origin, scene);
        record
    }

    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    pub fn ray_origin(&self) -> RayOrigin {
        self.ray_origin
    }

    pub fn objects(&self) -> &[ObjectId] {
        &self.objects
    }

    pub fn offsets(&self) -> &[GrabOffset] {
        &self.offsets
    }

    pub fn contains(&self, object: ObjectId) -> bool {
        self.objects.contains(&object)
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    pub fn set_suspended(&mut self, suspended: bool) {
        self.suspended = suspended;
    }

    /// Recapture every offset relative to `origin`. No-op while suspended.
    pub fn reset<S: SelectionStore + ?Sized>(&mut self, origin: &Pose, scene: &S) {
        if self.suspended {
            return;
        }

        for (object, offset) in self.objects.iter().zip(self.offsets.iter_mut()) {
            let Some(pose) = scene.object_pose(*object) else {
                *offset = GrabOffset::default();
                continue;
            };
            let (position, rotation) = transform_offset(origin, &pose);
            *offset = GrabOffset {
                position,
                rotation,
                initial_scale: pose.scale,
            };
        }
    }

    /// Move every held object to follow the pointer at `origin`.
    ///
    /// Objects whose snap is engaged ease toward the snapped pose at the
    /// direct follow rates instead of jumping to the raw target.
    pub fn update_positions<H>(&self, host: &mut H, origin: &Pose, delta_time: f32, rates: DirectFollowRates)
    where
        H: SelectionStore + UndoLog + SnapProvider + ?Sized,
    {
        if self.suspended {
            return;
        }

        host.record_objects(&self.objects, MOVE_UNDO_LABEL);

        for (object, offset) in self.objects.iter().zip(&self.offsets) {
            let Some(current) = host.object_pose(*object) else {
                continue;
            };
            let (target_position, target_rotation) = apply_offset(origin, offset.position, offset.rotation);

            let mut position = current.position;
            let mut rotation = current.rotation;
            let snapped = host.direct_snap(
                self.ray_origin,
                *object,
                &mut position,
                &mut rotation,
                target_position,
                target_rotation,
            );

            let next = if snapped {
                Pose {
                    position: current
                        .position
                        .lerp(position, lazy_follow_factor(rates.translate, delta_time)),
                    rotation: current
                        .rotation
                        .slerp(rotation, lazy_follow_factor(rates.rotate, delta_time)),
                    scale: current.scale,
                }
            } else {
                Pose {
                    position: target_position,
                    rotation: target_rotation,
                    scale: current.scale,
                }
            };
            host.set_object_pose(*object, next);
        }
    }

    /// Scale held objects about the pointer by `factor`. Expects raw offsets
    /// captured by [`GrabRecord::start_scaling`]. No-op while suspended.
    pub fn scale_objects<H>(&self, host: &mut H, origin: &Pose, factor: f32)
    where
        H: SelectionStore + UndoLog + ?Sized,
    {
        if self.suspended {
            return;
        }

        host.record_objects(&self.objects, MOVE_UNDO_LABEL);

        for (object, offset) in self.objects.iter().zip(&self.offsets) {
            let Some(current) = host.object_pose(*object) else {
                continue;
            };
            let next = Pose {
                position: origin.position + offset.position * factor,
                rotation: current.rotation,
                scale: offset.initial_scale * factor,
            };
            host.set_object_pose(*object, next);
        }
    }

    /// Hand the record to another pointer, shifting offsets by `delta_offset`
    pub fn transfer_to(&mut self, ray_origin: RayOrigin, delta_offset: Vec3) {
        self.ray_origin = ray_origin;
        for offset in &mut self.offsets {
            offset.position += delta_offset;
        }
    }

    /// Switch position offsets to raw world-space pointer-to-object vectors
    pub fn start_scaling<S: SelectionStore + ?Sized>(&mut self, origin: &Pose, scene: &S) {
        for (object, offset) in self.objects.iter().zip(self.offsets.iter_mut()) {
            if let Some(pose) = scene.object_pose(*object) {
                offset.position = pose.position - origin.position;
            }
        }
    }
}
