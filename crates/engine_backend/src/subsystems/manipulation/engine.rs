//! Manipulation Engine
//!
//! Single coordinator for every endpoint. Once per frame `process_input`:
//!
//! 1. scans direct hovers and starts grabs (or a two-handed scale when the
//!    other hand already holds the hovered object)
//! 2. drops records whose endpoint cancelled or released select
//! 3. drives the two-handed scale, or resets survivors when it ends
//! 4. moves held objects with their pointers
//! 5. releases ray suppression for idle pointers
//! 6. otherwise lazily follows the manipulator pivot with the selection
//!
//! Left is always processed before Right so arbitration between the two
//! hands is deterministic.

use bevy_math::{Quat, Vec3};
use engine_state::{ObjectId, Pose};

use super::actions::{TransformAction, TransformActionKind, TransformActions};
use super::events::{EventBroadcaster, ManipulationEvent, ManipulationEventReceiver};
use super::feedback::{BindingTable, FeedbackTracker, CANCEL_ACTION, SELECT_ACTION};
use super::grab::{DirectFollowRates, GrabRecord, MOVE_UNDO_LABEL};
use super::manipulator::{
    AxisFlags, FollowRates, ManipulatorKind, ManipulatorWidget, PivotMode, PivotRotation, PivotState,
};
use super::services::{DirectHover, ManipulationHost};
use crate::settings::{HapticSettings, ManipulationSettings};
use crate::subsystems::input::{Endpoint, FrameInput, RayOrigin};

/// Two-handed pinch scale bookkeeping
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwoHandedScale {
    /// Endpoint that was holding first; its record gets scaled
    pub anchor: Endpoint,
    pub start_distance: f32,
    pub factor: f32,
    pub active: bool,
}

impl Default for TwoHandedScale {
    fn default() -> Self {
        Self {
            anchor: Endpoint::None,
            start_distance: 0.0,
            factor: 1.0,
            active: false,
        }
    }
}

pub struct ManipulationEngine {
    grabs: [Option<GrabRecord>; 2],
    scale: TwoHandedScale,

    /// Set by a direct grab, keeps the manipulator hidden until the selection changes
    direct_selected: bool,
    currently_snapping: bool,
    last_selection_generation: Option<u64>,

    pivot: PivotState,
    pivot_mode: PivotMode,
    pivot_rotation: PivotRotation,
    standard_manipulator: ManipulatorWidget,
    scale_manipulator: ManipulatorWidget,
    current_manipulator: ManipulatorKind,
    manipulator_visible: bool,
    actions: TransformActions,

    bindings: BindingTable,
    grab_feedback: FeedbackTracker,
    scale_feedback: FeedbackTracker,
    feedback_priority: i32,
    haptics: HapticSettings,

    follow_rates: FollowRates,
    direct_rates: DirectFollowRates,
    last_delta_time: f32,

    events: EventBroadcaster,
}

impl Default for ManipulationEngine {
    fn default() -> Self {
        Self::new(&ManipulationSettings::default())
    }
}

impl ManipulationEngine {
    pub fn new(settings: &ManipulationSettings) -> Self {
        let current_manipulator = ManipulatorKind::Standard;
        Self {
            grabs: [None, None],
            scale: TwoHandedScale::default(),
            direct_selected: false,
            currently_snapping: false,
            last_selection_generation: None,
            pivot: PivotState::default(),
            pivot_mode: settings.pivot_mode,
            pivot_rotation: settings.pivot_rotation,
            standard_manipulator: ManipulatorWidget::new(ManipulatorKind::Standard),
            scale_manipulator: ManipulatorWidget::new(ManipulatorKind::Scale),
            current_manipulator,
            manipulator_visible: settings.manipulator_visible,
            actions: TransformActions::new(settings.pivot_mode, settings.pivot_rotation, current_manipulator),
            bindings: settings.bindings.clone(),
            grab_feedback: FeedbackTracker::default(),
            scale_feedback: FeedbackTracker::default(),
            feedback_priority: settings.feedback.priority,
            haptics: settings.haptics,
            follow_rates: FollowRates {
                translate: settings.lazy_follow.translate,
                rotate: settings.lazy_follow.rotate,
            },
            direct_rates: DirectFollowRates {
                translate: settings.lazy_follow.direct_translate,
                rotate: settings.lazy_follow.direct_rotate,
            },
            last_delta_time: 0.0,
            events: EventBroadcaster::default(),
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn subscribe(&mut self) -> ManipulationEventReceiver {
        self.events.subscribe()
    }

    pub fn grab(&self, endpoint: Endpoint) -> Option<&GrabRecord> {
        endpoint.index().and_then(|i| self.grabs[i].as_ref())
    }

    pub fn held_objects(&self, endpoint: Endpoint) -> Option<&[ObjectId]> {
        self.grab(endpoint).map(GrabRecord::objects)
    }

    pub fn has_any_grab(&self) -> bool {
        self.grabs.iter().any(Option::is_some)
    }

    /// Whether a two-handed scale is running and `ray_origin` takes part in it
    pub fn is_two_handed_scaling(&self, ray_origin: RayOrigin) -> bool {
        self.scale.active
            && self
                .grabs
                .iter()
                .flatten()
                .any(|record| record.ray_origin() == ray_origin)
    }

    pub fn scale_state(&self) -> &TwoHandedScale {
        &self.scale
    }

    pub fn is_direct_selected(&self) -> bool {
        self.direct_selected
    }

    pub fn is_currently_snapping(&self) -> bool {
        self.currently_snapping
    }

    pub fn pivot(&self) -> &PivotState {
        &self.pivot
    }

    pub fn pivot_mode(&self) -> PivotMode {
        self.pivot_mode
    }

    pub fn pivot_rotation(&self) -> PivotRotation {
        self.pivot_rotation
    }

    pub fn current_manipulator_kind(&self) -> ManipulatorKind {
        self.current_manipulator
    }

    pub fn current_manipulator(&self) -> &ManipulatorWidget {
        self.manipulator(self.current_manipulator)
    }

    pub fn manipulator(&self, kind: ManipulatorKind) -> &ManipulatorWidget {
        match kind {
            ManipulatorKind::Standard => &self.standard_manipulator,
            ManipulatorKind::Scale => &self.scale_manipulator,
        }
    }

    fn current_manipulator_mut(&mut self) -> &mut ManipulatorWidget {
        match self.current_manipulator {
            ManipulatorKind::Standard => &mut self.standard_manipulator,
            ManipulatorKind::Scale => &mut self.scale_manipulator,
        }
    }

    pub fn manipulator_visible(&self) -> bool {
        self.manipulator_visible
    }

    /// Gate manipulator activation; takes effect on the next re-anchor
    pub fn set_manipulator_visible(&mut self, visible: bool) {
        self.manipulator_visible = visible;
        if !visible {
            self.current_manipulator_mut().active = false;
        }
    }

    pub fn actions(&self) -> [&TransformAction; 3] {
        self.actions.list()
    }

    pub fn grab_feedback(&self) -> &FeedbackTracker {
        &self.grab_feedback
    }

    pub fn scale_feedback(&self) -> &FeedbackTracker {
        &self.scale_feedback
    }

    // ========================================================================
    // Frame update
    // ========================================================================

    pub fn process_input<H: ManipulationHost + ?Sized>(&mut self, host: &mut H, input: &FrameInput) {
        self.last_delta_time = input.delta_time;
        self.sync_selection(host);

        let mut has_object = false;
        if !self.current_manipulator().dragging {
            let mut hovers = host.direct_selection();
            // Left before Right, pointers without a hand last
            hovers.sort_by_key(|hover| host.node_from_ray_origin(hover.ray_origin).index().unwrap_or(usize::MAX));

            has_object = !hovers.is_empty() || self.has_any_grab();

            let selected = host.selected_objects();
            let hovering_selection = hovers.iter().any(|hover| selected.contains(&hover.object));
            if self.current_manipulator().active && (hovering_selection || self.has_any_grab()) {
                self.current_manipulator_mut().active = false;
            }

            self.scan_direct_selection(host, input, &hovers, &selected);
            self.handle_releases(host, input);
            self.release_idle_rays(host, &hovers);
        }

        // Manipulator is disabled while direct manipulation is happening
        if has_object || self.direct_selected {
            return;
        }

        self.follow_manipulator(host, input.delta_time);
    }

    fn sync_selection<H: ManipulationHost + ?Sized>(&mut self, host: &mut H) {
        let generation = host.selection_generation();
        if self.last_selection_generation != Some(generation) {
            self.last_selection_generation = Some(generation);
            self.on_selection_changed(&*host);
        }
    }

    /// Step 1: hover arbitration and grab start
    fn scan_direct_selection<H: ManipulationHost + ?Sized>(
        &mut self,
        host: &mut H,
        input: &FrameInput,
        hovers: &[DirectHover],
        selected: &[ObjectId],
    ) {
        let mut scale_hover = false;

        for hover in hovers {
            let ray_origin = hover.ray_origin;
            let endpoint = host.node_from_ray_origin(ray_origin);

            if self.grab(endpoint).is_none() && host.is_main_menu_visible(ray_origin) {
                continue;
            }

            // Locked or static objects have no candidate
            let Some(object) = host.selection_candidate(hover.object) else {
                continue;
            };

            if !host.can_grab_object(object, ray_origin) {
                continue;
            }

            // Also disables ray selection for this pointer
            host.add_ray_visibility_settings(ray_origin, false, true);

            if !host.is_cone_visible(ray_origin) {
                continue;
            }

            let Some(index) = endpoint.index() else {
                continue;
            };

            // Another hand already holding this object makes this a scale candidate
            let scale_anchor = Endpoint::HANDS
                .into_iter()
                .filter(|other| *other != endpoint)
                .find_map(|other| {
                    self.grab(other)
                        .filter(|record| record.contains(object))
                        .map(|record| (other, record.ray_origin()))
                });

            if scale_anchor.is_some() {
                scale_hover = true;
                if self.scale_feedback.is_empty() {
                    self.show_scale_feedback(host, endpoint);
                }
            }

            if !input.endpoint(endpoint).select.just_pressed {
                continue;
            }

            let Some(origin) = host.ray_origin_pose(ray_origin) else {
                tracing::warn!(?ray_origin, "No pose for grabbing pointer, skipping grab");
                continue;
            };

            host.clear_snapping_state(ray_origin);

            if let Some((anchor, anchor_ray)) = scale_anchor {
                let anchor_position = host
                    .ray_origin_pose(anchor_ray)
                    .map_or(origin.position, |pose| pose.position);
                self.scale.start_distance = origin.position.distance(anchor_position);
                self.scale.anchor = anchor;
                self.scale.factor = 1.0;
                if let Some(i) = anchor.index() {
                    if let Some(record) = self.grabs[i].as_mut() {
                        record.start_scaling(&host.ray_origin_pose(anchor_ray).unwrap_or(origin), &*host);
                    }
                }
                self.scale.active = true;
                tracing::debug!(
                    ?anchor,
                    start_distance = self.scale.start_distance,
                    "Two-handed scale started"
                );
            }

            // Outside a scale, objects another hand already holds stay with it
            let scaling = self.scale.active;
            let held_elsewhere = |id: ObjectId| {
                !scaling
                    && self
                        .grab(endpoint.other())
                        .is_some_and(|record| record.contains(id))
            };
            let mut objects = vec![object];
            objects.extend(
                selected
                    .iter()
                    .copied()
                    .filter(|id| *id != object && !held_elsewhere(*id)),
            );

            if !self.scale.active {
                self.events.emit(ManipulationEvent::ObjectsGrabbed {
                    ray_origin,
                    objects: objects.clone(),
                });
            }

            if self.grabs[index].is_some() {
                tracing::debug!(?endpoint, "Replacing existing grab record");
            }
            tracing::debug!(?endpoint, ?ray_origin, count = objects.len(), "Grabbed objects");
            self.grabs[index] = Some(GrabRecord::new(endpoint, ray_origin, objects, &origin, &*host));
            self.show_grab_feedback(host, endpoint);

            self.direct_selected = true;
            host.increment_current_group();
        }

        if !scale_hover {
            self.scale_feedback.hide(host);
        }
    }

    /// Steps 2 to 4: release/cancel, two-handed scale, direct follow
    fn handle_releases<H: ManipulationHost + ?Sized>(&mut self, host: &mut H, input: &FrameInput) {
        let ray_before = self.grabs.each_ref().map(|g| g.as_ref().map(GrabRecord::ray_origin));
        let held = Endpoint::HANDS.map(|hand| self.grab(hand).is_some() && input.endpoint(hand).select.held);

        for hand in Endpoint::HANDS {
            if self.grab(hand).is_none() {
                continue;
            }
            let hand_input = input.endpoint(hand);

            if hand_input.cancel.just_pressed {
                self.drop_held_objects(host, hand);
                if self.scale.active {
                    self.drop_held_objects(host, hand.other());
                }
                if !host.perform_undo() {
                    tracing::trace!(?hand, "Cancel with nothing to undo");
                }
            }

            // Cancel may already have dropped it
            if hand_input.select.just_released && self.grab(hand).is_some() {
                self.drop_held_objects(host, hand);
            }
        }

        let [has_left, has_right] = Endpoint::HANDS.map(|hand| self.grab(hand).is_some());

        if has_left && has_right && held[0] && held[1] && self.scale.active {
            self.update_two_handed_scale(host);
            return;
        }

        // Offsets changed while scaling; whichever hand still holds needs a reset
        if self.scale.active {
            let anchor = self.scale.anchor;
            let anchor_ray = anchor.index().and_then(|i| ray_before[i]);
            let anchor_dropped = self.grab(anchor).is_none();

            for hand in Endpoint::HANDS {
                let Some(record) = hand.index().and_then(|i| self.grabs[i].as_mut()) else {
                    continue;
                };
                if let Some(origin) = host.ray_origin_pose(record.ray_origin()) {
                    record.reset(&origin, &*host);
                }
                let to = record.ray_origin();

                if hand != anchor && anchor_dropped {
                    if let Some(from) = anchor_ray {
                        tracing::debug!(?from, ?to, "Scale ended, objects transferred");
                        self.events.emit(ManipulationEvent::ObjectsTransferred { from, to });
                    }
                }
            }

            tracing::debug!(factor = self.scale.factor, "Two-handed scale ended");
            self.scale.active = false;
        }

        for (i, hand) in Endpoint::HANDS.into_iter().enumerate() {
            if !held[i] {
                continue;
            }
            let Some(record) = self.grabs[i].as_ref() else {
                continue;
            };
            let Some(origin) = host.ray_origin_pose(record.ray_origin()) else {
                tracing::trace!(?hand, "Pointer pose unavailable, holding objects in place");
                continue;
            };
            record.update_positions(host, &origin, input.delta_time, self.direct_rates);
        }
    }

    fn update_two_handed_scale<H: ManipulationHost + ?Sized>(&mut self, host: &mut H) {
        let poses = self
            .grabs
            .each_ref()
            .map(|g| g.as_ref().and_then(|record| host.ray_origin_pose(record.ray_origin())));
        let [Some(left), Some(right)] = poses else {
            return;
        };

        let factor = left.position.distance(right.position) / self.scale.start_distance;
        self.scale.factor = factor;
        if !(factor > 0.0 && factor.is_finite()) {
            tracing::trace!(factor, "Degenerate scale factor, skipping frame");
            return;
        }

        let Some(anchor_index) = self.scale.anchor.index() else {
            return;
        };
        let Some(record) = self.grabs[anchor_index].as_ref() else {
            return;
        };
        let origin = if anchor_index == 0 { left } else { right };
        record.scale_objects(host, &origin, factor);
        host.clear_snapping_state(record.ray_origin());
    }

    /// Step 5: pointers that are neither scaling, hovering nor grabbing get ray selection back
    fn release_idle_rays<H: ManipulationHost + ?Sized>(&self, host: &mut H, hovers: &[DirectHover]) {
        for hand in Endpoint::HANDS {
            let Some(ray_origin) = host.ray_origin_for(hand) else {
                continue;
            };
            let hovering = hovers.iter().any(|hover| hover.ray_origin == ray_origin);
            // A transferred record keeps its slot but follows another pointer
            let dragging = self
                .grabs
                .iter()
                .flatten()
                .any(|record| record.ray_origin() == ray_origin);
            if !(self.scale.active || hovering || dragging) {
                host.remove_ray_visibility_settings(ray_origin);
            }
        }
    }

    /// Step 6: lazy follow of the manipulator and the selection
    fn follow_manipulator<H: ManipulationHost + ?Sized>(&mut self, host: &mut H, delta_time: f32) {
        let selected = host.selected_objects();
        if selected.is_empty() {
            return;
        }

        if !self.current_manipulator().dragging {
            self.update_current_manipulator(&*host);
        }

        let (translate_factor, rotate_factor) = self.follow_rates.factors(delta_time);
        let position_factor = if self.currently_snapping { 1.0 } else { translate_factor };
        let target_position = self.pivot.target_position;
        let target_rotation = self.pivot.target_rotation;
        let pivot_rotation = self.pivot_rotation;

        let widget = self.current_manipulator_mut();
        widget.pose.position = widget.pose.position.lerp(target_position, position_factor);
        // Manipulator does not rotate in global mode
        if widget.follows_rotation(pivot_rotation) {
            widget.pose.rotation = widget.pose.rotation.slerp(target_rotation, rotate_factor);
        }
        let widget_position = widget.pose.position;

        host.record_objects(&selected, MOVE_UNDO_LABEL);

        if self.pivot_mode == PivotMode::Center {
            self.pivot.follow_offset_rotation(rotate_factor);
        }

        for object in selected {
            let (Some(offset), Some(current)) = (self.pivot.offset(object), host.object_pose(object)) else {
                continue;
            };
            let next = self.pivot.follow(
                &current,
                offset,
                widget_position,
                self.pivot_mode,
                translate_factor,
                rotate_factor,
            );
            host.set_object_pose(object, next);
        }
    }

    // ========================================================================
    // Pivot
    // ========================================================================

    /// Move the manipulator onto the selection and recapture every pivot offset
    pub fn update_current_manipulator<H: ManipulationHost + ?Sized>(&mut self, host: &H) {
        let selected = host.selected_objects();
        if selected.is_empty() {
            return;
        }

        let Some(active) = host.active_object().or_else(|| selected.first().copied()) else {
            return;
        };
        let Some(active_pose) = host.object_pose(active) else {
            tracing::warn!(%active, "Active object has no pose, manipulator not anchored");
            return;
        };

        let position = match self.pivot_mode {
            PivotMode::Pivot => active_pose.position,
            PivotMode::Center => host
                .selection_bounds()
                .map_or(active_pose.position, |bounds| bounds.center),
        };
        let rotation = if self.pivot_rotation == PivotRotation::Global
            && self.current_manipulator == ManipulatorKind::Standard
        {
            Quat::IDENTITY
        } else {
            active_pose.rotation
        };

        // Never shown over a direct grab
        let visible = self.manipulator_visible && !self.has_any_grab();
        let widget = self.current_manipulator_mut();
        widget.active = visible;
        widget.pose.position = position;
        widget.pose.rotation = rotation;

        let poses: Vec<(ObjectId, Pose)> = selected
            .into_iter()
            .filter_map(|id| host.object_pose(id).map(|pose| (id, pose)))
            .collect();
        self.pivot.anchor(position, rotation, &poses);
        tracing::trace!(?position, count = poses.len(), "Manipulator anchored");
    }

    pub fn on_selection_changed<H: ManipulationHost + ?Sized>(&mut self, host: &H) {
        self.direct_selected = false;
        if host.selected_objects().is_empty() {
            self.current_manipulator_mut().active = false;
            self.pivot.invalidate();
        } else {
            self.update_current_manipulator(host);
        }
        tracing::debug!(generation = ?self.last_selection_generation, "Selection changed");
    }

    pub fn reset_direct_selection_state(&mut self) {
        self.direct_selected = false;
    }

    // ========================================================================
    // Manipulator drag callbacks
    // ========================================================================

    pub fn on_translate<H: ManipulationHost + ?Sized>(
        &mut self,
        host: &mut H,
        delta: Vec3,
        ray_origin: RayOrigin,
        constraints: AxisFlags,
    ) {
        if constraints.is_plane() {
            self.pivot.target_position += delta;
        } else {
            let selected = host.selected_objects();
            let mut position = self.pivot.target_position;
            let mut rotation = self.pivot.target_rotation;
            let snapping = host.manipulator_snap(
                ray_origin,
                &selected,
                &mut position,
                &mut rotation,
                delta,
                constraints,
                self.pivot_mode,
            );
            self.pivot.target_position = position;
            self.pivot.target_rotation = rotation;
            self.currently_snapping = snapping && !constraints.is_empty();
        }

        let endpoint = host.node_from_ray_origin(ray_origin);
        host.pulse(endpoint, &self.haptics.drag_pulse);
    }

    pub fn on_rotate<H: ManipulationHost + ?Sized>(&mut self, host: &mut H, delta: Quat, ray_origin: RayOrigin) {
        self.pivot.target_rotation = delta * self.pivot.target_rotation;

        let endpoint = host.node_from_ray_origin(ray_origin);
        host.pulse(endpoint, &self.haptics.rotate_pulse);
    }

    pub fn on_scale(&mut self, delta: Vec3) {
        self.pivot.target_scale += delta;
    }

    pub fn on_drag_started<H: ManipulationHost + ?Sized>(&mut self, host: &mut H) {
        host.increment_current_group();
        self.current_manipulator_mut().dragging = true;
    }

    pub fn on_drag_ended<H: ManipulationHost + ?Sized>(&mut self, host: &mut H, ray_origin: RayOrigin) {
        host.clear_snapping_state(ray_origin);
        self.currently_snapping = false;
        self.current_manipulator_mut().dragging = false;
    }

    // ========================================================================
    // Actions
    // ========================================================================

    pub fn execute_action<H: ManipulationHost + ?Sized>(&mut self, host: &H, kind: TransformActionKind) {
        match kind {
            TransformActionKind::TogglePivotMode => self.toggle_pivot_mode(host),
            TransformActionKind::TogglePivotRotation => self.toggle_pivot_rotation(host),
            TransformActionKind::ToggleManipulator => self.toggle_manipulator(host),
        }
    }

    pub fn toggle_pivot_mode<H: ManipulationHost + ?Sized>(&mut self, host: &H) {
        self.pivot_mode = self.pivot_mode.toggled();
        self.actions.update_pivot_mode(self.pivot_mode);
        self.update_current_manipulator(host);
    }

    pub fn toggle_pivot_rotation<H: ManipulationHost + ?Sized>(&mut self, host: &H) {
        self.pivot_rotation = self.pivot_rotation.toggled();
        self.actions.update_pivot_rotation(self.pivot_rotation);
        self.update_current_manipulator(host);
    }

    pub fn toggle_manipulator<H: ManipulationHost + ?Sized>(&mut self, host: &H) {
        self.current_manipulator_mut().active = false;
        self.current_manipulator = self.current_manipulator.toggled();
        self.actions.update_manipulator(self.current_manipulator);
        self.update_current_manipulator(host);
    }

    // ========================================================================
    // Held objects
    // ========================================================================

    pub fn suspend(&mut self, endpoint: Endpoint) {
        if let Some(record) = endpoint.index().and_then(|i| self.grabs[i].as_mut()) {
            record.set_suspended(true);
        }
    }

    pub fn resume(&mut self, endpoint: Endpoint) {
        if let Some(record) = endpoint.index().and_then(|i| self.grabs[i].as_mut()) {
            record.set_suspended(false);
        }
    }

    /// Hand whatever `from` holds over to `to`, shifting offsets by `delta_offset`
    pub fn transfer_held_objects<H: ManipulationHost + ?Sized>(
        &mut self,
        host: &mut H,
        from: RayOrigin,
        to: RayOrigin,
        delta_offset: Vec3,
    ) {
        let Some(record) = self
            .grabs
            .iter_mut()
            .flatten()
            .find(|record| record.ray_origin() == from)
        else {
            tracing::trace!(?from, "No grab record for pointer, nothing to transfer");
            return;
        };

        record.transfer_to(to, delta_offset);
        host.clear_snapping_state(from);
        if let Some(origin) = host.ray_origin_pose(to) {
            record.update_positions(host, &origin, self.last_delta_time, self.direct_rates);
        }

        // Keep the suppression with the pointer now holding the objects
        host.remove_ray_visibility_settings(from);
        host.add_ray_visibility_settings(to, false, true);

        tracing::debug!(?from, ?to, "Held objects transferred");
        self.events.emit(ManipulationEvent::ObjectsTransferred { from, to });
    }

    /// Release everything `endpoint` holds. No-op without a record.
    pub fn drop_held_objects<H: ManipulationHost + ?Sized>(&mut self, host: &mut H, endpoint: Endpoint) {
        let Some(record) = endpoint.index().and_then(|i| self.grabs[i].take()) else {
            return;
        };
        let ray_origin = record.ray_origin();

        if !self.scale.active {
            self.events.emit(ManipulationEvent::ObjectsDropped {
                ray_origin,
                objects: record.objects().to_vec(),
            });
        }
        tracing::debug!(?endpoint, ?ray_origin, scaling = self.scale.active, "Dropped objects");

        self.grab_feedback.hide(host);
        host.remove_ray_visibility_settings(ray_origin);
        host.clear_snapping_state(ray_origin);
    }

    // ========================================================================
    // Feedback
    // ========================================================================

    fn show_grab_feedback<H: ManipulationHost + ?Sized>(&mut self, host: &mut H, endpoint: Endpoint) {
        let priority = self.feedback_priority;
        self.grab_feedback
            .show(host, &self.bindings, CANCEL_ACTION, Some("Cancel"), endpoint, priority, false);
        self.grab_feedback
            .show(host, &self.bindings, SELECT_ACTION, None, endpoint, priority, true);
    }

    fn show_scale_feedback<H: ManipulationHost + ?Sized>(&mut self, host: &mut H, endpoint: Endpoint) {
        let priority = self.feedback_priority;
        self.scale_feedback
            .show(host, &self.bindings, SELECT_ACTION, Some("Scale"), endpoint, priority, false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_engine_is_idle() {
        let engine = ManipulationEngine::default();

        assert!(!engine.has_any_grab());
        assert!(!engine.scale_state().active);
        assert!(!engine.is_two_handed_scaling(RayOrigin(0)));
        assert_eq!(engine.held_objects(Endpoint::Left), None);
        assert_eq!(engine.current_manipulator_kind(), ManipulatorKind::Standard);
        assert!(!engine.current_manipulator().active);
    }

    #[test]
    fn test_settings_seed_pivot_state() {
        let settings = ManipulationSettings {
            pivot_mode: PivotMode::Center,
            pivot_rotation: PivotRotation::Global,
            ..ManipulationSettings::default()
        };
        let engine = ManipulationEngine::new(&settings);
        let [pivot, rotation, _] = engine.actions();

        assert_eq!(engine.pivot_mode(), PivotMode::Center);
        assert_eq!(pivot.tooltip_text, "Manipulator at Center");
        assert_eq!(rotation.tooltip_text, "Local Rotation");
    }

    #[test]
    fn test_suspend_without_record_is_noop() {
        let mut engine = ManipulationEngine::default();
        engine.suspend(Endpoint::Right);
        engine.resume(Endpoint::None);
        assert!(engine.grab(Endpoint::Right).is_none());
    }

    #[test]
    fn test_scale_accumulates_into_target() {
        let mut engine = ManipulationEngine::default();
        engine.on_scale(Vec3::new(0.5, 0.0, 0.0));
        engine.on_scale(Vec3::new(0.5, 1.0, 0.0));
        assert_eq!(engine.pivot().target_scale, Vec3::new(2.0, 2.0, 1.0));
    }
}
