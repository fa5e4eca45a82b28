//! In-memory host shared by the integration tests

#![allow(dead_code)]

use bevy_ecs::prelude::Resource;
use bevy_math::{Quat, Vec3};
use engine_backend::subsystems::input::{ButtonState, Endpoint, EndpointInput, FrameInput, RayOrigin};
use engine_backend::subsystems::manipulation::{
    AxisFlags, DirectHover, DirectSelectionProvider, FeedbackRequest, FeedbackSink, HapticPulse, MenuVisibility,
    PivotMode, RayOriginProvider, RayVisibility, SelectionCandidateResolver, SelectionStore, SnapProvider,
    UndoLog,
};
use engine_state::{Bounds, EditorState, ObjectId, Pose, SceneObject};
use std::collections::{HashMap, HashSet};

pub const LEFT_RAY: RayOrigin = RayOrigin(1);
pub const RIGHT_RAY: RayOrigin = RayOrigin(2);
pub const DT: f32 = 1.0 / 60.0;

#[derive(Resource)]
pub struct TestHost {
    pub state: EditorState,
    pub hovers: Vec<DirectHover>,
    pub ray_poses: HashMap<RayOrigin, Pose>,
    pub feedback: Vec<FeedbackRequest>,
    pub suppressed_rays: HashSet<RayOrigin>,
    pub menu_rays: HashSet<RayOrigin>,
    pub hidden_cones: HashSet<RayOrigin>,
    pub ungrabbable: HashSet<ObjectId>,
    pub snap_clears: Vec<RayOrigin>,
    /// When set, constrained manipulator translations land here and report a snap
    pub snap_target: Option<Vec3>,
    pub pulses: Vec<(Endpoint, HapticPulse)>,
}

impl TestHost {
    /// Left pointer at -X, right pointer at +X
    pub fn new() -> Self {
        let mut ray_poses = HashMap::new();
        ray_poses.insert(LEFT_RAY, Pose::from_position(Vec3::new(-1.0, 0.0, 0.0)));
        ray_poses.insert(RIGHT_RAY, Pose::from_position(Vec3::new(1.0, 0.0, 0.0)));

        Self {
            state: EditorState::new(),
            hovers: Vec::new(),
            ray_poses,
            feedback: Vec::new(),
            suppressed_rays: HashSet::new(),
            menu_rays: HashSet::new(),
            hidden_cones: HashSet::new(),
            ungrabbable: HashSet::new(),
            snap_clears: Vec::new(),
            snap_target: None,
            pulses: Vec::new(),
        }
    }

    pub fn spawn(&self, position: Vec3) -> ObjectId {
        self.state
            .spawn(SceneObject::new("cube", Pose::from_position(position)))
    }

    pub fn pose_of(&self, object: ObjectId) -> Pose {
        self.state.pose(object).expect("object exists")
    }

    pub fn hover(&mut self, ray_origin: RayOrigin, object: ObjectId) {
        self.hovers.retain(|h| h.ray_origin != ray_origin);
        self.hovers.push(DirectHover { ray_origin, object });
    }

    pub fn unhover(&mut self, ray_origin: RayOrigin) {
        self.hovers.retain(|h| h.ray_origin != ray_origin);
    }

    pub fn move_ray(&mut self, ray_origin: RayOrigin, position: Vec3) {
        let pose = self.ray_poses.entry(ray_origin).or_insert(Pose::IDENTITY);
        pose.position = position;
    }

    pub fn turn_ray(&mut self, ray_origin: RayOrigin, rotation: Quat) {
        let pose = self.ray_poses.entry(ray_origin).or_insert(Pose::IDENTITY);
        pose.rotation = rotation;
    }
}

pub fn ray_for(endpoint: Endpoint) -> Option<RayOrigin> {
    match endpoint {
        Endpoint::Left => Some(LEFT_RAY),
        Endpoint::Right => Some(RIGHT_RAY),
        Endpoint::None => None,
    }
}

/// One frame where each listed endpoint has the given select state
pub fn frame(select: &[(Endpoint, ButtonState)]) -> FrameInput {
    select.iter().fold(FrameInput::new(DT), |frame, (endpoint, state)| {
        frame.with(*endpoint, EndpointInput::select(*state))
    })
}

pub fn cancel(endpoint: Endpoint) -> FrameInput {
    FrameInput::new(DT).with(
        endpoint,
        EndpointInput {
            select: ButtonState::HELD,
            cancel: ButtonState::PRESSED,
        },
    )
}

impl DirectSelectionProvider for TestHost {
    fn direct_selection(&self) -> Vec<DirectHover> {
        self.hovers.clone()
    }
}

impl SelectionCandidateResolver for TestHost {
    fn selection_candidate(&self, hovered: ObjectId) -> Option<ObjectId> {
        self.state.selection_candidate(hovered)
    }

    fn can_grab_object(&self, object: ObjectId, _ray_origin: RayOrigin) -> bool {
        !self.ungrabbable.contains(&object)
    }
}

impl RayOriginProvider for TestHost {
    fn ray_origin_pose(&self, ray_origin: RayOrigin) -> Option<Pose> {
        self.ray_poses.get(&ray_origin).copied()
    }

    fn node_from_ray_origin(&self, ray_origin: RayOrigin) -> Endpoint {
        match ray_origin {
            LEFT_RAY => Endpoint::Left,
            RIGHT_RAY => Endpoint::Right,
            _ => Endpoint::None,
        }
    }

    fn ray_origin_for(&self, endpoint: Endpoint) -> Option<RayOrigin> {
        ray_for(endpoint)
    }
}

impl SelectionStore for TestHost {
    fn selected_objects(&self) -> Vec<ObjectId> {
        self.state.selected_objects()
    }

    fn active_object(&self) -> Option<ObjectId> {
        self.state.active_object()
    }

    fn selection_generation(&self) -> u64 {
        SelectionStore::selection_generation(&self.state)
    }

    fn object_pose(&self, object: ObjectId) -> Option<Pose> {
        self.state.object_pose(object)
    }

    fn set_object_pose(&mut self, object: ObjectId, pose: Pose) {
        self.state.set_object_pose(object, pose);
    }

    fn selection_bounds(&self) -> Option<Bounds> {
        SelectionStore::selection_bounds(&self.state)
    }
}

impl UndoLog for TestHost {
    fn increment_current_group(&mut self) {
        self.state.increment_current_group();
    }

    fn record_objects(&mut self, objects: &[ObjectId], label: &str) {
        self.state.record_objects(objects, label);
    }

    fn perform_undo(&mut self) -> bool {
        UndoLog::perform_undo(&mut self.state)
    }
}

impl SnapProvider for TestHost {
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
        match self.snap_target {
            Some(target) => {
                *position = target;
                true
            }
            None => {
                *position += delta;
                false
            }
        }
    }

    fn clear_snapping_state(&mut self, ray_origin: RayOrigin) {
        self.snap_clears.push(ray_origin);
    }
}

impl FeedbackSink for TestHost {
    fn add_feedback_request(&mut self, request: &FeedbackRequest) {
        self.feedback.push(request.clone());
    }

    fn remove_feedback_request(&mut self, request: &FeedbackRequest) {
        if let Some(index) = self.feedback.iter().position(|r| r == request) {
            self.feedback.remove(index);
        }
    }

    fn pulse(&mut self, endpoint: Endpoint, pulse: &HapticPulse) {
        self.pulses.push((endpoint, *pulse));
    }
}

impl RayVisibility for TestHost {
    fn add_ray_visibility_settings(&mut self, ray_origin: RayOrigin, _ray_visible: bool, _cone_visible: bool) {
        self.suppressed_rays.insert(ray_origin);
    }

    fn remove_ray_visibility_settings(&mut self, ray_origin: RayOrigin) {
        self.suppressed_rays.remove(&ray_origin);
    }

    fn is_cone_visible(&self, ray_origin: RayOrigin) -> bool {
        !self.hidden_cones.contains(&ray_origin)
    }
}

impl MenuVisibility for TestHost {
    fn is_main_menu_visible(&self, ray_origin: RayOrigin) -> bool {
        self.menu_rays.contains(&ray_origin)
    }
}
