//! Tool menu actions exposed by the manipulation engine

use super::manipulator::{ManipulatorKind, PivotMode, PivotRotation};

/// Icon identifiers resolved by the menu UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionIcon {
    OriginCenter,
    OriginPivot,
    RotationGlobal,
    RotationLocal,
    StandardManipulator,
    ScaleManipulator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformActionKind {
    TogglePivotMode,
    TogglePivotRotation,
    ToggleManipulator,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformAction {
    pub kind: TransformActionKind,
    pub tooltip_text: &'static str,
    pub icon: ActionIcon,
}

#[derive(Debug, Clone)]
pub struct TransformActions {
    pivot_mode: TransformAction,
    pivot_rotation: TransformAction,
    manipulator: TransformAction,
}

impl TransformActions {
    pub fn new(pivot_mode: PivotMode, pivot_rotation: PivotRotation, manipulator: ManipulatorKind) -> Self {
        let mut actions = Self {
            pivot_mode: TransformAction {
                kind: TransformActionKind::TogglePivotMode,
                tooltip_text: "",
                icon: ActionIcon::OriginPivot,
            },
            pivot_rotation: TransformAction {
                kind: TransformActionKind::TogglePivotRotation,
                tooltip_text: "",
                icon: ActionIcon::RotationLocal,
            },
            manipulator: TransformAction {
                kind: TransformActionKind::ToggleManipulator,
                tooltip_text: "",
                icon: ActionIcon::StandardManipulator,
            },
        };
        actions.update_pivot_mode(pivot_mode);
        actions.update_pivot_rotation(pivot_rotation);
        actions.update_manipulator(manipulator);
        actions
    }

    pub fn update_pivot_mode(&mut self, mode: PivotMode) {
        let is_center = mode == PivotMode::Center;
        self.pivot_mode.tooltip_text = if is_center {
            "Manipulator at Center"
        } else {
            "Manipulator at Pivot"
        };
        self.pivot_mode.icon = if is_center {
            ActionIcon::OriginCenter
        } else {
            ActionIcon::OriginPivot
        };
    }

    /// Tooltip names the mode a click switches to
    pub fn update_pivot_rotation(&mut self, rotation: PivotRotation) {
        let is_global = rotation == PivotRotation::Global;
        self.pivot_rotation.tooltip_text = if is_global {
            "Local Rotation"
        } else {
            "Global Rotation"
        };
        self.pivot_rotation.icon = if is_global {
            ActionIcon::RotationGlobal
        } else {
            ActionIcon::RotationLocal
        };
    }

    pub fn update_manipulator(&mut self, kind: ManipulatorKind) {
        let is_standard = kind == ManipulatorKind::Standard;
        self.manipulator.tooltip_text = if is_standard {
            "Switch to Scale Manipulator"
        } else {
            "Switch to Standard Manipulator"
        };
        self.manipulator.icon = if is_standard {
            ActionIcon::ScaleManipulator
        } else {
            ActionIcon::StandardManipulator
        };
    }

    /// Actions in menu order
    pub fn list(&self) -> [&TransformAction; 3] {
        [&self.pivot_mode, &self.pivot_rotation, &self.manipulator]
    }
}
