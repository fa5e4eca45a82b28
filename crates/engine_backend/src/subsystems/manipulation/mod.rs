//! Manipulation
//!
//! Direct grabbing, two-handed scaling and the indirect manipulator for
//! every tracked endpoint. [`ManipulationEngine`] owns all grab state and is
//! driven once per frame; scene, selection, undo, snapping and feedback live
//! behind the [`services`] traits.

pub mod actions;
pub mod engine;
pub mod events;
pub mod feedback;
pub mod grab;
pub mod manipulator;
pub mod plugin;
pub mod services;

pub use actions::{ActionIcon, TransformAction, TransformActionKind, TransformActions};
pub use engine::{ManipulationEngine, TwoHandedScale};
pub use events::{EventBroadcaster, ManipulationEvent, ManipulationEventReceiver};
pub use feedback::{BindingTable, FeedbackRequest, FeedbackTracker, HapticPulse, InputControl};
pub use grab::{DirectFollowRates, GrabOffset, GrabRecord};
pub use manipulator::{AxisFlags, ManipulatorKind, ManipulatorWidget, PivotMode, PivotRotation, PivotState};
pub use plugin::{EndpointInputResource, ManipulationEngineResource, ManipulationPlugin};
pub use services::{
    DirectHover, DirectSelectionProvider, FeedbackSink, ManipulationHost, MenuVisibility, RayOriginProvider,
    RayVisibility, SelectionCandidateResolver, SelectionStore, SnapProvider, UndoLog,
};
