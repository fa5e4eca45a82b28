//! # Pulsar Manipulation Backend
//!
//! Multi-pointer grab, manipulate and scale engine for XR scene editing.
//! Two tracked hands can grab objects directly, pinch-scale them together,
//! or drive the indirect manipulator widget over the current selection.

pub mod logging;
pub mod settings;
pub mod subsystems;

pub use settings::{ManipulationSettings, SettingsError};
pub use subsystems::input::{ButtonState, Endpoint, EndpointInput, FrameInput, RayOrigin};
pub use subsystems::manipulation::{ManipulationEngine, ManipulationEvent, ManipulationHost, ManipulationPlugin};
