//! Bevy integration
//!
//! Runs the engine once per `Update` with the host stored as a resource.
//! The XR input layer writes [`EndpointInputResource`] before `Update`.

use bevy_app::{App, Plugin, Update};
use bevy_ecs::prelude::*;
use bevy_time::Time;
use std::marker::PhantomData;

use super::engine::ManipulationEngine;
use super::services::ManipulationHost;
use crate::settings::ManipulationSettings;
use crate::subsystems::input::{Endpoint, FrameInput};

#[derive(Resource)]
pub struct ManipulationEngineResource(pub ManipulationEngine);

/// Latest button state per endpoint
#[derive(Resource, Default, Debug, Clone)]
pub struct EndpointInputResource(pub FrameInput);

impl EndpointInputResource {
    /// Advance one endpoint's buttons from raw "is down" samples
    pub fn advance(&mut self, endpoint: Endpoint, select_down: bool, cancel_down: bool) {
        let next = self.0.endpoint(endpoint).advance(select_down, cancel_down);
        self.0.set(endpoint, next);
    }
}

pub struct ManipulationPlugin<H> {
    settings: ManipulationSettings,
    _host: PhantomData<fn() -> H>,
}

impl<H> ManipulationPlugin<H> {
    pub fn new(settings: ManipulationSettings) -> Self {
        Self {
            settings,
            _host: PhantomData,
        }
    }
}

impl<H> Default for ManipulationPlugin<H> {
    fn default() -> Self {
        Self::new(ManipulationSettings::default())
    }
}

impl<H: ManipulationHost + Resource> Plugin for ManipulationPlugin<H> {
    fn build(&self, app: &mut App) {
        tracing::debug!(pivot_mode = ?self.settings.pivot_mode, "Building manipulation plugin");
        app.insert_resource(ManipulationEngineResource(ManipulationEngine::new(&self.settings)))
            .init_resource::<EndpointInputResource>()
            .add_systems(Update, manipulation_frame_system::<H>);
    }
}

/// Frame delta comes from `Time` when the app has it, otherwise from the input resource
pub fn manipulation_frame_system<H: ManipulationHost + Resource>(
    time: Option<Res<Time>>,
    input: Res<EndpointInputResource>,
    mut host: ResMut<H>,
    mut engine: ResMut<ManipulationEngineResource>,
) {
    let mut frame = input.0.clone();
    if let Some(time) = time {
        frame.delta_time = time.delta_secs();
    }
    engine.0.process_input(&mut *host, &frame);
}
