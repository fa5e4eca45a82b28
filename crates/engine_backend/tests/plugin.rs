mod common;

use bevy_app::App;
use bevy_math::Vec3;
use common::*;
use engine_backend::subsystems::input::Endpoint;
use engine_backend::subsystems::manipulation::{EndpointInputResource, ManipulationEngineResource};
use engine_backend::{ManipulationPlugin, ManipulationSettings};

#[test]
fn test_plugin_runs_engine_each_update() {
    let mut host = TestHost::new();
    let object = host.spawn(Vec3::ZERO);
    host.hover(LEFT_RAY, object);

    let mut app = App::new();
    app.insert_resource(host)
        .add_plugins(ManipulationPlugin::<TestHost>::new(ManipulationSettings::default()));

    app.world_mut()
        .resource_mut::<EndpointInputResource>()
        .advance(Endpoint::Left, true, false);
    app.update();

    let engine = &app.world().resource::<ManipulationEngineResource>().0;
    assert_eq!(engine.held_objects(Endpoint::Left), Some(&[object][..]));

    // Move the pointer and keep holding
    app.world_mut()
        .resource_mut::<TestHost>()
        .move_ray(LEFT_RAY, Vec3::new(0.0, 2.0, 0.0));
    app.world_mut()
        .resource_mut::<EndpointInputResource>()
        .advance(Endpoint::Left, true, false);
    app.update();

    let host = app.world().resource::<TestHost>();
    assert!(host.pose_of(object).position.abs_diff_eq(Vec3::new(1.0, 2.0, 0.0), 1e-5));

    app.world_mut()
        .resource_mut::<EndpointInputResource>()
        .advance(Endpoint::Left, false, false);
    app.update();

    let engine = &app.world().resource::<ManipulationEngineResource>().0;
    assert!(engine.grab(Endpoint::Left).is_none());
}
