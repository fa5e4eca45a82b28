mod common;

use bevy_math::Vec3;
use common::*;
use engine_backend::subsystems::input::{Endpoint, FrameInput};
use engine_backend::subsystems::manipulation::ManipulationEngine;
use engine_backend::EndpointInput;
use proptest::prelude::*;

#[derive(Debug, Clone, Copy)]
struct Step {
    left_select: bool,
    left_cancel: bool,
    right_select: bool,
    right_cancel: bool,
    /// Which of the two objects each pointer touches, if any
    left_hover: Option<usize>,
    right_hover: Option<usize>,
    right_x: f32,
}

fn step() -> impl Strategy<Value = Step> {
    (
        any::<bool>(),
        prop::bool::weighted(0.1),
        any::<bool>(),
        prop::bool::weighted(0.1),
        prop::option::of(0..2usize),
        prop::option::of(0..2usize),
        -2.0f32..4.0,
    )
        .prop_map(
            |(left_select, left_cancel, right_select, right_cancel, left_hover, right_hover, right_x)| Step {
                left_select,
                left_cancel,
                right_select,
                right_cancel,
                left_hover,
                right_hover,
                right_x,
            },
        )
}

proptest! {
    #[test]
    fn prop_records_stay_per_endpoint_and_disjoint_outside_scaling(
        steps in prop::collection::vec(step(), 1..40),
        selection in prop::option::of(0..3usize),
    ) {
        let mut engine = ManipulationEngine::default();
        let events = engine.subscribe();
        let mut host = TestHost::new();
        let objects = [
            host.spawn(Vec3::ZERO),
            host.spawn(Vec3::new(0.0, 2.0, 0.0)),
            host.spawn(Vec3::new(0.0, 5.0, 0.0)),
        ];
        // The third object is never hovered and only joins a grab through the selection
        if let Some(i) = selection {
            host.state.select([objects[i]], None);
        }
        let mut hands = [EndpointInput::default(); 2];

        for step in steps {
            hands[0] = hands[0].advance(step.left_select, step.left_cancel);
            hands[1] = hands[1].advance(step.right_select, step.right_cancel);

            host.unhover(LEFT_RAY);
            host.unhover(RIGHT_RAY);
            if let Some(i) = step.left_hover {
                host.hover(LEFT_RAY, objects[i]);
            }
            if let Some(i) = step.right_hover {
                host.hover(RIGHT_RAY, objects[i]);
            }
            host.move_ray(RIGHT_RAY, Vec3::new(step.right_x, 0.0, 0.0));

            let frame = FrameInput::new(DT)
                .with(Endpoint::Left, hands[0])
                .with(Endpoint::Right, hands[1]);
            engine.process_input(&mut host, &frame);

            for hand in Endpoint::HANDS {
                if let Some(record) = engine.grab(hand) {
                    prop_assert_eq!(record.endpoint(), hand);
                    prop_assert!(!record.objects().is_empty());
                }
            }

            if let (Some(left), Some(right)) = (engine.grab(Endpoint::Left), engine.grab(Endpoint::Right)) {
                let shared = left.objects().iter().any(|o| right.contains(*o));
                prop_assert!(!shared || engine.scale_state().active);
            }

            // Never a manipulator over a direct grab
            if engine.has_any_grab() {
                prop_assert!(!engine.current_manipulator().active);
            }
        }

        // Every drop matches an earlier grab
        let mut held = 0i32;
        for event in events.try_iter() {
            match event {
                engine_backend::ManipulationEvent::ObjectsGrabbed { .. } => held += 1,
                engine_backend::ManipulationEvent::ObjectsDropped { .. } => held -= 1,
                engine_backend::ManipulationEvent::ObjectsTransferred { .. } => {}
            }
            prop_assert!(held >= 0);
        }
    }
}
