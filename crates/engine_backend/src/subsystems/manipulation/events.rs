//! Manipulation events
//!
//! Structural changes (grab, drop, transfer) are broadcast to every
//! subscriber during the frame they happen in.

use engine_state::ObjectId;

use crate::subsystems::input::RayOrigin;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManipulationEvent {
    ObjectsGrabbed {
        ray_origin: RayOrigin,
        objects: Vec<ObjectId>,
    },
    ObjectsDropped {
        ray_origin: RayOrigin,
        objects: Vec<ObjectId>,
    },
    /// Held objects now follow a different pointer
    ObjectsTransferred { from: RayOrigin, to: RayOrigin },
}

pub type ManipulationEventSender = flume::Sender<ManipulationEvent>;
pub type ManipulationEventReceiver = flume::Receiver<ManipulationEvent>;

/// Fan-out of events to any number of subscribers
#[derive(Debug, Default)]
pub struct EventBroadcaster {
    subscribers: Vec<ManipulationEventSender>,
}

impl EventBroadcaster {
    pub fn subscribe(&mut self) -> ManipulationEventReceiver {
        let (sender, receiver) = flume::unbounded();
        self.subscribers.push(sender);
        receiver
    }

    /// Send to every live subscriber, forgetting those that hung up
    pub fn emit(&mut self, event: ManipulationEvent) {
        tracing::trace!(?event, subscribers = self.subscribers.len(), "Manipulation event");
        self.subscribers.retain(|s| s.send(event.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
