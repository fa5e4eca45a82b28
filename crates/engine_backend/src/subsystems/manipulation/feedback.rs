//! Controller feedback requests
//!
//! Tooltips and highlights shown on the physical controls bound to a logical
//! action. Requests are tracked per purpose (grab, scale) so they can be
//! revoked together.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::services::FeedbackSink;
use crate::subsystems::input::Endpoint;

/// Physical control on a tracked controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum InputControl {
    Trigger1,
    Trigger2,
    Action1,
    Action2,
    LeftStickButton,
}

/// Logical action name -> bound physical controls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BindingTable(BTreeMap<String, Vec<InputControl>>);

impl BindingTable {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn bind(mut self, action: impl Into<String>, controls: impl IntoIterator<Item = InputControl>) -> Self {
        self.0.entry(action.into()).or_default().extend(controls);
        self
    }

    pub fn controls(&self, action: &str) -> Option<&[InputControl]> {
        self.0.get(action).map(Vec::as_slice)
    }
}

impl Default for BindingTable {
    fn default() -> Self {
        Self::new()
            .bind(SELECT_ACTION, [InputControl::Trigger1])
            .bind(CANCEL_ACTION, [InputControl::Trigger2])
    }
}

pub const SELECT_ACTION: &str = "Select";
pub const CANCEL_ACTION: &str = "Cancel";

#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackRequest {
    pub endpoint: Endpoint,
    pub control: InputControl,
    pub tooltip_text: Option<String>,
    pub priority: i32,
    /// Hide other feedback already shown on the same control
    pub suppress_existing: bool,
}

/// Haptic pulse sent to a controller
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HapticPulse {
    /// Seconds
    pub duration: f32,
    /// 0..=1
    pub intensity: f32,
}

/// Outstanding requests for one purpose
#[derive(Debug, Default)]
pub struct FeedbackTracker {
    requests: Vec<FeedbackRequest>,
}

impl FeedbackTracker {
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn requests(&self) -> &[FeedbackRequest] {
        &self.requests
    }

    /// Issue one request per control bound to `action`.
    ///
    /// Unbound actions issue nothing. A control that already has a tracked
    /// request for the same endpoint is skipped, so repeated calls are idempotent.
    pub fn show<S: FeedbackSink + ?Sized>(
        &mut self,
        sink: &mut S,
        bindings: &BindingTable,
        action: &str,
        tooltip_text: Option<&str>,
        endpoint: Endpoint,
        priority: i32,
        suppress_existing: bool,
    ) {
        let Some(controls) = bindings.controls(action) else {
            tracing::trace!(action, "No controls bound, skipping feedback");
            return;
        };

        for &control in controls {
            let already_shown = self
                .requests
                .iter()
                .any(|r| r.endpoint == endpoint && r.control == control);
            if already_shown {
                continue;
            }

            let request = FeedbackRequest {
                endpoint,
                control,
                tooltip_text: tooltip_text.map(str::to_string),
                priority,
                suppress_existing,
            };
            sink.add_feedback_request(&request);
            self.requests.push(request);
        }
    }

    /// Revoke every tracked request
    pub fn hide<S: FeedbackSink + ?Sized>(&mut self, sink: &mut S) {
        for request in self.requests.drain(..) {
            sink.remove_feedback_request(&request);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingSink {
        shown: Vec<FeedbackRequest>,
        removed: usize,
    }

    impl FeedbackSink for RecordingSink {
        fn add_feedback_request(&mut self, request: &FeedbackRequest) {
            self.shown.push(request.clone());
        }

        fn remove_feedback_request(&mut self, request: &FeedbackRequest) {
            self.shown.retain(|r| r != request);
            self.removed += 1;
        }
    }

    #[test]
    fn test_show_is_idempotent() {
        let mut sink = RecordingSink::default();
        let mut tracker = FeedbackTracker::default();
        let bindings = BindingTable::default();

        for _ in 0..3 {
            tracker.show(&mut sink, &bindings, "Select", Some("Scale"), Endpoint::Left, 1, false);
        }

        assert_eq!(sink.shown.len(), 1);
        assert_eq!(sink.shown[0].tooltip_text.as_deref(), Some("Scale"));
        assert_eq!(sink.shown[0].control, InputControl::Trigger1);
    }

    #[test]
    fn test_hide_revokes_everything_once() {
        let mut sink = RecordingSink::default();
        let mut tracker = FeedbackTracker::default();
        let bindings = BindingTable::default();

        tracker.show(&mut sink, &bindings, "Cancel", Some("Cancel"), Endpoint::Right, 1, false);
        tracker.show(&mut sink, &bindings, "Select", None, Endpoint::Right, 1, true);
        tracker.hide(&mut sink);
        tracker.hide(&mut sink);

        assert!(sink.shown.is_empty());
        assert_eq!(sink.removed, 2);
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_missing_binding_issues_nothing() {
        let mut sink = RecordingSink::default();
        let mut tracker = FeedbackTracker::default();

        tracker.show(&mut sink, &BindingTable::new(), "Select", None, Endpoint::Left, 1, false);

        assert!(sink.shown.is_empty());
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_multiple_controls_per_action() {
        let mut sink = RecordingSink::default();
        let mut tracker = FeedbackTracker::default();
        let bindings = BindingTable::new().bind("Select", [InputControl::Trigger1, InputControl::Action1]);

        tracker.show(&mut sink, &bindings, "Select", None, Endpoint::Left, 1, false);
        tracker.show(&mut sink, &bindings, "Select", None, Endpoint::Right, 1, false);

        assert_eq!(tracker.requests().len(), 4);
    }
}
