use async_trait::async_trait;
use dbtree_core::{NodeKey, NodeType, TreeController};
use std::sync::Mutex;
use tokio::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    Expand(String),
    Scroll(String, NodeType),
}

/// Tree controller that records every call with the (tokio) time it happened.
#[derive(Default)]
pub struct RecordingController {
    events: Mutex<Vec<(Instant, ControllerEvent)>>,
}

impl RecordingController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ControllerEvent> {
        self.timed_events().into_iter().map(|(_, e)| e).collect()
    }

    pub fn timed_events(&self) -> Vec<(Instant, ControllerEvent)> {
        self.events.lock().expect("events lock").clone()
    }

    pub fn expanded(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ControllerEvent::Expand(key) => Some(key),
                ControllerEvent::Scroll(..) => None,
            })
            .collect()
    }

    pub fn scrolled(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ControllerEvent::Scroll(key, _) => Some(key),
                ControllerEvent::Expand(_) => None,
            })
            .collect()
    }

    fn record(&self, event: ControllerEvent) {
        self.events
            .lock()
            .expect("events lock")
            .push((Instant::now(), event));
    }
}

#[async_trait]
impl TreeController for RecordingController {
    async fn expand(&self, key: &NodeKey) {
        self.record(ControllerEvent::Expand(key.to_string()));
    }

    async fn scroll_into_view(&self, key: &NodeKey, node_type: NodeType) {
        self.record(ControllerEvent::Scroll(key.to_string(), node_type));
    }
}
