//! Shared helpers for the tree property suite

#![allow(dead_code)]

use cfgtree::{ConfigNode, RawValue, Visitor};
use std::convert::Infallible;
use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Route engine logs to the test harness (visible with `--nocapture`).
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_test_writer()
            .try_init();
    });
}

/// Fresh default root holding `json`
pub fn tree(json: serde_json::Value) -> ConfigNode {
    init_tracing();
    let root = ConfigNode::new_root();
    root.set(RawValue::from(json)).unwrap();
    root
}

/// Raw value built from JSON, for comparisons
pub fn raw(json: serde_json::Value) -> RawValue {
    RawValue::from(json)
}

/// Records visitor events as `event(path)` strings
#[derive(Default)]
pub struct EventRecorder {
    events: Vec<String>,
}

impl EventRecorder {
    fn record(&mut self, event: &str, node: &ConfigNode) -> Result<(), Infallible> {
        let path = node.path().to_string();
        let label = if path.is_empty() { "root".to_string() } else { path };
        self.events.push(format!("{}({})", event, label));
        Ok(())
    }
}

impl Visitor for EventRecorder {
    type Output = Vec<String>;
    type Error = Infallible;

    fn begin_visit(&mut self, root: &ConfigNode) -> Result<(), Infallible> {
        self.record("begin_visit", root)
    }

    fn enter_node(&mut self, node: &ConfigNode) -> Result<(), Infallible> {
        self.record("enter_node", node)
    }

    fn enter_mapping_node(&mut self, node: &ConfigNode) -> Result<(), Infallible> {
        self.record("enter_mapping_node", node)
    }

    fn enter_list_node(&mut self, node: &ConfigNode) -> Result<(), Infallible> {
        self.record("enter_list_node", node)
    }

    fn enter_scalar_node(&mut self, node: &ConfigNode) -> Result<(), Infallible> {
        self.record("enter_scalar_node", node)
    }

    fn exit_mapping_node(&mut self, node: &ConfigNode) -> Result<(), Infallible> {
        self.record("exit_mapping_node", node)
    }

    fn exit_list_node(&mut self, node: &ConfigNode) -> Result<(), Infallible> {
        self.record("exit_list_node", node)
    }

    fn end_visit(&mut self) -> Result<Vec<String>, Infallible> {
        self.events.push("end_visit".to_string());
        Ok(std::mem::take(&mut self.events))
    }
}

/// Visitor events for `node`, without the begin/end bookends
pub fn node_events(node: &ConfigNode) -> Vec<String> {
    let mut events = match node.visit(&mut EventRecorder::default()) {
        Ok(events) => events,
        Err(never) => match never {},
    };
    events.remove(0);
    events.pop();
    events
}
