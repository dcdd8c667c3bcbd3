//! Common test utilities for building flows, patches and action batches.
use kairo::prelude::*;
use serde_json::{Map, Value, json};

/// A store with two user nodes connected behind the start anchor:
/// `start -> node-2 -> node-3`.
#[allow(dead_code)]
pub fn create_linear_flow() -> FlowStore {
    let mut store = FlowStore::new();
    let a = store.create_node(NodeKind::Conversation, Position { x: 400.0, y: 100.0 });
    let b = store.create_node(NodeKind::EndCall, Position { x: 700.0, y: 100.0 });
    store.connect("start", &a, Some("output-0"));
    store.connect(&a, &b, Some("output-0"));
    store
}

/// A single-key config patch object.
#[allow(dead_code)]
pub fn patch(key: &str, value: Value) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert(key.to_string(), value);
    map
}

/// A batch that creates two connected nodes, referencing the second one
/// through a pending placeholder.
#[allow(dead_code)]
pub fn create_and_connect_batch() -> String {
    json!([
        {
            "type": "CREATE_NODE",
            "nodeType": "conversation",
            "position": { "x": 400.0, "y": 200.0 },
            "config": { "label": "Ask intent", "prompt": "How can I help?" }
        },
        {
            "type": "CREATE_NODE",
            "nodeType": "endCall",
            "position": { "x": 700.0, "y": 200.0 }
        },
        {
            "type": "CREATE_CONNECTION",
            "sourceId": "LAST_CREATED_NODE_1",
            "targetId": "LAST_CREATED_NODE_2"
        }
    ])
    .to_string()
}

/// An assistant reply carrying an explanation and a fenced action batch.
#[allow(dead_code)]
pub fn assistant_reply() -> String {
    format!(
        "HUMAN_EXPLANATION:\nI added a greeting step and wired it to a hang-up.\n\nACTIONS:\n```json\n{}\n```",
        create_and_connect_batch()
    )
}
