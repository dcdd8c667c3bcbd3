//! Tests for the action batch protocol: parsing, placeholder resolution and
//! non-atomic application.
mod common;
use kairo::actions::{apply_actions, parse_actions, parse_assistant_reply};
use kairo::prelude::*;
use serde_json::json;

#[test]
fn test_parse_rejects_malformed_batch() {
    assert!(parse_actions("not json").is_err());
    assert!(parse_actions(r#"[{"type": "DANCE"}]"#).is_err());
    assert!(parse_actions(r#"{"type": "CREATE_NODE"}"#).is_err());
}

#[test]
fn test_create_and_connect_with_placeholders() {
    let mut store = FlowStore::new();
    let actions = parse_actions(&common::create_and_connect_batch()).unwrap();
    let report = apply_actions(&mut store, &actions);

    assert_eq!(report.created_node_ids, vec!["node-2", "node-3"]);
    assert_eq!(report.applied, 3);
    assert_eq!(report.skipped, 0);

    let greeting = store.node("node-2").unwrap();
    assert_eq!(greeting.kind, NodeKind::Conversation);
    assert_eq!(greeting.config.label, "Ask intent");
    assert_eq!(greeting.config.prompt.as_deref(), Some("How can I help?"));

    assert!(store
        .edges()
        .iter()
        .any(|e| e.source == "node-2" && e.target == "node-3"));
}

#[test]
fn test_connections_resolve_nodes_created_later_in_batch() {
    // The connection appears before its target's creation; the creation
    // pass runs first, so the placeholder still resolves.
    let batch = json!([
        {
            "type": "CREATE_CONNECTION",
            "sourceId": "start",
            "targetId": "LAST_CREATED_NODE_1"
        },
        {
            "type": "CREATE_NODE",
            "nodeType": "conversation",
            "position": { "x": 400.0, "y": 300.0 }
        }
    ])
    .to_string();

    let mut store = FlowStore::new();
    let actions = parse_actions(&batch).unwrap();
    let report = apply_actions(&mut store, &actions);

    assert_eq!(report.applied, 2);
    assert_eq!(report.skipped, 0);
    assert!(store
        .edges()
        .iter()
        .any(|e| e.source == "start" && e.target == report.created_node_ids[0]));
}

#[test]
fn test_unresolved_and_self_loop_actions_are_skipped() {
    let batch = json!([
        {
            "type": "CREATE_NODE",
            "nodeType": "function",
            "position": { "x": 400.0, "y": 200.0 }
        },
        // Out-of-range placeholder.
        {
            "type": "CREATE_CONNECTION",
            "sourceId": "start",
            "targetId": "LAST_CREATED_NODE_9"
        },
        // Self loop.
        {
            "type": "CREATE_CONNECTION",
            "sourceId": "LAST_CREATED_NODE_1",
            "targetId": "LAST_CREATED_NODE_1"
        },
        // Lands despite the two skips before it.
        {
            "type": "CREATE_CONNECTION",
            "sourceId": "start",
            "targetId": "LAST_CREATED_NODE_1"
        }
    ])
    .to_string();

    let mut store = FlowStore::new();
    let edges_before = store.edges().len();
    let actions = parse_actions(&batch).unwrap();
    let report = apply_actions(&mut store, &actions);

    assert_eq!(report.applied, 2);
    assert_eq!(report.skipped, 2);
    assert_eq!(store.edges().len(), edges_before + 1);
}

#[test]
fn test_update_action_on_missing_node_is_skipped() {
    let batch = json!([
        {
            "type": "UPDATE_NODE",
            "nodeId": "node-404",
            "updates": { "label": "Ghost" }
        }
    ])
    .to_string();

    let mut store = FlowStore::new();
    let actions = parse_actions(&batch).unwrap();
    let report = apply_actions(&mut store, &actions);
    assert_eq!(report.applied, 0);
    assert_eq!(report.skipped, 1);
}

#[test]
fn test_add_transition_action_sets_label_and_condition() {
    let batch = json!([
        {
            "type": "ADD_TRANSITION",
            "nodeId": "node-1",
            "label": "Caller is angry",
            "condition": "sentiment == negative"
        }
    ])
    .to_string();

    let mut store = FlowStore::new();
    let actions = parse_actions(&batch).unwrap();
    let report = apply_actions(&mut store, &actions);
    assert_eq!(report.applied, 1);

    let config = &store.node("node-1").unwrap().config;
    assert_eq!(config.transitions.len(), 2);
    assert_eq!(config.output_count, 2);
    let added = config.transitions.last().unwrap();
    assert_eq!(added.label, "Caller is angry");
    assert_eq!(added.condition.as_deref(), Some("sentiment == negative"));
}

#[test]
fn test_batch_application_is_not_atomic() {
    let batch = json!([
        {
            "type": "CREATE_NODE",
            "nodeType": "conversation",
            "position": { "x": 400.0, "y": 200.0 }
        },
        {
            "type": "ADD_TRANSITION",
            "nodeId": "node-404",
            "label": "never lands"
        }
    ])
    .to_string();

    let mut store = FlowStore::new();
    let actions = parse_actions(&batch).unwrap();
    let report = apply_actions(&mut store, &actions);

    // The failed transition does not roll back the created node.
    assert_eq!(report.applied, 1);
    assert_eq!(report.skipped, 1);
    assert_eq!(store.nodes().len(), 3);
}

#[test]
fn test_describe_lines() {
    let actions = parse_actions(&common::create_and_connect_batch()).unwrap();
    assert_eq!(actions[0].describe(), "Create conversation node at (400, 200)");
    assert_eq!(
        actions[2].describe(),
        "Connect LAST_CREATED_NODE_1 -> LAST_CREATED_NODE_2"
    );
}

#[test]
fn test_parse_assistant_reply_with_fenced_actions() {
    let proposal = parse_assistant_reply(&common::assistant_reply()).unwrap();
    assert_eq!(
        proposal.explanation,
        "I added a greeting step and wired it to a hang-up."
    );
    assert_eq!(proposal.actions.len(), 3);
}

#[test]
fn test_parse_assistant_reply_without_fence() {
    let reply = format!(
        "HUMAN_EXPLANATION: adds one node.\nACTIONS: {}",
        json!([{
            "type": "CREATE_NODE",
            "nodeType": "endCall",
            "position": { "x": 10.0, "y": 20.0 }
        }])
    );
    let proposal = parse_assistant_reply(&reply).unwrap();
    assert_eq!(proposal.explanation, "adds one node.");
    assert_eq!(proposal.actions.len(), 1);
}

#[test]
fn test_plain_chat_reply_has_no_proposal() {
    assert!(parse_assistant_reply("Sure, what would you like to change?").is_none());
    assert!(parse_assistant_reply("ACTIONS: [] then HUMAN_EXPLANATION: backwards").is_none());
    assert!(
        parse_assistant_reply("HUMAN_EXPLANATION: text\nACTIONS: not a json array").is_none()
    );
}

#[test]
fn test_action_round_trip_keeps_wire_tags() {
    let actions = parse_actions(&common::create_and_connect_batch()).unwrap();
    let value = serde_json::to_value(&actions).unwrap();
    assert_eq!(value[0]["type"], "CREATE_NODE");
    assert_eq!(value[2]["type"], "CREATE_CONNECTION");
    assert_eq!(value[2]["sourceId"], "LAST_CREATED_NODE_1");
}
