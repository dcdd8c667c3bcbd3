//! Unit tests for the data model, defaults and placement helpers.
mod common;
use kairo::actions::{NodeRef, PENDING_REF_PREFIX};
use kairo::error::StorageError;
use kairo::flow::{
    NodeConfig, TransferType, Voice, default_graph, default_node_config, is_protected_id,
};
use kairo::placement::{
    MIN_NODE_DISTANCE, resolve_overlap, suggest_position, suggest_position_default,
};
use kairo::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::json;

#[test]
fn test_node_kind_wire_names() {
    assert_eq!(serde_json::to_value(NodeKind::Conversation).unwrap(), json!("conversation"));
    assert_eq!(serde_json::to_value(NodeKind::CallTransfer).unwrap(), json!("callTransfer"));
    assert_eq!(serde_json::to_value(NodeKind::PressDigit).unwrap(), json!("pressDigit"));
    assert_eq!(serde_json::to_value(NodeKind::EndCall).unwrap(), json!("endCall"));
    assert_eq!(format!("{}", NodeKind::Function), "function");
}

#[test]
fn test_default_configs_pair_outputs_with_transitions() {
    for kind in [
        NodeKind::Conversation,
        NodeKind::Function,
        NodeKind::CallTransfer,
        NodeKind::PressDigit,
        NodeKind::EndCall,
    ] {
        let config = default_node_config(kind);
        assert_eq!(
            config.output_count as usize,
            config.transitions.len(),
            "{kind} defaults must pair output_count with transitions"
        );
    }
}

#[test]
fn test_end_call_defaults_have_no_outputs() {
    let config = default_node_config(NodeKind::EndCall);
    assert_eq!(config.output_count, 0);
    assert!(config.transitions.is_empty());
    assert_eq!(config.reason.as_deref(), Some("Conversation completed"));
}

#[test]
fn test_call_transfer_defaults() {
    let config = default_node_config(NodeKind::CallTransfer);
    assert_eq!(config.transfer_type, Some(TransferType::Warm));
    assert_eq!(config.transfer_number.as_deref(), Some(""));
}

#[test]
fn test_default_graph_shape() {
    let (nodes, edges) = default_graph();
    assert_eq!(nodes.len(), 2);
    assert_eq!(edges.len(), 1);
    assert!(nodes[0].protected);
    assert_eq!(nodes[0].id, "start");
    assert_eq!(nodes[1].id, "node-1");
    assert_eq!(edges[0].source, "start");
    assert_eq!(edges[0].target, "node-1");
    assert_eq!(edges[0].source_handle.as_deref(), Some("output-0"));
}

#[test]
fn test_protected_id_policy() {
    assert!(is_protected_id("start"));
    assert!(is_protected_id("end"));
    assert!(!is_protected_id("node-1"));
    assert!(!is_protected_id("start-2"));
}

#[test]
fn test_config_patch_keeps_unknown_keys() {
    let mut config = default_node_config(NodeKind::Conversation);
    assert!(config.apply_patch(&common::patch("customField", json!("kept"))));
    assert_eq!(config.extra.get("customField"), Some(&json!("kept")));

    let round_trip: NodeConfig =
        serde_json::from_value(serde_json::to_value(&config).unwrap()).unwrap();
    assert_eq!(round_trip.extra.get("customField"), Some(&json!("kept")));
}

#[test]
fn test_config_patch_rejects_shape_violations() {
    let mut config = default_node_config(NodeKind::Conversation);
    let before = config.clone();
    assert!(!config.apply_patch(&common::patch("outputCount", json!("three"))));
    assert_eq!(config, before);
}

#[test]
fn test_voice_settings_wire_shape() {
    let config = default_node_config(NodeKind::Conversation);
    let settings = config.voice_settings.unwrap();
    assert_eq!(settings.voice, Some(Voice::Alloy));
    assert_eq!(settings.speed, Some(1.0));
    assert_eq!(
        serde_json::to_value(&settings).unwrap(),
        json!({ "voice": "alloy", "speed": 1.0 })
    );
}

#[test]
fn test_node_ref_parsing() {
    assert_eq!(NodeRef::from("node-7".to_string()), NodeRef::Literal("node-7".to_string()));
    assert_eq!(
        NodeRef::from(format!("{PENDING_REF_PREFIX}3")),
        NodeRef::Pending(3)
    );
    // Malformed placeholders stay literal and later fail to resolve.
    assert_eq!(
        NodeRef::from(format!("{PENDING_REF_PREFIX}zero")),
        NodeRef::Literal(format!("{PENDING_REF_PREFIX}zero"))
    );
    assert_eq!(
        NodeRef::from(format!("{PENDING_REF_PREFIX}0")),
        NodeRef::Literal(format!("{PENDING_REF_PREFIX}0"))
    );
}

#[test]
fn test_node_ref_resolution() {
    let created = vec!["node-4".to_string(), "node-5".to_string()];
    assert_eq!(NodeRef::Pending(1).resolve(&created), Some("node-4".to_string()));
    assert_eq!(NodeRef::Pending(2).resolve(&created), Some("node-5".to_string()));
    assert_eq!(NodeRef::Pending(3).resolve(&created), None);
    assert_eq!(NodeRef::Literal(String::new()).resolve(&created), None);
    assert_eq!(
        NodeRef::Literal("start".to_string()).resolve(&created),
        Some("start".to_string())
    );
}

#[test]
fn test_placement_near_start_when_no_user_nodes() {
    let (nodes, _) = default_graph();
    let anchors: Vec<_> = nodes.into_iter().filter(|n| n.protected).collect();
    let mut rng = StdRng::seed_from_u64(7);
    let position = suggest_position(&anchors, &mut rng);
    assert_eq!(position.x, 400.0);
    assert!((position.y - 100.0).abs() <= 50.0);
}

#[test]
fn test_placement_fallback_without_any_anchor() {
    let mut rng = StdRng::seed_from_u64(7);
    let position = suggest_position(&[], &mut rng);
    assert_eq!(position.x, 400.0);
    assert_eq!(position.y, 200.0);
}

#[test]
fn test_placement_offsets_from_centroid() {
    let store = common::create_linear_flow();
    let mut rng = StdRng::seed_from_u64(42);
    let position = suggest_position(store.nodes(), &mut rng);
    // Centroid of the two user nodes is (550, 100); the suggestion sits on a
    // 50-unit circle around it, possibly nudged off an occupied spot.
    let dx = position.x - 550.0;
    let dy = position.y - 100.0;
    assert!(dx.hypot(dy) >= MIN_NODE_DISTANCE);
    assert!(dx.hypot(dy) <= 50.0 + 20.0 + 4.0 * 15.0 + 50.0);
}

#[test]
fn test_resolve_overlap_moves_off_occupied_spot() {
    let occupied = vec![Position { x: 100.0, y: 100.0 }];
    let resolved = resolve_overlap(Position { x: 102.0, y: 100.0 }, &occupied);
    let distance = (resolved.x - 100.0).hypot(resolved.y - 100.0);
    assert!(distance >= MIN_NODE_DISTANCE);
}

#[test]
fn test_resolve_overlap_keeps_free_candidate() {
    let occupied = vec![Position { x: 100.0, y: 100.0 }];
    let candidate = Position { x: 300.0, y: 300.0 };
    let resolved = resolve_overlap(candidate, &occupied);
    assert_eq!(resolved, candidate);
}

#[test]
fn test_suggest_position_default_is_finite() {
    let store = common::create_linear_flow();
    let position = suggest_position_default(store.nodes());
    assert!(position.x.is_finite());
    assert!(position.y.is_finite());
}

#[test]
fn test_error_display() {
    let err = StorageError::Io {
        key: "flow-storage".to_string(),
        message: "permission denied".to_string(),
    };
    assert!(err.to_string().contains("flow-storage"));
    assert!(err.to_string().contains("permission denied"));

    let parse_err = kairo::error::BatchParseError::JsonParseError("expected `,`".to_string());
    assert!(parse_err.to_string().contains("expected `,`"));
}
