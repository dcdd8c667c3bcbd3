use super::node::{
    FlowEdge, FlowNode, NodeConfig, NodeKind, Position, Transition, TransferType, Voice,
    VoiceSettings,
};

/// Reserved ID of the entry anchor node.
pub const START_NODE_ID: &str = "start";
/// Reserved ID of the terminal anchor node.
pub const END_NODE_ID: &str = "end";

/// Whether an ID belongs to the reserved, non-deletable anchors.
pub fn is_protected_id(id: &str) -> bool {
    id == START_NODE_ID || id == END_NODE_ID
}

/// Builds the default configuration for a node of the given kind.
///
/// Each kind ships with a fixed transition set; `output_count` always matches
/// the transition count here, including the endCall case where both are 0.
pub fn default_node_config(kind: NodeKind) -> NodeConfig {
    let transitions = default_transitions(kind);
    let mut config = NodeConfig {
        label: default_label(kind).to_string(),
        output_count: transitions.len() as u32,
        transitions,
        delay: Some(0),
        timeout: Some(30_000),
        voice_settings: Some(VoiceSettings {
            voice: Some(Voice::Alloy),
            speed: Some(1.0),
        }),
        retry_count: Some(0),
        error_message: Some(String::new()),
        ..NodeConfig::default()
    };

    match kind {
        NodeKind::Conversation => {
            config.prompt = Some("Enter your conversation prompt here...".to_string());
        }
        NodeKind::Function => {
            config.function_code = Some(
                "function execute() {\n  // Your code here\n  return true;\n}".to_string(),
            );
            config.parameters = Some(serde_json::Map::new());
        }
        NodeKind::CallTransfer => {
            config.transfer_number = Some(String::new());
            config.transfer_type = Some(TransferType::Warm);
        }
        NodeKind::PressDigit => {
            config.pause_detection_delay = Some(2_000);
            config.max_digits = Some(1);
            config.termination_digit = Some("#".to_string());
        }
        NodeKind::EndCall => {
            config.reason = Some("Conversation completed".to_string());
        }
    }
    config
}

fn default_label(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Conversation => "Conversation",
        NodeKind::Function => "Function",
        NodeKind::CallTransfer => "Call Transfer",
        NodeKind::PressDigit => "Press Digit",
        NodeKind::EndCall => "End Call",
    }
}

fn default_transitions(kind: NodeKind) -> Vec<Transition> {
    let labels: &[&str] = match kind {
        NodeKind::Conversation => &["Continue"],
        NodeKind::Function => &["Success", "Error"],
        NodeKind::CallTransfer => &["Transfer Complete", "Transfer Failed"],
        NodeKind::PressDigit => &["Digit Pressed"],
        NodeKind::EndCall => &[],
    };
    labels
        .iter()
        .enumerate()
        .map(|(index, label)| Transition {
            id: format!("t-{}", index + 1),
            label: (*label).to_string(),
            condition: Some(String::new()),
            variable: None,
            operator: None,
            value: None,
        })
        .collect()
}

/// The default initial graph: the protected start anchor, one sample
/// conversation node and one sample edge between them.
pub fn default_graph() -> (Vec<FlowNode>, Vec<FlowEdge>) {
    let start = FlowNode {
        id: START_NODE_ID.to_string(),
        kind: NodeKind::Conversation,
        position: Position { x: 100.0, y: 100.0 },
        config: NodeConfig {
            label: "Start".to_string(),
            output_count: 1,
            transitions: vec![Transition {
                id: "start-transition".to_string(),
                label: "Begin".to_string(),
                condition: Some(String::new()),
                variable: None,
                operator: None,
                value: None,
            }],
            ..NodeConfig::default()
        },
        protected: true,
    };

    let sample = FlowNode {
        id: "node-1".to_string(),
        kind: NodeKind::Conversation,
        position: Position { x: 400.0, y: 100.0 },
        config: default_node_config(NodeKind::Conversation),
        protected: false,
    };

    let edge = FlowEdge {
        id: "edge-1".to_string(),
        source: START_NODE_ID.to_string(),
        target: "node-1".to_string(),
        source_handle: Some("output-0".to_string()),
    };

    (vec![start, sample], vec![edge])
}
