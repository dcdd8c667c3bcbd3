use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// The five node types understood by the call-flow editor.
///
/// The kind of a node is fixed at creation time; only its configuration can
/// change afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    #[serde(rename = "conversation")]
    Conversation,
    #[serde(rename = "function")]
    Function,
    #[serde(rename = "callTransfer")]
    CallTransfer,
    #[serde(rename = "pressDigit")]
    PressDigit,
    #[serde(rename = "endCall")]
    EndCall,
}

impl NodeKind {
    /// The wire name used in persisted documents and action batches.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Conversation => "conversation",
            NodeKind::Function => "function",
            NodeKind::CallTransfer => "callTransfer",
            NodeKind::PressDigit => "pressDigit",
            NodeKind::EndCall => "endCall",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A canvas coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Comparison operator available on a transition condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareOp {
    #[serde(rename = "=")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = "<")]
    SmallerThan,
    #[serde(rename = "contains")]
    Contains,
    #[serde(rename = "exists")]
    Exists,
}

/// A named, conditioned exit path owned by a node.
///
/// Ordering is significant: the transition at index `i` corresponds to output
/// slot `i` on the node. Transitions are exclusively owned by their parent
/// node and are never shared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transition {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<CompareOp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// A partial update merged onto one transition; `None` fields are left alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionPatch {
    pub label: Option<String>,
    pub condition: Option<String>,
    pub variable: Option<String>,
    pub operator: Option<CompareOp>,
    pub value: Option<String>,
}

impl TransitionPatch {
    pub fn apply_to(&self, transition: &mut Transition) {
        if let Some(label) = &self.label {
            transition.label = label.clone();
        }
        if let Some(condition) = &self.condition {
            transition.condition = Some(condition.clone());
        }
        if let Some(variable) = &self.variable {
            transition.variable = Some(variable.clone());
        }
        if let Some(operator) = self.operator {
            transition.operator = Some(operator);
        }
        if let Some(value) = &self.value {
            transition.value = Some(value.clone());
        }
    }
}

/// Text-to-speech voice selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Voice {
    Alloy,
    Echo,
    Fable,
    Onyx,
    Nova,
    Shimmer,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice: Option<Voice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
}

/// Whether a call transfer hands off with or without an announcement first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferType {
    Warm,
    Cold,
}

/// Per-node configuration: shared fields plus the type-specific ones.
///
/// `output_count` is a stored field rather than derived from
/// `transitions.len()`, because external callers override it directly (an
/// endCall config forces it to 0). The transition operations on the store are
/// responsible for keeping the pair consistent.
///
/// Unknown keys coming from externally authored configs are retained in
/// `extra` rather than rejected; the only validation applied to such configs
/// is structural shape.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeConfig {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub output_count: u32,
    #[serde(default)]
    pub transitions: Vec<Transition>,

    // Shared timing/voice/retry settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_settings: Option<VoiceSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    // Conversation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,

    // Function.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Map<String, Value>>,

    // Call transfer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transfer_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transfer_type: Option<TransferType>,

    // Press digit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pause_detection_delay: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_digits: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub termination_digit: Option<String>,

    // End call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NodeConfig {
    /// Shallow-merges a JSON object onto this config, key by key.
    ///
    /// Returns `false` and leaves the config untouched when the merged object
    /// no longer deserializes into a config (for example a string where a
    /// number is expected). Keys the config does not know land in `extra`.
    pub fn apply_patch(&mut self, patch: &Map<String, Value>) -> bool {
        let mut merged = match serde_json::to_value(&self) {
            Ok(Value::Object(map)) => map,
            _ => return false,
        };
        for (key, value) in patch {
            merged.insert(key.clone(), value.clone());
        }
        match serde_json::from_value(Value::Object(merged)) {
            Ok(next) => {
                *self = next;
                true
            }
            Err(_) => false,
        }
    }
}

/// A typed unit of the call-flow graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowNode {
    pub id: String,
    pub kind: NodeKind,
    pub position: Position,
    pub config: NodeConfig,
    /// Protected nodes (the start/terminal anchors) refuse deletion.
    #[serde(default)]
    pub protected: bool,
}

/// A directed connection from one node's output slot to another node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub source_handle: Option<String>,
}
