//! The action application protocol: an ordered list of externally authored
//! edit actions, applied against the graph store. Batches come from direct
//! programmatic callers and from an LLM-driven assistant whose output is
//! untrusted, structurally loose JSON.

mod apply;

pub use apply::{ApplyReport, apply_actions};

use crate::error::BatchParseError;
use crate::flow::{NodeKind, Position};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The string prefix of a pending-node reference in the wire format.
pub const PENDING_REF_PREFIX: &str = "LAST_CREATED_NODE_";

/// A reference to a node inside an action batch.
///
/// Either a literal node ID, or a 1-based ordinal pointing at a node the same
/// batch creates (`LAST_CREATED_NODE_<k>` on the wire). Malformed tokens stay
/// literal and simply fail to resolve, which the applier treats as a skip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeRef {
    Literal(String),
    Pending(usize),
}

impl NodeRef {
    /// Resolves against the batch's creation table; `None` for empty
    /// literals and out-of-range ordinals.
    pub fn resolve(&self, created_node_ids: &[String]) -> Option<String> {
        match self {
            NodeRef::Literal(id) if id.is_empty() => None,
            NodeRef::Literal(id) => Some(id.clone()),
            NodeRef::Pending(ordinal) => created_node_ids.get(ordinal - 1).cloned(),
        }
    }
}

impl From<String> for NodeRef {
    fn from(raw: String) -> Self {
        match raw
            .strip_prefix(PENDING_REF_PREFIX)
            .and_then(|suffix| suffix.parse::<usize>().ok())
        {
            Some(ordinal) if ordinal >= 1 => NodeRef::Pending(ordinal),
            _ => NodeRef::Literal(raw),
        }
    }
}

impl From<NodeRef> for String {
    fn from(reference: NodeRef) -> Self {
        match reference {
            NodeRef::Literal(id) => id,
            NodeRef::Pending(ordinal) => format!("{PENDING_REF_PREFIX}{ordinal}"),
        }
    }
}

/// One edit action in the external batch schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WorkflowAction {
    #[serde(rename = "CREATE_NODE", rename_all = "camelCase")]
    CreateNode {
        node_type: NodeKind,
        position: Position,
        /// Caller-supplied fields merged onto the node right after creation,
        /// overriding the kind defaults.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        config: Option<Map<String, Value>>,
    },
    #[serde(rename = "UPDATE_NODE", rename_all = "camelCase")]
    UpdateNode {
        node_id: NodeRef,
        #[serde(default)]
        updates: Map<String, Value>,
    },
    #[serde(rename = "CREATE_CONNECTION", rename_all = "camelCase")]
    CreateConnection { source_id: NodeRef, target_id: NodeRef },
    #[serde(rename = "ADD_TRANSITION", rename_all = "camelCase")]
    AddTransition {
        node_id: NodeRef,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        condition: Option<String>,
    },
}

impl WorkflowAction {
    /// One-line summary for the review list shown to the user before a batch
    /// is applied.
    pub fn describe(&self) -> String {
        match self {
            WorkflowAction::CreateNode {
                node_type,
                position,
                ..
            } => format!(
                "Create {} node at ({}, {})",
                node_type, position.x, position.y
            ),
            WorkflowAction::UpdateNode { node_id, .. } => {
                format!("Update node {}", String::from(node_id.clone()))
            }
            WorkflowAction::CreateConnection {
                source_id,
                target_id,
            } => format!(
                "Connect {} -> {}",
                String::from(source_id.clone()),
                String::from(target_id.clone())
            ),
            WorkflowAction::AddTransition { node_id, label, .. } => format!(
                "Add transition \"{}\" to {}",
                label.as_deref().unwrap_or(""),
                String::from(node_id.clone())
            ),
        }
    }
}

/// Parses a JSON array of actions.
pub fn parse_actions(input: &str) -> Result<Vec<WorkflowAction>, BatchParseError> {
    serde_json::from_str(input).map_err(|e| BatchParseError::JsonParseError(e.to_string()))
}

/// A parsed assistant reply: the human-readable explanation plus the
/// proposed action batch. The caller is responsible for surfacing both to
/// the user and offering apply/reject before anything touches the store.
#[derive(Debug, Clone)]
pub struct AssistantProposal {
    pub explanation: String,
    pub actions: Vec<WorkflowAction>,
}

const EXPLANATION_MARKER: &str = "HUMAN_EXPLANATION:";
const ACTIONS_MARKER: &str = "ACTIONS:";

/// Extracts a proposal from the assistant's free-text reply contract:
/// a `HUMAN_EXPLANATION:` section followed by an `ACTIONS:` section holding
/// a JSON array, optionally inside a fenced code block. `None` when either
/// section is missing or the array does not parse — the reply is then plain
/// chat with nothing to apply.
pub fn parse_assistant_reply(content: &str) -> Option<AssistantProposal> {
    let explanation_at = content.find(EXPLANATION_MARKER)?;
    let actions_at = content.find(ACTIONS_MARKER)?;
    if actions_at < explanation_at {
        return None;
    }

    let explanation = content[explanation_at + EXPLANATION_MARKER.len()..actions_at]
        .trim()
        .to_string();
    let actions_text = strip_code_fence(&content[actions_at + ACTIONS_MARKER.len()..]);
    let actions = parse_actions(actions_text).ok()?;

    Some(AssistantProposal {
        explanation,
        actions,
    })
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}
