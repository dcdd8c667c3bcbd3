//! The graph data model: typed nodes, edges, transitions and the per-kind
//! default configuration factories.

mod defaults;
mod node;

pub use defaults::{
    END_NODE_ID, START_NODE_ID, default_graph, default_node_config, is_protected_id,
};
pub use node::{
    CompareOp, FlowEdge, FlowNode, NodeConfig, NodeKind, Position, TransferType, Transition,
    TransitionPatch, Voice, VoiceSettings,
};
