//! Convenience re-exports for the common case: a store, a storage backend
//! and the action protocol in one `use`.
//!
//! ```
//! use kairo::prelude::*;
//! ```

pub use crate::actions::{
    ApplyReport, AssistantProposal, NodeRef, WorkflowAction, apply_actions, parse_actions,
    parse_assistant_reply,
};
pub use crate::error::{BatchParseError, StorageError};
pub use crate::flow::{
    FlowEdge, FlowNode, NodeConfig, NodeKind, Position, Transition, TransitionPatch,
};
pub use crate::persist::{
    BackupManager, FileStorage, FlowDocument, KeyValueStorage, MemoryStorage, clear, persist,
    rehydrate,
};
pub use crate::placement::{suggest_position, suggest_position_default};
pub use crate::store::{FlowStore, OpStatus};

/// Boxed-error result for application code that mixes error sources.
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
