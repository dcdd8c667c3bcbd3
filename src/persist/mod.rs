//! The persistence adapter: maps the store's essential state (nodes, edges,
//! ID counter, sidebar flag) to and from a durable key-value slot and to and
//! from transportable JSON documents, reconciling IDs on every load.

mod backup;
mod storage;

pub use backup::{BACKUP_KEY, BackupManager, BackupRecord, DEFAULT_MAX_BACKUPS};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};

use crate::error::StorageError;
use crate::flow::{FlowEdge, FlowNode, default_graph};
use crate::store::{FlowStore, now_millis};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Storage key of the persisted graph.
pub const STORAGE_KEY: &str = "flow-storage";

/// The persisted document shape, shared by the durable slot and file export.
///
/// Everything but the node/edge arrays is defaulted on deserialize so that
/// documents written before a field existed still load; the ID counter in
/// particular is treated as derivable-but-cached and is recomputed from the
/// node IDs on every import.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowDocument {
    pub nodes: Vec<FlowNode>,
    pub edges: Vec<FlowEdge>,
    #[serde(default)]
    pub id_counter: u64,
    #[serde(default)]
    pub sidebar_collapsed: bool,
    #[serde(default)]
    pub timestamp: u64,
}

impl FlowDocument {
    pub fn from_store(store: &FlowStore) -> Self {
        Self {
            nodes: store.nodes().to_vec(),
            edges: store.edges().to_vec(),
            id_counter: store.id_counter(),
            sidebar_collapsed: store.sidebar_collapsed(),
            timestamp: now_millis(),
        }
    }

    /// Parses and structurally validates a document. `None` covers both
    /// malformed JSON and shape violations (missing arrays, duplicate node
    /// IDs); the caller decides user messaging.
    pub fn parse(input: &str) -> Option<Self> {
        let document: Self = serde_json::from_str(input).ok()?;
        document
            .nodes
            .iter()
            .map(|node| node.id.as_str())
            .all_unique()
            .then_some(document)
    }

    pub fn to_json(&self) -> String {
        // The document shape contains nothing serde_json can refuse.
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl FlowStore {
    /// Serializes the current graph, ID counter and sidebar flag.
    pub fn export_snapshot(&self) -> String {
        FlowDocument::from_store(self).to_json()
    }

    /// Replaces the live graph from an exported document.
    ///
    /// Returns `false` (graph untouched) on any parse or validation failure.
    /// On success, selection is cleared, the reserved anchors are re-marked
    /// protected, the ID counter is reconciled to
    /// `max(parsed, max node-<n> suffix, current)`, and a history snapshot
    /// is recorded so undo returns to the pre-import graph.
    pub fn import_snapshot(&mut self, input: &str) -> bool {
        let Some(document) = FlowDocument::parse(input) else {
            return false;
        };
        self.replace_graph(document.nodes, document.edges, document.id_counter);
        true
    }
}

/// Writes the store's state to the durable slot under [`STORAGE_KEY`].
pub fn persist(store: &FlowStore, storage: &mut dyn KeyValueStorage) -> Result<(), StorageError> {
    storage.write(STORAGE_KEY, store.export_snapshot().as_bytes())
}

/// Rebuilds a store from the durable slot.
///
/// Missing, unreadable or invalid data falls back to the default initial
/// graph — rehydration never surfaces a crash.
pub fn rehydrate(storage: &dyn KeyValueStorage) -> FlowStore {
    let Ok(Some(bytes)) = storage.read(STORAGE_KEY) else {
        return FlowStore::new();
    };
    let Ok(text) = String::from_utf8(bytes) else {
        return FlowStore::new();
    };
    match FlowDocument::parse(&text) {
        Some(document) => FlowStore::from_parts(
            document.nodes,
            document.edges,
            document.id_counter,
            document.sidebar_collapsed,
        ),
        None => FlowStore::new(),
    }
}

/// Resets the store to the default initial graph and wipes the durable slot.
pub fn clear(store: &mut FlowStore, storage: &mut dyn KeyValueStorage) -> Result<(), StorageError> {
    let (nodes, edges) = default_graph();
    store.replace_graph(nodes, edges, 1);
    store.set_sidebar_collapsed(false);
    storage.remove(STORAGE_KEY)
}
