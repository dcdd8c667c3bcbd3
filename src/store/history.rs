use crate::flow::{FlowEdge, FlowNode};
use std::time::{SystemTime, UNIX_EPOCH};

/// Maximum number of retained snapshots; the oldest entry is dropped first.
pub const HISTORY_LIMIT: usize = 50;

/// One immutable whole-graph snapshot.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub nodes: Vec<FlowNode>,
    pub edges: Vec<FlowEdge>,
    pub timestamp: u64,
}

/// Linear undo/redo over whole-graph snapshots.
///
/// Whole snapshots rather than per-field diffs: graph edits are infrequent
/// relative to rendering, and full copies cannot leave the graph in a
/// partially-applied state.
#[derive(Debug)]
pub struct History {
    entries: Vec<HistoryEntry>,
    cursor: usize,
}

impl History {
    /// Seeds the history with the initial graph, which becomes entry 0.
    pub fn new(nodes: &[FlowNode], edges: &[FlowEdge]) -> Self {
        Self {
            entries: vec![entry(nodes, edges)],
            cursor: 0,
        }
    }

    /// Pushes a snapshot of the given state, discarding any entries past the
    /// cursor first. After a record, redo history is always empty.
    pub fn record(&mut self, nodes: &[FlowNode], edges: &[FlowEdge]) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(entry(nodes, edges));
        if self.entries.len() > HISTORY_LIMIT {
            self.entries.remove(0);
        }
        self.cursor = self.entries.len() - 1;
    }

    /// Moves the cursor back one entry; `None` at the bottom.
    pub fn undo(&mut self) -> Option<&HistoryEntry> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(&self.entries[self.cursor])
    }

    /// Moves the cursor forward one entry; `None` at the tip.
    pub fn redo(&mut self) -> Option<&HistoryEntry> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        Some(&self.entries[self.cursor])
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn entry(nodes: &[FlowNode], edges: &[FlowEdge]) -> HistoryEntry {
    HistoryEntry {
        nodes: nodes.to_vec(),
        edges: edges.to_vec(),
        timestamp: now_millis(),
    }
}

/// Milliseconds since the Unix epoch; 0 if the clock is before it.
pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
