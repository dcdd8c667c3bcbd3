//! The graph store: single source of truth for nodes, edges, selection and
//! the UI-adjacent flags, with invariant enforcement on every mutation.

mod history;

pub use history::{HISTORY_LIMIT, History, HistoryEntry};
pub(crate) use history::now_millis;

use crate::flow::{
    FlowEdge, FlowNode, NodeKind, Position, Transition, TransitionPatch, default_graph,
    default_node_config, is_protected_id,
};
use serde_json::{Map, Value};

/// Outcome of a single-entity store operation.
///
/// Missing IDs and protected-node violations are a tolerated part of normal
/// editing (the UI may race with a deletion, an assistant may reference a
/// node that is gone), so they are reported as statuses instead of errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpStatus {
    /// The mutation was applied.
    Applied,
    /// The referenced node, edge or transition does not exist; nothing changed.
    MissingTarget,
    /// The target is a protected anchor node; nothing changed.
    Protected,
    /// The supplied patch could not be absorbed; nothing changed.
    Rejected,
}

impl OpStatus {
    pub fn is_applied(&self) -> bool {
        matches!(self, OpStatus::Applied)
    }
}

/// The flow graph store.
///
/// Explicitly constructed and passed by reference; there is no ambient
/// global. All operations are synchronous and confined to the store's own
/// state, relying on single-threaded execution — wrap the store in a mutex
/// or an actor boundary before sharing it across threads.
#[derive(Debug)]
pub struct FlowStore {
    nodes: Vec<FlowNode>,
    edges: Vec<FlowEdge>,
    selected_node_id: Option<String>,
    sidebar_collapsed: bool,
    node_id_counter: u64,
    edge_id_counter: u64,
    transition_id_counter: u64,
    history: History,
}

impl Default for FlowStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FlowStore {
    /// A store holding the default initial graph.
    pub fn new() -> Self {
        let (nodes, edges) = default_graph();
        let history = History::new(&nodes, &edges);
        Self {
            nodes,
            edges,
            selected_node_id: None,
            sidebar_collapsed: false,
            node_id_counter: 1,
            edge_id_counter: 1,
            transition_id_counter: 0,
            history,
        }
    }

    /// Rebuilds a store from loaded state. The ID counter is reconciled
    /// against the node set so later creations cannot collide with imported
    /// IDs, and the reserved anchors are re-marked protected.
    pub(crate) fn from_parts(
        mut nodes: Vec<FlowNode>,
        edges: Vec<FlowEdge>,
        id_counter: u64,
        sidebar_collapsed: bool,
    ) -> Self {
        for node in &mut nodes {
            if is_protected_id(&node.id) {
                node.protected = true;
            }
        }
        let node_id_counter = id_counter.max(max_node_suffix(&nodes)).max(1);
        let edge_id_counter = edges.len() as u64;
        let history = History::new(&nodes, &edges);
        Self {
            nodes,
            edges,
            selected_node_id: None,
            sidebar_collapsed,
            node_id_counter,
            edge_id_counter,
            transition_id_counter: 0,
            history,
        }
    }

    // --- Read path ---

    pub fn nodes(&self) -> &[FlowNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[FlowEdge] {
        &self.edges
    }

    pub fn node(&self, node_id: &str) -> Option<&FlowNode> {
        self.nodes.iter().find(|n| n.id == node_id)
    }

    pub fn selected_node_id(&self) -> Option<&str> {
        self.selected_node_id.as_deref()
    }

    pub fn sidebar_collapsed(&self) -> bool {
        self.sidebar_collapsed
    }

    pub(crate) fn id_counter(&self) -> u64 {
        self.node_id_counter
    }

    // --- Node operations ---

    /// Creates a node of the given kind with its default configuration,
    /// selects it, and returns the freshly assigned ID.
    pub fn create_node(&mut self, kind: NodeKind, position: Position) -> String {
        let id = self.next_node_id();
        self.nodes.push(FlowNode {
            id: id.clone(),
            kind,
            position,
            config: default_node_config(kind),
            protected: false,
        });
        self.selected_node_id = Some(id.clone());
        self.record_snapshot();
        id
    }

    /// Shallow-merges a JSON object onto the node's config.
    ///
    /// Does not reconcile `output_count` against the transition list; the
    /// transition operations own that pairing. Does not snapshot: config
    /// merges arrive at typing frequency from the UI.
    pub fn update_node(&mut self, node_id: &str, patch: &Map<String, Value>) -> OpStatus {
        let Some(node) = self.nodes.iter_mut().find(|n| n.id == node_id) else {
            return OpStatus::MissingTarget;
        };
        if node.config.apply_patch(patch) {
            OpStatus::Applied
        } else {
            OpStatus::Rejected
        }
    }

    /// Removes a node and every edge touching it. Protected anchors refuse.
    pub fn delete_node(&mut self, node_id: &str) -> OpStatus {
        let Some(index) = self.nodes.iter().position(|n| n.id == node_id) else {
            return OpStatus::MissingTarget;
        };
        if self.nodes[index].protected || is_protected_id(node_id) {
            return OpStatus::Protected;
        }
        self.nodes.remove(index);
        self.edges
            .retain(|e| e.source != node_id && e.target != node_id);
        if self.selected_node_id.as_deref() == Some(node_id) {
            self.selected_node_id = None;
        }
        self.record_snapshot();
        OpStatus::Applied
    }

    pub fn delete_edge(&mut self, edge_id: &str) -> OpStatus {
        let before = self.edges.len();
        self.edges.retain(|e| e.id != edge_id);
        if self.edges.len() == before {
            return OpStatus::MissingTarget;
        }
        self.record_snapshot();
        OpStatus::Applied
    }

    /// Appends a new edge and returns its ID.
    ///
    /// No de-duplication: parallel edges between the same pair on different
    /// handles are expected, one per output slot. Endpoints are not checked
    /// for existence — graphs may be incomplete mid-edit.
    pub fn connect(&mut self, source: &str, target: &str, source_handle: Option<&str>) -> String {
        let id = self.next_edge_id();
        self.edges.push(FlowEdge {
            id: id.clone(),
            source: source.to_string(),
            target: target.to_string(),
            source_handle: source_handle.map(str::to_string),
        });
        self.record_snapshot();
        id
    }

    // --- Transition operations ---

    /// Appends an auto-labelled transition and increments `output_count` in
    /// the same mutation. This pairing is the invariant every
    /// transition-mutating operation must preserve.
    pub fn add_transition(&mut self, node_id: &str) -> OpStatus {
        let Some(index) = self.nodes.iter().position(|n| n.id == node_id) else {
            return OpStatus::MissingTarget;
        };
        let id = loop {
            self.transition_id_counter += 1;
            let candidate = format!("transition-{}", self.transition_id_counter);
            if !self.nodes[index]
                .config
                .transitions
                .iter()
                .any(|t| t.id == candidate)
            {
                break candidate;
            }
        };
        let config = &mut self.nodes[index].config;
        let label = format!("Transition {}", config.transitions.len() + 1);
        config.transitions.push(Transition {
            id,
            label,
            condition: Some(String::new()),
            variable: None,
            operator: None,
            value: None,
        });
        config.output_count += 1;
        self.record_snapshot();
        OpStatus::Applied
    }

    /// Removes a transition and decrements `output_count`, floored at 0.
    pub fn remove_transition(&mut self, node_id: &str, transition_id: &str) -> OpStatus {
        let Some(node) = self.nodes.iter_mut().find(|n| n.id == node_id) else {
            return OpStatus::MissingTarget;
        };
        let before = node.config.transitions.len();
        node.config.transitions.retain(|t| t.id != transition_id);
        if node.config.transitions.len() == before {
            return OpStatus::MissingTarget;
        }
        node.config.output_count = node.config.output_count.saturating_sub(1);
        self.record_snapshot();
        OpStatus::Applied
    }

    /// Merges fields into one transition; `output_count` is untouched.
    pub fn update_transition(
        &mut self,
        node_id: &str,
        transition_id: &str,
        patch: &TransitionPatch,
    ) -> OpStatus {
        let Some(node) = self.nodes.iter_mut().find(|n| n.id == node_id) else {
            return OpStatus::MissingTarget;
        };
        let Some(transition) = node
            .config
            .transitions
            .iter_mut()
            .find(|t| t.id == transition_id)
        else {
            return OpStatus::MissingTarget;
        };
        patch.apply_to(transition);
        self.record_snapshot();
        OpStatus::Applied
    }

    // --- Selection and UI flags ---

    /// Sets the selection; a stale ID (node already deleted) clears it.
    pub fn select_node(&mut self, node_id: Option<&str>) {
        self.selected_node_id = node_id
            .filter(|id| self.node(id).is_some())
            .map(str::to_string);
    }

    pub fn set_sidebar_collapsed(&mut self, collapsed: bool) {
        self.sidebar_collapsed = collapsed;
    }

    // --- History ---

    /// Steps back one snapshot; returns `false` at the bottom of history.
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(snapshot) => {
                self.nodes = snapshot.nodes.clone();
                self.edges = snapshot.edges.clone();
                self.selected_node_id = None;
                true
            }
            None => false,
        }
    }

    /// Steps forward one snapshot; returns `false` at the tip.
    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(snapshot) => {
                self.nodes = snapshot.nodes.clone();
                self.edges = snapshot.edges.clone();
                self.selected_node_id = None;
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    // --- Internals ---

    /// Replaces the live graph wholesale (import, backup restore, reset).
    ///
    /// The counter never decreases: a later undo may resurrect nodes from
    /// before the replacement, so IDs handed out afterwards must stay clear
    /// of everything the session has ever seen.
    pub(crate) fn replace_graph(
        &mut self,
        mut nodes: Vec<FlowNode>,
        edges: Vec<FlowEdge>,
        id_counter: u64,
    ) {
        for node in &mut nodes {
            if is_protected_id(&node.id) {
                node.protected = true;
            }
        }
        self.node_id_counter = self
            .node_id_counter
            .max(id_counter)
            .max(max_node_suffix(&nodes));
        self.nodes = nodes;
        self.edges = edges;
        self.selected_node_id = None;
        self.record_snapshot();
    }

    fn record_snapshot(&mut self) {
        self.history.record(&self.nodes, &self.edges);
    }

    /// Fresh `node-<n>` ID, retried against the live node set so imported
    /// graphs with manually numbered IDs cannot collide.
    fn next_node_id(&mut self) -> String {
        loop {
            self.node_id_counter += 1;
            let candidate = format!("node-{}", self.node_id_counter);
            if self.node(&candidate).is_none() {
                return candidate;
            }
        }
    }

    fn next_edge_id(&mut self) -> String {
        loop {
            self.edge_id_counter += 1;
            let candidate = format!("edge-{}", self.edge_id_counter);
            if !self.edges.iter().any(|e| e.id == candidate) {
                return candidate;
            }
        }
    }
}

/// Largest numeric suffix among `node-<n>` IDs; 0 when none match.
pub(crate) fn max_node_suffix(nodes: &[FlowNode]) -> u64 {
    nodes
        .iter()
        .filter_map(|n| n.id.strip_prefix("node-"))
        .filter_map(|suffix| suffix.parse::<u64>().ok())
        .max()
        .unwrap_or(0)
}
