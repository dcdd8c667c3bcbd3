use super::WorkflowAction;
use crate::flow::TransitionPatch;
use crate::store::FlowStore;

/// What a batch application did: the IDs of the nodes it created, in batch
/// order (the resolution table for pending references), plus applied/skipped
/// counts for user feedback.
#[derive(Debug, Clone, Default)]
pub struct ApplyReport {
    pub created_node_ids: Vec<String>,
    pub applied: usize,
    pub skipped: usize,
}

/// Applies an action batch to the store in two passes: every node creation
/// first, then everything else in list order, so pending references can
/// point at nodes created later in the same batch.
///
/// Application is not atomic. Each action lands or is skipped independently;
/// a skip (unresolved reference, missing target, self-loop) never rolls back
/// what already applied. The caller uses undo for coarse rollback.
pub fn apply_actions(store: &mut FlowStore, actions: &[WorkflowAction]) -> ApplyReport {
    let mut report = ApplyReport::default();

    for action in actions {
        if let WorkflowAction::CreateNode {
            node_type,
            position,
            config,
        } = action
        {
            let id = store.create_node(*node_type, *position);
            if let Some(overrides) = config {
                // Best effort; a refused overlay leaves the defaults in place
                // but the node itself stands.
                store.update_node(&id, overrides);
            }
            report.created_node_ids.push(id);
            report.applied += 1;
        }
    }

    for action in actions {
        match action {
            WorkflowAction::CreateNode { .. } => {}
            WorkflowAction::UpdateNode { node_id, updates } => {
                let applied = node_id
                    .resolve(&report.created_node_ids)
                    .is_some_and(|id| store.update_node(&id, updates).is_applied());
                report.tally(applied);
            }
            WorkflowAction::CreateConnection {
                source_id,
                target_id,
            } => {
                let source = source_id.resolve(&report.created_node_ids);
                let target = target_id.resolve(&report.created_node_ids);
                match (source, target) {
                    (Some(source), Some(target)) if source != target => {
                        store.connect(&source, &target, None);
                        report.tally(true);
                    }
                    _ => report.tally(false),
                }
            }
            WorkflowAction::AddTransition {
                node_id,
                label,
                condition,
            } => {
                let applied = node_id
                    .resolve(&report.created_node_ids)
                    .is_some_and(|id| add_transition(store, &id, label, condition));
                report.tally(applied);
            }
        }
    }

    report
}

fn add_transition(
    store: &mut FlowStore,
    node_id: &str,
    label: &Option<String>,
    condition: &Option<String>,
) -> bool {
    if !store.add_transition(node_id).is_applied() {
        return false;
    }
    if label.is_none() && condition.is_none() {
        return true;
    }
    // The transition just appended is the last one; overlay the requested
    // label and condition onto its auto-generated defaults.
    let Some(transition_id) = store
        .node(node_id)
        .and_then(|node| node.config.transitions.last())
        .map(|t| t.id.clone())
    else {
        return true;
    };
    let patch = TransitionPatch {
        label: label.clone(),
        condition: condition.clone(),
        ..TransitionPatch::default()
    };
    store
        .update_transition(node_id, &transition_id, &patch)
        .is_applied()
}

impl ApplyReport {
    fn tally(&mut self, applied: bool) {
        if applied {
            self.applied += 1;
        } else {
            self.skipped += 1;
        }
    }
}
