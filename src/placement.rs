//! Smart placement: non-overlapping candidate positions for new nodes,
//! computed purely from the existing layout.

use crate::flow::{FlowNode, Position, START_NODE_ID, is_protected_id};
use rand::Rng;
use std::f64::consts::TAU;

/// Candidates closer than this to an existing node are nudged aside.
pub const MIN_NODE_DISTANCE: f64 = 10.0;
/// Spiral-search budget before overlap is tolerated.
pub const MAX_PLACEMENT_ATTEMPTS: usize = 5;
/// Distance from the centroid at which new nodes are proposed.
pub const CENTROID_OFFSET_RADIUS: f64 = 50.0;

const START_OFFSET_X: f64 = 300.0;
const START_JITTER_Y: f64 = 100.0;
const FALLBACK_POSITION: Position = Position { x: 400.0, y: 200.0 };

/// Suggests a position for a new node.
///
/// With no user-created nodes yet, the suggestion sits to the right of the
/// start anchor (or a fixed canvas point when even that is missing).
/// Otherwise it is a randomized offset from the centroid of the user nodes,
/// nudged off any existing node by [`resolve_overlap`].
pub fn suggest_position<R: Rng + ?Sized>(nodes: &[FlowNode], rng: &mut R) -> Position {
    let user_positions: Vec<Position> = nodes
        .iter()
        .filter(|n| !n.protected && !is_protected_id(&n.id))
        .map(|n| n.position)
        .collect();

    if user_positions.is_empty() {
        return match nodes.iter().find(|n| n.id == START_NODE_ID) {
            Some(start) => Position {
                x: start.position.x + START_OFFSET_X,
                y: start.position.y + (rng.random::<f64>() - 0.5) * START_JITTER_Y,
            },
            None => FALLBACK_POSITION,
        };
    }

    let centroid = centroid(&user_positions);
    let angle = rng.random_range(0.0..TAU);
    let candidate = Position {
        x: centroid.x + angle.cos() * CENTROID_OFFSET_RADIUS,
        y: centroid.y + angle.sin() * CENTROID_OFFSET_RADIUS,
    };
    resolve_overlap(candidate, &user_positions)
}

/// [`suggest_position`] with the thread RNG.
pub fn suggest_position_default(nodes: &[FlowNode]) -> Position {
    suggest_position(nodes, &mut rand::rng())
}

/// Nudges a candidate off any position within [`MIN_NODE_DISTANCE`] by
/// spiral-searching around it with growing radius. Gives up after
/// [`MAX_PLACEMENT_ATTEMPTS`] and returns the last candidate — overlap is a
/// cosmetic concern, not a correctness one.
pub fn resolve_overlap(candidate: Position, existing: &[Position]) -> Position {
    let mut position = candidate;
    for attempt in 0..MAX_PLACEMENT_ATTEMPTS {
        if !collides(position, existing) {
            return position;
        }
        let radius = 20.0 + attempt as f64 * 15.0;
        let angle = attempt as f64 * 0.5;
        position = Position {
            x: candidate.x + angle.cos() * radius,
            y: candidate.y + angle.sin() * radius,
        };
    }
    position
}

fn collides(position: Position, existing: &[Position]) -> bool {
    existing
        .iter()
        .any(|other| (position.x - other.x).hypot(position.y - other.y) < MIN_NODE_DISTANCE)
}

fn centroid(positions: &[Position]) -> Position {
    let count = positions.len() as f64;
    Position {
        x: positions.iter().map(|p| p.x).sum::<f64>() / count,
        y: positions.iter().map(|p| p.y).sum::<f64>() / count,
    }
}
