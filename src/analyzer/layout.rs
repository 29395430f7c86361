//! Presentation layout: non-overlapping 2-D positions, grouped by kind.
//!
//! Serialized with the export but not part of the analysis contract; nothing
//! downstream reads positions back.

use crate::types::{GraphNode, NodeKind, Position};

const CELL_W: f32 = 260.0;
const CELL_H: f32 = 140.0;
const BAND_GAP: f32 = 120.0;

/// Assign grid positions band-by-band: every kind gets a horizontal band,
/// nodes within a band fill a near-square grid. Cell spacing guarantees no
/// two nodes overlap.
pub fn assign_positions(nodes: &mut [GraphNode]) {
    let mut y_cursor = 0.0f32;

    for kind in NodeKind::ALL {
        let member_count = nodes.iter().filter(|n| n.kind == kind).count();
        if member_count == 0 {
            continue;
        }
        let cols = (member_count as f32).sqrt().ceil().max(1.0) as usize;

        let mut placed = 0usize;
        let mut rows = 0usize;
        for node in nodes.iter_mut().filter(|n| n.kind == kind) {
            let row = placed / cols;
            let col = placed % cols;
            node.position = Position {
                x: (col as f32) * CELL_W,
                y: y_cursor + (row as f32) * CELL_H,
            };
            placed += 1;
            rows = row + 1;
        }

        y_cursor += (rows as f32) * CELL_H + BAND_GAP;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GraphNode;

    fn node(path: &str, kind: NodeKind) -> GraphNode {
        let mut n = GraphNode::new(path.to_string(), path.to_string(), path.to_string());
        n.kind = kind;
        n
    }

    #[test]
    fn positions_are_unique() {
        let mut nodes: Vec<GraphNode> = (0..7)
            .map(|i| node(&format!("src/c{i}.tsx"), NodeKind::UiComponent))
            .chain((0..3).map(|i| node(&format!("src/p{i}.tsx"), NodeKind::Screen)))
            .collect();
        assign_positions(&mut nodes);

        let mut seen = std::collections::HashSet::new();
        for n in &nodes {
            let key = (n.position.x.to_bits(), n.position.y.to_bits());
            assert!(seen.insert(key), "overlap at {:?}", n.position);
        }
    }

    #[test]
    fn kinds_occupy_separate_bands() {
        let mut nodes = vec![
            node("src/pages/Home.tsx", NodeKind::Screen),
            node("src/ui/Badge.tsx", NodeKind::UiComponent),
        ];
        assign_positions(&mut nodes);
        // Screen band comes first in the kind order, components after.
        assert!(nodes[0].position.y < nodes[1].position.y);
    }
}
