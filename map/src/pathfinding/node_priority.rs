use std::cmp::Ordering;

use crate::hex_math::HexCoord;

/// Heap entry ordered so that `BinaryHeap` pops the cheapest tile first
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct NodePriority {
    pub node: HexCoord,
    pub cost: f32,
}

impl Eq for NodePriority {}

impl Ord for NodePriority {
    fn cmp(&self, other: &Self) -> Ordering {
        // reversed for a min-heap; NaN sorts last
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(Ordering::Greater)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for NodePriority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
