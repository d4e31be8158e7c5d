//! Per-cell search bookkeeping.
//!
//! One [`Node`] exists for every free maze cell, allocated once in an
//! arena owned by the engine. Cross-node links (`previous`, `neighbors`)
//! are arena indexes rather than references, so the predecessor tree
//! cannot form reference cycles.

use stepfind_core::Point;

/// Index of a node in the engine's arena.
pub(crate) type NodeId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NodeState {
    /// Not yet discovered.
    Unvisited,
    /// In the open set: discovered, not yet expanded.
    Open,
    /// In the closed set: expanded, cost finalized.
    Closed,
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) pos: Point,
    /// Cost of the best known path from start. Meaningless until the node
    /// leaves `Unvisited`; only ever first-set or decreased afterwards.
    pub(crate) g: f64,
    /// Heuristic estimate to the end, written on discovery.
    pub(crate) h: f64,
    /// Predecessor on the current best path, if any.
    pub(crate) previous: Option<NodeId>,
    /// Adjacent free cells, in the movement policy's offset order.
    pub(crate) neighbors: Vec<NodeId>,
    pub(crate) state: NodeState,
}

impl Node {
    pub(crate) fn new(pos: Point) -> Self {
        Self {
            pos,
            g: 0.0,
            h: 0.0,
            previous: None,
            neighbors: Vec::new(),
            state: NodeState::Unvisited,
        }
    }

    /// Total estimated cost through this node.
    #[inline]
    pub(crate) fn f(&self) -> f64 {
        self.g + self.h
    }
}
