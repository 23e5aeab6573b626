//! Memory-efficient undirected graph representation

use crate::error::GraphError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// An undirected edge with its endpoints in canonical order.
///
/// The constructor keeps the smaller node first, so the same link is never
/// represented two different ways. Endpoints are always distinct; the
/// [`GraphBuilder`](crate::graph::GraphBuilder) rejects self-loops before an
/// `Edge` is ever created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Edge(pub u32, pub u32);

impl Edge {
    /// Create a canonical edge between two nodes.
    pub fn new(a: u32, b: u32) -> Self {
        if a <= b {
            Edge(a, b)
        } else {
            Edge(b, a)
        }
    }

    /// Both endpoints, smaller first.
    pub fn endpoints(&self) -> (u32, u32) {
        (self.0, self.1)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.0, self.1)
    }
}

/// Per-edge weights keyed by canonical edge.
pub type EdgeWeights = HashMap<Edge, f64>;

/// Compressed sparse representation of an undirected graph.
///
/// Neighbor lists are stored as one concatenated array with per-node offsets,
/// sorted ascending so set operations over neighborhoods run as merge walks.
/// The canonical edge list doubles as the initial community assignment: the
/// edge at position `i` starts out in community `i`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkGraph {
    /// Number of nodes in the graph
    pub node_count: usize,

    /// Offset array: index where each node's neighbors begin
    /// offsets[i] to offsets[i+1] defines the neighbor range for node i
    pub offsets: Vec<u32>,

    /// Neighbor array: concatenated sorted neighbor lists
    pub adjacency: Vec<u32>,

    /// Canonical edge list; position defines the initial community id
    pub edges: Vec<Edge>,

    /// Optional mapping from internal node indices to original string IDs
    pub node_ids: Option<Vec<String>>,
}

impl LinkGraph {
    /// Get the sorted neighbor slice for a node.
    pub fn neighbors(&self, node: usize) -> &[u32] {
        let start = self.offsets[node] as usize;
        let end = self.offsets[node + 1] as usize;
        &self.adjacency[start..end]
    }

    /// Degree of a node.
    pub fn degree(&self, node: usize) -> usize {
        let start = self.offsets[node] as usize;
        let end = self.offsets[node + 1] as usize;
        end - start
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Check whether two nodes are adjacent.
    pub fn has_edge(&self, a: u32, b: u32) -> bool {
        self.neighbors(a as usize).binary_search(&b).is_ok()
    }

    /// Resolve a node index to its original label, falling back to the index.
    pub fn node_label(&self, node: u32) -> String {
        match &self.node_ids {
            Some(ids) => ids[node as usize].clone(),
            None => node.to_string(),
        }
    }

    /// Verify the structural invariants: strictly ascending neighbor slices
    /// (sorted, no duplicates, no self-loops) and symmetric adjacency.
    pub fn validate(&self) -> Result<(), GraphError> {
        for node in 0..self.node_count {
            let neighbors = self.neighbors(node);
            for (i, &nbr) in neighbors.iter().enumerate() {
                if nbr as usize == node {
                    return Err(GraphError::SelfLoop(self.node_label(node as u32)));
                }
                if i > 0 && neighbors[i - 1] >= nbr {
                    return Err(GraphError::MalformedNeighbors(node as u32));
                }
                if !self.has_edge(nbr, node as u32) {
                    return Err(GraphError::Asymmetric(node as u32, nbr));
                }
            }
        }
        Ok(())
    }
}
