//! Graph construction module

use crate::error::GraphError;
use crate::graph::{Edge, LinkGraph};
use std::collections::{HashMap, HashSet};

/// Builder for incrementally constructing a [`LinkGraph`] from labeled edges.
pub struct GraphBuilder {
    /// Number of nodes
    node_count: usize,

    /// Mapping from string IDs to node indices
    id_to_index: HashMap<String, u32>,

    /// Node string IDs
    node_ids: Vec<String>,

    /// Canonical edges in insertion order
    edges: Vec<Edge>,

    /// Edges seen so far, for duplicate detection
    seen: HashSet<Edge>,
}

impl GraphBuilder {
    /// Create a new graph builder.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a new graph builder with the given edge capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            node_count: 0,
            id_to_index: HashMap::with_capacity(capacity),
            node_ids: Vec::with_capacity(capacity),
            edges: Vec::with_capacity(capacity),
            seen: HashSet::with_capacity(capacity),
        }
    }

    /// Get or create a node index for the given string ID.
    pub fn get_or_create_node(&mut self, id: &str) -> u32 {
        if let Some(&idx) = self.id_to_index.get(id) {
            return idx;
        }

        // Create a new node
        let idx = self.node_count as u32;
        self.id_to_index.insert(id.to_string(), idx);
        self.node_ids.push(id.to_string());
        self.node_count += 1;

        idx
    }

    /// Add an undirected edge between two labeled nodes.
    ///
    /// Returns the canonical edge. Exact duplicates (in either orientation)
    /// are skipped; self-loops are rejected.
    pub fn add_edge(&mut self, src_id: &str, dst_id: &str) -> Result<Edge, GraphError> {
        if src_id == dst_id {
            return Err(GraphError::SelfLoop(src_id.to_string()));
        }

        let src_idx = self.get_or_create_node(src_id);
        let dst_idx = self.get_or_create_node(dst_id);
        let edge = Edge::new(src_idx, dst_idx);

        if !self.seen.insert(edge) {
            log::debug!("skipping duplicate edge {} -- {}", src_id, dst_id);
            return Ok(edge);
        }
        self.edges.push(edge);

        Ok(edge)
    }

    /// Number of edges added so far.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Build the compressed graph.
    pub fn build(self) -> Result<LinkGraph, GraphError> {
        // Count degrees
        let mut degrees = vec![0u32; self.node_count];
        for edge in &self.edges {
            degrees[edge.0 as usize] += 1;
            degrees[edge.1 as usize] += 1;
        }

        // Create offsets array
        let mut offsets = Vec::with_capacity(self.node_count + 1);
        offsets.push(0);

        let mut offset = 0;
        for &degree in &degrees {
            offset += degree;
            offsets.push(offset);
        }

        // Fill the neighbor array
        let mut adjacency = vec![0u32; offset as usize];
        let mut positions = vec![0u32; self.node_count];
        for edge in &self.edges {
            let (a, b) = (edge.0 as usize, edge.1 as usize);
            adjacency[(offsets[a] + positions[a]) as usize] = edge.1;
            positions[a] += 1;
            adjacency[(offsets[b] + positions[b]) as usize] = edge.0;
            positions[b] += 1;
        }

        // Sort each node's slice for merge walks and binary search
        for node in 0..self.node_count {
            let start = offsets[node] as usize;
            let end = offsets[node + 1] as usize;
            adjacency[start..end].sort_unstable();
        }

        let graph = LinkGraph {
            node_count: self.node_count,
            offsets,
            adjacency,
            edges: self.edges,
            node_ids: Some(self.node_ids),
        };

        graph.validate()?;

        Ok(graph)
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_canonical_sorted_adjacency() {
        let mut builder = GraphBuilder::new();
        builder.add_edge("c", "a").unwrap();
        builder.add_edge("b", "a").unwrap();
        builder.add_edge("c", "b").unwrap();
        let graph = builder.build().unwrap();

        assert_eq!(graph.node_count, 3);
        assert_eq!(graph.edge_count(), 3);
        // node "c" is index 0, "a" is 1, "b" is 2
        assert_eq!(graph.neighbors(0), &[1, 2]);
        assert_eq!(graph.neighbors(1), &[0, 2]);
        assert_eq!(graph.neighbors(2), &[0, 1]);
        assert!(graph.has_edge(0, 2));
        assert!(graph.validate().is_ok());
    }

    #[test]
    fn rejects_self_loops() {
        let mut builder = GraphBuilder::new();
        let err = builder.add_edge("x", "x").unwrap_err();
        assert_eq!(err, GraphError::SelfLoop("x".to_string()));
    }

    #[test]
    fn deduplicates_edges_in_either_orientation() {
        let mut builder = GraphBuilder::new();
        let first = builder.add_edge("a", "b").unwrap();
        let second = builder.add_edge("b", "a").unwrap();
        assert_eq!(first, second);
        assert_eq!(builder.edge_count(), 1);

        let graph = builder.build().unwrap();
        assert_eq!(graph.neighbors(0), &[1]);
        assert_eq!(graph.neighbors(1), &[0]);
    }

    #[test]
    fn edge_positions_define_initial_ids() {
        let mut builder = GraphBuilder::new();
        let e0 = builder.add_edge("a", "b").unwrap();
        let e1 = builder.add_edge("b", "c").unwrap();
        let graph = builder.build().unwrap();
        assert_eq!(graph.edges, vec![e0, e1]);
    }
}
