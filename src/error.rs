//! Typed errors for graph construction and clustering preconditions

use crate::graph::Edge;
use thiserror::Error;

/// Violations detected while building or validating a graph.
#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    /// Self-loops carry no link-community information and are rejected.
    #[error("self-loop on node '{0}' is not a valid link")]
    SelfLoop(String),

    /// Adjacency must be symmetric: each neighbor slice lists the node back.
    #[error("asymmetric adjacency: node {0} lists {1}, but {1} does not list {0}")]
    Asymmetric(u32, u32),

    /// Neighbor slices must be strictly ascending (sorted, no duplicates).
    #[error("malformed neighbor list for node {0}")]
    MalformedNeighbors(u32),
}

/// Violations detected when starting or running a clustering pass.
#[derive(Debug, Error, PartialEq)]
pub enum ClusterError {
    /// The density factor 2/|E| is undefined for an empty edge set.
    #[error("graph has no edges to cluster")]
    EmptyGraph,

    /// Weighted similarity needs a weight for every edge in the graph.
    #[error("missing weight for edge {0}")]
    MissingWeight(Edge),

    /// Weights must be finite and non-negative.
    #[error("invalid weight {1} for edge {0}")]
    InvalidWeight(Edge, f64),

    /// Threshold mode skips best-partition tracking, so a dendrogram recorded
    /// alongside it would describe a run that never happened.
    #[error("similarity threshold and dendrogram recording cannot be combined")]
    ThresholdWithDendrogram,

    #[error(transparent)]
    Graph(#[from] GraphError),
}
