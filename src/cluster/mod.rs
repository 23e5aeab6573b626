//! Link community analysis module

pub mod detection;
pub mod metrics;
pub mod similarity;
pub mod state;

use crate::graph::Edge;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Identifier of an edge community.
///
/// Initial ids are edge positions in the input edge list; dendrogram
/// recording mints fresh ids past that range as merges happen.
pub type CommunityId = usize;

/// One merge recorded while building the dendrogram.
///
/// `left` and `right` are the two community ids consumed by the merge; both
/// are retired afterwards and never reused.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DendrogramEntry {
    /// Surviving-side community id consumed by the merge
    pub left: CommunityId,

    /// Absorbed-side community id consumed by the merge
    pub right: CommunityId,

    /// Similarity level at which the merge happened
    pub similarity: f64,
}

/// Full merge history of a clustering run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dendrogram {
    /// Leaf communities: the edge that community id `i` started with
    pub leaves: Vec<Edge>,

    /// Merge entries in the order they happened
    pub merges: Vec<DendrogramEntry>,
}

/// One row of the (similarity, partition density) sample log.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DensitySample {
    /// Similarity level entering this sample
    pub similarity: f64,

    /// Partition density at the end of the previous level
    pub density: f64,
}

/// Result of a clustering run.
#[derive(Debug, Clone)]
pub enum ClusterOutcome {
    /// Raw partition where merging stopped at a similarity cutoff.
    Threshold {
        /// Edge to community assignment at the cutoff
        partition: HashMap<Edge, CommunityId>,

        /// Partition density of that assignment
        partition_density: f64,
    },

    /// Density-optimal partition over the full merge sequence.
    Optimal {
        /// Edge to community assignment at the best density seen
        partition: HashMap<Edge, CommunityId>,

        /// Similarity level at which the best partition was captured
        best_similarity: f64,

        /// Best partition density seen
        best_density: f64,

        /// Sample log of (similarity, density) at every level boundary
        density_profile: Vec<DensitySample>,

        /// Merge history, when recording was requested
        dendrogram: Option<Dendrogram>,
    },
}

impl ClusterOutcome {
    /// The edge partition carried by either outcome variant.
    pub fn partition(&self) -> &HashMap<Edge, CommunityId> {
        match self {
            ClusterOutcome::Threshold { partition, .. } => partition,
            ClusterOutcome::Optimal { partition, .. } => partition,
        }
    }
}

/// Materialized view of one edge community for reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunityReport {
    /// Community identifier
    pub id: CommunityId,

    /// Number of member edges
    pub edge_count: usize,

    /// Number of nodes spanned by the member edges
    pub node_count: usize,

    /// Link density of this community
    pub link_density: f64,

    /// Nodes spanned by the member edges, ascending
    pub nodes: Vec<u32>,

    /// Member edges, ascending
    pub edges: Vec<Edge>,
}
