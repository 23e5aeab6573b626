//! Mutable community bookkeeping for the agglomerative merge loop
//!
//! Communities live in a growable arena indexed by community id. Merges
//! retire entries with a tombstone flag instead of deleting them, so ids
//! referenced by dendrogram entries stay inspectable after the run.

use crate::cluster::metrics::link_density;
use crate::cluster::{CommunityId, Dendrogram, DendrogramEntry};
use crate::error::ClusterError;
use crate::graph::Edge;
use std::collections::{HashMap, HashSet};
use std::mem;

/// One arena entry: the edges of a community and the nodes they span.
#[derive(Debug, Clone)]
pub struct Community {
    /// Member edges
    pub edges: HashSet<Edge>,

    /// Nodes spanned by the member edges
    pub nodes: HashSet<u32>,

    /// Set when this id has been consumed by a merge
    pub retired: bool,
}

/// Arena of communities plus the edge to community index.
///
/// Owns the incrementally maintained partition density for exactly one
/// clustering run.
#[derive(Debug)]
pub struct CommunityState {
    communities: Vec<Community>,
    edge_to_community: HashMap<Edge, CommunityId>,
    density_factor: f64,
    partition_density: f64,
    dendrogram: Option<Dendrogram>,
}

impl CommunityState {
    /// Start with one community per edge, in input order.
    pub fn new(edges: &[Edge], record_dendrogram: bool) -> Result<Self, ClusterError> {
        if edges.is_empty() {
            return Err(ClusterError::EmptyGraph);
        }

        let mut communities = Vec::with_capacity(edges.len());
        let mut edge_to_community = HashMap::with_capacity(edges.len());
        for (cid, &edge) in edges.iter().enumerate() {
            edge_to_community.insert(edge, cid);
            communities.push(Community {
                edges: HashSet::from([edge]),
                nodes: HashSet::from([edge.0, edge.1]),
                retired: false,
            });
        }

        let dendrogram = if record_dendrogram {
            Some(Dendrogram {
                leaves: edges.to_vec(),
                merges: Vec::new(),
            })
        } else {
            None
        };

        Ok(Self {
            communities,
            edge_to_community,
            density_factor: 2.0 / edges.len() as f64,
            partition_density: 0.0,
            dendrogram,
        })
    }

    /// Merge the communities containing `a` and `b` at the given similarity.
    ///
    /// Returns whether a merge actually happened: unknown edges and pairs
    /// already sharing a community are silently skipped.
    pub fn merge(&mut self, a: Edge, b: Edge, similarity: f64) -> bool {
        let (cid_a, cid_b) = match (
            self.edge_to_community.get(&a),
            self.edge_to_community.get(&b),
        ) {
            (Some(&x), Some(&y)) => (x, y),
            _ => return false,
        };
        if cid_a == cid_b {
            return false;
        }

        // Merge the smaller edge-count community into the larger; on a tie
        // the first-named community survives.
        let (mut keep, mut drop) = (cid_a, cid_b);
        if self.communities[drop].edges.len() > self.communities[keep].edges.len() {
            mem::swap(&mut keep, &mut drop);
        }

        let density_keep = link_density(
            self.communities[keep].edges.len(),
            self.communities[keep].nodes.len(),
        );
        let density_drop = link_density(
            self.communities[drop].edges.len(),
            self.communities[drop].nodes.len(),
        );

        let density_merged = if self.dendrogram.is_some() {
            self.merge_minting(keep, drop, similarity)
        } else {
            self.merge_in_place(keep, drop)
        };

        self.partition_density +=
            (density_merged - density_keep - density_drop) * self.density_factor;

        true
    }

    /// Absorb `drop` into `keep`, reusing `keep`'s id.
    fn merge_in_place(&mut self, keep: CommunityId, drop: CommunityId) -> f64 {
        let absorbed_edges = mem::take(&mut self.communities[drop].edges);
        let absorbed_nodes = mem::take(&mut self.communities[drop].nodes);
        self.communities[drop].retired = true;

        for &edge in &absorbed_edges {
            self.edge_to_community.insert(edge, keep);
        }

        let community = &mut self.communities[keep];
        community.edges.extend(absorbed_edges);
        community.nodes.extend(absorbed_nodes);
        link_density(community.edges.len(), community.nodes.len())
    }

    /// Retire both inputs, mint a fresh id for their union, and append the
    /// dendrogram entry referencing the retired ids.
    fn merge_minting(&mut self, keep: CommunityId, drop: CommunityId, similarity: f64) -> f64 {
        let new_cid = self.communities.len();

        let edges: HashSet<Edge> = self.communities[keep]
            .edges
            .union(&self.communities[drop].edges)
            .copied()
            .collect();
        let nodes: HashSet<u32> = self.communities[keep]
            .nodes
            .union(&self.communities[drop].nodes)
            .copied()
            .collect();

        for &edge in &edges {
            self.edge_to_community.insert(edge, new_cid);
        }
        self.communities[keep].retired = true;
        self.communities[drop].retired = true;

        if let Some(dendrogram) = self.dendrogram.as_mut() {
            dendrogram.merges.push(DendrogramEntry {
                left: keep,
                right: drop,
                similarity,
            });
        }

        let density = link_density(edges.len(), nodes.len());
        self.communities.push(Community {
            edges,
            nodes,
            retired: false,
        });
        density
    }

    /// Current partition density.
    pub fn partition_density(&self) -> f64 {
        self.partition_density
    }

    /// The fixed 2/|E| scaling applied to density deltas.
    pub fn density_factor(&self) -> f64 {
        self.density_factor
    }

    /// Independent snapshot of the edge to community assignment.
    pub fn snapshot(&self) -> HashMap<Edge, CommunityId> {
        self.edge_to_community.clone()
    }

    /// Arena lookup by id, tombstones included.
    pub fn community(&self, id: CommunityId) -> Option<&Community> {
        self.communities.get(id)
    }

    /// Iterate over the live communities.
    pub fn communities(&self) -> impl Iterator<Item = (CommunityId, &Community)> {
        self.communities
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.retired)
    }

    /// Number of live communities.
    pub fn community_count(&self) -> usize {
        self.communities().count()
    }

    /// Consume the state, handing back the recorded dendrogram if any.
    pub fn into_dendrogram(self) -> Option<Dendrogram> {
        self.dendrogram
    }
}
