//! Partition density metrics and community summaries

use crate::cluster::{CommunityId, CommunityReport};
use crate::graph::Edge;
use std::collections::{HashMap, HashSet};

/// Link density of one community with `edge_count` edges over `node_count`
/// nodes.
///
/// Defined as m(m - n + 1) / ((n - 2)(n - 1)); a community spanning two or
/// fewer nodes has density exactly 0.
pub fn link_density(edge_count: usize, node_count: usize) -> f64 {
    if node_count <= 2 {
        return 0.0;
    }
    let m = edge_count as f64;
    let n = node_count as f64;
    m * (m - n + 1.0) / ((n - 2.0) * (n - 1.0))
}

/// Recompute partition density from scratch for a full edge partition.
///
/// Sums per-community link densities scaled by 2/|E|. The incremental value
/// maintained during merging must agree with this to within float noise.
pub fn partition_density(partition: &HashMap<Edge, CommunityId>) -> f64 {
    if partition.is_empty() {
        return 0.0;
    }

    let mut members: HashMap<CommunityId, (usize, HashSet<u32>)> = HashMap::new();
    for (edge, &cid) in partition {
        let entry = members.entry(cid).or_insert_with(|| (0, HashSet::new()));
        entry.0 += 1;
        entry.1.insert(edge.0);
        entry.1.insert(edge.1);
    }

    let total: f64 = members
        .values()
        .map(|(edge_count, nodes)| link_density(*edge_count, nodes.len()))
        .sum();

    total * 2.0 / partition.len() as f64
}

/// Materialize per-community reports from an edge partition.
///
/// Communities with fewer than `min_edges` member edges are skipped; the rest
/// are sorted largest first (ties by id) the way downstream consumers expect.
pub fn summarize_partition(
    partition: &HashMap<Edge, CommunityId>,
    min_edges: usize,
) -> Vec<CommunityReport> {
    let mut grouped: HashMap<CommunityId, Vec<Edge>> = HashMap::new();
    for (&edge, &cid) in partition {
        grouped.entry(cid).or_default().push(edge);
    }

    let mut reports: Vec<CommunityReport> = grouped
        .into_iter()
        .filter(|(_, edges)| edges.len() >= min_edges)
        .map(|(id, mut edges)| {
            edges.sort_unstable();
            let mut nodes: Vec<u32> = edges.iter().flat_map(|e| [e.0, e.1]).collect();
            nodes.sort_unstable();
            nodes.dedup();
            CommunityReport {
                id,
                edge_count: edges.len(),
                node_count: nodes.len(),
                link_density: link_density(edges.len(), nodes.len()),
                nodes,
                edges,
            }
        })
        .collect();

    reports.sort_by(|a, b| b.edge_count.cmp(&a.edge_count).then(a.id.cmp(&b.id)));
    reports
}
