//! Edge similarity scoring
//!
//! Two edges are compared whenever they share an endpoint: for a node n with
//! neighbors i and j, the edges (i,n) and (j,n) are scored by how much the
//! neighborhoods of i and j overlap. The unweighted variant uses Jaccard over
//! inclusive neighborhoods (a node's neighbors plus itself); the weighted
//! variant uses Tanimoto over weighted inclusive-neighborhood vectors.

use crate::error::ClusterError;
use crate::graph::{Edge, EdgeWeights, LinkGraph};
use itertools::Itertools;
use std::collections::HashMap;

/// A pair of incident edges scored for the merge loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredPair {
    /// 1 - similarity; the stream sorts ascending on this
    pub dissimilarity: f64,

    /// The two edges, canonically ordered (smaller edge first)
    pub edges: (Edge, Edge),
}

impl ScoredPair {
    fn new(dissimilarity: f64, a: Edge, b: Edge) -> Self {
        let edges = if a <= b { (a, b) } else { (b, a) };
        Self {
            dissimilarity,
            edges,
        }
    }

    /// Similarity of the two edges.
    pub fn similarity(&self) -> f64 {
        1.0 - self.dissimilarity
    }
}

/// Score every pair of incident edges by Jaccard similarity of the far
/// endpoints' inclusive neighborhoods.
///
/// Returns the full stream sorted by ascending dissimilarity, with ties
/// broken by edge pair so the order is reproducible for a fixed graph.
pub fn similarities_unweighted(graph: &LinkGraph) -> Vec<ScoredPair> {
    let inclusive = inclusive_neighborhoods(graph);

    let mut pairs = Vec::new();
    for n in 0..graph.node_count {
        let neighbors = graph.neighbors(n);
        if neighbors.len() < 2 {
            continue;
        }
        for (&i, &j) in neighbors.iter().tuple_combinations::<(_, _)>() {
            let s = jaccard(&inclusive[i as usize], &inclusive[j as usize]);
            pairs.push(ScoredPair::new(
                1.0 - s,
                Edge::new(i, n as u32),
                Edge::new(j, n as u32),
            ));
        }
    }

    sort_stream(&mut pairs);
    pairs
}

/// Score every pair of incident edges by Tanimoto similarity of the far
/// endpoints' weighted inclusive-neighborhood vectors.
///
/// Each node gets a synthetic self-weight (the mean weight of its incident
/// edges) so the vectors cover the inclusive neighborhood. Fails fast if any
/// graph edge is missing a weight or carries an invalid one.
pub fn similarities_weighted(
    graph: &LinkGraph,
    weights: &EdgeWeights,
) -> Result<Vec<ScoredPair>, ClusterError> {
    validate_weights(graph, weights)?;

    let inclusive = inclusive_neighborhoods(graph);

    // Weight lookup over canonical node pairs, extended with the synthetic
    // (n, n) self-weights.
    let mut lookup: HashMap<(u32, u32), f64> =
        HashMap::with_capacity(weights.len() + graph.node_count);
    for (edge, &w) in weights {
        lookup.insert((edge.0, edge.1), w);
    }
    for n in 0..graph.node_count {
        let neighbors = graph.neighbors(n);
        if neighbors.is_empty() {
            continue;
        }
        let total: f64 = neighbors
            .iter()
            .map(|&i| lookup[&pair_key(n as u32, i)])
            .sum();
        lookup.insert((n as u32, n as u32), total / neighbors.len() as f64);
    }

    // Squared norm of each node's weighted inclusive-neighborhood vector
    let norm_sq: Vec<f64> = (0..graph.node_count)
        .map(|n| {
            if graph.degree(n) == 0 {
                return 0.0;
            }
            inclusive[n]
                .iter()
                .map(|&x| {
                    let w = lookup[&pair_key(n as u32, x)];
                    w * w
                })
                .sum()
        })
        .collect();

    let mut pairs = Vec::new();
    for n in 0..graph.node_count {
        let neighbors = graph.neighbors(n);
        if neighbors.len() < 2 {
            continue;
        }
        for (&i, &j) in neighbors.iter().tuple_combinations::<(_, _)>() {
            let dot = weighted_dot(
                i,
                j,
                &inclusive[i as usize],
                &inclusive[j as usize],
                &lookup,
            );
            let denom = norm_sq[i as usize] + norm_sq[j as usize] - dot;
            // Degenerate all-zero vectors resolve to similarity 0
            let s = if denom > 0.0 { dot / denom } else { 0.0 };
            pairs.push(ScoredPair::new(
                1.0 - s,
                Edge::new(i, n as u32),
                Edge::new(j, n as u32),
            ));
        }
    }

    sort_stream(&mut pairs);
    Ok(pairs)
}

/// Jaccard similarity of two sorted sets; an empty union scores 0.
pub fn jaccard(a: &[u32], b: &[u32]) -> f64 {
    let inter = sorted_intersection_len(a, b);
    let union = a.len() + b.len() - inter;
    if union == 0 {
        return 0.0;
    }
    inter as f64 / union as f64
}

/// Inclusive neighborhood of every node: sorted neighbors plus the node
/// itself.
fn inclusive_neighborhoods(graph: &LinkGraph) -> Vec<Vec<u32>> {
    (0..graph.node_count)
        .map(|n| {
            let neighbors = graph.neighbors(n);
            let mut inc = Vec::with_capacity(neighbors.len() + 1);
            inc.extend_from_slice(neighbors);
            let pos = inc.partition_point(|&x| x < n as u32);
            inc.insert(pos, n as u32);
            inc
        })
        .collect()
}

/// Count elements common to two sorted slices with a merge walk.
fn sorted_intersection_len(a: &[u32], b: &[u32]) -> usize {
    let (mut ia, mut ib, mut count) = (0, 0, 0);
    while ia < a.len() && ib < b.len() {
        match a[ia].cmp(&b[ib]) {
            std::cmp::Ordering::Less => ia += 1,
            std::cmp::Ordering::Greater => ib += 1,
            std::cmp::Ordering::Equal => {
                count += 1;
                ia += 1;
                ib += 1;
            }
        }
    }
    count
}

/// Dot product of the weighted neighborhood vectors of `i` and `j`,
/// restricted to the intersection of their inclusive neighborhoods.
fn weighted_dot(
    i: u32,
    j: u32,
    inc_i: &[u32],
    inc_j: &[u32],
    lookup: &HashMap<(u32, u32), f64>,
) -> f64 {
    let (mut ia, mut ib) = (0, 0);
    let mut dot = 0.0;
    while ia < inc_i.len() && ib < inc_j.len() {
        match inc_i[ia].cmp(&inc_j[ib]) {
            std::cmp::Ordering::Less => ia += 1,
            std::cmp::Ordering::Greater => ib += 1,
            std::cmp::Ordering::Equal => {
                let x = inc_i[ia];
                dot += lookup[&pair_key(i, x)] * lookup[&pair_key(j, x)];
                ia += 1;
                ib += 1;
            }
        }
    }
    dot
}

fn pair_key(a: u32, b: u32) -> (u32, u32) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

fn sort_stream(pairs: &mut [ScoredPair]) {
    pairs.sort_by(|a, b| {
        a.dissimilarity
            .total_cmp(&b.dissimilarity)
            .then_with(|| a.edges.cmp(&b.edges))
    });
}

fn validate_weights(graph: &LinkGraph, weights: &EdgeWeights) -> Result<(), ClusterError> {
    for &edge in &graph.edges {
        match weights.get(&edge) {
            None => return Err(ClusterError::MissingWeight(edge)),
            Some(&w) if !w.is_finite() || w < 0.0 => {
                return Err(ClusterError::InvalidWeight(edge, w))
            }
            Some(_) => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;

    fn triangle() -> LinkGraph {
        let mut builder = GraphBuilder::new();
        builder.add_edge("a", "b").unwrap();
        builder.add_edge("b", "c").unwrap();
        builder.add_edge("a", "c").unwrap();
        builder.build().unwrap()
    }

    fn path() -> LinkGraph {
        // a - b - c
        let mut builder = GraphBuilder::new();
        builder.add_edge("a", "b").unwrap();
        builder.add_edge("b", "c").unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn jaccard_is_symmetric() {
        let a = [0, 1, 2];
        let b = [1, 2, 3, 4];
        assert_eq!(jaccard(&a, &b), jaccard(&b, &a));
        assert!((jaccard(&a, &b) - 2.0 / 5.0).abs() < 1e-12);
    }

    #[test]
    fn jaccard_guards_empty_union() {
        assert_eq!(jaccard(&[], &[]), 0.0);
    }

    #[test]
    fn triangle_pairs_all_score_one() {
        let graph = triangle();
        let pairs = similarities_unweighted(&graph);
        assert_eq!(pairs.len(), 3);
        for pair in &pairs {
            assert!((pair.similarity() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn path_pair_scores_one_third() {
        let graph = path();
        let pairs = similarities_unweighted(&graph);
        assert_eq!(pairs.len(), 1);
        // inclusive(a) = {a, b}, inclusive(c) = {b, c}: 1 shared of 3 total
        assert!((pairs[0].similarity() - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn stream_is_sorted_and_deterministic() {
        let mut builder = GraphBuilder::new();
        for (a, b) in [
            ("a", "b"),
            ("a", "c"),
            ("b", "c"),
            ("c", "d"),
            ("d", "e"),
            ("d", "f"),
            ("e", "f"),
        ] {
            builder.add_edge(a, b).unwrap();
        }
        let graph = builder.build().unwrap();

        let first = similarities_unweighted(&graph);
        let second = similarities_unweighted(&graph);
        assert_eq!(first, second);
        for window in first.windows(2) {
            assert!(window[0].dissimilarity <= window[1].dissimilarity);
        }
    }

    #[test]
    fn equal_weights_match_jaccard() {
        let graph = path();
        let unweighted = similarities_unweighted(&graph);

        let mut weights = EdgeWeights::new();
        for &edge in &graph.edges {
            weights.insert(edge, 1.0);
        }
        let weighted = similarities_weighted(&graph, &weights).unwrap();

        assert_eq!(unweighted.len(), weighted.len());
        for (u, w) in unweighted.iter().zip(&weighted) {
            assert_eq!(u.edges, w.edges);
            assert!((u.dissimilarity - w.dissimilarity).abs() < 1e-12);
        }
    }

    #[test]
    fn tanimoto_hand_computed_unequal_weights() {
        // a - b - c with w(ab) = 2, w(bc) = 1:
        // self weights a: 2, b: 1.5, c: 1
        // normSq(a) = 4 + 4 = 8, normSq(c) = 1 + 1 = 2
        // dot over {b} = 2 * 1 = 2, so S = 2 / (8 + 2 - 2) = 0.25
        let graph = path();
        let mut weights = EdgeWeights::new();
        weights.insert(graph.edges[0], 2.0);
        weights.insert(graph.edges[1], 1.0);

        let pairs = similarities_weighted(&graph, &weights).unwrap();
        assert_eq!(pairs.len(), 1);
        assert!((pairs[0].similarity() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn tanimoto_is_symmetric_in_the_two_edges() {
        let graph = triangle();
        let mut weights = EdgeWeights::new();
        weights.insert(graph.edges[0], 0.5);
        weights.insert(graph.edges[1], 2.0);
        weights.insert(graph.edges[2], 1.0);

        // Pair canonicalization already collapses (e1, e2) and (e2, e1);
        // scoring must not depend on enumeration order, so the same stream
        // comes out of repeated runs.
        let first = similarities_weighted(&graph, &weights).unwrap();
        let second = similarities_weighted(&graph, &weights).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn zero_weights_score_zero_similarity() {
        let graph = path();
        let mut weights = EdgeWeights::new();
        for &edge in &graph.edges {
            weights.insert(edge, 0.0);
        }

        let pairs = similarities_weighted(&graph, &weights).unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].similarity(), 0.0);
    }

    #[test]
    fn missing_weight_fails_fast() {
        let graph = path();
        let mut weights = EdgeWeights::new();
        weights.insert(graph.edges[0], 1.0);

        let err = similarities_weighted(&graph, &weights).unwrap_err();
        assert_eq!(err, ClusterError::MissingWeight(graph.edges[1]));
    }

    #[test]
    fn negative_weight_fails_fast() {
        let graph = path();
        let mut weights = EdgeWeights::new();
        weights.insert(graph.edges[0], 1.0);
        weights.insert(graph.edges[1], -0.5);

        let err = similarities_weighted(&graph, &weights).unwrap_err();
        assert_eq!(err, ClusterError::InvalidWeight(graph.edges[1], -0.5));
    }
}
