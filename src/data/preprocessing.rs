//! Data preprocessing module for graph analysis

use crate::graph::{EdgeWeights, GraphBuilder, LinkGraph};
use anyhow::Result;

/// Filter a graph to only include nodes with a minimum degree.
///
/// Edges survive only when both endpoints pass the filter; the graph (and
/// weight map, when present) is rebuilt over the surviving edges with fresh
/// indices. A `min_degree` of 0 or 1 returns the input unchanged.
pub fn filter_by_degree(
    graph: &LinkGraph,
    weights: Option<&EdgeWeights>,
    min_degree: usize,
) -> Result<(LinkGraph, Option<EdgeWeights>)> {
    if min_degree <= 1 {
        return Ok((graph.clone(), weights.cloned()));
    }

    // Mark nodes that pass the filter
    let mut pass_filter = vec![false; graph.node_count];
    let mut filtered_count = 0;
    for node in 0..graph.node_count {
        if graph.degree(node) >= min_degree {
            pass_filter[node] = true;
            filtered_count += 1;
        }
    }

    log::info!(
        "Degree filter >= {}: keeping {} of {} nodes",
        min_degree,
        filtered_count,
        graph.node_count
    );

    // Rebuild over surviving edges, preserving insertion order and labels
    let mut builder = GraphBuilder::with_capacity(graph.edge_count());
    let mut filtered_weights = weights.map(|_| EdgeWeights::new());

    for edge in &graph.edges {
        if !pass_filter[edge.0 as usize] || !pass_filter[edge.1 as usize] {
            continue;
        }
        let src = graph.node_label(edge.0);
        let dst = graph.node_label(edge.1);
        let rebuilt = builder.add_edge(&src, &dst)?;

        if let (Some(weights), Some(filtered)) = (weights, filtered_weights.as_mut()) {
            if let Some(&w) = weights.get(edge) {
                filtered.insert(rebuilt, w);
            }
        }
    }

    log::info!("Degree filter kept {} edges", builder.edge_count());

    let filtered_graph = builder.build()?;
    Ok((filtered_graph, filtered_weights))
}
