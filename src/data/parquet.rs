//! Parquet edge list loading

use crate::graph::{EdgeWeights, GraphBuilder, LinkGraph};
use anyhow::Result;
use polars::prelude::*;

/// Load an edge list from a Parquet file.
///
/// Expects string columns `Source` and `Target`; with `weighted` set, a
/// `Weight` column of floats as well.
pub fn load_edge_data(path: &str, weighted: bool) -> Result<(LinkGraph, Option<EdgeWeights>)> {
    log::info!("Reading parquet file: {}", path);

    // Check if the file exists
    if !std::path::Path::new(path).exists() {
        return Err(anyhow::anyhow!("File not found: {}", path));
    }

    let df = LazyFrame::scan_parquet(path, Default::default())?.collect()?;

    log::info!("File schema: {:?}", df.schema());
    log::info!("Loaded {} edge rows", df.height());

    let source_col = df.column("Source")?.str()?;
    let target_col = df.column("Target")?.str()?;
    let weight_col = if weighted {
        Some(df.column("Weight")?.f64()?)
    } else {
        None
    };

    let mut builder = GraphBuilder::with_capacity(df.height());
    let mut weights = weighted.then(EdgeWeights::new);

    for i in 0..df.height() {
        let (src, dst) = match (source_col.get(i), target_col.get(i)) {
            (Some(src), Some(dst)) => (src, dst),
            _ => return Err(anyhow::anyhow!("null endpoint in row {}", i)),
        };
        let edge = builder.add_edge(src, dst)?;

        if let (Some(col), Some(weights)) = (weight_col, weights.as_mut()) {
            let weight = col
                .get(i)
                .ok_or_else(|| anyhow::anyhow!("null weight in row {}", i))?;
            weights.insert(edge, weight);
        }
    }

    if builder.edge_count() == 0 {
        return Err(anyhow::anyhow!("no edges found in {}", path));
    }

    let graph = builder.build()?;
    log::info!(
        "Loaded graph with {} nodes and {} edges",
        graph.node_count,
        graph.edge_count()
    );

    Ok((graph, weights))
}
