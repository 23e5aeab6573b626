//! Plain-text edge list loading
//!
//! One edge per line, whitespace-delimited: `src dst` for unweighted graphs
//! and `src dst weight` for weighted ones. Blank lines and lines starting
//! with `#` are skipped.

use crate::graph::{EdgeWeights, GraphBuilder, LinkGraph};
use anyhow::{anyhow, Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};

/// Load an unweighted edge list.
pub fn load_edge_list(path: &str) -> Result<LinkGraph> {
    log::info!("Reading edge list: {}", path);

    let mut builder = GraphBuilder::new();
    for (line_no, line) in read_data_lines(path)? {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 2 {
            return Err(anyhow!(
                "line {}: expected `src dst`, got {} fields",
                line_no,
                fields.len()
            ));
        }
        builder
            .add_edge(fields[0], fields[1])
            .with_context(|| format!("line {}", line_no))?;
    }

    if builder.edge_count() == 0 {
        return Err(anyhow!("no edges found in {}", path));
    }

    let graph = builder.build()?;
    log::info!(
        "Loaded graph with {} nodes and {} edges",
        graph.node_count,
        graph.edge_count()
    );
    Ok(graph)
}

/// Load a weighted edge list.
pub fn load_weighted_edge_list(path: &str) -> Result<(LinkGraph, EdgeWeights)> {
    log::info!("Reading weighted edge list: {}", path);

    let mut builder = GraphBuilder::new();
    let mut weights = EdgeWeights::new();
    for (line_no, line) in read_data_lines(path)? {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 3 {
            return Err(anyhow!(
                "line {}: expected `src dst weight`, got {} fields",
                line_no,
                fields.len()
            ));
        }
        let weight: f64 = fields[2]
            .parse()
            .with_context(|| format!("bad weight on line {}", line_no))?;
        let edge = builder
            .add_edge(fields[0], fields[1])
            .with_context(|| format!("line {}", line_no))?;
        weights.insert(edge, weight);
    }

    if builder.edge_count() == 0 {
        return Err(anyhow!("no edges found in {}", path));
    }

    let graph = builder.build()?;
    log::info!(
        "Loaded weighted graph with {} nodes and {} edges",
        graph.node_count,
        graph.edge_count()
    );
    Ok((graph, weights))
}

/// Read a file into (line number, content) pairs, skipping blank lines and
/// `#` comments.
fn read_data_lines(path: &str) -> Result<Vec<(usize, String)>> {
    let file = File::open(path).with_context(|| format!("cannot open {}", path))?;
    let mut lines = Vec::new();
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("cannot read {}", path))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        lines.push((index + 1, trimmed.to_string()));
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_pairs_with_comments() {
        let path = write_temp(
            "linkcomm_edgelist_basic.txt",
            "# a comment\na b\nb c\n\na c\n",
        );
        let graph = load_edge_list(path.to_str().unwrap()).unwrap();
        assert_eq!(graph.node_count, 3);
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn loads_weights() {
        let path = write_temp("linkcomm_edgelist_weighted.txt", "a b 2.0\nb c 0.5\n");
        let (graph, weights) = load_weighted_edge_list(path.to_str().unwrap()).unwrap();
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(weights[&graph.edges[0]], 2.0);
        assert_eq!(weights[&graph.edges[1]], 0.5);
    }

    #[test]
    fn malformed_line_reports_line_number() {
        let path = write_temp("linkcomm_edgelist_malformed.txt", "a b\nc\n");
        let err = load_edge_list(path.to_str().unwrap()).unwrap_err();
        assert!(format!("{:#}", err).contains("line 2"));
    }

    #[test]
    fn self_loop_fails() {
        let path = write_temp("linkcomm_edgelist_selfloop.txt", "a a\n");
        assert!(load_edge_list(path.to_str().unwrap()).is_err());
    }

    #[test]
    fn missing_file_fails() {
        assert!(load_edge_list("/nonexistent/linkcomm.pairs").is_err());
    }
}
