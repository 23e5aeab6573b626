//! Export module for external visualization tools

use crate::cluster::metrics::summarize_partition;
use crate::cluster::{ClusterOutcome, CommunityReport};
use crate::config::Config;
use crate::graph::LinkGraph;
use anyhow::Result;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Generate export files from analysis results.
pub fn generate_exports(
    outcome: &ClusterOutcome,
    graph: &LinkGraph,
    config: &Config,
    output_dir: &str,
) -> Result<()> {
    let reports = summarize_partition(outcome.partition(), config.min_community_edges);
    log::info!("Generating exports for {} communities", reports.len());

    // Create exports directory
    let viz_dir = Path::new(output_dir).join("exports");
    fs::create_dir_all(&viz_dir)?;

    generate_graphml(&reports, graph, &viz_dir)?;
    generate_stats_csv(&reports, graph, &viz_dir)?;

    if let ClusterOutcome::Optimal {
        density_profile, ..
    } = outcome
    {
        let profile_path = viz_dir.join("density_profile.csv");
        let mut profile_file = File::create(profile_path)?;
        writeln!(profile_file, "similarity,density")?;
        for sample in density_profile {
            writeln!(profile_file, "{},{}", sample.similarity, sample.density)?;
        }
    }

    log::info!("Exports generated successfully");

    Ok(())
}

/// Write a GraphML file per large community.
fn generate_graphml(
    reports: &[CommunityReport],
    graph: &LinkGraph,
    viz_dir: &Path,
) -> Result<()> {
    log::info!("Generating GraphML files");

    let data_dir = viz_dir.join("graphml");
    fs::create_dir_all(&data_dir)?;

    for report in reports.iter().take(10) {
        // Only top 10 communities
        let file_path = data_dir.join(format!("community_{}.graphml", report.id));
        let mut file = File::create(file_path)?;

        // Write GraphML header
        writeln!(file, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;
        writeln!(
            file,
            "<graphml xmlns=\"http://graphml.graphdrawing.org/xmlns\">"
        )?;
        writeln!(file, "  <graph id=\"G\" edgedefault=\"undirected\">")?;

        // Write nodes
        for &node in &report.nodes {
            writeln!(
                file,
                "    <node id=\"n{}\">\n      <data key=\"label\">{}</data>\n    </node>",
                node,
                graph.node_label(node)
            )?;
        }

        // Write edges
        for (edge_id, edge) in report.edges.iter().enumerate() {
            writeln!(
                file,
                "    <edge id=\"e{}\" source=\"n{}\" target=\"n{}\"/>",
                edge_id, edge.0, edge.1
            )?;
        }

        // Write GraphML footer
        writeln!(file, "  </graph>")?;
        writeln!(file, "</graphml>")?;
    }

    Ok(())
}

/// Write CSV files with community statistics and edge assignments.
fn generate_stats_csv(
    reports: &[CommunityReport],
    graph: &LinkGraph,
    viz_dir: &Path,
) -> Result<()> {
    log::info!("Generating statistics CSVs");

    let stats_path = viz_dir.join("community_stats.csv");
    let mut stats_file = File::create(stats_path)?;

    writeln!(stats_file, "community_id,edge_count,node_count,link_density")?;
    for report in reports {
        writeln!(
            stats_file,
            "{},{},{},{:.6}",
            report.id, report.edge_count, report.node_count, report.link_density
        )?;
    }

    // Edge to community assignment for external plotting
    let edges_path = viz_dir.join("edges.csv");
    let mut edges_file = File::create(edges_path)?;

    writeln!(edges_file, "source,target,community_id")?;
    for report in reports {
        for edge in &report.edges {
            writeln!(
                edges_file,
                "{},{},{}",
                graph.node_label(edge.0),
                graph.node_label(edge.1),
                report.id
            )?;
        }
    }

    Ok(())
}
