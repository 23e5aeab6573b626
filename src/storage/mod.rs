//! Results persistence module

use crate::cluster::metrics::summarize_partition;
use crate::cluster::{ClusterOutcome, CommunityReport};
use crate::config::Config;
use crate::graph::LinkGraph;
use anyhow::Result;
use serde_json::{json, to_string_pretty};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Save analysis results to the specified directory.
pub fn save_results(
    outcome: &ClusterOutcome,
    graph: &LinkGraph,
    config: &Config,
    output_dir: &str,
) -> Result<()> {
    let reports = summarize_partition(outcome.partition(), config.min_community_edges);
    log::info!("Saving {} communities to {}", reports.len(), output_dir);

    // Ensure output directory exists
    fs::create_dir_all(output_dir)?;

    save_summary(outcome, &reports, graph, output_dir)?;
    save_communities(&reports, graph, output_dir)?;

    if let ClusterOutcome::Optimal {
        density_profile,
        dendrogram,
        ..
    } = outcome
    {
        save_density_profile(density_profile, output_dir)?;
        if let Some(dendrogram) = dendrogram {
            let path = Path::new(output_dir).join("dendrogram.json");
            let mut file = File::create(path)?;
            file.write_all(to_string_pretty(dendrogram)?.as_bytes())?;
        }
    }

    log::info!("Results saved successfully");

    Ok(())
}

/// Save summary information.
fn save_summary(
    outcome: &ClusterOutcome,
    reports: &[CommunityReport],
    graph: &LinkGraph,
    output_dir: &str,
) -> Result<()> {
    log::info!("Saving summary information");

    let path = Path::new(output_dir).join("summary.json");
    let mut file = File::create(path)?;

    let run_stats = match outcome {
        ClusterOutcome::Threshold {
            partition_density, ..
        } => json!({
            "mode": "threshold",
            "partition_density": partition_density,
        }),
        ClusterOutcome::Optimal {
            best_similarity,
            best_density,
            dendrogram,
            ..
        } => json!({
            "mode": "optimal",
            "best_similarity": best_similarity,
            "best_density": best_density,
            "dendrogram_recorded": dendrogram.is_some(),
        }),
    };

    let summary = json!({
        "graph_stats": {
            "node_count": graph.node_count,
            "edge_count": graph.edge_count(),
            "avg_degree": 2.0 * graph.edge_count() as f64 / graph.node_count as f64,
        },
        "community_stats": {
            "community_count": reports.len(),
            "total_clustered_edges": reports.iter().map(|r| r.edge_count).sum::<usize>(),
            "largest_community_edges": reports.first().map_or(0, |r| r.edge_count),
            "avg_link_density": reports.iter().map(|r| r.link_density).sum::<f64>() /
                                if reports.is_empty() { 1.0 } else { reports.len() as f64 },
        },
        "run_stats": run_stats,
    });

    file.write_all(to_string_pretty(&summary)?.as_bytes())?;

    Ok(())
}

/// Save individual community information.
fn save_communities(
    reports: &[CommunityReport],
    graph: &LinkGraph,
    output_dir: &str,
) -> Result<()> {
    log::info!("Saving individual community information");

    // Create communities directory
    let communities_dir = Path::new(output_dir).join("communities");
    fs::create_dir_all(&communities_dir)?;

    // Create a JSON file for each community
    for report in reports {
        let path = communities_dir.join(format!("community_{}.json", report.id));
        let mut file = File::create(path)?;

        let member_nodes: Vec<String> = report
            .nodes
            .iter()
            .map(|&node| graph.node_label(node))
            .collect();
        let member_edges: Vec<[String; 2]> = report
            .edges
            .iter()
            .map(|edge| [graph.node_label(edge.0), graph.node_label(edge.1)])
            .collect();

        let community_json = json!({
            "id": report.id,
            "edge_count": report.edge_count,
            "node_count": report.node_count,
            "link_density": report.link_density,
            "nodes": member_nodes,
            "edges": member_edges,
        });

        file.write_all(to_string_pretty(&community_json)?.as_bytes())?;
    }

    // Create a JSON file with all communities
    let all_path = Path::new(output_dir).join("all_communities.json");
    let mut all_file = File::create(all_path)?;

    let communities_json = json!({
        "communities": reports.iter().map(|r| {
            json!({
                "id": r.id,
                "edge_count": r.edge_count,
                "node_count": r.node_count,
                "link_density": r.link_density,
            })
        }).collect::<Vec<_>>()
    });

    all_file.write_all(to_string_pretty(&communities_json)?.as_bytes())?;

    Ok(())
}

/// Save the (similarity, density) sample log.
fn save_density_profile(
    profile: &[crate::cluster::DensitySample],
    output_dir: &str,
) -> Result<()> {
    let path = Path::new(output_dir).join("density_profile.json");
    let mut file = File::create(path)?;
    file.write_all(to_string_pretty(profile)?.as_bytes())?;
    Ok(())
}
