//! End-to-end pipeline tests: build a graph, cluster its edges, persist the
//! results.

use link_community_analyzer::cluster::detection::cluster_links;
use link_community_analyzer::cluster::metrics::{partition_density, summarize_partition};
use link_community_analyzer::cluster::ClusterOutcome;
use link_community_analyzer::config::Config;
use link_community_analyzer::graph::{EdgeWeights, GraphBuilder, LinkGraph};
use link_community_analyzer::{storage, viz};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use std::path::PathBuf;

/// Two triangles a-b-c and d-e-f joined by the bridge c-d.
fn two_triangles() -> LinkGraph {
    let mut builder = GraphBuilder::new();
    for (a, b) in [
        ("a", "b"),
        ("a", "c"),
        ("b", "c"),
        ("d", "e"),
        ("d", "f"),
        ("e", "f"),
        ("c", "d"),
    ] {
        builder.add_edge(a, b).unwrap();
    }
    builder.build().unwrap()
}

/// Erdos-Renyi style graph over `n` labeled nodes with edge probability `p`.
fn random_graph(n: u32, p: f64, seed: u64) -> LinkGraph {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut builder = GraphBuilder::new();
    for a in 0..n {
        for b in (a + 1)..n {
            if rng.gen_bool(p) {
                builder
                    .add_edge(&format!("n{}", a), &format!("n{}", b))
                    .unwrap();
            }
        }
    }
    builder.build().unwrap()
}

/// Number of connected components, over nodes that carry edges.
fn component_count(graph: &LinkGraph) -> usize {
    let mut visited = vec![false; graph.node_count];
    let mut components = 0;
    for start in 0..graph.node_count {
        if visited[start] || graph.degree(start) == 0 {
            continue;
        }
        components += 1;
        let mut stack = vec![start];
        visited[start] = true;
        while let Some(node) = stack.pop() {
            for &nbr in graph.neighbors(node) {
                if !visited[nbr as usize] {
                    visited[nbr as usize] = true;
                    stack.push(nbr as usize);
                }
            }
        }
    }
    components
}

fn fresh_output_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(name);
    if dir.exists() {
        std::fs::remove_dir_all(&dir).unwrap();
    }
    dir
}

#[test]
fn optimal_run_separates_the_triangles() {
    let graph = two_triangles();
    let outcome = cluster_links(&graph, None, None, false).unwrap();

    let ClusterOutcome::Optimal {
        partition,
        best_density,
        best_similarity,
        density_profile,
        ..
    } = outcome
    else {
        panic!("expected optimal outcome");
    };

    assert!((best_density - 6.0 / 7.0).abs() < 1e-12);
    assert!((best_similarity - 1.0 / 6.0).abs() < 1e-12);

    // Valid partition over every input edge
    assert_eq!(partition.len(), graph.edge_count());
    let ids: HashSet<_> = partition.values().copied().collect();
    assert_eq!(ids.len(), 3);

    // Profile similarities never increase after the seed sample
    for window in density_profile[1..].windows(2) {
        assert!(window[0].similarity >= window[1].similarity);
    }
}

#[test]
fn incremental_density_matches_recompute_on_random_graphs() {
    for seed in [7, 21, 1234] {
        let graph = random_graph(18, 0.2, seed);
        if graph.edge_count() == 0 {
            continue;
        }

        let outcome = cluster_links(&graph, None, None, false).unwrap();
        let ClusterOutcome::Optimal {
            partition,
            best_density,
            ..
        } = outcome
        else {
            panic!("expected optimal outcome");
        };

        assert_eq!(partition.len(), graph.edge_count());
        assert!((partition_density(&partition) - best_density).abs() < 1e-9);
    }
}

#[test]
fn weighted_random_run_is_consistent() {
    let graph = random_graph(15, 0.25, 99);
    let mut rng = SmallRng::seed_from_u64(5);
    let mut weights = EdgeWeights::new();
    for &edge in &graph.edges {
        weights.insert(edge, rng.gen_range(0.1..2.0));
    }

    let outcome = cluster_links(&graph, Some(&weights), None, false).unwrap();
    let ClusterOutcome::Optimal {
        partition,
        best_density,
        ..
    } = outcome
    else {
        panic!("expected optimal outcome");
    };

    assert_eq!(partition.len(), graph.edge_count());
    assert!((partition_density(&partition) - best_density).abs() < 1e-9);
}

#[test]
fn dendrogram_covers_all_merges_down_to_components() {
    let graph = random_graph(16, 0.18, 321);
    if graph.edge_count() == 0 {
        return;
    }

    let outcome = cluster_links(&graph, None, None, true).unwrap();
    let ClusterOutcome::Optimal { dendrogram, .. } = outcome else {
        panic!("expected optimal outcome");
    };
    let dendrogram = dendrogram.unwrap();

    // Every edge-adjacent pair eventually merges, so the run bottoms out at
    // one community per connected component
    assert_eq!(
        dendrogram.merges.len(),
        graph.edge_count() - component_count(&graph)
    );

    // Consumed ids are never reused
    let mut consumed = HashSet::new();
    for entry in &dendrogram.merges {
        assert!(consumed.insert(entry.left));
        assert!(consumed.insert(entry.right));
    }
}

#[test]
fn threshold_run_keeps_unmerged_tail() {
    let graph = two_triangles();
    let outcome = cluster_links(&graph, None, Some(0.5), false).unwrap();

    let ClusterOutcome::Threshold {
        partition,
        partition_density: density,
    } = outcome
    else {
        panic!("expected threshold outcome");
    };

    let reports = summarize_partition(&partition, 1);
    assert_eq!(reports.len(), 3);
    assert!((density - partition_density(&partition)).abs() < 1e-12);
}

#[test]
fn results_and_exports_land_on_disk() {
    let graph = two_triangles();
    let outcome = cluster_links(&graph, None, None, true).unwrap();

    let config = Config::default();
    let dir = fresh_output_dir("linkcomm_pipeline_out");
    let dir_str = dir.to_str().unwrap();

    storage::save_results(&outcome, &graph, &config, dir_str).unwrap();
    viz::generate_exports(&outcome, &graph, &config, dir_str).unwrap();

    assert!(dir.join("summary.json").exists());
    assert!(dir.join("all_communities.json").exists());
    assert!(dir.join("density_profile.json").exists());
    assert!(dir.join("dendrogram.json").exists());
    assert!(dir.join("communities").is_dir());
    assert!(dir.join("exports").join("community_stats.csv").exists());
    assert!(dir.join("exports").join("edges.csv").exists());
    assert!(dir.join("exports").join("density_profile.csv").exists());
    assert!(dir.join("exports").join("graphml").is_dir());

    let summary = std::fs::read_to_string(dir.join("summary.json")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&summary).unwrap();
    assert_eq!(parsed["graph_stats"]["edge_count"], 7);
    assert_eq!(parsed["run_stats"]["mode"], "optimal");
}
