//! Single-linkage clustering over the edge similarity stream
//!
//! The driver consumes scored edge pairs in decreasing-similarity order and
//! merges their communities one pair at a time. Partition density is only
//! compared at similarity level boundaries: all merges at one level commit
//! before the level is evaluated, so the chosen best partition does not
//! depend on the arbitrary ordering of tied pairs.

use crate::cluster::similarity::{similarities_unweighted, similarities_weighted, ScoredPair};
use crate::cluster::state::CommunityState;
use crate::cluster::{ClusterOutcome, DensitySample};
use crate::error::ClusterError;
use crate::graph::{EdgeWeights, LinkGraph};

/// Cluster the edges of `graph` into link communities.
///
/// With `weights` the Tanimoto similarity engine is used, otherwise Jaccard.
/// A `threshold` switches to one-shot clustering: merging stops once
/// similarity falls below it and the raw partition comes back without any
/// best-density search. Without a threshold the density-optimal partition is
/// returned, along with the merge dendrogram when `record_dendrogram` is set.
pub fn cluster_links(
    graph: &LinkGraph,
    weights: Option<&EdgeWeights>,
    threshold: Option<f64>,
    record_dendrogram: bool,
) -> Result<ClusterOutcome, ClusterError> {
    if threshold.is_some() && record_dendrogram {
        return Err(ClusterError::ThresholdWithDendrogram);
    }

    let stream = match weights {
        Some(w) => similarities_weighted(graph, w)?,
        None => similarities_unweighted(graph),
    };
    log::info!(
        "clustering {} edges over {} scored pairs",
        graph.edge_count(),
        stream.len()
    );

    let mut state = CommunityState::new(&graph.edges, record_dendrogram)?;

    let mut best_density = 0.0_f64;
    let mut best_similarity = 1.0_f64;
    let mut best_partition = None;
    let mut profile = vec![DensitySample {
        similarity: 1.0,
        density: 0.0,
    }];
    let mut prev_similarity: Option<f64> = None;

    // One sentinel entry past the real stream guarantees a final density
    // check even when the last merge produces the global maximum (e.g. the
    // whole graph is a single clique).
    let entries = stream
        .iter()
        .map(|pair: &ScoredPair| (pair.similarity(), Some(pair.edges)))
        .chain(std::iter::once((0.0, None)));

    for (similarity, edge_pair) in entries {
        if let Some(cutoff) = threshold {
            if similarity < cutoff {
                break;
            }
        }

        if prev_similarity != Some(similarity) {
            // Evaluate the partition as it stood at the end of the previous
            // level, before any merge at this one.
            if state.partition_density() >= best_density {
                best_density = state.partition_density();
                best_similarity = similarity;
                best_partition = Some(state.snapshot());
            }
            profile.push(DensitySample {
                similarity,
                density: state.partition_density(),
            });
            prev_similarity = Some(similarity);
        }

        if let Some((a, b)) = edge_pair {
            state.merge(a, b, similarity);
        }
    }

    if threshold.is_some() {
        log::info!(
            "threshold clustering done: {} communities, density {:.6}",
            state.community_count(),
            state.partition_density()
        );
        return Ok(ClusterOutcome::Threshold {
            partition: state.snapshot(),
            partition_density: state.partition_density(),
        });
    }

    let partition = best_partition.unwrap_or_else(|| state.snapshot());
    log::info!(
        "best partition at similarity {:.6} with density {:.6}",
        best_similarity,
        best_density
    );

    Ok(ClusterOutcome::Optimal {
        partition,
        best_similarity,
        best_density,
        density_profile: profile,
        dendrogram: state.into_dendrogram(),
    })
}
