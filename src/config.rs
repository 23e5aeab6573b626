//! Configuration management for the link community analyzer

/// Default configuration for a clustering run.
pub struct Config {
    /// Optional similarity cutoff for one-shot threshold clustering
    pub threshold: Option<f64>,

    /// Record the full merge dendrogram
    pub record_dendrogram: bool,

    /// Minimum node degree kept by the preprocessing filter (0 disables)
    pub min_degree: usize,

    /// Smallest community (by edge count) included in reports
    pub min_community_edges: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threshold: None,
            record_dendrogram: false,
            min_degree: 0,
            min_community_edges: 2,
        }
    }
}

impl Config {
    /// Create a new configuration with custom values.
    pub fn new(
        threshold: Option<f64>,
        record_dendrogram: bool,
        min_degree: usize,
        min_community_edges: usize,
    ) -> Self {
        Self {
            threshold,
            record_dendrogram,
            min_degree,
            min_community_edges,
        }
    }
}
