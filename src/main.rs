use anyhow::Result;
use clap::Parser;

use link_community_analyzer::cluster::detection::cluster_links;
use link_community_analyzer::config::Config;
use link_community_analyzer::{data, storage, viz};

#[derive(Parser, Debug)]
#[clap(
    name = "link-community-analyzer",
    about = "Hierarchical link community detection over edge-list graphs"
)]
struct Cli {
    /// Path to input edge list (text pairs, or Parquet with .parquet extension)
    #[clap(long)]
    input: String,

    /// Read edge weights (third column / Weight column) and use Tanimoto similarity
    #[clap(long)]
    weighted: bool,

    /// Output directory for results
    #[clap(long, default_value = "linkcomm_results")]
    output_dir: String,

    /// Stop merging below this similarity instead of optimizing partition density
    #[clap(long)]
    threshold: Option<f64>,

    /// Record the full merge dendrogram
    #[clap(long)]
    dendrogram: bool,

    /// Drop nodes below this degree before clustering (0 = keep everything)
    #[clap(long, default_value = "0")]
    min_degree: usize,

    /// Smallest community (edge count) included in reports
    #[clap(long, default_value = "2")]
    min_community_edges: usize,

    /// Skip export file generation
    #[clap(long)]
    skip_exports: bool,

    /// Verbose logging
    #[clap(long, short)]
    verbose: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Cli::parse();

    // Configure logging
    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    log::info!("Starting link community analysis");
    log::info!("Input: {}", args.input);
    log::info!("Output: {}", args.output_dir);

    let config = Config::new(
        args.threshold,
        args.dendrogram,
        args.min_degree,
        args.min_community_edges,
    );

    // Create output directory
    std::fs::create_dir_all(&args.output_dir)?;

    // 1. Load data
    let (graph, weights) = if args.input.ends_with(".parquet") {
        data::parquet::load_edge_data(&args.input, args.weighted)?
    } else if args.weighted {
        let (graph, weights) = data::edgelist::load_weighted_edge_list(&args.input)?;
        (graph, Some(weights))
    } else {
        (data::edgelist::load_edge_list(&args.input)?, None)
    };

    // 2. Optional degree filter
    let (graph, weights) =
        data::preprocessing::filter_by_degree(&graph, weights.as_ref(), config.min_degree)?;

    // 3. Cluster the edges
    let outcome = cluster_links(
        &graph,
        weights.as_ref(),
        config.threshold,
        config.record_dendrogram,
    )?;

    // 4. Save results
    storage::save_results(&outcome, &graph, &config, &args.output_dir)?;

    // 5. Generate exports if requested
    if !args.skip_exports {
        viz::generate_exports(&outcome, &graph, &config, &args.output_dir)?;
    }

    log::info!("Analysis complete. Results saved to {}", args.output_dir);

    Ok(())
}
