use anyhow::Result;
use clap::Parser;

use adjacency_loader::data::parquet::{self, RelationshipColumns};
use adjacency_loader::import::load_relationships;
use adjacency_loader::{storage, GraphSetup, PropertySpec};

#[derive(Parser, Debug)]
#[clap(
    name = "adjacency-loader",
    about = "Parallel import of relationships into compressed adjacency lists"
)]
struct Cli {
    /// Path to input Parquet file with one relationship per row
    #[clap(long)]
    input: String,

    /// Output directory for the import summary
    #[clap(long, default_value = "import_results")]
    output_dir: String,

    /// JSON file with the graph setup; flags below override it
    #[clap(long)]
    setup: Option<String>,

    /// Column holding the source node id
    #[clap(long, default_value = "source")]
    source_column: String,

    /// Column holding the target node id
    #[clap(long, default_value = "target")]
    target_column: String,

    /// Column holding the relationship weight
    #[clap(long)]
    weight_column: Option<String>,

    /// Weight assumed for relationships without one
    #[clap(long, default_value = "1.0")]
    default_weight: f64,

    /// Relationship type assigned to every row
    #[clap(long, default_value = "RELATED")]
    relationship_type: String,

    /// Number of importer threads (0 = use all available cores)
    #[clap(long, default_value = "0")]
    threads: usize,

    /// Load relationships as undirected
    #[clap(long)]
    undirected: bool,

    /// Also load incoming relationships
    #[clap(long)]
    incoming: bool,

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

    let mut setup = match &args.setup {
        Some(path) => GraphSetup::from_json_file(path)?,
        None => GraphSetup::default(),
    };

    // Set number of threads
    if args.threads > 0 {
        setup.concurrency = args.threads;
    } else if args.setup.is_none() {
        setup.concurrency = num_cpus::get();
    }
    if args.undirected {
        setup.load_as_undirected = true;
    }
    if args.incoming {
        setup.load_incoming = true;
    }
    if let Some(weight) = &args.weight_column {
        setup.relationship_weight = Some(PropertySpec::new(weight.clone(), args.default_weight));
    }
    setup.validate()?;

    log::info!("Using {} importer threads", setup.concurrency);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(setup.concurrency)
        .thread_name(|index| format!("relationship-import-{}", index))
        .build()?;

    log::info!("Input: {}", args.input);
    log::info!("Output: {}", args.output_dir);

    // 1. Load relationships
    let columns = RelationshipColumns {
        source: args.source_column.clone(),
        target: args.target_column.clone(),
        weight: args.weight_column.clone(),
    };
    let store = parquet::load_store(&args.input, &columns, &args.relationship_type)?;
    let id_map = store.id_map();

    // 2. Compress adjacency lists
    let graph = load_relationships(&store, &id_map, &setup, &pool)?;

    log::info!(
        "Loaded graph with {} nodes into {} compressed bytes",
        graph.node_count(),
        graph.matrix.compressed_size()
    );

    // 3. Save summary
    storage::save_summary(&graph, &args.output_dir)?;

    log::info!("Import complete. Results saved to {}", args.output_dir);

    Ok(())
}
