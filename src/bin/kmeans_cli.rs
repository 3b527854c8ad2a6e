//! Command-line front-end: load points from a delimited file, cluster them,
//! and write each point with its 1-based cluster id.
//!
//! Usage: `kmeans-cli --input data.csv --k 3 --metric cosine --update median`

use clap::Parser;
use kmeans_strategies::io::{read_points, write_assignments, CsvOptions};
use kmeans_strategies::{ClusterConfig, KMeans, Metric, UpdateRule};
use std::fs::OpenOptions;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "kmeans-cli", about = "Cluster points from a delimited text file with k-means")]
struct Args {
    /// Input file, one point per row
    #[arg(short, long)]
    input: PathBuf,

    /// Output file (appended to); results go to stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of clusters
    #[arg(short, long, default_value_t = 3)]
    k: usize,

    /// Number of assign/update iterations
    #[arg(short = 'm', long, default_value_t = 100)]
    max_iters: usize,

    /// Assignment worker threads
    #[arg(short = 'n', long, default_value_t = 2)]
    threads: usize,

    /// Distance metric: euclidean | cosine
    #[arg(short = 'd', long, default_value = "euclidean")]
    metric: Metric,

    /// Update rule: mean | weighted-reseed | median
    #[arg(short, long, default_value = "mean")]
    update: UpdateRule,

    /// Random seed (entropy when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Skip the first row of the input
    #[arg(long)]
    has_header: bool,

    /// Column holding the point label
    #[arg(long)]
    label_column: Option<usize>,

    /// Comma-separated columns to ignore
    #[arg(long, value_delimiter = ',')]
    ignore_columns: Vec<usize>,

    /// Log per-iteration progress
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let options = CsvOptions {
        has_header: args.has_header,
        label_column: args.label_column,
        ignore_columns: args.ignore_columns.clone(),
        ..Default::default()
    };
    let points = read_points(&args.input, &options)?;
    eprintln!("Dataset: {}", args.input.display());

    let mut config = ClusterConfig::new(args.k)
        .with_max_iters(args.max_iters)
        .with_num_threads(args.threads)
        .with_metric(args.metric)
        .with_update_rule(args.update);
    config.seed = args.seed;

    let start = Instant::now();
    let result = KMeans::with_config(config).cluster(&points)?;
    eprintln!("Cluster Time: {} ms", start.elapsed().as_millis());

    match &args.output {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            write_assignments(BufWriter::new(file), &points, &result)?;
            eprintln!("Saved assignments to {}", path.display());
        }
        None => {
            println!("Result:");
            write_assignments(std::io::stdout().lock(), &points, &result)?;
        }
    }

    Ok(())
}
