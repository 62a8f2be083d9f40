use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use roll_cutter::RunConfig;
use roll_cutter::config::DEFAULT_OUTPUT_PATH;
use roll_cutter::host::{self, ArgsHost, JsonFileHost, parse_width};
use roll_cutter::types::ParentRoll;
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "roll_cutter",
    about = "1D cutting stock optimizer for parent rolls of a single width"
)]
struct Cli {
    /// Parent roll width (e.g. 100 or 2440.5)
    #[arg(long, value_parser = parse_stock)]
    stock: f64,

    /// Cut pieces as width:qty (e.g. 30:4 40:2)
    #[arg(
        long = "cuts",
        num_args = 1..,
        conflicts_with = "input",
        required_unless_present = "input"
    )]
    cuts: Vec<String>,

    /// Read cut pieces from a JSON file of {"width", "qty"} objects
    #[arg(long)]
    input: Option<PathBuf>,

    /// Chunk size for the ILP decomposition; repeat to try several
    #[arg(long = "chunk-size", default_values_t = [8])]
    chunk_sizes: Vec<usize>,

    /// Time budget for the ILP trials in seconds
    #[arg(long, default_value = "30", value_parser = parse_budget)]
    time_budget: Duration,

    /// Where to write the roll plans as JSON
    #[arg(long, default_value = DEFAULT_OUTPUT_PATH)]
    output: PathBuf,

    /// Do not write the JSON output file
    #[arg(long)]
    no_output: bool,

    /// Disable the slot-ordering constraints in the model
    #[arg(long)]
    no_symmetry_breaking: bool,

    /// Show an ASCII layout of each roll
    #[arg(long)]
    layout: bool,

    /// Log solver progress to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn parse_stock(s: &str) -> Result<f64, String> {
    parse_width(s).map_err(|e| e.to_string())
}

fn parse_budget(s: &str) -> Result<Duration, String> {
    s.parse::<f64>()
        .ok()
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        .ok_or_else(|| format!("invalid time budget '{}', expected seconds", s))
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let config = RunConfig {
        chunk_sizes: cli.chunk_sizes,
        time_budget: cli.time_budget,
        emit_output: !cli.no_output,
        output_path: cli.output,
        symmetry_breaking: !cli.no_symmetry_breaking,
    };
    let parent = ParentRoll::new(cli.stock);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        });

    let stdout = std::io::stdout();
    let result = match cli.input {
        Some(path) => {
            let mut host = JsonFileHost::new(path, stdout.lock(), cli.layout);
            runtime.block_on(host::run(&mut host, parent, &config))
        }
        None => {
            let mut host = ArgsHost::new(cli.cuts, stdout.lock(), cli.layout);
            runtime.block_on(host::run(&mut host, parent, &config))
        }
    };

    // An abandoned ILP trial may still be running; don't wait for it.
    runtime.shutdown_background();

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
