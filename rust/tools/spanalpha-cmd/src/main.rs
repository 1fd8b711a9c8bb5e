use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod utils;

#[derive(Parser)]
#[command(name = "spanalpha-cmd")]
#[command(about = "Builds Krippendorff reliability data from span highlight exports")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write one exchange file per topic
    Split {
        /// Highlighter export (CSV, optionally gzipped)
        #[arg(short, long)]
        input_file: String,

        /// Directory for the per-topic files
        #[arg(short, long)]
        output_dir: String,

        #[command(flatten)]
        pipeline: commands::PipelineArgs,
    },

    /// Print a JSON summary of the reliability data
    Inspect {
        /// Highlighter export (CSV, optionally gzipped)
        #[arg(short, long)]
        input_file: String,

        #[command(flatten)]
        pipeline: commands::PipelineArgs,
    },
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "spanalpha=info",
        1 => "spanalpha=debug",
        _ => "spanalpha=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    tracing::debug!("spanalpha-cmd {}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Split {
            input_file,
            output_dir,
            pipeline,
        } => commands::split::run(input_file, output_dir, pipeline),
        Commands::Inspect {
            input_file,
            pipeline,
        } => commands::inspect::run(cli.verbose, input_file, pipeline),
    }
}
