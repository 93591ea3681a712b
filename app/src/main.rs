#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

mod command;

use clap::{Parser, Subcommand};
use clinsight_config::Config;
use command::{
    CommandStrategy, ExtractInput, ExtractStrategy, FhirInput, FhirStrategy, IngestInput,
    IngestStrategy, InfoStrategy, InitStrategy, OutputOptions, VersionStrategy,
};
use std::path::PathBuf;
use tracing::{Level, debug};
use tracing_subscriber::FmtSubscriber;

const DEFAULT_INPUT_DIR: &str = "case_reports";
const DEFAULT_OUTPUT_DIR: &str = "case_report_insights";

#[derive(Parser)]
#[command(name = "clinsight")]
#[command(about = "Anesthesia-relevant insight extraction from patient charts", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a record from chart text
    Extract {
        /// Chart text (read from stdin when neither this nor --file is given)
        text: Option<String>,

        /// Read chart text from a file
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Single-line JSON output
        #[arg(short, long)]
        compact: bool,

        /// Write the record to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Extract a record from a FHIR patient bundle
    Fhir {
        /// Bundle JSON file
        #[arg(short, long)]
        file: PathBuf,

        /// Print the generated chart text to stderr
        #[arg(long)]
        show_text: bool,

        /// Single-line JSON output
        #[arg(short, long)]
        compact: bool,

        /// Write the record to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Extract records from every case report in a directory
    Ingest {
        /// Directory containing case reports
        #[arg(short, long, env = "CASE_REPORTS_DIR")]
        input_dir: Option<PathBuf>,

        /// Directory to write JSON records to
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// File pattern inside the input directory
        #[arg(short, long)]
        glob: Option<String>,
    },
    /// Initialize configuration
    Init,
    /// Show configuration and library information
    Info,
    /// Show version
    Version,
}

fn log_level(verbose: bool, config: &Config) -> Level {
    if verbose {
        return Level::DEBUG;
    }
    config.logging.level.parse().unwrap_or(Level::INFO)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load_or_default()?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level(cli.verbose, &config))
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    debug!("Effective config: {config:?}");

    let output_options = |compact: bool, output: Option<PathBuf>| OutputOptions {
        pretty: config.output.pretty && !compact,
        output,
    };

    match cli.command {
        Commands::Extract {
            text,
            file,
            compact,
            output,
        } => ExtractStrategy.execute(ExtractInput {
            text,
            file,
            output: output_options(compact, output),
        }),
        Commands::Fhir {
            file,
            show_text,
            compact,
            output,
        } => FhirStrategy.execute(FhirInput {
            file,
            show_text,
            output: output_options(compact, output),
        }),
        Commands::Ingest {
            input_dir,
            output_dir,
            glob,
        } => IngestStrategy.execute(IngestInput {
            input_dir: input_dir
                .or_else(|| config.ingest.input_dir.clone())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT_DIR)),
            output_dir: output_dir
                .or_else(|| config.ingest.output_dir.clone())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            glob: glob.unwrap_or_else(|| config.ingest.glob.clone()),
            pretty: config.output.pretty,
        }),
        Commands::Init => InitStrategy.execute(()),
        Commands::Info => InfoStrategy.execute(()),
        Commands::Version => VersionStrategy.execute(()),
    }
}
