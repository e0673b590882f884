//! RxGap CLI - reports RxNorm drug codes missing from the Vaccine Ontology

use std::path::PathBuf;

use clap::Parser;
use rxgap_core::config::Config;
use rxgap_core::ontology::OntologySource;
use rxgap_core::pipeline::{self, Progress};
use rxgap_core::report;
use rxgap_core::rxnav::RxNavClient;

#[derive(Parser)]
#[command(name = "rxgap")]
#[command(
    author,
    version,
    about = "Reports RxNorm drug codes missing from the Vaccine Ontology",
    long_about = None
)]
struct Cli {
    /// Ontology file path or URL (defaults to the configured source)
    ontology: Option<String>,

    /// Where to write the CSV report
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Rows shown in the preview after the run
    #[arg(long)]
    preview_rows: Option<usize>,

    /// Quiet mode (minimal output)
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing; stdout is reserved for progress and the preview
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("rxgap=info".parse()?)
                .add_directive("rxgap_core=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let client = RxNavClient::new(&config.rxnav)?;

    let source = match &cli.ontology {
        Some(arg) => OntologySource::parse(arg),
        None => OntologySource::parse(&config.ontology.source),
    };
    let output = cli.output.unwrap_or_else(|| config.output.path.clone());
    let preview_rows = cli.preview_rows.unwrap_or(config.output.preview_rows);
    let quiet = cli.quiet;

    let summary = pipeline::run(&config, &client, &source, |event| {
        if !quiet {
            print_progress(&event);
        }
    })
    .await?;

    report::write_csv(&output, &summary.missing)?;

    if !quiet {
        println!("Missing RxNorm terms saved to: {}", output.display());
        println!("\nPreview of missing terms:");
        println!("{}", report::preview(&summary.missing, preview_rows));
    }

    Ok(())
}

/// One line per pipeline stage, plus a tick every hundred expansions.
fn print_progress(event: &Progress) {
    match event {
        Progress::ExtractingExisting { .. } => {
            println!("Step 1: Loading VO and extracting existing RxNorm terms...");
        }
        Progress::ExistingFound { count } => {
            println!("Found {count} unique RxNorm CUIs in VO");
        }
        Progress::CollectingCandidates => {
            println!("Step 2: Fetching potential vaccine-related RxNorm concepts...");
        }
        Progress::CollectingSource { name } => {
            println!("Collecting from {name}...");
        }
        Progress::SeedsFound { count } => {
            println!("Found {count} initial RxNorm concepts");
        }
        Progress::ExpandingRelated => {
            println!("Finding related concepts...");
        }
        Progress::RelatedProcessed { done, total } => {
            if done % 100 == 0 {
                println!("Processed {done}/{total} concepts...");
            }
        }
        Progress::CandidatesExpanded { count } => {
            println!("Found {count} total RxNorm concepts after expansion");
        }
        Progress::Differencing => {
            println!("Step 3: Identifying missing RxNorm terms...");
        }
        Progress::MissingFound { count } => {
            println!("Found {count} RxNorm terms not in VO");
        }
    }
}
