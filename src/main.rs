//! pdfcombine - Combine PDF files into a single document.
//!
//! Command-line front end: queue the inputs, combine them in order and
//! save the result.

use clap::Parser;
use serde_json::json;
use std::process;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use pdfcombine::cli::Cli;
use pdfcombine::codec::LopdfCodec;
use pdfcombine::config::{Config, OverwriteMode};
use pdfcombine::error::CombineError;
use pdfcombine::export::SaveToPath;
use pdfcombine::ingest::Candidate;
use pdfcombine::merge::MergeStatus;
use pdfcombine::output::{OutputFormatter, TerminalProgress, display_merge_result, display_plan};
use pdfcombine::MergeSession;

/// Exit status when a run produced no output.
const EXIT_MERGE_FAILED: i32 = 6;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    if let Err(err) = init_logging(&cli) {
        eprintln!("Warning: failed to initialize logging: {err}");
    }

    // Run the application and handle errors
    if let Err(err) = run(cli).await {
        eprintln!("Error: {err}");
        process::exit(err.exit_code());
    }
}

/// Install the global tracing subscriber. `RUST_LOG` overrides the flags.
fn init_logging(cli: &Cli) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let level = if cli.verbose {
        "debug"
    } else if cli.quiet || cli.json {
        "error"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pdfcombine={level}")));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Main application logic.
async fn run(cli: Cli) -> Result<(), CombineError> {
    let config = cli.to_config()?;
    let formatter = OutputFormatter::from_config(&config);

    if formatter.should_print() {
        formatter.section(&format!("{} v{}", pdfcombine::NAME, pdfcombine::VERSION));
    }

    let codec = LopdfCodec::new()
        .with_compression(config.compression)
        .with_metadata(config.metadata.clone());
    let mut session = MergeSession::new(codec, config.limits);

    let candidates = Candidate::from_paths(&config.inputs).await?;
    let added = session.add_candidates(candidates)?;
    for name in &added.skipped {
        formatter.warning(&format!("Skipping {name}: not a PDF file"));
    }

    display_plan(&formatter, session.collection());

    // Dry run mode - stop here
    if config.dry_run {
        formatter.blank_line();
        formatter.success("Dry run completed successfully");
        formatter.info(&format!("  Output would be: {}", config.output.display()));
        formatter.info("  Run without --dry-run to create the combined PDF");
        return Ok(());
    }

    handle_output_overwrite(&config, &formatter).await?;

    formatter.blank_line();
    let mut progress = if formatter.should_print() {
        TerminalProgress::new("Combining")
    } else {
        TerminalProgress::disabled()
    };
    let result = session
        .combine(&mut progress, &CancellationToken::new())
        .await?;
    progress.finish();

    display_merge_result(&formatter, result);

    let report = json!({ "result": result });
    if result.status == MergeStatus::Failed {
        if config.json {
            print_report(report);
        }
        process::exit(EXIT_MERGE_FAILED);
    }

    // Overwrite was settled above
    let destination = SaveToPath::new(&config.output, true);
    let file_name = config
        .output
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let delivered = session.export(&file_name, &destination).await?;

    formatter.success(&format!("Saved {}", delivered.destination.display()));
    formatter.detail("SHA-256", &delivered.digest);
    if !config.metadata.is_empty() {
        formatter.detail("Metadata", "Set");
    }

    if config.json {
        let mut report = report;
        report["delivery"] = json!(delivered);
        print_report(report);
    }

    Ok(())
}

fn print_report(report: serde_json::Value) {
    match serde_json::to_string_pretty(&report) {
        Ok(text) => println!("{text}"),
        Err(err) => eprintln!("Error: failed to render report: {err}"),
    }
}

/// Handle output file overwrite scenarios.
async fn handle_output_overwrite(
    config: &Config,
    formatter: &OutputFormatter,
) -> Result<(), CombineError> {
    if !tokio::fs::try_exists(&config.output).await? {
        return Ok(());
    }

    match config.overwrite_mode {
        OverwriteMode::Force => Ok(()),
        OverwriteMode::NoClobber => Err(CombineError::output_exists(config.output.clone())),
        OverwriteMode::Prompt => {
            // No one to ask
            if formatter.is_quiet() {
                return Err(CombineError::output_exists(config.output.clone()));
            }

            formatter.warning(&format!(
                "Output file already exists: {}",
                config.output.display()
            ));

            use std::io::{self, Write};
            print!("Overwrite? [y/N]: ");
            io::stdout().flush().ok();

            let mut response = String::new();
            io::stdin()
                .read_line(&mut response)
                .map_err(|err| CombineError::other(format!("Failed to read input: {err}")))?;

            match response.trim().to_lowercase().as_str() {
                "y" | "yes" => Ok(()),
                _ => Err(CombineError::Cancelled),
            }
        }
    }
}
