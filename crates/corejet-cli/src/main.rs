//! Command line tool for CoreJet requirements catalogues.
//!
//! `corejet extract` turns acceptance-criteria files into a catalogue report
//! and `corejet summary` counts the scenarios of a report by test status.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use clap::{Parser, Subcommand};
use eyre::{Context, Result};
use tracing::info;

use corejet::{Catalogue, StoryParser};
use corejet_cli::config::{CliConfig, Language, LogLevel};
use corejet_cli::error::CliError;
use corejet_cli::extract::{ExtractOptions, extract};
use corejet_cli::logging::init_logging;
use corejet_cli::summary::{OutputFormat, ReportSummary};

/// Extract and summarise CoreJet requirements catalogues.
#[derive(Parser, Debug)]
#[command(name = "corejet", version, about)]
struct Cli {
    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a catalogue report with one story per criteria file.
    Extract {
        /// Criteria files; each file stem becomes a story identifier.
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Project named on the report.
        #[arg(long)]
        project: String,
        /// Identifier of the epic holding the stories.
        #[arg(long)]
        epic_id: String,
        /// Title of the epic holding the stories.
        #[arg(long)]
        epic_title: String,
        /// Language of criteria without a `# language:` directive.
        #[arg(long)]
        language: Option<Language>,
        /// Write the report here instead of stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Count the scenarios of a catalogue report by test status.
    Summary {
        /// Catalogue report to read.
        report: PathBuf,
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            init_logging(&CliConfig::default());
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(2);
        }
    };
    init_logging(&config);

    match cli.command {
        Commands::Extract {
            files,
            project,
            epic_id,
            epic_title,
            output,
            ..
        } => {
            let options = ExtractOptions {
                project,
                epic_id,
                epic_title,
                files,
            };
            handle_extract(&config, &options, output.as_deref())
        }
        Commands::Summary { report, format } => handle_summary(&report, format),
    }
}

fn build_config(cli: &Cli) -> Result<CliConfig, CliError> {
    let language = match &cli.command {
        Commands::Extract { language, .. } => language.clone(),
        Commands::Summary { .. } => None,
    };
    Ok(CliConfig::from_env()?.apply_overrides(cli.log_level, language))
}

/// Handle the `extract` subcommand.
///
/// # Errors
///
/// Returns an error if a criteria file cannot be read or parsed, or the
/// report cannot be written.
fn handle_extract(config: &CliConfig, options: &ExtractOptions, output: Option<&Path>) -> Result<()> {
    let parser = StoryParser::builtin()?.with_default_language(config.language.as_str());
    let catalogue = extract(&parser, options, Local::now().naive_local())?;
    info!(
        stories = catalogue.stories().count(),
        language = %config.language,
        "extracted requirements"
    );

    let Some(path) = output else {
        catalogue.write(io::stdout().lock())?;
        return Ok(());
    };
    let file = File::create(path).wrap_err_with(|| format!("failed to create {}", path.display()))?;
    catalogue
        .write(BufWriter::new(file))
        .wrap_err_with(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), "wrote catalogue report");
    Ok(())
}

/// Handle the `summary` subcommand.
///
/// # Errors
///
/// Returns an error if the report cannot be read or is malformed.
fn handle_summary(report: &Path, format: OutputFormat) -> Result<()> {
    let file = File::open(report).wrap_err_with(|| format!("failed to open {}", report.display()))?;
    let mut catalogue = Catalogue::new();
    catalogue
        .populate(BufReader::new(file))
        .wrap_err_with(|| format!("failed to read {}", report.display()))?;
    let rendered = ReportSummary::from(&catalogue).render(format)?;
    let mut stdout = io::stdout().lock();
    stdout.write_all(rendered.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
