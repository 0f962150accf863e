//! `pubcheck run` / `pubcheck validate` — config-driven publication reconciliation.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use clap::{Subcommand, ValueEnum};
use log::info;
use pubcheck_recon::engine::{load_catalog_json, load_website_csv};
use pubcheck_recon::report::write_report;
use pubcheck_recon::{MatchOutcome, MatchStrategy, ReconConfig, ReconInput};

use crate::exit_codes::{
    EXIT_ERROR, EXIT_RECON_INVALID_CONFIG, EXIT_RECON_RUNTIME, EXIT_RECON_UNMATCHED,
};
use crate::CliError;

#[derive(Clone, Copy, ValueEnum)]
pub enum StrategyArg {
    Greedy,
    BestFirst,
}

impl From<StrategyArg> for MatchStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Greedy => MatchStrategy::Greedy,
            StrategyArg::BestFirst => MatchStrategy::BestFirst,
        }
    }
}

#[derive(Subcommand)]
pub enum ReconCommands {
    /// Reconcile website and catalog records from a TOML config file
    #[command(after_help = "\
Examples:
  pubcheck run lab.recon.toml
  pubcheck run lab.recon.toml --report results.tsv
  pubcheck run lab.recon.toml --threshold 85 --strategy best-first
  pubcheck run lab.recon.toml --json > results.json
  pubcheck run lab.recon.toml --strict")]
    Run {
        /// Path to the .recon.toml config file
        config: PathBuf,

        /// Minimum score to accept a match (exclusive), overrides the config
        #[arg(
            long,
            env = "PUBCHECK_THRESHOLD",
            value_parser = clap::value_parser!(u8).range(0..=100)
        )]
        threshold: Option<u8>,

        /// Matching strategy, overrides the config
        #[arg(long, value_enum)]
        strategy: Option<StrategyArg>,

        /// Write the text report here ("-" for stdout, default results.tsv beside the config)
        #[arg(long)]
        report: Option<PathBuf>,

        /// Output JSON to stdout
        #[arg(long)]
        json: bool,

        /// Write JSON output to file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Exit non-zero when any record is left unmatched
        #[arg(long)]
        strict: bool,
    },

    /// Validate a recon config without running
    #[command(after_help = "\
Examples:
  pubcheck validate lab.recon.toml")]
    Validate {
        /// Path to the .recon.toml config file
        config: PathBuf,
    },
}

pub fn cmd_recon(cmd: ReconCommands) -> Result<(), CliError> {
    match cmd {
        ReconCommands::Run { config, threshold, strategy, report, json, output, strict } => {
            cmd_recon_run(RunArgs {
                config_path: config,
                threshold,
                strategy: strategy.map(MatchStrategy::from),
                report,
                json,
                output,
                strict,
            })
        }
        ReconCommands::Validate { config } => cmd_recon_validate(config),
    }
}

fn recon_err(code: u8, msg: impl Into<String>) -> CliError {
    CliError::new(code, msg)
}

struct RunArgs {
    config_path: PathBuf,
    threshold: Option<u8>,
    strategy: Option<MatchStrategy>,
    report: Option<PathBuf>,
    json: bool,
    output: Option<PathBuf>,
    strict: bool,
}

/// Report file name used when neither `--report` nor `output.report` is set.
const DEFAULT_REPORT: &str = "results.tsv";

/// Where the text report goes.
#[derive(Debug, PartialEq)]
enum ReportTarget {
    Stdout,
    File(PathBuf),
}

fn report_target(
    flag: Option<&Path>,
    configured: Option<&str>,
    base_dir: &Path,
    json: bool,
) -> Result<ReportTarget, CliError> {
    match (flag, configured) {
        (Some(p), _) if p == Path::new("-") => {
            if json {
                return Err(CliError::args("--json and --report - both write to stdout")
                    .with_hint("use --output FILE for JSON or --report FILE for the text report"));
            }
            Ok(ReportTarget::Stdout)
        }
        (Some(p), _) => Ok(ReportTarget::File(p.to_path_buf())),
        (None, Some(p)) => Ok(ReportTarget::File(base_dir.join(p))),
        (None, None) => Ok(ReportTarget::File(base_dir.join(DEFAULT_REPORT))),
    }
}

fn read_config(config_path: &Path) -> Result<ReconConfig, CliError> {
    let config_str = std::fs::read_to_string(config_path)
        .map_err(|e| recon_err(EXIT_RECON_RUNTIME, format!("cannot read config: {e}")))?;
    ReconConfig::from_toml(&config_str)
        .map_err(|e| recon_err(EXIT_RECON_INVALID_CONFIG, e.to_string()))
}

fn load_input(config: &ReconConfig, base_dir: &Path) -> Result<ReconInput, CliError> {
    let website_path = base_dir.join(&config.inputs.website);
    let website_csv = std::fs::read_to_string(&website_path).map_err(|e| {
        recon_err(EXIT_RECON_RUNTIME, format!("cannot read {}: {e}", website_path.display()))
    })?;
    let website = load_website_csv(&website_csv, &config.inputs.website_columns)
        .map_err(|e| recon_err(EXIT_RECON_RUNTIME, format!("{}: {e}", website_path.display())))?;

    let catalog_path = base_dir.join(&config.inputs.catalog);
    let catalog_json = std::fs::read_to_string(&catalog_path).map_err(|e| {
        recon_err(EXIT_RECON_RUNTIME, format!("cannot read {}: {e}", catalog_path.display()))
    })?;
    let catalog = load_catalog_json(&catalog_json)
        .map_err(|e| recon_err(EXIT_RECON_RUNTIME, format!("{}: {e}", catalog_path.display())))?;

    info!(
        "loaded {} website record(s), {} catalog record(s)",
        website.len(),
        catalog.len()
    );
    Ok(ReconInput { website, catalog })
}

fn write_report_file(path: &Path, outcomes: &[MatchOutcome]) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_report(outcomes, &mut writer)
}

fn cmd_recon_run(args: RunArgs) -> Result<(), CliError> {
    let mut config = read_config(&args.config_path)?;
    if let Some(threshold) = args.threshold {
        config.matching.threshold = threshold;
    }
    if let Some(strategy) = args.strategy {
        config.matching.strategy = strategy;
    }

    // Resolve file paths relative to config file's directory
    let base_dir = args.config_path.parent().unwrap_or_else(|| Path::new("."));

    let target = report_target(
        args.report.as_deref(),
        config.output.report.as_deref(),
        base_dir,
        args.json,
    )?;

    let input = load_input(&config, base_dir)?;

    // Run engine
    let result = pubcheck_recon::run(&config, &input);

    // Output
    match target {
        ReportTarget::Stdout => write_report(&result.outcomes, &mut io::stdout().lock())
            .map_err(|e| recon_err(EXIT_RECON_RUNTIME, format!("cannot write report: {e}")))?,
        ReportTarget::File(ref path) => {
            write_report_file(path, &result.outcomes).map_err(|e| {
                recon_err(EXIT_RECON_RUNTIME, format!("cannot write {}: {e}", path.display()))
            })?;
            eprintln!("wrote {}", path.display());
        }
    }

    let json_path = args
        .output
        .or_else(|| config.output.json.as_ref().map(|p| base_dir.join(p)));
    if args.json || json_path.is_some() {
        let json_str = serde_json::to_string_pretty(&result)
            .map_err(|e| recon_err(EXIT_ERROR, format!("JSON serialization error: {e}")))?;

        if let Some(ref path) = json_path {
            std::fs::write(path, &json_str)
                .map_err(|e| recon_err(EXIT_RECON_RUNTIME, format!("cannot write output: {e}")))?;
            eprintln!("wrote {}", path.display());
        }

        if args.json {
            println!("{json_str}");
        }
    }

    // Human summary to stderr
    let s = &result.summary;
    eprintln!(
        "{} recon (threshold {}): {} matched, {} website only, {} catalog only",
        result.meta.strategy,
        result.meta.threshold,
        s.matched,
        s.website_only,
        s.catalog_only,
    );

    if args.strict && s.unmatched() > 0 {
        return Err(recon_err(
            EXIT_RECON_UNMATCHED,
            format!("{} unmatched record(s)", s.unmatched()),
        ));
    }

    Ok(())
}

fn cmd_recon_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = read_config(&config_path)?;
    eprintln!(
        "valid: recon '{}' ({} strategy, threshold {})",
        config.name, config.matching.strategy, config.matching.threshold,
    );
    Ok(())
}
