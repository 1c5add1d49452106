use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::core::RunRecord;
use crate::engine::{Engine, RunOutcome};
use crate::logs::TeaLog;

#[derive(Debug, Parser)]
#[command(
    name = "tealeaves",
    version,
    about = "Reads a Sage scan inventory report (sage_says.json) and logs the Black Duck anomalies worth cleaning up"
)]
pub struct Cli {
    /// Sage report to read
    #[arg(required_unless_present = "show_config")]
    pub report: Option<PathBuf>,
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Directory for tealeaves.log and the overflow files
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
    /// Only write the log file
    #[arg(long)]
    pub quiet: bool,
    #[arg(long)]
    pub verbose: bool,
    /// Print a JSON run record on stdout instead of echoing the log
    #[arg(long)]
    pub json: bool,
    /// Also run the high-frequency scans section
    #[arg(long)]
    pub high_frequency: bool,
    #[arg(long)]
    pub show_config: bool,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let home_dir = std::env::var_os("HOME").map(PathBuf::from);
    let env_config_path = std::env::var_os("TEALEAVES_CONFIG").map(PathBuf::from);
    let mut cfg = crate::config::load(
        cli.config.as_deref().or(env_config_path.as_deref()),
        home_dir.as_deref(),
    )
    .map_err(crate::exit::invalid_args_err)?;

    if let Some(dir) = cli.out_dir {
        cfg.output.dir = dir;
    }
    if cli.quiet || cli.json {
        cfg.output.console = false;
    }
    if cli.high_frequency {
        cfg.high_frequency.enabled = true;
    }

    if cli.show_config {
        println!("{}", toml::to_string_pretty(&cfg)?);
        return Ok(());
    }

    let Some(report_path) = cli.report else {
        return Err(crate::exit::invalid_args_err(anyhow::anyhow!(
            "a report path is required"
        )));
    };

    let console: Option<Box<dyn Write>> = if cfg.output.console {
        Some(Box::new(io::stdout()))
    } else {
        None
    };
    let mut log =
        TeaLog::open(&cfg.log_path(), console).map_err(crate::exit::report_failed_err)?;
    tracing::debug!(path = %log.path().display(), "primary log opened");

    crate::ui::write_banner(&mut log);

    let source = report_path.display().to_string();
    let doc = match crate::core::load(&report_path) {
        Ok(doc) => doc,
        Err(err) => {
            let _ = writeln!(log, "{}", load_failure_line(&err, &source));
            let _ = log.flush();
            return Err(crate::exit::report_failed_err(err));
        }
    };

    let engine = Engine::new(&cfg, source.clone());
    let outcome = engine.run(&doc, &mut log).map_err(|err| {
        crate::exit::report_failed_err(
            anyhow::Error::new(err).context(format!("'{source}' is not a valid scan report")),
        )
    });
    let finished = finish_log(&mut log);
    let outcome = outcome?;
    finished?;

    tracing::debug!(
        sections = outcome.sections.len(),
        failed = outcome.failed_sections(),
        "run finished"
    );

    if cli.json {
        write_json(&run_record(&report_path, outcome))?;
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

/// Flushes the primary log and fails the run if the log file lost any output.
fn finish_log(log: &mut TeaLog) -> Result<()> {
    let flushed = log.flush();
    if let Some(err) = log.take_error() {
        let path = log.path().display().to_string();
        return Err(crate::exit::report_failed_err(
            anyhow::Error::new(err).context(format!("could not write log file '{path}'")),
        ));
    }
    flushed
        .context("could not flush the report")
        .map_err(crate::exit::report_failed_err)
}

fn load_failure_line(err: &anyhow::Error, source: &str) -> String {
    let denied = err
        .chain()
        .filter_map(|cause| cause.downcast_ref::<io::Error>())
        .any(|e| e.kind() == io::ErrorKind::PermissionDenied);
    if denied {
        format!("Permission error trying to open: '{source}'")
    } else {
        format!("Could not read '{source}': {err:#}")
    }
}

fn run_record(report_path: &Path, outcome: RunOutcome) -> RunRecord {
    RunRecord {
        schema_version: "1.0".to_string(),
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
        generated_at: OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_else(|_| "unknown".to_string()),
        input: report_path.display().to_string(),
        summary: outcome.summary,
        sections: outcome.sections,
    }
}

fn write_json(record: &RunRecord) -> Result<()> {
    let buf = serde_json::to_vec_pretty(record)?;

    let mut stdout = io::stdout().lock();
    match stdout.write_all(&buf) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => return Ok(()),
        Err(err) => return Err(err.into()),
    }
    match stdout.write_all(b"\n") {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        Err(err) => Err(err.into()),
    }
}
