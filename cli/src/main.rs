mod error_formatter;
mod fixtures;
mod formatter;
mod interactive;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use endive::{Engine, ResourceLimits};
use formatter::Formatter;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "endive")]
#[command(about = "An interactive proof kernel built on term rewriting.")]
#[command(
    long_about = "Endive checks proofs written as scripts of directives over terms and rewritings.\nThe CLI runs proof scripts, opens an interactive session, or checks fixture files."
)]
#[command(version)]
struct Cli {
    /// Log engine decisions to stderr
    #[arg(long, global = true)]
    debug: bool,

    /// Bound on reduction steps per term
    #[arg(long = "max-steps", value_name = "N", global = true)]
    max_steps: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a proof script, stopping at the first failing line
    ///
    /// Every line is echoed and followed by its outcome. `Using` imports
    /// resolve against the directory of the script.
    Run {
        /// Proof script (.end file)
        file: PathBuf,
        /// Print one JSON record per line instead of text
        #[arg(long)]
        json: bool,
    },
    /// Start an interactive session
    Repl {
        /// Directory `Using` imports resolve against
        #[arg(short = 'd', long = "dir", default_value = ".")]
        workdir: PathBuf,
    },
    /// Check every fixture file below a directory
    ///
    /// Lines of the form `statement ~ expected` must succeed with the given
    /// message; `statement ~ error # expected` must fail with it.
    Test {
        /// Directory searched recursively for .end files
        #[arg(default_value = ".")]
        dir: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let mut limits = ResourceLimits::default();
    if let Some(steps) = cli.max_steps {
        limits = limits.with_max_reduction_steps(steps);
    }

    let result = match &cli.command {
        Commands::Run { file, json } => run_command(file, *json, limits),
        Commands::Repl { workdir } => repl_command(workdir, limits),
        Commands::Test { dir } => test_command(dir, &limits),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            if let Some(endive_err) = e.downcast_ref::<endive::EndiveError>() {
                eprintln!("{}", error_formatter::format_error(endive_err));
            } else {
                eprintln!("Error: {}", e);
            }
            std::process::exit(1);
        }
    }
}

fn init_logging(debug: bool) {
    let default = if debug { "endive=debug" } else { "endive=warn" };
    let filter = if debug {
        EnvFilter::new(default)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn engine_at(dir: &Path, limits: ResourceLimits) -> Engine {
    let mut engine = Engine::with_limits(limits);
    engine.set_base_path(dir);
    engine
}

/// Returns whether every line succeeded
fn run_command(file: &Path, json: bool, limits: ResourceLimits) -> Result<bool> {
    let source =
        fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let dir = file.parent().unwrap_or(Path::new("."));
    let mut engine = engine_at(dir, limits);
    let formatter = Formatter::default();
    let source_id = file.display().to_string();

    for (index, line) in source.lines().enumerate() {
        let parsed = endive::parse_line_from(line, &source_id).map_err(|e| e.at_line(index + 1))?;
        let Some((directive, arguments)) = parsed else {
            continue;
        };

        let outcome = engine.process(&directive, arguments)?;
        if json {
            println!("{}", formatter.format_json(index + 1, line.trim(), &outcome));
        } else {
            print!("{}", formatter.format_line(line.trim()));
            print!("{}", formatter.format_outcome(&outcome));
        }
        if !outcome.success {
            return Ok(false);
        }
    }

    Ok(true)
}

fn repl_command(workdir: &Path, limits: ResourceLimits) -> Result<bool> {
    interactive::run_repl(engine_at(workdir, limits))?;
    Ok(true)
}

fn test_command(dir: &Path, limits: &ResourceLimits) -> Result<bool> {
    let files = fixtures::collect_fixtures(dir)?;
    let formatter = Formatter::default();

    let mut checked = 0;
    let mut failed = 0;
    for file in &files {
        let report = fixtures::run_fixture(file, limits)?;
        checked += report.checked;
        failed += report.mismatches.len();
        print!("{}", formatter.format_file_report(&report));
    }

    print!("{}", formatter.format_summary(files.len(), checked, failed));
    Ok(failed == 0)
}
