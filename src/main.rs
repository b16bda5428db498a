use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use thiserror::Error;
use tracing::{error, info, Level};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use ionic::config::{Config, ConfigError, Encoding, OutputFormat};
use ionic::report::{self, Report};
use ionic::{BranchingPolicy, Document, SentenceErrors, Solver};

#[derive(Parser)]
#[command(name = "ionic")]
#[command(about = "Tableau solver for partial information ionic logic")]
#[command(version)]
struct Cli {
    /// Premise file
    input: PathBuf,

    /// Output file (defaults to stdout)
    output: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Report encoding
    #[arg(short, long, value_enum)]
    encoding: Option<Encoding>,

    /// Only queue a formula as branching when its rule actually splits
    #[arg(long)]
    rule_shape: bool,

    /// Leave the premises out of the report
    #[arg(long)]
    no_echo: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Error)]
enum Error {
    #[error("failed to read input file {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write output file {path:?}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write to stdout")]
    Stdout(#[source] io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{} sentence(s) could not be parsed", .0.len())]
    Parse(SentenceErrors),
    #[error("failed to serialize report")]
    Serialize(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so the report on stdout stays clean
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(log_level).into())
        .from_env_lossy();
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(Error::Parse(errors)) => {
            for e in &errors {
                error!("{e}");
            }
            error!("{} sentence(s) could not be parsed", errors.len());
            ExitCode::FAILURE
        }
        Err(e) => {
            log_error(&e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Error> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    if let Some(format) = cli.format {
        config.format = format;
    }
    if let Some(encoding) = cli.encoding {
        config.encoding = encoding;
    }
    if cli.rule_shape {
        config.branching = BranchingPolicy::RuleShape;
    }
    if cli.no_echo {
        config.echo_input = false;
    }

    let content = fs::read_to_string(&cli.input).map_err(|source| Error::Read {
        path: cli.input.clone(),
        source,
    })?;

    let doc = Document::parse(&content).map_err(Error::Parse)?;
    info!("Parsed {} premise(s) from {}", doc.len(), cli.input.display());

    let mut solver = Solver::new(config.solver());
    let models = solver.solve(doc.formulas.clone());

    let stats = solver.stats();
    info!(
        "{} model(s) found ({} open, {} closed branch(es))",
        models.len(), stats.open, stats.closed
    );

    let out = Report::new(&doc.formulas, &models)
        .echo_input(config.echo_input)
        .render(config.format)?;

    let bytes = report::encode(&out, config.encoding);

    match cli.output {
        Some(path) => {
            fs::write(&path, bytes).map_err(|source| Error::Write { path: path.clone(), source })?;
            info!("Report written to {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&bytes)
                .and_then(|_| stdout.flush())
                .map_err(Error::Stdout)?;
        }
    }

    Ok(())
}

fn log_error(e: &dyn std::error::Error) {
    error!("{e}");

    let mut source = e.source();
    while let Some(s) = source {
        error!("  caused by: {s}");
        source = s.source();
    }
}
