//! isogen command line
//!
//! Generates every structural isomer of an elemental composition and writes
//! them to an SD file:
//!
//! ```text
//! isogen -e C6H8 -o hexadienes.sdf
//! isogen -e N1H5C2O2 -f co2.sdf -vv
//! ```

use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use isogen::{parse_sdf_file, write_sdf, GenerateError, Generator, SdfError};

/// Structural isomer generator
#[derive(Parser)]
#[command(name = "isogen")]
#[command(version)]
#[command(about = "Enumerate all structural isomers of an elemental composition")]
struct Cli {
    /// Elemental composition with every count given, e.g. C2H5N1O2
    #[arg(short = 'e', long = "ec", value_name = "COMPOSITION")]
    composition: String,

    /// Output SD file
    #[arg(short, long = "out", value_name = "FILE", default_value = "default_out.sdf")]
    out: PathBuf,

    /// SD file of fragments every structure must contain
    #[arg(short, long = "fr", value_name = "FILE")]
    fragments: Option<PathBuf>,

    /// Stop after visiting this many search states
    #[arg(long, value_name = "N")]
    node_limit: Option<usize>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Generate(#[from] GenerateError),
    #[error("fragments: {0}")]
    Fragments(#[from] SdfError),
    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn run(cli: &Cli) -> Result<usize, CliError> {
    let fragments = match &cli.fragments {
        Some(path) => {
            let fragments = parse_sdf_file(path)?;
            info!(path = %path.display(), count = fragments.len(), "loaded fragments");
            fragments
        }
        None => Vec::new(),
    };

    let generation = Generator::new()
        .node_limit(cli.node_limit)
        .run(&cli.composition, &fragments)?;

    std::fs::write(&cli.out, write_sdf(&generation.molecules)).map_err(|source| {
        CliError::Write {
            path: cli.out.clone(),
            source,
        }
    })?;
    Ok(generation.molecules.len())
}

fn main() {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let start = Instant::now();
    match run(&cli) {
        Ok(count) => {
            println!("Total mols: {count}");
            println!("Took {} ms.", start.elapsed().as_millis());
        }
        Err(err) => {
            error!("{err}");
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}
