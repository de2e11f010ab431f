//! `nasin-check`: verify that compiled grammars load.
//!
//! Exits zero when every check passes and non-zero otherwise, printing the
//! failing artifact and the reason to stderr.

use facet::Facet;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use tree_sitter_nasin::config::{CheckConfig, LOG_ENV};

#[derive(Facet, Debug)]
struct Args {
    /// Grammar files, or names of embedded grammars, to check
    #[facet(positional, default)]
    grammars: Vec<String>,

    /// Check every embedded grammar as well
    #[facet(named, short = 'a', default)]
    all: bool,

    /// Load each grammar this many times
    #[facet(named, short = 'n', default)]
    repeat: Option<usize>,

    /// Log debug output to stderr
    #[facet(named, short = 'v', default)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let args: Args = match facet_args::from_std_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(2);
        }
    };

    init_logging(args.verbose);

    let inputs: Vec<PathBuf> = args.grammars.iter().map(PathBuf::from).collect();
    let config = CheckConfig::from_env(&inputs, args.all).with_repeat(args.repeat.unwrap_or(1));
    tracing::debug!(artifacts = config.artifacts.len(), repeat = config.repeat, "checking grammars");

    let summary = config.run();
    for failure in summary.failures() {
        eprintln!("{failure}");
    }
    match summary.reports() {
        [only] if only.passed() => println!("{only}"),
        [_] => {}
        _ => println!("{summary}"),
    }

    summary.exit_code()
}
