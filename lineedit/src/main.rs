//! # lineedit
//!
//! Main entry point for the line editor.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use lineedit::{HostRuntime, HostRuntimeConfig, HostRuntimeError, SessionEnd};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Simple line-based text editor
#[derive(Parser, Debug)]
#[command(name = "lineedit", version, about)]
struct Args {
    /// File to open or create (prompted for when omitted)
    filename: Option<PathBuf>,

    /// Read input lines from FILE instead of standard input
    #[arg(short, long, value_name = "FILE")]
    script: Option<PathBuf>,

    /// Ask before QUIT discards unsaved changes
    #[arg(long)]
    confirm_discard: bool,

    /// Do not create missing parent directories for a new file
    #[arg(long)]
    no_create_dirs: bool,
}

impl From<&Args> for HostRuntimeConfig {
    fn from(args: &Args) -> Self {
        Self {
            path: args.filename.clone(),
            create_parents: !args.no_create_dirs,
            confirm_discard: args.confirm_discard,
        }
    }
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = HostRuntimeConfig::from(&args);
    let stdout = io::stdout();

    let result = match &args.script {
        Some(script_path) => match File::open(script_path) {
            Ok(file) => run(config, BufReader::new(file), stdout.lock()),
            Err(e) => {
                eprintln!("Failed to read script file: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => run(config, io::stdin().lock(), stdout.lock()),
    };

    match result {
        Ok(end) => {
            debug!(?end, "session finished");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run<R: BufRead, W: Write>(
    config: HostRuntimeConfig,
    input: R,
    output: W,
) -> Result<SessionEnd, HostRuntimeError> {
    HostRuntime::new(config, input, output).run()
}
