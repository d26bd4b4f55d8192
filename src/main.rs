use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

use bsl::{run_with_config, Config};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Runs a Beginning Student Language program and prints each result.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Program to run. Reads standard input when absent.
    file: Option<PathBuf>,

    /// Nested function calls allowed before the run is stopped.
    #[arg(long, default_value_t = bsl::config::DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Stack size of the evaluator thread, in bytes.
    #[arg(long, default_value_t = bsl::config::DEFAULT_STACK_SIZE)]
    stack_size: usize,
}

fn read_source(file: Option<&PathBuf>) -> io::Result<String> {
    match file {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut source = String::new();
            io::stdin().read_to_string(&mut source)?;
            Ok(source)
        },
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let source = read_source(args.file.as_ref()).unwrap_or_else(|err| {
        eprintln!("Failed to read the program: {}", err);
        process::exit(1);
    });

    let config = Config::default()
        .with_max_depth(args.max_depth)
        .with_stack_size(args.stack_size);
    for line in run_with_config(&source, &config).printed_lines {
        println!("{}", line);
    }
}
