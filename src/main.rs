use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use sampleweave::error::Error;
use sampleweave::method::Markers;
use sampleweave::process::{Options, process};

#[derive(Parser)]
#[command(
    name = "sampleweave",
    about = "Wrap every method body in profiler BeginSample/EndSample calls",
    version,
    after_help = "Files are rewritten in place. Iterator (yield) methods and async methods are skipped."
)]
struct Cli {
    /// The path to the file (.cs) or a folder.
    #[arg(short, long, value_name = "PATH")]
    path: PathBuf,

    /// Extension of files picked up when PATH is a folder.
    #[arg(long, value_name = "EXT", default_value = "cs")]
    ext: String,

    /// Indentation added to the body's indentation for inserted lines.
    #[arg(long, value_name = "UNIT", default_value = "\t")]
    indent: String,

    /// Call that opens a named sample.
    #[arg(long, value_name = "CALL", default_value = "UnityEngine.Profiling.Profiler.BeginSample")]
    begin: String,

    /// Call that closes a sample.
    #[arg(long, value_name = "CALL", default_value = "UnityEngine.Profiling.Profiler.EndSample")]
    end: String,

    /// Increase log output (-v info, -vv blocks found, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Error> {
    let options = Options {
        markers: Markers {
            begin: cli.begin,
            end: cli.end,
            indent: cli.indent,
        },
        extension: cli.ext.trim_start_matches('.').to_string(),
    };

    let reports = process(&cli.path, &options)?;

    let methods: usize = reports.iter().map(|r| r.result.instrumented_methods()).sum();
    let skipped: usize = reports
        .iter()
        .flat_map(|r| &r.result.methods)
        .filter(|m| m.iterator_shaped)
        .count();
    eprintln!(
        "instrumented {methods} method(s) across {} file(s)",
        reports.len()
    );
    if skipped > 0 {
        eprintln!("skipped {skipped} iterator method(s)");
    }
    Ok(())
}
