use std::io::{self, Read, Write};
use std::process::ExitCode;

use clap::Parser;

/// Batch transit query engine: reads a JSON request document from stdin,
/// writes the JSON response document to stdout.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Increase logging verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let level = match args.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::new().filter_level(level).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), transit_catalogue::Error> {
    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;

    let output = transit_catalogue::run_batch(&input)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer(&mut handle, &output)?;
    handle.write_all(b"\n")?;
    Ok(())
}
