// minterp-cli/src/main.rs
//
// Entry point of the `minterp` binary.
//
// Parses arguments, installs logging, runs the pipeline and maps the outcome
// to the process exit code: the output path (or a JSON summary) on stdout
// and exit code 0 on success, `Error: <message>` on stderr and exit code 1
// on failure.

use clap::Parser;
use indicatif::MultiProgress;
use minterp_cli::logging::init_logging;
use minterp_cli::{Cli, run_interpolate};
use std::process;

fn main() {
    let cli = Cli::parse();
    // Shared by the logger and the progress bars.
    let multi = MultiProgress::new();
    init_logging(cli.verbose, multi.clone());

    let output = match run_interpolate(&cli, &multi) {
        Ok(output) => output,
        Err(e) => {
            log::debug!("Run failed: {:?}", e);
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    if cli.json {
        match serde_json::to_string_pretty(&output) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: failed to serialize result: {e}");
                process::exit(1);
            }
        }
    } else {
        println!("{}", output.output_path.display());
    }
}
