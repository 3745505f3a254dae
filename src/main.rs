use clap::Parser;
use convert2webp::cli::Args;
use convert2webp::{error, logger, run_conversion, run_interactive, SessionFlags};
use std::ffi::OsString;
use std::process::ExitCode;

fn main() -> ExitCode {
    let raw_args: Vec<OsString> = std::env::args_os().collect();
    let args = Args::parse_from(&raw_args);
    logger::configure(args.quiet, args.verbose);

    if args.interactive || Args::is_bare(&raw_args) {
        return match run_interactive(SessionFlags::from_args(&args)) {
            Ok(_) => ExitCode::SUCCESS,
            Err(e) => {
                error!("Interactive session failed: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    match run_conversion(&args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Error occurred during processing: {}", e);
            ExitCode::FAILURE
        }
    }
}
