use std::process::ExitCode;

use clap::Parser;

use quadview::app::{self, ViewerError};
use quadview::cli::{self, CliArgs};
use quadview::{log_err, log_info, logger, ppm};

fn main() -> ExitCode {
    let args = CliArgs::parse();

    // Session log first so decode failures are captured too.
    if !args.no_log
        && let Err(e) = logger::init()
    {
        eprintln!("[logger] Failed to open log file: {}", e);
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log_err!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &CliArgs) -> Result<(), ViewerError> {
    let image = ppm::load(&args.image)?;
    log_info!(
        "Decoded {} ({}x{})",
        args.image.display(),
        image.width(),
        image.height()
    );

    if args.info {
        println!("{}", cli::describe(args, &image));
        return Ok(());
    }

    app::run(args, &image)
}
