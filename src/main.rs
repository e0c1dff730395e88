use std::process::ExitCode;
use yo::{cli, config::Config, setup_logging};

fn main() -> ExitCode {
    // Parse command line arguments
    let args = cli::parse_args();

    // Setup logging based on debug flag
    if let Err(e) = setup_logging(args.debug) {
        eprintln!("yo: {e:#}");
    }

    // Build the per-invocation context
    let config = Config::from_args(&args);

    // Execute the appropriate command
    match cli::execute_command(&config, &args.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("yo: {e:#}");
            ExitCode::from(cli::exit_code(&e))
        }
    }
}
