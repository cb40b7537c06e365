use std::process;

use bundle_checker::cli::{Cli, Commands};
use bundle_checker::cmd;
use clap::{CommandFactory, Parser};

fn main() {
    // Initialize logger (use RUST_LOG env var to control verbosity)
    env_logger::init();

    let cli = Cli::parse();

    if cli.no_emoji {
        std::env::set_var("NO_EMOJI", "1");
    }

    let result = match &cli.command {
        Some(Commands::Compare(args)) => cmd::cmd_compare(args),
        Some(Commands::Check(args)) => cmd::cmd_check(args),
        Some(Commands::Init { force }) => cmd::cmd_init(*force),
        Some(Commands::Completions { shell }) => {
            cmd::cmd_completions(*shell);
            Ok(())
        }
        None => Cli::command().print_help().map_err(anyhow::Error::from),
    };

    if let Err(e) = result {
        use bundle_checker::error::ErrorFormatter;
        eprintln!("{}", ErrorFormatter::format(&e));
        let exit_code = ErrorFormatter::exit_code(&e);
        process::exit(exit_code);
    }
}
