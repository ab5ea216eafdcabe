//! Interpcheck CLI entry point.

use clap::Parser;
use interpcheck::cli::{self, Cli, Commands, EXIT_ERROR};

fn main() {
    let cli = Cli::parse();
    cli::init_tracing(cli.verbose);

    let outcome = match &cli.command {
        Commands::Lint(args) => cli::run_lint(args),
        Commands::Rules => cli::run_rules(),
        Commands::Init(args) => cli::run_init(args),
    };

    let exit_code = match outcome {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            EXIT_ERROR
        }
    };

    std::process::exit(exit_code);
}
