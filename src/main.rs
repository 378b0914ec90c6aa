use anyhow::Result;
use clap::Parser;
use covgate::cli::{Cli, Commands};
use covgate::commands::{self, CheckOptions};

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            path,
            mode,
            coverage_file,
            config,
            preset,
            strict,
            base,
            format,
            output,
            no_total,
        } => {
            let outcome = commands::run_check(CheckOptions {
                path,
                mode,
                coverage_file,
                config,
                preset,
                strict,
                base,
                format,
                output,
                no_total,
            })?;
            if outcome.strict_mode && !outcome.passed {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Init { force } => commands::init_config(force),
        Commands::Total { coverage_file } => commands::run_total(&coverage_file),
    }
}
