use clap::Parser;
use opflow_cli::cli::types::{Cli, Commands};
use opflow_cli::cli::{init_opflow, load_config_from_file};
use opflow_cli::errors::OrchestrationError;
use opflow_cli::Orchestrator;
use opflow_tracing::init_logging;
use opflow_types::tracing::{error, info, warn};
use std::process;

fn main() {
    if let Err(e) = run() {
        error!("{}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), OrchestrationError> {
    let cli = Cli::parse();

    // log level comes from the config
    let config = match load_config_from_file(&cli.config_path) {
        Ok(config) => config,
        Err(e) => {
            init_logging(None)?;
            return Err(e.into());
        }
    };
    init_logging(Some(&config.log_level))?;
    let opflow = init_opflow(&config)?;

    match cli.cmd {
        Commands::Operators => {
            opflow.list_operators()?.printstd();
            Ok(())
        }
        Commands::Show(show) => {
            opflow.show(&show.process)?.printstd();
            Ok(())
        }
        Commands::Candidates(candidates) => {
            opflow
                .candidates(&candidates.process, &candidates.operator)?
                .printstd();
            Ok(())
        }
        Commands::Schema => {
            println!("{}", opflow.config_schema()?);
            Ok(())
        }
        Commands::Replace(replace) => {
            let report = opflow.replace(
                &replace.process,
                &replace.operator,
                &replace.with,
                replace.output.as_deref(),
            )?;
            match report {
                Some(report) if report.failed_reconnects > 0 => warn!(
                    "Replaced {} at position {}, {} connection(s) could not be restored",
                    report.replaced, report.position, report.failed_reconnects
                ),
                Some(report) => info!(
                    "Replaced {} at position {}",
                    report.replaced, report.position
                ),
                None => info!("Nothing was replaced"),
            }
            Ok(())
        }
    }
}
