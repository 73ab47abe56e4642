use clap::Parser;
use ream_attest::{
    cli::{Cli, Commands},
    replay::run_process,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Process(config) => {
            tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::new(config.verbosity.directive()))
                .init();

            info!("Processing {} attestation(s)", config.attestations.len());
            let outcome = run_process(&config)?;
            println!(
                "proposer {} balance +{} Gwei",
                outcome.proposer_index, outcome.proposer_balance_delta
            );
        }
    }

    Ok(())
}
