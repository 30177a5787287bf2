use anyhow::Result;
use clap::Parser;

use zynix_onboarding::cli::commands::{
    show_how_to_get_started, BenefitsCommand, RegisterCommand, StagesCommand,
};
use zynix_onboarding::cli::{Cli, Commands};
use zynix_onboarding::config::config;
use zynix_onboarding::telemetry::init_telemetry;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config()?;
    init_telemetry(&config.observability)?;

    match cli.command {
        None => tokio::runtime::Runtime::new()?.block_on(async { show_how_to_get_started().await }),
        Some(Commands::Register { delay_ms }) => {
            tokio::runtime::Runtime::new()?.block_on(async {
                RegisterCommand::new(config.registration.clone())
                    .with_delay_ms(delay_ms)
                    .execute()
                    .await
            })
        }
        Some(Commands::Stages) => {
            tokio::runtime::Runtime::new()?.block_on(async { StagesCommand::new().execute().await })
        }
        Some(Commands::Benefits) => tokio::runtime::Runtime::new()?.block_on(async {
            BenefitsCommand::new(&config.registration).execute().await
        }),
    }
}
