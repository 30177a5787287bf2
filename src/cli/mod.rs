use clap::{Parser, Subcommand};

pub mod commands;

#[derive(Parser)]
#[command(name = "zynix")]
#[command(about = "Zynix Software Solutions employee onboarding")]
#[command(long_about = "Walks new employees through the Zynix registration wizard: personal \
                       details, company account, and the one-time registration fee. Get started \
                       with 'zynix register'.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the interactive employee registration wizard
    Register {
        /// Override the simulated confirmation delay
        #[arg(long, help = "Milliseconds to wait for the simulated payment confirmation")]
        delay_ms: Option<u64>,
    },
    /// List the registration stages
    Stages,
    /// Show employee benefits and the registration fee
    Benefits,
}
