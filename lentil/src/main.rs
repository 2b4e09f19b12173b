mod cli_common;
mod run_add_batch;
mod run_compare;
mod run_permute;
mod run_reconstruct;
mod run_simulate;

use run_add_batch::*;
use run_compare::*;
use run_permute::*;
use run_reconstruct::*;
use run_simulate::*;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "lentil")]
#[command(about = "Latent-space ENcoded Tissue-Independent Library of simulated expression data")]
struct Cli {
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    commands: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate expression data through a pretrained VAE's latent space
    Simulate(SimulateArgs),
    /// Shuffle gene values within every simulated sample
    Permute(PermuteArgs),
    /// Add synthetic batch effects for each requested number of batches
    AddBatch(AddBatchArgs),
    /// Pass real data through the VAE and write the reconstruction
    Reconstruct(ReconstructArgs),
    /// Compare per-gene statistics of real and simulated data
    Compare(CompareArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    match &cli.commands {
        Commands::Simulate(args) => {
            run_simulate(args, cli.verbose)?;
        }
        Commands::Permute(args) => {
            run_permute(args)?;
        }
        Commands::AddBatch(args) => {
            run_add_batch(args, cli.verbose)?;
        }
        Commands::Reconstruct(args) => {
            run_reconstruct(args)?;
        }
        Commands::Compare(args) => {
            run_compare(args)?;
        }
    }

    Ok(())
}
