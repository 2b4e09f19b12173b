use crate::cli_common::output_file;

use clap::Args;
use lentil::common::*;
use lentil::expr_io::{read_simulated_dataset, write_simulated_dataset};
use lentil::permute::permute_within_samples;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Args, Debug)]
pub struct PermuteArgs {
    #[arg(
        long,
        required = true,
        help = "Simulated expression data",
        long_help = "Tab-separated simulated table (`.tsv` or `.tsv.gz`).\n\
		     A trailing `experiment_id` or `experiment` column is carried along."
    )]
    data: Box<str>,

    #[arg(long, default_value_t = DEFAULT_RSEED, help = "Random seed")]
    rseed: u64,

    #[arg(long, default_value_t = DEFAULT_PRECISION, help = "Decimal places in the output")]
    precision: usize,

    #[arg(long, short, required = true, help = "Output header")]
    out: Box<str>,
}

pub fn run_permute(args: &PermuteArgs) -> anyhow::Result<()> {
    let mut rng = StdRng::seed_from_u64(args.rseed);

    let data = read_simulated_dataset(&args.data)?;
    let permuted = permute_within_samples(&data, &mut rng)?;

    let out_file = output_file(&args.out, "permuted.tsv.gz");
    write_simulated_dataset(&permuted, &out_file, Some(args.precision))?;

    info!("Done");
    Ok(())
}
