use crate::cli_common::output_file;

use clap::Args;
use indicatif::{ProgressBar, ProgressDrawTarget};
use lentil::batch_effect::add_batch_effect;
use lentil::common::*;
use lentil::expr_io::{read_simulated_dataset, write_experiment_map, write_simulated_dataset};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Args, Debug)]
pub struct AddBatchArgs {
    #[arg(
        long,
        required = true,
        help = "Simulated expression data",
        long_help = "Tab-separated simulated table (`.tsv` or `.tsv.gz`).\n\
		     Any existing label column is replaced by the batch labels."
    )]
    data: Box<str>,

    #[arg(
        long,
        value_delimiter = ',',
        default_value = "1,2,5,10",
        help = "Numbers of batches (comma-separated)",
        long_help = "Numbers of batches (comma-separated), e.g., 1,2,5,10.\n\
		     Each number yields its own pair of output files."
    )]
    batch_counts: Vec<usize>,

    #[arg(long, default_value_t = DEFAULT_BATCH_SD, help = "Spread of the per-gene batch shifts")]
    batch_sd: f32,

    #[arg(long, default_value_t = DEFAULT_RSEED, help = "Random seed")]
    rseed: u64,

    #[arg(long, default_value_t = DEFAULT_PRECISION, help = "Decimal places in the output")]
    precision: usize,

    #[arg(
        long,
        short,
        required = true,
        help = "Output header",
        long_help = "Output header.\n\
		     Writes {out}.batch_{k}.tsv.gz and {out}.batch_{k}.map.tsv.gz"
    )]
    out: Box<str>,
}

pub fn run_add_batch(args: &AddBatchArgs, verbose: bool) -> anyhow::Result<()> {
    let mut rng = StdRng::seed_from_u64(args.rseed);
    let data = read_simulated_dataset(&args.data)?;

    let pb = ProgressBar::new(args.batch_counts.len() as u64);
    if verbose {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    }

    for &k in args.batch_counts.iter() {
        let batch = add_batch_effect(&data, k, args.batch_sd, &mut rng)?;

        let data_file = output_file(&args.out, &format!("batch_{}.tsv.gz", k));
        write_simulated_dataset(&batch.data, &data_file, Some(args.precision))?;

        let map_file = output_file(&args.out, &format!("batch_{}.map.tsv.gz", k));
        write_experiment_map(&batch.map, &map_file)?;

        pb.inc(1);
    }
    pb.finish_and_clear();

    info!("Done");
    Ok(())
}
