use crate::cli_common::output_file;

use clap::Args;
use lentil::common::*;
use lentil::compare::compare_datasets;
use lentil::expr_io::{read_expr_matrix, read_simulated_dataset};

#[derive(Args, Debug)]
pub struct CompareArgs {
    #[arg(long, required = true, help = "Real expression data (`.tsv` or `.tsv.gz`)")]
    real: Box<str>,

    #[arg(long, default_value_t = false, help = "Real expression table is genes x samples")]
    genes_in_rows: bool,

    #[arg(long, required = true, help = "Simulated expression data")]
    simulated: Box<str>,

    #[arg(
        long,
        short,
        required = true,
        help = "Output header",
        long_help = "Output header.\n\
		     Writes per-gene statistics to {out}.compare.tsv.gz"
    )]
    out: Box<str>,
}

pub fn run_compare(args: &CompareArgs) -> anyhow::Result<()> {
    let real = read_expr_matrix(&args.real, args.genes_in_rows)?;
    let simulated = read_simulated_dataset(&args.simulated)?;

    let report = compare_datasets(&real, &simulated)?;

    let out_file = output_file(&args.out, "compare.tsv.gz");
    report.to_tsv(&out_file)?;
    info!("wrote {}", out_file);

    info!("Done");
    Ok(())
}
