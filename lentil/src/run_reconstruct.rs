use crate::cli_common::*;

use clap::Args;
use lentil::codec::reconstruct;
use lentil::common::*;
use lentil::expr_io::{read_expr_matrix, write_expr_matrix};

#[derive(Args, Debug)]
pub struct ReconstructArgs {
    #[arg(long, required = true, help = "Real expression data (`.tsv` or `.tsv.gz`)")]
    expr: Box<str>,

    #[arg(long, default_value_t = false, help = "Expression table is genes x samples")]
    genes_in_rows: bool,

    #[arg(long, required = true, help = "Pretrained VAE directory")]
    model_dir: Box<str>,

    #[arg(long, value_enum, default_value = "cpu", help = "Candle device")]
    device: ComputeDevice,

    #[arg(long, default_value_t = 0, help = "A device for cuda or metal")]
    device_no: usize,

    #[arg(long, default_value_t = DEFAULT_PRECISION, help = "Decimal places in the output")]
    precision: usize,

    #[arg(long, short, required = true, help = "Output header")]
    out: Box<str>,
}

pub fn run_reconstruct(args: &ReconstructArgs) -> anyhow::Result<()> {
    let expr = read_expr_matrix(&args.expr, args.genes_in_rows)?;
    let codec = load_codec(&args.model_dir, args.device, args.device_no)?;

    let recon = reconstruct(&codec, &expr)?;

    let out_file = output_file(&args.out, "reconstructed.tsv.gz");
    write_expr_matrix(&recon, &out_file, Some(args.precision))?;

    info!("Done");
    Ok(())
}
