use crate::cli_common::*;

use clap::{Args, ValueEnum};
use lentil::common::*;
use lentil::expr_io::{read_expr_matrix, write_simulated_dataset};
use lentil::gene_subset::subset_genes;
use lentil::registry::*;
use lentil::sim_centroid::*;
use lentil::sim_global::simulate_global;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
#[clap(rename_all = "kebab-case")]
pub enum SimulationMode {
    Global,
    CentroidShift,
}

#[derive(Args, Debug)]
pub struct SimulateArgs {
    #[arg(
        long,
        required = true,
        help = "Real expression data (`.tsv` or `.tsv.gz`)",
        long_help = "Tab-separated expression table.\n\
		     Each row is a sample (first column = sample id) and each column a gene.\n\
		     Use `--genes-in-rows` for a genes x samples table."
    )]
    expr: Box<str>,

    #[arg(long, default_value_t = false, help = "Expression table is genes x samples")]
    genes_in_rows: bool,

    #[arg(
        long,
        required = true,
        help = "Pretrained VAE directory",
        long_help = "Directory with `config.json` (architecture) and\n\
		     `model.safetensors` (weights) of the pretrained VAE."
    )]
    model_dir: Box<str>,

    #[arg(
        long,
        value_enum,
        default_value = "cpu",
        help = "Candle device",
        long_help = "Candle device to use for computation.\n\
		     Options: cpu, cuda, metal."
    )]
    device: ComputeDevice,

    #[arg(long, default_value_t = 0, help = "A device for cuda or metal")]
    device_no: usize,

    #[arg(
        long,
        value_enum,
        default_value = "global",
        help = "Simulation mode",
        long_help = "global: draw samples from the latent distribution of all data.\n\
		     centroid-shift: move whole real experiments to new latent centroids."
    )]
    mode: SimulationMode,

    #[arg(long, default_value_t = 100, help = "Number of samples (global mode)")]
    n_samples: usize,

    #[arg(long, default_value_t = 10, help = "Number of experiments (centroid-shift mode)")]
    n_experiments: usize,

    #[arg(
        long,
        help = "Sample annotation table (centroid-shift mode)",
        long_help = "Tab-separated table with a header,\n\
		     one row per (experiment, sample) pair."
    )]
    annotation: Option<Box<str>>,

    #[arg(
        long,
        help = "Candidate template experiments",
        long_help = "A file with a header line and one experiment id per line.\n\
		     Without it, every experiment in the annotation is a candidate."
    )]
    experiment_list: Option<Box<str>>,

    #[arg(
        long,
        default_value = DEFAULT_EXPERIMENT_COLUMN,
        help = "Experiment column of the annotation"
    )]
    experiment_column: Box<str>,

    #[arg(long, default_value = DEFAULT_SAMPLE_COLUMN, help = "Sample column of the annotation")]
    sample_column: Box<str>,

    #[arg(
        long,
        default_value_t = false,
        help = "Draw each template experiment at most once"
    )]
    distinct_templates: bool,

    #[arg(long, help = "Keep a random subset of this many genes")]
    n_genes: Option<usize>,

    #[arg(long, default_value_t = DEFAULT_RSEED, help = "Random seed")]
    rseed: u64,

    #[arg(long, default_value_t = DEFAULT_PRECISION, help = "Decimal places in the output")]
    precision: usize,

    #[arg(long, short, required = true, help = "Output header")]
    out: Box<str>,
}

pub fn run_simulate(args: &SimulateArgs, verbose: bool) -> anyhow::Result<()> {
    let mut rng = StdRng::seed_from_u64(args.rseed);

    let expr = read_expr_matrix(&args.expr, args.genes_in_rows)?;
    let codec = load_codec(&args.model_dir, args.device, args.device_no)?;

    let simulated = match args.mode {
        SimulationMode::Global => simulate_global(&codec, &expr, args.n_samples, &mut rng)?,
        SimulationMode::CentroidShift => {
            let annotation = args.annotation.as_deref().ok_or_else(|| {
                anyhow::anyhow!("centroid-shift mode needs an `--annotation` table")
            })?;

            let registry = ExperimentRegistry::from_annotation_file(
                annotation,
                &args.experiment_column,
                &args.sample_column,
            )?;
            if registry.is_empty() {
                anyhow::bail!("{}: no experiments annotated", annotation);
            }

            let candidates = match args.experiment_list.as_deref() {
                Some(file) => read_experiment_list(file)?,
                None => registry.experiment_ids().to_vec(),
            };

            let config = CentroidShiftConfig {
                num_experiments: args.n_experiments,
                template_draw: if args.distinct_templates {
                    TemplateDraw::WithoutReplacement
                } else {
                    TemplateDraw::WithReplacement
                },
                verbose,
            };

            simulate_centroid_shift(&codec, &expr, &registry, &candidates, &config, &mut rng)?.data
        }
    };

    let simulated = match args.n_genes {
        Some(n_genes) => subset_genes(&simulated, n_genes, &mut rng)?,
        None => simulated,
    };

    let out_file = output_file(&args.out, "simulated.tsv.gz");
    write_simulated_dataset(&simulated, &out_file, Some(args.precision))?;

    info!("Done");
    Ok(())
}
