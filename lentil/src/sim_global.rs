use crate::codec::{decode_rows, encode, LatentCodec};
use crate::common::*;
use crate::error::SimError;
use crate::expr_matrix::{ExprMatrix, SimulatedDataset};
use crate::latent_stat::LatentStat;

use rand::Rng;

/// Simulate samples from the global latent distribution of `expr`
///
/// Encode every sample, fit independent normals to each latent
/// dimension, draw `num_samples` codes and decode them. The output
/// rows are named `"0"`, `"1"`, ... and carry no provenance.
///
/// * `codec` - pretrained codec over the genes of `expr`
/// * `expr` - real expression data
/// * `num_samples` - number of samples to simulate
/// * `rng` - the run's generator
pub fn simulate_global<C, R>(
    codec: &C,
    expr: &ExprMatrix,
    num_samples: usize,
    rng: &mut R,
) -> anyhow::Result<SimulatedDataset>
where
    C: LatentCodec + ?Sized,
    R: Rng + ?Sized,
{
    if num_samples == 0 {
        return Err(SimError::InvalidInput("asked for zero simulated samples".into()).into());
    }

    let z = encode(codec, expr)?;
    let stat = LatentStat::estimate(&z)?;

    info!(
        "global latent distribution over {} samples, {} dims",
        z.num_samples(),
        stat.dim()
    );

    let z_new = stat.sample(num_samples, rng)?;
    let x_new = decode_rows(codec, &z_new, expr.num_genes())?;

    let samples = (0..num_samples)
        .map(|i| i.to_string().into_boxed_str())
        .collect();

    info!("simulated {} samples", num_samples);

    SimulatedDataset::new(samples, expr.genes().to_vec(), x_new, None)
}
