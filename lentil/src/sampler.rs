use crate::common::*;
use crate::error::SimError;

use matrix_util::traits::SampleOps;
use rand::Rng;

/// Draw `count` latent vectors with independent coordinates,
/// `z[i, j] ~ N(means[j], stds[j]^2)`. A zero standard deviation
/// pins the coordinate to its mean.
///
/// * `means` - per-dimension centers
/// * `stds` - per-dimension spreads (finite, non-negative)
/// * `count` - number of rows to draw
/// * `rng` - the run's generator
pub fn sample_latent<R: Rng + ?Sized>(
    means: &[f32],
    stds: &[f32],
    count: usize,
    rng: &mut R,
) -> anyhow::Result<Mat> {
    if means.len() != stds.len() {
        return Err(SimError::dimension("standard deviations", means.len(), stds.len()).into());
    }

    if let Some(j) = stds.iter().position(|s| !s.is_finite() || *s < 0.0) {
        return Err(SimError::InvalidInput(format!(
            "dimension {}: standard deviation {} is not a finite non-negative number",
            j, stds[j]
        ))
        .into());
    }

    if let Some(j) = means.iter().position(|m| !m.is_finite()) {
        return Err(SimError::InvalidInput(format!("dimension {}: mean {}", j, means[j])).into());
    }

    Mat::rnorm_columns(count, means, stds, rng)
}
