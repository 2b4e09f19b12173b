use crate::common::*;
use crate::error::SimError;
use crate::expr_matrix::LatentMatrix;
use crate::sampler::sample_latent;

use matrix_util::traits::MatOps;
use rand::Rng;

/// Column-wise mean and sample standard deviation (`ddof = 1`) of a
/// set of latent vectors. A single row yields zero spread.
#[derive(Clone, Debug, PartialEq)]
pub struct LatentStat {
    pub mean: Vec<f32>,
    pub std: Vec<f32>,
}

impl LatentStat {
    pub fn estimate(z: &LatentMatrix) -> anyhow::Result<Self> {
        if z.num_samples() == 0 {
            return Err(SimError::EmptyInput("latent statistics over zero samples").into());
        }
        let stat = Self {
            mean: z.mat().column_means(),
            std: z.mat().column_stds(1),
        };
        debug!(
            "latent statistics over {} samples x {} dims",
            z.num_samples(),
            stat.dim()
        );
        Ok(stat)
    }

    pub fn dim(&self) -> usize {
        self.mean.len()
    }

    /// Draw `count` latent vectors from the independent normals
    pub fn sample<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> anyhow::Result<Mat> {
        sample_latent(&self.mean, &self.std, count, rng)
    }
}

/// Column-wise mean of a set of latent vectors
pub fn centroid(z: &LatentMatrix) -> anyhow::Result<Vec<f32>> {
    if z.num_samples() == 0 {
        return Err(SimError::EmptyInput("centroid of zero samples").into());
    }
    Ok(z.mat().column_means())
}
