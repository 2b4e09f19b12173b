use crate::common::*;
use crate::error::SimError;
use crate::expr_matrix::{ExprMatrix, LatentMatrix};

use candle_util::candle_core::Device;
use candle_util::candle_vae_codec::VaeCodec;
use matrix_util::traits::ConvertMatOps;

/// A fixed, pretrained mapping between expression space (`dim_obs`
/// genes) and latent space (`dim_latent` dims). Both directions work
/// row by row on `n x d` and `n x k` matrices and never mutate the
/// codec.
pub trait LatentCodec {
    fn dim_obs(&self) -> usize;

    fn dim_latent(&self) -> usize;

    /// `x_nd -> z_nk`
    fn encode_mat(&self, x_nd: &Mat) -> anyhow::Result<Mat>;

    /// `z_nk -> x_nd`
    fn decode_mat(&self, z_nk: &Mat) -> anyhow::Result<Mat>;
}

impl LatentCodec for VaeCodec {
    fn dim_obs(&self) -> usize {
        VaeCodec::dim_obs(self)
    }

    fn dim_latent(&self) -> usize {
        VaeCodec::dim_latent(self)
    }

    fn encode_mat(&self, x_nd: &Mat) -> anyhow::Result<Mat> {
        let z_nk = self.encode(&x_nd.to_tensor(self.device())?)?;
        Mat::from_tensor(&z_nk.to_device(&Device::Cpu)?)
    }

    fn decode_mat(&self, z_nk: &Mat) -> anyhow::Result<Mat> {
        let x_nd = self.decode(&z_nk.to_tensor(self.device())?)?;
        Mat::from_tensor(&x_nd.to_device(&Device::Cpu)?)
    }
}

/// Latent space equals expression space. Handy for checking the
/// simulators without a trained model.
#[derive(Clone, Copy, Debug)]
pub struct IdentityCodec {
    dim: usize,
}

impl IdentityCodec {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }
}

impl LatentCodec for IdentityCodec {
    fn dim_obs(&self) -> usize {
        self.dim
    }

    fn dim_latent(&self) -> usize {
        self.dim
    }

    fn encode_mat(&self, x_nd: &Mat) -> anyhow::Result<Mat> {
        Ok(x_nd.clone())
    }

    fn decode_mat(&self, z_nk: &Mat) -> anyhow::Result<Mat> {
        Ok(z_nk.clone())
    }
}

/// Encode rows of an expression matrix, checking shapes on both sides
/// of the codec
///
/// * `samples` - names of the rows of `x_nd`
/// * `x_nd` - expression values, one row per sample
pub fn encode_rows<C>(
    codec: &C,
    samples: Vec<Box<str>>,
    x_nd: &Mat,
) -> anyhow::Result<LatentMatrix>
where
    C: LatentCodec + ?Sized,
{
    if x_nd.ncols() != codec.dim_obs() {
        let err = SimError::dimension("encoder input genes", codec.dim_obs(), x_nd.ncols());
        return Err(err.into());
    }
    if samples.len() != x_nd.nrows() {
        let err = SimError::dimension("sample names", x_nd.nrows(), samples.len());
        return Err(err.into());
    }

    let z_nk = codec.encode_mat(x_nd)?;

    if z_nk.nrows() != x_nd.nrows() {
        let err = SimError::dimension("encoded rows", x_nd.nrows(), z_nk.nrows());
        return Err(err.into());
    }
    if z_nk.ncols() != codec.dim_latent() {
        let err = SimError::dimension("latent dims", codec.dim_latent(), z_nk.ncols());
        return Err(err.into());
    }

    Ok(LatentMatrix {
        samples,
        mat: z_nk,
    })
}

/// Encode every sample of `expr`
pub fn encode<C>(codec: &C, expr: &ExprMatrix) -> anyhow::Result<LatentMatrix>
where
    C: LatentCodec + ?Sized,
{
    encode_rows(codec, expr.samples().to_vec(), expr.mat())
}

/// Decode latent vectors into `z_nk.nrows() x n_genes` expression
pub fn decode_rows<C>(codec: &C, z_nk: &Mat, n_genes: usize) -> anyhow::Result<Mat>
where
    C: LatentCodec + ?Sized,
{
    if z_nk.ncols() != codec.dim_latent() {
        let err = SimError::dimension("decoder input dims", codec.dim_latent(), z_nk.ncols());
        return Err(err.into());
    }
    if codec.dim_obs() != n_genes {
        let err = SimError::dimension("decoder output genes", n_genes, codec.dim_obs());
        return Err(err.into());
    }

    let x_nd = codec.decode_mat(z_nk)?;

    if x_nd.nrows() != z_nk.nrows() || x_nd.ncols() != n_genes {
        let err = SimError::dimension("decoded values", z_nk.nrows() * n_genes, x_nd.len());
        return Err(err.into());
    }
    Ok(x_nd)
}

/// Pass every sample through the codec, `x -> decode(encode(x))`,
/// keeping sample and gene names
pub fn reconstruct<C>(codec: &C, expr: &ExprMatrix) -> anyhow::Result<ExprMatrix>
where
    C: LatentCodec + ?Sized,
{
    let z = encode(codec, expr)?;
    let x_nd = decode_rows(codec, z.mat(), expr.num_genes())?;
    info!(
        "reconstructed {} samples through {} latent dims",
        x_nd.nrows(),
        codec.dim_latent()
    );
    ExprMatrix::new(expr.samples().to_vec(), expr.genes().to_vec(), x_nd)
}
