use candle_core::{Result, Tensor};

pub trait EncoderModuleT {
    /// Gaussian posterior parameters of the latent states
    ///
    /// # Arguments
    /// * `x_nd` - input data (n x d)
    ///
    /// # Returns `(z_mean_nk, z_lnvar_nk)`
    fn latent_gaussian_params(&self, x_nd: &Tensor) -> Result<(Tensor, Tensor)>;

    /// Deterministic latent states, the posterior mean (n x k)
    fn encode(&self, x_nd: &Tensor) -> Result<Tensor> {
        let (z_mean_nk, _) = self.latent_gaussian_params(x_nd)?;
        Ok(z_mean_nk)
    }

    fn dim_obs(&self) -> usize;

    fn dim_latent(&self) -> usize;
}

pub trait DecoderModuleT {
    /// A decoder that spits out reconstruction (n x d)
    fn forward(&self, z_nk: &Tensor) -> Result<Tensor>;

    fn dim_obs(&self) -> usize;

    fn dim_latent(&self) -> usize;
}
