use crate::candle_aux_layers::*;
use crate::candle_model_traits::*;
use candle_core::{Result, Tensor};
use candle_nn::{Linear, Module, VarBuilder};

/// Fully connected Gaussian encoder
///
/// ```text
/// h = relu(... relu(x W1) ...)
/// z_mean = h Wm,  z_lnvar = h Wv
/// ```
pub struct GaussianEncoder {
    n_features: usize,
    n_latent: usize,
    fc: StackLayers<Linear>,
    z_mean: Linear,
    z_lnvar: Linear,
}

impl EncoderModuleT for GaussianEncoder {
    fn latent_gaussian_params(&self, x_nd: &Tensor) -> Result<(Tensor, Tensor)> {
        let min_lv = -8.;
        let max_lv = 8.;

        let h_nl = self.fc.forward(x_nd)?;
        let z_mean_nk = self.z_mean.forward(&h_nl)?;
        let z_lnvar_nk = self.z_lnvar.forward(&h_nl)?.clamp(min_lv, max_lv)?;
        Ok((z_mean_nk, z_lnvar_nk))
    }

    fn dim_obs(&self) -> usize {
        self.n_features
    }

    fn dim_latent(&self) -> usize {
        self.n_latent
    }
}

impl GaussianEncoder {
    /// Will create a new Gaussian encoder module
    /// with these variables:
    ///
    /// * `nn.enc.fc.{}.weight` where {} is the layer index
    /// * `nn.enc.z.mean.weight`
    /// * `nn.enc.z.lnvar.weight`
    pub fn new(
        n_features: usize,
        n_latent: usize,
        layers: &[usize],
        vs: VarBuilder,
    ) -> Result<Self> {
        let (fc, prev_dim) = relu_stack(n_features, layers, "nn.enc.fc", &vs)?;

        let z_mean = candle_nn::linear(prev_dim, n_latent, vs.pp("nn.enc.z.mean"))?;
        let z_lnvar = candle_nn::linear(prev_dim, n_latent, vs.pp("nn.enc.z.lnvar"))?;

        Ok(Self {
            n_features,
            n_latent,
            fc,
            z_mean,
            z_lnvar,
        })
    }
}
