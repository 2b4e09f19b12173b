use crate::candle_aux_layers::*;
use crate::candle_model_traits::*;
use candle_core::{Result, Tensor};
use candle_nn::{Activation, Linear, Module, VarBuilder};
use serde::{Deserialize, Serialize};

/// What to apply on the last decoder layer
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputActivation {
    /// expression normalized to `[0, 1]`
    #[default]
    Sigmoid,
    Relu,
    Identity,
}

impl OutputActivation {
    fn to_candle(self) -> Option<Activation> {
        match self {
            OutputActivation::Sigmoid => Some(Activation::Sigmoid),
            OutputActivation::Relu => Some(Activation::Relu),
            OutputActivation::Identity => None,
        }
    }
}

/// Fully connected decoder `z -> relu layers -> x`
pub struct MlpDecoder {
    n_features: usize,
    n_latent: usize,
    fc: StackLayers<Linear>,
}

impl MlpDecoder {
    /// Will create a new decoder module with these variables:
    ///
    /// * `nn.dec.fc.{}.weight` where {} is the hidden layer index
    /// * `nn.dec.out.weight`
    pub fn new(
        n_features: usize,
        n_latent: usize,
        layers: &[usize],
        output_activation: OutputActivation,
        vs: VarBuilder,
    ) -> Result<Self> {
        let (mut fc, prev_dim) = relu_stack(n_latent, layers, "nn.dec.fc", &vs)?;

        let out = candle_nn::linear(prev_dim, n_features, vs.pp("nn.dec.out"))?;
        match output_activation.to_candle() {
            Some(act) => fc.push_with_act(out, act),
            None => fc.push(out),
        }

        Ok(Self {
            n_features,
            n_latent,
            fc,
        })
    }
}

impl DecoderModuleT for MlpDecoder {
    fn forward(&self, z_nk: &Tensor) -> Result<Tensor> {
        self.fc.forward(z_nk)
    }

    fn dim_obs(&self) -> usize {
        self.n_features
    }

    fn dim_latent(&self) -> usize {
        self.n_latent
    }
}
