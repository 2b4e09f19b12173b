use crate::candle_model_decoder::*;
use crate::candle_model_encoder::*;
use crate::candle_model_traits::*;

use candle_core::{DType, Device, Tensor};
use candle_nn::{VarBuilder, VarMap};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const VAE_CONFIG_FILE: &str = "config.json";
pub const VAE_WEIGHTS_FILE: &str = "model.safetensors";

/// Architecture of a pretrained VAE
///
/// ```json
/// { "n_features": 5549, "n_latent": 30,
///   "encoder_layers": [300], "decoder_layers": [300],
///   "output_activation": "sigmoid" }
/// ```
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct VaeConfig {
    pub n_features: usize,
    pub n_latent: usize,
    #[serde(default)]
    pub encoder_layers: Vec<usize>,
    #[serde(default)]
    pub decoder_layers: Vec<usize>,
    #[serde(default)]
    pub output_activation: OutputActivation,
}

impl VaeConfig {
    pub fn from_json_file(file: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(file)
            .map_err(|e| anyhow::anyhow!("failed to read {}: {}", file.display(), e))?;
        let config: VaeConfig = serde_json::from_str(&text)?;
        if config.n_features == 0 || config.n_latent == 0 {
            anyhow::bail!("{}: empty feature or latent dimension", file.display());
        }
        Ok(config)
    }

    pub fn to_json_file(&self, file: &Path) -> anyhow::Result<()> {
        std::fs::write(file, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

/// A pretrained encoder-decoder pair used as a deterministic codec:
/// `encode` returns the posterior mean, `decode` the reconstruction.
/// Once loaded, nothing mutates the weights.
pub struct VaeCodec {
    config: VaeConfig,
    encoder: GaussianEncoder,
    decoder: MlpDecoder,
    variable_map: VarMap,
    device: Device,
}

impl VaeCodec {
    /// Build a codec with freshly initialized weights
    pub fn new(config: VaeConfig, device: &Device) -> anyhow::Result<Self> {
        let variable_map = VarMap::new();
        let vs = VarBuilder::from_varmap(&variable_map, DType::F32, device);

        let encoder = GaussianEncoder::new(
            config.n_features,
            config.n_latent,
            &config.encoder_layers,
            vs.clone(),
        )?;

        let decoder = MlpDecoder::new(
            config.n_features,
            config.n_latent,
            &config.decoder_layers,
            config.output_activation,
            vs,
        )?;

        Ok(Self {
            config,
            encoder,
            decoder,
            variable_map,
            device: device.clone(),
        })
    }

    /// Restore a pretrained codec from `{model_dir}/config.json` and
    /// `{model_dir}/model.safetensors`
    pub fn load(model_dir: &Path, device: &Device) -> anyhow::Result<Self> {
        let config = VaeConfig::from_json_file(&model_dir.join(VAE_CONFIG_FILE))?;
        let weights_file = model_dir.join(VAE_WEIGHTS_FILE);

        info!(
            "loading VAE: {} features -> {} latent dims, weights {}",
            config.n_features,
            config.n_latent,
            weights_file.display()
        );

        let mut codec = Self::new(config, device)?;
        codec.variable_map.load(&weights_file)?;
        Ok(codec)
    }

    /// Save the architecture and weights under `model_dir`
    pub fn save(&self, model_dir: &Path) -> anyhow::Result<()> {
        std::fs::create_dir_all(model_dir)?;
        self.config.to_json_file(&model_dir.join(VAE_CONFIG_FILE))?;
        self.variable_map.save(model_dir.join(VAE_WEIGHTS_FILE))?;
        Ok(())
    }

    /// `x_nd -> z_nk`
    pub fn encode(&self, x_nd: &Tensor) -> candle_core::Result<Tensor> {
        self.encoder.encode(&x_nd.to_device(&self.device)?)
    }

    /// `z_nk -> x_nd`
    pub fn decode(&self, z_nk: &Tensor) -> candle_core::Result<Tensor> {
        self.decoder.forward(&z_nk.to_device(&self.device)?)
    }

    pub fn config(&self) -> &VaeConfig {
        &self.config
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn dim_obs(&self) -> usize {
        self.encoder.dim_obs()
    }

    pub fn dim_latent(&self) -> usize {
        self.encoder.dim_latent()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_config() -> VaeConfig {
        VaeConfig {
            n_features: 6,
            n_latent: 2,
            encoder_layers: vec![4],
            decoder_layers: vec![4],
            output_activation: OutputActivation::Sigmoid,
        }
    }

    #[test]
    fn codec_shapes() -> anyhow::Result<()> {
        let dev = Device::Cpu;
        let codec = VaeCodec::new(toy_config(), &dev)?;
        let x_nd = Tensor::rand(0_f32, 1_f32, (5, 6), &dev)?;

        let z_nk = codec.encode(&x_nd)?;
        assert_eq!(z_nk.dims2()?, (5, 2));

        let y_nd = codec.decode(&z_nk)?;
        assert_eq!(y_nd.dims2()?, (5, 6));

        let max_val = y_nd.max_all()?.to_scalar::<f32>()?;
        let min_val = y_nd.min_all()?.to_scalar::<f32>()?;
        assert!(min_val >= 0.0 && max_val <= 1.0);
        Ok(())
    }

    #[test]
    fn encode_is_deterministic() -> anyhow::Result<()> {
        let dev = Device::Cpu;
        let codec = VaeCodec::new(toy_config(), &dev)?;
        let x_nd = Tensor::rand(0_f32, 1_f32, (3, 6), &dev)?;
        let z1 = codec.encode(&x_nd)?.to_vec2::<f32>()?;
        let z2 = codec.encode(&x_nd)?.to_vec2::<f32>()?;
        assert_eq!(z1, z2);
        Ok(())
    }

    #[test]
    fn config_defaults() -> anyhow::Result<()> {
        let config: VaeConfig = serde_json::from_str(r#"{"n_features": 10, "n_latent": 3}"#)?;
        assert!(config.encoder_layers.is_empty());
        assert_eq!(config.output_activation, OutputActivation::Sigmoid);
        Ok(())
    }
}
