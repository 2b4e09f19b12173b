use candle_util::candle_core::Device;
use candle_util::candle_vae_codec::VaeCodec;
use clap::ValueEnum;
use log::info;
use std::path::Path;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
#[clap(rename_all = "lowercase")]
pub enum ComputeDevice {
    Cpu,
    Cuda,
    Metal,
}

impl ComputeDevice {
    pub fn device(&self, device_no: usize) -> anyhow::Result<Device> {
        Ok(match self {
            ComputeDevice::Metal => Device::new_metal(device_no)?,
            ComputeDevice::Cuda => Device::new_cuda(device_no)?,
            ComputeDevice::Cpu => Device::Cpu,
        })
    }
}

/// Restore the pretrained codec under `model_dir`
pub fn load_codec(
    model_dir: &str,
    device: ComputeDevice,
    device_no: usize,
) -> anyhow::Result<VaeCodec> {
    let codec = VaeCodec::load(Path::new(model_dir), &device.device(device_no)?)?;
    let config = codec.config();
    info!(
        "hidden layers: encoder {:?}, decoder {:?}",
        config.encoder_layers, config.decoder_layers
    );
    Ok(codec)
}

/// `{out}.{suffix}`
pub fn output_file(out: &str, suffix: &str) -> String {
    format!("{}.{}", out, suffix)
}
