pub mod candle_aux_layers;
pub mod candle_model_decoder;
pub mod candle_model_encoder;
pub mod candle_model_traits;
pub mod candle_vae_codec;

pub use candle_core;
pub use candle_nn;
