pub mod batch_effect;
pub mod codec;
pub mod common;
pub mod compare;
pub mod error;
pub mod expr_io;
pub mod expr_matrix;
pub mod gene_subset;
pub mod latent_stat;
pub mod permute;
pub mod registry;
pub mod sampler;
pub mod sim_centroid;
pub mod sim_global;
