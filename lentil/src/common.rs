pub use log::{debug, info, warn};

pub type Mat = nalgebra::DMatrix<f32>;

/// header of the sample-name column in every persisted table
pub const SAMPLE_ID_COLUMN: &str = "sample_id";

/// provenance column of the centroid-shift simulation
pub const EXPERIMENT_ID_COLUMN: &str = "experiment_id";

/// provenance column of the batch-effect injection
pub const BATCH_COLUMN: &str = "experiment";

pub const DEFAULT_PRECISION: usize = 3;
pub const DEFAULT_BATCH_SD: f32 = 0.2;
pub const DEFAULT_RSEED: u64 = 123;
