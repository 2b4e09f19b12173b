use crate::common_io::Delimiter;
use candle_core::Device;
use candle_core::Tensor;
use rand::Rng;

/// A matrix with row and column names. Columns holding text rather
/// than numbers (e.g., a trailing label column) are kept aside.
#[derive(Clone, Debug)]
pub struct MatWithNames<M> {
    pub rows: Vec<Box<str>>,
    pub cols: Vec<Box<str>>,
    pub mat: M,
    pub text_columns: Vec<TextColumn>,
}

/// A named column of strings aligned with the rows of a matrix
#[derive(Clone, Debug, PartialEq)]
pub struct TextColumn {
    pub name: Box<str>,
    pub values: Vec<Box<str>>,
}

/// Reading off from `Tensor`
pub trait ConvertMatOps {
    type Mat;
    type Scalar;

    fn from_tensor(_: &Tensor) -> anyhow::Result<Self::Mat>;
    fn to_tensor(&self, dev: &Device) -> anyhow::Result<Tensor>;
}

/// Column-wise summary statistics
pub trait MatOps {
    type Mat;
    type Scalar;

    /// Average of each column
    fn column_means(&self) -> Vec<Self::Scalar>;

    /// Standard deviation of each column with `ddof` degrees of
    /// freedom removed from the denominator (`ddof = 1` for the
    /// sample standard deviation)
    fn column_stds(&self, ddof: usize) -> Vec<Self::Scalar>;
}

/// Operations to sample random matrices from a caller-owned
/// generator, so a whole run can be replayed from one seed
pub trait SampleOps {
    type Mat;
    type Scalar;

    /// Sample a `nrow x mu.len()` matrix where column `j` is drawn
    /// from `N(mu[j], sigma[j]^2)`. Draws proceed column by column.
    fn rnorm_columns<R: Rng + ?Sized>(
        nrow: usize,
        mu: &[Self::Scalar],
        sigma: &[Self::Scalar],
        rng: &mut R,
    ) -> anyhow::Result<Self::Mat>;
}

/// Read named matrices from delimited files
pub trait IoOps {
    type Scalar;
    type Mat;

    /// Read a table whose first column holds row names and whose
    /// header holds column names. Columns whose header matches one of
    /// `text_column_names` are kept as text.
    fn read_names_delim(
        file: &str,
        delim: impl Into<Delimiter>,
        text_column_names: &[&str],
    ) -> anyhow::Result<MatWithNames<Self::Mat>>;

    fn read_names_tsv(
        file: &str,
        text_column_names: &[&str],
    ) -> anyhow::Result<MatWithNames<Self::Mat>> {
        Self::read_names_delim(file, "\t", text_column_names)
    }
}
