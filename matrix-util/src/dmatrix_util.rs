use crate::traits::*;
use candle_core::{Device, Tensor};
pub use nalgebra::DMatrix;
use num_traits::Float;
use rand::Rng;
use rand_distr::{Distribution, Normal, StandardNormal};

impl<T> MatOps for DMatrix<T>
where
    T: nalgebra::Scalar + Float,
{
    type Mat = Self;
    type Scalar = T;

    fn column_means(&self) -> Vec<T> {
        let nn = T::from(self.nrows()).unwrap_or_else(T::nan);
        self.column_iter()
            .map(|x_j| x_j.iter().fold(T::zero(), |acc, &x| acc + x) / nn)
            .collect()
    }

    fn column_stds(&self, ddof: usize) -> Vec<T> {
        let nrow = self.nrows();
        if nrow <= ddof {
            return vec![T::zero(); self.ncols()];
        }
        let denom = T::from(nrow - ddof).unwrap_or_else(T::nan);
        self.column_means()
            .into_iter()
            .zip(self.column_iter())
            .map(|(mu, x_j)| {
                let ss = x_j.iter().fold(T::zero(), |acc, &x| acc + (x - mu) * (x - mu));
                (ss / denom).sqrt()
            })
            .collect()
    }
}

impl<T> SampleOps for DMatrix<T>
where
    T: nalgebra::Scalar + Float,
    StandardNormal: Distribution<T>,
{
    type Mat = Self;
    type Scalar = T;

    fn rnorm_columns<R: Rng + ?Sized>(
        nrow: usize,
        mu: &[T],
        sigma: &[T],
        rng: &mut R,
    ) -> anyhow::Result<Self::Mat> {
        if mu.len() != sigma.len() {
            anyhow::bail!("{} means vs. {} standard deviations", mu.len(), sigma.len());
        }

        let mut ret = DMatrix::<T>::zeros(nrow, mu.len());
        for (j, (&m, &s)) in mu.iter().zip(sigma.iter()).enumerate() {
            let rnorm = Normal::new(m, s)
                .map_err(|e| anyhow::anyhow!("column {}: N({:?}, {:?}): {}", j, m, s, e))?;
            for i in 0..nrow {
                ret[(i, j)] = rnorm.sample(rng);
            }
        }
        Ok(ret)
    }
}

impl ConvertMatOps for DMatrix<f32> {
    type Mat = Self;
    type Scalar = f32;

    fn from_tensor(x: &Tensor) -> anyhow::Result<Self::Mat> {
        let (nrow, ncol) = x.dims2()?;
        let data = x.to_dtype(candle_core::DType::F32)?.to_vec2::<f32>()?;
        Ok(DMatrix::<f32>::from_row_iterator(
            nrow,
            ncol,
            data.into_iter().flatten(),
        ))
    }

    fn to_tensor(&self, dev: &Device) -> anyhow::Result<Tensor> {
        // column-major storage of the transpose is row-major of self
        let row_major: Vec<f32> = self.transpose().as_slice().to_vec();
        Ok(Tensor::from_vec(row_major, (self.nrows(), self.ncols()), dev)?)
    }
}
