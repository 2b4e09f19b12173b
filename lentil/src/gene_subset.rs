use crate::common::*;
use crate::error::SimError;
use crate::expr_matrix::SimulatedDataset;

use rand::Rng;

/// Keep `n_genes` distinct genes chosen uniformly at random, in their
/// original column order. Names and provenance are kept.
pub fn subset_genes<R>(
    data: &SimulatedDataset,
    n_genes: usize,
    rng: &mut R,
) -> anyhow::Result<SimulatedDataset>
where
    R: Rng + ?Sized,
{
    let total = data.num_genes();
    if n_genes == 0 || n_genes > total {
        return Err(SimError::InvalidInput(format!(
            "can't keep {} out of {} genes",
            n_genes, total
        ))
        .into());
    }

    let mut keep = rand::seq::index::sample(rng, total, n_genes).into_vec();
    keep.sort_unstable();

    info!("keeping {} of {} genes", n_genes, total);

    let genes = keep.iter().map(|&j| data.genes()[j].clone()).collect();
    let (samples, _, mat, provenance) = data.clone().into_parts();
    SimulatedDataset::new(samples, genes, mat.select_columns(&keep), provenance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn toy() -> SimulatedDataset {
        let genes = (0..10).map(|j| format!("g{}", j).into_boxed_str()).collect();
        let mat = Mat::from_fn(3, 10, |i, j| (10 * i + j) as f32);
        SimulatedDataset::new(vec!["a".into(), "b".into(), "c".into()], genes, mat, None).unwrap()
    }

    #[test]
    fn keeps_order_and_values() -> anyhow::Result<()> {
        let data = toy();
        let mut rng = StdRng::seed_from_u64(123);
        let sub = subset_genes(&data, 4, &mut rng)?;

        assert_eq!(sub.num_genes(), 4);
        let pos: Vec<usize> = sub
            .genes()
            .iter()
            .map(|g| g[1..].parse::<usize>().unwrap())
            .collect();
        assert!(pos.windows(2).all(|w| w[0] < w[1]));

        for (k, &j) in pos.iter().enumerate() {
            assert_eq!(sub.mat()[(2, k)], (20 + j) as f32);
        }
        Ok(())
    }

    #[test]
    fn rejects_bad_sizes() {
        let data = toy();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(subset_genes(&data, 0, &mut rng).is_err());
        assert!(subset_genes(&data, 11, &mut rng).is_err());
        assert_eq!(subset_genes(&data, 10, &mut rng).unwrap().genes(), data.genes());
    }
}
