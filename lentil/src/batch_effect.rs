use crate::common::*;
use crate::error::SimError;
use crate::expr_matrix::{Provenance, SimulatedDataset};

use fnv::FnvHashMap;
use matrix_util::utils::split_even_intervals;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Which batch each sample was assigned to, in row order
#[derive(Clone, Debug, PartialEq)]
pub struct ExperimentMap {
    pub samples: Vec<Box<str>>,
    pub labels: Vec<Box<str>>,
}

pub struct BatchEffectOut {
    pub num_batches: usize,
    /// shifted values, labelled with the `experiment` column
    pub data: SimulatedDataset,
    pub map: ExperimentMap,
    /// row positions of each batch; all rows of a sample id share one
    pub groups: Vec<Vec<usize>>,
}

/// Split the samples into `num_batches` groups and shift every gene of
/// a group by one common offset drawn from `N(0, batch_sd^2)`
///
/// With a single batch nothing moves and every sample is labelled
/// `"1"`. Otherwise the distinct sample ids are shuffled, cut into
/// contiguous groups whose sizes differ by at most one (earlier groups
/// take the extra ids) and labelled `"0"`, `"1"`, ... by group. Rows
/// repeating a sample id follow that id into the same batch.
///
/// * `data` - simulated expression
/// * `num_batches` - number of groups (positive)
/// * `batch_sd` - spread of the per-gene offsets
/// * `rng` - the run's generator
pub fn add_batch_effect<R>(
    data: &SimulatedDataset,
    num_batches: usize,
    batch_sd: f32,
    rng: &mut R,
) -> anyhow::Result<BatchEffectOut>
where
    R: Rng + ?Sized,
{
    if num_batches == 0 {
        return Err(SimError::InvalidInput("number of batches must be positive".into()).into());
    }
    if !batch_sd.is_finite() || batch_sd < 0.0 {
        return Err(SimError::InvalidInput(format!("batch sd {}", batch_sd)).into());
    }

    let nrows = data.num_samples();
    let mut mat = data.mat().clone();
    let mut labels: Vec<Box<str>> = vec!["1".into(); nrows];
    let mut groups: Vec<Vec<usize>> = vec![];

    if num_batches == 1 {
        groups.push((0..nrows).collect());
    } else {
        let shift_dist = Normal::new(0_f32, batch_sd)?;

        // rows of each distinct sample id, ids in first-seen order
        let mut id_rows: Vec<Vec<usize>> = vec![];
        let mut id_index: FnvHashMap<&str, usize> = FnvHashMap::default();
        for (i, s) in data.samples().iter().enumerate() {
            let next = id_rows.len();
            let j = *id_index.entry(&**s).or_insert(next);
            if j == next {
                id_rows.push(vec![]);
            }
            id_rows[j].push(i);
        }

        let mut order: Vec<usize> = (0..id_rows.len()).collect();
        order.shuffle(rng);

        for (k, (lb, ub)) in split_even_intervals(order.len(), num_batches)
            .into_iter()
            .enumerate()
        {
            let shift: Vec<f32> = (0..mat.ncols()).map(|_| shift_dist.sample(rng)).collect();
            let label: Box<str> = k.to_string().into();

            let rows: Vec<usize> = order[lb..ub]
                .iter()
                .flat_map(|&j| id_rows[j].iter().copied())
                .collect();

            for &i in rows.iter() {
                for (x_ij, &d_j) in mat.row_mut(i).iter_mut().zip(shift.iter()) {
                    *x_ij += d_j;
                }
                labels[i] = label.clone();
            }
            groups.push(rows);
        }
    }

    info!(
        "{} batch(es) over {} samples, sd {}",
        num_batches, nrows, batch_sd
    );

    let map = ExperimentMap {
        samples: data.samples().to_vec(),
        labels: labels.clone(),
    };

    let provenance = Provenance {
        column: BATCH_COLUMN.into(),
        labels,
    };

    Ok(BatchEffectOut {
        num_batches,
        data: data.with_values(mat)?.with_provenance(provenance)?,
        map,
        groups,
    })
}

/// One output per requested batch count. The generator advances
/// through the counts in order, so a run is reproducible as a whole.
pub fn add_batch_effects<R>(
    data: &SimulatedDataset,
    batch_counts: &[usize],
    batch_sd: f32,
    rng: &mut R,
) -> anyhow::Result<Vec<BatchEffectOut>>
where
    R: Rng + ?Sized,
{
    batch_counts
        .iter()
        .map(|&k| add_batch_effect(data, k, batch_sd, rng))
        .collect()
}
