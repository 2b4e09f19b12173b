use crate::common::*;
use crate::expr_matrix::SimulatedDataset;

use rand::seq::SliceRandom;
use rand::Rng;

/// Destroy gene-gene structure while keeping every sample's value
/// distribution: each row is shuffled across genes independently.
/// Names and provenance labels are untouched.
pub fn permute_within_samples<R>(
    data: &SimulatedDataset,
    rng: &mut R,
) -> anyhow::Result<SimulatedDataset>
where
    R: Rng + ?Sized,
{
    let mut mat = data.mat().clone();
    let mut buf: Vec<f32> = Vec::with_capacity(mat.ncols());

    for mut x_i in mat.row_iter_mut() {
        buf.clear();
        buf.extend(x_i.iter());
        buf.shuffle(rng);
        for (x_ij, &v) in x_i.iter_mut().zip(buf.iter()) {
            *x_ij = v;
        }
    }

    info!(
        "permuted {} genes within each of {} samples",
        mat.ncols(),
        mat.nrows()
    );
    data.with_values(mat)
}
