use approx::assert_abs_diff_eq;
use lentil::batch_effect::*;
use lentil::common::*;
use lentil::expr_matrix::{Provenance, SimulatedDataset};
use lentil::permute::permute_within_samples;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;

fn toy_dataset(nrows: usize, ncols: usize) -> SimulatedDataset {
    let samples = (0..nrows).map(|i| i.to_string().into_boxed_str()).collect();
    let genes = (0..ncols).map(|j| format!("g{}", j).into_boxed_str()).collect();
    let mat = Mat::from_fn(nrows, ncols, |i, j| (i * ncols + j) as f32 * 0.1);
    SimulatedDataset::new(samples, genes, mat, None).unwrap()
}

fn sorted(xs: impl Iterator<Item = f32>) -> Vec<f32> {
    let mut v: Vec<f32> = xs.collect();
    v.sort_by(|a, b| a.total_cmp(b));
    v
}

#[test]
fn permutation_keeps_each_row_multiset() -> anyhow::Result<()> {
    let data = toy_dataset(6, 20);
    let labels = (0..6).map(|i| format!("E{}", i % 2).into_boxed_str()).collect();
    let data = data.with_provenance(Provenance {
        column: EXPERIMENT_ID_COLUMN.into(),
        labels,
    })?;

    let mut rng = StdRng::seed_from_u64(123);
    let permuted = permute_within_samples(&data, &mut rng)?;

    assert_eq!(permuted.samples(), data.samples());
    assert_eq!(permuted.genes(), data.genes());
    assert_eq!(permuted.provenance(), data.provenance());
    assert_ne!(permuted.mat(), data.mat());

    for i in 0..6 {
        let before = sorted(data.mat().row(i).iter().copied());
        let after = sorted(permuted.mat().row(i).iter().copied());
        assert_eq!(before, after);
    }
    Ok(())
}

#[test]
fn single_batch_changes_nothing() -> anyhow::Result<()> {
    let data = toy_dataset(7, 4);
    let mut rng = StdRng::seed_from_u64(123);
    let out = add_batch_effect(&data, 1, DEFAULT_BATCH_SD, &mut rng)?;

    assert_eq!(out.num_batches, 1);
    assert_eq!(out.data.mat(), data.mat());
    assert_eq!(out.map.samples, data.samples().to_vec());
    assert!(out.map.labels.iter().all(|b| &**b == "1"));

    let prov = out.data.provenance().expect("batch labels");
    assert_eq!(&*prov.column, BATCH_COLUMN);
    assert_eq!(prov.labels, out.map.labels);
    Ok(())
}

#[test]
fn batches_partition_the_samples() -> anyhow::Result<()> {
    let data = toy_dataset(11, 5);
    let mut rng = StdRng::seed_from_u64(123);

    for k in [2, 3, 5, 11, 13] {
        let out = add_batch_effect(&data, k, DEFAULT_BATCH_SD, &mut rng)?;
        assert_eq!(out.groups.len(), k);

        let mut all: Vec<usize> = out.groups.iter().flatten().copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..11).collect::<Vec<_>>());

        let sizes: Vec<usize> = out.groups.iter().map(|g| g.len()).collect();
        let max = sizes.iter().max().copied().unwrap_or(0);
        let min = sizes.iter().min().copied().unwrap_or(0);
        assert!(max - min <= 1);

        // earlier groups take the extra samples
        assert!(sizes.windows(2).all(|w| w[0] >= w[1]));

        for (j, group) in out.groups.iter().enumerate() {
            for &i in group {
                assert_eq!(out.map.labels[i], j.to_string().into_boxed_str());
            }
        }
    }
    Ok(())
}

#[test]
fn one_shift_per_group() -> anyhow::Result<()> {
    let data = toy_dataset(9, 6);
    let mut rng = StdRng::seed_from_u64(123);
    let out = add_batch_effect(&data, 3, DEFAULT_BATCH_SD, &mut rng)?;

    let delta = out.data.mat() - data.mat();

    for group in out.groups.iter() {
        let first = group[0];
        for &i in group.iter() {
            for j in 0..6 {
                assert_abs_diff_eq!(delta[(i, j)], delta[(first, j)], epsilon = 1e-5);
            }
        }
    }

    // distinct groups get distinct shifts
    let (a, b) = (out.groups[0][0], out.groups[1][0]);
    assert!((0..6).any(|j| (delta[(a, j)] - delta[(b, j)]).abs() > 1e-6));
    Ok(())
}

fn assert_one_shift_per_group(out: &BatchEffectOut, data: &SimulatedDataset) {
    let delta = out.data.mat() - data.mat();
    for group in out.groups.iter() {
        let Some(&first) = group.first() else {
            continue;
        };
        for &i in group.iter() {
            for j in 0..delta.ncols() {
                assert_abs_diff_eq!(delta[(i, j)], delta[(first, j)], epsilon = 1e-5);
            }
        }
    }
}

#[test]
fn each_batch_count_starts_from_the_input() -> anyhow::Result<()> {
    let data = toy_dataset(8, 3);
    let mut rng = StdRng::seed_from_u64(123);
    let outs = add_batch_effects(&data, &[4, 1, 2], 0.5, &mut rng)?;

    assert_eq!(outs.len(), 3);
    assert_eq!(outs[0].num_batches, 4);
    assert_eq!(outs[1].data.mat(), data.mat());
    assert_eq!(outs[2].num_batches, 2);

    for out in outs.iter() {
        assert_one_shift_per_group(out, &data);
    }

    let mut rng = StdRng::seed_from_u64(123);
    let again = add_batch_effects(&data, &[4, 1, 2], 0.5, &mut rng)?;
    for (x, y) in outs.iter().zip(again.iter()) {
        assert_eq!(x.data.mat(), y.data.mat());
        assert_eq!(x.map, y.map);
    }
    Ok(())
}

#[test]
fn repeated_sample_ids_share_one_batch() -> anyhow::Result<()> {
    let samples = ["s1", "s2", "s1", "s2", "s3"];
    let data = SimulatedDataset::new(
        samples.iter().map(|&x| x.into()).collect(),
        vec!["g1".into(), "g2".into()],
        Mat::from_fn(5, 2, |i, j| (i + j) as f32),
        None,
    )?;

    for seed in 0..50 {
        let mut rng = StdRng::seed_from_u64(seed);
        let out = add_batch_effect(&data, 2, DEFAULT_BATCH_SD, &mut rng)?;

        let mut batch_of: HashMap<&str, &str> = HashMap::new();
        for (s, b) in out.map.samples.iter().zip(out.map.labels.iter()) {
            let prev = batch_of.insert(&**s, &**b);
            assert!(prev.is_none() || prev == Some(&**b));
        }
        assert_eq!(batch_of.len(), 3);

        // three distinct ids over two batches: sizes 2 and 1
        let mut per_batch: HashMap<&str, usize> = HashMap::new();
        for b in batch_of.values() {
            *per_batch.entry(*b).or_default() += 1;
        }
        let mut sizes: Vec<usize> = per_batch.into_values().collect();
        sizes.sort_unstable();
        assert_eq!(sizes, vec![1, 2]);

        assert_one_shift_per_group(&out, &data);
        let delta = out.data.mat() - data.mat();
        for j in 0..2 {
            assert_abs_diff_eq!(delta[(0, j)], delta[(2, j)], epsilon = 1e-5);
            assert_abs_diff_eq!(delta[(1, j)], delta[(3, j)], epsilon = 1e-5);
        }
    }
    Ok(())
}

#[test]
fn bad_batch_arguments() {
    let data = toy_dataset(3, 2);
    let mut rng = StdRng::seed_from_u64(1);
    assert!(add_batch_effect(&data, 0, 0.2, &mut rng).is_err());
    assert!(add_batch_effect(&data, 2, -0.2, &mut rng).is_err());
    assert!(add_batch_effect(&data, 2, f32::NAN, &mut rng).is_err());
}
