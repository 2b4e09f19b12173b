use approx::assert_abs_diff_eq;
use candle_util::candle_core::Device;
use candle_util::candle_model_decoder::OutputActivation;
use candle_util::candle_vae_codec::{VaeCodec, VaeConfig};
use lentil::batch_effect::{add_batch_effect, ExperimentMap};
use lentil::codec::reconstruct;
use lentil::common::*;
use lentil::expr_io::*;
use lentil::expr_matrix::{ExprMatrix, Provenance, SimulatedDataset};
use lentil::permute::permute_within_samples;
use lentil::registry::ExperimentRegistry;
use lentil::sim_centroid::*;
use lentil::sim_global::simulate_global;
use matrix_util::common_io::{create_temp_dir_file, read_lines, write_lines};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn temp_file(suffix: &str) -> anyhow::Result<String> {
    let file = create_temp_dir_file(suffix)?;
    Ok(file.to_string_lossy().into_owned())
}

#[test]
fn read_genes_in_rows() -> anyhow::Result<()> {
    let file = temp_file("tsv.gz")?;
    let lines: Vec<Box<str>> = vec![
        "\ts1\ts2".into(),
        "g1\t0.5\t1.5".into(),
        "g2\t2\t3".into(),
        "g3\t-1\t0".into(),
    ];
    write_lines(&lines, &file)?;

    let expr = read_expr_matrix(&file, true)?;
    assert_eq!(expr.num_samples(), 2);
    assert_eq!(expr.num_genes(), 3);
    assert_eq!(expr.sample_position("s2"), Some(1));
    assert_eq!(expr.mat()[(1, 0)], 1.5);
    assert_eq!(expr.mat()[(0, 2)], -1.0);
    Ok(())
}

#[test]
fn duplicate_samples_are_rejected() -> anyhow::Result<()> {
    let file = temp_file("tsv")?;
    let lines: Vec<Box<str>> = vec!["sample_id\tg1".into(), "s1\t1".into(), "s1\t2".into()];
    write_lines(&lines, &file)?;
    assert!(read_expr_matrix(&file, false).is_err());
    Ok(())
}

#[test]
fn simulated_table_with_labels() -> anyhow::Result<()> {
    let data = SimulatedDataset::new(
        vec!["s1".into(), "s1".into(), "s2".into()],
        vec!["g1".into(), "g2".into()],
        Mat::from_row_slice(3, 2, &[0.12345, 1.0, -2.5, 3.0, 4.0, 5.0]),
        Some(Provenance {
            column: EXPERIMENT_ID_COLUMN.into(),
            labels: vec!["E1".into(), "E2".into(), "E2".into()],
        }),
    )?;

    let file = temp_file("tsv.gz")?;
    write_simulated_dataset(&data, &file, Some(DEFAULT_PRECISION))?;

    let lines = read_lines(&file)?;
    assert_eq!(&*lines[0], "sample_id\tg1\tg2\texperiment_id");
    assert_eq!(&*lines[1], "s1\t0.123\t1.000\tE1");

    let back = read_simulated_dataset(&file)?;
    assert_eq!(back.samples(), data.samples());
    assert_eq!(back.genes(), data.genes());
    assert_eq!(back.provenance(), data.provenance());
    assert_abs_diff_eq!(back.mat()[(0, 0)], 0.123, epsilon = 1e-6);
    assert_abs_diff_eq!(back.mat()[(1, 0)], -2.5, epsilon = 1e-6);
    Ok(())
}

#[test]
fn experiment_map_lines() -> anyhow::Result<()> {
    let map = ExperimentMap {
        samples: vec!["a".into(), "b".into()],
        labels: vec!["1".into(), "0".into()],
    };
    let file = temp_file("map.tsv.gz")?;
    write_experiment_map(&map, &file)?;
    let lines = read_lines(&file)?;
    assert_eq!(&*lines[0], "sample_id\texperiment");
    assert_eq!(&*lines[2], "b\t0");
    Ok(())
}

fn toy_vae(n_features: usize) -> anyhow::Result<VaeCodec> {
    let config = VaeConfig {
        n_features,
        n_latent: 2,
        encoder_layers: vec![8],
        decoder_layers: vec![8],
        output_activation: OutputActivation::Sigmoid,
    };

    let model_dir = tempfile::tempdir()?;
    VaeCodec::new(config, &Device::Cpu)?.save(model_dir.path())?;
    VaeCodec::load(model_dir.path(), &Device::Cpu)
}

fn toy_expr() -> anyhow::Result<ExprMatrix> {
    let samples = (0..6).map(|i| format!("s{}", i).into_boxed_str()).collect();
    let genes = (0..5).map(|j| format!("g{}", j).into_boxed_str()).collect();
    let mat = Mat::from_fn(6, 5, |i, j| ((i + 2 * j) % 7) as f32 / 7.0);
    ExprMatrix::new(samples, genes, mat)
}

#[test]
fn pipeline_through_a_saved_vae() -> anyhow::Result<()> {
    let codec = toy_vae(5)?;
    assert_eq!(codec.dim_latent(), 2);

    let expr = toy_expr()?;
    let recon = reconstruct(&codec, &expr)?;
    assert_eq!(recon.mat().shape(), (6, 5));
    assert_eq!(recon.samples(), expr.samples());
    assert_eq!(recon.genes(), expr.genes());

    let registry = ExperimentRegistry::from_pairs([
        ("E1", "s0"),
        ("E1", "s1"),
        ("E1", "s2"),
        ("E2", "s3"),
        ("E2", "s4"),
        ("E3", "s5"),
    ]);

    let run = |seed: u64| -> anyhow::Result<Vec<String>> {
        let mut rng = StdRng::seed_from_u64(seed);
        let config = CentroidShiftConfig {
            num_experiments: 4,
            verbose: true,
            ..Default::default()
        };
        let sim = simulate_centroid_shift(
            &codec,
            &expr,
            &registry,
            registry.experiment_ids(),
            &config,
            &mut rng,
        )?
        .data;

        let permuted = permute_within_samples(&sim, &mut rng)?;
        let batch = add_batch_effect(&sim, 2, DEFAULT_BATCH_SD, &mut rng)?;
        let global = simulate_global(&codec, &expr, 3, &mut rng)?;

        let mut lines = vec![];
        for (data, suffix) in [
            (&sim, "sim.tsv.gz"),
            (&permuted, "perm.tsv.gz"),
            (&batch.data, "batch.tsv.gz"),
            (&global, "global.tsv.gz"),
        ] {
            let file = temp_file(suffix)?;
            write_simulated_dataset(data, &file, Some(DEFAULT_PRECISION))?;
            lines.extend(read_lines(&file)?.into_iter().map(String::from));
        }
        Ok(lines)
    };

    let first = run(123)?;
    let second = run(123)?;
    assert_eq!(first, second);
    assert_ne!(first, run(124)?);
    Ok(())
}
