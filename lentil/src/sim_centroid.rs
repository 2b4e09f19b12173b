use crate::codec::{decode_rows, encode, encode_rows, LatentCodec};
use crate::common::*;
use crate::error::SimError;
use crate::expr_matrix::{ExprMatrix, Provenance, SimulatedDataset};
use crate::latent_stat::{centroid, LatentStat};
use crate::registry::ExperimentRegistry;
use crate::sampler::sample_latent;

use fnv::FnvHashMap as HashMap;
use indicatif::{ProgressBar, ProgressDrawTarget};
use rand::Rng;

/// How template experiments are drawn from the candidates
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TemplateDraw {
    /// Uniformly at each step; an experiment can be drawn again
    #[default]
    WithReplacement,
    /// Each candidate at most once
    WithoutReplacement,
}

pub struct CentroidShiftConfig {
    pub num_experiments: usize,
    pub template_draw: TemplateDraw,
    /// hide the progress bar (log lines take over)
    pub verbose: bool,
}

impl Default for CentroidShiftConfig {
    fn default() -> Self {
        Self {
            num_experiments: 1,
            template_draw: TemplateDraw::WithReplacement,
            verbose: false,
        }
    }
}

pub struct CentroidShiftOut {
    /// labelled with the `experiment_id` provenance column
    pub data: SimulatedDataset,
    /// template drawn at each step
    pub templates: Vec<Box<str>>,
}

/// Simulate whole experiments by moving real ones in latent space
///
/// At each step a template experiment is drawn from `candidates`, its
/// samples are encoded, and their latent centroid is replaced by a
/// new centroid drawn from the global latent distribution of `expr`.
/// The spread of the samples around their centroid is kept. Decoded
/// blocks are stacked in step order and keep the template's sample
/// names. When a name reappears in a later step, every row carrying
/// it takes the later step's label.
///
/// * `codec` - pretrained codec over the genes of `expr`
/// * `expr` - real expression data
/// * `registry` - experiment membership of the real samples
/// * `candidates` - experiments eligible as templates
/// * `config` - number of steps and how templates are drawn
/// * `rng` - the run's generator
pub fn simulate_centroid_shift<C, R>(
    codec: &C,
    expr: &ExprMatrix,
    registry: &ExperimentRegistry,
    candidates: &[Box<str>],
    config: &CentroidShiftConfig,
    rng: &mut R,
) -> anyhow::Result<CentroidShiftOut>
where
    C: LatentCodec + ?Sized,
    R: Rng + ?Sized,
{
    let num_experiments = config.num_experiments;

    if num_experiments == 0 {
        return Err(SimError::InvalidInput("asked for zero simulated experiments".into()).into());
    }
    if candidates.is_empty() {
        return Err(SimError::InvalidInput("no candidate template experiments".into()).into());
    }
    if config.template_draw == TemplateDraw::WithoutReplacement
        && num_experiments > candidates.len()
    {
        return Err(SimError::InvalidInput(format!(
            "{} experiments requested from {} distinct templates",
            num_experiments,
            candidates.len()
        ))
        .into());
    }

    // Encoding is deterministic, so the global distribution is the
    // same at every step
    let global = LatentStat::estimate(&encode(codec, expr)?)?;

    let n_genes = expr.num_genes();
    let mut remaining: Vec<Box<str>> = candidates.to_vec();
    let mut templates = Vec::with_capacity(num_experiments);

    let mut samples: Vec<Box<str>> = vec![];
    let mut labels: Vec<Box<str>> = vec![];
    let mut values: Vec<f32> = vec![];
    let mut rows_of: HashMap<Box<str>, Vec<usize>> = HashMap::default();

    let pb = ProgressBar::new(num_experiments as u64);
    if config.verbose {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    }

    for step in 0..num_experiments {
        let experiment = match config.template_draw {
            TemplateDraw::WithReplacement => {
                candidates[rng.random_range(0..candidates.len())].clone()
            }
            TemplateDraw::WithoutReplacement => {
                remaining.swap_remove(rng.random_range(0..remaining.len()))
            }
        };

        let members = template_members(expr, registry, &experiment)?;
        let positions: Vec<usize> = members.iter().map(|&(_, i)| i).collect();
        let ids: Vec<Box<str>> = members.into_iter().map(|(s, _)| s).collect();

        let z = encode_rows(codec, ids.clone(), &expr.mat().select_rows(&positions))?;
        let old_centroid = centroid(&z)?;
        let new_centroid = sample_latent(&global.mean, &global.std, 1, rng)?;

        let mut z_shifted = z.mat().clone();
        for (j, mut z_j) in z_shifted.column_iter_mut().enumerate() {
            let delta = new_centroid[(0, j)] - old_centroid[j];
            z_j.add_scalar_mut(delta);
        }

        let x_new = decode_rows(codec, &z_shifted, n_genes)?;

        for (row, id) in x_new.row_iter().zip(ids.iter()) {
            rows_of.entry(id.clone()).or_default().push(samples.len());
            samples.push(id.clone());
            labels.push(experiment.clone());
            values.extend(row.iter());
        }

        for id in ids.iter() {
            if let Some(rows) = rows_of.get(id) {
                for &r in rows {
                    labels[r] = experiment.clone();
                }
            }
        }

        info!(
            "step {}: template {} with {} samples",
            step + 1,
            experiment,
            ids.len()
        );

        templates.push(experiment);
        pb.inc(1);
    }
    pb.finish_and_clear();

    let mat = Mat::from_row_slice(samples.len(), n_genes, &values);
    info!(
        "simulated {} experiments, {} samples",
        num_experiments,
        samples.len()
    );

    let provenance = Provenance {
        column: EXPERIMENT_ID_COLUMN.into(),
        labels,
    };

    Ok(CentroidShiftOut {
        data: SimulatedDataset::new(samples, expr.genes().to_vec(), mat, Some(provenance))?,
        templates,
    })
}

/// Samples of `experiment` with their row positions in `expr`. Blank
/// ids are dropped; anything else that is missing from `expr` is a
/// selection error.
fn template_members(
    expr: &ExprMatrix,
    registry: &ExperimentRegistry,
    experiment: &str,
) -> anyhow::Result<Vec<(Box<str>, usize)>> {
    let ids: Vec<&Box<str>> = registry
        .samples_for(experiment)
        .iter()
        .filter(|s| !s.trim().is_empty())
        .collect();

    if ids.is_empty() {
        return Err(SimError::Selection {
            experiment: experiment.into(),
            reason: "no usable sample ids".into(),
        }
        .into());
    }

    let missing: Vec<&str> = ids
        .iter()
        .map(|&s| &**s)
        .filter(|s| expr.sample_position(s).is_none())
        .collect();

    if !missing.is_empty() {
        return Err(SimError::Selection {
            experiment: experiment.into(),
            reason: format!(
                "{} sample(s) not in the expression data: {}",
                missing.len(),
                missing.join(", ")
            ),
        }
        .into());
    }

    Ok(ids
        .into_iter()
        .filter_map(|s| expr.sample_position(s).map(|i| (s.clone(), i)))
        .collect())
}
