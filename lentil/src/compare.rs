use crate::common::*;
use crate::error::SimError;
use crate::expr_matrix::{ExprMatrix, SimulatedDataset};

use fnv::FnvHashMap as HashMap;
use matrix_util::common_io::{mkdir, write_lines};
use matrix_util::traits::MatOps;

/// Mean and sample standard deviation of one gene in both datasets
#[derive(Clone, Debug, PartialEq)]
pub struct GeneSummary {
    pub gene: Box<str>,
    pub real_mu: f32,
    pub real_sig: f32,
    pub sim_mu: f32,
    pub sim_sig: f32,
}

/// How closely simulated data follow the real data gene by gene
#[derive(Clone, Debug)]
pub struct ComparisonReport {
    pub genes: Vec<GeneSummary>,
    /// Pearson correlation of the gene means (NaN if either side is
    /// constant)
    pub mean_correlation: f32,
    /// Pearson correlation of the gene standard deviations
    pub std_correlation: f32,
}

/// Summarize real and simulated data over their shared genes, in the
/// real data's gene order
pub fn compare_datasets(
    real: &ExprMatrix,
    simulated: &SimulatedDataset,
) -> anyhow::Result<ComparisonReport> {
    if real.num_samples() == 0 || simulated.num_samples() == 0 {
        return Err(SimError::EmptyInput("comparison needs samples on both sides").into());
    }

    let sim_index: HashMap<&str, usize> = simulated
        .genes()
        .iter()
        .enumerate()
        .map(|(j, g)| (&**g, j))
        .collect();

    let (real_pos, sim_pos): (Vec<usize>, Vec<usize>) = real
        .genes()
        .iter()
        .enumerate()
        .filter_map(|(j, g)| sim_index.get(&**g).map(|&k| (j, k)))
        .unzip();

    if real_pos.is_empty() {
        return Err(SimError::InvalidInput("no genes shared by the two datasets".into()).into());
    }

    let real_sub = real.mat().select_columns(&real_pos);
    let sim_sub = simulated.mat().select_columns(&sim_pos);

    let real_mu = real_sub.column_means();
    let real_sig = real_sub.column_stds(1);
    let sim_mu = sim_sub.column_means();
    let sim_sig = sim_sub.column_stds(1);

    let genes = real_pos
        .iter()
        .enumerate()
        .map(|(k, &j)| GeneSummary {
            gene: real.genes()[j].clone(),
            real_mu: real_mu[k],
            real_sig: real_sig[k],
            sim_mu: sim_mu[k],
            sim_sig: sim_sig[k],
        })
        .collect::<Vec<_>>();

    let report = ComparisonReport {
        mean_correlation: pearson(&real_mu, &sim_mu),
        std_correlation: pearson(&real_sig, &sim_sig),
        genes,
    };

    info!(
        "{} shared genes: cor(mean) = {:.4}, cor(sd) = {:.4}",
        report.genes.len(),
        report.mean_correlation,
        report.std_correlation
    );

    if report.genes.len() < real.num_genes() {
        warn!(
            "{} real genes missing from the simulated data",
            real.num_genes() - report.genes.len()
        );
    }

    Ok(report)
}

impl ComparisonReport {
    /// `gene`, `real_mu`, `real_sig`, `sim_mu`, `sim_sig` per line
    pub fn to_tsv(&self, file: &str) -> anyhow::Result<()> {
        let mut lines: Vec<Box<str>> = Vec::with_capacity(self.genes.len() + 1);
        lines.push("gene\treal_mu\treal_sig\tsim_mu\tsim_sig".into());
        for g in self.genes.iter() {
            lines.push(
                format!(
                    "{}\t{}\t{}\t{}\t{}",
                    g.gene, g.real_mu, g.real_sig, g.sim_mu, g.sim_sig
                )
                .into_boxed_str(),
            );
        }
        mkdir(file)?;
        write_lines(&lines, file)
    }
}

fn pearson(x: &[f32], y: &[f32]) -> f32 {
    let n = x.len().min(y.len());
    if n < 2 {
        return f32::NAN;
    }
    let nn = n as f64;
    let mx = x.iter().map(|&v| v as f64).sum::<f64>() / nn;
    let my = y.iter().map(|&v| v as f64).sum::<f64>() / nn;

    let (mut sxy, mut sxx, mut syy) = (0_f64, 0_f64, 0_f64);
    for (&a, &b) in x.iter().zip(y.iter()) {
        let (da, db) = (a as f64 - mx, b as f64 - my);
        sxy += da * db;
        sxx += da * da;
        syy += db * db;
    }

    if sxx <= 0.0 || syy <= 0.0 {
        return f32::NAN;
    }
    (sxy / (sxx * syy).sqrt()) as f32
}
