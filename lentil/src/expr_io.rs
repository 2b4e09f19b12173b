use crate::batch_effect::ExperimentMap;
use crate::common::*;
use crate::error::SimError;
use crate::expr_matrix::{ExprMatrix, Provenance, SimulatedDataset};

use matrix_util::common_io::{mkdir, write_lines};
use matrix_util::traits::{IoOps, MatWithNames, TextColumn};

/// Label columns recognized when reading simulated tables
pub const ANNOTATION_COLUMNS: [&str; 2] = [EXPERIMENT_ID_COLUMN, BATCH_COLUMN];

/// Read a real expression table
///
/// * `file` - tab-separated, gzipped if it ends with `.gz`
/// * `genes_in_rows` - the table is genes x samples
pub fn read_expr_matrix(file: &str, genes_in_rows: bool) -> anyhow::Result<ExprMatrix> {
    let data = Mat::read_names_tsv(file, &[])?;
    let data = if genes_in_rows {
        data.transpose()?
    } else {
        data
    };

    let expr = ExprMatrix::new(data.rows, data.cols, data.mat)?;
    info!(
        "{}: {} samples x {} genes",
        file,
        expr.num_samples(),
        expr.num_genes()
    );
    Ok(expr)
}

/// Read a simulated table, keeping its label column if it has one
pub fn read_simulated_dataset(file: &str) -> anyhow::Result<SimulatedDataset> {
    let mut data = Mat::read_names_tsv(file, &ANNOTATION_COLUMNS)?;

    if data.text_columns.len() > 1 {
        return Err(SimError::InvalidInput(format!(
            "{}: more than one label column",
            file
        ))
        .into());
    }

    let provenance = data.text_columns.pop().map(|tc| Provenance {
        column: tc.name,
        labels: tc.values,
    });

    let ds = SimulatedDataset::new(data.rows, data.cols, data.mat, provenance)?;
    info!(
        "{}: {} samples x {} genes",
        file,
        ds.num_samples(),
        ds.num_genes()
    );
    Ok(ds)
}

/// Write `sample_id`, the genes, and the label column if any
///
/// * `precision` - decimal places of the values (`None`: as is)
pub fn write_simulated_dataset(
    data: &SimulatedDataset,
    file: &str,
    precision: Option<usize>,
) -> anyhow::Result<()> {
    let text_columns = data
        .provenance()
        .map(|p| TextColumn {
            name: p.column.clone(),
            values: p.labels.clone(),
        })
        .into_iter()
        .collect();

    let out = MatWithNames {
        rows: data.samples().to_vec(),
        cols: data.genes().to_vec(),
        mat: data.mat().clone(),
        text_columns,
    };

    mkdir(file)?;
    out.write_names_delim(file, "\t", SAMPLE_ID_COLUMN, precision)?;
    info!("wrote {}", file);
    Ok(())
}

/// Write a real (or reconstructed) expression table
pub fn write_expr_matrix(
    expr: &ExprMatrix,
    file: &str,
    precision: Option<usize>,
) -> anyhow::Result<()> {
    write_simulated_dataset(&SimulatedDataset::from(expr.clone()), file, precision)
}

/// Write `sample_id` and `experiment` per line
pub fn write_experiment_map(map: &ExperimentMap, file: &str) -> anyhow::Result<()> {
    let mut lines: Vec<Box<str>> = Vec::with_capacity(map.samples.len() + 1);
    lines.push(format!("{}\t{}", SAMPLE_ID_COLUMN, BATCH_COLUMN).into_boxed_str());
    for (s, b) in map.samples.iter().zip(map.labels.iter()) {
        lines.push(format!("{}\t{}", s, b).into_boxed_str());
    }
    mkdir(file)?;
    write_lines(&lines, file)?;
    info!("wrote {}", file);
    Ok(())
}
