use crate::common::*;
use crate::error::SimError;

use fnv::{FnvHashMap as HashMap, FnvHashSet as HashSet};

/// A real expression matrix: one row per sample, one column per gene.
/// Sample and gene names are unique and every value is finite.
#[derive(Clone, Debug)]
pub struct ExprMatrix {
    samples: Vec<Box<str>>,
    genes: Vec<Box<str>>,
    mat: Mat,
    sample_index: HashMap<Box<str>, usize>,
}

impl ExprMatrix {
    pub fn new(samples: Vec<Box<str>>, genes: Vec<Box<str>>, mat: Mat) -> anyhow::Result<Self> {
        check_shape(&samples, &genes, &mat)?;
        check_unique("gene", &genes)?;
        check_unique("sample", &samples)?;
        check_finite(&mat)?;

        let sample_index = samples
            .iter()
            .enumerate()
            .map(|(i, s)| (s.clone(), i))
            .collect();

        Ok(Self {
            samples,
            genes,
            mat,
            sample_index,
        })
    }

    pub fn samples(&self) -> &[Box<str>] {
        &self.samples
    }

    pub fn genes(&self) -> &[Box<str>] {
        &self.genes
    }

    pub fn mat(&self) -> &Mat {
        &self.mat
    }

    pub fn num_samples(&self) -> usize {
        self.mat.nrows()
    }

    pub fn num_genes(&self) -> usize {
        self.mat.ncols()
    }

    /// Row position of a sample
    pub fn sample_position(&self, sample: &str) -> Option<usize> {
        self.sample_index.get(sample).copied()
    }

    /// Keep the genes at `positions` (in the given order)
    pub fn select_genes(&self, positions: &[usize]) -> anyhow::Result<Self> {
        let genes = positions
            .iter()
            .map(|&j| self.genes.get(j).cloned())
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| SimError::InvalidInput("gene position out of range".into()))?;
        let mat = self.mat.select_columns(positions);
        Self::new(self.samples.clone(), genes, mat)
    }

    pub fn into_parts(self) -> (Vec<Box<str>>, Vec<Box<str>>, Mat) {
        (self.samples, self.genes, self.mat)
    }
}

/// Latent vectors of encoded samples. Row `i` is the code of sample
/// `samples[i]`; only the codec wrappers in [`crate::codec`] build it.
#[derive(Clone, Debug)]
pub struct LatentMatrix {
    pub(crate) samples: Vec<Box<str>>,
    pub(crate) mat: Mat,
}

impl LatentMatrix {
    pub fn samples(&self) -> &[Box<str>] {
        &self.samples
    }

    pub fn mat(&self) -> &Mat {
        &self.mat
    }

    pub fn num_samples(&self) -> usize {
        self.mat.nrows()
    }

    pub fn dim(&self) -> usize {
        self.mat.ncols()
    }
}

/// Per-row labels recording where each simulated sample came from
#[derive(Clone, Debug, PartialEq)]
pub struct Provenance {
    /// header of the label column in the persisted table
    pub column: Box<str>,
    pub labels: Vec<Box<str>>,
}

/// Simulated (or perturbed) expression data. Unlike [`ExprMatrix`],
/// sample names may repeat: a template experiment drawn twice yields
/// two blocks with the same names.
#[derive(Clone, Debug)]
pub struct SimulatedDataset {
    samples: Vec<Box<str>>,
    genes: Vec<Box<str>>,
    mat: Mat,
    provenance: Option<Provenance>,
}

impl SimulatedDataset {
    pub fn new(
        samples: Vec<Box<str>>,
        genes: Vec<Box<str>>,
        mat: Mat,
        provenance: Option<Provenance>,
    ) -> anyhow::Result<Self> {
        check_shape(&samples, &genes, &mat)?;
        check_unique("gene", &genes)?;
        if let Some(prov) = provenance.as_ref() {
            if prov.labels.len() != samples.len() {
                return Err(SimError::dimension(
                    "provenance labels",
                    samples.len(),
                    prov.labels.len(),
                )
                .into());
            }
        }
        Ok(Self {
            samples,
            genes,
            mat,
            provenance,
        })
    }

    pub fn samples(&self) -> &[Box<str>] {
        &self.samples
    }

    pub fn genes(&self) -> &[Box<str>] {
        &self.genes
    }

    pub fn mat(&self) -> &Mat {
        &self.mat
    }

    pub fn provenance(&self) -> Option<&Provenance> {
        self.provenance.as_ref()
    }

    pub fn num_samples(&self) -> usize {
        self.mat.nrows()
    }

    pub fn num_genes(&self) -> usize {
        self.mat.ncols()
    }

    /// Same names and labels, different values
    pub fn with_values(&self, mat: Mat) -> anyhow::Result<Self> {
        Self::new(
            self.samples.clone(),
            self.genes.clone(),
            mat,
            self.provenance.clone(),
        )
    }

    /// Same names and values, different labels
    pub fn with_provenance(self, provenance: Provenance) -> anyhow::Result<Self> {
        Self::new(self.samples, self.genes, self.mat, Some(provenance))
    }

    pub fn into_parts(self) -> (Vec<Box<str>>, Vec<Box<str>>, Mat, Option<Provenance>) {
        (self.samples, self.genes, self.mat, self.provenance)
    }
}

impl From<ExprMatrix> for SimulatedDataset {
    fn from(expr: ExprMatrix) -> Self {
        let (samples, genes, mat) = expr.into_parts();
        Self {
            samples,
            genes,
            mat,
            provenance: None,
        }
    }
}

fn check_shape(samples: &[Box<str>], genes: &[Box<str>], mat: &Mat) -> anyhow::Result<()> {
    if samples.len() != mat.nrows() {
        return Err(SimError::dimension("sample names", mat.nrows(), samples.len()).into());
    }
    if genes.len() != mat.ncols() {
        return Err(SimError::dimension("gene names", mat.ncols(), genes.len()).into());
    }
    Ok(())
}

fn check_unique(what: &str, names: &[Box<str>]) -> anyhow::Result<()> {
    let mut seen: HashSet<&str> = HashSet::default();
    for x in names {
        if !seen.insert(&**x) {
            return Err(SimError::InvalidInput(format!("duplicate {} name: {}", what, x)).into());
        }
    }
    Ok(())
}

fn check_finite(mat: &Mat) -> anyhow::Result<()> {
    if let Some(k) = mat.iter().position(|x| !x.is_finite()) {
        let (i, j) = (k % mat.nrows(), k / mat.nrows());
        return Err(SimError::InvalidInput(format!(
            "non-finite expression value at row {}, column {}",
            i, j
        ))
        .into());
    }
    Ok(())
}
