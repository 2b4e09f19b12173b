use crate::common::*;
use crate::error::SimError;

use fnv::{FnvHashMap as HashMap, FnvHashSet as HashSet};
use matrix_util::common_io::read_delimited;

pub const DEFAULT_EXPERIMENT_COLUMN: &str = "experiment";
pub const DEFAULT_SAMPLE_COLUMN: &str = "ml_data_source";

/// Which samples belong to which experiment. Experiments keep the
/// order in which they were first seen and each experiment keeps an
/// ordered list of distinct sample ids. Blank ids are recorded as
/// they are; the simulators skip them.
#[derive(Clone, Debug, Default)]
pub struct ExperimentRegistry {
    experiments: Vec<Box<str>>,
    samples: HashMap<Box<str>, Members>,
}

#[derive(Clone, Debug, Default)]
struct Members {
    ordered: Vec<Box<str>>,
    seen: HashSet<Box<str>>,
}

impl ExperimentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(experiment, sample)` pairs
    pub fn from_pairs<I, E, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (E, S)>,
        E: Into<Box<str>>,
        S: Into<Box<str>>,
    {
        let mut ret = Self::new();
        for (e, s) in pairs {
            ret.insert(e.into(), s.into());
        }
        ret
    }

    /// Add one sample to an experiment, skipping repeats
    pub fn insert(&mut self, experiment: Box<str>, sample: Box<str>) {
        if !self.samples.contains_key(&experiment) {
            self.experiments.push(experiment.clone());
        }
        let members = self.samples.entry(experiment).or_default();
        if members.seen.insert(sample.clone()) {
            members.ordered.push(sample);
        }
    }

    /// Read a tab-separated annotation table
    ///
    /// * `file` - annotation file (gzipped if it ends with `.gz`)
    /// * `experiment_column` - header of the experiment id column
    /// * `sample_column` - header of the sample id column
    ///
    /// A header one field shorter than the data lines leaves the
    /// first column unnamed. Cells missing at the end of a line are
    /// taken as blank sample ids.
    pub fn from_annotation_file(
        file: &str,
        experiment_column: &str,
        sample_column: &str,
    ) -> anyhow::Result<Self> {
        let out = read_delimited(file, "\t", Some(0))?;

        let mut header = out.header;
        if let Some(words) = out.lines.first() {
            if header.len() + 1 == words.len() {
                header.insert(0, "".into());
            }
        }

        let locate = |name: &str| -> anyhow::Result<usize> {
            header.iter().position(|h| &**h == name).ok_or_else(|| {
                SimError::InvalidInput(format!(
                    "{}: no column named '{}' in [{}]",
                    file,
                    name,
                    header.join(", ")
                ))
                .into()
            })
        };

        let e_col = locate(experiment_column)?;
        let s_col = locate(sample_column)?;

        let mut ret = Self::new();
        for words in out.lines.iter() {
            let experiment = match words.get(e_col) {
                Some(e) if !e.trim().is_empty() => e.clone(),
                _ => continue,
            };
            let sample = words.get(s_col).cloned().unwrap_or_default();
            ret.insert(experiment, sample);
        }

        info!(
            "{}: {} experiments, {} sample entries",
            file,
            ret.len(),
            ret.samples.values().map(|x| x.ordered.len()).sum::<usize>()
        );
        Ok(ret)
    }

    /// Ordered, distinct sample ids of an experiment; empty if unknown
    pub fn samples_for(&self, experiment: &str) -> &[Box<str>] {
        self.samples
            .get(experiment)
            .map(|x| x.ordered.as_slice())
            .unwrap_or(&[])
    }

    /// Every experiment in first-seen order
    pub fn experiment_ids(&self) -> &[Box<str>] {
        &self.experiments
    }

    pub fn len(&self) -> usize {
        self.experiments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.experiments.is_empty()
    }
}

/// Read candidate template experiments: a header line, then one id
/// per line in the first column. Blank and repeated ids are dropped.
pub fn read_experiment_list(file: &str) -> anyhow::Result<Vec<Box<str>>> {
    let out = read_delimited(file, "\t", Some(0))?;
    let mut seen: HashSet<Box<str>> = HashSet::default();
    let ids: Vec<Box<str>> = out
        .lines
        .into_iter()
        .filter_map(|words| words.into_iter().next())
        .map(|x| Box::<str>::from(x.trim()))
        .filter(|x| !x.is_empty() && seen.insert(x.clone()))
        .collect();
    info!("{}: {} candidate experiments", file, ids.len());
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use matrix_util::common_io::{create_temp_dir_file, write_lines};

    fn write_tmp(lines: &[&str]) -> anyhow::Result<String> {
        let file = create_temp_dir_file("tsv")?;
        let file = file.to_str().unwrap_or_default().to_string();
        let lines: Vec<Box<str>> = lines.iter().map(|&x| x.into()).collect();
        write_lines(&lines, &file)?;
        Ok(file)
    }

    #[test]
    fn pairs_keep_order_and_drop_repeats() {
        let reg = ExperimentRegistry::from_pairs([
            ("E2", "b"),
            ("E1", "a"),
            ("E2", "c"),
            ("E2", "b"),
        ]);
        assert_eq!(reg.len(), 2);
        assert_eq!(&*reg.experiment_ids()[0], "E2");
        let e2: Vec<&str> = reg.samples_for("E2").iter().map(|x| &**x).collect();
        assert_eq!(e2, vec!["b", "c"]);
        assert!(reg.samples_for("E9").is_empty());
    }

    #[test]
    fn many_repeated_pairs() {
        let pairs = (0..20_000).map(|i| ("E1", format!("s{}", (i * 7) % 5_000)));
        let reg = ExperimentRegistry::from_pairs(pairs);
        let members = reg.samples_for("E1");
        assert_eq!(members.len(), 5_000);
        assert_eq!(&*members[0], "s0");
        assert_eq!(&*members[1], "s7");
        assert!(!reg.is_empty());
    }

    #[test]
    fn annotation_file_by_column_name() -> anyhow::Result<()> {
        let file = write_tmp(&[
            "experiment\ttissue\tml_data_source",
            "E1\tliver\ts1",
            "E1\tliver\ts2",
            "E2\tlung\t",
            "E2\tlung",
            "E3\tkidney\ts3",
        ])?;
        let reg = ExperimentRegistry::from_annotation_file(
            &file,
            DEFAULT_EXPERIMENT_COLUMN,
            DEFAULT_SAMPLE_COLUMN,
        )?;
        assert_eq!(reg.len(), 3);
        assert_eq!(reg.samples_for("E1").len(), 2);
        assert_eq!(reg.samples_for("E2"), &[Box::<str>::from("")][..]);
        assert_eq!(&*reg.samples_for("E3")[0], "s3");

        let missing = ExperimentRegistry::from_annotation_file(&file, "study", "ml_data_source");
        assert!(missing.is_err());
        Ok(())
    }

    #[test]
    fn unnamed_index_column() -> anyhow::Result<()> {
        let file = write_tmp(&["ml_data_source", "E1\ts1", "E2\ts2"])?;
        let reg = ExperimentRegistry::from_annotation_file(&file, "", "ml_data_source")?;
        assert_eq!(reg.experiment_ids().len(), 2);
        assert_eq!(&*reg.samples_for("E2")[0], "s2");
        Ok(())
    }

    #[test]
    fn experiment_list_first_column() -> anyhow::Result<()> {
        let file = write_tmp(&["experiment_id\tnote", "E2\tx", "E1", "E2\ty"])?;
        let ids = read_experiment_list(&file)?;
        assert_eq!(ids, vec![Box::<str>::from("E2"), Box::<str>::from("E1")]);
        Ok(())
    }
}
