use crate::common_io::{read_delimited, write_lines, Delimiter};
use crate::traits::*;
pub use nalgebra::DMatrix;

use std::fmt::{Debug, Display};
use std::str::FromStr;

impl<T> IoOps for DMatrix<T>
where
    T: nalgebra::Scalar + Send + FromStr + Display + Copy,
    <T as FromStr>::Err: Debug,
{
    type Scalar = T;
    type Mat = Self;

    fn read_names_delim(
        file: &str,
        delim: impl Into<Delimiter>,
        text_column_names: &[&str],
    ) -> anyhow::Result<MatWithNames<Self::Mat>> {
        let out = read_delimited(file, delim, Some(0))?;

        let nfields = match out.lines.first() {
            Some(words) => words.len(),
            None => anyhow::bail!("No data in file {}", file),
        };

        if nfields < 2 {
            anyhow::bail!("{}: need a row-name column and at least one value", file);
        }

        // The header either names the row-name column or omits it
        let header: Vec<Box<str>> = if out.header.len() == nfields {
            out.header[1..].to_vec()
        } else if out.header.len() + 1 == nfields {
            out.header.clone()
        } else {
            anyhow::bail!(
                "{}: header has {} fields but data lines have {}",
                file,
                out.header.len(),
                nfields
            );
        };

        let is_text: Vec<bool> = header
            .iter()
            .map(|h| text_column_names.iter().any(|t| &**h == *t))
            .collect();

        let cols: Vec<Box<str>> = header
            .iter()
            .zip(is_text.iter())
            .filter(|&(_, &t)| !t)
            .map(|(h, _)| h.clone())
            .collect();

        let mut text_columns: Vec<TextColumn> = header
            .iter()
            .zip(is_text.iter())
            .filter(|&(_, &t)| t)
            .map(|(h, _)| TextColumn {
                name: h.clone(),
                values: Vec::with_capacity(out.lines.len()),
            })
            .collect();

        let nrows = out.lines.len();
        let ncols = cols.len();
        let mut rows = Vec::with_capacity(nrows);
        let mut values = Vec::with_capacity(nrows * ncols);

        for (i, words) in out.lines.iter().enumerate() {
            if words.len() != nfields {
                anyhow::bail!(
                    "{}: line {} has {} fields, expected {}",
                    file,
                    i + 1,
                    words.len(),
                    nfields
                );
            }
            rows.push(words[0].clone());
            let mut t = 0;
            for (w, &text) in words[1..].iter().zip(is_text.iter()) {
                if text {
                    text_columns[t].values.push(w.clone());
                    t += 1;
                } else {
                    values.push(parse_cell::<T>(w, i + 1)?);
                }
            }
        }

        Ok(MatWithNames {
            rows,
            cols,
            mat: DMatrix::<T>::from_row_iterator(nrows, ncols, values),
            text_columns,
        })
    }
}

impl<T> MatWithNames<DMatrix<T>>
where
    T: nalgebra::Scalar + Display + Copy,
{
    /// Write the matrix with its names
    ///
    /// * `file` - output file (gzipped if it ends with `.gz`)
    /// * `delim` - delimiter
    /// * `row_header` - header of the row-name column
    /// * `precision` - number of decimal places (`None`: as is)
    pub fn write_names_delim(
        &self,
        file: &str,
        delim: &str,
        row_header: &str,
        precision: Option<usize>,
    ) -> anyhow::Result<()> {
        let nrows = self.mat.nrows();
        if self.rows.len() != nrows || self.cols.len() != self.mat.ncols() {
            anyhow::bail!(
                "names ({} x {}) don't match the matrix ({} x {})",
                self.rows.len(),
                self.cols.len(),
                nrows,
                self.mat.ncols()
            );
        }
        for tc in self.text_columns.iter() {
            if tc.values.len() != nrows {
                anyhow::bail!("text column {} is not aligned with rows", tc.name);
            }
        }

        let header = std::iter::once(row_header)
            .chain(self.cols.iter().map(|c| &**c))
            .chain(self.text_columns.iter().map(|t| &*t.name))
            .collect::<Vec<_>>()
            .join(delim);

        let mut lines = Vec::with_capacity(nrows + 1);
        lines.push(header.into_boxed_str());

        for (i, row) in self.mat.row_iter().enumerate() {
            let mut words: Vec<String> = Vec::with_capacity(row.len() + 1);
            words.push(self.rows[i].to_string());
            words.extend(row.iter().map(|x| match precision {
                Some(p) => format!("{:.*}", p, *x),
                None => format!("{}", *x),
            }));
            words.extend(self.text_columns.iter().map(|t| t.values[i].to_string()));
            lines.push(words.join(delim).into_boxed_str());
        }

        write_lines(&lines, file)
    }

    /// Swap rows and columns. Text columns can't be carried along.
    pub fn transpose(self) -> anyhow::Result<Self> {
        if !self.text_columns.is_empty() {
            anyhow::bail!("can't transpose a table with text columns");
        }
        Ok(MatWithNames {
            rows: self.cols,
            cols: self.rows,
            mat: self.mat.transpose(),
            text_columns: vec![],
        })
    }
}

fn parse_cell<T>(word: &str, line: usize) -> anyhow::Result<T>
where
    T: FromStr,
    <T as FromStr>::Err: Debug,
{
    word.trim()
        .parse::<T>()
        .map_err(|e| anyhow::anyhow!("line {}: failed to parse '{}': {:?}", line, word, e))
}
