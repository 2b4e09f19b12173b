use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use rayon::prelude::*;
use std::fmt::Display;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Field separator of a delimited text file
pub struct Delimiter(Box<str>);

impl From<&str> for Delimiter {
    fn from(s: &str) -> Self {
        Delimiter(s.into())
    }
}

impl Delimiter {
    /// Split a line into owned words. Empty cells stay as empty words.
    pub fn split_words(&self, line: &str) -> Vec<Box<str>> {
        line.split(&*self.0).map(Box::from).collect()
    }
}

/// Words of a delimited file, with the header kept apart
pub struct DelimitedLines {
    pub header: Vec<Box<str>>,
    pub lines: Vec<Vec<Box<str>>>,
}

/// Read a delimited text file. Blank lines and lines starting with
/// `#` or `%` are skipped before counting.
///
/// * `file` - gzipped if it ends with `.gz`
/// * `delim` - field separator
/// * `header_line` - position of the header among the kept lines;
///   lines before it are dropped (`None`: no header)
pub fn read_delimited(
    file: &str,
    delim: impl Into<Delimiter>,
    header_line: Option<usize>,
) -> anyhow::Result<DelimitedLines> {
    let delim = delim.into();

    let mut kept: Vec<Box<str>> = vec![];
    for line in open_buf_reader(file)?.lines() {
        let line = line?;
        let line = line.strip_suffix('\r').unwrap_or(&line);
        let is_comment = line.starts_with('#') || line.starts_with('%');
        if !line.trim().is_empty() && !is_comment {
            kept.push(line.into());
        }
    }

    let (header, body) = match header_line {
        Some(h) if h < kept.len() => (delim.split_words(&kept[h]), &kept[(h + 1)..]),
        Some(_) => anyhow::bail!("{}: no header line", file),
        None => (vec![], &kept[..]),
    };

    // splitting dominates for wide tables; indexed collect keeps order
    let lines = body.par_iter().map(|x| delim.split_words(x)).collect();

    Ok(DelimitedLines { header, lines })
}

/// Every line of a file, as is
pub fn read_lines(file: &str) -> anyhow::Result<Vec<Box<str>>> {
    let mut lines = vec![];
    for x in open_buf_reader(file)?.lines() {
        lines.push(x?.into_boxed_str());
    }
    Ok(lines)
}

/// Write one item per line. A closed pipe downstream ends the
/// output quietly.
///
/// * `file` - gzipped if it ends with `.gz`; `stdout` for the console
pub fn write_lines<T: Display>(lines: &[T], file: &str) -> anyhow::Result<()> {
    let mut buf = open_buf_writer(file)?;
    for x in lines {
        match writeln!(buf, "{}", x) {
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => return Ok(()),
            Err(e) => return Err(anyhow::anyhow!("{}: {}", file, e)),
        }
    }
    buf.flush()?;
    Ok(())
}

pub fn open_buf_reader(file: &str) -> anyhow::Result<Box<dyn BufRead>> {
    let f = File::open(file).map_err(|e| anyhow::anyhow!("can't open {}: {}", file, e))?;
    if is_gz(file) {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(f))))
    } else {
        Ok(Box::new(BufReader::new(f)))
    }
}

pub fn open_buf_writer(file: &str) -> anyhow::Result<Box<dyn Write>> {
    if file.eq_ignore_ascii_case("stdout") {
        return Ok(Box::new(BufWriter::new(std::io::stdout())));
    }
    let f = File::create(file).map_err(|e| anyhow::anyhow!("can't create {}: {}", file, e))?;
    if is_gz(file) {
        Ok(Box::new(BufWriter::new(GzEncoder::new(f, Compression::default()))))
    } else {
        Ok(Box::new(BufWriter::new(f)))
    }
}

pub fn is_gz(file: &str) -> bool {
    Path::new(file).extension().is_some_and(|x| x == "gz")
}

/// Create the parent directory of `file` if needed
pub fn mkdir(file: &str) -> anyhow::Result<()> {
    match Path::new(file).parent() {
        Some(dir) if !dir.as_os_str().is_empty() => Ok(std::fs::create_dir_all(dir)?),
        _ => Ok(()),
    }
}

/// Suggest a fresh file name under the system temp directory
pub fn create_temp_dir_file(suffix: &str) -> anyhow::Result<PathBuf> {
    let temp_dir = std::env::temp_dir().join("matrix-util");
    std::fs::create_dir_all(&temp_dir)?;
    let temp_file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile_in(temp_dir)?;
    Ok(temp_file.path().to_owned())
}
