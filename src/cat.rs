//! Concatenation of certified streams into one certified output.

use crate::error::{Error, Result};
use crate::reader::ChecksumReader;
use crate::writer::ChecksumWriter;
use std::convert::Infallible;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::str::FromStr;

/// A named input to [`concatenate`]: a file, or standard input spelled `-`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Stdin,
    Path(PathBuf),
}

impl Input {
    fn open(&self) -> io::Result<Box<dyn BufRead>> {
        match self {
            Input::Stdin => Ok(Box::new(io::stdin().lock())),
            Input::Path(path) => Ok(Box::new(BufReader::new(File::open(path)?))),
        }
    }
}

impl FromStr for Input {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "-" => Input::Stdin,
            path => Input::Path(PathBuf::from(path)),
        })
    }
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Input::Stdin => f.write_str("-"),
            Input::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Counts of inputs copied by a successful [`concatenate`] run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CatSummary {
    /// Inputs whose trailer verified.
    pub certified: usize,
    /// Inputs that carried no trailer; their content was still copied.
    pub uncertified: usize,
}

/// Copies every input, minus its trailer, into `sink` and certifies the whole.
///
/// An input with no trailer is logged and skipped over. An input whose
/// trailer does not verify aborts the run, and the output is left without a
/// trailer so that it can never pass verification itself.
pub fn concatenate<W: Write>(inputs: &[Input], sink: W) -> Result<CatSummary> {
    let mut writer = ChecksumWriter::new(sink);
    let mut summary = CatSummary::default();
    for input in inputs {
        append(input, input.open()?, &mut writer, &mut summary)?;
    }
    writer.close()?;
    Ok(summary)
}

/// Like [`concatenate`] over already-open sources.
pub fn concatenate_readers<R, W>(sources: impl IntoIterator<Item = R>, sink: W) -> Result<CatSummary>
where
    R: BufRead,
    W: Write,
{
    let mut writer = ChecksumWriter::new(sink);
    let mut summary = CatSummary::default();
    for (index, source) in sources.into_iter().enumerate() {
        append(&format_args!("source {index}"), source, &mut writer, &mut summary)?;
    }
    writer.close()?;
    Ok(summary)
}

fn append<R: BufRead, W: Write>(
    name: &dyn fmt::Display,
    source: R,
    writer: &mut ChecksumWriter<W>,
    summary: &mut CatSummary,
) -> Result<()> {
    let mut reader = ChecksumReader::new(source);
    let copied = io::copy(&mut reader, writer)?;
    match reader.close() {
        Ok(()) => {
            log::debug!("{name}: {copied} certified bytes");
            summary.certified += 1;
            Ok(())
        }
        Err(Error::MissingChecksum) => {
            log::warn!("{name}: no checksum trailer, copied {copied} uncertified bytes");
            summary.uncertified += 1;
            Ok(())
        }
        Err(e) => {
            log::error!("{name}: {e}");
            Err(e)
        }
    }
}
