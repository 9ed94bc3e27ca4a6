//! MessagePack record stream → one text line per record.
//!
//! Bad records are logged and skipped. Only I/O failures and a broken
//! MessagePack frame stop the run.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use rmpv::Value;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::construct::{complete_graph, cycle_graph, path_graph};
use crate::progress;
use crate::record::{EncodedGraph, Record};

#[derive(Debug, Error)]
pub enum StreamError {
  #[error(transparent)]
  Io(#[from] io::Error),
  #[error(transparent)]
  Decode(#[from] rmpv::decode::Error),
}

#[derive(Debug, Error)]
pub enum TranscodeError {
  #[error("input file '{}' not found", path.display())]
  InputNotFound { path: PathBuf, source: io::Error },
  #[error("failed to open input '{}': {source}", path.display())]
  OpenInput { path: PathBuf, source: io::Error },
  #[error("failed to read MessagePack from '{}': {source}", path.display())]
  ReadInput { path: PathBuf, source: StreamError },
  #[error("failed to create output '{}': {source}", path.display())]
  CreateOutput { path: PathBuf, source: io::Error },
  #[error("failed to write output '{}': {source}", path.display())]
  WriteOutput { path: PathBuf, source: io::Error },
  #[error("failed to write sample file '{}': {source}", path.display())]
  SampleIo { path: PathBuf, source: io::Error },
  #[error("failed to encode sample records into '{}': {source}", path.display())]
  SampleEncode {
    path: PathBuf,
    source: rmp_serde::encode::Error,
  },
  #[error("failed to write report '{}': {source}", path.display())]
  Report {
    path: PathBuf,
    source: serde_json::Error,
  },
}

impl TranscodeError {
  pub fn is_input(&self) -> bool {
    matches!(
      self,
      TranscodeError::InputNotFound { .. }
        | TranscodeError::OpenInput { .. }
        | TranscodeError::ReadInput { .. }
    )
  }

  pub fn is_output(&self) -> bool {
    matches!(
      self,
      TranscodeError::CreateOutput { .. } | TranscodeError::WriteOutput { .. }
    )
  }
}

#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
  /// Draw a byte progress bar over the input file.
  pub progress: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SkippedRecord {
  /// Position in the record stream, counting from 0.
  pub index: usize,
  pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ConversionSummary {
  pub converted: usize,
  pub skipped: Vec<SkippedRecord>,
}

/// Framed MessagePack values from a reader.
///
/// A top-level array that is empty or whose first element is itself an
/// array is a bulk container; its elements are yielded one by one.
pub struct RecordStream<R> {
  reader: R,
  pending: VecDeque<Value>,
  failed: bool,
}

impl<R: BufRead> RecordStream<R> {
  pub fn new(reader: R) -> Self {
    Self {
      reader,
      pending: VecDeque::new(),
      failed: false,
    }
  }
}

fn is_bulk(items: &[Value]) -> bool {
  items.first().is_none_or(Value::is_array)
}

impl<R: BufRead> Iterator for RecordStream<R> {
  type Item = Result<Value, StreamError>;

  fn next(&mut self) -> Option<Self::Item> {
    loop {
      if let Some(v) = self.pending.pop_front() {
        return Some(Ok(v));
      }
      if self.failed {
        return None;
      }
      match self.reader.fill_buf() {
        Ok([]) => return None,
        Ok(_) => {}
        Err(e) => {
          self.failed = true;
          return Some(Err(e.into()));
        }
      }
      match rmpv::decode::read_value(&mut self.reader) {
        Ok(Value::Array(items)) if is_bulk(&items) => {
          debug!("bulk container with {} records", items.len());
          self.pending = items.into();
        }
        Ok(v) => return Some(Ok(v)),
        Err(e) => {
          self.failed = true;
          return Some(Err(e.into()));
        }
      }
    }
  }
}

enum Failure {
  Read(StreamError),
  Write(io::Error),
}

/// Converts every record of `reader` into a line of `writer`.
fn transcode<R: BufRead, W: Write>(reader: R, writer: &mut W) -> Result<ConversionSummary, Failure> {
  let mut summary = ConversionSummary::default();
  for (index, value) in RecordStream::new(reader).enumerate() {
    let value = value.map_err(Failure::Read)?;
    match Record::from_value(&value) {
      Ok(record) => {
        writeln!(writer, "{}", record.to_line()).map_err(Failure::Write)?;
        summary.converted += 1;
      }
      Err(err) => {
        warn!("Skipping record {index}: {err}. Record: {value}");
        summary.skipped.push(SkippedRecord {
          index,
          reason: err.to_string(),
        });
      }
    }
  }
  writer.flush().map_err(Failure::Write)?;
  Ok(summary)
}

/// Converts the record stream at `input` into text lines at `output`.
///
/// The input is opened before the output is created, so a missing input
/// leaves no output file behind.
pub fn convert(
  input: &Path,
  output: &Path,
  options: &ConvertOptions,
) -> Result<ConversionSummary, TranscodeError> {
  info!("Loading {}...", input.display());
  let file = File::open(input).map_err(|source| {
    let path = input.to_path_buf();
    if source.kind() == io::ErrorKind::NotFound {
      TranscodeError::InputNotFound { path, source }
    } else {
      TranscodeError::OpenInput { path, source }
    }
  })?;

  let len = file.metadata().map(|m| m.len()).unwrap_or(0);
  let pb = progress::bar(
    options.progress,
    len,
    "[read ] {bytes}/{total_bytes} {elapsed_precise} {wide_bar:.cyan/blue}",
  );
  let reader = BufReader::new(pb.wrap_read(file));

  let out = File::create(output).map_err(|source| TranscodeError::CreateOutput {
    path: output.to_path_buf(),
    source,
  })?;
  let mut writer = BufWriter::new(out);

  info!("Reading records. Converting...");
  let summary = transcode(reader, &mut writer).map_err(|failure| match failure {
    Failure::Read(source) => TranscodeError::ReadInput {
      path: input.to_path_buf(),
      source,
    },
    Failure::Write(source) => TranscodeError::WriteOutput {
      path: output.to_path_buf(),
      source,
    },
  })?;
  pb.finish_and_clear();

  if !summary.skipped.is_empty() {
    warn!("Skipped {} malformed records.", summary.skipped.len());
  }
  info!("Successfully converted {} records.", summary.converted);
  info!("Output saved to: {}", output.display());
  Ok(summary)
}

/// One record of each tag: `P3` (dependent), `C4` (independent) and `K2`
/// (forbidden graph).
pub fn sample_records() -> Vec<Record> {
  vec![
    Record::Dependent {
      graph: EncodedGraph::from_graph(path_graph(3)),
      seed: 42,
      c_indices: vec![0, 2],
      f_indices: vec![1],
      class_index: 5,
    },
    Record::Independent {
      graph: EncodedGraph::from_graph(cycle_graph(4)),
      seed: 99,
    },
    Record::ForbiddenGraph {
      graph: EncodedGraph::from_graph(complete_graph(2)),
      seed: 1,
    },
  ]
}

/// Writes `records` to `path` as independently framed MessagePack values.
pub fn write_records(path: &Path, records: &[Record]) -> Result<(), TranscodeError> {
  let io_err = |source| TranscodeError::SampleIo {
    path: path.to_path_buf(),
    source,
  };
  let mut writer = BufWriter::new(File::create(path).map_err(io_err)?);
  for record in records {
    rmp_serde::encode::write(&mut writer, record).map_err(|source| {
      TranscodeError::SampleEncode {
        path: path.to_path_buf(),
        source,
      }
    })?;
  }
  writer.flush().map_err(io_err)
}

pub fn write_sample_records(path: &Path) -> Result<(), TranscodeError> {
  info!("Generating dummy data to {}...", path.display());
  write_records(path, &sample_records())
}

pub fn write_report(path: &Path, summary: &ConversionSummary) -> Result<(), TranscodeError> {
  let report_err = |source| TranscodeError::Report {
    path: path.to_path_buf(),
    source,
  };
  let file = File::create(path).map_err(|e| report_err(serde_json::Error::io(e)))?;
  let mut writer = BufWriter::new(file);
  serde_json::to_writer_pretty(&mut writer, summary).map_err(report_err)?;
  writer
    .flush()
    .map_err(|e| report_err(serde_json::Error::io(e)))
}
