//! Writes each `Case` to its own graph6 file after checking the degree bounds
//! and the declared vertex / edge counts.

use std::fs::{self, File};
use std::io::{self, BufWriter, IsTerminal, Write};
use std::path::{Path, PathBuf};

use petgraph::graph6::ToGraph6;
use thiserror::Error;
use tracing::info;

use crate::cases::Case;
use crate::construct::degree_violation;
use crate::{MAX_DEGREE, MIN_DEGREE, progress};

#[derive(Debug, Error)]
pub enum EnumerateError {
  #[error(
    "{file}: graph {graph} has vertex {vertex} of degree {degree}, expected {}..={}",
    MIN_DEGREE,
    MAX_DEGREE
  )]
  DegreeBound {
    file: String,
    graph: usize,
    vertex: usize,
    degree: usize,
  },
  #[error("{file}: graph {graph} has {vertices} vertices and {edges} edges, expected {expected_vertices} and {expected_edges}")]
  Shape {
    file: String,
    graph: usize,
    vertices: usize,
    edges: usize,
    expected_vertices: usize,
    expected_edges: usize,
  },
  #[error("failed to write {}: {source}", path.display())]
  Io {
    path: PathBuf,
    source: std::io::Error,
  },
}

impl EnumerateError {
  pub fn is_degree_bound(&self) -> bool {
    matches!(self, EnumerateError::DegreeBound { .. })
  }

  pub fn is_shape(&self) -> bool {
    matches!(self, EnumerateError::Shape { .. })
  }
}

/// Validates and encodes every graph of `case`, one graph6 line each.
///
/// Nothing is written if any graph fails validation.
pub fn encode_case(case: &Case) -> Result<Vec<String>, EnumerateError> {
  let file = case.file_name();
  let graphs = case.graphs();

  let pb = progress::bar(
    io::stderr().is_terminal(),
    graphs.len() as u64,
    "[g6   ] {pos}/{len} {elapsed_precise} {wide_msg}",
  );
  pb.set_message(file.clone());

  let mut lines = Vec::with_capacity(graphs.len());
  for (idx, g) in graphs.iter().enumerate() {
    if let Some((vertex, degree)) = degree_violation(g) {
      pb.abandon();
      return Err(EnumerateError::DegreeBound {
        file,
        graph: idx,
        vertex,
        degree,
      });
    }
    if g.node_count() != case.vertices || g.edge_count() != case.edges {
      pb.abandon();
      return Err(EnumerateError::Shape {
        file,
        graph: idx,
        vertices: g.node_count(),
        edges: g.edge_count(),
        expected_vertices: case.vertices,
        expected_edges: case.edges,
      });
    }
    lines.push(g.graph6_string());
    pb.inc(1);
  }
  pb.finish_and_clear();
  Ok(lines)
}

/// Writes `case` to `out_dir/<case file name>` and returns the path.
pub fn save_case(out_dir: &Path, case: &Case) -> Result<PathBuf, EnumerateError> {
  let lines = encode_case(case)?;
  let path = out_dir.join(case.file_name());
  info!("Saving {} graph(s) to {}...", lines.len(), path.display());

  let io_err = |source| EnumerateError::Io {
    path: path.clone(),
    source,
  };
  let mut writer = BufWriter::new(File::create(&path).map_err(io_err)?);
  for line in &lines {
    writeln!(writer, "{line}").map_err(io_err)?;
  }
  writer.flush().map_err(io_err)?;
  Ok(path)
}

/// Writes every case into `out_dir`, creating it if needed. Stops at the
/// first failing case.
pub fn save_all(out_dir: &Path, cases: &[Case]) -> Result<Vec<PathBuf>, EnumerateError> {
  fs::create_dir_all(out_dir).map_err(|source| EnumerateError::Io {
    path: out_dir.to_path_buf(),
    source,
  })?;
  let paths = cases
    .iter()
    .map(|case| save_case(out_dir, case))
    .collect::<Result<Vec<_>, _>>()?;
  info!("All files generated successfully.");
  Ok(paths)
}
