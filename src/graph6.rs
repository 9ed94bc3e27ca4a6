//! graph6 decoding (header-less, one graph per line).
//!
//! A graph on `n` vertices is the size prefix `N(n)` followed by the upper
//! triangle of its adjacency matrix in column order
//! `(0,1),(0,2),(1,2),(0,3),…`, six bits per byte, each byte offset by 63.
//! Encoding is petgraph's `ToGraph6`; decoding here reports malformed input
//! as `Graph6Error` instead of panicking.

use petgraph::graph::NodeIndex;
use thiserror::Error;

use crate::SimpleGraph;

pub const HEADER: &str = ">>graph6<<";

const BIAS: u8 = 63;
const LONG_SIZE: u8 = 126;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Graph6Error {
  #[error("empty graph6 string")]
  Empty,
  #[error("{0} input is not supported, expected graph6")]
  Unsupported(&'static str),
  #[error("byte {byte:#04x} at position {position} is outside the graph6 range 63..=126")]
  InvalidByte { byte: u8, position: usize },
  #[error("size prefix is truncated")]
  TruncatedSize,
  #[error("graph on {vertices} vertices needs {expected} data bytes, found {found}")]
  Length {
    vertices: u64,
    expected: u128,
    found: usize,
  },
}

/// Decodes one graph6 line. An optional `>>graph6<<` header and trailing
/// whitespace are accepted.
pub fn from_graph6(text: &str) -> Result<SimpleGraph, Graph6Error> {
  let text = text.trim_end();
  let text = text.strip_prefix(HEADER).unwrap_or(text);
  let bytes = text.as_bytes();

  match bytes.first() {
    None => return Err(Graph6Error::Empty),
    Some(b':') => return Err(Graph6Error::Unsupported("sparse6")),
    Some(b'&') => return Err(Graph6Error::Unsupported("digraph6")),
    Some(_) => {}
  }
  if let Some((position, &byte)) = bytes
    .iter()
    .enumerate()
    .find(|&(_, &b)| !(BIAS..=LONG_SIZE).contains(&b))
  {
    return Err(Graph6Error::InvalidByte { byte, position });
  }

  let (n, data) = parse_size(bytes)?;
  let pairs = u128::from(n) * u128::from(n.saturating_sub(1)) / 2;
  let expected = pairs.div_ceil(6);
  if expected != data.len() as u128 {
    return Err(Graph6Error::Length {
      vertices: n,
      expected,
      found: data.len(),
    });
  }
  // the data length check bounds n by the input size
  let n = n as usize;

  let mut g = SimpleGraph::with_capacity(n, 0);
  for _ in 0..n {
    g.add_node(());
  }
  let mut bits = data
    .iter()
    .flat_map(|&b| (0..6).rev().map(move |k| ((b - BIAS) >> k) & 1 == 1));
  for j in 1..n {
    for i in 0..j {
      if bits.next().unwrap_or(false) {
        g.add_edge(NodeIndex::new(i), NodeIndex::new(j), ());
      }
    }
  }
  Ok(g)
}

fn parse_size(bytes: &[u8]) -> Result<(u64, &[u8]), Graph6Error> {
  let value = |digits: &[u8]| {
    digits
      .iter()
      .fold(0u64, |acc, &b| (acc << 6) | u64::from(b - BIAS))
  };
  if bytes[0] != LONG_SIZE {
    return Ok((u64::from(bytes[0] - BIAS), &bytes[1..]));
  }
  if bytes.get(1) == Some(&LONG_SIZE) {
    let digits = bytes.get(2..8).ok_or(Graph6Error::TruncatedSize)?;
    Ok((value(digits), &bytes[8..]))
  } else {
    let digits = bytes.get(1..4).ok_or(Graph6Error::TruncatedSize)?;
    Ok((value(digits), &bytes[4..]))
  }
}

/// Edges as `(u, v)` with `u < v`, sorted lexicographically.
pub fn edge_list(g: &SimpleGraph) -> Vec<(usize, usize)> {
  let mut edges: Vec<(usize, usize)> = g
    .edge_indices()
    .filter_map(|e| g.edge_endpoints(e))
    .map(|(a, b)| {
      let (u, v) = (a.index(), b.index());
      if u < v { (u, v) } else { (v, u) }
    })
    .collect();
  edges.sort_unstable();
  edges.dedup();
  edges
}
