//! Small graph building blocks: paths, stars, explicit edge lists, disjoint
//! unions and runs of `K2` components.

use petgraph::graph::NodeIndex;

use crate::{MAX_DEGREE, MIN_DEGREE, SimpleGraph};

/// Path on `n` vertices: `0-1-…-(n-1)`.
pub fn path_graph(n: usize) -> SimpleGraph {
  let edges: Vec<(usize, usize)> = (1..n).map(|v| (v - 1, v)).collect();
  graph_from_edges(n, &edges)
}

/// Star `K_{1,k}`: centre `0`, leaves `1..=k`.
pub fn star_graph(k: usize) -> SimpleGraph {
  let edges: Vec<(usize, usize)> = (1..=k).map(|v| (0, v)).collect();
  graph_from_edges(k + 1, &edges)
}

/// Cycle on `n` vertices: the path `0-…-(n-1)` closed by `0-(n-1)`.
pub fn cycle_graph(n: usize) -> SimpleGraph {
  let mut edges: Vec<(usize, usize)> = (1..n).map(|v| (v - 1, v)).collect();
  if n > 2 {
    edges.push((0, n - 1));
  }
  graph_from_edges(n, &edges)
}

pub fn complete_graph(n: usize) -> SimpleGraph {
  let edges: Vec<(usize, usize)> = (0..n)
    .flat_map(|j| (0..j).map(move |i| (i, j)))
    .collect();
  graph_from_edges(n, &edges)
}

/// Graph on `max(n, largest endpoint + 1)` vertices with the given edges.
/// Repeated edges and self-loops are dropped.
pub fn graph_from_edges(n: usize, edges: &[(usize, usize)]) -> SimpleGraph {
  let n = edges
    .iter()
    .map(|&(u, v)| u.max(v) + 1)
    .fold(n, usize::max);
  let mut g = SimpleGraph::with_capacity(n, edges.len());
  for _ in 0..n {
    g.add_node(());
  }
  for &(u, v) in edges {
    let (a, b) = (NodeIndex::new(u), NodeIndex::new(v));
    if u != v && g.find_edge(a, b).is_none() {
      g.add_edge(a, b, ());
    }
  }
  g
}

/// Disjoint union: `b`'s vertices are relabelled to follow `a`'s.
pub fn disjoint_union(a: &SimpleGraph, b: &SimpleGraph) -> SimpleGraph {
  let mut g = a.clone();
  let offset = a.node_count();
  for _ in b.node_indices() {
    g.add_node(());
  }
  for e in b.edge_indices() {
    if let Some((u, v)) = b.edge_endpoints(e) {
      g.add_edge(
        NodeIndex::new(u.index() + offset),
        NodeIndex::new(v.index() + offset),
        (),
      );
    }
  }
  g
}

/// Appends `count` disjoint `K2` components after the existing vertices.
pub fn add_matching(g: &mut SimpleGraph, count: usize) {
  for _ in 0..count {
    let u = g.add_node(());
    let v = g.add_node(());
    g.add_edge(u, v, ());
  }
}

pub fn degrees(g: &SimpleGraph) -> Vec<usize> {
  g.node_indices().map(|v| g.edges(v).count()).collect()
}

/// First vertex whose degree falls outside `[MIN_DEGREE, MAX_DEGREE]`, with
/// that degree.
pub fn degree_violation(g: &SimpleGraph) -> Option<(usize, usize)> {
  degrees(g)
    .into_iter()
    .enumerate()
    .find(|&(_, d)| !(MIN_DEGREE..=MAX_DEGREE).contains(&d))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn path_and_star_shapes() {
    let p = path_graph(4);
    assert_eq!(p.node_count(), 4);
    assert_eq!(p.edge_count(), 3);
    assert_eq!(degrees(&p), vec![1, 2, 2, 1]);

    let s = star_graph(4);
    assert_eq!(s.node_count(), 5);
    assert_eq!(degrees(&s), vec![4, 1, 1, 1, 1]);
  }

  #[test]
  fn cycle_and_complete_shapes() {
    let c = cycle_graph(4);
    assert_eq!(c.edge_count(), 4);
    assert_eq!(degrees(&c), vec![2, 2, 2, 2]);
    assert!(c.contains_edge(NodeIndex::new(0), NodeIndex::new(3)));

    let k = complete_graph(5);
    assert_eq!(k.edge_count(), 10);
    assert_eq!(degrees(&k), vec![4; 5]);
  }

  #[test]
  fn single_vertex_path_is_isolated() {
    let p = path_graph(1);
    assert_eq!(p.node_count(), 1);
    assert_eq!(degree_violation(&p), Some((0, 0)));
  }

  #[test]
  fn union_relabels_second_operand() {
    let g = disjoint_union(&path_graph(3), &path_graph(3));
    assert_eq!(g.node_count(), 6);
    assert!(g.contains_edge(NodeIndex::new(3), NodeIndex::new(4)));
    assert!(g.contains_edge(NodeIndex::new(4), NodeIndex::new(5)));
    assert!(!g.contains_edge(NodeIndex::new(2), NodeIndex::new(3)));
  }

  #[test]
  fn matching_appends_k2_components() {
    let mut g = path_graph(3);
    add_matching(&mut g, 2);
    assert_eq!(g.node_count(), 7);
    assert_eq!(g.edge_count(), 4);
    assert!(g.contains_edge(NodeIndex::new(3), NodeIndex::new(4)));
    assert!(g.contains_edge(NodeIndex::new(5), NodeIndex::new(6)));
    assert_eq!(degree_violation(&g), None);
  }

  #[test]
  fn explicit_edges_skip_loops_and_duplicates() {
    let g = graph_from_edges(0, &[(0, 1), (1, 0), (2, 2), (1, 2)]);
    assert_eq!(g.node_count(), 3);
    assert_eq!(g.edge_count(), 2);
  }

  #[test]
  fn degree_above_bound_is_reported() {
    let g = star_graph(6);
    assert_eq!(degree_violation(&g), Some((0, 6)));
  }
}
