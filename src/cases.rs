//! Hand-derived disconnected graphs, one `Case` per (edge count, vertex
//! count) pair.
//!
//! With `e` edges on `v` vertices and every vertex covered, a forest has
//! `v - e` components. Start from all-`K2` components and distribute the
//! surplus edges over them; every partition of the surplus gives the trees
//! listed below. Non-forest cases cannot reach these vertex counts.

use crate::SimpleGraph;
use crate::construct::{add_matching, disjoint_union, graph_from_edges, path_graph, star_graph};

#[derive(Debug, Clone, Copy)]
pub enum Component {
  /// Path on `n` vertices.
  Path(usize),
  /// `K_{1,k}`.
  Star(usize),
  /// Explicit edge list on vertices `0..`.
  Tree(&'static [(usize, usize)]),
}

impl Component {
  pub fn build(&self) -> SimpleGraph {
    match *self {
      Component::Path(n) => path_graph(n),
      Component::Star(k) => star_graph(k),
      Component::Tree(edges) => graph_from_edges(0, edges),
    }
  }
}

/// Components in vertex order followed by `matching` copies of `K2`.
#[derive(Debug, Clone, Copy)]
pub struct GraphPlan {
  pub components: &'static [Component],
  pub matching: usize,
}

impl GraphPlan {
  pub fn build(&self) -> SimpleGraph {
    let mut g = self
      .components
      .iter()
      .fold(SimpleGraph::default(), |acc, c| disjoint_union(&acc, &c.build()));
    add_matching(&mut g, self.matching);
    g
  }
}

#[derive(Debug, Clone, Copy)]
pub struct Case {
  pub edges: usize,
  pub vertices: usize,
  pub plans: &'static [GraphPlan],
}

impl Case {
  pub fn file_name(&self) -> String {
    format!("disconnected_{}_node_{}.g6", self.edges, self.vertices)
  }

  pub fn graphs(&self) -> Vec<SimpleGraph> {
    self.plans.iter().map(GraphPlan::build).collect()
  }
}

use Component::{Path, Star, Tree};

/// T-shape: 0-1-2-3 with 2-4.
const T_SHAPE: &[(usize, usize)] = &[(0, 1), (1, 2), (2, 3), (2, 4)];

pub const CASES: &[Case] = &[
  // P3 + 15 K2
  Case {
    edges: 17,
    vertices: 33,
    plans: &[GraphPlan { components: &[Path(3)], matching: 15 }],
  },
  // 17 components carrying 18 edges: only P3 + 16 K2
  Case {
    edges: 18,
    vertices: 35,
    plans: &[GraphPlan { components: &[Path(3)], matching: 16 }],
  },
  // 16 components, 2 surplus edges: [2] -> P4 | K1,3 ; [1,1] -> 2 P3
  Case {
    edges: 18,
    vertices: 34,
    plans: &[
      GraphPlan { components: &[Path(4)], matching: 15 },
      GraphPlan { components: &[Star(3)], matching: 15 },
      GraphPlan { components: &[Path(3), Path(3)], matching: 14 },
    ],
  },
  // 15 components, 3 surplus edges: [1,1,1], [2,1], [3]
  Case {
    edges: 18,
    vertices: 33,
    plans: &[
      GraphPlan { components: &[Path(3), Path(3), Path(3)], matching: 12 },
      GraphPlan { components: &[Path(4), Path(3)], matching: 13 },
      GraphPlan { components: &[Star(3), Path(3)], matching: 13 },
      // 5-vertex trees: P5, K1,4, T-shape
      GraphPlan { components: &[Path(5)], matching: 14 },
      GraphPlan { components: &[Star(4)], matching: 14 },
      GraphPlan { components: &[Tree(T_SHAPE)], matching: 14 },
    ],
  },
];

#[cfg(test)]
mod tests {
  use super::*;
  use crate::construct::degree_violation;
  use petgraph::graph6::ToGraph6;

  #[test]
  fn every_plan_matches_its_case() {
    for case in CASES {
      for g in case.graphs() {
        assert_eq!(g.edge_count(), case.edges, "{}", case.file_name());
        assert_eq!(g.node_count(), case.vertices, "{}", case.file_name());
        assert_eq!(degree_violation(&g), None, "{}", case.file_name());
      }
    }
  }

  #[test]
  fn case_sizes() {
    let sizes: Vec<usize> = CASES.iter().map(|c| c.plans.len()).collect();
    assert_eq!(sizes, vec![1, 1, 3, 6]);
  }

  #[test]
  fn file_names() {
    let names: Vec<String> = CASES.iter().map(Case::file_name).collect();
    assert_eq!(
      names,
      vec![
        "disconnected_17_node_33.g6",
        "disconnected_18_node_35.g6",
        "disconnected_18_node_34.g6",
        "disconnected_18_node_33.g6",
      ]
    );
  }

  #[test]
  fn graphs_within_a_case_are_distinct() {
    for case in CASES {
      let mut lines: Vec<String> = case
        .graphs()
        .iter()
        .map(|g| g.graph6_string())
        .collect();
      lines.sort();
      lines.dedup();
      assert_eq!(lines.len(), case.plans.len(), "{}", case.file_name());
    }
  }

  #[test]
  fn components_precede_matching() {
    let g = CASES[3].plans[1].build();
    // P4 on 0..4, P3 on 4..7, first K2 on 7-8
    let edges = crate::graph6::edge_list(&g);
    assert_eq!(&edges[..6], &[(0, 1), (1, 2), (2, 3), (4, 5), (5, 6), (7, 8)]);
  }
}
