//! Helpers for the disconnected-graph case files and the MessagePack → text
//! conversion consumed by the Lean side of the proof.

use petgraph::graph::Graph;
use petgraph::Undirected;

pub mod cases;
pub mod construct;
pub mod enumerate;
pub mod graph6;
pub mod record;
pub mod transcode;

/// Undirected simple graph whose vertices are the node indices `0..n`.
pub type SimpleGraph = Graph<(), (), Undirected>;

/// Lower degree bound (no isolated vertices).
pub const MIN_DEGREE: usize = 1;
/// Upper degree bound.
pub const MAX_DEGREE: usize = 5;

pub(crate) mod progress {
  use indicatif::{ProgressBar, ProgressStyle};

  /// Progress bar with the given template, falling back to the default
  /// style if the template does not parse. Hidden unless `draw` is set.
  pub(crate) fn bar(draw: bool, len: u64, template: &str) -> ProgressBar {
    if !draw {
      return ProgressBar::hidden();
    }
    let style = ProgressStyle::with_template(template)
      .map(|s| s.progress_chars("█▉▊▋▌▍▎▏  "))
      .unwrap_or_else(|_| ProgressStyle::default_bar());
    let pb = ProgressBar::new(len);
    pb.set_style(style);
    pb
  }

}
