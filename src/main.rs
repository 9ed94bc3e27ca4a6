use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use claim_graphs::cases::CASES;
use claim_graphs::enumerate::save_all;
use claim_graphs::transcode::{ConvertOptions, convert, write_report, write_sample_records};

/// Graph files for the disconnected cases and the MessagePack → text
/// conversion read by the Lean 4 side.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
  /// More log output (-v debug, -vv trace). RUST_LOG takes precedence.
  #[arg(short, long, action = ArgAction::Count, global = true)]
  verbose: u8,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Write the hand-derived disconnected graphs, one graph6 file per case
  Enumerate {
    /// Directory for the .g6 files
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
  },
  /// Convert a MessagePack record stream (graph6 payloads) to text for Lean 4
  Convert {
    /// Path to input MessagePack file
    input: PathBuf,
    /// Path to output text file
    output: PathBuf,
    /// Generate dummy data to the input path before converting
    #[arg(long)]
    gen_dummy: bool,
    /// Write a JSON summary of converted and skipped records
    #[arg(long)]
    report: Option<PathBuf>,
  },
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let level = match cli.verbose {
    0 => "info",
    1 => "debug",
    _ => "trace",
  };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .init();

  match cli.command {
    Commands::Enumerate { out_dir } => {
      save_all(&out_dir, CASES).context("graph generation aborted")?;
    }
    Commands::Convert {
      input,
      output,
      gen_dummy,
      report,
    } => {
      if gen_dummy {
        write_sample_records(&input)?;
      }
      let options = ConvertOptions {
        progress: std::io::stderr().is_terminal(),
      };
      let summary = convert(&input, &output, &options)?;
      if let Some(path) = report {
        write_report(&path, &summary)?;
      }
    }
  }
  Ok(())
}
