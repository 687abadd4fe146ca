//! CLI parse: clap types for tilemerge. No behavior; definitions only.

use clap::Parser;
use std::path::PathBuf;

/// Tilemerge CLI - flatten external tilesets into a single tileset
#[derive(Debug, Parser)]
#[command(name = "tilemerge")]
#[command(about = "Combine a tree of external tileset manifests into one tileset")]
pub struct Cli {
    /// Input directory holding the root tileset
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output directory (default: <input>-combined next to the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Root tileset path, relative to the input directory
    #[arg(long)]
    pub root_json: Option<String>,

    /// Report how many external tilesets were folded
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,

    /// Configuration file path (TOML, JSON or YAML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Report format (text or json)
    #[arg(long, default_value = "text")]
    pub format: String,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr)
    #[arg(long)]
    pub log_output: Option<String>,
}
