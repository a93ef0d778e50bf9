use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "talk", about = "Create, inspect and verify .talk voice profiles", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Storage directory (overrides the config file and $TALK_HOME)
    #[arg(long, global = true)]
    pub dir: Option<PathBuf>,

    /// TOML store configuration
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build a profile from media files and save it
    Create(CreateArgs),
    /// Print a stored profile
    Show(NameArgs),
    /// List stored profile names
    List,
    /// Load a profile and check its integrity
    Verify(NameArgs),
    /// Delete a stored profile
    Delete(NameArgs),
    /// Write one clip's audio to a file
    Export(ExportArgs),
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    pub name: String,
    /// Audio file, optionally suffixed with `@weight` (default 1.0)
    #[arg(long = "clip")]
    pub clips: Vec<ClipSpec>,
    #[arg(long = "image")]
    pub images: Vec<PathBuf>,
    #[arg(long = "tag")]
    pub tags: Vec<String>,
}

#[derive(Args, Debug)]
pub struct NameArgs {
    pub name: String,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    pub name: String,
    /// Zero-based clip index
    #[arg(long)]
    pub clip: usize,
    #[arg(long)]
    pub out: PathBuf,
}

/// A `--clip` argument: `path` or `path@weight`.
#[derive(Clone, Debug, PartialEq)]
pub struct ClipSpec {
    pub path: PathBuf,
    pub weight: f32,
}

impl FromStr for ClipSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err("clip path is empty".into());
        }
        // A suffix that does not parse as a number is part of the path.
        if let Some((path, weight)) = s.rsplit_once('@') {
            if let Ok(weight) = weight.parse::<f32>() {
                if path.is_empty() {
                    return Err("clip path is empty".into());
                }
                if !weight.is_finite() {
                    return Err(format!("clip weight must be finite, got {weight}"));
                }
                return Ok(Self {
                    path: PathBuf::from(path),
                    weight,
                });
            }
        }
        Ok(Self {
            path: PathBuf::from(s),
            weight: 1.0,
        })
    }
}
