//! CLI command definitions.

use attachit::{AttachItConfig, AttachItResult, Geometry};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

/// AttachIt - store images and their styles in a content store
#[derive(Parser, Debug)]
#[command(name = "attachit")]
#[command(about = "Store images and their styles in a content store", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (defaults to bundled + user config)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Load the configuration named on the command line, or the layered default.
    pub fn load_config(&self) -> AttachItResult<AttachItConfig> {
        match &self.config {
            Some(path) => AttachItConfig::from_file(path),
            None => AttachItConfig::load(),
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Store a file and every configured style
    Store {
        /// Identifier of the owning record
        #[arg(long)]
        object_id: String,

        /// Attachment name on the record
        #[arg(long)]
        name: String,

        /// Path to the uploaded file
        file: PathBuf,

        /// Extra or overriding style, as NAME=GEOMETRY (repeatable)
        #[arg(short, long = "style")]
        styles: Vec<StyleArg>,
    },

    /// Read a stored blob
    Read {
        /// Storage key, e.g. 42_avatar_thumb
        key: String,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Delete stored blobs
    Purge {
        /// Storage keys to delete
        #[arg(required = true)]
        keys: Vec<String>,
    },

    /// List the keys an attachment occupies under the configured styles
    Keys {
        /// Identifier of the owning record
        #[arg(long)]
        object_id: String,

        /// Attachment name on the record
        #[arg(long)]
        name: String,
    },
}

/// A `NAME=GEOMETRY` style given on the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleArg {
    /// Style name
    pub name: String,
    /// Target geometry
    pub geometry: Geometry,
}

impl FromStr for StyleArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, geometry) = s
            .split_once('=')
            .ok_or_else(|| format!("expected NAME=GEOMETRY, got '{}'", s))?;
        let geometry = geometry.parse::<Geometry>().map_err(|e| e.to_string())?;
        Ok(Self {
            name: name.trim().to_string(),
            geometry,
        })
    }
}
