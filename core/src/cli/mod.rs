pub mod report;

use crate::types::ProtocolConfig;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Command-line arguments for phantomqa
#[derive(Parser, Debug)]
#[command(name = "phantomqa")]
#[command(about = "MR phantom SNR/uniformity analysis from DICOM folders")]
#[command(version)]
pub struct Cli {
    /// Directory containing DICOM files (searched recursively)
    #[arg(value_name = "DIRECTORY")]
    pub directory: PathBuf,

    /// Coil protocol
    #[arg(short, long, default_value = "torso")]
    pub protocol: ProtocolArg,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    Text,
    /// JSON format
    Json,
}

/// Coil protocol presets
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ProtocolArg {
    /// Whole-body torso coil (12 elements)
    Torso,
    /// Head & neck coil (10 elements, normalization-aware)
    HeadNeck,
    /// Generic body-coil NEMA protocol (combined views only)
    NemaBody,
}

impl From<ProtocolArg> for ProtocolConfig {
    fn from(arg: ProtocolArg) -> Self {
        match arg {
            ProtocolArg::Torso => ProtocolConfig::torso(),
            ProtocolArg::HeadNeck => ProtocolConfig::head_neck(),
            ProtocolArg::NemaBody => ProtocolConfig::nema_body(),
        }
    }
}
