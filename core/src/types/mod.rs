//! Core type definitions for phantom quality-assurance metrics
//!
//! This module provides the fundamental types used throughout the phantomqa library:
//! - [`Orientation`]: Acquisition orientation of combined multi-element scans (SAG, TRA, COR)
//! - [`ScanKind`]: Whether a scan carries signal or noise
//! - [`Locus`]: Orientation or coil-element identity of a classified scan
//! - [`ProtocolConfig`]: Per-protocol constants (element labels, multipliers, ROI sizing)
//! - [`RegionRow`] / [`ElementRow`]: Terminal result rows handed to the export layer
//! - [`Diagnostic`]: Structured skip/degradation events emitted alongside results

mod diagnostics;
mod enums;
mod pixel_spacing;
mod protocol;
mod rows;

pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use enums::{ClassKey, Locus, Orientation, ScanKind};
pub use pixel_spacing::PixelSpacing;
pub use protocol::{NoiseRegion, ProtocolConfig, RoiPlacement, RoiSizing, RoiSpec};
pub use rows::{AnalysisReport, ElementRow, RegionRow};
