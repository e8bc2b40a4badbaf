//! Measurement region construction
//!
//! Builds circular boolean masks for signal and noise regions under three
//! placement policies: fixed image center, detected phantom centroid, and
//! max-intensity seek. Centers are clamped so the circle plus a safety
//! margin stays inside the image, and the radius never drops below one
//! pixel, so every produced mask selects at least one pixel.

use crate::image::{locate_phantom, ScanImage};
use crate::types::{
    Diagnostic, DiagnosticKind, NoiseRegion, ProtocolConfig, RoiPlacement, RoiSizing, RoiSpec,
};
use log::debug;
use ndarray::Array2;

/// Offset applied below the phantom centroid for centroid-placed ROIs
const CENTROID_ROW_NUDGE: usize = 3;
/// Safety margin subtracted from the detected phantom radius
const PHANTOM_RADIUS_MARGIN: f64 = 2.0;

/// One constructed ROI: the mask plus the geometry it was built from
#[derive(Debug, Clone)]
pub struct BuiltRoi {
    pub mask: Array2<bool>,
    pub center_row: usize,
    pub center_col: usize,
    pub radius_px: f64,
    pub diagnostics: Vec<Diagnostic>,
}

impl BuiltRoi {
    /// Number of selected pixels
    pub fn pixel_count(&self) -> usize {
        self.mask.iter().filter(|&&m| m).count()
    }
}

/// Builds a signal ROI according to the given spec
pub fn build_signal_roi(scan: &ScanImage, spec: &RoiSpec, config: &ProtocolConfig) -> BuiltRoi {
    let (height, width) = scan.pixels.dim();
    let mut diagnostics = Vec::new();
    let mut radius_px = spec.sizing.radius_px(scan.spacing.average());
    let mut center_row = height / 2;
    let mut center_col = width / 2;

    match spec.placement {
        RoiPlacement::CenterFixed => {}
        RoiPlacement::PhantomCentroid => {
            let disk = locate_phantom(&scan.pixels, config.min_component_px);
            if !disk.detected {
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::NoPhantomDetected,
                    format!(
                        "falling back to image center ({}, {})",
                        disk.center_row, disk.center_col
                    ),
                ));
            }
            center_row = disk.center_row + CENTROID_ROW_NUDGE;
            center_col = disk.center_col;
            radius_px = radius_px.min((disk.radius_px - PHANTOM_RADIUS_MARGIN).max(1.0));
        }
        RoiPlacement::MaxIntensitySeek => {
            if let Some((row, col)) = brightest_positive_pixel(&scan.pixels) {
                center_row = row;
                center_col = col;
            } else {
                debug!("No strictly-positive pixel found, keeping image center");
            }
        }
    }

    finish_circle(
        height, width, center_row, center_col, radius_px, config, diagnostics,
    )
}

/// Builds the noise ROI for a noise image under the protocol's noise region
pub fn build_noise_roi(scan: &ScanImage, config: &ProtocolConfig) -> BuiltRoi {
    let (height, width) = scan.pixels.dim();
    match config.noise_region {
        NoiseRegion::WholeImage => BuiltRoi {
            mask: Array2::from_elem((height, width), true),
            center_row: height / 2,
            center_col: width / 2,
            radius_px: 0.0,
            diagnostics: Vec::new(),
        },
        NoiseRegion::CenteredArea { area_mm2 } => {
            let radius_px = RoiSizing::AreaMm2(area_mm2).radius_px(scan.spacing.average());
            finish_circle(
                height,
                width,
                height / 2,
                width / 2,
                radius_px,
                config,
                Vec::new(),
            )
        }
    }
}

/// Applies the minimum-radius floor and bounds clamp, then rasterizes the circle
fn finish_circle(
    height: usize,
    width: usize,
    center_row: usize,
    center_col: usize,
    radius_px: f64,
    config: &ProtocolConfig,
    mut diagnostics: Vec<Diagnostic>,
) -> BuiltRoi {
    let radius_px = if radius_px < 1.0 {
        diagnostics.push(Diagnostic::new(
            DiagnosticKind::DegradedRoi,
            format!("radius {:.3} px forced up to 1 px", radius_px),
        ));
        1.0
    } else {
        radius_px
    };

    let margin = radius_px as usize + config.bounds_margin_px;
    let center_row = clamp_center(center_row, margin, height);
    let center_col = clamp_center(center_col, margin, width);
    let mask = circular_mask(height, width, center_row, center_col, radius_px);

    BuiltRoi {
        mask,
        center_row,
        center_col,
        radius_px,
        diagnostics,
    }
}

/// Clamps a center coordinate so `center ± margin` stays within `0..len`
///
/// When the margin cannot fit at all, the axis midpoint is used.
fn clamp_center(center: usize, margin: usize, len: usize) -> usize {
    if 2 * margin >= len {
        len / 2
    } else {
        center.clamp(margin, len - margin)
    }
}

fn circular_mask(
    height: usize,
    width: usize,
    center_row: usize,
    center_col: usize,
    radius_px: f64,
) -> Array2<bool> {
    let r2 = radius_px * radius_px;
    Array2::from_shape_fn((height, width), |(row, col)| {
        let dr = row as f64 - center_row as f64;
        let dc = col as f64 - center_col as f64;
        dr * dr + dc * dc <= r2
    })
}

fn brightest_positive_pixel(image: &Array2<f64>) -> Option<(usize, usize)> {
    image
        .indexed_iter()
        .filter(|(_, &v)| v > 0.0)
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(idx, _)| idx)
}
