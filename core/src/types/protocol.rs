//! Per-protocol configuration
//!
//! Every constant that varies between coil protocols (element enumeration,
//! SNR multipliers, ROI sizing and placement) lives in an explicit
//! [`ProtocolConfig`] value passed into the pipeline, so multiple protocols
//! can run side by side without shared mutable state.

/// How a circular ROI is sized
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RoiSizing {
    /// Fixed radius in millimeters
    RadiusMm(f64),
    /// Equivalent-circle radius derived from a target area in mm²
    AreaMm2(f64),
}

impl RoiSizing {
    /// Radius in pixels given the average pixel spacing in mm/px
    pub fn radius_px(&self, avg_spacing_mm: f64) -> f64 {
        match *self {
            RoiSizing::RadiusMm(r) => r / avg_spacing_mm,
            RoiSizing::AreaMm2(a) => (a / std::f64::consts::PI).sqrt() / avg_spacing_mm,
        }
    }
}

/// Where a circular ROI is centered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoiPlacement {
    /// Geometric center of the image
    CenterFixed,
    /// Centroid of the detected phantom, nudged down and capped to the
    /// phantom radius
    PhantomCentroid,
    /// Brightest pixel among strictly-positive pixels
    MaxIntensitySeek,
}

/// Sizing plus placement for one ROI
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoiSpec {
    pub sizing: RoiSizing,
    pub placement: RoiPlacement,
}

impl RoiSpec {
    pub fn new(sizing: RoiSizing, placement: RoiPlacement) -> Self {
        Self { sizing, placement }
    }
}

/// Where noise statistics are read from
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NoiseRegion {
    /// Circle of the given area centered on the image
    CenteredArea { area_mm2: f64 },
    /// Every pixel of the noise image
    WholeImage,
}

/// Constants for one phantom scan protocol
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolConfig {
    /// Short protocol name used in logs and reports
    pub name: &'static str,
    /// Fixed coil-element enumeration, in output order; empty for
    /// combined-only protocols
    pub element_labels: Vec<String>,
    /// SNR multiplier for combined (all-element) views
    pub combined_snr_multiplier: f64,
    /// SNR multiplier for individual-element views
    pub element_snr_multiplier: f64,
    /// Signal ROI for combined views
    pub combined_signal_roi: RoiSpec,
    /// Signal ROI for individual elements
    pub element_signal_roi: RoiSpec,
    /// Noise statistics region
    pub noise_region: NoiseRegion,
    /// Connected components smaller than this are discarded during phantom
    /// detection
    pub min_component_px: usize,
    /// ROI centers are clamped so the circle plus this margin stays in bounds
    pub bounds_margin_px: usize,
    /// Whether the protocol distinguishes normalized acquisitions (NORM
    /// image-type marker)
    pub uses_normalization: bool,
    /// Whether all-zero frames are dropped before classification
    pub skip_blank_frames: bool,
}

impl ProtocolConfig {
    /// Whole-body torso coil: 12 elements, 0.7 combined / 0.66 individual
    pub fn torso() -> Self {
        Self {
            name: "torso",
            element_labels: [
                "VAS1", "VAS2", "VAS3", "VPS1", "VPS2", "VPS3", "VAP1", "VAP2", "VAP3", "VPP1",
                "VPP2", "VPP3",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            combined_snr_multiplier: 0.7,
            element_snr_multiplier: 0.66,
            combined_signal_roi: RoiSpec::new(RoiSizing::RadiusMm(30.0), RoiPlacement::PhantomCentroid),
            element_signal_roi: RoiSpec::new(RoiSizing::RadiusMm(30.0), RoiPlacement::MaxIntensitySeek),
            noise_region: NoiseRegion::CenteredArea { area_mm2: 34_000.0 },
            min_component_px: 500,
            bounds_margin_px: 5,
            uses_normalization: false,
            skip_blank_frames: false,
        }
    }

    /// Head & neck coil: 10 elements, 0.7 everywhere, normalization-aware
    pub fn head_neck() -> Self {
        Self {
            name: "head-neck",
            element_labels: [
                "VAS1", "VAS2", "VAS3", "VPS1", "VPS2", "VPS3", "VAP1", "VAP2", "VPP1", "VPP2",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            combined_snr_multiplier: 0.7,
            element_snr_multiplier: 0.7,
            combined_signal_roi: RoiSpec::new(
                RoiSizing::AreaMm2(33_800.0),
                RoiPlacement::PhantomCentroid,
            ),
            element_signal_roi: RoiSpec::new(RoiSizing::RadiusMm(3.0), RoiPlacement::MaxIntensitySeek),
            noise_region: NoiseRegion::CenteredArea { area_mm2: 34_000.0 },
            min_component_px: 500,
            bounds_margin_px: 5,
            uses_normalization: true,
            skip_blank_frames: true,
        }
    }

    /// Generic body-coil NEMA protocol: combined views only, 0.66 multiplier,
    /// noise statistics over the whole noise image
    pub fn nema_body() -> Self {
        Self {
            name: "nema-body",
            element_labels: Vec::new(),
            combined_snr_multiplier: 0.66,
            element_snr_multiplier: 0.66,
            combined_signal_roi: RoiSpec::new(
                RoiSizing::AreaMm2(33_800.0),
                RoiPlacement::PhantomCentroid,
            ),
            element_signal_roi: RoiSpec::new(RoiSizing::RadiusMm(30.0), RoiPlacement::MaxIntensitySeek),
            noise_region: NoiseRegion::WholeImage,
            min_component_px: 500,
            bounds_margin_px: 5,
            uses_normalization: false,
            skip_blank_frames: false,
        }
    }

    /// Whether a coil-label token belongs to this protocol's enumeration
    pub fn is_element_label(&self, token: &str) -> bool {
        self.element_labels.iter().any(|e| e == token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_torso_has_twelve_elements() {
        let cfg = ProtocolConfig::torso();
        assert_eq!(cfg.element_labels.len(), 12);
        assert!(cfg.is_element_label("VPP3"));
        assert_eq!(cfg.combined_snr_multiplier, 0.7);
        assert_eq!(cfg.element_snr_multiplier, 0.66);
    }

    #[test]
    fn test_head_neck_has_ten_elements() {
        let cfg = ProtocolConfig::head_neck();
        assert_eq!(cfg.element_labels.len(), 10);
        assert!(!cfg.is_element_label("VAP3"));
        assert!(!cfg.is_element_label("VPP3"));
        assert!(cfg.uses_normalization);
        assert!(cfg.skip_blank_frames);
    }

    #[test]
    fn test_nema_body_is_combined_only() {
        let cfg = ProtocolConfig::nema_body();
        assert!(cfg.element_labels.is_empty());
        assert_eq!(cfg.noise_region, NoiseRegion::WholeImage);
    }

    #[test]
    fn test_radius_from_area_target() {
        // 34000 mm² -> r = sqrt(34000/pi) ≈ 104.03 mm; at 2 mm/px ≈ 52.02 px
        let r = RoiSizing::AreaMm2(34_000.0).radius_px(2.0);
        assert!((r - 52.016).abs() < 0.01);
    }

    #[test]
    fn test_radius_fixed_mm() {
        let r = RoiSizing::RadiusMm(30.0).radius_px(1.5);
        assert_eq!(r, 20.0);
    }
}
