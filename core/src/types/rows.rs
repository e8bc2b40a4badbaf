use super::Diagnostic;

/// Result row for one combined (all-element) view
///
/// Created once per successfully paired signal/noise combination and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct RegionRow {
    pub region: String,
    pub signal_max: f64,
    pub signal_min: f64,
    pub signal_mean: f64,
    pub noise_sd: f64,
    pub snr: f64,
    pub uniformity: f64,
}

/// Result row for one individual coil element
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct ElementRow {
    pub element: String,
    pub signal_mean: f64,
    pub noise_sd: f64,
    pub snr: f64,
}

/// Complete output of one pipeline run
///
/// Row order follows the fixed orientation and element enumeration order,
/// not discovery order. A run with partial coverage still carries every
/// successfully computed row.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct AnalysisReport {
    pub combined: Vec<RegionRow>,
    pub elements: Vec<ElementRow>,
    pub diagnostics: Vec<Diagnostic>,
}

impl AnalysisReport {
    /// Whether the run produced no metric rows at all
    pub fn is_empty(&self) -> bool {
        self.combined.is_empty() && self.elements.is_empty()
    }
}
