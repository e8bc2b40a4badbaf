use crate::error::Result;
use crate::pipeline;
use crate::types::{AnalysisReport, ProtocolConfig};
use std::path::Path;

/// High-level entry point for phantom metric analysis
///
/// Holds the protocol configuration and runs the whole pipeline over a
/// folder of DICOM files.
///
/// # Example
///
/// ```no_run
/// use phantomqa_core::{PhantomAnalyzer, ProtocolConfig};
///
/// let analyzer = PhantomAnalyzer::new(ProtocolConfig::torso());
/// let report = analyzer.analyze_folder("scans/2026_08_12".as_ref()).unwrap();
/// for row in &report.combined {
///     println!("{}: SNR {} PIU {}", row.region, row.snr, row.uniformity);
/// }
/// ```
pub struct PhantomAnalyzer {
    protocol: ProtocolConfig,
}

impl PhantomAnalyzer {
    /// Creates an analyzer for one protocol
    pub fn new(protocol: ProtocolConfig) -> Self {
        Self { protocol }
    }

    pub fn protocol(&self) -> &ProtocolConfig {
        &self.protocol
    }

    /// Classifies, pairs, and measures every DICOM file under `folder`
    ///
    /// # Errors
    ///
    /// Fails only on systemic problems (unreadable folder, no DICOM files);
    /// per-file and per-pair issues are reported as diagnostics.
    pub fn analyze_folder(&self, folder: &Path) -> Result<AnalysisReport> {
        pipeline::run(folder, &self.protocol)
    }
}
