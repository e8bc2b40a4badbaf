use crate::types::AnalysisReport;
use std::fmt;

/// Text report formatter for an analysis run
pub struct TextReport<'a> {
    report: &'a AnalysisReport,
}

impl<'a> TextReport<'a> {
    /// Creates a new text report
    pub fn new(report: &'a AnalysisReport) -> Self {
        Self { report }
    }
}

impl<'a> fmt::Display for TextReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Combined Views")?;
        writeln!(f, "==============")?;
        if self.report.combined.is_empty() {
            writeln!(f, "(none)")?;
        } else {
            writeln!(
                f,
                "{:<8} {:>12} {:>12} {:>12} {:>10} {:>8} {:>12}",
                "Region", "Signal Max", "Signal Min", "Signal Mean", "Noise SD", "SNR", "Uniformity"
            )?;
            for row in &self.report.combined {
                writeln!(
                    f,
                    "{:<8} {:>12.1} {:>12.1} {:>12.1} {:>10.2} {:>8.1} {:>12.1}",
                    row.region,
                    row.signal_max,
                    row.signal_min,
                    row.signal_mean,
                    row.noise_sd,
                    row.snr,
                    row.uniformity
                )?;
            }
        }
        writeln!(f)?;

        writeln!(f, "Individual Elements")?;
        writeln!(f, "===================")?;
        if self.report.elements.is_empty() {
            writeln!(f, "(none)")?;
        } else {
            writeln!(
                f,
                "{:<8} {:>12} {:>10} {:>8}",
                "Element", "Signal Mean", "Noise SD", "SNR"
            )?;
            for row in &self.report.elements {
                writeln!(
                    f,
                    "{:<8} {:>12.1} {:>10.2} {:>8.1}",
                    row.element, row.signal_mean, row.noise_sd, row.snr
                )?;
            }
        }

        if !self.report.diagnostics.is_empty() {
            writeln!(f)?;
            writeln!(f, "Diagnostics")?;
            writeln!(f, "===========")?;
            for diagnostic in &self.report.diagnostics {
                writeln!(f, "{}", diagnostic)?;
            }
        }

        Ok(())
    }
}
