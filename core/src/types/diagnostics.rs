use std::fmt;

/// Category of a pipeline diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(rename_all = "kebab-case"))]
pub enum DiagnosticKind {
    /// A file could not be read or decoded; it was skipped
    UnreadableFile,
    /// A file matched neither an element label nor an orientation; dropped
    UnclassifiedFile,
    /// A frame whose maximum intensity is exactly zero was dropped
    BlankFrame,
    /// A signal or noise entry was missing for an orientation or element
    MissingPair,
    /// Phantom detection found no surviving component; fell back to the
    /// image center
    NoPhantomDetected,
    /// An ROI radius was forced up to the 1-pixel minimum
    DegradedRoi,
}

impl DiagnosticKind {
    pub fn simple_name(&self) -> &'static str {
        match self {
            DiagnosticKind::UnreadableFile => "unreadable-file",
            DiagnosticKind::UnclassifiedFile => "unclassified-file",
            DiagnosticKind::BlankFrame => "blank-frame",
            DiagnosticKind::MissingPair => "missing-pair",
            DiagnosticKind::NoPhantomDetected => "no-phantom-detected",
            DiagnosticKind::DegradedRoi => "degraded-roi",
        }
    }
}

/// One structured skip/degradation event
///
/// Diagnostics are returned alongside results so callers and tests can
/// assert on skip reasons instead of scraping logs.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub detail: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind.simple_name(), self.detail)
    }
}
