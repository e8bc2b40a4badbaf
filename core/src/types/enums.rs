use std::fmt;

/// Acquisition orientation of a combined (all-element) scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(rename_all = "lowercase"))]
pub enum Orientation {
    Sag,
    Tra,
    Cor,
}

impl Orientation {
    /// Output ordering for result rows (SAG, TRA, COR)
    pub const REPORT_ORDER: [Orientation; 3] = [Orientation::Sag, Orientation::Tra, Orientation::Cor];

    /// Substring match order used during classification (first match wins)
    const MATCH_ORDER: [Orientation; 3] = [Orientation::Tra, Orientation::Sag, Orientation::Cor];

    /// Lowercase substring that identifies this orientation in a series description
    pub fn token(&self) -> &'static str {
        match self {
            Orientation::Sag => "sag",
            Orientation::Tra => "tra",
            Orientation::Cor => "cor",
        }
    }

    /// Uppercase region label used in result rows
    pub fn label(&self) -> &'static str {
        match self {
            Orientation::Sag => "SAG",
            Orientation::Tra => "TRA",
            Orientation::Cor => "COR",
        }
    }

    /// Finds the first orientation token contained in a series description
    ///
    /// The description is matched case-insensitively in the fixed order
    /// TRA, SAG, COR.
    pub fn from_series_description(desc: &str) -> Option<Orientation> {
        let lower = desc.to_lowercase();
        Orientation::MATCH_ORDER
            .iter()
            .copied()
            .find(|o| lower.contains(o.token()))
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Whether a scan carries phantom signal or pure noise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(rename_all = "lowercase"))]
pub enum ScanKind {
    Image,
    Noise,
}

impl ScanKind {
    /// Classifies a scan from its series description and file path
    ///
    /// A scan is noise if either string contains "noise" case-insensitively.
    pub fn from_descriptors(series_description: &str, path: &str) -> ScanKind {
        if series_description.to_lowercase().contains("noise") || path.to_lowercase().contains("noise")
        {
            ScanKind::Noise
        } else {
            ScanKind::Image
        }
    }

    pub fn simple_name(&self) -> &'static str {
        match self {
            ScanKind::Image => "image",
            ScanKind::Noise => "noise",
        }
    }
}

impl fmt::Display for ScanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.simple_name())
    }
}

/// Identity of a classified scan: a combined orientation or a single coil element
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locus {
    Orientation(Orientation),
    Element(String),
}

impl fmt::Display for Locus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locus::Orientation(o) => write!(f, "{}", o),
            Locus::Element(e) => write!(f, "{}", e),
        }
    }
}

/// Classification key: locus, kind, and normalization flag
///
/// Protocols that do not distinguish normalization always record
/// `normalized = false`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassKey {
    pub locus: Locus,
    pub kind: ScanKind,
    pub normalized: bool,
}

impl ClassKey {
    pub fn new(locus: Locus, kind: ScanKind, normalized: bool) -> Self {
        Self {
            locus,
            kind,
            normalized,
        }
    }
}

impl fmt::Display for ClassKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, norm={})", self.locus, self.kind, self.normalized)
    }
}
