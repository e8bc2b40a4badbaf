//! Metadata classification of a DICOM folder
//!
//! Buckets every readable file into a `(locus, kind, normalized)` key:
//! exactly one recognized coil-element label makes an individual-element
//! file; otherwise an orientation substring in the series description makes
//! a combined file; anything else is dropped with a diagnostic.

use crate::error::{PhantomQaError, Result};
use crate::extraction::tags::{COIL_STRING, IMAGE_TYPE, INSTANCE_NUMBER, PIXEL_DATA, SERIES_DESCRIPTION};
use crate::extraction::tags::{get_int_value, get_multi_string_value, get_string_value};
use crate::image::load_scan_image;
use crate::types::{ClassKey, Diagnostic, DiagnosticKind, Locus, Orientation, ProtocolConfig, ScanKind};
use dicom_object::OpenFileOptions;
use log::{debug, warn};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Descriptive header fields of one scan, read without decoding pixel data
#[derive(Debug, Clone, PartialEq)]
pub struct ScanMeta {
    pub series_description: String,
    /// Trimmed non-empty tokens of the semicolon-delimited coil string
    pub coil_labels: Vec<String>,
    /// Whether ImageType carries the NORM marker
    pub normalized: bool,
    pub instance_number: i32,
}

impl ScanMeta {
    /// Reads the descriptive fields from a file, stopping before pixel data
    pub fn from_file(path: &Path) -> Result<ScanMeta> {
        let obj = OpenFileOptions::new()
            .read_until(PIXEL_DATA)
            .open_file(path)?;

        let series_description = get_string_value(&obj, SERIES_DESCRIPTION).unwrap_or_default();
        let coil_labels = get_string_value(&obj, COIL_STRING)
            .map(|s| {
                s.split(';')
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .collect()
            })
            .unwrap_or_default();
        let normalized = get_multi_string_value(&obj, IMAGE_TYPE)
            .map(|types| types.iter().any(|t| t.to_uppercase() == "NORM"))
            .unwrap_or(false);
        let instance_number = get_int_value(&obj, INSTANCE_NUMBER).unwrap_or(1);

        Ok(ScanMeta {
            series_description,
            coil_labels,
            normalized,
            instance_number,
        })
    }
}

/// Classified file paths keyed by `(locus, kind, normalized)`
///
/// Duplicate keys are last-wins: a later file silently replaces an earlier
/// one, with a debug log recording the overwrite.
#[derive(Debug, Default)]
pub struct Classification {
    files: HashMap<ClassKey, PathBuf>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Classification {
    pub fn insert(&mut self, key: ClassKey, path: PathBuf) {
        if let Some(previous) = self.files.insert(key.clone(), path.clone()) {
            debug!(
                "Duplicate key {}: {} replaces {}",
                key,
                path.display(),
                previous.display()
            );
        }
    }

    pub fn get(&self, locus: Locus, kind: ScanKind, normalized: bool) -> Option<&PathBuf> {
        self.files.get(&ClassKey::new(locus, kind, normalized))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Checks if a file has a DICOM header
///
/// DICOM files have a 128-byte preamble followed by the 4-byte "DICM"
/// magic string. Files without the preamble are not accepted.
pub fn is_dicom_file(path: &Path) -> bool {
    use std::fs::File;
    use std::io::Read;

    let mut file = match File::open(path) {
        Ok(f) => f,
        Err(_) => return false,
    };

    // Read first 132 bytes (128-byte preamble + 4-byte "DICM" magic)
    let mut buffer = [0u8; 132];
    match file.read(&mut buffer) {
        Ok(n) if n >= 132 => &buffer[128..132] == b"DICM",
        _ => false,
    }
}

/// Recursively collects every DICOM-decodable file under a directory
///
/// Validity is the DICM magic check; the subsequent header decode is
/// tolerant and handled per file by the classifier.
pub fn collect_dicom_files(directory: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    collect_into(directory, &mut files)?;
    // Stable order so duplicate-key resolution does not depend on readdir order
    files.sort();
    Ok(files)
}

fn collect_into(directory: &Path, files: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(directory)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            collect_into(&path, files)?;
        } else if path.is_file() && is_dicom_file(&path) {
            files.push(path);
        }
    }
    Ok(())
}

/// Classifies a set of known-valid DICOM files for one protocol
///
/// Per-file decode errors are downgraded to diagnostics and never abort
/// the pass.
pub fn classify_files(paths: &[PathBuf], config: &ProtocolConfig) -> Classification {
    let mut classification = Classification::default();

    for path in paths {
        let meta = match ScanMeta::from_file(path) {
            Ok(meta) => meta,
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                classification.diagnostics.push(Diagnostic::new(
                    DiagnosticKind::UnreadableFile,
                    format!("{}: {}", path.display(), e),
                ));
                continue;
            }
        };

        // Blank/calibration frame pre-filter (protocol-dependent)
        if config.skip_blank_frames && is_blank_frame(path) {
            debug!("Skipping blank frame: {}", path.display());
            classification.diagnostics.push(Diagnostic::new(
                DiagnosticKind::BlankFrame,
                path.display().to_string(),
            ));
            continue;
        }

        let kind = ScanKind::from_descriptors(&meta.series_description, &path.to_string_lossy());
        let normalized = config.uses_normalization && meta.normalized;

        if meta.coil_labels.len() == 1 && config.is_element_label(&meta.coil_labels[0]) {
            let key = ClassKey::new(
                Locus::Element(meta.coil_labels[0].clone()),
                kind,
                normalized,
            );
            debug!(
                "[Individual] {} (instance {}) -> {}",
                path.display(),
                meta.instance_number,
                key
            );
            classification.insert(key, path.clone());
        } else if let Some(orientation) = Orientation::from_series_description(&meta.series_description)
        {
            let key = ClassKey::new(Locus::Orientation(orientation), kind, normalized);
            debug!(
                "[Combined] {} (instance {}) -> {}",
                path.display(),
                meta.instance_number,
                key
            );
            classification.insert(key, path.clone());
        } else {
            debug!(
                "Unclassified file: {} | SeriesDescription='{}'",
                path.display(),
                meta.series_description
            );
            classification.diagnostics.push(Diagnostic::new(
                DiagnosticKind::UnclassifiedFile,
                format!(
                    "{} (series description '{}')",
                    path.display(),
                    meta.series_description
                ),
            ));
        }
    }

    classification
}

/// Classifies every DICOM file under a folder
///
/// # Errors
///
/// Returns `NoInputFiles` when the folder contains no file passing the
/// DICM magic check, and an I/O error when the folder itself cannot be
/// read, so callers can tell "no matches" apart from "nothing readable".
pub fn classify_folder(folder: &Path, config: &ProtocolConfig) -> Result<Classification> {
    let files = collect_dicom_files(folder)?;
    if files.is_empty() {
        return Err(PhantomQaError::NoInputFiles(folder.display().to_string()));
    }
    debug!("Found {} DICOM files under {}", files.len(), folder.display());
    Ok(classify_files(&files, config))
}

fn is_blank_frame(path: &Path) -> bool {
    match load_scan_image(path) {
        Ok(scan) => scan.pixels.iter().all(|&v| v == 0.0),
        // Undecodable pixels are not treated as blank; classification proceeds
        Err(_) => false,
    }
}
