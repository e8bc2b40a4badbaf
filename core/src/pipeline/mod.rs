//! Pairing and aggregation
//!
//! Walks the fixed orientation and element enumerations, pairs signal and
//! noise entries from the classification, and assembles the final result
//! rows. Partial coverage is expected: a missing pair skips one entry and
//! never aborts the run.

use crate::error::Result;
use crate::extraction::{classify_folder, Classification};
use crate::image::{load_scan_image, ScanImage};
use crate::metrics::{masked_stats, snr, uniformity, MaskedStats};
use crate::roi::{build_noise_roi, build_signal_roi};
use crate::types::{
    AnalysisReport, Diagnostic, DiagnosticKind, ElementRow, Locus, Orientation, ProtocolConfig,
    RegionRow, ScanKind,
};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

/// Runs the whole pipeline over one folder
///
/// # Errors
///
/// Propagates systemic failures only (unreadable folder, no DICOM files at
/// all); per-entry problems become diagnostics on the report.
pub fn run(folder: &Path, config: &ProtocolConfig) -> Result<AnalysisReport> {
    info!(
        "Analyzing {} with protocol '{}'",
        folder.display(),
        config.name
    );
    let mut classification = classify_folder(folder, config)?;
    let mut report = AnalysisReport {
        diagnostics: std::mem::take(&mut classification.diagnostics),
        ..Default::default()
    };

    for orientation in Orientation::REPORT_ORDER {
        let locus = Locus::Orientation(orientation);
        let Some((signal_path, noise_path)) =
            find_pair(&classification, &locus, &mut report.diagnostics)
        else {
            continue;
        };
        let Some((signal_stats, noise_stats)) = compute_pair_stats(
            &signal_path,
            &noise_path,
            config,
            true,
            &mut report.diagnostics,
        ) else {
            continue;
        };

        report.combined.push(RegionRow {
            region: orientation.label().to_string(),
            signal_max: signal_stats.max,
            signal_min: signal_stats.min,
            signal_mean: signal_stats.mean,
            noise_sd: noise_stats.std,
            snr: snr(
                signal_stats.mean,
                noise_stats.std,
                config.combined_snr_multiplier,
            ),
            uniformity: uniformity(signal_stats.max, signal_stats.min),
        });
    }

    for element in &config.element_labels {
        let locus = Locus::Element(element.clone());
        let Some((signal_path, noise_path)) =
            find_pair(&classification, &locus, &mut report.diagnostics)
        else {
            continue;
        };
        let Some((signal_stats, noise_stats)) = compute_pair_stats(
            &signal_path,
            &noise_path,
            config,
            false,
            &mut report.diagnostics,
        ) else {
            continue;
        };

        report.elements.push(ElementRow {
            element: element.clone(),
            signal_mean: signal_stats.mean,
            noise_sd: noise_stats.std,
            snr: snr(
                signal_stats.mean,
                noise_stats.std,
                config.element_snr_multiplier,
            ),
        });
    }

    info!(
        "Produced {} combined and {} element rows ({} diagnostics)",
        report.combined.len(),
        report.elements.len(),
        report.diagnostics.len()
    );
    Ok(report)
}

/// Looks up the signal and noise entries for one locus
///
/// Signal lookups prefer the normalized variant, noise lookups the
/// unnormalized one; the other variant is the fallback. When exactly one
/// side exists a missing-pair diagnostic is emitted; a locus with no entry
/// at all is skipped silently.
fn find_pair(
    classification: &Classification,
    locus: &Locus,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<(PathBuf, PathBuf)> {
    let signal = classification
        .get(locus.clone(), ScanKind::Image, true)
        .or_else(|| classification.get(locus.clone(), ScanKind::Image, false));
    let noise = classification
        .get(locus.clone(), ScanKind::Noise, false)
        .or_else(|| classification.get(locus.clone(), ScanKind::Noise, true));

    match (signal, noise) {
        (Some(signal), Some(noise)) => Some((signal.clone(), noise.clone())),
        (None, None) => {
            debug!("No entries for {}", locus);
            None
        }
        (signal, noise) => {
            warn!(
                "Missing pair for {}: signal={}, noise={}",
                locus,
                signal.is_some(),
                noise.is_some()
            );
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::MissingPair,
                format!(
                    "{}: signal={}, noise={}",
                    locus,
                    signal.is_some(),
                    noise.is_some()
                ),
            ));
            None
        }
    }
}

/// Loads a signal/noise pair and computes the masked statistics of both
///
/// Returns `None` (with an unreadable-file diagnostic) when either image
/// fails to decode.
fn compute_pair_stats(
    signal_path: &Path,
    noise_path: &Path,
    config: &ProtocolConfig,
    combined: bool,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<(MaskedStats, MaskedStats)> {
    let signal = load_or_diagnose(signal_path, diagnostics)?;
    let noise = load_or_diagnose(noise_path, diagnostics)?;

    let spec = if combined {
        &config.combined_signal_roi
    } else {
        &config.element_signal_roi
    };
    let signal_roi = build_signal_roi(&signal, spec, config);
    let noise_roi = build_noise_roi(&noise, config);
    diagnostics.extend(signal_roi.diagnostics.iter().cloned());
    diagnostics.extend(noise_roi.diagnostics.iter().cloned());

    Some((
        masked_stats(&signal.pixels, &signal_roi.mask),
        masked_stats(&noise.pixels, &noise_roi.mask),
    ))
}

fn load_or_diagnose(path: &Path, diagnostics: &mut Vec<Diagnostic>) -> Option<ScanImage> {
    match load_scan_image(path) {
        Ok(scan) => Some(scan),
        Err(e) => {
            warn!("Failed to load {}: {}", path.display(), e);
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::UnreadableFile,
                format!("{}: {}", path.display(), e),
            ));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dicom_core::{DataElement, PrimitiveValue, VR};
    use dicom_dictionary_std::tags;
    use dicom_object::{FileMetaTableBuilder, InMemDicomObject};
    use ndarray::Array2;
    use std::path::Path;

    const MR_IMAGE_STORAGE: &str = "1.2.840.10008.5.1.4.1.1.4";
    const EXPLICIT_VR_LE: &str = "1.2.840.10008.1.2.1";

    struct Fixture<'a> {
        series_description: &'a str,
        coil_string: Option<&'a str>,
        image_type: Vec<&'a str>,
        pixels: Array2<u16>,
    }

    fn write_dicom(path: &Path, fixture: Fixture<'_>) {
        let (rows, cols) = fixture.pixels.dim();
        let sop_instance_uid = format!(
            "1.2.826.0.1.3680043.2.1143.{}",
            path.file_name().unwrap().len() * 7919 + rows
        );

        let mut obj = InMemDicomObject::new_empty();
        obj.put(DataElement::new(
            tags::SOP_CLASS_UID,
            VR::UI,
            PrimitiveValue::from(MR_IMAGE_STORAGE),
        ));
        obj.put(DataElement::new(
            tags::SOP_INSTANCE_UID,
            VR::UI,
            PrimitiveValue::from(sop_instance_uid.as_str()),
        ));
        obj.put(DataElement::new(
            tags::MODALITY,
            VR::CS,
            PrimitiveValue::from("MR"),
        ));
        obj.put(DataElement::new(
            tags::SERIES_DESCRIPTION,
            VR::LO,
            PrimitiveValue::from(fixture.series_description),
        ));
        obj.put(DataElement::new(
            tags::IMAGE_TYPE,
            VR::CS,
            PrimitiveValue::Strs(
                fixture
                    .image_type
                    .iter()
                    .map(|s| s.to_string())
                    .collect::<Vec<_>>()
                    .into(),
            ),
        ));
        if let Some(coil) = fixture.coil_string {
            obj.put(DataElement::new(
                crate::extraction::COIL_STRING,
                VR::LO,
                PrimitiveValue::from(coil),
            ));
        }
        obj.put(DataElement::new(
            tags::PIXEL_SPACING,
            VR::DS,
            PrimitiveValue::Strs(vec!["1.0".to_string(), "1.0".to_string()].into()),
        ));
        obj.put(DataElement::new(
            tags::SAMPLES_PER_PIXEL,
            VR::US,
            PrimitiveValue::from(1_u16),
        ));
        obj.put(DataElement::new(
            tags::PHOTOMETRIC_INTERPRETATION,
            VR::CS,
            PrimitiveValue::from("MONOCHROME2"),
        ));
        obj.put(DataElement::new(
            tags::ROWS,
            VR::US,
            PrimitiveValue::from(rows as u16),
        ));
        obj.put(DataElement::new(
            tags::COLUMNS,
            VR::US,
            PrimitiveValue::from(cols as u16),
        ));
        obj.put(DataElement::new(
            tags::BITS_ALLOCATED,
            VR::US,
            PrimitiveValue::from(16_u16),
        ));
        obj.put(DataElement::new(
            tags::BITS_STORED,
            VR::US,
            PrimitiveValue::from(16_u16),
        ));
        obj.put(DataElement::new(
            tags::HIGH_BIT,
            VR::US,
            PrimitiveValue::from(15_u16),
        ));
        obj.put(DataElement::new(
            tags::PIXEL_REPRESENTATION,
            VR::US,
            PrimitiveValue::from(0_u16),
        ));
        let flat: Vec<u16> = fixture.pixels.iter().copied().collect();
        obj.put(DataElement::new(
            tags::PIXEL_DATA,
            VR::OW,
            PrimitiveValue::U16(flat.into()),
        ));

        let file_obj = obj
            .with_meta(
                FileMetaTableBuilder::new()
                    .media_storage_sop_class_uid(MR_IMAGE_STORAGE)
                    .media_storage_sop_instance_uid(sop_instance_uid)
                    .transfer_syntax(EXPLICIT_VR_LE),
            )
            .unwrap();
        file_obj.write_to_file(path).unwrap();
    }

    fn disk(height: usize, width: usize, cy: usize, cx: usize, r: f64, value: u16) -> Array2<u16> {
        Array2::from_shape_fn((height, width), |(row, col)| {
            let dr = row as f64 - cy as f64;
            let dc = col as f64 - cx as f64;
            if dr * dr + dc * dc <= r * r {
                value
            } else {
                0
            }
        })
    }

    /// Rows alternate 90/110, giving a standard deviation very close to 10
    fn striped_noise(height: usize, width: usize) -> Array2<u16> {
        Array2::from_shape_fn(
            (height, width),
            |(row, _)| if row % 2 == 0 { 90 } else { 110 },
        )
    }

    #[test]
    fn test_end_to_end_combined_pair() {
        let dir = tempfile::tempdir().unwrap();
        write_dicom(
            &dir.path().join("sag_image.dcm"),
            Fixture {
                series_description: "t2 sag phantom",
                coil_string: None,
                image_type: vec!["ORIGINAL", "PRIMARY"],
                pixels: disk(256, 256, 128, 128, 80.0, 800),
            },
        );
        write_dicom(
            &dir.path().join("sag_noise.dcm"),
            Fixture {
                series_description: "t2 sag noise",
                coil_string: None,
                image_type: vec!["ORIGINAL", "PRIMARY"],
                pixels: striped_noise(256, 256),
            },
        );
        // Signal without a matching noise image
        write_dicom(
            &dir.path().join("tra_image.dcm"),
            Fixture {
                series_description: "t2 tra phantom",
                coil_string: None,
                image_type: vec!["ORIGINAL", "PRIMARY"],
                pixels: disk(256, 256, 128, 128, 80.0, 800),
            },
        );

        let report = run(dir.path(), &ProtocolConfig::torso()).unwrap();

        assert_eq!(report.combined.len(), 1);
        let row = &report.combined[0];
        assert_eq!(row.region, "SAG");
        // ROI sits fully inside the uniform disk
        assert_eq!(row.signal_mean, 800.0);
        assert_eq!(row.uniformity, 100.0);
        // Striped noise SD is 10 up to circular-mask imbalance
        assert!((row.noise_sd - 10.0).abs() < 0.1, "noise sd {}", row.noise_sd);
        assert!((row.snr - 56.0).abs() < 0.5, "snr {}", row.snr);

        let missing: Vec<_> = report
            .diagnostics
            .iter()
            .filter(|d| d.kind == DiagnosticKind::MissingPair)
            .collect();
        assert_eq!(missing.len(), 1);
        assert!(missing[0].detail.contains("TRA"));
    }

    #[test]
    fn test_end_to_end_individual_element() {
        let dir = tempfile::tempdir().unwrap();
        write_dicom(
            &dir.path().join("vas1_image.dcm"),
            Fixture {
                series_description: "element scan",
                coil_string: Some("VAS1"),
                image_type: vec!["ORIGINAL", "PRIMARY"],
                pixels: disk(256, 256, 100, 100, 40.0, 800),
            },
        );
        write_dicom(
            &dir.path().join("vas1_noise.dcm"),
            Fixture {
                series_description: "element noise",
                coil_string: Some("VAS1"),
                image_type: vec!["ORIGINAL", "PRIMARY"],
                pixels: striped_noise(256, 256),
            },
        );
        // Multiple coil labels with an orientation: classified combined
        write_dicom(
            &dir.path().join("cor_image.dcm"),
            Fixture {
                series_description: "t2 cor phantom",
                coil_string: Some("VAS1;VAS2;VAS3"),
                image_type: vec!["ORIGINAL", "PRIMARY"],
                pixels: disk(256, 256, 128, 128, 80.0, 800),
            },
        );

        let report = run(dir.path(), &ProtocolConfig::torso()).unwrap();

        assert_eq!(report.elements.len(), 1);
        let row = &report.elements[0];
        assert_eq!(row.element, "VAS1");
        assert!(row.signal_mean > 0.0);
        assert!(row.snr > 0.0);

        // The multi-label file went to the combined bucket (COR, no noise)
        assert!(report
            .diagnostics
            .iter()
            .any(|d| d.kind == DiagnosticKind::MissingPair && d.detail.contains("COR")));
    }

    #[test]
    fn test_element_rows_follow_enumeration_order() {
        let dir = tempfile::tempdir().unwrap();
        // Written in reverse discovery order on purpose
        for element in ["VPS1", "VAS2", "VAS1"] {
            write_dicom(
                &dir.path().join(format!("{}_image.dcm", element.to_lowercase())),
                Fixture {
                    series_description: "element scan",
                    coil_string: Some(element),
                    image_type: vec!["ORIGINAL", "PRIMARY"],
                    pixels: disk(128, 128, 64, 64, 30.0, 500),
                },
            );
            write_dicom(
                &dir.path().join(format!("{}_noise.dcm", element.to_lowercase())),
                Fixture {
                    series_description: "element noise",
                    coil_string: Some(element),
                    image_type: vec!["ORIGINAL", "PRIMARY"],
                    pixels: striped_noise(128, 128),
                },
            );
        }

        let report = run(dir.path(), &ProtocolConfig::torso()).unwrap();
        let order: Vec<_> = report.elements.iter().map(|r| r.element.as_str()).collect();
        assert_eq!(order, vec!["VAS1", "VAS2", "VPS1"]);
    }

    #[test]
    fn test_normalized_signal_preferred() {
        let dir = tempfile::tempdir().unwrap();
        write_dicom(
            &dir.path().join("sag_plain.dcm"),
            Fixture {
                series_description: "t2 sag phantom",
                coil_string: None,
                image_type: vec!["ORIGINAL", "PRIMARY"],
                pixels: disk(256, 256, 128, 128, 110.0, 400),
            },
        );
        write_dicom(
            &dir.path().join("sag_norm.dcm"),
            Fixture {
                series_description: "t2 sag phantom",
                coil_string: None,
                image_type: vec!["ORIGINAL", "PRIMARY", "NORM"],
                pixels: disk(256, 256, 128, 128, 110.0, 800),
            },
        );
        write_dicom(
            &dir.path().join("sag_noise.dcm"),
            Fixture {
                series_description: "t2 sag noise",
                coil_string: None,
                image_type: vec!["ORIGINAL", "PRIMARY"],
                pixels: striped_noise(256, 256),
            },
        );

        let report = run(dir.path(), &ProtocolConfig::head_neck()).unwrap();
        assert_eq!(report.combined.len(), 1);
        // The normalized acquisition (value 800) wins over the plain one
        assert_eq!(report.combined[0].signal_mean, 800.0);
    }

    #[test]
    fn test_blank_frames_dropped_before_classification() {
        let dir = tempfile::tempdir().unwrap();
        write_dicom(
            &dir.path().join("blank.dcm"),
            Fixture {
                series_description: "t2 sag phantom",
                coil_string: None,
                image_type: vec!["ORIGINAL", "PRIMARY", "NORM"],
                pixels: Array2::zeros((64, 64)),
            },
        );

        let report = run(dir.path(), &ProtocolConfig::head_neck()).unwrap();
        assert!(report.is_empty());
        assert!(report
            .diagnostics
            .iter()
            .any(|d| d.kind == DiagnosticKind::BlankFrame));
    }

    #[test]
    fn test_unclassifiable_file_is_dropped_with_diagnostic() {
        let dir = tempfile::tempdir().unwrap();
        write_dicom(
            &dir.path().join("calib.dcm"),
            Fixture {
                series_description: "adjustment frequency",
                coil_string: None,
                image_type: vec!["ORIGINAL", "PRIMARY"],
                pixels: disk(64, 64, 32, 32, 10.0, 100),
            },
        );

        let report = run(dir.path(), &ProtocolConfig::torso()).unwrap();
        assert!(report.is_empty());
        assert!(report
            .diagnostics
            .iter()
            .any(|d| d.kind == DiagnosticKind::UnclassifiedFile));
    }

    #[test]
    fn test_empty_folder_is_hard_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(run(dir.path(), &ProtocolConfig::torso()).is_err());
    }
}
