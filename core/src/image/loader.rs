use crate::error::{PhantomQaError, Result};
use crate::extraction::tags::{get_string_value, PIXEL_SPACING};
use crate::types::PixelSpacing;
use dicom_object::open_file;
use dicom_pixeldata::PixelDecoder;
use ndarray::{s, Array2, Ix4};
use std::path::Path;

/// One decoded scan: rescaled intensities plus pixel spacing
///
/// Owned by the caller for the duration of one metric computation and
/// discarded afterwards; nothing is cached across runs.
#[derive(Debug, Clone)]
pub struct ScanImage {
    pub pixels: Array2<f64>,
    pub spacing: PixelSpacing,
}

impl ScanImage {
    pub fn height(&self) -> usize {
        self.pixels.nrows()
    }

    pub fn width(&self) -> usize {
        self.pixels.ncols()
    }
}

/// Decodes a DICOM file into a 2-D intensity array plus pixel spacing
///
/// The first frame and first sample are taken; rescale slope/intercept are
/// applied by the decoder when present. Missing PixelSpacing defaults to
/// 1.0 x 1.0 mm.
///
/// # Errors
///
/// Returns an error when the file cannot be opened or its pixel data
/// cannot be decoded.
pub fn load_scan_image(path: &Path) -> Result<ScanImage> {
    let obj = open_file(path)?;

    let spacing = get_string_value(&obj, PIXEL_SPACING)
        .and_then(|s| PixelSpacing::parse(&s).ok())
        .unwrap_or_default();

    let decoded = obj.decode_pixel_data()?;
    // [frames, rows, cols, samples]
    let volume = decoded
        .to_ndarray::<f64>()?
        .into_dimensionality::<Ix4>()
        .map_err(|e| PhantomQaError::PixelDataError(format!("{}", e)))?;
    let pixels = volume.slice(s![0, .., .., 0]).to_owned();

    Ok(ScanImage { pixels, spacing })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_image_dimensions() {
        let scan = ScanImage {
            pixels: Array2::zeros((64, 32)),
            spacing: PixelSpacing::default(),
        };
        assert_eq!(scan.height(), 64);
        assert_eq!(scan.width(), 32);
    }
}
