//! Connected-component analysis and phantom localization

use super::threshold::otsu_threshold;
use log::warn;
use ndarray::Array2;

const OTSU_BINS: usize = 256;

/// Location of the dominant bright circular object in an image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhantomDisk {
    pub center_row: usize,
    pub center_col: usize,
    /// Equivalent-area circle radius, `sqrt(area / pi)`
    pub radius_px: f64,
    /// False when detection fell back to the geometric center
    pub detected: bool,
}

#[derive(Debug)]
struct Component {
    area: usize,
    sum_row: f64,
    sum_col: f64,
}

impl Component {
    fn centroid(&self) -> (usize, usize) {
        (
            (self.sum_row / self.area as f64) as usize,
            (self.sum_col / self.area as f64) as usize,
        )
    }
}

/// Finds the centroid and radius of the largest bright connected region
///
/// Binarizes at the Otsu threshold, removes components smaller than
/// `min_component_px`, and reports the largest survivor. When no component
/// survives, falls back to the image center with a radius of one quarter of
/// the smaller dimension (`detected = false`).
pub fn locate_phantom(image: &Array2<f64>, min_component_px: usize) -> PhantomDisk {
    let (height, width) = image.dim();
    let threshold = otsu_threshold(image, OTSU_BINS);
    let binary = image.mapv(|v| v > threshold);

    let largest = connected_components(&binary)
        .into_iter()
        .filter(|c| c.area >= min_component_px)
        .max_by_key(|c| c.area);

    match largest {
        Some(component) => {
            let (center_row, center_col) = component.centroid();
            PhantomDisk {
                center_row,
                center_col,
                radius_px: (component.area as f64 / std::f64::consts::PI).sqrt(),
                detected: true,
            }
        }
        None => {
            warn!("No circular object detected, using image center as fallback");
            PhantomDisk {
                center_row: height / 2,
                center_col: width / 2,
                radius_px: (height.min(width) / 4) as f64,
                detected: false,
            }
        }
    }
}

/// Labels 8-connected foreground components and accumulates their area and
/// centroid sums
fn connected_components(binary: &Array2<bool>) -> Vec<Component> {
    let (height, width) = binary.dim();
    let mut visited = Array2::from_elem((height, width), false);
    let mut components = Vec::new();
    let mut stack = Vec::new();

    for row in 0..height {
        for col in 0..width {
            if !binary[(row, col)] || visited[(row, col)] {
                continue;
            }

            let mut component = Component {
                area: 0,
                sum_row: 0.0,
                sum_col: 0.0,
            };
            visited[(row, col)] = true;
            stack.push((row, col));

            while let Some((r, c)) = stack.pop() {
                component.area += 1;
                component.sum_row += r as f64;
                component.sum_col += c as f64;

                let r_lo = r.saturating_sub(1);
                let c_lo = c.saturating_sub(1);
                for nr in r_lo..=(r + 1).min(height - 1) {
                    for nc in c_lo..=(c + 1).min(width - 1) {
                        if binary[(nr, nc)] && !visited[(nr, nc)] {
                            visited[(nr, nc)] = true;
                            stack.push((nr, nc));
                        }
                    }
                }
            }

            components.push(component);
        }
    }

    components
}
