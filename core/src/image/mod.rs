//! Pixel-level operations: decoding, thresholding, and phantom detection

pub mod loader;
pub mod regions;
pub mod threshold;

pub use loader::{load_scan_image, ScanImage};
pub use regions::{locate_phantom, PhantomDisk};
pub use threshold::otsu_threshold;
