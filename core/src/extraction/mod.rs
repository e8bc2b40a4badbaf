pub mod classify;
pub mod tags;

pub use classify::{classify_files, classify_folder, collect_dicom_files, is_dicom_file, Classification, ScanMeta};
pub use tags::*;
