use thiserror::Error;

/// Result type for phantomqa operations
pub type Result<T> = std::result::Result<T, PhantomQaError>;

/// Error types for phantomqa operations
#[derive(Error, Debug)]
pub enum PhantomQaError {
    /// DICOM reading error
    #[error("DICOM error: {0}")]
    DicomError(String),

    /// Pixel data decoding error
    #[error("Pixel data error: {0}")]
    PixelDataError(String),

    /// Invalid tag value
    #[error("Invalid tag value: {0}")]
    InvalidValue(String),

    /// No DICOM-decodable files in the input folder
    ///
    /// Distinguishes "could not read anything" from a run that read files
    /// but matched no orientation or element.
    #[error("No readable DICOM files found in {0}")]
    NoInputFiles(String),

    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

// Helper conversions
impl From<String> for PhantomQaError {
    fn from(s: String) -> Self {
        PhantomQaError::InvalidValue(s)
    }
}

// Convert dicom-object errors
impl From<dicom_object::ReadError> for PhantomQaError {
    fn from(e: dicom_object::ReadError) -> Self {
        PhantomQaError::DicomError(format!("{}", e))
    }
}

impl From<dicom_core::value::ConvertValueError> for PhantomQaError {
    fn from(e: dicom_core::value::ConvertValueError) -> Self {
        PhantomQaError::InvalidValue(format!("{}", e))
    }
}

impl From<dicom_pixeldata::Error> for PhantomQaError {
    fn from(e: dicom_pixeldata::Error) -> Self {
        PhantomQaError::PixelDataError(format!("{}", e))
    }
}
