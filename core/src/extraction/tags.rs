use dicom_core::Tag;
use dicom_object::InMemDicomObject;

// Standard tags used by the classifier and loader
pub use dicom_dictionary_std::tags::{
    IMAGE_TYPE, INSTANCE_NUMBER, PIXEL_DATA, PIXEL_SPACING, SERIES_DESCRIPTION,
};

/// Private coil-element tag: semicolon-delimited receive-element labels
pub const COIL_STRING: Tag = Tag(0x0051, 0x100F);

/// Helper to get string value from DICOM tag
///
/// Returns `None` if the tag is not present or cannot be converted to string
pub fn get_string_value(dcm: &InMemDicomObject, tag: Tag) -> Option<String> {
    dcm.element(tag)
        .ok()
        .and_then(|elem| elem.to_str().ok())
        .map(|s| s.trim().to_string())
}

/// Helper to get integer value from DICOM tag
///
/// Returns `None` if the tag is not present or cannot be converted to i32
pub fn get_int_value(dcm: &InMemDicomObject, tag: Tag) -> Option<i32> {
    dcm.element(tag)
        .ok()
        .and_then(|elem| elem.to_int::<i32>().ok())
}

/// Helper to get multi-string value from DICOM tag
///
/// Returns `None` if the tag is not present or cannot be converted to Vec<String>
pub fn get_multi_string_value(dcm: &InMemDicomObject, tag: Tag) -> Option<Vec<String>> {
    dcm.element(tag).ok().and_then(|elem| {
        // Try to get as multi-string
        if let Ok(strs) = elem.to_multi_str() {
            Some(strs.iter().map(|s| s.to_string()).collect())
        } else {
            // Fallback: try to get as single string and split by backslash
            elem.to_str()
                .ok()
                .map(|s| s.split('\\').map(|part| part.trim().to_string()).collect())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coil_string_tag() {
        assert_eq!(COIL_STRING, Tag(0x0051, 0x100F));
    }

    #[test]
    fn test_standard_tags() {
        assert_eq!(SERIES_DESCRIPTION, Tag(0x0008, 0x103E));
        assert_eq!(IMAGE_TYPE, Tag(0x0008, 0x0008));
        assert_eq!(PIXEL_SPACING, Tag(0x0028, 0x0030));
    }
}
