use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::InputValidationError;

pub const REQUIRED_IMAGES: usize = 14;
pub const DEFAULT_MIME_TYPE: &str = "image/jpeg";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePart {
    pub data: Vec<u8>,
    pub mime_type: String,
}

impl ImagePart {
    pub fn new(data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            data,
            mime_type: mime_type.into(),
        }
    }

    /// Decode an uploaded image.
    ///
    /// `data` is either bare base64 or a data URL such as
    /// `data:image/png;base64,iVBOR...`; a MIME type inside the data URL wins
    /// over `mime_type`.
    pub fn from_payload(mime_type: Option<&str>, data: &str) -> Result<Self, String> {
        let (url_mime, encoded) = split_data_url(data.trim());
        let mime_type = url_mime
            .or(mime_type)
            .unwrap_or(DEFAULT_MIME_TYPE)
            .trim()
            .to_ascii_lowercase();

        if !mime_type.starts_with("image/") {
            return Err(format!("unsupported MIME type {}", mime_type));
        }

        let bytes = STANDARD
            .decode(encoded)
            .map_err(|e| format!("invalid base64: {}", e))?;
        if bytes.is_empty() {
            return Err("image data is empty".to_string());
        }

        Ok(Self::new(bytes, mime_type))
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.data)
    }
}

fn split_data_url(data: &str) -> (Option<&str>, &str) {
    let Some(rest) = data.strip_prefix("data:") else {
        return (None, data);
    };
    match rest.split_once(',') {
        Some((header, payload)) => {
            let mime = header.split(';').next().filter(|m| !m.is_empty());
            (mime, payload)
        }
        None => (None, rest),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageLimits {
    pub required_count: usize,
    pub max_image_bytes: usize,
    pub max_total_bytes: usize,
}

impl Default for ImageLimits {
    fn default() -> Self {
        Self {
            required_count: REQUIRED_IMAGES,
            max_image_bytes: 10 * 1024 * 1024,
            max_total_bytes: 40 * 1024 * 1024,
        }
    }
}

/// Check a generation request before anything is sent upstream
pub fn validate_request(
    images: &[ImagePart],
    keyword: &str,
    limits: &ImageLimits,
) -> Result<(), InputValidationError> {
    if images.len() != limits.required_count {
        return Err(InputValidationError::ImageCount {
            expected: limits.required_count,
            actual: images.len(),
        });
    }

    if keyword.trim().is_empty() {
        return Err(InputValidationError::EmptyKeyword);
    }

    let mut total = 0;
    for (index, image) in images.iter().enumerate() {
        if image.data.is_empty() {
            return Err(InputValidationError::InvalidImage {
                index,
                reason: "image data is empty".to_string(),
            });
        }
        if image.data.len() > limits.max_image_bytes {
            return Err(InputValidationError::PayloadTooLarge {
                size: image.data.len(),
                limit: limits.max_image_bytes,
            });
        }
        total += image.data.len();
    }

    if total > limits.max_total_bytes {
        return Err(InputValidationError::PayloadTooLarge {
            size: total,
            limit: limits.max_total_bytes,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn images(count: usize, size: usize) -> Vec<ImagePart> {
        (0..count)
            .map(|_| ImagePart::new(vec![0xFF; size], "image/jpeg"))
            .collect()
    }

    #[test]
    fn test_data_url_is_decoded() {
        let part = ImagePart::from_payload(None, "data:image/png;base64,aGVsbG8=").unwrap();

        assert_eq!(part.mime_type, "image/png");
        assert_eq!(part.data, b"hello");
        assert_eq!(part.to_base64(), "aGVsbG8=");
    }

    #[test]
    fn test_bare_base64_uses_given_mime() {
        let part = ImagePart::from_payload(Some("image/webp"), "aGVsbG8=").unwrap();
        assert_eq!(part.mime_type, "image/webp");

        let part = ImagePart::from_payload(None, "aGVsbG8=").unwrap();
        assert_eq!(part.mime_type, DEFAULT_MIME_TYPE);
    }

    #[test]
    fn test_rejects_non_image_and_bad_base64() {
        assert!(ImagePart::from_payload(Some("text/plain"), "aGVsbG8=").is_err());
        assert!(ImagePart::from_payload(None, "data:image/png;base64,@@@").is_err());
        assert!(ImagePart::from_payload(None, "").is_err());
    }

    #[test]
    fn test_valid_request() {
        let result = validate_request(&images(14, 16), "호치민", &ImageLimits::default());
        assert_eq!(result, Ok(()));
    }

    #[test]
    fn test_wrong_image_count() {
        let result = validate_request(&images(13, 16), "호치민", &ImageLimits::default());
        assert_eq!(
            result,
            Err(InputValidationError::ImageCount {
                expected: 14,
                actual: 13
            })
        );
    }

    #[test]
    fn test_blank_keyword() {
        let result = validate_request(&images(14, 16), "   ", &ImageLimits::default());
        assert_eq!(result, Err(InputValidationError::EmptyKeyword));
    }

    #[test]
    fn test_size_limits() {
        let limits = ImageLimits {
            required_count: 2,
            max_image_bytes: 10,
            max_total_bytes: 15,
        };

        assert_eq!(
            validate_request(&images(2, 11), "k", &limits),
            Err(InputValidationError::PayloadTooLarge { size: 11, limit: 10 })
        );
        assert_eq!(
            validate_request(&images(2, 8), "k", &limits),
            Err(InputValidationError::PayloadTooLarge { size: 16, limit: 15 })
        );
    }
}
