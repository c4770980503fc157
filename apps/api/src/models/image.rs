use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Image formats a browser can display inline in the preview.
pub const ACCEPTED_IMAGE_TYPES: &[&str] = &[
    "image/png",
    "image/jpeg",
    "image/gif",
    "image/webp",
    "image/svg+xml",
];

#[derive(Debug, Error, PartialEq)]
pub enum ImageError {
    #[error("Unsupported image type '{0}'")]
    UnsupportedType(String),

    #[error("Image size should be less than {limit_mb}MB")]
    TooLarge { size: usize, limit_mb: usize },

    #[error("Profile image must be a base64 data URI")]
    MalformedDataUri,

    #[error("Profile image is empty")]
    Empty,
}

/// Profile picture carried inside the document being built.
///
/// Stored as raw bytes; templates embed it as a `data:` URI.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProfileImage {
    mime: String,
    bytes: Bytes,
}

impl ProfileImage {
    pub fn new(mime: &str, bytes: Bytes) -> Result<Self, ImageError> {
        let mime = mime.trim().to_ascii_lowercase();
        if !ACCEPTED_IMAGE_TYPES.contains(&mime.as_str()) {
            return Err(ImageError::UnsupportedType(mime));
        }
        if bytes.is_empty() {
            return Err(ImageError::Empty);
        }
        Ok(Self { mime, bytes })
    }

    /// Parses `data:<mime>;base64,<payload>`.
    pub fn from_data_uri(uri: &str) -> Result<Self, ImageError> {
        let rest = uri
            .trim()
            .strip_prefix("data:")
            .ok_or(ImageError::MalformedDataUri)?;
        let (header, payload) = rest.split_once(',').ok_or(ImageError::MalformedDataUri)?;
        let mime = header
            .strip_suffix(";base64")
            .ok_or(ImageError::MalformedDataUri)?;
        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|_| ImageError::MalformedDataUri)?;
        Self::new(mime, Bytes::from(bytes))
    }

    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Rejects images above `limit` bytes with the user-facing size message.
    pub fn ensure_within(&self, limit: usize) -> Result<(), ImageError> {
        check_size(self.len(), limit)
    }
}

pub fn check_size(size: usize, limit: usize) -> Result<(), ImageError> {
    if size > limit {
        return Err(ImageError::TooLarge {
            size,
            limit_mb: (limit / (1024 * 1024)).max(1),
        });
    }
    Ok(())
}

// Keeps multi-megabyte payloads out of log lines.
impl fmt::Debug for ProfileImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProfileImage")
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl TryFrom<String> for ProfileImage {
    type Error = ImageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_data_uri(&value)
    }
}

impl From<ProfileImage> for String {
    fn from(value: ProfileImage) -> Self {
        value.to_data_uri()
    }
}
