use crate::error::{Result, StudioError};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw image bytes plus their mime type.
///
/// Serialized as a `data:<mime>;base64,<payload>` URL so saved artifacts stay
/// a single self-contained JSON document.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ImageData {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageData {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub fn png(bytes: Vec<u8>) -> Self {
        Self::new(bytes, "image/png")
    }

    pub fn from_base64(data: &str, mime_type: impl Into<String>) -> Result<Self> {
        let bytes = STANDARD
            .decode(data.trim().as_bytes())
            .map_err(|e| StudioError::Serialization(format!("invalid base64 image: {}", e)))?;
        Ok(Self::new(bytes, mime_type))
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    /// Parses `data:image/png;base64,...`. A header without a mime type falls
    /// back to `image/jpeg`.
    pub fn from_data_url(url: &str) -> Result<Self> {
        let (header, data) = url.split_once(',').ok_or_else(|| {
            StudioError::Serialization("Invalid data URL format: missing ','".into())
        })?;

        let mime_type = header
            .split_once(':')
            .and_then(|(_, rest)| rest.split(';').next())
            .filter(|mime| !mime.is_empty())
            .unwrap_or("image/jpeg");

        Self::from_base64(data, mime_type)
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.to_base64())
    }

    pub fn extension(&self) -> &'static str {
        match self.mime_type.as_str() {
            "image/jpeg" | "image/jpg" => "jpg",
            "image/webp" => "webp",
            "image/gif" => "gif",
            _ => "png",
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for ImageData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageData")
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl TryFrom<String> for ImageData {
    type Error = StudioError;

    fn try_from(value: String) -> Result<Self> {
        Self::from_data_url(&value)
    }
}

impl From<ImageData> for String {
    fn from(image: ImageData) -> Self {
        image.to_data_url()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "16:9")]
    Widescreen,
    #[serde(rename = "3:4")]
    PortraitTall,
}

impl AspectRatio {
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Widescreen => "16:9",
            AspectRatio::PortraitTall => "3:4",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageQuality {
    Ultra,
    #[default]
    Balanced,
    Fastest,
}

impl ImageQuality {
    pub const ALL: [ImageQuality; 3] = [
        ImageQuality::Ultra,
        ImageQuality::Balanced,
        ImageQuality::Fastest,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ImageQuality::Ultra => "Ultra Quality",
            ImageQuality::Balanced => "Balanced",
            ImageQuality::Fastest => "Fastest",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ImageQuality::Ultra => "Highest detail, takes more time.",
            ImageQuality::Balanced => "Good quality and speed.",
            ImageQuality::Fastest => "Lower detail, quicker results.",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ImagenPredictResponse {
    #[serde(default)]
    pub predictions: Vec<ImagenPrediction>,
}

#[derive(Debug, Deserialize)]
pub struct ImagenPrediction {
    #[serde(rename = "bytesBase64Encoded")]
    pub bytes_base64_encoded: Option<String>,
    #[serde(rename = "mimeType")]
    pub mime_type: Option<String>,
    #[serde(rename = "raiFilteredReason")]
    pub rai_filtered_reason: Option<String>,
}

/// Response body of the Stability models on Bedrock.
#[derive(Debug, Deserialize)]
pub struct StabilityImageResponse {
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub finish_reasons: Vec<Option<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_url_parsing() {
        let image = ImageData::from_data_url("data:image/webp;base64,AQID").unwrap();
        assert_eq!(image.mime_type, "image/webp");
        assert_eq!(image.bytes, vec![1, 2, 3]);
        assert_eq!(image.extension(), "webp");
        assert_eq!(image.to_data_url(), "data:image/webp;base64,AQID");
    }

    #[test]
    fn test_data_url_without_mime_defaults_to_jpeg() {
        let image = ImageData::from_data_url("data:;base64,AQID").unwrap();
        assert_eq!(image.mime_type, "image/jpeg");
    }

    #[test]
    fn test_data_url_rejects_missing_payload() {
        assert!(ImageData::from_data_url("data:image/png;base64").is_err());
        assert!(ImageData::from_data_url("data:image/png;base64,@@@").is_err());
    }

    #[test]
    fn test_image_serializes_as_data_url() {
        let json = serde_json::to_string(&ImageData::png(vec![0xff])).unwrap();
        assert_eq!(json, "\"data:image/png;base64,/w==\"");
    }

    #[test]
    fn test_aspect_ratio_wire_names() {
        assert_eq!(
            serde_json::to_string(&AspectRatio::PortraitTall).unwrap(),
            "\"3:4\""
        );
        let parsed: AspectRatio = serde_json::from_str("\"16:9\"").unwrap();
        assert_eq!(parsed, AspectRatio::Widescreen);
    }
}
