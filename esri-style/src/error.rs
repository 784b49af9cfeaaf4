//! Error types used by the crate.

use thiserror::Error;

#[cfg(feature = "image")]
use image::ImageError;

/// Esri style error type.
#[derive(Debug, Error)]
pub enum EsriStyleError {
    /// The drawing info has no renderer, so no feature style can be created.
    #[error("renderer is not defined")]
    MissingRenderer,
    /// Renderer `type` is not one of `simple`, `uniqueValue` or `classBreaks`.
    #[error("renderer type \"{0}\" is not supported")]
    UnsupportedRendererKind(String),
    /// Symbol `type` is not one of the supported `esri*` symbol types.
    #[error("symbol type \"{0}\" is not supported")]
    UnsupportedSymbolKind(String),
    /// A default rule was placed before conditional rules and would shadow them.
    #[error("default rule at position {index} must be the last rule")]
    MisplacedDefaultRule {
        /// Position of the offending rule.
        index: usize,
    },
    /// Input JSON does not match the expected shape.
    #[error("failed to decode style document: {0}")]
    Decoding(#[from] serde_json::Error),
    /// Embedded image of a picture symbol could not be decoded.
    #[error("image decode error: {0}")]
    ImageDecode(String),
    /// I/O error while loading the style document.
    #[error("failed to load style document")]
    IO,
}

#[cfg(feature = "image")]
impl From<ImageError> for EsriStyleError {
    fn from(value: ImageError) -> Self {
        Self::ImageDecode(value.to_string())
    }
}

impl From<base64::DecodeError> for EsriStyleError {
    fn from(value: base64::DecodeError) -> Self {
        Self::ImageDecode(value.to_string())
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for EsriStyleError {
    fn from(value: reqwest::Error) -> Self {
        log::warn!("Style document request failed: {value}");
        Self::IO
    }
}
