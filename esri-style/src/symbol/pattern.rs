//! Loading of the embedded images of picture fill symbols.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::EsriStyleError;

/// An image that has been loaded into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// Raw bytes of the image, in RGBA order.
    pub(crate) bytes: Vec<u8>,
    /// Width and height of the image.
    pub(crate) dimensions: (u32, u32),
}

impl DecodedImage {
    /// Decode an image from a byte slice.
    ///
    /// Attempts to guess the format of the image from the data. Non-RGBA images
    /// will be converted to RGBA.
    #[cfg(feature = "image")]
    pub fn new(bytes: &[u8]) -> Result<Self, EsriStyleError> {
        use image::GenericImageView;
        let decoded = image::load_from_memory(bytes)?;
        let bytes = decoded.to_rgba8();
        let dimensions = decoded.dimensions();

        Ok(Self {
            bytes: bytes.into_vec(),
            dimensions,
        })
    }

    /// Creates an image from raw RGBA bytes.
    ///
    /// Returns an error if the buffer size does not match the dimensions.
    pub fn from_raw(bytes: Vec<u8>, width: u32, height: u32) -> Result<Self, EsriStyleError> {
        if bytes.len() != width as usize * height as usize * 4 {
            return Err(EsriStyleError::ImageDecode(format!(
                "expected {width}x{height} RGBA buffer, got {} bytes",
                bytes.len()
            )));
        }

        Ok(Self {
            bytes,
            dimensions: (width, height),
        })
    }

    /// RGBA pixel data.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Width of the image in pixels.
    pub fn width(&self) -> u32 {
        self.dimensions.0
    }

    /// Height of the image in pixels.
    pub fn height(&self) -> u32 {
        self.dimensions.1
    }
}

/// Turns the embedded image of a picture fill symbol into a pattern tile.
///
/// Decoding is the only asynchronous step of symbol reading. The translator awaits all patterns before the style
/// table is returned, so the draw path never sees a pattern that is still loading.
#[async_trait]
pub trait PatternLoader: Send + Sync {
    /// Decodes a base64 encoded image with the given media type.
    async fn load_pattern(
        &self,
        image_data: &str,
        content_type: Option<&str>,
    ) -> Result<DecodedImage, EsriStyleError>;
}

/// Pattern loader that decodes images in place with the `image` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbeddedPatternLoader;

#[async_trait]
impl PatternLoader for EmbeddedPatternLoader {
    async fn load_pattern(
        &self,
        image_data: &str,
        content_type: Option<&str>,
    ) -> Result<DecodedImage, EsriStyleError> {
        let bytes = STANDARD.decode(image_data.trim())?;
        log::trace!(
            "Decoding {} pattern of {} bytes",
            content_type.unwrap_or("unknown"),
            bytes.len()
        );

        decode_bytes(&bytes)
    }
}

#[cfg(feature = "image")]
fn decode_bytes(bytes: &[u8]) -> Result<DecodedImage, EsriStyleError> {
    DecodedImage::new(bytes)
}

#[cfg(not(feature = "image"))]
fn decode_bytes(_bytes: &[u8]) -> Result<DecodedImage, EsriStyleError> {
    Err(EsriStyleError::ImageDecode(
        "image decoding is disabled, enable the `image` feature".into(),
    ))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    // 1x1 red PNG.
    const RED_PIXEL_PNG: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8DwHwAFBQIAX8jx0gAAAABJRU5ErkJggg==";

    #[cfg(feature = "image")]
    #[test]
    fn decodes_embedded_png() {
        let image = tokio_test::block_on(
            EmbeddedPatternLoader.load_pattern(RED_PIXEL_PNG, Some("image/png")),
        )
        .expect("failed to decode");

        assert_eq!(image.width(), 1);
        assert_eq!(image.height(), 1);
        assert_eq!(image.bytes().len(), 4);
    }

    #[test]
    fn invalid_base64_is_decode_error() {
        let result = tokio_test::block_on(EmbeddedPatternLoader.load_pattern("not base64!", None));
        assert_matches!(result, Err(EsriStyleError::ImageDecode(_)));
    }

    #[test]
    fn garbage_bytes_are_decode_error() {
        let result = tokio_test::block_on(EmbeddedPatternLoader.load_pattern("AAAA", None));
        assert_matches!(result, Err(EsriStyleError::ImageDecode(_)));
    }

    #[test]
    fn raw_buffer_size_is_checked() {
        assert!(DecodedImage::from_raw(vec![0; 16], 2, 2).is_ok());
        assert_matches!(
            DecodedImage::from_raw(vec![0; 15], 2, 2),
            Err(EsriStyleError::ImageDecode(_))
        );
    }
}
