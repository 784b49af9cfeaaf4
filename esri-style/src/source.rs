//! Sources of layer definition documents.

use async_trait::async_trait;

use crate::document::LayerDefinition;
use crate::error::EsriStyleError;

/// Loads the definition of a map service layer.
#[async_trait]
pub trait StyleSource: Send + Sync {
    /// Loads the layer definition.
    async fn load(&self) -> Result<LayerDefinition, EsriStyleError>;
}

/// Layer definition given as a JSON string.
#[derive(Debug, Clone)]
pub struct JsonStyleSource {
    json: String,
}

impl JsonStyleSource {
    /// Creates a source from a JSON document.
    pub fn new(json: impl Into<String>) -> Self {
        Self { json: json.into() }
    }
}

#[async_trait]
impl StyleSource for JsonStyleSource {
    async fn load(&self) -> Result<LayerDefinition, EsriStyleError> {
        LayerDefinition::from_json_str(&self.json)
    }
}

#[async_trait]
impl StyleSource for LayerDefinition {
    async fn load(&self) -> Result<LayerDefinition, EsriStyleError> {
        Ok(self.clone())
    }
}

/// Url of the JSON description of a layer: `<layer url>?f=json`.
pub fn layer_json_url(layer_url: &str) -> String {
    let layer_url = layer_url.trim_end_matches('/');
    if layer_url.contains('?') {
        format!("{layer_url}&f=json")
    } else {
        format!("{layer_url}?f=json")
    }
}

#[cfg(feature = "http")]
pub use remote::UrlStyleSource;

#[cfg(feature = "http")]
mod remote {
    use async_trait::async_trait;
    use log::info;

    use super::{layer_json_url, StyleSource};
    use crate::document::LayerDefinition;
    use crate::error::EsriStyleError;

    /// Loads the layer definition from a map service, e.g.
    /// `https://sampleserver6.arcgisonline.com/arcgis/rest/services/Census/MapServer/3`.
    #[derive(Debug, Clone)]
    pub struct UrlStyleSource {
        url: String,
        http_client: reqwest::Client,
    }

    impl UrlStyleSource {
        /// Creates a source for the layer at `layer_url`.
        pub fn new(layer_url: &str) -> Result<Self, EsriStyleError> {
            let http_client = reqwest::Client::builder()
                .user_agent(concat!("esri-style/", env!("CARGO_PKG_VERSION")))
                .build()?;

            Ok(Self::with_client(layer_url, http_client))
        }

        /// Creates a source that uses the given client. Timeouts and proxies are configured on the client.
        pub fn with_client(layer_url: &str, http_client: reqwest::Client) -> Self {
            Self {
                url: layer_json_url(layer_url),
                http_client,
            }
        }
    }

    #[async_trait]
    impl StyleSource for UrlStyleSource {
        async fn load(&self) -> Result<LayerDefinition, EsriStyleError> {
            let response = self.http_client.get(&self.url).send().await?;
            if !response.status().is_success() {
                info!(
                    "Failed to load {}: {}, {:?}",
                    self.url,
                    response.status(),
                    response.text().await
                );
                return Err(EsriStyleError::IO);
            }

            let bytes = response.bytes().await?;
            let value: serde_json::Value = serde_json::from_slice(&bytes)?;
            // Map services report errors with a success status and an `error` object.
            if let Some(error) = value.get("error") {
                info!("Map service returned an error for {}: {error}", self.url);
                return Err(EsriStyleError::IO);
            }

            Ok(serde_json::from_value(value)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn json_url() {
        assert_eq!(
            layer_json_url("https://example.com/arcgis/rest/services/Roads/MapServer/0"),
            "https://example.com/arcgis/rest/services/Roads/MapServer/0?f=json"
        );
        assert_eq!(
            layer_json_url("https://example.com/MapServer/0/"),
            "https://example.com/MapServer/0?f=json"
        );
        assert_eq!(
            layer_json_url("https://example.com/MapServer/0?token=abc"),
            "https://example.com/MapServer/0?token=abc&f=json"
        );
    }

    #[test]
    fn json_source() {
        let source = JsonStyleSource::new(
            r#"{"name": "Roads", "drawingInfo": {"renderer": {"type": "simple", "symbol": {"type": "esriSLS"}}}}"#,
        );
        let layer = tokio_test::block_on(source.load()).expect("failed to load");
        assert_eq!(layer.name.as_deref(), Some("Roads"));

        let result = tokio_test::block_on(JsonStyleSource::new("{").load());
        assert_matches!(result, Err(EsriStyleError::Decoding(_)));
    }
}
