//! Layer definition document of an Esri map service (the `<layer url>?f=json` response).
//!
//! Symbols are kept as raw JSON values in the document and decoded only when the style table is built, so that a
//! symbol of an unsupported type is reported as [`EsriStyleError::UnsupportedSymbolKind`] instead of a generic
//! decoding error.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::EsriStyleError;
use crate::scale::{LinearUnit, ResolutionRange};

/// Layer description as returned by a map service.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerDefinition {
    /// Layer id in the service.
    #[serde(default)]
    pub id: Option<i64>,
    /// Layer name.
    #[serde(default)]
    pub name: Option<String>,
    /// Scale denominator beyond which the layer is not drawn when zooming out. `0` means no limit.
    #[serde(default)]
    pub min_scale: f64,
    /// Scale denominator beyond which the layer is not drawn when zooming in. `0` means no limit.
    #[serde(default)]
    pub max_scale: f64,
    /// Styling of the layer.
    #[serde(default)]
    pub drawing_info: DrawingInfo,
}

impl LayerDefinition {
    /// Parses a layer definition from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, EsriStyleError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Range of resolutions at which the layer is visible.
    pub fn resolution_range(&self, linear_unit: Option<LinearUnit>) -> ResolutionRange {
        // Esri `minScale` is the zoomed out end, so it limits the largest resolution.
        ResolutionRange::from_scales(
            self.max_scale,
            self.min_scale,
            linear_unit.map(|unit| unit.meters_per_unit()),
        )
    }
}

/// `drawingInfo` object of a layer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawingInfo {
    /// Renderer JSON. Decoded with [`Renderer::from_json`].
    #[serde(default)]
    pub renderer: Option<Value>,
    /// Label classes.
    #[serde(default)]
    pub labeling_info: Option<Vec<LabelingInfo>>,
    /// Layer transparency in percent, `0` being fully opaque.
    #[serde(default)]
    pub transparency: Option<f64>,
}

/// Renderer of a layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Renderer {
    /// Same symbol for every feature.
    Simple(SimpleRenderer),
    /// Symbol chosen by the values of up to three attributes.
    UniqueValue(UniqueValueRenderer),
    /// Symbol chosen by the range a numeric attribute falls into.
    ClassBreaks(ClassBreaksRenderer),
}

impl Renderer {
    /// Values of the `type` field this crate can read.
    pub const SUPPORTED_TYPES: [&'static str; 3] = ["simple", "uniqueValue", "classBreaks"];

    /// Decodes a renderer from its JSON representation.
    pub fn from_json(value: &Value) -> Result<Self, EsriStyleError> {
        let tag = value.get("type").and_then(Value::as_str).unwrap_or_default();
        if !Self::SUPPORTED_TYPES.contains(&tag) {
            return Err(EsriStyleError::UnsupportedRendererKind(tag.to_string()));
        }

        Ok(Self::deserialize(value)?)
    }
}

/// Simple renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleRenderer {
    /// Symbol JSON.
    pub symbol: Value,
    /// Legend label.
    #[serde(default)]
    pub label: Option<String>,
}

/// Unique value renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniqueValueRenderer {
    /// First attribute.
    #[serde(default)]
    pub field1: Option<String>,
    /// Second attribute.
    #[serde(default)]
    pub field2: Option<String>,
    /// Third attribute.
    #[serde(default)]
    pub field3: Option<String>,
    /// Separator of the attribute values in [`UniqueValueInfo::value`].
    #[serde(default)]
    pub field_delimiter: Option<String>,
    /// Symbol for features that match none of the values.
    #[serde(default)]
    pub default_symbol: Option<Value>,
    /// Legend label of the default symbol.
    #[serde(default)]
    pub default_label: Option<String>,
    /// Value classes.
    #[serde(default)]
    pub unique_value_infos: Vec<UniqueValueInfo>,
}

/// One value class of a unique value renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniqueValueInfo {
    /// Attribute values joined with the field delimiter.
    #[serde(deserialize_with = "string_or_number")]
    pub value: String,
    /// Legend label.
    #[serde(default)]
    pub label: Option<String>,
    /// Symbol JSON.
    pub symbol: Value,
}

/// Class breaks renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassBreaksRenderer {
    /// Numeric attribute the breaks apply to.
    pub field: String,
    /// Lower bound of the first class.
    #[serde(default)]
    pub min_value: Option<f64>,
    /// Symbol for features outside of all classes.
    #[serde(default)]
    pub default_symbol: Option<Value>,
    /// Legend label of the default symbol.
    #[serde(default)]
    pub default_label: Option<String>,
    /// Classes, in ascending order.
    #[serde(default)]
    pub class_break_infos: Vec<ClassBreakInfo>,
}

/// One class of a class breaks renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassBreakInfo {
    /// Lower bound of the class. If absent, the renderer minimum is used.
    #[serde(default)]
    pub class_min_value: Option<f64>,
    /// Upper bound of the class.
    pub class_max_value: f64,
    /// Legend label.
    #[serde(default)]
    pub label: Option<String>,
    /// Symbol JSON.
    pub symbol: Value,
}

/// Label class of a layer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelingInfo {
    /// Label expression, e.g. `[NAME] CONCAT " " CONCAT [TYPE]`.
    #[serde(default)]
    pub label_expression: Option<String>,
    /// Placement hint, e.g. `esriServerPointLabelPlacementAboveRight`.
    #[serde(default)]
    pub label_placement: Option<String>,
    /// Text symbol JSON.
    #[serde(default)]
    pub symbol: Value,
    /// Zoomed out visibility limit. `0` or absent means the label default.
    #[serde(default)]
    pub min_scale: Option<f64>,
    /// Zoomed in visibility limit. `0` or absent means no limit.
    #[serde(default)]
    pub max_scale: Option<f64>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        String(String),
        Number(serde_json::Number),
        Bool(bool),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::String(v) => v,
        Raw::Number(v) => v.to_string(),
        Raw::Bool(v) => v.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_layer_definition() {
        let layer = LayerDefinition::from_json_str(
            r#"{
                "id": 3,
                "name": "Parcels",
                "minScale": 50000,
                "maxScale": 0,
                "drawingInfo": {
                    "renderer": {"type": "simple", "symbol": {"type": "esriSLS"}},
                    "transparency": 20,
                    "labelingInfo": null
                }
            }"#,
        )
        .expect("failed to parse");

        assert_eq!(layer.name.as_deref(), Some("Parcels"));
        assert_eq!(layer.drawing_info.transparency, Some(20.0));
        assert!(layer.drawing_info.labeling_info.is_none());

        let renderer = Renderer::from_json(layer.drawing_info.renderer.as_ref().expect("no renderer"))
            .expect("invalid renderer");
        assert_matches!(renderer, Renderer::Simple(_));
    }

    #[test]
    fn layer_resolution_range() {
        let layer = LayerDefinition {
            min_scale: 1000.0,
            max_scale: 0.0,
            ..Default::default()
        };
        let range = layer.resolution_range(None);
        assert_eq!(range.min, 0.0);
        assert_relative_eq!(range.max, 0.28, epsilon = 1e-3);
    }

    #[test]
    fn unsupported_renderer() {
        let result = Renderer::from_json(&json!({"type": "heatmap"}));
        assert_matches!(result, Err(EsriStyleError::UnsupportedRendererKind(tag)) if tag == "heatmap");
    }

    #[test]
    fn unique_value_numbers_are_strings() {
        let renderer = Renderer::from_json(&json!({
            "type": "uniqueValue",
            "field1": "CODE",
            "uniqueValueInfos": [
                {"value": 12, "label": "Twelve", "symbol": {"type": "esriSFS"}},
                {"value": "13", "symbol": {"type": "esriSFS"}}
            ]
        }))
        .expect("invalid renderer");

        let Renderer::UniqueValue(renderer) = renderer else {
            panic!("wrong renderer type");
        };
        assert_eq!(renderer.unique_value_infos[0].value, "12");
        assert_eq!(renderer.unique_value_infos[1].value, "13");
        assert_eq!(renderer.unique_value_infos[1].label, None);
    }

    #[test]
    fn class_breaks_renderer() {
        let renderer = Renderer::from_json(&json!({
            "type": "classBreaks",
            "field": "VALUE",
            "minValue": 0,
            "classBreakInfos": [
                {"classMaxValue": 10, "symbol": {"type": "esriSFS"}},
                {"classMinValue": 10, "classMaxValue": 20, "label": "High", "symbol": {"type": "esriSFS"}}
            ]
        }))
        .expect("invalid renderer");

        let Renderer::ClassBreaks(renderer) = renderer else {
            panic!("wrong renderer type");
        };
        assert_eq!(renderer.min_value, Some(0.0));
        assert_eq!(renderer.class_break_infos[0].class_min_value, None);
        assert_eq!(renderer.class_break_infos[1].class_min_value, Some(10.0));
    }
}
