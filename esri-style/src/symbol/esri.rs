//! Esri symbol objects as they appear in the `drawingInfo` of a map service layer.
//!
//! See <https://developers.arcgis.com/documentation/common-data-types/symbol-objects.htm>.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::EsriStyleError;

/// Esri symbol, decoded by its `type` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EsriSymbol {
    /// `esriSMS`, drawn as a circle.
    #[serde(rename = "esriSMS")]
    SimpleMarker(SimpleMarkerSymbol),
    /// `esriSLS`.
    #[serde(rename = "esriSLS")]
    SimpleLine(SimpleLineSymbol),
    /// `esriSFS`.
    #[serde(rename = "esriSFS")]
    SimpleFill(SimpleFillSymbol),
    /// `esriPMS`.
    #[serde(rename = "esriPMS")]
    PictureMarker(PictureMarkerSymbol),
    /// `esriPFS`.
    #[serde(rename = "esriPFS")]
    PictureFill(PictureFillSymbol),
    /// `esriTS`.
    #[serde(rename = "esriTS")]
    Text(EsriTextSymbol),
}

impl EsriSymbol {
    /// Values of the `type` field this crate can read.
    pub const SUPPORTED_TYPES: [&'static str; 6] =
        ["esriSMS", "esriSLS", "esriSFS", "esriPMS", "esriPFS", "esriTS"];

    /// Decodes a symbol from its JSON representation.
    ///
    /// Fails with [`EsriStyleError::UnsupportedSymbolKind`] if the `type` field is missing or unknown, and with
    /// [`EsriStyleError::Decoding`] if the symbol fields have unexpected types.
    pub fn from_json(value: &Value) -> Result<Self, EsriStyleError> {
        let tag = value.get("type").and_then(Value::as_str).unwrap_or_default();
        if !Self::SUPPORTED_TYPES.contains(&tag) {
            return Err(EsriStyleError::UnsupportedSymbolKind(tag.to_string()));
        }

        Ok(Self::deserialize(value)?)
    }

    /// Esri name of the symbol type.
    pub fn type_name(&self) -> &'static str {
        match self {
            EsriSymbol::SimpleMarker(_) => "esriSMS",
            EsriSymbol::SimpleLine(_) => "esriSLS",
            EsriSymbol::SimpleFill(_) => "esriSFS",
            EsriSymbol::PictureMarker(_) => "esriPMS",
            EsriSymbol::PictureFill(_) => "esriPFS",
            EsriSymbol::Text(_) => "esriTS",
        }
    }
}

/// Simple marker symbol (`esriSMS`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SimpleMarkerSymbol {
    /// Fill color.
    #[serde(default)]
    pub color: Option<Vec<f64>>,
    /// Diameter of the marker in points.
    #[serde(default)]
    pub size: f64,
    /// Outline of the marker.
    #[serde(default)]
    pub outline: Option<SimpleLineSymbol>,
}

/// Simple line symbol (`esriSLS`). Also used as the outline of markers and fills.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SimpleLineSymbol {
    /// Line style.
    #[serde(default)]
    pub style: Option<LineStyle>,
    /// Line color.
    #[serde(default)]
    pub color: Option<Vec<f64>>,
    /// Line width.
    #[serde(default)]
    pub width: Option<f64>,
}

/// Named dash style of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineStyle {
    /// Solid line.
    #[serde(rename = "esriSLSSolid")]
    Solid,
    /// Dashed line.
    #[serde(rename = "esriSLSDash")]
    Dash,
    /// Dotted line.
    #[serde(rename = "esriSLSDot")]
    Dot,
    /// Dash-dot line.
    #[serde(rename = "esriSLSDashDot")]
    DashDot,
    /// Dash-dot-dot line.
    #[serde(rename = "esriSLSDashDotDot")]
    DashDotDot,
    /// Any style this crate has no dash pattern for. Drawn solid.
    #[serde(other)]
    Other,
}

impl LineStyle {
    /// Dash pattern in pixels. Empty pattern is a solid line.
    pub fn dash_pattern(&self) -> &'static [f64] {
        match self {
            LineStyle::Dash => &[10.0],
            LineStyle::Dot => &[1.0, 5.0],
            LineStyle::DashDot => &[10.0, 5.0, 1.0, 5.0],
            LineStyle::DashDotDot => &[10.0, 5.0, 1.0, 5.0, 1.0, 5.0],
            LineStyle::Solid | LineStyle::Other => &[],
        }
    }
}

/// Simple fill symbol (`esriSFS`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SimpleFillSymbol {
    /// Fill color.
    #[serde(default)]
    pub color: Option<Vec<f64>>,
    /// Outline of the polygon.
    #[serde(default)]
    pub outline: Option<SimpleLineSymbol>,
}

/// Picture marker symbol (`esriPMS`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PictureMarkerSymbol {
    /// Base64 encoded image.
    #[serde(default)]
    pub image_data: Option<String>,
    /// Media type of the image.
    #[serde(default)]
    pub content_type: Option<String>,
    /// Width of the image in points.
    #[serde(default)]
    pub width: Option<f64>,
    /// Height of the image in points.
    #[serde(default)]
    pub height: Option<f64>,
    /// Rotation in degrees.
    #[serde(default)]
    pub angle: f64,
    /// Horizontal offset in points.
    #[serde(default)]
    pub xoffset: f64,
    /// Vertical offset in points.
    #[serde(default)]
    pub yoffset: f64,
}

/// Picture fill symbol (`esriPFS`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PictureFillSymbol {
    /// Base64 encoded image of the pattern.
    #[serde(default)]
    pub image_data: Option<String>,
    /// Media type of the image.
    #[serde(default)]
    pub content_type: Option<String>,
    /// Outline of the polygon.
    #[serde(default)]
    pub outline: Option<SimpleLineSymbol>,
}

/// Text symbol (`esriTS`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EsriTextSymbol {
    /// Static text of the symbol.
    #[serde(default)]
    pub text: Option<String>,
    /// Font color.
    #[serde(default)]
    pub color: Option<Vec<f64>>,
    /// Color of the label background box.
    #[serde(default)]
    pub background_color: Option<Vec<f64>>,
    /// Color of the label background border.
    #[serde(default)]
    pub border_line_color: Option<Vec<f64>>,
    /// Width of the label background border.
    #[serde(default)]
    pub border_line_size: Option<f64>,
    /// Halo color.
    #[serde(default)]
    pub halo_color: Option<Vec<f64>>,
    /// Halo width.
    #[serde(default)]
    pub halo_size: Option<f64>,
    /// `baseline`, `top`, `middle` or `bottom`.
    #[serde(default)]
    pub vertical_alignment: Option<String>,
    /// `left`, `right`, `center` or `justify`.
    #[serde(default)]
    pub horizontal_alignment: Option<String>,
    /// Rotation in degrees.
    #[serde(default)]
    pub angle: f64,
    /// Horizontal offset in points.
    #[serde(default)]
    pub xoffset: f64,
    /// Vertical offset in points.
    #[serde(default)]
    pub yoffset: f64,
    /// Font description.
    #[serde(default)]
    pub font: Option<EsriFont>,
}

/// Font of a text symbol.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EsriFont {
    /// Font family name.
    #[serde(default)]
    pub family: Option<String>,
    /// Size in points.
    #[serde(default)]
    pub size: Option<f64>,
    /// `italic`, `normal` or `oblique`.
    #[serde(default)]
    pub style: Option<String>,
    /// `bold`, `bolder`, `lighter` or `normal`.
    #[serde(default)]
    pub weight: Option<String>,
}

impl EsriFont {
    /// CSS `font` shorthand for the font: `"<style> <weight> <size>pt <family>"`.
    pub fn to_css(&self) -> String {
        let mut parts = vec![
            self.style.as_deref().unwrap_or("normal").to_string(),
            self.weight.as_deref().unwrap_or("normal").to_string(),
        ];
        if let Some(size) = self.size {
            parts.push(format!("{size}pt"));
        }
        parts.push(self.family.as_deref().unwrap_or("sans-serif").to_string());

        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_by_type_tag() {
        let symbol = EsriSymbol::from_json(&json!({
            "type": "esriSLS",
            "style": "esriSLSDashDot",
            "color": [197, 0, 255, 255],
            "width": 1.5
        }))
        .expect("failed to decode");

        assert_eq!(
            symbol,
            EsriSymbol::SimpleLine(SimpleLineSymbol {
                style: Some(LineStyle::DashDot),
                color: Some(vec![197.0, 0.0, 255.0, 255.0]),
                width: Some(1.5),
            })
        );
        assert_eq!(symbol.type_name(), "esriSLS");
    }

    #[test]
    fn unknown_type_is_reported() {
        let result = EsriSymbol::from_json(&json!({"type": "esriCIM"}));
        assert_matches!(result, Err(EsriStyleError::UnsupportedSymbolKind(tag)) if tag == "esriCIM");

        let result = EsriSymbol::from_json(&json!({}));
        assert_matches!(result, Err(EsriStyleError::UnsupportedSymbolKind(tag)) if tag.is_empty());
    }

    #[test]
    fn malformed_fields_are_decoding_errors() {
        let result = EsriSymbol::from_json(&json!({"type": "esriSMS", "size": "big"}));
        assert_matches!(result, Err(EsriStyleError::Decoding(_)));
    }

    #[test]
    fn null_outline_is_accepted() {
        let symbol = EsriSymbol::from_json(&json!({
            "type": "esriSFS",
            "color": [1, 2, 3, 4],
            "outline": null
        }))
        .expect("failed to decode");

        assert_matches!(symbol, EsriSymbol::SimpleFill(SimpleFillSymbol { outline: None, .. }));
    }

    #[test]
    fn unknown_line_style_is_solid() {
        let line: SimpleLineSymbol =
            serde_json::from_value(json!({"style": "esriSLSLongDashDot"})).expect("invalid line");
        assert_eq!(line.style, Some(LineStyle::Other));
        assert!(LineStyle::Other.dash_pattern().is_empty());
        assert_eq!(LineStyle::Dash.dash_pattern(), &[10.0]);
    }

    #[test]
    fn font_css() {
        let font = EsriFont {
            family: Some("Cambria".into()),
            size: Some(10.0),
            style: Some("normal".into()),
            weight: Some("bold".into()),
        };
        assert_eq!(font.to_css(), "normal bold 10pt Cambria");
    }
}
