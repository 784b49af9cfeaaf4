//! Normalized symbol descriptors and reading of Esri symbols into them.
//!
//! A [`SymbolDescriptor`] is a renderer-agnostic description of how a feature or a label is drawn. Only the parts
//! relevant to the source symbol kind are set: a line symbol produces only a `stroke`, a marker only a `circle` and
//! so on.

use std::sync::Arc;

use serde_json::Value;

use crate::color::Color;
use crate::error::EsriStyleError;

mod esri;
mod pattern;

pub use esri::*;
pub use pattern::{DecodedImage, EmbeddedPatternLoader, PatternLoader};

/// Multiplier converting points into pixels.
pub const POINTS_TO_PIXELS: f64 = 1.333;

/// Width of a stroke that has no width set in the source document.
pub const DEFAULT_STROKE_WIDTH: f64 = 1.0;

/// Font used for text symbols without a font.
pub const DEFAULT_FONT: &str = "20px Calibri,sans-serif";

/// Padding around the label text, in pixels: `[top, right, bottom, left]`.
pub const LABEL_PADDING: [f64; 4] = [5.0, 5.0, 5.0, 5.0];

/// Correction added to the text offset along the x axis.
pub const LABEL_OFFSET_X: f64 = 20.0;

/// Correction added to the text offset along the y axis.
pub const LABEL_OFFSET_Y: f64 = -10.0;

/// Renderer-agnostic style of a feature or a label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolDescriptor {
    /// Polygon fill.
    pub fill: Option<FillStyle>,
    /// Line or polygon outline.
    pub stroke: Option<StrokeStyle>,
    /// Point drawn as a circle.
    pub circle: Option<CircleStyle>,
    /// Point drawn as an image.
    pub icon: Option<IconStyle>,
    /// Text.
    pub text: Option<TextStyle>,
}

/// Fill of a polygon.
#[derive(Debug, Clone, PartialEq)]
pub enum FillStyle {
    /// Solid color.
    Solid(Color),
    /// Repeated image.
    Pattern(Arc<DecodedImage>),
}

/// Stroke of a line.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeStyle {
    /// Line color.
    pub color: Color,
    /// Line width in pixels.
    pub width: f64,
    /// Dash pattern. Empty for solid lines.
    pub line_dash: Vec<f64>,
}

/// Point symbol drawn as a circle.
#[derive(Debug, Clone, PartialEq)]
pub struct CircleStyle {
    /// Radius in pixels.
    pub radius: f64,
    /// Fill color of the circle.
    pub fill: Option<Color>,
    /// Outline of the circle.
    pub stroke: Option<StrokeStyle>,
}

/// Point symbol drawn as an image.
#[derive(Debug, Clone, PartialEq)]
pub struct IconStyle {
    /// Image URI.
    pub src: String,
    /// Rotation in degrees, clockwise.
    pub rotation: f64,
    /// Size of the image in pixels, if known.
    pub size: Option<[f64; 2]>,
    /// Anchor point as a fraction of the image size.
    pub anchor: [f64; 2],
    /// Offset from the anchor point in pixels.
    pub offset: [f64; 2],
}

/// Horizontal alignment of a label.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Right,
    Center,
    Start,
    End,
}

impl TextAlign {
    /// Parses the alignment name. Returns `None` for values that renderers do not accept (e.g. `justify`).
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "left" => Self::Left,
            "right" => Self::Right,
            "center" => Self::Center,
            "start" => Self::Start,
            "end" => Self::End,
            _ => return None,
        })
    }
}

/// Vertical alignment of a label.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextBaseline {
    Bottom,
    Top,
    Middle,
    Alphabetic,
    Hanging,
    Ideographic,
}

impl TextBaseline {
    /// Parses the baseline name. Returns `None` for values that renderers do not accept (e.g. Esri `baseline`).
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "bottom" => Self::Bottom,
            "top" => Self::Top,
            "middle" => Self::Middle,
            "alphabetic" => Self::Alphabetic,
            "hanging" => Self::Hanging,
            "ideographic" => Self::Ideographic,
            _ => return None,
        })
    }
}

/// Style of a text label.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// Unformatted text of the symbol. May contain placeholders.
    pub text: Option<String>,
    /// CSS font shorthand.
    pub font: String,
    /// Horizontal offset in pixels.
    pub offset_x: f64,
    /// Vertical offset in pixels.
    pub offset_y: f64,
    /// Horizontal alignment.
    pub text_align: Option<TextAlign>,
    /// Vertical alignment.
    pub text_baseline: Option<TextBaseline>,
    /// Rotation in degrees.
    pub rotation: f64,
    /// Padding around the text: `[top, right, bottom, left]`.
    pub padding: [f64; 4],
    /// Text color.
    pub fill: Option<Color>,
    /// Halo around the glyphs.
    pub stroke: Option<StrokeStyle>,
    /// Fill of the box behind the text.
    pub background_fill: Option<Color>,
    /// Border of the box behind the text.
    pub background_stroke: Option<StrokeStyle>,
}

/// Reads a symbol given as JSON.
///
/// Same as [`EsriSymbol::from_json`] followed by [`EsriSymbol::read`].
pub async fn read_symbol(
    value: &Value,
    patterns: &dyn PatternLoader,
) -> Result<SymbolDescriptor, EsriStyleError> {
    let symbol = EsriSymbol::from_json(value)?;
    Ok(symbol.read(patterns).await)
}

impl EsriSymbol {
    /// Converts the symbol into a descriptor.
    ///
    /// Only picture fills actually wait on `patterns`. If a pattern cannot be loaded, the fill is left empty and a
    /// warning is logged.
    pub async fn read(&self, patterns: &dyn PatternLoader) -> SymbolDescriptor {
        match self {
            EsriSymbol::SimpleMarker(symbol) => symbol.to_descriptor(),
            EsriSymbol::SimpleLine(symbol) => SymbolDescriptor {
                stroke: symbol.to_stroke(),
                ..Default::default()
            },
            EsriSymbol::SimpleFill(symbol) => symbol.to_descriptor(),
            EsriSymbol::PictureMarker(symbol) => SymbolDescriptor {
                icon: symbol.to_icon(),
                ..Default::default()
            },
            EsriSymbol::PictureFill(symbol) => symbol.to_descriptor(patterns).await,
            EsriSymbol::Text(symbol) => SymbolDescriptor {
                text: Some(symbol.to_text_style()),
                ..Default::default()
            },
        }
    }
}

fn esri_color(channels: Option<&Vec<f64>>) -> Option<Color> {
    channels.and_then(|channels| Color::from_esri(channels))
}

impl SimpleLineSymbol {
    /// Stroke of the line. `None` if the line has no color.
    pub fn to_stroke(&self) -> Option<StrokeStyle> {
        let color = esri_color(self.color.as_ref())?;
        let line_dash = self
            .style
            .map(|style| style.dash_pattern().to_vec())
            .unwrap_or_default();

        Some(StrokeStyle {
            color,
            width: self.width.unwrap_or(DEFAULT_STROKE_WIDTH),
            line_dash,
        })
    }
}

impl SimpleMarkerSymbol {
    fn to_descriptor(&self) -> SymbolDescriptor {
        SymbolDescriptor {
            circle: Some(CircleStyle {
                radius: self.size / 2.0,
                fill: esri_color(self.color.as_ref()),
                stroke: self.outline.as_ref().and_then(SimpleLineSymbol::to_stroke),
            }),
            ..Default::default()
        }
    }
}

impl SimpleFillSymbol {
    fn to_descriptor(&self) -> SymbolDescriptor {
        SymbolDescriptor {
            fill: esri_color(self.color.as_ref()).map(FillStyle::Solid),
            stroke: self.outline.as_ref().and_then(SimpleLineSymbol::to_stroke),
            ..Default::default()
        }
    }
}

impl PictureMarkerSymbol {
    /// Icon of the marker, with the image embedded as a data URI.
    pub fn to_icon(&self) -> Option<IconStyle> {
        let Some(image_data) = &self.image_data else {
            log::warn!("Picture marker symbol has no image data");
            return None;
        };

        let content_type = self.content_type.as_deref().unwrap_or("image/png");
        let size = match (self.width, self.height) {
            (Some(width), Some(height)) => {
                Some([width * POINTS_TO_PIXELS, height * POINTS_TO_PIXELS])
            }
            _ => None,
        };

        Some(IconStyle {
            src: format!("data:{content_type};base64,{image_data}"),
            rotation: self.angle,
            size,
            anchor: [0.5, 0.5],
            offset: [
                self.xoffset * POINTS_TO_PIXELS,
                -self.yoffset * POINTS_TO_PIXELS,
            ],
        })
    }
}

impl PictureFillSymbol {
    async fn to_descriptor(&self, patterns: &dyn PatternLoader) -> SymbolDescriptor {
        let fill = match &self.image_data {
            Some(image_data) => {
                match patterns
                    .load_pattern(image_data, self.content_type.as_deref())
                    .await
                {
                    Ok(image) => Some(FillStyle::Pattern(Arc::new(image))),
                    Err(err) => {
                        log::warn!("Failed to load picture fill pattern, fill is omitted: {err}");
                        None
                    }
                }
            }
            None => {
                log::warn!("Picture fill symbol has no image data, fill is omitted");
                None
            }
        };

        SymbolDescriptor {
            fill,
            stroke: self.outline.as_ref().and_then(SimpleLineSymbol::to_stroke),
            ..Default::default()
        }
    }
}

impl EsriTextSymbol {
    /// Text style of the symbol. The text itself is left unformatted.
    pub fn to_text_style(&self) -> TextStyle {
        let text_align = self.horizontal_alignment.as_deref().and_then(|name| {
            let align = TextAlign::from_name(name);
            if align.is_none() {
                log::debug!("Horizontal alignment \"{name}\" is not supported and is ignored");
            }
            align
        });
        let text_baseline = self.vertical_alignment.as_deref().and_then(|name| {
            let baseline = TextBaseline::from_name(name);
            if baseline.is_none() {
                log::debug!("Vertical alignment \"{name}\" is not supported and is ignored");
            }
            baseline
        });

        let stroke = esri_color(self.halo_color.as_ref()).map(|color| StrokeStyle {
            color,
            width: self.halo_size.unwrap_or(DEFAULT_STROKE_WIDTH),
            line_dash: vec![],
        });
        let background_stroke = esri_color(self.border_line_color.as_ref()).map(|color| StrokeStyle {
            color,
            width: self.border_line_size.unwrap_or(DEFAULT_STROKE_WIDTH),
            line_dash: vec![],
        });

        TextStyle {
            text: self.text.clone(),
            font: self
                .font
                .as_ref()
                .map(EsriFont::to_css)
                .unwrap_or_else(|| DEFAULT_FONT.to_string()),
            offset_x: self.xoffset + LABEL_OFFSET_X,
            offset_y: self.yoffset + LABEL_OFFSET_Y,
            text_align,
            text_baseline,
            rotation: self.angle,
            padding: LABEL_PADDING,
            fill: esri_color(self.color.as_ref()),
            stroke,
            background_fill: esri_color(self.background_color.as_ref()),
            background_stroke,
        }
    }
}
