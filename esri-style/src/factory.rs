//! Conversion of style rules into objects of a rendering library.
//!
//! The [`StyleSelector`](crate::StyleSelector) builds one style object per rule and reuses it for every feature
//! the rule applies to. The objects are created by a [`StyleFactory`]. A host that draws with its own rendering
//! library implements the trait for its style types; [`RenderStyleFactory`] produces plain render-ready structs.

use std::sync::Arc;

use crate::color::Color;
use crate::symbol::{
    CircleStyle, DecodedImage, EsriTextSymbol, FillStyle, StrokeStyle, TextAlign, TextBaseline,
    TextStyle,
};
use crate::translate::{FeatureStyleRule, LabelRule};

/// Creates rendering library objects from the style rules.
pub trait StyleFactory {
    /// Style of a feature.
    type FeatureStyle;
    /// Style of a label, without the text.
    type LabelStyle;

    /// Creates the style of the features matching the rule. `opacity` is the opacity of the layer.
    fn feature_style(&self, rule: &FeatureStyleRule, opacity: f64) -> Self::FeatureStyle;

    /// Creates the label style of the rule. `opacity` is the opacity of the layer.
    fn label_style(&self, rule: &LabelRule, opacity: f64) -> Self::LabelStyle;
}

/// Fill of a rendered polygon.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderFill {
    /// Solid color.
    Color(Color),
    /// Repeated image with the opacity it must be drawn with.
    Pattern {
        /// Pattern tile.
        image: Arc<DecodedImage>,
        /// Opacity in `0..=1`.
        opacity: f64,
    },
}

/// Point image.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderImage {
    /// Circle.
    Circle(CircleStyle),
    /// Image from an URI.
    Icon {
        /// Image URI.
        src: String,
        /// Rotation in radians, clockwise.
        rotation: f64,
        /// Size in pixels.
        size: Option<[f64; 2]>,
        /// Anchor as a fraction of the image size.
        anchor: [f64; 2],
        /// Offset in pixels.
        offset: [f64; 2],
        /// Opacity in `0..=1`.
        opacity: f64,
    },
}

/// Feature style produced by [`RenderStyleFactory`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderStyle {
    /// Polygon fill.
    pub fill: Option<RenderFill>,
    /// Line or outline.
    pub stroke: Option<StrokeStyle>,
    /// Point image.
    pub image: Option<RenderImage>,
    /// Static text drawn with the feature.
    pub text: Option<(String, LabelStyle)>,
}

/// Label style produced by [`RenderStyleFactory`].
#[derive(Debug, Clone, PartialEq)]
pub struct LabelStyle {
    /// CSS font shorthand.
    pub font: String,
    /// Offset of the text in pixels.
    pub offset: [f64; 2],
    /// Horizontal alignment.
    pub text_align: Option<TextAlign>,
    /// Vertical alignment.
    pub text_baseline: Option<TextBaseline>,
    /// Rotation in radians.
    pub rotation: f64,
    /// Padding around the text: `[top, right, bottom, left]`.
    pub padding: [f64; 4],
    /// Text color.
    pub fill: Option<Color>,
    /// Halo.
    pub stroke: Option<StrokeStyle>,
    /// Background box fill.
    pub background_fill: Option<Color>,
    /// Background box border.
    pub background_stroke: Option<StrokeStyle>,
}

/// Factory of [`RenderStyle`] and [`LabelStyle`].
///
/// Applies the layer opacity to all colors and converts rotations to radians.
#[derive(Debug, Default, Clone, Copy)]
pub struct RenderStyleFactory;

impl StyleFactory for RenderStyleFactory {
    type FeatureStyle = RenderStyle;
    type LabelStyle = LabelStyle;

    fn feature_style(&self, rule: &FeatureStyleRule, opacity: f64) -> RenderStyle {
        let style = &rule.style;

        let fill = style.fill.as_ref().map(|fill| match fill {
            FillStyle::Solid(color) => RenderFill::Color(fade(*color, opacity)),
            FillStyle::Pattern(image) => RenderFill::Pattern {
                image: image.clone(),
                opacity,
            },
        });

        let image = match (&style.circle, &style.icon) {
            (Some(circle), _) => Some(RenderImage::Circle(CircleStyle {
                radius: circle.radius,
                fill: circle.fill.map(|color| fade(color, opacity)),
                stroke: circle.stroke.as_ref().map(|s| fade_stroke(s, opacity)),
            })),
            (None, Some(icon)) => Some(RenderImage::Icon {
                src: icon.src.clone(),
                rotation: icon.rotation.to_radians(),
                size: icon.size,
                anchor: icon.anchor,
                offset: icon.offset,
                opacity,
            }),
            (None, None) => None,
        };

        let text = style.text.as_ref().and_then(|text| {
            let content = text.text.clone()?;
            Some((content, label_style(text, opacity)))
        });

        RenderStyle {
            fill,
            stroke: style.stroke.as_ref().map(|s| fade_stroke(s, opacity)),
            image,
            text,
        }
    }

    fn label_style(&self, rule: &LabelRule, opacity: f64) -> LabelStyle {
        match &rule.style.text {
            Some(text) => label_style(text, opacity),
            None => {
                log::debug!("Label rule has no text symbol, default text style is used");
                label_style(&EsriTextSymbol::default().to_text_style(), opacity)
            }
        }
    }
}

fn label_style(text: &TextStyle, opacity: f64) -> LabelStyle {
    LabelStyle {
        font: text.font.clone(),
        offset: [text.offset_x, text.offset_y],
        text_align: text.text_align,
        text_baseline: text.text_baseline,
        rotation: text.rotation.to_radians(),
        padding: text.padding,
        fill: text.fill.map(|color| fade(color, opacity)),
        stroke: text.stroke.as_ref().map(|s| fade_stroke(s, opacity)),
        background_fill: text.background_fill.map(|color| fade(color, opacity)),
        background_stroke: text
            .background_stroke
            .as_ref()
            .map(|s| fade_stroke(s, opacity)),
    }
}

fn fade(color: Color, opacity: f64) -> Color {
    if opacity >= 1.0 {
        return color;
    }

    color.with_alpha((color.a() as f64 * opacity.max(0.0)).round() as u8)
}

fn fade_stroke(stroke: &StrokeStyle, opacity: f64) -> StrokeStyle {
    StrokeStyle {
        color: fade(stroke.color, opacity),
        ..stroke.clone()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use assert_matches::assert_matches;

    use super::*;
    use crate::scale::ResolutionRange;
    use crate::symbol::{IconStyle, SymbolDescriptor, DEFAULT_FONT};
    use crate::translate::RuleCondition;

    fn rule(style: SymbolDescriptor) -> FeatureStyleRule {
        FeatureStyleRule {
            condition: RuleCondition::Default,
            style,
            title: None,
        }
    }

    #[test]
    fn icon_rotation_is_radians() {
        let style = RenderStyleFactory.feature_style(
            &rule(SymbolDescriptor {
                icon: Some(IconStyle {
                    src: "data:image/png;base64,AAAA".into(),
                    rotation: 90.0,
                    size: None,
                    anchor: [0.5, 0.5],
                    offset: [0.0, 0.0],
                }),
                ..Default::default()
            }),
            1.0,
        );

        assert_matches!(style.image, Some(RenderImage::Icon { rotation, .. }) if (rotation - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn opacity_is_applied() {
        let style = RenderStyleFactory.feature_style(
            &rule(SymbolDescriptor {
                fill: Some(FillStyle::Solid(Color::rgba(10, 20, 30, 200))),
                stroke: Some(StrokeStyle {
                    color: Color::BLACK,
                    width: 1.0,
                    line_dash: vec![10.0],
                }),
                ..Default::default()
            }),
            0.5,
        );

        assert_eq!(style.fill, Some(RenderFill::Color(Color::rgba(10, 20, 30, 100))));
        let stroke = style.stroke.expect("no stroke");
        assert_eq!(stroke.color.a(), 128);
        assert_eq!(stroke.line_dash, vec![10.0]);
    }

    #[test]
    fn label_style_without_text_symbol() {
        let rule = LabelRule {
            min_scale: 0.0,
            max_scale: 1000.0,
            resolution_range: ResolutionRange::UNBOUNDED,
            template: "{NAME}".into(),
            placement: None,
            style: SymbolDescriptor::default(),
        };

        let style = RenderStyleFactory.label_style(&rule, 1.0);
        assert_eq!(style.font, DEFAULT_FONT);
        assert_relative_eq!(style.offset[0], 20.0);
        assert_relative_eq!(style.offset[1], -10.0);
        assert_eq!(style.padding, [5.0; 4]);
    }
}
