//! Esri style translates the `drawingInfo` of ArcGIS map service layers into renderer-agnostic feature and label
//! styles, and selects the style of each feature at draw time.
//!
//! # Quick start
//!
//! ```no_run
//! use esri_style::{EsriStyleBuilder, LinearUnit, SelectedStyle, SimpleFeature, StyleSelector};
//!
//! # tokio_test::block_on(async {
//! let json = std::fs::read_to_string("layer.json")?;
//! let style = EsriStyleBuilder::new_json(json)
//!     .with_linear_unit(LinearUnit::Meters)
//!     .build()
//!     .await?;
//! let selector = StyleSelector::new(style.table);
//!
//! let feature = SimpleFeature::new(Some("1"), Default::default()).with_attribute("STATUS", "ACTIVE");
//! if let Some(styles) = selector.select_style(&feature, 2.4) {
//!     for style in styles {
//!         match style {
//!             SelectedStyle::Feature(style) => println!("draw feature with {style:?}"),
//!             SelectedStyle::Label { style, text } => println!("draw label {text} with {style:?}"),
//!         }
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! # });
//! ```
//!
//! # How it works
//!
//! Loading a style is done once per layer:
//!
//! * a [`StyleSource`] provides the [`LayerDefinition`] document;
//! * the renderer and label classes of the document are [translated](translate()) into a [`StyleTable`]. Every Esri
//!   symbol is read into a [`SymbolDescriptor`], value classes of unique value renderers are
//!   [grouped](aggregate()) by their labels, and scale limits of label classes become resolution ranges.
//!
//! Drawing then asks a [`StyleSelector`] for the styles of every feature. The selector evaluates the feature rules
//! in order, picks the label rule visible at the current resolution and resolves the label text. Style objects are
//! created by a [`StyleFactory`] once per rule and shared between features.

#![warn(clippy::unwrap_used)]
#![warn(missing_docs)]

mod aggregate;
mod builder;
mod color;
pub mod document;
pub mod error;
mod factory;
mod feature;
mod filter;
mod label;
pub mod scale;
mod selector;
pub mod source;
pub mod symbol;
mod translate;

pub use aggregate::{aggregate, AggregatedValueGroup, UniqueValueGrouping};
pub use builder::{EsriLayerStyle, EsriStyleBuilder};
pub use color::Color;
pub use document::{DrawingInfo, LayerDefinition, Renderer};
pub use error::EsriStyleError;
pub use factory::{LabelStyle, RenderFill, RenderImage, RenderStyle, RenderStyleFactory, StyleFactory};
pub use feature::{SimpleFeature, StyleFeature, HIDDEN_ATTRIBUTE};
pub use filter::{AttributeMap, AttributeValue, FilterOperator, FilterRule};
pub use label::{convert_label_expression, resolve_label, LeftoverPolicy};
pub use scale::{scale_to_resolution, LinearUnit, ResolutionRange};
pub use selector::{SelectedStyle, SelectedStyles, StyleSelector};
pub use source::{JsonStyleSource, StyleSource};
pub use symbol::{read_symbol, EsriSymbol, PatternLoader, SymbolDescriptor};
pub use translate::{
    translate, translate_labels, translate_renderer, FeatureStyleRule, FeatureStyleRules, LabelRule,
    RuleCondition, StyleTable, TranslateOptions, DEFAULT_LABEL_MAX_SCALE, DEFAULT_LABEL_MIN_SCALE,
};
