use std::sync::Arc;

use crate::aggregate::UniqueValueGrouping;
use crate::document::LayerDefinition;
use crate::error::EsriStyleError;
use crate::factory::StyleFactory;
use crate::label::LeftoverPolicy;
use crate::scale::{LinearUnit, ResolutionRange};
use crate::selector::StyleSelector;
use crate::source::{JsonStyleSource, StyleSource};
use crate::symbol::{EmbeddedPatternLoader, PatternLoader};
use crate::translate::{translate, StyleTable, TranslateOptions};

/// Constructor of the style of a layer.
///
/// ```
/// use esri_style::{EsriStyleBuilder, LinearUnit, StyleSelector};
///
/// # async fn run(json: String) -> Result<(), esri_style::EsriStyleError> {
/// let style = EsriStyleBuilder::new_json(json)
///     .with_linear_unit(LinearUnit::Meters)
///     .build()
///     .await?;
/// let selector = StyleSelector::new(style.table);
/// # Ok(())
/// # }
/// ```
pub struct EsriStyleBuilder {
    source: Box<dyn StyleSource>,
    options: TranslateOptions,
    patterns: Arc<dyn PatternLoader>,
    leftovers: LeftoverPolicy,
}

/// Result of [`EsriStyleBuilder::build`].
#[derive(Debug, Clone)]
pub struct EsriLayerStyle {
    /// Name of the layer.
    pub name: Option<String>,
    /// Resolutions at which the layer is visible.
    pub visibility: ResolutionRange,
    /// Style rules of the layer.
    pub table: StyleTable,
    /// Treatment of unresolved label placeholders.
    pub leftovers: LeftoverPolicy,
}

impl EsriLayerStyle {
    /// Creates a style selector with the given factory.
    pub fn into_selector<F: StyleFactory>(self, factory: F) -> StyleSelector<F> {
        StyleSelector::with_factory(self.table, factory).with_leftover_policy(self.leftovers)
    }
}

impl EsriStyleBuilder {
    /// Initializes a builder for the layer loaded from the given source.
    pub fn new(source: impl StyleSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            options: TranslateOptions::default(),
            patterns: Arc::new(EmbeddedPatternLoader),
            leftovers: LeftoverPolicy::default(),
        }
    }

    /// Initializes a builder for the layer definition given as a JSON string.
    pub fn new_json(json: impl Into<String>) -> Self {
        Self::new(JsonStyleSource::new(json))
    }

    /// Initializes a builder for the layer at the given map service url.
    #[cfg(feature = "http")]
    pub fn new_url(layer_url: &str) -> Result<Self, EsriStyleError> {
        Ok(Self::new(crate::source::UrlStyleSource::new(layer_url)?))
    }

    /// Sets the linear unit of the map projection. Without it, scales are converted as for meters.
    pub fn with_linear_unit(mut self, linear_unit: LinearUnit) -> Self {
        self.options.linear_unit = Some(linear_unit);
        self
    }

    /// Sets the grouping of unique value classes.
    pub fn with_grouping(mut self, grouping: UniqueValueGrouping) -> Self {
        self.options.grouping = grouping;
        self
    }

    /// Replaces all translation options.
    pub fn with_options(mut self, options: TranslateOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the loader of picture fill patterns.
    pub fn with_pattern_loader(mut self, patterns: impl PatternLoader + 'static) -> Self {
        self.patterns = Arc::new(patterns);
        self
    }

    /// Sets the treatment of unresolved label placeholders.
    pub fn with_leftover_policy(mut self, leftovers: LeftoverPolicy) -> Self {
        self.leftovers = leftovers;
        self
    }

    /// Loads the layer definition and translates it.
    ///
    /// Fails if the document cannot be loaded, has no renderer or uses an unsupported renderer or symbol.
    pub async fn build(self) -> Result<EsriLayerStyle, EsriStyleError> {
        let layer: LayerDefinition = self.source.load().await?;
        let table = translate(&layer.drawing_info, &self.options, self.patterns.as_ref()).await?;

        Ok(EsriLayerStyle {
            visibility: layer.resolution_range(self.options.linear_unit),
            name: layer.name,
            table,
            leftovers: self.leftovers,
        })
    }
}
