//! Per-feature style selection.

use std::sync::Arc;

use ahash::HashMap;
use parking_lot::RwLock;

use crate::factory::{RenderStyleFactory, StyleFactory};
use crate::feature::StyleFeature;
use crate::label::{resolve_label, LeftoverPolicy};
use crate::translate::StyleTable;

/// Style selected for a feature.
#[derive(Debug)]
pub enum SelectedStyle<S, L> {
    /// Style of the feature geometry.
    Feature(Arc<S>),
    /// Label drawn on top of the feature.
    Label {
        /// Label style shared by all features of the label rule.
        style: Arc<L>,
        /// Resolved text of the label.
        text: String,
    },
}

impl<S, L> Clone for SelectedStyle<S, L> {
    fn clone(&self) -> Self {
        match self {
            Self::Feature(style) => Self::Feature(style.clone()),
            Self::Label { style, text } => Self::Label {
                style: style.clone(),
                text: text.clone(),
            },
        }
    }
}

/// Styles selected by the selector of the factory `F`.
pub type SelectedStyles<F> =
    Vec<SelectedStyle<<F as StyleFactory>::FeatureStyle, <F as StyleFactory>::LabelStyle>>;

/// Selects the styles of features of one layer.
///
/// Style objects are created by the factory the first time their rule is selected and are kept for the lifetime of
/// the selector. The set of rules of a layer is fixed, so the cache never grows beyond the number of rules.
pub struct StyleSelector<F: StyleFactory = RenderStyleFactory> {
    table: StyleTable,
    factory: F,
    leftovers: LeftoverPolicy,
    feature_styles: RwLock<HashMap<usize, Arc<F::FeatureStyle>>>,
    label_styles: RwLock<HashMap<usize, Arc<F::LabelStyle>>>,
}

impl StyleSelector<RenderStyleFactory> {
    /// Creates a selector that produces [`RenderStyle`](crate::RenderStyle) objects.
    pub fn new(table: StyleTable) -> Self {
        Self::with_factory(table, RenderStyleFactory)
    }
}

impl<F: StyleFactory> StyleSelector<F> {
    /// Creates a selector with the given style factory.
    pub fn with_factory(table: StyleTable, factory: F) -> Self {
        Self {
            table,
            factory,
            leftovers: LeftoverPolicy::default(),
            feature_styles: Default::default(),
            label_styles: Default::default(),
        }
    }

    /// Sets the treatment of unresolved label placeholders.
    pub fn with_leftover_policy(mut self, leftovers: LeftoverPolicy) -> Self {
        self.leftovers = leftovers;
        self
    }

    /// Style table of the layer.
    pub fn table(&self) -> &StyleTable {
        &self.table
    }

    /// Selects the styles of a feature at the given map resolution.
    ///
    /// Returns `None` if the feature is hidden or no feature rule matches it. Otherwise returns the feature style,
    /// followed by a label if a label rule is visible at `resolution`.
    pub fn select_style(
        &self,
        feature: &impl StyleFeature,
        resolution: f64,
    ) -> Option<SelectedStyles<F>> {
        if feature.is_hidden() {
            return None;
        }

        let attributes = feature.attributes();
        let (index, rule) = self.table.feature_rules().find(attributes)?;
        let opacity = self.table.opacity();

        let mut styles = vec![SelectedStyle::Feature(get_or_build(
            &self.feature_styles,
            index,
            || self.factory.feature_style(rule, opacity),
        ))];

        if let Some((index, label_rule)) = self.table.find_label_rule(resolution) {
            let id = feature.id();
            if let Some(text) = resolve_label(
                &label_rule.template,
                id.as_deref(),
                attributes,
                self.leftovers,
            ) {
                let style = get_or_build(&self.label_styles, index, || {
                    self.factory.label_style(label_rule, opacity)
                });
                styles.push(SelectedStyle::Label { style, text });
            }
        }

        Some(styles)
    }
}

fn get_or_build<T>(
    cache: &RwLock<HashMap<usize, Arc<T>>>,
    index: usize,
    build: impl FnOnce() -> T,
) -> Arc<T> {
    if let Some(style) = cache.read().get(&index) {
        return style.clone();
    }

    cache
        .write()
        .entry(index)
        .or_insert_with(|| {
            log::trace!("Building style object for rule {index}");
            Arc::new(build())
        })
        .clone()
}
