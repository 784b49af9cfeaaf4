//! Translation of the Esri drawing info into a style table.

use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::aggregate::{aggregate, AggregatedValueGroup, UniqueValueGrouping};
use crate::document::{
    ClassBreaksRenderer, DrawingInfo, LabelingInfo, Renderer, SimpleRenderer, UniqueValueRenderer,
};
use crate::error::EsriStyleError;
use crate::filter::{all_match, AttributeMap, FilterOperator, FilterRule};
use crate::label::convert_label_expression;
use crate::scale::{scale_to_resolution, LinearUnit, ResolutionRange};
use crate::symbol::{read_symbol, EsriTextSymbol, PatternLoader, SymbolDescriptor};

/// Zoomed out visibility limit of a label class that does not set `minScale`.
pub const DEFAULT_LABEL_MAX_SCALE: f64 = 1000.0;

/// Zoomed in visibility limit of a label class that does not set `maxScale`.
pub const DEFAULT_LABEL_MIN_SCALE: f64 = 0.0;

/// Options of the translation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslateOptions {
    /// Linear unit of the map projection. If not set, scales are converted as if the unit was one meter.
    pub linear_unit: Option<LinearUnit>,
    /// Grouping of the unique value classes.
    pub grouping: UniqueValueGrouping,
}

impl TranslateOptions {
    fn meters_per_unit(&self) -> Option<f64> {
        self.linear_unit.map(|unit| unit.meters_per_unit())
    }
}

/// When a feature style rule applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RuleCondition {
    /// Applies to any feature. Only allowed as the last rule.
    Default,
    /// Applies if all the filters match.
    Conditional(Vec<FilterRule>),
}

impl RuleCondition {
    /// Checks the condition against the feature attributes.
    pub fn matches(&self, attributes: &AttributeMap) -> bool {
        match self {
            RuleCondition::Default => true,
            RuleCondition::Conditional(filters) => all_match(filters, attributes),
        }
    }

    /// Filters of the condition. Empty for the default rule.
    pub fn filters(&self) -> &[FilterRule] {
        match self {
            RuleCondition::Default => &[],
            RuleCondition::Conditional(filters) => filters,
        }
    }
}

/// Style of the features that match the condition.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureStyleRule {
    /// Condition of the rule.
    pub condition: RuleCondition,
    /// Style of the matching features.
    pub style: SymbolDescriptor,
    /// Legend label.
    pub title: Option<String>,
}

/// Ordered list of feature style rules. The first matching rule wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureStyleRules {
    rules: Vec<FeatureStyleRule>,
}

impl FeatureStyleRules {
    /// Creates the rule list.
    ///
    /// Fails with [`EsriStyleError::MisplacedDefaultRule`] if a default rule is followed by other rules, as those
    /// rules would never be applied.
    pub fn new(rules: Vec<FeatureStyleRule>) -> Result<Self, EsriStyleError> {
        let last = rules.len().saturating_sub(1);
        if let Some(index) = rules
            .iter()
            .position(|rule| rule.condition == RuleCondition::Default)
        {
            if index != last {
                return Err(EsriStyleError::MisplacedDefaultRule { index });
            }
        }

        Ok(Self { rules })
    }

    /// Rules in the order of evaluation.
    pub fn rules(&self) -> &[FeatureStyleRule] {
        &self.rules
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if there are no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns the first rule matching the attributes together with its index.
    pub fn find(&self, attributes: &AttributeMap) -> Option<(usize, &FeatureStyleRule)> {
        self.rules
            .iter()
            .enumerate()
            .find(|(_, rule)| rule.condition.matches(attributes))
    }
}

/// Label style applied in a range of resolutions.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelRule {
    /// Zoomed in scale limit.
    pub min_scale: f64,
    /// Zoomed out scale limit.
    pub max_scale: f64,
    /// Resolutions in which the label is shown.
    pub resolution_range: ResolutionRange,
    /// Unformatted label text.
    pub template: String,
    /// Placement hint of the source label class.
    pub placement: Option<String>,
    /// Style of the label.
    pub style: SymbolDescriptor,
}

/// Feature and label styles of a layer.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleTable {
    feature_rules: FeatureStyleRules,
    label_rules: Vec<LabelRule>,
    opacity: f64,
}

impl StyleTable {
    /// Creates a new style table.
    pub fn new(feature_rules: FeatureStyleRules, label_rules: Vec<LabelRule>) -> Self {
        Self {
            feature_rules,
            label_rules,
            opacity: 1.0,
        }
    }

    /// Sets opacity of the whole layer.
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    /// Feature style rules.
    pub fn feature_rules(&self) -> &FeatureStyleRules {
        &self.feature_rules
    }

    /// Label rules in the order of the source label classes.
    pub fn label_rules(&self) -> &[LabelRule] {
        &self.label_rules
    }

    /// Opacity of the layer in `0..=1`.
    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    /// Returns the first label rule whose resolution range contains `resolution`.
    pub fn find_label_rule(&self, resolution: f64) -> Option<(usize, &LabelRule)> {
        self.label_rules
            .iter()
            .enumerate()
            .find(|(_, rule)| rule.resolution_range.contains(resolution))
    }

    /// Legend entries: title and style of each feature rule that has a title.
    pub fn legend(&self) -> impl Iterator<Item = (&str, &SymbolDescriptor)> + '_ {
        self.feature_rules
            .rules()
            .iter()
            .filter_map(|rule| Some((rule.title.as_deref()?, &rule.style)))
    }
}

/// Translates drawing info into a style table.
///
/// All picture fill patterns are loaded before the table is returned, so the table never holds a pattern that is
/// still loading.
pub async fn translate(
    drawing_info: &DrawingInfo,
    options: &TranslateOptions,
    patterns: &dyn PatternLoader,
) -> Result<StyleTable, EsriStyleError> {
    let renderer = drawing_info
        .renderer
        .as_ref()
        .ok_or(EsriStyleError::MissingRenderer)?;
    let renderer = Renderer::from_json(renderer)?;

    let feature_rules = translate_renderer(&renderer, options, patterns).await?;
    let label_rules = match &drawing_info.labeling_info {
        Some(labeling_info) => translate_labels(labeling_info, options, patterns).await?,
        None => vec![],
    };

    log::debug!(
        "Translated drawing info into {} feature rules and {} label rules",
        feature_rules.len(),
        label_rules.len()
    );

    let opacity = drawing_info
        .transparency
        .map(|transparency| 1.0 - transparency / 100.0)
        .unwrap_or(1.0);

    Ok(StyleTable::new(feature_rules, label_rules).with_opacity(opacity))
}

struct PendingRule<'a> {
    condition: RuleCondition,
    title: Option<String>,
    symbol: &'a Value,
}

async fn read_rules(
    pending: Vec<PendingRule<'_>>,
    patterns: &dyn PatternLoader,
) -> Result<FeatureStyleRules, EsriStyleError> {
    let styles = try_join_all(pending.iter().map(|rule| read_symbol(rule.symbol, patterns))).await?;

    let rules = pending
        .into_iter()
        .zip(styles)
        .map(|(rule, style)| FeatureStyleRule {
            condition: rule.condition,
            style,
            title: rule.title,
        })
        .collect();

    FeatureStyleRules::new(rules)
}

/// Translates a renderer into feature style rules. Default rules are always placed last.
pub async fn translate_renderer(
    renderer: &Renderer,
    options: &TranslateOptions,
    patterns: &dyn PatternLoader,
) -> Result<FeatureStyleRules, EsriStyleError> {
    match renderer {
        Renderer::Simple(renderer) => read_rules(simple_rules(renderer), patterns).await,
        Renderer::UniqueValue(renderer) => {
            let groups = aggregate(
                &renderer.unique_value_infos,
                renderer.field_delimiter.as_deref(),
                options.grouping,
            );
            read_rules(unique_value_rules(renderer, &groups), patterns).await
        }
        Renderer::ClassBreaks(renderer) => {
            read_rules(class_break_rules(renderer), patterns).await
        }
    }
}

fn simple_rules(renderer: &SimpleRenderer) -> Vec<PendingRule<'_>> {
    vec![PendingRule {
        condition: RuleCondition::Default,
        title: renderer.label.clone(),
        symbol: &renderer.symbol,
    }]
}

fn unique_value_rules<'a>(
    renderer: &'a UniqueValueRenderer,
    groups: &'a [AggregatedValueGroup],
) -> Vec<PendingRule<'a>> {
    let fields = [&renderer.field1, &renderer.field2, &renderer.field3];

    let mut rules: Vec<PendingRule> = groups
        .iter()
        .map(|group| {
            let filters = fields
                .iter()
                .enumerate()
                .filter_map(|(position, field)| {
                    let field = field.as_deref()?;
                    Some(FilterRule::new(
                        field,
                        FilterOperator::InSet(group.values_at(position).to_vec()),
                    ))
                })
                .collect();

            PendingRule {
                condition: RuleCondition::Conditional(filters),
                title: Some(group.title.clone()),
                symbol: &group.symbol,
            }
        })
        .collect();

    if let Some(default_symbol) = &renderer.default_symbol {
        rules.push(PendingRule {
            condition: RuleCondition::Default,
            title: renderer.default_label.clone(),
            symbol: default_symbol,
        });
    }

    rules
}

fn class_break_rules(renderer: &ClassBreaksRenderer) -> Vec<PendingRule<'_>> {
    let mut rules: Vec<PendingRule> = renderer
        .class_break_infos
        .iter()
        .map(|info| {
            let lower = info
                .class_min_value
                .or(renderer.min_value)
                .unwrap_or(f64::NEG_INFINITY);
            let filter = FilterRule::new(
                renderer.field.as_str(),
                FilterOperator::Between {
                    lower,
                    upper: info.class_max_value,
                },
            );

            PendingRule {
                condition: RuleCondition::Conditional(vec![filter]),
                title: info.label.clone(),
                symbol: &info.symbol,
            }
        })
        .collect();

    if let Some(default_symbol) = &renderer.default_symbol {
        rules.push(PendingRule {
            condition: RuleCondition::Default,
            title: renderer.default_label.clone(),
            symbol: default_symbol,
        });
    }

    rules
}

/// Translates label classes into label rules, keeping their order.
pub async fn translate_labels(
    labeling_info: &[LabelingInfo],
    options: &TranslateOptions,
    patterns: &dyn PatternLoader,
) -> Result<Vec<LabelRule>, EsriStyleError> {
    try_join_all(
        labeling_info
            .iter()
            .map(|info| translate_label(info, options, patterns)),
    )
    .await
}

async fn translate_label(
    info: &LabelingInfo,
    options: &TranslateOptions,
    patterns: &dyn PatternLoader,
) -> Result<LabelRule, EsriStyleError> {
    let style = if info.symbol.is_null() {
        SymbolDescriptor {
            text: Some(EsriTextSymbol::default().to_text_style()),
            ..Default::default()
        }
    } else {
        read_symbol(&info.symbol, patterns).await?
    };

    // Esri `minScale` is the zoomed out limit, so the two bounds swap places.
    let max_scale = info
        .min_scale
        .filter(|scale| *scale != 0.0)
        .unwrap_or(DEFAULT_LABEL_MAX_SCALE);
    let min_scale = info
        .max_scale
        .filter(|scale| *scale != 0.0)
        .unwrap_or(DEFAULT_LABEL_MIN_SCALE);
    let resolution_range = ResolutionRange {
        min: scale_to_resolution(min_scale, options.meters_per_unit()),
        max: scale_to_resolution(max_scale, options.meters_per_unit()),
    };

    let template = match &info.label_expression {
        Some(expression) => convert_label_expression(expression),
        None => style
            .text
            .as_ref()
            .and_then(|text| text.text.clone())
            .unwrap_or_default(),
    };

    Ok(LabelRule {
        min_scale,
        max_scale,
        resolution_range,
        template,
        placement: info.label_placement.clone(),
        style,
    })
}
