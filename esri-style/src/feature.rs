use std::borrow::Cow;

use crate::filter::{AttributeMap, AttributeValue};

/// Attribute that hides a feature when set to a truthy value.
pub const HIDDEN_ATTRIBUTE: &str = "hidden";

/// A feature that can be styled: an identifier and a set of attributes.
pub trait StyleFeature {
    /// Identifier of the feature, substituted for `$id` in labels.
    fn id(&self) -> Option<Cow<'_, str>>;

    /// Attributes of the feature.
    fn attributes(&self) -> &AttributeMap;

    /// Hidden features get no style at all. By default a feature is hidden if its `hidden` attribute is truthy.
    fn is_hidden(&self) -> bool {
        self.attributes()
            .get(HIDDEN_ATTRIBUTE)
            .is_some_and(AttributeValue::is_truthy)
    }
}

/// Feature that owns its id and attributes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimpleFeature {
    id: Option<String>,
    attributes: AttributeMap,
}

impl SimpleFeature {
    /// Creates a new feature.
    pub fn new(id: Option<impl Into<String>>, attributes: AttributeMap) -> Self {
        Self {
            id: id.map(Into::into),
            attributes,
        }
    }

    /// Sets the attribute value, returning the modified feature.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Mutable access to the attributes.
    pub fn attributes_mut(&mut self) -> &mut AttributeMap {
        &mut self.attributes
    }
}

impl StyleFeature for SimpleFeature {
    fn id(&self) -> Option<Cow<'_, str>> {
        self.id.as_deref().map(Cow::Borrowed)
    }

    fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }
}
