//! Grouping of the value classes of a unique value renderer.
//!
//! Esri allows several value classes to share a legend label and a symbol. Grouping them produces one style rule
//! with set filters instead of many equality rules that render the same way.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::UniqueValueInfo;

/// Maximum number of attributes a unique value renderer can classify by.
pub const MAX_UNIQUE_VALUE_FIELDS: usize = 3;

/// How value classes of a unique value renderer are turned into rules.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UniqueValueGrouping {
    /// Classes with the same label become one rule. Classes without a label are grouped by their value.
    #[default]
    ByLabel,
    /// Every class becomes its own rule.
    PerValue,
}

/// Value classes merged into one rule.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedValueGroup {
    /// Label shared by the classes of the group.
    pub title: String,
    /// Symbol of the first class of the group.
    pub symbol: Value,
    /// Distinct values seen at each position of the delimited class value.
    pub values: [Vec<String>; MAX_UNIQUE_VALUE_FIELDS],
}

impl AggregatedValueGroup {
    fn new(title: String, symbol: Value) -> Self {
        Self {
            title,
            symbol,
            values: Default::default(),
        }
    }

    fn add_value(&mut self, value: &str, delimiter: Option<&str>) {
        let parts: Vec<&str> = match delimiter {
            Some(delimiter) if !delimiter.is_empty() => value.split(delimiter).collect(),
            _ => vec![value],
        };

        for (position, part) in parts.into_iter().take(MAX_UNIQUE_VALUE_FIELDS).enumerate() {
            let set = &mut self.values[position];
            if !set.iter().any(|v| v == part) {
                set.push(part.to_string());
            }
        }
    }

    /// Values at the given position, `0` being `field1`.
    pub fn values_at(&self, position: usize) -> &[String] {
        self.values
            .get(position)
            .map(|values| values.as_slice())
            .unwrap_or_default()
    }
}

/// Groups value classes, keeping the order in which the groups are first seen.
///
/// Each class value is split by `delimiter` into at most three parts, one for each renderer field. A class whose
/// value has fewer parts contributes nothing to the missing positions.
pub fn aggregate(
    infos: &[UniqueValueInfo],
    delimiter: Option<&str>,
    grouping: UniqueValueGrouping,
) -> Vec<AggregatedValueGroup> {
    let mut groups: Vec<AggregatedValueGroup> = vec![];

    for info in infos {
        let title = info.label.as_deref().unwrap_or(&info.value);
        let existing = match grouping {
            UniqueValueGrouping::ByLabel => groups.iter_mut().find(|group| group.title == title),
            UniqueValueGrouping::PerValue => None,
        };

        match existing {
            Some(group) => group.add_value(&info.value, delimiter),
            None => {
                let mut group = AggregatedValueGroup::new(title.to_string(), info.symbol.clone());
                group.add_value(&info.value, delimiter);
                groups.push(group);
            }
        }
    }

    log::debug!(
        "Aggregated {} unique value classes into {} groups",
        infos.len(),
        groups.len()
    );

    groups
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use serde_json::json;

    use super::*;

    fn info(value: &str, label: &str) -> UniqueValueInfo {
        UniqueValueInfo {
            value: value.to_string(),
            label: Some(label.to_string()),
            symbol: json!({"type": "esriSFS", "label": label, "value": value}),
        }
    }

    fn as_set(values: &[String]) -> HashSet<&str> {
        values.iter().map(|v| v.as_str()).collect()
    }

    fn seven_classes() -> Vec<UniqueValueInfo> {
        vec![
            info("A,1,x", "First"),
            info("B,1,y", "Second"),
            info("A,2,x", "First"),
            info("C,3,z", "Third"),
            info("B,2,y", "Second"),
            info("D,1,x", "First"),
            info("C,3,w", "Third"),
        ]
    }

    #[test]
    fn groups_by_label() {
        let groups = aggregate(&seven_classes(), Some(","), UniqueValueGrouping::ByLabel);

        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].title, "First");
        assert_eq!(groups[1].title, "Second");
        assert_eq!(groups[2].title, "Third");

        assert_eq!(as_set(groups[0].values_at(0)), HashSet::from(["A", "D"]));
        assert_eq!(as_set(groups[0].values_at(1)), HashSet::from(["1", "2"]));
        assert_eq!(as_set(groups[0].values_at(2)), HashSet::from(["x"]));
        assert_eq!(as_set(groups[1].values_at(0)), HashSet::from(["B"]));
        assert_eq!(as_set(groups[2].values_at(2)), HashSet::from(["z", "w"]));
    }

    #[test]
    fn group_uses_first_symbol() {
        let groups = aggregate(&seven_classes(), Some(","), UniqueValueGrouping::ByLabel);
        assert_eq!(groups[0].symbol["value"], "A,1,x");
    }

    #[test]
    fn per_value_grouping() {
        let groups = aggregate(&seven_classes(), Some(","), UniqueValueGrouping::PerValue);
        assert_eq!(groups.len(), 7);
        assert_eq!(groups[2].values_at(0), &["A".to_string()]);
        assert_eq!(groups[2].values_at(1), &["2".to_string()]);
    }

    #[test]
    fn missing_delimiter_keeps_whole_value() {
        let infos = vec![info("ACTIVE", "Active"), info("OPEN", "Active")];
        let groups = aggregate(&infos, None, UniqueValueGrouping::ByLabel);

        assert_eq!(groups.len(), 1);
        assert_eq!(as_set(groups[0].values_at(0)), HashSet::from(["ACTIVE", "OPEN"]));
        assert!(groups[0].values_at(1).is_empty());
        assert!(groups[0].values_at(5).is_empty());
    }

    #[test]
    fn unlabeled_classes_are_grouped_by_value() {
        let mut first = info("1", "");
        first.label = None;
        let mut second = info("2", "");
        second.label = None;

        let groups = aggregate(&[first, second], None, UniqueValueGrouping::ByLabel);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[1].title, "2");
    }
}
