//! Label expressions and their formatting for a feature.
//!
//! A label template is literal text with two kinds of placeholders:
//! * `$id` is replaced with the feature identifier;
//! * `{NAME}` is replaced with the value of the attribute `NAME`, compared case-insensitively.

use serde::{Deserialize, Serialize};

use crate::filter::{AttributeMap, AttributeValue};

/// Placeholder of the feature identifier.
pub const ID_PLACEHOLDER: &str = "$id";

const NEWLINE_CONCAT: &str = " CONCAT  NEWLINE  CONCAT ";
const CONCAT: &str = " CONCAT ";

/// What to do with `{NAME}` placeholders that have no matching attribute.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeftoverPolicy {
    /// Remove the placeholder.
    #[default]
    Strip,
    /// Keep the placeholder text as is.
    Keep,
}

/// Converts an Esri label expression into a label template.
///
/// `[NAME]` fields become `{NAME}` placeholders and the `CONCAT` operators are replaced with the text they
/// produce: `NEWLINE` concatenation with a line break, a plain concatenation with a space.
pub fn convert_label_expression(expression: &str) -> String {
    expression
        .replace('[', "{")
        .replace(']', "}")
        .replace(NEWLINE_CONCAT, "\n")
        .replace(CONCAT, " ")
}

/// Resolves the label text of a feature.
///
/// If the whole template is a single `{NAME}` placeholder, the attribute value is returned as is, or `None` if the
/// feature has no such attribute. Otherwise every placeholder is resolved in a single left-to-right pass, so
/// attribute values are never scanned for placeholders themselves.
pub fn resolve_label(
    template: &str,
    id: Option<&str>,
    attributes: &AttributeMap,
    leftovers: LeftoverPolicy,
) -> Option<String> {
    if let Some(name) = single_placeholder(template) {
        return lookup(attributes, name).map(|value| value.to_string());
    }

    let mut result = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(position) = rest.find(['{', '$']) {
        result.push_str(&rest[..position]);
        rest = &rest[position..];

        if let Some(tail) = rest.strip_prefix(ID_PLACEHOLDER) {
            result.push_str(id.unwrap_or_default());
            rest = tail;
            continue;
        }

        if let Some(inner) = rest.strip_prefix('{') {
            if let Some(end) = inner.find(['{', '}']) {
                if inner[end..].starts_with('}') {
                    let name = &inner[..end];
                    match lookup(attributes, name) {
                        Some(value) => result.push_str(&value.to_string()),
                        None if leftovers == LeftoverPolicy::Keep => {
                            result.push_str(&rest[..end + 2])
                        }
                        None => {}
                    }
                    rest = &inner[end + 1..];
                    continue;
                }
            }
        }

        // Not a placeholder, copy the character verbatim.
        result.push_str(&rest[..1]);
        rest = &rest[1..];
    }

    result.push_str(rest);
    Some(result)
}

fn single_placeholder(template: &str) -> Option<&str> {
    let name = template.strip_prefix('{')?.strip_suffix('}')?;
    if name.contains(['{', '}']) {
        None
    } else {
        Some(name)
    }
}

/// Finds an attribute by the exact name, then case-insensitively. `Null` values count as missing.
///
/// Among several keys that differ only in case the lexicographically smallest one wins.
fn lookup<'a>(attributes: &'a AttributeMap, name: &str) -> Option<&'a AttributeValue> {
    if let Some(value) = attributes.get(name).filter(|v| **v != AttributeValue::Null) {
        return Some(value);
    }

    let name = name.to_lowercase();
    attributes
        .iter()
        .filter(|(key, value)| **value != AttributeValue::Null && key.to_lowercase() == name)
        .min_by(|(a, _), (b, _)| a.cmp(b))
        .map(|(_, value)| value)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn attributes() -> AttributeMap {
        HashMap::from([
            ("Name".to_string(), AttributeValue::from("Main street")),
            ("LANES".to_string(), AttributeValue::Int(4)),
            ("note".to_string(), AttributeValue::from("{Name}")),
            ("empty".to_string(), AttributeValue::Null),
        ])
    }

    fn resolve(template: &str) -> Option<String> {
        resolve_label(template, Some("42"), &attributes(), LeftoverPolicy::Strip)
    }

    #[test]
    fn converts_expression() {
        assert_eq!(convert_label_expression("[NAME]"), "{NAME}");
        assert_eq!(
            convert_label_expression("[NAME] CONCAT  NEWLINE  CONCAT [TYPE]"),
            "{NAME}\n{TYPE}"
        );
        assert_eq!(
            convert_label_expression("[NAME] CONCAT [TYPE] CONCAT  NEWLINE  CONCAT [CODE]"),
            "{NAME} {TYPE}\n{CODE}"
        );
    }

    #[test]
    fn id_only() {
        assert_eq!(resolve("$id").as_deref(), Some("42"));
        assert_eq!(
            resolve_label("$id", Some("7"), &AttributeMap::new(), LeftoverPolicy::Strip).as_deref(),
            Some("7")
        );
        assert_eq!(
            resolve_label("#$id", None, &AttributeMap::new(), LeftoverPolicy::Strip).as_deref(),
            Some("#")
        );
    }

    #[test]
    fn id_and_attribute() {
        assert_eq!(resolve("$id - {name}").as_deref(), Some("42 - Main street"));
        assert_eq!(resolve("$id - {NAME}").as_deref(), Some("42 - Main street"));
        assert_eq!(resolve("{Name}: {lanes} lanes").as_deref(), Some("Main street: 4 lanes"));
    }

    #[test]
    fn non_ascii_names() {
        let attributes = HashMap::from([("Име".to_string(), AttributeValue::from("София"))]);

        assert_eq!(
            resolve_label("Град: {име}", None, &attributes, LeftoverPolicy::Strip).as_deref(),
            Some("Град: София")
        );
        assert_eq!(
            resolve_label("{ИМЕ}", None, &attributes, LeftoverPolicy::Strip).as_deref(),
            Some("София")
        );
    }

    #[test]
    fn null_exact_match_falls_back() {
        let attributes = HashMap::from([
            ("name".to_string(), AttributeValue::Null),
            ("NAME".to_string(), AttributeValue::from("x")),
        ]);

        assert_eq!(
            resolve_label("{name}", None, &attributes, LeftoverPolicy::Strip).as_deref(),
            Some("x")
        );
        assert_eq!(
            resolve_label("<{name}>", None, &attributes, LeftoverPolicy::Strip).as_deref(),
            Some("<x>")
        );
    }

    #[test]
    fn single_placeholder_is_direct_lookup() {
        assert_eq!(resolve("{LANES}").as_deref(), Some("4"));
        assert_eq!(resolve("{lanes}").as_deref(), Some("4"));
        assert_eq!(resolve("{missing}"), None);
        assert_eq!(resolve("{empty}"), None);
    }

    #[test]
    fn leftovers_are_stripped() {
        assert_eq!(resolve("{Name} ({missing})").as_deref(), Some("Main street ()"));
        assert_eq!(resolve("a{empty}b").as_deref(), Some("ab"));
    }

    #[test]
    fn leftovers_are_kept() {
        let resolved = resolve_label(
            "{Name} ({missing})",
            None,
            &attributes(),
            LeftoverPolicy::Keep,
        );
        assert_eq!(resolved.as_deref(), Some("Main street ({missing})"));
    }

    #[test]
    fn values_are_not_rescanned() {
        assert_eq!(resolve("Note: {note}").as_deref(), Some("Note: {Name}"));
    }

    #[test]
    fn literal_text() {
        assert_eq!(resolve("Plain label").as_deref(), Some("Plain label"));
        assert_eq!(resolve("Cost: $5 {").as_deref(), Some("Cost: $5 {"));
        assert_eq!(resolve("a { b {Name}").as_deref(), Some("a { b Main street"));
        assert_eq!(resolve("").as_deref(), Some(""));
    }
}
