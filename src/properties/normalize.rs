use super::alias::CanonicalAttribute;
use super::value::{Row, Value};
use crate::collection::feature::FeatureMap;

/// Build the feature properties for a row.
///
/// Each canonical attribute is resolved from the first present alias, falling back to its default.
/// Afterwards every original column is merged in under its own name:
/// - a non-null original value overwrites whatever the canonical step produced
/// - a null original value is only kept when nothing else occupies the key
pub fn normalize_properties(row: &Row, attributes: &[CanonicalAttribute]) -> FeatureMap {
    let mut properties = FeatureMap::with_capacity(attributes.len() + row.len());

    for attribute in attributes {
        let resolved = row
            .first_present(attribute.aliases)
            .map(|(_, value)| value.clone())
            .or_else(|| attribute.default.map(Value::Int));
        if let Some(value) = resolved {
            properties.insert(attribute.name.to_string(), value);
        }
    }

    for (name, value) in row.iter() {
        if value.is_null() && properties.contains_key(name) {
            continue;
        }
        properties.insert(name.to_string(), value.clone());
    }

    properties
}
