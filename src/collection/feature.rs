use std::collections::HashMap;

use crate::geometry::model::Geometry;
use crate::properties::value::Value;

/// Properties of a feature: canonical attributes plus every original column of its source row.
pub type FeatureMap = HashMap<String, Value>;

#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub geometry: Geometry,
    pub properties: FeatureMap,
}

impl Feature {
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name).filter(|value| !value.is_null())
    }
}

impl From<Geometry> for Feature {
    fn from(value: Geometry) -> Self {
        Self {
            geometry: value,
            properties: FeatureMap::new(),
        }
    }
}

/// Ordered features of one layer. Built once per load and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Feature> {
        self.features.iter()
    }
}

impl FromIterator<Feature> for FeatureCollection {
    fn from_iter<T: IntoIterator<Item = Feature>>(iter: T) -> Self {
        Self {
            features: iter.into_iter().collect(),
        }
    }
}

impl From<&Feature> for geojson::Feature {
    fn from(feature: &Feature) -> Self {
        let properties: geojson::JsonObject = feature
            .properties
            .iter()
            .map(|(name, value)| (name.clone(), serde_json::Value::from(value)))
            .collect();
        geojson::Feature {
            bbox: None,
            geometry: Some(geojson::Geometry::from(&feature.geometry)),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        }
    }
}

impl From<&FeatureCollection> for geojson::FeatureCollection {
    fn from(collection: &FeatureCollection) -> Self {
        collection.iter().map(geojson::Feature::from).collect()
    }
}
