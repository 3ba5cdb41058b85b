use std::{fs, io, path::Path};

use super::feature::FeatureCollection;

pub fn to_geojson(collection: &FeatureCollection) -> geojson::GeoJson {
    geojson::GeoJson::from(geojson::FeatureCollection::from(collection))
}

pub fn write_collection_to_geojson(
    collection: &FeatureCollection,
    output_filepath: &Path,
) -> io::Result<()> {
    let geojson_contents = to_geojson(collection);
    fs::write(output_filepath, geojson_contents.to_string())
}

#[cfg(test)]
mod tests {
    use testdir::testdir;

    use super::write_collection_to_geojson;
    use crate::collection::feature::{Feature, FeatureCollection};
    use crate::geometry::model::Geometry;
    use crate::properties::value::Value;

    #[test]
    fn test_write_collection_to_geojson() {
        let mut feature = Feature::from(Geometry::LineString(vec![[10.4, 43.7], [10.5, 43.8]]));
        feature
            .properties
            .insert("vehicles".to_string(), Value::Int(42));
        let collection: FeatureCollection = vec![feature].into_iter().collect();

        let test_dir = testdir!();
        let output_filepath = test_dir.join("traffic.geojson");
        write_collection_to_geojson(&collection, &output_filepath).unwrap();

        let contents = std::fs::read_to_string(&output_filepath).unwrap();
        let geojson: geojson::GeoJson = contents.parse().unwrap();
        match geojson {
            geojson::GeoJson::FeatureCollection(feature_collection) => {
                assert_eq!(1, feature_collection.features.len());
                let properties = feature_collection.features[0].properties.as_ref().unwrap();
                assert_eq!(Some(&serde_json::json!(42)), properties.get("vehicles"));
            }
            other => panic!("Unexpected GeoJSON {:?}", other),
        }
    }

    #[test]
    fn test_empty_collection_is_valid_geojson() {
        let test_dir = testdir!();
        let output_filepath = test_dir.join("empty.geojson");
        write_collection_to_geojson(&FeatureCollection::default(), &output_filepath).unwrap();
        let contents = std::fs::read_to_string(&output_filepath).unwrap();
        let json: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(serde_json::json!({"type": "FeatureCollection", "features": []}), json);
    }
}
