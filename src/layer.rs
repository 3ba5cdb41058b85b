use anyhow::Context;
use chrono::NaiveTime;
use indicatif::MultiProgress;

use crate::collection::builder::{build_feature_collection, BuildOutcome};
use crate::collection::feature::FeatureCollection;
use crate::collection::temporal::filter_active;
use crate::config::LayerConfig;
use crate::geometry::decoder::DecoderOptions;
use crate::properties::alias::PropertyKind;
use crate::source::{columnar::read_rows, fetch::fetch};

/// A loaded layer. Each load owns its collection, nothing is shared between loads.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedLayer {
    pub name: String,
    pub kind: PropertyKind,
    pub collection: FeatureCollection,
    /// Rows skipped because their geometry could not be decoded.
    pub dropped: usize,
}

/// Fetch, decode and assemble one layer. Time-indexed layers are narrowed to the features active
/// at `instant` when one is given.
pub fn load_layer(
    layer: &LayerConfig,
    options: &DecoderOptions,
    instant: Option<&NaiveTime>,
    progress: &MultiProgress,
) -> anyhow::Result<LoadedLayer> {
    log::info!("Loading {} layer from {}", layer.kind, layer.source);
    let contents = fetch(&layer.source)?;
    let rows =
        read_rows(contents, progress).with_context(|| format!("Decoding {}", layer.source))?;

    let BuildOutcome {
        collection,
        dropped,
    } = build_feature_collection(&rows, &layer.geometry_fields(), layer.kind, options);

    let collection = match instant {
        Some(instant) if layer.kind.is_time_indexed() => {
            let active = filter_active(&collection, instant);
            log::info!(
                "{} of {} {} features active at {}",
                active.len(),
                collection.len(),
                layer.kind,
                instant
            );
            active
        }
        _ => collection,
    };

    Ok(LoadedLayer {
        name: layer.name().to_string(),
        kind: layer.kind,
        collection,
        dropped,
    })
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;

    use chrono::NaiveTime;
    use indicatif::{MultiProgress, ProgressDrawTarget};
    use parquet::data_type::{ByteArray, ByteArrayType, Int64Type};
    use parquet::file::{properties::WriterProperties, writer::SerializedFileWriter};
    use parquet::schema::parser::parse_message_type;
    use testdir::testdir;

    use super::load_layer;
    use crate::config::LayerConfig;
    use crate::geometry::{decoder::DecoderOptions, model::Geometry};
    use crate::properties::{alias::PropertyKind, value::Value};
    use crate::source::fetch::Source;

    /// Three traffic rows: a morning segment, a row without geometry and an evening segment.
    fn write_traffic_file(filepath: &Path) {
        let schema = Arc::new(
            parse_message_type(
                "message traffic {
                    OPTIONAL BYTE_ARRAY wkt (UTF8);
                    OPTIONAL INT64 Vehicles;
                    OPTIONAL INT64 begin;
                    OPTIONAL INT64 end;
                }",
            )
            .unwrap(),
        );
        let properties = Arc::new(WriterProperties::builder().build());
        let file = std::fs::File::create(filepath).unwrap();
        let mut file_writer = SerializedFileWriter::new(file, schema, properties).unwrap();
        let mut row_group = file_writer.next_row_group().unwrap();

        let mut column = row_group.next_column().unwrap().unwrap();
        column
            .typed::<ByteArrayType>()
            .write_batch(
                &[
                    ByteArray::from("LINESTRING(10.40 43.71, 10.41 43.72)"),
                    ByteArray::from("LINESTRING(10.42 43.73, 10.43 43.74)"),
                ],
                Some(&[1, 0, 1]),
                None,
            )
            .unwrap();
        column.close().unwrap();

        for values in [[35, 12, 60], [25200, 0, 61200], [32400, 86400, 68400]] {
            let mut column = row_group.next_column().unwrap().unwrap();
            column
                .typed::<Int64Type>()
                .write_batch(&values, Some(&[1, 1, 1]), None)
                .unwrap();
            column.close().unwrap();
        }

        row_group.close().unwrap();
        file_writer.close().unwrap();
    }

    fn hidden_progress() -> MultiProgress {
        MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
    }

    fn traffic_layer(filepath: &Path) -> LayerConfig {
        LayerConfig {
            kind: PropertyKind::Traffic,
            source: Source::File {
                filepath: filepath.to_path_buf(),
            },
            name: None,
            geometry_fields: None,
        }
    }

    #[test]
    fn test_load_layer_without_instant() {
        let test_dir = testdir!();
        let filepath = test_dir.join("traffic.parquet");
        write_traffic_file(&filepath);

        let layer = load_layer(
            &traffic_layer(&filepath),
            &DecoderOptions::default(),
            None,
            &hidden_progress(),
        )
        .unwrap();
        assert_eq!("traffic", layer.name);
        assert_eq!(1, layer.dropped);
        assert_eq!(2, layer.collection.len());
        let first = &layer.collection.features[0];
        assert_eq!(
            Geometry::LineString(vec![[10.40, 43.71], [10.41, 43.72]]),
            first.geometry
        );
        assert_eq!(Some(&Value::Int(35)), first.property("vehicles"));
        assert_eq!(Some(&Value::Int(35)), first.property("Vehicles"));
        assert_eq!(Some(&Value::Int(0)), first.property("speed"));
    }

    #[test]
    fn test_load_layer_at_instant() {
        let test_dir = testdir!();
        let filepath = test_dir.join("traffic.parquet");
        write_traffic_file(&filepath);

        let instant = NaiveTime::from_hms_opt(18, 0, 0).unwrap();
        let layer = load_layer(
            &traffic_layer(&filepath),
            &DecoderOptions::default(),
            Some(&instant),
            &hidden_progress(),
        )
        .unwrap();
        assert_eq!(1, layer.collection.len());
        assert_eq!(
            Some(&Value::Int(61200)),
            layer.collection.features[0].property("begin")
        );
    }

    #[test]
    fn test_instant_is_ignored_for_buildings() {
        let test_dir = testdir!();
        let filepath = test_dir.join("traffic.parquet");
        write_traffic_file(&filepath);

        let layer_config = LayerConfig {
            kind: PropertyKind::Buildings,
            ..traffic_layer(&filepath)
        };
        let instant = NaiveTime::from_hms_opt(3, 0, 0).unwrap();
        let layer = load_layer(
            &layer_config,
            &DecoderOptions::default(),
            Some(&instant),
            &hidden_progress(),
        )
        .unwrap();
        assert_eq!(2, layer.collection.len());
        assert_eq!(
            Some(&Value::Int(10)),
            layer.collection.features[0].property("HEIGHT")
        );
    }

    #[test]
    fn test_load_layer_fetch_failure() {
        let test_dir = testdir!();
        let layer_config = traffic_layer(&test_dir.join("missing.parquet"));
        let result = load_layer(
            &layer_config,
            &DecoderOptions::default(),
            None,
            &hidden_progress(),
        );
        assert!(result.is_err());
    }
}
