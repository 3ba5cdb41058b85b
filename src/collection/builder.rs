use crate::geometry::decoder::{decode_geometry, DecoderOptions};
use crate::properties::alias::PropertyKind;
use crate::properties::normalize::normalize_properties;
use crate::properties::value::{Row, Value};

use super::feature::{Feature, FeatureCollection};

/// Result of building a collection: the valid features and how many rows were dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildOutcome {
    pub collection: FeatureCollection,
    pub dropped: usize,
}

/// The geometry cell of a row: the first present column in `geometry_fields` that is not blank text.
fn geometry_value<'r>(row: &'r Row, geometry_fields: &[&str]) -> Option<&'r Value> {
    geometry_fields
        .iter()
        .filter_map(|name| row.get_present(name))
        .find(|value| !matches!(value, Value::Str(text) if text.trim().is_empty()))
}

/// Turn source rows into features, keeping source order.
///
/// The geometry of each row is read from the first present column in `geometry_fields`. Rows whose
/// geometry cannot be decoded are skipped and counted, they never abort the batch.
pub fn build_feature_collection<'r>(
    rows: impl IntoIterator<Item = &'r Row>,
    geometry_fields: &[&str],
    kind: PropertyKind,
    options: &DecoderOptions,
) -> BuildOutcome {
    let attributes = kind.attributes();
    let mut features = Vec::new();
    let mut dropped = 0;

    for (index, row) in rows.into_iter().enumerate() {
        match decode_geometry(geometry_value(row, geometry_fields), options) {
            Ok(geometry) => {
                log::trace!("{} row {} decoded as {}", kind, index, geometry.type_name());
                features.push(Feature {
                    geometry,
                    properties: normalize_properties(row, attributes),
                })
            }
            Err(err) => {
                log::warn!("No valid geometry found for {} row {}: {}", kind, index, err);
                dropped += 1;
            }
        }
    }

    log::info!(
        "{} features created: {} kept, {} dropped",
        kind,
        features.len(),
        dropped
    );
    BuildOutcome {
        collection: FeatureCollection { features },
        dropped,
    }
}
