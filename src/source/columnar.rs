use anyhow::Context;
use bytes::Bytes;
use indicatif::{MultiProgress, ProgressBar};
use parquet::file::reader::{FileReader, SerializedFileReader};
use parquet::record::{Field, Row as Record};

use crate::geometry::model::Geometry;
use crate::properties::value::{Row, Value};

/// Read every record of a Parquet payload into rows, in file order. The progress bar is drawn
/// under `progress`, which is shared by loads running in parallel.
pub fn read_rows(contents: Bytes, progress: &MultiProgress) -> anyhow::Result<Vec<Row>> {
    let reader = SerializedFileReader::new(contents).context("Opening Parquet payload")?;
    let num_rows = reader.metadata().file_metadata().num_rows();
    let mut rows = Vec::with_capacity(usize::try_from(num_rows).unwrap_or_default());

    let bar = progress.add(ProgressBar::new(u64::try_from(num_rows).unwrap_or_default()));
    for record in reader.get_row_iter(None)? {
        rows.push(record_to_row(&record?));
        bar.inc(1);
    }
    bar.finish_and_clear();

    log::info!("Loaded {} rows", rows.len());
    if let Some(sample) = rows.first() {
        log::debug!(
            "Available fields: {:?}",
            sample.column_names().collect::<Vec<&str>>()
        );
        log::debug!("Sample row: {:?}", sample);
    }
    Ok(rows)
}

fn record_to_row(record: &Record) -> Row {
    record
        .get_column_iter()
        .map(|(name, field)| (name.as_str(), field_to_value(field)))
        .collect()
}

fn field_to_value(field: &Field) -> Value {
    match field {
        Field::Null => Value::Null,
        Field::Bool(value) => Value::Bool(*value),
        Field::Byte(value) => Value::Int(i64::from(*value)),
        Field::Short(value) => Value::Int(i64::from(*value)),
        Field::Int(value) => Value::Int(i64::from(*value)),
        Field::Long(value) => Value::Int(*value),
        Field::UByte(value) => Value::Int(i64::from(*value)),
        Field::UShort(value) => Value::Int(i64::from(*value)),
        Field::UInt(value) => Value::Int(i64::from(*value)),
        Field::ULong(value) => match i64::try_from(*value) {
            Ok(value) => Value::Int(value),
            Err(_) => Value::Float(*value as f64),
        },
        Field::Float(value) => Value::Float(f64::from(*value)),
        Field::Double(value) => Value::Float(*value),
        Field::Decimal(_) => field
            .to_string()
            .parse()
            .map(Value::Float)
            .unwrap_or(Value::Null),
        Field::Str(value) => Value::Str(value.clone()),
        Field::Bytes(value) => Value::Bytes(value.data().to_vec()),
        Field::Date(days) => Value::Int(i64::from(*days)),
        Field::TimestampMillis(value) | Field::TimestampMicros(value) => Value::Int(*value),
        Field::Group(group) => group_to_geometry(group)
            .map(Value::Geometry)
            .unwrap_or(Value::Null),
        _ => {
            log::debug!("Treating unsupported column value {} as null", field);
            Value::Null
        }
    }
}

/// A group column holding a GeoJSON-shaped geometry (`type` + `coordinates`).
fn group_to_geometry(group: &Record) -> Option<Geometry> {
    let json = group_to_json(group);
    json.get("type")?;
    let geometry: geojson::Geometry = serde_json::from_value(json).ok()?;
    Geometry::try_from(&geometry).ok()
}

fn group_to_json(group: &Record) -> serde_json::Value {
    serde_json::Value::Object(
        group
            .get_column_iter()
            .map(|(name, field)| (name.clone(), field_to_json(field)))
            .collect(),
    )
}

fn field_to_json(field: &Field) -> serde_json::Value {
    match field {
        Field::Group(group) => group_to_json(group),
        Field::ListInternal(list) => {
            serde_json::Value::Array(list.elements().iter().map(field_to_json).collect())
        }
        other => serde_json::Value::from(&field_to_value(other)),
    }
}
