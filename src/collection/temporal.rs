use chrono::Timelike;

use super::feature::{Feature, FeatureCollection};

/// Seconds in a day, the validity end used for features without an `end` property.
pub const END_OF_DAY_SECONDS: f64 = 86400.0;

/// Validity interval of a feature in seconds since local midnight, both ends inclusive.
/// Missing or non-numeric bounds default to the whole day.
pub fn validity_interval(feature: &Feature) -> (f64, f64) {
    let bound = |name: &str, default: f64| {
        feature
            .property(name)
            .and_then(|value| value.as_f64())
            .unwrap_or(default)
    };
    (bound("begin", 0.0), bound("end", END_OF_DAY_SECONDS))
}

pub fn is_active_at(feature: &Feature, seconds_since_midnight: f64) -> bool {
    let (begin, end) = validity_interval(feature);
    begin <= seconds_since_midnight && seconds_since_midnight <= end
}

/// Select the features whose validity interval contains the time of day of `instant`.
///
/// Returns a new collection in the original relative order; `collection` is left untouched.
pub fn filter_active(collection: &FeatureCollection, instant: &impl Timelike) -> FeatureCollection {
    let seconds = f64::from(instant.num_seconds_from_midnight());
    collection
        .iter()
        .filter(|feature| is_active_at(feature, seconds))
        .cloned()
        .collect()
}
