use std::fmt;

use serde::Deserialize;

/// Column names a geometry is looked up under, in priority order.
pub const GEOMETRY_FIELD_ALIASES: [&str; 6] = ["geometry", "GEOMETRY", "geom", "GEOM", "wkt", "WKT"];

/// A normalized property the rendering layer expects, with the source columns it can be resolved
/// from in priority order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanonicalAttribute {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    /// Value used when none of the aliases is present. `None` leaves the property unset.
    pub default: Option<i64>,
}

const fn attribute(
    name: &'static str,
    aliases: &'static [&'static str],
    default: Option<i64>,
) -> CanonicalAttribute {
    CanonicalAttribute {
        name,
        aliases,
        default,
    }
}

const ID: CanonicalAttribute = attribute("id", &["id", "ID"], None);

static BUILDING_ATTRIBUTES: [CanonicalAttribute; 3] = [
    attribute("HEIGHT", &["HEIGHT", "height", "h"], Some(10)),
    attribute("POP", &["POP", "population", "pop"], Some(0)),
    ID,
];

static ROAD_ATTRIBUTES: [CanonicalAttribute; 1] = [ID];

static TRAFFIC_ATTRIBUTES: [CanonicalAttribute; 9] = [
    ID,
    attribute("vehicles", &["vehicles", "VEHICLES", "Vehicles"], Some(0)),
    attribute("speed", &["speed", "SPEED", "Speed"], Some(0)),
    attribute("HW_truck", &["HW_truck", "hw_truck"], Some(0)),
    attribute("LMV_passengers", &["LMV_passengers", "lmv_passengers"], Some(0)),
    attribute("MHV_deliver", &["MHV_deliver", "mhv_deliver"], Some(0)),
    attribute("PWA_moped", &["PWA_moped", "pwa_moped"], Some(0)),
    attribute("begin", &["begin", "BEGIN", "Begin"], None),
    attribute("end", &["end", "END", "End"], None),
];

/// The kind of layer a batch of rows describes. Selects the canonical attribute set.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    Buildings,
    Roads,
    Traffic,
}

impl PropertyKind {
    pub fn attributes(&self) -> &'static [CanonicalAttribute] {
        match self {
            PropertyKind::Buildings => &BUILDING_ATTRIBUTES,
            PropertyKind::Roads => &ROAD_ATTRIBUTES,
            PropertyKind::Traffic => &TRAFFIC_ATTRIBUTES,
        }
    }

    /// Whether features of this kind carry `begin`/`end` validity intervals.
    pub fn is_time_indexed(&self) -> bool {
        matches!(self, PropertyKind::Traffic)
    }

    pub fn name(&self) -> &'static str {
        match self {
            PropertyKind::Buildings => "buildings",
            PropertyKind::Roads => "roads",
            PropertyKind::Traffic => "traffic",
        }
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
