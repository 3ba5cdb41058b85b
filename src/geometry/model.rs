use anyhow::anyhow;

/// A coordinate pair, always ordered as `[longitude, latitude]`.
pub type Position = [f64; 2];

/// A sequence of positions, used for line strings and polygon rings.
pub type PositionList = Vec<Position>;

/// Geometry of a decoded feature.
///
/// Polygon rings are stored as-is: ring 0 is the exterior boundary, the remaining rings are holes.
/// Ring closure is not validated.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Position),
    LineString(PositionList),
    Polygon(Vec<PositionList>),
    MultiLineString(Vec<PositionList>),
    MultiPolygon(Vec<Vec<PositionList>>),
}

impl Geometry {
    /// The GeoJSON type discriminator of this geometry.
    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::LineString(_) => "LineString",
            Geometry::Polygon(_) => "Polygon",
            Geometry::MultiLineString(_) => "MultiLineString",
            Geometry::MultiPolygon(_) => "MultiPolygon",
        }
    }
}

fn to_geojson_position(position: &Position) -> geojson::PointType {
    position.to_vec()
}

fn to_geojson_positions(positions: &PositionList) -> geojson::LineStringType {
    positions.iter().map(to_geojson_position).collect()
}

fn to_geojson_rings(rings: &[PositionList]) -> geojson::PolygonType {
    rings.iter().map(to_geojson_positions).collect()
}

impl From<&Geometry> for geojson::Geometry {
    fn from(geometry: &Geometry) -> Self {
        let value = match geometry {
            Geometry::Point(position) => geojson::Value::Point(to_geojson_position(position)),
            Geometry::LineString(positions) => {
                geojson::Value::LineString(to_geojson_positions(positions))
            }
            Geometry::Polygon(rings) => geojson::Value::Polygon(to_geojson_rings(rings)),
            Geometry::MultiLineString(lines) => {
                geojson::Value::MultiLineString(lines.iter().map(to_geojson_positions).collect())
            }
            Geometry::MultiPolygon(polygons) => geojson::Value::MultiPolygon(
                polygons
                    .iter()
                    .map(|rings| to_geojson_rings(rings))
                    .collect(),
            ),
        };
        geojson::Geometry::new(value)
    }
}

fn from_geojson_position(position: &[f64]) -> anyhow::Result<Position> {
    match position {
        [lon, lat, ..] => Ok([*lon, *lat]),
        _ => Err(anyhow!(
            "Position needs at least two ordinates, got {}",
            position.len()
        )),
    }
}

fn from_geojson_positions(positions: &[Vec<f64>]) -> anyhow::Result<PositionList> {
    positions
        .iter()
        .map(|position| from_geojson_position(position))
        .collect()
}

fn from_geojson_rings(rings: &[Vec<Vec<f64>>]) -> anyhow::Result<Vec<PositionList>> {
    rings
        .iter()
        .map(|ring| from_geojson_positions(ring))
        .collect()
}

/// Accepts structured GeoJSON geometries with one of the five supported type discriminators.
impl TryFrom<&geojson::Geometry> for Geometry {
    type Error = anyhow::Error;

    fn try_from(geometry: &geojson::Geometry) -> anyhow::Result<Self> {
        match &geometry.value {
            geojson::Value::Point(position) => Ok(Geometry::Point(from_geojson_position(position)?)),
            geojson::Value::LineString(positions) => {
                Ok(Geometry::LineString(from_geojson_positions(positions)?))
            }
            geojson::Value::Polygon(rings) => Ok(Geometry::Polygon(from_geojson_rings(rings)?)),
            geojson::Value::MultiLineString(lines) => {
                Ok(Geometry::MultiLineString(from_geojson_rings(lines)?))
            }
            geojson::Value::MultiPolygon(polygons) => Ok(Geometry::MultiPolygon(
                polygons
                    .iter()
                    .map(|rings| from_geojson_rings(rings))
                    .collect::<anyhow::Result<_>>()?,
            )),
            geojson::Value::MultiPoint(_) => Err(anyhow!("Unsupported geometry type MultiPoint")),
            geojson::Value::GeometryCollection(_) => Err(anyhow!(
                "Unsupported geometry type GeometryCollection"
            )),
        }
    }
}

fn from_geo_line_string(line: &geo::LineString) -> PositionList {
    line.coords().map(|coord| [coord.x, coord.y]).collect()
}

fn from_geo_polygon(polygon: &geo::Polygon) -> Vec<PositionList> {
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors().iter())
        .map(from_geo_line_string)
        .collect()
}

impl TryFrom<&geo::Geometry> for Geometry {
    type Error = anyhow::Error;

    fn try_from(geometry: &geo::Geometry) -> anyhow::Result<Self> {
        match geometry {
            geo::Geometry::Point(point) => Ok(Geometry::Point([point.x(), point.y()])),
            geo::Geometry::LineString(line) => Ok(Geometry::LineString(from_geo_line_string(line))),
            geo::Geometry::Polygon(polygon) => Ok(Geometry::Polygon(from_geo_polygon(polygon))),
            geo::Geometry::MultiLineString(lines) => Ok(Geometry::MultiLineString(
                lines.iter().map(from_geo_line_string).collect(),
            )),
            geo::Geometry::MultiPolygon(polygons) => Ok(Geometry::MultiPolygon(
                polygons.iter().map(from_geo_polygon).collect(),
            )),
            _ => Err(anyhow!("Cannot convert geometry {:?}", geometry)),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::Geometry;

    #[rstest]
    #[case(Geometry::Point([10.4, 43.7]), "Point")]
    #[case(Geometry::LineString(vec![[10.4, 43.7], [10.5, 43.8]]), "LineString")]
    #[case(Geometry::Polygon(vec![]), "Polygon")]
    #[case(Geometry::MultiLineString(vec![vec![]]), "MultiLineString")]
    #[case(Geometry::MultiPolygon(vec![]), "MultiPolygon")]
    fn test_type_name_matches_geojson(#[case] geometry: Geometry, #[case] expected: &str) {
        assert_eq!(expected, geometry.type_name());
        let geojson_value = serde_json::to_value(geojson::Geometry::from(&geometry)).unwrap();
        assert_eq!(expected, geojson_value["type"]);
    }

    #[test]
    fn test_geojson_conversion_keeps_lon_lat_order() {
        let geometry = Geometry::Polygon(vec![
            vec![[10.0, 43.0], [11.0, 43.0], [11.0, 44.0]],
            vec![[10.2, 43.2], [10.4, 43.2], [10.4, 43.4]],
        ]);
        let geojson_geometry = geojson::Geometry::from(&geometry);
        match &geojson_geometry.value {
            geojson::Value::Polygon(rings) => {
                assert_eq!(2, rings.len());
                assert_eq!(vec![10.0, 43.0], rings[0][0]);
                assert_eq!(vec![10.4, 43.4], rings[1][2]);
            }
            other => panic!("Unexpected geometry {:?}", other),
        }
        assert_eq!(geometry, Geometry::try_from(&geojson_geometry).unwrap());
    }

    #[test]
    fn test_unsupported_geojson_type_is_rejected() {
        let geojson_geometry =
            geojson::Geometry::new(geojson::Value::MultiPoint(vec![vec![1.0, 2.0]]));
        assert!(Geometry::try_from(&geojson_geometry).is_err());
    }

    #[test]
    fn test_geo_polygon_conversion_keeps_holes() {
        let polygon = geo::Polygon::new(
            vec![(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 0.0)].into(),
            vec![vec![(1.0, 1.0), (2.0, 1.0), (2.0, 2.0), (1.0, 1.0)].into()],
        );
        let geometry = Geometry::try_from(&geo::Geometry::Polygon(polygon)).unwrap();
        match geometry {
            Geometry::Polygon(rings) => {
                assert_eq!(2, rings.len());
                assert_eq!([4.0, 4.0], rings[0][2]);
                assert_eq!([1.0, 1.0], rings[1][0]);
            }
            other => panic!("Unexpected geometry {:?}", other),
        }
    }

    #[test]
    fn test_geo_multi_point_is_rejected() {
        let multi_point = geo::MultiPoint::from(vec![(1.0, 2.0)]);
        assert!(Geometry::try_from(&geo::Geometry::MultiPoint(multi_point)).is_err());
    }
}
