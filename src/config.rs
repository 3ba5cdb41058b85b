use std::{
    fs::read_to_string,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context};
use chrono::NaiveTime;
use serde::Deserialize;

use crate::geometry::decoder::DecoderOptions;
use crate::properties::alias::{PropertyKind, GEOMETRY_FIELD_ALIASES};
use crate::source::fetch::Source;

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct LayerConfig {
    pub kind: PropertyKind,
    pub source: Source,
    /// Output file stem. Defaults to the lower-case kind name.
    #[serde(default)]
    pub name: Option<String>,
    /// Replaces the default geometry column aliases when set.
    #[serde(default)]
    pub geometry_fields: Option<Vec<String>>,
}

impl LayerConfig {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| self.kind.name())
    }

    pub fn geometry_fields(&self) -> Vec<&str> {
        match &self.geometry_fields {
            Some(fields) => fields.iter().map(String::as_str).collect(),
            None => GEOMETRY_FIELD_ALIASES.to_vec(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    pub output_dir: PathBuf,
    #[serde(default)]
    pub decode_wkb: bool,
    /// Time of day used to select the active slice of time-indexed layers.
    #[serde(default)]
    pub at: Option<String>,
    pub layers: Vec<LayerConfig>,
}

impl Config {
    pub fn from_file(filepath: &Path) -> anyhow::Result<Self> {
        if !filepath.exists() {
            return Err(anyhow!("Config file {:?} not found", filepath));
        }
        let config_contents = read_to_string(filepath)?;
        serde_yaml::from_str(&config_contents)
            .with_context(|| format!("Parsing config file {:?}", filepath))
    }

    pub fn decoder_options(&self) -> DecoderOptions {
        DecoderOptions {
            wkb: self.decode_wkb,
        }
    }

    /// The instant for temporal filtering. `at_override` takes precedence over the config value.
    pub fn instant(&self, at_override: Option<&str>) -> anyhow::Result<Option<NaiveTime>> {
        at_override
            .or(self.at.as_deref())
            .map(parse_time_of_day)
            .transpose()
    }
}

/// Parse a time of day given as `HH:MM:SS` or `HH:MM`.
pub fn parse_time_of_day(text: &str) -> anyhow::Result<NaiveTime> {
    let text = text.trim();
    NaiveTime::parse_from_str(text, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M"))
        .map_err(|_| anyhow!("Invalid time of day '{}', expected HH:MM[:SS]", text))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use chrono::NaiveTime;
    use rstest::rstest;
    use testdir::testdir;

    use super::{parse_time_of_day, Config};
    use crate::properties::alias::PropertyKind;
    use crate::source::fetch::Source;

    const CONFIG: &str = r#"
output_dir: out
at: "08:00"
layers:
  - kind: Buildings
    source:
      Url:
        url: https://example.org/buildings.parquet
  - kind: Traffic
    name: traffic_morning
    source:
      File:
        filepath: data/traffic.parquet
    geometry_fields: [shape, wkt]
"#;

    #[test]
    fn test_config_from_file() {
        let test_dir = testdir!();
        let config_filepath = test_dir.join("config.yaml");
        std::fs::write(&config_filepath, CONFIG).unwrap();

        let config = Config::from_file(&config_filepath).unwrap();
        assert_eq!(PathBuf::from("out"), config.output_dir);
        assert!(!config.decoder_options().wkb);
        assert_eq!(2, config.layers.len());

        let buildings = &config.layers[0];
        assert_eq!(PropertyKind::Buildings, buildings.kind);
        assert_eq!("buildings", buildings.name());
        assert_eq!(
            vec!["geometry", "GEOMETRY", "geom", "GEOM", "wkt", "WKT"],
            buildings.geometry_fields()
        );

        let traffic = &config.layers[1];
        assert_eq!(
            Source::File {
                filepath: PathBuf::from("data/traffic.parquet")
            },
            traffic.source
        );
        assert_eq!("traffic_morning", traffic.name());
        assert_eq!(vec!["shape", "wkt"], traffic.geometry_fields());
    }

    #[test]
    fn test_missing_config_file() {
        let test_dir = testdir!();
        assert!(Config::from_file(&test_dir.join("missing.yaml")).is_err());
    }

    #[test]
    fn test_instant_override() {
        let config: Config = serde_yaml::from_str(CONFIG).unwrap();
        assert_eq!(
            Some(NaiveTime::from_hms_opt(8, 0, 0).unwrap()),
            config.instant(None).unwrap()
        );
        assert_eq!(
            Some(NaiveTime::from_hms_opt(17, 30, 15).unwrap()),
            config.instant(Some("17:30:15")).unwrap()
        );

        let config = Config { at: None, ..config };
        assert_eq!(None, config.instant(None).unwrap());
    }

    #[rstest]
    #[case("07:00:00", Some((7, 0, 0)))]
    #[case(" 09:00 ", Some((9, 0, 0)))]
    #[case("23:59:59", Some((23, 59, 59)))]
    #[case("25:00", None)]
    #[case("morning", None)]
    fn test_parse_time_of_day(#[case] text: &str, #[case] expected: Option<(u32, u32, u32)>) {
        let expected =
            expected.map(|(hour, minute, second)| NaiveTime::from_hms_opt(hour, minute, second).unwrap());
        assert_eq!(expected, parse_time_of_day(text).ok());
    }
}
