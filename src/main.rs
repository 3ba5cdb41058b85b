extern crate log;
pub mod collection;
pub mod config;
pub mod geometry;
pub mod layer;
pub mod properties;
pub mod source;
use crate::collection::geojson::write_collection_to_geojson;
use crate::config::{Config, LayerConfig};
use crate::layer::{load_layer, LoadedLayer};
use anyhow::{anyhow, Context};
use clap::Parser;
use indicatif::MultiProgress;
use rayon::prelude::*;
use std::fs;
use std::path::Path;

/// Convert columnar layer files into GeoJSON feature collections.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the input config file.
    #[arg(short, long)]
    config_filepath: String,

    /// Time of day (HH:MM[:SS]) selecting the active slice of time-indexed layers. Overrides the
    /// config value.
    #[arg(short, long)]
    at: Option<String>,
}

fn write_layer(layer: &LoadedLayer, output_dir: &Path) -> anyhow::Result<()> {
    let output_filepath = output_dir.join(format!("{}.geojson", layer.name));
    log::info!(
        "Writing {} {} features to {:?}",
        layer.collection.len(),
        layer.kind,
        &output_filepath
    );
    write_collection_to_geojson(&layer.collection, &output_filepath)
        .with_context(|| format!("Writing {:?}", output_filepath))
}

fn try_main() -> anyhow::Result<()> {
    let args = Args::try_parse()?;
    let config = Config::from_file(Path::new(&args.config_filepath))?;
    let options = config.decoder_options();
    let instant = config.instant(args.at.as_deref())?;
    fs::create_dir_all(&config.output_dir)?;

    // Layers are independent, so they are loaded concurrently.
    let progress = MultiProgress::new();
    let results: Vec<(&LayerConfig, anyhow::Result<LoadedLayer>)> = config
        .layers
        .par_iter()
        .map(|layer_config| {
            let result = load_layer(layer_config, &options, instant.as_ref(), &progress);
            (layer_config, result)
        })
        .collect();

    let mut failures = 0;
    for (layer_config, result) in results {
        if let Err(err) = result.and_then(|layer| write_layer(&layer, &config.output_dir)) {
            log::error!(
                "Layer {} from {} failed: {:?}",
                layer_config.name(),
                layer_config.source,
                err
            );
            failures += 1;
        }
    }
    if failures > 0 {
        return Err(anyhow!(
            "{} of {} layers failed",
            failures,
            config.layers.len()
        ));
    }
    Ok(())
}

fn main() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    env_logger::init();
    if let Err(e) = try_main() {
        eprintln!("Error: {:?}", e);
        std::process::exit(1)
    }
}
