use std::{fmt, fs, path::PathBuf};

use anyhow::{anyhow, Context};
use bytes::Bytes;
use serde::Deserialize;

/// Where the columnar file of a layer comes from.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub enum Source {
    Url { url: String },
    File { filepath: PathBuf },
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Url { url } => f.write_str(url),
            Source::File { filepath } => write!(f, "{}", filepath.display()),
        }
    }
}

pub fn download(url: &str) -> anyhow::Result<Bytes> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;
    let response = client
        .get(url)
        .send()
        .with_context(|| format!("Fetching {}", url))?;
    let status = response.status();
    if !status.is_success() {
        return Err(anyhow!("Fetching {} failed with HTTP status {}", url, status));
    }
    response
        .bytes()
        .with_context(|| format!("Reading response body of {}", url))
}

/// Fetch the raw bytes of a source. Failures are returned to the caller, nothing is retried.
pub fn fetch(source: &Source) -> anyhow::Result<Bytes> {
    let contents = match source {
        Source::Url { url } => download(url)?,
        Source::File { filepath } => {
            if !filepath.exists() {
                return Err(anyhow!("Source file {:?} not found", filepath));
            }
            Bytes::from(fs::read(filepath).with_context(|| format!("Reading {:?}", filepath))?)
        }
    };
    log::debug!("Fetched {} bytes from {}", contents.len(), source);
    Ok(contents)
}
