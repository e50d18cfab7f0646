//! Loading the feature set at startup.
//!
//! Without a configured path the built-in feature set is served. Otherwise
//! the file is read once and parsed as a JSON array of features; the
//! resulting store is never touched again.

use anyhow::Context;
use routeguide_tonic_core::{
    data::builtin_store,
    proto::{Feature, Point},
    store::FeatureStore,
};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct JsonFeature {
    location: JsonLocation,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct JsonLocation {
    latitude: i32,
    longitude: i32,
}

impl From<JsonFeature> for Feature {
    fn from(feature: JsonFeature) -> Self {
        Feature {
            name: feature.name,
            location: Some(Point {
                latitude: feature.location.latitude,
                longitude: feature.location.longitude,
            }),
        }
    }
}

/// Parses a JSON feature database.
pub fn parse_features(json: &str) -> anyhow::Result<FeatureStore> {
    let decoded: Vec<JsonFeature> =
        serde_json::from_str(json).context("malformed feature database")?;
    let store = FeatureStore::new(decoded.into_iter().map(Feature::from))?;
    Ok(store)
}

/// Loads the feature set to serve.
pub fn load(path: Option<&Path>) -> anyhow::Result<FeatureStore> {
    let Some(path) = path else {
        return Ok(builtin_store());
    };

    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read feature database {}", path.display()))?;
    parse_features(&json).with_context(|| format!("in {}", path.display()))
}
