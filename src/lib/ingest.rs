use super::geo::feature_coords;
use super::geojson::{Feature, FeatureCollection, Geometry};
use serde_json::{Map, Value};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),
    #[error("invalid format: expected GeoJSON or custom JSON with 'incidents' key")]
    UnrecognizedFormat,
}

/// Parse an uploaded incident payload into a feature collection.
///
/// Accepts either a standard GeoJSON FeatureCollection, returned as-is, or a
/// custom `{ "incidents": [...] }` document where each entry carries its own
/// `geometry` next to flat properties; the flat keys are moved into
/// `properties`. Anything else is rejected.
pub fn parse_incident_payload(raw: &str) -> Result<FeatureCollection, ParseError> {
    let value: Value = serde_json::from_str(raw)?;
    parse_incident_value(value)
}

pub fn parse_incident_value(value: Value) -> Result<FeatureCollection, ParseError> {
    if value.get("type").and_then(Value::as_str) == Some("FeatureCollection") {
        let collection = serde_json::from_value(value)?;
        return Ok(collection);
    }
    match value.get("incidents").and_then(Value::as_array) {
        Some(incidents) => {
            let features = incidents
                .iter()
                .filter_map(|incident| {
                    let entries = incident.as_object()?;
                    let geometry_value = entries.get("geometry")?.clone();
                    let geometry: Geometry = serde_json::from_value(geometry_value).ok()?;
                    let properties: Map<String, Value> = entries
                        .iter()
                        .filter(|(key, _)| key.as_str() != "geometry")
                        .map(|(key, value)| (key.clone(), value.clone()))
                        .collect();
                    Some(Feature::new(Some(geometry), properties))
                })
                .collect();
            Ok(features)
        }
        None => Err(ParseError::UnrecognizedFormat),
    }
}

/// The dedup key: name, incident type and the first coordinate of the
/// geometry. Two distinct features sharing all three are treated as
/// duplicates; re-uploading the same file is a no-op.
fn dedup_signature(feature: &Feature) -> String {
    let name = feature.name().unwrap_or("");
    let kind = feature.incident_kind().unwrap_or("");
    match feature_coords(feature).next() {
        Some((lon, lat)) => format!("{}-{}-({}, {})", name, kind, lon, lat),
        None => format!("{}-{}-", name, kind),
    }
}

pub struct MergeOutcome {
    pub merged: FeatureCollection,
    pub added: usize,
    pub duplicates: usize,
}

/// Merge `incoming` into `existing` with signature-based duplicate
/// suppression. Existing features come first, accepted incoming features
/// follow in their original order. Pure: neither input is mutated, the
/// caller replaces its stored collection with `merged`.
pub fn merge_incidents(existing: &FeatureCollection, incoming: &FeatureCollection) -> MergeOutcome {
    let mut signatures: HashSet<String> = existing.features.iter().map(dedup_signature).collect();

    let mut merged = existing.clone();
    let mut added = 0;
    let mut duplicates = 0;
    for feature in &incoming.features {
        let signature = dedup_signature(feature);
        if signatures.insert(signature) {
            merged.features.push(feature.clone());
            added += 1;
        } else {
            duplicates += 1;
        }
    }

    MergeOutcome {
        merged,
        added,
        duplicates,
    }
}
