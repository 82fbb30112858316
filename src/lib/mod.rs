//! A geospatial interaction engine for municipality & incident maps.
//!
//! The engine sits between raw GeoJSON data and a rendered map: geometry
//! utilities derive bounding boxes and centroids from polygon rings, a click
//! resolver maps an ambiguous screen click back to the most likely feature,
//! a viewport state machine carries pan/zoom/focus across stateless render
//! cycles, and an ingestion merger folds uploaded incident payloads into the
//! current collection with duplicate suppression.

use filter::{Filter, Group};
use geojson::FeatureCollection;
use ingest::parse_incident_payload;
use output::Output;
use std::error::Error;
use std::io::{Read, Write};

pub mod filter;
pub mod geo;
pub mod geojson;
pub mod ingest;
pub mod output;
pub mod overlay;
pub mod resolve;
pub mod session;
pub mod viewport;

fn read_collection(mut file: impl Read) -> Result<FeatureCollection, Box<dyn Error>> {
    let mut raw = String::new();
    file.read_to_string(&mut raw)?;
    let collection = parse_incident_payload(&raw)?;
    Ok(collection)
}

/// Merge an uploaded incident payload into an existing collection and write
/// the merged GeoJSON document. Returns (added, duplicates).
pub fn merge(
    existing: impl Read,
    upload: impl Read,
    writer: &mut dyn Write,
) -> Result<(usize, usize), Box<dyn Error>> {
    let existing = read_collection(existing)?;
    let incoming = read_collection(upload)?;
    let outcome = ingest::merge_incidents(&existing, &incoming);
    outcome.merged.write_geojson(writer)?;
    Ok((outcome.added, outcome.duplicates))
}

/// Write one JSON summary line (name, type, status, centroid, bounds) per
/// feature, optionally restricted by property selector groups.
pub fn summarize(
    file: impl Read,
    writer: &mut dyn Write,
    groups: Option<&[Group]>,
) -> Result<(), Box<dyn Error>> {
    let collection = read_collection(file)?;
    match groups {
        Some(groups) => {
            let selected: Vec<_> = collection
                .features
                .iter()
                .filter(|f| groups.accepts(f))
                .cloned()
                .collect();
            selected.write_json_lines(writer)?;
        }
        None => collection.write_json_lines(writer)?,
    }
    Ok(())
}

/// Write the union bounding box of a collection as a JSON object.
pub fn bounds(file: impl Read, writer: &mut dyn Write) -> Result<(), Box<dyn Error>> {
    let collection = read_collection(file)?;
    let bounds = geo::bounds_of(&collection.features);
    let json = serde_json::to_string(&bounds)?;
    writeln!(writer, "{}", json)?;
    Ok(())
}
