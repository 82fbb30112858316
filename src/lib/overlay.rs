use super::geojson::{Feature, FeatureCollection, Geometry, Ring};
use geo::prelude::*;
use geo_types::{LineString, Polygon};
use log::warn;
use serde_json::Map;
use std::collections::HashMap;
use std::error::Error;

/// Memoizes boundary/parks fetches by a stable string key (the query
/// string), so repeated render cycles never re-fetch. A failed fetch is
/// memoized as a disabled layer rather than propagated; rendering must stay
/// producible without the overlay.
#[derive(Default)]
pub struct OverlayCache {
    entries: HashMap<String, Option<FeatureCollection>>,
}

impl OverlayCache {
    pub fn new() -> Self {
        OverlayCache::default()
    }

    /// Return the cached overlay for `key`, invoking `fetch` only on the
    /// first request. `None` means the layer is disabled for the session.
    pub fn fetch_with<F>(&mut self, key: &str, fetch: F) -> Option<&FeatureCollection>
    where
        F: FnOnce() -> Result<FeatureCollection, Box<dyn Error>>,
    {
        if !self.entries.contains_key(key) {
            let entry = match fetch() {
                Ok(collection) => Some(collection),
                Err(err) => {
                    warn!("overlay fetch for {:?} failed, layer disabled: {}", key, err);
                    None
                }
            };
            self.entries.insert(key.to_string(), entry);
        }
        self.entries.get(key).and_then(|entry| entry.as_ref())
    }

    /// True when a fetch for `key` was attempted and failed.
    pub fn is_disabled(&self, key: &str) -> bool {
        matches!(self.entries.get(key), Some(None))
    }
}

fn ring_area(ring: &Ring) -> f64 {
    let line_string: LineString<f64> = ring.clone().into();
    let polygon = Polygon::new(line_string, vec![]);
    polygon.signed_area().abs()
}

fn largest_exterior_ring(geometry: &Geometry) -> Option<&Ring> {
    match geometry {
        Geometry::Polygon { coordinates } => coordinates.first(),
        Geometry::MultiPolygon { coordinates } => coordinates
            .iter()
            .filter_map(|polygon| polygon.first())
            .max_by(|a, b| {
                let a_area = ring_area(a);
                let b_area = ring_area(b);
                a_area.partial_cmp(&b_area).unwrap_or(std::cmp::Ordering::Equal)
            }),
        Geometry::Unsupported => None,
    }
}

/// Build a world-covering polygon with the boundary's largest exterior ring
/// punched out as a hole, used to gray out everything outside the region.
/// Returns `None` when the boundary has no usable ring.
pub fn mask_for_boundary(boundary: &Feature) -> Option<Feature> {
    let geometry = boundary.geometry.as_ref()?;
    let hole = largest_exterior_ring(geometry)?.clone();
    if hole.is_empty() {
        return None;
    }
    let world: Ring = vec![
        (-180.0, -90.0),
        (180.0, -90.0),
        (180.0, 90.0),
        (-180.0, 90.0),
        (-180.0, -90.0),
    ];
    let mask = Geometry::Polygon {
        coordinates: vec![world, hole],
    };
    Some(Feature::new(Some(mask), Map::new()))
}
