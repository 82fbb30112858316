use super::geo::{centroid_of, feature_bounds};
use super::geojson::Feature;
use geo::prelude::*;
use geo_types::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Layer a feature belongs to. The caller supplies layers in resolution
/// order, which doubles as the deterministic tie-break order.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Municipality,
    Wildfire,
    Flood,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self {
            Kind::Municipality => "municipality",
            Kind::Wildfire => "wildfire",
            Kind::Flood => "flood",
        };
        write!(f, "{}", label)
    }
}

/// Clicks closer than this (in degrees) to a centroid always qualify, so
/// point-like features remain clickable at all.
const MIN_CLICK_RADIUS: f64 = 0.05;

/// The point-in-polygon substitute: a feature is a candidate when the click
/// falls inside its bounding box, or when the planar degree-unit distance to
/// its vertex-average centroid is below `max(0.05, 0.5 * max_span)`. The
/// distance clause covers clicks on a centroid marker that lies outside an
/// irregular outline. Degree-unit distance is only sane for a bounded
/// regional extent.
fn bounding_box_or_proximity(click: Point<f64>, feature: &Feature) -> Option<f64> {
    let bounds = feature_bounds(feature)?;
    let (lat, lon) = centroid_of(feature);
    let centroid = Point::new(lon, lat);
    let distance = click.euclidean_distance(&centroid);

    if bounds.contains(click.y(), click.x()) {
        return Some(distance);
    }
    let max_span = bounds.lat_span().max(bounds.lon_span());
    if distance < MIN_CLICK_RADIUS.max(0.5 * max_span) {
        return Some(distance);
    }
    None
}

/// Map a (lat, lon) click to the most likely feature across the given
/// layers. Among candidates the smallest centroid distance wins; the strict
/// comparison means the first-encountered feature keeps ties, so layer
/// order and feature order decide them. A click matching nothing is a
/// normal outcome, not an error.
pub fn resolve_click<'a>(
    click: (f64, f64),
    layers: &[(Kind, &'a [Feature])],
) -> Option<(&'a Feature, Kind)> {
    let click_point = Point::new(click.1, click.0);
    let mut best: Option<(&Feature, Kind)> = None;
    let mut best_distance = f64::INFINITY;

    for (kind, features) in layers {
        for feature in features.iter() {
            if let Some(distance) = bounding_box_or_proximity(click_point, feature) {
                if distance < best_distance {
                    best_distance = distance;
                    best = Some((feature, *kind));
                }
            }
        }
    }

    best
}
