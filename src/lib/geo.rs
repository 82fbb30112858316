use super::geojson::{Feature, Geometry};
use itertools::Itertools;
use itertools::MinMaxResult::{MinMax, NoElements, OneElement};
use serde::{Deserialize, Serialize};

/// Default view center for the study region (southern Manitoba prairie).
pub const REGION_CENTER: (f64, f64) = (53.7609, -98.8139);

/// Default zoom level paired with [`REGION_CENTER`].
pub const DEFAULT_ZOOM: u32 = 5;

/// Centroid returned for features without any coordinates.
pub const FALLBACK_CENTROID: (f64, f64) = (50.0, -97.0);

/// An axis-aligned (lat, lon) rectangle.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub south_west: (f64, f64),
    pub north_east: (f64, f64),
}

impl BoundingBox {
    /// Approximate bounds of the study region, used whenever a collection
    /// yields no coordinates at all.
    pub fn region_fallback() -> Self {
        BoundingBox {
            south_west: (48.0, -102.0),
            north_east: (60.5, -88.0),
        }
    }

    pub fn midpoint(&self) -> (f64, f64) {
        (
            (self.south_west.0 + self.north_east.0) / 2.0,
            (self.south_west.1 + self.north_east.1) / 2.0,
        )
    }

    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        self.south_west.0 <= lat
            && lat <= self.north_east.0
            && self.south_west.1 <= lon
            && lon <= self.north_east.1
    }

    pub fn lat_span(&self) -> f64 {
        self.north_east.0 - self.south_west.0
    }

    pub fn lon_span(&self) -> f64 {
        self.north_east.1 - self.south_west.1
    }
}

/// Yield (lon, lat) pairs from a geometry, flattening Polygon/MultiPolygon
/// rings in document order. Unsupported geometries yield nothing.
pub fn iter_coords<'a>(geometry: &'a Geometry) -> Box<dyn Iterator<Item = (f64, f64)> + 'a> {
    match geometry {
        Geometry::Polygon { coordinates } => Box::new(coordinates.iter().flatten().copied()),
        Geometry::MultiPolygon { coordinates } => {
            Box::new(coordinates.iter().flatten().flatten().copied())
        }
        Geometry::Unsupported => Box::new(std::iter::empty()),
    }
}

/// Yield (lon, lat) pairs from a feature's geometry, if any.
pub fn feature_coords<'a>(feature: &'a Feature) -> impl Iterator<Item = (f64, f64)> + 'a {
    feature.geometry.iter().flat_map(iter_coords)
}

/// The feature's own bounding box, or `None` when its geometry has no
/// coordinates. No region fallback here: a coordinate-less feature must
/// never match a click.
pub fn feature_bounds(feature: &Feature) -> Option<BoundingBox> {
    bounds_of_coords(feature_coords(feature))
}

fn bounds_of_coords(coords: impl Iterator<Item = (f64, f64)>) -> Option<BoundingBox> {
    let coords: Vec<(f64, f64)> = coords.collect();
    let (west, east) = match coords.iter().map(|&(lon, _)| lon).minmax() {
        NoElements => return None,
        OneElement(lon) => (lon, lon),
        MinMax(min, max) => (min, max),
    };
    let (south, north) = match coords.iter().map(|&(_, lat)| lat).minmax() {
        NoElements => return None,
        OneElement(lat) => (lat, lat),
        MinMax(min, max) => (min, max),
    };
    Some(BoundingBox {
        south_west: (south, west),
        north_east: (north, east),
    })
}

/// Union bounding box over all coordinates of all features. An input without
/// any coordinates returns the fixed region fallback box.
pub fn bounds_of<'a>(features: impl IntoIterator<Item = &'a Feature>) -> BoundingBox {
    let coords = features.into_iter().flat_map(feature_coords);
    bounds_of_coords(coords).unwrap_or_else(BoundingBox::region_fallback)
}

/// Vertex-average centroid (lat, lon): the arithmetic mean of all vertex
/// latitudes and longitudes, not an area-weighted centroid.
pub fn centroid_of(feature: &Feature) -> (f64, f64) {
    let mut lat_sum = 0.0;
    let mut lon_sum = 0.0;
    let mut count = 0usize;
    for (lon, lat) in feature_coords(feature) {
        lon_sum += lon;
        lat_sum += lat;
        count += 1;
    }
    if count == 0 {
        return FALLBACK_CENTROID;
    }
    (lat_sum / count as f64, lon_sum / count as f64)
}

pub const PADDING_FRACTION: f64 = 0.1;
pub const MIN_PADDING: f64 = 0.01;

/// The feature's bounding box expanded on each axis by
/// `max(span * padding_fraction, min_padding)`. The minimum padding keeps
/// degenerate (point-like or axis-aligned) geometries from producing a
/// zero-size box. Used as the "zoom to this feature" target.
pub fn padded_bounds(feature: &Feature, padding_fraction: f64, min_padding: f64) -> BoundingBox {
    let bounds = feature_bounds(feature).unwrap_or_else(BoundingBox::region_fallback);
    let lat_pad = (bounds.lat_span() * padding_fraction).max(min_padding);
    let lon_pad = (bounds.lon_span() * padding_fraction).max(min_padding);
    BoundingBox {
        south_west: (bounds.south_west.0 - lat_pad, bounds.south_west.1 - lon_pad),
        north_east: (bounds.north_east.0 + lat_pad, bounds.north_east.1 + lon_pad),
    }
}


#[cfg(test)]
mod bounds_of {
    use super::*;
    use crate::geojson::test_helpers::feature;

    #[test]
    fn union_contains_every_coordinate() {
        let a = feature(&[(5.0, 49.0), (6.0, 50.0), (7.0, 49.0)], &[]);
        let b = feature(&[(-1.0, 52.0), (0.5, 53.5)], &[]);
        let features = vec![a, b];
        let bounds = bounds_of(&features);
        for f in &features {
            for (lon, lat) in feature_coords(f) {
                assert!(bounds.contains(lat, lon));
            }
        }
        assert_eq!(bounds.south_west, (49.0, -1.0));
        assert_eq!(bounds.north_east, (53.5, 7.0));
    }

    #[test]
    fn empty_collection_returns_region_fallback() {
        let features: Vec<Feature> = vec![];
        assert_eq!(bounds_of(&features), BoundingBox::region_fallback());
    }

    #[test]
    fn features_without_coordinates_return_region_fallback() {
        let features = vec![Feature::default()];
        assert_eq!(bounds_of(&features), BoundingBox::region_fallback());
    }
}
