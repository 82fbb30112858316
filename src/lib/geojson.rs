use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An ordered sequence of (lon, lat) vertices. Rings may be open or closed,
/// consumers must not assume closure.
pub type Ring = Vec<(f64, f64)>;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum Geometry {
    Polygon { coordinates: Vec<Ring> },
    MultiPolygon { coordinates: Vec<Vec<Ring>> },
    /// Any geometry type this engine does not handle. It deserializes without
    /// error and contributes no coordinates.
    #[serde(other)]
    Unsupported,
}

fn feature_tag() -> String {
    "Feature".to_string()
}

fn collection_tag() -> String {
    "FeatureCollection".to_string()
}

/// A geometry-plus-properties record. Immutable once ingested; updated data
/// is produced as a new collection, never by mutating features in place.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Feature {
    #[serde(rename = "type", default = "feature_tag")]
    tag: String,
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl Feature {
    pub fn new(geometry: Option<Geometry>, properties: Map<String, Value>) -> Self {
        Feature {
            tag: feature_tag(),
            geometry,
            properties,
        }
    }

    fn str_property(&self, key: &str) -> Option<&str> {
        self.properties.get(key)?.as_str()
    }

    pub fn name(&self) -> Option<&str> {
        self.str_property("name")
    }

    /// The incident type by convention, `"wildfire"` or `"flood"`.
    pub fn incident_kind(&self) -> Option<&str> {
        self.str_property("type")
    }

    /// `status` with a fallback to `confidence`, since uploads use either key.
    pub fn status(&self) -> Option<&str> {
        self.str_property("status")
            .or_else(|| self.str_property("confidence"))
    }

    pub fn population(&self) -> Option<f64> {
        self.properties.get("population_2021")?.as_f64()
    }

    pub fn started_at(&self) -> Option<&str> {
        self.str_property("started_at")
    }

    pub fn description(&self) -> Option<&str> {
        self.str_property("description")
    }
}

impl Default for Feature {
    fn default() -> Self {
        Feature::new(None, Map::new())
    }
}

/// An order-preserving sequence of features. Insertion order is the tie-break
/// order for click resolution and the append order for merges.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FeatureCollection {
    #[serde(rename = "type", default = "collection_tag")]
    tag: String,
    #[serde(default)]
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        FeatureCollection {
            tag: collection_tag(),
            features,
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl Default for FeatureCollection {
    fn default() -> Self {
        FeatureCollection::new(vec![])
    }
}

impl std::iter::FromIterator<Feature> for FeatureCollection {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        FeatureCollection::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
pub mod test_helpers {
    use super::*;
    use serde_json::json;

    pub fn polygon(ring: &[(f64, f64)]) -> Geometry {
        Geometry::Polygon {
            coordinates: vec![ring.to_vec()],
        }
    }

    pub fn feature(ring: &[(f64, f64)], properties: &[(&str, Value)]) -> Feature {
        let mut map = Map::new();
        for (key, value) in properties {
            map.insert((*key).to_string(), value.clone());
        }
        Feature::new(Some(polygon(ring)), map)
    }

    pub fn incident(name: &str, kind: &str, status: &str, ring: &[(f64, f64)]) -> Feature {
        feature(
            ring,
            &[
                ("name", json!(name)),
                ("type", json!(kind)),
                ("status", json!(status)),
            ],
        )
    }
}


#[cfg(test)]
mod properties {
    use super::test_helpers::feature;
    use serde_json::json;

    #[test]
    fn status_falls_back_to_confidence() {
        let f = feature(&[], &[("confidence", json!("suspected"))]);
        assert_eq!(f.status(), Some("suspected"));
    }

    #[test]
    fn status_takes_precedence_over_confidence() {
        let f = feature(
            &[],
            &[("status", json!("confirmed")), ("confidence", json!("suspected"))],
        );
        assert_eq!(f.status(), Some("confirmed"));
    }

    #[test]
    fn population_requires_a_number() {
        let f = feature(&[], &[("population_2021", json!("many"))]);
        assert_eq!(f.population(), None);
        let f = feature(&[], &[("population_2021", json!(749607))]);
        assert_eq!(f.population(), Some(749607.0));
    }
}
