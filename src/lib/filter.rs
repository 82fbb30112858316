use super::geojson::{Feature, FeatureCollection};
use serde_json::Value;

#[derive(PartialEq, Debug, Clone)]
pub enum Condition {
    PropertyPresence(String),
    ValueMatch(String, String),
}

impl Condition {
    pub fn new(key: &str, value: Option<&str>) -> Self {
        if let Some(value) = value {
            return Condition::ValueMatch(key.into(), value.into());
        }
        Condition::PropertyPresence(key.into())
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct Group {
    pub conditions: Vec<Condition>,
}

fn parse_condition(condition_str: &str) -> Condition {
    let split_str: Vec<&str> = condition_str.splitn(2, '~').collect();
    if split_str.len() < 2 {
        Condition::PropertyPresence(split_str[0].into())
    } else {
        let key = split_str[0];
        let value = split_str[1];
        Condition::ValueMatch(key.into(), value.into())
    }
}

fn parse_group(group_str: &str) -> Group {
    let condition_strs: Vec<&str> = group_str.split('+').collect();
    let conditions = condition_strs.into_iter().map(parse_condition).collect();
    Group { conditions }
}

/// Parse a selector expression into filter groups.
///
/// Stating a property key (`status`) picks every feature carrying that key.
/// A `~` separator narrows a statement to a specific value
/// (`type~wildfire`), `+` combines statements that must all hold
/// (`type~wildfire+status~confirmed`), and `,` concatenates alternative
/// groups (`type~wildfire+status~confirmed,type~flood`). A feature matching
/// either group is included.
///
/// # Example
///
/// ```
/// use incident_map::filter::parse;
///
/// let groups = parse("type~wildfire+status~confirmed,type~flood");
/// assert_eq!(groups.len(), 2);
/// let group = &groups[0];
/// assert_eq!(group.conditions.len(), 2);
/// ```
pub fn parse(selector_str: &str) -> Vec<Group> {
    let group_strs: Vec<&str> = selector_str.split(',').collect();
    group_strs.into_iter().map(parse_group).collect()
}

fn value_matches(value: &Value, expected: &str) -> bool {
    match value {
        Value::String(s) => s == expected,
        Value::Number(n) => expected.parse::<f64>().ok() == n.as_f64(),
        Value::Bool(b) => expected.parse::<bool>().ok() == Some(*b),
        _ => false,
    }
}

fn check_condition(feature: &Feature, condition: &Condition) -> bool {
    match condition {
        Condition::PropertyPresence(key) => feature.properties.contains_key(key.as_str()),
        Condition::ValueMatch(key, value) => feature
            .properties
            .get(key.as_str())
            .map(|v| value_matches(v, value))
            .unwrap_or(false),
    }
}

fn check_group(feature: &Feature, group: &Group) -> bool {
    group.conditions.iter().all(|c| check_condition(feature, c))
}

pub trait Filter {
    fn accepts(&self, feature: &Feature) -> bool;
}

impl Filter for [Group] {
    fn accepts(&self, feature: &Feature) -> bool {
        self.iter().any(|group| check_group(feature, group))
    }
}

/// Sidebar-style municipality filter: a set of accepted statuses plus an
/// inclusive population range. Features without a numeric `population_2021`
/// never pass. Only the `status` property counts here; the `confidence`
/// fallback is an incident convention.
#[derive(Debug, Clone, PartialEq)]
pub struct MunicipalityFilter {
    pub statuses: Vec<String>,
    pub population: (f64, f64),
}

impl Filter for MunicipalityFilter {
    fn accepts(&self, feature: &Feature) -> bool {
        let status = feature
            .properties
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or("Unknown");
        if !self.statuses.iter().any(|s| s == status) {
            return false;
        }
        match feature.population() {
            Some(pop) => self.population.0 <= pop && pop <= self.population.1,
            None => false,
        }
    }
}

/// Incident display filter: per-kind toggles and the accepted status values.
#[derive(Debug, Clone, PartialEq)]
pub struct IncidentFilter {
    pub wildfires: bool,
    pub floods: bool,
    pub statuses: Vec<String>,
}

impl Default for IncidentFilter {
    fn default() -> Self {
        IncidentFilter {
            wildfires: true,
            floods: true,
            statuses: vec!["confirmed".to_string(), "suspected".to_string()],
        }
    }
}

impl IncidentFilter {
    fn status_passes(&self, feature: &Feature) -> bool {
        match feature.status() {
            Some(status) => self.statuses.iter().any(|s| s == status),
            None => false,
        }
    }
}

/// Split a collection into (wildfires, floods) honoring the status filter.
/// Features of any other kind are dropped. The per-kind display toggles are
/// applied by the caller, not here, so counts stay available for summaries.
pub fn split_incidents(
    collection: &FeatureCollection,
    filter: &IncidentFilter,
) -> (FeatureCollection, FeatureCollection) {
    let mut wildfires = FeatureCollection::default();
    let mut floods = FeatureCollection::default();
    for feature in &collection.features {
        if !filter.status_passes(feature) {
            continue;
        }
        match feature.incident_kind() {
            Some("wildfire") => wildfires.features.push(feature.clone()),
            Some("flood") => floods.features.push(feature.clone()),
            _ => {}
        }
    }
    (wildfires, floods)
}

/// Copy the long-form municipality property names (`MUNI_NAME`,
/// `MUNI_STATU`) onto the conventional short keys where those are absent,
/// producing a new collection.
pub fn normalize_municipalities(collection: &FeatureCollection) -> FeatureCollection {
    collection
        .features
        .iter()
        .map(|feature| {
            let mut feature = feature.clone();
            if !feature.properties.contains_key("name") {
                if let Some(name) = feature.properties.get("MUNI_NAME").cloned() {
                    feature.properties.insert("name".to_string(), name);
                }
            }
            if !feature.properties.contains_key("status") {
                if let Some(status) = feature.properties.get("MUNI_STATU").cloned() {
                    feature.properties.insert("status".to_string(), status);
                }
            }
            feature
        })
        .collect()
}



#[cfg(test)]
mod municipality_filter {
    use super::*;
    use crate::geojson::test_helpers::feature;
    use serde_json::json;

    fn municipality(name: &str, status: &str, population: u64) -> Feature {
        feature(
            &[(-97.0, 50.0)],
            &[
                ("name", json!(name)),
                ("status", json!(status)),
                ("population_2021", json!(population)),
            ],
        )
    }

    #[test]
    fn status_and_population_range() {
        let city_a = municipality("City A", "City", 100_000);
        let town_b = municipality("Town B", "Town", 5_000);
        let filter = MunicipalityFilter {
            statuses: vec!["City".to_string()],
            population: (0.0, 1_000_000.0),
        };
        let selected: Vec<&Feature> = [&city_a, &town_b]
            .iter()
            .copied()
            .filter(|f| filter.accepts(f))
            .collect();
        assert_eq!(selected, vec![&city_a]);
    }

    #[test]
    fn confidence_key_does_not_stand_in_for_status() {
        let f = feature(
            &[],
            &[("confidence", json!("City")), ("population_2021", json!(5_000))],
        );
        let filter = MunicipalityFilter {
            statuses: vec!["City".to_string()],
            population: (0.0, 1_000_000.0),
        };
        assert!(!filter.accepts(&f));
        let unknown = MunicipalityFilter {
            statuses: vec!["Unknown".to_string()],
            population: (0.0, 1_000_000.0),
        };
        assert!(unknown.accepts(&f));
    }

    #[test]
    fn missing_population_never_passes() {
        let f = feature(&[], &[("status", json!("City"))]);
        let filter = MunicipalityFilter {
            statuses: vec!["City".to_string()],
            population: (0.0, 1_000_000.0),
        };
        assert!(!filter.accepts(&f));
    }
}
