use super::filter::{split_incidents, IncidentFilter};
use super::geojson::{Feature, FeatureCollection};
use super::ingest::{merge_incidents, parse_incident_payload, ParseError};
use super::resolve::{resolve_click, Kind};
use super::viewport::ViewportState;
use log::{debug, info};

/// Where the current incident collection came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Default,
    Merged,
}

/// One accepted upload, kept for the history panel.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadRecord {
    pub filename: String,
    pub added: usize,
    pub duplicates: usize,
}

/// User-facing result of a merge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergeSummary {
    pub added: usize,
    pub duplicates: usize,
    pub total: usize,
}

/// Headline counts for the dashboard cards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    pub municipalities: usize,
    pub total_population: f64,
    pub wildfires: usize,
    pub floods: usize,
}

/// The externally supplied per-session context: the one owner of the
/// viewport state and the current incident collection. Everything else in
/// the engine is a pure function over values borrowed from here.
pub struct Session {
    pub viewport: ViewportState,
    incidents: FeatureCollection,
    source: DataSource,
    upload_history: Vec<UploadRecord>,
}

impl Session {
    pub fn new(default_incidents: FeatureCollection) -> Self {
        Session {
            viewport: ViewportState::default(),
            incidents: default_incidents,
            source: DataSource::Default,
            upload_history: vec![],
        }
    }

    pub fn incidents(&self) -> &FeatureCollection {
        &self.incidents
    }

    pub fn source(&self) -> DataSource {
        self.source
    }

    pub fn upload_history(&self) -> &[UploadRecord] {
        &self.upload_history
    }

    /// Parse and merge an uploaded payload. On a parse failure the stored
    /// collection is left untouched and the error is surfaced verbatim.
    pub fn apply_upload(&mut self, raw: &str, filename: &str) -> Result<MergeSummary, ParseError> {
        let incoming = parse_incident_payload(raw)?;
        let outcome = merge_incidents(&self.incidents, &incoming);
        info!(
            "merged upload {}: {} added, {} duplicates, {} total",
            filename,
            outcome.added,
            outcome.duplicates,
            outcome.merged.len()
        );
        let summary = MergeSummary {
            added: outcome.added,
            duplicates: outcome.duplicates,
            total: outcome.merged.len(),
        };
        self.incidents = outcome.merged;
        self.source = DataSource::Merged;
        self.upload_history.push(UploadRecord {
            filename: filename.to_string(),
            added: summary.added,
            duplicates: summary.duplicates,
        });
        Ok(summary)
    }

    /// Drop uploads and go back to the given default collection.
    pub fn reset_data(&mut self, default_incidents: FeatureCollection) {
        self.incidents = default_incidents;
        self.source = DataSource::Default;
        self.upload_history.clear();
    }

    pub fn handle_pan_zoom(&mut self, center: (f64, f64), zoom: u32) {
        self.viewport.on_user_pan_zoom(center, zoom);
    }

    /// Resolve a reported click against the visible layers and, on a hit,
    /// queue the zoom-to-feature transition. The hit is returned so the
    /// caller can show it.
    pub fn handle_click<'a>(
        &mut self,
        click: (f64, f64),
        layers: &[(Kind, &'a [Feature])],
    ) -> Option<(&'a Feature, Kind)> {
        let hit = resolve_click(click, layers);
        match hit {
            Some((feature, kind)) => {
                debug!(
                    "click at ({}, {}) resolved to {} {:?}",
                    click.0,
                    click.1,
                    kind,
                    feature.name()
                );
                self.viewport.on_feature_clicked(feature, kind);
            }
            None => debug!("click at ({}, {}) matched no feature", click.0, click.1),
        }
        hit
    }

    pub fn reset_view(&mut self) {
        self.viewport.reset();
    }

    /// Dashboard counts over the filtered municipalities and the session's
    /// incidents. Hidden incident kinds count as zero.
    pub fn metrics(&self, municipalities: &[Feature], filter: &IncidentFilter) -> Metrics {
        let (wildfires, floods) = split_incidents(&self.incidents, filter);
        Metrics {
            municipalities: municipalities.len(),
            total_population: municipalities.iter().filter_map(Feature::population).sum(),
            wildfires: if filter.wildfires { wildfires.len() } else { 0 },
            floods: if filter.floods { floods.len() } else { 0 },
        }
    }
}

#[cfg(test)]
mod apply_upload {
    use super::*;
    use crate::geojson::test_helpers::incident;

    fn default_incidents() -> FeatureCollection {
        FeatureCollection::new(vec![incident(
            "Fire1",
            "wildfire",
            "confirmed",
            &[(-97.1, 49.9)],
        )])
    }

    fn upload_payload() -> String {
        r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "geometry": {"type": "Polygon", "coordinates": [[[-97.1, 49.9]]]},
                    "properties": {"name": "Fire1", "type": "wildfire", "status": "confirmed"}
                },
                {
                    "type": "Feature",
                    "geometry": {"type": "Polygon", "coordinates": [[[-96.0, 50.5]]]},
                    "properties": {"name": "Flood9", "type": "flood", "status": "suspected"}
                }
            ]
        }"#
        .to_string()
    }

    #[test]
    fn merges_and_records_history() {
        let mut session = Session::new(default_incidents());
        let summary = session.apply_upload(&upload_payload(), "field_report.geojson").unwrap();
        assert_eq!(summary.added, 1);
        assert_eq!(summary.duplicates, 1);
        assert_eq!(summary.total, 2);
        assert_eq!(session.source(), DataSource::Merged);
        assert_eq!(session.upload_history().len(), 1);
        assert_eq!(session.upload_history()[0].filename, "field_report.geojson");
    }

    #[test]
    fn repeated_upload_is_idempotent() {
        let mut session = Session::new(default_incidents());
        session.apply_upload(&upload_payload(), "a.geojson").unwrap();
        let second = session.apply_upload(&upload_payload(), "a.geojson").unwrap();
        assert_eq!(second.added, 0);
        assert_eq!(second.duplicates, 2);
        assert_eq!(session.incidents().len(), 2);
    }

    #[test]
    fn parse_failure_leaves_state_untouched() {
        let mut session = Session::new(default_incidents());
        let err = session.apply_upload("{not json", "broken.json").unwrap_err();
        assert!(matches!(err, ParseError::MalformedJson(_)));
        assert_eq!(session.incidents(), &default_incidents());
        assert_eq!(session.source(), DataSource::Default);
        assert!(session.upload_history().is_empty());
    }

    #[test]
    fn reset_data_restores_defaults() {
        let mut session = Session::new(default_incidents());
        session.apply_upload(&upload_payload(), "a.geojson").unwrap();
        session.reset_data(default_incidents());
        assert_eq!(session.source(), DataSource::Default);
        assert_eq!(session.incidents(), &default_incidents());
        assert!(session.upload_history().is_empty());
    }
}

#[cfg(test)]
mod metrics {
    use super::*;
    use crate::geojson::test_helpers::{feature, incident};
    use serde_json::json;

    #[test]
    fn hidden_kinds_count_as_zero() {
        let incidents = FeatureCollection::new(vec![
            incident("Fire1", "wildfire", "confirmed", &[(-97.1, 49.9)]),
            incident("Flood1", "flood", "confirmed", &[(-96.0, 50.0)]),
        ]);
        let session = Session::new(incidents);
        let municipalities = vec![
            feature(&[], &[("population_2021", json!(100_000))]),
            feature(&[], &[("population_2021", json!(5_000))]),
        ];
        let filter = IncidentFilter {
            floods: false,
            ..IncidentFilter::default()
        };
        let metrics = session.metrics(&municipalities, &filter);
        assert_eq!(metrics.municipalities, 2);
        assert_eq!(metrics.total_population, 105_000.0);
        assert_eq!(metrics.wildfires, 1);
        assert_eq!(metrics.floods, 0);
    }
}
