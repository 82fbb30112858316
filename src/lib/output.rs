use super::geo::{centroid_of, feature_bounds, BoundingBox};
use super::geojson::{Feature, FeatureCollection};
use serde::{Deserialize, Serialize};
use serde_json::to_string;
use std::error::Error;
use std::io::Write;

pub trait Output {
    fn write_json_lines(&self, writer: &mut dyn Write) -> Result<(), Box<dyn Error>>;
    fn write_geojson(&self, writer: &mut dyn Write) -> Result<(), Box<dyn Error>>;
}

#[derive(Serialize, Deserialize)]
struct JSONFeatureSummary {
    name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    population_2021: Option<f64>,
    centroid: (f64, f64),
    #[serde(skip_serializing_if = "Option::is_none")]
    bounds: Option<BoundingBox>,
}

impl From<&Feature> for JSONFeatureSummary {
    fn from(feature: &Feature) -> Self {
        JSONFeatureSummary {
            name: feature.name().map(str::to_string),
            kind: feature.incident_kind().map(str::to_string),
            status: feature.status().map(str::to_string),
            population_2021: feature.population(),
            centroid: centroid_of(feature),
            bounds: feature_bounds(feature),
        }
    }
}

impl Output for [Feature] {
    fn write_json_lines(&self, writer: &mut dyn Write) -> Result<(), Box<dyn Error>> {
        for feature in self.iter() {
            let summary = JSONFeatureSummary::from(feature);
            let json = to_string(&summary)?;
            writeln!(writer, "{}", json)?;
        }
        Ok(())
    }

    fn write_geojson(&self, writer: &mut dyn Write) -> Result<(), Box<dyn Error>> {
        let collection = FeatureCollection::new(self.to_vec());
        let string = to_string(&collection)?;
        writeln!(writer, "{}", string)?;
        Ok(())
    }
}

impl Output for FeatureCollection {
    fn write_json_lines(&self, writer: &mut dyn Write) -> Result<(), Box<dyn Error>> {
        self.features.write_json_lines(writer)
    }

    fn write_geojson(&self, writer: &mut dyn Write) -> Result<(), Box<dyn Error>> {
        let string = to_string(self)?;
        writeln!(writer, "{}", string)?;
        Ok(())
    }
}
