//! Typed access to the drone simulation API.

pub mod client;
pub mod model;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

pub use client::{DataSource, HttpSource};
pub use model::{
    battery_percentage, format_timestamp, BatteryLevel, CatalogueRow, DroneRecord,
    DroneTypeRecord, DynamicsRecord, DynamicsView, Page,
};

use crate::error::ApiError;

/// A page of dynamics samples, decoded and raw side by side.  The raw
/// values are what gets persisted to the history files.
#[derive(Clone, Debug)]
pub struct DynamicsPage {
    pub records: Vec<DynamicsRecord>,
    pub raw: Vec<Value>,
}

/// Read the trailing id out of a related-resource link such as
/// `http://host/api/drones/17/`.
pub fn id_from_url(url: &str) -> Result<u32, ApiError> {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .and_then(|segment| segment.parse().ok())
        .ok_or_else(|| ApiError::BadResourceUrl(url.to_string()))
}

pub struct DroneApi<S> {
    source: S,
}

impl<S: DataSource> DroneApi<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let body = self.source.get(path)?;
        serde_json::from_str(&body).map_err(|source| ApiError::Malformed {
            path: path.to_string(),
            source,
        })
    }

    /// Telemetry samples for drone number `drone`.
    pub fn dynamics_page(
        &self,
        drone: u32,
        limit: usize,
        offset: usize,
    ) -> Result<DynamicsPage, ApiError> {
        let path = format!("/api/{drone}/dynamics/?limit={limit}&offset={offset}");
        let page: Page<Value> = self.get_json(&path)?;
        let records = page
            .results
            .iter()
            .map(|v| DynamicsRecord::deserialize(v))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| ApiError::Malformed {
                path: path.clone(),
                source,
            })?;
        Ok(DynamicsPage {
            records,
            raw: page.results,
        })
    }

    pub fn drones_page(&self, limit: usize, offset: usize) -> Result<Vec<DroneRecord>, ApiError> {
        let page: Page<DroneRecord> =
            self.get_json(&format!("/api/drones/?limit={limit}&offset={offset}"))?;
        Ok(page.results)
    }

    pub fn drone(&self, id: u32) -> Result<DroneRecord, ApiError> {
        self.get_json(&format!("/api/drones/{id}/"))
    }

    pub fn drone_types(&self, limit: usize) -> Result<Vec<DroneTypeRecord>, ApiError> {
        let page: Page<DroneTypeRecord> =
            self.get_json(&format!("/api/dronetypes/?limit={limit}"))?;
        Ok(page.results)
    }

    pub fn drone_type(&self, id: u32) -> Result<DroneTypeRecord, ApiError> {
        self.get_json(&format!("/api/dronetypes/{id}/"))
    }

    /// Follow a drone link, then its type link.
    pub fn drone_with_type(
        &self,
        drone_url: &str,
    ) -> Result<(DroneRecord, DroneTypeRecord), ApiError> {
        let drone = self.drone(id_from_url(drone_url)?)?;
        let kind = self.drone_type(id_from_url(&drone.dronetype)?)?;
        Ok((drone, kind))
    }
}
