//! The drone list joined with drone-type details, with optional filtering.

use std::collections::HashMap;

use crate::api::{CatalogueRow, DataSource, DroneApi, DroneTypeRecord};
use crate::error::FleetError;

use super::fetch::FetchTicket;
use super::pager::Pager;
use super::SEARCH_LIMIT;

/// Manufacturer / type-name search.  Each non-empty field must be a
/// case-insensitive prefix of the corresponding column.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DroneFilter {
    pub manufacturer: String,
    pub typename: String,
}

impl DroneFilter {
    pub fn new(manufacturer: &str, typename: &str) -> Self {
        Self {
            manufacturer: manufacturer.trim().to_string(),
            typename: typename.trim().to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.manufacturer.is_empty() && self.typename.is_empty()
    }

    pub fn matches(&self, row: &CatalogueRow) -> bool {
        starts_with_ci(&row.manufacturer, &self.manufacturer)
            && starts_with_ci(&row.typename, &self.typename)
    }
}

fn starts_with_ci(haystack: &str, prefix: &str) -> bool {
    haystack.to_lowercase().starts_with(&prefix.to_lowercase())
}

/// `(limit, offset)` of the drone-list request for the current screen: the
/// pager's page when unfiltered, otherwise a wider window from the start.
pub fn search_window(pager: &Pager, filter: &DroneFilter) -> (usize, usize) {
    if filter.is_empty() {
        (pager.limit(), pager.offset())
    } else {
        (SEARCH_LIMIT, 0)
    }
}

/// One page of the drone list with type names resolved.  Each distinct
/// drone type is requested once per page.
pub fn catalogue_page<S: DataSource>(
    api: &DroneApi<S>,
    limit: usize,
    offset: usize,
    filter: &DroneFilter,
    ticket: &FetchTicket,
) -> Result<Vec<CatalogueRow>, FleetError> {
    let drones = api.drones_page(limit, offset)?;
    let mut types: HashMap<String, DroneTypeRecord> = HashMap::new();
    let mut rows = Vec::with_capacity(drones.len());

    for drone in drones {
        ticket.check()?;
        let kind = match types.get(&drone.dronetype) {
            Some(kind) => kind.clone(),
            None => {
                let kind = api.drone_type(crate::api::id_from_url(&drone.dronetype)?)?;
                types.insert(drone.dronetype.clone(), kind.clone());
                kind
            }
        };
        let row = CatalogueRow {
            id: drone.id,
            typename: kind.typename,
            manufacturer: kind.manufacturer,
            created: drone.created,
            serialnumber: drone.serialnumber,
            carriage_weight: drone.carriage_weight,
            carriage_type: drone.carriage_type,
        };
        if filter.matches(&row) {
            rows.push(row);
        }
    }
    Ok(rows)
}
