//! Paginated, cached and persisted drone fleet data.

pub mod cache;
pub mod catalogue;
pub mod fetch;
pub mod pager;
pub mod store;

use std::collections::HashMap;
use std::ops::RangeInclusive;

use tracing::debug;

use crate::api::{battery_percentage, DataSource, DroneApi, DroneTypeRecord, DynamicsView};
use crate::error::FleetError;

pub use cache::{synthetic_id, DynamicsCache};
pub use catalogue::{catalogue_page, search_window, DroneFilter};
pub use fetch::{spawn_fetch, FetchGeneration, FetchTicket, Fetched};
pub use pager::Pager;
pub use store::HistoryStore;

// ── Paging limits ────────────────────────────────────────────────────────────

pub const PAGE_LIMIT: usize = 10;
/// Offset of the last dynamics page the simulation serves.
pub const DYNAMICS_MAX_OFFSET: usize = 2140;
/// Offset of the last page of the drone list.
pub const DRONES_MAX_OFFSET: usize = 50;
/// A filtered drone-list search scans this many rows at once.
pub const SEARCH_LIMIT: usize = 60;
pub const DRONE_TYPES_LIMIT: usize = 20;

/// Drone numbers the dynamics endpoint can be asked about.
pub const DRONE_NUMBERS: RangeInclusive<u32> = 31..=80;

pub fn dynamics_pager() -> Pager {
    Pager::new(PAGE_LIMIT, DYNAMICS_MAX_OFFSET)
}

pub fn drones_pager() -> Pager {
    Pager::new(PAGE_LIMIT, DRONES_MAX_OFFSET)
}

/// Fetch one dynamics page for drone number `drone`, resolve each sample's
/// drone id and battery percentage, persist the raw samples, and return
/// the rows keyed by synthetic id.
pub fn load_dynamics<S: DataSource>(
    api: &DroneApi<S>,
    store: &HistoryStore,
    drone: u32,
    limit: usize,
    offset: usize,
    ticket: &FetchTicket,
) -> Result<DynamicsCache, FleetError> {
    let page = api.dynamics_page(drone, limit, offset)?;
    let mut resolved: HashMap<String, (u32, DroneTypeRecord)> = HashMap::new();
    let mut cache = DynamicsCache::new();

    for (row, record) in page.records.iter().enumerate() {
        ticket.check()?;
        let (drone_id, kind) = match resolved.get(&record.drone) {
            Some(hit) => hit.clone(),
            None => {
                let (detail, kind) = api.drone_with_type(&record.drone)?;
                resolved.insert(record.drone.clone(), (detail.id, kind.clone()));
                (detail.id, kind)
            }
        };
        let battery = battery_percentage(record.battery_status, kind.battery_capacity);
        cache.insert(
            synthetic_id(offset, row),
            DynamicsView::from_record(record, drone_id, battery),
        );
    }

    let added = store.merge(drone, &page.raw)?;
    debug!(drone, offset, rows = cache.len(), added, "dynamics page loaded");
    Ok(cache)
}

/// The drone-type catalogue.
pub fn load_drone_types<S: DataSource>(
    api: &DroneApi<S>,
) -> Result<Vec<DroneTypeRecord>, FleetError> {
    Ok(api.drone_types(DRONE_TYPES_LIMIT)?)
}
