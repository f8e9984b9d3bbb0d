//! Vehicle catalog entries and their solve-input projection.

use serde::{Deserialize, Serialize};

/// Catalog state of a vehicle. Only `Available` vehicles participate in a
/// solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleState {
    /// Dispatchable.
    Available,
    /// Temporarily out of service.
    Maintenance,
    /// Permanently withdrawn.
    Retired,
}

/// A routing vehicle as stored in the tenant's catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    /// Catalog identity.
    pub id: u64,
    /// Owning tenant.
    pub tenant_id: u64,
    /// Human-readable vehicle code.
    pub code: String,
    /// Node the vehicle departs from.
    pub start_node_id: u64,
    /// Node the vehicle must return to.
    pub end_node_id: u64,
    /// Hard load capacity.
    pub capacity: i64,
    /// Shift start, seconds from midnight.
    pub work_start_sec: i64,
    /// Shift end, seconds from midnight.
    pub work_end_sec: i64,
    /// Catalog state.
    pub state: VehicleState,
}

impl Vehicle {
    /// Immutable solve-input projection of this vehicle.
    pub fn resource(&self) -> VehicleResource {
        VehicleResource {
            vehicle_id: self.id,
            start_node_id: self.start_node_id,
            end_node_id: self.end_node_id,
            capacity: self.capacity,
            work_start_sec: self.work_start_sec,
            work_end_sec: self.work_end_sec,
        }
    }
}

/// Solve input: one vehicle with its depots, capacity, and shift window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleResource {
    /// Catalog identity of the vehicle.
    pub vehicle_id: u64,
    /// Node the vehicle departs from.
    pub start_node_id: u64,
    /// Node the vehicle must return to.
    pub end_node_id: u64,
    /// Hard load capacity.
    pub capacity: i64,
    /// Shift start, seconds from midnight.
    pub work_start_sec: i64,
    /// Shift end, seconds from midnight.
    pub work_end_sec: i64,
}
