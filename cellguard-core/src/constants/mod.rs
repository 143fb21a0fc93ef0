//! Constants for CellGuard Core
//!
//! Centralized numeric values used throughout the engine, grouped by domain:
//! - **Capacity**: fixed storage sizes for cells, sensors and tables
//! - **Sensors**: physical plausibility bounds for raw samples
//! - **Control**: thresholds that shape the per-tick decisions
//!
//! Battery-specific limits (cell voltage window, derating breakpoints,
//! balancing thresholds) are not constants. They live in the injected
//! [`ParameterSet`](crate::params::ParameterSet).

/// Fixed capacities for heapless storage.
pub mod capacity;

/// Plausibility bounds for raw sensor samples.
pub mod sensors;

/// Control-loop thresholds and tolerances.
pub mod control;

pub use capacity::{
    MAX_CELLS, MAX_TEMP_SENSORS, OCV_TABLE_MAX_POINTS, CURRENT_TABLE_MAX_POINTS,
    PACK_NAME_MAX_LEN,
};

pub use sensors::{
    CELL_VOLTAGE_PLAUSIBLE_MIN_V, CELL_VOLTAGE_PLAUSIBLE_MAX_V,
    TEMPERATURE_PLAUSIBLE_MIN_C, TEMPERATURE_PLAUSIBLE_MAX_C,
};

pub use control::{
    OCV_MATCH_TOLERANCE_V, DEFAULT_REST_CURRENT_A, NEUTRAL_TEMPERATURE_FACTOR,
};
