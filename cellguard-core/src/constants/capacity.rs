//! Fixed Storage Capacities
//!
//! Every collection in the engine is a `heapless` container or a fixed
//! array, sized by the constants below. They bound RAM use at compile time:
//! a full [`ParameterSet`](crate::params::ParameterSet) is about 8.5 KB,
//! almost all of it the two OCV tables.

/// Maximum number of series cells in one pack.
///
/// The balancing bitmap is a `u32`, one bit per cell, which caps the count.
/// The LG E60 module uses 16.
pub const MAX_CELLS: usize = 32;

/// Maximum number of temperature sensors per pack.
///
/// Cells are mapped onto sensors in contiguous groups, so a handful of
/// sensors covers a module. The LG E60 module uses 2.
pub const MAX_TEMP_SENSORS: usize = 8;

/// Maximum number of points in an OCV table.
///
/// 1001 points give SOC in 0.1% steps (`index / 10` = SOC %).
/// Memory: 1001 × 4 bytes ≈ 4 KB per direction.
pub const OCV_TABLE_MAX_POINTS: usize = 1001;

/// Maximum number of points in a static current-vs-voltage table.
///
/// Source tables use 7 (charge) and 4 (discharge) points.
pub const CURRENT_TABLE_MAX_POINTS: usize = 16;

/// Maximum length of the pack name carried in the parameter set.
pub const PACK_NAME_MAX_LEN: usize = 16;
