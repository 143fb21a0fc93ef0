//! Control-Loop Thresholds

/// Voltage tolerance for matching an OCV table entry (V).
///
/// Table entries are stored with 1 mV resolution. A query within 0.1 mV of
/// an entry is treated as that entry, and a run of equal entries resolves
/// to its lowest index (lowest SOC).
pub const OCV_MATCH_TOLERANCE_V: f32 = 1.0e-4;

/// Current magnitude below which the pack is considered at rest (A).
///
/// Charging is negative. Currents in `[-DEFAULT_REST_CURRENT_A, ..)` are not
/// treated as charging, so the discharge OCV curve is used at rest.
pub const DEFAULT_REST_CURRENT_A: f32 = 0.5;

/// Temperature derating factor applied when no temperature derating is
/// installed.
pub const NEUTRAL_TEMPERATURE_FACTOR: f32 = 1.0;
