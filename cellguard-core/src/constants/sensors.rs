//! Sample Plausibility Bounds
//!
//! Readings outside these bounds cannot come from a healthy cell or sensor.
//! They are not operating limits: a cell at 4.3 V is over-voltage but
//! plausible, a cell at -0.2 V or 7 V points at a broken sense line or ADC.
//! Implausible samples are clamped for the tick's own computations and
//! reported through the `SENSOR_IMPLAUSIBLE` fault flag.

/// Lowest plausible cell voltage (V).
///
/// A fully shorted cell reads 0 V. Anything negative is a measurement fault.
pub const CELL_VOLTAGE_PLAUSIBLE_MIN_V: f32 = 0.0;

/// Highest plausible cell voltage (V).
///
/// Li-ion cells decompose well below 5 V. Above it the reading is an
/// open sense wire or an ADC rail.
pub const CELL_VOLTAGE_PLAUSIBLE_MAX_V: f32 = 5.0;

/// Lowest plausible cell temperature (°C).
///
/// Lower end of the NTC range used on battery adapter PCBs. A disconnected
/// NTC typically reads far below this.
pub const TEMPERATURE_PLAUSIBLE_MIN_C: f32 = -40.0;

/// Highest plausible cell temperature (°C).
///
/// A shorted NTC reads far above this.
pub const TEMPERATURE_PLAUSIBLE_MAX_C: f32 = 125.0;
