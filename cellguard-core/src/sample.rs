//! Raw Samples and Plausibility Checks
//!
//! Each tick the acquisition side hands over one [`PackSample`]: every cell
//! voltage, every temperature sensor and the net pack current (charging
//! negative). Samples are ephemeral; the engine reads them, conditions them
//! into [`Reading`]s and forgets them once the tick returns.
//!
//! Conditioning never fails. A value outside the plausible bounds is clamped
//! and marked [`SampleStatus::Clamped`] (infinities included); a missing or NaN value is
//! marked [`SampleStatus::Missing`]. Both raise the `SENSOR_IMPLAUSIBLE`
//! fault flag, but the tick still runs to completion.

use heapless::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    constants::{
        CELL_VOLTAGE_PLAUSIBLE_MAX_V, CELL_VOLTAGE_PLAUSIBLE_MIN_V, MAX_CELLS, MAX_TEMP_SENSORS,
        TEMPERATURE_PLAUSIBLE_MAX_C, TEMPERATURE_PLAUSIBLE_MIN_C,
    },
    errors::{BmsError, BmsResult, SampleKind},
};

/// Physical plausibility bounds for raw samples
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SampleBounds {
    /// Lowest plausible cell voltage (V)
    pub voltage_min: f32,
    /// Highest plausible cell voltage (V)
    pub voltage_max: f32,
    /// Lowest plausible temperature (°C)
    pub temperature_min: f32,
    /// Highest plausible temperature (°C)
    pub temperature_max: f32,
}

impl Default for SampleBounds {
    fn default() -> Self {
        Self {
            voltage_min: CELL_VOLTAGE_PLAUSIBLE_MIN_V,
            voltage_max: CELL_VOLTAGE_PLAUSIBLE_MAX_V,
            temperature_min: TEMPERATURE_PLAUSIBLE_MIN_C,
            temperature_max: TEMPERATURE_PLAUSIBLE_MAX_C,
        }
    }
}

/// How a conditioned value relates to the raw sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SampleStatus {
    /// Raw value used as-is
    Plausible,
    /// Raw value was outside the bounds and has been clamped
    Clamped,
    /// No usable value (channel absent or NaN)
    Missing,
}

/// A conditioned sample
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    /// Value after clamping (meaningless when `status` is `Missing`)
    pub value: f32,
    /// Relation to the raw sample
    pub status: SampleStatus,
}

impl Reading {
    /// Reading for an absent or NaN channel
    pub const MISSING: Self = Self { value: 0.0, status: SampleStatus::Missing };

    /// Value, unless the channel is missing
    pub fn usable(&self) -> Option<f32> {
        match self.status {
            SampleStatus::Missing => None,
            _ => Some(self.value),
        }
    }

    /// Value, only when the raw sample was plausible
    ///
    /// Clamped values are good enough for derating and SOC but not for
    /// comparing one cell against another.
    pub fn trusted(&self) -> Option<f32> {
        match self.status {
            SampleStatus::Plausible => Some(self.value),
            _ => None,
        }
    }

    /// True unless the raw value was used unchanged
    pub fn is_implausible(&self) -> bool {
        self.status != SampleStatus::Plausible
    }
}

impl SampleBounds {
    pub(crate) fn validate(&self) -> BmsResult<()> {
        let finite = [self.voltage_min, self.voltage_max, self.temperature_min, self.temperature_max]
            .iter()
            .all(|v| v.is_finite());
        if !finite || self.voltage_min >= self.voltage_max || self.temperature_min >= self.temperature_max {
            return Err(BmsError::InvalidParameter {
                name: "sample_bounds",
                reason: "bounds must be finite with min below max",
            });
        }
        Ok(())
    }

    fn check(kind: SampleKind, value: f32, min: f32, max: f32) -> BmsResult<f32> {
        if value.is_finite() && value >= min && value <= max {
            Ok(value)
        } else {
            Err(BmsError::SampleOutOfRange { kind, value, min, max })
        }
    }

    /// Check a cell voltage against the plausible range
    pub fn check_voltage(&self, voltage: f32) -> BmsResult<f32> {
        Self::check(SampleKind::CellVoltage, voltage, self.voltage_min, self.voltage_max)
    }

    /// Check a temperature against the plausible range
    pub fn check_temperature(&self, temperature: f32) -> BmsResult<f32> {
        Self::check(SampleKind::Temperature, temperature, self.temperature_min, self.temperature_max)
    }

    /// Check that the pack current is a finite number
    pub fn check_current(&self, current_a: f32) -> BmsResult<f32> {
        Self::check(SampleKind::PackCurrent, current_a, f32::MIN, f32::MAX)
    }

    fn condition(result: BmsResult<f32>) -> Reading {
        match result {
            Ok(value) => Reading { value, status: SampleStatus::Plausible },
            Err(BmsError::SampleOutOfRange { value, min, max, .. }) if !value.is_nan() => {
                log_debug!("Clamping implausible sample {} to [{}, {}]", value, min, max);
                Reading { value: value.clamp(min, max), status: SampleStatus::Clamped }
            }
            Err(_) => Reading::MISSING,
        }
    }

    /// Condition a cell voltage; never fails
    pub fn condition_voltage(&self, voltage: f32) -> Reading {
        Self::condition(self.check_voltage(voltage))
    }

    /// Condition a temperature; never fails
    pub fn condition_temperature(&self, temperature: f32) -> Reading {
        Self::condition(self.check_temperature(temperature))
    }
}

/// Per-cell view of one tick's sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellSample {
    /// Cell voltage (V)
    pub voltage_v: f32,
    /// Temperature of the cell's sensor group (°C)
    pub temperature_c: f32,
}

/// Everything the acquisition side measured in one tick
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PackSample {
    /// Cell voltages by cell index (V)
    pub cell_voltages: Vec<f32, MAX_CELLS>,
    /// Temperatures by sensor index (°C)
    pub temperatures: Vec<f32, MAX_TEMP_SENSORS>,
    /// Net pack current, charging negative (A)
    pub current_a: f32,
}

impl PackSample {
    /// Build a sample from slices
    pub fn new(cell_voltages: &[f32], temperatures: &[f32], current_a: f32) -> BmsResult<Self> {
        Ok(Self {
            cell_voltages: Vec::from_slice(cell_voltages).map_err(|_| BmsError::CountOutOfRange {
                what: "cell voltage",
                count: cell_voltages.len(),
                max: MAX_CELLS,
            })?,
            temperatures: Vec::from_slice(temperatures).map_err(|_| BmsError::CountOutOfRange {
                what: "temperature",
                count: temperatures.len(),
                max: MAX_TEMP_SENSORS,
            })?,
            current_a,
        })
    }

    /// Every cell at the same voltage and every sensor at the same temperature
    pub fn uniform(cells: usize, voltage: f32, sensors: usize, temperature: f32, current_a: f32) -> Self {
        Self {
            cell_voltages: core::iter::repeat(voltage).take(cells.min(MAX_CELLS)).collect(),
            temperatures: core::iter::repeat(temperature).take(sensors.min(MAX_TEMP_SENSORS)).collect(),
            current_a,
        }
    }

    /// Override one cell's voltage; out-of-range indices are ignored
    pub fn with_cell(mut self, cell: usize, voltage: f32) -> Self {
        if let Some(slot) = self.cell_voltages.get_mut(cell) {
            *slot = voltage;
        }
        self
    }

    /// Raw voltage and temperature of one cell, NaN where absent
    pub fn cell(&self, cell: usize, sensor: usize) -> CellSample {
        CellSample {
            voltage_v: self.cell_voltages.get(cell).copied().unwrap_or(f32::NAN),
            temperature_c: self.temperatures.get(sensor).copied().unwrap_or(f32::NAN),
        }
    }
}
