//! Error Types for Configuration and Sample Failures
//!
//! ## Design Philosophy
//!
//! The engine runs inside a fixed-rate control loop, so its error system
//! follows the same rules as the rest of the crate:
//!
//! 1. **Small Size**: Every variant carries only inline data (`f32`, `usize`,
//!    `&'static str` and small `Copy` enums).
//!
//! 2. **No Heap Allocation**: Errors never own strings, so they can be created
//!    and dropped from a tick without an allocator.
//!
//! 3. **Copy Semantics**: Errors are returned by value and may be stored in
//!    fault logs without move complications.
//!
//! ## Error Categories
//!
//! ### Configuration (fatal, raised once at init)
//! - `TableTooShort`, `TableLengthMismatch`: a table cannot be interpolated
//! - `NonMonotonicTable`: an OCV or current table decreases somewhere
//! - `InvertedBreakpoints`: derating zero/one voltages are in the wrong order
//! - `CountOutOfRange`: cell or sensor count exceeds the fixed capacity
//! - `InvalidParameter`: a scalar is non-finite or breaks an ordering rule
//!
//! The engine refuses to start when any of these is returned; it never
//! silently misinterpolates a malformed table.
//!
//! ### Samples (recovered locally)
//! - `SampleOutOfRange`: a voltage or temperature outside plausible physics
//!
//! A sample error never aborts a tick. The tick clamps the value for its own
//! computations and raises a fault flag in the pack command instead.
//!
//! ```rust
//! use cellguard_core::{BmsError, PackEngine, ParameterSet};
//!
//! let params = ParameterSet::lg_e60_8s3p();
//! match PackEngine::new(&params) {
//!     Ok(_engine) => {} // Ready for the first tick
//!     Err(BmsError::NonMonotonicTable { .. }) => {} // Reject the table upload
//!     Err(_) => {} // Any other configuration fault is fatal as well
//! }
//! ```

use thiserror_no_std::Error;

use crate::derating::Direction;

/// Result type for engine operations
pub type BmsResult<T> = Result<T, BmsError>;

/// Identifies which table of the parameter set a configuration error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TableId {
    /// OCV curve used while charging
    OcvCharge,
    /// OCV curve used while discharging or at rest
    OcvDischarge,
    /// Static charge current ceiling over cell voltage
    ChargeCurrentLimit,
    /// Static discharge current ceiling over cell voltage
    DischargeCurrentLimit,
    /// Per-cell measurement offsets
    MeasurementOffsets,
}

impl TableId {
    /// Human-readable table name
    pub const fn name(&self) -> &'static str {
        match self {
            TableId::OcvCharge => "ocv_charge",
            TableId::OcvDischarge => "ocv_discharge",
            TableId::ChargeCurrentLimit => "charge_current_limit",
            TableId::DischargeCurrentLimit => "discharge_current_limit",
            TableId::MeasurementOffsets => "measurement_offsets",
        }
    }
}

impl core::fmt::Display for TableId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Which physical quantity a sample error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SampleKind {
    /// Cell voltage in volts
    CellVoltage,
    /// Temperature in °C
    Temperature,
    /// Net pack current in amperes
    PackCurrent,
}

impl core::fmt::Display for SampleKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            SampleKind::CellVoltage => "cell voltage",
            SampleKind::Temperature => "temperature",
            SampleKind::PackCurrent => "pack current",
        })
    }
}

/// Engine errors - kept small for embedded use
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum BmsError {
    /// Table has fewer points than interpolation needs
    #[error("Table {table} has {len} points, need at least {min}")]
    TableTooShort {
        /// Offending table
        table: TableId,
        /// Points present
        len: usize,
        /// Points required
        min: usize,
    },

    /// X and Y columns of a table differ in length
    #[error("Table {table} has {x_len} breakpoints but {y_len} values")]
    TableLengthMismatch {
        /// Offending table
        table: TableId,
        /// Length of the breakpoint column
        x_len: usize,
        /// Length of the value column
        y_len: usize,
    },

    /// Table decreases (or holds a non-finite entry) at `index`
    #[error("Table {table} is not monotone at index {index}")]
    NonMonotonicTable {
        /// Offending table
        table: TableId,
        /// First index that breaks monotonicity
        index: usize,
    },

    /// Derating breakpoints are in the wrong order for their direction
    #[error("{direction} derating breakpoints inverted: zero={zero}V one={one}V")]
    InvertedBreakpoints {
        /// Direction the breakpoints belong to
        direction: Direction,
        /// Voltage at which the factor reaches 0
        zero: f32,
        /// Voltage at which the factor reaches 1
        one: f32,
    },

    /// A count is outside the supported range
    #[error("{what} count {count} outside 1..={max}")]
    CountOutOfRange {
        /// Which count (cells, temperature sensors)
        what: &'static str,
        /// Configured count
        count: usize,
        /// Fixed capacity
        max: usize,
    },

    /// A scalar parameter is non-finite or violates an ordering rule
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// What is wrong with it
        reason: &'static str,
    },

    /// Sample outside physically plausible bounds (or not a number)
    #[error("{kind} {value} outside plausible range [{min}, {max}]")]
    SampleOutOfRange {
        /// Which quantity
        kind: SampleKind,
        /// Reported value
        value: f32,
        /// Lower plausibility bound
        min: f32,
        /// Upper plausibility bound
        max: f32,
    },
}

impl BmsError {
    /// True for errors that must stop the engine from starting
    pub const fn is_config_error(&self) -> bool {
        !matches!(self, BmsError::SampleOutOfRange { .. })
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for BmsError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::TableTooShort { table, len, min } =>
                defmt::write!(fmt, "Table {} has {} points, need {}", table, len, min),
            Self::TableLengthMismatch { table, x_len, y_len } =>
                defmt::write!(fmt, "Table {} x={} y={}", table, x_len, y_len),
            Self::NonMonotonicTable { table, index } =>
                defmt::write!(fmt, "Table {} not monotone at {}", table, index),
            Self::InvertedBreakpoints { direction, zero, one } =>
                defmt::write!(fmt, "{} breakpoints inverted: {} / {}", direction, zero, one),
            Self::CountOutOfRange { what, count, max } =>
                defmt::write!(fmt, "{} count {} > {}", what, count, max),
            Self::InvalidParameter { name, reason } =>
                defmt::write!(fmt, "Parameter {}: {}", name, reason),
            Self::SampleOutOfRange { kind, value, min, max } =>
                defmt::write!(fmt, "{} {} outside [{}, {}]", kind, value, min, max),
        }
    }
}
