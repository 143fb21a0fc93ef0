//! Battery operating-limit and state-estimation engine for CellGuard
//!
//! Turns raw per-cell voltage, temperature and pack current samples into
//! pack commands for the power stage: estimated state of charge, derated
//! charge/discharge current limits and per-cell balancing decisions.
//! Designed to run inside a fixed-rate BMS control loop.
//!
//! Key constraints:
//! - No heap allocation (`heapless` storage, `no_std` without `std`)
//! - Every tick is total: bad samples are clamped and flagged, never fatal
//! - Invalid configuration is rejected before the first tick
//!
//! ```rust
//! use cellguard_core::{FaultFlags, PackEngine, PackSample, ParameterSet};
//!
//! let params = ParameterSet::lg_e60_8s3p();
//! let mut engine = PackEngine::new(&params)?;
//!
//! // 16 cells, one sitting 60 mV above the rest, 2 temperature sensors
//! let sample = PackSample::uniform(16, 3.70, 2, 25.0, -15.0).with_cell(3, 3.76);
//! let report = engine.tick(&sample);
//!
//! assert_eq!(report.command.balancing_bitmap, 1 << 3);
//! assert!(!report.command.faults.contains(FaultFlags::OVER_VOLTAGE));
//! # Ok::<(), cellguard_core::BmsError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[macro_use]
mod macros;

pub mod aggregate;
pub mod balancing;
pub mod constants;
pub mod curve;
pub mod derating;
pub mod engine;
pub mod errors;
pub mod params;
pub mod sample;
pub mod soc;
pub mod thermistor;

// Public API
pub use aggregate::{CellState, FaultFlags, PackCommand};
pub use balancing::{BalancingSnapshot, BalancingState};
pub use derating::{Direction, NoTemperatureDerating, TemperatureDerating};
pub use engine::{PackEngine, TickReport};
pub use errors::{BmsError, BmsResult};
pub use params::{OperatingMode, ParameterSet};
pub use sample::PackSample;
pub use soc::CurrentDirection;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
