//! Battery Parameter Set
//!
//! ## Overview
//!
//! A [`ParameterSet`] describes one battery module: its topology, the cell
//! voltage window, derating breakpoints, balancing thresholds, temperature
//! limits and the OCV and current tables. It is built once at start-up,
//! validated, and then shared read-only by every component of the engine.
//! Nothing in the engine mutates it, so any number of readers may borrow it
//! without synchronization.
//!
//! ## Sources
//!
//! - [`ParameterSet::lg_e60_8s3p`]: the LG Chem E60 8s3p module preset
//! - `with_*` methods: consuming adjustments on top of a preset
//! - `serde` (feature `serde`): deserialize a complete set from a config file
//!
//! Whatever the source, [`ParameterSet::validate`] must pass before the first
//! tick. [`PackEngine::new`](crate::engine::PackEngine::new) calls it and
//! refuses to start on failure.
//!
//! ## Operating Modes
//!
//! End-of-line test benches run the module with their own cell voltage
//! window. Both windows are carried side by side and [`OperatingMode`]
//! selects one at runtime:
//!
//! ```rust
//! use cellguard_core::params::{CellVoltageLimits, OperatingMode, ParameterSet};
//!
//! let bench = ParameterSet::lg_e60_8s3p()
//!     .with_eol_limits(CellVoltageLimits {
//!         u_cell_min: 2.8,
//!         u_cell_max: 4.25,
//!         u_cell_min_balancing: 3.5,
//!     })
//!     .with_mode(OperatingMode::EolTest);
//!
//! assert_eq!(bench.cell_limits().u_cell_min, 2.8);
//! assert!(bench.validate().is_ok());
//! ```

mod lg_e60_ocv;

use heapless::{String, Vec};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    balancing::BalancingEngine,
    constants::{
        CURRENT_TABLE_MAX_POINTS, DEFAULT_REST_CURRENT_A, MAX_CELLS, MAX_TEMP_SENSORS,
        OCV_TABLE_MAX_POINTS, PACK_NAME_MAX_LEN,
    },
    derating::DeratingEngine,
    errors::{BmsError, BmsResult, TableId},
    sample::SampleBounds,
    soc::SocEstimator,
    thermistor::NtcParams,
};

pub use lg_e60_ocv::LG_E60_OCV;

/// OCV table storage, one entry per SOC step
pub type OcvTable = Vec<f32, OCV_TABLE_MAX_POINTS>;

/// Which cell voltage window is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OperatingMode {
    /// Normal operation in the field
    #[default]
    Production,
    /// End-of-line test bench
    EolTest,
}

/// Cell voltage window for one operating mode
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CellVoltageLimits {
    /// Lower operating limit at constant current (V)
    pub u_cell_min: f32,
    /// Upper operating limit at constant current (V)
    pub u_cell_max: f32,
    /// Cell voltage required before the cell may balance (V)
    pub u_cell_min_balancing: f32,
}

/// Two-point derating ramp
///
/// For discharge `zero_v < one_v` (factor rises with voltage), for charge
/// `one_v < zero_v` (factor falls as the cell fills up).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeratingBreakpoints {
    /// Voltage at which the derating factor is 0
    pub zero_v: f32,
    /// Voltage at which the derating factor is 1
    pub one_v: f32,
}

/// Static current ceiling over cell voltage at 25 °C
///
/// Currents keep the pack sign convention: negative for charge.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CurrentTable {
    /// Cell voltages, non-decreasing (V)
    pub voltages: Vec<f32, CURRENT_TABLE_MAX_POINTS>,
    /// Current limit at each voltage (A)
    pub currents: Vec<f32, CURRENT_TABLE_MAX_POINTS>,
}

impl CurrentTable {
    /// Build a table from voltage and current columns
    pub fn from_columns(voltages: &[f32], currents: &[f32]) -> BmsResult<Self> {
        Ok(Self {
            voltages: bounded(voltages, "current table points")?,
            currents: bounded(currents, "current table points")?,
        })
    }
}

/// Immutable description of one battery module
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParameterSet {
    /// Module designation
    pub name: String<PACK_NAME_MAX_LEN>,

    /// Cells in series
    pub cell_count: usize,
    /// Cells in parallel per series element
    pub parallel_cells: usize,
    /// Parallel batteries per module
    pub parallel_batteries: usize,
    /// Temperature sensors, each covering a contiguous group of cells
    pub temp_sensor_count: usize,

    /// Active cell voltage window
    pub mode: OperatingMode,
    /// Cell voltage window in production
    pub production_limits: CellVoltageLimits,
    /// Cell voltage window on the end-of-line test bench
    pub eol_limits: CellVoltageLimits,

    /// Maximum constant charge current at 25 °C and 50% SOC (A, ≤ 0)
    pub max_operate_charge_current_a: f32,
    /// Maximum constant discharge current at 25 °C and 50% SOC (A, ≥ 0)
    pub max_operate_discharge_current_a: f32,
    /// Charge current the derating factor scales (A, ≤ 0)
    pub max_derating_charge_current_a: f32,
    /// Discharge current the derating factor scales (A, ≥ 0)
    pub max_derating_discharge_current_a: f32,

    /// Discharge derating ramp (`zero_v < one_v`)
    pub discharge_derating: DeratingBreakpoints,
    /// Charge derating ramp (`one_v < zero_v`)
    pub charge_derating: DeratingBreakpoints,

    /// Apply the static current tables as an extra ceiling
    pub dynamic_current_limits: bool,
    /// Static charge current ceiling
    pub charge_current_table: CurrentTable,
    /// Static discharge current ceiling
    pub discharge_current_table: CurrentTable,

    /// Cell-to-minimum voltage difference that starts balancing (V)
    pub u_cell_diff_max: f32,
    /// Width of the balancing hysteresis band (V)
    pub u_cell_diff_hysteresis: f32,

    /// Minimum battery temperature (°C)
    pub t_bat_min: f32,
    /// Maximum battery temperature (°C)
    pub t_bat_max: f32,

    /// Nominal module capacity (Ah)
    pub capacity_ah: f32,
    /// Module internal resistance (Ω)
    pub internal_resistance_ohm: f32,

    /// OCV while charging, ascending SOC
    pub ocv_charge: OcvTable,
    /// OCV while discharging or at rest, ascending SOC
    pub ocv_discharge: OcvTable,

    /// Per-cell voltage measurement offsets subtracted from raw readings (V)
    pub measurement_offsets: Option<Vec<f32, MAX_CELLS>>,

    /// Current magnitude below which the pack counts as resting (A)
    pub rest_current_a: f32,
    /// Plausibility bounds for raw samples
    pub sample_bounds: SampleBounds,
    /// NTC characteristics of the temperature sensors
    pub thermistor: NtcParams,
}

fn bounded<const N: usize>(values: &[f32], what: &'static str) -> BmsResult<Vec<f32, N>> {
    Vec::from_slice(values).map_err(|_| BmsError::CountOutOfRange {
        what,
        count: values.len(),
        max: N,
    })
}

fn copy_truncated<const N: usize>(values: &[f32]) -> Vec<f32, N> {
    values.iter().copied().take(N).collect()
}

fn pack_name(name: &str) -> String<PACK_NAME_MAX_LEN> {
    let mut out = String::new();
    for c in name.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

fn require_finite(name: &'static str, value: f32) -> BmsResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(BmsError::InvalidParameter { name, reason: "not a finite number" })
    }
}

fn require_count(what: &'static str, count: usize, max: usize) -> BmsResult<()> {
    if (1..=max).contains(&count) {
        Ok(())
    } else {
        Err(BmsError::CountOutOfRange { what, count, max })
    }
}

impl CellVoltageLimits {
    fn validate(&self) -> BmsResult<()> {
        require_finite("u_cell_min", self.u_cell_min)?;
        require_finite("u_cell_max", self.u_cell_max)?;
        require_finite("u_cell_min_balancing", self.u_cell_min_balancing)?;
        if self.u_cell_min >= self.u_cell_max {
            return Err(BmsError::InvalidParameter {
                name: "u_cell_min",
                reason: "must be below u_cell_max",
            });
        }
        Ok(())
    }
}

impl ParameterSet {
    /// LG Chem E60 8s3p module (16 series cells, 3 in parallel)
    pub fn lg_e60_8s3p() -> Self {
        let limits = CellVoltageLimits {
            u_cell_min: 3.261,
            u_cell_max: 4.216,
            // Roughly 30% SOC on the discharge curve
            u_cell_min_balancing: 3.620,
        };

        Self {
            name: pack_name("LG-E60-8S"),
            cell_count: 16,
            parallel_cells: 3,
            parallel_batteries: 1,
            temp_sensor_count: 2,
            mode: OperatingMode::Production,
            production_limits: limits,
            eol_limits: limits,
            max_operate_charge_current_a: -100.0,
            max_operate_discharge_current_a: 100.0,
            max_derating_charge_current_a: -100.0,
            max_derating_discharge_current_a: 100.0,
            discharge_derating: DeratingBreakpoints { zero_v: 3.425, one_v: 3.623 },
            charge_derating: DeratingBreakpoints { zero_v: 4.123, one_v: 3.949 },
            dynamic_current_limits: true,
            // 0, 5, 25, 73, 80, 90, 100% SOC
            charge_current_table: CurrentTable {
                voltages: copy_truncated(&[3.261, 3.425, 3.517, 3.952, 4.023, 4.123, 4.216]),
                currents: copy_truncated(&[-60.0, -60.0, -100.0, -100.0, -90.0, -60.0, -60.0]),
            },
            // 0, 5, 30, 100% SOC
            discharge_current_table: CurrentTable {
                voltages: copy_truncated(&[3.261, 3.425, 3.620, 4.216]),
                currents: copy_truncated(&[60.0, 60.0, 100.0, 100.0]),
            },
            u_cell_diff_max: 0.050,
            u_cell_diff_hysteresis: 0.025,
            t_bat_min: 0.0,
            t_bat_max: 50.0,
            capacity_ah: 177.0,
            internal_resistance_ohm: 0.0126,
            ocv_charge: copy_truncated(&LG_E60_OCV),
            ocv_discharge: copy_truncated(&LG_E60_OCV),
            measurement_offsets: None,
            rest_current_a: DEFAULT_REST_CURRENT_A,
            sample_bounds: SampleBounds::default(),
            thermistor: NtcParams::default(),
        }
    }

    /// Measurement offsets of the ADBMS1818 front end on the E60 tray
    pub const ADBMS1818_E60_OFFSETS: [f32; 16] = [
        0.0048, 0.0, 0.0311, -0.033, 0.0, 0.0, 0.0, 0.0,
        0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
    ];

    /// Select the active cell voltage window
    pub fn with_mode(mut self, mode: OperatingMode) -> Self {
        self.mode = mode;
        self
    }

    /// Replace the end-of-line test bench voltage window
    pub fn with_eol_limits(mut self, limits: CellVoltageLimits) -> Self {
        self.eol_limits = limits;
        self
    }

    /// Enable or disable the static current tables
    pub fn with_dynamic_current_limits(mut self, enabled: bool) -> Self {
        self.dynamic_current_limits = enabled;
        self
    }

    /// Replace the balancing threshold and hysteresis band
    pub fn with_balancing(mut self, diff_max: f32, hysteresis: f32) -> Self {
        self.u_cell_diff_max = diff_max;
        self.u_cell_diff_hysteresis = hysteresis;
        self
    }

    /// Change the number of series cells
    pub fn with_cell_count(mut self, cell_count: usize) -> Self {
        self.cell_count = cell_count;
        self
    }

    /// Install per-cell measurement offsets
    pub fn with_measurement_offsets(mut self, offsets: &[f32]) -> BmsResult<Self> {
        self.measurement_offsets = Some(bounded(offsets, "measurement offsets")?);
        Ok(self)
    }

    /// Replace both OCV tables
    pub fn with_ocv_tables(mut self, charge: &[f32], discharge: &[f32]) -> BmsResult<Self> {
        self.ocv_charge = bounded(charge, "ocv table points")?;
        self.ocv_discharge = bounded(discharge, "ocv table points")?;
        Ok(self)
    }

    /// Cell voltage window of the active mode
    pub fn cell_limits(&self) -> &CellVoltageLimits {
        match self.mode {
            OperatingMode::Production => &self.production_limits,
            OperatingMode::EolTest => &self.eol_limits,
        }
    }

    /// Upper cut-off module voltage (V)
    pub fn module_voltage_max(&self) -> f32 {
        self.cell_count as f32 * self.cell_limits().u_cell_max
    }

    /// Lower cut-off module voltage (V)
    pub fn module_voltage_min(&self) -> f32 {
        self.cell_count as f32 * self.cell_limits().u_cell_min
    }

    /// Measurement offset for one cell, 0 when none is configured
    pub fn measurement_offset(&self, cell: usize) -> f32 {
        self.measurement_offsets
            .as_ref()
            .and_then(|offsets| offsets.get(cell).copied())
            .unwrap_or(0.0)
    }

    /// Temperature sensor covering the given cell
    ///
    /// Cells are split into `temp_sensor_count` contiguous groups.
    pub fn sensor_for_cell(&self, cell: usize) -> usize {
        if self.cell_count == 0 {
            return 0;
        }
        (cell * self.temp_sensor_count / self.cell_count).min(self.temp_sensor_count.saturating_sub(1))
    }

    /// Check every invariant the engine relies on
    ///
    /// Topology and scalars are checked here. Table shape, monotonicity and
    /// breakpoint order are checked by the components that interpret them.
    pub fn validate(&self) -> BmsResult<()> {
        require_count("cell", self.cell_count, MAX_CELLS)?;
        require_count("temperature sensor", self.temp_sensor_count, MAX_TEMP_SENSORS)?;
        require_count("parallel cell", self.parallel_cells, usize::MAX)?;
        require_count("parallel battery", self.parallel_batteries, usize::MAX)?;

        self.production_limits.validate()?;
        self.eol_limits.validate()?;

        for (name, value) in [
            ("max_operate_charge_current_a", self.max_operate_charge_current_a),
            ("max_operate_discharge_current_a", self.max_operate_discharge_current_a),
            ("max_derating_charge_current_a", self.max_derating_charge_current_a),
            ("max_derating_discharge_current_a", self.max_derating_discharge_current_a),
            ("u_cell_diff_max", self.u_cell_diff_max),
            ("u_cell_diff_hysteresis", self.u_cell_diff_hysteresis),
            ("t_bat_min", self.t_bat_min),
            ("t_bat_max", self.t_bat_max),
            ("capacity_ah", self.capacity_ah),
            ("internal_resistance_ohm", self.internal_resistance_ohm),
            ("rest_current_a", self.rest_current_a),
        ] {
            require_finite(name, value)?;
        }

        if self.max_operate_charge_current_a > 0.0 || self.max_derating_charge_current_a > 0.0 {
            return Err(BmsError::InvalidParameter {
                name: "charge current",
                reason: "charge currents must be zero or negative",
            });
        }
        if self.max_operate_discharge_current_a < 0.0 || self.max_derating_discharge_current_a < 0.0 {
            return Err(BmsError::InvalidParameter {
                name: "discharge current",
                reason: "discharge currents must be zero or positive",
            });
        }
        if self.t_bat_min >= self.t_bat_max {
            return Err(BmsError::InvalidParameter {
                name: "t_bat_min",
                reason: "must be below t_bat_max",
            });
        }
        if self.capacity_ah <= 0.0 {
            return Err(BmsError::InvalidParameter { name: "capacity_ah", reason: "must be positive" });
        }
        if self.internal_resistance_ohm < 0.0 || self.rest_current_a < 0.0 {
            return Err(BmsError::InvalidParameter {
                name: "internal_resistance_ohm",
                reason: "resistance and rest current must not be negative",
            });
        }

        if let Some(offsets) = &self.measurement_offsets {
            if offsets.len() != self.cell_count {
                return Err(BmsError::TableLengthMismatch {
                    table: TableId::MeasurementOffsets,
                    x_len: self.cell_count,
                    y_len: offsets.len(),
                });
            }
            if let Some(index) = offsets.iter().position(|o| !o.is_finite()) {
                return Err(BmsError::NonMonotonicTable { table: TableId::MeasurementOffsets, index });
            }
        }

        self.sample_bounds.validate()?;
        self.thermistor.validate()?;

        SocEstimator::new(self)?;
        DeratingEngine::new(self)?;
        BalancingEngine::new(self)?;
        Ok(())
    }
}
