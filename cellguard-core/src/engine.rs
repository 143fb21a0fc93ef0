//! Per-Tick Orchestration
//!
//! ## Control Flow
//!
//! ```text
//!   PackSample ──▶ offsets ──▶ plausibility ──┬──▶ SOC (per cell)
//!                                             ├──▶ derating (per cell) ──┐
//!                                             └──▶ V_min ──▶ balancing ──┤
//!                                                                        ▼
//!                                                          aggregate ──▶ PackCommand
//! ```
//!
//! [`PackEngine::tick`] is total: every input, including NaN, missing
//! channels and absurd values, produces a command. Implausible samples are
//! clamped (or treated as missing) and always surface as
//! [`FaultFlags::SENSOR_IMPLAUSIBLE`].
//!
//! A cell without a usable voltage reports 0% SOC, gets a zero current
//! limit in both directions and is held `Idle`, which blocks the whole pack
//! through the weakest-cell reduction. A clamped voltage still feeds SOC
//! and derating, but neither takes part in `V_min` nor balances.
//!
//! ## State
//!
//! The balancing states are the only thing that survives a tick. The
//! parameter set is borrowed read-only for the engine's lifetime.
//!
//! ```rust
//! use cellguard_core::{PackEngine, PackSample, ParameterSet};
//!
//! let params = ParameterSet::lg_e60_8s3p();
//! let mut engine = PackEngine::new(&params)?;
//!
//! let sample = PackSample::uniform(16, 3.7, 2, 25.0, -20.0);
//! let report = engine.tick(&sample);
//!
//! assert!(report.command.faults.is_empty());
//! assert_eq!(report.command.charge_limit_a, -100.0);
//! # Ok::<(), cellguard_core::BmsError>(())
//! ```

use heapless::Vec;

use crate::{
    aggregate::{self, CellState, FaultFlags, PackCommand},
    balancing::{BalancingEngine, BalancingSnapshot},
    constants::{MAX_CELLS, MAX_TEMP_SENSORS},
    derating::{CellCurrentLimit, DeratingEngine, NoTemperatureDerating, TemperatureDerating},
    errors::BmsResult,
    params::ParameterSet,
    sample::{PackSample, Reading},
    soc::{CurrentDirection, SocEstimator},
};

/// Result of one tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// Command for the power stage
    pub command: PackCommand,
    /// Per-cell results, indexed by cell number
    pub cells: Vec<CellState, MAX_CELLS>,
    /// Pack SOC, the lowest cell SOC (%)
    pub pack_soc_percent: f32,
    /// Remaining charge at the pack SOC (Ah)
    pub remaining_capacity_ah: f32,
    /// Direction the SOC curves were selected by
    pub direction: CurrentDirection,
}

/// Battery operating-limit and state-estimation engine for one pack
pub struct PackEngine<'p, H: TemperatureDerating = NoTemperatureDerating> {
    params: &'p ParameterSet,
    soc: SocEstimator<'p>,
    derating: DeratingEngine<'p>,
    balancing: BalancingEngine,
    temperature: H,
    last_faults: FaultFlags,
}

impl<'p> PackEngine<'p> {
    /// Validate the parameter set and start with every cell `Idle`
    pub fn new(params: &'p ParameterSet) -> BmsResult<Self> {
        if let Err(e) = params.validate() {
            log_warn!("Rejecting parameter set '{}': {}", params.name, e);
            return Err(e);
        }

        Ok(Self {
            params,
            soc: SocEstimator::from_validated(params),
            derating: DeratingEngine::from_validated(params),
            balancing: BalancingEngine::new(params)?,
            temperature: NoTemperatureDerating,
            last_faults: FaultFlags::empty(),
        })
    }
}

impl<'p, H: TemperatureDerating> PackEngine<'p, H> {
    /// Replace the temperature derating hook
    pub fn with_temperature_derating<T: TemperatureDerating>(self, hook: T) -> PackEngine<'p, T> {
        PackEngine {
            params: self.params,
            soc: self.soc,
            derating: self.derating,
            balancing: self.balancing,
            temperature: hook,
            last_faults: self.last_faults,
        }
    }

    /// Parameter set in use
    pub fn params(&self) -> &'p ParameterSet {
        self.params
    }

    /// Copy of every cell's balancing state
    pub fn balancing_snapshot(&self) -> BalancingSnapshot {
        self.balancing.snapshot()
    }

    /// Return every cell to `Idle`
    pub fn reset_balancing(&mut self) {
        log_info!("Resetting balancing state of '{}'", self.params.name);
        self.balancing.reset();
    }

    /// Faults reported by the previous tick
    pub fn last_faults(&self) -> FaultFlags {
        self.last_faults
    }

    fn condition_temperatures(&self, sample: &PackSample) -> Vec<Reading, MAX_TEMP_SENSORS> {
        let bounds = &self.params.sample_bounds;
        (0..self.params.temp_sensor_count)
            .map(|sensor| {
                let raw = sample.temperatures.get(sensor).copied().unwrap_or(f32::NAN);
                bounds.condition_temperature(raw)
            })
            .collect()
    }

    fn condition_voltages(&self, sample: &PackSample) -> Vec<Reading, MAX_CELLS> {
        let bounds = &self.params.sample_bounds;
        (0..self.params.cell_count)
            .map(|cell| {
                let raw = sample.cell(cell, self.params.sensor_for_cell(cell));
                bounds.condition_voltage(raw.voltage_v - self.params.measurement_offset(cell))
            })
            .collect()
    }

    /// Run one control-loop tick
    pub fn tick(&mut self, sample: &PackSample) -> TickReport {
        let direction = self.soc.direction(sample.current_a);
        let temperatures = self.condition_temperatures(sample);
        let voltages = self.condition_voltages(sample);

        let v_min = aggregate::min_cell_voltage(&voltages);
        self.balancing.update(&voltages, v_min);

        let cells: Vec<CellState, MAX_CELLS> = voltages
            .iter()
            .enumerate()
            .map(|(cell, &voltage)| {
                let temperature = temperatures
                    .get(self.params.sensor_for_cell(cell))
                    .copied()
                    .unwrap_or(Reading::MISSING);

                let (soc_percent, limit) = match voltage.usable() {
                    Some(v) => (
                        self.soc.estimate(v, direction).soc_percent,
                        self.derating.cell_limit(v, temperature.usable(), &self.temperature),
                    ),
                    None => (0.0, CellCurrentLimit::BLOCKED),
                };

                CellState {
                    voltage,
                    temperature,
                    soc_percent,
                    charge_factor: limit.charge_factor,
                    discharge_factor: limit.discharge_factor,
                    charge_limit_a: limit.charge_a,
                    discharge_limit_a: limit.discharge_a,
                    balancing: self.balancing.state(cell),
                }
            })
            .collect();

        let mut command = aggregate::reduce(&cells, &temperatures, self.params);
        if self.params.sample_bounds.check_current(sample.current_a).is_err() {
            command.faults |= FaultFlags::SENSOR_IMPLAUSIBLE;
        }

        let raised = command.faults.newly_raised(self.last_faults);
        if !raised.is_empty() {
            log_warn!("New faults on '{}': {}", self.params.name, raised);
        }
        self.last_faults = command.faults;

        let pack_soc_percent = cells.iter().map(|c| c.soc_percent).reduce(f32::min).unwrap_or(0.0);

        TickReport {
            command,
            pack_soc_percent,
            remaining_capacity_ah: pack_soc_percent / 100.0 * self.params.capacity_ah,
            cells,
            direction,
        }
    }
}
