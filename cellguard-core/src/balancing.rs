//! Cell Balancing Decisions
//!
//! ## State Machine
//!
//! Every cell carries one [`BalancingState`] that survives across ticks.
//! With `delta = V_cell - V_min` (minimum over the pack this tick):
//!
//! ```text
//!            delta > diff_max  &&  V_cell >= u_cell_min_balancing
//!   ┌──────┐ ────────────────────────────────────────────────▶ ┌───────────┐
//!   │ Idle │                                                   │ Balancing │
//!   └──────┘ ◀──────────────────────────────────────────────── └───────────┘
//!                     delta <= diff_max - hysteresis
//! ```
//!
//! Inside the band `(diff_max - hysteresis, diff_max]` a cell keeps whatever
//! state it had, so a noisy cell sitting near the threshold does not chatter.
//! The previous state is an input to every decision; recomputing from
//! scratch would lose the band.
//!
//! ## Ownership
//!
//! The per-cell states live in a fixed array indexed by cell number, owned
//! by [`BalancingEngine`]. Telemetry readers take a [`BalancingSnapshot`]
//! (a `Copy` value) between ticks and never observe a half-updated array.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    constants::MAX_CELLS,
    errors::{BmsError, BmsResult},
    params::ParameterSet,
    sample::Reading,
};

/// Balancing state of one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BalancingState {
    /// Bleed resistor off
    #[default]
    Idle,
    /// Bleed resistor on
    Balancing,
}

impl BalancingState {
    /// True while balancing
    pub const fn is_active(&self) -> bool {
        matches!(self, BalancingState::Balancing)
    }
}

/// State change produced by one decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Transition {
    /// State unchanged
    None,
    /// Idle → Balancing
    Started,
    /// Balancing → Idle
    Stopped,
}

/// Voltage thresholds of the hysteresis band
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BalancingThresholds {
    /// Delta above which an idle cell starts balancing (V)
    pub start_delta_v: f32,
    /// Delta at or below which a balancing cell stops (V)
    pub stop_delta_v: f32,
    /// Cell voltage required to start balancing (V)
    pub min_cell_voltage_v: f32,
}

impl BalancingThresholds {
    /// Thresholds for the parameter set's active operating mode
    pub fn from_params(params: &ParameterSet) -> BmsResult<Self> {
        let diff_max = params.u_cell_diff_max;
        let hysteresis = params.u_cell_diff_hysteresis;
        if !(diff_max.is_finite() && hysteresis > 0.0 && hysteresis < diff_max) {
            return Err(BmsError::InvalidParameter {
                name: "u_cell_diff_hysteresis",
                reason: "must lie strictly between 0 and u_cell_diff_max",
            });
        }
        Ok(Self {
            start_delta_v: diff_max,
            stop_delta_v: diff_max - hysteresis,
            min_cell_voltage_v: params.cell_limits().u_cell_min_balancing,
        })
    }
}

/// Next state of one cell
///
/// Pure: the same inputs always give the same answer, and the previous
/// state is one of them.
pub fn decide(
    state: BalancingState,
    voltage: f32,
    v_min: f32,
    thresholds: &BalancingThresholds,
) -> (BalancingState, Transition) {
    let delta = voltage - v_min;
    match state {
        BalancingState::Idle
            if delta > thresholds.start_delta_v && voltage >= thresholds.min_cell_voltage_v =>
        {
            (BalancingState::Balancing, Transition::Started)
        }
        BalancingState::Balancing if delta <= thresholds.stop_delta_v => {
            (BalancingState::Idle, Transition::Stopped)
        }
        // Comparisons against NaN are false, so a NaN input keeps the state
        _ => (state, Transition::None),
    }
}

/// Copy of all balancing states at one instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BalancingSnapshot {
    states: [BalancingState; MAX_CELLS],
    cell_count: usize,
}

impl BalancingSnapshot {
    /// States of the configured cells
    pub fn states(&self) -> &[BalancingState] {
        &self.states[..self.cell_count]
    }

    /// State of one cell, `Idle` for indices past the cell count
    pub fn state(&self, cell: usize) -> BalancingState {
        self.states().get(cell).copied().unwrap_or_default()
    }

    /// One bit per cell, bit `i` set while cell `i` balances
    pub fn bitmap(&self) -> u32 {
        bitmap_of(self.states())
    }

    /// Number of cells currently balancing
    pub fn active_count(&self) -> usize {
        self.states().iter().filter(|s| s.is_active()).count()
    }
}

fn bitmap_of(states: &[BalancingState]) -> u32 {
    states
        .iter()
        .enumerate()
        .filter(|(_, s)| s.is_active())
        .fold(0, |bits, (cell, _)| bits | (1 << cell))
}

/// Owner of the per-cell balancing states
#[derive(Debug, Clone)]
pub struct BalancingEngine {
    states: [BalancingState; MAX_CELLS],
    cell_count: usize,
    thresholds: BalancingThresholds,
}

impl BalancingEngine {
    /// Every cell starts `Idle`
    pub fn new(params: &ParameterSet) -> BmsResult<Self> {
        if !(1..=MAX_CELLS).contains(&params.cell_count) {
            return Err(BmsError::CountOutOfRange {
                what: "cell",
                count: params.cell_count,
                max: MAX_CELLS,
            });
        }
        Ok(Self {
            states: [BalancingState::Idle; MAX_CELLS],
            cell_count: params.cell_count,
            thresholds: BalancingThresholds::from_params(params)?,
        })
    }

    /// Advance every cell by one tick and return the new bitmap
    ///
    /// `voltages` holds one conditioned reading per cell. A cell whose
    /// reading is missing or clamped, or a tick without any plausible
    /// `v_min`, forces the cell to `Idle`.
    pub fn update(&mut self, voltages: &[Reading], v_min: Option<f32>) -> u32 {
        for cell in 0..self.cell_count {
            let current = self.states[cell];
            let reading = voltages.get(cell).and_then(Reading::trusted);

            let (next, transition) = match (reading, v_min) {
                (Some(voltage), Some(v_min)) => decide(current, voltage, v_min, &self.thresholds),
                _ if current.is_active() => (BalancingState::Idle, Transition::Stopped),
                _ => (current, Transition::None),
            };

            match transition {
                Transition::Started => log_info!("Cell {} started balancing", cell),
                Transition::Stopped => log_info!("Cell {} stopped balancing", cell),
                Transition::None => {}
            }
            self.states[cell] = next;
        }
        self.bitmap()
    }

    /// State of one cell, `Idle` for indices past the cell count
    pub fn state(&self, cell: usize) -> BalancingState {
        self.states[..self.cell_count].get(cell).copied().unwrap_or_default()
    }

    /// One bit per cell, bit `i` set while cell `i` balances
    pub fn bitmap(&self) -> u32 {
        bitmap_of(&self.states[..self.cell_count])
    }

    /// Copy of the current states
    pub fn snapshot(&self) -> BalancingSnapshot {
        BalancingSnapshot { states: self.states, cell_count: self.cell_count }
    }

    /// Return every cell to `Idle`
    pub fn reset(&mut self) {
        self.states = [BalancingState::Idle; MAX_CELLS];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::SampleStatus;

    fn readings(voltages: &[f32]) -> heapless::Vec<Reading, MAX_CELLS> {
        voltages
            .iter()
            .map(|&value| Reading { value, status: SampleStatus::Plausible })
            .collect()
    }

    fn lg_thresholds() -> BalancingThresholds {
        BalancingThresholds::from_params(&ParameterSet::lg_e60_8s3p()).unwrap()
    }

    #[test]
    fn hysteresis_band_holds_state() {
        let t = lg_thresholds();
        let v_min = 3.700;

        // Above the threshold: start
        let (state, transition) = decide(BalancingState::Idle, v_min + 0.060, v_min, &t);
        assert_eq!((state, transition), (BalancingState::Balancing, Transition::Started));

        // Inside the band: both states are sticky
        for delta in [0.045, 0.040, 0.030] {
            assert_eq!(decide(BalancingState::Balancing, v_min + delta, v_min, &t).0, BalancingState::Balancing);
            assert_eq!(decide(BalancingState::Idle, v_min + delta, v_min, &t).0, BalancingState::Idle);
        }

        // Below the band: stop
        let (state, transition) = decide(BalancingState::Balancing, v_min + 0.010, v_min, &t);
        assert_eq!((state, transition), (BalancingState::Idle, Transition::Stopped));
    }

    #[test]
    fn low_cells_never_start() {
        let t = lg_thresholds();
        // Delta is large but the cell sits below the 3.620V floor
        let (state, _) = decide(BalancingState::Idle, 3.600, 3.400, &t);
        assert_eq!(state, BalancingState::Idle);
    }

    #[test]
    fn one_high_cell_balances_then_releases() {
        let params = ParameterSet::lg_e60_8s3p();
        let mut engine = BalancingEngine::new(&params).unwrap();

        let mut high = [3.700; 16];
        high[5] = 3.760;
        let bitmap = engine.update(&readings(&high), Some(3.700));
        assert_eq!(bitmap, 1 << 5);
        assert_eq!(engine.state(5), BalancingState::Balancing);

        let bitmap = engine.update(&readings(&[3.700; 16]), Some(3.700));
        assert_eq!(bitmap, 0);
        assert_eq!(engine.state(5), BalancingState::Idle);
    }

    #[test]
    fn static_input_does_not_toggle() {
        let params = ParameterSet::lg_e60_8s3p();
        let mut engine = BalancingEngine::new(&params).unwrap();

        let mut volts = [3.700; 16];
        volts[2] = 3.760;
        engine.update(&readings(&volts), Some(3.700));

        // Settle inside the band and hold there
        volts[2] = 3.740;
        for _ in 0..10 {
            assert_eq!(engine.update(&readings(&volts), Some(3.700)), 1 << 2);
        }
    }

    #[test]
    fn missing_reading_forces_idle() {
        let params = ParameterSet::lg_e60_8s3p();
        let mut engine = BalancingEngine::new(&params).unwrap();

        let mut volts = [3.700; 16];
        volts[0] = 3.760;
        engine.update(&readings(&volts), Some(3.700));
        assert_eq!(engine.bitmap(), 1);

        let mut cells = readings(&volts);
        cells[0] = Reading::MISSING;
        assert_eq!(engine.update(&cells, Some(3.700)), 0);
    }

    #[test]
    fn clamped_reading_forces_idle() {
        let params = ParameterSet::lg_e60_8s3p();
        let mut engine = BalancingEngine::new(&params).unwrap();

        let mut volts = [3.700; 16];
        volts[3] = 3.800;
        engine.update(&readings(&volts), Some(3.700));
        assert_eq!(engine.bitmap(), 1 << 3);

        // Clamped to the 5 V ceiling: far above v_min but not trusted
        let mut cells = readings(&volts);
        cells[3] = Reading { value: 5.0, status: SampleStatus::Clamped };
        assert_eq!(engine.update(&cells, Some(3.700)), 0);
        assert_eq!(engine.state(3), BalancingState::Idle);
    }

    #[test]
    fn snapshot_and_reset() {
        let params = ParameterSet::lg_e60_8s3p();
        let mut engine = BalancingEngine::new(&params).unwrap();

        let mut volts = [3.700; 16];
        volts[15] = 3.800;
        engine.update(&readings(&volts), Some(3.700));

        let snapshot = engine.snapshot();
        engine.reset();

        assert_eq!(snapshot.bitmap(), 1 << 15);
        assert_eq!(snapshot.active_count(), 1);
        assert_eq!(snapshot.states().len(), 16);
        assert_eq!(engine.bitmap(), 0);
        assert_eq!(engine.state(15), BalancingState::Idle);
    }

    #[test]
    fn rejects_hysteresis_wider_than_threshold() {
        let params = ParameterSet::lg_e60_8s3p().with_balancing(0.020, 0.030);
        assert!(BalancingEngine::new(&params).is_err());
    }
}
