//! Pack-Level Aggregation
//!
//! Reduces the per-cell results of one tick into the [`PackCommand`] handed
//! to the power stage. The reduction is a pure function of the tick's
//! [`CellState`]s and temperature readings; nothing is remembered.
//!
//! The weakest cell governs: the pack charge limit is the per-cell charge
//! limit of smallest magnitude, and likewise for discharge. A pack never
//! carries more current than its worst cell tolerates.

use core::fmt;
use core::ops::{BitOr, BitOrAssign};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    balancing::BalancingState,
    params::ParameterSet,
    sample::Reading,
};

/// Fault bits reported with every command
///
/// The engine only reports; acting on faults (forcing zero current,
/// opening contactors) is the power stage's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FaultFlags(u16);

impl FaultFlags {
    /// A cell is above `u_cell_max`
    pub const OVER_VOLTAGE: Self = Self(1 << 0);
    /// A cell is below `u_cell_min`
    pub const UNDER_VOLTAGE: Self = Self(1 << 1);
    /// A sensor is above `t_bat_max`
    pub const OVER_TEMP: Self = Self(1 << 2);
    /// A sensor is below `t_bat_min`
    pub const UNDER_TEMP: Self = Self(1 << 3);
    /// A sample was missing, non-finite or physically implausible
    pub const SENSOR_IMPLAUSIBLE: Self = Self(1 << 4);
    /// Sum of cell voltages above the module maximum
    pub const MODULE_OVER_VOLTAGE: Self = Self(1 << 5);
    /// Sum of cell voltages below the module minimum
    pub const MODULE_UNDER_VOLTAGE: Self = Self(1 << 6);

    const NAMES: [(Self, &'static str); 7] = [
        (Self::OVER_VOLTAGE, "OVER_VOLTAGE"),
        (Self::UNDER_VOLTAGE, "UNDER_VOLTAGE"),
        (Self::OVER_TEMP, "OVER_TEMP"),
        (Self::UNDER_TEMP, "UNDER_TEMP"),
        (Self::SENSOR_IMPLAUSIBLE, "SENSOR_IMPLAUSIBLE"),
        (Self::MODULE_OVER_VOLTAGE, "MODULE_OVER_VOLTAGE"),
        (Self::MODULE_UNDER_VOLTAGE, "MODULE_UNDER_VOLTAGE"),
    ];

    /// No faults
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Raw bits
    pub const fn bits(&self) -> u16 {
        self.0
    }

    /// True when no bit is set
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Set every bit of `other`
    pub fn set(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// True when every bit of `other` is set
    pub const fn contains(&self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Bits set here but not in `previous`
    pub const fn newly_raised(&self, previous: Self) -> Self {
        Self(self.0 & !previous.0)
    }
}

impl BitOr for FaultFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for FaultFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.set(rhs);
    }
}

impl fmt::Display for FaultFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let mut first = true;
        for (flag, name) in Self::NAMES {
            if self.contains(flag) {
                if !first {
                    f.write_str("|")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Command for the power stage, produced fresh every tick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PackCommand {
    /// Allowed charge current (A, ≤ 0)
    pub charge_limit_a: f32,
    /// Allowed discharge current (A, ≥ 0)
    pub discharge_limit_a: f32,
    /// Bit `i` set while cell `i` balances
    pub balancing_bitmap: u32,
    /// Active faults
    pub faults: FaultFlags,
}

/// Everything derived for one cell in one tick
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CellState {
    /// Conditioned, offset-compensated voltage
    pub voltage: Reading,
    /// Conditioned temperature of the cell's sensor group
    pub temperature: Reading,
    /// Estimated SOC in [0, 100] %, 0 without a usable voltage
    pub soc_percent: f32,
    /// Charge derating factor, [0, 1]
    pub charge_factor: f32,
    /// Discharge derating factor, [0, 1]
    pub discharge_factor: f32,
    /// Allowed charge current (A, ≤ 0)
    pub charge_limit_a: f32,
    /// Allowed discharge current (A, ≥ 0)
    pub discharge_limit_a: f32,
    /// Balancing state after this tick
    pub balancing: BalancingState,
}

/// Lowest plausible cell voltage, `None` when no cell has one
///
/// Clamped and missing readings are skipped: a broken sense line clamped
/// to 0 V would otherwise set every healthy cell balancing.
pub fn min_cell_voltage(voltages: &[Reading]) -> Option<f32> {
    voltages.iter().filter_map(Reading::trusted).reduce(f32::min)
}

fn voltage_faults(cells: &[CellState], params: &ParameterSet) -> FaultFlags {
    let limits = params.cell_limits();
    let mut faults = FaultFlags::empty();
    // f64 keeps the sum of up to 32 f32 values exact
    let mut module_sum = 0.0f64;
    let mut all_present = true;

    for cell in cells {
        if cell.voltage.is_implausible() {
            faults |= FaultFlags::SENSOR_IMPLAUSIBLE;
        }
        let Some(voltage) = cell.voltage.usable() else {
            all_present = false;
            continue;
        };
        if voltage > limits.u_cell_max {
            faults |= FaultFlags::OVER_VOLTAGE;
        }
        if voltage < limits.u_cell_min {
            faults |= FaultFlags::UNDER_VOLTAGE;
        }
        module_sum += f64::from(voltage);
    }

    if all_present && !cells.is_empty() {
        let module_voltage = module_sum as f32;
        if module_voltage > params.module_voltage_max() {
            faults |= FaultFlags::MODULE_OVER_VOLTAGE;
        }
        if module_voltage < params.module_voltage_min() {
            faults |= FaultFlags::MODULE_UNDER_VOLTAGE;
        }
    }
    faults
}

fn temperature_faults(temperatures: &[Reading], params: &ParameterSet) -> FaultFlags {
    let mut faults = FaultFlags::empty();
    for reading in temperatures {
        if reading.is_implausible() {
            faults |= FaultFlags::SENSOR_IMPLAUSIBLE;
        }
        if let Some(t) = reading.usable() {
            if t > params.t_bat_max {
                faults |= FaultFlags::OVER_TEMP;
            }
            if t < params.t_bat_min {
                faults |= FaultFlags::UNDER_TEMP;
            }
        }
    }
    faults
}

/// Reduce one tick's per-cell results into the pack command
///
/// With no cells both limits are 0.
pub fn reduce(cells: &[CellState], temperatures: &[Reading], params: &ParameterSet) -> PackCommand {
    let charge_limit_a = cells.iter().map(|c| c.charge_limit_a).reduce(f32::max).unwrap_or(0.0);
    let discharge_limit_a = cells.iter().map(|c| c.discharge_limit_a).reduce(f32::min).unwrap_or(0.0);

    let balancing_bitmap = cells
        .iter()
        .enumerate()
        .filter(|(_, c)| c.balancing.is_active())
        .fold(0u32, |bits, (i, _)| bits | (1 << i));

    PackCommand {
        charge_limit_a,
        discharge_limit_a,
        balancing_bitmap,
        faults: voltage_faults(cells, params) | temperature_faults(temperatures, params),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::SampleStatus;

    fn plausible(value: f32) -> Reading {
        Reading { value, status: SampleStatus::Plausible }
    }

    fn healthy(voltage: f32) -> CellState {
        CellState {
            voltage: plausible(voltage),
            temperature: plausible(25.0),
            soc_percent: 50.0,
            charge_factor: 1.0,
            discharge_factor: 1.0,
            charge_limit_a: -100.0,
            discharge_limit_a: 100.0,
            balancing: BalancingState::Idle,
        }
    }

    #[test]
    fn weakest_cell_governs() {
        let params = ParameterSet::lg_e60_8s3p();
        let mut cells = [healthy(3.7); 16];
        cells[9].charge_limit_a = -12.5;
        cells[9].discharge_limit_a = 7.5;

        let command = reduce(&cells, &[plausible(25.0); 2], &params);
        assert_eq!(command.charge_limit_a, -12.5);
        assert_eq!(command.discharge_limit_a, 7.5);
        assert!(command.faults.is_empty());
    }

    #[test]
    fn voltage_and_temperature_faults() {
        let params = ParameterSet::lg_e60_8s3p();
        let mut cells = [healthy(3.7); 16];
        cells[0].voltage = plausible(4.30);
        cells[1].voltage = plausible(3.10);

        let command = reduce(&cells, &[plausible(55.0), plausible(-5.0)], &params);
        assert!(command.faults.contains(FaultFlags::OVER_VOLTAGE | FaultFlags::UNDER_VOLTAGE));
        assert!(command.faults.contains(FaultFlags::OVER_TEMP | FaultFlags::UNDER_TEMP));
        assert!(!command.faults.contains(FaultFlags::SENSOR_IMPLAUSIBLE));
    }

    #[test]
    fn module_voltage_faults_need_every_cell() {
        let params = ParameterSet::lg_e60_8s3p();

        let cells = [healthy(4.25); 16];
        let command = reduce(&cells, &[plausible(25.0)], &params);
        assert!(command.faults.contains(FaultFlags::MODULE_OVER_VOLTAGE));

        let mut cells = [healthy(3.2); 16];
        cells[3].voltage = Reading::MISSING;
        let command = reduce(&cells, &[plausible(25.0)], &params);
        assert!(!command.faults.contains(FaultFlags::MODULE_UNDER_VOLTAGE));
        assert!(command.faults.contains(FaultFlags::SENSOR_IMPLAUSIBLE | FaultFlags::UNDER_VOLTAGE));
    }

    #[test]
    fn bitmap_collects_balancing_cells() {
        let params = ParameterSet::lg_e60_8s3p();
        let mut cells = [healthy(3.7); 16];
        cells[1].balancing = BalancingState::Balancing;
        cells[14].balancing = BalancingState::Balancing;

        let command = reduce(&cells, &[], &params);
        assert_eq!(command.balancing_bitmap, (1 << 1) | (1 << 14));
    }

    #[test]
    fn min_voltage_skips_missing_and_clamped_cells() {
        let readings = [plausible(3.7), Reading::MISSING, plausible(3.65)];
        assert_eq!(min_cell_voltage(&readings), Some(3.65));
        assert_eq!(min_cell_voltage(&[Reading::MISSING]), None);

        let clamped = Reading { value: 0.0, status: SampleStatus::Clamped };
        assert_eq!(min_cell_voltage(&[plausible(3.7), clamped, plausible(3.68)]), Some(3.68));
        assert_eq!(min_cell_voltage(&[clamped]), None);
    }

    #[test]
    fn flags_track_new_bits_and_print_names() {
        let before = FaultFlags::OVER_TEMP;
        let now = FaultFlags::OVER_TEMP | FaultFlags::UNDER_VOLTAGE;
        assert_eq!(now.newly_raised(before), FaultFlags::UNDER_VOLTAGE);
        assert!(before.newly_raised(now).is_empty());

        #[cfg(feature = "std")]
        {
            use std::string::ToString;
            assert_eq!(now.to_string(), "UNDER_VOLTAGE|OVER_TEMP");
            assert_eq!(FaultFlags::empty().to_string(), "none");
        }
    }
}
