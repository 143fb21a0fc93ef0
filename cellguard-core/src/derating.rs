//! Voltage-Based Current Derating
//!
//! ## Overview
//!
//! Near the ends of its voltage window a cell must not carry full current.
//! Each direction has a two-point ramp between a "zero" breakpoint (factor 0)
//! and a "one" breakpoint (factor 1):
//!
//! ```text
//!  factor                          factor
//!   1 │        ┌──────             1 │──────┐
//!     │       /                      │       \
//!   0 │──────┘                     0 │        └──────
//!     └──────┴─┴──── V               └──────┴─┴──── V
//!          zero one                        one zero
//!       discharge                        charge
//! ```
//!
//! - Discharge: `clamp((V - zero) / (one - zero), 0, 1)`, so a depleted cell
//!   is not discharged at full current
//! - Charge: `clamp((zero - V) / (zero - one), 0, 1)`, so a nearly full cell
//!   is not charged at full current
//!
//! ## Cell Limit
//!
//! A cell's allowed current in each direction is the smallest magnitude of:
//!
//! 1. derating base current × voltage factor × temperature factor
//! 2. the static current-vs-voltage table at 25 °C (when dynamic limits
//!    are enabled)
//! 3. the constant operating current
//!
//! The sign convention is re-applied afterwards: charge limits are `≤ 0`,
//! discharge limits `≥ 0`.
//!
//! ## Temperature Hook
//!
//! Temperature derating is disabled for the supported modules. The
//! [`TemperatureDerating`] trait is the seam where it plugs in;
//! [`NoTemperatureDerating`] returns 1.0 for every input.

use libm::fabsf;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    constants::NEUTRAL_TEMPERATURE_FACTOR,
    curve::Curve,
    errors::{BmsError, BmsResult, TableId},
    params::{CurrentTable, DeratingBreakpoints, ParameterSet},
};

/// Current direction a limit or breakpoint applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Current into the pack (negative)
    Charge,
    /// Current out of the pack (positive)
    Discharge,
}

impl core::fmt::Display for Direction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Direction::Charge => "charge",
            Direction::Discharge => "discharge",
        })
    }
}

/// Temperature-dependent derating factor
///
/// Implementations return a factor in `[0, 1]`. `temperature_c` is `None`
/// when the cell's sensor produced no usable value this tick.
pub trait TemperatureDerating {
    /// Derating factor for a cell at the given temperature
    fn factor(&self, temperature_c: Option<f32>, direction: Direction) -> f32;
}

/// Identity temperature derating
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTemperatureDerating;

impl TemperatureDerating for NoTemperatureDerating {
    fn factor(&self, _temperature_c: Option<f32>, _direction: Direction) -> f32 {
        NEUTRAL_TEMPERATURE_FACTOR
    }
}

impl<F> TemperatureDerating for F
where
    F: Fn(Option<f32>, Direction) -> f32,
{
    fn factor(&self, temperature_c: Option<f32>, direction: Direction) -> f32 {
        self(temperature_c, direction)
    }
}

/// Allowed current for one cell
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CellCurrentLimit {
    /// Voltage derating factor while charging, [0, 1]
    pub charge_factor: f32,
    /// Voltage derating factor while discharging, [0, 1]
    pub discharge_factor: f32,
    /// Allowed charge current (A, ≤ 0)
    pub charge_a: f32,
    /// Allowed discharge current (A, ≥ 0)
    pub discharge_a: f32,
}

impl CellCurrentLimit {
    /// No current in either direction
    pub const BLOCKED: Self = Self {
        charge_factor: 0.0,
        discharge_factor: 0.0,
        charge_a: 0.0,
        discharge_a: 0.0,
    };
}

/// Per-cell derating computation
#[derive(Debug, Clone, Copy)]
pub struct DeratingEngine<'p> {
    discharge_ramp: ([f32; 2], [f32; 2]),
    charge_ramp: ([f32; 2], [f32; 2]),
    derating_charge_a: f32,
    derating_discharge_a: f32,
    operate_charge_a: f32,
    operate_discharge_a: f32,
    charge_table: Option<Curve<'p>>,
    discharge_table: Option<Curve<'p>>,
}

fn check_breakpoints(direction: Direction, breakpoints: &DeratingBreakpoints) -> BmsResult<()> {
    let DeratingBreakpoints { zero_v, one_v } = *breakpoints;
    let ordered = match direction {
        Direction::Discharge => zero_v < one_v,
        Direction::Charge => one_v < zero_v,
    };
    if zero_v.is_finite() && one_v.is_finite() && ordered {
        Ok(())
    } else {
        Err(BmsError::InvertedBreakpoints { direction, zero: zero_v, one: one_v })
    }
}

fn table_curve(table: &CurrentTable, id: TableId) -> BmsResult<Curve<'_>> {
    Curve::try_new(&table.voltages, &table.currents, id)
}

impl<'p> DeratingEngine<'p> {
    /// Build the engine, validating breakpoints and current tables
    pub fn new(params: &'p ParameterSet) -> BmsResult<Self> {
        check_breakpoints(Direction::Discharge, &params.discharge_derating)?;
        check_breakpoints(Direction::Charge, &params.charge_derating)?;

        table_curve(&params.charge_current_table, TableId::ChargeCurrentLimit)?;
        table_curve(&params.discharge_current_table, TableId::DischargeCurrentLimit)?;

        Ok(Self::from_validated(params))
    }

    pub(crate) fn from_validated(params: &'p ParameterSet) -> Self {
        let discharge = params.discharge_derating;
        let charge = params.charge_derating;

        let (charge_table, discharge_table) = if params.dynamic_current_limits {
            (
                Some(Curve::from_validated(
                    &params.charge_current_table.voltages,
                    &params.charge_current_table.currents,
                )),
                Some(Curve::from_validated(
                    &params.discharge_current_table.voltages,
                    &params.discharge_current_table.currents,
                )),
            )
        } else {
            (None, None)
        };

        Self {
            discharge_ramp: ([discharge.zero_v, discharge.one_v], [0.0, 1.0]),
            charge_ramp: ([charge.one_v, charge.zero_v], [1.0, 0.0]),
            derating_charge_a: fabsf(params.max_derating_charge_current_a),
            derating_discharge_a: fabsf(params.max_derating_discharge_current_a),
            operate_charge_a: fabsf(params.max_operate_charge_current_a),
            operate_discharge_a: fabsf(params.max_operate_discharge_current_a),
            charge_table,
            discharge_table,
        }
    }

    /// Discharge derating factor: 0 at or below `zero_v`, 1 at or above `one_v`
    pub fn discharge_factor(&self, voltage: f32) -> f32 {
        let (xs, ys) = &self.discharge_ramp;
        Curve::from_validated(xs, ys).evaluate(voltage).value
    }

    /// Charge derating factor: 1 at or below `one_v`, 0 at or above `zero_v`
    pub fn charge_factor(&self, voltage: f32) -> f32 {
        let (xs, ys) = &self.charge_ramp;
        Curve::from_validated(xs, ys).evaluate(voltage).value
    }

    fn ceiling(table: Option<&Curve<'p>>, voltage: f32) -> f32 {
        table.map_or(f32::INFINITY, |curve| fabsf(curve.evaluate(voltage).value))
    }

    /// Allowed current magnitude in one direction
    ///
    /// A NaN temperature factor blocks the direction.
    fn magnitude(base: f32, factor: f32, temperature: f32, ceiling: f32, operate: f32) -> f32 {
        let temperature = if temperature.is_nan() { 0.0 } else { temperature.clamp(0.0, 1.0) };
        (base * factor * temperature).min(ceiling).min(operate).max(0.0)
    }

    /// Allowed charge and discharge current for a cell
    pub fn cell_limit<H: TemperatureDerating>(
        &self,
        voltage: f32,
        temperature_c: Option<f32>,
        hook: &H,
    ) -> CellCurrentLimit {
        if voltage.is_nan() {
            return CellCurrentLimit::BLOCKED;
        }

        let charge_factor = self.charge_factor(voltage);
        let discharge_factor = self.discharge_factor(voltage);

        let charge = Self::magnitude(
            self.derating_charge_a,
            charge_factor,
            hook.factor(temperature_c, Direction::Charge),
            Self::ceiling(self.charge_table.as_ref(), voltage),
            self.operate_charge_a,
        );
        let discharge = Self::magnitude(
            self.derating_discharge_a,
            discharge_factor,
            hook.factor(temperature_c, Direction::Discharge),
            Self::ceiling(self.discharge_table.as_ref(), voltage),
            self.operate_discharge_a,
        );

        CellCurrentLimit {
            charge_factor,
            discharge_factor,
            charge_a: -charge,
            discharge_a: discharge,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(params: &ParameterSet) -> DeratingEngine<'_> {
        DeratingEngine::new(params).unwrap()
    }

    #[test]
    fn discharge_ramp_edges() {
        let params = ParameterSet::lg_e60_8s3p();
        let derating = engine(&params);

        assert_eq!(derating.discharge_factor(3.300), 0.0);
        assert_eq!(derating.discharge_factor(3.425), 0.0);
        assert_eq!(derating.discharge_factor(3.623), 1.0);
        assert_eq!(derating.discharge_factor(4.000), 1.0);

        let mid = derating.discharge_factor((3.425 + 3.623) / 2.0);
        assert!((mid - 0.5).abs() < 1e-3);
    }

    #[test]
    fn charge_ramp_edges() {
        let params = ParameterSet::lg_e60_8s3p();
        let derating = engine(&params);

        assert_eq!(derating.charge_factor(3.700), 1.0);
        assert_eq!(derating.charge_factor(3.949), 1.0);
        assert_eq!(derating.charge_factor(4.123), 0.0);
        assert_eq!(derating.charge_factor(4.216), 0.0);

        let quarter = derating.charge_factor(4.123 - 0.25 * (4.123 - 3.949));
        assert!((quarter - 0.25).abs() < 1e-3);
    }

    #[test]
    fn mid_range_cell_gets_full_current() {
        let params = ParameterSet::lg_e60_8s3p();
        let limit = engine(&params).cell_limit(3.700, Some(25.0), &NoTemperatureDerating);

        // Static tables allow 100A both ways at 3.7V
        assert_eq!(limit.charge_a, -100.0);
        assert_eq!(limit.discharge_a, 100.0);
    }

    #[test]
    fn static_table_caps_derated_current() {
        let params = ParameterSet::lg_e60_8s3p();
        let derating = engine(&params);

        // Charge factor is 1 at the bottom of the window but the table allows 60A
        let limit = derating.cell_limit(3.261, None, &NoTemperatureDerating);
        assert_eq!(limit.charge_factor, 1.0);
        assert_eq!(limit.charge_a, -60.0);
        assert_eq!(limit.discharge_a, 0.0);
    }

    #[test]
    fn disabling_dynamic_limits_removes_table_ceiling() {
        let params = ParameterSet::lg_e60_8s3p().with_dynamic_current_limits(false);
        let limit = engine(&params).cell_limit(3.261, None, &NoTemperatureDerating);
        assert_eq!(limit.charge_a, -100.0);
    }

    #[test]
    fn temperature_hook_scales_limits() {
        let params = ParameterSet::lg_e60_8s3p();
        let half_when_cold = |t: Option<f32>, _d: Direction| -> f32 {
            match t {
                Some(t) if t < 10.0 => 0.5,
                _ => 1.0,
            }
        };

        let limit = engine(&params).cell_limit(3.700, Some(5.0), &half_when_cold);
        assert_eq!(limit.charge_a, -50.0);
        assert_eq!(limit.discharge_a, 50.0);
    }

    #[test]
    fn nan_temperature_factor_blocks_current() {
        let params = ParameterSet::lg_e60_8s3p();
        let derating = engine(&params);
        let broken = |_: Option<f32>, _: Direction| -> f32 { f32::NAN };

        // Fully charged: the voltage ramp alone already forbids charging
        let limit = derating.cell_limit(4.216, Some(25.0), &broken);
        assert_eq!(limit.charge_factor, 0.0);
        assert_eq!(limit.charge_a, 0.0);

        let limit = derating.cell_limit(3.700, Some(25.0), &broken);
        assert_eq!(limit.charge_a, 0.0);
        assert_eq!(limit.discharge_a, 0.0);

        let unbounded = |_: Option<f32>, _: Direction| -> f32 { f32::INFINITY };
        let limit = derating.cell_limit(3.700, Some(25.0), &unbounded);
        assert_eq!(limit.discharge_a, 100.0);
    }

    #[test]
    fn nan_voltage_blocks_both_directions() {
        let params = ParameterSet::lg_e60_8s3p();
        let limit = engine(&params).cell_limit(f32::NAN, Some(25.0), &NoTemperatureDerating);
        assert_eq!(limit, CellCurrentLimit::BLOCKED);
    }

    #[test]
    fn rejects_inverted_breakpoints() {
        let mut params = ParameterSet::lg_e60_8s3p();
        params.discharge_derating = DeratingBreakpoints { zero_v: 3.7, one_v: 3.4 };
        assert!(matches!(
            DeratingEngine::new(&params),
            Err(BmsError::InvertedBreakpoints { direction: Direction::Discharge, .. })
        ));

        let mut params = ParameterSet::lg_e60_8s3p();
        params.charge_derating = DeratingBreakpoints { zero_v: 3.9, one_v: 4.1 };
        assert!(matches!(
            DeratingEngine::new(&params),
            Err(BmsError::InvertedBreakpoints { direction: Direction::Charge, .. })
        ));
    }
}
