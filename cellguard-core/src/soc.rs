//! State-of-Charge Estimation
//!
//! SOC is read off the OCV table by inverse lookup (voltage → SOC). Cells
//! show electrochemical hysteresis: at the same SOC the relaxed voltage after
//! charging sits above the voltage after discharging. Reading a charging cell
//! against the discharge curve biases SOC by several percent, so the curve is
//! picked by the direction of the pack current:
//!
//! ```text
//!   current < -rest      → charge curve
//!   current >= -rest     → discharge curve (rest included)
//! ```
//!
//! At rest the discharge curve is used. The two curves are never blended.

use crate::{
    curve::OcvCurve,
    errors::{BmsResult, TableId},
    params::ParameterSet,
};

/// Direction of the net pack current
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CurrentDirection {
    /// Current below `-rest_current_a` (charging is negative)
    Charging,
    /// Current above `rest_current_a`
    Discharging,
    /// Current magnitude within the rest band, or not a number
    Rest,
}

impl CurrentDirection {
    /// Classify a net pack current
    pub fn from_current(current_a: f32, rest_current_a: f32) -> Self {
        if current_a < -rest_current_a {
            CurrentDirection::Charging
        } else if current_a > rest_current_a {
            CurrentDirection::Discharging
        } else {
            CurrentDirection::Rest
        }
    }

    /// True while charging
    pub const fn is_charging(&self) -> bool {
        matches!(self, CurrentDirection::Charging)
    }
}

/// SOC of one cell
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SocEstimate {
    /// State of charge in [0, 100] %
    pub soc_percent: f32,
    /// Whether the voltage fell outside the OCV table
    pub clamped: bool,
}

/// Maps cell voltage to SOC using the direction-matched OCV curve
#[derive(Debug, Clone, Copy)]
pub struct SocEstimator<'p> {
    charge: OcvCurve<'p>,
    discharge: OcvCurve<'p>,
    rest_current_a: f32,
}

impl<'p> SocEstimator<'p> {
    /// Build the estimator, validating both OCV tables
    pub fn new(params: &'p ParameterSet) -> BmsResult<Self> {
        Ok(Self {
            charge: OcvCurve::try_new(&params.ocv_charge, TableId::OcvCharge)?,
            discharge: OcvCurve::try_new(&params.ocv_discharge, TableId::OcvDischarge)?,
            rest_current_a: params.rest_current_a,
        })
    }

    pub(crate) fn from_validated(params: &'p ParameterSet) -> Self {
        Self {
            charge: OcvCurve::from_validated(&params.ocv_charge),
            discharge: OcvCurve::from_validated(&params.ocv_discharge),
            rest_current_a: params.rest_current_a,
        }
    }

    /// Classify the pack current with this estimator's rest band
    pub fn direction(&self, current_a: f32) -> CurrentDirection {
        CurrentDirection::from_current(current_a, self.rest_current_a)
    }

    /// OCV curve for a current direction
    pub fn curve(&self, direction: CurrentDirection) -> &OcvCurve<'p> {
        match direction {
            CurrentDirection::Charging => &self.charge,
            CurrentDirection::Discharging | CurrentDirection::Rest => &self.discharge,
        }
    }

    /// SOC for a cell voltage under the given current direction
    pub fn estimate(&self, voltage: f32, direction: CurrentDirection) -> SocEstimate {
        let lookup = self.curve(direction).soc_at(voltage);
        SocEstimate { soc_percent: lookup.value, clamped: lookup.was_clamped() }
    }
}
