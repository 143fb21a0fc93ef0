//! NTC Thermistor Conversion
//!
//! The module's temperature sensors are NTC thermistors on the low side of a
//! divider against a fixed bridge resistor:
//!
//! ```text
//!   V_ref ──[ R_bridge ]──┬──[ R_ntc ]── GND
//!                         │
//!                       V_ntc      ratio = V_ntc / V_ref
//! ```
//!
//! Resistance follows the beta model
//! `1/T = 1/T_ref + ln(R / R_ref) / β` with temperatures in kelvin.
//! Acquisition code converts readings with [`NtcParams`] before handing
//! degrees Celsius to the engine.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::{BmsError, BmsResult};

const KELVIN_OFFSET: f32 = 273.15;

/// Beta-model thermistor and divider characteristics
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NtcParams {
    /// Beta value (K)
    pub beta: f32,
    /// Resistance at the reference temperature (Ω)
    pub r_reference_ohm: f32,
    /// Reference temperature (°C)
    pub t_reference_c: f32,
    /// Divider bridge resistor (Ω)
    pub r_bridge_ohm: f32,
}

impl Default for NtcParams {
    fn default() -> Self {
        Self {
            beta: 3435.0,
            r_reference_ohm: 10_000.0,
            t_reference_c: 25.0,
            r_bridge_ohm: 10_000.0,
        }
    }
}

impl NtcParams {
    pub(crate) fn validate(&self) -> BmsResult<()> {
        let positive = [self.beta, self.r_reference_ohm, self.r_bridge_ohm]
            .iter()
            .all(|v| v.is_finite() && *v > 0.0);
        if !positive || !(self.t_reference_c + KELVIN_OFFSET > 0.0) {
            return Err(BmsError::InvalidParameter {
                name: "thermistor",
                reason: "beta and resistances must be positive",
            });
        }
        Ok(())
    }

    /// Temperature (°C) for a thermistor resistance
    ///
    /// Returns NaN for non-positive or non-finite resistances, which the
    /// engine treats as a missing sensor.
    pub fn temperature_from_resistance(&self, r_ntc_ohm: f32) -> f32 {
        if !(r_ntc_ohm.is_finite() && r_ntc_ohm > 0.0) {
            return f32::NAN;
        }
        let t_ref_k = self.t_reference_c + KELVIN_OFFSET;
        let inv_t = 1.0 / t_ref_k + libm::logf(r_ntc_ohm / self.r_reference_ohm) / self.beta;
        1.0 / inv_t - KELVIN_OFFSET
    }

    /// Thermistor resistance (Ω) for a divider ratio `V_ntc / V_ref`
    pub fn resistance_from_ratio(&self, ratio: f32) -> f32 {
        if !(ratio > 0.0 && ratio < 1.0) {
            return f32::NAN;
        }
        self.r_bridge_ohm * ratio / (1.0 - ratio)
    }

    /// Temperature (°C) for a divider ratio `V_ntc / V_ref`
    pub fn temperature_from_ratio(&self, ratio: f32) -> f32 {
        self.temperature_from_resistance(self.resistance_from_ratio(ratio))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_resistance_reads_reference_temperature() {
        let ntc = NtcParams::default();
        assert!((ntc.temperature_from_resistance(10_000.0) - 25.0).abs() < 1e-3);
        // Equal divider halves mean R_ntc == R_bridge
        assert!((ntc.temperature_from_ratio(0.5) - 25.0).abs() < 1e-3);
    }

    #[test]
    fn lower_resistance_is_warmer() {
        let ntc = NtcParams::default();
        let warm = ntc.temperature_from_resistance(5_000.0);
        let cold = ntc.temperature_from_resistance(20_000.0);
        assert!(warm > 25.0 && cold < 25.0);
        // β = 3435 puts half the reference resistance near 44 °C
        assert!((warm - 44.1).abs() < 0.2, "got {}", warm);
    }

    #[test]
    fn degenerate_inputs_read_as_missing() {
        let ntc = NtcParams::default();
        assert!(ntc.temperature_from_ratio(0.0).is_nan());
        assert!(ntc.temperature_from_ratio(1.0).is_nan());
        assert!(ntc.temperature_from_resistance(-1.0).is_nan());
    }

    #[test]
    fn rejects_non_positive_beta() {
        let ntc = NtcParams { beta: 0.0, ..NtcParams::default() };
        assert!(ntc.validate().is_err());
        assert!(NtcParams::default().validate().is_ok());
    }
}
