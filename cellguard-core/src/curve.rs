//! Monotone Piecewise-Linear Curves
//!
//! ## Overview
//!
//! Every table the engine consults is a piecewise-linear curve: OCV tables,
//! derating ramps and the static current ceilings. This module provides the
//! two lookups they need:
//!
//! - [`Curve`]: forward lookup over explicit `(x, y)` pairs, `x` non-decreasing
//! - [`OcvCurve`]: inverse lookup over an implicitly indexed table, voltage →
//!   index, where the index is SOC in equal steps (`index / 10` = SOC % for
//!   the 1001-point tables)
//!
//! ## Edge Policy
//!
//! Queries outside the table never extrapolate. A query below the first
//! breakpoint returns the first value, above the last returns the last value,
//! and the result records which side was clamped:
//!
//! ```text
//!   y
//!   │            ┌──────── clamp: Above
//!   │       ____/
//!   │  ____/
//!   │─/            clamp: Below
//!   └────────────────── x
//! ```
//!
//! A sensor reading from an out-of-calibration cell therefore produces the
//! nearest table value rather than a wild extrapolation.
//!
//! ## Inverse Lookup
//!
//! OCV tables are built monotone in voltage, so voltage → index is a binary
//! search over the values (`O(log n)`, 10 comparisons for 1001 points).
//! Voltages that match a run of equal entries within [`OCV_MATCH_TOLERANCE_V`]
//! resolve to the lowest index of the run, which is the conservative SOC.

use crate::constants::OCV_MATCH_TOLERANCE_V;
use crate::errors::{BmsError, BmsResult, TableId};

/// Which side of the table a query was clamped to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Clamp {
    /// Query was inside the table
    None,
    /// Query was below the first breakpoint (or not a number)
    Below,
    /// Query was above the last breakpoint
    Above,
}

/// Result of a curve lookup
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Interpolated {
    /// Interpolated (or clamped) value
    pub value: f32,
    /// Whether the query had to be clamped to the table range
    pub clamp: Clamp,
}

impl Interpolated {
    const fn exact(value: f32) -> Self {
        Self { value, clamp: Clamp::None }
    }

    /// True if the query fell outside the table
    pub const fn was_clamped(&self) -> bool {
        !matches!(self.clamp, Clamp::None)
    }
}

/// Check that `values` is finite and non-decreasing
pub fn check_monotone(values: &[f32], table: TableId) -> BmsResult<()> {
    let mut previous = f32::NEG_INFINITY;
    for (index, &value) in values.iter().enumerate() {
        if !value.is_finite() || value < previous {
            return Err(BmsError::NonMonotonicTable { table, index });
        }
        previous = value;
    }
    Ok(())
}

fn check_finite(values: &[f32], table: TableId) -> BmsResult<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(BmsError::NonMonotonicTable { table, index }),
        None => Ok(()),
    }
}

/// Forward piecewise-linear curve over `(x, y)` pairs
///
/// Breakpoints are borrowed from the parameter set, so a curve is a pair of
/// slices and costs nothing to construct.
#[derive(Debug, Clone, Copy)]
pub struct Curve<'a> {
    xs: &'a [f32],
    ys: &'a [f32],
}

impl<'a> Curve<'a> {
    /// Build a curve, rejecting tables that cannot be interpolated
    pub fn try_new(xs: &'a [f32], ys: &'a [f32], table: TableId) -> BmsResult<Self> {
        if xs.len() != ys.len() {
            return Err(BmsError::TableLengthMismatch {
                table,
                x_len: xs.len(),
                y_len: ys.len(),
            });
        }
        if xs.len() < 2 {
            return Err(BmsError::TableTooShort { table, len: xs.len(), min: 2 });
        }
        check_monotone(xs, table)?;
        check_finite(ys, table)?;
        Ok(Self { xs, ys })
    }

    /// Wrap slices already checked by [`Curve::try_new`]
    pub(crate) const fn from_validated(xs: &'a [f32], ys: &'a [f32]) -> Self {
        Self { xs, ys }
    }

    /// Evaluate the curve at `x`, clamping outside the breakpoints
    pub fn evaluate(&self, x: f32) -> Interpolated {
        let (Some(&first_x), Some(&last_x)) = (self.xs.first(), self.xs.last()) else {
            return Interpolated { value: 0.0, clamp: Clamp::Below };
        };
        let first_y = self.ys[0];
        let last_y = self.ys[self.ys.len() - 1];

        if x.is_nan() || x < first_x {
            return Interpolated { value: first_y, clamp: Clamp::Below };
        }
        if x > last_x {
            return Interpolated { value: last_y, clamp: Clamp::Above };
        }
        if x == last_x {
            return Interpolated::exact(last_y);
        }

        // First breakpoint strictly above x; x < last_x keeps it in range
        let upper = self.xs.partition_point(|&xi| xi <= x);
        let lower = upper - 1;
        let (x0, x1) = (self.xs[lower], self.xs[upper]);
        let (y0, y1) = (self.ys[lower], self.ys[upper]);

        let frac = (x - x0) / (x1 - x0);
        Interpolated::exact(y0 + (y1 - y0) * frac)
    }
}

/// Open-circuit-voltage table indexed by SOC in equal steps
///
/// Entry `i` of an `n`-point table is the OCV at `i * 100 / (n - 1)` % SOC.
#[derive(Debug, Clone, Copy)]
pub struct OcvCurve<'a> {
    voltages: &'a [f32],
}

impl<'a> OcvCurve<'a> {
    /// Build an OCV curve, rejecting short or non-monotone tables
    pub fn try_new(voltages: &'a [f32], table: TableId) -> BmsResult<Self> {
        if voltages.len() < 2 {
            return Err(BmsError::TableTooShort { table, len: voltages.len(), min: 2 });
        }
        check_monotone(voltages, table)?;
        Ok(Self { voltages })
    }

    pub(crate) const fn from_validated(voltages: &'a [f32]) -> Self {
        Self { voltages }
    }

    /// SOC percentage per table step
    fn step_percent(&self) -> f32 {
        100.0 / (self.voltages.len() - 1) as f32
    }

    /// Voltage at the given SOC (forward direction)
    pub fn voltage_at(&self, soc_percent: f32) -> Interpolated {
        let last = self.voltages.len() - 1;
        if soc_percent.is_nan() || soc_percent < 0.0 {
            return Interpolated { value: self.voltages[0], clamp: Clamp::Below };
        }
        if soc_percent > 100.0 {
            return Interpolated { value: self.voltages[last], clamp: Clamp::Above };
        }

        let position = soc_percent / self.step_percent();
        let lower = (position as usize).min(last);
        if lower == last {
            return Interpolated::exact(self.voltages[last]);
        }
        let frac = position - lower as f32;
        let (v0, v1) = (self.voltages[lower], self.voltages[lower + 1]);
        Interpolated::exact(v0 + (v1 - v0) * frac)
    }

    /// SOC percentage for the given voltage (inverse direction)
    ///
    /// Binary search over the voltages. A voltage within the match tolerance
    /// of a table entry resolves to the lowest index holding that entry.
    pub fn soc_at(&self, voltage: f32) -> Interpolated {
        let last = self.voltages.len() - 1;
        let first_v = self.voltages[0];
        let last_v = self.voltages[last];

        if voltage.is_nan() || voltage < first_v {
            return Interpolated { value: 0.0, clamp: Clamp::Below };
        }
        if voltage > last_v {
            return Interpolated { value: 100.0, clamp: Clamp::Above };
        }

        // Lowest index whose entry is not below the tolerance band
        let candidate = self
            .voltages
            .partition_point(|&v| v < voltage - OCV_MATCH_TOLERANCE_V)
            .min(last);

        let index = if self.voltages[candidate] <= voltage + OCV_MATCH_TOLERANCE_V || candidate == 0 {
            candidate as f32
        } else {
            // voltages[candidate - 1] < voltage < voltages[candidate]
            let (v0, v1) = (self.voltages[candidate - 1], self.voltages[candidate]);
            (candidate - 1) as f32 + (voltage - v0) / (v1 - v0)
        };

        Interpolated::exact((index * self.step_percent()).clamp(0.0, 100.0))
    }
}
