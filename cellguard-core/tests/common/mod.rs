//! Common test utilities for integration tests
//!
//! This module provides:
//! - Pack scenarios built on the LG E60 preset
//! - A deterministic noise source for hysteresis tests
//! - Assertion helpers for floating-point results

#![allow(dead_code)]

use cellguard_core::{PackSample, ParameterSet};

/// Cells in the LG E60 preset
pub const CELLS: usize = 16;
/// Temperature sensors in the LG E60 preset
pub const SENSORS: usize = 2;

/// Assert that two floats are within a tolerance of each other
#[macro_export]
macro_rules! assert_within_tolerance {
    ($actual:expr, $expected:expr, $tolerance:expr) => {
        let diff = ($actual - $expected).abs();
        if diff > $tolerance {
            panic!(
                "Value {} not within tolerance {} of expected {} (diff: {})",
                $actual, $tolerance, $expected, diff
            );
        }
    };
}

/// Preset parameter set used by most tests
pub fn lg_params() -> ParameterSet {
    ParameterSet::lg_e60_8s3p()
}

/// Builder for one tick's sample
#[derive(Debug, Clone)]
pub struct Scenario {
    cells: [f32; CELLS],
    temperatures: [f32; SENSORS],
    current_a: f32,
}

impl Scenario {
    /// All cells at `voltage`, 25 °C, no current
    pub fn uniform(voltage: f32) -> Self {
        Self {
            cells: [voltage; CELLS],
            temperatures: [25.0; SENSORS],
            current_a: 0.0,
        }
    }

    /// Pack current, charging negative
    pub fn current(mut self, current_a: f32) -> Self {
        self.current_a = current_a;
        self
    }

    /// Charging at `amps` (positive magnitude)
    pub fn charging(self, amps: f32) -> Self {
        self.current(-amps)
    }

    /// Discharging at `amps`
    pub fn discharging(self, amps: f32) -> Self {
        self.current(amps)
    }

    /// Override one cell
    pub fn cell(mut self, index: usize, voltage: f32) -> Self {
        self.cells[index] = voltage;
        self
    }

    /// Override one temperature sensor
    pub fn sensor(mut self, index: usize, temperature: f32) -> Self {
        self.temperatures[index] = temperature;
        self
    }

    /// Add uniform noise in `[-amplitude, amplitude]` to every cell
    pub fn noisy(mut self, rng: &mut TestRng, amplitude: f32) -> Self {
        for v in self.cells.iter_mut() {
            *v += rng.gen_range(-amplitude, amplitude);
        }
        self
    }

    /// Build the sample
    pub fn sample(&self) -> PackSample {
        PackSample::new(&self.cells, &self.temperatures, self.current_a)
            .expect("scenario fits the fixed capacities")
    }
}

/// Xorshift generator, deterministic across runs
pub struct TestRng {
    state: u32,
}

impl TestRng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 17;
        self.state ^= self.state << 5;
        self.state
    }

    pub fn next_f32(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 / 16777216.0
    }

    pub fn gen_range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }
}
