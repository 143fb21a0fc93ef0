//! Single Pack Tick Example
//!
//! Runs the engine over a short charge session on the LG E60 module and
//! prints what the power stage would receive each tick.
//!
//! ## What You'll Learn
//!
//! - Loading the preset parameter set
//! - Feeding one `PackSample` per control-loop tick
//! - Reading current limits, SOC and fault flags from the report
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 01_pack_tick
//! ```

use cellguard_core::{BmsError, PackEngine, PackSample, ParameterSet};

fn main() -> Result<(), BmsError> {
    println!("CellGuard Pack Tick Example");
    println!("===========================\n");

    let params = ParameterSet::lg_e60_8s3p();
    println!("Module: {} ({}s{}p, {} Ah)", params.name, params.cell_count, params.parallel_cells, params.capacity_ah);
    println!(
        "Charge derating ramp: 1.0 at {} V -> 0.0 at {} V\n",
        params.charge_derating.one_v, params.charge_derating.zero_v
    );

    let mut engine = PackEngine::new(&params)?;

    // Cells rising towards full while charging at 60 A
    for step in 0..8 {
        let voltage = 3.90 + step as f32 * 0.045;
        let sample = PackSample::uniform(params.cell_count, voltage, params.temp_sensor_count, 28.0, -60.0);
        let report = engine.tick(&sample);

        println!(
            "V={:.3} V  SOC={:5.1}%  remaining={:6.1} Ah  charge={:7.2} A  discharge={:6.2} A  faults={}",
            voltage,
            report.pack_soc_percent,
            report.remaining_capacity_ah,
            report.command.charge_limit_a,
            report.command.discharge_limit_a,
            report.command.faults,
        );
    }

    // A broken voltage channel is flagged, and it blocks the pack
    let sample = PackSample::uniform(16, 3.8, 2, 28.0, -60.0).with_cell(3, f32::NAN);
    let report = engine.tick(&sample);
    println!("\nCell 3 disconnected: charge={} A, faults={}", report.command.charge_limit_a, report.command.faults);

    Ok(())
}
