//! Balancing Hysteresis Example
//!
//! Shows how a cell enters and leaves balancing, and why it does not chatter
//! while its voltage difference sits inside the hysteresis band.
//!
//! ## Thresholds (LG E60 preset)
//!
//! - Start: delta to the lowest cell above 50 mV, cell at or above 3.620 V
//! - Stop: delta at or below 25 mV
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 02_balancing_hysteresis
//! ```

use cellguard_core::{BmsError, PackEngine, PackSample, ParameterSet};

fn main() -> Result<(), BmsError> {
    println!("CellGuard Balancing Hysteresis Example");
    println!("======================================\n");

    let params = ParameterSet::lg_e60_8s3p();
    let mut engine = PackEngine::new(&params)?;

    // Cell 7 drifts up, then slowly back down towards the pack
    let deltas_mv = [0, 30, 45, 55, 48, 40, 32, 26, 24, 10, 0];

    for delta_mv in deltas_mv {
        let high = 3.700 + delta_mv as f32 / 1000.0;
        let sample = PackSample::uniform(16, 3.700, 2, 25.0, 0.0).with_cell(7, high);
        let report = engine.tick(&sample);

        println!(
            "delta={:>3} mV  cell 7: {:?}  bitmap={:#06x}",
            delta_mv, report.cells[7].balancing, report.command.balancing_bitmap
        );
    }

    let snapshot = engine.balancing_snapshot();
    println!("\nCells balancing after the run: {}", snapshot.active_count());

    Ok(())
}
