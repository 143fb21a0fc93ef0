//! Parameter set validation and serialization
//!
//! A malformed parameter set must be rejected before the first tick; the
//! engine never starts on a table it would misinterpolate.

#![cfg(test)]

mod common;

use cellguard_core::{
    errors::TableId,
    params::{CurrentTable, DeratingBreakpoints},
    BmsError, Direction, PackEngine,
};

use common::lg_params;

#[test]
fn test_preset_starts() {
    let params = lg_params();
    assert!(params.validate().is_ok());

    let engine = PackEngine::new(&params).unwrap();
    assert_eq!(engine.balancing_snapshot().bitmap(), 0);
    assert_eq!(engine.params().cell_count, 16);
}

#[test]
fn test_rejects_non_monotonic_ocv_table() {
    let mut params = lg_params();
    params.ocv_discharge[500] = 3.0;

    let err = PackEngine::new(&params).err().unwrap();
    assert_eq!(err, BmsError::NonMonotonicTable { table: TableId::OcvDischarge, index: 500 });
    assert!(err.is_config_error());
}

#[test]
fn test_rejects_short_ocv_table() {
    let params = lg_params().with_ocv_tables(&[3.7], &[3.0, 4.2]).unwrap();
    assert!(matches!(
        params.validate(),
        Err(BmsError::TableTooShort { table: TableId::OcvCharge, len: 1, .. })
    ));
}

#[test]
fn test_rejects_inverted_breakpoints() {
    let mut params = lg_params();
    params.discharge_derating = DeratingBreakpoints { zero_v: 3.623, one_v: 3.425 };

    assert!(matches!(
        PackEngine::new(&params),
        Err(BmsError::InvertedBreakpoints { direction: Direction::Discharge, .. })
    ));
}

#[test]
fn test_rejects_mismatched_current_table() {
    let mut params = lg_params();
    params.discharge_current_table = CurrentTable::from_columns(&[3.3, 3.6, 4.2], &[60.0, 100.0]).unwrap();

    assert!(matches!(
        params.validate(),
        Err(BmsError::TableLengthMismatch { table: TableId::DischargeCurrentLimit, x_len: 3, y_len: 2 })
    ));
}

#[test]
fn test_rejects_bad_balancing_band() {
    let params = lg_params().with_balancing(0.050, 0.0);
    assert!(matches!(params.validate(), Err(BmsError::InvalidParameter { .. })));

    let params = lg_params().with_balancing(0.050, 0.060);
    assert!(PackEngine::new(&params).is_err());
}

#[test]
fn test_rejects_cell_count_outside_capacity() {
    let params = lg_params().with_cell_count(0);
    assert!(matches!(params.validate(), Err(BmsError::CountOutOfRange { count: 0, .. })));

    let params = lg_params().with_cell_count(33);
    assert!(matches!(params.validate(), Err(BmsError::CountOutOfRange { max: 32, .. })));
}

#[test]
fn test_rejects_offsets_for_wrong_cell_count() {
    let params = lg_params().with_measurement_offsets(&[0.0; 8]).unwrap();
    assert!(matches!(
        params.validate(),
        Err(BmsError::TableLengthMismatch { table: TableId::MeasurementOffsets, .. })
    ));
}

#[test]
fn test_rejects_non_finite_scalars() {
    let mut params = lg_params();
    params.capacity_ah = f32::NAN;
    assert!(matches!(
        params.validate(),
        Err(BmsError::InvalidParameter { name: "capacity_ah", .. })
    ));
}

#[cfg(feature = "serde")]
#[test]
fn test_json_round_trip() {
    let params = lg_params()
        .with_measurement_offsets(&cellguard_core::ParameterSet::ADBMS1818_E60_OFFSETS)
        .unwrap();

    let json = serde_json::to_string(&params).unwrap();
    let restored: cellguard_core::ParameterSet = serde_json::from_str(&json).unwrap();

    assert_eq!(restored, params);
    assert!(restored.validate().is_ok());
}
