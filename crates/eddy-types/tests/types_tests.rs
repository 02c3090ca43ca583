//! Integration tests for eddy-types.

use eddy_types::constants::{DEFAULT_RELAX_ITERATIONS, MAX_RESOLUTION};
use eddy_types::{BoundaryType, EddyError, GridSize};

// ─── GridSize Tests ───────────────────────────────────────────

#[test]
fn grid_size_layout() {
    let grid = GridSize::new(4).unwrap();
    assert_eq!(grid.n(), 4);
    assert_eq!(grid.stride(), 6);
    assert_eq!(grid.cell_count(), 36);
    assert_eq!(grid.index(0, 0), 0);
    assert_eq!(grid.index(1, 1), 7);
    assert_eq!(grid.index(5, 5), 35);
    assert!((grid.spacing() - 0.25).abs() < 1e-7);
}

#[test]
fn grid_size_rejects_zero() {
    assert!(matches!(GridSize::new(0), Err(EddyError::InvalidGrid(_))));
}

#[test]
fn grid_size_rejects_negative() {
    assert!(GridSize::try_from(-3i32).is_err());
    assert_eq!(GridSize::try_from(8i32).unwrap().n(), 8);
}

#[test]
fn grid_size_caps_resolution() {
    let largest = GridSize::new(MAX_RESOLUTION).unwrap();
    let stride = MAX_RESOLUTION as usize + 2;
    assert_eq!(largest.cell_count(), stride * stride);

    assert!(matches!(
        GridSize::new(MAX_RESOLUTION + 1),
        Err(EddyError::InvalidGrid(_))
    ));
    assert!(matches!(
        GridSize::new(u32::MAX),
        Err(EddyError::InvalidGrid(_))
    ));
    assert!(GridSize::try_from(i32::MAX).is_err());
    assert!(serde_json::from_str::<GridSize>("4294967295").is_err());
}

#[test]
fn grid_size_check_len() {
    let grid = GridSize::new(2).unwrap();
    assert!(grid.check_len(16, "field").is_ok());
    assert!(grid.check_len(15, "field").is_err());
}

#[test]
fn grid_size_serde_rejects_zero() {
    let ok: GridSize = serde_json::from_str("16").unwrap();
    assert_eq!(ok.n(), 16);
    assert!(serde_json::from_str::<GridSize>("0").is_err());
}

// ─── BoundaryType Tests ───────────────────────────────────────

#[test]
fn boundary_tags_round_trip() {
    for &b in BoundaryType::all() {
        assert_eq!(BoundaryType::try_from(b.tag()).unwrap(), b);
    }
}

#[test]
fn boundary_invalid_tag() {
    assert!(matches!(
        BoundaryType::try_from(3),
        Err(EddyError::InvalidBoundary(3))
    ));
}

#[test]
fn boundary_wall_rules() {
    assert!(!BoundaryType::Scalar.negates_x_walls());
    assert!(!BoundaryType::Scalar.negates_y_walls());
    assert!(BoundaryType::VelocityX.negates_x_walls());
    assert!(!BoundaryType::VelocityX.negates_y_walls());
    assert!(BoundaryType::VelocityY.negates_y_walls());
    assert!(!BoundaryType::VelocityY.negates_x_walls());
}

// ─── Error Tests ──────────────────────────────────────────────

#[test]
fn error_display() {
    let e = EddyError::InvalidConfig("dt must be positive".into());
    assert_eq!(e.to_string(), "Invalid configuration: dt must be positive");

    let e = EddyError::InvalidBoundary(7);
    assert!(e.to_string().contains('7'));
}

#[test]
fn default_sweep_count() {
    assert_eq!(DEFAULT_RELAX_ITERATIONS, 20);
}
