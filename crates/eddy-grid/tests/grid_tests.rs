//! Integration tests for eddy-grid.

use eddy_grid::diagnostics::{divergence, kinetic_energy, max_abs_divergence, total_mass};
use eddy_grid::generators::{fill_rect, gaussian_blob, solid_body_vortex};
use eddy_grid::{enforce_boundary, Field};
use eddy_types::{BoundaryType, GridSize};

fn grid(n: u32) -> GridSize {
    GridSize::new(n).unwrap()
}

/// Interior filled with distinct values so every edge rule is observable.
fn ramp(grid: GridSize) -> Field {
    let mut f = Field::zeros(grid);
    let n = grid.n();
    for j in 1..=n {
        for i in 1..=n {
            f.set(i, j, (i * 10 + j) as f32);
        }
    }
    f
}

// ─── Field Tests ──────────────────────────────────────────────

#[test]
fn field_zeros() {
    let f = Field::zeros(grid(4));
    assert_eq!(f.len(), 36);
    assert!(f.as_slice().iter().all(|&x| x == 0.0));
}

#[test]
fn field_from_data_checks_len() {
    assert!(Field::from_data(grid(2), vec![0.0; 16]).is_ok());
    assert!(Field::from_data(grid(2), vec![0.0; 17]).is_err());
}

#[test]
fn field_get_set_add() {
    let mut f = Field::zeros(grid(3));
    f.set(2, 1, 1.5);
    f.add(2, 1, 0.5);
    assert_eq!(f.get(2, 1), 2.0);
    assert_eq!(f.as_slice()[2 + 5], 2.0);
}

#[test]
fn field_add_scaled() {
    let g = grid(2);
    let mut x = Field::filled(g, 1.0);
    let s = Field::filled(g, 4.0);
    x.add_scaled(&s, 0.25).unwrap();
    assert!(x.as_slice().iter().all(|&v| (v - 2.0).abs() < 1e-7));
}

#[test]
fn field_grid_mismatch() {
    let mut a = Field::zeros(grid(2));
    let b = Field::zeros(grid(3));
    assert!(a.copy_from(&b).is_err());
    assert!(a.add_scaled(&b, 1.0).is_err());
}

#[test]
fn field_interior_iteration() {
    let f = Field::filled(grid(3), 1.0);
    assert_eq!(f.interior().count(), 9);
    assert!((f.interior_sum() - 9.0).abs() < 1e-12);
}

// ─── Boundary Enforcer Tests ──────────────────────────────────

#[test]
fn scalar_edges_copy_interior() {
    let g = grid(4);
    let mut f = ramp(g);
    f.enforce_boundary(BoundaryType::Scalar).unwrap();
    for k in 1..=4 {
        assert_eq!(f.get(0, k), f.get(1, k));
        assert_eq!(f.get(5, k), f.get(4, k));
        assert_eq!(f.get(k, 0), f.get(k, 1));
        assert_eq!(f.get(k, 5), f.get(k, 4));
    }
}

#[test]
fn velocity_x_negates_side_walls() {
    let g = grid(4);
    let mut f = ramp(g);
    f.enforce_boundary(BoundaryType::VelocityX).unwrap();
    for k in 1..=4 {
        assert_eq!(f.get(0, k), -f.get(1, k));
        assert_eq!(f.get(5, k), -f.get(4, k));
        assert_eq!(f.get(k, 0), f.get(k, 1));
        assert_eq!(f.get(k, 5), f.get(k, 4));
    }
}

#[test]
fn velocity_y_negates_floor_and_ceiling() {
    let g = grid(4);
    let mut f = ramp(g);
    f.enforce_boundary(BoundaryType::VelocityY).unwrap();
    for k in 1..=4 {
        assert_eq!(f.get(0, k), f.get(1, k));
        assert_eq!(f.get(5, k), f.get(4, k));
        assert_eq!(f.get(k, 0), -f.get(k, 1));
        assert_eq!(f.get(k, 5), -f.get(k, 4));
    }
}

#[test]
fn corners_average_adjacent_edges() {
    let g = grid(4);
    for &b in BoundaryType::all() {
        let mut f = ramp(g);
        f.enforce_boundary(b).unwrap();
        assert_eq!(f.get(0, 0), 0.5 * (f.get(1, 0) + f.get(0, 1)), "{b:?}");
        assert_eq!(f.get(0, 5), 0.5 * (f.get(1, 5) + f.get(0, 4)), "{b:?}");
        assert_eq!(f.get(5, 0), 0.5 * (f.get(4, 0) + f.get(5, 1)), "{b:?}");
        assert_eq!(f.get(5, 5), 0.5 * (f.get(4, 5) + f.get(5, 4)), "{b:?}");
    }
}

#[test]
fn boundary_is_idempotent() {
    let g = grid(5);
    for &b in BoundaryType::all() {
        let mut once = ramp(g);
        once.enforce_boundary(b).unwrap();
        let mut twice = once.clone();
        twice.enforce_boundary(b).unwrap();
        assert_eq!(once, twice, "{b:?}");
    }
}

#[test]
fn boundary_rejects_wrong_length() {
    let mut data = vec![0.0; 10];
    assert!(enforce_boundary(grid(2), BoundaryType::Scalar, &mut data).is_err());
}

#[test]
fn boundary_leaves_interior_untouched() {
    let g = grid(3);
    let before = ramp(g);
    let mut after = before.clone();
    after.enforce_boundary(BoundaryType::VelocityY).unwrap();
    for (i, j) in before.interior() {
        assert_eq!(before.get(i, j), after.get(i, j));
    }
}

// ─── Generator Tests ──────────────────────────────────────────

#[test]
fn gaussian_blob_peaks_at_centre() {
    let g = grid(16);
    let d = gaussian_blob(g, 0.5, 0.5, 0.08, 2.0).unwrap();
    let peak = d.interior_max_abs();
    assert!(peak <= 2.0);
    assert!(d.get(8, 8) > d.get(1, 1));
    assert_eq!(d.get(0, 8), d.get(1, 8));
}

#[test]
fn vortex_is_divergence_free_in_core() {
    let g = grid(32);
    let (u, v) = solid_body_vortex(g, 0.5, 0.5, 0.3, 1.0).unwrap();
    let div = divergence(&u, &v);
    // Solid-body rotation is exactly divergence-free away from the rim.
    for j in 14..=18 {
        for i in 14..=18 {
            assert!(div.get(i, j).abs() < 1e-4, "div({i},{j}) = {}", div.get(i, j));
        }
    }
    assert!(kinetic_energy(&u, &v) > 0.0);
}

#[test]
fn fill_rect_clamps_to_interior() {
    let g = grid(4);
    let mut f = Field::zeros(g);
    fill_rect(&mut f, 0, 10, 2, 2, 1.0);
    assert_eq!(f.get(0, 2), 0.0);
    assert_eq!(f.get(5, 2), 0.0);
    assert_eq!((1..=4).filter(|&i| f.get(i, 2) == 1.0).count(), 4);
}

// ─── Diagnostics Tests ────────────────────────────────────────

#[test]
fn uniform_flow_has_no_divergence() {
    let g = grid(8);
    let mut u = Field::filled(g, 0.3);
    let v = Field::filled(g, -0.2);
    // Scalar rule keeps the ring equal to the interior.
    u.enforce_boundary(BoundaryType::Scalar).unwrap();
    assert_eq!(max_abs_divergence(&u, &v), 0.0);
}

#[test]
fn point_source_has_divergence() {
    let g = grid(4);
    let mut u = Field::zeros(g);
    let v = Field::zeros(g);
    u.set(2, 2, 1.0);
    // (u[3]-u[1]) / 2h at neighbours of the spike: ±1 / (2 · 0.25) = ±2.
    let div = divergence(&u, &v);
    assert!((div.get(1, 2) - 2.0).abs() < 1e-6);
    assert!((div.get(3, 2) + 2.0).abs() < 1e-6);
}

#[test]
fn total_mass_scales_with_area() {
    let g = grid(10);
    let d = Field::filled(g, 1.0);
    assert!((total_mass(&d) - 1.0).abs() < 1e-6);
}
