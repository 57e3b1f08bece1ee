use dreamscape::noise::{
    domain_warped_noise, fbm3, noise3, ridged_multifractal, NoiseField,
};

fn sample_grid(mut f: impl FnMut(f64, f64, f64)) {
    for i in 0..40 {
        for j in 0..40 {
            let x = i as f64 * 0.17 - 3.0;
            let y = j as f64 * 0.23 - 2.0;
            let z = (i + j) as f64 * 0.05;
            f(x, y, z);
        }
    }
}

// ── noise3 ──────────────────────────────────────────────────────────────────

#[test]
fn noise3_is_deterministic() {
    sample_grid(|x, y, z| {
        let a = noise3(x, y, z);
        let b = noise3(x, y, z);
        assert_eq!(a.to_bits(), b.to_bits(), "noise3 not bit-identical at ({x},{y},{z})");
    });
}

#[test]
fn noise3_stays_near_unit_range() {
    sample_grid(|x, y, z| {
        let v = noise3(x, y, z);
        assert!(v.is_finite());
        assert!(v.abs() <= 1.5, "noise3({x},{y},{z}) = {v} out of margin");
    });
}

#[test]
fn noise3_zero_at_lattice_points() {
    // Gradient noise vanishes on integer lattice coordinates.
    for i in -3i64..4 {
        for j in -3i64..4 {
            let v = noise3(i as f64, j as f64, 1.0);
            assert!(v.abs() < 1e-12, "lattice value {v} at ({i},{j},1)");
        }
    }
}

#[test]
fn noise3_handles_negative_coordinates() {
    let v = noise3(-12.7, -0.3, -44.9);
    assert!(v.is_finite() && v.abs() <= 1.5);
}

// ── fbm3 ────────────────────────────────────────────────────────────────────

#[test]
fn fbm3_stays_near_unit_range() {
    for octaves in [1u32, 2, 4, 8] {
        sample_grid(|x, y, z| {
            let v = fbm3(x, y, z, octaves, 0.5, 2.0).unwrap();
            assert!(v.abs() <= 1.5, "fbm3 octaves={octaves} gave {v}");
        });
    }
}

#[test]
fn fbm3_single_octave_matches_noise3() {
    sample_grid(|x, y, z| {
        let a = fbm3(x, y, z, 1, 0.5, 2.0).unwrap();
        let b = noise3(x, y, z);
        assert_eq!(a.to_bits(), b.to_bits());
    });
}

#[test]
fn fbm3_rejects_zero_octaves() {
    assert!(fbm3(0.1, 0.2, 0.3, 0, 0.5, 2.0).is_err());
}

// ── ridged multifractal ─────────────────────────────────────────────────────

#[test]
fn ridged_output_is_in_unit_interval() {
    for octaves in [1u32, 3, 6] {
        sample_grid(|x, y, z| {
            let v = ridged_multifractal(x, y, z, octaves, 0.5, 2.0, 2.0).unwrap();
            assert!((0.0..=1.0).contains(&v), "ridged octaves={octaves} gave {v}");
        });
    }
}

#[test]
fn ridged_rejects_zero_octaves() {
    assert!(ridged_multifractal(0.1, 0.2, 0.3, 0, 0.5, 2.0, 2.0).is_err());
}

#[test]
fn ridged_differs_from_fbm() {
    let mut differs = false;
    sample_grid(|x, y, z| {
        let r = ridged_multifractal(x, y, z, 4, 0.5, 2.0, 2.0).unwrap();
        let f = fbm3(x, y, z, 4, 0.5, 2.0).unwrap();
        if (r - f).abs() > 0.05 {
            differs = true;
        }
    });
    assert!(differs, "ridged field never diverged from fbm");
}

// ── domain warping ──────────────────────────────────────────────────────────

#[test]
fn domain_warp_is_deterministic_and_bounded() {
    sample_grid(|x, y, z| {
        let a = domain_warped_noise(x, y, z, 1.5);
        let b = domain_warped_noise(x, y, z, 1.5);
        assert_eq!(a.to_bits(), b.to_bits());
        assert!(a.abs() <= 1.5);
    });
}

#[test]
fn domain_warp_displaces_the_field() {
    let mut differs = false;
    sample_grid(|x, y, z| {
        let warped = domain_warped_noise(x, y, z, 2.5);
        let plain = fbm3(x, y, z, 4, 0.5, 2.0).unwrap();
        if (warped - plain).abs() > 0.05 {
            differs = true;
        }
    });
    assert!(differs, "warped field never diverged from plain fbm");
}

#[test]
fn zero_strength_warp_reduces_to_fbm() {
    sample_grid(|x, y, z| {
        let warped = domain_warped_noise(x, y, z, 0.0);
        let plain = fbm3(x, y, z, 4, 0.5, 2.0).unwrap();
        assert_eq!(warped.to_bits(), plain.to_bits());
    });
}

// ── seeded fields ───────────────────────────────────────────────────────────

#[test]
fn seeded_fields_are_reproducible() {
    let a = NoiseField::with_seed(42);
    let b = NoiseField::with_seed(42);
    sample_grid(|x, y, z| {
        assert_eq!(a.noise3(x, y, z).to_bits(), b.noise3(x, y, z).to_bits());
    });
}

#[test]
fn different_seeds_give_different_fields() {
    let a = NoiseField::with_seed(1);
    let b = NoiseField::with_seed(2);
    let mut differs = false;
    sample_grid(|x, y, z| {
        if (a.noise3(x, y, z) - b.noise3(x, y, z)).abs() > 1e-6 {
            differs = true;
        }
    });
    assert!(differs, "seeds 1 and 2 produced identical fields");
}
