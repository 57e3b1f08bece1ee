use dreamscape::effects::{self, EffectKind};
use dreamscape::raster::RasterBuffer;
use dreamscape::rng::{RandomSource, SequenceRandom};

/// Scripted source cycling through a fixed spread of draws.
fn scripted() -> SequenceRandom {
    SequenceRandom::new(vec![
        0.13, 0.71, 0.42, 0.95, 0.27, 0.58, 0.03, 0.88, 0.49, 0.66,
    ])
}

fn gradient(w: usize, h: usize) -> RasterBuffer {
    let mut buf = RasterBuffer::new(w, h).unwrap();
    for y in 0..h {
        for x in 0..w {
            let t = (x * 255 / w.max(1)) as u8;
            buf.set_pixel(x, y, [t, 128, 255 - t, 255]);
        }
    }
    buf
}

fn checkerboard(w: usize, h: usize, a: [u8; 3], b: [u8; 3]) -> RasterBuffer {
    let mut buf = RasterBuffer::new(w, h).unwrap();
    for y in 0..h {
        for x in 0..w {
            let c = if (x + y) % 2 == 0 { a } else { b };
            buf.set_pixel(x, y, [c[0], c[1], c[2], 255]);
        }
    }
    buf
}

fn uniform(w: usize, h: usize, rgb: [u8; 3]) -> RasterBuffer {
    let mut buf = RasterBuffer::new(w, h).unwrap();
    buf.fill([rgb[0], rgb[1], rgb[2], 255]);
    buf
}

// ── catalog-wide invariants ─────────────────────────────────────────────────

#[test]
fn every_effect_preserves_dimensions() {
    let src = gradient(32, 24);
    for kind in EffectKind::all() {
        let mut rng = scripted();
        let out = effects::apply(kind, &src, 0.7, &mut rng)
            .unwrap_or_else(|e| panic!("{} failed: {e}", kind.label()));
        assert_eq!(out.width(), 32, "{} changed width", kind.label());
        assert_eq!(out.height(), 24, "{} changed height", kind.label());
    }
}

#[test]
fn every_effect_handles_intensity_extremes() {
    let src = gradient(16, 12);
    for kind in EffectKind::all() {
        for intensity in [0.0f32, 1.0] {
            let mut rng = scripted();
            let out = effects::apply(kind, &src, intensity, &mut rng);
            assert!(
                out.is_ok(),
                "{} failed at intensity {intensity}",
                kind.label()
            );
        }
    }
}

#[test]
fn effects_are_deterministic_under_a_scripted_source() {
    let src = gradient(20, 16);
    for kind in EffectKind::all() {
        let a = effects::apply(kind, &src, 0.6, &mut scripted()).unwrap();
        let b = effects::apply(kind, &src, 0.6, &mut scripted()).unwrap();
        assert_eq!(a, b, "{} not reproducible", kind.label());
    }
}

#[test]
fn effects_do_not_mutate_their_input() {
    let src = gradient(18, 14);
    let reference = src.clone();
    for kind in EffectKind::all() {
        let mut rng = scripted();
        let _ = effects::apply(kind, &src, 0.8, &mut rng).unwrap();
        assert_eq!(src, reference, "{} mutated its input", kind.label());
    }
}

#[test]
fn non_finite_intensity_is_rejected() {
    let src = gradient(8, 8);
    let mut rng = scripted();
    assert!(effects::apply(EffectKind::Vortex, &src, f32::NAN, &mut rng).is_err());
}

// ── pixelate ────────────────────────────────────────────────────────────────

#[test]
fn pixelate_blocks_are_flat_input_averages() {
    // intensity 0.1 -> block size 4; no grid overlay, no chromatic shift.
    let src = gradient(8, 8);
    let mut rng = scripted();
    let out = effects::apply(EffectKind::Pixelate, &src, 0.1, &mut rng).unwrap();

    let block = 4usize;
    for by in (0..8).step_by(block) {
        for bx in (0..8).step_by(block) {
            let mut sum = [0u64; 3];
            for y in by..by + block {
                for x in bx..bx + block {
                    let px = src.pixel(x, y);
                    for c in 0..3 {
                        sum[c] += px[c] as u64;
                    }
                }
            }
            let count = (block * block) as f64;
            let expected = [
                (sum[0] as f64 / count).round() as u8,
                (sum[1] as f64 / count).round() as u8,
                (sum[2] as f64 / count).round() as u8,
            ];
            for y in by..by + block {
                for x in bx..bx + block {
                    let px = out.pixel(x, y);
                    assert_eq!(
                        [px[0], px[1], px[2]],
                        expected,
                        "block ({bx},{by}) not flat at ({x},{y})"
                    );
                }
            }
        }
    }
}

#[test]
fn pixelate_collapses_a_small_checkerboard_to_its_average() {
    // Block size at full intensity (18) exceeds the 4x4 input, so the whole
    // image becomes one flat block: the average of all 16 pixels.
    let src = checkerboard(4, 4, [0, 0, 0], [255, 255, 255]);
    let mut rng = scripted();
    let out = effects::apply(EffectKind::Pixelate, &src, 1.0, &mut rng).unwrap();

    let expected = [128u8, 128, 128];
    for y in 0..4 {
        for x in 0..4 {
            let px = out.pixel(x, y);
            assert_eq!([px[0], px[1], px[2]], expected, "pixel ({x},{y}) not flat");
        }
    }
}

// ── kaleidoscope ────────────────────────────────────────────────────────────

#[test]
fn kaleidoscope_is_idempotent_on_uniform_input() {
    let src = uniform(24, 20, [60, 80, 100]);
    let mut rng = scripted();
    let out = effects::apply(EffectKind::Kaleidoscope, &src, 0.4, &mut rng).unwrap();
    assert_eq!(out, src);
}

#[test]
fn kaleidoscope_rearranges_non_uniform_input() {
    let src = gradient(24, 20);
    let mut rng = scripted();
    let out = effects::apply(EffectKind::Kaleidoscope, &src, 0.6, &mut rng).unwrap();
    assert_ne!(out, src);
}

// ── prism ───────────────────────────────────────────────────────────────────

#[test]
fn prism_keeps_the_green_channel_bit_exact() {
    let src = gradient(32, 16);
    let mut rng = scripted();
    let out = effects::apply(EffectKind::Prism, &src, 0.8, &mut rng).unwrap();
    for y in 0..16 {
        for x in 0..32 {
            assert_eq!(
                out.pixel(x, y)[1],
                src.pixel(x, y)[1],
                "green drifted at ({x},{y})"
            );
        }
    }
}

#[test]
fn prism_shifts_red_and_blue() {
    let src = gradient(32, 16);
    let mut rng = scripted();
    let out = effects::apply(EffectKind::Prism, &src, 0.3, &mut rng).unwrap();
    let mut red_moved = false;
    let mut blue_moved = false;
    for y in 0..16 {
        for x in 0..32 {
            if out.pixel(x, y)[0] != src.pixel(x, y)[0] {
                red_moved = true;
            }
            if out.pixel(x, y)[2] != src.pixel(x, y)[2] {
                blue_moved = true;
            }
        }
    }
    assert!(red_moved, "red channel never moved");
    assert!(blue_moved, "blue channel never moved");
}

// ── crystallize ─────────────────────────────────────────────────────────────

#[test]
fn crystallize_uses_the_requested_cell_budget() {
    // Each seed consumes two draws; a scripted source makes placement exact.
    let src = gradient(24, 24);
    let out = effects::apply(EffectKind::Crystallize, &src, 0.0, &mut scripted()).unwrap();
    assert_eq!(out.width(), 24);
    // With 20 cells the output is piecewise flat: at most one fill color
    // plus one brightened border shade per cell.
    let mut colors = std::collections::HashSet::new();
    for px in out.data().chunks_exact(4) {
        colors.insert([px[0], px[1], px[2]]);
    }
    assert!(
        colors.len() <= 40,
        "expected a coarse partition, got {} colors",
        colors.len()
    );
}

// ── selection policy ────────────────────────────────────────────────────────

#[test]
fn random_selection_draws_intensity_in_band() {
    for v in [0.0f32, 0.25, 0.5, 0.75, 0.999] {
        let mut rng = SequenceRandom::new(vec![v, v]);
        let request = effects::pick_random(&mut rng);
        assert!(
            (0.3..=1.0).contains(&request.intensity),
            "intensity {} out of band",
            request.intensity
        );
    }
}

#[test]
fn random_selection_covers_the_catalog() {
    let mut seen = std::collections::HashSet::new();
    let n = EffectKind::all().len();
    for i in 0..n {
        let v = (i as f32 + 0.5) / n as f32;
        let mut rng = SequenceRandom::new(vec![v, 0.5]);
        seen.insert(effects::pick_random(&mut rng).kind.label());
    }
    assert_eq!(seen.len(), n, "selection policy skipped catalog entries");
}

#[test]
fn metadata_matches_the_catalog_entry() {
    let mut rng = SequenceRandom::new(vec![0.0, 0.5]);
    let request = effects::pick_random(&mut rng);
    let result = dreamscape::EffectResult::for_request(request);
    assert_eq!(result.kind, request.kind);
    assert_eq!(result.name, request.kind.label());
    assert_eq!(result.description, request.kind.description());
    assert!((result.intensity - request.intensity).abs() < f32::EPSILON);
}

// ── randomness plumbing ─────────────────────────────────────────────────────

#[test]
fn sequence_source_wraps_and_clamps() {
    let mut rng = SequenceRandom::new(vec![0.2, 1.7]);
    assert!((rng.next_f32() - 0.2).abs() < 1e-6);
    assert!(rng.next_f32() < 1.0, "values must stay below 1");
    assert!((rng.next_f32() - 0.2).abs() < 1e-6, "sequence should wrap");
}

#[test]
fn index_draws_stay_in_bounds() {
    let mut rng = SequenceRandom::new(vec![0.0, 0.5, 0.999]);
    for _ in 0..9 {
        let idx = rng.next_index(7);
        assert!(idx < 7);
    }
}
