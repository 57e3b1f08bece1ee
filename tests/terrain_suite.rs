use dreamscape::color::{ScenePalette, Sentiment};
use dreamscape::scene::shade_scene;
use dreamscape::terrain::{generate_terrain, terrain_normals, TerrainOptions};

fn options(seed: f64) -> TerrainOptions {
    TerrainOptions {
        seed,
        ..TerrainOptions::default()
    }
}

// ── generation ──────────────────────────────────────────────────────────────

#[test]
fn heightmap_has_requested_dimensions() {
    let map = generate_terrain(17, 9, &options(0.0)).unwrap();
    assert_eq!(map.width(), 17);
    assert_eq!(map.height(), 9);
    assert_eq!(map.cells().len(), 17 * 9);
}

#[test]
fn heightmap_values_are_normalized() {
    for ridged in [false, true] {
        for warp in [false, true] {
            let opts = TerrainOptions {
                ridged,
                warp,
                seed: 3.7,
                ..TerrainOptions::default()
            };
            let map = generate_terrain(24, 24, &opts).unwrap();
            for &v in map.cells() {
                assert!((0.0..=1.0).contains(&v), "height {v} out of [0,1]");
            }
        }
    }
}

#[test]
fn generation_is_deterministic() {
    let opts = TerrainOptions {
        seed: 0.0,
        scale: 0.1,
        octaves: 4,
        ..TerrainOptions::default()
    };
    let a = generate_terrain(10, 10, &opts).unwrap();
    let b = generate_terrain(10, 10, &opts).unwrap();
    assert_eq!(a, b, "identical requests must yield identical heightmaps");
}

#[test]
fn elevation_zero_flattens_the_terrain() {
    let opts = TerrainOptions {
        elevation: 0.0,
        ..TerrainOptions::default()
    };
    let map = generate_terrain(8, 8, &opts).unwrap();
    assert!(map.cells().iter().all(|&v| v == 0.0));
}

#[test]
fn strategies_produce_distinct_fields() {
    let plain = generate_terrain(16, 16, &options(0.7)).unwrap();
    let ridged = generate_terrain(
        16,
        16,
        &TerrainOptions {
            ridged: true,
            ..options(0.7)
        },
    )
    .unwrap();
    let warped = generate_terrain(
        16,
        16,
        &TerrainOptions {
            warp: true,
            ..options(0.7)
        },
    )
    .unwrap();
    assert_ne!(plain, ridged);
    assert_ne!(plain, warped);
}

#[test]
fn ridged_takes_precedence_over_warp() {
    let both = generate_terrain(
        12,
        12,
        &TerrainOptions {
            ridged: true,
            warp: true,
            ..options(1.3)
        },
    )
    .unwrap();
    let ridged_only = generate_terrain(
        12,
        12,
        &TerrainOptions {
            ridged: true,
            warp: false,
            ..options(1.3)
        },
    )
    .unwrap();
    assert_eq!(both, ridged_only);
}

// ── input validation ────────────────────────────────────────────────────────

#[test]
fn zero_dimensions_are_rejected() {
    assert!(generate_terrain(0, 10, &options(0.0)).is_err());
    assert!(generate_terrain(10, 0, &options(0.0)).is_err());
}

#[test]
fn degenerate_options_are_rejected() {
    let cases = [
        TerrainOptions {
            octaves: 0,
            ..TerrainOptions::default()
        },
        TerrainOptions {
            scale: 0.0,
            ..TerrainOptions::default()
        },
        TerrainOptions {
            scale: -0.5,
            ..TerrainOptions::default()
        },
        TerrainOptions {
            persistence: 0.0,
            ..TerrainOptions::default()
        },
        TerrainOptions {
            persistence: 1.5,
            ..TerrainOptions::default()
        },
        TerrainOptions {
            lacunarity: 0.5,
            ..TerrainOptions::default()
        },
        TerrainOptions {
            elevation: -1.0,
            ..TerrainOptions::default()
        },
        TerrainOptions {
            seed: f64::NAN,
            ..TerrainOptions::default()
        },
        TerrainOptions {
            scale: f64::INFINITY,
            ..TerrainOptions::default()
        },
    ];
    for opts in cases {
        assert!(
            generate_terrain(8, 8, &opts).is_err(),
            "expected rejection for {opts:?}"
        );
    }
}

// ── normals ─────────────────────────────────────────────────────────────────

#[test]
fn normals_are_unit_length_everywhere() {
    let map = generate_terrain(21, 13, &options(2.2)).unwrap();
    let normals = terrain_normals(&map);
    assert_eq!(normals.width(), 21);
    assert_eq!(normals.height(), 13);
    for y in 0..normals.height() {
        for x in 0..normals.width() {
            let n = normals.get(x, y);
            let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
            assert!(
                (len - 1.0).abs() < 1e-6,
                "normal at ({x},{y}) has length {len}"
            );
        }
    }
}

#[test]
fn flat_terrain_has_straight_up_normals() {
    let map = generate_terrain(
        6,
        6,
        &TerrainOptions {
            elevation: 0.0,
            ..TerrainOptions::default()
        },
    )
    .unwrap();
    let normals = terrain_normals(&map);
    for y in 0..6 {
        for x in 0..6 {
            assert_eq!(normals.get(x, y), [0.0, 0.0, 1.0]);
        }
    }
}

// ── scene shading ───────────────────────────────────────────────────────────

#[test]
fn shaded_scene_matches_heightmap_dimensions() {
    let map = generate_terrain(14, 10, &options(0.4)).unwrap();
    let normals = terrain_normals(&map);
    let scene = shade_scene(&map, &normals, &ScenePalette::default(), Sentiment::Calm).unwrap();
    assert_eq!(scene.width(), 14);
    assert_eq!(scene.height(), 10);
}

#[test]
fn scene_shading_is_deterministic() {
    let map = generate_terrain(12, 12, &options(0.9)).unwrap();
    let normals = terrain_normals(&map);
    let palette = ScenePalette::default();
    let a = shade_scene(&map, &normals, &palette, Sentiment::Bright).unwrap();
    let b = shade_scene(&map, &normals, &palette, Sentiment::Bright).unwrap();
    assert_eq!(a, b);
}

#[test]
fn somber_scenes_are_darker_than_bright_ones() {
    let map = generate_terrain(16, 16, &options(1.8)).unwrap();
    let normals = terrain_normals(&map);
    let palette = ScenePalette::default();
    let bright = shade_scene(&map, &normals, &palette, Sentiment::Bright).unwrap();
    let somber = shade_scene(&map, &normals, &palette, Sentiment::Somber).unwrap();
    let sum = |buf: &dreamscape::RasterBuffer| -> u64 {
        buf.data()
            .chunks_exact(4)
            .map(|px| px[0] as u64 + px[1] as u64 + px[2] as u64)
            .sum()
    };
    assert!(sum(&somber) < sum(&bright));
}

#[test]
fn mismatched_normal_dimensions_are_rejected() {
    let map = generate_terrain(10, 10, &options(0.0)).unwrap();
    let other = generate_terrain(9, 10, &options(0.0)).unwrap();
    let normals = terrain_normals(&other);
    assert!(shade_scene(&map, &normals, &ScenePalette::default(), Sentiment::Calm).is_err());
}
