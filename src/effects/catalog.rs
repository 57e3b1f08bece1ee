use std::f32::consts::PI;

use rayon::prelude::*;

use crate::color::{fract01, hsl_to_rgb};
use crate::compose::{
    self, apply_vignette, blend, composite_over, erase_radial, radial_glow, screen_u8, BlendMode,
};
use crate::error::EngineError;
use crate::raster::{bloom, convolve, gaussian_blur, luminance, RasterBuffer};
use crate::rng::RandomSource;

const TAU: f32 = 2.0 * PI;

/// Edge tracing: Laplacian edge strength, thresholded into a binary mask
/// rendered bright over a darkened copy, bloomed, then screened with a
/// random translucent tint.
pub(crate) fn neon(
    src: &RasterBuffer,
    intensity: f32,
    rng: &mut dyn RandomSource,
) -> Result<RasterBuffer, EngineError> {
    const EDGE_KERNEL: [f32; 9] = [-1.0, -1.0, -1.0, -1.0, 8.0, -1.0, -1.0, -1.0, -1.0];
    let edges = convolve(src, &EDGE_KERNEL)?;

    // Lower threshold at higher intensity: more edges survive.
    let threshold = 0.45 - 0.35 * intensity;

    let mut out = src.clone();
    for px in out.data_mut().chunks_exact_mut(4) {
        px[0] = (px[0] as f32 * 0.22) as u8;
        px[1] = (px[1] as f32 * 0.22) as u8;
        px[2] = (px[2] as f32 * 0.22) as u8;
    }
    for (dst, edge) in out
        .data_mut()
        .chunks_exact_mut(4)
        .zip(edges.data().chunks_exact(4))
    {
        if luminance(edge[0], edge[1], edge[2]) >= threshold {
            dst[0] = 235;
            dst[1] = 245;
            dst[2] = 255;
        }
    }

    let mut out = bloom(&out, 0.35 + 0.5 * intensity);

    let (tr, tg, tb) = hsl_to_rgb(rng.next_f32(), 0.9, 0.55);
    let tint_alpha = 0.16 + 0.22 * intensity;
    for px in out.data_mut().chunks_exact_mut(4) {
        px[0] = screen_u8(px[0], (tr as f32 * tint_alpha) as u8);
        px[1] = screen_u8(px[1], (tg as f32 * tint_alpha) as u8);
        px[2] = screen_u8(px[2], (tb as f32 * tint_alpha) as u8);
    }
    Ok(out)
}

/// Rotate the sampling angle by `(1 − normalized_radius) · spiral`,
/// nearest-neighbor sampling the snapshot; out-of-bounds samples keep the
/// original pixel.
fn vortex_warp(src: &RasterBuffer, spiral: f32) -> RasterBuffer {
    let w = src.width();
    let h = src.height();
    let cx = (w as f32 - 1.0) * 0.5;
    let cy = (h as f32 - 1.0) * 0.5;
    let max_r = (cx * cx + cy * cy).sqrt().max(1.0);

    let mut out = src.clone();
    out.data_mut()
        .par_chunks_mut(w * 4)
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..w {
                let dx = x as f32 - cx;
                let dy = y as f32 - cy;
                let r = (dx * dx + dy * dy).sqrt();
                if r < 1e-3 {
                    continue;
                }
                let rn = (r / max_r).min(1.0);
                let ang = dy.atan2(dx) + (1.0 - rn) * spiral;
                let sx = (cx + ang.cos() * r).round() as isize;
                let sy = (cy + ang.sin() * r).round() as isize;
                if sx >= 0 && sx < w as isize && sy >= 0 && sy < h as isize {
                    let px = src.pixel(sx as usize, sy as usize);
                    row[x * 4..x * 4 + 4].copy_from_slice(&px);
                }
            }
        });
    out
}

pub(crate) fn vortex(
    src: &RasterBuffer,
    intensity: f32,
    _rng: &mut dyn RandomSource,
) -> Result<RasterBuffer, EngineError> {
    let spiral_factor = 2.0 + 4.0 * intensity;
    let warped = vortex_warp(src, spiral_factor * intensity);
    let mut out = bloom(&warped, 0.2 + 0.3 * intensity);
    radial_glow(&mut out, [205, 215, 255], 0.2 + 0.25 * intensity);
    Ok(out)
}

/// Fold the scene into mirrored angular wedges inside a radius; the wedge
/// layer is bloomed, radially faded, and composited back over the source,
/// so a uniform input passes through unchanged.
pub(crate) fn kaleidoscope(
    src: &RasterBuffer,
    intensity: f32,
    _rng: &mut dyn RandomSource,
) -> Result<RasterBuffer, EngineError> {
    let segments = 3 + (intensity * 10.0) as u32;
    let w = src.width();
    let h = src.height();
    let cx = (w as f32 - 1.0) * 0.5;
    let cy = (h as f32 - 1.0) * 0.5;
    let radius = (w.min(h) as f32) * 0.5;
    let seg = TAU / segments as f32;

    let mut layer = RasterBuffer::new_transparent(w, h)?;
    for y in 0..h {
        for x in 0..w {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            let r = (dx * dx + dy * dy).sqrt();
            if r > radius {
                continue;
            }
            let mut a = dy.atan2(dx).rem_euclid(TAU) % seg;
            // Mirror every other half-wedge.
            if a > seg * 0.5 {
                a = seg - a;
            }
            let sx = (cx + a.cos() * r).round() as isize;
            let sy = (cy + a.sin() * r).round() as isize;
            let mut px = src.sample_clamped(sx, sy);
            px[3] = 255;
            layer.set_pixel(x, y, px);
        }
    }

    let mut layer = bloom(&layer, 0.2 + 0.25 * intensity);
    erase_radial(&mut layer, cx, cy, radius * 0.72, radius);
    Ok(composite_over(src, &layer, 1.0))
}

/// Nearest-seed partition with flat per-cell fill and brightened cell
/// borders. The brute-force search is parallelized per row.
pub(crate) fn crystallize(
    src: &RasterBuffer,
    intensity: f32,
    rng: &mut dyn RandomSource,
) -> Result<RasterBuffer, EngineError> {
    let cells = 20 + (intensity * 80.0) as usize;
    let w = src.width();
    let h = src.height();

    let seeds: Vec<(f32, f32)> = (0..cells)
        .map(|_| {
            (
                rng.next_f32() * (w as f32 - 1.0),
                rng.next_f32() * (h as f32 - 1.0),
            )
        })
        .collect();

    let mut assign = vec![0u32; w * h];
    assign.par_chunks_mut(w).enumerate().for_each(|(y, row)| {
        for (x, slot) in row.iter_mut().enumerate() {
            let mut best = f32::MAX;
            let mut best_idx = 0u32;
            for (i, &(sx, sy)) in seeds.iter().enumerate() {
                let dx = x as f32 - sx;
                let dy = y as f32 - sy;
                let d2 = dx * dx + dy * dy;
                if d2 < best {
                    best = d2;
                    best_idx = i as u32;
                }
            }
            *slot = best_idx;
        }
    });

    let mut sums = vec![[0u64; 3]; cells];
    let mut counts = vec![0u64; cells];
    for (idx, px) in src.data().chunks_exact(4).enumerate() {
        let cell = assign[idx] as usize;
        sums[cell][0] += px[0] as u64;
        sums[cell][1] += px[1] as u64;
        sums[cell][2] += px[2] as u64;
        counts[cell] += 1;
    }
    let averages: Vec<[u8; 3]> = sums
        .iter()
        .zip(&counts)
        .map(|(sum, &count)| {
            if count == 0 {
                [0, 0, 0]
            } else {
                [
                    (sum[0] / count) as u8,
                    (sum[1] / count) as u8,
                    (sum[2] / count) as u8,
                ]
            }
        })
        .collect();

    let mut out = src.clone();
    for (idx, px) in out.data_mut().chunks_exact_mut(4).enumerate() {
        let avg = averages[assign[idx] as usize];
        px[0] = avg[0];
        px[1] = avg[1];
        px[2] = avg[2];
    }

    // Facet borders: any 4-neighbor in a different cell.
    for y in 0..h {
        for x in 0..w {
            let idx = y * w + x;
            let cell = assign[idx];
            let boundary = (x > 0 && assign[idx - 1] != cell)
                || (x + 1 < w && assign[idx + 1] != cell)
                || (y > 0 && assign[idx - w] != cell)
                || (y + 1 < h && assign[idx + w] != cell);
            if boundary {
                let mut px = out.pixel(x, y);
                px[0] = ((px[0] as f32 * 1.3).min(255.0)) as u8;
                px[1] = ((px[1] as f32 * 1.3).min(255.0)) as u8;
                px[2] = ((px[2] as f32 * 1.3).min(255.0)) as u8;
                out.set_pixel(x, y, px);
            }
        }
    }
    Ok(out)
}

/// Layered randomized blur washes, a multiply paper tint, and per-pixel
/// color jitter.
pub(crate) fn watercolor(
    src: &RasterBuffer,
    intensity: f32,
    rng: &mut dyn RandomSource,
) -> Result<RasterBuffer, EngineError> {
    let passes = 3 + (intensity * 4.0) as usize;
    let mut current = src.clone();
    for _ in 0..passes {
        let radius = rng.next_range(1.0, 3.5);
        let opacity = rng.next_range(0.25, 0.55);
        let blurred = gaussian_blur(&current, radius);
        current = composite_over(&current, &blurred, opacity);
    }

    const PAPER: [u8; 3] = [236, 229, 212];
    let jitter_amp = 4.0 + 6.0 * intensity;
    for px in current.data_mut().chunks_exact_mut(4) {
        for c in 0..3 {
            let washed = compose::multiply_u8(px[c], PAPER[c]);
            let jitter = (rng.next_f32() * 2.0 - 1.0) * jitter_amp;
            px[c] = (washed as f32 + jitter).clamp(0.0, 255.0) as u8;
        }
    }
    Ok(current)
}

/// Flat block averages, with a grid overlay and a chromatic shift at high
/// intensity. Grid lines land only on interior block boundaries.
pub(crate) fn pixelate(
    src: &RasterBuffer,
    intensity: f32,
    _rng: &mut dyn RandomSource,
) -> Result<RasterBuffer, EngineError> {
    let block = (3 + (intensity * 15.0) as usize).max(2);
    let w = src.width();
    let h = src.height();

    let mut out = src.clone();
    for by in (0..h).step_by(block) {
        for bx in (0..w).step_by(block) {
            let y_end = (by + block).min(h);
            let x_end = (bx + block).min(w);
            let mut sum = [0u64; 4];
            let mut count = 0u64;
            for y in by..y_end {
                for x in bx..x_end {
                    let px = src.pixel(x, y);
                    for c in 0..4 {
                        sum[c] += px[c] as u64;
                    }
                    count += 1;
                }
            }
            let avg = [
                ((sum[0] as f64 / count as f64).round()) as u8,
                ((sum[1] as f64 / count as f64).round()) as u8,
                ((sum[2] as f64 / count as f64).round()) as u8,
                ((sum[3] as f64 / count as f64).round()) as u8,
            ];
            for y in by..y_end {
                for x in bx..x_end {
                    out.set_pixel(x, y, avg);
                }
            }
        }
    }

    if intensity > 0.5 {
        for y in 0..h {
            for x in 0..w {
                if (x > 0 && x % block == 0) || (y > 0 && y % block == 0) {
                    let mut px = out.pixel(x, y);
                    px[0] = (px[0] as f32 * 0.75) as u8;
                    px[1] = (px[1] as f32 * 0.75) as u8;
                    px[2] = (px[2] as f32 * 0.75) as u8;
                    out.set_pixel(x, y, px);
                }
            }
        }

        let d = (1.0 + (intensity - 0.5) * 10.0).round() as isize;
        let snap = out.clone();
        for y in 0..h {
            for x in 0..w {
                let mut px = out.pixel(x, y);
                px[0] = snap.sample_clamped(x as isize + d, y as isize)[0];
                px[2] = snap.sample_clamped(x as isize - d, y as isize)[2];
                out.set_pixel(x, y, px);
            }
        }
    }
    Ok(out)
}

/// Strongly vortex-warped background under a fresh starfield with
/// logarithmic-spiral dust arms, screened at partial opacity.
pub(crate) fn galaxy(
    src: &RasterBuffer,
    intensity: f32,
    rng: &mut dyn RandomSource,
) -> Result<RasterBuffer, EngineError> {
    let w = src.width();
    let h = src.height();
    let cx = (w as f32 - 1.0) * 0.5;
    let cy = (h as f32 - 1.0) * 0.5;
    let max_r = (cx * cx + cy * cy).sqrt().max(1.0);

    let spiral_factor = 3.5 + 5.0 * intensity;
    let background = vortex_warp(src, spiral_factor * intensity.max(0.4));

    let mut foreground = RasterBuffer::new_transparent(w, h)?;

    let stars = 80 + (intensity * 220.0) as usize;
    for _ in 0..stars {
        let x = rng.next_index(w);
        let y = rng.next_index(h);
        let b = 140 + (rng.next_f32() * 115.0) as u8;
        foreground.set_pixel(x, y, [b, b, b.saturating_add(20), 255]);
    }

    let arms = 2 + (intensity * 3.0) as usize;
    let particles_per_arm = (120 + (intensity * 480.0) as usize) / arms.max(1);
    let pitch = 0.22f32;
    let theta_max = 3.0 * PI;
    let a = 0.9 * max_r / (pitch * theta_max).exp();
    for arm in 0..arms {
        let arm_offset = arm as f32 * TAU / arms as f32 + rng.next_f32() * 0.4;
        for _ in 0..particles_per_arm {
            let t = rng.next_f32();
            let theta = t * theta_max;
            let r = a * (pitch * theta).exp();
            let jitter = (rng.next_f32() - 0.5) * (2.0 + 6.0 * t);
            let ang = theta + arm_offset;
            let px = cx + ang.cos() * r + jitter;
            let py = cy + ang.sin() * r + jitter;
            if px < 0.0 || py < 0.0 || px >= w as f32 || py >= h as f32 {
                continue;
            }
            let hue = 0.62 + rng.next_f32() * 0.14;
            let (dr, dg, db) = hsl_to_rgb(hue, 0.5, 0.55 + 0.25 * (1.0 - t));
            foreground.set_pixel(px as usize, py as usize, [dr, dg, db, 255]);
        }
    }

    let opacity = 0.55 + 0.35 * intensity;
    for px in foreground.data_mut().chunks_exact_mut(4) {
        px[0] = (px[0] as f32 * opacity) as u8;
        px[1] = (px[1] as f32 * opacity) as u8;
        px[2] = (px[2] as f32 * opacity) as u8;
    }
    let mut out = blend(&background, &foreground, BlendMode::Screen);
    apply_vignette(&mut out, 0.3 + 0.25 * intensity);
    Ok(out)
}

/// Repeated sinusoidal row/column shifts over the running buffer, finished
/// with blur, bloom, and a two-color gradient tint.
pub(crate) fn dream_wave(
    src: &RasterBuffer,
    intensity: f32,
    rng: &mut dyn RandomSource,
) -> Result<RasterBuffer, EngineError> {
    let passes = 5 + (intensity * 10.0) as usize;
    let w = src.width();
    let h = src.height();
    let mut current = src.clone();

    for _ in 0..passes {
        let vertical = rng.next_f32() < 0.5;
        let period = rng.next_range(18.0, 64.0);
        let amplitude = rng.next_range(1.5, 3.0 + intensity * 9.0);
        let phase = rng.next_range(0.0, TAU);
        let snap = current.clone();
        if vertical {
            for x in 0..w {
                let shift = ((x as f32 / period + phase).sin() * amplitude).round() as isize;
                for y in 0..h {
                    let px = snap.sample_clamped(x as isize, y as isize - shift);
                    current.set_pixel(x, y, px);
                }
            }
        } else {
            for y in 0..h {
                let shift = ((y as f32 / period + phase).sin() * amplitude).round() as isize;
                for x in 0..w {
                    let px = snap.sample_clamped(x as isize - shift, y as isize);
                    current.set_pixel(x, y, px);
                }
            }
        }
    }

    let blurred = gaussian_blur(&current, 1.2 + intensity);
    let mut out = bloom(&blurred, 0.3 + 0.4 * intensity);

    let h0 = rng.next_f32();
    let h1 = fract01(h0 + 0.35);
    let from = hsl_to_rgb(h0, 0.7, 0.6);
    let to = hsl_to_rgb(h1, 0.7, 0.55);
    let angle = rng.next_range(0.0, PI);
    compose::linear_gradient_color_blend(
        &mut out,
        [from.0, from.1, from.2],
        [to.0, to.1, to.2],
        angle,
        0.22 + 0.25 * intensity,
    );
    Ok(out)
}

const RAINBOW: [[u8; 3]; 7] = [
    [255, 0, 0],
    [255, 127, 0],
    [255, 255, 0],
    [0, 255, 0],
    [0, 0, 255],
    [75, 0, 130],
    [148, 0, 211],
];

/// Chromatic channel split. The green channel is copied verbatim from the
/// source; the rainbow beam and the lens flare land on red/blue only.
pub(crate) fn prism(
    src: &RasterBuffer,
    intensity: f32,
    rng: &mut dyn RandomSource,
) -> Result<RasterBuffer, EngineError> {
    let d = (5.0 + intensity * 15.0).round() as isize;
    let w = src.width();
    let h = src.height();

    let mut out = src.clone();
    for y in 0..h {
        for x in 0..w {
            let mut px = out.pixel(x, y);
            px[0] = src.sample_clamped(x as isize + d, y as isize)[0];
            px[2] = src.sample_clamped(x as isize - d, y as isize)[2];
            out.set_pixel(x, y, px);
        }
    }

    let angle = rng.next_range(0.0, PI);
    let (dx, dy) = (angle.cos(), angle.sin());
    let bx = rng.next_f32() * (w as f32 - 1.0);
    let by = rng.next_f32() * (h as f32 - 1.0);
    let half_width = (w.min(h) as f32) * 0.18;
    for y in 0..h {
        for x in 0..w {
            // Signed distance perpendicular to the beam direction.
            let s = (x as f32 - bx) * -dy + (y as f32 - by) * dx;
            if s.abs() >= half_width {
                continue;
            }
            let t = (s / half_width + 1.0) * 0.5;
            let stop = ((t * 7.0) as usize).min(6);
            let fade = 1.0 - s.abs() / half_width;
            let k = 0.5 * fade;
            let mut px = out.pixel(x, y);
            px[0] = screen_u8(px[0], (RAINBOW[stop][0] as f32 * k) as u8);
            px[2] = screen_u8(px[2], (RAINBOW[stop][2] as f32 * k) as u8);
            out.set_pixel(x, y, px);
        }
    }

    if intensity > 0.5 {
        let fx = rng.next_f32() * (w as f32 - 1.0);
        let fy = rng.next_f32() * (h as f32 - 1.0);
        let flare_r = (w.min(h) as f32) * 0.25;
        for y in 0..h {
            for x in 0..w {
                let ddx = x as f32 - fx;
                let ddy = y as f32 - fy;
                let dist = (ddx * ddx + ddy * ddy).sqrt();
                if dist >= flare_r {
                    continue;
                }
                let falloff = 1.0 - dist / flare_r;
                let k = falloff * falloff * 0.6;
                let mut px = out.pixel(x, y);
                px[0] = screen_u8(px[0], (255.0 * k) as u8);
                px[2] = screen_u8(px[2], (255.0 * k) as u8);
                out.set_pixel(x, y, px);
            }
        }
    }
    Ok(out)
}

/// Sinusoidal ribbon bands screened over a dimmed copy, colors sliding from
/// greens/blues toward purples/pinks as intensity rises.
pub(crate) fn aurora(
    src: &RasterBuffer,
    intensity: f32,
    rng: &mut dyn RandomSource,
) -> Result<RasterBuffer, EngineError> {
    let bands = 3 + (intensity * 7.0) as usize;
    let w = src.width();
    let h = src.height();

    let mut out = src.clone();
    for px in out.data_mut().chunks_exact_mut(4) {
        px[0] = (px[0] as f32 * 0.55) as u8;
        px[1] = (px[1] as f32 * 0.55) as u8;
        px[2] = (px[2] as f32 * 0.55) as u8;
    }

    for _ in 0..bands {
        let base_y = rng.next_range(0.08, 0.6) * h as f32;
        let amplitude = rng.next_range(4.0, 6.0 + 14.0 * intensity);
        let wavelength = rng.next_range(30.0, 90.0);
        let phase = rng.next_range(0.0, TAU);
        let thickness = rng.next_range(3.0, 6.0 + 6.0 * intensity);
        let hue = fract01(rng.next_range(0.36, 0.52) + 0.36 * intensity);
        let (cr, cg, cb) = hsl_to_rgb(hue, 0.85, 0.6);

        let span = thickness.ceil() as isize;
        for x in 0..w {
            let center = base_y + (x as f32 / wavelength + phase).sin() * amplitude;
            for dy in -span..=span {
                let yy = center as isize + dy;
                if yy < 0 || yy >= h as isize {
                    continue;
                }
                let fall = (1.0 - dy.abs() as f32 / thickness).max(0.0);
                let k = fall * fall * 0.8;
                let mut px = out.pixel(x, yy as usize);
                px[0] = screen_u8(px[0], (cr as f32 * k) as u8);
                px[1] = screen_u8(px[1], (cg as f32 * k) as u8);
                px[2] = screen_u8(px[2], (cb as f32 * k) as u8);
                out.set_pixel(x, yy as usize, px);
            }
        }
    }

    if intensity > 0.5 {
        let stars = 30 + (intensity * 80.0) as usize;
        for _ in 0..stars {
            let x = rng.next_index(w);
            let y = rng.next_index((h / 3).max(1));
            let b = 150 + (rng.next_f32() * 105.0) as u8;
            let mut px = out.pixel(x, y);
            px[0] = screen_u8(px[0], b);
            px[1] = screen_u8(px[1], b);
            px[2] = screen_u8(px[2], b);
            out.set_pixel(x, y, px);
        }
    }

    apply_vignette(&mut out, 0.3);
    Ok(out)
}
