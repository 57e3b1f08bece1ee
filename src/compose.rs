use crate::color::{hsl_to_rgb, rgb_to_hsl};
use crate::raster::RasterBuffer;

/// Per-channel blend formulas over normalized [0,1] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    Multiply,
    Screen,
    Overlay,
}

#[inline]
pub fn blend_channel(mode: BlendMode, a: f32, b: f32) -> f32 {
    match mode {
        BlendMode::Multiply => a * b,
        BlendMode::Screen => 1.0 - (1.0 - a) * (1.0 - b),
        BlendMode::Overlay => {
            if a < 0.5 {
                2.0 * a * b
            } else {
                1.0 - 2.0 * (1.0 - a) * (1.0 - b)
            }
        }
    }
}

/// Radial-mask erase: channel scaled by `1 − mask`, mask in [0,1]
/// (0 at center, 1 at/after the fade radius).
#[inline]
pub fn radial_mask_erase(a: f32, mask: f32) -> f32 {
    a * (1.0 - mask.clamp(0.0, 1.0))
}

#[inline]
pub fn screen_u8(a: u8, b: u8) -> u8 {
    let v = blend_channel(BlendMode::Screen, a as f32 / 255.0, b as f32 / 255.0);
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

#[inline]
pub fn multiply_u8(a: u8, b: u8) -> u8 {
    let v = blend_channel(BlendMode::Multiply, a as f32 / 255.0, b as f32 / 255.0);
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

#[inline]
pub fn overlay_u8(a: u8, b: u8) -> u8 {
    let v = blend_channel(BlendMode::Overlay, a as f32 / 255.0, b as f32 / 255.0);
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Blend `layer` onto `base` per RGB channel; alpha stays the base's.
/// Buffers must share dimensions (callers guarantee this inside the
/// pipeline, where every stage preserves dimensions).
pub fn blend(base: &RasterBuffer, layer: &RasterBuffer, mode: BlendMode) -> RasterBuffer {
    let mut out = base.clone();
    for (dst, src) in out
        .data_mut()
        .chunks_exact_mut(4)
        .zip(layer.data().chunks_exact(4))
    {
        for c in 0..3 {
            let v = blend_channel(mode, dst[c] as f32 / 255.0, src[c] as f32 / 255.0);
            dst[c] = (v * 255.0).round().clamp(0.0, 255.0) as u8;
        }
    }
    out
}

/// Source-over composite of `layer` onto `base` using the layer's alpha
/// scaled by `opacity`; the result keeps the base's alpha.
pub fn composite_over(base: &RasterBuffer, layer: &RasterBuffer, opacity: f32) -> RasterBuffer {
    let opacity = opacity.clamp(0.0, 1.0);
    let mut out = base.clone();
    for (dst, src) in out
        .data_mut()
        .chunks_exact_mut(4)
        .zip(layer.data().chunks_exact(4))
    {
        let a = (src[3] as f32 / 255.0) * opacity;
        if a <= 0.0 {
            continue;
        }
        for c in 0..3 {
            let v = dst[c] as f32 * (1.0 - a) + src[c] as f32 * a;
            dst[c] = v.round().clamp(0.0, 255.0) as u8;
        }
    }
    out
}

/// Destination-out-style erase on a layer: alpha is untouched inside
/// `fade_start`, falls off linearly, and is fully erased at `fade_end` and
/// beyond.
pub fn erase_radial(layer: &mut RasterBuffer, cx: f32, cy: f32, fade_start: f32, fade_end: f32) {
    let w = layer.width();
    let start = fade_start.max(0.0);
    let span = (fade_end - start).max(1e-3);
    for (idx, px) in layer.data_mut().chunks_exact_mut(4).enumerate() {
        let x = (idx % w) as f32;
        let y = (idx / w) as f32;
        let dx = x - cx;
        let dy = y - cy;
        let mask = (((dx * dx + dy * dy).sqrt() - start) / span).clamp(0.0, 1.0);
        px[3] = (radial_mask_erase(px[3] as f32 / 255.0, mask) * 255.0).round() as u8;
    }
}

/// Darken toward the edges: gain falls with normalized radius.
pub fn apply_vignette(buffer: &mut RasterBuffer, strength: f32) {
    let strength = strength.clamp(0.0, 1.0);
    if strength == 0.0 {
        return;
    }
    let w = buffer.width();
    let h = buffer.height();
    let cx = (w as f32 - 1.0) * 0.5;
    let cy = (h as f32 - 1.0) * 0.5;
    let inv_rx = 1.0 / cx.max(1.0);
    let inv_ry = 1.0 / cy.max(1.0);
    for (idx, px) in buffer.data_mut().chunks_exact_mut(4).enumerate() {
        let x = (idx % w) as f32;
        let y = (idx / w) as f32;
        let nx = (x - cx) * inv_rx;
        let ny = (y - cy) * inv_ry;
        let rad = (nx * nx + ny * ny).clamp(0.0, 1.0);
        let gain = 1.0 - strength * rad;
        px[0] = (px[0] as f32 * gain) as u8;
        px[1] = (px[1] as f32 * gain) as u8;
        px[2] = (px[2] as f32 * gain) as u8;
    }
}

/// Screen a centered glow that fades to nothing outward, used by the warp
/// effects to lift the middle of the frame.
pub fn radial_glow(buffer: &mut RasterBuffer, color: [u8; 3], max_strength: f32) {
    let strength = max_strength.clamp(0.0, 1.0);
    if strength == 0.0 {
        return;
    }
    let w = buffer.width();
    let h = buffer.height();
    let cx = (w as f32 - 1.0) * 0.5;
    let cy = (h as f32 - 1.0) * 0.5;
    let max_r = (cx * cx + cy * cy).sqrt().max(1.0);
    for (idx, px) in buffer.data_mut().chunks_exact_mut(4).enumerate() {
        let x = (idx % w) as f32;
        let y = (idx / w) as f32;
        let dx = x - cx;
        let dy = y - cy;
        let falloff = 1.0 - ((dx * dx + dy * dy).sqrt() / max_r).clamp(0.0, 1.0);
        let k = strength * falloff;
        px[0] = screen_u8(px[0], (color[0] as f32 * k) as u8);
        px[1] = screen_u8(px[1], (color[1] as f32 * k) as u8);
        px[2] = screen_u8(px[2], (color[2] as f32 * k) as u8);
    }
}

/// Two-color linear gradient applied with a color blend: hue and saturation
/// come from the gradient, luminosity from the underlying pixel. `angle` is
/// in radians; `amount` mixes the tinted result back over the base.
pub fn linear_gradient_color_blend(
    buffer: &mut RasterBuffer,
    from: [u8; 3],
    to: [u8; 3],
    angle: f32,
    amount: f32,
) {
    let amount = amount.clamp(0.0, 1.0);
    if amount == 0.0 {
        return;
    }
    let w = buffer.width();
    let h = buffer.height();
    let dir = (angle.cos(), angle.sin());
    // Project corners so t spans exactly [0,1] across the buffer.
    let mut lo = f32::MAX;
    let mut hi = f32::MIN;
    for &(px, py) in &[
        (0.0, 0.0),
        (w as f32 - 1.0, 0.0),
        (0.0, h as f32 - 1.0),
        (w as f32 - 1.0, h as f32 - 1.0),
    ] {
        let t = px * dir.0 + py * dir.1;
        lo = lo.min(t);
        hi = hi.max(t);
    }
    let span = (hi - lo).max(1e-3);

    let (h0, s0, _) = rgb_to_hsl(from[0], from[1], from[2]);
    let (h1, s1, _) = rgb_to_hsl(to[0], to[1], to[2]);

    for (idx, px) in buffer.data_mut().chunks_exact_mut(4).enumerate() {
        let x = (idx % w) as f32;
        let y = (idx / w) as f32;
        let t = ((x * dir.0 + y * dir.1) - lo) / span;
        // Shortest-path hue interpolation.
        let mut dh = h1 - h0;
        if dh > 0.5 {
            dh -= 1.0;
        } else if dh < -0.5 {
            dh += 1.0;
        }
        let gh = crate::color::fract01(h0 + dh * t);
        let gs = s0 + (s1 - s0) * t;
        let (_, _, l) = rgb_to_hsl(px[0], px[1], px[2]);
        let (tr, tg, tb) = hsl_to_rgb(gh, gs, l);
        px[0] = (px[0] as f32 * (1.0 - amount) + tr as f32 * amount) as u8;
        px[1] = (px[1] as f32 * (1.0 - amount) + tg as f32 * amount) as u8;
        px[2] = (px[2] as f32 * (1.0 - amount) + tb as f32 * amount) as u8;
    }
}
