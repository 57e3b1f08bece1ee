use crate::error::{input_error, EngineError};
use rayon::prelude::*;

/// Dense row-major RGBA byte buffer. Dimensions are fixed for the buffer's
/// lifetime; the active pipeline invocation owns it exclusively while
/// transforming.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl RasterBuffer {
    /// Opaque black buffer.
    pub fn new(width: usize, height: usize) -> Result<Self, EngineError> {
        if width == 0 {
            return Err(input_error("width", "must be greater than 0"));
        }
        if height == 0 {
            return Err(input_error("height", "must be greater than 0"));
        }
        let mut data = vec![0u8; width * height * 4];
        for px in data.chunks_exact_mut(4) {
            px[3] = 255;
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Fully transparent buffer, for building overlay layers.
    pub fn new_transparent(width: usize, height: usize) -> Result<Self, EngineError> {
        let mut buf = Self::new(width, height)?;
        for px in buf.data.chunks_exact_mut(4) {
            px[3] = 0;
        }
        Ok(buf)
    }

    pub fn from_pixels(width: usize, height: usize, data: Vec<u8>) -> Result<Self, EngineError> {
        if width == 0 || height == 0 {
            return Err(input_error("dimensions", "must be greater than 0"));
        }
        if data.len() != width * height * 4 {
            return Err(input_error(
                "pixels",
                format!("expected {} bytes, got {}", width * height * 4, data.len()),
            ));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let i = (y * self.width + x) * 4;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, px: [u8; 4]) {
        let i = (y * self.width + x) * 4;
        self.data[i..i + 4].copy_from_slice(&px);
    }

    /// Sample with out-of-range coordinates clamped to the nearest edge
    /// pixel; never wraps.
    #[inline]
    pub fn sample_clamped(&self, x: isize, y: isize) -> [u8; 4] {
        let cx = x.clamp(0, self.width as isize - 1) as usize;
        let cy = y.clamp(0, self.height as isize - 1) as usize;
        self.pixel(cx, cy)
    }

    pub fn fill(&mut self, px: [u8; 4]) {
        for chunk in self.data.chunks_exact_mut(4) {
            chunk.copy_from_slice(&px);
        }
    }
}

/// Normalized luminance of an RGB triple.
#[inline]
pub fn luminance(r: u8, g: u8, b: u8) -> f32 {
    (0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32) / 255.0
}

/// Apply an N×N kernel (N odd) with clamped-border sampling. Color channels
/// are the weighted sum clamped to [0,255]; alpha passes through.
pub fn convolve(src: &RasterBuffer, kernel: &[f32]) -> Result<RasterBuffer, EngineError> {
    let n = (kernel.len() as f64).sqrt() as usize;
    if n * n != kernel.len() || n % 2 == 0 || n == 0 {
        return Err(input_error("kernel", "must be square with odd side length"));
    }
    let half = (n / 2) as isize;
    let w = src.width();

    let mut out = src.clone();
    out.data_mut()
        .par_chunks_mut(w * 4)
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..w {
                let mut acc = [0.0f32; 3];
                for ky in 0..n {
                    for kx in 0..n {
                        let weight = kernel[ky * n + kx];
                        let sx = x as isize + kx as isize - half;
                        let sy = y as isize + ky as isize - half;
                        let px = src.sample_clamped(sx, sy);
                        acc[0] += px[0] as f32 * weight;
                        acc[1] += px[1] as f32 * weight;
                        acc[2] += px[2] as f32 * weight;
                    }
                }
                let i = x * 4;
                row[i] = acc[0].round().clamp(0.0, 255.0) as u8;
                row[i + 1] = acc[1].round().clamp(0.0, 255.0) as u8;
                row[i + 2] = acc[2].round().clamp(0.0, 255.0) as u8;
            }
        });
    Ok(out)
}

/// 1D Gaussian kernel of size `2·ceil(radius)+1` with σ = radius/3,
/// normalized so the weights sum to 1.
pub fn gaussian_kernel(radius: f32) -> Vec<f32> {
    if radius <= 0.0 || !radius.is_finite() {
        return vec![1.0];
    }
    let half = radius.ceil() as isize;
    let sigma = (radius / 3.0).max(1e-3) as f64;
    let denom = 2.0 * sigma * sigma;
    let mut weights: Vec<f32> = (-half..=half)
        .map(|i| (-((i * i) as f64) / denom).exp() as f32)
        .collect();
    let sum: f32 = weights.iter().sum();
    for w in &mut weights {
        *w /= sum;
    }
    weights
}

/// Separable Gaussian blur: horizontal pass then vertical pass, both with
/// clamped borders. Alpha passes through from the source.
pub fn gaussian_blur(src: &RasterBuffer, radius: f32) -> RasterBuffer {
    let kernel = gaussian_kernel(radius);
    if kernel.len() == 1 {
        return src.clone();
    }
    let half = (kernel.len() / 2) as isize;
    let w = src.width();

    let mut horizontal = src.clone();
    horizontal
        .data_mut()
        .par_chunks_mut(w * 4)
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..w {
                let mut acc = [0.0f32; 3];
                for (k, weight) in kernel.iter().enumerate() {
                    let sx = x as isize + k as isize - half;
                    let px = src.sample_clamped(sx, y as isize);
                    acc[0] += px[0] as f32 * weight;
                    acc[1] += px[1] as f32 * weight;
                    acc[2] += px[2] as f32 * weight;
                }
                let i = x * 4;
                row[i] = acc[0].round().clamp(0.0, 255.0) as u8;
                row[i + 1] = acc[1].round().clamp(0.0, 255.0) as u8;
                row[i + 2] = acc[2].round().clamp(0.0, 255.0) as u8;
            }
        });

    let mut out = horizontal.clone();
    out.data_mut()
        .par_chunks_mut(w * 4)
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..w {
                let mut acc = [0.0f32; 3];
                for (k, weight) in kernel.iter().enumerate() {
                    let sy = y as isize + k as isize - half;
                    let px = horizontal.sample_clamped(x as isize, sy);
                    acc[0] += px[0] as f32 * weight;
                    acc[1] += px[1] as f32 * weight;
                    acc[2] += px[2] as f32 * weight;
                }
                let i = x * 4;
                row[i] = acc[0].round().clamp(0.0, 255.0) as u8;
                row[i + 1] = acc[1].round().clamp(0.0, 255.0) as u8;
                row[i + 2] = acc[2].round().clamp(0.0, 255.0) as u8;
            }
        });
    out
}

/// Edge-preserving blur: neighbor weights are the product of a spatial
/// Gaussian (cut off at `radius`) and a color-similarity Gaussian over the
/// summed absolute channel difference vs `color_threshold`, normalized by
/// the weights actually used.
pub fn bilateral_blur(src: &RasterBuffer, radius: f32, color_threshold: f32) -> RasterBuffer {
    if radius <= 0.0 || !radius.is_finite() {
        return src.clone();
    }
    let half = radius.ceil() as isize;
    let sigma_s = (radius / 3.0).max(1e-3);
    let spatial_denom = 2.0 * sigma_s * sigma_s;
    let threshold = color_threshold.max(1.0);
    let color_denom = 2.0 * threshold * threshold;
    let w = src.width();
    let r2 = radius * radius;

    let mut out = src.clone();
    out.data_mut()
        .par_chunks_mut(w * 4)
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..w {
                let center = src.pixel(x, y);
                let mut acc = [0.0f32; 3];
                let mut weight_sum = 0.0f32;
                for dy in -half..=half {
                    for dx in -half..=half {
                        let dist2 = (dx * dx + dy * dy) as f32;
                        if dist2 > r2 {
                            continue;
                        }
                        let px = src.sample_clamped(x as isize + dx, y as isize + dy);
                        let diff = (px[0] as f32 - center[0] as f32).abs()
                            + (px[1] as f32 - center[1] as f32).abs()
                            + (px[2] as f32 - center[2] as f32).abs();
                        let weight = (-dist2 / spatial_denom).exp()
                            * (-(diff * diff) / color_denom).exp();
                        acc[0] += px[0] as f32 * weight;
                        acc[1] += px[1] as f32 * weight;
                        acc[2] += px[2] as f32 * weight;
                        weight_sum += weight;
                    }
                }
                let i = x * 4;
                if weight_sum > 0.0 {
                    row[i] = (acc[0] / weight_sum).round().clamp(0.0, 255.0) as u8;
                    row[i + 1] = (acc[1] / weight_sum).round().clamp(0.0, 255.0) as u8;
                    row[i + 2] = (acc[2] / weight_sum).round().clamp(0.0, 255.0) as u8;
                }
            }
        });
    out
}

/// Glow: luminance-threshold the buffer at `1 − intensity·0.5`, zero the
/// rest, blur the surviving highlights, screen the result back onto the
/// original.
pub fn bloom(src: &RasterBuffer, intensity: f32) -> RasterBuffer {
    let intensity = intensity.clamp(0.0, 1.0);
    let threshold = 1.0 - intensity * 0.5;

    let mut bright = src.clone();
    for px in bright.data_mut().chunks_exact_mut(4) {
        if luminance(px[0], px[1], px[2]) < threshold {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
        }
    }

    let blurred = gaussian_blur(&bright, 2.0 + intensity * 6.0);

    let mut out = src.clone();
    for (dst, glow) in out
        .data_mut()
        .chunks_exact_mut(4)
        .zip(blurred.data().chunks_exact(4))
    {
        dst[0] = crate::compose::screen_u8(dst[0], glow[0]);
        dst[1] = crate::compose::screen_u8(dst[1], glow[1]);
        dst[2] = crate::compose::screen_u8(dst[2], glow[2]);
    }
    out
}
