use crate::color::{ScenePalette, Sentiment};
use crate::error::{input_error, EngineError};
use crate::raster::RasterBuffer;
use crate::terrain::{Heightmap, NormalMap};

// Elevation bands for palette interpolation.
const LOW_BAND: f32 = 0.35;
const MID_BAND: f32 = 0.62;
const HIGH_BAND: f32 = 0.85;

/// Shade a heightmap into a landscape raster: palette bands by elevation,
/// Lambert lighting from the normal map, sentiment biasing the exposure.
/// Deterministic; collaborators supply palette and sentiment.
pub fn shade_scene(
    heightmap: &Heightmap,
    normals: &NormalMap,
    palette: &ScenePalette,
    sentiment: Sentiment,
) -> Result<RasterBuffer, EngineError> {
    if normals.width() != heightmap.width() || normals.height() != heightmap.height() {
        return Err(input_error(
            "normals",
            "dimensions must match the heightmap",
        ));
    }
    let w = heightmap.width();
    let h = heightmap.height();

    let light = normalize([-0.45, -0.6, 0.75]);
    let (gain, saturation_keep) = match sentiment {
        Sentiment::Bright => (1.12, 1.0),
        Sentiment::Calm => (1.0, 0.92),
        Sentiment::Somber => (0.78, 0.8),
    };

    let low = palette.sky.to_rgba8();
    let mid = palette.terrain.to_rgba8();
    let high = palette.accent.to_rgba8();

    let mut out = RasterBuffer::new(w, h)?;
    for y in 0..h {
        for x in 0..w {
            let elevation = heightmap.get(x, y);
            let n = normals.get(x, y);
            let lambert =
                (n[0] * light[0] + n[1] * light[1] + n[2] * light[2]).clamp(0.0, 1.0);
            let base = band_color(elevation, low, mid, high);
            let shade = (0.35 + 0.65 * lambert) * gain;
            let gray = (base[0] as f32 + base[1] as f32 + base[2] as f32) / 3.0;
            let mut px = [0u8; 4];
            for c in 0..3 {
                let saturated = gray + (base[c] as f32 - gray) * saturation_keep;
                px[c] = (saturated * shade).clamp(0.0, 255.0) as u8;
            }
            px[3] = 255;
            out.set_pixel(x, y, px);
        }
    }
    Ok(out)
}

fn band_color(elevation: f32, low: [u8; 4], mid: [u8; 4], high: [u8; 4]) -> [u8; 3] {
    let white = [245u8, 247, 250, 255];
    match elevation {
        e if e < LOW_BAND => {
            let t = e / LOW_BAND;
            lerp_rgb(scale_rgb(low, 0.55), low, t)
        }
        e if e < MID_BAND => {
            let t = (e - LOW_BAND) / (MID_BAND - LOW_BAND);
            lerp_rgb(low, mid, t)
        }
        e if e < HIGH_BAND => {
            let t = (e - MID_BAND) / (HIGH_BAND - MID_BAND);
            lerp_rgb(mid, high, t)
        }
        e => {
            let t = ((e - HIGH_BAND) / (1.0 - HIGH_BAND)).clamp(0.0, 1.0);
            lerp_rgb(high, white, t)
        }
    }
}

fn scale_rgb(c: [u8; 4], k: f32) -> [u8; 4] {
    [
        (c[0] as f32 * k) as u8,
        (c[1] as f32 * k) as u8,
        (c[2] as f32 * k) as u8,
        c[3],
    ]
}

fn lerp_rgb(a: [u8; 4], b: [u8; 4], t: f32) -> [u8; 3] {
    let t = t.clamp(0.0, 1.0);
    [
        (a[0] as f32 + (b[0] as f32 - a[0] as f32) * t) as u8,
        (a[1] as f32 + (b[1] as f32 - a[1] as f32) * t) as u8,
        (a[2] as f32 + (b[2] as f32 - a[2] as f32) * t) as u8,
    ]
}

fn normalize(v: [f32; 3]) -> [f32; 3] {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt().max(1e-6);
    [v[0] / len, v[1] / len, v[2] / len]
}
