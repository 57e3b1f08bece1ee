use crate::error::{input_error, require_finite, EngineError};
use crate::noise::NoiseField;

/// Parameters for one terrain synthesis request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainOptions {
    pub scale: f64,
    pub octaves: u32,
    pub persistence: f64,
    pub lacunarity: f64,
    pub elevation: f64,
    /// Any finite float; applied as a coordinate offset into the noise domain.
    pub seed: f64,
    pub warp: bool,
    pub ridged: bool,
}

impl Default for TerrainOptions {
    fn default() -> Self {
        Self {
            scale: 0.1,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
            elevation: 1.0,
            seed: 0.0,
            warp: false,
            ridged: false,
        }
    }
}

impl TerrainOptions {
    pub fn validate(&self) -> Result<(), EngineError> {
        if require_finite("scale", self.scale)? <= 0.0 {
            return Err(input_error("scale", "must be greater than 0"));
        }
        if self.octaves == 0 {
            return Err(input_error("octaves", "must be at least 1"));
        }
        let p = require_finite("persistence", self.persistence)?;
        if !(p > 0.0 && p <= 1.0) {
            return Err(input_error("persistence", "must be in (0,1]"));
        }
        if require_finite("lacunarity", self.lacunarity)? < 1.0 {
            return Err(input_error("lacunarity", "must be at least 1"));
        }
        if require_finite("elevation", self.elevation)? < 0.0 {
            return Err(input_error("elevation", "must not be negative"));
        }
        require_finite("seed", self.seed)?;
        Ok(())
    }
}

/// Row-major grid of heights in [0, 1], dimensions fixed at creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Heightmap {
    width: usize,
    height: usize,
    cells: Vec<f32>,
}

impl Heightmap {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.cells[y * self.width + x]
    }

    /// Sample with coordinates clamped to the grid (no wrap-around).
    #[inline]
    pub fn get_clamped(&self, x: isize, y: isize) -> f32 {
        let cx = x.clamp(0, self.width as isize - 1) as usize;
        let cy = y.clamp(0, self.height as isize - 1) as usize;
        self.get(cx, cy)
    }

    pub fn cells(&self) -> &[f32] {
        &self.cells
    }
}

/// Per-cell unit normals, same dimensions as the source heightmap.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalMap {
    width: usize,
    height: usize,
    cells: Vec<[f32; 3]>,
}

impl NormalMap {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> [f32; 3] {
        self.cells[y * self.width + x]
    }
}

// Fixed fractal shape constants for the ridged and warped strategies; the
// per-request knobs stay in TerrainOptions.
const RIDGED_GAIN: f64 = 2.0;
const WARP_STRENGTH: f64 = 1.5;

/// Synthesize a heightmap over the process-constant noise field.
pub fn generate_terrain(
    width: usize,
    height: usize,
    options: &TerrainOptions,
) -> Result<Heightmap, EngineError> {
    static FIELD: NoiseField = NoiseField::new();
    generate_terrain_with(&FIELD, width, height, options)
}

/// Synthesize a heightmap over a caller-supplied noise field.
///
/// Strategy precedence: ridged > warp > plain fBm; exactly one applies.
pub fn generate_terrain_with(
    field: &NoiseField,
    width: usize,
    height: usize,
    options: &TerrainOptions,
) -> Result<Heightmap, EngineError> {
    if width == 0 {
        return Err(input_error("width", "must be greater than 0"));
    }
    if height == 0 {
        return Err(input_error("height", "must be greater than 0"));
    }
    options.validate()?;

    let z = options.seed * 0.1;
    let mut cells = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let nx = x as f64 * options.scale + options.seed;
            let ny = y as f64 * options.scale + options.seed;
            let v = if options.ridged {
                field.ridged_multifractal(
                    nx,
                    ny,
                    z,
                    options.octaves,
                    options.persistence,
                    options.lacunarity,
                    RIDGED_GAIN,
                )?
            } else if options.warp {
                field.domain_warped_noise(nx, ny, z, WARP_STRENGTH)
            } else {
                field.fbm3(nx, ny, z, options.octaves, options.persistence, options.lacunarity)?
            };
            let h = (v + 1.0) * 0.5 * options.elevation;
            cells.push(h.clamp(0.0, 1.0) as f32);
        }
    }

    Ok(Heightmap {
        width,
        height,
        cells,
    })
}

/// Per-cell normals from central differences, clamping to the cell itself at
/// grid borders (no wrap-around).
pub fn terrain_normals(heightmap: &Heightmap) -> NormalMap {
    let width = heightmap.width();
    let height = heightmap.height();
    let mut cells = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let xi = x as isize;
            let yi = y as isize;
            let left = heightmap.get_clamped(xi - 1, yi);
            let right = heightmap.get_clamped(xi + 1, yi);
            let top = heightmap.get_clamped(xi, yi - 1);
            let bottom = heightmap.get_clamped(xi, yi + 1);
            let dz_dx = (right - left) * 0.5;
            let dz_dy = (bottom - top) * 0.5;
            cells.push(normalize([-dz_dx, -dz_dy, 1.0]));
        }
    }
    NormalMap {
        width,
        height,
        cells,
    }
}

#[inline]
fn normalize(v: [f32; 3]) -> [f32; 3] {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if len == 0.0 || !len.is_finite() {
        return [0.0, 0.0, 1.0];
    }
    [v[0] / len, v[1] / len, v[2] / len]
}
