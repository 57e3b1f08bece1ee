mod catalog;

use crate::error::{input_error, EngineError};
use crate::raster::RasterBuffer;
use crate::rng::RandomSource;

/// The creative-transformation catalog. Every entry maps an input raster,
/// an intensity in [0,1] and a randomness source to a new raster of
/// identical dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectKind {
    Neon,
    Vortex,
    Kaleidoscope,
    Crystallize,
    Watercolor,
    Pixelate,
    Galaxy,
    DreamWave,
    Prism,
    Aurora,
}

impl EffectKind {
    pub const fn all() -> [Self; 10] {
        [
            Self::Neon,
            Self::Vortex,
            Self::Kaleidoscope,
            Self::Crystallize,
            Self::Watercolor,
            Self::Pixelate,
            Self::Galaxy,
            Self::DreamWave,
            Self::Prism,
            Self::Aurora,
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Neon => "Neon Edges",
            Self::Vortex => "Vortex",
            Self::Kaleidoscope => "Kaleidoscope",
            Self::Crystallize => "Crystallize",
            Self::Watercolor => "Watercolor",
            Self::Pixelate => "Pixelate",
            Self::Galaxy => "Galaxy Swirl",
            Self::DreamWave => "Dream Wave",
            Self::Prism => "Prism",
            Self::Aurora => "Aurora",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Neon => "Traces luminous edge lines over a darkened scene",
            Self::Vortex => "Spirals the scene around its center",
            Self::Kaleidoscope => "Folds the scene into mirrored wedges",
            Self::Crystallize => "Shatters the scene into flat-shaded facets",
            Self::Watercolor => "Softens the scene into layered washes",
            Self::Pixelate => "Rebuilds the scene from coarse blocks",
            Self::Galaxy => "Wraps the scene in spiral arms and starlight",
            Self::DreamWave => "Ripples the scene with drifting sine shifts",
            Self::Prism => "Splits the channels into a chromatic fringe",
            Self::Aurora => "Drapes shimmering ribbons across the sky",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let n = name.trim().to_ascii_lowercase();
        Self::all().into_iter().find(|k| {
            k.label().to_ascii_lowercase() == n
                || k.label().to_ascii_lowercase().replace(' ', "-") == n
        })
    }
}

/// A caller's request for one transformation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EffectRequest {
    pub kind: EffectKind,
    pub intensity: f32,
}

/// Descriptive metadata returned alongside a transformed buffer; the buffer
/// itself travels separately.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EffectResult {
    pub kind: EffectKind,
    pub name: &'static str,
    pub description: &'static str,
    pub intensity: f32,
}

impl EffectResult {
    pub fn for_request(request: EffectRequest) -> Self {
        Self {
            kind: request.kind,
            name: request.kind.label(),
            description: request.kind.description(),
            intensity: request.intensity,
        }
    }
}

/// Random-catalog selection policy: uniform over the catalog, intensity
/// uniform in [0.3, 1.0].
pub fn pick_random(rng: &mut dyn RandomSource) -> EffectRequest {
    let all = EffectKind::all();
    EffectRequest {
        kind: all[rng.next_index(all.len())],
        intensity: rng.next_range(0.3, 1.0),
    }
}

/// Run one catalog entry. The input is read-only; the output is a fresh
/// buffer of identical dimensions.
pub fn apply(
    kind: EffectKind,
    src: &RasterBuffer,
    intensity: f32,
    rng: &mut dyn RandomSource,
) -> Result<RasterBuffer, EngineError> {
    if !intensity.is_finite() {
        return Err(input_error("intensity", "must be finite"));
    }
    let intensity = intensity.clamp(0.0, 1.0);
    match kind {
        EffectKind::Neon => catalog::neon(src, intensity, rng),
        EffectKind::Vortex => catalog::vortex(src, intensity, rng),
        EffectKind::Kaleidoscope => catalog::kaleidoscope(src, intensity, rng),
        EffectKind::Crystallize => catalog::crystallize(src, intensity, rng),
        EffectKind::Watercolor => catalog::watercolor(src, intensity, rng),
        EffectKind::Pixelate => catalog::pixelate(src, intensity, rng),
        EffectKind::Galaxy => catalog::galaxy(src, intensity, rng),
        EffectKind::DreamWave => catalog::dream_wave(src, intensity, rng),
        EffectKind::Prism => catalog::prism(src, intensity, rng),
        EffectKind::Aurora => catalog::aurora(src, intensity, rng),
    }
}
