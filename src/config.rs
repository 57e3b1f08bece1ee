use clap::{Parser, ValueEnum};

use crate::color::Sentiment;
use crate::effects::EffectKind;

#[derive(Parser, Debug, Clone)]
#[command(name = "dreamscape", version, about = "Sentiment-driven generative landscape renderer with creative raster effects")]
pub struct Config {
    /// Raster width in pixels; 0 means fit the terminal.
    #[arg(long, default_value_t = 0)]
    pub width: usize,

    /// Raster height in pixels; 0 means fit the terminal.
    #[arg(long, default_value_t = 0)]
    pub height: usize,

    #[arg(long, default_value_t = 0.0)]
    pub seed: f64,

    #[arg(long, default_value_t = 0.08)]
    pub scale: f64,

    #[arg(long, default_value_t = 4)]
    pub octaves: u32,

    #[arg(long, default_value_t = 0.5)]
    pub persistence: f64,

    #[arg(long, default_value_t = 2.0)]
    pub lacunarity: f64,

    #[arg(long, default_value_t = 1.0)]
    pub elevation: f64,

    #[arg(long, default_value_t = false)]
    pub ridged: bool,

    #[arg(long, default_value_t = false)]
    pub warp: bool,

    #[arg(long, value_enum, default_value_t = SentimentArg::Calm)]
    pub sentiment: SentimentArg,

    /// Sky color (#rrggbb, hsl(..), rgb(..) or rgba(..)).
    #[arg(long)]
    pub sky: Option<String>,

    /// Terrain color.
    #[arg(long)]
    pub terrain: Option<String>,

    /// Accent color for ridges and peaks.
    #[arg(long)]
    pub accent: Option<String>,

    #[arg(long, value_enum)]
    pub effect: Option<EffectArg>,

    #[arg(long, default_value_t = 0.7)]
    pub effect_intensity: f32,

    /// Pick a random catalog entry instead of --effect.
    #[arg(long, default_value_t = false)]
    pub random_effect: bool,

    /// Animate a time-boxed preview instead of committing the effect.
    #[arg(long, default_value_t = false)]
    pub preview: bool,

    #[arg(long, default_value_t = 30)]
    pub fps: u32,

    #[arg(long, default_value_t = false)]
    pub list_effects: bool,

    /// Seed for the effect randomness source (system entropy when unset).
    #[arg(long)]
    pub rng_seed: Option<u64>,

    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub sync_updates: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SentimentArg {
    Bright,
    Calm,
    Somber,
}

impl SentimentArg {
    pub fn to_sentiment(self) -> Sentiment {
        match self {
            Self::Bright => Sentiment::Bright,
            Self::Calm => Sentiment::Calm,
            Self::Somber => Sentiment::Somber,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EffectArg {
    Neon,
    Vortex,
    Kaleidoscope,
    Crystallize,
    Watercolor,
    Pixelate,
    Galaxy,
    #[value(name = "dream-wave", alias = "dreamwave", alias = "wave")]
    DreamWave,
    Prism,
    Aurora,
}

impl EffectArg {
    pub fn to_kind(self) -> EffectKind {
        match self {
            Self::Neon => EffectKind::Neon,
            Self::Vortex => EffectKind::Vortex,
            Self::Kaleidoscope => EffectKind::Kaleidoscope,
            Self::Crystallize => EffectKind::Crystallize,
            Self::Watercolor => EffectKind::Watercolor,
            Self::Pixelate => EffectKind::Pixelate,
            Self::Galaxy => EffectKind::Galaxy,
            Self::DreamWave => EffectKind::DreamWave,
            Self::Prism => EffectKind::Prism,
            Self::Aurora => EffectKind::Aurora,
        }
    }
}
