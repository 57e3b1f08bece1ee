//! Generative landscape engine: Perlin-noise terrain synthesis plus a
//! catalog of creative raster transformations over RGBA byte buffers.
//! Collaborators supply a palette, a sentiment label, an intensity and a
//! randomness source; they get back heightmaps, normal maps, transformed
//! rasters and effect metadata.

pub mod app;
pub mod color;
pub mod compose;
pub mod config;
pub mod effects;
pub mod error;
pub mod noise;
pub mod raster;
pub mod render;
pub mod rng;
pub mod scene;
pub mod session;
pub mod terrain;

pub use color::{Color, ScenePalette, Sentiment};
pub use effects::{EffectKind, EffectRequest, EffectResult};
pub use error::EngineError;
pub use noise::{domain_warped_noise, fbm3, noise3, ridged_multifractal, NoiseField};
pub use raster::RasterBuffer;
pub use rng::{RandomSource, SequenceRandom, SystemRandom};
pub use session::{apply_effect, apply_random_effect, PreviewSession, PREVIEW_DURATION};
pub use terrain::{generate_terrain, terrain_normals, Heightmap, NormalMap, TerrainOptions};
