use std::io::Write;
use std::time::{Duration, Instant};

use anyhow::Result;

use crate::color::ScenePalette;
use crate::config::Config;
use crate::effects::EffectKind;
use crate::raster::RasterBuffer;
use crate::render::{Frame, HalfBlockRenderer, Renderer};
use crate::rng::SystemRandom;
use crate::scene::shade_scene;
use crate::session::{self, PreviewSession, TickOutcome};
use crate::terrain::{generate_terrain, terrain_normals, TerrainOptions};

pub fn run(cfg: Config) -> Result<()> {
    if cfg.list_effects {
        for kind in EffectKind::all() {
            println!("{:<14} {}", kind.label(), kind.description());
        }
        return Ok(());
    }

    let (width, height) = resolve_dimensions(&cfg)?;

    let options = TerrainOptions {
        scale: cfg.scale,
        octaves: cfg.octaves,
        persistence: cfg.persistence,
        lacunarity: cfg.lacunarity,
        elevation: cfg.elevation,
        seed: cfg.seed,
        warp: cfg.warp,
        ridged: cfg.ridged,
    };
    let heightmap = generate_terrain(width, height, &options)?;
    let normals = terrain_normals(&heightmap);
    let palette = resolve_palette(&cfg)?;
    let mut surface = shade_scene(&heightmap, &normals, &palette, cfg.sentiment.to_sentiment())?;

    let mut rng = match cfg.rng_seed {
        Some(seed) => SystemRandom::with_seed(seed),
        None => SystemRandom::new(),
    };

    let mut caption = format!(
        "dreamscape | {}x{} | seed {} | {}",
        width,
        height,
        cfg.seed,
        cfg.sentiment.to_sentiment().label()
    );

    if cfg.preview {
        return run_preview(cfg, surface, &mut rng);
    }

    if let Some(effect) = cfg.effect {
        let kind = effect.to_kind();
        surface = session::apply_effect(&surface, kind, cfg.effect_intensity, &mut rng)?;
        caption = format!(
            "{caption} | {} ({:.2}) - {}",
            kind.label(),
            cfg.effect_intensity.clamp(0.0, 1.0),
            kind.description()
        );
    } else if cfg.random_effect {
        let (transformed, info) = session::apply_random_effect(&surface, &mut rng)?;
        surface = transformed;
        caption = format!(
            "{caption} | {} ({:.2}) - {}",
            info.name, info.intensity, info.description
        );
    }

    paint(&surface, &caption, cfg.sync_updates)?;
    println!();
    Ok(())
}

fn run_preview(cfg: Config, mut surface: RasterBuffer, rng: &mut SystemRandom) -> Result<()> {
    let mut session = PreviewSession::new();
    let info = session.begin_random(Some(&mut surface), rng, Instant::now())?;
    let caption = format!(
        "preview | {} ({:.2}) - {}",
        info.name, info.intensity, info.description
    );

    let frame_time = Duration::from_secs_f32(1.0 / cfg.fps.clamp(1, 120) as f32);
    loop {
        match session.tick(&mut surface, Instant::now(), rng)? {
            TickOutcome::Finished | TickOutcome::Idle => break,
            TickOutcome::Frame { .. } => {
                paint(&surface, &caption, cfg.sync_updates)?;
                std::thread::sleep(frame_time);
            }
        }
    }

    paint(&surface, "preview finished (surface restored)", cfg.sync_updates)?;
    println!();
    Ok(())
}

fn paint(surface: &RasterBuffer, caption: &str, sync_updates: bool) -> Result<()> {
    let mut renderer = HalfBlockRenderer::new();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let frame = Frame {
        term_cols: surface.width() as u16,
        visual_rows: (surface.height() / 2) as u16,
        buffer: surface,
        caption,
        sync_updates,
    };
    renderer.render(&frame, &mut out)?;
    out.flush()?;
    Ok(())
}

fn resolve_dimensions(cfg: &Config) -> Result<(usize, usize)> {
    let (mut width, mut height) = (cfg.width, cfg.height);
    if width == 0 || height == 0 {
        let (cols, rows) = crossterm::terminal::size().unwrap_or((100, 34));
        if width == 0 {
            width = cols.max(8) as usize;
        }
        if height == 0 {
            height = (rows.saturating_sub(2).max(4) as usize) * 2;
        }
    }
    // The half-block renderer packs two pixel rows per cell.
    height &= !1;
    Ok((width.max(2), height.max(2)))
}

fn resolve_palette(cfg: &Config) -> Result<ScenePalette> {
    let mut palette = ScenePalette::default();
    if let Some(sky) = &cfg.sky {
        palette.sky = crate::color::Color::parse(sky)?;
    }
    if let Some(terrain) = &cfg.terrain {
        palette.terrain = crate::color::Color::parse(terrain)?;
    }
    if let Some(accent) = &cfg.accent {
        palette.accent = crate::color::Color::parse(accent)?;
    }
    Ok(palette)
}
