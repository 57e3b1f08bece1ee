use std::f32::consts::PI;
use std::time::{Duration, Instant};

use crate::effects::{self, EffectKind, EffectRequest, EffectResult};
use crate::error::{input_error, EngineError};
use crate::raster::RasterBuffer;
use crate::rng::RandomSource;

pub const PREVIEW_DURATION: Duration = Duration::from_millis(2000);

/// Persistent mode: pure one-shot transform. The input buffer is read-only;
/// the returned buffer becomes the caller's new permanent state.
pub fn apply_effect(
    src: &RasterBuffer,
    kind: EffectKind,
    intensity: f32,
    rng: &mut dyn RandomSource,
) -> Result<RasterBuffer, EngineError> {
    effects::apply(kind, src, intensity, rng)
}

/// Persistent mode with the random-catalog selection policy.
pub fn apply_random_effect(
    src: &RasterBuffer,
    rng: &mut dyn RandomSource,
) -> Result<(RasterBuffer, EffectResult), EngineError> {
    let request = effects::pick_random(rng);
    let out = effects::apply(request.kind, src, request.intensity, rng)?;
    Ok((out, EffectResult::for_request(request)))
}

/// Preview lifecycle. The snapshot taken at begin time is restored exactly
/// on completion, cancellation, or pass failure.
pub enum PreviewState {
    Idle,
    Running {
        started: Instant,
        snapshot: RasterBuffer,
        request: EffectRequest,
        frames: usize,
    },
    Completed,
    Cancelled,
}

pub enum TickOutcome {
    /// Nothing to animate.
    Idle,
    /// An intermediate frame was written to the surface.
    Frame { progress: f32 },
    /// The time box elapsed; the surface holds the restored snapshot.
    Finished,
}

/// Time-boxed preview animation driven by an external clock: the host calls
/// `tick` once per display refresh with its own notion of `now`. Only one
/// invocation owns a surface at a time; beginning a new preview cancels and
/// restores any in-flight one first.
pub struct PreviewSession {
    duration: Duration,
    state: PreviewState,
}

impl PreviewSession {
    pub fn new() -> Self {
        Self::with_duration(PREVIEW_DURATION)
    }

    pub fn with_duration(duration: Duration) -> Self {
        Self {
            duration: duration.max(Duration::from_millis(1)),
            state: PreviewState::Idle,
        }
    }

    pub fn state(&self) -> &PreviewState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, PreviewState::Running { .. })
    }

    /// Start a preview with the random-catalog selection policy.
    pub fn begin_random(
        &mut self,
        surface: Option<&mut RasterBuffer>,
        rng: &mut dyn RandomSource,
        now: Instant,
    ) -> Result<EffectResult, EngineError> {
        let request = effects::pick_random(rng);
        self.begin(surface, request, now)
    }

    /// Start a preview for an explicit request. `None` means the caller has
    /// no drawing surface; the request fails and nothing is touched.
    pub fn begin(
        &mut self,
        surface: Option<&mut RasterBuffer>,
        request: EffectRequest,
        now: Instant,
    ) -> Result<EffectResult, EngineError> {
        let Some(surface) = surface else {
            return Err(EngineError::SurfaceUnavailable(
                "preview requested with no surface attached".to_string(),
            ));
        };
        if !request.intensity.is_finite() {
            return Err(input_error("intensity", "must be finite"));
        }

        // Mutual exclusion per surface: restore any in-flight preview first.
        if let PreviewState::Running { snapshot, .. } =
            std::mem::replace(&mut self.state, PreviewState::Idle)
        {
            *surface = snapshot;
        }

        self.state = PreviewState::Running {
            started: now,
            snapshot: surface.clone(),
            request,
            frames: 0,
        };
        Ok(EffectResult::for_request(request))
    }

    /// Render one animation frame. Progress is `elapsed/duration` clamped to
    /// [0,1]; at progress ≥ 1 the snapshot is restored and the session
    /// completes. A failing pass restores the snapshot and surfaces the
    /// failure.
    pub fn tick(
        &mut self,
        surface: &mut RasterBuffer,
        now: Instant,
        rng: &mut dyn RandomSource,
    ) -> Result<TickOutcome, EngineError> {
        match std::mem::replace(&mut self.state, PreviewState::Idle) {
            PreviewState::Running {
                started,
                snapshot,
                request,
                frames,
            } => {
                let elapsed = now.saturating_duration_since(started);
                let progress =
                    (elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0);
                if progress >= 1.0 {
                    *surface = snapshot;
                    self.state = PreviewState::Completed;
                    return Ok(TickOutcome::Finished);
                }

                // Ease in and back out so the restore at the end has nothing
                // left to jump over.
                let ramp = (progress * PI).sin();
                match effects::apply(request.kind, &snapshot, request.intensity * ramp, rng) {
                    Ok(frame) => {
                        *surface = frame;
                        self.state = PreviewState::Running {
                            started,
                            snapshot,
                            request,
                            frames: frames + 1,
                        };
                        Ok(TickOutcome::Frame { progress })
                    }
                    Err(_) => {
                        *surface = snapshot;
                        self.state = PreviewState::Cancelled;
                        Err(EngineError::PassFailed {
                            effect: request.kind.label(),
                            pass: frames,
                        })
                    }
                }
            }
            other => {
                self.state = other;
                Ok(TickOutcome::Idle)
            }
        }
    }

    /// External cancellation (caller teardown): halts further frames and
    /// restores the snapshot. Returns whether a running preview was stopped.
    pub fn cancel(&mut self, surface: &mut RasterBuffer) -> bool {
        match std::mem::replace(&mut self.state, PreviewState::Cancelled) {
            PreviewState::Running { snapshot, .. } => {
                *surface = snapshot;
                true
            }
            other => {
                self.state = other;
                false
            }
        }
    }
}

impl Default for PreviewSession {
    fn default() -> Self {
        Self::new()
    }
}
