// Owned context for one mounted particle field: the drawing surface, the
// current dimensions and particles, the palette for the next spawn and the
// frame scheduler. Resize and theme signals land here.

use crate::color::Theme;
use crate::config::FieldConfig;
use crate::error::EngineError;
use crate::particle::Particle;
use crate::population::seed_population;
use crate::renderer::{Renderer, Surface};
use crate::scheduler::{FrameOutcome, FrameScheduler, SchedulerState};
use crate::simulation;
use crate::utils::Timer;
use rand::Rng;

// Dimensions and particles are replaced together so a frame never sees a
// new size with the old population or the other way round
#[derive(Clone, Debug, PartialEq)]
struct FieldState {
    width: f64,
    height: f64,
    particles: Vec<Particle>,
}

impl FieldState {
    fn seed<R: Rng + ?Sized>(
        rng: &mut R,
        width: u32,
        height: u32,
        theme: Theme,
        config: &FieldConfig,
    ) -> FieldState {
        let (width, height) = (width as f64, height as f64);
        FieldState {
            width,
            height,
            particles: seed_population(rng, width, height, theme.palette(), config),
        }
    }
}

pub struct FieldContext<S: Surface> {
    surface: Option<S>,
    config: FieldConfig,
    renderer: Renderer,
    theme: Theme,
    state: FieldState,
    scheduler: FrameScheduler,
}

impl<S: Surface> FieldContext<S> {
    pub fn mount<R: Rng + ?Sized>(
        mut surface: S,
        width: u32,
        height: u32,
        theme: Theme,
        config: FieldConfig,
        rng: &mut R,
    ) -> Self {
        surface.resize(width, height);
        let state = FieldState::seed(rng, width, height, theme, &config);
        let mut scheduler = FrameScheduler::new();
        scheduler.start();
        log!(
            "particle field mounted at {}x{} ({} theme, {} particles)",
            width,
            height,
            theme.name(),
            state.particles.len()
        );
        FieldContext {
            surface: Some(surface),
            config,
            renderer: Renderer::new(config),
            theme,
            state,
            scheduler,
        }
    }

    pub fn resize<R: Rng + ?Sized>(&mut self, width: u32, height: u32, rng: &mut R) {
        let surface = match self.surface.as_mut() {
            Some(surface) => surface,
            None => return,
        };
        surface.resize(width, height);
        self.state = FieldState::seed(rng, width, height, self.theme, &self.config);
        log!(
            "particle field resized to {}x{} ({} particles)",
            width,
            height,
            self.state.particles.len()
        );
    }

    // Only particles spawned by the next resize pick up the new palette
    pub fn set_theme(&mut self, theme: Theme) {
        if theme != self.theme {
            log!("particle theme switched to {}", theme.name());
        }
        self.theme = theme;
    }

    pub fn frame(&mut self) -> Result<FrameOutcome, EngineError> {
        let FieldContext {
            surface,
            config,
            renderer,
            state,
            scheduler,
            ..
        } = self;
        scheduler.run_frame(|| {
            let surface = surface.as_mut().ok_or_else(|| {
                EngineError::SurfaceUnavailable("surface already released".to_owned())
            })?;
            {
                let _timer = Timer::new("simulation step", config.profile_frames);
                simulation::step(&mut state.particles, state.width, state.height);
            }
            renderer.render_frame(surface, &state.particles, state.width, state.height)
        })
    }

    // Cancels the scheduler and hands the surface back. Safe to call twice.
    pub fn teardown(&mut self) -> Option<S> {
        self.scheduler.cancel();
        self.state.particles.clear();
        let surface = self.surface.take();
        if surface.is_some() {
            log!("particle field torn down");
        }
        surface
    }

    pub fn particles(&self) -> &[Particle] {
        &self.state.particles
    }

    pub fn dimensions(&self) -> (f64, f64) {
        (self.state.width, self.state.height)
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn scheduler_state(&self) -> SchedulerState {
        self.scheduler.state()
    }

    pub fn frames(&self) -> u64 {
        self.scheduler.frames()
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }
}
