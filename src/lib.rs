#[macro_use]
mod utils;
pub mod animation;
pub mod color;
pub mod config;
pub mod dom;
pub mod error;
pub mod lifecycle;
pub mod particle;
pub mod population;
pub mod proximity;
pub mod renderer;
pub mod scheduler;
pub mod simulation;

use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

use animation::AnimationLoop;
pub use color::{Color, Palette, Theme};
pub use config::FieldConfig;
pub use dom::OverlayCanvas;
use dom::{ResizeListener, SharedField};
pub use error::EngineError;
pub use lifecycle::FieldContext;
pub use particle::Particle;
use renderer::CanvasSurface;
pub use renderer::{Renderer, Surface};
pub use scheduler::{FrameOutcome, FrameScheduler, SchedulerState};

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen]
pub fn initialize() {
    utils::set_panic_hook();
}

// Handle the page holds on to for one mounted background. Dropping it (or
// calling `free()` from JS) tears everything down.
#[wasm_bindgen]
pub struct ParticleBackground {
    theme: Theme,
    field: Option<SharedField>,
    animation: Option<AnimationLoop>,
    resize_listener: Option<ResizeListener>,
    overlay: Option<OverlayCanvas>,
    torn_down: bool,
}

#[wasm_bindgen]
impl ParticleBackground {
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, theme: &str) -> Result<ParticleBackground, JsValue> {
        let theme: Theme = theme.parse()?;
        ParticleBackground::mount(canvas, theme, FieldConfig::default(), None)
    }

    // Creates the fixed overlay canvas in <body> and mounts onto it
    pub fn attach(theme: &str) -> Result<ParticleBackground, JsValue> {
        let theme: Theme = theme.parse()?;
        let config = FieldConfig::default();
        let document = dom::window()?
            .document()
            .ok_or_else(|| EngineError::SurfaceUnavailable("no document".to_owned()))?;
        let overlay = OverlayCanvas::create(&document, config.overlay_opacity)?;
        ParticleBackground::mount_overlay(overlay, theme, config)
    }

    pub fn set_theme(&mut self, theme: &str) -> Result<(), JsValue> {
        let theme: Theme = theme.parse()?;
        self.theme = theme;
        if let Some(field) = &self.field {
            field.borrow_mut().set_theme(theme);
        }
        Ok(())
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if let Some(field) = &self.field {
            field
                .borrow_mut()
                .resize(width, height, &mut rand::thread_rng());
        }
    }

    pub fn theme(&self) -> String {
        self.theme.name().to_owned()
    }

    pub fn particle_count(&self) -> usize {
        self.field
            .as_ref()
            .map(|field| field.borrow().particles().len())
            .unwrap_or(0)
    }

    pub fn frame_pending(&self) -> bool {
        self.animation
            .as_ref()
            .map(AnimationLoop::is_pending)
            .unwrap_or(false)
    }

    // "idle", "running" or "cancelled"
    pub fn state(&self) -> String {
        match &self.field {
            Some(field) => field.borrow().scheduler_state().name().to_owned(),
            None if self.torn_down => SchedulerState::Cancelled.name().to_owned(),
            None => SchedulerState::Idle.name().to_owned(),
        }
    }

    pub fn teardown(&mut self) {
        self.torn_down = true;
        if let Some(animation) = self.animation.take() {
            animation.stop();
        }
        self.resize_listener.take();
        if let Some(field) = self.field.take() {
            field.borrow_mut().teardown();
        }
        // dropping the overlay takes it out of the page
        self.overlay.take();
    }
}

impl ParticleBackground {
    // Mounts onto a canvas this handle owns; the canvas leaves the page on
    // teardown, and right away if mounting fails
    pub fn mount_overlay(
        overlay: OverlayCanvas,
        theme: Theme,
        config: FieldConfig,
    ) -> Result<ParticleBackground, JsValue> {
        let canvas = overlay.canvas().clone();
        ParticleBackground::mount(canvas, theme, config, Some(overlay))
    }

    fn idle(theme: Theme, overlay: Option<OverlayCanvas>) -> ParticleBackground {
        ParticleBackground {
            theme,
            field: None,
            animation: None,
            resize_listener: None,
            overlay,
            torn_down: false,
        }
    }

    fn mount(
        canvas: HtmlCanvasElement,
        theme: Theme,
        config: FieldConfig,
        overlay: Option<OverlayCanvas>,
    ) -> Result<ParticleBackground, JsValue> {
        let window = dom::window()?;
        let surface = match CanvasSurface::acquire(canvas) {
            Ok(surface) => surface,
            Err(err) => {
                warn!("{}; particle background stays idle", err);
                return Ok(ParticleBackground::idle(theme, overlay));
            }
        };
        let (width, height) = dom::viewport_size(&window);
        let field: SharedField = Rc::new(RefCell::new(FieldContext::mount(
            surface,
            width,
            height,
            theme,
            config,
            &mut rand::thread_rng(),
        )));

        // Dropping these on an early return removes the listener, the
        // pending frame and the overlay again
        let resize_listener = ResizeListener::install(&window, field.clone())?;
        let animation = AnimationLoop::start(&window, field.clone())?;

        Ok(ParticleBackground {
            theme,
            field: Some(field),
            animation: Some(animation),
            resize_listener: Some(resize_listener),
            overlay,
            torn_down: false,
        })
    }
}

impl Drop for ParticleBackground {
    fn drop(&mut self) {
        self.teardown();
    }
}
