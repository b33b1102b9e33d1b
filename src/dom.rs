// Helper functions for dealing with the page: window lookup, viewport size,
// the fixed overlay canvas and the window resize listener

use crate::error::EngineError;
use crate::lifecycle::FieldContext;
use crate::renderer::CanvasSurface;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlCanvasElement, Window};

pub type SharedField = Rc<RefCell<FieldContext<CanvasSurface>>>;

pub fn window() -> Result<Window, EngineError> {
    web_sys::window()
        .ok_or_else(|| EngineError::SurfaceUnavailable("no global `window`".to_owned()))
}

pub fn viewport_size(window: &Window) -> (u32, u32) {
    let measure = |value: Result<JsValue, JsValue>| {
        value
            .ok()
            .and_then(|v| v.as_f64())
            .filter(|v| v.is_finite() && *v > 0.0)
            .map(|v| v as u32)
            .unwrap_or(0)
    };
    (measure(window.inner_width()), measure(window.inner_height()))
}

// Canvas created for `attach`. Taken back out of the page when dropped, so
// a failed or idle mount does not leave it behind.
pub struct OverlayCanvas {
    canvas: HtmlCanvasElement,
}

impl OverlayCanvas {
    pub fn create(document: &Document, opacity: f64) -> Result<Self, JsValue> {
        let canvas = create_overlay_canvas(document, opacity)?;
        Ok(OverlayCanvas { canvas })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

impl Drop for OverlayCanvas {
    fn drop(&mut self) {
        self.canvas.remove();
    }
}

// Full-viewport canvas behind the page content that never takes input
fn create_overlay_canvas(
    document: &Document,
    opacity: f64,
) -> Result<HtmlCanvasElement, JsValue> {
    let canvas = document
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| EngineError::SurfaceUnavailable("failed to create canvas".to_owned()))?;
    let style = canvas.style();
    style.set_property("position", "fixed")?;
    style.set_property("inset", "0")?;
    style.set_property("pointer-events", "none")?;
    style.set_property("z-index", "0")?;
    style.set_property("opacity", &opacity.to_string())?;

    let body = document
        .body()
        .ok_or_else(|| EngineError::SurfaceUnavailable("document has no body".to_owned()))?;
    body.append_child(&canvas)?;
    Ok(canvas)
}

// Re-seeds the field from the window size on every `resize` event.
// Removes itself from the window when dropped.
pub struct ResizeListener {
    window: Window,
    callback: Closure<dyn FnMut()>,
}

impl ResizeListener {
    pub fn install(window: &Window, field: SharedField) -> Result<Self, JsValue> {
        let measured = window.clone();
        let callback = Closure::wrap(Box::new(move || {
            let (width, height) = viewport_size(&measured);
            field
                .borrow_mut()
                .resize(width, height, &mut rand::thread_rng());
        }) as Box<dyn FnMut()>);
        window.add_event_listener_with_callback("resize", callback.as_ref().unchecked_ref())?;
        Ok(ResizeListener {
            window: window.clone(),
            callback,
        })
    }
}

impl Drop for ResizeListener {
    fn drop(&mut self) {
        let _ = self
            .window
            .remove_event_listener_with_callback("resize", self.callback.as_ref().unchecked_ref());
    }
}
