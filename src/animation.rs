// requestAnimationFrame loop driving the field. Each callback runs one
// scheduled frame and asks for the next one only if the frame was rendered,
// so a cancelled field stops the loop even when a request was in flight.

use crate::dom::SharedField;
use crate::scheduler::FrameOutcome;
use crate::utils::console_error;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Window;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

pub struct AnimationLoop {
    window: Window,
    pending: Rc<Cell<Option<i32>>>,
    callback: FrameCallback,
}

impl AnimationLoop {
    pub fn start(window: &Window, field: SharedField) -> Result<Self, JsValue> {
        let pending = Rc::new(Cell::new(None));
        let callback: FrameCallback = Rc::new(RefCell::new(None));

        let next = callback.clone();
        let next_pending = pending.clone();
        let requester = window.clone();
        let closure = Closure::wrap(Box::new(move || {
            next_pending.set(None);
            let outcome = field.borrow_mut().frame();
            match outcome {
                Ok(FrameOutcome::Rendered) => {
                    if let Some(cb) = next.borrow().as_ref() {
                        match requester.request_animation_frame(cb.as_ref().unchecked_ref()) {
                            Ok(id) => next_pending.set(Some(id)),
                            Err(_) => console_error("failed to request next animation frame"),
                        }
                    }
                }
                Ok(FrameOutcome::Skipped) => {}
                Err(err) => {
                    // Not retried: the loop stays down and the host sees the error
                    console_error(&err.to_string());
                    wasm_bindgen::throw_val(err.into());
                }
            }
        }) as Box<dyn FnMut()>);

        let id = window.request_animation_frame(closure.as_ref().unchecked_ref())?;
        pending.set(Some(id));
        *callback.borrow_mut() = Some(closure);

        Ok(AnimationLoop {
            window: window.clone(),
            pending,
            callback,
        })
    }

    pub fn is_pending(&self) -> bool {
        self.pending.get().is_some()
    }

    // Cancels the in-flight request and drops the callback, which also
    // breaks the callback's reference to itself
    pub fn stop(&self) {
        if let Some(id) = self.pending.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
        self.callback.borrow_mut().take();
    }
}

impl Drop for AnimationLoop {
    fn drop(&mut self) {
        self.stop();
    }
}
