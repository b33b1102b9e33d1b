// Errors surfaced by the particle field and its browser binding

use std::fmt;
use wasm_bindgen::JsValue;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    // The canvas would not hand out a 2D context
    SurfaceUnavailable(String),
    // Theme name outside the known set
    UnknownTheme(String),
    // A drawing call on the surface failed mid-frame
    Render(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::SurfaceUnavailable(reason) => {
                write!(f, "rendering surface unavailable: {}", reason)
            }
            EngineError::UnknownTheme(name) => {
                write!(f, "unknown theme '{}', expected 'light' or 'dark'", name)
            }
            EngineError::Render(reason) => write!(f, "failed to render frame: {}", reason),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<EngineError> for JsValue {
    fn from(err: EngineError) -> JsValue {
        js_sys::Error::new(&err.to_string()).into()
    }
}

// Describes a JS exception thrown by a web-sys call
pub fn describe_js(value: &JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{:?}", value))
}
