// Console helpers: panic hook, logging macros and a scoped timer.
// Browser imports panic on native targets, so everything here falls back to
// stderr (or does nothing) when not compiled for wasm32.

pub fn set_panic_hook() {
    // When the `console_error_panic_hook` feature is enabled, we can call the
    // `set_panic_hook` function at least once during initialization, and then
    // we will get better error messages if our code ever panics.
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

pub fn console_log(message: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::log_1(&message.into());
    #[cfg(not(target_arch = "wasm32"))]
    eprintln!("{}", message);
}

pub fn console_warn(message: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::warn_1(&message.into());
    #[cfg(not(target_arch = "wasm32"))]
    eprintln!("warning: {}", message);
}

pub fn console_error(message: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::error_1(&message.into());
    #[cfg(not(target_arch = "wasm32"))]
    eprintln!("error: {}", message);
}

macro_rules! log {
    ( $( $t:tt )* ) => {
        $crate::utils::console_log(&format!( $( $t )* ))
    }
}

macro_rules! warn {
    ( $( $t:tt )* ) => {
        $crate::utils::console_warn(&format!( $( $t )* ))
    }
}

// Wraps console.time / console.timeEnd, only active when `enabled` is set
pub struct Timer<'a> {
    name: &'a str,
    enabled: bool,
}

impl<'a> Timer<'a> {
    pub fn new(name: &'a str, enabled: bool) -> Timer<'a> {
        #[cfg(target_arch = "wasm32")]
        {
            if enabled {
                web_sys::console::time_with_label(name);
            }
        }
        Timer { name, enabled }
    }
}

impl<'a> Drop for Timer<'a> {
    fn drop(&mut self) {
        #[cfg(target_arch = "wasm32")]
        {
            if self.enabled {
                web_sys::console::time_end_with_label(self.name);
            }
        }
        #[cfg(not(target_arch = "wasm32"))]
        let _ = (self.name, self.enabled);
    }
}
