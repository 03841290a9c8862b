//! Browser-side helpers for the causal tree bindings
//!
//! `console_log!` is how the bindings report rejected calls; the panic hook
//! is opt-in from JavaScript via `initPanicHook`.

use wasm_bindgen::prelude::*;

/// Route Rust panics to `console.error` with a readable message
#[wasm_bindgen(js_name = initPanicHook)]
pub fn init_panic_hook() {
    #[cfg(feature = "wasm")]
    console_error_panic_hook::set_once();
}

/// `console.log`, used by rejected-call reporting
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    pub fn log(s: &str);
}

/// Macro for console.log from Rust
#[macro_export]
macro_rules! console_log {
    ($($t:tt)*) => {
        $crate::wasm::utils::log(&format_args!($($t)*).to_string())
    }
}
