use wasm_bindgen::prelude::*;
use web_sys::window;

/// Rising-edge detector: reports `true` only when the observed value goes
/// from false to true
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeTrigger {
    last: bool,
}

impl EdgeTrigger {
    pub fn observe(&mut self, current: bool) -> bool {
        let fired = current && !self.last;
        self.last = current;
        fired
    }
}

/// Fire the confetti animation if a `window.confetti` function is loaded
pub fn celebrate() {
    let confetti = window().and_then(|win| {
        js_sys::Reflect::get(&win, &JsValue::from_str("confetti"))
            .ok()
            .filter(|func| func.is_function())
    });

    let Some(func) = confetti else {
        log::info!("Mint confirmed (confetti library not loaded)");
        return;
    };

    let options = js_sys::Object::new();
    for (key, value) in [("particleCount", 150.0), ("spread", 70.0)] {
        if let Err(e) = js_sys::Reflect::set(&options, &JsValue::from_str(key), &JsValue::from_f64(value)) {
            log::warn!("Failed to set confetti option {}: {:?}", key, e);
        }
    }

    let func = js_sys::Function::from(func);
    if let Err(e) = func.call1(&JsValue::NULL, &options) {
        log::warn!("Confetti failed: {:?}", e);
    }
}
