//! Browser bindings: each exported type mounts one surface on an existing
//! element and owns its frame loop and listeners until `destroy()` or drop.

use wasm_bindgen::prelude::*;

mod clock;
mod context;
mod error;
mod garden;
mod highlight;
mod lifecycle;
mod mount;
mod petals;
mod tilt;
mod trail;

pub use garden::ZenGarden;
pub use highlight::Spotlight;
pub use petals::PetalField;
pub use tilt::TiltCard;
pub use trail::ParticleTrail;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let level = if cfg!(debug_assertions) {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    if let Err(err) = console_log::init_with_level(level) {
        web_sys::console::warn_1(&format!("logger already set: {err}").into());
    }
    log::debug!("sumi wasm loaded");
}

/// Raise or lower log verbosity at runtime (`"trace"` .. `"error"`).
#[wasm_bindgen]
pub fn set_log_level(level: &str) {
    match level.parse::<log::LevelFilter>() {
        Ok(filter) => log::set_max_level(filter),
        Err(_) => log::warn!("unknown log level `{level}`"),
    }
}
