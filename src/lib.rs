//! Typeship core crate.
//!
//! Browser typing-defense game: enemy ships descend bearing words and the
//! player sinks them by typing the letters in sequence. Motherships answer
//! back with character-tagged projectiles that must be typed down mid-air.
//! `start_game()` wires the canvas shell and starts the frame loop; the word
//! datasets below are shared with the spawn scheduler and the snapshot
//! loader.

use wasm_bindgen::prelude::*;

mod game;

pub use game::rng::Lcg;
pub use game::world::{
    World, base_speed_for_level, level_for_score, mothership_chance_for_level,
    spawn_interval_for_level,
};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

// -----------------------------------------------------------------------------
// Word datasets
// Regular ships carry a short word; motherships carry a long one. The spawn
// scheduler picks uniformly at random from the list for the chosen ship kind.
// -----------------------------------------------------------------------------

pub const REGULAR_WORDS: &[&str] = &[
    "sail", "ship", "wave", "crew", "deck", "port", "helm", "mast", "wind", "rope",
];

pub const MOTHERSHIP_WORDS: &[&str] = &[
    "battleship",
    "destroyer",
    "submarine",
    "navigator",
    "caribbean",
    "treasure",
    "hurricane",
    "kraken",
    "leviathan",
    "privateer",
    "lighthouse",
];

// -----------------------------------------------------------------------------
// Unified entrypoint
// -----------------------------------------------------------------------------

#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    game::start_session()
}

/// Wall-clock milliseconds from the browser, 0.0 when unavailable.
pub(crate) fn performance_now() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

// Console logging for shell lifecycle and asset loading; the game core itself
// never logs.
macro_rules! console_log {
    ($($arg:tt)*) => {
        web_sys::console::log_1(&format!($($arg)*).into())
    };
}
pub(crate) use console_log;
