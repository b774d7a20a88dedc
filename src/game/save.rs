//! Snapshot save/load, behind the `serde_json` feature.
//!
//! S serializes the coarse run state to localStorage, L restores it into the
//! running world. Words are matched back against the fixed vocabularies so a
//! snapshot from an older build cannot smuggle in unknown words; the ship
//! kind follows from which vocabulary the word belongs to.

use serde::{Deserialize, Serialize};
use web_sys::window;

use crate::console_log;
use crate::{MOTHERSHIP_WORDS, REGULAR_WORDS};

use super::world::World;

const STORAGE_KEY: &str = "typeship.savedGame";

#[derive(Serialize, Deserialize)]
pub struct SavedShip {
    pub word: String,
    pub x: f64,
    pub y: f64,
    pub speed: f64,
}

#[derive(Serialize, Deserialize)]
pub struct SavedGame {
    pub score: u32,
    pub level: u32,
    pub player_x: f64,
    pub player_y: f64,
    pub ships: Vec<SavedShip>,
}

pub fn snapshot(world: &World) -> SavedGame {
    SavedGame {
        score: world.score,
        level: world.level,
        player_x: world.player.x,
        player_y: world.player.y,
        ships: world
            .ships
            .iter()
            .map(|s| SavedShip {
                word: s.word.to_string(),
                x: s.x,
                y: s.y,
                speed: s.speed,
            })
            .collect(),
    }
}

/// Restore a snapshot into a running world. Typing progress and volley state
/// are not part of a snapshot, so the target lock is released.
pub fn apply(world: &mut World, saved: &SavedGame, now: f64) {
    world.score = saved.score;
    world.level = saved.level;
    world.player.x = saved.player_x;
    world.player.y = saved.player_y;
    world.ships.clear();
    world.current_target = None;
    for ship in &saved.ships {
        let Some(word) = lookup_word(&ship.word) else {
            continue;
        };
        world.spawn_word(word, ship.x, ship.y, ship.speed, now);
    }
}

fn lookup_word(word: &str) -> Option<&'static str> {
    REGULAR_WORDS
        .iter()
        .chain(MOTHERSHIP_WORDS)
        .find(|w| **w == word)
        .copied()
}

pub fn store(world: &World) {
    let Some(storage) = window().and_then(|w| w.local_storage().ok().flatten()) else {
        return;
    };
    let Ok(json) = serde_json::to_string(&snapshot(world)) else {
        return;
    };
    if storage.set_item(STORAGE_KEY, &json).is_ok() {
        console_log!("typeship: game state saved");
    }
}

pub fn load_into(world: &mut World, now: f64) {
    let Some(storage) = window().and_then(|w| w.local_storage().ok().flatten()) else {
        return;
    };
    let Some(json) = storage.get_item(STORAGE_KEY).ok().flatten() else {
        console_log!("typeship: no saved game state found");
        return;
    };
    match serde_json::from_str::<SavedGame>(&json) {
        Ok(saved) => {
            apply(world, &saved, now);
            console_log!("typeship: game state loaded");
        }
        Err(_) => console_log!("typeship: saved game state unreadable, ignoring"),
    }
}
