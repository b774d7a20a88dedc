//! Best-effort session stats.
//!
//! Written to localStorage exactly once per run, at game over. Storage being
//! absent or refusing writes is a non-event: gameplay state never observes
//! persistence failures.

use web_sys::window;

use crate::console_log;

use super::world::World;

pub struct FinalStats {
    pub score: u32,
    pub level: u32,
    pub accuracy: u32,
    pub ships_destroyed: u32,
}

pub fn collect(world: &World) -> FinalStats {
    FinalStats {
        score: world.score,
        level: world.level,
        accuracy: world.accuracy,
        ships_destroyed: world.ships_destroyed,
    }
}

/// Running best across sessions; garbage stored values count as zero.
fn best_of(stored: Option<String>, score: u32) -> u32 {
    stored
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
        .max(score)
}

pub fn record_game_over(world: &World) {
    let stats = collect(world);
    let Some(storage) = window().and_then(|w| w.local_storage().ok().flatten()) else {
        return;
    };

    let high = best_of(storage.get_item("typeship.highScore").ok().flatten(), stats.score);
    let _ = storage.set_item("typeship.highScore", &high.to_string());
    let _ = storage.set_item("typeship.lastScore", &stats.score.to_string());
    let _ = storage.set_item("typeship.lastLevel", &stats.level.to_string());
    let _ = storage.set_item("typeship.lastAccuracy", &stats.accuracy.to_string());
    let _ = storage.set_item("typeship.shipsDestroyed", &stats.ships_destroyed.to_string());

    console_log!("typeship: game over, score {} (best {high})", stats.score);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::rng::Lcg;

    #[test]
    fn collect_mirrors_world_counters() {
        let mut world = World::new(800.0, 600.0, 0.0, Lcg::new(1));
        world.score = 1234;
        world.level = 2;
        world.accuracy = 87;
        world.ships_destroyed = 9;
        let stats = collect(&world);
        assert_eq!(stats.score, 1234);
        assert_eq!(stats.level, 2);
        assert_eq!(stats.accuracy, 87);
        assert_eq!(stats.ships_destroyed, 9);
    }

    #[test]
    fn best_of_keeps_the_larger_score() {
        assert_eq!(best_of(Some("900".into()), 500), 900);
        assert_eq!(best_of(Some("900".into()), 1500), 1500);
    }

    #[test]
    fn best_of_tolerates_missing_or_garbage_entries() {
        assert_eq!(best_of(None, 500), 500);
        assert_eq!(best_of(Some("not a number".into()), 500), 500);
    }
}
