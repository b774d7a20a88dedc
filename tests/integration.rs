// Integration tests (native) for the `typeship` crate.
// These tests avoid wasm-specific functionality and exercise the public game
// API so they can run under `cargo test` on the host.

use typeship::{Lcg, World, level_for_score, spawn_interval_for_level};

#[test]
fn difficulty_scenario_values() {
    assert_eq!(level_for_score(999), 1);
    assert_eq!(level_for_score(1000), 2);
    assert_eq!(spawn_interval_for_level(2), 3700.0);
}

#[test]
fn a_word_can_be_typed_down_end_to_end() {
    let mut world = World::new(800.0, 600.0, 0.0, Lcg::new(42));
    world.ships.clear();
    let id = world.spawn_word("sail", 300.0, 100.0, 0.0, 0.0);

    for key in "sail".chars() {
        world.handle_key(key, 0.0);
    }
    assert_eq!(world.score, 100);
    assert_eq!(world.current_target, Some(id));

    // run frames until the landing shot resolves the destruction
    for _ in 0..60 {
        world.update(0.0);
    }
    assert!(world.ships.is_empty());
    assert_eq!(world.current_target, None);
    assert_eq!(world.ships_destroyed, 1);
}

#[test]
fn construction_seeds_the_first_wave() {
    let world = World::new(800.0, 600.0, 0.0, Lcg::new(7));
    assert_eq!(world.ships.len(), 1);
    assert!(!world.game_over);
    assert_eq!(world.level, 1);
}
