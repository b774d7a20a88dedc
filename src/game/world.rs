//! The aggregate game state and its per-frame rules.
//!
//! `World` owns every entity collection, the spawn scheduler, scoring and
//! keystroke routing. It is deliberately free of web-sys types: the frame
//! loop samples `performance.now()` once and threads it through, so the whole
//! state machine runs under native `cargo test`.

use crate::{MOTHERSHIP_WORDS, REGULAR_WORDS};

use super::particles::ParticleSystem;
use super::player::PlayerShip;
use super::projectile::EnemyProjectile;
use super::rng::Lcg;
use super::ships::{EnemyShip, ShipId, ShipKind};

// Difficulty defaults at level 1; the curve functions below take over on the
// first level-up (the starting values predate the curve and are kept as-is).
const START_SPAWN_INTERVAL_MS: f64 = 4000.0;
const START_BASE_SPEED: f64 = 1.0;
const START_MOTHERSHIP_CHANCE: f64 = 0.10;

const SPAWN_EDGE_MARGIN: f64 = 100.0;
const DESPAWN_GRACE: f64 = 100.0;

/// Level is a pure non-decreasing function of score.
pub fn level_for_score(score: u32) -> u32 {
    score / 1000 + 1
}

/// Milliseconds between spawns, floored at 2 s.
pub fn spawn_interval_for_level(level: u32) -> f64 {
    (4000.0 - level as f64 * 150.0).max(2000.0)
}

/// Base descent speed, capped at 1.5.
pub fn base_speed_for_level(level: u32) -> f64 {
    (0.5 + level as f64 * 0.08).min(1.5)
}

/// Probability that the next spawn is a mothership, capped at 0.20.
pub fn mothership_chance_for_level(level: u32) -> f64 {
    (0.10 + level as f64 * 0.02).min(0.20)
}

pub struct World {
    pub width: f64,
    pub height: f64,
    pub player: PlayerShip,
    pub ships: Vec<EnemyShip>,
    /// Mothership shots that outlived their ship.
    pub orphan_shots: Vec<EnemyProjectile>,
    pub particles: ParticleSystem,
    pub current_target: Option<ShipId>,
    pub score: u32,
    pub level: u32,
    pub game_over: bool,
    pub ships_destroyed: u32,
    pub total_keystrokes: u32,
    pub correct_keystrokes: u32,
    pub accuracy: u32,
    pub spawn_interval_ms: f64,
    pub base_speed: f64,
    pub mothership_chance: f64,
    last_spawn_ms: f64,
    next_ship_id: ShipId,
    pub rng: Lcg,
}

impl World {
    pub fn new(width: f64, height: f64, now: f64, rng: Lcg) -> Self {
        let mut world = Self {
            width,
            height,
            player: PlayerShip::new(width, height),
            ships: Vec::new(),
            orphan_shots: Vec::new(),
            particles: ParticleSystem::new(),
            current_target: None,
            score: 0,
            level: 1,
            game_over: false,
            ships_destroyed: 0,
            total_keystrokes: 0,
            correct_keystrokes: 0,
            accuracy: 100,
            spawn_interval_ms: START_SPAWN_INTERVAL_MS,
            base_speed: START_BASE_SPEED,
            mothership_chance: START_MOTHERSHIP_CHANCE,
            last_spawn_ms: now,
            next_ship_id: 0,
            rng,
        };
        world.spawn_ship(now);
        world
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.player.reposition(width, height);
    }

    pub fn is_target(&self, id: ShipId) -> bool {
        self.current_target == Some(id)
    }

    /// Roll ship kind and word, place at a random x just above the top edge.
    pub fn spawn_ship(&mut self, now: f64) {
        let is_mother = self.rng.chance(self.mothership_chance);
        let words = if is_mother { MOTHERSHIP_WORDS } else { REGULAR_WORDS };
        let word = words[self.rng.index(words.len())];
        let x = self.rng.next_f64() * (self.width - SPAWN_EDGE_MARGIN);
        let speed = self.base_speed * self.rng.range(0.8, 1.2);
        self.spawn_word(word, x, -50.0, speed, now);
    }

    /// Place a specific word at a specific position; the kind follows the
    /// vocabulary the word belongs to. Snapshot restore goes through here.
    pub fn spawn_word(&mut self, word: &'static str, x: f64, y: f64, speed: f64, now: f64) -> ShipId {
        let id = self.next_ship_id;
        self.next_ship_id += 1;
        let ship = if MOTHERSHIP_WORDS.contains(&word) {
            EnemyShip::mother(id, word, x, y, speed, now, &mut self.rng)
        } else {
            EnemyShip::regular(id, word, x, y, speed, &mut self.rng)
        };
        self.ships.push(ship);
        id
    }

    /// Raise level-derived difficulty once score crosses a 1000-point line.
    /// Parameters only move on a level increase.
    pub fn check_level_progression(&mut self) {
        let new_level = level_for_score(self.score);
        if new_level > self.level {
            self.level = new_level;
            self.spawn_interval_ms = spawn_interval_for_level(new_level);
            self.base_speed = base_speed_for_level(new_level);
            self.mothership_chance = mothership_chance_for_level(new_level);
        }
    }

    /// Route one printable keystroke. Priority order: volley interception,
    /// then target acquisition, then advancing the locked word.
    pub fn handle_key(&mut self, key: char, now: f64) {
        if self.game_over {
            return;
        }
        self.total_keystrokes += 1;
        let key = key.to_ascii_lowercase();

        // 1) Interception of a mothership character shot preempts everything,
        //    even a held target lock. Not counted toward accuracy.
        for ship in &mut self.ships {
            if let ShipKind::Mother(mother) = &mut ship.kind {
                if let Some(idx) = mother.shots.iter().position(|s| s.ch == key) {
                    let shot = mother.shots.remove(idx);
                    self.score += 50;
                    self.particles
                        .create_explosion(shot.x, shot.y, "#4CAF50", 20, &mut self.rng);
                    return;
                }
            }
        }

        let mut word_completed = false;
        match self.current_target {
            None => {
                // 2) lock the first live ship, in spawn order, whose word
                //    starts with the key
                for ship in &mut self.ships {
                    let first = ship.word.chars().next();
                    if !ship.destroyed && first.is_some_and(|c| c.eq_ignore_ascii_case(&key)) {
                        self.correct_keystrokes += 1;
                        self.current_target = Some(ship.id);
                        ship.typed.clear();
                        ship.typed.push(key);
                        ship.begin_targeting(now);
                        self.player
                            .fire_at_progress(ship, &mut self.particles, &mut self.rng);
                        break;
                    }
                }
            }
            Some(target_id) => {
                // 3) advance the locked word
                if let Some(ship) = self.ships.iter_mut().find(|s| s.id == target_id) {
                    if !ship.destroyed {
                        // a missing expected char would mean typed ran past
                        // the word; treat as a no-op
                        let expected = ship.word.chars().nth(ship.typed.chars().count());
                        if expected.is_some_and(|c| c.eq_ignore_ascii_case(&key)) {
                            self.correct_keystrokes += 1;
                            if ship.typed.is_empty() {
                                ship.begin_targeting(now);
                            }
                            ship.typed.push(key);
                            self.player
                                .fire_at_progress(ship, &mut self.particles, &mut self.rng);

                            if ship.typed == ship.word {
                                // mothership kills score flat, regular kills
                                // scale with level
                                self.score +=
                                    if ship.is_mother() { 200 } else { 100 * self.level };
                                self.ships_destroyed += 1;
                                word_completed = true;
                            }
                        }
                    }
                }
            }
        }
        if word_completed {
            self.check_level_progression();
        }

        self.accuracy = ((self.correct_keystrokes as f64 / self.total_keystrokes as f64) * 100.0)
            .round() as u32;
    }

    /// One frame. Order matters: spawn check, player shots (which resolve the
    /// pending destruction of a fully-typed target), particles, ship sweep,
    /// orphaned shots.
    pub fn update(&mut self, now: f64) {
        if self.game_over {
            return;
        }

        if now - self.last_spawn_ms > self.spawn_interval_ms {
            self.spawn_ship(now);
            self.last_spawn_ms = now;
        }

        let target_complete = self
            .current_target
            .and_then(|id| self.ships.iter().find(|s| s.id == id))
            .is_some_and(|s| s.typed == s.word);
        let landed = self.player.update(now, target_complete);
        if landed {
            if let Some(id) = self.current_target {
                if let Some(ship) = self.ships.iter_mut().find(|s| s.id == id && !s.destroyed) {
                    ship.destroy(&mut self.particles, &mut self.orphan_shots, &mut self.rng);
                }
            }
        }

        self.particles.update();

        // reverse sweep so removal keeps earlier indices stable
        let mut i = self.ships.len();
        while i > 0 {
            i -= 1;
            let ship = &mut self.ships[i];
            ship.update(
                now,
                self.width,
                self.height,
                &mut self.player,
                &mut self.particles,
                &mut self.rng,
            );

            let rammed_player = check_collision(ship, &self.player);
            let ship_id = ship.id;
            let off_bottom = ship.y > self.height + DESPAWN_GRACE;
            let destroyed = ship.destroyed;

            if rammed_player {
                self.player
                    .take_damage(now, &mut self.particles, &mut self.rng);
                if self.player.lives <= 0 {
                    self.game_over = true;
                    break;
                }
            }

            if off_bottom {
                if self.current_target == Some(ship_id) {
                    self.current_target = None;
                }
                self.ships.remove(i);
                continue;
            }

            // a destroyed ship lingers while any player shot is still flying
            // toward it, so the kill explosion lands on something visible
            if destroyed && !self.player.projectiles.iter().any(|p| !p.has_hit_target) {
                if self.current_target == Some(ship_id) {
                    self.current_target = None;
                }
                self.ships.remove(i);
            }
        }

        let mut j = self.orphan_shots.len();
        while j > 0 {
            j -= 1;
            let shot = &mut self.orphan_shots[j];
            shot.update();

            if shot.y > self.player.y
                && shot.x > self.player.x
                && shot.x < self.player.x + self.player.width
            {
                self.player
                    .take_damage(now, &mut self.particles, &mut self.rng);
                self.orphan_shots.remove(j);
                if self.player.lives <= 0 {
                    self.game_over = true;
                }
                continue;
            }

            if shot.y > self.height {
                self.orphan_shots.remove(j);
            }
        }
    }
}

// Axis-aligned overlap at 80% of each box's extents, so near-misses graze.
fn check_collision(ship: &EnemyShip, player: &PlayerShip) -> bool {
    ship.x < player.x + player.width * 0.8
        && ship.x + ship.width * 0.8 > player.x
        && ship.y < player.y + player.height * 0.8
        && ship.y + ship.height * 0.8 > player.y
}
