//! Descending word ships.
//!
//! A ship exposes a word; the player destroys it by typing the letters in
//! order. `ShipKind` discriminates the two variants: regular ships only fall
//! and drift, motherships additionally fire volleys of character-tagged
//! projectiles and hand any still-flying shots to the orphan pool when they
//! die.

use std::f64::consts::TAU;

use web_sys::CanvasRenderingContext2d;

use super::assets::AssetStore;
use super::particles::ParticleSystem;
use super::player::PlayerShip;
use super::projectile::EnemyProjectile;
use super::rng::Lcg;

pub type ShipId = u32;

const ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz";

const SCOPE_DURATION_MS: f64 = 800.0;
const SCOPE_START_SCALE: f64 = 1.5;

const VOLLEY_SIZE: usize = 5;
const FIRST_VOLLEY_DELAY_MS: f64 = 2000.0;
const VOLLEY_INTERVAL_MS: f64 = 8000.0;

/// One-shot targeting-reticle shrink shown on the first keystroke against a
/// ship. `done` latches so the animation never replays.
pub struct ScopeAnim {
    pub visible: bool,
    pub start_ms: f64,
    pub done: bool,
}

pub struct MotherState {
    pub shots: Vec<EnemyProjectile>,
    last_volley_ms: f64,
    awaiting_first_volley: bool,
    vertical_phase: f64,
}

pub enum ShipKind {
    Regular,
    Mother(MotherState),
}

pub struct EnemyShip {
    pub id: ShipId,
    pub word: &'static str,
    pub typed: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub speed: f64,
    pub destroyed: bool,
    pub scope: ScopeAnim,
    pub kind: ShipKind,
    start_x: f64,
    amplitude: f64,
    frequency: f64,
    phase: f64,
}

impl EnemyShip {
    pub fn regular(id: ShipId, word: &'static str, x: f64, y: f64, speed: f64, rng: &mut Lcg) -> Self {
        Self {
            id,
            word,
            typed: String::new(),
            x,
            y,
            width: 130.0,
            height: 97.0,
            speed,
            destroyed: false,
            scope: ScopeAnim {
                visible: false,
                start_ms: 0.0,
                done: false,
            },
            kind: ShipKind::Regular,
            start_x: x,
            amplitude: 100.0,
            frequency: 0.035,
            phase: rng.next_f64() * TAU,
        }
    }

    pub fn mother(
        id: ShipId,
        word: &'static str,
        x: f64,
        y: f64,
        speed: f64,
        now: f64,
        rng: &mut Lcg,
    ) -> Self {
        let mut ship = Self::regular(id, word, x, y, speed, rng);
        ship.width = 150.0;
        ship.height = 100.0;
        ship.amplitude = 150.0;
        ship.frequency = 0.025;
        ship.kind = ShipKind::Mother(MotherState {
            shots: Vec::new(),
            last_volley_ms: now,
            awaiting_first_volley: true,
            vertical_phase: rng.next_f64() * TAU,
        });
        ship
    }

    pub fn is_mother(&self) -> bool {
        matches!(self.kind, ShipKind::Mother(_))
    }

    /// Start the scope animation unless it has already played out.
    pub fn begin_targeting(&mut self, now: f64) {
        if !self.scope.done {
            self.scope.visible = true;
            self.scope.start_ms = now;
        }
    }

    pub fn update(
        &mut self,
        now: f64,
        canvas_w: f64,
        canvas_h: f64,
        player: &mut PlayerShip,
        particles: &mut ParticleSystem,
        rng: &mut Lcg,
    ) {
        self.expire_scope(now);

        match &mut self.kind {
            ShipKind::Regular => {
                self.y += self.speed * 0.8;
                self.x = self.start_x + self.phase.sin() * self.amplitude;
                self.phase += self.frequency;
            }
            ShipKind::Mother(mother) => {
                self.y += self.speed * 0.5;
                self.x = self.start_x + self.phase.sin() * self.amplitude;
                self.phase += self.frequency;

                // secondary vertical drift
                self.y += mother.vertical_phase.sin() * 0.8;
                mother.vertical_phase += 0.03;

                let mut i = mother.shots.len();
                while i > 0 {
                    i -= 1;
                    let shot = &mut mother.shots[i];
                    shot.update();

                    if shot.y > player.y && shot.x > player.x && shot.x < player.x + player.width {
                        player.take_damage(now, particles, rng);
                        mother.shots.remove(i);
                        continue;
                    }
                    if shot.y > canvas_h {
                        mother.shots.remove(i);
                    }
                }

                let elapsed = now - mother.last_volley_ms;
                if mother.awaiting_first_volley && elapsed > FIRST_VOLLEY_DELAY_MS {
                    fire_volley(mother, self.x, self.y, self.width, self.height, rng);
                    mother.last_volley_ms = now;
                    mother.awaiting_first_volley = false;
                } else if !mother.awaiting_first_volley && elapsed > VOLLEY_INTERVAL_MS {
                    fire_volley(mother, self.x, self.y, self.width, self.height, rng);
                    mother.last_volley_ms = now;
                }
            }
        }

        let max_x = canvas_w - self.width;
        self.x = self.x.clamp(0.0, max_x.max(0.0));
    }

    /// Mark destroyed and burst. A mothership's live shots move to the orphan
    /// pool: its death must not despawn in-flight threats.
    pub fn destroy(
        &mut self,
        particles: &mut ParticleSystem,
        orphans: &mut Vec<EnemyProjectile>,
        rng: &mut Lcg,
    ) {
        self.destroyed = true;
        particles.create_explosion(
            self.x + self.width / 2.0,
            self.y + self.height / 2.0,
            "#FFA500",
            20,
            rng,
        );
        if let ShipKind::Mother(mother) = &mut self.kind {
            orphans.append(&mut mother.shots);
        }
    }

    pub fn draw(
        &self,
        ctx: &CanvasRenderingContext2d,
        assets: &AssetStore,
        is_target: bool,
        now: f64,
    ) {
        match &self.kind {
            ShipKind::Regular => {
                self.draw_hull(ctx, assets, "enemy_ship", "#8B4513");
                self.draw_scope(ctx, now);
                self.draw_word(ctx, is_target, "20px Arial");
            }
            ShipKind::Mother(mother) => {
                // a dead mothership no longer renders, but its shots do
                if !self.destroyed {
                    self.draw_hull(ctx, assets, "mother_ship", "#AA0000");
                    if is_target {
                        self.draw_pulse_reticle(ctx, now);
                    }
                    self.draw_word(ctx, is_target, "24px Arial");
                }
                for shot in &mother.shots {
                    shot.draw(ctx, assets);
                }
            }
        }
    }

    fn draw_hull(
        &self,
        ctx: &CanvasRenderingContext2d,
        assets: &AssetStore,
        image: &str,
        fallback: &str,
    ) {
        if let Some(img) = assets.image(image) {
            ctx.draw_image_with_html_image_element_and_dw_and_dh(
                &img, self.x, self.y, self.width, self.height,
            )
            .ok();
        } else {
            ctx.set_fill_style_str(fallback);
            ctx.fill_rect(self.x, self.y, self.width, self.height);
        }
    }

    // Shrinking one-shot reticle; latches `done` once played. Mutating the
    // flag from draw would need &mut, so expiry is checked here and latched in
    // `expire_scope` during update ticks.
    fn draw_scope(&self, ctx: &CanvasRenderingContext2d, now: f64) {
        if !self.scope.visible || self.scope.done {
            return;
        }
        let progress = (now - self.scope.start_ms) / SCOPE_DURATION_MS;
        if progress > 1.0 {
            return;
        }

        let center_x = self.x + self.width / 2.0;
        let center_y = self.y + self.height / 2.0;
        let max_radius = self.width.min(self.height) * 0.8;
        let scale = (1.0 - progress) * SCOPE_START_SCALE;

        ctx.save();
        ctx.translate(center_x, center_y).ok();
        ctx.scale(scale, scale).ok();

        ctx.set_stroke_style_str("#000000");
        ctx.set_line_width(2.0);

        ctx.begin_path();
        ctx.arc(0.0, 0.0, max_radius, 0.0, TAU).ok();
        ctx.stroke();

        let tick = max_radius * 0.3;
        ctx.begin_path();
        ctx.move_to(0.0, -max_radius);
        ctx.line_to(0.0, -tick);
        ctx.move_to(0.0, tick);
        ctx.line_to(0.0, max_radius);
        ctx.stroke();

        ctx.begin_path();
        ctx.move_to(-max_radius, 0.0);
        ctx.line_to(-tick, 0.0);
        ctx.move_to(tick, 0.0);
        ctx.line_to(max_radius, 0.0);
        ctx.stroke();

        ctx.restore();
    }

    /// Latch the scope's `done` flag once its animation window has passed.
    pub fn expire_scope(&mut self, now: f64) {
        if self.scope.visible
            && !self.scope.done
            && now - self.scope.start_ms > SCOPE_DURATION_MS
        {
            self.scope.done = true;
        }
    }

    // Repeating shrink reticle shown while a mothership is the locked target.
    fn draw_pulse_reticle(&self, ctx: &CanvasRenderingContext2d, now: f64) {
        let cycle = (now % 500.0) / 500.0;
        let max_radius = self.width.min(self.height) * 0.8;
        let radius = max_radius * (1.0 - cycle);
        let center_x = self.x + self.width / 2.0;
        let center_y = self.y + self.height / 2.0;

        ctx.set_stroke_style_str("#000000");
        ctx.set_line_width(2.0);

        ctx.begin_path();
        ctx.arc(center_x, center_y, max_radius, 0.0, TAU).ok();
        ctx.stroke();

        ctx.begin_path();
        ctx.arc(center_x, center_y, radius, 0.0, TAU).ok();
        ctx.stroke();

        let tick = max_radius * 0.3;
        ctx.begin_path();
        ctx.move_to(center_x, center_y - max_radius);
        ctx.line_to(center_x, center_y - tick);
        ctx.move_to(center_x, center_y + tick);
        ctx.line_to(center_x, center_y + max_radius);
        ctx.stroke();

        ctx.begin_path();
        ctx.move_to(center_x - max_radius, center_y);
        ctx.line_to(center_x - tick, center_y);
        ctx.move_to(center_x + tick, center_y);
        ctx.line_to(center_x + max_radius, center_y);
        ctx.stroke();
    }

    // Word below the hull: typed letters amber, the next expected letter gold,
    // the rest white. Untargeted ships render all white.
    fn draw_word(&self, ctx: &CanvasRenderingContext2d, is_target: bool, font: &str) {
        ctx.set_font(font);
        ctx.set_text_align("left");
        ctx.set_text_baseline("alphabetic");

        let measure = |s: &str| {
            ctx.measure_text(s)
                .map(|m| m.width())
                .unwrap_or(0.0)
        };
        let total_width = measure(self.word);
        let start_x = self.x + (self.width - total_width) / 2.0;
        let baseline_y = self.y + self.height + 25.0;

        let typed_len = self.typed.chars().count();
        for (i, letter) in self.word.chars().enumerate() {
            let x = start_x + measure(&self.word[..i]);
            let color = if is_target {
                if i < typed_len {
                    "#FF9933"
                } else if i == typed_len {
                    "#FFD700"
                } else {
                    "#FFFFFF"
                }
            } else {
                "#FFFFFF"
            };
            ctx.set_fill_style_str(color);
            ctx.fill_text(&letter.to_string(), x, baseline_y).ok();
        }
    }
}

fn fire_volley(
    mother: &mut MotherState,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    rng: &mut Lcg,
) {
    let spacing = width / (VOLLEY_SIZE as f64 + 1.0);
    let glyphs: Vec<char> = ALPHABET.chars().collect();

    for i in 0..VOLLEY_SIZE {
        let ch = glyphs[rng.index(glyphs.len())];
        let spread_x = (rng.next_f64() - 0.5) * 2.0;
        mother.shots.push(EnemyProjectile::new(
            x + spacing * (i as f64 + 1.0),
            y + height,
            ch,
            spread_x,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_player() -> PlayerShip {
        // parked far away so volley shots never connect in motion tests
        PlayerShip::new(10_000.0, 10_000.0)
    }

    #[test]
    fn regular_ship_descends_at_reduced_speed() {
        let mut rng = Lcg::new(1);
        let mut ship = EnemyShip::regular(0, "sail", 200.0, -50.0, 1.0, &mut rng);
        let mut player = test_player();
        let mut particles = ParticleSystem::new();
        ship.update(0.0, 800.0, 600.0, &mut player, &mut particles, &mut rng);
        assert!((ship.y - -49.2).abs() < 1e-9);
    }

    #[test]
    fn horizontal_drift_stays_inside_canvas() {
        let mut rng = Lcg::new(2);
        let mut ship = EnemyShip::regular(0, "sail", 10.0, 0.0, 1.0, &mut rng);
        let mut player = test_player();
        let mut particles = ParticleSystem::new();
        for frame in 0..400 {
            ship.update(frame as f64 * 16.0, 800.0, 600.0, &mut player, &mut particles, &mut rng);
            assert!(ship.x >= 0.0 && ship.x <= 800.0 - ship.width, "x={} escaped", ship.x);
        }
    }

    #[test]
    fn mothership_descends_slower_than_regular() {
        let mut rng = Lcg::new(3);
        let mut regular = EnemyShip::regular(0, "sail", 300.0, 0.0, 1.0, &mut rng);
        let mut mother = EnemyShip::mother(1, "kraken", 300.0, 0.0, 1.0, 0.0, &mut rng);
        let mut player = test_player();
        let mut particles = ParticleSystem::new();
        // long enough that the linear 0.5x-vs-0.8x descent dominates the
        // mothership's bounded vertical sinusoid for any starting phase
        for frame in 0..400 {
            let now = frame as f64 * 16.0;
            regular.update(now, 2000.0, 2000.0, &mut player, &mut particles, &mut rng);
            mother.update(now, 2000.0, 2000.0, &mut player, &mut particles, &mut rng);
        }
        assert!(mother.y < regular.y);
    }

    #[test]
    fn first_volley_fires_after_two_seconds() {
        let mut rng = Lcg::new(4);
        let mut ship = EnemyShip::mother(0, "kraken", 300.0, 0.0, 0.0, 0.0, &mut rng);
        let mut player = test_player();
        let mut particles = ParticleSystem::new();

        ship.update(1999.0, 10_000.0, 50_000.0, &mut player, &mut particles, &mut rng);
        let ShipKind::Mother(m) = &ship.kind else { unreachable!() };
        assert!(m.shots.is_empty());

        ship.update(2001.0, 10_000.0, 50_000.0, &mut player, &mut particles, &mut rng);
        let ShipKind::Mother(m) = &ship.kind else { unreachable!() };
        assert_eq!(m.shots.len(), VOLLEY_SIZE);
        for shot in &m.shots {
            assert!(shot.ch.is_ascii_lowercase());
        }
    }

    #[test]
    fn volleys_repeat_on_the_long_interval() {
        let mut rng = Lcg::new(5);
        let mut ship = EnemyShip::mother(0, "kraken", 300.0, 0.0, 0.0, 0.0, &mut rng);
        let mut player = test_player();
        let mut particles = ParticleSystem::new();

        ship.update(2001.0, 10_000.0, 50_000.0, &mut player, &mut particles, &mut rng);
        ship.update(6000.0, 10_000.0, 50_000.0, &mut player, &mut particles, &mut rng);
        let ShipKind::Mother(m) = &ship.kind else { unreachable!() };
        assert_eq!(m.shots.len(), VOLLEY_SIZE, "second volley must wait 8s");

        ship.update(10_002.0, 10_000.0, 50_000.0, &mut player, &mut particles, &mut rng);
        let ShipKind::Mother(m) = &ship.kind else { unreachable!() };
        assert_eq!(m.shots.len(), VOLLEY_SIZE * 2);
    }

    #[test]
    fn destroy_hands_shots_to_orphan_pool() {
        let mut rng = Lcg::new(6);
        let mut ship = EnemyShip::mother(0, "kraken", 300.0, 0.0, 0.0, 0.0, &mut rng);
        let mut player = test_player();
        let mut particles = ParticleSystem::new();
        ship.update(2001.0, 10_000.0, 50_000.0, &mut player, &mut particles, &mut rng);

        let mut orphans = Vec::new();
        ship.destroy(&mut particles, &mut orphans, &mut rng);
        assert!(ship.destroyed);
        assert_eq!(orphans.len(), VOLLEY_SIZE);
        let ShipKind::Mother(m) = &ship.kind else { unreachable!() };
        assert!(m.shots.is_empty());
    }

    #[test]
    fn volley_shot_hitting_player_deals_damage() {
        let mut rng = Lcg::new(7);
        let mut ship = EnemyShip::mother(0, "kraken", 100.0, 0.0, 0.0, 0.0, &mut rng);
        let mut player = PlayerShip::new(800.0, 600.0);
        let mut particles = ParticleSystem::new();
        ship.update(2001.0, 800.0, 600.0, &mut player, &mut particles, &mut rng);

        // teleport one shot just past the player's row, inside its span
        let lives_before = player.lives;
        if let ShipKind::Mother(m) = &mut ship.kind {
            m.shots[0].x = player.x + player.width / 2.0;
            m.shots[0].y = player.y + 1.0;
        }
        ship.update(2020.0, 800.0, 600.0, &mut player, &mut particles, &mut rng);
        assert_eq!(player.lives, lives_before - 1);
        let ShipKind::Mother(m) = &ship.kind else { unreachable!() };
        assert_eq!(m.shots.len(), VOLLEY_SIZE - 1);
    }

    #[test]
    fn scope_latches_done_after_animation_window() {
        let mut rng = Lcg::new(8);
        let mut ship = EnemyShip::regular(0, "sail", 0.0, 0.0, 1.0, &mut rng);
        ship.begin_targeting(1000.0);
        assert!(ship.scope.visible && !ship.scope.done);
        ship.expire_scope(1500.0);
        assert!(!ship.scope.done);
        ship.expire_scope(1801.0);
        assert!(ship.scope.done);
        // a later keystroke no longer restarts it
        ship.begin_targeting(5000.0);
        assert!((ship.scope.start_ms - 1000.0).abs() < 1e-9);
    }
}
