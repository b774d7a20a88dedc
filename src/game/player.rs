//! The player avatar.
//!
//! Owns the outgoing progress shots, the life count and the hurt-flash timer.
//! Collaborators (particle sink, wall clock) arrive as call parameters; the
//! player never reaches back into the orchestrator.

use std::f64::consts::TAU;

use web_sys::CanvasRenderingContext2d;

use super::assets::AssetStore;
use super::particles::ParticleSystem;
use super::projectile::Projectile;
use super::rng::Lcg;
use super::ships::EnemyShip;

const HURT_FLASH_MS: f64 = 1000.0;
const BOTTOM_MARGIN: f64 = 20.0;

pub struct PlayerShip {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub lives: i32,
    pub projectiles: Vec<Projectile>,
    is_hurt: bool,
    hurt_since_ms: f64,
}

impl PlayerShip {
    pub fn new(canvas_w: f64, canvas_h: f64) -> Self {
        let width = 150.0;
        let height = 112.0;
        Self {
            x: canvas_w / 2.0 - width / 2.0,
            y: canvas_h - height - BOTTOM_MARGIN,
            width,
            height,
            lives: 2,
            projectiles: Vec::new(),
            is_hurt: false,
            hurt_since_ms: 0.0,
        }
    }

    /// Keep the ship centered horizontally and anchored near the bottom after
    /// a viewport resize.
    pub fn reposition(&mut self, canvas_w: f64, canvas_h: f64) {
        self.x = canvas_w / 2.0 - self.width / 2.0;
        self.y = canvas_h - self.height - BOTTOM_MARGIN;
    }

    /// Fire at a point along the target's width proportional to how much of
    /// its word is typed, so successive shots visibly walk across the hull.
    pub fn fire_at_progress(
        &mut self,
        target: &EnemyShip,
        particles: &mut ParticleSystem,
        rng: &mut Lcg,
    ) {
        let word_len = target.word.chars().count();
        let typed_len = target.typed.chars().count();
        if word_len == 0 {
            return;
        }
        let progress = typed_len as f64 / word_len as f64;
        let aim_x = target.x + target.width * progress;
        let aim_y = target.y + target.height / 2.0;

        self.projectiles.push(Projectile::new(
            self.x + self.width / 2.0,
            self.y,
            aim_x,
            aim_y,
        ));

        // no impact flash on the shot that finishes the word; the kill
        // explosion covers it
        if typed_len < word_len.saturating_sub(1) {
            particles.create_explosion(aim_x, aim_y, "#FFA500", 20, rng);
        }
    }

    /// Advance in-flight shots. Returns true when a shot landed while the
    /// locked target's word was fully typed, which is the destruction trigger.
    pub fn update(&mut self, now: f64, target_complete: bool) -> bool {
        if self.is_hurt && now - self.hurt_since_ms > HURT_FLASH_MS {
            self.is_hurt = false;
        }

        let mut landed = false;
        self.projectiles.retain_mut(|p| {
            p.update();
            if p.has_hit_target && target_complete {
                landed = true;
                return false;
            }
            !p.has_reached_target
        });
        landed
    }

    pub fn take_damage(&mut self, now: f64, particles: &mut ParticleSystem, rng: &mut Lcg) {
        self.lives -= 1;
        self.is_hurt = true;
        self.hurt_since_ms = now;
        particles.create_explosion(
            self.x + self.width / 2.0,
            self.y + self.height / 2.0,
            "#FF0000",
            30,
            rng,
        );
    }

    pub fn draw(&self, ctx: &CanvasRenderingContext2d, assets: &AssetStore, now: f64) {
        if self.is_hurt {
            let since = now - self.hurt_since_ms;
            if since < HURT_FLASH_MS {
                let intensity = (since / 50.0).sin() * 0.5 + 0.5;
                ctx.set_fill_style_str(&format!("rgba(255, 0, 0, {})", intensity * 0.5));
                ctx.fill_rect(self.x, self.y, self.width, self.height);
            }
        }

        if let Some(img) = assets.image("player_ship") {
            ctx.draw_image_with_html_image_element_and_dw_and_dh(
                &img, self.x, self.y, self.width, self.height,
            )
            .ok();
        } else {
            ctx.set_fill_style_str("#4CAF50");
            ctx.fill_rect(self.x, self.y, self.width, self.height);
        }

        self.draw_lives(ctx, assets);

        for projectile in &self.projectiles {
            projectile.draw(ctx, assets);
        }
    }

    // Hearts panel, top-left.
    fn draw_lives(&self, ctx: &CanvasRenderingContext2d, assets: &AssetStore) {
        let heart_size = 30.0;
        let heart_spacing = 40.0;
        let hearts_y = 35.0;

        let panel_width = heart_spacing * self.lives.max(0) as f64 + 20.0;
        let panel_height = heart_size + 20.0;

        ctx.set_fill_style_str("rgba(0, 0, 0, 0.5)");
        ctx.fill_rect(20.0, 10.0, panel_width, panel_height);

        for i in 0..self.lives.max(0) {
            let cx = 30.0 + i as f64 * heart_spacing;
            if let Some(img) = assets.image("heart") {
                ctx.draw_image_with_html_image_element_and_dw_and_dh(
                    &img,
                    cx,
                    hearts_y - heart_size / 2.0,
                    heart_size,
                    heart_size,
                )
                .ok();
            } else {
                ctx.set_fill_style_str("#FF4444");
                ctx.begin_path();
                ctx.arc(cx, hearts_y, 10.0, 0.0, TAU).ok();
                ctx.fill();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawns_centered_and_bottom_anchored() {
        let p = PlayerShip::new(800.0, 600.0);
        assert!((p.x - 325.0).abs() < 1e-9);
        assert!((p.y - 468.0).abs() < 1e-9);
        assert_eq!(p.lives, 2);
    }

    #[test]
    fn reposition_follows_viewport() {
        let mut p = PlayerShip::new(800.0, 600.0);
        p.reposition(1024.0, 768.0);
        assert!((p.x - (512.0 - 75.0)).abs() < 1e-9);
        assert!((p.y - (768.0 - 112.0 - 20.0)).abs() < 1e-9);
    }

    #[test]
    fn progress_shot_aims_at_typed_fraction() {
        let mut rng = Lcg::new(1);
        let mut particles = ParticleSystem::new();
        let mut p = PlayerShip::new(800.0, 600.0);
        let mut ship = EnemyShip::regular(0, "sail", 200.0, 100.0, 1.0, &mut rng);
        ship.typed.push_str("sa");

        p.fire_at_progress(&ship, &mut particles, &mut rng);
        let shot = p.projectiles.last().unwrap();
        assert!((shot.target_x - (200.0 + 130.0 * 0.5)).abs() < 1e-9);
        assert!((shot.target_y - (100.0 + 97.0 / 2.0)).abs() < 1e-9);
    }

    #[test]
    fn no_impact_flash_on_final_letter_shot() {
        let mut rng = Lcg::new(2);
        let mut p = PlayerShip::new(800.0, 600.0);
        let mut ship = EnemyShip::regular(0, "sail", 200.0, 100.0, 1.0, &mut rng);

        ship.typed.push_str("sa");
        let mut noisy = ParticleSystem::new();
        p.fire_at_progress(&ship, &mut noisy, &mut rng);
        assert!(!noisy.is_empty(), "mid-word shots flash at the aim point");

        ship.typed.push('i');
        let mut quiet = ParticleSystem::new();
        p.fire_at_progress(&ship, &mut quiet, &mut rng);
        // typed "sai" of "sail": 3 == len-1, so no flash burst
        assert!(quiet.is_empty());
        assert_eq!(p.projectiles.len(), 2);
    }

    #[test]
    fn landing_shot_reports_destruction_when_word_complete() {
        let mut p = PlayerShip::new(800.0, 600.0);
        p.projectiles.push(Projectile::new(400.0, 468.0, 380.0, 60.0));
        let mut landed = false;
        for _ in 0..30 {
            if p.update(0.0, true) {
                landed = true;
                break;
            }
        }
        assert!(landed);
        assert!(p.projectiles.is_empty());
    }

    #[test]
    fn landing_shot_without_complete_word_just_expires() {
        let mut p = PlayerShip::new(800.0, 600.0);
        p.projectiles.push(Projectile::new(400.0, 468.0, 380.0, 60.0));
        for _ in 0..30 {
            assert!(!p.update(0.0, false));
        }
        assert!(p.projectiles.is_empty());
    }

    #[test]
    fn take_damage_decrements_lives_and_flags_hurt() {
        let mut rng = Lcg::new(3);
        let mut particles = ParticleSystem::new();
        let mut p = PlayerShip::new(800.0, 600.0);
        p.take_damage(100.0, &mut particles, &mut rng);
        assert_eq!(p.lives, 1);
        assert!(p.is_hurt);
        // flash expires after its window
        p.update(1200.0, false);
        assert!(!p.is_hurt);
    }
}
