//! Ballistic entities.
//!
//! `Projectile` is a player shot flying at a fixed aim point; it terminates
//! itself when it gets within half a step of the target. `EnemyProjectile` is
//! a mothership character shot with a constant velocity; its lifetime is
//! managed by whoever owns it (the firing ship, or the orphan pool once that
//! ship is gone).

use std::f64::consts::FRAC_PI_2;

use web_sys::CanvasRenderingContext2d;

use super::assets::AssetStore;

const SHOT_SPEED: f64 = 30.0;
const ENEMY_SHOT_SPEED: f64 = 1.5;

pub struct Projectile {
    pub x: f64,
    pub y: f64,
    pub target_x: f64,
    pub target_y: f64,
    pub has_reached_target: bool,
    pub has_hit_target: bool,
    velocity_x: f64,
    velocity_y: f64,
    rotation: f64,
    width: f64,
    height: f64,
}

impl Projectile {
    pub fn new(start_x: f64, start_y: f64, target_x: f64, target_y: f64) -> Self {
        let dx = target_x - start_x;
        let dy = target_y - start_y;
        let distance = (dx * dx + dy * dy).sqrt();
        // Coincident start and target: a zero vector, and the arrival check
        // fires on the first update.
        let (velocity_x, velocity_y) = if distance > 0.0 {
            (dx / distance * SHOT_SPEED, dy / distance * SHOT_SPEED)
        } else {
            (0.0, 0.0)
        };
        Self {
            x: start_x,
            y: start_y,
            target_x,
            target_y,
            has_reached_target: false,
            has_hit_target: false,
            velocity_x,
            velocity_y,
            rotation: dy.atan2(dx) + FRAC_PI_2,
            width: 40.0,
            height: 40.0,
        }
    }

    pub fn update(&mut self) {
        self.x += self.velocity_x;
        self.y += self.velocity_y;

        if (self.x - self.target_x).abs() < SHOT_SPEED / 2.0
            && (self.y - self.target_y).abs() < SHOT_SPEED / 2.0
        {
            self.has_hit_target = true;
            self.has_reached_target = true;
        }
    }

    pub fn draw(&self, ctx: &CanvasRenderingContext2d, assets: &AssetStore) {
        ctx.save();
        ctx.translate(self.x, self.y).ok();
        ctx.rotate(self.rotation).ok();

        if let Some(img) = assets.image("bullet") {
            ctx.draw_image_with_html_image_element_and_dw_and_dh(
                &img,
                -self.width / 2.0,
                -self.height / 2.0,
                self.width,
                self.height,
            )
            .ok();
        } else {
            ctx.set_fill_style_str("#FFA500");
            ctx.begin_path();
            ctx.arc(0.0, 0.0, 8.0, 0.0, std::f64::consts::TAU).ok();
            ctx.fill();
        }

        ctx.restore();
    }
}

/// Mothership shot tagged with the character that intercepts it.
pub struct EnemyProjectile {
    pub x: f64,
    pub y: f64,
    pub ch: char,
    velocity_x: f64,
    velocity_y: f64,
    rotation: f64,
    width: f64,
    height: f64,
}

impl EnemyProjectile {
    pub fn new(x: f64, y: f64, ch: char, spread_x: f64) -> Self {
        let velocity_x = spread_x * ENEMY_SHOT_SPEED;
        let velocity_y = ENEMY_SHOT_SPEED * 1.2;
        Self {
            x,
            y,
            ch,
            velocity_x,
            velocity_y,
            rotation: velocity_y.atan2(velocity_x) + FRAC_PI_2,
            width: 24.0,
            height: 24.0,
        }
    }

    pub fn update(&mut self) {
        self.x += self.velocity_x;
        self.y += self.velocity_y;
    }

    pub fn draw(&self, ctx: &CanvasRenderingContext2d, assets: &AssetStore) {
        ctx.save();
        ctx.translate(self.x, self.y).ok();
        ctx.rotate(self.rotation).ok();

        if let Some(img) = assets.image("missile") {
            ctx.draw_image_with_html_image_element_and_dw_and_dh(
                &img,
                -self.width / 2.0,
                -self.height / 2.0,
                self.width,
                self.height,
            )
            .ok();
        } else {
            ctx.set_fill_style_str("#FF4444");
            ctx.begin_path();
            ctx.arc(0.0, 0.0, 10.0, 0.0, std::f64::consts::TAU).ok();
            ctx.fill();
        }

        ctx.restore();

        ctx.set_fill_style_str("white");
        ctx.set_font("bold 20px Arial");
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        ctx.fill_text(&self.ch.to_string(), self.x, self.y).ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn velocity_is_normalized_to_shot_speed() {
        let p = Projectile::new(0.0, 0.0, 300.0, 400.0);
        let mag = (p.velocity_x * p.velocity_x + p.velocity_y * p.velocity_y).sqrt();
        assert!((mag - SHOT_SPEED).abs() < 1e-9);
        // 3-4-5 triangle: direction preserved
        assert!((p.velocity_x - 18.0).abs() < 1e-9);
        assert!((p.velocity_y - 24.0).abs() < 1e-9);
    }

    #[test]
    fn coincident_target_yields_zero_vector_and_immediate_arrival() {
        let mut p = Projectile::new(50.0, 50.0, 50.0, 50.0);
        assert_eq!(p.velocity_x, 0.0);
        assert_eq!(p.velocity_y, 0.0);
        p.update();
        assert!(p.has_hit_target);
        assert!(p.has_reached_target);
    }

    #[test]
    fn shot_terminates_within_half_step_of_target() {
        let mut p = Projectile::new(0.0, 0.0, 0.0, 90.0);
        p.update();
        p.update();
        assert!(!p.has_reached_target);
        p.update();
        assert!(p.has_hit_target && p.has_reached_target);
    }

    #[test]
    fn enemy_shot_falls_with_fixed_velocity() {
        let mut e = EnemyProjectile::new(10.0, 0.0, 'k', 0.5);
        e.update();
        assert!((e.x - 10.75).abs() < 1e-9);
        assert!((e.y - 1.8).abs() < 1e-9);
        assert_eq!(e.ch, 'k');
    }
}
