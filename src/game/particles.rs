//! Cosmetic particle pools.
//!
//! Six independent pools, each with its own decay rule: square sparks with
//! velocity damping, debris under gravity, expanding ring explosions, pulsing
//! energy fields, upward-drifting text and fading trail dots. Purely visual;
//! nothing in here feeds back into gameplay state.

use std::f64::consts::TAU;

use web_sys::CanvasRenderingContext2d;

use super::rng::Lcg;

struct Spark {
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
    size: f64,
    color: &'static str,
    life: f64,
    rotation: f64,
    rotation_speed: f64,
}

struct Debris {
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
    size: f64,
    color: &'static str,
    life: f64,
    rotation: f64,
    rotation_speed: f64,
    gravity: f64,
}

struct Ring {
    x: f64,
    y: f64,
    radius: f64,
    max_radius: f64,
    life: f64,
    color: &'static str,
}

struct EnergyField {
    x: f64,
    y: f64,
    radius: f64,
    max_radius: f64,
    min_radius: f64,
    color: &'static str,
    life: f64,
    pulse_speed: f64,
    expanding: bool,
}

struct TextEffect {
    x: f64,
    y: f64,
    text: String,
    color: &'static str,
    size: f64,
    life: f64,
    vy: f64,
    fade_speed: f64,
}

struct TrailDot {
    x: f64,
    y: f64,
    size: f64,
    color: &'static str,
    life: f64,
}

struct Preset {
    colors: &'static [&'static str],
    size: (f64, f64),
    life: (f64, f64),
    speed: (f64, f64),
}

const PRESETS: &[(&str, Preset)] = &[
    (
        "fire",
        Preset {
            colors: &["#ff4400", "#ff8800", "#ffaa00"],
            size: (2.0, 4.0),
            life: (0.3, 0.7),
            speed: (1.0, 3.0),
        },
    ),
    (
        "spark",
        Preset {
            colors: &["#ffff00", "#ffaa00", "#ff0000"],
            size: (1.0, 2.0),
            life: (0.2, 0.4),
            speed: (3.0, 6.0),
        },
    ),
    (
        "shield",
        Preset {
            colors: &["#00ffff", "#0088ff", "#0044ff"],
            size: (2.0, 3.0),
            life: (0.5, 0.8),
            speed: (1.0, 2.0),
        },
    ),
];

#[derive(Default)]
pub struct ParticleSystem {
    sparks: Vec<Spark>,
    debris: Vec<Debris>,
    explosions: Vec<Ring>,
    energy_fields: Vec<EnergyField>,
    text_effects: Vec<TextEffect>,
    trails: Vec<TrailDot>,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Burst of sparks in an even fan, a ring shockwave, and half as much debris.
    pub fn create_explosion(&mut self, x: f64, y: f64, color: &'static str, count: u32, rng: &mut Lcg) {
        for i in 0..count {
            let angle = TAU / count as f64 * i as f64;
            let speed = rng.next_f64() * 2.0 + 2.0;
            let size = rng.next_f64() * 3.0 + 2.0;
            let life = rng.next_f64() * 0.5 + 0.5;
            self.sparks.push(Spark {
                x,
                y,
                vx: angle.cos() * speed,
                vy: angle.sin() * speed,
                size,
                color,
                life,
                rotation: rng.next_f64() * TAU,
                rotation_speed: (rng.next_f64() - 0.5) * 0.2,
            });
        }

        self.explosions.push(Ring {
            x,
            y,
            radius: 0.0,
            max_radius: 50.0,
            life: 1.0,
            color,
        });

        self.create_debris(x, y, color, count / 2, rng);
    }

    pub fn create_debris(&mut self, x: f64, y: f64, color: &'static str, count: u32, rng: &mut Lcg) {
        for _ in 0..count {
            let angle = rng.next_f64() * TAU;
            let speed = rng.next_f64() * 3.0 + 1.0;
            self.debris.push(Debris {
                x,
                y,
                vx: angle.cos() * speed,
                vy: angle.sin() * speed,
                size: rng.next_f64() * 4.0 + 2.0,
                color,
                life: 1.0,
                rotation: rng.next_f64() * TAU,
                rotation_speed: (rng.next_f64() - 0.5) * 0.4,
                gravity: 0.1,
            });
        }
    }

    pub fn create_energy_field(&mut self, x: f64, y: f64, radius: f64, color: &'static str) {
        self.energy_fields.push(EnergyField {
            x,
            y,
            radius,
            max_radius: radius * 1.2,
            min_radius: radius * 0.8,
            color,
            life: 1.0,
            pulse_speed: 0.05,
            expanding: true,
        });
    }

    pub fn create_trail(&mut self, x: f64, y: f64, color: &'static str, rng: &mut Lcg) {
        self.trails.push(TrailDot {
            x,
            y,
            size: rng.next_f64() * 2.0 + 1.0,
            color,
            life: 1.0,
        });
    }

    pub fn create_text_effect(&mut self, x: f64, y: f64, text: String, color: &'static str, size: f64) {
        self.text_effects.push(TextEffect {
            x,
            y,
            text,
            color,
            size,
            life: 1.0,
            vy: -2.0,
            fade_speed: 0.02,
        });
    }

    /// Scatter from a named preset; unknown names are ignored.
    pub fn create_particle_effect(&mut self, x: f64, y: f64, preset: &str, count: u32, rng: &mut Lcg) {
        let Some((_, settings)) = PRESETS.iter().find(|(name, _)| *name == preset) else {
            return;
        };

        for _ in 0..count {
            let angle = rng.next_f64() * TAU;
            let speed = rng.range(settings.speed.0, settings.speed.1);
            let color = settings.colors[rng.index(settings.colors.len())];
            let size = rng.range(settings.size.0, settings.size.1);
            let life = rng.range(settings.life.0, settings.life.1);
            self.sparks.push(Spark {
                x,
                y,
                vx: angle.cos() * speed,
                vy: angle.sin() * speed,
                size,
                color,
                life,
                rotation: rng.next_f64() * TAU,
                rotation_speed: (rng.next_f64() - 0.5) * 0.2,
            });
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sparks.is_empty()
            && self.debris.is_empty()
            && self.explosions.is_empty()
            && self.energy_fields.is_empty()
            && self.text_effects.is_empty()
            && self.trails.is_empty()
    }

    pub fn update(&mut self) {
        self.sparks.retain_mut(|p| {
            p.x += p.vx;
            p.y += p.vy;
            p.vx *= 0.98;
            p.vy *= 0.98;
            p.life -= 0.02;
            p.rotation += p.rotation_speed;
            p.life > 0.0
        });

        self.debris.retain_mut(|d| {
            d.x += d.vx;
            d.y += d.vy;
            d.vy += d.gravity;
            d.rotation += d.rotation_speed;
            d.life -= 0.01;
            d.life > 0.0
        });

        self.energy_fields.retain_mut(|e| {
            if e.expanding {
                e.radius += e.pulse_speed;
                if e.radius >= e.max_radius {
                    e.expanding = false;
                }
            } else {
                e.radius -= e.pulse_speed;
                if e.radius <= e.min_radius {
                    e.expanding = true;
                }
            }
            e.life -= 0.01;
            e.life > 0.0
        });

        self.text_effects.retain_mut(|t| {
            t.y += t.vy;
            t.life -= t.fade_speed;
            t.life > 0.0
        });

        self.explosions.retain_mut(|e| {
            e.radius += (e.max_radius - e.radius) * 0.1;
            e.life -= 0.05;
            e.life > 0.0
        });

        self.trails.retain_mut(|t| {
            t.life -= 0.05;
            t.life > 0.0
        });
    }

    pub fn draw(&self, ctx: &CanvasRenderingContext2d) {
        for t in &self.trails {
            ctx.set_global_alpha(t.life);
            ctx.set_fill_style_str(t.color);
            ctx.begin_path();
            ctx.arc(t.x, t.y, t.size, 0.0, TAU).ok();
            ctx.fill();
        }

        for p in &self.sparks {
            ctx.save();
            ctx.translate(p.x, p.y).ok();
            ctx.rotate(p.rotation).ok();
            ctx.set_global_alpha(p.life.min(1.0));
            ctx.set_fill_style_str(p.color);
            ctx.fill_rect(-p.size / 2.0, -p.size / 2.0, p.size, p.size);
            ctx.restore();
        }

        for e in &self.explosions {
            ctx.set_stroke_style_str(e.color);
            ctx.set_global_alpha(e.life * 0.5);
            ctx.set_line_width(2.0);
            ctx.begin_path();
            ctx.arc(e.x, e.y, e.radius, 0.0, TAU).ok();
            ctx.stroke();
        }

        for d in &self.debris {
            ctx.save();
            ctx.translate(d.x, d.y).ok();
            ctx.rotate(d.rotation).ok();
            ctx.set_global_alpha(d.life);
            ctx.set_fill_style_str(d.color);
            ctx.fill_rect(-d.size / 2.0, -d.size / 2.0, d.size, d.size);
            ctx.restore();
        }

        for e in &self.energy_fields {
            ctx.set_stroke_style_str(e.color);
            ctx.set_global_alpha(e.life * 0.5);
            ctx.set_line_width(2.0);
            ctx.begin_path();
            ctx.arc(e.x, e.y, e.radius, 0.0, TAU).ok();
            ctx.stroke();
        }

        for t in &self.text_effects {
            ctx.set_global_alpha(t.life);
            ctx.set_fill_style_str(t.color);
            ctx.set_font(&format!("{}px \"Press Start 2P\"", t.size));
            ctx.set_text_align("center");
            ctx.fill_text(&t.text, t.x, t.y).ok();
        }

        ctx.set_global_alpha(1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explosion_fills_three_pools() {
        let mut rng = Lcg::new(1);
        let mut ps = ParticleSystem::new();
        ps.create_explosion(10.0, 10.0, "#FFA500", 20, &mut rng);
        assert_eq!(ps.sparks.len(), 20);
        assert_eq!(ps.explosions.len(), 1);
        assert_eq!(ps.debris.len(), 10);
    }

    #[test]
    fn sparks_damp_and_expire() {
        let mut rng = Lcg::new(2);
        let mut ps = ParticleSystem::new();
        ps.create_explosion(0.0, 0.0, "#FFA500", 4, &mut rng);
        let v0 = ps.sparks[0].vx.hypot(ps.sparks[0].vy);
        ps.update();
        let v1 = ps.sparks[0].vx.hypot(ps.sparks[0].vy);
        assert!(v1 < v0, "velocity should damp ({v1} !< {v0})");
        // spark life is at most 1.0, decremented 0.02 per frame
        for _ in 0..50 {
            ps.update();
        }
        assert!(ps.sparks.is_empty());
    }

    #[test]
    fn debris_accumulates_gravity() {
        let mut rng = Lcg::new(3);
        let mut ps = ParticleSystem::new();
        ps.create_debris(0.0, 0.0, "#FFA500", 1, &mut rng);
        let vy0 = ps.debris[0].vy;
        ps.update();
        ps.update();
        assert!((ps.debris[0].vy - (vy0 + 0.2)).abs() < 1e-9);
    }

    #[test]
    fn explosion_ring_eases_toward_max_radius() {
        let mut rng = Lcg::new(4);
        let mut ps = ParticleSystem::new();
        ps.create_explosion(0.0, 0.0, "#FFA500", 1, &mut rng);
        ps.update();
        let r1 = ps.explosions[0].radius;
        assert!((r1 - 5.0).abs() < 1e-9);
        ps.update();
        let r2 = ps.explosions[0].radius;
        assert!(r2 > r1 && r2 < 50.0);
        // ring life 1.0 at 0.05 per frame: gone within 20 more frames
        for _ in 0..20 {
            ps.update();
        }
        assert!(ps.explosions.is_empty());
    }

    #[test]
    fn energy_field_pulses_between_bounds() {
        let mut ps = ParticleSystem::new();
        ps.create_energy_field(0.0, 0.0, 10.0, "#00ffff");
        let mut seen_contracting = false;
        for _ in 0..80 {
            ps.update();
            if ps.energy_fields.is_empty() {
                break;
            }
            let e = &ps.energy_fields[0];
            assert!(e.radius <= e.max_radius + e.pulse_speed);
            assert!(e.radius >= e.min_radius - e.pulse_speed);
            if !e.expanding {
                seen_contracting = true;
            }
        }
        assert!(seen_contracting);
    }

    #[test]
    fn text_effect_drifts_up_and_fades() {
        let mut ps = ParticleSystem::new();
        ps.create_text_effect(100.0, 200.0, "+100".to_string(), "#FFD700", 20.0);
        ps.update();
        assert!((ps.text_effects[0].y - 198.0).abs() < 1e-9);
        for _ in 0..50 {
            ps.update();
        }
        assert!(ps.text_effects.is_empty());
    }

    #[test]
    fn trail_fades_out_in_twenty_frames() {
        let mut rng = Lcg::new(5);
        let mut ps = ParticleSystem::new();
        ps.create_trail(1.0, 1.0, "#ffffff", &mut rng);
        for _ in 0..19 {
            ps.update();
        }
        assert_eq!(ps.trails.len(), 1);
        ps.update();
        assert!(ps.trails.is_empty());
    }

    #[test]
    fn unknown_preset_is_ignored() {
        let mut rng = Lcg::new(6);
        let mut ps = ParticleSystem::new();
        ps.create_particle_effect(0.0, 0.0, "plasma", 10, &mut rng);
        assert!(ps.sparks.is_empty());
    }

    #[test]
    fn preset_scatter_uses_preset_ranges() {
        let mut rng = Lcg::new(7);
        let mut ps = ParticleSystem::new();
        ps.create_particle_effect(0.0, 0.0, "spark", 25, &mut rng);
        assert_eq!(ps.sparks.len(), 25);
        for p in &ps.sparks {
            assert!(p.size >= 1.0 && p.size < 2.0);
            assert!(p.life >= 0.2 && p.life < 0.4);
            let speed = p.vx.hypot(p.vy);
            assert!(speed >= 3.0 - 1e-9 && speed < 6.0);
        }
    }
}
