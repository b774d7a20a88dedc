//! Drifting score-text backdrop for the game-over screen.

use web_sys::CanvasRenderingContext2d;

use super::rng::Lcg;

const POP_COUNT: usize = 20;

struct ScorePop {
    x: f64,
    y: f64,
    speed: f64,
    size: f64,
    text: String,
}

pub struct GameOverFx {
    pops: Vec<ScorePop>,
    height: f64,
}

impl GameOverFx {
    pub fn new(width: f64, height: f64, rng: &mut Lcg) -> Self {
        let pops = (0..POP_COUNT)
            .map(|_| ScorePop {
                x: rng.next_f64() * width,
                y: rng.next_f64() * height,
                speed: 0.5 + rng.next_f64(),
                size: 10.0 + rng.next_f64() * 20.0,
                text: format!("+{}", rng.index(100) * 10),
            })
            .collect();
        Self { pops, height }
    }

    pub fn update(&mut self) {
        for pop in &mut self.pops {
            pop.y -= pop.speed;
            if pop.y < -50.0 {
                pop.y = self.height + 50.0;
            }
        }
    }

    pub fn draw(&self, ctx: &CanvasRenderingContext2d) {
        ctx.set_fill_style_str("rgba(255, 215, 0, 0.3)");
        ctx.set_text_align("left");
        for pop in &self.pops {
            ctx.set_font(&format!("{}px \"Press Start 2P\"", pop.size));
            ctx.fill_text(&pop.text, pop.x, pop.y).ok();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_drift_upward() {
        let mut rng = Lcg::new(1);
        let mut fx = GameOverFx::new(800.0, 600.0, &mut rng);
        let before: Vec<f64> = fx.pops.iter().map(|p| p.y).collect();
        fx.update();
        for (pop, y0) in fx.pops.iter().zip(before) {
            assert!(pop.y < y0);
        }
    }

    #[test]
    fn pops_wrap_below_the_bottom_edge() {
        let mut rng = Lcg::new(2);
        let mut fx = GameOverFx::new(800.0, 600.0, &mut rng);
        fx.pops[0].y = -50.5;
        fx.update();
        assert!(fx.pops[0].y > 600.0);
    }

    #[test]
    fn pop_texts_are_score_shaped() {
        let mut rng = Lcg::new(3);
        let fx = GameOverFx::new(800.0, 600.0, &mut rng);
        assert_eq!(fx.pops.len(), POP_COUNT);
        for pop in &fx.pops {
            assert!(pop.text.starts_with('+'));
            assert!(pop.text[1..].parse::<u32>().unwrap() % 10 == 0);
        }
    }
}
