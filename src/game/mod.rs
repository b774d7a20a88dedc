//! Browser session shell.
//!
//! Owns the web plumbing around the pure `World`: the canvas, the keyboard
//! and resize listeners, the requestAnimationFrame loop and the mode switch
//! deciding what updates and draws each frame. Session state lives in a
//! thread-local cell; listener closures are installed once and leaked into
//! the page for the lifetime of the tab.

pub mod assets;
pub mod gameover;
pub mod modes;
pub mod particles;
pub mod player;
pub mod projectile;
pub mod rng;
#[cfg(feature = "serde_json")]
pub mod save;
pub mod ships;
pub mod stats;
pub mod world;

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, window};

use crate::console_log;
use self::assets::AssetStore;
use self::gameover::GameOverFx;
use self::modes::{Mode, ModeStack};
use self::rng::Lcg;
use self::world::World;

struct Session {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    assets: Rc<AssetStore>,
    modes: ModeStack,
    world: Option<World>,
    gameover_fx: Option<GameOverFx>,
    stats_recorded: bool,
}

thread_local! {
    static SESSION: RefCell<Option<Session>> = RefCell::new(None);
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

pub fn start_session() -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let (view_w, view_h) = viewport_size();

    // Create / reuse the full-viewport game canvas
    let canvas: HtmlCanvasElement = if let Some(el) = doc.get_element_by_id("ts-game-canvas") {
        el.dyn_into()?
    } else {
        let c: HtmlCanvasElement = doc.create_element("canvas")?.dyn_into()?;
        c.set_id("ts-game-canvas");
        c.set_attribute(
            "style",
            "position:fixed; left:0; top:0; z-index:10; background:#000033;",
        )
        .ok();
        doc.body()
            .ok_or_else(|| JsValue::from_str("no body"))?
            .append_child(&c)?;
        c
    };
    canvas.set_width(view_w as u32);
    canvas.set_height(view_h as u32);

    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into()?;

    let assets = AssetStore::load()?;
    console_log!("typeship: session starting at {}x{}", view_w as u32, view_h as u32);

    SESSION.with(|cell| {
        cell.replace(Some(Session {
            canvas: canvas.clone(),
            ctx,
            assets,
            modes: ModeStack::new(),
            world: None,
            gameover_fx: None,
            stats_recorded: false,
        }))
    });

    // Keyboard listener: control keys drive the mode stack, printable
    // characters feed the typing router.
    {
        let closure = Closure::wrap(Box::new(move |evt: KeyboardEvent| {
            let now = crate::performance_now();
            SESSION.with(|cell| {
                if let Some(session) = cell.borrow_mut().as_mut() {
                    handle_keydown(session, &evt, now);
                }
            });
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Resize listener keeps the canvas at viewport size and the player
    // centered horizontally, anchored near the bottom.
    {
        let closure = Closure::wrap(Box::new(move || {
            let (w, h) = viewport_size();
            SESSION.with(|cell| {
                if let Some(session) = cell.borrow_mut().as_mut() {
                    session.canvas.set_width(w as u32);
                    session.canvas.set_height(h as u32);
                    if let Some(world) = session.world.as_mut() {
                        world.resize(w, h);
                    }
                }
            });
        }) as Box<dyn FnMut()>);
        win.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    start_frame_loop();
    Ok(())
}

fn viewport_size() -> (f64, f64) {
    let win = window();
    let w = win
        .as_ref()
        .and_then(|w| w.inner_width().ok())
        .and_then(|v| v.as_f64())
        .unwrap_or(960.0);
    let h = win
        .as_ref()
        .and_then(|w| w.inner_height().ok())
        .and_then(|v| v.as_f64())
        .unwrap_or(540.0);
    (w, h)
}

fn start_frame_loop() {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        SESSION.with(|cell| {
            if let Some(session) = cell.borrow_mut().as_mut() {
                frame_tick(session, ts);
            }
        });
        if let Some(w) = window() {
            let _ =
                w.request_animation_frame(f.borrow().as_ref().unwrap().as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64)>));
    if let Some(w) = window() {
        let _ = w.request_animation_frame(g.borrow().as_ref().unwrap().as_ref().unchecked_ref());
    }
}

fn frame_tick(session: &mut Session, now: f64) {
    match session.modes.current() {
        Mode::Menu => draw_menu(session),
        Mode::Playing => {
            if let Some(world) = session.world.as_mut() {
                world.update(now);
            }
            draw_world(session, now);
            let finished = session.world.as_ref().is_some_and(|w| w.game_over);
            if finished {
                finish_run(session);
            }
        }
        Mode::Paused => {
            draw_world(session, now);
            draw_caption(session, "PAUSED", "Esc resumes");
        }
        Mode::GameOver => {
            draw_world(session, now);
            if let Some(fx) = session.gameover_fx.as_mut() {
                fx.update();
            }
            draw_game_over(session);
        }
    }
}

fn handle_keydown(session: &mut Session, evt: &KeyboardEvent, now: f64) {
    match evt.code().as_str() {
        "Space" => {
            evt.prevent_default();
            if matches!(session.modes.current(), Mode::Menu | Mode::GameOver) {
                begin_run(session, now);
                return;
            }
            // mid-game Space falls through to the typing router as a miss
        }
        "Escape" => {
            match session.modes.current() {
                Mode::Playing => session.modes.push(Mode::Paused),
                Mode::Paused => session.modes.pop(),
                _ => {}
            }
            return;
        }
        #[cfg(feature = "serde_json")]
        "KeyS" => {
            // snapshot alongside typing the letter, never instead of it
            if let Some(world) = session.world.as_ref() {
                save::store(world);
            }
        }
        #[cfg(feature = "serde_json")]
        "KeyL" => {
            if let Some(world) = session.world.as_mut() {
                save::load_into(world, now);
            }
        }
        _ => {}
    }

    if session.modes.current() != Mode::Playing {
        return;
    }
    let key = evt.key();
    let mut chars = key.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if let Some(world) = session.world.as_mut() {
            world.handle_key(c, now);
        }
    }
}

#[cfg(feature = "rng")]
fn session_rng(_now: f64) -> Lcg {
    Lcg::from_entropy()
}

#[cfg(not(feature = "rng"))]
fn session_rng(now: f64) -> Lcg {
    Lcg::from_clock(now)
}

fn begin_run(session: &mut Session, now: f64) {
    let width = session.canvas.width() as f64;
    let height = session.canvas.height() as f64;

    session.world = Some(World::new(width, height, now, session_rng(now)));
    session.gameover_fx = None;
    session.stats_recorded = false;
    session.modes.push(Mode::Playing);
    console_log!("typeship: new run");
}

/// Transition out of Playing once the world reports game over: record stats
/// exactly once, build the drifting-score backdrop, switch modes.
fn finish_run(session: &mut Session) {
    if let Some(world) = session.world.as_mut() {
        if !session.stats_recorded {
            stats::record_game_over(world);
            session.stats_recorded = true;
        }
        if session.gameover_fx.is_none() {
            session.gameover_fx = Some(GameOverFx::new(
                world.width,
                world.height,
                &mut world.rng,
            ));
        }
    }
    session.modes.push(Mode::GameOver);
}

// --- Rendering ---------------------------------------------------------------

fn draw_world(session: &Session, now: f64) {
    let Some(world) = session.world.as_ref() else {
        return;
    };
    let ctx = &session.ctx;
    let assets = &session.assets;

    if let Some(img) = assets.image("game_background") {
        ctx.draw_image_with_html_image_element_and_dw_and_dh(
            &img, 0.0, 0.0, world.width, world.height,
        )
        .ok();
        // dark wash so words stay readable over the art
        ctx.set_fill_style_str("rgba(0, 0, 0, 0.4)");
        ctx.fill_rect(0.0, 0.0, world.width, world.height);
    } else {
        ctx.set_fill_style_str("#000033");
        ctx.fill_rect(0.0, 0.0, world.width, world.height);
    }

    world.player.draw(ctx, assets, now);
    for ship in &world.ships {
        ship.draw(ctx, assets, world.is_target(ship.id), now);
    }
    world.particles.draw(ctx);
    for shot in &world.orphan_shots {
        shot.draw(ctx, assets);
    }

    draw_hud(ctx, world);
}

fn draw_hud(ctx: &CanvasRenderingContext2d, world: &World) {
    let padding = 20.0;
    let panel_width = 280.0;
    let panel_height = 80.0;

    ctx.set_fill_style_str("rgba(0, 0, 0, 0.5)");
    ctx.fill_rect(
        world.width - panel_width - padding,
        padding,
        panel_width,
        panel_height,
    );

    ctx.set_fill_style_str("#FFFFFF");
    ctx.set_font("20px \"Press Start 2P\"");
    ctx.set_text_align("right");
    ctx.fill_text(
        &format!("Score: {}", world.score),
        world.width - padding - 20.0,
        padding + 30.0,
    )
    .ok();
    ctx.fill_text(
        &format!("Level: {}", world.level),
        world.width - padding - 20.0,
        padding + 60.0,
    )
    .ok();
}

fn draw_menu(session: &Session) {
    let ctx = &session.ctx;
    let width = session.canvas.width() as f64;
    let height = session.canvas.height() as f64;

    if let Some(img) = session.assets.image("menu_background") {
        ctx.draw_image_with_html_image_element_and_dw_and_dh(&img, 0.0, 0.0, width, height)
            .ok();
    } else {
        ctx.set_fill_style_str("#000033");
        ctx.fill_rect(0.0, 0.0, width, height);
    }

    let cx = width / 2.0;
    let cy = height / 2.0;

    ctx.set_text_align("center");
    ctx.set_line_width(6.0);
    ctx.set_stroke_style_str("#000000");
    ctx.set_fill_style_str("#FFFFFF");
    ctx.set_font("48px \"Press Start 2P\"");
    ctx.stroke_text("TYPESHIP", cx, cy - 40.0).ok();
    ctx.fill_text("TYPESHIP", cx, cy - 40.0).ok();

    ctx.set_font("20px \"Press Start 2P\"");
    ctx.set_fill_style_str("#FFD700");
    ctx.fill_text("Press Space to sail", cx, cy + 30.0).ok();
}

fn draw_caption(session: &Session, title: &str, hint: &str) {
    let ctx = &session.ctx;
    let width = session.canvas.width() as f64;
    let height = session.canvas.height() as f64;

    ctx.set_fill_style_str("rgba(0, 0, 0, 0.55)");
    ctx.fill_rect(0.0, 0.0, width, height);

    let cx = width / 2.0;
    let cy = height / 2.0;

    ctx.set_text_align("center");
    ctx.set_fill_style_str("#FFFFFF");
    ctx.set_line_width(6.0);
    ctx.set_stroke_style_str("#000000");
    ctx.set_font("48px \"Press Start 2P\"");
    ctx.stroke_text(title, cx, cy).ok();
    ctx.fill_text(title, cx, cy).ok();

    ctx.set_font("16px \"Press Start 2P\"");
    ctx.fill_text(hint, cx, cy + 44.0).ok();
}

fn draw_game_over(session: &Session) {
    let ctx = &session.ctx;
    let width = session.canvas.width() as f64;
    let height = session.canvas.height() as f64;

    ctx.set_fill_style_str("rgba(0, 0, 0, 0.55)");
    ctx.fill_rect(0.0, 0.0, width, height);

    if let Some(fx) = session.gameover_fx.as_ref() {
        fx.draw(ctx);
    }

    let cx = width / 2.0;
    let cy = height / 2.0;

    ctx.set_text_align("center");
    ctx.set_fill_style_str("#FFFFFF");
    ctx.set_line_width(6.0);
    ctx.set_stroke_style_str("#000000");
    ctx.set_font("48px \"Press Start 2P\"");
    ctx.stroke_text("GAME OVER", cx, cy - 60.0).ok();
    ctx.fill_text("GAME OVER", cx, cy - 60.0).ok();

    if let Some(world) = session.world.as_ref() {
        let stats = stats::collect(world);
        ctx.set_font("16px \"Press Start 2P\"");
        ctx.fill_text(&format!("Score: {}", stats.score), cx, cy).ok();
        ctx.fill_text(&format!("Level: {}", stats.level), cx, cy + 28.0)
            .ok();
        ctx.fill_text(&format!("Accuracy: {}%", stats.accuracy), cx, cy + 56.0)
            .ok();
        ctx.fill_text(
            &format!("Ships sunk: {}", stats.ships_destroyed),
            cx,
            cy + 84.0,
        )
        .ok();
    }

    ctx.set_fill_style_str("#FFD700");
    ctx.set_font("16px \"Press Start 2P\"");
    ctx.fill_text("Press Space to restart", cx, cy + 128.0).ok();
}
