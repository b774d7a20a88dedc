//! Image table for the render layer.
//!
//! Entries that fail to load are dropped from the table; every draw site asks
//! through `image()` and falls back to flat-color placeholder shapes when the
//! answer is None, so a missing sprite can never fail a frame.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::HtmlImageElement;

use crate::console_log;

const MANIFEST: &[(&str, &str)] = &[
    ("player_ship", "assets/mainship.png"),
    ("enemy_ship", "assets/enemyship.png"),
    ("mother_ship", "assets/mothership.png"),
    ("bullet", "assets/bullet.png"),
    ("missile", "assets/missile.png"),
    ("game_background", "assets/game.jpg"),
    ("menu_background", "assets/backg.png"),
    ("heart", "assets/heart.png"),
];

pub struct AssetStore {
    images: RefCell<HashMap<&'static str, HtmlImageElement>>,
    pending: Cell<usize>,
    loaded: Cell<bool>,
}

impl AssetStore {
    /// Kick off loading of the whole manifest. The store is usable
    /// immediately; `image()` answers None until everything has settled.
    pub fn load() -> Result<Rc<Self>, JsValue> {
        let store = Rc::new(Self {
            images: RefCell::new(HashMap::new()),
            pending: Cell::new(MANIFEST.len()),
            loaded: Cell::new(false),
        });

        for (name, src) in MANIFEST {
            let img = HtmlImageElement::new()?;
            img.set_src(src);

            {
                let store = store.clone();
                let on_load = Closure::wrap(Box::new(move || {
                    store.settle();
                }) as Box<dyn FnMut()>);
                img.set_onload(Some(on_load.as_ref().unchecked_ref()));
                on_load.forget();
            }
            {
                let store = store.clone();
                let name = *name;
                let on_error = Closure::wrap(Box::new(move || {
                    console_log!("typeship: failed to load '{name}', using placeholder");
                    store.images.borrow_mut().remove(name);
                    store.settle();
                }) as Box<dyn FnMut()>);
                img.set_onerror(Some(on_error.as_ref().unchecked_ref()));
                on_error.forget();
            }

            store.images.borrow_mut().insert(name, img);
        }

        Ok(store)
    }

    fn settle(&self) {
        let left = self.pending.get().saturating_sub(1);
        self.pending.set(left);
        if left == 0 {
            self.loaded.set(true);
            console_log!("typeship: asset loading settled");
        }
    }

    pub fn loaded(&self) -> bool {
        self.loaded.get()
    }

    /// Drawable for `name`, or None when still loading or load failed.
    pub fn image(&self, name: &str) -> Option<HtmlImageElement> {
        if !self.loaded.get() {
            return None;
        }
        self.images.borrow().get(name).cloned()
    }
}
