//! Browser entry point
//!
//! `DuckRaceApp` is what the page's script holds on to: it stages labels,
//! drives the engine from `requestAnimationFrame`, and hands back JSON for
//! drawing.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;

use crate::audio::WebAudio;
use crate::platform::{LocalStore, SystemClock};
use crate::roster::RaceConfig;
use crate::settings::{RaceDuration, Settings};
use crate::sim::RaceEngine;

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Duck Race starting...");
}

#[wasm_bindgen]
pub struct DuckRaceApp {
    engine: RaceEngine,
    config: RaceConfig,
    settings: Settings,
    audio: Rc<RefCell<WebAudio>>,
    store: LocalStore,
}

impl Default for DuckRaceApp {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl DuckRaceApp {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        let store = LocalStore;
        let settings = Settings::load(&store);

        let audio = Rc::new(RefCell::new(WebAudio::new()));
        audio.borrow_mut().apply_settings(&settings);

        let mut engine = RaceEngine::new(
            Box::new(SystemClock),
            Box::new(Rc::clone(&audio)),
            Box::new(store),
        );
        engine.set_sound_enabled(settings.sound_enabled);

        Self {
            engine,
            config: RaceConfig::new(settings.race_duration),
            settings,
            audio,
            store,
        }
    }

    /// Add labels typed by the player; returns how many were new
    pub fn add_labels(&mut self, text: &str) -> usize {
        self.config.add_from_text(text)
    }

    pub fn remove_label(&mut self, index: usize) -> bool {
        self.config.remove(index).is_some()
    }

    pub fn clear_labels(&mut self) {
        self.config.clear();
    }

    /// Staged labels as a JSON array
    pub fn labels_json(&self) -> Result<String, JsValue> {
        to_json(self.config.labels())
    }

    /// Pick one of the preset durations; other values are ignored
    pub fn set_duration_ms(&mut self, ms: u32) -> bool {
        let Some(duration) = RaceDuration::from_millis(u64::from(ms)) else {
            return false;
        };
        self.config.duration = duration;
        self.settings.race_duration = duration;
        self.settings.save(&mut self.store);
        true
    }

    pub fn sound_enabled(&self) -> bool {
        self.engine.sound_enabled()
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) {
        self.settings.sound_enabled = enabled;
        self.audio.borrow_mut().apply_settings(&self.settings);
        self.engine.set_sound_enabled(enabled);
        self.settings.save(&mut self.store);
    }

    pub fn start_race(&mut self) -> bool {
        self.engine
            .start_race(self.config.labels(), self.config.duration_ms())
    }

    pub fn pause(&mut self) -> bool {
        self.engine.pause()
    }

    pub fn resume(&mut self) -> bool {
        self.engine.resume()
    }

    pub fn reset(&mut self) -> bool {
        self.engine.reset()
    }

    pub fn clear_history(&mut self) {
        self.engine.clear_history();
    }

    /// Call once per animation frame
    pub fn update(&mut self) {
        self.engine.update();
    }

    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        to_json(&self.engine.snapshot())
    }

    pub fn history_json(&self) -> Result<String, JsValue> {
        to_json(self.engine.history())
    }

    pub fn render_positions_json(&self) -> Result<String, JsValue> {
        to_json(&self.engine.render_positions())
    }

    /// Stop timers and sound before the page drops this object
    pub fn dispose(&mut self) {
        self.engine.dispose();
    }
}
