//! Browser bridge
//!
//! A thin wasm-bindgen handle over `WheelSession`. The page keeps its DOM,
//! canvas and timers; plans, outcomes and layouts cross the boundary as JSON.

use wasm_bindgen::prelude::*;

use crate::consts::INSUFFICIENT_ENTRIES_MESSAGE;
use crate::settings::Settings;
use crate::wheel::{LogFeedback, SpinError, SpinPlan, WheelSession};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Name wheel ready");
}

fn spin_error_to_js(e: SpinError) -> JsValue {
    match e {
        SpinError::InsufficientEntries { .. } => JsValue::from_str(INSUFFICIENT_ENTRIES_MESSAGE),
        other => JsValue::from_str(&other.to_string()),
    }
}

fn json_error_to_js(e: serde_json::Error) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen]
pub struct WheelHandle {
    session: WheelSession,
    settings: Settings,
    plan: Option<SpinPlan>,
}

#[wasm_bindgen]
impl WheelHandle {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<WheelHandle, JsValue> {
        let settings = Settings::load();
        let session = WheelSession::from_settings_entropy(&settings)
            .map_err(spin_error_to_js)?
            .with_feedback(Box::new(LogFeedback::default()));
        Ok(WheelHandle {
            session,
            settings,
            plan: None,
        })
    }

    /// Current settings as JSON, for the settings panel
    pub fn settings_json(&self) -> Result<String, JsValue> {
        self.settings.to_json().map_err(json_error_to_js)
    }

    /// Validate, apply and persist edited settings; refused mid-spin
    pub fn set_settings_json(&mut self, json: &str) -> Result<(), JsValue> {
        let settings = Settings::from_json(json).map_err(json_error_to_js)?;
        self.session
            .apply_settings(&settings)
            .map_err(spin_error_to_js)?;
        settings.save();
        self.settings = settings;
        Ok(())
    }

    pub fn add_entry(&mut self, name: &str) -> bool {
        self.session.add_entry(name)
    }

    pub fn remove_entry(&mut self, index: usize) -> bool {
        self.session.remove_entry(index).is_some()
    }

    pub fn count_label(&self) -> String {
        self.session.entries().count_label()
    }

    pub fn is_spinning(&self) -> bool {
        self.session.is_spinning()
    }

    /// Layout for the configured radius, as JSON
    pub fn layout_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.layout(self.settings.wheel_radius))
            .map_err(json_error_to_js)
    }

    /// Start a spin; rejects with a display message
    pub fn spin(&mut self) -> Result<String, JsValue> {
        let plan = self.session.spin().map_err(spin_error_to_js)?;
        let json = serde_json::to_string(&plan).map_err(json_error_to_js)?;
        self.plan = Some(plan);
        Ok(json)
    }

    /// Rotation to draw `elapsed_ms` into the current spin
    pub fn rotation_at(&self, elapsed_ms: f64) -> f64 {
        match &self.plan {
            Some(plan) => self.session.rotation_at(plan, elapsed_ms),
            None => self.session.engine().rotation(),
        }
    }

    /// Finish the current spin; call from the animation-end timer
    pub fn complete(&mut self) -> Result<String, JsValue> {
        let plan = self.plan.take().ok_or_else(|| spin_error_to_js(SpinError::NoSpinInFlight))?;
        let outcome = self.session.finish(&plan).map_err(spin_error_to_js)?;
        serde_json::to_string(&outcome).map_err(json_error_to_js)
    }

    pub fn winner_row(&self) -> Option<usize> {
        self.session.winner_row()
    }

    pub fn dismiss_result(&mut self) {
        self.session.dismiss_result();
    }

    pub fn rig_toggle(&mut self) {
        self.session.rig_toggle();
    }

    pub fn rig_char(&mut self, c: char) {
        self.session.rig_char(c);
    }

    pub fn rig_backspace(&mut self) {
        self.session.rig_backspace();
    }

    pub fn rig_confirm(&mut self) {
        self.session.rig_confirm();
    }

    pub fn rig_cancel(&mut self) {
        self.session.rig_cancel();
    }

    pub fn rig_capturing(&self) -> bool {
        self.session.rig_capturing()
    }

    /// "", "capturing" or "locked"
    pub fn rig_indicator(&self) -> String {
        use crate::wheel::RigIndicator;
        match self.session.rig_indicator() {
            RigIndicator::None => "",
            RigIndicator::Capturing => "capturing",
            RigIndicator::Locked => "locked",
        }
        .to_string()
    }
}
