//! Session adapter tying the entry list, engine, rig and feedback together
//!
//! Hosts own the timers: call `spin`, animate with `rotation_at`, then call
//! `finish` once `duration_ms` has elapsed.

use super::easing::SpinEasing;
use super::engine::{SpinEngine, SpinOutcome, SpinPlan};
use super::entries::EntryList;
use super::error::SpinError;
use super::feedback::{FeedbackSink, SilentFeedback};
use super::layout::{Palette, WheelLayout};
use super::rig::{RigCapture, RigIndicator};
use crate::settings::Settings;

pub struct WheelSession {
    entries: EntryList,
    engine: SpinEngine,
    rig: RigCapture,
    palette: Palette,
    easing: SpinEasing,
    feedback: Box<dyn FeedbackSink>,
    feedback_enabled: bool,
    volume: f32,
    /// Result popup contents
    last_outcome: Option<SpinOutcome>,
    /// Highlighted row in the name list; cleared whenever the rows change
    winner_highlight: Option<usize>,
}

impl WheelSession {
    pub fn new(engine: SpinEngine, palette: Palette) -> Self {
        Self {
            entries: EntryList::new(),
            engine,
            rig: RigCapture::new(),
            palette,
            easing: SpinEasing::default(),
            feedback: Box::new(SilentFeedback),
            feedback_enabled: true,
            volume: 1.0,
            last_outcome: None,
            winner_highlight: None,
        }
    }

    /// Session configured from persisted settings
    pub fn from_settings(settings: &Settings, seed: u64) -> Result<Self, SpinError> {
        settings.validate()?;
        let engine = SpinEngine::with_config(settings.spin.clone(), seed)?;
        Ok(Self::configured(engine, settings))
    }

    /// Session configured from persisted settings, seeded from OS entropy
    pub fn from_settings_entropy(settings: &Settings) -> Result<Self, SpinError> {
        settings.validate()?;
        let engine = SpinEngine::from_entropy(settings.spin.clone())?;
        Ok(Self::configured(engine, settings))
    }

    fn configured(engine: SpinEngine, settings: &Settings) -> Self {
        let mut session = Self::new(engine, settings.palette.clone());
        session.easing = settings.easing;
        session.feedback_enabled = settings.sound_enabled;
        session.volume = settings.effective_volume();
        session
    }

    /// Swap the feedback sink; it receives the current volume right away
    pub fn with_feedback(mut self, mut feedback: Box<dyn FeedbackSink>) -> Self {
        feedback.set_volume(self.volume);
        self.feedback = feedback;
        self
    }

    /// Apply edited settings to a live session; refused mid-spin
    ///
    /// Entries, rotation, rig state and the current result are kept.
    pub fn apply_settings(&mut self, settings: &Settings) -> Result<(), SpinError> {
        if self.engine.is_spinning() {
            return Err(SpinError::AlreadySpinning);
        }
        settings.validate()?;
        self.engine.set_config(settings.spin.clone())?;
        self.palette = settings.palette.clone();
        self.easing = settings.easing;
        self.feedback_enabled = settings.sound_enabled;
        self.volume = settings.effective_volume();
        self.feedback.set_volume(self.volume);
        log::info!("Settings applied (volume {:.2})", self.volume);
        Ok(())
    }

    pub fn entries(&self) -> &EntryList {
        &self.entries
    }

    pub fn engine(&self) -> &SpinEngine {
        &self.engine
    }

    pub fn easing(&self) -> &SpinEasing {
        &self.easing
    }

    pub fn is_spinning(&self) -> bool {
        self.engine.is_spinning()
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Add a name; ignored mid-spin or when blank
    pub fn add_entry(&mut self, name: &str) -> bool {
        if self.engine.is_spinning() {
            return false;
        }
        let added = self.entries.add_entry(name);
        if added {
            // Rows are rebuilt, so the winner highlight goes away
            self.winner_highlight = None;
        }
        added
    }

    /// Remove a name; ignored mid-spin
    pub fn remove_entry(&mut self, index: usize) -> Option<String> {
        if self.engine.is_spinning() {
            return None;
        }
        let removed = self.entries.remove_entry(index)?;
        self.engine.note_entry_removed(index);
        self.rig.note_entry_removed(index);
        self.winner_highlight = None;
        Some(removed)
    }

    pub fn layout(&self, radius: f64) -> WheelLayout {
        WheelLayout::compute(self.entries.entries(), &self.palette, radius)
    }

    /// Start a spin from the stored rotation
    pub fn spin(&mut self) -> Result<SpinPlan, SpinError> {
        let plan = self.engine.spin(self.entries.entries())?;
        // The engine consumed the override; the rig buffer goes with it
        self.rig.reset();
        self.last_outcome = None;
        self.winner_highlight = None;

        if self.feedback_enabled {
            if let Err(e) = self.feedback.spin_started(plan.duration_ms) {
                log::warn!("Spin sound failed: {}", e);
            }
        }
        Ok(plan)
    }

    /// Rotation to draw `elapsed_ms` into `plan`
    pub fn rotation_at(&self, plan: &SpinPlan, elapsed_ms: f64) -> f64 {
        plan.rotation_at(elapsed_ms, &self.easing)
    }

    /// Finish the in-flight spin once its animation is done
    pub fn finish(&mut self, plan: &SpinPlan) -> Result<SpinOutcome, SpinError> {
        let outcome = self.engine.complete_spin(plan)?;
        if self.feedback_enabled {
            if let Err(e) = self.feedback.winner_announced(&outcome) {
                log::warn!("Win sound failed: {}", e);
            }
        }
        self.winner_highlight = Some(outcome.winner_index);
        self.last_outcome = Some(outcome.clone());
        Ok(outcome)
    }

    pub fn last_outcome(&self) -> Option<&SpinOutcome> {
        self.last_outcome.as_ref()
    }

    /// Row to highlight in the name list
    pub fn winner_row(&self) -> Option<usize> {
        self.winner_highlight.filter(|&i| i < self.entries.len())
    }

    /// Close the result popup and drop the row highlight with it
    pub fn dismiss_result(&mut self) {
        self.last_outcome = None;
        self.winner_highlight = None;
    }

    // === Rig ===

    pub fn rig_toggle(&mut self) {
        let matched = self.rig.toggle();
        self.engine.set_override(matched);
    }

    pub fn rig_char(&mut self, c: char) {
        let matched = self.rig.push_char(c, &self.entries);
        self.engine.set_override(matched);
    }

    pub fn rig_backspace(&mut self) {
        let matched = self.rig.backspace(&self.entries);
        self.engine.set_override(matched);
    }

    pub fn rig_confirm(&mut self) {
        let matched = self.rig.confirm();
        self.engine.set_override(matched);
    }

    pub fn rig_cancel(&mut self) {
        self.rig.cancel();
        self.engine.set_override(None);
    }

    /// Whether key input belongs to the rig (the host should not spin on Space)
    pub fn rig_capturing(&self) -> bool {
        self.rig.is_capturing()
    }

    pub fn rig_indicator(&self) -> RigIndicator {
        self.rig.indicator()
    }
}
