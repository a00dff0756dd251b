//! Feedback hooks (sound, haptics) around a spin
//!
//! Synthesis and playback live in the host. A failing sink must never hold
//! up the spin; `WheelSession` logs the error and carries on.

use thiserror::Error;

use super::engine::SpinOutcome;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedbackError {
    /// No output device, or the host refused playback
    #[error("feedback device unavailable: {0}")]
    Unavailable(String),

    #[error("feedback playback failed: {0}")]
    Playback(String),
}

/// Host-side sound/feedback provider
pub trait FeedbackSink {
    /// Spin animation started; `duration_ms` lets a ticking effect line up
    fn spin_started(&mut self, duration_ms: f64) -> Result<(), FeedbackError>;

    /// Animation finished and the winner is being shown
    fn winner_announced(&mut self, outcome: &SpinOutcome) -> Result<(), FeedbackError>;

    /// Playback gain in 0.0 - 1.0, already folded from master and effect volume
    fn set_volume(&mut self, _volume: f32) {}
}

/// Does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentFeedback;

impl FeedbackSink for SilentFeedback {
    fn spin_started(&mut self, _duration_ms: f64) -> Result<(), FeedbackError> {
        Ok(())
    }

    fn winner_announced(&mut self, _outcome: &SpinOutcome) -> Result<(), FeedbackError> {
        Ok(())
    }
}

/// Logs every event; handy for the native binary
#[derive(Debug, Clone, Copy)]
pub struct LogFeedback {
    volume: f32,
}

impl Default for LogFeedback {
    fn default() -> Self {
        Self { volume: 1.0 }
    }
}

impl LogFeedback {
    pub fn volume(&self) -> f32 {
        self.volume
    }
}

impl FeedbackSink for LogFeedback {
    fn spin_started(&mut self, duration_ms: f64) -> Result<(), FeedbackError> {
        log::info!("♪ spin ticks for {:.0}ms at {:.0}%", duration_ms, self.volume * 100.0);
        Ok(())
    }

    fn winner_announced(&mut self, outcome: &SpinOutcome) -> Result<(), FeedbackError> {
        log::info!(
            "♪ fanfare for \"{}\" at {:.0}%",
            outcome.winner_label,
            self.volume * 100.0
        );
        Ok(())
    }

    fn set_volume(&mut self, volume: f32) {
        log::debug!("Feedback volume set to {:.2}", volume);
        self.volume = volume;
    }
}
