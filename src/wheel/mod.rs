//! Wheel module
//!
//! Everything that decides what the wheel looks like and where it stops:
//! - Pure layout (colors, label sizing) recomputed from the entry list
//! - A seeded spin engine that owns rotation, spin flag and override
//! - No DOM, timers or audio; hosts drive those through `WheelSession`

pub mod easing;
pub mod engine;
pub mod entries;
pub mod error;
pub mod feedback;
pub mod layout;
pub mod rig;
pub mod segment;
pub mod session;

pub use easing::SpinEasing;
pub use engine::{SpinConfig, SpinEngine, SpinOutcome, SpinPlan, SpinState};
pub use entries::EntryList;
pub use error::SpinError;
pub use feedback::{FeedbackError, FeedbackSink, LogFeedback, SilentFeedback};
pub use layout::{
    Color, Palette, SegmentStyle, WheelLayout, font_size_for, hub_radius, text_radius_fraction,
    truncate_label,
};
pub use rig::{RigCapture, RigIndicator};
pub use segment::{Segment, segment_under_pointer};
pub use session::WheelSession;
