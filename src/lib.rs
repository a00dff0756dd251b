//! Name Wheel - spin resolution and layout for a wheel-of-names widget
//!
//! Core modules:
//! - `wheel`: Segment geometry, layout, the spin engine and its session adapter
//! - `settings`: Persisted preferences (spin tuning, palette, sound)
//! - `web`: wasm-bindgen bridge for the browser host (wasm32 only)

pub mod settings;
pub mod wheel;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use settings::Settings;
pub use wheel::{
    Palette, SpinEngine, SpinError, SpinOutcome, SpinPlan, WheelLayout, WheelSession,
};

use glam::DVec2;

/// Wheel configuration constants
pub mod consts {
    /// Full rotations per spin (inclusive range)
    pub const MIN_SPINS: u32 = 5;
    pub const MAX_SPINS: u32 = 8;

    /// Landing jitter as a fraction of one segment's width, either side of center
    pub const JITTER_FRACTION: f64 = 0.3;

    /// Spin duration = base + uniform(0, jitter) milliseconds
    pub const BASE_DURATION_MS: f64 = 4500.0;
    pub const DURATION_JITTER_MS: f64 = 1000.0;

    /// Largest accepted starting rotation; past this f64 can no longer resolve
    /// a landing offset inside one segment
    pub const MAX_ROTATION_DEG: f64 = 1e9;

    /// Entries required before a spin is allowed
    pub const MIN_ENTRIES: usize = 2;

    /// Shown by the host when a spin is refused for lack of entries
    pub const INSUFFICIENT_ENTRIES_MESSAGE: &str = "Add at least 2 names!";
    /// Placeholder text drawn on an empty wheel
    pub const EMPTY_WHEEL_MESSAGE: &str = "Add names to spin!";
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f64) -> f64 {
    let a = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if a >= 360.0 { 0.0 } else { a }
}

/// Convert polar (r, degrees clockwise from 12 o'clock) to screen-space cartesian
///
/// Screen space: +x right, +y down, origin at the wheel center.
#[inline]
pub fn polar_to_cartesian(r: f64, degrees: f64) -> DVec2 {
    let theta = degrees.to_radians();
    DVec2::new(r * theta.sin(), -r * theta.cos())
}
