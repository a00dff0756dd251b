//! Spin engine: winner selection, landing rotation and the spin state machine
//!
//! The engine never touches timers. `request_spin` hands back a plan the host
//! animates over `duration_ms`; the host then calls `complete_spin`.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::easing::SpinEasing;
use super::error::SpinError;
use crate::consts::*;
use crate::normalize_degrees;

/// Spin state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpinState {
    #[default]
    Idle,
    Spinning,
}

/// Spin tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinConfig {
    /// Minimum whole rotations before landing
    pub min_spins: u32,
    /// Maximum whole rotations before landing (inclusive)
    pub max_spins: u32,
    /// Landing offset bound as a fraction of a segment width, either side of center
    pub jitter_fraction: f64,
    pub base_duration_ms: f64,
    pub duration_jitter_ms: f64,
}

impl Default for SpinConfig {
    fn default() -> Self {
        Self {
            min_spins: MIN_SPINS,
            max_spins: MAX_SPINS,
            jitter_fraction: JITTER_FRACTION,
            base_duration_ms: BASE_DURATION_MS,
            duration_jitter_ms: DURATION_JITTER_MS,
        }
    }
}

impl SpinConfig {
    pub fn validate(&self) -> Result<(), SpinError> {
        if self.min_spins == 0 || self.min_spins > self.max_spins {
            return Err(SpinError::invalid(format!(
                "spin range {}..={} must be non-empty and start at 1 or more",
                self.min_spins, self.max_spins
            )));
        }
        // The landing point must stay strictly inside the winning segment
        if !(0.0..0.5).contains(&self.jitter_fraction) {
            return Err(SpinError::invalid(format!(
                "jitter fraction {} must be in [0, 0.5)",
                self.jitter_fraction
            )));
        }
        for (name, v) in [
            ("base_duration_ms", self.base_duration_ms),
            ("duration_jitter_ms", self.duration_jitter_ms),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(SpinError::invalid(format!(
                    "{} must be finite and >= 0, got {}",
                    name, v
                )));
            }
        }
        Ok(())
    }
}

/// Everything the host needs to animate one spin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinPlan {
    /// Sequence number, matched again in `complete_spin`
    pub spin_id: u64,
    pub winner_index: usize,
    /// Label captured when the spin started
    pub winner_label: String,
    /// Whether the winner came from the override instead of the RNG
    pub forced: bool,
    /// Rotation the animation starts from
    pub start_rotation_deg: f64,
    /// Rotation the animation ends at (always ahead of the start)
    pub total_rotation_deg: f64,
    pub duration_ms: f64,
    pub spin_count: u32,
    /// Offset from the winning segment's center, degrees
    pub jitter_deg: f64,
    /// Entry count the plan was computed for
    pub entry_count: usize,
}

impl SpinPlan {
    /// Wheel rotation `elapsed_ms` into the animation
    pub fn rotation_at(&self, elapsed_ms: f64, easing: &SpinEasing) -> f64 {
        let t = if self.duration_ms > 0.0 {
            elapsed_ms / self.duration_ms
        } else {
            1.0
        };
        let progress = easing.ease(t);
        if progress >= 1.0 {
            return self.total_rotation_deg;
        }
        self.start_rotation_deg + (self.total_rotation_deg - self.start_rotation_deg) * progress
    }

    /// Where the wheel comes to rest, in [0, 360)
    pub fn resting_angle(&self) -> f64 {
        normalize_degrees(self.total_rotation_deg)
    }
}

/// Result reported once the animation has finished
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinOutcome {
    pub spin_id: u64,
    pub winner_index: usize,
    pub winner_label: String,
    /// Stored rotation after completion, in [0, 360)
    pub final_rotation_deg: f64,
}

/// Owns rotation, spin flag and the pending override for one wheel
#[derive(Debug, Clone)]
pub struct SpinEngine {
    config: SpinConfig,
    rng: Pcg32,
    state: SpinState,
    rotation_deg: f64,
    override_index: Option<usize>,
    in_flight: Option<SpinPlan>,
    next_spin_id: u64,
}

impl SpinEngine {
    /// Engine with the default tuning and a fixed seed
    pub fn new(seed: u64) -> Self {
        Self::from_rng(SpinConfig::default(), Pcg32::seed_from_u64(seed))
    }

    /// Engine seeded from the OS-backed thread RNG
    pub fn from_entropy(config: SpinConfig) -> Result<Self, SpinError> {
        config.validate()?;
        Ok(Self::from_rng(config, Pcg32::from_rng(&mut rand::rng())))
    }

    pub fn with_config(config: SpinConfig, seed: u64) -> Result<Self, SpinError> {
        config.validate()?;
        Ok(Self::from_rng(config, Pcg32::seed_from_u64(seed)))
    }

    fn from_rng(config: SpinConfig, rng: Pcg32) -> Self {
        Self {
            config,
            rng,
            state: SpinState::Idle,
            rotation_deg: 0.0,
            override_index: None,
            in_flight: None,
            next_spin_id: 1,
        }
    }

    pub fn config(&self) -> &SpinConfig {
        &self.config
    }

    /// Replace the tuning; refused mid-spin
    pub fn set_config(&mut self, config: SpinConfig) -> Result<(), SpinError> {
        if self.state == SpinState::Spinning {
            return Err(SpinError::AlreadySpinning);
        }
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn state(&self) -> SpinState {
        self.state
    }

    pub fn is_spinning(&self) -> bool {
        self.state == SpinState::Spinning
    }

    /// Stored rotation, normalized after each completed spin
    pub fn rotation(&self) -> f64 {
        self.rotation_deg
    }

    pub fn in_flight(&self) -> Option<&SpinPlan> {
        self.in_flight.as_ref()
    }

    /// Force the next spin to land on `index`, or clear with `None`
    pub fn set_override(&mut self, index: Option<usize>) {
        self.override_index = index;
    }

    pub fn override_index(&self) -> Option<usize> {
        self.override_index
    }

    /// Keep the override pointing at the same entry after `index` was removed
    pub fn note_entry_removed(&mut self, index: usize) {
        self.override_index = match self.override_index {
            Some(o) if o == index => None,
            Some(o) if o > index => Some(o - 1),
            other => other,
        };
    }

    /// Spin from the stored rotation, consuming the stored override
    pub fn spin<S: AsRef<str>>(&mut self, entries: &[S]) -> Result<SpinPlan, SpinError> {
        let override_index = self.override_index;
        self.request_spin(entries, self.rotation_deg, override_index)
    }

    /// Resolve a winner and compute the rotation that lands the pointer on it
    ///
    /// Rejections leave the engine (and any stored override) untouched.
    pub fn request_spin<S: AsRef<str>>(
        &mut self,
        entries: &[S],
        current_rotation_deg: f64,
        override_index: Option<usize>,
    ) -> Result<SpinPlan, SpinError> {
        if !current_rotation_deg.is_finite() || current_rotation_deg < 0.0 {
            return Err(SpinError::invalid(format!(
                "current rotation must be finite and >= 0, got {}",
                current_rotation_deg
            )));
        }
        if current_rotation_deg > MAX_ROTATION_DEG {
            return Err(SpinError::invalid(format!(
                "current rotation must be <= {}, got {}",
                MAX_ROTATION_DEG, current_rotation_deg
            )));
        }
        if self.state == SpinState::Spinning {
            log::warn!("Spin requested while spinning, ignored");
            return Err(SpinError::AlreadySpinning);
        }
        let count = entries.len();
        if count < MIN_ENTRIES {
            log::warn!("Spin requested with {} entries, need {}", count, MIN_ENTRIES);
            return Err(SpinError::InsufficientEntries { count });
        }

        // Consumed exactly once, even when stale
        self.override_index = None;
        let forced = override_index.filter(|&i| i < count);
        if let (Some(i), None) = (override_index, forced) {
            log::warn!(
                "Override index {} out of range for {} entries, spinning randomly",
                i,
                count
            );
        }

        let winner_index = match forced {
            Some(i) => {
                log::info!("Forced winner \"{}\" (index {})", entries[i].as_ref(), i);
                i
            }
            None => {
                let i = self.rng.random_range(0..count);
                log::info!("Random winner \"{}\" (index {})", entries[i].as_ref(), i);
                i
            }
        };

        // Whole rotations only; a fractional count would shift the landing point
        let spin_count = self
            .rng
            .random_range(self.config.min_spins..=self.config.max_spins);
        let segment_angle = 360.0 / count as f64;
        let jitter_deg = (self.rng.random::<f64>() - 0.5)
            * 2.0
            * self.config.jitter_fraction
            * segment_angle;

        // Rotation that puts the winner's center under the top pointer
        let target = normalize_degrees(360.0 - (winner_index as f64 + 0.5) * segment_angle);
        let target = normalize_degrees(target + jitter_deg);
        let extra = normalize_degrees(target - normalize_degrees(current_rotation_deg));
        let total_rotation_deg = current_rotation_deg + 360.0 * spin_count as f64 + extra;

        let duration_ms =
            self.config.base_duration_ms + self.rng.random::<f64>() * self.config.duration_jitter_ms;

        let plan = SpinPlan {
            spin_id: self.next_spin_id,
            winner_index,
            winner_label: entries[winner_index].as_ref().to_string(),
            forced: forced.is_some(),
            start_rotation_deg: current_rotation_deg,
            total_rotation_deg,
            duration_ms,
            spin_count,
            jitter_deg,
            entry_count: count,
        };
        log::debug!(
            "Spin {}: {} turns + {:.2}° (jitter {:.2}°) -> {:.2}° over {:.0}ms",
            plan.spin_id,
            spin_count,
            extra,
            jitter_deg,
            total_rotation_deg,
            duration_ms
        );

        self.next_spin_id += 1;
        self.state = SpinState::Spinning;
        self.in_flight = Some(plan.clone());
        Ok(plan)
    }

    /// Finish the in-flight spin and report what was decided at plan time
    pub fn complete_spin(&mut self, plan: &SpinPlan) -> Result<SpinOutcome, SpinError> {
        let expected = match &self.in_flight {
            Some(p) => p.spin_id,
            None => return Err(SpinError::NoSpinInFlight),
        };
        if plan.spin_id != expected {
            return Err(SpinError::PlanMismatch {
                expected,
                got: plan.spin_id,
            });
        }
        let Some(stored) = self.in_flight.take() else {
            return Err(SpinError::NoSpinInFlight);
        };

        self.rotation_deg = normalize_degrees(stored.total_rotation_deg);
        self.state = SpinState::Idle;
        log::info!("Spin {} landed on \"{}\"", stored.spin_id, stored.winner_label);

        Ok(SpinOutcome {
            spin_id: stored.spin_id,
            winner_index: stored.winner_index,
            winner_label: stored.winner_label,
            final_rotation_deg: self.rotation_deg,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wheel::segment::segment_under_pointer;

    fn abcd() -> Vec<&'static str> {
        vec!["A", "B", "C", "D"]
    }

    #[test]
    fn test_forced_winner_scenario() {
        let mut engine = SpinEngine::new(12345);
        let plan = engine.request_spin(&abcd(), 0.0, Some(2)).unwrap();
        assert_eq!(plan.winner_index, 2);
        assert_eq!(plan.winner_label, "C");
        assert!(plan.forced);
        assert!(plan.total_rotation_deg >= 1800.0);
        assert!(plan.total_rotation_deg >= 1772.5 && plan.total_rotation_deg <= 3177.0);
        assert_eq!(segment_under_pointer(plan.total_rotation_deg, 4), Some(2));
        assert_eq!(engine.state(), SpinState::Spinning);
    }

    #[test]
    fn test_single_entry_rejected() {
        let mut engine = SpinEngine::new(1);
        let err = engine.request_spin(&["X"], 0.0, None).unwrap_err();
        assert_eq!(err, SpinError::InsufficientEntries { count: 1 });
        assert_eq!(engine.state(), SpinState::Idle);
        let err = engine.request_spin::<&str>(&[], 0.0, None).unwrap_err();
        assert_eq!(err, SpinError::InsufficientEntries { count: 0 });
    }

    #[test]
    fn test_rejection_keeps_stored_override() {
        let mut engine = SpinEngine::new(1);
        engine.set_override(Some(0));
        assert!(engine.spin(&["X"]).is_err());
        assert_eq!(engine.override_index(), Some(0));
    }

    #[test]
    fn test_double_request_rejected() {
        let mut engine = SpinEngine::new(7);
        let first = engine.request_spin(&abcd(), 0.0, None).unwrap();
        let err = engine.request_spin(&abcd(), 0.0, None).unwrap_err();
        assert_eq!(err, SpinError::AlreadySpinning);
        assert_eq!(engine.in_flight(), Some(&first));
    }

    #[test]
    fn test_invalid_rotation() {
        let mut engine = SpinEngine::new(7);
        for bad in [-1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                engine.request_spin(&abcd(), bad, None),
                Err(SpinError::InvalidArgument(_))
            ));
        }
        assert_eq!(engine.state(), SpinState::Idle);
    }

    #[test]
    fn test_huge_rotation_rejected() {
        let mut engine = SpinEngine::new(7);
        for bad in [1e17, MAX_ROTATION_DEG * 2.0] {
            assert!(matches!(
                engine.request_spin(&abcd(), bad, None),
                Err(SpinError::InvalidArgument(_))
            ));
        }
        assert_eq!(engine.state(), SpinState::Idle);
        assert!(engine.in_flight().is_none());
    }

    #[test]
    fn test_max_rotation_still_lands_on_winner() {
        let list: Vec<String> = (0..200).map(|i| format!("entry-{}", i)).collect();
        for seed in 0..50 {
            let mut engine = SpinEngine::new(seed);
            let plan = engine.request_spin(&list, MAX_ROTATION_DEG, None).unwrap();
            assert_eq!(
                segment_under_pointer(plan.total_rotation_deg, 200),
                Some(plan.winner_index)
            );
        }
    }

    #[test]
    fn test_from_entropy() {
        let mut engine = SpinEngine::from_entropy(SpinConfig::default()).unwrap();
        let plan = engine.spin(&abcd()).unwrap();
        assert!(plan.winner_index < 4);
        assert_eq!(segment_under_pointer(plan.total_rotation_deg, 4), Some(plan.winner_index));

        let bad = SpinConfig {
            min_spins: 0,
            ..SpinConfig::default()
        };
        assert!(matches!(
            SpinEngine::from_entropy(bad),
            Err(SpinError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_override_consumed_once() {
        let mut engine = SpinEngine::new(99);
        engine.set_override(Some(3));
        let plan = engine.spin(&abcd()).unwrap();
        assert_eq!(plan.winner_index, 3);
        assert_eq!(engine.override_index(), None);
        engine.complete_spin(&plan).unwrap();

        // Later spins are random again: over many spins, not always index 3
        let mut winners = Vec::new();
        for _ in 0..40 {
            let plan = engine.spin(&abcd()).unwrap();
            assert!(!plan.forced);
            winners.push(plan.winner_index);
            engine.complete_spin(&plan).unwrap();
        }
        assert!(winners.iter().any(|&w| w != 3));
    }

    #[test]
    fn test_stale_override_is_cleared() {
        let mut engine = SpinEngine::new(5);
        engine.set_override(Some(10));
        let plan = engine.spin(&abcd()).unwrap();
        assert!(!plan.forced);
        assert!(plan.winner_index < 4);
        assert_eq!(engine.override_index(), None);
    }

    #[test]
    fn test_complete_reports_captured_label() {
        let mut engine = SpinEngine::new(3);
        let mut entries = vec!["Ann".to_string(), "Bob".to_string(), "Cy".to_string()];
        let plan = engine.request_spin(&entries, 0.0, Some(1)).unwrap();
        entries.remove(0);
        entries.push("Dee".to_string());
        let outcome = engine.complete_spin(&plan).unwrap();
        assert_eq!(outcome.winner_label, "Bob");
        assert_eq!(outcome.winner_index, 1);
        assert_eq!(engine.state(), SpinState::Idle);
    }

    #[test]
    fn test_complete_normalizes_rotation() {
        let mut engine = SpinEngine::new(11);
        let plan = engine.spin(&abcd()).unwrap();
        let outcome = engine.complete_spin(&plan).unwrap();
        assert!(outcome.final_rotation_deg >= 0.0 && outcome.final_rotation_deg < 360.0);
        assert!((engine.rotation() - plan.resting_angle()).abs() < 1e-9);

        // Next spin starts from the stored angle
        let next = engine.spin(&abcd()).unwrap();
        assert_eq!(next.start_rotation_deg, engine.rotation());
        assert!(next.total_rotation_deg > next.start_rotation_deg);
    }

    #[test]
    fn test_complete_without_spin() {
        let mut engine = SpinEngine::new(11);
        let plan = engine.spin(&abcd()).unwrap();
        engine.complete_spin(&plan).unwrap();
        assert_eq!(engine.complete_spin(&plan), Err(SpinError::NoSpinInFlight));
    }

    #[test]
    fn test_complete_with_foreign_plan() {
        let mut engine = SpinEngine::new(2);
        let mine = engine.spin(&abcd()).unwrap();

        let mut stale = mine.clone();
        stale.spin_id += 5;
        assert_eq!(
            engine.complete_spin(&stale),
            Err(SpinError::PlanMismatch {
                expected: mine.spin_id,
                got: mine.spin_id + 5
            })
        );
        assert!(engine.is_spinning());
        assert!(engine.complete_spin(&mine).is_ok());
    }

    #[test]
    fn test_note_entry_removed() {
        let mut engine = SpinEngine::new(0);
        engine.set_override(Some(2));
        engine.note_entry_removed(3);
        assert_eq!(engine.override_index(), Some(2));
        engine.note_entry_removed(0);
        assert_eq!(engine.override_index(), Some(1));
        engine.note_entry_removed(1);
        assert_eq!(engine.override_index(), None);
    }

    #[test]
    fn test_config_validation() {
        let bad_range = SpinConfig {
            min_spins: 9,
            ..Default::default()
        };
        assert!(SpinEngine::with_config(bad_range, 0).is_err());
        let bad_jitter = SpinConfig {
            jitter_fraction: 0.5,
            ..Default::default()
        };
        assert!(SpinEngine::with_config(bad_jitter, 0).is_err());
        let bad_duration = SpinConfig {
            base_duration_ms: f64::NAN,
            ..Default::default()
        };
        assert!(SpinEngine::with_config(bad_duration, 0).is_err());
        assert!(SpinEngine::with_config(SpinConfig::default(), 0).is_ok());
    }

    #[test]
    fn test_set_config_refused_mid_spin() {
        let mut engine = SpinEngine::new(0);
        engine.spin(&abcd()).unwrap();
        assert_eq!(
            engine.set_config(SpinConfig::default()),
            Err(SpinError::AlreadySpinning)
        );
    }

    #[test]
    fn test_determinism() {
        let mut a = SpinEngine::new(424242);
        let mut b = SpinEngine::new(424242);
        for _ in 0..10 {
            let pa = a.spin(&abcd()).unwrap();
            let pb = b.spin(&abcd()).unwrap();
            assert_eq!(pa, pb);
            a.complete_spin(&pa).unwrap();
            b.complete_spin(&pb).unwrap();
        }
    }

    #[test]
    fn test_duration_bounds() {
        let mut engine = SpinEngine::new(8);
        for _ in 0..50 {
            let plan = engine.spin(&abcd()).unwrap();
            assert!(plan.duration_ms >= 4500.0 && plan.duration_ms <= 5500.0);
            assert!((5..=8).contains(&plan.spin_count));
            engine.complete_spin(&plan).unwrap();
        }
    }

    #[test]
    fn test_spin_distribution_is_even() {
        const SPINS: usize = 4000;
        let mut engine = SpinEngine::new(2024);
        let mut spin_counts = [0usize; 4];
        let mut winners = [0usize; 4];
        for _ in 0..SPINS {
            let plan = engine.spin(&abcd()).unwrap();
            spin_counts[(plan.spin_count - MIN_SPINS) as usize] += 1;
            winners[plan.winner_index] += 1;
            engine.complete_spin(&plan).unwrap();
        }
        // Expected 1000 per bucket; +-200 is far outside binomial noise
        for (i, &n) in spin_counts.iter().enumerate() {
            assert!((800..=1200).contains(&n), "spin count {} seen {} times", i + 5, n);
        }
        for (i, &n) in winners.iter().enumerate() {
            assert!((800..=1200).contains(&n), "winner {} seen {} times", i, n);
        }
    }

    #[test]
    fn test_rotation_at() {
        let mut engine = SpinEngine::new(8);
        let plan = engine.spin(&abcd()).unwrap();
        let easing = SpinEasing::default();
        assert_eq!(plan.rotation_at(0.0, &easing), plan.start_rotation_deg);
        assert_eq!(plan.rotation_at(plan.duration_ms, &easing), plan.total_rotation_deg);
        assert_eq!(plan.rotation_at(plan.duration_ms * 3.0, &easing), plan.total_rotation_deg);
        let mid = plan.rotation_at(plan.duration_ms / 2.0, &easing);
        assert!(mid > plan.start_rotation_deg && mid < plan.total_rotation_deg);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn entries(n: usize) -> Vec<String> {
            (0..n).map(|i| format!("entry-{}", i)).collect()
        }

        proptest! {
            #[test]
            fn prop_override_wins_and_is_cleared(
                n in 2usize..=200,
                pick in any::<prop::sample::Index>(),
                seed in any::<u64>(),
            ) {
                let list = entries(n);
                let k = pick.index(n);
                let mut engine = SpinEngine::new(seed);
                engine.set_override(Some(k));
                let plan = engine.spin(&list).unwrap();
                prop_assert_eq!(plan.winner_index, k);
                prop_assert_eq!(engine.override_index(), None);
                let second = {
                    engine.complete_spin(&plan).unwrap();
                    engine.spin(&list).unwrap()
                };
                prop_assert!(!second.forced);
            }

            #[test]
            fn prop_forward_and_lands_on_winner(
                n in 2usize..=200,
                current in 0.0f64..100_000.0,
                seed in any::<u64>(),
            ) {
                let list = entries(n);
                let mut engine = SpinEngine::new(seed);
                let plan = engine.request_spin(&list, current, None).unwrap();
                prop_assert!(plan.total_rotation_deg > current);
                prop_assert!(plan.total_rotation_deg - current >= 360.0 * 5.0);
                prop_assert_eq!(
                    segment_under_pointer(plan.total_rotation_deg, n),
                    Some(plan.winner_index)
                );
                let segment_angle = 360.0 / n as f64;
                prop_assert!(plan.jitter_deg.abs() <= 0.3 * segment_angle + 1e-9);
            }

            #[test]
            fn prop_too_few_entries_rejected(n in 0usize..2, seed in any::<u64>()) {
                let mut engine = SpinEngine::new(seed);
                let result = engine.spin(&entries(n));
                prop_assert_eq!(result, Err(SpinError::InsufficientEntries { count: n }));
                prop_assert_eq!(engine.state(), SpinState::Idle);
            }
        }
    }
}
