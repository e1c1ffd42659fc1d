// Tunable engine parameters.
//
// `EngineConfig` gathers every timing constant and sensor threshold the
// engine uses, so none of them appear as magic numbers in the sequencer or
// modulator. Defaults reproduce the wrist unit's shipped behavior; a JSON
// file can override any subset of fields (missing fields keep their
// defaults).
//
// The beat unit scales every rhythm pattern (see composition.rs), the rest
// length, and the accent and fast-motion durations derived from it.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::Path;

use crate::error::{Error, Result};

/// Longest accepted beat unit. Every duration the engine derives (up to
/// 10/3 of a unit, then stretched by at most `MAX_STRETCH_PERCENT`) stays
/// well inside `u32` milliseconds.
pub const MAX_BEAT_UNIT_MS: u32 = 60_000;

/// Largest accepted outro stretch.
pub const MAX_STRETCH_PERCENT: u32 = 1_000;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Base beat length in milliseconds. Rhythm patterns are multiples of it.
    pub beat_unit_ms: u32,
    /// Minimum time between two emitted events. Calls arriving sooner are
    /// no-ops.
    pub min_spacing_ms: u64,
    /// Silence longer than this restarts the piece from section A.
    pub idle_timeout_ms: u64,
    /// Above this tilt, high notes are pulled down into the mid scale.
    pub tilt_high_deg: f32,
    /// Below this tilt, mid and low notes are lifted into the high scale.
    pub tilt_low_deg: f32,
    /// Angular rate (deg/s) above which long notes are shortened.
    pub fast_motion_dps: f32,
    /// Angular rate below which outro notes are stretched.
    pub slow_motion_dps: f32,
    /// Outro stretch factor in percent (120 = x1.2).
    pub outro_stretch_percent: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            beat_unit_ms: 300,
            min_spacing_ms: 250,
            idle_timeout_ms: 10_000,
            tilt_high_deg: 60.0,
            tilt_low_deg: 20.0,
            fast_motion_dps: 200.0,
            slow_motion_dps: 50.0,
            outro_stretch_percent: 120,
        }
    }
}

impl EngineConfig {
    /// Load a config from a JSON file and validate it.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the sequencer cannot run sensibly.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_BEAT_UNIT_MS).contains(&self.beat_unit_ms) {
            return Err(Error::InvalidConfig(format!(
                "beat_unit_ms ({}) must be in 1..={MAX_BEAT_UNIT_MS}",
                self.beat_unit_ms
            )));
        }
        if !(1..=MAX_STRETCH_PERCENT).contains(&self.outro_stretch_percent) {
            return Err(Error::InvalidConfig(format!(
                "outro_stretch_percent ({}) must be in 1..={MAX_STRETCH_PERCENT}",
                self.outro_stretch_percent
            )));
        }
        if self.min_spacing_ms >= self.idle_timeout_ms {
            return Err(Error::InvalidConfig(format!(
                "min_spacing_ms ({}) must be below idle_timeout_ms ({})",
                self.min_spacing_ms, self.idle_timeout_ms
            )));
        }
        if !strictly_below(self.tilt_low_deg, self.tilt_high_deg) {
            return Err(Error::InvalidConfig(format!(
                "tilt_low_deg ({}) must be below tilt_high_deg ({})",
                self.tilt_low_deg, self.tilt_high_deg
            )));
        }
        if !strictly_below(self.slow_motion_dps, self.fast_motion_dps) {
            return Err(Error::InvalidConfig(format!(
                "slow_motion_dps ({}) must be below fast_motion_dps ({})",
                self.slow_motion_dps, self.fast_motion_dps
            )));
        }
        Ok(())
    }

    /// Two thirds of a beat: the length fast motion cuts long notes down to.
    pub fn short_note_ms(&self) -> u32 {
        self.beat_unit_ms.saturating_mul(2) / 3
    }

    /// Five thirds of a beat: the held accent length.
    pub fn accent_ms(&self) -> u32 {
        self.beat_unit_ms.saturating_mul(5) / 3
    }
}

/// `a < b`, with NaN on either side counting as not below.
fn strictly_below(a: f32, b: f32) -> bool {
    a.partial_cmp(&b) == Some(Ordering::Less)
}
