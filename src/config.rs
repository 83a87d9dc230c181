//! Configuration for playout buffering.

use anyhow::Result;

/// Sizing for a [`PlaybackJitterBuffer`](crate::buffers::PlaybackJitterBuffer).
///
/// All fields are denominated in milliseconds of audio so one config works
/// for any sample rate; conversion to sample counts happens at buffer
/// construction against the buffer's compile-time rate.
#[derive(Clone, Debug)]
pub struct PlayoutConfig {
    /// Store size allocated up front.
    pub initial_capacity_ms: u32,
    /// Hard ceiling the store may grow to. Writes beyond this drop the
    /// oldest unplayed audio rather than failing.
    pub max_capacity_ms: u32,
    /// Audio that must accumulate before playback starts (or resumes after
    /// a drain or a barge-in clear).
    pub initial_threshold_ms: u32,
}

impl Default for PlayoutConfig {
    fn default() -> Self {
        Self {
            initial_capacity_ms: 2_000,
            max_capacity_ms: 300_000,
            initial_threshold_ms: 200,
        }
    }
}

impl PlayoutConfig {
    /// Check that the sizes are internally consistent.
    pub fn validate(&self) -> Result<()> {
        if self.initial_capacity_ms == 0 {
            anyhow::bail!("initial_capacity_ms must be positive");
        }
        if self.max_capacity_ms == 0 {
            anyhow::bail!("max_capacity_ms must be positive");
        }
        if self.initial_threshold_ms == 0 {
            anyhow::bail!("initial_threshold_ms must be positive");
        }
        if self.initial_capacity_ms > self.max_capacity_ms {
            anyhow::bail!(
                "initial_capacity_ms {} exceeds max_capacity_ms {}",
                self.initial_capacity_ms,
                self.max_capacity_ms
            );
        }
        if self.initial_threshold_ms > self.initial_capacity_ms {
            anyhow::bail!(
                "initial_threshold_ms {} exceeds initial_capacity_ms {}",
                self.initial_threshold_ms,
                self.initial_capacity_ms
            );
        }
        Ok(())
    }
}
