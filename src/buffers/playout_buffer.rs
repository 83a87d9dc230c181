//! A playout jitter buffer for streamed voice audio.
//!
//! Absorbs the cadence mismatch between an irregular producer (network or
//! decoder task pushing arbitrarily-sized PCM chunks) and a real-time
//! consumer (a render callback pulling fixed-size blocks on a hard deadline).
//!
//! Key design principles:
//! - The render path never blocks on the producer and never under-delivers:
//!   it pads with silence and counts the shortfall.
//! - The ingest path never fails: past the capacity ceiling it drops the
//!   oldest unplayed audio and counts the loss, favoring live responsiveness
//!   over completeness.
//! - Playback starts (and resumes after a drain or a barge-in clear) only
//!   once a configurable cushion of audio has accumulated.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Result;
use tracing::{debug, error, warn};

use crate::config::PlayoutConfig;
use crate::frame::AudioBuffer;
use crate::pipeline::{Sink, Source};
use crate::sample::AudioSample;

/// Counters for playout buffer behavior.
///
/// Both counters are monotonic and observability-only; pollers read them
/// without touching the buffer lock. Crossing each further second of audio
/// worth of counted samples emits one throttled log line.
pub struct PlayoutStats {
    dropped_samples: AtomicU64,
    underflowed_samples: AtomicU64,
    log_every: u64,
}

impl PlayoutStats {
    fn new(log_every: u64) -> Self {
        Self {
            dropped_samples: AtomicU64::new(0),
            underflowed_samples: AtomicU64::new(0),
            log_every,
        }
    }

    /// Total samples discarded by overflow since construction.
    pub fn dropped_samples(&self) -> u64 {
        self.dropped_samples.load(Ordering::Acquire)
    }

    /// Total silence samples padded into underfilled render blocks.
    pub fn underflowed_samples(&self) -> u64 {
        self.underflowed_samples.load(Ordering::Acquire)
    }

    fn record_dropped(&self, count: u64) {
        if count == 0 {
            return;
        }
        let prev = self.dropped_samples.fetch_add(count, Ordering::AcqRel);
        if prev / self.log_every != (prev + count) / self.log_every {
            warn!(
                "Playout overflow: {} samples dropped in total",
                prev + count
            );
        }
    }

    fn record_underflowed(&self, count: u64) {
        if count == 0 {
            return;
        }
        let prev = self.underflowed_samples.fetch_add(count, Ordering::AcqRel);
        if prev / self.log_every != (prev + count) / self.log_every {
            debug!(
                "Playout underflow: {} silence samples padded in total",
                prev + count
            );
        }
    }
}

/// Store, cursors, and gate state. Lives behind one short-held mutex so a
/// barge-in clear is atomic with respect to in-flight writes and reads.
struct StoreState<Sample> {
    store: Vec<Sample>,
    read_index: usize,
    write_index: usize,
    accumulating: bool,
    threshold: usize,
}

impl<Sample: AudioSample> StoreState<Sample> {
    fn available(&self) -> usize {
        self.write_index - self.read_index
    }

    fn append(&mut self, samples: &[Sample]) {
        let end = self.write_index + samples.len();
        self.store[self.write_index..end].copy_from_slice(samples);
        self.write_index = end;
    }

    /// Move the unread region down to offset 0, reclaiming played-out space
    /// without reallocating.
    fn compact(&mut self) {
        self.store.copy_within(self.read_index..self.write_index, 0);
        self.write_index -= self.read_index;
        self.read_index = 0;
    }

    /// Reallocate the store and append, dropping the oldest unread samples
    /// when even the capped capacity cannot hold everything. Returns the
    /// number of samples discarded.
    fn grow_and_append(&mut self, samples: &[Sample], max_capacity: usize) -> usize {
        let space_needed = self.available() + samples.len();
        let new_capacity = (space_needed + space_needed / 2)
            .max(self.store.len() * 2)
            .min(max_capacity);

        let mut dropped = 0;
        let mut incoming = samples;
        if new_capacity < space_needed {
            // True overflow. Keep the newest audio: discard the oldest
            // unread samples, and if the incoming chunk alone exceeds the
            // ceiling, the head of the chunk as well.
            if incoming.len() > new_capacity {
                let excess = incoming.len() - new_capacity;
                incoming = &incoming[excess..];
                dropped += excess;
            }
            let samples_to_keep = new_capacity - incoming.len();
            let drop_old = self.available().saturating_sub(samples_to_keep);
            self.read_index += drop_old;
            dropped += drop_old;
        }

        let retained = self.available();
        let mut new_store = vec![Sample::silence(); new_capacity];
        new_store[..retained].copy_from_slice(&self.store[self.read_index..self.write_index]);
        new_store[retained..retained + incoming.len()].copy_from_slice(incoming);
        self.store = new_store;
        self.read_index = 0;
        self.write_index = retained + incoming.len();
        dropped
    }
}

/// A growable FIFO playout buffer with a buffering gate and lossy
/// overflow/underflow degradation.
///
/// The buffer is safe to use across threads - an ingest task calls
/// [`write`](Self::write) while a real-time callback calls
/// [`read_into`](Self::read_into). Control calls
/// ([`clear`](Self::clear), [`set_initial_threshold`](Self::set_initial_threshold))
/// may come from either side or a third caller.
///
/// # State machine
/// Starts accumulating: reads return silence until `available >= threshold`.
/// Returns to accumulating when a read drains the store to zero or on
/// [`clear`](Self::clear).
pub struct PlaybackJitterBuffer<Sample, const SAMPLE_RATE: u32> {
    state: Mutex<StoreState<Sample>>,
    max_capacity: usize,
    stats: PlayoutStats,
}

impl<Sample: AudioSample, const SAMPLE_RATE: u32> PlaybackJitterBuffer<Sample, SAMPLE_RATE> {
    pub fn new(config: PlayoutConfig) -> Result<Self> {
        config.validate()?;
        let capacity = Self::samples_for(config.initial_capacity_ms);
        let threshold = Self::samples_for(config.initial_threshold_ms);
        // Millisecond validation cannot see the rate; the conversion itself
        // may still round down to nothing.
        if capacity == 0 || threshold == 0 {
            anyhow::bail!(
                "config rounds to zero samples at {} Hz (capacity {}, threshold {})",
                SAMPLE_RATE,
                capacity,
                threshold
            );
        }
        Ok(Self {
            state: Mutex::new(StoreState {
                store: vec![Sample::silence(); capacity],
                read_index: 0,
                write_index: 0,
                accumulating: true,
                threshold,
            }),
            max_capacity: Self::samples_for(config.max_capacity_ms),
            stats: PlayoutStats::new(SAMPLE_RATE as u64),
        })
    }

    fn samples_for(ms: u32) -> usize {
        (SAMPLE_RATE as u64 * ms as u64 / 1000) as usize
    }

    /// Append a chunk of decoded samples. Any length including zero; never
    /// blocks beyond the short index-update critical section; never fails.
    pub fn write(&self, samples: &[Sample]) {
        let Ok(mut state) = self.state.lock() else {
            error!(
                "Playout buffer mutex poisoned, {} samples lost",
                samples.len()
            );
            return;
        };

        let mut dropped = 0;
        if !samples.is_empty() {
            if state.write_index + samples.len() <= state.store.len() {
                state.append(samples);
            } else if samples.len() <= state.read_index {
                state.compact();
                state.append(samples);
            } else {
                dropped = state.grow_and_append(samples, self.max_capacity);
            }
        }

        if state.accumulating && state.available() >= state.threshold {
            state.accumulating = false;
            debug!(
                "Playout gate released: {} samples buffered (threshold {})",
                state.available(),
                state.threshold
            );
        }
        drop(state);

        self.stats.record_dropped(dropped as u64);
    }

    /// Fill `block` with exactly `block.len()` samples. Called from the
    /// real-time render path; never blocks on the producer and never
    /// allocates - a poisoned lock degrades to silence.
    pub fn read_into(&self, block: &mut [Sample]) {
        let underflowed = {
            let Ok(mut state) = self.state.lock() else {
                block.fill(Sample::silence());
                return;
            };

            if state.accumulating {
                block.fill(Sample::silence());
                return;
            }

            let copy_len = block.len().min(state.available());
            let start = state.read_index;
            block[..copy_len].copy_from_slice(&state.store[start..start + copy_len]);
            state.read_index += copy_len;
            block[copy_len..].fill(Sample::silence());

            if state.available() == 0 {
                // Fully drained: re-enter the buffering gate before playback
                // resumes.
                state.accumulating = true;
            }

            (block.len() - copy_len) as u64
        };

        self.stats.record_underflowed(underflowed);
    }

    /// Barge-in: discard all queued audio and re-arm the buffering gate.
    /// Atomic with respect to in-flight writes and reads, so it takes effect
    /// before the next render cycle completes.
    pub fn clear(&self) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        let discarded = state.available();
        state.read_index = 0;
        state.write_index = 0;
        state.accumulating = true;
        drop(state);
        debug!("Playout buffer cleared, {} queued samples discarded", discarded);
    }

    /// Override the buffering cushion for subsequent gate evaluations.
    /// Does not retroactively affect audio already past the gate.
    pub fn set_initial_threshold(&self, threshold: usize) {
        assert!(threshold > 0, "threshold must be positive");
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        let old = state.threshold;
        state.threshold = threshold;
        drop(state);
        debug!("Playout threshold changed {} -> {}", old, threshold);
    }

    /// Number of unread samples currently queued.
    pub fn available(&self) -> usize {
        self.state.lock().map(|state| state.available()).unwrap_or(0)
    }

    /// True while reads return silence waiting for the cushion to fill.
    pub fn is_accumulating(&self) -> bool {
        self.state
            .lock()
            .map(|state| state.accumulating)
            .unwrap_or(true)
    }

    /// Currently allocated store size in samples.
    pub fn capacity(&self) -> usize {
        self.state.lock().map(|state| state.store.len()).unwrap_or(0)
    }

    /// Hard ceiling the store may grow to, in samples.
    pub fn max_capacity(&self) -> usize {
        self.max_capacity
    }

    /// Monitoring counters; polling them does not touch the buffer lock.
    pub fn stats(&self) -> &PlayoutStats {
        &self.stats
    }
}

impl<Sample: AudioSample, const SAMPLE_RATE: u32> Sink
    for PlaybackJitterBuffer<Sample, SAMPLE_RATE>
{
    type Input = AudioBuffer<Sample, SAMPLE_RATE>;

    fn push(&self, input: AudioBuffer<Sample, SAMPLE_RATE>) {
        self.write(input.data());
    }
}

impl<Sample: AudioSample, const SAMPLE_RATE: u32> Source
    for PlaybackJitterBuffer<Sample, SAMPLE_RATE>
{
    type Output = AudioBuffer<Sample, SAMPLE_RATE>;

    /// Always returns `Some` with exactly `len` samples, padding with
    /// silence as needed. Prefer [`read_into`](PlaybackJitterBuffer::read_into)
    /// on the render path itself; this variant allocates the block.
    fn pull(&self, len: usize) -> Option<AudioBuffer<Sample, SAMPLE_RATE>> {
        let mut block = AudioBuffer::silence(len);
        self.read_into(block.data_mut());
        Some(block)
    }
}
