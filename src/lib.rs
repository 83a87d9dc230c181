//! voice-playout - Adaptive playback jitter buffer for streamed voice audio.
//!
//! Decouples irregularly-arriving decoded PCM chunks (pushed by a network or
//! decoder task) from a fixed-cadence, non-blocking audio render callback.
//!
//! # Data Types
//! - [`AudioSample`] - Trait for audio sample types (f32, i16, etc.)
//! - [`frame::AudioBuffer`] - A mono buffer of audio samples (raw PCM data)
//!
//! # Buffers
//! - [`buffers::PlaybackJitterBuffer`] - Growable FIFO with a buffering gate,
//!   lossy overflow/underflow handling, and barge-in clear
//!
//! # Playback
//! - [`playback::AudioPlaybackHandler`] - cpal output stream pulling fixed
//!   blocks from a playout buffer

pub mod buffers;
pub mod config;
pub mod frame;
pub mod pipeline;
pub mod playback;
pub mod sample;

pub use buffers::{PlaybackJitterBuffer, PlayoutStats};
pub use config::PlayoutConfig;
pub use frame::AudioBuffer;
pub use pipeline::{Sink, Source};
pub use playback::AudioPlaybackHandler;
pub use sample::AudioSample;
