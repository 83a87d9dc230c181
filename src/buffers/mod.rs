//! Audio buffer implementations.
//!
//! - [`PlaybackJitterBuffer`] - Growable FIFO decoupling an irregular ingest
//!   task from a fixed-cadence render callback

pub mod playout_buffer;

pub use playout_buffer::{PlaybackJitterBuffer, PlayoutStats};
