use crate::sample::AudioSample;

/// A type-safe mono audio buffer with compile-time sample rate.
///
/// This structure ensures that code mixing streams of different sample rates
/// fails to compile rather than producing pitched-shifted audio at runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer<Sample, const SAMPLE_RATE: u32> {
    data: Vec<Sample>,
}

impl<Sample, const SAMPLE_RATE: u32> AudioBuffer<Sample, SAMPLE_RATE> {
    /// Create a new audio buffer from raw mono samples.
    pub fn new(data: Vec<Sample>) -> Self {
        Self { data }
    }

    /// Returns the number of samples in the buffer.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the buffer contains no samples.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the sample rate.
    pub const fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    /// Access the underlying raw sample data.
    pub fn data(&self) -> &[Sample] {
        &self.data
    }

    /// Access the underlying raw sample data mutably.
    pub fn data_mut(&mut self) -> &mut [Sample] {
        &mut self.data
    }

    /// Consumes the buffer and returns the raw vector.
    pub fn into_inner(self) -> Vec<Sample> {
        self.data
    }
}

impl<Sample: AudioSample, const SAMPLE_RATE: u32> AudioBuffer<Sample, SAMPLE_RATE> {
    /// Create a buffer of `len` zero-valued samples.
    pub fn silence(len: usize) -> Self {
        Self {
            data: vec![Sample::silence(); len],
        }
    }

    /// Playback duration of this buffer in milliseconds.
    pub fn duration_ms(&self) -> u64 {
        self.data.len() as u64 * 1000 / SAMPLE_RATE as u64
    }
}
