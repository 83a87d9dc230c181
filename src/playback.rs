use std::sync::Arc;

use anyhow::{Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleFormat, Stream, StreamConfig};
use dasp_sample::FromSample;
use tracing::{error, info};

use crate::buffers::PlaybackJitterBuffer;
use crate::sample::AudioSample;

pub struct AudioPlaybackHandler {
    _stream: Stream,
}

impl AudioPlaybackHandler {
    /// Start audio playback from a playout buffer.
    ///
    /// Opens the default output device at the buffer's sample rate and pulls
    /// one fixed block per render callback. The buffer is mono; each sample
    /// goes through the normalized conversion path to the device format and
    /// is fanned out across the device channels.
    pub fn start<Sample: AudioSample, const SAMPLE_RATE: u32>(
        buffer: Arc<PlaybackJitterBuffer<Sample, SAMPLE_RATE>>,
    ) -> Result<Self> {
        let host = cpal::default_host();

        let device = host
            .default_output_device()
            .context("No output device available")?;

        info!(
            "Using output device: {}",
            device.name().unwrap_or_else(|_| "Unknown".to_string())
        );

        let default_config = device
            .default_output_config()
            .context("Failed to get default output config")?;

        info!("Output config: {:?}", default_config);

        // The buffer is fixed-rate; resampling is the host's business.
        let stream_config = StreamConfig {
            channels: default_config.channels().min(2),
            sample_rate: cpal::SampleRate(SAMPLE_RATE),
            buffer_size: cpal::BufferSize::Default,
        };

        let stream = match default_config.sample_format() {
            SampleFormat::I16 => Self::build_output_stream::<i16, Sample, SAMPLE_RATE>(
                &device,
                &stream_config,
                buffer,
            )?,
            SampleFormat::U16 => Self::build_output_stream::<u16, Sample, SAMPLE_RATE>(
                &device,
                &stream_config,
                buffer,
            )?,
            SampleFormat::F32 => Self::build_output_stream::<f32, Sample, SAMPLE_RATE>(
                &device,
                &stream_config,
                buffer,
            )?,
            format => anyhow::bail!("Unsupported sample format: {:?}", format),
        };

        stream.play().context("Failed to play stream")?;

        info!("Audio playback started");

        Ok(Self { _stream: stream })
    }

    fn build_output_stream<T, Sample, const SAMPLE_RATE: u32>(
        device: &Device,
        config: &StreamConfig,
        buffer: Arc<PlaybackJitterBuffer<Sample, SAMPLE_RATE>>,
    ) -> Result<Stream>
    where
        T: cpal::Sample + cpal::SizedSample,
        T: FromSample<f32>,
        Sample: AudioSample,
    {
        let channels = config.channels as usize;
        // Scratch block reused across callbacks; it only reallocates if the
        // host hands us a larger callback buffer than before.
        let mut block: Vec<Sample> = Vec::new();

        let stream = device
            .build_output_stream(
                config,
                move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                    let frames = data.len() / channels;
                    if block.len() < frames {
                        block.resize(frames, Sample::silence());
                    }
                    buffer.read_into(&mut block[..frames]);

                    for (frame, &sample) in data.chunks_mut(channels).zip(block.iter()) {
                        let converted = T::from_sample(sample.to_f64_normalized() as f32);
                        for slot in frame.iter_mut() {
                            *slot = converted;
                        }
                    }
                },
                move |err| {
                    error!("Audio playback error: {}", err);
                },
                None,
            )
            .context("Failed to build output stream")?;

        Ok(stream)
    }
}
