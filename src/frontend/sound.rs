use anyhow::{bail, Context};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};

const TONE_HZ: f32 = 440.0;

/// A 440 Hz tone that plays while the sound timer is running.
///
/// The output stream is opened once and paused/resumed as the sound flag
/// changes, rather than rebuilt for every beep.
pub struct Sound {
    stream: cpal::Stream,
    playing: bool,
}

impl Sound {
    pub fn new() -> anyhow::Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .context("no output device available")?;
        let mut supported_configs_range = device
            .supported_output_configs()
            .context("error while querying configs")?;
        let supported_config = supported_configs_range
            .next()
            .context("no supported output config")?
            .with_max_sample_rate();
        let sample_format = supported_config.sample_format();
        let config: cpal::StreamConfig = supported_config.into();

        let stream = match sample_format {
            cpal::SampleFormat::I8 => Self::build::<i8>(&device, &config),
            cpal::SampleFormat::I16 => Self::build::<i16>(&device, &config),
            cpal::SampleFormat::I32 => Self::build::<i32>(&device, &config),
            cpal::SampleFormat::I64 => Self::build::<i64>(&device, &config),
            cpal::SampleFormat::U8 => Self::build::<u8>(&device, &config),
            cpal::SampleFormat::U16 => Self::build::<u16>(&device, &config),
            cpal::SampleFormat::U32 => Self::build::<u32>(&device, &config),
            cpal::SampleFormat::U64 => Self::build::<u64>(&device, &config),
            cpal::SampleFormat::F32 => Self::build::<f32>(&device, &config),
            cpal::SampleFormat::F64 => Self::build::<f64>(&device, &config),
            sample_format => bail!("unsupported sample format '{sample_format}'"),
        }?;
        stream.pause().context("failed to pause output stream")?;
        log::debug!(
            "audio: {} channel(s) at {} Hz, {sample_format}",
            config.channels,
            config.sample_rate.0
        );

        Ok(Self {
            stream,
            playing: false,
        })
    }

    /// Starts or stops the tone. Cheap to call every cycle.
    pub fn set_active(&mut self, active: bool) -> anyhow::Result<()> {
        if active == self.playing {
            return Ok(());
        }
        if active {
            self.stream.play().context("failed to start tone")?;
        } else {
            self.stream.pause().context("failed to stop tone")?;
        }
        self.playing = active;
        Ok(())
    }

    fn build<T>(device: &cpal::Device, config: &cpal::StreamConfig) -> anyhow::Result<cpal::Stream>
    where
        T: SizedSample + FromSample<f32>,
    {
        let sample_rate = config.sample_rate.0 as f32;
        let channels = config.channels as usize;

        // Produce a sinusoid of maximum amplitude.
        let mut sample_clock = 0f32;
        let mut next_value = move || {
            sample_clock = (sample_clock + 1.0) % sample_rate;
            (sample_clock * TONE_HZ * 2.0 * std::f32::consts::PI / sample_rate).sin()
        };

        let err_fn = |err| log::error!("an error occurred on stream: {err}");

        device
            .build_output_stream(
                config,
                move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                    write_data(data, channels, &mut next_value)
                },
                err_fn,
                None,
            )
            .context("failed to build output stream")
    }
}

fn write_data<T>(output: &mut [T], channels: usize, next_sample: &mut dyn FnMut() -> f32)
where
    T: Sample + FromSample<f32>,
{
    for frame in output.chunks_mut(channels) {
        let value: T = T::from_sample(next_sample());
        for sample in frame.iter_mut() {
            *sample = value;
        }
    }
}
