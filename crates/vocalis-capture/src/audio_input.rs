//! Microphone capture through CPAL.
//!
//! The capture callback keeps one channel, converts it to `f32` and hands
//! each period to the recording thread over a bounded crossbeam channel.
//! The callback never blocks: when the queue is full the chunk is dropped
//! and counted.

use crate::config::RecordingConfig;
use crate::source::{CaptureSource, SourceEvent};
use crate::{Error, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Input device information
#[derive(Debug, Clone)]
pub struct InputDeviceInfo {
    /// Device index
    pub index: usize,
    /// Device name
    pub name: String,
    /// Number of input channels
    pub channels: u16,
    /// Supported sample rates
    pub sample_rates: Vec<u32>,
}

/// Opens microphone streams with a fixed recording configuration.
pub struct AudioInput {
    config: RecordingConfig,
}

impl AudioInput {
    pub fn new(config: RecordingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn list_input_devices(&self) -> Vec<InputDeviceInfo> {
        let host = cpal::default_host();
        let mut devices = Vec::new();

        if let Ok(input_devices) = host.input_devices() {
            for (idx, device) in input_devices.enumerate() {
                let name = device.name().unwrap_or_else(|_| "Unknown".to_string());

                let (channels, sample_rates) = match device.default_input_config() {
                    Ok(config) => (config.channels(), vec![config.sample_rate().0]),
                    Err(_) => (1, Vec::new()),
                };

                devices.push(InputDeviceInfo {
                    index: idx,
                    name,
                    channels,
                    sample_rates,
                });
            }
        }

        devices
    }

    pub fn default_device_info(&self) -> Option<InputDeviceInfo> {
        let host = cpal::default_host();
        let device = host.default_input_device()?;
        let name = device.name().unwrap_or_else(|_| "Default".to_string());
        let config = device.default_input_config().ok()?;

        Some(InputDeviceInfo {
            index: 0,
            name,
            channels: config.channels(),
            sample_rates: vec![config.sample_rate().0],
        })
    }

    /// Open and start the host's default input device.
    pub fn open_default(&self) -> Result<InputStream> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| Error::DeviceNotFound("no default input device".to_string()))?;
        self.open_device(device)
    }

    /// Open and start the input device at `device_index`.
    pub fn open(&self, device_index: usize) -> Result<InputStream> {
        let host = cpal::default_host();
        let mut devices: Vec<_> = host.input_devices()?.collect();

        if device_index >= devices.len() {
            return Err(Error::DeviceNotFound(format!(
                "Device index {} out of range (0-{})",
                device_index,
                devices.len().saturating_sub(1)
            )));
        }

        let device = devices.swap_remove(device_index);
        self.open_device(device)
    }

    fn open_device(&self, device: cpal::Device) -> Result<InputStream> {
        let name = device.name().unwrap_or_else(|_| "Unknown".to_string());
        let supported = device.default_input_config()?;
        let channels = usize::from(supported.channels());

        if self.config.input_channel >= channels {
            return Err(Error::InvalidConfig(format!(
                "input_channel {} not available on '{}' ({} channels)",
                self.config.input_channel, name, channels
            )));
        }

        let mut stream_config = supported.config();
        if let cpal::SupportedBufferSize::Range { min, max } = supported.buffer_size() {
            if (*min..=*max).contains(&self.config.chunk_frames) {
                stream_config.buffer_size = cpal::BufferSize::Fixed(self.config.chunk_frames);
            }
        }

        let sample_rate = stream_config.sample_rate.0;
        let shared = Arc::new(StreamShared::default());
        let (tx, rx) = bounded(self.config.queue_chunks);

        let stream = match supported.sample_format() {
            cpal::SampleFormat::I8 => self.build_stream::<i8>(&device, &stream_config, tx, &shared),
            cpal::SampleFormat::I16 => {
                self.build_stream::<i16>(&device, &stream_config, tx, &shared)
            }
            cpal::SampleFormat::I32 => {
                self.build_stream::<i32>(&device, &stream_config, tx, &shared)
            }
            cpal::SampleFormat::U8 => self.build_stream::<u8>(&device, &stream_config, tx, &shared),
            cpal::SampleFormat::U16 => {
                self.build_stream::<u16>(&device, &stream_config, tx, &shared)
            }
            cpal::SampleFormat::U32 => {
                self.build_stream::<u32>(&device, &stream_config, tx, &shared)
            }
            cpal::SampleFormat::F32 => {
                self.build_stream::<f32>(&device, &stream_config, tx, &shared)
            }
            cpal::SampleFormat::F64 => {
                self.build_stream::<f64>(&device, &stream_config, tx, &shared)
            }
            other => Err(Error::AudioInput(format!(
                "unsupported sample format {:?}",
                other
            ))),
        }?;

        stream.play()?;

        tracing::info!(
            device = %name,
            sample_rate,
            channels,
            buffer = ?stream_config.buffer_size,
            "Microphone stream started"
        );

        Ok(InputStream {
            _stream: stream,
            receiver: rx,
            shared,
            sample_rate,
            device_name: name,
        })
    }

    fn build_stream<T>(
        &self,
        device: &cpal::Device,
        stream_config: &cpal::StreamConfig,
        tx: crossbeam_channel::Sender<Vec<f32>>,
        shared: &Arc<StreamShared>,
    ) -> Result<cpal::Stream>
    where
        T: cpal::Sample + cpal::SizedSample + Send + 'static,
        f32: cpal::FromSample<T>,
    {
        let channels = usize::from(stream_config.channels);
        let input_channel = self.config.input_channel;
        let data_shared = Arc::clone(shared);
        let err_shared = Arc::clone(shared);

        let stream = device.build_input_stream(
            stream_config,
            move |data: &[T], _: &cpal::InputCallbackInfo| {
                let chunk: Vec<f32> = data
                    .chunks(channels)
                    .filter_map(|frame| frame.get(input_channel))
                    .map(|&sample| cpal::Sample::from_sample(sample))
                    .collect();

                if chunk.is_empty() {
                    return;
                }
                if tx.try_send(chunk).is_err() {
                    data_shared.dropped_chunks.fetch_add(1, Ordering::Relaxed);
                }
            },
            move |err| {
                tracing::error!("Microphone stream error: {}", err);
                if matches!(err, cpal::StreamError::DeviceNotAvailable) {
                    err_shared.disconnected.store(true, Ordering::Release);
                }
                *err_shared.last_error.lock() = Some(err.to_string());
            },
            None,
        )?;

        Ok(stream)
    }
}

#[derive(Default)]
struct StreamShared {
    dropped_chunks: AtomicU32,
    disconnected: AtomicBool,
    last_error: Mutex<Option<String>>,
}

/// A running microphone stream. Capture stops when it is dropped.
pub struct InputStream {
    _stream: cpal::Stream,
    receiver: Receiver<Vec<f32>>,
    shared: Arc<StreamShared>,
    sample_rate: u32,
    device_name: String,
}

impl InputStream {
    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    /// Chunks discarded because the recording thread fell behind
    pub fn dropped_chunks(&self) -> u32 {
        self.shared.dropped_chunks.load(Ordering::Relaxed)
    }

    /// Most recent stream error reported by the host, if any
    pub fn take_error(&self) -> Option<String> {
        self.shared.last_error.lock().take()
    }
}

impl CaptureSource for InputStream {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn next_chunk(&mut self, timeout: Duration) -> SourceEvent {
        match self.receiver.recv_timeout(timeout) {
            Ok(chunk) => SourceEvent::Chunk(chunk),
            Err(RecvTimeoutError::Timeout) => {
                if self.shared.disconnected.load(Ordering::Acquire) {
                    tracing::warn!(device = %self.device_name, "Microphone disconnected");
                    SourceEvent::Ended
                } else {
                    SourceEvent::Idle
                }
            }
            Err(RecvTimeoutError::Disconnected) => SourceEvent::Ended,
        }
    }
}

impl Drop for InputStream {
    fn drop(&mut self) {
        let dropped = self.dropped_chunks();
        if dropped > 0 {
            tracing::warn!(dropped, "Microphone chunks dropped during capture");
        }
        tracing::debug!(device = %self.device_name, "Microphone stream closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_devices() {
        let input = AudioInput::new(RecordingConfig::default()).unwrap();
        let devices = input.list_input_devices();
        println!("Found {} input devices", devices.len());
        for device in &devices {
            println!(
                "  {}: {} ({} ch)",
                device.index, device.name, device.channels
            );
        }
    }

    #[test]
    fn test_open_out_of_range() {
        let input = AudioInput::new(RecordingConfig::default()).unwrap();
        if let Err(Error::DeviceNotFound(msg)) = input.open(usize::MAX) {
            assert!(msg.contains("out of range"));
        }
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = RecordingConfig::builder().queue_chunks(0).build();
        assert!(AudioInput::new(config).is_err());
    }
}
