//! Cross-platform microphone recorder using cpal
//!
//! Captures at whatever rate and layout the device offers, then mixes down
//! and resamples to the configured clip format at stop time. The stream runs
//! on its own thread because cpal::Stream is not Send.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Instant;

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, SampleRate, StreamConfig};
use rubato::{FftFixedIn, Resampler};
use tokio::time::{interval, Duration as TokioDuration};

use crate::application::ports::{
    CaptureError, ClipRecorder, ProgressCallback, SessionRecorder,
};
use crate::domain::audio::{AudioClip, Duration};

/// Target clip format, taken from configuration
#[derive(Debug, Clone, Copy)]
pub struct CaptureSettings {
    pub sample_rate: u32,
    pub channels: u16,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            channels: 1,
        }
    }
}

/// Microphone recorder built on cpal
pub struct CpalRecorder {
    settings: CaptureSettings,
    /// Buffered samples, interleaved at the capture layout and device rate
    audio_buffer: Arc<StdMutex<Vec<i16>>>,
    /// Device sample rate once the stream is open
    device_sample_rate: Arc<AtomicU32>,
    /// Channel count of the buffered samples (after any mixdown)
    capture_channels: Arc<AtomicU32>,
    is_recording: Arc<AtomicBool>,
    start_time_ms: Arc<AtomicU64>,
    elapsed_ms: Arc<AtomicU64>,
}

impl CpalRecorder {
    /// Create a recorder producing clips in the given format
    pub fn new(settings: CaptureSettings) -> Self {
        Self {
            settings,
            audio_buffer: Arc::new(StdMutex::new(Vec::new())),
            device_sample_rate: Arc::new(AtomicU32::new(0)),
            capture_channels: Arc::new(AtomicU32::new(0)),
            is_recording: Arc::new(AtomicBool::new(false)),
            start_time_ms: Arc::new(AtomicU64::new(0)),
            elapsed_ms: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Get the default input device
    fn input_device() -> Result<cpal::Device, CaptureError> {
        let host = cpal::default_host();
        host.default_input_device()
            .ok_or(CaptureError::NoInputDevice)
    }

    /// Pick a suitable input configuration, preferring the target sample rate
    /// and the smallest channel count
    fn input_config(
        device: &cpal::Device,
        target_rate: u32,
    ) -> Result<(StreamConfig, SampleFormat), CaptureError> {
        let supported = device
            .supported_input_configs()
            .map_err(|e| CaptureError::StreamOpenFailed(format!("Failed to get configs: {}", e)))?;

        let mut best: Option<cpal::SupportedStreamConfigRange> = None;

        for config in supported {
            if config.sample_format() != SampleFormat::I16
                && config.sample_format() != SampleFormat::F32
            {
                continue;
            }

            let includes_target = config.min_sample_rate().0 <= target_rate
                && config.max_sample_rate().0 >= target_rate;

            let is_better = match &best {
                None => true,
                Some(current) => {
                    let fewer_channels = config.channels() < current.channels();
                    let better_rate =
                        includes_target && current.min_sample_rate().0 > target_rate;
                    fewer_channels || better_rate
                }
            };
            if is_better {
                best = Some(config);
            }
        }

        let range = best.ok_or(CaptureError::StreamOpenFailed(
            "No suitable input config found".into(),
        ))?;

        let sample_rate =
            if range.min_sample_rate().0 <= target_rate && range.max_sample_rate().0 >= target_rate
            {
                SampleRate(target_rate)
            } else {
                range.min_sample_rate()
            };

        let sample_format = range.sample_format();
        let config = StreamConfig {
            channels: range.channels(),
            sample_rate,
            buffer_size: cpal::BufferSize::Default,
        };

        Ok((config, sample_format))
    }

    /// Mix interleaved samples down to mono by averaging each frame
    fn mix_to_mono(samples: &[i16], channels: u16) -> Vec<i16> {
        if channels <= 1 {
            return samples.to_vec();
        }

        samples
            .chunks(channels as usize)
            .map(|frame| {
                let sum: i32 = frame.iter().map(|&s| s as i32).sum();
                (sum / channels as i32) as i16
            })
            .collect()
    }

    /// Resample interleaved audio from the device rate to the target rate
    fn resample(
        samples: &[i16],
        channels: u16,
        source_rate: u32,
        target_rate: u32,
    ) -> Result<Vec<i16>, CaptureError> {
        if source_rate == target_rate {
            return Ok(samples.to_vec());
        }

        let nch = channels.max(1) as usize;
        let frames = samples.len() / nch;

        // Deinterleave into per-channel f32 planes
        let mut planes: Vec<Vec<f32>> = vec![Vec::with_capacity(frames); nch];
        for frame in samples.chunks_exact(nch) {
            for (ch, &s) in frame.iter().enumerate() {
                planes[ch].push(s as f32 / 32768.0);
            }
        }

        let ratio = target_rate as f64 / source_rate as f64;
        let expected_frames = (frames as f64 * ratio).ceil() as usize;

        let mut resampler = FftFixedIn::<f32>::new(
            source_rate as usize,
            target_rate as usize,
            1024, // Chunk size
            2,    // Sub-chunks
            nch,
        )
        .map_err(|e| CaptureError::CaptureFailed(format!("Resampler init failed: {}", e)))?;

        let mut out_planes: Vec<Vec<f32>> = vec![Vec::with_capacity(expected_frames); nch];
        let mut pos = 0;

        while pos < frames {
            let needed = resampler.input_frames_next();
            let end = (pos + needed).min(frames);

            let chunk: Vec<Vec<f32>> = planes
                .iter()
                .map(|plane| {
                    let mut part = plane[pos..end].to_vec();
                    part.resize(needed, 0.0);
                    part
                })
                .collect();

            let resampled = resampler
                .process(&chunk, None)
                .map_err(|e| CaptureError::CaptureFailed(format!("Resampling failed: {}", e)))?;

            for (ch, plane) in resampled.into_iter().enumerate() {
                out_planes[ch].extend(plane);
            }
            pos = end;
        }

        for plane in &mut out_planes {
            plane.truncate(expected_frames);
        }

        // Reinterleave to i16
        let out_frames = out_planes.first().map(|p| p.len()).unwrap_or(0);
        let mut output = Vec::with_capacity(out_frames * nch);
        for i in 0..out_frames {
            for plane in &out_planes {
                output.push((plane[i] * 32767.0) as i16);
            }
        }

        Ok(output)
    }

    /// Convert buffered samples into the configured clip format
    fn finish_clip(
        samples: Vec<i16>,
        capture_channels: u16,
        device_rate: u32,
        settings: CaptureSettings,
    ) -> Result<AudioClip, CaptureError> {
        if samples.is_empty() {
            return Err(CaptureError::EmptyCapture);
        }

        let resampled = Self::resample(
            &samples,
            capture_channels,
            device_rate,
            settings.sample_rate,
        )?;

        Ok(AudioClip::new(
            resampled,
            settings.sample_rate,
            capture_channels,
        ))
    }

    /// Open the input stream and feed the shared buffer until the recording
    /// flag goes false. Runs on a dedicated thread.
    #[allow(clippy::too_many_arguments)]
    fn run_capture_stream(
        settings: CaptureSettings,
        audio_buffer: Arc<StdMutex<Vec<i16>>>,
        device_sample_rate: Arc<AtomicU32>,
        capture_channels: Arc<AtomicU32>,
        is_recording: Arc<AtomicBool>,
        start_time_ms: Arc<AtomicU64>,
        elapsed_ms: Arc<AtomicU64>,
    ) -> Result<(), CaptureError> {
        let device = Self::input_device()?;
        let (config, sample_format) = Self::input_config(&device, settings.sample_rate)?;

        let device_channels = config.channels;
        // Mix down in the callback when the configured layout is mono
        let keep_channels = if settings.channels == 1 {
            1
        } else {
            device_channels.min(settings.channels.max(1))
        };

        device_sample_rate.store(config.sample_rate.0, Ordering::SeqCst);
        capture_channels.store(keep_channels as u32, Ordering::SeqCst);

        let buffer = Arc::clone(&audio_buffer);
        let recording = Arc::clone(&is_recording);

        let push_samples = move |data: &[i16]| {
            if !recording.load(Ordering::SeqCst) {
                return;
            }
            let frames = if keep_channels == 1 && device_channels > 1 {
                Self::mix_to_mono(data, device_channels)
            } else {
                data.to_vec()
            };
            if let Ok(mut buffer) = buffer.lock() {
                buffer.extend_from_slice(&frames);
            }
        };

        let stream = match sample_format {
            SampleFormat::I16 => device
                .build_input_stream(
                    &config,
                    move |data: &[i16], _: &cpal::InputCallbackInfo| push_samples(data),
                    |err| log::error!("audio stream error: {}", err),
                    None,
                )
                .map_err(|e| CaptureError::StreamOpenFailed(e.to_string()))?,

            SampleFormat::F32 => device
                .build_input_stream(
                    &config,
                    move |data: &[f32], _: &cpal::InputCallbackInfo| {
                        let converted: Vec<i16> =
                            data.iter().map(|&s| (s * 32767.0) as i16).collect();
                        push_samples(&converted);
                    },
                    |err| log::error!("audio stream error: {}", err),
                    None,
                )
                .map_err(|e| CaptureError::StreamOpenFailed(e.to_string()))?,

            _ => {
                return Err(CaptureError::StreamOpenFailed(
                    "Unsupported sample format".into(),
                ))
            }
        };

        stream
            .play()
            .map_err(|e| CaptureError::StreamOpenFailed(e.to_string()))?;

        // Keep the stream alive until stopped, tracking elapsed time
        while is_recording.load(Ordering::SeqCst) {
            let now = std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0);
            let start = start_time_ms.load(Ordering::SeqCst);
            elapsed_ms.store(now.saturating_sub(start), Ordering::SeqCst);

            std::thread::sleep(std::time::Duration::from_millis(100));
        }

        drop(stream);
        Ok(())
    }

    /// Start the capture thread and mark the recorder active
    fn spawn_capture_thread(&self) {
        {
            let mut buffer = self.audio_buffer.lock().unwrap_or_else(|e| e.into_inner());
            buffer.clear();
        }

        self.is_recording.store(true, Ordering::SeqCst);

        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        self.start_time_ms.store(now, Ordering::SeqCst);
        self.elapsed_ms.store(0, Ordering::SeqCst);

        let settings = self.settings;
        let audio_buffer = Arc::clone(&self.audio_buffer);
        let device_sample_rate = Arc::clone(&self.device_sample_rate);
        let capture_channels = Arc::clone(&self.capture_channels);
        let is_recording = Arc::clone(&self.is_recording);
        let start_time_ms = Arc::clone(&self.start_time_ms);
        let elapsed_ms = Arc::clone(&self.elapsed_ms);

        std::thread::spawn(move || {
            if let Err(e) = Self::run_capture_stream(
                settings,
                audio_buffer,
                device_sample_rate,
                capture_channels,
                is_recording.clone(),
                start_time_ms,
                elapsed_ms,
            ) {
                log::error!("capture thread failed: {}", e);
                is_recording.store(false, Ordering::SeqCst);
            }
        });
    }

    /// Stop the stream and convert the buffer into a clip
    async fn drain_clip(&self) -> Result<AudioClip, CaptureError> {
        self.is_recording.store(false, Ordering::SeqCst);

        // Give the capture thread a moment to flush and close the stream
        tokio::time::sleep(TokioDuration::from_millis(100)).await;

        let device_rate = self.device_sample_rate.load(Ordering::SeqCst);
        if device_rate == 0 {
            return Err(CaptureError::CaptureFailed("Device rate not set".into()));
        }
        let capture_channels = self.capture_channels.load(Ordering::SeqCst) as u16;

        let samples = {
            let mut buffer = self.audio_buffer.lock().unwrap_or_else(|e| e.into_inner());
            std::mem::take(&mut *buffer)
        };

        let settings = self.settings;
        tokio::task::spawn_blocking(move || {
            Self::finish_clip(samples, capture_channels, device_rate, settings)
        })
        .await
        .map_err(|e| CaptureError::CaptureFailed(format!("Task join error: {}", e)))?
    }
}

impl Default for CpalRecorder {
    fn default() -> Self {
        Self::new(CaptureSettings::default())
    }
}

#[async_trait]
impl ClipRecorder for CpalRecorder {
    async fn record(
        &self,
        duration: Duration,
        on_progress: Option<ProgressCallback>,
    ) -> Result<AudioClip, CaptureError> {
        if self.is_recording.load(Ordering::SeqCst) {
            return Err(CaptureError::AlreadyRecording);
        }

        let duration_ms = duration.as_millis();
        self.spawn_capture_thread();

        // Give the thread a moment to open the stream
        tokio::time::sleep(TokioDuration::from_millis(50)).await;
        if !self.is_recording.load(Ordering::SeqCst) {
            return Err(CaptureError::StreamOpenFailed(
                "Failed to start recording".into(),
            ));
        }

        if let Some(progress) = on_progress {
            let start = Instant::now();
            let is_recording = Arc::clone(&self.is_recording);

            tokio::spawn(async move {
                let mut ticker = interval(TokioDuration::from_millis(100));
                while is_recording.load(Ordering::SeqCst) {
                    ticker.tick().await;
                    let elapsed = start.elapsed().as_millis() as u64;
                    if elapsed >= duration_ms {
                        progress(duration_ms, duration_ms);
                        break;
                    }
                    progress(elapsed, duration_ms);
                }
            });
        }

        tokio::time::sleep(TokioDuration::from_millis(duration_ms)).await;
        self.drain_clip().await
    }
}

#[async_trait]
impl SessionRecorder for CpalRecorder {
    async fn start(&self) -> Result<(), CaptureError> {
        if self.is_recording.load(Ordering::SeqCst) {
            return Err(CaptureError::AlreadyRecording);
        }

        self.spawn_capture_thread();

        // Give the thread a moment to open the stream
        tokio::time::sleep(TokioDuration::from_millis(50)).await;

        if !self.is_recording.load(Ordering::SeqCst) {
            return Err(CaptureError::StreamOpenFailed(
                "Failed to start recording".into(),
            ));
        }

        Ok(())
    }

    async fn stop(&self) -> Result<AudioClip, CaptureError> {
        if !self.is_recording.load(Ordering::SeqCst) {
            return Err(CaptureError::NotRecording);
        }

        self.drain_clip().await
    }

    async fn cancel(&self) -> Result<(), CaptureError> {
        self.is_recording.store(false, Ordering::SeqCst);

        tokio::time::sleep(TokioDuration::from_millis(100)).await;

        {
            let mut buffer = self.audio_buffer.lock().unwrap_or_else(|e| e.into_inner());
            buffer.clear();
        }

        self.elapsed_ms.store(0, Ordering::SeqCst);
        Ok(())
    }

    fn is_recording(&self) -> bool {
        self.is_recording.load(Ordering::SeqCst)
    }

    fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms.load(Ordering::SeqCst)
    }
}
