//! Byte-queue audio output on top of kira
//!
//! Each pushed block of PCM bytes becomes one static sound. A kira clock ticks
//! once per sample frame, and every block is scheduled on it to start on the
//! exact tick where the previous block ends, so blocks play back to back
//! without waiting for the sink to be polled.

use confetti_core::{AudioSink, AudioSpec, Error, Result};
use kira::clock::{ClockHandle, ClockSpeed, ClockTime};
use kira::sound::static_sound::{StaticSoundData, StaticSoundSettings};
use kira::{AudioManager, AudioManagerSettings, DefaultBackend, Frame, StartTime};

/// Where queued blocks sit on the playback clock, in sample frames
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Timeline {
    /// Tick on which the last scheduled block ends
    end: u64,
}

impl Timeline {
    /// Reserve `frames` ticks for a new block; returns its start tick.
    ///
    /// A block starts where the previous one ends, or at `now` once playback
    /// has run dry.
    fn schedule(&mut self, now: u64, frames: u64) -> u64 {
        let start = self.end.max(now);
        self.end = start + frames;
        start
    }

    /// Ticks still to be played after `now`
    fn queued_frames(&self, now: u64) -> u64 {
        self.end.saturating_sub(now)
    }
}

/// An [`AudioSink`] playing through the default output device
pub struct KiraSink {
    manager: AudioManager<DefaultBackend>,
    clock: ClockHandle,
    spec: AudioSpec,
    timeline: Timeline,
}

impl KiraSink {
    /// Open the default device for bytes laid out as `spec`
    pub fn open(spec: AudioSpec) -> Result<Self> {
        let mut manager = AudioManager::<DefaultBackend>::new(AudioManagerSettings::default())
            .map_err(|e| Error::Audio(format!("no audio device available: {e}")))?;
        let mut clock = manager
            .add_clock(ClockSpeed::TicksPerSecond(spec.sample_rate as f64))
            .map_err(|e| Error::Audio(format!("failed to create playback clock: {e}")))?;
        clock.start();
        log::info!(
            "Audio output opened: {:?}, {} channel(s) at {} Hz",
            spec.format,
            spec.channels,
            spec.sample_rate
        );
        Ok(Self { manager, clock, spec, timeline: Timeline::default() })
    }

    fn now(&self) -> u64 {
        self.clock.time().ticks
    }

    fn clock_time(&self, ticks: u64) -> ClockTime {
        ClockTime { clock: self.clock.id(), ticks, fraction: 0.0 }
    }
}

impl AudioSink for KiraSink {
    fn queued_bytes(&mut self) -> usize {
        let frames = self.timeline.queued_frames(self.now());
        frames as usize * self.spec.bytes_per_frame()
    }

    fn queue(&mut self, bytes: &[u8]) -> Result<()> {
        let frames = decode_frames(&self.spec, bytes);
        if frames.is_empty() {
            return Ok(());
        }
        let mut timeline = self.timeline;
        let start = timeline.schedule(self.now(), frames.len() as u64);
        let data = StaticSoundData {
            sample_rate: self.spec.sample_rate,
            frames: frames.into(),
            settings: StaticSoundSettings::new().start_time(StartTime::ClockTime(self.clock_time(start))),
            slice: None,
        };
        self.manager
            .play(data)
            .map_err(|e| Error::Audio(format!("failed to schedule playback: {e}")))?;
        // Only a block that was accepted occupies the timeline
        self.timeline = timeline;
        Ok(())
    }
}

/// Interleaved PCM bytes to stereo frames.
///
/// Mono is duplicated to both sides; beyond two channels only the first two
/// are kept.
fn decode_frames(spec: &AudioSpec, bytes: &[u8]) -> Vec<Frame> {
    let channels = spec.channels as usize;
    if channels == 0 {
        return Vec::new();
    }
    spec.decode_samples(bytes)
        .chunks_exact(channels)
        .map(|samples| match samples {
            [mono] => Frame::from_mono(*mono),
            [left, right, ..] => Frame::new(*left, *right),
            [] => Frame::ZERO,
        })
        .collect()
}
