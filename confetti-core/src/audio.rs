//! Looping clip playback through a byte-queue sink

use crate::error::Result;
use crate::wav::AudioClip;

/// A streaming output that plays raw sample bytes in the order they are queued
pub trait AudioSink {
    /// Bytes queued but not yet played
    fn queued_bytes(&mut self) -> usize;

    fn queue(&mut self, bytes: &[u8]) -> Result<()>;
}

/// Keeps a sink fed with one clip, over and over.
///
/// Whenever less than a full clip is waiting in the sink, the whole clip is
/// queued again, so up to roughly two clip lengths can be in flight.
#[derive(Debug, Clone)]
pub struct AudioFeed {
    clip: AudioClip,
}

impl AudioFeed {
    pub fn new(clip: AudioClip) -> Self {
        Self { clip }
    }

    /// Top up the sink; returns whether the clip was queued again
    pub fn refill<S: AudioSink + ?Sized>(&self, sink: &mut S) -> bool {
        if self.clip.data.is_empty() || sink.queued_bytes() >= self.clip.len_bytes() {
            return false;
        }
        match sink.queue(&self.clip.data) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Failed to queue audio clip: {e}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::wav::{AudioSpec, SampleFormat};

    #[derive(Default)]
    struct Counting {
        queued: usize,
        pushes: usize,
        fail: bool,
    }

    impl AudioSink for Counting {
        fn queued_bytes(&mut self) -> usize {
            self.queued
        }

        fn queue(&mut self, bytes: &[u8]) -> Result<()> {
            if self.fail {
                return Err(Error::Audio("device lost".to_string()));
            }
            self.queued += bytes.len();
            self.pushes += 1;
            Ok(())
        }
    }

    fn feed(len: usize) -> AudioFeed {
        AudioFeed::new(AudioClip {
            spec: AudioSpec { format: SampleFormat::S16, channels: 1, sample_rate: 8_000 },
            data: vec![0; len],
        })
    }

    #[test]
    fn test_refills_when_below_one_clip() {
        let feed = feed(100);
        let mut sink = Counting::default();

        assert!(feed.refill(&mut sink));
        assert_eq!(sink.queued, 100);
        assert!(!feed.refill(&mut sink));

        sink.queued = 99;
        assert!(feed.refill(&mut sink));
        assert_eq!(sink.queued, 199);
        assert_eq!(sink.pushes, 2);
    }

    #[test]
    fn test_failed_push_is_skipped() {
        let feed = feed(100);
        let mut sink = Counting { fail: true, ..Default::default() };
        assert!(!feed.refill(&mut sink));
        assert_eq!(sink.queued, 0);
    }

    #[test]
    fn test_empty_clip_never_pushes() {
        let feed = feed(0);
        let mut sink = Counting::default();
        assert!(!feed.refill(&mut sink));
        assert_eq!(sink.pushes, 0);
    }
}
