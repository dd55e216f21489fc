//! RIFF/WAVE clip loading
//!
//! Only what a looping clip needs: the sample layout and the raw data bytes.
//! Supports unsigned 8-bit, signed 16/32-bit PCM and 32-bit IEEE float, either
//! directly or wrapped in `WAVE_FORMAT_EXTENSIBLE`.

use std::fs;
use std::path::Path;

use nom::{
    bytes::complete::{tag, take},
    number::complete::{le_u16, le_u32},
    IResult,
};

use crate::error::{Error, Result};

const FORMAT_PCM: u16 = 0x0001;
const FORMAT_IEEE_FLOAT: u16 = 0x0003;
const FORMAT_EXTENSIBLE: u16 = 0xFFFE;

/// Sample encoding of the clip's data bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
    U8,
    S16,
    S32,
    F32,
}

impl SampleFormat {
    pub fn bytes_per_sample(self) -> usize {
        match self {
            SampleFormat::U8 => 1,
            SampleFormat::S16 => 2,
            SampleFormat::S32 | SampleFormat::F32 => 4,
        }
    }

    /// Decode one little-endian sample to [-1, 1]
    fn decode(self, bytes: &[u8]) -> f32 {
        match self {
            SampleFormat::U8 => (bytes[0] as f32 - 128.0) / 128.0,
            SampleFormat::S16 => i16::from_le_bytes([bytes[0], bytes[1]]) as f32 / 32768.0,
            SampleFormat::S32 => {
                i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as f32 / 2_147_483_648.0
            }
            SampleFormat::F32 => f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
        }
    }
}

/// Layout of interleaved sample data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioSpec {
    pub format: SampleFormat,
    pub channels: u16,
    pub sample_rate: u32,
}

impl AudioSpec {
    pub fn bytes_per_frame(&self) -> usize {
        self.format.bytes_per_sample() * self.channels as usize
    }

    pub fn bytes_per_second(&self) -> usize {
        self.bytes_per_frame() * self.sample_rate as usize
    }

    /// Decode interleaved bytes into normalized samples.
    ///
    /// A trailing partial frame is dropped.
    pub fn decode_samples(&self, bytes: &[u8]) -> Vec<f32> {
        let frame = self.bytes_per_frame();
        if frame == 0 {
            return Vec::new();
        }
        let whole = bytes.len() - bytes.len() % frame;
        bytes[..whole]
            .chunks_exact(self.format.bytes_per_sample())
            .map(|sample| self.format.decode(sample))
            .collect()
    }
}

/// A fully loaded audio clip
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    pub spec: AudioSpec,
    pub data: Vec<u8>,
}

impl AudioClip {
    pub fn len_bytes(&self) -> usize {
        self.data.len()
    }

    pub fn duration_secs(&self) -> f32 {
        let rate = self.spec.bytes_per_second();
        if rate == 0 {
            0.0
        } else {
            self.data.len() as f32 / rate as f32
        }
    }
}

/// Read and parse a WAV file from disk
pub fn load_wav<P: AsRef<Path>>(path: P) -> Result<AudioClip> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let clip = parse_wav(&bytes)?;
    log::info!(
        "Loaded WAV {}: {:?}, {} ch, {} Hz, {:.2}s",
        path.display(),
        clip.spec.format,
        clip.spec.channels,
        clip.spec.sample_rate,
        clip.duration_secs()
    );
    Ok(clip)
}

/// Parse a RIFF/WAVE container held in memory
pub fn parse_wav(data: &[u8]) -> Result<AudioClip> {
    let (mut rest, ()) =
        riff_header(data).map_err(|_| Error::Wav("missing RIFF/WAVE header".to_string()))?;

    let mut spec = None;
    let mut samples = None;

    while rest.len() >= 8 && (spec.is_none() || samples.is_none()) {
        let (after, (id, body)) =
            chunk(rest).map_err(|_| Error::Wav("truncated chunk".to_string()))?;
        match id {
            b"fmt " => spec = Some(parse_format(body)?),
            b"data" => samples = Some(body.to_vec()),
            _ => {}
        }
        // Chunks are word aligned; a final pad byte may be missing
        let pad = body.len() % 2;
        rest = &after[pad.min(after.len())..];
    }

    let spec = spec.ok_or_else(|| Error::Wav("missing fmt chunk".to_string()))?;
    let data = samples.ok_or_else(|| Error::Wav("missing data chunk".to_string()))?;
    Ok(AudioClip { spec, data })
}

fn riff_header(input: &[u8]) -> IResult<&[u8], ()> {
    let (input, _) = tag(&b"RIFF"[..])(input)?;
    let (input, _) = le_u32(input)?;
    let (input, _) = tag(&b"WAVE"[..])(input)?;
    Ok((input, ()))
}

fn chunk(input: &[u8]) -> IResult<&[u8], (&[u8], &[u8])> {
    let (input, id) = take(4usize)(input)?;
    let (input, size) = le_u32(input)?;
    let (input, body) = take(size as usize)(input)?;
    Ok((input, (id, body)))
}

struct FormatChunk {
    format_tag: u16,
    channels: u16,
    sample_rate: u32,
    bits_per_sample: u16,
}

fn format_chunk(input: &[u8]) -> IResult<&[u8], FormatChunk> {
    let (input, format_tag) = le_u16(input)?;
    let (input, channels) = le_u16(input)?;
    let (input, sample_rate) = le_u32(input)?;
    let (input, _byte_rate) = le_u32(input)?;
    let (input, _block_align) = le_u16(input)?;
    let (input, bits_per_sample) = le_u16(input)?;

    if format_tag != FORMAT_EXTENSIBLE {
        return Ok((input, FormatChunk { format_tag, channels, sample_rate, bits_per_sample }));
    }

    // cbSize, valid bits, channel mask, then the sub-format GUID whose first
    // two bytes carry the real format tag
    let (input, _extra_size) = le_u16(input)?;
    let (input, _valid_bits) = le_u16(input)?;
    let (input, _channel_mask) = le_u32(input)?;
    let (input, sub_format) = le_u16(input)?;
    Ok((
        input,
        FormatChunk { format_tag: sub_format, channels, sample_rate, bits_per_sample },
    ))
}

fn parse_format(body: &[u8]) -> Result<AudioSpec> {
    let (_, fmt) =
        format_chunk(body).map_err(|_| Error::Wav("fmt chunk too short".to_string()))?;

    let format = match (fmt.format_tag, fmt.bits_per_sample) {
        (FORMAT_PCM, 8) => SampleFormat::U8,
        (FORMAT_PCM, 16) => SampleFormat::S16,
        (FORMAT_PCM, 32) => SampleFormat::S32,
        (FORMAT_IEEE_FLOAT, 32) => SampleFormat::F32,
        (format_tag, bits_per_sample) => {
            return Err(Error::UnsupportedSampleFormat { format_tag, bits_per_sample })
        }
    };

    if fmt.channels == 0 || fmt.sample_rate == 0 {
        return Err(Error::Wav(format!(
            "{} channels at {} Hz",
            fmt.channels, fmt.sample_rate
        )));
    }

    Ok(AudioSpec { format, channels: fmt.channels, sample_rate: fmt.sample_rate })
}
