//! Canonical WAV encoder
//!
//! Writes mono, 16-bit, little-endian PCM with the classic 44-byte
//! RIFF/WAVE header. The layout is fixed so that upload endpoints, media
//! players and local files all read the output as plain PCM WAV.

use crate::error::{ExportError, Result};

/// Size of the canonical RIFF/WAVE header in bytes
pub const HEADER_LEN: usize = 44;

/// Channel count of every encoded take
pub const CHANNELS: u16 = 1;

/// Bits per encoded sample
pub const BITS_PER_SAMPLE: u16 = 16;

/// Bytes per frame (channels × bytes per sample)
pub const BLOCK_ALIGN: u16 = CHANNELS * BITS_PER_SAMPLE / 8;

const PCM_FORMAT: u16 = 1;
const FMT_CHUNK_LEN: u32 = 16;

/// Decoded fields of a canonical WAV header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    /// Total file size minus 8
    pub riff_size: u32,
    /// Format code (1 = PCM)
    pub audio_format: u16,
    /// Number of channels
    pub num_channels: u16,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Bytes per second
    pub byte_rate: u32,
    /// Bytes per frame
    pub block_align: u16,
    /// Bits per sample
    pub bits_per_sample: u16,
    /// Length of the data chunk in bytes
    pub data_size: u32,
}

impl WavHeader {
    /// Header for `sample_count` mono 16-bit samples at `sample_rate`
    ///
    /// Sizes saturate at `u32::MAX`; a RIFF container cannot describe more.
    pub fn for_samples(sample_count: usize, sample_rate: u32) -> Self {
        let data_size = u32::try_from(sample_count.saturating_mul(BLOCK_ALIGN as usize))
            .unwrap_or(u32::MAX);

        Self {
            riff_size: data_size.saturating_add(36),
            audio_format: PCM_FORMAT,
            num_channels: CHANNELS,
            sample_rate,
            byte_rate: sample_rate.saturating_mul(u32::from(BLOCK_ALIGN)),
            block_align: BLOCK_ALIGN,
            bits_per_sample: BITS_PER_SAMPLE,
            data_size,
        }
    }

    /// Serialize into the 44-byte on-disk layout
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut header = [0u8; HEADER_LEN];

        // RIFF chunk descriptor
        header[0..4].copy_from_slice(b"RIFF");
        header[4..8].copy_from_slice(&self.riff_size.to_le_bytes());
        header[8..12].copy_from_slice(b"WAVE");

        // fmt sub-chunk
        header[12..16].copy_from_slice(b"fmt ");
        header[16..20].copy_from_slice(&FMT_CHUNK_LEN.to_le_bytes());
        header[20..22].copy_from_slice(&self.audio_format.to_le_bytes());
        header[22..24].copy_from_slice(&self.num_channels.to_le_bytes());
        header[24..28].copy_from_slice(&self.sample_rate.to_le_bytes());
        header[28..32].copy_from_slice(&self.byte_rate.to_le_bytes());
        header[32..34].copy_from_slice(&self.block_align.to_le_bytes());
        header[34..36].copy_from_slice(&self.bits_per_sample.to_le_bytes());

        // data sub-chunk
        header[36..40].copy_from_slice(b"data");
        header[40..44].copy_from_slice(&self.data_size.to_le_bytes());

        header
    }

    /// Parse and validate a canonical header at the start of `bytes`
    ///
    /// Only the layout produced by [`encode_wav`] is accepted: PCM, mono,
    /// 16-bit, a 16-byte `fmt ` chunk directly followed by `data`.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(ExportError::InvalidData(format!(
                "{} bytes is shorter than the {}-byte header",
                bytes.len(),
                HEADER_LEN
            )));
        }

        expect_tag(bytes, 0, b"RIFF")?;
        expect_tag(bytes, 8, b"WAVE")?;
        expect_tag(bytes, 12, b"fmt ")?;
        expect_tag(bytes, 36, b"data")?;

        let fmt_len = read_u32(bytes, 16);
        if fmt_len != FMT_CHUNK_LEN {
            return Err(ExportError::InvalidData(format!(
                "fmt chunk is {} bytes, expected {}",
                fmt_len, FMT_CHUNK_LEN
            )));
        }

        let header = Self {
            riff_size: read_u32(bytes, 4),
            audio_format: read_u16(bytes, 20),
            num_channels: read_u16(bytes, 22),
            sample_rate: read_u32(bytes, 24),
            byte_rate: read_u32(bytes, 28),
            block_align: read_u16(bytes, 32),
            bits_per_sample: read_u16(bytes, 34),
            data_size: read_u32(bytes, 40),
        };

        if header.audio_format != PCM_FORMAT
            || header.num_channels != CHANNELS
            || header.bits_per_sample != BITS_PER_SAMPLE
            || header.block_align != BLOCK_ALIGN
        {
            return Err(ExportError::InvalidData(format!(
                "expected mono 16-bit PCM, got format {} with {} ch, {} bit, block align {}",
                header.audio_format,
                header.num_channels,
                header.bits_per_sample,
                header.block_align
            )));
        }

        if header.byte_rate != header.sample_rate.saturating_mul(u32::from(BLOCK_ALIGN)) {
            return Err(ExportError::InvalidData(format!(
                "byte rate {} does not match sample rate {}",
                header.byte_rate, header.sample_rate
            )));
        }

        if header.riff_size != header.data_size.saturating_add(36) {
            return Err(ExportError::InvalidData(format!(
                "RIFF size {} does not match data size {}",
                header.riff_size, header.data_size
            )));
        }

        if header.data_size % u32::from(BLOCK_ALIGN) != 0 {
            return Err(ExportError::InvalidData(format!(
                "data size {} is not a whole number of frames",
                header.data_size
            )));
        }

        Ok(header)
    }

    /// Number of samples described by the data chunk
    pub fn sample_count(&self) -> usize {
        (self.data_size / u32::from(self.block_align.max(1))) as usize
    }

    /// Playback duration in seconds
    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.sample_count() as f64 / f64::from(self.sample_rate)
    }
}

/// Encode mono float samples into a canonical 16-bit PCM WAV container
///
/// The output is exactly `44 + 2 × samples.len()` bytes. Callers only invoke
/// this for non-empty recordings; the accumulator reports an empty capture as
/// an absent result before encoding is reached.
///
/// Out-of-range and non-finite samples are clamped, never rejected.
pub fn encode_wav(samples: &[f32], sample_rate: u32) -> Vec<u8> {
    let header = WavHeader::for_samples(samples.len(), sample_rate);

    let mut buf = Vec::with_capacity(HEADER_LEN + samples.len() * BLOCK_ALIGN as usize);
    buf.extend_from_slice(&header.to_bytes());
    for &sample in samples {
        buf.extend_from_slice(&float_to_i16(sample).to_le_bytes());
    }

    log::debug!(
        "Encoded {} samples at {} Hz into {} bytes",
        samples.len(),
        sample_rate,
        buf.len()
    );

    buf
}

/// Return the PCM data section of a canonical WAV container
pub fn decode_pcm16(bytes: &[u8]) -> Result<Vec<i16>> {
    let header = WavHeader::parse(bytes)?;
    let data = &bytes[HEADER_LEN..];
    let data_len = header.data_size as usize;

    if data.len() < data_len {
        return Err(ExportError::InvalidData(format!(
            "data chunk declares {} bytes but only {} are present",
            data_len,
            data.len()
        )));
    }

    Ok(data[..data_len]
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect())
}

/// Convert a float sample to 16-bit PCM
///
/// Clamps to [-1, 1], then scales negative values by 32768 and the rest by
/// 32767, truncating toward zero. NaN becomes silence.
#[inline]
pub fn float_to_i16(sample: f32) -> i16 {
    if sample.is_nan() {
        return 0;
    }

    let clamped = sample.clamp(-1.0, 1.0);
    if clamped < 0.0 {
        (clamped * 32768.0) as i16
    } else {
        (clamped * 32767.0) as i16
    }
}

fn expect_tag(bytes: &[u8], offset: usize, tag: &[u8; 4]) -> Result<()> {
    if &bytes[offset..offset + 4] == tag {
        Ok(())
    } else {
        Err(ExportError::InvalidData(format!(
            "expected {:?} at offset {}",
            String::from_utf8_lossy(tag),
            offset
        )))
    }
}

fn read_u16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}
