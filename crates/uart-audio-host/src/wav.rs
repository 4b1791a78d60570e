//! Minimal RIFF/WAVE support for fixed-format PCM.
//!
//! Recording always produces 8 kHz / 16-bit / mono PCM (the device I2S
//! configuration), and playback only needs the raw sample bytes back out
//! of a PCM WAV, so this module implements just that subset: a canonical
//! 44-byte header on write, and a chunk walk accepting format code 1 on
//! read.

use std::fs;
use std::path::Path;

use crate::error::HostError;

/// WAVE format code for uncompressed PCM.
const WAVE_FORMAT_PCM: u16 = 1;

/// A decoded PCM WAV file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WavAudio {
    /// Samples per second.
    pub sample_rate: u32,
    /// Bits per sample.
    pub bits_per_sample: u16,
    /// Number of channels.
    pub channels: u16,
    /// Raw sample bytes.
    pub data: Vec<u8>,
}

impl WavAudio {
    /// Duration in seconds, 0.0 for degenerate parameter combinations.
    pub fn duration_secs(&self) -> f64 {
        let byte_rate =
            self.sample_rate as u64 * self.channels as u64 * (self.bits_per_sample as u64 / 8);
        if byte_rate == 0 {
            return 0.0;
        }
        self.data.len() as f64 / byte_rate as f64
    }
}

/// Write `pcm` to `path` as a PCM WAV file.
pub fn write_wav(
    path: &Path,
    pcm: &[u8],
    sample_rate: u32,
    bits_per_sample: u16,
    channels: u16,
) -> Result<(), HostError> {
    let bytes_per_sample = bits_per_sample as u32 / 8;
    let byte_rate = sample_rate * channels as u32 * bytes_per_sample;
    let block_align = channels * (bits_per_sample / 8);

    let mut buf = Vec::with_capacity(44 + pcm.len());
    buf.extend_from_slice(b"RIFF");
    buf.extend_from_slice(&(36 + pcm.len() as u32).to_le_bytes());
    buf.extend_from_slice(b"WAVE");
    buf.extend_from_slice(b"fmt ");
    buf.extend_from_slice(&16u32.to_le_bytes());
    buf.extend_from_slice(&WAVE_FORMAT_PCM.to_le_bytes());
    buf.extend_from_slice(&channels.to_le_bytes());
    buf.extend_from_slice(&sample_rate.to_le_bytes());
    buf.extend_from_slice(&byte_rate.to_le_bytes());
    buf.extend_from_slice(&block_align.to_le_bytes());
    buf.extend_from_slice(&bits_per_sample.to_le_bytes());
    buf.extend_from_slice(b"data");
    buf.extend_from_slice(&(pcm.len() as u32).to_le_bytes());
    buf.extend_from_slice(pcm);

    fs::write(path, buf)?;
    Ok(())
}

/// Read a PCM WAV file from `path`.
pub fn read_wav(path: &Path) -> Result<WavAudio, HostError> {
    let bytes = fs::read(path)?;
    parse_wav(&bytes)
}

fn parse_wav(bytes: &[u8]) -> Result<WavAudio, HostError> {
    if bytes.len() < 12 || &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
        return Err(HostError::InvalidWav("missing RIFF/WAVE header".into()));
    }

    let mut fmt: Option<(u16, u16, u32, u16)> = None; // format, channels, rate, bits
    let mut data: Option<Vec<u8>> = None;

    // Walk chunks after the 12-byte RIFF header.
    let mut offset = 12;
    while offset + 8 <= bytes.len() {
        let id: [u8; 4] = bytes[offset..offset + 4]
            .try_into()
            .expect("slice is four bytes");
        let size = u32::from_le_bytes([
            bytes[offset + 4],
            bytes[offset + 5],
            bytes[offset + 6],
            bytes[offset + 7],
        ]) as usize;
        let body_start = offset + 8;
        let body_end = body_start + size;
        if body_end > bytes.len() {
            return Err(HostError::InvalidWav(format!(
                "truncated chunk {:?}",
                String::from_utf8_lossy(&id)
            )));
        }
        let body = &bytes[body_start..body_end];

        match &id {
            b"fmt " => {
                if body.len() < 16 {
                    return Err(HostError::InvalidWav("fmt chunk too short".into()));
                }
                fmt = Some((
                    u16::from_le_bytes([body[0], body[1]]),
                    u16::from_le_bytes([body[2], body[3]]),
                    u32::from_le_bytes([body[4], body[5], body[6], body[7]]),
                    u16::from_le_bytes([body[14], body[15]]),
                ));
            }
            b"data" => {
                data = Some(body.to_vec());
            }
            _ => {} // LIST, fact, etc. are skipped
        }

        // Chunk bodies are word-aligned.
        offset = body_end + (size % 2);
    }

    let (format, channels, sample_rate, bits_per_sample) =
        fmt.ok_or_else(|| HostError::InvalidWav("no fmt chunk".into()))?;
    if format != WAVE_FORMAT_PCM {
        return Err(HostError::InvalidWav(format!(
            "unsupported format code {} (only PCM)",
            format
        )));
    }
    let data = data.ok_or_else(|| HostError::InvalidWav("no data chunk".into()))?;

    Ok(WavAudio {
        sample_rate,
        bits_per_sample,
        channels,
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("uart-audio-test-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_write_read_round_trip() {
        let path = temp_path("roundtrip.wav");
        let pcm: Vec<u8> = (0..=255).collect();
        write_wav(&path, &pcm, 8000, 16, 1).expect("write should succeed");

        let wav = read_wav(&path).expect("read should succeed");
        assert_eq!(wav.sample_rate, 8000);
        assert_eq!(wav.bits_per_sample, 16);
        assert_eq!(wav.channels, 1);
        assert_eq!(wav.data, pcm);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_duration() {
        let wav = WavAudio {
            sample_rate: 8000,
            bits_per_sample: 16,
            channels: 1,
            data: vec![0; 16000], // one second at 16000 bytes/s
        };
        assert!((wav.duration_secs() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            parse_wav(b"not a wav file at all"),
            Err(HostError::InvalidWav(_))
        ));
    }

    #[test]
    fn test_rejects_truncated_data_chunk() {
        let path = temp_path("truncated.wav");
        write_wav(&path, &[0u8; 100], 8000, 16, 1).expect("write should succeed");
        let mut bytes = std::fs::read(&path).expect("read back");
        bytes.truncate(bytes.len() - 10);
        assert!(matches!(parse_wav(&bytes), Err(HostError::InvalidWav(_))));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_rejects_non_pcm_format() {
        let path = temp_path("float.wav");
        write_wav(&path, &[0u8; 8], 8000, 16, 1).expect("write should succeed");
        let mut bytes = std::fs::read(&path).expect("read back");
        bytes[20] = 3; // IEEE float format code
        assert!(matches!(parse_wav(&bytes), Err(HostError::InvalidWav(_))));
        let _ = std::fs::remove_file(&path);
    }
}
