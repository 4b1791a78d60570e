//! Media loading for playback.
//!
//! WAV files contribute their raw PCM bytes; MP3 files are forwarded as-is
//! and decoded by the device hardware, so the host never inspects them.

use std::fs;
use std::path::Path;

use tracing::info;
use uart_audio_protocol::AudioFormat;

use crate::error::HostError;
use crate::wav;

/// Audio bytes ready to stream, plus the format tag to announce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaSource {
    /// Bytes to send in audio-data frames.
    pub data: Vec<u8>,
    /// Format tag for the set-format command.
    pub format: AudioFormat,
}

/// Load an audio file by extension: `.wav` as PCM, `.mp3` as an opaque
/// bitstream.
pub fn load_media(path: &Path) -> Result<MediaSource, HostError> {
    if !path.exists() {
        return Err(HostError::FileNotFound(path.to_path_buf()));
    }

    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "wav" => {
            let wav = wav::read_wav(path)?;
            info!(
                "loaded {}: PCM, {} Hz, {}-bit, {} channel(s), {} bytes, {:.2}s",
                path.display(),
                wav.sample_rate,
                wav.bits_per_sample,
                wav.channels,
                wav.data.len(),
                wav.duration_secs()
            );
            Ok(MediaSource {
                data: wav.data,
                format: AudioFormat::Pcm,
            })
        }
        "mp3" => {
            let data = fs::read(path)?;
            info!(
                "loaded {}: MP3, {} bytes (decoded by device hardware)",
                path.display(),
                data.len()
            );
            Ok(MediaSource {
                data,
                format: AudioFormat::Mp3,
            })
        }
        other => Err(HostError::UnsupportedExtension(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("uart-audio-media-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_wav_loads_as_pcm() {
        let path = temp_path("in.wav");
        let pcm = vec![0x42u8; 64];
        wav::write_wav(&path, &pcm, 8000, 16, 1).expect("write should succeed");

        let source = load_media(&path).expect("load should succeed");
        assert_eq!(source.format, AudioFormat::Pcm);
        assert_eq!(source.data, pcm);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_mp3_passes_through_raw() {
        let path = temp_path("in.mp3");
        let bytes = vec![0xFF, 0xFB, 0x90, 0x00, 1, 2, 3];
        fs::write(&path, &bytes).expect("write should succeed");

        let source = load_media(&path).expect("load should succeed");
        assert_eq!(source.format, AudioFormat::Mp3);
        assert_eq!(source.data, bytes);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_unsupported_extension() {
        let path = temp_path("in.ogg");
        fs::write(&path, b"OggS").expect("write should succeed");
        assert!(matches!(
            load_media(&path),
            Err(HostError::UnsupportedExtension(ext)) if ext == "ogg"
        ));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            load_media(Path::new("/nonexistent/uart-audio.wav")),
            Err(HostError::FileNotFound(_))
        ));
    }
}
