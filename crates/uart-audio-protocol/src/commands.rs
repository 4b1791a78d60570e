//! Commands that can be sent to the audio firmware.

use std::time::Duration;

use crate::constants::*;
use crate::error::ProtocolError;
use crate::frame::Frame;

/// Audio format selected for playback via [`Command::SetFormat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    /// Raw little-endian PCM samples.
    Pcm,
    /// MP3 bitstream, decoded by the device.
    Mp3,
}

impl AudioFormat {
    /// Audio-data payload size used when streaming this format.
    pub fn chunk_size(&self) -> usize {
        match self {
            AudioFormat::Pcm => PCM_CHUNK_SIZE,
            AudioFormat::Mp3 => MP3_CHUNK_SIZE,
        }
    }

    /// Pause between audio-data frames when streaming this format.
    ///
    /// MP3 chunks go out faster to keep the device decoder's input
    /// buffer fed; PCM is paced to the playback rate.
    pub fn chunk_delay(&self) -> Duration {
        match self {
            AudioFormat::Pcm => Duration::from_millis(PCM_CHUNK_DELAY_MS),
            AudioFormat::Mp3 => Duration::from_millis(MP3_CHUNK_DELAY_MS),
        }
    }
}

impl From<AudioFormat> for u8 {
    fn from(format: AudioFormat) -> Self {
        match format {
            AudioFormat::Pcm => FORMAT_PCM,
            AudioFormat::Mp3 => FORMAT_MP3,
        }
    }
}

impl TryFrom<u8> for AudioFormat {
    type Error = ProtocolError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            FORMAT_PCM => Ok(AudioFormat::Pcm),
            FORMAT_MP3 => Ok(AudioFormat::Mp3),
            other => Err(ProtocolError::UnknownFormat(other)),
        }
    }
}

impl std::fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AudioFormat::Pcm => write!(f, "PCM"),
            AudioFormat::Mp3 => write!(f, "MP3 (hardware decode)"),
        }
    }
}

/// Commands that can be sent to the audio firmware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start recording from the device microphone.
    StartRecord,
    /// Stop recording.
    StopRecord,
    /// One chunk of audio data for playback.
    AudioData(Vec<u8>),
    /// Start playback.
    StartPlay,
    /// Stop playback.
    StopPlay,
    /// Connectivity probe.
    Handshake,
    /// Select the playback format.
    SetFormat(AudioFormat),
}

impl Command {
    /// Build the frame for this command.
    pub fn to_frame(&self) -> Frame {
        match self {
            Command::StartRecord => Frame {
                command: CMD_START_RECORD,
                payload: vec![],
            },
            Command::StopRecord => Frame {
                command: CMD_STOP_RECORD,
                payload: vec![],
            },
            Command::AudioData(data) => Frame {
                command: CMD_AUDIO_DATA,
                payload: data.clone(),
            },
            Command::StartPlay => Frame {
                command: CMD_START_PLAY,
                payload: vec![],
            },
            Command::StopPlay => Frame {
                command: CMD_STOP_PLAY,
                payload: vec![],
            },
            Command::Handshake => Frame {
                command: CMD_HANDSHAKE,
                payload: vec![],
            },
            Command::SetFormat(format) => Frame {
                command: CMD_SET_FORMAT,
                payload: vec![(*format).into()],
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_commands_have_empty_payloads() {
        for cmd in [
            Command::StartRecord,
            Command::StopRecord,
            Command::StartPlay,
            Command::StopPlay,
            Command::Handshake,
        ] {
            assert!(cmd.to_frame().payload.is_empty(), "{:?}", cmd);
        }
    }

    #[test]
    fn test_set_format_carries_tag_byte() {
        assert_eq!(
            Command::SetFormat(AudioFormat::Pcm).to_frame().payload,
            vec![FORMAT_PCM]
        );
        assert_eq!(
            Command::SetFormat(AudioFormat::Mp3).to_frame().payload,
            vec![FORMAT_MP3]
        );
    }

    #[test]
    fn test_audio_format_tag_round_trip() {
        for format in [AudioFormat::Pcm, AudioFormat::Mp3] {
            let tag: u8 = format.into();
            assert_eq!(AudioFormat::try_from(tag), Ok(format));
        }
        assert_eq!(
            AudioFormat::try_from(0x5A),
            Err(ProtocolError::UnknownFormat(0x5A))
        );
    }

    #[test]
    fn test_chunk_parameters() {
        assert_eq!(AudioFormat::Pcm.chunk_size(), 512);
        assert_eq!(AudioFormat::Mp3.chunk_size(), 1024);
        assert_eq!(AudioFormat::Pcm.chunk_delay(), Duration::from_millis(20));
        assert_eq!(AudioFormat::Mp3.chunk_delay(), Duration::from_millis(10));
    }
}
