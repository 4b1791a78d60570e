//! Messages received from the audio firmware.

use crate::constants::*;
use crate::frame::Frame;

/// A classified inbound frame.
///
/// Classification never fails: frames with an unrecognized command are
/// represented as [`DeviceMessage::Unknown`] so the receive loop can log
/// and ignore them instead of aborting the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceMessage {
    /// One chunk of recorded audio.
    AudioData(Vec<u8>),
    /// Acknowledgment; `command` is the acknowledged command code, if the
    /// firmware included one.
    Ack {
        /// Command code being acknowledged (first payload byte).
        command: Option<u8>,
    },
    /// A frame with a command code this host does not understand.
    Unknown {
        /// The unrecognized command code.
        command: u8,
        /// Payload length, for logging.
        len: usize,
    },
}

impl DeviceMessage {
    /// Classify a decoded frame.
    pub fn from_frame(frame: Frame) -> Self {
        match frame.command {
            CMD_AUDIO_DATA => DeviceMessage::AudioData(frame.payload),
            CMD_ACK => DeviceMessage::Ack {
                command: frame.payload.first().copied(),
            },
            other => DeviceMessage::Unknown {
                command: other,
                len: frame.payload.len(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_data_classification() {
        let frame = Frame {
            command: CMD_AUDIO_DATA,
            payload: vec![1, 2, 3],
        };
        assert_eq!(
            DeviceMessage::from_frame(frame),
            DeviceMessage::AudioData(vec![1, 2, 3])
        );
    }

    #[test]
    fn test_ack_classification() {
        let frame = Frame {
            command: CMD_ACK,
            payload: vec![CMD_START_RECORD],
        };
        assert_eq!(
            DeviceMessage::from_frame(frame),
            DeviceMessage::Ack {
                command: Some(CMD_START_RECORD)
            }
        );

        let empty_ack = Frame {
            command: CMD_ACK,
            payload: vec![],
        };
        assert_eq!(
            DeviceMessage::from_frame(empty_ack),
            DeviceMessage::Ack { command: None }
        );
    }

    #[test]
    fn test_unknown_command_is_not_fatal() {
        let frame = Frame {
            command: 0x7E,
            payload: vec![0; 9],
        };
        assert_eq!(
            DeviceMessage::from_frame(frame),
            DeviceMessage::Unknown {
                command: 0x7E,
                len: 9
            }
        );
    }
}
