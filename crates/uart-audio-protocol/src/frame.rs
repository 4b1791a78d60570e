//! Frame encoding/decoding utilities.
//!
//! Each frame on the wire is:
//!
//! ```text
//! +------+------+---------+--------+--------+---------------+----------+
//! | 0xAA | 0x55 | command | len_lo | len_hi | data[0..len]  | checksum |
//! +------+------+---------+--------+--------+---------------+----------+
//! ```
//!
//! where `checksum` is the XOR of every byte from `command` through the end
//! of the payload. [`FrameCodec`] reassembles frames from an arbitrarily
//! chunked, possibly corrupted byte stream, resynchronizing on the next
//! header after a checksum failure.

use bytes::{Buf, BufMut, BytesMut};

use crate::constants::*;
use crate::error::ProtocolError;

/// XOR-fold a byte sequence. Returns 0 for empty input.
pub fn checksum(data: &[u8]) -> u8 {
    data.iter().fold(0, |acc, b| acc ^ b)
}

/// A single decoded protocol frame: command byte plus opaque payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Command code (see the `CMD_*` constants).
    pub command: u8,
    /// Payload bytes, opaque to the codec.
    pub payload: Vec<u8>,
}

impl Frame {
    /// Create a frame, rejecting payloads the 16-bit length field cannot
    /// represent.
    pub fn new(command: u8, payload: Vec<u8>) -> Result<Self, ProtocolError> {
        if payload.len() > MAX_PAYLOAD_SIZE {
            return Err(ProtocolError::PayloadTooLarge {
                max: MAX_PAYLOAD_SIZE,
                actual: payload.len(),
            });
        }
        Ok(Frame { command, payload })
    }

    /// Encode the frame for transmission:
    /// header + command + length (LE) + payload + checksum.
    pub fn encode(&self) -> Vec<u8> {
        debug_assert!(self.payload.len() <= MAX_PAYLOAD_SIZE);
        let len = self.payload.len() as u16;
        let mut buf = Vec::with_capacity(FRAME_OVERHEAD + self.payload.len());
        buf.extend_from_slice(&FRAME_HEADER);
        buf.push(self.command);
        buf.put_u16_le(len);
        buf.extend_from_slice(&self.payload);
        // Checksum covers command + length bytes + payload
        buf.push(checksum(&buf[2..]));
        buf
    }
}

/// A codec for reassembling frames from the receive byte stream.
///
/// Feed received chunks in with [`push`](FrameCodec::push) and drain
/// complete frames with [`decode`](FrameCodec::decode). The internal
/// buffer keeps partial frames across calls, so arbitrary chunking of
/// the input stream is fine.
#[derive(Debug, Default)]
pub struct FrameCodec {
    /// Buffer for accumulating incoming data.
    buffer: BytesMut,
}

impl FrameCodec {
    /// Create a new frame codec.
    pub fn new() -> Self {
        FrameCodec {
            buffer: BytesMut::with_capacity(2 * (MIN_FRAME_SIZE + MP3_CHUNK_SIZE)),
        }
    }

    /// Add received data to the buffer.
    pub fn push(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Try to decode the next complete, checksum-valid frame.
    ///
    /// Returns `Some(frame)` if one is available, or `None` if more data is
    /// needed. Corrupted frames are skipped internally: on a checksum
    /// mismatch the two header bytes are dropped and the scan restarts, so
    /// a later valid frame in the same buffer is still found by this call.
    pub fn decode(&mut self) -> Option<Frame> {
        loop {
            // Scan for the frame header, discarding any preceding garbage.
            match find_header(&self.buffer) {
                Some(idx) => self.buffer.advance(idx),
                None => {
                    // No header; a frame could still start at the last byte.
                    if self.buffer.len() > 1 {
                        let keep_from = self.buffer.len() - 1;
                        self.buffer.advance(keep_from);
                    }
                    return None;
                }
            }

            // Header + command + length + checksum is the minimum frame.
            if self.buffer.len() < MIN_FRAME_SIZE {
                return None;
            }

            let command = self.buffer[2];
            let len = u16::from_le_bytes([self.buffer[3], self.buffer[4]]) as usize;

            // Wait for the complete frame.
            let total = 5 + len + 1;
            if self.buffer.len() < total {
                return None;
            }

            let expected = checksum(&self.buffer[2..5 + len]);
            let received = self.buffer[5 + len];
            if expected != received {
                log::warn!(
                    "checksum mismatch: expected 0x{:02X}, received 0x{:02X}; resynchronizing",
                    expected,
                    received
                );
                // Drop the header we just consumed and rescan; a valid
                // frame may start later in the buffer.
                self.buffer.advance(2);
                continue;
            }

            self.buffer.advance(5);
            let payload = self.buffer.split_to(len).to_vec();
            self.buffer.advance(1); // checksum byte
            return Some(Frame { command, payload });
        }
    }

    /// Get the number of buffered bytes.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Clear the buffer.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

/// Find the offset of the first frame header in `buf`.
fn find_header(buf: &[u8]) -> Option<usize> {
    buf.windows(FRAME_HEADER.len())
        .position(|w| w == FRAME_HEADER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_empty_is_zero() {
        assert_eq!(checksum(&[]), 0);
    }

    #[test]
    fn test_checksum_self_inverse() {
        let data = [0x13u8, 0x37, 0xAA, 0x55, 0x00, 0xFF];
        let doubled: Vec<u8> = data.iter().chain(data.iter()).copied().collect();
        assert_eq!(checksum(&doubled), 0);
    }

    #[test]
    fn test_checksum_bit_sensitivity() {
        let data = [0x01u8, 0x02, 0x03, 0x04];
        let base = checksum(&data);
        for i in 0..data.len() {
            for bit in 0..8 {
                let mut flipped = data;
                flipped[i] ^= 1 << bit;
                assert_ne!(checksum(&flipped), base, "flip byte {} bit {}", i, bit);
            }
        }
    }

    #[test]
    fn test_encode_handshake_golden_bytes() {
        let frame = Frame {
            command: CMD_HANDSHAKE,
            payload: vec![],
        };
        assert_eq!(frame.encode(), vec![0xAA, 0x55, 0x06, 0x00, 0x00, 0x06]);
    }

    #[test]
    fn test_encode_audio_data_golden_bytes() {
        let frame = Frame {
            command: CMD_AUDIO_DATA,
            payload: vec![0x10, 0x20],
        };
        // 0x03 ^ 0x02 ^ 0x00 ^ 0x10 ^ 0x20 = 0x31
        assert_eq!(
            frame.encode(),
            vec![0xAA, 0x55, 0x03, 0x02, 0x00, 0x10, 0x20, 0x31]
        );
    }

    #[test]
    fn test_frame_new_rejects_oversized_payload() {
        let err = Frame::new(CMD_AUDIO_DATA, vec![0u8; MAX_PAYLOAD_SIZE + 1]).unwrap_err();
        assert_eq!(
            err,
            ProtocolError::PayloadTooLarge {
                max: MAX_PAYLOAD_SIZE,
                actual: MAX_PAYLOAD_SIZE + 1,
            }
        );
    }

    #[test]
    fn test_decode_round_trip() {
        for payload in [vec![], vec![0xEE], vec![0x10, 0x20, 0x30], vec![0x7F; 4096]] {
            let frame = Frame {
                command: CMD_AUDIO_DATA,
                payload,
            };
            let mut codec = FrameCodec::new();
            codec.push(&frame.encode());
            assert_eq!(codec.decode(), Some(frame));
            assert!(codec.decode().is_none());
        }
    }

    #[test]
    fn test_decode_skips_leading_garbage() {
        let frame = Frame {
            command: CMD_ACK,
            payload: vec![CMD_HANDSHAKE],
        };
        let mut bytes = vec![0x00, 0x12, 0xAA, 0x17]; // includes a lone 0xAA
        bytes.extend_from_slice(&frame.encode());

        let mut codec = FrameCodec::new();
        codec.push(&bytes);
        assert_eq!(codec.decode(), Some(frame));
    }

    #[test]
    fn test_decode_keeps_trailing_garbage() {
        let frame = Frame {
            command: CMD_AUDIO_DATA,
            payload: vec![1, 2, 3],
        };
        let mut bytes = frame.encode();
        bytes.extend_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);

        let mut codec = FrameCodec::new();
        codec.push(&bytes);
        assert_eq!(codec.decode(), Some(frame));
        // Garbage without a header collapses to its final byte.
        assert!(codec.decode().is_none());
        assert_eq!(codec.buffered_len(), 1);
    }

    #[test]
    fn test_decode_headerless_garbage_keeps_last_byte() {
        let mut codec = FrameCodec::new();
        codec.push(&[0x01, 0x02, 0x03, 0x04]);
        assert!(codec.decode().is_none());
        assert_eq!(codec.buffered_len(), 1);
    }

    #[test]
    fn test_decode_resynchronizes_after_corruption() {
        let good = Frame {
            command: CMD_AUDIO_DATA,
            payload: vec![9, 8, 7],
        };
        let mut corrupted = Frame {
            command: CMD_AUDIO_DATA,
            payload: vec![1, 2, 3, 4],
        }
        .encode();
        let last = corrupted.len() - 1;
        corrupted[last] ^= 0xFF; // break the checksum

        let mut bytes = corrupted;
        bytes.extend_from_slice(&good.encode());

        let mut codec = FrameCodec::new();
        codec.push(&bytes);
        // The corrupted frame is skipped within the same call.
        assert_eq!(codec.decode(), Some(good));
    }

    #[test]
    fn test_decode_partial_delivery() {
        let frame = Frame {
            command: CMD_AUDIO_DATA,
            payload: vec![0x11, 0x22, 0x33],
        };
        let bytes = frame.encode();

        let mut codec = FrameCodec::new();
        // Header, then command+length, then payload+checksum.
        codec.push(&bytes[..2]);
        assert!(codec.decode().is_none());
        codec.push(&bytes[2..5]);
        assert!(codec.decode().is_none());
        codec.push(&bytes[5..]);
        assert_eq!(codec.decode(), Some(frame));
    }

    #[test]
    fn test_decode_byte_at_a_time() {
        let frame = Frame {
            command: CMD_ACK,
            payload: vec![CMD_START_RECORD],
        };
        let bytes = frame.encode();

        let mut codec = FrameCodec::new();
        let mut decoded = None;
        for &b in &bytes {
            codec.push(&[b]);
            if let Some(f) = codec.decode() {
                decoded = Some(f);
            }
        }
        assert_eq!(decoded, Some(frame));
    }

    #[test]
    fn test_decode_multiple_frames_in_one_push() {
        let first = Frame {
            command: CMD_AUDIO_DATA,
            payload: vec![1; 16],
        };
        let second = Frame {
            command: CMD_ACK,
            payload: vec![CMD_STOP_RECORD],
        };
        let mut bytes = first.encode();
        bytes.extend_from_slice(&second.encode());

        let mut codec = FrameCodec::new();
        codec.push(&bytes);
        assert_eq!(codec.decode(), Some(first));
        assert_eq!(codec.decode(), Some(second));
        assert!(codec.decode().is_none());
    }
}
