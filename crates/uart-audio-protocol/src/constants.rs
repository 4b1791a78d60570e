//! Protocol constants
//!
//! These constants define the frame header, command codes, audio format tags,
//! and the fixed audio parameters used by the ESP32 UART audio protocol.

/// Two-byte marker that starts every frame.
pub const FRAME_HEADER: [u8; 2] = [0xAA, 0x55];

/// Minimum size of a complete frame (header 2 + command 1 + length 2 + checksum 1).
pub const MIN_FRAME_SIZE: usize = 6;

/// Bytes added around a payload by framing (header + command + length + checksum).
pub const FRAME_OVERHEAD: usize = 6;

/// Largest payload the 16-bit length field can describe.
pub const MAX_PAYLOAD_SIZE: usize = 65535;

// ============================================================================
// Command Codes (host → firmware, except where noted)
// ============================================================================

/// Start recording from the device microphone.
pub const CMD_START_RECORD: u8 = 0x01;
/// Stop recording.
pub const CMD_STOP_RECORD: u8 = 0x02;
/// One chunk of audio data (both directions).
pub const CMD_AUDIO_DATA: u8 = 0x03;
/// Start playback on the device speaker.
pub const CMD_START_PLAY: u8 = 0x04;
/// Stop playback.
pub const CMD_STOP_PLAY: u8 = 0x05;
/// Connectivity probe; the device answers with an ack.
pub const CMD_HANDSHAKE: u8 = 0x06;
/// Acknowledgment (firmware → host); payload is the acknowledged command.
pub const CMD_ACK: u8 = 0x07;
/// Select the playback format; payload is one format tag byte.
pub const CMD_SET_FORMAT: u8 = 0x08;

// ============================================================================
// Audio Format Tags (payload of CMD_SET_FORMAT)
// ============================================================================

/// Raw little-endian PCM samples.
pub const FORMAT_PCM: u8 = 0x00;
/// MP3 bitstream, decoded by the device.
pub const FORMAT_MP3: u8 = 0x01;

// ============================================================================
// Fixed Capture Parameters
// ============================================================================
// These match the device I2S configuration; recorded audio is always
// delivered in this format.

/// Sample rate of recorded audio in Hz.
pub const SAMPLE_RATE: u32 = 8000;
/// Bits per recorded sample.
pub const BITS_PER_SAMPLE: u16 = 16;
/// Number of recorded channels.
pub const CHANNELS: u16 = 1;

// ============================================================================
// Playback Pacing
// ============================================================================
// Chunk sizes and inter-chunk delays are sized to the device receive
// buffer: MP3 uses larger chunks and a faster rate to keep the decoder's
// input buffer fed.

/// Audio-data payload size when sending PCM.
pub const PCM_CHUNK_SIZE: usize = 512;
/// Audio-data payload size when sending MP3.
pub const MP3_CHUNK_SIZE: usize = 1024;
/// Delay between PCM chunks, in milliseconds.
pub const PCM_CHUNK_DELAY_MS: u64 = 20;
/// Delay between MP3 chunks, in milliseconds.
pub const MP3_CHUNK_DELAY_MS: u64 = 10;
