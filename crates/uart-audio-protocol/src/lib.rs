//! ESP32 UART Audio Protocol
//!
//! This crate provides types and utilities for communicating with ESP32 audio
//! firmware over a framed UART protocol. Every frame carries a fixed header,
//! a command byte, a length-prefixed payload, and an XOR checksum:
//!
//! ```text
//! +------+------+---------+--------+--------+---------------+----------+
//! | 0xAA | 0x55 | command | len_lo | len_hi | data[0..len]  | checksum |
//! +------+------+---------+--------+--------+---------------+----------+
//! ```
//!
//! The checksum is the XOR of the command byte, both length bytes, and the
//! payload. Frames with a bad checksum are never surfaced; the decoder
//! resynchronizes on the next header instead.
//!
//! # Protocol Overview
//!
//! - **Commands** (host → firmware): start/stop record, start/stop play,
//!   audio data chunks, handshake, set-format.
//! - **Messages** (firmware → host): audio data chunks while recording,
//!   acknowledgments naming the command they answer.
//!
//! # Example
//!
//! ```rust,ignore
//! use uart_audio_protocol::{Command, FrameCodec, DeviceMessage};
//!
//! // Build a command frame for transmission
//! let bytes = Command::Handshake.to_frame().encode();
//!
//! // Reassemble frames from the receive stream
//! let mut codec = FrameCodec::new();
//! codec.push(&received);
//! while let Some(frame) = codec.decode() {
//!     let message = DeviceMessage::from_frame(frame);
//! }
//! ```

mod commands;
mod constants;
mod error;
mod frame;
mod messages;

pub use commands::*;
pub use constants::*;
pub use error::*;
pub use frame::*;
pub use messages::*;
