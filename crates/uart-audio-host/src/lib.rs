//! Host-side support for the ESP32 UART audio link.
//!
//! This crate drives one device session at a time: a [`session::Session`]
//! sends and paces command frames over a [`transport::Transport`], while a
//! background [`reader::ReaderTask`] reassembles inbound frames and collects
//! recorded audio. WAV serialization and media loading live in [`wav`] and
//! [`media`]. The `uart-audio` binary wires these together behind a CLI.

pub mod error;
pub mod media;
pub mod reader;
pub mod session;
pub mod transport;
pub mod wav;

pub use error::HostError;
