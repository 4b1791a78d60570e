//! Host error types.

use std::path::PathBuf;

use thiserror::Error;
use uart_audio_protocol::ProtocolError;

/// Errors surfaced to the CLI.
///
/// Transport and file faults are fatal to the current operation and carry
/// the underlying `io::Error`. Frame corruption never appears here; the
/// protocol codec recovers from it locally.
#[derive(Error, Debug)]
pub enum HostError {
    /// Transport or file I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Protocol-level failure.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A WAV file could not be parsed.
    #[error("invalid WAV file: {0}")]
    InvalidWav(String),

    /// Media file extension is not supported.
    #[error("unsupported media extension: {0:?} (supported: .wav, .mp3)")]
    UnsupportedExtension(String),

    /// Media file does not exist.
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),
}
