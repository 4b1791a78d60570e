//! Background reader task.
//!
//! One reader thread runs per session operation. It pulls bytes from the
//! transport with a short timeout, feeds them through the frame codec, and
//! dispatches every decoded frame: audio data into the shared accumulator,
//! acks and unrecognized commands to the log.
//!
//! The running flag has a single writer (the session, via [`ReaderTask::stop`])
//! and a single reader (the thread), so an atomic is all the coordination
//! needed. The accumulator is only read back after the thread has been
//! joined, which `stop` guarantees.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use tracing::{debug, error, info, warn};
use uart_audio_protocol::{DeviceMessage, FrameCodec};

use crate::transport::Transport;

/// Shared buffer collecting recorded audio bytes for one operation.
pub type AudioAccumulator = Arc<Mutex<Vec<u8>>>;

/// Handle to the background reader thread.
pub struct ReaderTask {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl ReaderTask {
    /// Spawn the reader thread for one operation.
    pub fn spawn(mut transport: Box<dyn Transport>, audio: AudioAccumulator) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);

        let handle = thread::spawn(move || {
            let mut codec = FrameCodec::new();
            let mut buf = [0u8; 1024];

            while flag.load(Ordering::Relaxed) {
                match transport.read(&mut buf) {
                    Ok(0) => continue, // timeout, re-check the flag
                    Ok(n) => {
                        codec.push(&buf[..n]);
                        // One read may hold several frames, or end mid-frame.
                        while let Some(frame) = codec.decode() {
                            dispatch(DeviceMessage::from_frame(frame), &audio);
                        }
                    }
                    Err(e) => {
                        // Errors after stop are the transport being closed
                        // out from under us, which is the normal shutdown
                        // order, not a failure.
                        if flag.load(Ordering::Relaxed) {
                            error!("receive error: {}", e);
                        }
                        break;
                    }
                }
            }
        });

        ReaderTask {
            running,
            handle: Some(handle),
        }
    }

    /// Stop the reader thread and wait for it to finish.
    ///
    /// Joining here is what makes it safe for the session to read the
    /// accumulator afterwards, and keeps frames from leaking into the next
    /// operation.
    pub fn stop(mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for ReaderTask {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        // Don't wait for the thread in drop - it will terminate on its own
    }
}

/// Apply one decoded message.
fn dispatch(message: DeviceMessage, audio: &AudioAccumulator) {
    match message {
        DeviceMessage::AudioData(data) => {
            let mut audio = audio.lock().unwrap();
            audio.extend_from_slice(&data);
            info!(received_bytes = audio.len(), "audio data");
        }
        DeviceMessage::Ack { command: Some(cmd) } => {
            debug!("device acknowledged command 0x{:02X}", cmd);
        }
        DeviceMessage::Ack { command: None } => {
            debug!("device acknowledgment (no command byte)");
        }
        DeviceMessage::Unknown { command, len } => {
            warn!(
                "unrecognized command 0x{:02X} ({} payload bytes), ignoring",
                command, len
            );
        }
    }
}
