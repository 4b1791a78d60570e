//! Session controller.
//!
//! A session owns the transport and runs one operation at a time:
//! handshake, record, listen, or play. Each operation starts a background
//! [`ReaderTask`], sends its command sequence with fixed pacing, and always
//! tears down the same way - send the matching stop command, clear the
//! running flag, join the reader - no matter where cancellation or an
//! error is observed. The device is never left in a started state.
//!
//! The firmware does not require acks before the next command, so the
//! controller only uses fixed settle delays between control frames.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use tracing::{debug, info};
use uart_audio_protocol::{AudioFormat, Command};

use crate::error::HostError;
use crate::reader::{AudioAccumulator, ReaderTask};
use crate::transport::Transport;

/// Settle delay after start/stop control commands.
const SETTLE_DELAY: Duration = Duration::from_millis(500);
/// Settle delay after the set-format command.
const SET_FORMAT_DELAY: Duration = Duration::from_millis(200);
/// Granularity of cancellation polling during waits.
const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// One logical session with the device.
pub struct Session {
    transport: Box<dyn Transport>,
    cancel: Arc<AtomicBool>,
}

impl Session {
    /// Create a session over an open transport. `cancel` is observed at
    /// every wait point and between chunk sends; setting it (e.g. from a
    /// Ctrl-C handler) ends the current operation through the normal
    /// shutdown path.
    pub fn new(transport: Box<dyn Transport>, cancel: Arc<AtomicBool>) -> Self {
        Session { transport, cancel }
    }

    /// Send a handshake probe and briefly listen for the device ack.
    pub fn handshake(&mut self) -> Result<(), HostError> {
        let reader = self.start_reader(Arc::new(Mutex::new(Vec::new())))?;

        info!("sending handshake");
        let result = self.send(&Command::Handshake);

        self.wait(Duration::from_secs(1));
        reader.stop();
        result
    }

    /// Record from the device microphone for `duration` (or until
    /// cancelled) and return the captured PCM bytes. An empty result means
    /// the device sent no audio-data frames.
    pub fn record(&mut self, duration: Duration) -> Result<Vec<u8>, HostError> {
        info!("recording for {:?}", duration);
        self.capture(|session| session.wait(duration))
    }

    /// Wait for device-initiated recording (started and stopped by the
    /// device's own key) until cancelled, returning the captured PCM bytes.
    pub fn listen(&mut self) -> Result<Vec<u8>, HostError> {
        info!("listening; press Ctrl-C to stop");
        self.capture(|session| {
            while !session.cancelled() {
                thread::sleep(CANCEL_POLL_INTERVAL);
            }
        })
    }

    /// Stream `data` to the device for playback.
    pub fn play(&mut self, data: &[u8], format: AudioFormat) -> Result<(), HostError> {
        let reader = self.start_reader(Arc::new(Mutex::new(Vec::new())))?;

        let result = self.send_audio(data, format);

        // Stop playback and shut the reader down on every path, including
        // cancellation and send failure mid-stream.
        let stop_result = self.send(&Command::StopPlay);
        reader.stop();
        result.and(stop_result)
    }

    /// Shared record/listen skeleton: start the reader, start recording,
    /// run `wait_phase`, then stop recording and drain the stream tail.
    fn capture<F>(&mut self, wait_phase: F) -> Result<Vec<u8>, HostError>
    where
        F: FnOnce(&Self),
    {
        let audio: AudioAccumulator = Arc::new(Mutex::new(Vec::new()));
        let reader = self.start_reader(Arc::clone(&audio))?;

        let start_result = self.send(&Command::StartRecord);
        if start_result.is_ok() {
            wait_phase(self);
        }

        // Stop even if the start failed or the wait was cancelled: a frame
        // may have gone out before the fault, and a device left recording
        // would jam the next session.
        let stop_result = self.send(&Command::StopRecord);
        // Let the tail of the audio stream drain before joining.
        thread::sleep(SETTLE_DELAY);
        reader.stop();

        start_result.and(stop_result)?;
        let data = std::mem::take(&mut *audio.lock().unwrap());
        Ok(data)
    }

    /// Set-format / start-play / paced chunks, without the shutdown tail.
    fn send_audio(&mut self, data: &[u8], format: AudioFormat) -> Result<(), HostError> {
        info!("setting audio format: {}", format);
        self.send(&Command::SetFormat(format))?;
        self.wait(SET_FORMAT_DELAY);

        self.send(&Command::StartPlay)?;
        self.wait(SETTLE_DELAY);

        let chunk_size = format.chunk_size();
        let delay = format.chunk_delay();
        let total_chunks = (data.len() + chunk_size - 1) / chunk_size;
        info!(
            "sending {} bytes in {} chunks of up to {}",
            data.len(),
            total_chunks,
            chunk_size
        );

        for (index, chunk) in data.chunks(chunk_size).enumerate() {
            if self.cancelled() {
                info!("playback interrupted after {}/{} chunks", index, total_chunks);
                return Ok(());
            }
            self.send(&Command::AudioData(chunk.to_vec()))?;
            debug!("sent chunk {}/{}", index + 1, total_chunks);
            thread::sleep(delay);
        }

        info!("all chunks sent");
        self.wait(SETTLE_DELAY);
        Ok(())
    }

    /// Encode and transmit one command frame.
    fn send(&mut self, command: &Command) -> Result<(), HostError> {
        self.transport.write_all(&command.to_frame().encode())?;
        Ok(())
    }

    /// Start the reader task on a second transport handle.
    fn start_reader(&self, audio: AudioAccumulator) -> Result<ReaderTask, HostError> {
        Ok(ReaderTask::spawn(self.transport.try_clone()?, audio))
    }

    /// Sleep for `duration` in short slices, returning early when cancelled.
    fn wait(&self, duration: Duration) {
        let mut remaining = duration;
        while !remaining.is_zero() && !self.cancelled() {
            let slice = remaining.min(CANCEL_POLL_INTERVAL);
            thread::sleep(slice);
            remaining -= slice;
        }
    }

    fn cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }
}
