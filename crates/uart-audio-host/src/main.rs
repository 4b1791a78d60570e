//! `uart-audio` - record and play audio over the ESP32 UART link.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use uart_audio_host::media::load_media;
use uart_audio_host::session::Session;
use uart_audio_host::transport::TcpTransport;
use uart_audio_host::wav::{write_wav, WavAudio};
use uart_audio_host::HostError;
use uart_audio_protocol::{BITS_PER_SAMPLE, CHANNELS, SAMPLE_RATE};

#[derive(Parser)]
#[command(name = "uart-audio", about = "ESP32 UART audio transfer tool")]
struct Cli {
    /// Address of the UART bridge (host:port)
    addr: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a handshake probe to test connectivity
    Handshake,

    /// Record from the device microphone into a WAV file
    Record {
        /// Output file
        #[arg(short, long, default_value = "recording.wav")]
        output: PathBuf,
        /// Recording duration in seconds
        #[arg(short, long, default_value_t = 10)]
        duration: u64,
    },

    /// Play a WAV or MP3 file on the device
    Play {
        /// Audio file (.wav or .mp3)
        file: PathBuf,
    },

    /// Wait for device-initiated recording (device key starts/stops)
    Listen {
        /// Output file
        #[arg(short, long, default_value = "recording.wav")]
        output: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run() {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), HostError> {
    let cli = Cli::parse();

    let cancel = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&cancel);
    ctrlc::set_handler(move || {
        handler_flag.store(true, Ordering::Relaxed);
    })
    .expect("failed to install Ctrl-C handler");

    let transport = TcpTransport::connect(&cli.addr)?;
    info!("connected to {}", cli.addr);
    let mut session = Session::new(Box::new(transport), cancel);

    match cli.command {
        Commands::Handshake => session.handshake(),
        Commands::Record { output, duration } => {
            let pcm = session.record(Duration::from_secs(duration))?;
            save_recording(&output, pcm)
        }
        Commands::Play { file } => {
            let source = load_media(&file)?;
            session.play(&source.data, source.format)
        }
        Commands::Listen { output } => {
            let pcm = session.listen()?;
            save_recording(&output, pcm)
        }
    }
}

/// Write captured PCM to a WAV file, or report that nothing arrived.
fn save_recording(output: &Path, pcm: Vec<u8>) -> Result<(), HostError> {
    if pcm.is_empty() {
        info!("no audio data received");
        return Ok(());
    }

    write_wav(output, &pcm, SAMPLE_RATE, BITS_PER_SAMPLE, CHANNELS)?;
    let summary = WavAudio {
        sample_rate: SAMPLE_RATE,
        bits_per_sample: BITS_PER_SAMPLE,
        channels: CHANNELS,
        data: pcm,
    };
    info!(
        "saved {}: {} Hz, {}-bit, {} channel(s), {} bytes, {:.2}s",
        output.display(),
        summary.sample_rate,
        summary.bits_per_sample,
        summary.channels,
        summary.data.len(),
        summary.duration_secs()
    );
    Ok(())
}
