//! # Playback Controller Usage Example
//!
//! Demonstrates driving the playback controller with simulated decode and
//! output capabilities: load a source, play it, pause and resume, and watch
//! the emitted events.
//!
//! Run with: `cargo run --example player_demo --package core-player`

use async_trait::async_trait;
use core_player::{
    AudioCodec, DecoderFactory, DeviceState, OutputDevice, PlaybackController, PlayerError,
    PlayerEvent, Result, SourceDecoder,
};
use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::{self, Instant};

// ============================================================================
// Simulated Capabilities
// ============================================================================

/// Decoder over a synthetic source: position advances with wall time while
/// the device is rendering.
struct SimulatedDecoder {
    codec: AudioCodec,
    duration: Duration,
    clock: Arc<Mutex<SimulatedClock>>,
}

#[derive(Default)]
struct SimulatedClock {
    played: Duration,
    running_since: Option<Instant>,
}

impl SimulatedClock {
    fn elapsed(&self) -> Duration {
        self.played
            + self
                .running_since
                .map(|since| since.elapsed())
                .unwrap_or_default()
    }
}

impl SourceDecoder for SimulatedDecoder {
    fn codec(&self) -> AudioCodec {
        self.codec
    }

    fn duration(&self) -> Duration {
        self.duration
    }

    fn position(&self) -> Duration {
        self.duration.min(self.clock.lock().unwrap().elapsed())
    }
}

struct SimulatedFactory {
    track_duration: Duration,
    clock: Arc<Mutex<SimulatedClock>>,
}

#[async_trait]
impl DecoderFactory for SimulatedFactory {
    async fn open(&self, path: &Path, codec: AudioCodec) -> Result<Arc<dyn SourceDecoder>> {
        if !path.to_string_lossy().starts_with("demo://") {
            return Err(PlayerError::Decoder(format!(
                "cannot open {}",
                path.display()
            )));
        }

        Ok(Arc::new(SimulatedDecoder {
            codec,
            duration: self.track_duration,
            clock: Arc::clone(&self.clock),
        }))
    }
}

/// Output device that renders silence: it simply lets time pass and fires
/// the stopped notification at end-of-stream or on request.
struct SimulatedDevice {
    track_duration: Duration,
    clock: Arc<Mutex<SimulatedClock>>,
    state: Mutex<DeviceState>,
    stopped_tx: broadcast::Sender<()>,
    end_task: Mutex<Option<tokio::task::JoinHandle<()>>>,
}

impl SimulatedDevice {
    fn new(track_duration: Duration, clock: Arc<Mutex<SimulatedClock>>) -> Self {
        let (stopped_tx, _) = broadcast::channel(8);
        Self {
            track_duration,
            clock,
            state: Mutex::new(DeviceState::Stopped),
            stopped_tx,
            end_task: Mutex::new(None),
        }
    }

    fn halt_clock(&self) {
        let mut clock = self.clock.lock().unwrap();
        if let Some(since) = clock.running_since.take() {
            clock.played += since.elapsed();
        }
    }
}

#[async_trait]
impl OutputDevice for SimulatedDevice {
    async fn init(&self, _decoder: Arc<dyn SourceDecoder>) -> Result<()> {
        self.clock.lock().unwrap().played = Duration::ZERO;
        Ok(())
    }

    async fn start(&self) -> Result<()> {
        let remaining = {
            let mut clock = self.clock.lock().unwrap();
            clock.running_since = Some(Instant::now());
            self.track_duration.saturating_sub(clock.played)
        };
        *self.state.lock().unwrap() = DeviceState::Playing;

        let stopped_tx = self.stopped_tx.clone();
        let task = tokio::spawn(async move {
            time::sleep(remaining + Duration::from_millis(100)).await;
            let _ = stopped_tx.send(());
        });
        if let Some(previous) = self.end_task.lock().unwrap().replace(task) {
            previous.abort();
        }
        Ok(())
    }

    async fn pause(&self) -> Result<()> {
        if let Some(task) = self.end_task.lock().unwrap().take() {
            task.abort();
        }
        self.halt_clock();
        *self.state.lock().unwrap() = DeviceState::Paused;
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        let was_active = {
            let mut state = self.state.lock().unwrap();
            let active = *state != DeviceState::Stopped;
            *state = DeviceState::Stopped;
            active
        };
        if let Some(task) = self.end_task.lock().unwrap().take() {
            task.abort();
        }
        self.halt_clock();

        if was_active {
            let stopped_tx = self.stopped_tx.clone();
            tokio::spawn(async move {
                time::sleep(Duration::from_millis(20)).await;
                let _ = stopped_tx.send(());
            });
        }
        Ok(())
    }

    async fn dispose(&self) -> Result<()> {
        self.stop().await
    }

    fn state(&self) -> DeviceState {
        *self.state.lock().unwrap()
    }

    fn subscribe_stopped(&self) -> broadcast::Receiver<()> {
        self.stopped_tx.subscribe()
    }
}

// ============================================================================
// Demo
// ============================================================================

#[tokio::main]
async fn main() {
    init_logging(
        LoggingConfig::default()
            .with_format(LogFormat::Compact)
            .with_level(tracing::Level::DEBUG),
    )
    .expect("Failed to initialize logging");

    let track_duration = Duration::from_secs(4);
    let clock = Arc::new(Mutex::new(SimulatedClock::default()));

    let player = PlaybackController::new(
        Arc::new(SimulatedDevice::new(track_duration, Arc::clone(&clock))),
        Arc::new(SimulatedFactory {
            track_duration,
            clock,
        }),
    );
    let mut events = player.subscribe();

    player
        .load("demo://first-song.mp3", "demo-track")
        .await
        .expect("load should succeed");
    player.play().await.expect("play should succeed");

    // Pause briefly half way through, then resume.
    let mut paused_once = false;
    loop {
        match events.recv().await {
            Ok(PlayerEvent::PositionChanged { track_id, position }) => {
                println!(
                    "[{}] {:.1}s / {:.1}s",
                    track_id,
                    position.current_time.as_secs_f64(),
                    position.duration.as_secs_f64()
                );

                if !paused_once && position.current_time >= Duration::from_secs(2) {
                    paused_once = true;
                    println!("-- pausing for two seconds --");
                    player.pause().await.expect("pause should succeed");
                    time::sleep(Duration::from_secs(2)).await;
                    println!("-- resuming --");
                    player.play().await.expect("resume should succeed");
                }
            }
            Ok(terminal) => {
                println!("terminal event: {} [{}]", terminal.event_type(), terminal.track_id());
                break;
            }
            Err(err) => {
                eprintln!("event stream error: {}", err);
                break;
            }
        }
    }

    player.dispose().await.expect("dispose should succeed");
}
