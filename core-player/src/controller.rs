//! # Playback Controller
//!
//! Single-track playback control over an [`OutputDevice`] and a
//! [`DecoderFactory`]. Owns the lifecycle state machine, the stop-drain
//! completion gate and the position reporter.
//!
//! ## Concurrency Model
//!
//! Commands may arrive concurrently from independent tasks, and the output
//! device delivers its stopped notification from yet another context. All
//! shared state lives in one `PlayerState` behind a `tokio::sync::Mutex`;
//! event emission happens strictly after the guard is released.
//!
//! A one-permit `Semaphore` forms the completion gate: commands acquire the
//! permit to observe that no stop sequence is draining. `load`, `play` and
//! `pause` release it when their synchronous portion completes; `stop`
//! forgets it and only the completion handler adds it back, because the
//! device's stopped notification is the only point at which prior buffers are
//! known to be fully retired. Nothing waits on the gate while holding the
//! state mutex.
//!
//! The device's foreign-context notification is consumed by a
//! controller-owned task, so the completion transition always runs inside the
//! controller's own serialization domain.

use crate::config::PlayerConfig;
use crate::error::{PlayerError, Result};
use crate::events::{EventBus, PlayerEvent, Receiver};
use crate::format::FormatResolver;
use crate::reporter;
use crate::traits::{
    AudioCodec, DecoderFactory, DeviceState, OutputDevice, SourceDecoder, TrackPosition,
};
use core_runtime::logging::strip_path;
use std::mem;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex, Semaphore, SemaphorePermit};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Lifecycle mode of the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerMode {
    /// No source loaded.
    Empty,
    /// A source is loaded and the device initialized, but not started.
    Ready,
    /// The device is actively producing audio; position reporting runs.
    Playing,
    /// The device is suspended; reporting cadence bookkeeping retained.
    Paused,
    /// A stop was requested; waiting for the device's completion
    /// notification before accepting new commands.
    Draining,
}

impl PlayerMode {
    /// A track is associated with the player and not yet fully stopped.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            PlayerMode::Playing | PlayerMode::Paused | PlayerMode::Draining
        )
    }
}

/// Mutable controller state, guarded by the serialization mutex.
pub(crate) struct PlayerState {
    pub(crate) mode: PlayerMode,
    pub(crate) decoder: Option<Arc<dyn SourceDecoder>>,
    pub(crate) track_id: Option<String>,
    /// Set by `stop` before requesting the device stop; the completion
    /// handler uses it to pick the terminal event kind.
    pub(crate) stopped_explicitly: bool,
    /// True while `stop` has taken the gate permit.
    pub(crate) gate_held: bool,
    /// Makes an already-queued reporter tick a no-op after completion.
    pub(crate) suppress_reports: bool,
    pub(crate) paused_at: Option<Instant>,
    pub(crate) last_report: Instant,
    pub(crate) reporter: Option<JoinHandle<()>>,
}

impl PlayerState {
    fn new() -> Self {
        Self {
            mode: PlayerMode::Empty,
            decoder: None,
            track_id: None,
            stopped_explicitly: false,
            gate_held: false,
            suppress_reports: false,
            paused_at: None,
            last_report: Instant::now(),
            reporter: None,
        }
    }
}

/// State shared between the controller, the reporter task and the completion
/// task.
pub(crate) struct Shared {
    pub(crate) device: Arc<dyn OutputDevice>,
    pub(crate) decoders: Arc<dyn DecoderFactory>,
    pub(crate) events: EventBus,
    pub(crate) gate: Semaphore,
    pub(crate) state: Mutex<PlayerState>,
    pub(crate) config: PlayerConfig,
}

/// Single-track audio playback controller.
///
/// Commands serialize through one mutex plus the stop-drain gate; see the
/// module documentation for the full model. One playable slot: loading a new
/// source replaces the previous track identity wholesale.
pub struct PlaybackController {
    shared: Arc<Shared>,
    completion: JoinHandle<()>,
}

impl PlaybackController {
    /// Create a controller over the given device and decoder factory with
    /// the default configuration.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime: the controller spawns its
    /// completion task on construction.
    pub fn new(device: Arc<dyn OutputDevice>, decoders: Arc<dyn DecoderFactory>) -> Self {
        Self::build(device, decoders, PlayerConfig::default())
    }

    /// Create a controller with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PlayerError::InvalidConfig`] if the configuration fails
    /// validation.
    pub fn with_config(
        device: Arc<dyn OutputDevice>,
        decoders: Arc<dyn DecoderFactory>,
        config: PlayerConfig,
    ) -> Result<Self> {
        config.validate().map_err(PlayerError::InvalidConfig)?;
        Ok(Self::build(device, decoders, config))
    }

    fn build(
        device: Arc<dyn OutputDevice>,
        decoders: Arc<dyn DecoderFactory>,
        config: PlayerConfig,
    ) -> Self {
        let events = EventBus::new(config.event_capacity);
        let stopped = device.subscribe_stopped();
        let shared = Arc::new(Shared {
            device,
            decoders,
            events,
            gate: Semaphore::new(1),
            state: Mutex::new(PlayerState::new()),
            config,
        });

        let completion = tokio::spawn(completion_loop(Arc::clone(&shared), stopped));

        Self { shared, completion }
    }

    /// The bus carrying [`PlayerEvent`] notifications.
    pub fn events(&self) -> &EventBus {
        &self.shared.events
    }

    /// Subscribe to player events.
    pub fn subscribe(&self) -> Receiver<PlayerEvent> {
        self.shared.events.subscribe()
    }

    /// Snapshot of the current lifecycle mode.
    pub async fn mode(&self) -> PlayerMode {
        self.shared.state.lock().await.mode
    }

    /// Set a source to play and record the identity of its track.
    ///
    /// Blocks while a previous stop is draining. The format is resolved from
    /// the file extension only; on success the player transitions to
    /// `Ready` and the previous track identity is replaced.
    ///
    /// # Errors
    ///
    /// - [`PlayerError::NotStopped`] if a track is active or the device is
    ///   not stopped.
    /// - [`PlayerError::UnsupportedFormat`] if the extension is unknown.
    /// - [`PlayerError::LoadFailed`] if the decoder or the device
    ///   initialization failed; the underlying fault is attached as the
    ///   source.
    pub async fn load(&self, path: impl AsRef<Path>, track_id: impl Into<String>) -> Result<()> {
        let path = path.as_ref();
        let _permit = self.acquire_gate().await?;
        let mut state = self.shared.state.lock().await;

        if state.mode.is_active() || self.shared.device.state() != DeviceState::Stopped {
            return Err(PlayerError::NotStopped);
        }

        let codec = FormatResolver::resolve_path(path);
        if codec == AudioCodec::Unknown {
            let extension = path
                .extension()
                .and_then(|extension| extension.to_str())
                .unwrap_or_default();
            return Err(PlayerError::UnsupportedFormat(extension.to_string()));
        }

        let decoder = self
            .shared
            .decoders
            .open(path, codec)
            .await
            .map_err(|source| PlayerError::LoadFailed {
                path: path.to_path_buf(),
                source: Box::new(source),
            })?;

        self.shared
            .device
            .init(Arc::clone(&decoder))
            .await
            .map_err(|source| PlayerError::LoadFailed {
                path: path.to_path_buf(),
                source: Box::new(source),
            })?;

        state.decoder = Some(decoder);
        state.track_id = Some(track_id.into());
        state.paused_at = None;
        state.mode = PlayerMode::Ready;

        let file = path.to_string_lossy();
        info!(file = %strip_path(&file), codec = ?codec, "source ready for playback");
        Ok(())
    }

    /// Start or resume playback of the set source.
    ///
    /// Blocks while a previous stop is draining. Resuming from a pause keeps
    /// the reporting cadence: the first position report fires after the
    /// remainder of the interval that was left when the pause happened.
    ///
    /// # Errors
    ///
    /// - [`PlayerError::NoSourceLoaded`] unless the player is `Ready` or
    ///   `Paused`.
    /// - [`PlayerError::DeviceOperationFailed`] if the device start faulted.
    pub async fn play(&self) -> Result<()> {
        let _permit = self.acquire_gate().await?;
        let mut state = self.shared.state.lock().await;

        if !matches!(state.mode, PlayerMode::Ready | PlayerMode::Paused) {
            return Err(PlayerError::NoSourceLoaded);
        }

        state.stopped_explicitly = false;

        self.shared
            .device
            .start()
            .await
            .map_err(|source| PlayerError::DeviceOperationFailed {
                operation: "start",
                source: Box::new(source),
            })?;

        state.suppress_reports = false;

        let interval = self.shared.config.report_interval;
        let first_delay = match state.paused_at.take() {
            Some(paused_at) => reporter::resume_delay(interval, state.last_report, paused_at),
            None => {
                state.last_report = Instant::now();
                interval
            }
        };

        state.reporter = Some(reporter::spawn(Arc::clone(&self.shared), first_delay));
        state.mode = PlayerMode::Playing;

        debug!(
            track_id = state.track_id.as_deref().unwrap_or(""),
            first_report_in_ms = first_delay.as_millis() as u64,
            "playback started"
        );
        Ok(())
    }

    /// Pause playback of the set source.
    ///
    /// A no-op success when nothing is playing. Cancels the active report
    /// timer but keeps the schedule bookkeeping so a later `play` resumes
    /// the cadence.
    ///
    /// # Errors
    ///
    /// [`PlayerError::DeviceOperationFailed`] if the device pause faulted.
    pub async fn pause(&self) -> Result<()> {
        let _permit = self.acquire_gate().await?;
        let mut state = self.shared.state.lock().await;

        if state.mode != PlayerMode::Playing {
            return Ok(());
        }

        self.shared
            .device
            .pause()
            .await
            .map_err(|source| PlayerError::DeviceOperationFailed {
                operation: "pause",
                source: Box::new(source),
            })?;

        if let Some(task) = state.reporter.take() {
            task.abort();
        }
        state.paused_at = Some(Instant::now());
        state.mode = PlayerMode::Paused;

        debug!(
            track_id = state.track_id.as_deref().unwrap_or(""),
            "playback paused"
        );
        Ok(())
    }

    /// Request playback of the set source to stop.
    ///
    /// Returns once the request has been issued to the device, not once
    /// draining completes: the transition to `Empty` and the terminal
    /// [`PlayerEvent::StoppedPlaying`] happen inside the completion handler
    /// when the device's notification arrives. A no-op success when already
    /// stopped; safe to call concurrently, and exactly one terminal event is
    /// emitted per activation.
    ///
    /// If a stop is requested at the same moment the track naturally
    /// finishes, the terminal notification may be reported as stopped rather
    /// than finished; the device cannot distinguish the two.
    ///
    /// # Errors
    ///
    /// [`PlayerError::DeviceOperationFailed`] if the device stop faulted. The
    /// gate stays held until the device's notification arrives, per the
    /// documented device liveness assumption.
    pub async fn stop(&self) -> Result<()> {
        {
            let state = self.shared.state.lock().await;
            if !matches!(state.mode, PlayerMode::Playing | PlayerMode::Paused) {
                return Ok(());
            }
        }

        let permit = self.acquire_gate().await?;
        let mut state = self.shared.state.lock().await;

        // Re-check: another stop may have won the gate and already drained.
        if !matches!(state.mode, PlayerMode::Playing | PlayerMode::Paused) {
            return Ok(());
        }

        state.stopped_explicitly = true;
        state.gate_held = true;
        state.mode = PlayerMode::Draining;
        permit.forget();

        self.shared
            .device
            .stop()
            .await
            .map_err(|source| PlayerError::DeviceOperationFailed {
                operation: "stop",
                source: Box::new(source),
            })?;

        debug!(
            track_id = state.track_id.as_deref().unwrap_or(""),
            "stop requested; draining"
        );
        Ok(())
    }

    /// Current position in the set track.
    ///
    /// Returns an atomic snapshot of duration and offset; never the sentinel
    /// "no measurement" value while a source is loaded.
    ///
    /// # Errors
    ///
    /// [`PlayerError::NoSourceLoaded`] when no source is loaded or a stop is
    /// draining.
    pub async fn current_position(&self) -> Result<TrackPosition> {
        let state = self.shared.state.lock().await;
        match (state.mode, state.decoder.as_ref()) {
            (PlayerMode::Empty | PlayerMode::Draining, _) | (_, None) => {
                Err(PlayerError::NoSourceLoaded)
            }
            (_, Some(decoder)) => Ok(TrackPosition::new(decoder.duration(), decoder.position())),
        }
    }

    /// Release the output device.
    ///
    /// Device disposal delivers the same stopped notification as a stop, so
    /// the completion handler performs the remaining cleanup of decoder,
    /// timer and gate.
    ///
    /// # Errors
    ///
    /// [`PlayerError::DeviceOperationFailed`] if the device disposal faulted.
    pub async fn dispose(&self) -> Result<()> {
        let _state = self.shared.state.lock().await;
        self.shared
            .device
            .dispose()
            .await
            .map_err(|source| PlayerError::DeviceOperationFailed {
                operation: "dispose",
                source: Box::new(source),
            })?;
        Ok(())
    }

    async fn acquire_gate(&self) -> Result<SemaphorePermit<'_>> {
        self.shared
            .gate
            .acquire()
            .await
            .map_err(|_| PlayerError::Internal("completion gate closed".to_string()))
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        self.completion.abort();
        if let Ok(mut state) = self.shared.state.try_lock() {
            if let Some(task) = state.reporter.take() {
                task.abort();
            }
        }
    }
}

/// Consume the device's stopped notifications for the controller's lifetime.
async fn completion_loop(shared: Arc<Shared>, mut stopped: broadcast::Receiver<()>) {
    loop {
        match stopped.recv().await {
            Ok(()) => handle_playback_stopped(&shared).await,
            Err(broadcast::error::RecvError::Lagged(missed)) => {
                warn!(missed, "stopped notifications lagged");
                handle_playback_stopped(&shared).await;
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

/// Completion transition, identical regardless of whether the activation
/// ended naturally or through an explicit stop.
async fn handle_playback_stopped(shared: &Shared) {
    let (terminal, release_gate) = {
        let mut state = shared.state.lock().await;

        if let Some(task) = state.reporter.take() {
            task.abort();
        }
        // A tick may already be queued past its timer; it must become a
        // no-op rather than race on the dropped decoder.
        state.suppress_reports = true;

        state.decoder = None;
        state.paused_at = None;

        let explicit = mem::take(&mut state.stopped_explicitly);
        let track_id = state.track_id.take();
        state.mode = PlayerMode::Empty;
        let release_gate = mem::take(&mut state.gate_held);

        let terminal = track_id.map(|track_id| {
            if explicit {
                PlayerEvent::StoppedPlaying { track_id }
            } else {
                PlayerEvent::FinishedPlaying { track_id }
            }
        });

        (terminal, release_gate)
    };

    if release_gate {
        shared.gate.add_permits(1);
    }

    if let Some(event) = terminal {
        debug!(
            event = event.event_type(),
            track_id = event.track_id(),
            "playback stopped"
        );
        shared.events.emit(event).ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_mode_activity() {
        assert!(!PlayerMode::Empty.is_active());
        assert!(!PlayerMode::Ready.is_active());
        assert!(PlayerMode::Playing.is_active());
        assert!(PlayerMode::Paused.is_active());
        assert!(PlayerMode::Draining.is_active());
    }
}
