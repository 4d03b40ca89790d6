//! # Core Playback Traits
//!
//! Capability abstractions the playback controller is built against. The
//! controller drives these interfaces but never implements them: decoding and
//! rendering are supplied by the host platform.
//!
//! ## Architecture
//!
//! - **SourceDecoder**: a timing view over one open audio source. The output
//!   device consumes its samples internally; the controller only snapshots
//!   duration and current offset.
//! - **DecoderFactory**: opens a source for a resolved codec. One decoder is
//!   live per controller at a time.
//! - **OutputDevice**: raw playback control plus a single asynchronous
//!   "stopped" notification per `start()` activation, delivered on the
//!   device's own execution context via a broadcast channel.
//!
//! ## Threading Model
//!
//! All capabilities must be `Send + Sync`: controller operations may be
//! invoked from any task, and the stopped notification arrives from the
//! device's callback context.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

// ============================================================================
// Audio Format Types
// ============================================================================

/// Supported audio codecs.
///
/// Resolution from a file name is purely extension-based, see
/// [`FormatResolver`](crate::format::FormatResolver).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioCodec {
    /// MPEG-1 Audio Layer 3
    Mp3,
    /// Advanced Audio Coding
    Aac,
    /// Ogg Vorbis
    Vorbis,
    /// Waveform Audio File Format
    Wav,
    /// Extension not recognized
    Unknown,
}

impl AudioCodec {
    /// Returns `true` if this is a lossless codec.
    pub fn is_lossless(&self) -> bool {
        matches!(self, AudioCodec::Wav)
    }

    /// Returns `true` if this codec is lossy.
    pub fn is_lossy(&self) -> bool {
        matches!(self, AudioCodec::Mp3 | AudioCodec::Aac | AudioCodec::Vorbis)
    }
}

/// A track's total duration paired with an offset into it.
///
/// Two positions are equal iff both fields are equal. The `Default` value is
/// the sentinel for "no measurement available"; it is never returned by
/// position queries while a source is loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackPosition {
    /// Duration of the track.
    pub duration: Duration,
    /// Position in the track.
    pub current_time: Duration,
}

impl TrackPosition {
    /// Create a position snapshot.
    pub fn new(duration: Duration, current_time: Duration) -> Self {
        Self {
            duration,
            current_time,
        }
    }
}

/// Playback state reported by an output device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    /// No activation in progress.
    Stopped,
    /// Actively producing audio.
    Playing,
    /// Activation suspended.
    Paused,
}

// ============================================================================
// Capability Traits
// ============================================================================

/// Timing view over one open audio source.
///
/// Decoding itself is driven by the output device; the controller only reads
/// timing. Implementations must tolerate concurrent reads.
pub trait SourceDecoder: Send + Sync {
    /// Codec the source was opened with.
    fn codec(&self) -> AudioCodec;

    /// Total duration of the source.
    fn duration(&self) -> Duration;

    /// Current offset into the source.
    fn position(&self) -> Duration;
}

/// Opens decoders for resolved codecs.
///
/// Construction may fail for unreadable or corrupt sources; the controller
/// surfaces such failures as [`LoadFailed`](crate::PlayerError::LoadFailed).
#[async_trait]
pub trait DecoderFactory: Send + Sync {
    /// Open `path` with a decoder for `codec`.
    async fn open(&self, path: &Path, codec: AudioCodec) -> Result<Arc<dyn SourceDecoder>>;
}

/// Platform audio output the controller drives.
///
/// ## Stopped notification contract
///
/// - `subscribe_stopped()` hands out a receiver for the device's stopped
///   notification. The device sends exactly one `()` per `start()`
///   activation, after the activation has fully wound down, whether because
///   the stream reached its natural end or because `stop()`/`dispose()` was
///   requested. The device itself cannot distinguish the two.
/// - The notification may be sent from any execution context (typically the
///   device's callback thread).
/// - Once the notification for an activation has been delivered, the device
///   must no longer touch the decoder it was initialized with.
/// - `stop()` and `pause()` on an inactive device are no-ops.
/// - `dispose()` of an active device winds the activation down and delivers
///   the same notification.
#[async_trait]
pub trait OutputDevice: Send + Sync {
    /// Prepare the device to render the given decoder's stream.
    async fn init(&self, decoder: Arc<dyn SourceDecoder>) -> Result<()>;

    /// Start or resume rendering.
    async fn start(&self) -> Result<()>;

    /// Suspend rendering without releasing the activation.
    async fn pause(&self) -> Result<()>;

    /// Request the current activation to wind down.
    async fn stop(&self) -> Result<()>;

    /// Release the device and any active session.
    async fn dispose(&self) -> Result<()>;

    /// Current device-level playback state.
    fn state(&self) -> DeviceState;

    /// Subscribe to the stopped notification.
    fn subscribe_stopped(&self) -> broadcast::Receiver<()>;
}
