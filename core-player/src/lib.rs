//! # Audio Player Core
//!
//! Single-track playback controller for host-provided decode and output
//! capabilities.
//!
//! ## Overview
//!
//! This crate handles:
//! - Play/pause/stop lifecycle over an [`OutputDevice`] it does not implement
//! - Serialization of concurrent commands against the device's asynchronous
//!   stop/finish notification
//! - Periodic, resume-aware position reporting
//! - Event fan-out to subscribers via a broadcast [`EventBus`]
//!
//! Decoding, rendering and file I/O live behind the capability traits in
//! [`traits`]; hosts supply the implementations.
//!
//! ## Usage
//!
//! ```ignore
//! use core_player::{PlaybackController, PlayerEvent};
//! use std::sync::Arc;
//!
//! # async fn example(device: Arc<dyn core_player::OutputDevice>,
//! #                  decoders: Arc<dyn core_player::DecoderFactory>) {
//! let player = PlaybackController::new(device, decoders);
//! let mut events = player.subscribe();
//!
//! player.load("/music/track.mp3", "track-1").await.unwrap();
//! player.play().await.unwrap();
//!
//! while let Ok(event) = events.recv().await {
//!     match event {
//!         PlayerEvent::PositionChanged { position, .. } => {
//!             println!("at {:?}", position.current_time);
//!         }
//!         terminal => {
//!             println!("{}", terminal.event_type());
//!             break;
//!         }
//!     }
//! }
//! # }
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod format;
mod reporter;
pub mod traits;

pub use config::PlayerConfig;
pub use controller::{PlaybackController, PlayerMode};
pub use error::{PlayerError, Result};
pub use events::{EventBus, EventStream, PlayerEvent, DEFAULT_EVENT_BUFFER_SIZE};
pub use format::FormatResolver;
pub use traits::{
    AudioCodec, DecoderFactory, DeviceState, OutputDevice, SourceDecoder, TrackPosition,
};
