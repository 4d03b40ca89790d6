//! Logging system demonstration
//!
//! This example shows how to use the logging infrastructure in different modes.
//!
//! Run with:
//! ```bash
//! # Pretty format (default in debug)
//! cargo run --example logging_demo
//!
//! # JSON format
//! cargo run --example logging_demo -- json
//!
//! # Compact format
//! cargo run --example logging_demo -- compact
//!
//! # With custom filter
//! cargo run --example logging_demo -- pretty "core_runtime=trace"
//! ```

use core_runtime::logging::{init_logging, strip_path, LogFormat, LoggingConfig};
use std::env;
use tracing::{debug, error, info, instrument, span, trace, warn, Level};

#[tokio::main]
async fn main() {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let format = if args.len() > 1 {
        match args[1].as_str() {
            "json" => LogFormat::Json,
            "compact" => LogFormat::Compact,
            "pretty" => LogFormat::Pretty,
            _ => LogFormat::Pretty,
        }
    } else {
        LogFormat::default()
    };

    let filter = args.get(2).cloned();

    // Initialize logging
    let mut config = LoggingConfig::default()
        .with_format(format)
        .with_level(Level::TRACE)
        .with_target(true);

    if let Some(f) = filter {
        config = config.with_filter(f);
    }

    init_logging(config).expect("Failed to initialize logging");

    info!("=== Logging System Demo ===");
    info!(format = ?format, "Logging initialized");

    // Demonstrate different log levels
    demo_log_levels();

    // Demonstrate structured logging
    demo_structured_logging();

    // Demonstrate spans for tracing
    demo_spans().await;

    // Demonstrate path stripping
    demo_path_stripping();

    // Demonstrate instrumentation
    demo_instrumentation().await;

    info!("=== Demo Complete ===");
}

fn demo_log_levels() {
    let span = span!(Level::INFO, "log_levels");
    let _enter = span.enter();

    trace!("This is a TRACE level log");
    debug!("This is a DEBUG level log");
    info!("This is an INFO level log");
    warn!("This is a WARN level log");
    error!("This is an ERROR level log");
}

fn demo_structured_logging() {
    let span = span!(Level::INFO, "structured_logging");
    let _enter = span.enter();

    info!("Simple message without fields");

    info!(
        track_id = "12345",
        duration_ms = 245000,
        current_time_ms = 31000,
        "Track position"
    );

    info!(
        subscriber_count = 3,
        event_capacity = 100,
        "Event bus metrics"
    );
}

async fn demo_spans() {
    let span = span!(Level::INFO, "playback_session", track_id = "demo-track");
    let _enter = span.enter();

    info!("Starting playback session");

    {
        let inner_span = span!(Level::DEBUG, "load_source");
        let _inner = inner_span.enter();

        debug!(codec = "mp3", "Source ready for playback");
        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;
    }

    {
        let inner_span = span!(Level::DEBUG, "report_position");
        let _inner = inner_span.enter();

        debug!(current_time_ms = 1000, duration_ms = 245000, "Position changed");
        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;
    }

    info!(positions_reported = 245, "Playback session completed");
}

fn demo_path_stripping() {
    let span = span!(Level::INFO, "path_stripping");
    let _enter = span.enter();

    // File operations log the basename only
    let path = "/home/user/private/music/song.mp3";

    info!(file = %strip_path(path), "Loading source");

    // Best practice: never log the full path
    info!("Source loaded");
    // Instead of: info!(file = path, "Source loaded")
}

#[instrument]
async fn demo_instrumentation() {
    info!("Instrumented function automatically creates spans");

    let tracks = vec!["intro.wav", "anthem.mp3", "outro.ogg"];
    process_tracks(&tracks).await;
}

#[instrument(fields(count = tracks.len()))]
async fn process_tracks(tracks: &[&str]) {
    debug!("Processing tracks");

    for (idx, track) in tracks.iter().enumerate() {
        process_track(idx, track).await;
    }

    info!("All tracks processed");
}

#[instrument(fields(track_index = idx))]
async fn process_track(idx: usize, track: &str) {
    trace!(file = %strip_path(track), "Processing individual track");
    tokio::time::sleep(tokio::time::Duration::from_millis(5)).await;
}
