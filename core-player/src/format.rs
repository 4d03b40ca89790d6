//! # Format Resolution
//!
//! Maps file extensions to supported codecs. Purely name-based; the content
//! of the file is never inspected.

use crate::traits::AudioCodec;
use std::path::Path;

/// Extension-based format resolver.
pub struct FormatResolver;

impl FormatResolver {
    /// Resolve the codec for a file path from its extension.
    ///
    /// Paths without an extension resolve to [`AudioCodec::Unknown`].
    pub fn resolve_path(path: &Path) -> AudioCodec {
        path.extension()
            .and_then(|extension| extension.to_str())
            .map(Self::resolve_extension)
            .unwrap_or(AudioCodec::Unknown)
    }

    /// Resolve the codec for a bare extension, case-insensitively.
    pub fn resolve_extension(extension: &str) -> AudioCodec {
        match extension.to_ascii_lowercase().as_str() {
            "mp3" => AudioCodec::Mp3,
            "aac" => AudioCodec::Aac,
            "ogg" => AudioCodec::Vorbis,
            "wav" => AudioCodec::Wav,
            _ => AudioCodec::Unknown,
        }
    }

    /// The canonical file extension for a codec.
    pub fn canonical_extension(codec: &AudioCodec) -> &'static str {
        match codec {
            AudioCodec::Mp3 => "mp3",
            AudioCodec::Aac => "aac",
            AudioCodec::Vorbis => "ogg",
            AudioCodec::Wav => "wav",
            AudioCodec::Unknown => "bin",
        }
    }
}
