//! Media classification and display formatting helpers.
//!
//! Everything here works from URL and MIME metadata only; nothing is fetched
//! or sniffed.

use bridge_traits::MediaDescriptor;
use serde::{Deserialize, Serialize};

/// Broad category of a piece of content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Audio,
    Image,
}

const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "m4v", "mov", "webm", "mkv", "ogv", "ts", "m3u8", "mpd", "ism", "isml",
];
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "m4a", "aac", "flac", "wav", "ogg", "oga", "opus"];
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp"];

/// Streaming manifests are always treated as video.
const STREAMING_CONTENT_TYPES: &[&str] = &[
    "application/x-mpegurl",
    "application/vnd.apple.mpegurl",
    "application/dash+xml",
    "application/vnd.ms-sstr+xml",
];

/// Lowercased MIME type without parameters (`"Video/MP4; codecs=..."` -> `"video/mp4"`).
pub(crate) fn normalized_content_type(descriptor: &MediaDescriptor) -> Option<String> {
    descriptor
        .content_type
        .as_deref()
        .map(|ct| ct.split(';').next().unwrap_or("").trim().to_ascii_lowercase())
        .filter(|ct| !ct.is_empty())
}

/// Lowercased URL path with scheme, authority, query string and fragment
/// removed. Relative URLs are returned as-is apart from the query.
pub(crate) fn normalized_path(url: &str) -> String {
    let end = url.find(|c| c == '?' || c == '#').unwrap_or(url.len());
    let url = &url[..end];

    let authority = match url.find("://") {
        Some(scheme_end) => Some(&url[scheme_end + 3..]),
        None => url.strip_prefix("//"),
    };
    let path = match authority {
        Some(rest) => rest.find('/').map_or("", |slash| &rest[slash..]),
        None => url,
    };

    path.to_ascii_lowercase()
}

/// File extension of the last path segment, lowercased.
///
/// Returns `None` when the last segment has no extension.
pub fn extension(url: &str) -> Option<String> {
    let path = normalized_path(url);
    let segment = path.rsplit('/').next().unwrap_or("");
    match segment.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => Some(ext.to_string()),
        _ => None,
    }
}

/// Classify content by content type first, then by URL extension.
pub fn classify(descriptor: &MediaDescriptor) -> Option<MediaKind> {
    if let Some(content_type) = normalized_content_type(descriptor) {
        if let Some(kind) = kind_from_content_type(&content_type) {
            return Some(kind);
        }
    }

    // Smooth Streaming URLs end in `/Manifest`, so the extension sits mid-path.
    if normalized_path(&descriptor.content_id).contains(".ism") {
        return Some(MediaKind::Video);
    }

    let ext = extension(&descriptor.content_id)?;
    if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaKind::Video)
    } else if AUDIO_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaKind::Audio)
    } else if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaKind::Image)
    } else {
        None
    }
}

fn kind_from_content_type(content_type: &str) -> Option<MediaKind> {
    if content_type.starts_with("video/") || STREAMING_CONTENT_TYPES.contains(&content_type) {
        Some(MediaKind::Video)
    } else if content_type.starts_with("audio/") {
        Some(MediaKind::Audio)
    } else if content_type.starts_with("image/") {
        Some(MediaKind::Image)
    } else {
        None
    }
}

/// Format seconds as a clock string: `MM:SS`, or `HH:MM:SS` from one hour up.
///
/// Negative and non-finite values render as `00:00`.
pub fn format_duration(secs: f64) -> String {
    if !secs.is_finite() || secs <= 0.0 {
        return "00:00".to_string();
    }

    let total = secs.floor() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}
