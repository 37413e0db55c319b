//! Streaming protocol selection.

use bridge_traits::{MediaDescriptor, ProtocolKind};

use crate::format::{extension, normalized_content_type, normalized_path};

const HLS_CONTENT_TYPES: &[&str] = &["application/x-mpegurl", "application/vnd.apple.mpegurl"];
const DASH_CONTENT_TYPE: &str = "application/dash+xml";
const SMOOTH_CONTENT_TYPE: &str = "application/vnd.ms-sstr+xml";

/// Pick the backend for `descriptor`.
///
/// First match wins: HLS, then DASH, then Smooth Streaming, then native
/// playback. Never fails.
pub fn select(descriptor: &MediaDescriptor) -> ProtocolKind {
    let content_type = normalized_content_type(descriptor);
    let content_type = content_type.as_deref();
    let ext = extension(&descriptor.content_id);
    let ext = ext.as_deref();

    if ext == Some("m3u8") || content_type.is_some_and(|ct| HLS_CONTENT_TYPES.contains(&ct)) {
        return ProtocolKind::Hls;
    }

    if ext == Some("mpd") || content_type == Some(DASH_CONTENT_TYPE) {
        return ProtocolKind::Dash;
    }

    if normalized_path(&descriptor.content_id).contains(".ism")
        || content_type == Some(SMOOTH_CONTENT_TYPE)
    {
        return ProtocolKind::SmoothStreaming;
    }

    ProtocolKind::Native
}
