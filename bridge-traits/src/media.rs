//! Media sink bridge and the media value types shared with hosts.
//!
//! The media sink is the host's playback surface (a `<video>` element, a
//! native decoder pipeline). The core never renders media itself; it drives
//! the sink through [`MediaSink`] and reacts to the [`MediaSignal`]s the host
//! forwards from it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::Result;

/// Whether the content has a fixed timeline or is a live stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamType {
    /// Video on demand with a known timeline.
    #[default]
    Buffered,
    /// Live stream; total duration is usually unknown.
    Live,
}

/// Display metadata attached to a load request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaMetadata {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub artwork_url: Option<String>,
}

/// Immutable description of the content a sender asked to play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaDescriptor {
    /// Media URL.
    pub content_id: String,
    /// MIME type, when the sender supplied one.
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub stream_type: StreamType,
    #[serde(default)]
    pub metadata: MediaMetadata,
    /// `None` means the sender did not say; the core treats that as `true`.
    #[serde(default)]
    pub autoplay: Option<bool>,
}

impl MediaDescriptor {
    pub fn new(content_id: impl Into<String>) -> Self {
        Self {
            content_id: content_id.into(),
            content_type: None,
            stream_type: StreamType::Buffered,
            metadata: MediaMetadata::default(),
            autoplay: None,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_stream_type(mut self, stream_type: StreamType) -> Self {
        self.stream_type = stream_type;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.metadata.title = Some(title.into());
        self
    }

    pub fn with_autoplay(mut self, autoplay: bool) -> Self {
        self.autoplay = Some(autoplay);
        self
    }

    /// Title to show, ignoring blank strings.
    pub fn title(&self) -> Option<&str> {
        self.metadata
            .title
            .as_deref()
            .filter(|title| !title.trim().is_empty())
    }
}

/// A contiguous span of buffered media.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: Duration,
    pub end: Duration,
}

impl TimeRange {
    pub fn new(start: Duration, end: Duration) -> Self {
        Self { start, end }
    }

    /// Convenience constructor from seconds.
    ///
    /// Negative and NaN values clamp to zero; values too large for a
    /// `Duration` (including an infinite live edge) saturate to `Duration::MAX`.
    pub fn from_secs_f64(start: f64, end: f64) -> Self {
        Self {
            start: secs_to_duration(start),
            end: secs_to_duration(end),
        }
    }

    /// Returns `true` if `position` falls inside `[start, end]`.
    pub fn contains(&self, position: Duration) -> bool {
        self.start <= position && position <= self.end
    }
}

fn secs_to_duration(secs: f64) -> Duration {
    if secs.is_nan() || secs <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}

/// Signals a media sink emits while it plays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "signal", rename_all = "snake_case")]
pub enum MediaSignal {
    /// Runtime failure inside the sink.
    Error { message: String },
    /// Playback actually started or resumed.
    Playing,
    Paused,
    Ended,
    /// Play position advanced.
    Progress,
    SeekingStarted,
    SeekingEnded,
    /// Playback halted waiting for data.
    Waiting,
    /// Data delivery stalled.
    Stalled,
    /// Duration and dimensions became known.
    MetadataLoaded,
}

impl MediaSignal {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            MediaSignal::Error { .. } => "error",
            MediaSignal::Playing => "playing",
            MediaSignal::Paused => "paused",
            MediaSignal::Ended => "ended",
            MediaSignal::Progress => "progress",
            MediaSignal::SeekingStarted => "seeking",
            MediaSignal::SeekingEnded => "seeked",
            MediaSignal::Waiting => "waiting",
            MediaSignal::Stalled => "stalled",
            MediaSignal::MetadataLoaded => "loadedmetadata",
        }
    }
}

/// Host playback surface.
///
/// Implementations are shared between the core and protocol engines, so all
/// methods take `&self`.
#[async_trait]
pub trait MediaSink: Send + Sync {
    /// Point the sink directly at a media URL (native playback).
    async fn load_source(&self, url: &str, autoplay: bool) -> Result<()>;

    /// Detach any source and return the sink to its empty state.
    async fn reset(&self) -> Result<()>;

    async fn play(&self) -> Result<()>;

    async fn pause(&self) -> Result<()>;

    async fn seek(&self, position: Duration) -> Result<()>;

    /// Current play position.
    fn position(&self) -> Duration;

    /// Total duration, `None` while unknown or for unbounded live streams.
    fn duration(&self) -> Option<Duration>;

    /// Buffered ranges as currently reported by the sink.
    fn buffered(&self) -> Vec<TimeRange>;

    /// `true` when the sink holds enough data ahead of the play position to
    /// keep playing.
    fn has_future_data(&self) -> bool;
}
