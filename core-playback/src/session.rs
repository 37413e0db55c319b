//! The live playback session: one media descriptor bound to its backend.

use bridge_traits::{EngineState, MediaDescriptor, ProtocolEngine, ProtocolKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::format::{classify, MediaKind};

/// Identifies a session so late engine faults can be matched to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Check that `descriptor` names playable content.
pub fn validate(descriptor: &MediaDescriptor) -> Result<(), ValidationError> {
    if descriptor.content_id.trim().is_empty() {
        return Err(ValidationError::EmptyContentId);
    }

    match classify(descriptor) {
        Some(MediaKind::Video) => Ok(()),
        Some(kind) => Err(ValidationError::UnsupportedKind {
            content_id: descriptor.content_id.clone(),
            kind,
        }),
        None => Err(ValidationError::UnrecognizedMedia {
            content_id: descriptor.content_id.clone(),
        }),
    }
}

pub struct PlaybackSession {
    id: SessionId,
    descriptor: MediaDescriptor,
    protocol: ProtocolKind,
    engine: Option<Box<dyn ProtocolEngine>>,
}

impl PlaybackSession {
    pub fn new(
        id: SessionId,
        descriptor: MediaDescriptor,
        protocol: ProtocolKind,
        engine: Option<Box<dyn ProtocolEngine>>,
    ) -> Self {
        Self {
            id,
            descriptor,
            protocol,
            engine,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn descriptor(&self) -> &MediaDescriptor {
        &self.descriptor
    }

    pub fn protocol(&self) -> ProtocolKind {
        self.protocol
    }

    pub fn engine(&self) -> Option<&dyn ProtocolEngine> {
        self.engine.as_deref()
    }

    /// Engine health; native sessions never report underflow.
    pub fn engine_state(&self) -> EngineState {
        self.engine
            .as_ref()
            .map(|engine| engine.state())
            .unwrap_or_default()
    }
}

impl fmt::Debug for PlaybackSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackSession")
            .field("id", &self.id)
            .field("content_id", &self.descriptor.content_id)
            .field("protocol", &self.protocol)
            .field("has_engine", &self.engine.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_empty_content_id() {
        assert_eq!(
            validate(&MediaDescriptor::new("")),
            Err(ValidationError::EmptyContentId)
        );
        assert_eq!(
            validate(&MediaDescriptor::new("   ")),
            Err(ValidationError::EmptyContentId)
        );
    }

    #[test]
    fn test_validate_rejects_unrecognized_and_non_video() {
        assert!(matches!(
            validate(&MediaDescriptor::new("https://cdn/blob")),
            Err(ValidationError::UnrecognizedMedia { .. })
        ));
        assert_eq!(
            validate(&MediaDescriptor::new("song.mp3")),
            Err(ValidationError::UnsupportedKind {
                content_id: "song.mp3".into(),
                kind: MediaKind::Audio,
            })
        );
    }

    #[test]
    fn test_validate_accepts_video() {
        assert!(validate(&MediaDescriptor::new("a.m3u8")).is_ok());
        assert!(validate(&MediaDescriptor::new("x").with_content_type("video/webm")).is_ok());
    }

    #[test]
    fn test_native_session_has_no_underflow() {
        let session = PlaybackSession::new(
            SessionId::new(),
            MediaDescriptor::new("a.mp4"),
            ProtocolKind::Native,
            None,
        );
        assert!(!session.engine_state().underflow);
        assert!(session.engine().is_none());
    }

    #[test]
    fn test_session_ids_are_unique() {
        assert_ne!(SessionId::new(), SessionId::new());
    }
}
