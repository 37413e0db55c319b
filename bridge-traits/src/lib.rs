//! # Host Bridge Traits
//!
//! Contracts between the receiver core and the host that embeds it.
//!
//! ## Overview
//!
//! The playback core is a pure controller: it does not decode, render or
//! speak the sender wire protocol. Every one of those capabilities is
//! supplied by the host through the traits in this crate.
//!
//! ## Traits
//!
//! ### Playback
//! - [`MediaSink`](media::MediaSink) - The playback surface (play/pause/seek, position, buffered ranges)
//! - [`ProtocolEngineFactory`](engine::ProtocolEngineFactory) - Creates HLS/DASH/Smooth engines
//! - [`ProtocolEngine`](engine::ProtocolEngine) - A live engine bound to one URL
//!
//! ### Sender protocol
//! - [`RemoteChannel`](remote::RemoteChannel) - Error forwarding, stop acknowledgement, status broadcast
//!
//! ### Presentation
//! - [`Presenter`](presenter::Presenter) - Metadata render, asset preload, fade-out/fade-in
//!
//! ### Utilities
//! - [`LoggerSink`](logging::LoggerSink) - Forward structured logs to host logging
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Host
//! implementations should convert platform errors into it with an actionable
//! message.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync`; the media sink in particular is
//! shared between the core and the protocol engine.

pub mod engine;
pub mod error;
pub mod logging;
pub mod media;
pub mod presenter;
pub mod remote;

pub use error::BridgeError;

// Re-export commonly used types
pub use engine::{
    BackendFault, EngineState, FaultReporter, ProtocolEngine, ProtocolEngineFactory, ProtocolKind,
};
pub use logging::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
pub use media::{MediaDescriptor, MediaMetadata, MediaSignal, MediaSink, StreamType, TimeRange};
pub use presenter::{NoopPresenter, Presenter};
pub use remote::{
    ErrorCategory, ErrorPayload, LoadRequest, RemoteChannel, ReportedState, StatusScope,
    StopRequest,
};
