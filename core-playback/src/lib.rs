//! # Playback Core
//!
//! The receiver's playback controller: owns what is currently happening to
//! the media and reconciles it against media-sink signals, protocol-engine
//! faults and remote LOAD/STOP commands.
//!
//! ## Overview
//!
//! This crate handles:
//! - Media classification and duration formatting (`format`)
//! - Streaming protocol selection (`protocol`)
//! - Per-state idle timeouts (`idle`) on cancellable timer slots (`timer`)
//! - Auto-play buffering before first playback (`autoplay`)
//! - The playback state machine (`controller`) and its error/recovery path
//!   (`recovery`)
//!
//! Decoding, rendering and the streaming protocols themselves are provided by
//! the host through `bridge-traits`.

pub mod autoplay;
pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod format;
pub mod idle;
pub mod protocol;
pub mod recovery;
pub mod session;
pub mod state;
pub mod status;
pub mod timer;

pub use autoplay::{buffered_lead, BufferProbe, ProbeStep};
pub use config::{AutoplayConfig, IdleTimeouts, PlayerConfig};
pub use controller::{Collaborators, Input, PlayerController, RemoteCommand};
pub use error::{PlaybackError, Result, ValidationError};
pub use events::PlayerEvent;
pub use format::{classify, extension, format_duration, MediaKind};
pub use recovery::Failure;
pub use session::{PlaybackSession, SessionId};
pub use state::PlayerState;
pub use timer::{TimerFired, TimerKind, TimerSlot};
