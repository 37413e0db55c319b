//! # Core Runtime Module
//!
//! Foundational runtime infrastructure for the receiver core:
//! - Logging and tracing infrastructure
//! - Event bus system
//!
//! ## Overview
//!
//! This crate holds the ambient utilities the playback core and the service
//! façade share. It establishes the logging conventions and the broadcast
//! mechanism used to surface player events to the host.

pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
pub use events::{EventBus, EventStream};
