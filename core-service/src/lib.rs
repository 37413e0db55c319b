//! Core service façade.
//!
//! This crate wires host-provided bridge implementations (media sink,
//! protocol engines, remote channel, presenter) into the playback core and
//! runs it on a single tokio task.
//!
//! ```ignore
//! use core_service::{ReceiverConfig, ReceiverService};
//!
//! let config = ReceiverConfig::builder()
//!     .media_sink(sink)
//!     .engine_factory(engines)
//!     .remote_channel(channel)
//!     .build()?;
//!
//! let receiver = ReceiverService::start(config);
//! receiver.ready()?;
//! receiver.load(request)?;
//! ```

pub mod config;
pub mod error;
pub mod service;

pub use config::{ReceiverConfig, ReceiverConfigBuilder};
pub use error::{CoreError, Result};
pub use service::{ReceiverHandle, ReceiverService};
