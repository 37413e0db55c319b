//! Cast receiver playback core.
//!
//! Umbrella crate re-exporting the workspace crates so host applications can
//! depend on `cast-receiver` alone: the bridge traits they implement, the
//! playback state machine, and the service that runs it.

pub use bridge_traits as bridge;
pub use core_playback as playback;
pub use core_runtime::logging;
pub use core_service::{
    CoreError, ReceiverConfig, ReceiverConfigBuilder, ReceiverHandle, ReceiverService,
};
