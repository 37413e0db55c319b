//! # Receiver Configuration
//!
//! Builder that gathers the host bridges and player settings the receiver
//! service needs. `build()` fails fast when a required bridge is missing so
//! misconfigured hosts are caught at startup rather than on the first LOAD.
//!
//! ## Required Bridges
//!
//! - `MediaSink` - the playback surface
//! - `ProtocolEngineFactory` - HLS/DASH/Smooth Streaming engines
//! - `RemoteChannel` - sender-facing notifications
//!
//! ## Optional
//!
//! - `Presenter` - metadata rendering and fades (default: no-op)
//! - `PlayerConfig` - timings (default: `PlayerConfig::default()`)
//! - event bus capacity (default: 100)
//!
//! ## Usage
//!
//! ```ignore
//! use core_service::ReceiverConfig;
//! use std::sync::Arc;
//!
//! let config = ReceiverConfig::builder()
//!     .media_sink(Arc::new(VideoElementSink::new()))
//!     .engine_factory(Arc::new(ShakaEngines::new()))
//!     .remote_channel(Arc::new(CastChannel::new()))
//!     .build()?;
//! ```

use std::fmt;
use std::sync::Arc;

use bridge_traits::{MediaSink, NoopPresenter, Presenter, ProtocolEngineFactory, RemoteChannel};
use core_playback::{PlaybackError, PlayerConfig};
use core_runtime::events::DEFAULT_EVENT_BUFFER_SIZE;

use crate::error::{CoreError, Result};

/// Everything the receiver service needs to run.
#[derive(Clone)]
pub struct ReceiverConfig {
    pub media_sink: Arc<dyn MediaSink>,
    pub engine_factory: Arc<dyn ProtocolEngineFactory>,
    pub remote_channel: Arc<dyn RemoteChannel>,
    pub presenter: Arc<dyn Presenter>,
    pub player: PlayerConfig,
    /// Per-subscriber buffer of the player event bus.
    pub event_capacity: usize,
}

impl fmt::Debug for ReceiverConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReceiverConfig")
            .field("media_sink", &"MediaSink { ... }")
            .field("engine_factory", &"ProtocolEngineFactory { ... }")
            .field("remote_channel", &"RemoteChannel { ... }")
            .field("presenter", &"Presenter { ... }")
            .field("player", &self.player)
            .field("event_capacity", &self.event_capacity)
            .finish()
    }
}

impl ReceiverConfig {
    /// Creates a new builder for constructing a `ReceiverConfig`.
    pub fn builder() -> ReceiverConfigBuilder {
        ReceiverConfigBuilder::default()
    }

    /// Validates timings and capacities.
    pub fn validate(&self) -> Result<()> {
        self.player.validate()?;

        if self.event_capacity == 0 {
            return Err(PlaybackError::InvalidConfig(
                "event_capacity must be greater than 0".to_string(),
            )
            .into());
        }

        Ok(())
    }
}

fn capability_missing(capability: &str, message: &str) -> CoreError {
    CoreError::CapabilityMissing {
        capability: capability.to_string(),
        message: message.to_string(),
    }
}

/// Builder for [`ReceiverConfig`].
#[derive(Default)]
pub struct ReceiverConfigBuilder {
    media_sink: Option<Arc<dyn MediaSink>>,
    engine_factory: Option<Arc<dyn ProtocolEngineFactory>>,
    remote_channel: Option<Arc<dyn RemoteChannel>>,
    presenter: Option<Arc<dyn Presenter>>,
    player: Option<PlayerConfig>,
    event_capacity: Option<usize>,
}

impl ReceiverConfigBuilder {
    pub fn media_sink(mut self, sink: Arc<dyn MediaSink>) -> Self {
        self.media_sink = Some(sink);
        self
    }

    pub fn engine_factory(mut self, factory: Arc<dyn ProtocolEngineFactory>) -> Self {
        self.engine_factory = Some(factory);
        self
    }

    pub fn remote_channel(mut self, channel: Arc<dyn RemoteChannel>) -> Self {
        self.remote_channel = Some(channel);
        self
    }

    /// Sets the presenter. Headless hosts can leave this unset.
    pub fn presenter(mut self, presenter: Arc<dyn Presenter>) -> Self {
        self.presenter = Some(presenter);
        self
    }

    pub fn player(mut self, player: PlayerConfig) -> Self {
        self.player = Some(player);
        self
    }

    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = Some(capacity);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// - [`CoreError::CapabilityMissing`] if a required bridge was not set
    /// - [`CoreError::Playback`] with `InvalidConfig` for out-of-range timings
    pub fn build(self) -> Result<ReceiverConfig> {
        let media_sink = self.media_sink.ok_or_else(|| {
            capability_missing(
                "MediaSink",
                "A MediaSink implementation is required to play media. \
                 Inject the host's video element or native pipeline wrapper.",
            )
        })?;

        let engine_factory = self.engine_factory.ok_or_else(|| {
            capability_missing(
                "ProtocolEngineFactory",
                "A ProtocolEngineFactory is required for HLS, DASH and Smooth Streaming. \
                 Hosts that only play progressive files can inject a factory that returns no engine.",
            )
        })?;

        let remote_channel = self.remote_channel.ok_or_else(|| {
            capability_missing(
                "RemoteChannel",
                "A RemoteChannel is required to report errors and status to senders.",
            )
        })?;

        let config = ReceiverConfig {
            media_sink,
            engine_factory,
            remote_channel,
            presenter: self
                .presenter
                .unwrap_or_else(|| Arc::new(NoopPresenter)),
            player: self.player.unwrap_or_default(),
            event_capacity: self.event_capacity.unwrap_or(DEFAULT_EVENT_BUFFER_SIZE),
        };

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::error::Result as BridgeResult;
    use bridge_traits::{
        ErrorPayload, FaultReporter, LoadRequest, ProtocolEngine, ProtocolKind, StatusScope,
        StopRequest, TimeRange,
    };
    use mockall::mock;
    use std::time::Duration;

    mock! {
        Sink {}

        #[async_trait]
        impl MediaSink for Sink {
            async fn load_source(&self, url: &str, autoplay: bool) -> BridgeResult<()>;
            async fn reset(&self) -> BridgeResult<()>;
            async fn play(&self) -> BridgeResult<()>;
            async fn pause(&self) -> BridgeResult<()>;
            async fn seek(&self, position: Duration) -> BridgeResult<()>;
            fn position(&self) -> Duration;
            fn duration(&self) -> Option<Duration>;
            fn buffered(&self) -> Vec<TimeRange>;
            fn has_future_data(&self) -> bool;
        }
    }

    mock! {
        Engines {}

        impl ProtocolEngineFactory for Engines {
            fn create(
                &self,
                kind: ProtocolKind,
                url: &str,
                sink: Arc<dyn MediaSink>,
                faults: FaultReporter,
            ) -> BridgeResult<Option<Box<dyn ProtocolEngine>>>;
        }
    }

    mock! {
        Remote {}

        #[async_trait]
        impl RemoteChannel for Remote {
            async fn load_metadata_error(&self, request: &LoadRequest, error: &ErrorPayload) -> BridgeResult<()>;
            async fn report_error(&self, error: &ErrorPayload) -> BridgeResult<()>;
            async fn acknowledge_stop(&self, request: &StopRequest) -> BridgeResult<()>;
            async fn broadcast_status(&self, scope: StatusScope) -> BridgeResult<()>;
            async fn set_application_state(&self, text: &str) -> BridgeResult<()>;
            async fn stop_application(&self) -> BridgeResult<()>;
        }
    }

    fn complete_builder() -> ReceiverConfigBuilder {
        ReceiverConfig::builder()
            .media_sink(Arc::new(MockSink::new()))
            .engine_factory(Arc::new(MockEngines::new()))
            .remote_channel(Arc::new(MockRemote::new()))
    }

    fn missing_capability(result: Result<ReceiverConfig>) -> String {
        match result {
            Err(CoreError::CapabilityMissing { capability, .. }) => capability,
            other => panic!("expected CapabilityMissing, got {:?}", other),
        }
    }

    #[test]
    fn test_build_with_defaults() {
        let config = complete_builder().build().unwrap();
        assert_eq!(config.player, PlayerConfig::default());
        assert_eq!(config.event_capacity, 100);
    }

    #[test]
    fn test_missing_media_sink() {
        let result = ReceiverConfig::builder()
            .engine_factory(Arc::new(MockEngines::new()))
            .remote_channel(Arc::new(MockRemote::new()))
            .build();
        assert_eq!(missing_capability(result), "MediaSink");
    }

    #[test]
    fn test_missing_engine_factory() {
        let result = ReceiverConfig::builder()
            .media_sink(Arc::new(MockSink::new()))
            .remote_channel(Arc::new(MockRemote::new()))
            .build();
        assert_eq!(missing_capability(result), "ProtocolEngineFactory");
    }

    #[test]
    fn test_missing_remote_channel() {
        let result = ReceiverConfig::builder()
            .media_sink(Arc::new(MockSink::new()))
            .engine_factory(Arc::new(MockEngines::new()))
            .build();
        assert_eq!(missing_capability(result), "RemoteChannel");
    }

    #[test]
    fn test_invalid_player_config() {
        let mut player = PlayerConfig::default();
        player.autoplay.poll_interval = Duration::ZERO;

        let result = complete_builder().player(player).build();
        assert!(matches!(
            result,
            Err(CoreError::Playback(PlaybackError::InvalidConfig(_)))
        ));
    }

    #[test]
    fn test_zero_event_capacity_rejected() {
        let result = complete_builder().event_capacity(0).build();
        assert!(matches!(
            result,
            Err(CoreError::Playback(PlaybackError::InvalidConfig(_)))
        ));
    }

    #[test]
    fn test_custom_values_kept() {
        let config = complete_builder()
            .player(PlayerConfig::fast().with_trace_media_signals(true))
            .event_capacity(8)
            .build()
            .unwrap();
        assert!(config.player.trace_media_signals);
        assert_eq!(config.event_capacity, 8);
        assert!(format!("{:?}", config).contains("event_capacity: 8"));
    }
}
