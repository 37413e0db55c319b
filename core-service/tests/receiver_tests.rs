//! End-to-end tests for the receiver service loop

use async_trait::async_trait;
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::{
    BackendFault, EngineState, ErrorPayload, FaultReporter, LoadRequest, MediaDescriptor,
    MediaSignal, MediaSink, ProtocolEngine, ProtocolEngineFactory, ProtocolKind, RemoteChannel,
    ReportedState, StatusScope, StopRequest, TimeRange,
};
use core_playback::{PlayerConfig, PlayerEvent, PlayerState};
use core_service::{CoreError, ReceiverConfig, ReceiverHandle, ReceiverService};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Default, Clone)]
struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    fn push(&self, entry: impl Into<String>) {
        self.0.lock().push(entry.into());
    }

    fn count(&self, entry: &str) -> usize {
        self.0.lock().iter().filter(|e| e.as_str() == entry).count()
    }
}

struct TestSink {
    log: CallLog,
}

#[async_trait]
impl MediaSink for TestSink {
    async fn load_source(&self, _url: &str, _autoplay: bool) -> BridgeResult<()> {
        self.log.push("sink.load_source");
        Ok(())
    }

    async fn reset(&self) -> BridgeResult<()> {
        self.log.push("sink.reset");
        Ok(())
    }

    async fn play(&self) -> BridgeResult<()> {
        self.log.push("sink.play");
        Ok(())
    }

    async fn pause(&self) -> BridgeResult<()> {
        Ok(())
    }

    async fn seek(&self, _position: Duration) -> BridgeResult<()> {
        Ok(())
    }

    fn position(&self) -> Duration {
        Duration::ZERO
    }

    fn duration(&self) -> Option<Duration> {
        Some(Duration::from_secs(600))
    }

    fn buffered(&self) -> Vec<TimeRange> {
        vec![TimeRange::from_secs_f64(0.0, 12.0)]
    }

    fn has_future_data(&self) -> bool {
        true
    }
}

struct TestEngine {
    log: CallLog,
    underflow: Arc<AtomicBool>,
}

#[async_trait]
impl ProtocolEngine for TestEngine {
    async fn load(&self) -> BridgeResult<()> {
        self.log.push("engine.load");
        Ok(())
    }

    async fn unload(&self) -> BridgeResult<()> {
        self.log.push("engine.unload");
        Ok(())
    }

    fn state(&self) -> EngineState {
        EngineState {
            underflow: self.underflow.load(Ordering::SeqCst),
        }
    }
}

struct TestEngines {
    log: CallLog,
    underflow: Arc<AtomicBool>,
    reporters: Mutex<Vec<FaultReporter>>,
}

impl ProtocolEngineFactory for TestEngines {
    fn create(
        &self,
        kind: ProtocolKind,
        _url: &str,
        _sink: Arc<dyn MediaSink>,
        faults: FaultReporter,
    ) -> BridgeResult<Option<Box<dyn ProtocolEngine>>> {
        if kind.is_native() {
            return Ok(None);
        }
        self.reporters.lock().push(faults);
        Ok(Some(Box::new(TestEngine {
            log: self.log.clone(),
            underflow: Arc::clone(&self.underflow),
        })))
    }
}

struct TestRemote {
    log: CallLog,
}

#[async_trait]
impl RemoteChannel for TestRemote {
    async fn load_metadata_error(
        &self,
        _request: &LoadRequest,
        _error: &ErrorPayload,
    ) -> BridgeResult<()> {
        self.log.push("remote.load_metadata_error");
        Ok(())
    }

    async fn report_error(&self, _error: &ErrorPayload) -> BridgeResult<()> {
        self.log.push("remote.report_error");
        Ok(())
    }

    async fn acknowledge_stop(&self, _request: &StopRequest) -> BridgeResult<()> {
        self.log.push("remote.acknowledge_stop");
        Ok(())
    }

    async fn broadcast_status(&self, _scope: StatusScope) -> BridgeResult<()> {
        self.log.push("remote.broadcast_status");
        Ok(())
    }

    async fn set_application_state(&self, _text: &str) -> BridgeResult<()> {
        self.log.push("remote.set_application_state");
        Ok(())
    }

    async fn stop_application(&self) -> BridgeResult<()> {
        self.log.push("remote.stop_application");
        Ok(())
    }
}

struct Fixture {
    log: CallLog,
    engines: Arc<TestEngines>,
}

impl Fixture {
    fn start() -> (Self, ReceiverHandle) {
        let log = CallLog::default();
        let engines = Arc::new(TestEngines {
            log: log.clone(),
            underflow: Arc::new(AtomicBool::new(false)),
            reporters: Mutex::new(Vec::new()),
        });

        let config = ReceiverConfig::builder()
            .media_sink(Arc::new(TestSink { log: log.clone() }))
            .engine_factory(engines.clone())
            .remote_channel(Arc::new(TestRemote { log: log.clone() }))
            .player(PlayerConfig::default().with_trace_media_signals(true))
            .build()
            .unwrap();

        let receiver = ReceiverService::start(config);
        (Self { log, engines }, receiver)
    }
}

async fn wait_for(receiver: &ReceiverHandle, target: PlayerState) {
    let mut state = receiver.watch_state();
    tokio::time::timeout(
        Duration::from_secs(30),
        state.wait_for(|state| *state == target),
    )
    .await
    .expect("timed out waiting for state")
    .expect("state channel closed");
}

fn hls_request() -> LoadRequest {
    LoadRequest::new(
        MediaDescriptor::new("https://cdn.example.com/a.m3u8"),
        "sender-1",
    )
}

#[tokio::test(start_paused = true)]
async fn test_load_play_stop() {
    let (fixture, receiver) = Fixture::start();
    assert_eq!(receiver.state(), PlayerState::Launching);

    receiver.ready().unwrap();
    wait_for(&receiver, PlayerState::Idle).await;

    receiver.load(hls_request()).unwrap();
    wait_for(&receiver, PlayerState::Loading).await;

    // Auto-play kicks in after the minimum display time
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(fixture.log.count("sink.play"), 1);

    receiver.media_signal(MediaSignal::Playing).unwrap();
    wait_for(&receiver, PlayerState::Playing).await;

    receiver.stop(StopRequest::new("sender-1")).unwrap();
    wait_for(&receiver, PlayerState::Idle).await;

    receiver.shutdown().await.unwrap();
    assert_eq!(fixture.log.count("engine.unload"), 1);
    assert_eq!(fixture.log.count("remote.acknowledge_stop"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_relabel_while_rebuffering() {
    let (fixture, receiver) = Fixture::start();
    receiver.ready().unwrap();
    receiver.load(hls_request()).unwrap();
    receiver.media_signal(MediaSignal::Playing).unwrap();
    wait_for(&receiver, PlayerState::Playing).await;

    fixture.engines.underflow.store(true, Ordering::SeqCst);
    receiver.media_signal(MediaSignal::Paused).unwrap();
    wait_for(&receiver, PlayerState::Buffering).await;

    assert_eq!(
        receiver.relabel_status(ReportedState::Paused),
        ReportedState::Buffering
    );
    assert_eq!(
        receiver.relabel_status(ReportedState::Playing),
        ReportedState::Playing
    );

    receiver.shutdown().await.unwrap();
    assert_eq!(fixture.log.count("remote.broadcast_status"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_backend_fault_returns_to_idle() {
    let (fixture, receiver) = Fixture::start();
    receiver.ready().unwrap();
    receiver.load(hls_request()).unwrap();
    wait_for(&receiver, PlayerState::Loading).await;

    let reporter = fixture.engines.reporters.lock()[0].clone();
    reporter.report(BackendFault::new("license request failed").with_code(6));
    wait_for(&receiver, PlayerState::Idle).await;

    receiver.shutdown().await.unwrap();
    assert_eq!(fixture.log.count("remote.report_error"), 1);
    assert_eq!(fixture.log.count("sink.play"), 0);
}

#[tokio::test(start_paused = true)]
async fn test_invalid_load_reports_metadata_error() {
    let (fixture, receiver) = Fixture::start();
    receiver.ready().unwrap();
    receiver
        .load(LoadRequest::new(MediaDescriptor::new(""), "sender-1"))
        .unwrap();

    receiver.shutdown().await.unwrap();
    assert_eq!(receiver.state(), PlayerState::Idle);
    assert_eq!(fixture.log.count("remote.load_metadata_error"), 1);
    assert_eq!(fixture.log.count("sink.load_source"), 0);
}

#[tokio::test(start_paused = true)]
async fn test_events_reach_subscribers() {
    let (_fixture, receiver) = Fixture::start();
    let mut states =
        receiver
            .subscribe()
            .filter(|event| matches!(event, PlayerEvent::StateChanged { .. }));

    receiver.ready().unwrap();

    assert_eq!(
        states.recv().await.unwrap(),
        PlayerEvent::StateChanged {
            from: PlayerState::Launching,
            to: PlayerState::Idle,
        }
    );
    receiver.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_tears_down_and_rejects_input() {
    let (fixture, receiver) = Fixture::start();
    receiver.ready().unwrap();
    receiver.load(hls_request()).unwrap();
    wait_for(&receiver, PlayerState::Loading).await;
    assert!(receiver.is_running());

    receiver.shutdown().await.unwrap();

    assert!(!receiver.is_running());
    assert_eq!(fixture.log.count("engine.unload"), 1);
    assert!(matches!(
        receiver.load(hls_request()),
        Err(CoreError::ServiceStopped)
    ));
    assert!(matches!(
        receiver.shutdown().await,
        Err(CoreError::ServiceStopped)
    ));

    // Timers were cancelled with the session
    tokio::time::sleep(Duration::from_secs(600)).await;
    assert_eq!(fixture.log.count("sink.play"), 0);
    assert_eq!(fixture.log.count("remote.stop_application"), 0);
}
