//! # Playback State Machine
//!
//! [`PlayerController`] owns the [`PlayerState`], the live
//! [`PlaybackSession`] and both timer slots. It is driven one [`Input`] at a
//! time by a single owner (the receiver service loop), and each input is
//! handled to completion before the next one is looked at.
//!
//! ## Inputs
//!
//! - remote LOAD / STOP commands
//! - media-sink signals (playing, paused, progress, ...)
//! - backend faults, tagged with the session that raised them
//! - timer firings from the idle and auto-play slots
//!
//! ## Side effects of a transition
//!
//! Every completed transition re-arms the idle timer for the new state,
//! publishes [`PlayerEvent::StateChanged`], updates the state watch, and
//! republishes the application-state text when it changed.

use std::sync::Arc;
use std::time::Duration;

use bridge_traits::{
    BackendFault, FaultReporter, LoadRequest, MediaDescriptor, MediaSignal, MediaSink, Presenter,
    ProtocolEngine, ProtocolEngineFactory, ProtocolKind, RemoteChannel, ReportedState,
    StatusScope, StopRequest,
};
use core_runtime::events::EventBus;
use core_runtime::logging::{redact_if_sensitive, strip_url};
use tokio::sync::{mpsc::UnboundedSender, watch};
use tracing::{debug, error, info, instrument, trace, warn};

use crate::autoplay::{BufferProbe, ProbeStep};
use crate::config::PlayerConfig;
use crate::error::{PlaybackError, Result};
use crate::events::PlayerEvent;
use crate::idle;
use crate::protocol;
use crate::recovery::{self, Failure};
use crate::session::{self, PlaybackSession, SessionId};
use crate::state::PlayerState;
use crate::status;
use crate::timer::{TimerFired, TimerKind, TimerSlot};

/// Commands from a sender device.
#[derive(Debug, Clone)]
pub enum RemoteCommand {
    Load(LoadRequest),
    Stop(StopRequest),
}

/// Everything the controller reacts to.
#[derive(Debug)]
pub enum Input {
    /// The host finished bringing the receiver up.
    Ready,
    Remote(RemoteCommand),
    Media(MediaSignal),
    /// Fatal fault from the engine of `session`.
    Backend {
        session: SessionId,
        fault: BackendFault,
    },
    Timer(TimerFired),
    Shutdown,
}

/// Host capabilities the controller drives.
///
/// The controller only holds these; it never rebinds their callbacks. Signals
/// flow back in as [`Input`]s.
#[derive(Clone)]
pub struct Collaborators {
    pub sink: Arc<dyn MediaSink>,
    pub engines: Arc<dyn ProtocolEngineFactory>,
    pub remote: Arc<dyn RemoteChannel>,
    pub presenter: Arc<dyn Presenter>,
}

/// The receiver's playback state machine.
///
/// Owns the current [`PlayerState`], the live [`PlaybackSession`], the idle
/// and auto-play timer slots and the last published application-state text.
/// Not shareable: exactly one task drives it through [`handle`](Self::handle).
pub struct PlayerController {
    config: PlayerConfig,
    collaborators: Collaborators,
    state: PlayerState,
    session: Option<PlaybackSession>,
    probe: Option<BufferProbe>,
    idle_timer: TimerSlot,
    autoplay_timer: TimerSlot,
    /// Last application-state text successfully published.
    application_state: Option<String>,
    seeking: bool,
    events: EventBus<PlayerEvent>,
    state_tx: watch::Sender<PlayerState>,
    inputs: UnboundedSender<Input>,
}

impl PlayerController {
    /// Create a controller in the provisional `Launching` state.
    ///
    /// `inputs` must feed back into the loop that calls [`handle`](Self::handle);
    /// timers and engine fault reporters post through it.
    pub fn new(
        config: PlayerConfig,
        collaborators: Collaborators,
        inputs: UnboundedSender<Input>,
        events: EventBus<PlayerEvent>,
    ) -> Self {
        let (state_tx, _) = watch::channel(PlayerState::Launching);

        Self {
            config,
            collaborators,
            state: PlayerState::Launching,
            session: None,
            probe: None,
            idle_timer: TimerSlot::new(TimerKind::Idle, inputs.clone()),
            autoplay_timer: TimerSlot::new(TimerKind::Autoplay, inputs.clone()),
            application_state: None,
            seeking: false,
            events,
            state_tx,
            inputs,
        }
    }

    /// Arm the idle timer for the initial state. Requires a tokio runtime.
    pub fn start(&mut self) {
        self.rearm_idle_timer();
    }

    pub async fn handle(&mut self, input: Input) {
        match input {
            Input::Ready => self.on_ready().await,
            Input::Remote(RemoteCommand::Load(request)) => self.load(request).await,
            Input::Remote(RemoteCommand::Stop(request)) => self.stop(request).await,
            Input::Media(signal) => self.on_media_signal(signal).await,
            Input::Backend { session, fault } => self.on_backend_fault(session, fault).await,
            Input::Timer(fired) => self.on_timer(fired).await,
            Input::Shutdown => self.shutdown().await,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn watch_state(&self) -> watch::Receiver<PlayerState> {
        self.state_tx.subscribe()
    }

    pub fn session(&self) -> Option<&PlaybackSession> {
        self.session.as_ref()
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// `true` while an auto-play probe is outstanding.
    pub fn is_probing(&self) -> bool {
        self.probe.is_some()
    }

    /// Duration the idle timer is currently armed with.
    pub fn idle_timeout(&self) -> Option<Duration> {
        self.idle_timer.armed_for()
    }

    pub fn is_seeking(&self) -> bool {
        self.seeking
    }

    pub fn application_state(&self) -> Option<&str> {
        self.application_state.as_deref()
    }

    pub fn relabel_status(&self, reported: ReportedState) -> ReportedState {
        status::relabel(reported, self.state)
    }

    // ========================================================================
    // Remote commands
    // ========================================================================

    #[instrument(
        skip(self, request),
        fields(
            content_id = %strip_url(&request.descriptor.content_id),
            sender = %redact_if_sensitive("sender_id", &request.sender_id),
        )
    )]
    async fn load(&mut self, request: LoadRequest) {
        info!("LOAD received");
        self.cancel_probe();
        self.teardown_session().await;

        if let Err(error) = self.start_session(&request).await {
            self.recover(Failure::from_load(request, error)).await;
        }
    }

    async fn start_session(&mut self, request: &LoadRequest) -> Result<()> {
        let descriptor = &request.descriptor;
        session::validate(descriptor)?;

        let protocol = protocol::select(descriptor);
        let autoplay = request.wants_autoplay();
        let id = SessionId::new();
        let engine = self.attach(id, protocol, descriptor, autoplay).await?;

        info!(%protocol, session = %id, autoplay, "Session attached");
        self.session = Some(PlaybackSession::new(
            id,
            descriptor.clone(),
            protocol,
            engine,
        ));
        self.emit(PlayerEvent::SessionStarted {
            content_id: descriptor.content_id.clone(),
            protocol,
        });

        let presenter = Arc::clone(&self.collaborators.presenter);
        presenter.render_metadata(descriptor).await;
        presenter.preload(descriptor).await;
        self.enter(PlayerState::Loading).await;

        if let Some(engine) = self.session.as_ref().and_then(|session| session.engine()) {
            engine
                .load()
                .await
                .map_err(|err| PlaybackError::Backend(BackendFault::new(err.to_string())))?;

            // Native sinks handle autoplay themselves
            if autoplay {
                self.start_probe();
            }
        }

        Ok(())
    }

    /// Bind the media to its backend: the sink directly for native playback,
    /// a fresh engine otherwise.
    async fn attach(
        &self,
        id: SessionId,
        protocol: ProtocolKind,
        descriptor: &MediaDescriptor,
        autoplay: bool,
    ) -> Result<Option<Box<dyn ProtocolEngine>>> {
        let url = descriptor.content_id.as_str();

        if protocol.is_native() {
            self.collaborators
                .sink
                .load_source(url, autoplay)
                .await
                .map_err(|err| PlaybackError::Sink(err.to_string()))?;
            return Ok(None);
        }

        let sink = Arc::clone(&self.collaborators.sink);
        match self
            .collaborators
            .engines
            .create(protocol, url, sink, self.fault_reporter(id))
        {
            Ok(Some(engine)) => Ok(Some(engine)),
            Ok(None) => Err(PlaybackError::Backend(BackendFault::new(format!(
                "No engine available for {}",
                protocol
            )))),
            Err(err) => Err(PlaybackError::Backend(BackendFault::new(err.to_string()))),
        }
    }

    fn fault_reporter(&self, session: SessionId) -> FaultReporter {
        let inputs = self.inputs.clone();
        FaultReporter::new(move |fault| {
            // Closed only during shutdown
            let _ = inputs.send(Input::Backend { session, fault });
        })
    }

    async fn stop(&mut self, request: StopRequest) {
        info!(
            sender = %redact_if_sensitive("sender_id", &request.sender_id),
            "STOP received"
        );
        self.cancel_probe();
        self.teardown_session().await;
        self.enter_crossfaded(PlayerState::Idle).await;

        if let Err(err) = self.collaborators.remote.acknowledge_stop(&request).await {
            warn!(error = %err, "Failed to acknowledge STOP");
        }
    }

    // ========================================================================
    // Media signals
    // ========================================================================

    async fn on_ready(&mut self) {
        if self.state == PlayerState::Launching {
            self.enter(PlayerState::Idle).await;
        } else {
            debug!(state = %self.state, "Ready signal after launch ignored");
        }
    }

    async fn on_media_signal(&mut self, signal: MediaSignal) {
        if self.config.trace_media_signals {
            debug!(signal = signal.name(), state = %self.state, "Media signal");
        }

        match signal {
            MediaSignal::Error { message } => {
                self.recover(Failure::fatal(PlaybackError::Sink(message)))
                    .await
            }
            MediaSignal::Playing => self.on_playing().await,
            MediaSignal::Paused => self.on_paused().await,
            MediaSignal::Ended => {
                self.cancel_probe();
                self.enter_crossfaded(PlayerState::Done).await;
            }
            MediaSignal::Progress => self.on_progress().await,
            MediaSignal::SeekingStarted => self.set_seeking(true),
            MediaSignal::SeekingEnded => self.set_seeking(false),
            MediaSignal::Waiting | MediaSignal::Stalled => self.on_starved().await,
            MediaSignal::MetadataLoaded => {
                debug!(duration = ?self.collaborators.sink.duration(), "Media metadata loaded");
            }
        }
    }

    async fn on_playing(&mut self) {
        match self.state {
            PlayerState::Playing => {}
            PlayerState::Launching | PlayerState::Idle => {
                debug!(state = %self.state, "Playing signal without a session ignored");
            }
            PlayerState::Loading => {
                self.cancel_probe();
                self.enter_crossfaded(PlayerState::Playing).await;
            }
            PlayerState::Buffering
            | PlayerState::Paused
            | PlayerState::Stalled
            | PlayerState::Done => {
                self.cancel_probe();
                self.enter(PlayerState::Playing).await;
            }
        }
    }

    async fn on_paused(&mut self) {
        let underflow = self
            .session
            .as_ref()
            .map(|session| session.engine_state().underflow)
            .unwrap_or(false);

        if underflow {
            // The sink paused itself to rebuffer
            debug!("Pause during engine underflow treated as buffering");
            if self.state != PlayerState::Buffering {
                self.enter(PlayerState::Buffering).await;
            }
            if let Err(err) = self
                .collaborators
                .remote
                .broadcast_status(StatusScope::WithoutMedia)
                .await
            {
                warn!(error = %err, "Failed to broadcast buffering status");
            }
            return;
        }

        if self.state.is_sessionless() || self.at_end_of_media() {
            debug!(state = %self.state, "Pause signal ignored");
            return;
        }

        if self.state != PlayerState::Paused {
            self.cancel_probe();
            self.enter(PlayerState::Paused).await;
        }
    }

    fn at_end_of_media(&self) -> bool {
        let sink = &self.collaborators.sink;
        match sink.duration() {
            Some(total) => sink.position() >= total,
            None => false,
        }
    }

    async fn on_progress(&mut self) {
        let sink = &self.collaborators.sink;
        self.emit(PlayerEvent::progress(
            sink.position().as_secs_f64(),
            sink.duration().map(|total| total.as_secs_f64()),
        ));

        if matches!(self.state, PlayerState::Buffering | PlayerState::Loading) {
            self.cancel_probe();
            self.enter(PlayerState::Playing).await;
        }
    }

    async fn on_starved(&mut self) {
        if self.state == PlayerState::Playing && !self.collaborators.sink.has_future_data() {
            self.enter(PlayerState::Buffering).await;
        }
    }

    fn set_seeking(&mut self, seeking: bool) {
        if self.seeking != seeking {
            self.seeking = seeking;
            self.emit(PlayerEvent::SeekingChanged { seeking });
        }
    }

    async fn on_backend_fault(&mut self, session: SessionId, fault: BackendFault) {
        let is_current = self
            .session
            .as_ref()
            .is_some_and(|current| current.id() == session);

        if is_current {
            self.recover(Failure::fatal(PlaybackError::Backend(fault)))
                .await;
        } else {
            debug!(%session, error = %fault, "Fault from a torn-down session dropped");
        }
    }

    // ========================================================================
    // Timers
    // ========================================================================

    async fn on_timer(&mut self, fired: TimerFired) {
        let live = match fired.kind {
            TimerKind::Idle => self.idle_timer.accept(fired),
            TimerKind::Autoplay => self.autoplay_timer.accept(fired),
        };

        if !live {
            trace!(?fired, "Stale timer ignored");
            return;
        }

        match fired.kind {
            TimerKind::Idle => self.on_idle_expired().await,
            TimerKind::Autoplay => self.probe_tick().await,
        }
    }

    async fn on_idle_expired(&mut self) {
        info!(state = %self.state, "Idle timeout reached, stopping application");
        if let Err(err) = self.collaborators.remote.stop_application().await {
            // Keep the receiver on a timer so it retries after another timeout
            warn!(error = %err, "Failed to stop application, re-arming idle timer");
            self.rearm_idle_timer();
        }
    }

    fn rearm_idle_timer(&mut self) {
        match idle::timeout_for(self.state, &self.config.idle) {
            Some(timeout) => self.idle_timer.arm(timeout),
            None => self.idle_timer.cancel(),
        }
    }

    fn start_probe(&mut self) {
        let probe = BufferProbe::new(&self.config.autoplay);
        self.autoplay_timer.arm(probe.initial_delay());
        self.probe = Some(probe);
    }

    fn cancel_probe(&mut self) {
        self.autoplay_timer.cancel();
        if self.probe.take().is_some() {
            debug!("Auto-play probe cancelled");
        }
    }

    async fn probe_tick(&mut self) {
        let sink = Arc::clone(&self.collaborators.sink);
        let Some(probe) = self.probe.as_mut() else {
            return;
        };

        match probe.step(sink.position(), sink.duration(), || sink.buffered()) {
            ProbeStep::Poll(after) => {
                trace!(polls = probe.polls(), "Buffered lead below target");
                self.autoplay_timer.arm(after);
            }
            ProbeStep::Play => {
                info!(polls = probe.polls(), "Buffer primed, starting playback");
                self.probe = None;
                if let Err(err) = sink.play().await {
                    self.recover(Failure::fatal(PlaybackError::Sink(err.to_string())))
                        .await;
                }
            }
        }
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    async fn enter(&mut self, to: PlayerState) {
        self.set_state(to);
        self.publish_application_state().await;
    }

    async fn enter_crossfaded(&mut self, to: PlayerState) {
        self.run_with_transition(|controller| controller.set_state(to))
            .await;
        self.publish_application_state().await;
    }

    /// Run `action` between the presenter's fade-out and fade-in.
    async fn run_with_transition<F>(&mut self, action: F)
    where
        F: FnOnce(&mut Self),
    {
        let presenter = Arc::clone(&self.collaborators.presenter);
        presenter.fade_out().await;
        action(self);
        presenter.fade_in().await;
    }

    fn set_state(&mut self, to: PlayerState) {
        let from = self.state;
        self.state = to;

        if to == PlayerState::Idle {
            self.cancel_probe();
        }
        self.rearm_idle_timer();
        self.state_tx.send_replace(to);

        if from != to {
            info!(%from, %to, "State changed");
            self.emit(PlayerEvent::StateChanged { from, to });
        }
    }

    async fn publish_application_state(&mut self) {
        let text = status::application_state_text(
            self.session.as_ref().map(|session| session.descriptor()),
        );
        if self.application_state.as_deref() == Some(text.as_str()) {
            return;
        }

        if let Err(err) = self.collaborators.remote.set_application_state(&text).await {
            warn!(error = %err, "Failed to publish application state");
            return;
        }

        debug!(%text, "Application state published");
        self.emit(PlayerEvent::ApplicationStateChanged { text: text.clone() });
        self.application_state = Some(text);
    }

    // ========================================================================
    // Recovery & teardown
    // ========================================================================

    async fn recover(&mut self, failure: Failure) {
        error!(error = %failure.error(), "Playback failed, returning to idle");
        self.cancel_probe();
        self.teardown_session().await;
        self.emit(PlayerEvent::Failed {
            message: failure.error().to_string(),
        });
        self.enter_crossfaded(PlayerState::Idle).await;

        recovery::notify(self.collaborators.remote.as_ref(), &failure).await;
    }

    async fn teardown_session(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };

        if let Some(engine) = session.engine() {
            if let Err(err) = engine.unload().await {
                warn!(session = %session.id(), error = %err, "Engine unload failed");
            }
        }
        if let Err(err) = self.collaborators.sink.reset().await {
            warn!(session = %session.id(), error = %err, "Media sink reset failed");
        }

        self.seeking = false;
        info!(session = %session.id(), "Session torn down");
        self.emit(PlayerEvent::SessionEnded {
            content_id: session.descriptor().content_id.clone(),
        });
    }

    /// Cancel all timers and release the live session. The state is left as is.
    pub async fn shutdown(&mut self) {
        info!(state = %self.state, "Shutting down player");
        self.cancel_probe();
        self.idle_timer.cancel();
        self.teardown_session().await;
    }

    fn emit(&self, event: PlayerEvent) {
        // Nobody listening is fine
        let _ = self.events.emit(event);
    }
}
