//! Receiver service loop and its cloneable ingress handle.
//!
//! The [`PlayerController`] is moved into a single tokio task that drains an
//! unbounded input queue. Hosts, timers and engine fault reporters all post
//! into that queue, so state is only ever mutated from one place and inputs
//! are handled strictly one after another.

use std::sync::Arc;

use bridge_traits::{LoadRequest, MediaSignal, ReportedState, StopRequest};
use core_playback::{
    status, Collaborators, Input, PlayerController, PlayerEvent, PlayerState, RemoteCommand,
};
use core_runtime::events::{EventBus, EventStream};
use parking_lot::Mutex;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::ReceiverConfig;
use crate::error::{CoreError, Result};

/// Entry point that wires a [`ReceiverConfig`] into a running receiver.
pub struct ReceiverService;

impl ReceiverService {
    /// Spawn the receiver loop on the current tokio runtime.
    ///
    /// The player starts in `Launching`; call [`ReceiverHandle::ready`] once the
    /// host is up.
    pub fn start(config: ReceiverConfig) -> ReceiverHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let events = EventBus::new(config.event_capacity);

        let collaborators = Collaborators {
            sink: config.media_sink,
            engines: config.engine_factory,
            remote: config.remote_channel,
            presenter: config.presenter,
        };
        let controller =
            PlayerController::new(config.player, collaborators, tx.clone(), events.clone());
        let state = controller.watch_state();

        let task = tokio::spawn(run(controller, rx));
        info!("Receiver service started");

        ReceiverHandle {
            inputs: tx,
            state,
            events,
            task: Arc::new(Mutex::new(Some(task))),
        }
    }
}

async fn run(mut controller: PlayerController, mut inputs: mpsc::UnboundedReceiver<Input>) {
    controller.start();

    while let Some(input) = inputs.recv().await {
        let stopping = matches!(input, Input::Shutdown);
        controller.handle(input).await;
        if stopping {
            break;
        }
    }

    debug!(state = %controller.state(), "Receiver loop exited");
}

/// Cloneable handle for feeding the receiver and observing it.
#[derive(Clone)]
pub struct ReceiverHandle {
    inputs: mpsc::UnboundedSender<Input>,
    state: watch::Receiver<PlayerState>,
    events: EventBus<PlayerEvent>,
    task: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl ReceiverHandle {
    fn send(&self, input: Input) -> Result<()> {
        self.inputs.send(input).map_err(|_| CoreError::ServiceStopped)
    }

    /// Signal that the host finished launching.
    pub fn ready(&self) -> Result<()> {
        self.send(Input::Ready)
    }

    pub fn load(&self, request: LoadRequest) -> Result<()> {
        self.send(Input::Remote(RemoteCommand::Load(request)))
    }

    pub fn stop(&self, request: StopRequest) -> Result<()> {
        self.send(Input::Remote(RemoteCommand::Stop(request)))
    }

    /// Forward a signal raised by the media sink.
    pub fn media_signal(&self, signal: MediaSignal) -> Result<()> {
        self.send(Input::Media(signal))
    }

    /// Current player state.
    pub fn state(&self) -> PlayerState {
        *self.state.borrow()
    }

    pub fn watch_state(&self) -> watch::Receiver<PlayerState> {
        self.state.clone()
    }

    /// Rewrite a state the status layer is about to report so it matches
    /// what the player is actually doing.
    pub fn relabel_status(&self, reported: ReportedState) -> ReportedState {
        status::relabel(reported, self.state())
    }

    pub fn subscribe(&self) -> EventStream<PlayerEvent> {
        EventStream::new(self.events.subscribe())
    }

    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Stop the loop after the inputs already queued, cancel timers and tear
    /// down the live session. Resolves once the loop has exited.
    pub async fn shutdown(&self) -> Result<()> {
        let task = self.task.lock().take();
        let Some(task) = task else {
            return Err(CoreError::ServiceStopped);
        };

        if self.inputs.send(Input::Shutdown).is_err() {
            warn!("Receiver loop already gone at shutdown");
        }

        task.await
            .map_err(|err| CoreError::TaskFailed(err.to_string()))?;
        info!("Receiver service stopped");
        Ok(())
    }
}
