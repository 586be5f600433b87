//! Debounced background persistence of in-progress answers.
//!
//! Every edit reschedules a single pending task. When the debounce window
//! elapses without another edit, the snapshot taken at the last edit is
//! posted to the autosave endpoint. Progress comes back to the UI thread as
//! [`SaveEvent`]s over a channel.

mod status;

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::model::FormData;
use crate::remote::ApplicationEndpoint;

pub use status::{AutosaveStatus, STATUS_DISPLAY, StatusLine};

/// Default quiet period after the last edit before a save is sent.
pub const AUTOSAVE_DELAY: Duration = Duration::from_secs(2);

/// Progress of one autosave, in the order the UI receives it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveEvent {
    /// The debounce window elapsed and the request was sent.
    Started,
    /// The endpoint confirmed the save at the given local time.
    Saved(DateTime<Local>),
    /// The endpoint answered without confirming the save.
    Rejected,
    /// The request failed in transit.
    NetworkError,
}

/// Owns the debounce task and the channel its results arrive on.
pub struct AutosaveClient {
    endpoint: Arc<dyn ApplicationEndpoint>,
    delay: Duration,
    runtime: Handle,
    pending: Option<JoinHandle<()>>,
    events_tx: UnboundedSender<SaveEvent>,
    events_rx: UnboundedReceiver<SaveEvent>,
}

impl AutosaveClient {
    /// Creates a client that spawns its tasks on `runtime`.
    pub fn new(endpoint: Arc<dyn ApplicationEndpoint>, delay: Duration, runtime: Handle) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            endpoint,
            delay,
            runtime,
            pending: None,
            events_tx,
            events_rx,
        }
    }

    /// Cancels any pending save and schedules `data` to be sent after the delay.
    ///
    /// A save already in flight is left alone; only the waiting task is cancelled.
    pub fn schedule(&mut self, data: FormData) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }

        let endpoint = Arc::clone(&self.endpoint);
        let events = self.events_tx.clone();
        let runtime = self.runtime.clone();
        let delay = self.delay;
        self.pending = Some(self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(SaveEvent::Started);
            tracing::debug!(fields = data.entries().len(), "autosave sending");
            runtime.spawn(async move {
                let event = match endpoint.autosave(data).await {
                    Ok(()) => SaveEvent::Saved(Local::now()),
                    Err(e) if e.is_rejection() => {
                        tracing::warn!(error = %e, "autosave rejected");
                        SaveEvent::Rejected
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "autosave failed");
                        SaveEvent::NetworkError
                    }
                };
                let _ = events.send(event);
            });
        }));
    }

    /// Returns `true` while a save is waiting out its debounce window.
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Takes every event received since the last call, oldest first.
    pub fn drain(&mut self) -> Vec<SaveEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events_rx.try_recv() {
            events.push(event);
        }
        events
    }
}

impl Drop for AutosaveClient {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}
