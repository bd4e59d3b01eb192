//! Runs event fetches in the background and reports back over the TUI channel.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::client::EventsClient;
use crate::tui::app::{FetchRequest, TuiEvent};

/// Owns the in-flight fetch task. Starting a new fetch aborts the previous one.
#[derive(Debug)]
pub struct Fetcher {
    client: EventsClient,
    event_tx: mpsc::Sender<TuiEvent>,
    in_flight: Option<JoinHandle<()>>,
}

impl Fetcher {
    pub fn new(client: EventsClient, event_tx: mpsc::Sender<TuiEvent>) -> Self {
        Self {
            client,
            event_tx,
            in_flight: None,
        }
    }

    /// Spawns `request`, aborting whatever was still running.
    pub fn start(&mut self, request: FetchRequest) {
        self.abort();

        let client = self.client.clone();
        let event_tx = self.event_tx.clone();
        self.in_flight = Some(tokio::spawn(async move {
            let outcome = client
                .fetch_events(request.count)
                .await
                .map_err(|e| e.user_message());
            let completed = TuiEvent::FetchCompleted {
                seq: request.seq,
                outcome,
            };
            if event_tx.send(completed).await.is_err() {
                debug!(seq = request.seq, "TUI gone before fetch completed");
            }
        }));
    }

    /// Aborts the in-flight fetch, if any.
    pub fn abort(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            if !handle.is_finished() {
                debug!("Aborting in-flight fetch");
            }
            handle.abort();
        }
    }
}

impl Drop for Fetcher {
    fn drop(&mut self) {
        self.abort();
    }
}
