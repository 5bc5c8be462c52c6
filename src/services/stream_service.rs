use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::api::jaga_dana::BackendClient;
use crate::dashboard::DashboardEvent;

/// A running stream connection task
pub struct StreamHandle {
    connection_id: Uuid,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl StreamHandle {
    /// Open a connection in a new task and forward its transactions to `events`
    pub fn spawn(client: BackendClient, events: UnboundedSender<DashboardEvent>) -> Self {
        let connection_id = Uuid::new_v4();
        let cancel = CancellationToken::new();
        let task = tokio::spawn(run_connection(client, connection_id, cancel.clone(), events));

        Self {
            connection_id,
            cancel,
            task,
        }
    }

    pub fn connection_id(&self) -> Uuid {
        self.connection_id
    }

    /// Cancel the connection and wait until its socket has been dropped
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Err(e) = (&mut self.task).await {
            warn!(connection_id = %self.connection_id, "Stream task ended abnormally: {}", e);
        }
    }
}

impl Drop for StreamHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run_connection(
    client: BackendClient,
    connection_id: Uuid,
    cancel: CancellationToken,
    events: UnboundedSender<DashboardEvent>,
) {
    debug!(%connection_id, "Opening stream to {}", client.base_url());

    let mut stream = tokio::select! {
        _ = cancel.cancelled() => {
            debug!(%connection_id, "Stream cancelled before it connected");
            return;
        }
        result = client.open_stream() => match result {
            Ok(stream) => stream,
            Err(e) => {
                error!(%connection_id, "EventSource failed: {}", e);
                let _ = events.send(DashboardEvent::StreamClosed {
                    connection_id,
                    reason: e.to_string(),
                });
                return;
            }
        }
    };

    info!(%connection_id, "Connected to transaction stream");

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!(%connection_id, "Stream closed");
                break;
            }
            next = stream.next_transaction() => match next {
                Ok(Some(transaction)) => {
                    let event = DashboardEvent::Transaction { connection_id, transaction };
                    if events.send(event).is_err() {
                        debug!(%connection_id, "Dashboard gone, closing stream");
                        break;
                    }
                }
                Ok(None) => {
                    warn!(%connection_id, "Stream ended by server");
                    let _ = events.send(DashboardEvent::StreamClosed {
                        connection_id,
                        reason: "stream ended".to_string(),
                    });
                    break;
                }
                Err(e) => {
                    error!(%connection_id, "EventSource failed: {}", e);
                    let _ = events.send(DashboardEvent::StreamClosed {
                        connection_id,
                        reason: e.to_string(),
                    });
                    break;
                }
            }
        }
    }
}

/// Owns at most one stream connection at a time
pub struct StreamController {
    client: BackendClient,
    events: UnboundedSender<DashboardEvent>,
    active: Option<StreamHandle>,
}

impl StreamController {
    pub fn new(client: BackendClient, events: UnboundedSender<DashboardEvent>) -> Self {
        Self {
            client,
            events,
            active: None,
        }
    }

    /// Id of the open connection, if any
    pub fn connection_id(&self) -> Option<Uuid> {
        self.active.as_ref().map(StreamHandle::connection_id)
    }

    /// Open a fresh connection, tearing down the previous one first
    pub async fn resume(&mut self) -> Uuid {
        self.pause().await;

        let handle = StreamHandle::spawn(self.client.clone(), self.events.clone());
        let connection_id = handle.connection_id();
        self.active = Some(handle);
        connection_id
    }

    /// Close the current connection, if any. Returns once it is released.
    pub async fn pause(&mut self) {
        if let Some(handle) = self.active.take() {
            handle.stop().await;
        }
    }

    /// Forget a connection whose task already finished on its own
    pub async fn release(&mut self, connection_id: Uuid) {
        if self.connection_id() == Some(connection_id) {
            self.pause().await;
        }
    }
}
