use chrono::Utc;
use std::io::Write;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::render::render;
use super::state::{DashboardState, RequestTag};
use crate::api::jaga_dana::BackendClient;
use crate::commands::{self, Command};
use crate::config::Config;
use crate::models::Transaction;
use crate::services::stream_service::StreamController;

/// Everything that can change the dashboard, delivered FIFO to one task
#[derive(Debug)]
pub enum DashboardEvent {
    Transaction {
        connection_id: Uuid,
        transaction: Transaction,
    },
    StreamClosed {
        connection_id: Uuid,
        reason: String,
    },
    SarCompleted {
        tag: RequestTag,
        draft: String,
    },
    Notice(String),
    Command(Command),
}

/// Whether the event loop keeps going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Owner of the dashboard state and of the stream connection
pub struct Dashboard {
    pub(crate) state: DashboardState,
    pub(crate) client: BackendClient,
    pub(crate) stream: StreamController,
    pub(crate) events: UnboundedSender<DashboardEvent>,
}

impl Dashboard {
    pub fn new(config: &Config, events: UnboundedSender<DashboardEvent>) -> Self {
        let client = BackendClient::new(config.api_base.clone());
        let stream = StreamController::new(client.clone(), events.clone());

        Self {
            state: DashboardState::new(config.live_capacity),
            client,
            stream,
            events,
        }
    }

    /// Subscribe to the stream unless paused
    pub async fn start(&mut self) {
        if !self.state.is_paused() {
            let connection_id = self.stream.resume().await;
            info!(%connection_id, "Subscribed to {}", self.client.base_url());
        }
    }

    /// Apply one event to the state
    pub async fn handle(&mut self, event: DashboardEvent) -> Flow {
        match event {
            DashboardEvent::Transaction {
                connection_id,
                transaction,
            } => {
                if self.state.is_paused() || self.stream.connection_id() != Some(connection_id) {
                    debug!(%connection_id, "Dropping transaction from a closed connection");
                } else {
                    self.state.apply_transaction(transaction, Utc::now());
                }
            }
            DashboardEvent::StreamClosed {
                connection_id,
                reason,
            } => {
                warn!(%connection_id, "Stream went silent: {}", reason);
                self.stream.release(connection_id).await;
            }
            DashboardEvent::SarCompleted { tag, draft } => {
                if !self.state.complete_sar(tag, draft) {
                    debug!("Ignoring SAR result {} for a request that is no longer current", tag);
                }
            }
            DashboardEvent::Notice(notice) => self.state.set_notice(notice),
            DashboardEvent::Command(command) => return commands::execute(self, command).await,
        }

        Flow::Continue
    }

    /// Process events until a quit command, drawing a frame after each one.
    /// The stream connection is closed before returning.
    pub async fn run<W: Write>(
        mut self,
        mut inbox: UnboundedReceiver<DashboardEvent>,
        mut output: W,
    ) -> std::io::Result<()> {
        self.start().await;
        draw(&mut output, &self.state)?;

        while let Some(event) = inbox.recv().await {
            if self.handle(event).await == Flow::Quit {
                break;
            }
            draw(&mut output, &self.state)?;
        }

        self.stream.pause().await;
        info!("Dashboard stopped");
        Ok(())
    }
}

fn draw<W: Write>(output: &mut W, state: &DashboardState) -> std::io::Result<()> {
    // Clear screen, cursor home
    write!(output, "\x1b[2J\x1b[H{}", render(state))?;
    output.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::spawn_backend;
    use axum::http::StatusCode;
    use axum::response::sse::{Event, Sse};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::json;
    use std::convert::Infallible;
    use std::time::Duration;
    use tokio::sync::mpsc;

    /// Stream emits one normal and one anomalous record, then stays open
    fn backend(sar: Router) -> Router {
        Router::new()
            .route(
                "/stream",
                get(|| async {
                    let frames = futures::stream::iter(vec![
                        Ok::<_, Infallible>(Event::default().data(
                            r#"{"id":1,"type":"PAYMENT","amount":100,"nameDest":"M1","is_anomaly":false}"#,
                        )),
                        Ok(Event::default().data(
                            r#"{"id":7,"type":"TRANSFER","amount":181,"nameDest":"C2","is_anomaly":true,"anomaly_score":-0.07,"explanation":"Saldo pengirim tidak konsisten."}"#,
                        )),
                    ]);
                    Sse::new(futures::StreamExt::chain(frames, futures::stream::pending()))
                }),
            )
            .merge(sar)
    }

    async fn dashboard(app: Router) -> (Dashboard, UnboundedReceiver<DashboardEvent>) {
        let config = Config {
            api_base: spawn_backend(app).await,
            live_capacity: 50,
        };
        let (tx, rx) = mpsc::unbounded_channel();
        (Dashboard::new(&config, tx), rx)
    }

    /// Feed events from the inbox into the dashboard until `done` holds
    async fn pump_until<F>(
        dashboard: &mut Dashboard,
        inbox: &mut UnboundedReceiver<DashboardEvent>,
        done: F,
    ) where
        F: Fn(&DashboardState) -> bool,
    {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        while !done(&dashboard.state) {
            let event = tokio::time::timeout_at(deadline, inbox.recv())
                .await
                .expect("timed out waiting for dashboard event")
                .expect("inbox closed");
            dashboard.handle(event).await;
        }
    }

    #[tokio::test]
    async fn test_stream_fills_both_lists() {
        let (mut dashboard, mut inbox) = dashboard(backend(Router::new())).await;
        dashboard.start().await;

        pump_until(&mut dashboard, &mut inbox, |s| s.live().len() == 2).await;

        assert_eq!(dashboard.state.anomalies().len(), 1);
        assert_eq!(dashboard.state.anomalies()[0].id.to_string(), "7");
        dashboard.stream.pause().await;
    }

    #[tokio::test]
    async fn test_generate_sar_success_flow() {
        let sar = Router::new().route(
            "/generate-sar",
            post(|| async { Json(json!({ "sar_draft": "Kepada: PPATK" })) }),
        );
        let (mut dashboard, mut inbox) = dashboard(backend(sar)).await;
        dashboard.start().await;
        pump_until(&mut dashboard, &mut inbox, |s| s.anomalies().len() == 1).await;

        let flow = dashboard
            .handle(DashboardEvent::Command(Command::GenerateSar("1".to_string())))
            .await;
        assert_eq!(flow, Flow::Continue);
        assert!(dashboard.state.sar().is_loading());
        assert!(dashboard.state.sar().draft.is_empty());

        pump_until(&mut dashboard, &mut inbox, |s| !s.sar().is_loading()).await;

        assert_eq!(dashboard.state.sar().draft, "Kepada: PPATK");
        dashboard.stream.pause().await;
    }

    #[tokio::test]
    async fn test_generate_sar_failure_flow() {
        let sar = Router::new().route(
            "/generate-sar",
            post(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "detail": "backend down" })),
                )
            }),
        );
        let (mut dashboard, mut inbox) = dashboard(backend(sar)).await;
        dashboard.start().await;
        pump_until(&mut dashboard, &mut inbox, |s| s.anomalies().len() == 1).await;

        dashboard
            .handle(DashboardEvent::Command(Command::GenerateSar("7".to_string())))
            .await;
        pump_until(&mut dashboard, &mut inbox, |s| !s.sar().is_loading()).await;

        assert!(dashboard.state.sar().draft.contains("backend down"));
        dashboard.stream.pause().await;
    }

    #[tokio::test]
    async fn test_pause_drops_queued_transactions() {
        let (mut dashboard, mut inbox) = dashboard(backend(Router::new())).await;
        dashboard.start().await;

        // Let the records queue up without applying them
        tokio::time::sleep(Duration::from_millis(200)).await;
        dashboard.handle(DashboardEvent::Command(Command::Pause)).await;
        assert!(dashboard.state.is_paused());
        assert!(dashboard.stream.connection_id().is_none());

        while let Ok(event) = inbox.try_recv() {
            dashboard.handle(event).await;
        }
        assert_eq!(dashboard.state.live().len(), 0);

        dashboard.handle(DashboardEvent::Command(Command::Toggle)).await;
        assert!(!dashboard.state.is_paused());
        pump_until(&mut dashboard, &mut inbox, |s| s.live().len() == 2).await;
        dashboard.stream.pause().await;
    }

    #[tokio::test]
    async fn test_run_draws_frames_and_quits() {
        let (dashboard, inbox) = dashboard(backend(Router::new())).await;
        let sender = dashboard.events.clone();
        let mut frames = Vec::new();

        sender
            .send(DashboardEvent::Notice("halo".to_string()))
            .unwrap();
        sender.send(DashboardEvent::Command(Command::Quit)).unwrap();
        dashboard.run(inbox, &mut frames).await.unwrap();

        let output = String::from_utf8(frames).unwrap();
        assert!(output.contains("Jaga Dana"));
        assert!(output.contains("halo"));
    }
}
