use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::api::jaga_dana::{ApiError, BackendClient};
use crate::dashboard::{DashboardEvent, RequestTag};
use crate::models::Transaction;

/// Text shown in the draft area when generation fails
pub fn failure_text(error: &ApiError) -> String {
    format!(
        "Gagal membuat draf SAR: {}\n\nPastikan backend berjalan dan GEMINI_API_KEY sudah benar.",
        error
    )
}

/// Request a SAR narrative for one anomaly.
///
/// Never fails: any error is converted into the text the operator sees.
pub async fn generate_draft(client: &BackendClient, anomaly: &Transaction) -> String {
    match client.generate_sar(anomaly).await {
        Ok(draft) => {
            info!("Generated SAR draft for transaction {}", anomaly.id);
            draft
        }
        Err(e) => {
            error!("Failed to generate SAR for transaction {}: {}", anomaly.id, e);
            failure_text(&e)
        }
    }
}

/// Run a generation request in the background and report its outcome as
/// `SarCompleted { tag, .. }`
pub fn spawn_generation(
    client: BackendClient,
    anomaly: Transaction,
    tag: RequestTag,
    events: UnboundedSender<DashboardEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let draft = generate_draft(&client, &anomaly).await;
        let _ = events.send(DashboardEvent::SarCompleted { tag, draft });
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionType;
    use crate::test_support::spawn_backend;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::json;
    use tokio::sync::mpsc;

    fn anomaly() -> Transaction {
        Transaction::new(7u64, TransactionType::CashOut, 1_000_000.0)
            .flagged(-0.2, "Jumlah transaksi sangat besar.")
    }

    #[tokio::test]
    async fn test_backend_detail_embedded_in_fallback() {
        let app = Router::new().route(
            "/generate-sar",
            post(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "detail": "backend down" })),
                )
            }),
        );
        let client = BackendClient::new(spawn_backend(app).await);

        let draft = generate_draft(&client, &anomaly()).await;

        assert!(draft.starts_with("Gagal membuat draf SAR: backend down"));
        assert!(draft.contains("GEMINI_API_KEY"));
    }

    #[tokio::test]
    async fn test_transport_failure_becomes_text() {
        // Nothing listens on port 9 of localhost
        let client = BackendClient::new("http://127.0.0.1:9");

        let draft = generate_draft(&client, &anomaly()).await;

        assert!(draft.starts_with("Gagal membuat draf SAR: Request failed:"));
    }

    #[tokio::test]
    async fn test_spawned_generation_reports_tagged_result() {
        let app = Router::new().route(
            "/generate-sar",
            post(|| async { Json(json!({ "sar_draft": "Rekomendasi: tinjau akun." })) }),
        );
        let client = BackendClient::new(spawn_backend(app).await);
        let (tx, mut rx) = mpsc::unbounded_channel();

        spawn_generation(client, anomaly(), 42, tx).await.unwrap();

        match rx.recv().await {
            Some(DashboardEvent::SarCompleted { tag, draft }) => {
                assert_eq!(tag, 42);
                assert_eq!(draft, "Rekomendasi: tinjau akun.");
            }
            _ => panic!("expected SarCompleted"),
        }
    }
}
