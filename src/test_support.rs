//! Helpers shared by the in-crate test modules

use axum::Router;

/// Serve `app` on an ephemeral local port and return its base URL
pub async fn spawn_backend(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}
