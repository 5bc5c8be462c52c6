use crate::dashboard::{Dashboard, DashboardEvent};

/// Probe the backend without blocking the dashboard; the answer arrives as a notice
pub fn execute(dashboard: &mut Dashboard) {
    let client = dashboard.client.clone();
    let events = dashboard.events.clone();
    dashboard.state.set_notice("📊 Memeriksa backend...");

    tokio::spawn(async move {
        let notice = match client.status().await {
            Ok(status) => format!("✅ {} ({})", status.status, client.base_url()),
            Err(e) => format!("❌ Backend tidak dapat dihubungi: {}", e),
        };
        let _ = events.send(DashboardEvent::Notice(notice));
    });
}
