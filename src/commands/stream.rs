use tracing::info;

use crate::dashboard::Dashboard;

pub async fn pause(dashboard: &mut Dashboard) {
    if dashboard.state.is_paused() {
        return;
    }
    dashboard.stream.pause().await;
    dashboard.state.set_paused(true);
    info!("Stream paused");
}

pub async fn resume(dashboard: &mut Dashboard) {
    if !dashboard.state.is_paused() {
        dashboard.state.set_notice("Aliran sudah berjalan.");
        return;
    }
    dashboard.state.set_paused(false);
    let connection_id = dashboard.stream.resume().await;
    info!(%connection_id, "Stream resumed");
}

pub async fn toggle(dashboard: &mut Dashboard) {
    if dashboard.state.is_paused() {
        resume(dashboard).await;
    } else {
        pause(dashboard).await;
    }
}
