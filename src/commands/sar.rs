use crate::dashboard::{Dashboard, SarRejection};
use crate::services::sar_service;

/// Select an anomaly by list number or id and request its SAR draft
pub fn generate(dashboard: &mut Dashboard, key: &str) {
    let anomaly = match dashboard.state.find_anomaly(key) {
        Some(anomaly) => anomaly.clone(),
        None => {
            dashboard
                .state
                .set_notice(format!("❌ Anomali '{}' tidak ditemukan.", key));
            return;
        }
    };

    match dashboard.state.begin_sar(anomaly.clone()) {
        Ok(tag) => {
            sar_service::spawn_generation(
                dashboard.client.clone(),
                anomaly,
                tag,
                dashboard.events.clone(),
            );
        }
        Err(SarRejection::AlreadyLoading(id)) => {
            dashboard
                .state
                .set_notice(format!("⏳ Draf SAR untuk {} masih diproses.", id));
        }
    }
}

pub fn close(dashboard: &mut Dashboard) {
    dashboard.state.dismiss_sar();
}
