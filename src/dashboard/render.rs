//! Text rendering of the dashboard. `render` depends on nothing but the state.

use std::fmt::Write;

use super::state::{DashboardState, SarPanel};
use crate::utils::{format_idr, Table};

const RULE_WIDTH: usize = 72;

fn section(title: &str) -> String {
    let label = format!("== {} ", title);
    let fill = RULE_WIDTH.saturating_sub(label.chars().count());
    format!("{}{}", label, "=".repeat(fill))
}

/// Render one full frame
pub fn render(state: &DashboardState) -> String {
    let mut out = String::new();

    let updated = state
        .last_update()
        .map(|at| format!("Pembaruan terakhir: {}", at.format("%H:%M:%S UTC")))
        .unwrap_or_default();
    let _ = writeln!(out, "🛡️  Jaga Dana    {}", updated);
    out.push('\n');

    render_live(state, &mut out);
    out.push('\n');
    render_anomalies(state, &mut out);

    let sar = state.sar();
    if sar.selected.is_some() {
        out.push('\n');
        render_sar(sar, &mut out);
    }

    out.push('\n');
    if let Some(notice) = state.notice() {
        let _ = writeln!(out, "{}", notice);
    }
    let _ = writeln!(
        out,
        "Perintah: {} · sar <no> · close · status · help · quit",
        if state.is_paused() { "lanjutkan" } else { "jeda" }
    );

    out
}

fn render_live(state: &DashboardState, out: &mut String) {
    let stream_state = if state.is_paused() {
        "⏸ Dijeda"
    } else {
        "▶ Langsung"
    };
    let _ = writeln!(out, "{}", section(&format!("📋 Aliran Transaksi Langsung [{}]", stream_state)));

    if state.live().len() == 0 {
        if !state.is_paused() {
            let _ = writeln!(out, "Menunggu data transaksi...");
        }
        return;
    }

    let mut table = Table::new(vec!["", "Tipe", "Tujuan", "Jumlah", ""]).align_right(3);
    for tx in state.live() {
        table.add_row(vec![
            tx.kind.icon().to_string(),
            tx.kind.to_string(),
            format!("ke: {}", tx.name_dest),
            format_idr(tx.amount),
            if tx.is_anomaly { "⚠".to_string() } else { String::new() },
        ]);
    }
    out.push_str(&table.render());
}

fn render_anomalies(state: &DashboardState, out: &mut String) {
    let anomalies = state.anomalies();
    let _ = writeln!(out, "{}", section(&format!("⚠️  Anomali Terdeteksi ({})", anomalies.len())));

    if anomalies.is_empty() {
        let _ = writeln!(out, "Belum ada anomali terdeteksi.");
        return;
    }

    for (idx, tx) in anomalies.iter().enumerate() {
        let score = tx
            .anomaly_score
            .map(|score| format!("{:.4}", score))
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "[{}] {} - {}    Skor: {}",
            idx + 1,
            tx.kind,
            format_idr(tx.amount),
            score
        );
        if let Some(explanation) = tx.explanation.as_deref().filter(|e| !e.is_empty()) {
            let _ = writeln!(out, "    {}", explanation);
        }
        if state.is_generating(&tx.id) {
            let _ = writeln!(out, "    Memproses...");
        } else {
            let _ = writeln!(out, "    ✏️  Buat Draf SAR: sar {}", idx + 1);
        }
    }
}

fn render_sar(sar: &SarPanel, out: &mut String) {
    let id = sar
        .selected
        .as_ref()
        .map(|tx| tx.id.to_string())
        .unwrap_or_default();
    let _ = writeln!(out, "{}", section(&format!("Draf Laporan Aktivitas Mencurigakan (SAR) #{}", id)));

    if sar.is_loading() {
        let _ = writeln!(out, "⏳ Memproses...");
    } else if sar.draft.is_empty() {
        let _ = writeln!(out, "Draf narasi SAR akan muncul di sini...");
    } else {
        let _ = writeln!(out, "{}", sar.draft);
    }
    let _ = writeln!(out, "(close untuk menutup)");
}
