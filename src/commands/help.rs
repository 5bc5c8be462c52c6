use crate::dashboard::Dashboard;

pub const HELP_TEXT: &str = "📖 Perintah: \
pause|jeda · resume|lanjutkan · toggle · sar <no|id> · close · status · help · quit";

pub fn execute(dashboard: &mut Dashboard, unknown: Option<&str>) {
    let notice = match unknown {
        Some(input) => format!("❌ Perintah tidak dikenal: '{}'. {}", input, HELP_TEXT),
        None => HELP_TEXT.to_string(),
    };
    dashboard.state.set_notice(notice);
}
