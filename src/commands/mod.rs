pub mod help;
pub mod sar;
pub mod status;
pub mod stream;

use tracing::debug;

use crate::dashboard::{Dashboard, Flow};

/// An operator action typed on stdin
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Pause,
    Resume,
    Toggle,
    GenerateSar(String),
    CloseSar,
    Status,
    Help,
    Quit,
    Unknown(String),
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse(line: &str) -> Option<Command> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.is_empty() {
        return None;
    }

    let command = parts[0].to_lowercase();
    let args = &parts[1..];

    let parsed = match command.as_str() {
        "pause" | "jeda" => Command::Pause,
        "resume" | "lanjutkan" => Command::Resume,
        "toggle" | "p" => Command::Toggle,
        "sar" | "generate" => match args.first() {
            Some(key) => Command::GenerateSar(key.to_string()),
            None => Command::Unknown(line.trim().to_string()),
        },
        "close" | "tutup" => Command::CloseSar,
        "status" | "ping" => Command::Status,
        "help" | "bantuan" | "?" => Command::Help,
        "quit" | "exit" | "keluar" => Command::Quit,
        _ => Command::Unknown(line.trim().to_string()),
    };

    Some(parsed)
}

/// Apply a command to the dashboard
pub async fn execute(dashboard: &mut Dashboard, command: Command) -> Flow {
    debug!("Executing command {:?}", command);
    dashboard.state.clear_notice();

    match command {
        Command::Pause => stream::pause(dashboard).await,
        Command::Resume => stream::resume(dashboard).await,
        Command::Toggle => stream::toggle(dashboard).await,
        Command::GenerateSar(key) => sar::generate(dashboard, &key),
        Command::CloseSar => sar::close(dashboard),
        Command::Status => status::execute(dashboard),
        Command::Help => help::execute(dashboard, None),
        Command::Unknown(input) => help::execute(dashboard, Some(&input)),
        Command::Quit => return Flow::Quit,
    }

    Flow::Continue
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!(parse("jeda"), Some(Command::Pause));
        assert_eq!(parse("  Lanjutkan "), Some(Command::Resume));
        assert_eq!(parse("TOGGLE"), Some(Command::Toggle));
        assert_eq!(parse("sar 3"), Some(Command::GenerateSar("3".to_string())));
        assert_eq!(parse("close"), Some(Command::CloseSar));
        assert_eq!(parse("quit"), Some(Command::Quit));
        assert_eq!(parse("   "), None);
    }

    #[test]
    fn test_sar_without_target_is_unknown() {
        assert_eq!(parse("sar"), Some(Command::Unknown("sar".to_string())));
        assert_eq!(parse("launch"), Some(Command::Unknown("launch".to_string())));
        assert_eq!(parse("$toggle"), Some(Command::Unknown("$toggle".to_string())));
    }
}
