use crate::events::AppEvent;
use async_channel::Sender;
use std::str::FromStr;
use strum::EnumString;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::UnixListener;

pub const SOCKET_PATH: &str = "/tmp/storytray.sock";

/// One line on the control socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Command {
    Start,
    Stop,
    Toggle,
}

impl From<Command> for AppEvent {
    fn from(command: Command) -> Self {
        match command {
            Command::Start => AppEvent::StartLoading,
            Command::Stop => AppEvent::StopLoading,
            Command::Toggle => AppEvent::ToggleLoading,
        }
    }
}

pub fn parse_command(line: &str) -> Option<AppEvent> {
    Command::from_str(line.trim()).ok().map(AppEvent::from)
}

pub async fn run_server(tx: Sender<AppEvent>) {
    // Cleanup old socket if it exists
    if std::fs::metadata(SOCKET_PATH).is_ok() {
        let _ = std::fs::remove_file(SOCKET_PATH);
    }

    let listener = match UnixListener::bind(SOCKET_PATH) {
        Ok(l) => l,
        Err(e) => {
            log::error!("Failed to bind unix socket: {}", e);
            return;
        }
    };

    loop {
        match listener.accept().await {
            Ok((mut stream, _)) => {
                let tx = tx.clone();
                tokio::spawn(async move {
                    let reader = BufReader::new(&mut stream);
                    let mut lines = reader.lines();

                    while let Ok(Some(line)) = lines.next_line().await {
                        match parse_command(&line) {
                            Some(event) => {
                                if tx.send(event).await.is_err() {
                                    break;
                                }
                            }
                            None => log::warn!("Unknown control command: {:?}", line),
                        }
                    }
                });
            }
            Err(e) => {
                log::error!("Failed to accept connection: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command("start"), Some(AppEvent::StartLoading));
        assert_eq!(parse_command("  STOP\n"), Some(AppEvent::StopLoading));
        assert_eq!(parse_command("Toggle"), Some(AppEvent::ToggleLoading));
        assert_eq!(parse_command("show"), None);
        assert_eq!(parse_command(""), None);
    }
}
