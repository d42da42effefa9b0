// Terminal input listener: keys and resizes become commands for the control loop.

use crate::error::MonitorError;
use crossterm::event::{Event, EventStream, KeyCode, KeyEventKind, KeyModifiers};
use futures_util::{Stream, StreamExt};
use std::io;
use tokio::sync::mpsc;

/// What the listener asks of the control loop.
#[derive(Debug)]
pub enum Command {
    /// `s`: switch between CPU and memory ordering.
    ToggleSort,
    /// Terminal size changed; redraw from the store.
    Redraw,
    /// `q` or Ctrl-C.
    Quit,
    /// Reading terminal events failed. Fatal.
    Failed(MonitorError),
}

/// Maps one terminal event to a command; unbound keys yield `None`.
pub fn command_for(event: &Event) -> Option<Command> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => match (key.code, key.modifiers) {
            (KeyCode::Char('q'), _) => Some(Command::Quit),
            (KeyCode::Char('c'), m) if m.contains(KeyModifiers::CONTROL) => Some(Command::Quit),
            (KeyCode::Char('s'), _) => Some(Command::ToggleSort),
            _ => None,
        },
        Event::Resize(_, _) => Some(Command::Redraw),
        _ => None,
    }
}

/// Forwards commands from `events` until a quit, an input error, the end of
/// the stream, or the receiver going away.
pub async fn listen<S>(mut events: S, tx: mpsc::Sender<Command>)
where
    S: Stream<Item = io::Result<Event>> + Unpin,
{
    while let Some(next) = events.next().await {
        let command = match next {
            Ok(event) => match command_for(&event) {
                Some(command) => command,
                None => continue,
            },
            Err(e) => Command::Failed(MonitorError::Input(e)),
        };
        let last = matches!(command, Command::Quit | Command::Failed(_));
        if tx.send(command).await.is_err() || last {
            return;
        }
    }
    tracing::debug!("terminal event stream ended");
}

/// Spawns the listener on the real terminal event stream.
pub fn spawn(tx: mpsc::Sender<Command>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(listen(EventStream::new(), tx))
}
