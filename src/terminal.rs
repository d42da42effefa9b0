// Full-screen terminal session. Dropping the session restores the terminal,
// so every exit path (error, quit, panic unwind) leaves a usable shell.

use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use std::io;

pub struct TerminalSession {
    _private: (),
}

impl TerminalSession {
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen, Hide) {
            let _ = disable_raw_mode();
            return Err(e);
        }
        install_panic_hook();
        Ok(Self { _private: () })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        restore();
    }
}

fn restore() {
    if let Err(e) = disable_raw_mode() {
        tracing::warn!(error = %e, operation = "disable_raw_mode", "terminal restore failed");
    }
    if let Err(e) = execute!(io::stdout(), Show, LeaveAlternateScreen) {
        tracing::warn!(error = %e, operation = "leave_alternate_screen", "terminal restore failed");
    }
}

// The panic message is printed by the default hook; restore first so it lands
// on the normal screen instead of the alternate one.
fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
        previous(info);
    }));
}
