// Cell-addressed drawing surface

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Attribute, Print, SetAttribute};
use crossterm::terminal::{Clear, ClearType};
use std::io::{self, Write};

/// Where the table is drawn: text at a cell, optionally reverse video.
pub trait Canvas {
    /// Current (columns, rows).
    fn size(&self) -> io::Result<(u16, u16)>;
    fn clear(&mut self) -> io::Result<()>;
    fn print(&mut self, x: u16, y: u16, reverse: bool, text: &str) -> io::Result<()>;
    fn flush(&mut self) -> io::Result<()>;
}

/// Queues crossterm commands on `out`; nothing reaches the terminal until
/// [`Canvas::flush`].
pub struct CrosstermCanvas<W: Write> {
    out: W,
}

impl<W: Write> CrosstermCanvas<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> Canvas for CrosstermCanvas<W> {
    fn size(&self) -> io::Result<(u16, u16)> {
        crossterm::terminal::size()
    }

    fn clear(&mut self) -> io::Result<()> {
        queue!(self.out, Clear(ClearType::All))
    }

    fn print(&mut self, x: u16, y: u16, reverse: bool, text: &str) -> io::Result<()> {
        queue!(self.out, MoveTo(x, y))?;
        if reverse {
            queue!(
                self.out,
                SetAttribute(Attribute::Reverse),
                Print(text),
                SetAttribute(Attribute::NoReverse)
            )
        } else {
            queue!(self.out, Print(text))
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}
