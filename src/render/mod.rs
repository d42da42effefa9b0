// Sorted container table

mod canvas;
mod format;

pub use canvas::{Canvas, CrosstermCanvas};
pub use format::format_memory;

use crate::error::{MonitorError, Result};
use crate::models::{ContainerSample, SortMode};
use std::io;

/// Width of the header, title and data rows.
pub const ROW_WIDTH: usize = 80;
pub const NAME_COLUMN: u16 = 0;
pub const CPU_COLUMN: u16 = 52;
pub const MEM_COLUMN: u16 = 62;

const HEADER_ROW: u16 = 0;
const TITLE_ROW: u16 = 2;
const FIRST_DATA_ROW: u16 = 3;

/// Orders samples by the active key, descending. Equal keys fall back to the
/// name so the table does not shuffle between refreshes.
pub fn sort_samples(samples: &mut [ContainerSample], sort: SortMode) {
    match sort {
        SortMode::Cpu => samples.sort_by(|a, b| {
            b.cpu_percent
                .cmp(&a.cpu_percent)
                .then_with(|| a.name.cmp(&b.name))
        }),
        SortMode::Memory => samples.sort_by(|a, b| {
            b.memory_bytes
                .cmp(&a.memory_bytes)
                .then_with(|| a.name.cmp(&b.name))
        }),
    }
}

pub fn header_text(sort: SortMode) -> String {
    format!("'q' to exit, 's' to toggle memory/cpu sort [{}]", sort)
}

/// Draws the header, the reverse-video column titles and one row per sample
/// until the terminal runs out of rows. Returns the number of data rows drawn;
/// rows past the bottom are dropped silently.
pub fn render<C: Canvas>(
    canvas: &mut C,
    mut samples: Vec<ContainerSample>,
    sort: SortMode,
) -> Result<usize> {
    sort_samples(&mut samples, sort);
    draw(canvas, &samples, sort).map_err(MonitorError::Render)
}

fn draw<C: Canvas>(
    canvas: &mut C,
    samples: &[ContainerSample],
    sort: SortMode,
) -> io::Result<usize> {
    let (width, height) = canvas.size()?;
    let blank = " ".repeat(ROW_WIDTH);
    let mut row = Row { canvas, width };

    row.canvas.clear()?;
    row.put(NAME_COLUMN, HEADER_ROW, false, &blank)?;
    row.put(NAME_COLUMN, HEADER_ROW, false, &header_text(sort))?;

    row.put(NAME_COLUMN, TITLE_ROW, true, &blank)?;
    row.put(NAME_COLUMN, TITLE_ROW, true, "NAME")?;
    row.put(CPU_COLUMN, TITLE_ROW, true, "CPU %")?;
    row.put(MEM_COLUMN, TITLE_ROW, true, "MEM")?;

    let mut drawn = 0;
    for (i, sample) in samples.iter().enumerate() {
        let y = usize::from(FIRST_DATA_ROW) + i;
        if y >= usize::from(height) {
            break;
        }
        let y = y as u16;
        row.put(NAME_COLUMN, y, false, &blank)?;
        row.put(NAME_COLUMN, y, false, &sample.name)?;
        row.put(CPU_COLUMN, y, false, &sample.cpu_percent.to_string())?;
        row.put(MEM_COLUMN, y, false, &format_memory(sample.memory_bytes))?;
        drawn += 1;
    }

    row.canvas.flush()?;
    Ok(drawn)
}

/// Clips text at the right edge so nothing wraps onto the next line.
struct Row<'a, C> {
    canvas: &'a mut C,
    width: u16,
}

impl<C: Canvas> Row<'_, C> {
    fn put(&mut self, x: u16, y: u16, reverse: bool, text: &str) -> io::Result<()> {
        if x >= self.width {
            return Ok(());
        }
        let room = usize::from(self.width - x);
        match text.char_indices().nth(room) {
            Some((cut, _)) => self.canvas.print(x, y, reverse, &text[..cut]),
            None => self.canvas.print(x, y, reverse, text),
        }
    }
}
