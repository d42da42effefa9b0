// Shared test helpers: a scripted container source and an in-memory screen.

#![allow(dead_code)]

use lxc_top::error::{MonitorError, Result};
use lxc_top::lxc_repo::ContainerSource;
use lxc_top::render::Canvas;
use std::collections::HashMap;
use std::io;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// How a fake container answers an info request.
#[derive(Debug, Clone)]
pub enum FakeInfo {
    /// Fixed text every time.
    Text(String),
    /// Running container whose CPU counter grows by `cpu_step_ns` per call.
    Counter { cpu_step_ns: u64, memory_bytes: u64 },
    /// Answers with `text` once `delay` has passed.
    Delayed { delay: Duration, text: String },
    /// Never answers.
    Hang,
    /// Non-zero exit.
    Fail,
}

pub struct FakeSource {
    list_output: String,
    infos: HashMap<String, FakeInfo>,
    info_calls: Mutex<HashMap<String, u64>>,
    list_calls: AtomicUsize,
}

impl FakeSource {
    pub fn new(containers: &[(&str, FakeInfo)]) -> Self {
        let list_output = containers
            .iter()
            .map(|(name, _)| format!("{}\n", name))
            .collect();
        Self::with_list_output(list_output, containers)
    }

    pub fn with_list_output(list_output: String, containers: &[(&str, FakeInfo)]) -> Self {
        Self {
            list_output,
            infos: containers
                .iter()
                .map(|(name, info)| (name.to_string(), info.clone()))
                .collect(),
            info_calls: Mutex::new(HashMap::new()),
            list_calls: AtomicUsize::new(0),
        }
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

pub fn info_text(cpu_time_ns: u64, memory_bytes: u64) -> String {
    format!(
        "Name:           x\nState:          RUNNING\nCPU use:        {}\nBlkIO use:      0\nMemory use:     {}\n",
        cpu_time_ns, memory_bytes
    )
}

pub fn stopped_text() -> String {
    "Name:           x\nState:          STOPPED\n".to_string()
}

impl ContainerSource for FakeSource {
    fn list_program(&self) -> &str {
        "fake-ls"
    }

    async fn list(&self) -> Result<String> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.list_output.clone())
    }

    async fn info(&self, name: &str) -> Result<String> {
        let call = {
            let mut calls = self.info_calls.lock().unwrap();
            let n = calls.entry(name.to_string()).or_insert(0);
            *n += 1;
            *n
        };
        match self.infos.get(name).cloned() {
            Some(FakeInfo::Text(text)) => Ok(text),
            Some(FakeInfo::Counter {
                cpu_step_ns,
                memory_bytes,
            }) => Ok(info_text(cpu_step_ns * call, memory_bytes)),
            Some(FakeInfo::Delayed { delay, text }) => {
                tokio::time::sleep(delay).await;
                Ok(text)
            }
            Some(FakeInfo::Hang) => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(String::new())
            }
            Some(FakeInfo::Fail) | None => Err(MonitorError::FetchFailed {
                name: name.to_string(),
                status: "exit status: 1".into(),
                output: "no such container".into(),
            }),
        }
    }
}

/// Character grid recording what was drawn and in which attribute.
pub struct GridCanvas {
    width: u16,
    height: u16,
    cells: HashMap<(u16, u16), (char, bool)>,
    pub flushes: usize,
}

impl GridCanvas {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: HashMap::new(),
            flushes: 0,
        }
    }

    /// Row contents with trailing blanks removed.
    pub fn row(&self, y: u16) -> String {
        let line: String = (0..self.width)
            .map(|x| self.cells.get(&(x, y)).map_or(' ', |(c, _)| *c))
            .collect();
        line.trim_end().to_string()
    }

    pub fn text_at(&self, x: u16, y: u16, len: u16) -> String {
        (x..x + len)
            .map(|x| self.cells.get(&(x, y)).map_or(' ', |(c, _)| *c))
            .collect::<String>()
            .trim_end()
            .to_string()
    }

    pub fn is_reversed(&self, x: u16, y: u16) -> bool {
        self.cells.get(&(x, y)).is_some_and(|(_, r)| *r)
    }

    /// Rows from the first data row down that contain anything.
    pub fn data_rows(&self) -> usize {
        (3..self.height).filter(|y| !self.row(*y).is_empty()).count()
    }
}

impl Canvas for GridCanvas {
    fn size(&self) -> io::Result<(u16, u16)> {
        Ok((self.width, self.height))
    }

    fn clear(&mut self) -> io::Result<()> {
        self.cells.clear();
        Ok(())
    }

    fn print(&mut self, x: u16, y: u16, reverse: bool, text: &str) -> io::Result<()> {
        for (i, c) in text.chars().enumerate() {
            let cx = x + i as u16;
            if cx >= self.width || y >= self.height {
                return Err(io::Error::other(format!("draw outside grid at ({cx}, {y})")));
            }
            self.cells.insert((cx, y), (c, reverse));
        }
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flushes += 1;
        Ok(())
    }
}
