// Control loop: sample -> render -> wait, with the wait cut short by input.
// Only the expiry of the cycle delay triggers a new sample; a sort toggle or
// resize redraws from the store right away.

use crate::error::{MonitorError, Result};
use crate::input::Command;
use crate::lxc_repo::{ContainerSource, Sampler};
use crate::models::SortMode;
use crate::render::{self, Canvas};
use crate::snapshot_store::SnapshotStore;
use tokio::sync::mpsc;
use tokio::time::{Duration, Instant, sleep_until};
use tracing::instrument;

/// Time between collection cycles.
pub const CYCLE_DELAY: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Terminating,
}

/// What is on screen and how it is ordered.
struct Display<C> {
    canvas: C,
    store: SnapshotStore,
    sort: SortMode,
}

impl<C: Canvas> Display<C> {
    fn redraw(&mut self) -> Result<usize> {
        // Copy out under the lock; drawing happens after it is released.
        let samples = self.store.snapshot()?;
        render::render(&mut self.canvas, samples, self.sort)
    }
}

pub struct ControlLoop<S, C> {
    sampler: Sampler<S>,
    display: Display<C>,
    commands: mpsc::Receiver<Command>,
    state: LoopState,
    cycles: u64,
}

impl<S: ContainerSource, C: Canvas> ControlLoop<S, C> {
    pub fn new(sampler: Sampler<S>, canvas: C, commands: mpsc::Receiver<Command>) -> Self {
        let store = sampler.store().clone();
        Self {
            sampler,
            display: Display {
                canvas,
                store,
                sort: SortMode::default(),
            },
            commands,
            state: LoopState::Running,
            cycles: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn sort_mode(&self) -> SortMode {
        self.display.sort
    }

    /// Completed collection cycles.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn canvas(&self) -> &C {
        &self.display.canvas
    }

    /// Runs until the user quits (`Ok`) or a fatal condition occurs (`Err`).
    #[instrument(name = "worker", skip(self), fields(delay_secs = CYCLE_DELAY.as_secs()))]
    pub async fn run(&mut self) -> Result<()> {
        while self.state == LoopState::Running {
            self.sample().await?;
            if self.state == LoopState::Terminating {
                break;
            }
            let rows = self.display.redraw()?;
            let sort = self.display.sort;
            tracing::debug!(rows, %sort, "table drawn");
            self.wait().await?;
        }
        tracing::info!(cycles = self.cycles, "control loop stopped");
        Ok(())
    }

    /// One collection cycle. Input is still serviced meanwhile: a quit
    /// abandons the cycle, a toggle is applied but nothing is drawn until
    /// every fetch has landed.
    async fn sample(&mut self) -> Result<()> {
        let Self {
            sampler,
            display,
            commands,
            state,
            cycles,
        } = self;
        let collect = sampler.collect();
        tokio::pin!(collect);
        loop {
            tokio::select! {
                // Collection is polled first so its fetches are always started.
                biased;
                result = &mut collect => {
                    let current = result?;
                    *cycles += 1;
                    tracing::debug!(containers = current.len(), cycle = *cycles, "sampled");
                    return Ok(());
                }
                command = commands.recv() => {
                    apply(display, state, command, false)?;
                    if *state == LoopState::Terminating {
                        return Ok(());
                    }
                }
            }
        }
    }

    async fn wait(&mut self) -> Result<()> {
        let sleep = sleep_until(Instant::now() + CYCLE_DELAY);
        tokio::pin!(sleep);
        while self.state == LoopState::Running {
            tokio::select! {
                _ = &mut sleep => return Ok(()),
                command = self.commands.recv() => {
                    apply(&mut self.display, &mut self.state, command, true)?;
                }
            }
        }
        Ok(())
    }
}

fn apply<C: Canvas>(
    screen: &mut Display<C>,
    state: &mut LoopState,
    command: Option<Command>,
    can_draw: bool,
) -> Result<()> {
    match command {
        Some(Command::ToggleSort) => {
            let sort = screen.sort.toggled();
            screen.sort = sort;
            tracing::debug!(%sort, can_draw, "sort mode toggled");
            if can_draw {
                screen.redraw()?;
            }
        }
        Some(Command::Redraw) => {
            if can_draw {
                screen.redraw()?;
            }
        }
        Some(Command::Quit) => {
            tracing::info!("quit requested");
            *state = LoopState::Terminating;
        }
        Some(Command::Failed(e)) => return Err(e),
        None => return Err(MonitorError::InputClosed),
    }
    Ok(())
}
