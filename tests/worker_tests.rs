// Control loop: cadence, early wake on input, quit and fatal paths.
// All tests run on tokio's paused clock so the 3s cadence is instant.

mod common;

use common::{FakeInfo, FakeSource, GridCanvas, info_text};
use lxc_top::error::MonitorError;
use lxc_top::input::Command;
use lxc_top::lxc_repo::Sampler;
use lxc_top::models::SortMode;
use lxc_top::snapshot_store::SnapshotStore;
use lxc_top::worker::{CYCLE_DELAY, ControlLoop, LoopState};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

fn control_loop(
    source: Arc<FakeSource>,
) -> (ControlLoop<FakeSource, GridCanvas>, mpsc::Sender<Command>) {
    let (tx, rx) = mpsc::channel(16);
    let sampler = Sampler::new(source, SnapshotStore::new());
    (ControlLoop::new(sampler, GridCanvas::new(80, 24), rx), tx)
}

fn two_containers() -> Arc<FakeSource> {
    Arc::new(FakeSource::new(&[
        ("A", FakeInfo::Text(info_text(0, 100))),
        (
            "B",
            FakeInfo::Counter {
                cpu_step_ns: 1_500_000_000,
                memory_bytes: 50,
            },
        ),
    ]))
}

#[tokio::test(start_paused = true)]
async fn quit_stops_the_loop_cleanly() {
    let source = two_containers();
    let (mut control, tx) = control_loop(source.clone());
    // Already queued: the first collection is started, then abandoned.
    tx.send(Command::Quit).await.unwrap();

    control.run().await.unwrap();
    assert_eq!(control.state(), LoopState::Terminating);
    assert_eq!(source.list_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn resamples_once_per_cycle_delay() {
    let source = two_containers();
    let (mut control, tx) = control_loop(source.clone());
    tokio::spawn(async move {
        // Cycles start at 0s, 3s and 6s.
        tokio::time::sleep(CYCLE_DELAY * 2 + Duration::from_secs(1)).await;
        let _ = tx.send(Command::Quit).await;
    });

    control.run().await.unwrap();
    assert_eq!(control.cycles(), 3);
    assert_eq!(source.list_calls(), 3);

    // B burns 1.5s of CPU per 3s cycle.
    let canvas = control.canvas();
    assert_eq!(canvas.text_at(0, 3, 10), "B");
    assert_eq!(canvas.text_at(52, 3, 5), "50");
    assert_eq!(canvas.text_at(0, 4, 10), "A");
    assert_eq!(canvas.text_at(52, 4, 5), "0");
}

#[tokio::test(start_paused = true)]
async fn toggle_redraws_immediately_without_resampling() {
    let source = two_containers();
    let (mut control, tx) = control_loop(source.clone());
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(500)).await;
        tx.send(Command::ToggleSort).await.unwrap();
        tokio::time::sleep(Duration::from_millis(500)).await;
        tx.send(Command::Quit).await.unwrap();
    });

    control.run().await.unwrap();
    assert_eq!(control.sort_mode(), SortMode::Memory);
    assert_eq!(source.list_calls(), 1);
    let canvas = control.canvas();
    assert!(canvas.row(0).ends_with("[MEM]"));
    assert_eq!(canvas.text_at(0, 3, 10), "A");
    assert_eq!(canvas.text_at(0, 4, 10), "B");
    // One draw after sampling, one for the toggle.
    assert_eq!(canvas.flushes, 2);
}

#[tokio::test(start_paused = true)]
async fn toggle_during_collection_applies_without_drawing() {
    let source = Arc::new(FakeSource::new(&[
        (
            "slow",
            FakeInfo::Delayed {
                delay: Duration::from_secs(2),
                text: info_text(0, 100),
            },
        ),
        ("big", FakeInfo::Text(info_text(0, 900))),
    ]));
    let (mut control, tx) = control_loop(source.clone());
    tokio::spawn(async move {
        // "slow" is still being fetched at 500ms.
        tokio::time::sleep(Duration::from_millis(500)).await;
        tx.send(Command::ToggleSort).await.unwrap();
        tokio::time::sleep(Duration::from_secs(2)).await;
        tx.send(Command::Quit).await.unwrap();
    });

    control.run().await.unwrap();
    assert_eq!(control.sort_mode(), SortMode::Memory);
    assert_eq!(control.cycles(), 1);
    assert_eq!(source.list_calls(), 1);
    let canvas = control.canvas();
    // Only the draw after the cycle joined, already in the toggled order.
    assert_eq!(canvas.flushes, 1);
    assert!(canvas.row(0).ends_with("[MEM]"));
    assert_eq!(canvas.text_at(0, 3, 10), "big");
    assert_eq!(canvas.text_at(0, 4, 10), "slow");
}

#[tokio::test(start_paused = true)]
async fn resize_redraws_from_store() {
    let source = two_containers();
    let (mut control, tx) = control_loop(source.clone());
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        tx.send(Command::Redraw).await.unwrap();
        tx.send(Command::Quit).await.unwrap();
    });

    control.run().await.unwrap();
    assert_eq!(control.canvas().flushes, 2);
    assert_eq!(source.list_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn quit_during_hung_collection_does_not_wait_for_timeout() {
    let source = Arc::new(FakeSource::new(&[("stuck", FakeInfo::Hang)]));
    let (mut control, tx) = control_loop(source);
    let started = tokio::time::Instant::now();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(1)).await;
        tx.send(Command::Quit).await.unwrap();
    });

    control.run().await.unwrap();
    assert!(started.elapsed() < lxc_top::lxc_repo::FETCH_TIMEOUT);
    assert_eq!(control.cycles(), 0);
}

#[tokio::test(start_paused = true)]
async fn fatal_collection_error_ends_the_loop() {
    let source = Arc::new(FakeSource::new(&[(
        "odd",
        FakeInfo::Text("CPU use:   12\n".into()),
    )]));
    let (mut control, _tx) = control_loop(source);
    let err = control.run().await.unwrap_err();
    assert!(matches!(err, MonitorError::MalformedInfo { .. }));
}

#[tokio::test(start_paused = true)]
async fn input_failure_is_fatal() {
    let (mut control, tx) = control_loop(two_containers());
    tx.send(Command::Failed(MonitorError::Input(std::io::Error::other(
        "tty closed",
    ))))
    .await
    .unwrap();
    let err = control.run().await.unwrap_err();
    assert!(matches!(err, MonitorError::Input(_)));
}

#[tokio::test(start_paused = true)]
async fn closed_input_channel_is_fatal() {
    let (mut control, tx) = control_loop(two_containers());
    drop(tx);
    let err = control.run().await.unwrap_err();
    assert!(matches!(err, MonitorError::InputClosed));
}
