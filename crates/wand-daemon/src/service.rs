//! Fleet service thread
//!
//! The fleet manager is single-threaded by contract, so it runs on one
//! dedicated OS thread with a fixed tick cadence. HTTP handlers reach it
//! through a command channel; published frames and fleet events leave it
//! through broadcast channels.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{error, info};
use wand_core::{ControllerId, DataFrame, FramePublisher};
use wand_fleet::{ControllerStatus, FleetEvent, FleetManager};
use wand_hid::HidTransport;

/// Host-loop cadence. The manager is purely time-gated internally, so
/// this only bounds scheduling granularity.
const TICK_INTERVAL: Duration = Duration::from_millis(1);

/// Requests crossing from the async handlers into the fleet thread
pub enum FleetCommand {
    SetRumble {
        id: u8,
        amount: f32,
        reply: oneshot::Sender<bool>,
    },
    ResetPose {
        id: u8,
        reply: oneshot::Sender<bool>,
    },
    Snapshot {
        reply: oneshot::Sender<Vec<ControllerStatus>>,
    },
}

/// Frame publisher backed by a broadcast channel. Sending never blocks
/// and a send without subscribers is not an error.
pub struct BroadcastPublisher {
    frames: broadcast::Sender<DataFrame>,
}

impl BroadcastPublisher {
    pub fn new(frames: broadcast::Sender<DataFrame>) -> Self {
        Self { frames }
    }
}

impl FramePublisher for BroadcastPublisher {
    fn publish(&mut self, frame: DataFrame) {
        let _ = self.frames.send(frame);
    }
}

/// Handle to the running fleet thread
pub struct FleetService {
    thread: Option<std::thread::JoinHandle<()>>,
    running: Arc<AtomicBool>,
}

impl FleetService {
    /// Spawn the fleet thread and run manager startup on it. Returns once
    /// startup finished; a transport failure is fatal and reported here.
    pub fn start(
        fleet_config_path: PathBuf,
        frames: broadcast::Sender<DataFrame>,
    ) -> Result<(
        Self,
        mpsc::Sender<FleetCommand>,
        broadcast::Sender<FleetEvent>,
    )> {
        let (commands_tx, commands_rx) = mpsc::channel(32);
        let running = Arc::new(AtomicBool::new(true));
        let loop_running = running.clone();
        let (startup_tx, startup_rx) = std::sync::mpsc::channel();

        let thread = std::thread::Builder::new()
            .name("wand-fleet".to_string())
            .spawn(move || {
                let publisher = BroadcastPublisher::new(frames);
                let mut manager =
                    FleetManager::new(HidTransport::new(), publisher, fleet_config_path);
                let events = manager.event_sender();

                match manager.startup() {
                    Ok(()) => {
                        let _ = startup_tx.send(Ok(events));
                    }
                    Err(e) => {
                        let _ = startup_tx.send(Err(e));
                        return;
                    }
                }

                run(manager, commands_rx, loop_running);
            })
            .context("failed to spawn fleet thread")?;

        let events = startup_rx
            .recv()
            .context("fleet thread exited before reporting startup")?
            .context("failed to start fleet manager")?;

        Ok((
            Self {
                thread: Some(thread),
                running,
            },
            commands_tx,
            events,
        ))
    }

    /// Stop the loop and wait for the manager's shutdown to finish
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                error!("Fleet thread panicked");
            }
        }
    }
}

fn run(
    mut manager: FleetManager<HidTransport, BroadcastPublisher>,
    mut commands: mpsc::Receiver<FleetCommand>,
    running: Arc<AtomicBool>,
) {
    info!("Fleet loop started");

    while running.load(Ordering::Relaxed) {
        while let Ok(command) = commands.try_recv() {
            handle_command(&mut manager, command);
        }

        manager.update();
        std::thread::sleep(TICK_INTERVAL);
    }

    manager.shutdown();
    info!("Fleet loop stopped");
}

fn handle_command(
    manager: &mut FleetManager<HidTransport, BroadcastPublisher>,
    command: FleetCommand,
) {
    match command {
        FleetCommand::SetRumble { id, amount, reply } => {
            let _ = reply.send(manager.set_rumble(ControllerId(id), amount));
        }
        FleetCommand::ResetPose { id, reply } => {
            let _ = reply.send(manager.reset_pose(ControllerId(id)));
        }
        FleetCommand::Snapshot { reply } => {
            let _ = reply.send(manager.snapshot());
        }
    }
}
