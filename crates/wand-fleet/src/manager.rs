//! Fleet manager facade driving the reconciliation and poll passes

use std::path::PathBuf;
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};
use wand_core::{ControllerId, DataFrame, FramePublisher};
use wand_hid::{HidError, ReadResult, Transport};

use crate::config::FleetConfig;
use crate::events::FleetEvent;
use crate::pool::{SlotPool, MAX_CONTROLLERS};

/// Per-slot status for the service surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControllerStatus {
    pub id: ControllerId,
    pub open: bool,
    pub path: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Created,
    Running,
    ShutDown,
}

/// Owns the slot pool and drives the two independently time-gated passes.
///
/// Single-threaded: every transport call and every slot mutation happens
/// on the caller's thread, inside `startup`, `update`, or `shutdown`.
/// The external host loop decides the call cadence; the manager is
/// purely time-gated against the clock it reads.
pub struct FleetManager<T: Transport, P: FramePublisher> {
    transport: T,
    publisher: P,
    pool: SlotPool<T::Device>,
    config: FleetConfig,
    config_path: PathBuf,
    events: broadcast::Sender<FleetEvent>,
    sequence: u32,
    last_poll: Option<Instant>,
    last_reconcile: Option<Instant>,
    lifecycle: Lifecycle,
}

impl<T: Transport, P: FramePublisher> FleetManager<T, P> {
    pub fn new(transport: T, publisher: P, config_path: PathBuf) -> Self {
        let (events, _) = broadcast::channel(256);
        Self {
            transport,
            publisher,
            pool: SlotPool::new(MAX_CONTROLLERS),
            config: FleetConfig::default(),
            config_path,
            events,
            sequence: 0,
            last_poll: None,
            last_reconcile: None,
            lifecycle: Lifecycle::Created,
        }
    }

    /// Subscribe to fleet events. Every event is also logged.
    pub fn subscribe(&self) -> broadcast::Receiver<FleetEvent> {
        self.events.subscribe()
    }

    /// Sender side of the event channel, for fan-out surfaces that
    /// subscribe per consumer
    pub fn event_sender(&self) -> broadcast::Sender<FleetEvent> {
        self.events.clone()
    }

    pub fn config(&self) -> &FleetConfig {
        &self.config
    }

    /// Load the persisted configuration and bring up the transport.
    /// Transport failure is fatal: the manager does not enter Running.
    pub fn startup(&mut self) -> Result<(), HidError> {
        self.config = FleetConfig::load(&self.config_path);
        self.transport.initialize()?;
        self.lifecycle = Lifecycle::Running;
        info!(
            poll_ms = self.config.controller_poll_interval,
            reconnect_ms = self.config.controller_reconnect_interval,
            slots = self.pool.capacity(),
            "Fleet manager started"
        );
        Ok(())
    }

    /// Drive both time-gated passes against the current time.
    ///
    /// Each pass runs zero or one time per call; a starved caller sheds
    /// backlog (timestamps advance to now) instead of bursting to catch
    /// up missed intervals.
    pub fn update(&mut self) {
        self.update_at(Instant::now());
    }

    fn update_at(&mut self, now: Instant) {
        if self.lifecycle != Lifecycle::Running {
            return;
        }

        if due(self.last_poll, self.config.poll_interval(), now) {
            self.poll_pass();
            self.last_poll = Some(now);
        }

        if due(self.last_reconcile, self.config.reconnect_interval(), now) {
            self.reconcile_pass();
            self.last_reconcile = Some(now);
        }
    }

    /// Persist the configuration, close every open controller, and tear
    /// the transport down. Safe to call in any state; repeat calls are
    /// no-ops and Running is never re-entered.
    pub fn shutdown(&mut self) {
        if self.lifecycle == Lifecycle::ShutDown {
            return;
        }

        if let Err(e) = self.config.save(&self.config_path) {
            error!(
                path = %self.config_path.display(),
                error = %e,
                "Failed to save fleet configuration"
            );
        }

        for index in 0..self.pool.capacity() {
            if let Some(handle) = self.pool.handle_mut(index) {
                handle.close(&mut self.transport);
            }
        }

        self.transport.shutdown();
        self.lifecycle = Lifecycle::ShutDown;
        info!("Fleet manager shut down");
    }

    /// Pass-through rumble action, kept as an explicit extension point
    pub fn set_rumble(&mut self, id: ControllerId, amount: f32) -> bool {
        debug!(controller = %id, amount, "Rumble not supported");
        false
    }

    /// Pass-through pose reset action, kept as an explicit extension point
    pub fn reset_pose(&mut self, id: ControllerId) -> bool {
        debug!(controller = %id, "Pose reset not supported");
        false
    }

    /// Per-slot status snapshot
    pub fn snapshot(&self) -> Vec<ControllerStatus> {
        (0..self.pool.capacity())
            .filter_map(|index| self.pool.handle(index))
            .map(|handle| ControllerStatus {
                id: handle.id(),
                open: handle.is_open(),
                path: handle.path().map(str::to_owned),
            })
            .collect()
    }

    /// Read every open controller once. New samples become published
    /// frames; a failed read closes the controller immediately rather
    /// than waiting for the next reconciliation pass.
    fn poll_pass(&mut self) {
        for index in 0..self.pool.capacity() {
            let Some(handle) = self.pool.handle_mut(index) else {
                continue;
            };
            if !handle.is_open() {
                continue;
            }

            match handle.read(&mut self.transport) {
                ReadResult::NoData => {}
                ReadResult::NewData(_) => {
                    let frame =
                        DataFrame::from_sample(handle.id(), self.sequence, handle.sample());
                    self.sequence = self.sequence.wrapping_add(1);
                    self.publisher.publish(frame);
                }
                ReadResult::Failure => {
                    info!(controller = %handle.id(), "Closing controller after failed read");
                    handle.close(&mut self.transport);
                    let _ = self
                        .events
                        .send(FleetEvent::ControllerReadFailed { id: handle.id() });
                }
            }
        }
    }

    /// One reconciliation pass: rewrite the pool so connected devices
    /// occupy slots in enumeration order, opening the newly seen and
    /// closing the vanished. No handle is created or destroyed, only
    /// moved between slots.
    fn reconcile_pass(&mut self) {
        let descriptors = match self.transport.enumerate() {
            Ok(descriptors) => descriptors,
            Err(e) => {
                warn!(error = %e, "Device enumeration failed, keeping current slots");
                return;
            }
        };

        let mut destination = SlotPool::vacant(self.pool.capacity());
        let mut next = 0usize;
        let mut capacity_reported = false;

        for descriptor in &descriptors {
            if let Some(index) = self.pool.find_open(descriptor) {
                // Known device; move it to the slot matching its position
                // in this pass's enumeration order.
                let Some(handle) = self.pool.take(index) else {
                    continue;
                };
                if index != next {
                    info!(from = index, to = next, "Controller changed logical id");
                    let _ = self.events.send(FleetEvent::ControllerMoved {
                        from: ControllerId(index as u8),
                        to: ControllerId(next as u8),
                    });
                }
                destination.place(next, handle);
                next += 1;
            } else if let Some(index) = self.pool.first_closed() {
                // Newly seen device; any closed handle may host it. The
                // slot reserves the device even when the open fails.
                let Some(mut handle) = self.pool.take(index) else {
                    continue;
                };
                handle.set_id(ControllerId(next as u8));
                if handle.open(&mut self.transport, descriptor) {
                    info!(controller = next, path = %descriptor.path, "Controller connected");
                    let _ = self.events.send(FleetEvent::ControllerConnected {
                        id: ControllerId(next as u8),
                    });
                } else {
                    let _ = self.events.send(FleetEvent::ControllerOpenFailed {
                        id: ControllerId(next as u8),
                        path: descriptor.path.clone(),
                    });
                }
                destination.place(next, handle);
                next += 1;
            } else {
                // No slot left. Report once per pass, then keep walking
                // the enumerator so already-open devices that enumerate
                // after the excess one still get matched.
                if !capacity_reported {
                    error!(path = %descriptor.path, "No free controller slot, device left unmanaged");
                    let _ = self.events.send(FleetEvent::CapacityExceeded);
                    capacity_reported = true;
                }
            }
        }

        // Anything still in the old pool was absent from this pass. Open
        // handles get force-closed; polling normally catches disappearance
        // first, so this is the safety net. Closed handles trail behind
        // all connected ones, in original-index order.
        for index in 0..self.pool.capacity() {
            let Some(mut handle) = self.pool.take(index) else {
                continue;
            };
            if handle.is_open() {
                warn!(controller = %handle.id(), "Controller vanished from enumeration, closing");
                handle.close(&mut self.transport);
                let _ = self
                    .events
                    .send(FleetEvent::ControllerVanished { id: handle.id() });
            }
            destination.place(next, handle);
            next += 1;
        }

        self.pool = destination;
    }
}

fn due(last: Option<Instant>, interval: Duration, now: Instant) -> bool {
    match last {
        Some(last) => now.saturating_duration_since(last) >= interval,
        None => true,
    }
}
