//! Dial-in control surface: call a specific taxi to a pickup cell.
//!
//! The surface may run on any thread (a UI, a REPL). To keep the model
//! single-writer, dials are not applied concurrently: they are queued on a
//! channel and drained by [`crate::systems::dial_intake`] at the start of
//! the next tick, before aging and new demand.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Mutex;

use bevy_ecs::prelude::Resource;

/// Outcome of a dial, reported back to the caller. Recoverable, user-facing
/// values — never errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialOutcome {
    /// The taxi was idle and is now headed to the pickup.
    Success,
    /// The taxi exists but is en route or carrying.
    Busy,
    /// No vehicle with that identifier; counted as a missed pickup.
    UnknownId,
    /// The admission cap is full; the request never materialized.
    Saturated,
}

/// One queued dial. `x`/`y` are grid coordinates already validated by the
/// surface against the grid bounds.
#[derive(Debug)]
pub struct DialCommand {
    pub vehicle_id: String,
    pub x: u32,
    pub y: u32,
    pub reply: Sender<DialOutcome>,
}

/// Caller-side handle. Clonable and usable from any thread.
#[derive(Debug, Clone)]
pub struct DialEndpoint {
    commands: Sender<DialCommand>,
}

impl DialEndpoint {
    /// Queue a dial and block until the next tick reports the outcome.
    /// Returns `None` when the simulation side has shut down.
    pub fn dial(&self, vehicle_id: &str, x: u32, y: u32) -> Option<DialOutcome> {
        let reply = self.try_dial(vehicle_id, x, y)?;
        reply.recv().ok()
    }

    /// Queue a dial without waiting; the outcome arrives on the returned
    /// receiver once a tick has processed it.
    pub fn try_dial(&self, vehicle_id: &str, x: u32, y: u32) -> Option<Receiver<DialOutcome>> {
        let (reply_tx, reply_rx) = channel();
        let command = DialCommand {
            vehicle_id: vehicle_id.to_string(),
            x,
            y,
            reply: reply_tx,
        };
        self.commands.send(command).ok()?;
        Some(reply_rx)
    }
}

/// Simulation-side end of the dial channel. The mutex only serializes the
/// receiver handle; commands are consumed at one defined point per tick.
#[derive(Resource)]
pub struct DialQueue {
    receiver: Mutex<Receiver<DialCommand>>,
}

impl DialQueue {
    /// Take everything queued since the last tick.
    pub fn drain(&self) -> Vec<DialCommand> {
        let receiver = self
            .receiver
            .lock()
            .expect("dial queue mutex poisoned");
        receiver.try_iter().collect()
    }
}

/// Build the two ends of a dial channel.
pub fn dial_channel() -> (DialEndpoint, DialQueue) {
    let (tx, rx) = channel();
    (
        DialEndpoint { commands: tx },
        DialQueue {
            receiver: Mutex::new(rx),
        },
    )
}
