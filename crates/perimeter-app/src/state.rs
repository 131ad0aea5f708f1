//! State shared between the loop thread and its callers.

use std::sync::{Arc, Mutex};

use perimeter_core::commands::OperatorCommand;
use perimeter_core::state::SimSnapshot;

/// Messages sent to the loop thread.
#[derive(Debug)]
pub enum LoopCommand {
    /// Forward to the engine; applied at the next tick boundary.
    Operator(OperatorCommand),
    /// Stop the loop and hand the engine back.
    Shutdown,
}

/// Latest snapshot for synchronous polling. `None` until the first tick.
pub type SharedSnapshot = Arc<Mutex<Option<SimSnapshot>>>;

pub fn shared_snapshot() -> SharedSnapshot {
    Arc::new(Mutex::new(None))
}

/// Clone of the latest snapshot, if any.
pub fn latest(shared: &SharedSnapshot) -> Option<SimSnapshot> {
    shared.lock().ok().and_then(|lock| lock.clone())
}
