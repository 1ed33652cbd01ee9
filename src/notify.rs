//! Typed change notifications with explicit observer registration.
//!
//! Observers register through [`MidiPort::subscribe_changes`] and receive
//! [`PortChange`] values on their own channel. Dispatch is an immediate,
//! non-blocking fan-out; there is no scheduling and nothing to cancel.
//!
//! [`MidiPort::subscribe_changes`]: crate::MidiPort::subscribe_changes

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;

/// A state change other components may want to react to (GUI refresh,
/// document dirty tracking).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PortChange {
    ReadablePortsChanged,
    WritablePortsChanged,
    ModeChanged,
    /// The port diverged from its last saved state. Emitted after every mode
    /// transition; the owning document layer decides what to do with it.
    StateDirtied,
}

#[derive(Default)]
pub(crate) struct ChangeBus {
    subscribers: Mutex<Vec<Sender<PortChange>>>,
}

impl ChangeBus {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn subscribe(&self) -> Receiver<PortChange> {
        let (tx, rx) = unbounded();
        self.subscribers.lock().push(tx);
        rx
    }

    /// Fan a change out to every live observer. Observers that dropped their
    /// receiver are pruned on the way.
    pub(crate) fn notify(&self, change: PortChange) {
        self.subscribers.lock().retain(|tx| tx.send(change).is_ok());
    }
}
