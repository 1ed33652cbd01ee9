//! Collaborator seams: the external MIDI transport and the internal
//! event consumer.
//!
//! Both traits sit on the event-processing path and are called synchronously
//! from it, so implementations must not block (no I/O, no blocking waits).

use std::sync::Arc;

use crate::error::Result;
use crate::event::{MidiEvent, MidiTime};
use crate::port::MidiPort;

/// The internal consumer a port forwards accepted inbound events to,
/// typically an instrument or track.
pub trait MidiEventProcessor: Send + Sync {
    /// Called once per accepted inbound event, synchronously on the
    /// transport's processing thread.
    fn process_in_event(&self, event: MidiEvent, time: MidiTime);
}

/// The external MIDI backend a port routes through.
///
/// A port registers itself via [`add_port`](MidiClient::add_port) at
/// construction and deregisters on drop. Implementations should retain at
/// most a `Weak` reference to registered ports, and are expected to call
/// [`MidiPort::update_readable_ports`] / [`MidiPort::update_writable_ports`]
/// on them whenever the corresponding available-port list changes.
///
/// Subscription calls are requests; the transport is the authority on
/// whether the physical subscription succeeds, and failures there are a
/// transport-level concern, not surfaced back through this seam.
pub trait MidiClient: Send + Sync {
    /// Register a port with the transport. Failure aborts port construction.
    fn add_port(&self, port: &Arc<MidiPort>) -> Result<()>;

    fn remove_port(&self, port: &MidiPort);

    /// The port's display name changed.
    fn apply_port_name(&self, port: &MidiPort);

    /// The port's effective mode changed.
    fn apply_port_mode(&self, port: &MidiPort);

    /// Currently available readable external ports, in enumeration order.
    fn readable_ports(&self) -> Vec<String>;

    /// Currently available writable external ports, in enumeration order.
    fn writable_ports(&self) -> Vec<String>;

    /// Request a physical (un)subscription of a readable external port.
    fn subscribe_readable_port(&self, port: &MidiPort, id: &str, subscribe: bool);

    /// Request a physical (un)subscription of a writable external port.
    fn subscribe_writable_port(&self, port: &MidiPort, id: &str, subscribe: bool);

    /// Hand an outbound event to the transport, tagged with its origin port.
    /// The event is already on the 0-indexed wire channel convention.
    fn process_out_event(&self, event: MidiEvent, time: MidiTime, origin: &MidiPort);

    /// Raw clients have no discrete named ports; ports bound to one skip all
    /// enumeration and subscription bookkeeping.
    fn is_raw(&self) -> bool {
        false
    }
}
