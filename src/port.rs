//! A logical MIDI endpoint owned by one track/instrument.
//!
//! A `MidiPort` is bound to exactly one transport client and one event
//! consumer for its whole lifetime. It filters and remaps events in both
//! directions, derives its effective mode from two independent enable
//! toggles, and tracks which of the transport's external ports are
//! subscribed per direction.
//!
//! Locking discipline: all mutable state sits behind one `RwLock`. Routing
//! takes a short read lock to decide the masking outcome and releases it
//! before calling the consumer/transport; control-path mutations take the
//! write lock, collect the required collaborator calls into a local buffer,
//! release, then perform them. No lock is ever held across a collaborator
//! call.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::Receiver;
use parking_lot::RwLock;
use smallvec::SmallVec;
use tracing::debug;

use crate::client::{MidiClient, MidiEventProcessor};
use crate::error::Result;
use crate::event::{MidiEvent, MidiTime};
use crate::filter;
use crate::mode::PortMode;
use crate::notify::{ChangeBus, PortChange};
use crate::selection::SubscriptionMap;

pub struct MidiPort {
    client: Arc<dyn MidiClient>,
    processor: Arc<dyn MidiEventProcessor>,
    state: RwLock<PortState>,
    changes: ChangeBus,
    registered: AtomicBool,
}

#[derive(Debug)]
struct PortState {
    name: String,
    mode: PortMode,
    input_enabled: bool,
    output_enabled: bool,
    input_channel: u8,
    output_channel: u8,
    input_controller: u8,
    output_controller: u8,
    fixed_input_velocity: Option<u8>,
    fixed_output_velocity: Option<u8>,
    output_program: u8,
    readable_ports: SubscriptionMap,
    writable_ports: SubscriptionMap,
}

impl MidiPort {
    /// Create a port and register it with the transport. The initial `mode`
    /// seeds the two enable toggles.
    ///
    /// Fails only if the transport refuses the registration; a port without
    /// a transport handle cannot exist.
    pub fn new(
        name: impl Into<String>,
        client: Arc<dyn MidiClient>,
        processor: Arc<dyn MidiEventProcessor>,
        mode: PortMode,
    ) -> Result<Arc<Self>> {
        let port = Arc::new(Self {
            client,
            processor,
            state: RwLock::new(PortState {
                name: name.into(),
                mode,
                input_enabled: mode.input_enabled(),
                output_enabled: mode.output_enabled(),
                input_channel: 0,
                output_channel: 1,
                input_controller: 0,
                output_controller: 0,
                fixed_input_velocity: None,
                fixed_output_velocity: None,
                output_program: 1,
                readable_ports: SubscriptionMap::new(),
                writable_ports: SubscriptionMap::new(),
            }),
            changes: ChangeBus::new(),
            registered: AtomicBool::new(false),
        });

        port.client.add_port(&port)?;
        port.registered.store(true, Ordering::Release);

        // Raw clients have no discrete named ports to enumerate.
        if !port.client.is_raw() {
            port.update_readable_ports();
            port.update_writable_ports();
        }
        port.update_mode();

        debug!("registered MIDI port '{}'", port.name());
        Ok(port)
    }

    // ==================== Mode State Machine ====================

    /// Enable or disable the input direction. Disabling force-unsubscribes
    /// every readable port still subscribed.
    pub fn set_input_enabled(&self, enabled: bool) {
        {
            let mut st = self.state.write();
            if st.input_enabled == enabled {
                return;
            }
            st.input_enabled = enabled;
        }
        self.update_mode();
    }

    /// Enable or disable the output direction. Disabling force-unsubscribes
    /// every writable port still subscribed.
    pub fn set_output_enabled(&self, enabled: bool) {
        {
            let mut st = self.state.write();
            if st.output_enabled == enabled {
                return;
            }
            st.output_enabled = enabled;
        }
        self.update_mode();
    }

    /// Re-derive the effective mode from the toggles and apply the
    /// transition side effects: push the mode to the transport, explicitly
    /// unsubscribe entries of a now-disabled direction, then notify
    /// observers (readable, writable, mode, dirtied - in that order).
    fn update_mode(&self) {
        let (mode, dropped_readable, dropped_writable) = {
            let mut st = self.state.write();
            st.mode = PortMode::derive(st.input_enabled, st.output_enabled);

            let mut dropped_readable: SmallVec<[String; 4]> = SmallVec::new();
            if !st.input_enabled {
                dropped_readable.extend(st.readable_ports.subscribed().map(str::to_owned));
                for id in &dropped_readable {
                    st.readable_ports.set(id, false);
                }
            }
            let mut dropped_writable: SmallVec<[String; 4]> = SmallVec::new();
            if !st.output_enabled {
                dropped_writable.extend(st.writable_ports.subscribed().map(str::to_owned));
                for id in &dropped_writable {
                    st.writable_ports.set(id, false);
                }
            }
            (st.mode, dropped_readable, dropped_writable)
        };

        self.client.apply_port_mode(self);
        for id in &dropped_readable {
            self.client.subscribe_readable_port(self, id, false);
        }
        for id in &dropped_writable {
            self.client.subscribe_writable_port(self, id, false);
        }

        debug!("MIDI port '{}' mode -> {:?}", self.name(), mode);
        self.changes.notify(PortChange::ReadablePortsChanged);
        self.changes.notify(PortChange::WritablePortsChanged);
        self.changes.notify(PortChange::ModeChanged);
        self.changes.notify(PortChange::StateDirtied);
    }

    // ==================== Subscription Registry ====================

    /// Mark a readable external port (un)subscribed and forward the request
    /// to the transport. Subscribing while input is disabled enables it
    /// first.
    pub fn set_readable_subscribed(&self, id: &str, subscribe: bool) {
        if self.client.is_raw() {
            return;
        }
        let enable = {
            let mut st = self.state.write();
            st.readable_ports.set(id, subscribe);
            subscribe && !st.input_enabled
        };
        if enable {
            self.set_input_enabled(true);
        }
        debug!(
            "MIDI port '{}': readable '{}' -> {}",
            self.name(),
            id,
            subscribe
        );
        self.client.subscribe_readable_port(self, id, subscribe);
    }

    /// Mark a writable external port (un)subscribed and forward the request
    /// to the transport. Subscribing while output is disabled enables it
    /// first.
    pub fn set_writable_subscribed(&self, id: &str, subscribe: bool) {
        if self.client.is_raw() {
            return;
        }
        let enable = {
            let mut st = self.state.write();
            st.writable_ports.set(id, subscribe);
            subscribe && !st.output_enabled
        };
        if enable {
            self.set_output_enabled(true);
        }
        debug!(
            "MIDI port '{}': writable '{}' -> {}",
            self.name(),
            id,
            subscribe
        );
        self.client.subscribe_writable_port(self, id, subscribe);
    }

    /// Rebuild the readable-port registry from the transport's current list,
    /// preserving the subscription state of identifiers that survived.
    /// Called by the transport when its readable list changes.
    pub fn update_readable_ports(&self) {
        if self.client.is_raw() {
            return;
        }
        let ids = self.client.readable_ports();
        {
            let mut st = self.state.write();
            let rebuilt = st.readable_ports.reconcile(&ids);
            st.readable_ports = rebuilt;
        }
        debug!("MIDI port '{}': {} readable ports", self.name(), ids.len());
        self.changes.notify(PortChange::ReadablePortsChanged);
    }

    /// Rebuild the writable-port registry from the transport's current list.
    /// Called by the transport when its writable list changes.
    pub fn update_writable_ports(&self) {
        if self.client.is_raw() {
            return;
        }
        let ids = self.client.writable_ports();
        {
            let mut st = self.state.write();
            let rebuilt = st.writable_ports.reconcile(&ids);
            st.writable_ports = rebuilt;
        }
        debug!("MIDI port '{}': {} writable ports", self.name(), ids.len());
        self.changes.notify(PortChange::WritablePortsChanged);
    }

    // ==================== Event Routing ====================

    /// Inbound path: mask an external event (0-indexed wire channel) and
    /// forward it to the consumer. Pure synchronous filter/forward, never
    /// queues.
    pub fn process_in_event(&self, event: MidiEvent, time: MidiTime) {
        let forwarded = {
            let st = self.state.read();
            if !st.input_enabled || !filter::accepts_input_channel(st.input_channel, event.channel)
            {
                None
            } else if matches!(event.key(), Some(key) if !filter::key_in_range(key)) {
                None
            } else {
                Some(filter::apply_fixed_input_velocity(
                    event,
                    st.fixed_input_velocity,
                ))
            }
        };
        if let Some(event) = forwarded {
            self.processor.process_in_event(event, time);
        }
    }

    /// Outbound path: mask an internal event (1-indexed channel), renumber
    /// it to the wire convention and hand it to the transport.
    pub fn process_out_event(&self, event: MidiEvent, time: MidiTime) {
        let forwarded = {
            let st = self.state.read();
            if st.output_enabled && st.output_channel == event.channel {
                let wire = event.with_channel(filter::to_wire_channel(event.channel));
                Some(filter::apply_fixed_output_velocity(
                    wire,
                    st.fixed_output_velocity,
                ))
            } else {
                None
            }
        };
        if let Some(event) = forwarded {
            self.client.process_out_event(event, time, self);
        }
    }

    // ==================== Settings ====================

    pub fn set_name(&self, name: impl Into<String>) {
        self.state.write().name = name.into();
        self.client.apply_port_name(self);
    }

    /// Input channel mask, 0-16. 0 accepts any channel (omni).
    pub fn set_input_channel(&self, channel: u8) {
        self.state.write().input_channel = channel.min(16);
    }

    /// Output channel, 1-16.
    pub fn set_output_channel(&self, channel: u8) {
        self.state.write().output_channel = channel.clamp(1, 16);
    }

    pub fn set_input_controller(&self, controller: u8) {
        self.state.write().input_controller = controller.min(127);
    }

    pub fn set_output_controller(&self, controller: u8) {
        self.state.write().output_controller = controller.min(127);
    }

    /// Fixed inbound velocity; `None` passes velocities through unmodified.
    pub fn set_fixed_input_velocity(&self, velocity: Option<u8>) {
        self.state.write().fixed_input_velocity = velocity.map(|v| v.min(127));
    }

    /// Fixed outbound velocity; `None` passes velocities through unmodified.
    pub fn set_fixed_output_velocity(&self, velocity: Option<u8>) {
        self.state.write().fixed_output_velocity = velocity.map(|v| v.min(127));
    }

    /// Set the output MIDI program, 1-128, and immediately transmit the
    /// matching program-change event through the outbound path.
    pub fn set_output_program(&self, program: u8) {
        let (channel, program) = {
            let mut st = self.state.write();
            st.output_program = program.clamp(1, 128);
            (st.output_channel, st.output_program)
        };
        self.process_out_event(
            MidiEvent::program_change(channel, program - 1),
            MidiTime::ZERO,
        );
    }

    // ==================== Accessors ====================

    pub fn name(&self) -> String {
        self.state.read().name.clone()
    }

    pub fn mode(&self) -> PortMode {
        self.state.read().mode
    }

    pub fn input_enabled(&self) -> bool {
        self.state.read().input_enabled
    }

    pub fn output_enabled(&self) -> bool {
        self.state.read().output_enabled
    }

    pub fn input_channel(&self) -> u8 {
        self.state.read().input_channel
    }

    pub fn output_channel(&self) -> u8 {
        self.state.read().output_channel
    }

    pub fn input_controller(&self) -> u8 {
        self.state.read().input_controller
    }

    pub fn output_controller(&self) -> u8 {
        self.state.read().output_controller
    }

    pub fn fixed_input_velocity(&self) -> Option<u8> {
        self.state.read().fixed_input_velocity
    }

    pub fn fixed_output_velocity(&self) -> Option<u8> {
        self.state.read().fixed_output_velocity
    }

    pub fn output_program(&self) -> u8 {
        self.state.read().output_program
    }

    /// Snapshot of the readable-port registry.
    pub fn readable_ports(&self) -> SubscriptionMap {
        self.state.read().readable_ports.clone()
    }

    /// Snapshot of the writable-port registry.
    pub fn writable_ports(&self) -> SubscriptionMap {
        self.state.read().writable_ports.clone()
    }

    /// Register an observer; it receives every subsequent [`PortChange`] on
    /// its own channel.
    pub fn subscribe_changes(&self) -> Receiver<PortChange> {
        self.changes.subscribe()
    }

    pub(crate) fn emit(&self, change: PortChange) {
        self.changes.notify(change);
    }
}

impl Drop for MidiPort {
    fn drop(&mut self) {
        // Never registered (construction failed), nothing to undo.
        if !self.registered.load(Ordering::Acquire) {
            return;
        }
        // Force both directions off so everything is unsubscribed, then
        // deregister from the transport.
        self.set_input_enabled(false);
        self.set_output_enabled(false);
        self.client.remove_port(self);
    }
}

impl fmt::Debug for MidiPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let st = self.state.read();
        f.debug_struct("MidiPort")
            .field("name", &st.name)
            .field("mode", &st.mode)
            .field("readable_ports", &st.readable_ports.len())
            .field("writable_ports", &st.writable_ports.len())
            .finish()
    }
}
