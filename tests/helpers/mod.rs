//! Shared mock collaborators for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use seqport::{MidiClient, MidiEvent, MidiEventProcessor, MidiPort, MidiTime, Result};

/// What the mock transport was asked to do, in call order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClientCall {
    AddPort,
    RemovePort,
    ApplyPortName,
    ApplyPortMode,
    SubscribeReadable(String, bool),
    SubscribeWritable(String, bool),
}

/// Mock transport that records every request and keeps weak handles to the
/// ports registered with it, like a real client would.
#[derive(Default)]
pub struct RecordingClient {
    pub raw: bool,
    pub readable: Mutex<Vec<String>>,
    pub writable: Mutex<Vec<String>>,
    pub calls: Mutex<Vec<ClientCall>>,
    pub out_events: Mutex<Vec<(MidiEvent, MidiTime, String)>>,
    pub ports: Mutex<Vec<Weak<MidiPort>>>,
}

impl RecordingClient {
    pub fn with_ports(readable: &[&str], writable: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            readable: Mutex::new(readable.iter().map(|s| s.to_string()).collect()),
            writable: Mutex::new(writable.iter().map(|s| s.to_string()).collect()),
            ..Self::default()
        })
    }

    /// Replace the readable list and notify registered ports, the way a real
    /// transport reacts to a device change.
    pub fn announce_readable(&self, ids: &[&str]) {
        *self.readable.lock() = ids.iter().map(|s| s.to_string()).collect();
        let ports: Vec<_> = self.ports.lock().iter().filter_map(Weak::upgrade).collect();
        for port in ports {
            port.update_readable_ports();
        }
    }

    /// Replace the writable list and notify registered ports.
    pub fn announce_writable(&self, ids: &[&str]) {
        *self.writable.lock() = ids.iter().map(|s| s.to_string()).collect();
        let ports: Vec<_> = self.ports.lock().iter().filter_map(Weak::upgrade).collect();
        for port in ports {
            port.update_writable_ports();
        }
    }

    /// Only the subscription requests, in call order.
    pub fn subscribe_calls(&self) -> Vec<ClientCall> {
        self.calls
            .lock()
            .iter()
            .filter(|call| {
                matches!(
                    call,
                    ClientCall::SubscribeReadable(..) | ClientCall::SubscribeWritable(..)
                )
            })
            .cloned()
            .collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }
}

impl MidiClient for RecordingClient {
    fn add_port(&self, port: &Arc<MidiPort>) -> Result<()> {
        self.ports.lock().push(Arc::downgrade(port));
        self.calls.lock().push(ClientCall::AddPort);
        Ok(())
    }

    fn remove_port(&self, _port: &MidiPort) {
        self.calls.lock().push(ClientCall::RemovePort);
    }

    fn apply_port_name(&self, _port: &MidiPort) {
        self.calls.lock().push(ClientCall::ApplyPortName);
    }

    fn apply_port_mode(&self, _port: &MidiPort) {
        self.calls.lock().push(ClientCall::ApplyPortMode);
    }

    fn readable_ports(&self) -> Vec<String> {
        self.readable.lock().clone()
    }

    fn writable_ports(&self) -> Vec<String> {
        self.writable.lock().clone()
    }

    fn subscribe_readable_port(&self, _port: &MidiPort, id: &str, subscribe: bool) {
        self.calls
            .lock()
            .push(ClientCall::SubscribeReadable(id.to_owned(), subscribe));
    }

    fn subscribe_writable_port(&self, _port: &MidiPort, id: &str, subscribe: bool) {
        self.calls
            .lock()
            .push(ClientCall::SubscribeWritable(id.to_owned(), subscribe));
    }

    fn process_out_event(&self, event: MidiEvent, time: MidiTime, origin: &MidiPort) {
        self.out_events.lock().push((event, time, origin.name()));
    }

    fn is_raw(&self) -> bool {
        self.raw
    }
}

/// Mock instrument that records every event it is handed.
#[derive(Default)]
pub struct RecordingProcessor {
    pub events: Mutex<Vec<(MidiEvent, MidiTime)>>,
}

impl MidiEventProcessor for RecordingProcessor {
    fn process_in_event(&self, event: MidiEvent, time: MidiTime) {
        self.events.lock().push((event, time));
    }
}
