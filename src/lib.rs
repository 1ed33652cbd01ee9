//! Per-track MIDI port routing for a sequencing engine.
//!
//! A [`MidiPort`] is the logical MIDI endpoint of one track or instrument.
//! It sits between an external transport ([`MidiClient`]) and an internal
//! event consumer ([`MidiEventProcessor`]) and owns the stateful routing
//! between them:
//!
//! - **Masking**: per-direction enable toggles, channel matching (with omni
//!   wildcard on input), key-range gating, fixed-velocity overrides
//! - **Remapping**: 1-indexed sequencer channels to 0-indexed wire channels
//!   on output, plus the immediate program-change transmit on
//!   [`MidiPort::set_output_program`]
//! - **Subscriptions**: per-direction ordered registries of the transport's
//!   external ports, reconciled whenever the transport's lists change
//! - **Persistence**: saving/loading the whole port state through a flat
//!   [`Attributes`] store
//!
//! # Example
//!
//! ```ignore
//! use seqport::{MidiPort, PortMode};
//!
//! let port = MidiPort::new("lead synth", client, instrument, PortMode::Duplex)?;
//! port.set_input_channel(0); // omni
//! port.set_readable_subscribed("MIDI Keyboard", true);
//!
//! // Observe changes (GUI refresh, document dirty tracking)
//! let changes = port.subscribe_changes();
//! ```

pub mod error;
pub use error::{Error, Result};

mod port;
pub use port::MidiPort;

mod client;
pub use client::{MidiClient, MidiEventProcessor};

mod mode;
pub use mode::PortMode;

mod selection;
pub use selection::SubscriptionMap;

mod notify;
pub use notify::PortChange;

mod settings;
pub use settings::Attributes;

pub(crate) mod event;
pub use event::{MidiEvent, MidiTime, NUM_KEYS};

pub(crate) mod filter;
pub(crate) mod serde_support;

// Re-export the upstream message vocabulary (users shouldn't need to import
// midi-msg directly).
pub use midi_msg::{ChannelVoiceMsg, ControlChange, MidiMsg};
