//! MIDI event values routed through a port.
//!
//! Channel numbering follows the path, not the struct: events on the inbound
//! path carry the transport's 0-indexed wire channel, events on the outbound
//! path carry the sequencer's 1-indexed channel with 0 meaning "no channel".
//! [`MidiPort`](crate::MidiPort) converts between the two conventions when it
//! hands an event to the transport.

use midi_msg::{Channel, ChannelVoiceMsg, ControlChange, MidiMsg};

/// Number of keys addressable by keyed events. Keyed events at or above this
/// are outside the sequencer's range and dropped on input.
pub const NUM_KEYS: u8 = 128;

/// Sequencer timestamp in ticks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MidiTime(pub u64);

impl MidiTime {
    pub const ZERO: Self = Self(0);

    #[inline]
    pub fn ticks(self) -> u64 {
        self.0
    }
}

impl From<u64> for MidiTime {
    fn from(ticks: u64) -> Self {
        Self(ticks)
    }
}

/// A channel-voice MIDI event with the full 0-16 channel range.
///
/// `midi_msg::Channel` only carries the 16 wire channels; the sequencer-side
/// convention needs one more value (0 = "no channel"), so the channel lives
/// here as a plain `u8` next to the message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MidiEvent {
    pub channel: u8,
    pub msg: ChannelVoiceMsg,
}

impl MidiEvent {
    #[inline]
    pub fn new(channel: u8, msg: ChannelVoiceMsg) -> Self {
        Self { channel, msg }
    }

    #[inline]
    pub fn note_on(channel: u8, key: u8, velocity: u8) -> Self {
        Self {
            channel,
            msg: ChannelVoiceMsg::NoteOn {
                note: key,
                velocity,
            },
        }
    }

    #[inline]
    pub fn note_off(channel: u8, key: u8, velocity: u8) -> Self {
        Self {
            channel,
            msg: ChannelVoiceMsg::NoteOff {
                note: key,
                velocity,
            },
        }
    }

    #[inline]
    pub fn key_pressure(channel: u8, key: u8, pressure: u8) -> Self {
        Self {
            channel,
            msg: ChannelVoiceMsg::PolyPressure {
                note: key,
                pressure,
            },
        }
    }

    #[inline]
    pub fn control_change(channel: u8, controller: u8, value: u8) -> Self {
        Self {
            channel,
            msg: ChannelVoiceMsg::ControlChange {
                control: ControlChange::CC {
                    control: controller,
                    value,
                },
            },
        }
    }

    #[inline]
    pub fn program_change(channel: u8, program: u8) -> Self {
        Self {
            channel,
            msg: ChannelVoiceMsg::ProgramChange { program },
        }
    }

    #[inline]
    pub fn channel_pressure(channel: u8, pressure: u8) -> Self {
        Self {
            channel,
            msg: ChannelVoiceMsg::ChannelPressure { pressure },
        }
    }

    #[inline]
    pub fn pitch_bend(channel: u8, bend: u16) -> Self {
        Self {
            channel,
            msg: ChannelVoiceMsg::PitchBend { bend },
        }
    }

    /// Key number for keyed events (note on/off, key pressure).
    #[inline]
    pub fn key(&self) -> Option<u8> {
        match self.msg {
            ChannelVoiceMsg::NoteOn { note, .. }
            | ChannelVoiceMsg::NoteOff { note, .. }
            | ChannelVoiceMsg::HighResNoteOn { note, .. }
            | ChannelVoiceMsg::HighResNoteOff { note, .. }
            | ChannelVoiceMsg::PolyPressure { note, .. } => Some(note),
            _ => None,
        }
    }

    /// Velocity slot of the event. For key-pressure events the pressure value
    /// sits in the velocity slot, matching how the routing masks treat it.
    #[inline]
    pub fn velocity(&self) -> Option<u8> {
        match self.msg {
            ChannelVoiceMsg::NoteOn { velocity, .. }
            | ChannelVoiceMsg::NoteOff { velocity, .. } => Some(velocity),
            ChannelVoiceMsg::HighResNoteOn { velocity, .. }
            | ChannelVoiceMsg::HighResNoteOff { velocity, .. } => Some((velocity >> 7) as u8),
            ChannelVoiceMsg::PolyPressure { pressure, .. } => Some(pressure),
            _ => None,
        }
    }

    /// Copy of the event with its velocity slot rewritten. Events without a
    /// velocity slot are returned unchanged.
    #[inline]
    pub fn with_velocity(self, velocity: u8) -> Self {
        let msg = match self.msg {
            ChannelVoiceMsg::NoteOn { note, .. } => ChannelVoiceMsg::NoteOn { note, velocity },
            ChannelVoiceMsg::NoteOff { note, .. } => ChannelVoiceMsg::NoteOff { note, velocity },
            ChannelVoiceMsg::HighResNoteOn { note, .. } => ChannelVoiceMsg::HighResNoteOn {
                note,
                velocity: (velocity as u16) << 7,
            },
            ChannelVoiceMsg::HighResNoteOff { note, .. } => ChannelVoiceMsg::HighResNoteOff {
                note,
                velocity: (velocity as u16) << 7,
            },
            ChannelVoiceMsg::PolyPressure { note, .. } => ChannelVoiceMsg::PolyPressure {
                note,
                pressure: velocity,
            },
            other => other,
        };
        Self {
            channel: self.channel,
            msg,
        }
    }

    #[inline]
    pub fn with_channel(self, channel: u8) -> Self {
        Self {
            channel,
            msg: self.msg,
        }
    }

    /// Whether the event addresses a key and is subject to the key-range gate.
    #[inline]
    pub fn is_keyed(&self) -> bool {
        self.key().is_some()
    }

    #[inline]
    pub fn is_note_on(&self) -> bool {
        matches!(self.msg, ChannelVoiceMsg::NoteOn { velocity, .. } if velocity > 0)
    }

    #[inline]
    pub fn is_note_off(&self) -> bool {
        matches!(
            self.msg,
            ChannelVoiceMsg::NoteOff { .. } | ChannelVoiceMsg::NoteOn { velocity: 0, .. }
        )
    }

    /// Convert to a `midi_msg::MidiMsg` for wire encoding. Only valid for
    /// events already on the 0-indexed wire convention.
    #[inline]
    pub fn to_midi_msg(&self) -> MidiMsg {
        MidiMsg::ChannelVoice {
            channel: Channel::from_u8(self.channel.min(15)),
            msg: self.msg,
        }
    }

    #[inline]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_midi_msg().to_midi()
    }

    /// Parse a wire event (0-indexed channel) from raw MIDI bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, midi_msg::ParseError> {
        let (msg, _len) = MidiMsg::from_midi(bytes)?;
        match msg {
            MidiMsg::ChannelVoice { channel, msg } => Ok(Self {
                channel: channel as u8,
                msg,
            }),
            _ => Err(midi_msg::ParseError::Invalid(
                "Expected ChannelVoice message",
            )),
        }
    }
}
