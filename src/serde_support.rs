//! Serde support for MIDI events.
//!
//! `midi_msg::ChannelVoiceMsg` carries no serde implementations, so events
//! serialize through a stable mirror representation here. Used by session
//! snapshots and anything shipping events across a process boundary.

use midi_msg::{ChannelVoiceMsg, ControlChange};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::event::MidiEvent;

#[derive(Serialize, Deserialize)]
struct SerializableMidiEvent {
    channel: u8,
    data: MsgData,
}

#[derive(Serialize, Deserialize)]
enum MsgData {
    NoteOn { key: u8, velocity: u8 },
    NoteOff { key: u8, velocity: u8 },
    HighResNoteOn { key: u8, velocity: u16 },
    HighResNoteOff { key: u8, velocity: u16 },
    KeyPressure { key: u8, pressure: u8 },
    ControlChange { controller: u8, value: u8 },
    ProgramChange { program: u8 },
    ChannelPressure { pressure: u8 },
    PitchBend { bend: u16 },
}

impl Serialize for MidiEvent {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let data = match self.msg {
            ChannelVoiceMsg::NoteOn { note, velocity } => MsgData::NoteOn {
                key: note,
                velocity,
            },
            ChannelVoiceMsg::NoteOff { note, velocity } => MsgData::NoteOff {
                key: note,
                velocity,
            },
            ChannelVoiceMsg::HighResNoteOn { note, velocity } => MsgData::HighResNoteOn {
                key: note,
                velocity,
            },
            ChannelVoiceMsg::HighResNoteOff { note, velocity } => MsgData::HighResNoteOff {
                key: note,
                velocity,
            },
            ChannelVoiceMsg::PolyPressure { note, pressure } => MsgData::KeyPressure {
                key: note,
                pressure,
            },
            ChannelVoiceMsg::ControlChange { control } => {
                let (controller, value) = match control {
                    ControlChange::CC { control, value } => (control, value),
                    // 14-bit controllers narrow to their 7-bit MSB
                    ControlChange::CCHighRes {
                        control1, value, ..
                    } => (control1, (value >> 7) as u8),
                    _ => (0, 0),
                };
                MsgData::ControlChange { controller, value }
            }
            ChannelVoiceMsg::ProgramChange { program } => MsgData::ProgramChange { program },
            ChannelVoiceMsg::ChannelPressure { pressure } => MsgData::ChannelPressure { pressure },
            ChannelVoiceMsg::PitchBend { bend } => MsgData::PitchBend { bend },
        };

        SerializableMidiEvent {
            channel: self.channel,
            data,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for MidiEvent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mirror = SerializableMidiEvent::deserialize(deserializer)?;

        let msg = match mirror.data {
            MsgData::NoteOn { key, velocity } => ChannelVoiceMsg::NoteOn {
                note: key,
                velocity,
            },
            MsgData::NoteOff { key, velocity } => ChannelVoiceMsg::NoteOff {
                note: key,
                velocity,
            },
            MsgData::HighResNoteOn { key, velocity } => ChannelVoiceMsg::HighResNoteOn {
                note: key,
                velocity,
            },
            MsgData::HighResNoteOff { key, velocity } => ChannelVoiceMsg::HighResNoteOff {
                note: key,
                velocity,
            },
            MsgData::KeyPressure { key, pressure } => ChannelVoiceMsg::PolyPressure {
                note: key,
                pressure,
            },
            MsgData::ControlChange { controller, value } => ChannelVoiceMsg::ControlChange {
                control: ControlChange::CC {
                    control: controller,
                    value,
                },
            },
            MsgData::ProgramChange { program } => ChannelVoiceMsg::ProgramChange { program },
            MsgData::ChannelPressure { pressure } => ChannelVoiceMsg::ChannelPressure { pressure },
            MsgData::PitchBend { bend } => ChannelVoiceMsg::PitchBend { bend },
        };

        Ok(MidiEvent {
            channel: mirror.channel,
            msg,
        })
    }
}
