//! Pure masking rules applied by the event router.
//!
//! Everything here is a value-level decision with no port state attached, so
//! the routing policy stays unit-testable on its own.

use crate::event::{MidiEvent, NUM_KEYS};

/// Inbound channel mask. `input_channel` 0 is the omni wildcard; otherwise
/// the 1-indexed setting must name the event's 0-indexed wire channel.
#[inline]
pub(crate) fn accepts_input_channel(input_channel: u8, wire_channel: u8) -> bool {
    input_channel == 0 || u16::from(input_channel) == u16::from(wire_channel) + 1
}

#[inline]
pub(crate) fn key_in_range(key: u8) -> bool {
    key < NUM_KEYS
}

/// 1-indexed sequencer channel to 0-indexed wire channel. Channel 0 ("no
/// channel") has no wire equivalent and passes through undecremented.
#[inline]
pub(crate) fn to_wire_channel(channel: u8) -> u8 {
    channel.saturating_sub(1)
}

/// Fixed-velocity override on the inbound path: rewrites any event whose
/// velocity slot holds a value greater than zero. Zero velocities keep their
/// note-off meaning.
#[inline]
pub(crate) fn apply_fixed_input_velocity(event: MidiEvent, fixed: Option<u8>) -> MidiEvent {
    match (fixed, event.velocity()) {
        (Some(velocity), Some(original)) if original > 0 => event.with_velocity(velocity),
        _ => event,
    }
}

/// Fixed-velocity override on the outbound path: only note-on and
/// key-pressure events are rewritten, and only when their velocity is
/// greater than zero.
#[inline]
pub(crate) fn apply_fixed_output_velocity(event: MidiEvent, fixed: Option<u8>) -> MidiEvent {
    use midi_msg::ChannelVoiceMsg;

    let eligible = matches!(
        event.msg,
        ChannelVoiceMsg::NoteOn { .. } | ChannelVoiceMsg::PolyPressure { .. }
    );
    match (fixed, event.velocity()) {
        (Some(velocity), Some(original)) if eligible && original > 0 => {
            event.with_velocity(velocity)
        }
        _ => event,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_omni_accepts_any_channel() {
        for wire in 0..16 {
            assert!(accepts_input_channel(0, wire));
        }
    }

    #[test]
    fn test_channel_mask_exact() {
        // Setting 5 means wire channel 4
        assert!(accepts_input_channel(5, 4));
        assert!(!accepts_input_channel(5, 5));
        assert!(!accepts_input_channel(5, 3));
        assert!(accepts_input_channel(1, 0));
        assert!(accepts_input_channel(16, 15));
    }

    #[test]
    fn test_key_range() {
        assert!(key_in_range(0));
        assert!(key_in_range(NUM_KEYS - 1));
        assert!(!key_in_range(NUM_KEYS));
        assert!(!key_in_range(u8::MAX));
    }

    #[test]
    fn test_wire_channel_conversion() {
        assert_eq!(to_wire_channel(3), 2);
        assert_eq!(to_wire_channel(1), 0);
        assert_eq!(to_wire_channel(16), 15);
        // "no channel" marker stays put
        assert_eq!(to_wire_channel(0), 0);
    }

    #[test]
    fn test_fixed_input_velocity() {
        let on = MidiEvent::note_on(0, 60, 64);
        assert_eq!(
            apply_fixed_input_velocity(on, Some(100)).velocity(),
            Some(100)
        );
        assert_eq!(apply_fixed_input_velocity(on, None).velocity(), Some(64));

        // Velocity 0 keeps its note-off meaning
        let off = MidiEvent::note_on(0, 60, 0);
        assert_eq!(apply_fixed_input_velocity(off, Some(100)).velocity(), Some(0));
    }

    #[test]
    fn test_fixed_output_velocity_type_gate() {
        let on = MidiEvent::note_on(2, 60, 64);
        assert_eq!(
            apply_fixed_output_velocity(on, Some(100)).velocity(),
            Some(100)
        );

        let pressure = MidiEvent::key_pressure(2, 60, 30);
        assert_eq!(
            apply_fixed_output_velocity(pressure, Some(100)).velocity(),
            Some(100)
        );

        // Note-off is never rewritten on output
        let off = MidiEvent::note_off(2, 60, 64);
        assert_eq!(
            apply_fixed_output_velocity(off, Some(100)).velocity(),
            Some(64)
        );

        // Zero velocity is never rewritten
        let silent = MidiEvent::note_on(2, 60, 0);
        assert_eq!(
            apply_fixed_output_velocity(silent, Some(100)).velocity(),
            Some(0)
        );
    }
}
