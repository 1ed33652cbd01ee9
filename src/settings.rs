//! Persistence of port state through a generic attribute store.
//!
//! The attribute names are part of the on-disk contract shared with the
//! session/document layer and must not change.

use std::collections::{BTreeMap, HashSet};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::notify::PortChange;
use crate::port::MidiPort;

/// Flat string-to-string attribute store, the unit a session document hands
/// a port for saving and loading.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes {
    entries: BTreeMap<String, String>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: &str, value: impl ToString) {
        self.entries.insert(key.to_owned(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn parsed<T: FromStr>(&self, key: &str) -> Option<T> {
        self.get(key).and_then(|value| value.parse().ok())
    }
}

fn csv_ids(list: &str) -> HashSet<&str> {
    list.split(',').filter(|id| !id.is_empty()).collect()
}

impl MidiPort {
    /// Write the port's state into `attrs`. The `inports`/`outports` lists
    /// are only present while the corresponding direction is enabled.
    pub fn save_settings(&self, attrs: &mut Attributes) {
        attrs.set("inputchannel", self.input_channel());
        attrs.set("outputchannel", self.output_channel());
        attrs.set("inputcontroller", self.input_controller());
        attrs.set("outputcontroller", self.output_controller());
        attrs.set(
            "fixedinputvelocity",
            self.fixed_input_velocity().map_or(-1, i16::from),
        );
        attrs.set(
            "fixedoutputvelocity",
            self.fixed_output_velocity().map_or(-1, i16::from),
        );
        attrs.set("outputprogram", self.output_program());
        attrs.set("readable", self.input_enabled() as u8);
        attrs.set("writable", self.output_enabled() as u8);

        if self.input_enabled() {
            attrs.set("inports", self.readable_ports().subscribed_csv());
        }
        if self.output_enabled() {
            attrs.set("outports", self.writable_ports().subscribed_csv());
        }
    }

    /// Restore the port's state from `attrs`. Missing attributes leave the
    /// current value untouched.
    ///
    /// Subscription restore goes entry by entry through the live registry
    /// and only issues (un)subscribe calls where the desired state differs
    /// from the current one, so reloading the state a port was saved in is
    /// a transport-level no-op. Saved identifiers the transport no longer
    /// reports are dropped silently.
    pub fn load_settings(&self, attrs: &Attributes) {
        if let Some(v) = attrs.parsed::<u8>("inputchannel") {
            self.set_input_channel(v);
        }
        if let Some(v) = attrs.parsed::<u8>("outputchannel") {
            self.set_output_channel(v);
        }
        if let Some(v) = attrs.parsed::<u8>("inputcontroller") {
            self.set_input_controller(v);
        }
        if let Some(v) = attrs.parsed::<u8>("outputcontroller") {
            self.set_output_controller(v);
        }
        if let Some(v) = attrs.parsed::<i16>("fixedinputvelocity") {
            self.set_fixed_input_velocity(u8::try_from(v).ok());
        }
        if let Some(v) = attrs.parsed::<i16>("fixedoutputvelocity") {
            self.set_fixed_output_velocity(u8::try_from(v).ok());
        }
        if let Some(v) = attrs.parsed::<u8>("outputprogram") {
            self.set_output_program(v);
        }
        if let Some(v) = attrs.parsed::<u8>("readable") {
            self.set_input_enabled(v != 0);
        }
        if let Some(v) = attrs.parsed::<u8>("writable") {
            self.set_output_enabled(v != 0);
        }

        if self.input_enabled() {
            let wanted = attrs.get("inports").map(csv_ids).unwrap_or_default();
            let registry = self.readable_ports();
            for (id, subscribed) in registry.iter() {
                let desired = wanted.contains(id);
                if desired != subscribed {
                    self.set_readable_subscribed(id, desired);
                }
            }
            self.emit(PortChange::ReadablePortsChanged);
        }

        if self.output_enabled() {
            let wanted = attrs.get("outports").map(csv_ids).unwrap_or_default();
            let registry = self.writable_ports();
            for (id, subscribed) in registry.iter() {
                let desired = wanted.contains(id);
                if desired != subscribed {
                    self.set_writable_subscribed(id, desired);
                }
            }
            self.emit(PortChange::WritablePortsChanged);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get() {
        let mut attrs = Attributes::new();
        assert!(attrs.is_empty());

        attrs.set("inputchannel", 5u8);
        attrs.set("inports", "a,b");
        assert_eq!(attrs.get("inputchannel"), Some("5"));
        assert_eq!(attrs.get("inports"), Some("a,b"));
        assert_eq!(attrs.get("missing"), None);
        assert_eq!(attrs.parsed::<u8>("inputchannel"), Some(5));
    }

    #[test]
    fn test_negative_sentinel_parses() {
        let mut attrs = Attributes::new();
        attrs.set("fixedinputvelocity", -1);
        assert_eq!(attrs.parsed::<i16>("fixedinputvelocity"), Some(-1));
        assert_eq!(u8::try_from(-1i16).ok(), None);
    }

    #[test]
    fn test_csv_ids() {
        assert!(csv_ids("").is_empty());
        assert_eq!(csv_ids("a").len(), 1);
        let ids = csv_ids("a,b,c");
        assert!(ids.contains("a") && ids.contains("b") && ids.contains("c"));
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut attrs = Attributes::new();
        attrs.set("readable", 1u8);
        attrs.set("inports", "kbd,pads");

        let json = serde_json::to_string(&attrs).unwrap();
        let back: Attributes = serde_json::from_str(&json).unwrap();
        assert_eq!(back, attrs);
    }
}
