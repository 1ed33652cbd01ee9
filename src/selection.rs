//! Ordered bookkeeping of external-port subscriptions.
//!
//! One map per direction: external port identifier → currently subscribed.
//! Entry order mirrors the transport's enumeration order, so a GUI can list
//! the entries as the transport reported them.

/// Ordered mapping from external port identifier to subscription state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubscriptionMap {
    entries: Vec<(String, bool)>,
}

impl SubscriptionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, id: &str) -> Option<bool> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == id)
            .map(|(_, subscribed)| *subscribed)
    }

    /// Set an entry, appending it if the identifier is not yet known.
    pub fn set(&mut self, id: &str, subscribed: bool) {
        match self.entries.iter_mut().find(|(entry, _)| entry == id) {
            Some((_, state)) => *state = subscribed,
            None => self.entries.push((id.to_owned(), subscribed)),
        }
    }

    /// Entries in transport enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.entries
            .iter()
            .map(|(id, subscribed)| (id.as_str(), *subscribed))
    }

    /// Identifiers of currently subscribed entries, in order.
    pub fn subscribed(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, subscribed)| *subscribed)
            .map(|(id, _)| id.as_str())
    }

    /// Rebuild the map against a freshly enumerated identifier list.
    ///
    /// The result contains exactly `new_ids`, in their given order; an entry
    /// is subscribed iff it was subscribed before. Identifiers absent from
    /// `new_ids` are dropped together with their state, since the external
    /// endpoint no longer exists.
    #[must_use]
    pub fn reconcile(&self, new_ids: &[String]) -> Self {
        Self {
            entries: new_ids
                .iter()
                .map(|id| (id.clone(), self.get(id).unwrap_or(false)))
                .collect(),
        }
    }

    /// Comma-joined list of subscribed identifiers, the persistence format
    /// for the `inports`/`outports` attributes. Empty string if none.
    pub fn subscribed_csv(&self) -> String {
        self.subscribed().collect::<Vec<_>>().join(",")
    }
}
