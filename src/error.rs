//! Error types for the port routing core.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The transport refused to register the port at construction time.
    /// There is no port without a transport handle, so this aborts
    /// [`MidiPort::new`](crate::MidiPort::new).
    #[error("MIDI port registration failed: {0}")]
    PortRegistration(String),
}

pub type Result<T> = std::result::Result<T, Error>;
