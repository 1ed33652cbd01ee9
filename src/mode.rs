//! Port direction modes.

use serde::{Deserialize, Serialize};

/// Effective direction of a port, derived from its two enable toggles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortMode {
    #[default]
    Disabled,
    Input,
    Output,
    Duplex,
}

impl PortMode {
    /// Derive the effective mode from the input/output toggles. Total over
    /// all four combinations.
    #[inline]
    pub fn derive(input: bool, output: bool) -> Self {
        match (input, output) {
            (false, false) => Self::Disabled,
            (true, false) => Self::Input,
            (false, true) => Self::Output,
            (true, true) => Self::Duplex,
        }
    }

    #[inline]
    pub fn input_enabled(self) -> bool {
        matches!(self, Self::Input | Self::Duplex)
    }

    #[inline]
    pub fn output_enabled(self) -> bool {
        matches!(self, Self::Output | Self::Duplex)
    }
}
