//! Shared identifier and side types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a single item.
pub type ItemId = u64;

/// One of the two projected collections.
///
/// On the wire the universe is the `left` list and the selection the
/// `right` list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Items in the universe that are not currently selected.
    #[serde(rename = "left", alias = "universe")]
    Universe,
    /// The ordered selection.
    #[serde(rename = "right", alias = "selected")]
    Selected,
}

impl Side {
    /// Both sides, universe first.
    pub const ALL: [Side; 2] = [Side::Universe, Side::Selected];

    /// Returns the wire name of this side.
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Universe => "left",
            Side::Selected => "right",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
