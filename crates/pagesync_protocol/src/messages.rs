//! Protocol messages.

use crate::error::{ProtocolError, ProtocolResult};
use pagesync_core::{Action, Digest, ItemId, Side};
use serde::{Deserialize, Serialize};

/// `type` values accepted from viewers.
pub const INBOUND_TYPES: &[&str] = &[
    "FETCH",
    "SELECT",
    "DESELECT",
    "ADD",
    "REORDER",
    "CHECK_HASH",
    "CHECK_PREFIX",
    "CHECK_PAGE",
];

/// A message sent by a viewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Inbound {
    /// Request one page of a projection.
    Fetch {
        /// Projected collection.
        #[serde(rename = "list", alias = "side")]
        side: Side,
        /// Substring filter.
        #[serde(default)]
        search: String,
        /// Zero-based page index.
        #[serde(default)]
        page: usize,
    },
    /// Select an id.
    Select {
        /// Item to select.
        id: ItemId,
    },
    /// Deselect an id.
    Deselect {
        /// Item to deselect.
        id: ItemId,
    },
    /// Add an id to the universe.
    Add {
        /// Item to add.
        id: ItemId,
    },
    /// Replace the selection order.
    Reorder {
        /// New order of the selection.
        #[serde(rename = "orderedIds")]
        ordered_ids: Vec<ItemId>,
    },
    /// Compare the digest of the first `count` items the viewer holds.
    #[serde(rename = "CHECK_HASH", alias = "CHECK_PREFIX")]
    CheckPrefix {
        /// Projected collection.
        #[serde(rename = "list", alias = "side")]
        side: Side,
        /// Substring filter.
        #[serde(default)]
        search: String,
        /// Number of items the viewer holds.
        count: usize,
        /// Digest of those items.
        #[serde(rename = "hash", alias = "digest")]
        digest: Digest,
    },
    /// Compare the digest of one cached page.
    CheckPage {
        /// Projected collection.
        #[serde(rename = "list", alias = "side")]
        side: Side,
        /// Substring filter.
        #[serde(default)]
        search: String,
        /// Zero-based page index.
        #[serde(default)]
        page: usize,
        /// Digest of the cached page.
        #[serde(rename = "hash", alias = "digest")]
        digest: Digest,
    },
}

impl Inbound {
    /// Returns the queued mutation this message requests, if any.
    pub fn to_action(&self) -> Option<Action> {
        match self {
            Inbound::Select { id } => Some(Action::select(*id)),
            Inbound::Deselect { id } => Some(Action::deselect(*id)),
            Inbound::Add { id } => Some(Action::add(*id)),
            Inbound::Reorder { ordered_ids } => Some(Action::reorder(ordered_ids.clone())),
            Inbound::Fetch { .. } | Inbound::CheckPrefix { .. } | Inbound::CheckPage { .. } => {
                None
            }
        }
    }
}

/// A message sent by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outbound {
    /// Reply to `Fetch`.
    Items {
        /// Projected collection.
        #[serde(rename = "list")]
        side: Side,
        /// Zero-based page index.
        page: usize,
        /// Substring filter of the request.
        search: String,
        /// Page content.
        items: Vec<ItemId>,
    },
    /// Content-free signal that a collection changed.
    #[serde(rename = "LIST_UPDATED")]
    ListChanged {
        /// Changed collection.
        #[serde(rename = "list")]
        side: Side,
    },
    /// Reply to `CheckPrefix`.
    #[serde(rename = "HASH_RESULT")]
    PrefixCheckResult {
        /// Projected collection.
        #[serde(rename = "list")]
        side: Side,
        /// Substring filter of the request.
        search: String,
        /// Whether the viewer's prefix is current.
        #[serde(rename = "same")]
        matches: bool,
        /// Size of the filtered projection.
        #[serde(rename = "totalCount")]
        total_count: usize,
        /// Number of pages in the filtered projection.
        #[serde(rename = "pageCount")]
        page_count: usize,
    },
    /// Fresh content of a stale page, in reply to `CheckPage`.
    PageData {
        /// Projected collection.
        #[serde(rename = "list")]
        side: Side,
        /// Zero-based page index.
        page: usize,
        /// Page content.
        items: Vec<ItemId>,
    },
    /// A request was refused. Only sent when rejection replies are enabled.
    Rejected {
        /// Human readable reason.
        reason: String,
    },
}

/// Encodes a message as JSON text.
pub fn encode<T: Serialize>(message: &T) -> ProtocolResult<String> {
    Ok(serde_json::to_string(message)?)
}

/// Decodes a viewer message.
///
/// Unknown `type` values are reported separately from malformed content
/// so callers can ignore them quietly.
pub fn decode_inbound(text: &str) -> ProtocolResult<Inbound> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    let kind = value
        .get("type")
        .and_then(serde_json::Value::as_str)
        .ok_or(ProtocolError::MissingType)?;
    if !INBOUND_TYPES.contains(&kind) {
        return Err(ProtocolError::UnknownType(kind.to_string()));
    }
    Ok(serde_json::from_value(value)?)
}

/// Decodes a server message.
pub fn decode_outbound(text: &str) -> ProtocolResult<Outbound> {
    Ok(serde_json::from_str(text)?)
}
