//! # PageSync Protocol
//!
//! Wire messages exchanged between viewers and the PageSync server.
//!
//! This crate provides:
//! - `Inbound` viewer requests (fetch, mutations, reconciliation checks)
//! - `Outbound` server messages (pages, change signals, check results)
//! - A JSON text codec, one object per message, tagged by `"type"`
//!
//! This is a pure protocol crate with no I/O operations.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod messages;

pub use error::{ProtocolError, ProtocolResult};
pub use messages::{decode_inbound, decode_outbound, encode, Inbound, Outbound, INBOUND_TYPES};
