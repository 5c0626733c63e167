//! QSC Core
//!
//! Message model and codecs for Open Sound Control (OSC) 1.0/1.1.
//!
//! This crate provides:
//! - The OSC message entity ([`Message`]) and its typed arguments ([`OscValue`])
//! - Address and method validation ([`address`])
//! - The binary wire codec ([`codec`])
//! - The single-line textual "QSC" command form ([`text`])
//!
//! Transport, bundles, and dispatch live in collaborating crates; this core
//! is pure and performs no I/O. Timetag arguments are not supported.

pub mod address;
pub mod codec;
pub mod error;
pub mod message;
pub mod text;
pub mod types;

pub use codec::{decode, encode};
pub use error::{Error, Result};
pub use message::{ControlHandler, Message, MessageDestination};
pub use types::OscValue;

/// Every wire segment is NUL-padded to a multiple of this many bytes
pub const ALIGNMENT: usize = 4;

/// Characters OSC reserves for pattern matching and framing; none may
/// appear in a concrete address component
pub const RESERVED_CHARS: &[char] = &['/', ' ', '#', '*', ',', '?', '[', ']', '{', '}'];
