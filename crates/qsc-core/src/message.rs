//! The OSC message entity
//!
//! A [`Message`] pairs a validated address pattern with an ordered list of
//! typed arguments. The type tag string is derived from the arguments and
//! recomputed whenever they are replaced, so the two can never disagree.
//!
//! ```
//! use qsc_core::{Message, OscValue};
//!
//! let msg = Message::new("/light/1/level", vec![OscValue::Float32(0.75)]).unwrap();
//! assert_eq!(msg.type_tag_string(), "f");
//! let packet = msg.packet_data().unwrap();
//! assert_eq!(Message::decode(&packet).unwrap(), msg);
//! ```

use std::any::Any;
use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;

use crate::types::{type_tag_string, OscValue};
use crate::{address, codec, text, Error, Result};

/// An OSC message: address pattern, derived type tag string, and typed
/// arguments.
///
/// Construct one from parts ([`Message::new`]), from a QSC command line
/// ([`Message::from_qsc`]), or from wire bytes ([`Message::decode`]).
/// Once built, a message is immutable apart from whole-sequence argument
/// replacement via [`Message::set_arguments`]; sharing one across threads
/// for reading needs no synchronization.
///
/// `user_data` and `reply_to` ride along in memory only: neither is part
/// of the wire format, and neither takes part in equality.
#[derive(Clone)]
pub struct Message {
    address_pattern: String,
    type_tag_string: String,
    arguments: Vec<OscValue>,
    user_data: Option<Arc<dyn Any + Send + Sync>>,
    reply_to: Option<SocketAddr>,
}

impl Message {
    /// Create a message from an address pattern and arguments.
    ///
    /// The address must satisfy [`address::legal_address`].
    pub fn new(address_pattern: impl Into<String>, arguments: Vec<OscValue>) -> Result<Self> {
        let address_pattern = address_pattern.into();
        if !address::legal_address(&address_pattern) {
            return Err(Error::InvalidAddress(address_pattern));
        }
        let type_tag_string = type_tag_string(&arguments);
        Ok(Self {
            address_pattern,
            type_tag_string,
            arguments,
            user_data: None,
            reply_to: None,
        })
    }

    /// Parse a message from its single-line QSC form, e.g.
    /// `/cue/1/fire "go now" 42`
    pub fn from_qsc(line: &str) -> Result<Self> {
        text::parse(line)
    }

    /// Decode a message from an OSC binary packet
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        codec::decode(bytes)
    }

    /// Attach a reply destination
    pub fn with_reply_to(mut self, reply_to: SocketAddr) -> Self {
        self.reply_to = Some(reply_to);
        self
    }

    /// Attach an opaque caller value, carried in memory only
    pub fn with_user_data(mut self, user_data: Arc<dyn Any + Send + Sync>) -> Self {
        self.user_data = Some(user_data);
        self
    }

    /// Encode this message as an OSC binary packet
    pub fn packet_data(&self) -> Result<Bytes> {
        codec::encode(self)
    }

    /// Render this message in its single-line QSC form
    pub fn to_qsc(&self) -> String {
        text::render(self)
    }

    pub fn address_pattern(&self) -> &str {
        &self.address_pattern
    }

    /// The `/`-separated components of the address pattern
    pub fn address_parts(&self) -> Vec<&str> {
        self.address_pattern
            .split('/')
            .filter(|part| !part.is_empty())
            .collect()
    }

    /// One tag character per argument, in argument order
    pub fn type_tag_string(&self) -> &str {
        &self.type_tag_string
    }

    pub fn arguments(&self) -> &[OscValue] {
        &self.arguments
    }

    /// Replace the whole argument sequence; the type tag string is
    /// recomputed to match.
    pub fn set_arguments(&mut self, arguments: Vec<OscValue>) {
        self.type_tag_string = type_tag_string(&arguments);
        self.arguments = arguments;
    }

    pub fn user_data(&self) -> Option<&(dyn Any + Send + Sync)> {
        self.user_data.as_deref()
    }

    pub fn set_user_data(&mut self, user_data: Option<Arc<dyn Any + Send + Sync>>) {
        self.user_data = user_data;
    }

    pub fn reply_to(&self) -> Option<SocketAddr> {
        self.reply_to
    }

    pub fn set_reply_to(&mut self, reply_to: Option<SocketAddr>) {
        self.reply_to = reply_to;
    }
}

/// Wire identity only: address, tags, and arguments. `user_data` and
/// `reply_to` never participate.
impl PartialEq for Message {
    fn eq(&self, other: &Self) -> bool {
        self.address_pattern == other.address_pattern
            && self.type_tag_string == other.type_tag_string
            && self.arguments == other.arguments
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("address_pattern", &self.address_pattern)
            .field("type_tag_string", &self.type_tag_string)
            .field("arguments", &self.arguments)
            .field("reply_to", &self.reply_to)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_qsc())
    }
}

/// Accepts decoded messages for delivery to application logic.
///
/// Implemented by the routing/dispatch collaborator; the core only defines
/// the contract.
pub trait MessageDestination {
    fn take_message(&mut self, message: Message);
}

/// Handles control-plane messages addressed to the process itself
pub trait ControlHandler {
    fn handle_control_message(&mut self, message: &Message);
}
