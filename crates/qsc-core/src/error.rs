//! Error types for qsc

use thiserror::Error;

/// Result type alias for qsc operations
pub type Result<T> = std::result::Result<T, Error>;

/// qsc error types
#[derive(Error, Debug)]
pub enum Error {
    /// Address pattern failed OSC syntax rules
    #[error("invalid address: {0:?}")]
    InvalidAddress(String),

    /// Method name failed the concrete-endpoint rules
    #[error("invalid method: {0:?}")]
    InvalidMethod(String),

    /// Argument value outside the closed OSC variant set
    #[error("unsupported argument type: {0}")]
    UnsupportedArgumentType(String),

    /// Decode encountered a tag character outside the recognized set
    #[error("unknown type tag: '{0}'")]
    UnknownTypeTag(char),

    /// Truncated buffer, missing comma prefix, bad padding, or a length
    /// field pointing past the buffer end
    #[error("malformed packet: {0}")]
    MalformedPacket(String),

    /// Blob too large for its 32-bit length prefix
    #[error("payload too large: {0} bytes (max 2147483647)")]
    PayloadTooLarge(usize),

    /// Textual command line failed to parse
    #[error("invalid command string: {0}")]
    InvalidCommandString(String),
}
