//! OSC binary wire codec
//!
//! Message layout, every segment NUL-padded to a 4-byte multiple:
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │ Address pattern      "/light/1/level\0\0"                  │
//! │ Type tag block       "," + tags + NUL, padded  (",f\0\0")  │
//! │ Argument payloads    back to back, each padded             │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! Strings are NUL-terminated then padded; blobs carry a 4-byte big-endian
//! length prefix, raw bytes, then padding; `i`/`f` are exactly 4 bytes
//! big-endian and `d` is exactly 8; `T`, `F`, `I`, and `N` contribute no
//! payload bytes at all; the tag character alone carries the value.
//!
//! Decoding validates every length against the remaining buffer before any
//! byte is consumed, so a truncated or hostile packet fails with
//! [`Error::MalformedPacket`] instead of reading out of bounds.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::message::Message;
use crate::types::{tag, OscValue};
use crate::{Error, Result, ALIGNMENT};

/// Round `len` up to the next 4-byte boundary
#[inline(always)]
pub(crate) fn padded(len: usize) -> usize {
    (len + ALIGNMENT - 1) & !(ALIGNMENT - 1)
}

/// Encoded size of an OSC string of `len` bytes: terminator plus padding
#[inline(always)]
fn osc_str_len(len: usize) -> usize {
    padded(len + 1)
}

/// Exact encoded packet size for a message.
///
/// Deterministic given the address length, tag count, and argument payload
/// sizes; [`encode`] allocates exactly this much once.
pub fn packet_size(message: &Message) -> Result<usize> {
    let mut size = osc_str_len(message.address_pattern().len())
        + osc_str_len(1 + message.arguments().len());
    for argument in message.arguments() {
        size += match argument {
            OscValue::String(s) => osc_str_len(s.len()),
            OscValue::Blob(b) => {
                if b.len() > i32::MAX as usize {
                    return Err(Error::PayloadTooLarge(b.len()));
                }
                4 + padded(b.len())
            }
            OscValue::Int32(_) | OscValue::Float32(_) => 4,
            OscValue::Float64(_) => 8,
            OscValue::True | OscValue::False | OscValue::Impulse | OscValue::Nil => 0,
        };
    }
    Ok(size)
}

/// Encode a message to a complete OSC packet
pub fn encode(message: &Message) -> Result<Bytes> {
    let capacity = packet_size(message)?;
    let mut buf = BytesMut::with_capacity(capacity);

    put_osc_str(&mut buf, message.address_pattern().as_bytes());

    let tag_block = format!(",{}", message.type_tag_string());
    put_osc_str(&mut buf, tag_block.as_bytes());

    for argument in message.arguments() {
        put_value(&mut buf, argument)?;
    }

    debug_assert_eq!(buf.len(), capacity);
    Ok(buf.freeze())
}

/// Decode a complete OSC packet into a message.
///
/// Fails with [`Error::MalformedPacket`] on truncation, a missing leading
/// `/`, a tag block without its leading comma, bad padding, or trailing
/// bytes; with [`Error::UnknownTypeTag`] on an unrecognized tag character.
/// A failed decode returns no message; partial results are discarded.
pub fn decode(bytes: &[u8]) -> Result<Message> {
    let mut buf = bytes;

    let address = get_osc_str(&mut buf)?;
    if !address.starts_with('/') {
        return Err(Error::MalformedPacket(format!(
            "address must start with '/': {address:?}"
        )));
    }

    let tag_block = get_osc_str(&mut buf)?;
    let Some(tags) = tag_block.strip_prefix(',') else {
        return Err(Error::MalformedPacket(
            "type tag block missing leading ','".to_string(),
        ));
    };

    let mut arguments = Vec::with_capacity(tags.len());
    for tag_char in tags.chars() {
        arguments.push(get_value(&mut buf, tag_char)?);
    }

    if !buf.is_empty() {
        return Err(Error::MalformedPacket(format!(
            "{} trailing bytes after last argument",
            buf.len()
        )));
    }

    Message::new(address, arguments)
}

// ============================================================================
// ENCODING HELPERS
// ============================================================================

/// Write an OSC string: the bytes, a NUL terminator, padding to alignment.
/// Always appends between 1 and 4 NULs.
#[inline]
fn put_osc_str(buf: &mut BytesMut, bytes: &[u8]) {
    buf.extend_from_slice(bytes);
    buf.put_bytes(0, ALIGNMENT - bytes.len() % ALIGNMENT);
}

fn put_value(buf: &mut BytesMut, value: &OscValue) -> Result<()> {
    match value {
        OscValue::String(s) => put_osc_str(buf, s.as_bytes()),
        OscValue::Blob(b) => {
            if b.len() > i32::MAX as usize {
                return Err(Error::PayloadTooLarge(b.len()));
            }
            buf.put_i32(b.len() as i32);
            buf.extend_from_slice(b);
            buf.put_bytes(0, padded(b.len()) - b.len());
        }
        OscValue::Int32(i) => buf.put_i32(*i),
        OscValue::Float32(f) => buf.put_f32(*f),
        OscValue::Float64(d) => buf.put_f64(*d),
        OscValue::True | OscValue::False | OscValue::Impulse | OscValue::Nil => {}
    }
    Ok(())
}

// ============================================================================
// DECODING HELPERS
// ============================================================================

#[inline(always)]
fn check_remaining(buf: &[u8], needed: usize) -> Result<()> {
    if buf.len() < needed {
        return Err(Error::MalformedPacket(format!(
            "truncated packet: need {needed} bytes, have {}",
            buf.len()
        )));
    }
    Ok(())
}

/// Read an OSC string: scan to the NUL terminator, verify the padding, and
/// advance the cursor past the padded block.
fn get_osc_str<'a>(buf: &mut &'a [u8]) -> Result<&'a str> {
    let data = *buf;
    let nul = data
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| Error::MalformedPacket("unterminated string".to_string()))?;
    let total = padded(nul + 1);
    check_remaining(data, total)?;
    if data[nul..total].iter().any(|&b| b != 0) {
        return Err(Error::MalformedPacket(
            "non-NUL bytes in string padding".to_string(),
        ));
    }
    let s = std::str::from_utf8(&data[..nul])
        .map_err(|_| Error::MalformedPacket("string is not valid utf-8".to_string()))?;
    *buf = &data[total..];
    Ok(s)
}

fn get_blob(buf: &mut &[u8]) -> Result<OscValue> {
    check_remaining(*buf, 4)?;
    let declared = buf.get_i32();
    if declared < 0 {
        return Err(Error::MalformedPacket(format!(
            "negative blob length: {declared}"
        )));
    }
    let len = declared as usize;
    let total = padded(len);
    if buf.remaining() < total {
        return Err(Error::MalformedPacket(format!(
            "blob length {len} runs past end of buffer ({} bytes left)",
            buf.remaining()
        )));
    }
    let data = buf[..len].to_vec();
    buf.advance(total);
    Ok(OscValue::Blob(data))
}

fn get_value(buf: &mut &[u8], tag_char: char) -> Result<OscValue> {
    match tag_char {
        tag::STRING => Ok(OscValue::String(get_osc_str(buf)?.to_string())),
        tag::BLOB => get_blob(buf),
        tag::INT32 => {
            check_remaining(*buf, 4)?;
            Ok(OscValue::Int32(buf.get_i32()))
        }
        tag::FLOAT32 => {
            check_remaining(*buf, 4)?;
            Ok(OscValue::Float32(buf.get_f32()))
        }
        tag::FLOAT64 => {
            check_remaining(*buf, 8)?;
            Ok(OscValue::Float64(buf.get_f64()))
        }
        tag::TRUE => Ok(OscValue::True),
        tag::FALSE => Ok(OscValue::False),
        tag::IMPULSE => Ok(OscValue::Impulse),
        tag::NIL => Ok(OscValue::Nil),
        other => Err(Error::UnknownTypeTag(other)),
    }
}

// ============================================================================
// TESTS
// ============================================================================
