//! The textual "QSC" command form
//!
//! One line per message: the address, then space-separated argument tokens:
//! ```text
//! /cue/1/fire "go now" 42
//! /light/1/level 0.75
//! /deck/a/loop true 0x00ffcc
//! ```
//!
//! Double quotes group a token with embedded spaces; `\"` and `\\` are the
//! recognized escapes inside quotes. Unquoted tokens are typed by shape, in
//! order: the literals `true`/`false`/`impulse`/`nil`, an `i32` integer, a
//! `d`-suffixed double (`0.5d`), a float, a `0x…` hex blob, else a plain
//! string. Quoting a token always forces a string.
//!
//! Rendering is the inverse, and quotes any string that would not survive
//! re-parsing. Text to message to text is therefore not byte-stable, but it
//! always re-parses to an equal address and argument sequence.

use std::fmt::Write as _;

use crate::message::Message;
use crate::types::OscValue;
use crate::{address, Error, Result};

struct Token {
    text: String,
    quoted: bool,
}

pub(crate) fn parse(line: &str) -> Result<Message> {
    let tokens = tokenize(line)?;
    let Some((first, rest)) = tokens.split_first() else {
        return Err(Error::InvalidCommandString("empty command".to_string()));
    };
    if first.quoted || !address::legal_address(&first.text) {
        return Err(Error::InvalidCommandString(format!(
            "command must begin with an address: {line:?}"
        )));
    }
    let arguments = rest
        .iter()
        .map(|token| {
            if token.quoted {
                OscValue::String(token.text.clone())
            } else {
                infer(&token.text)
            }
        })
        .collect();
    Message::new(first.text.clone(), arguments)
}

pub(crate) fn render(message: &Message) -> String {
    let mut out = String::from(message.address_pattern());
    for argument in message.arguments() {
        out.push(' ');
        render_argument(&mut out, argument);
    }
    out
}

fn tokenize(line: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = line.chars().peekable();
    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
        } else if c == '"' {
            chars.next();
            let mut text = String::new();
            loop {
                match chars.next() {
                    Some('"') => break,
                    Some('\\') => match chars.next() {
                        Some(escaped @ ('"' | '\\')) => text.push(escaped),
                        Some(other) => {
                            // unknown escape passes through verbatim
                            text.push('\\');
                            text.push(other);
                        }
                        None => {
                            return Err(Error::InvalidCommandString(
                                "unterminated quoted string".to_string(),
                            ))
                        }
                    },
                    Some(other) => text.push(other),
                    None => {
                        return Err(Error::InvalidCommandString(
                            "unterminated quoted string".to_string(),
                        ))
                    }
                }
            }
            tokens.push(Token { text, quoted: true });
        } else {
            let mut text = String::new();
            while let Some(&c) = chars.peek() {
                if c.is_whitespace() {
                    break;
                }
                text.push(c);
                chars.next();
            }
            tokens.push(Token {
                text,
                quoted: false,
            });
        }
    }
    Ok(tokens)
}

/// Type an unquoted token by shape. Single precision is the default float
/// width; a trailing `d`/`D` is the only double marker.
fn infer(text: &str) -> OscValue {
    match text {
        "true" => return OscValue::True,
        "false" => return OscValue::False,
        "impulse" => return OscValue::Impulse,
        "nil" => return OscValue::Nil,
        _ => {}
    }
    if let Some(blob) = parse_hex_blob(text) {
        return OscValue::Blob(blob);
    }
    if let Ok(i) = text.parse::<i32>() {
        return OscValue::Int32(i);
    }
    if let Some(stripped) = text.strip_suffix(['d', 'D']) {
        if looks_numeric(stripped) {
            if let Ok(d) = stripped.parse::<f64>() {
                return OscValue::Float64(d);
            }
        }
    }
    if looks_numeric(text) {
        if let Ok(f) = text.parse::<f32>() {
            return OscValue::Float32(f);
        }
    }
    OscValue::String(text.to_string())
}

/// Gate the float parses so bare words Rust would accept ("nan", "inf")
/// only count when they are spelled as the canonical non-finite forms.
fn looks_numeric(text: &str) -> bool {
    let t = text.strip_prefix(['+', '-']).unwrap_or(text);
    t.starts_with(|c: char| c.is_ascii_digit() || c == '.')
        || t.eq_ignore_ascii_case("inf")
        || t.eq_ignore_ascii_case("infinity")
        || t.eq_ignore_ascii_case("nan")
}

/// `0x` followed by an even run of hex digits; `0x` alone is the empty blob
fn parse_hex_blob(text: &str) -> Option<Vec<u8>> {
    let digits = text.strip_prefix("0x")?;
    if digits.len() % 2 != 0 {
        return None;
    }
    let mut bytes = Vec::with_capacity(digits.len() / 2);
    for pair in digits.as_bytes().chunks(2) {
        let hi = (pair[0] as char).to_digit(16)?;
        let lo = (pair[1] as char).to_digit(16)?;
        bytes.push((hi << 4 | lo) as u8);
    }
    Some(bytes)
}

fn render_argument(out: &mut String, argument: &OscValue) {
    match argument {
        OscValue::String(s) => {
            if needs_quoting(s) {
                out.push('"');
                for c in s.chars() {
                    if c == '"' || c == '\\' {
                        out.push('\\');
                    }
                    out.push(c);
                }
                out.push('"');
            } else {
                out.push_str(s);
            }
        }
        OscValue::Blob(b) => {
            out.push_str("0x");
            for byte in b {
                let _ = write!(out, "{byte:02x}");
            }
        }
        OscValue::Int32(i) => {
            let _ = write!(out, "{i}");
        }
        OscValue::Float32(f) => push_float(out, *f as f64, f.to_string(), false),
        OscValue::Float64(d) => push_float(out, *d, d.to_string(), true),
        OscValue::True => out.push_str("true"),
        OscValue::False => out.push_str("false"),
        OscValue::Impulse => out.push_str("impulse"),
        OscValue::Nil => out.push_str("nil"),
    }
}

/// Render a float so it re-parses at the same width: keep a decimal point
/// in the token and suffix doubles with `d`. `shortest` is the Display
/// form at the value's own width, so the token reproduces the same bits.
fn push_float(out: &mut String, value: f64, shortest: String, double: bool) {
    if value.is_nan() {
        out.push_str("nan");
    } else if value.is_infinite() {
        out.push_str(if value < 0.0 { "-inf" } else { "inf" });
    } else {
        out.push_str(&shortest);
        if !shortest.contains(['.', 'e', 'E']) {
            out.push_str(".0");
        }
    }
    if double {
        out.push('d');
    }
}

/// A string token must be quoted when bare rendering would drop it or type
/// it as something other than a string.
fn needs_quoting(text: &str) -> bool {
    text.is_empty()
        || text
            .chars()
            .any(|c| c.is_whitespace() || c == '"' || c == '\\')
        || !matches!(infer(text), OscValue::String(_))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_args(line: &str) -> Vec<OscValue> {
        parse(line).unwrap().arguments().to_vec()
    }

    #[test]
    fn test_quoted_string_and_int() {
        let msg = parse("/cue/1/fire \"go now\" 42").unwrap();
        assert_eq!(msg.address_pattern(), "/cue/1/fire");
        assert_eq!(
            msg.arguments(),
            &[
                OscValue::String("go now".to_string()),
                OscValue::Int32(42)
            ]
        );
        assert_eq!(msg.type_tag_string(), "si");
    }

    #[test]
    fn test_address_only_line() {
        let msg = parse("/panic").unwrap();
        assert!(msg.arguments().is_empty());
        assert_eq!(msg.type_tag_string(), "");
    }

    #[test]
    fn test_empty_and_malformed_lines() {
        assert!(matches!(parse(""), Err(Error::InvalidCommandString(_))));
        assert!(matches!(parse("   "), Err(Error::InvalidCommandString(_))));
        assert!(matches!(
            parse("cue/1/fire 42"),
            Err(Error::InvalidCommandString(_))
        ));
        assert!(matches!(
            parse("\"/quoted\" 1"),
            Err(Error::InvalidCommandString(_))
        ));
        assert!(matches!(
            parse("/a \"unterminated"),
            Err(Error::InvalidCommandString(_))
        ));
    }

    #[test]
    fn test_shape_inference() {
        assert_eq!(
            parse_args("/t 7 -3 0.5 2.5d true false impulse nil word"),
            vec![
                OscValue::Int32(7),
                OscValue::Int32(-3),
                OscValue::Float32(0.5),
                OscValue::Float64(2.5),
                OscValue::True,
                OscValue::False,
                OscValue::Impulse,
                OscValue::Nil,
                OscValue::String("word".to_string()),
            ]
        );
    }

    #[test]
    fn test_quoting_forces_string() {
        assert_eq!(
            parse_args("/t \"42\" \"true\" \"0.5\""),
            vec![
                OscValue::String("42".to_string()),
                OscValue::String("true".to_string()),
                OscValue::String("0.5".to_string()),
            ]
        );
    }

    #[test]
    fn test_escapes_in_quotes() {
        assert_eq!(
            parse_args(r#"/t "say \"go\"" "back\\slash""#),
            vec![
                OscValue::String("say \"go\"".to_string()),
                OscValue::String("back\\slash".to_string()),
            ]
        );
    }

    #[test]
    fn test_integer_overflow_falls_through() {
        // too wide for i32, no decimal point: lands as Float32 via parse
        assert_eq!(
            parse_args("/t 3000000000"),
            vec![OscValue::Float32(3_000_000_000.0)]
        );
    }

    #[test]
    fn test_hex_blob_tokens() {
        assert_eq!(
            parse_args("/t 0xdeadbeef 0x"),
            vec![
                OscValue::Blob(vec![0xde, 0xad, 0xbe, 0xef]),
                OscValue::Blob(vec![]),
            ]
        );
        // odd digit count and non-hex stay strings
        assert_eq!(
            parse_args("/t 0xabc 0xzz"),
            vec![
                OscValue::String("0xabc".to_string()),
                OscValue::String("0xzz".to_string()),
            ]
        );
    }

    #[test]
    fn test_non_finite_tokens() {
        // the canonical non-finite spellings are floats, so rendered
        // non-finite values survive a round trip
        let args = parse_args("/t inf -inf nan infd");
        assert_eq!(args[0], OscValue::Float32(f32::INFINITY));
        assert_eq!(args[1], OscValue::Float32(f32::NEG_INFINITY));
        assert!(matches!(args[2], OscValue::Float32(f) if f.is_nan()));
        assert_eq!(args[3], OscValue::Float64(f64::INFINITY));

        // a string spelled like one of them renders quoted
        let msg = Message::new("/t", vec![OscValue::String("nan".to_string())]).unwrap();
        assert_eq!(render(&msg), "/t \"nan\"");
        assert_eq!(parse(&render(&msg)).unwrap(), msg);
    }

    #[test]
    fn test_render_fire_command() {
        let msg = Message::new(
            "/cue/1/fire",
            vec![OscValue::String("go now".to_string()), OscValue::Int32(42)],
        )
        .unwrap();
        assert_eq!(render(&msg), "/cue/1/fire \"go now\" 42");
    }

    #[test]
    fn test_render_quotes_ambiguous_strings() {
        let msg = Message::new(
            "/t",
            vec![
                OscValue::String("42".to_string()),
                OscValue::String("true".to_string()),
                OscValue::String("0xff".to_string()),
                OscValue::String(String::new()),
            ],
        )
        .unwrap();
        assert_eq!(render(&msg), "/t \"42\" \"true\" \"0xff\" \"\"");
    }

    #[test]
    fn test_float_rendering_keeps_width() {
        let msg = Message::new(
            "/t",
            vec![
                OscValue::Float32(1.0),
                OscValue::Float64(1.0),
                OscValue::Float32(0.75),
            ],
        )
        .unwrap();
        assert_eq!(render(&msg), "/t 1.0 1.0d 0.75");
    }

    #[test]
    fn test_roundtrip_reparses_equal() {
        let original = Message::new(
            "/mix/4/label",
            vec![
                OscValue::String("front of house".to_string()),
                OscValue::String("plain".to_string()),
                OscValue::String("7".to_string()),
                OscValue::Int32(7),
                OscValue::Float32(0.5),
                OscValue::Float64(0.25),
                OscValue::Blob(vec![1, 2, 3]),
                OscValue::True,
                OscValue::Nil,
            ],
        )
        .unwrap();

        let reparsed = parse(&render(&original)).unwrap();
        assert_eq!(reparsed, original);
    }
}
