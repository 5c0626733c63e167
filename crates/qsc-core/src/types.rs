//! OSC argument values and type tags

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Type tag characters, one per argument variant
pub mod tag {
    pub const STRING: char = 's';
    pub const BLOB: char = 'b';
    pub const INT32: char = 'i';
    pub const FLOAT32: char = 'f';
    pub const FLOAT64: char = 'd';
    pub const TRUE: char = 'T';
    pub const FALSE: char = 'F';
    pub const IMPULSE: char = 'I';
    pub const NIL: char = 'N';
}

/// A single OSC argument
///
/// Covers the required types for OSC 1.0 and 1.1, with the exception of
/// timetag. The numeric variants are distinct on purpose: OSC gives `i`,
/// `f`, and `d` different wire encodings, and nothing here widens or
/// narrows between them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OscValue {
    String(String),
    Blob(Vec<u8>),
    Int32(i32),
    Float32(f32),
    Float64(f64),
    True,
    False,
    Impulse,
    Nil,
}

impl OscValue {
    /// The canonical type tag character for this value
    pub fn type_tag(&self) -> char {
        match self {
            OscValue::String(_) => tag::STRING,
            OscValue::Blob(_) => tag::BLOB,
            OscValue::Int32(_) => tag::INT32,
            OscValue::Float32(_) => tag::FLOAT32,
            OscValue::Float64(_) => tag::FLOAT64,
            OscValue::True => tag::TRUE,
            OscValue::False => tag::FALSE,
            OscValue::Impulse => tag::IMPULSE,
            OscValue::Nil => tag::NIL,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            OscValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_blob(&self) -> Option<&[u8]> {
        match self {
            OscValue::Blob(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            OscValue::Int32(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            OscValue::Float32(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            OscValue::Float64(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OscValue::True => Some(true),
            OscValue::False => Some(false),
            _ => None,
        }
    }

    /// Convert a generic JSON value into an OSC argument.
    ///
    /// This is where the closed-set check lives: integers that fit `i32`
    /// become [`OscValue::Int32`], other numbers become
    /// [`OscValue::Float64`] (JSON numbers are double-width), booleans and
    /// null map to the singleton variants, and anything without an OSC
    /// counterpart fails with [`Error::UnsupportedArgumentType`].
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::Null => Ok(OscValue::Nil),
            serde_json::Value::Bool(true) => Ok(OscValue::True),
            serde_json::Value::Bool(false) => Ok(OscValue::False),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    i32::try_from(i).map(OscValue::Int32).map_err(|_| {
                        Error::UnsupportedArgumentType(format!("integer out of i32 range: {n}"))
                    })
                } else if let Some(d) = n.as_f64() {
                    Ok(OscValue::Float64(d))
                } else {
                    Err(Error::UnsupportedArgumentType(format!(
                        "unrepresentable number: {n}"
                    )))
                }
            }
            serde_json::Value::String(s) => Ok(OscValue::String(s.clone())),
            serde_json::Value::Array(_) => {
                Err(Error::UnsupportedArgumentType("array".to_string()))
            }
            serde_json::Value::Object(_) => {
                Err(Error::UnsupportedArgumentType("object".to_string()))
            }
        }
    }
}

impl From<&str> for OscValue {
    fn from(v: &str) -> Self {
        OscValue::String(v.to_string())
    }
}

impl From<String> for OscValue {
    fn from(v: String) -> Self {
        OscValue::String(v)
    }
}

impl From<Vec<u8>> for OscValue {
    fn from(v: Vec<u8>) -> Self {
        OscValue::Blob(v)
    }
}

impl From<i32> for OscValue {
    fn from(v: i32) -> Self {
        OscValue::Int32(v)
    }
}

impl From<f32> for OscValue {
    fn from(v: f32) -> Self {
        OscValue::Float32(v)
    }
}

impl From<f64> for OscValue {
    fn from(v: f64) -> Self {
        OscValue::Float64(v)
    }
}

impl From<bool> for OscValue {
    fn from(v: bool) -> Self {
        if v {
            OscValue::True
        } else {
            OscValue::False
        }
    }
}

/// Derive the type tag string for an argument sequence, one character per
/// argument, in order
pub fn type_tag_string(arguments: &[OscValue]) -> String {
    arguments.iter().map(OscValue::type_tag).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_per_variant() {
        assert_eq!(OscValue::from("x").type_tag(), 's');
        assert_eq!(OscValue::from(vec![1u8]).type_tag(), 'b');
        assert_eq!(OscValue::from(7i32).type_tag(), 'i');
        assert_eq!(OscValue::from(0.5f32).type_tag(), 'f');
        assert_eq!(OscValue::from(0.5f64).type_tag(), 'd');
        assert_eq!(OscValue::from(true).type_tag(), 'T');
        assert_eq!(OscValue::from(false).type_tag(), 'F');
        assert_eq!(OscValue::Impulse.type_tag(), 'I');
        assert_eq!(OscValue::Nil.type_tag(), 'N');
    }

    #[test]
    fn test_type_tag_string_order() {
        let args = vec![
            OscValue::from("go"),
            OscValue::from(42i32),
            OscValue::from(0.75f32),
            OscValue::Impulse,
        ];
        assert_eq!(type_tag_string(&args), "sifI");
        assert_eq!(type_tag_string(&args).len(), args.len());
        assert_eq!(type_tag_string(&[]), "");
    }

    #[test]
    fn test_from_json() {
        use serde_json::json;

        assert_eq!(OscValue::from_json(&json!(null)).unwrap(), OscValue::Nil);
        assert_eq!(OscValue::from_json(&json!(true)).unwrap(), OscValue::True);
        assert_eq!(
            OscValue::from_json(&json!(42)).unwrap(),
            OscValue::Int32(42)
        );
        assert_eq!(
            OscValue::from_json(&json!(0.5)).unwrap(),
            OscValue::Float64(0.5)
        );
        assert_eq!(
            OscValue::from_json(&json!("hi")).unwrap(),
            OscValue::String("hi".to_string())
        );
    }

    #[test]
    fn test_from_json_unsupported() {
        use serde_json::json;

        assert!(matches!(
            OscValue::from_json(&json!([1, 2])),
            Err(Error::UnsupportedArgumentType(_))
        ));
        assert!(matches!(
            OscValue::from_json(&json!({"a": 1})),
            Err(Error::UnsupportedArgumentType(_))
        ));
        assert!(matches!(
            OscValue::from_json(&json!(1_i64 << 40)),
            Err(Error::UnsupportedArgumentType(_))
        ));
    }
}
