use super::wire::{WireReader, WireWriter};
use crate::error::{OdbcError, Result};
use std::fmt;

const TAG_NULL: u8 = 0;
const TAG_STRING: u8 = 1;
const TAG_INTEGER: u8 = 2;
const TAG_BIGINT: u8 = 3;
const TAG_DECIMAL: u8 = 4;
const TAG_BINARY: u8 = 5;
const TAG_BOOL: u8 = 6;
const TAG_DOUBLE: u8 = 7;

/// A single parameter or column value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i32),
    BigInt(i64),
    Double(f64),
    Decimal(String),
    String(String),
    Binary(Vec<u8>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Writes `[tag: u8][len: u32][payload]`.
    pub fn encode(&self, w: &mut WireWriter) -> Result<()> {
        match self {
            Value::Null => {
                w.write_u8(TAG_NULL);
                w.write_u32(0);
            }
            Value::Bool(b) => {
                w.write_u8(TAG_BOOL);
                w.write_u32(1);
                w.write_bool(*b);
            }
            Value::Integer(n) => {
                w.write_u8(TAG_INTEGER);
                w.write_u32(4);
                w.write_i32(*n);
            }
            Value::BigInt(n) => {
                w.write_u8(TAG_BIGINT);
                w.write_u32(8);
                w.write_i64(*n);
            }
            Value::Double(n) => {
                w.write_u8(TAG_DOUBLE);
                w.write_u32(8);
                w.write_f64(*n);
            }
            Value::Decimal(s) => {
                w.write_u8(TAG_DECIMAL);
                w.write_str(s)?;
            }
            Value::String(s) => {
                w.write_u8(TAG_STRING);
                w.write_str(s)?;
            }
            Value::Binary(b) => {
                w.write_u8(TAG_BINARY);
                w.write_bytes(b)?;
            }
        }
        Ok(())
    }

    pub fn decode(r: &mut WireReader<'_>) -> Result<Self> {
        let tag = r.read_u8()?;
        let payload = r.read_bytes()?;

        let expect_len = |n: usize, name: &str| -> Result<()> {
            if payload.len() != n {
                return Err(OdbcError::Decode(format!(
                    "Value::{} expected {} bytes, got {}",
                    name,
                    n,
                    payload.len()
                )));
            }
            Ok(())
        };

        let value = match tag {
            TAG_NULL => Value::Null,
            TAG_BOOL => {
                expect_len(1, "Bool")?;
                Value::Bool(payload[0] != 0)
            }
            TAG_INTEGER => {
                expect_len(4, "Integer")?;
                Value::Integer(WireReader::new(payload).read_i32()?)
            }
            TAG_BIGINT => {
                expect_len(8, "BigInt")?;
                Value::BigInt(WireReader::new(payload).read_i64()?)
            }
            TAG_DOUBLE => {
                expect_len(8, "Double")?;
                Value::Double(WireReader::new(payload).read_f64()?)
            }
            TAG_DECIMAL => Value::Decimal(utf8(payload, "Decimal")?),
            TAG_STRING => Value::String(utf8(payload, "String")?),
            TAG_BINARY => Value::Binary(payload.to_vec()),
            _ => {
                return Err(OdbcError::Decode(format!("Unknown value tag: {}", tag)));
            }
        };

        Ok(value)
    }
}

fn utf8(payload: &[u8], name: &str) -> Result<String> {
    std::str::from_utf8(payload)
        .map(str::to_string)
        .map_err(|_| OdbcError::Decode(format!("Invalid UTF-8 in Value::{}", name)))
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Integer(n) => write!(f, "{}", n),
            Value::BigInt(n) => write!(f, "{}", n),
            Value::Double(n) => write!(f, "{}", n),
            Value::Decimal(s) | Value::String(s) => f.write_str(s),
            Value::Binary(b) => {
                for byte in b {
                    write!(f, "{:02x}", byte)?;
                }
                Ok(())
            }
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::BigInt(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}
