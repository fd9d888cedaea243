use crate::protocol::Value;
use std::collections::BTreeMap;

/// Outcome of writing one value into an application buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionResult {
    Success,
    VarDataTruncated,
    Failure,
}

/// Application-side column buffer, filled by `SQLFetch` / `SQLGetData`.
pub trait ApplicationDataBuffer {
    fn put_value(&mut self, value: &Value) -> ConversionResult;
}

/// Bound columns keyed by 1-based column number.
pub type ColumnBindingMap = BTreeMap<u16, Box<dyn ApplicationDataBuffer>>;

/// Buffer that keeps the last value written to it.
///
/// With a `max_len`, strings longer than the cap are cut at a char
/// boundary and binaries at the byte cap; the write reports truncation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundBuffer {
    value: Option<Value>,
    max_len: Option<usize>,
}

impl BoundBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            value: None,
            max_len: Some(max_len),
        }
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn take(&mut self) -> Option<Value> {
        self.value.take()
    }
}

impl ApplicationDataBuffer for BoundBuffer {
    fn put_value(&mut self, value: &Value) -> ConversionResult {
        let Some(max_len) = self.max_len else {
            self.value = Some(value.clone());
            return ConversionResult::Success;
        };

        match value {
            Value::String(s) if s.len() > max_len => {
                let mut cut = max_len;
                while !s.is_char_boundary(cut) {
                    cut -= 1;
                }
                self.value = Some(Value::String(s[..cut].to_string()));
                ConversionResult::VarDataTruncated
            }
            Value::Binary(b) if b.len() > max_len => {
                self.value = Some(Value::Binary(b[..max_len].to_vec()));
                ConversionResult::VarDataTruncated
            }
            other => {
                self.value = Some(other.clone());
                ConversionResult::Success
            }
        }
    }
}
