//! Cache Value Module
//!
//! Typed result values and the return signatures used to rebuild them.

use std::fmt;

// == Cache Value ==
/// A single typed value: one function argument or one position of a result.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheValue {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    List(Vec<CacheValue>),
}

impl CacheValue {
    /// Returns the kind that reconstructs this value after a round trip.
    pub fn kind(&self) -> ValueKind {
        match self {
            CacheValue::Null => ValueKind::Optional(Box::new(ValueKind::Any)),
            CacheValue::Bool(_) => ValueKind::Bool,
            CacheValue::Int(_) => ValueKind::Int,
            CacheValue::UInt(_) => ValueKind::UInt,
            CacheValue::Float(_) => ValueKind::Float,
            CacheValue::Str(_) => ValueKind::Str,
            CacheValue::Bytes(_) => ValueKind::Bytes,
            CacheValue::List(items) => {
                let kinds: Vec<ValueKind> = items.iter().map(CacheValue::kind).collect();
                if kinds.is_empty() {
                    ValueKind::List(Box::new(ValueKind::Any))
                } else if kinds.windows(2).all(|pair| pair[0] == pair[1]) {
                    ValueKind::List(Box::new(kinds[0].clone()))
                } else {
                    // Mixed lists keep one kind per position
                    ValueKind::Tuple(kinds)
                }
            }
        }
    }
}

impl fmt::Display for CacheValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheValue::Null => f.write_str("null"),
            CacheValue::Bool(v) => write!(f, "{}", v),
            CacheValue::Int(v) => write!(f, "{}", v),
            CacheValue::UInt(v) => write!(f, "{}", v),
            CacheValue::Float(v) => write!(f, "{}", v),
            CacheValue::Str(v) => f.write_str(v),
            CacheValue::Bytes(v) => write!(f, "{:?}", v),
            CacheValue::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<bool> for CacheValue {
    fn from(v: bool) -> Self {
        CacheValue::Bool(v)
    }
}

impl From<i64> for CacheValue {
    fn from(v: i64) -> Self {
        CacheValue::Int(v)
    }
}

impl From<i32> for CacheValue {
    fn from(v: i32) -> Self {
        CacheValue::Int(v.into())
    }
}

impl From<u64> for CacheValue {
    fn from(v: u64) -> Self {
        CacheValue::UInt(v)
    }
}

impl From<f64> for CacheValue {
    fn from(v: f64) -> Self {
        CacheValue::Float(v)
    }
}

impl From<&str> for CacheValue {
    fn from(v: &str) -> Self {
        CacheValue::Str(v.to_string())
    }
}

impl From<String> for CacheValue {
    fn from(v: String) -> Self {
        CacheValue::Str(v)
    }
}

impl From<Vec<u8>> for CacheValue {
    fn from(v: Vec<u8>) -> Self {
        CacheValue::Bytes(v)
    }
}

impl<T: Into<CacheValue>> From<Option<T>> for CacheValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(CacheValue::Null, Into::into)
    }
}

// == Value Kind ==
/// Expected type of one result position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueKind {
    Bool,
    Int,
    UInt,
    Float,
    Str,
    Bytes,
    /// Either `null` or the inner kind
    Optional(Box<ValueKind>),
    /// Homogeneous list of the inner kind
    List(Box<ValueKind>),
    /// Fixed-length list with one kind per position
    Tuple(Vec<ValueKind>),
    /// Whatever the wire text holds, decoded to its natural variant
    Any,
}

// == Signature ==
/// Ordered return signature of a cached function.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Signature(Vec<ValueKind>);

impl Signature {
    pub fn new(kinds: Vec<ValueKind>) -> Self {
        Self(kinds)
    }

    /// Derives the signature that reconstructs `values` position by position.
    pub fn of(values: &[CacheValue]) -> Self {
        Self(values.iter().map(CacheValue::kind).collect())
    }

    pub fn kinds(&self) -> &[ValueKind] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<ValueKind>> for Signature {
    fn from(kinds: Vec<ValueKind>) -> Self {
        Self(kinds)
    }
}
