//! Parameter values and maps
//!
//! A parameter value is an opaque, structurally-comparable scalar or an
//! ordered list of scalars. Equality is deep value equality; `foo=1` asserted
//! by two sources is one value, not two.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A parameter map: case-sensitive keys, unique per map, deterministic
/// iteration order
pub type ParamMap = BTreeMap<String, ParamValue>;

/// A single parameter value
///
/// Lists may only hold scalars; nesting is rejected by validation before a
/// value ever enters the graph.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Boolean scalar
    Bool(bool),
    /// Integer scalar
    Int(i64),
    /// String scalar
    Str(String),
    /// Ordered list of scalars
    List(Vec<ParamValue>),
}

impl ParamValue {
    /// Whether this value is a scalar (not a list)
    pub fn is_scalar(&self) -> bool {
        !matches!(self, ParamValue::List(_))
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Str(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Str(s)
    }
}

impl From<i64> for ParamValue {
    fn from(i: i64) -> Self {
        ParamValue::Int(i)
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::Bool(b)
    }
}

impl From<Vec<ParamValue>> for ParamValue {
    fn from(items: Vec<ParamValue>) -> Self {
        ParamValue::List(items)
    }
}

impl std::fmt::Display for ParamValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamValue::Bool(b) => write!(f, "{}", b),
            ParamValue::Int(i) => write!(f, "{}", i),
            ParamValue::Str(s) => write!(f, "{}", s),
            ParamValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}
