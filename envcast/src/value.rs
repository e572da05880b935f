//! Configuration values

use crate::error::ValueError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Nested mapping of lower-cased key segments to values.
pub type Map = BTreeMap<String, Value>;

/// A configuration value.
///
/// Values read from the environment are always [`Value::String`]. Values
/// registered as defaults keep whatever variant they were created with, and
/// the typed getters coerce at the boundary.
///
/// ```rust
/// use envcast::Value;
///
/// assert_eq!(Value::from("8080"), Value::String("8080".into()));
/// assert_eq!(Value::from(8080u16), Value::Uint(8080));
/// assert_eq!(Value::default(), Value::String(String::new()));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    String(String),
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Map(Map),
}

impl Value {
    /// Short name of the variant, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Uint(_) => "uint",
            Self::Float(_) => "float",
            Self::Map(_) => "map",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Self::Map(_))
    }

    /// Returns `true` for the empty string, the value a lookup miss yields.
    pub fn is_empty_string(&self) -> bool {
        matches!(self, Self::String(s) if s.is_empty())
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::String(String::new())
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Self::String(v.clone())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Self::Int(v as i64)
                }
            }
        )*
    };
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Self::Uint(v as u64)
                }
            }
        )*
    };
}

impl_from_signed!(i8, i16, i32, i64, isize);
impl_from_unsigned!(u8, u16, u32, u64, usize);

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl<K, V> From<BTreeMap<K, V>> for Value
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from(m: BTreeMap<K, V>) -> Self {
        Self::Map(m.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K, V> From<HashMap<K, V>> for Value
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from(m: HashMap<K, V>) -> Self {
        Self::Map(m.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl TryFrom<serde_json::Value> for Value {
    type Error = ValueError;

    /// Objects become maps (recursively); `null` and arrays are rejected.
    fn try_from(v: serde_json::Value) -> Result<Self, Self::Error> {
        use serde_json::Value as Json;

        match v {
            Json::Null => Err(ValueError::Unsupported { kind: "null" }),
            Json::Array(_) => Err(ValueError::Unsupported { kind: "array" }),
            Json::Bool(b) => Ok(Self::Bool(b)),
            Json::String(s) => Ok(Self::String(s)),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Self::Int(i))
                } else if let Some(u) = n.as_u64() {
                    Ok(Self::Uint(u))
                } else {
                    // serde_json numbers are always one of the three
                    Ok(Self::Float(n.as_f64().unwrap_or_default()))
                }
            }
            Json::Object(obj) => obj
                .into_iter()
                .map(|(k, v)| Ok((k, Self::try_from(v)?)))
                .collect::<Result<Map, _>>()
                .map(Self::Map),
        }
    }
}
