//! Error types for environment lookup and value coercion

/// Errors returned by the result-bearing accessors (`Env::try_get` and friends).
///
/// The zero-value getters never return these; they exist for callers that
/// need to tell an absent key apart from a malformed one.
#[derive(Debug, thiserror::Error)]
pub enum EnvError {
    /// Key is neither set in the environment nor registered as a default.
    #[error("Key '{key}' is not set in the environment and has no default")]
    Missing {
        /// Lower-cased key that was looked up
        key: String,
    },

    /// Key was found but its value could not be converted to the target type.
    #[error("Failed to read key '{key}' as {type_name}: {source}")]
    Coerce {
        /// Lower-cased key that was looked up
        key: String,
        /// Fully qualified type name the conversion was attempted for
        type_name: String,
        /// Underlying conversion failure
        source: CoerceError,
    },
}

impl EnvError {
    #[doc(hidden)]
    pub fn missing(key: impl Into<String>) -> Self {
        Self::Missing { key: key.into() }
    }

    #[doc(hidden)]
    pub fn coerce<T>(key: impl Into<String>, source: CoerceError) -> Self {
        Self::Coerce {
            key: key.into(),
            type_name: std::any::type_name::<T>().to_string(),
            source,
        }
    }
}

/// A value could not be converted to the requested type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot convert {value} to {target}: {reason}")]
pub struct CoerceError {
    /// Short name of the target type (e.g. `u32`)
    pub target: &'static str,
    /// Debug rendering of the offending value
    pub value: String,
    /// What went wrong
    pub reason: CoerceReason,
}

/// Why a coercion failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CoerceReason {
    #[error("not a valid literal")]
    Invalid,
    #[error("out of range")]
    OutOfRange,
    #[error("negative values are not allowed")]
    Negative,
    #[error("nested maps have no scalar form")]
    Map,
}

/// Errors converting foreign data into a [`Value`](crate::Value).
#[derive(Debug, thiserror::Error)]
pub enum ValueError {
    /// The input has no representation as a configuration value.
    #[error("unsupported {kind} value")]
    Unsupported {
        /// Kind of the rejected input (e.g. "null", "array")
        kind: &'static str,
    },
}
