//! Case-insensitive environment lookup with registered defaults
//!
//! `envcast` reads configuration values from environment variables, falls
//! back to defaults registered by the program, and converts the result to
//! the type the caller asks for.
//!
//! # Features
//!
//! - **Case-insensitive keys**: every key is lower-cased before lookup
//! - **Environment first**: a set, non-empty variable always wins over a default
//! - **Nested defaults**: `set_default("db.host", ..)` builds a tree of maps
//! - **Zero-value getters**: `get_int`, `get_bool`, ... never fail
//! - **Checked getters**: `try_get::<T>` reports missing and malformed values
//!
//! # Lookup Rules
//!
//! For a key `K`:
//! 1. the environment variable named `lowercase(K)`, if set and non-empty
//! 2. the top-level default registered under `lowercase(K)`
//! 3. otherwise an empty string
//!
//! Dotted keys are *not* traversed by `get`; a default registered as
//! `"db.host"` is reachable through `get("db")` (a map) or
//! [`Env::get_nested`].
//!
//! # Example
//!
//! ```rust
//! # fn main() -> anyhow::Result<()> {
//! #     std::env::remove_var("server_port");
//! envcast::set_default("SERVER_PORT", 8080);
//! envcast::set_default("Database.Host", "localhost");
//!
//! assert_eq!(envcast::get_uint32("server_port"), 8080);
//! assert_eq!(envcast::global().get_nested("database.host").coerce::<String>()?, "localhost");
//!
//! std::env::set_var("server_port", "9090");
//! assert_eq!(envcast::get_int("Server_Port"), 9090);
//! #     std::env::remove_var("server_port");
//! #     Ok(())
//! # }
//! ```
//!
//! # Explicit instances
//!
//! The free functions share one process-wide [`Env`]. Components that want
//! their own defaults, or an environment other than the process one, build
//! an [`Env`] directly:
//!
//! ```rust
//! use envcast::{Env, MapSource};
//!
//! let env = Env::with_source(MapSource::from([("debug", "TRUE")]));
//! env.set_default("workers", 4);
//!
//! assert!(env.get_bool("DEBUG"));
//! assert_eq!(env.get_uint("Workers"), 4);
//! ```

mod coerce;
mod env;
mod error;
mod store;
mod value;

use std::sync::LazyLock;

pub use coerce::FromValue;
pub use env::{Env, MapSource, ProcessEnv, Source};
pub use error::{CoerceError, CoerceReason, EnvError, ValueError};
pub use store::{insensitivise, DefaultStore};
pub use value::{Map, Value};

static GLOBAL: LazyLock<Env> = LazyLock::new(Env::new);

/// The process-wide [`Env`] behind the free functions.
pub fn global() -> &'static Env {
    &GLOBAL
}

/// Register a process-wide default for `key`.
///
/// Keys are case-insensitive; dots denote nesting.
pub fn set_default(key: &str, value: impl Into<Value>) {
    GLOBAL.set_default(key, value)
}

/// Value for `key` from the environment or the process-wide defaults.
pub fn get(key: &str) -> Value {
    GLOBAL.get(key)
}

pub fn get_string(key: &str) -> String {
    GLOBAL.get_string(key)
}

pub fn get_bool(key: &str) -> bool {
    GLOBAL.get_bool(key)
}

pub fn get_int(key: &str) -> isize {
    GLOBAL.get_int(key)
}

pub fn get_int32(key: &str) -> i32 {
    GLOBAL.get_int32(key)
}

pub fn get_int64(key: &str) -> i64 {
    GLOBAL.get_int64(key)
}

pub fn get_uint(key: &str) -> usize {
    GLOBAL.get_uint(key)
}

pub fn get_uint32(key: &str) -> u32 {
    GLOBAL.get_uint32(key)
}

pub fn get_uint64(key: &str) -> u64 {
    GLOBAL.get_uint64(key)
}
