//! Environment-then-default accessors

use crate::coerce::FromValue;
use crate::error::EnvError;
use crate::store::DefaultStore;
use crate::value::Value;
use std::collections::HashMap;
use std::env;
use std::sync::{PoisonError, RwLock, RwLockReadGuard};

/// Where raw environment strings come from.
pub trait Source: Send + Sync {
    /// Value of variable `name`, or `None` if it is not set.
    fn var(&self, name: &str) -> Option<String>;
}

/// The process environment.
///
/// Values that are not valid UTF-8 are converted lossily.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Source for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        env::var_os(name).map(|v| v.to_string_lossy().into_owned())
    }
}

/// An in-memory environment.
///
/// ```rust
/// use envcast::{Env, MapSource};
///
/// let env = Env::with_source(MapSource::from([("port", "9000")]));
/// assert_eq!(env.get_uint32("PORT"), 9000);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MapSource {
    vars: HashMap<String, String>,
}

impl MapSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for MapSource
where
    K: Into<String>,
    V: Into<String>,
{
    fn from(vars: [(K, V); N]) -> Self {
        vars.into_iter().collect()
    }
}

impl<K, V> FromIterator<(K, V)> for MapSource
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl Source for MapSource {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

/// Case-insensitive configuration lookup.
///
/// Every key is lower-cased. A lookup returns the environment variable of
/// that exact lower-cased name when it is set and non-empty, otherwise the
/// registered default, otherwise nothing.
///
/// The default store sits behind a read-write lock, so an `Env` can be
/// shared across threads and defaults may be registered at any time.
///
/// # Example
///
/// ```rust
/// use envcast::Env;
///
/// # fn main() -> anyhow::Result<()> {
/// let env = Env::new();
/// env.set_default("Max_Connections", 10);
/// env.set_default("Debug", false);
///
/// # std::env::remove_var("max_connections");
/// # std::env::remove_var("debug");
/// assert_eq!(env.get_int("MAX_CONNECTIONS"), 10);
/// assert!(!env.get_bool("debug"));
/// assert_eq!(env.try_get::<u16>("max_connections")?, 10);
/// # Ok(())
/// # }
/// ```
pub struct Env {
    source: Box<dyn Source>,
    defaults: RwLock<DefaultStore>,
}

impl Env {
    /// Lookup backed by the process environment.
    pub fn new() -> Self {
        Self::with_source(ProcessEnv)
    }

    pub fn with_source(source: impl Source + 'static) -> Self {
        Self {
            source: Box::new(source),
            defaults: RwLock::new(DefaultStore::new()),
        }
    }

    /// Replace the default store with a pre-built one.
    pub fn with_defaults(mut self, defaults: DefaultStore) -> Self {
        self.defaults = RwLock::new(defaults);
        self
    }

    /// Register a default value for `key`. See [`DefaultStore::set_default`].
    pub fn set_default(&self, key: &str, value: impl Into<Value>) {
        self.defaults
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .set_default(key, value);
    }

    /// Read access to the registered defaults.
    pub fn defaults(&self) -> RwLockReadGuard<'_, DefaultStore> {
        self.defaults.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Look up `key`, returning `None` when neither the environment nor the
    /// defaults provide it.
    pub fn lookup(&self, key: &str) -> Option<Value> {
        let key = key.to_lowercase();
        self.lookup_with(&key, |defaults| defaults.get(&key).cloned())
    }

    /// Look up `key` and return the raw value, or an empty string on a miss.
    ///
    /// The key is flat: `get("a.b")` reads the variable `a.b` and the
    /// top-level default named `a.b`. It does not descend into a default
    /// registered as `set_default("a.b", ..)`, which lives at `a` → `b`.
    /// Use [`Env::get_nested`] for that.
    pub fn get(&self, key: &str) -> Value {
        self.lookup(key).unwrap_or_default()
    }

    /// Like [`Env::get`], but a dotted key is followed through nested
    /// defaults.
    pub fn get_nested(&self, key: &str) -> Value {
        let key = key.to_lowercase();
        self.lookup_with(&key, |defaults| defaults.get_path(&key).cloned())
            .unwrap_or_default()
    }

    fn lookup_with<F>(&self, key: &str, from_defaults: F) -> Option<Value>
    where
        F: FnOnce(&DefaultStore) -> Option<Value>,
    {
        if let Some(value) = self.source.var(key).filter(|v| !v.is_empty()) {
            log::trace!("'{}' read from environment", key);
            return Some(Value::String(value));
        }
        let found = from_defaults(&*self.defaults());
        match &found {
            Some(_) => log::trace!("'{}' read from defaults", key),
            None => log::trace!("'{}' not found", key),
        }
        found
    }

    /// Look up `key` and convert it to `T`.
    ///
    /// # Errors
    ///
    /// [`EnvError::Missing`] when the key is absent, [`EnvError::Coerce`]
    /// when the value does not convert.
    pub fn try_get<T: FromValue>(&self, key: &str) -> Result<T, EnvError> {
        let key = key.to_lowercase();
        let value = self.lookup(&key).ok_or_else(|| EnvError::missing(&key))?;
        T::from_value(&value).map_err(|e| EnvError::coerce::<T>(key, e))
    }

    /// Look up `key` and convert it to `T`, falling back to `T::default()`.
    pub fn get_as<T: FromValue + Default>(&self, key: &str) -> T {
        match T::from_value(&self.get(key)) {
            Ok(v) => v,
            Err(e) => {
                log::debug!("using zero value for '{}': {}", key.to_lowercase(), e);
                T::default()
            }
        }
    }

    pub fn get_string(&self, key: &str) -> String {
        self.get_as(key)
    }

    pub fn get_bool(&self, key: &str) -> bool {
        self.get_as(key)
    }

    pub fn get_int(&self, key: &str) -> isize {
        self.get_as(key)
    }

    pub fn get_int32(&self, key: &str) -> i32 {
        self.get_as(key)
    }

    pub fn get_int64(&self, key: &str) -> i64 {
        self.get_as(key)
    }

    pub fn get_uint(&self, key: &str) -> usize {
        self.get_as(key)
    }

    pub fn get_uint32(&self, key: &str) -> u32 {
        self.get_as(key)
    }

    pub fn get_uint64(&self, key: &str) -> u64 {
        self.get_as(key)
    }

    pub fn get_float64(&self, key: &str) -> f64 {
        self.get_as(key)
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Env {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Env")
            .field("defaults", &*self.defaults())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoerceReason;
    use serial_test::serial;
    use std::collections::HashMap;
    use std::env;

    fn env_with(vars: &[(&str, &str)]) -> Env {
        Env::with_source(vars.iter().copied().collect::<MapSource>())
    }

    #[test]
    fn test_default_is_case_insensitive() {
        let env = env_with(&[]);
        env.set_default("Some_Key", "v");
        assert_eq!(env.get("SOME_KEY"), Value::from("v"));
        assert_eq!(env.get("some_key"), Value::from("v"));
        assert_eq!(env.get("sOmE_kEy"), Value::from("v"));
    }

    #[test]
    fn test_environment_wins_over_default() {
        let env = env_with(&[("foo", "bar")]);
        env.set_default("foo", "baz");
        assert_eq!(env.get_string("foo"), "bar");
        assert_eq!(env.get_string("FOO"), "bar");
    }

    #[test]
    fn test_empty_environment_value_falls_back() {
        let env = env_with(&[("foo", "")]);
        env.set_default("foo", "baz");
        assert_eq!(env.get_string("foo"), "baz");
    }

    #[test]
    fn test_environment_name_is_lowercased() {
        // Only the lower-cased variable name is consulted.
        let env = env_with(&[("FOO", "upper")]);
        assert_eq!(env.get("foo"), Value::default());
        assert_eq!(env.get("FOO"), Value::default());
    }

    #[test]
    fn test_miss_is_empty_string() {
        let env = env_with(&[]);
        assert!(env.get("missing").is_empty_string());
        assert_eq!(env.lookup("missing"), None);
        assert_eq!(env.get_int("missing_key"), 0);
        assert!(!env.get_bool("missing_key"));
        assert_eq!(env.get_string("missing_key"), "");
    }

    #[test]
    fn test_default_keeps_its_type() {
        let env = env_with(&[]);
        env.set_default("port", 8080u16);
        assert_eq!(env.get("port"), Value::Uint(8080));
        assert_eq!(env.get_string("port"), "8080");
        assert_eq!(env.get_int32("port"), 8080);
    }

    #[test]
    fn test_dotted_default_not_found_by_flat_get() {
        let env = env_with(&[]);
        env.set_default("a.b.c", "x");

        assert!(env.get("a.b.c").is_empty_string());
        assert_eq!(env.get_nested("A.B.C"), Value::from("x"));

        let a = env.get("a");
        let b = a.as_map().and_then(|m| m.get("b")).and_then(Value::as_map);
        assert_eq!(b.and_then(|m| m.get("c")), Some(&Value::from("x")));
    }

    #[test]
    fn test_get_nested_prefers_environment() {
        let env = env_with(&[("db.host", "remote")]);
        env.set_default("db.host", "localhost");
        assert_eq!(env.get_nested("DB.HOST"), Value::from("remote"));
    }

    #[test]
    fn test_registered_map_keys_are_lowercased() {
        let env = env_with(&[]);
        env.set_default("M", HashMap::from([("Key", 1)]));

        let m = env.get("m");
        let map = m.as_map().unwrap();
        assert_eq!(map.get("key"), Some(&Value::Int(1)));
        assert!(!map.contains_key("Key"));
    }

    #[test]
    fn test_get_bool() {
        let env = env_with(&[
            ("a", "TRUE"),
            ("b", "1"),
            ("c", "t"),
            ("d", "false"),
            ("e", "0"),
            ("f", "xyz"),
        ]);
        assert!(env.get_bool("a"));
        assert!(env.get_bool("b"));
        assert!(env.get_bool("c"));
        assert!(!env.get_bool("d"));
        assert!(!env.get_bool("e"));
        assert!(!env.get_bool("f"));
    }

    #[test]
    fn test_integer_getters() {
        let env = env_with(&[("n", "42"), ("neg", "-7"), ("big", "3000000000"), ("bad", "4x")]);

        assert_eq!(env.get_int("n"), 42);
        assert_eq!(env.get_int32("neg"), -7);
        assert_eq!(env.get_int64("big"), 3_000_000_000);
        assert_eq!(env.get_int32("big"), 0);
        assert_eq!(env.get_uint32("big"), 3_000_000_000);
        assert_eq!(env.get_int("bad"), 0);
        assert_eq!(env.get_uint64("bad"), 0);
    }

    #[test]
    fn test_unsigned_getters_reject_negative() {
        let env = env_with(&[("neg", "-1")]);
        assert_eq!(env.get_uint("neg"), 0);
        assert_eq!(env.get_uint32("neg"), 0);
        assert_eq!(env.get_uint64("neg"), 0);
    }

    #[test]
    fn test_get_float64() {
        let env = env_with(&[("ratio", "0.25")]);
        assert_eq!(env.get_float64("ratio"), 0.25);
        assert_eq!(env.get_float64("missing"), 0.0);
    }

    #[test]
    fn test_try_get_missing() {
        let env = env_with(&[]);
        let err = env.try_get::<u32>("Nope").unwrap_err();
        assert!(matches!(err, EnvError::Missing { ref key } if key == "nope"));
    }

    #[test]
    fn test_try_get_coerce_error() {
        let env = env_with(&[("port", "-80")]);
        match env.try_get::<u16>("PORT") {
            Err(EnvError::Coerce {
                key,
                type_name,
                source,
            }) => {
                assert_eq!(key, "port");
                assert!(type_name.contains("u16"));
                assert_eq!(source.reason, CoerceReason::Negative);
            }
            other => panic!("Expected Coerce error, got {:?}", other),
        }
    }

    #[test]
    fn test_try_get_distinguishes_explicit_zero() {
        let env = env_with(&[("zero", "0")]);
        assert_eq!(env.try_get::<i64>("zero").unwrap(), 0);
        assert!(env.try_get::<i64>("absent").is_err());
    }

    #[test]
    fn test_with_defaults() {
        let mut store = DefaultStore::new();
        store.set_default("Name", "svc");
        let env = env_with(&[]).with_defaults(store);
        assert_eq!(env.get_string("name"), "svc");
        assert_eq!(env.defaults().len(), 1);
    }

    #[test]
    fn test_shared_across_threads() {
        let env = std::sync::Arc::new(env_with(&[]));
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let env = env.clone();
                std::thread::spawn(move || env.set_default(&format!("worker.{i}"), i))
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        let worker = env.get("worker");
        assert_eq!(worker.as_map().map(|m| m.len()), Some(4));
        assert_eq!(env.get_nested("worker.3"), Value::Int(3));
    }

    #[test]
    #[serial]
    fn test_process_env_source() {
        env::set_var("envcast_test_source", "from-process");
        assert_eq!(
            ProcessEnv.var("envcast_test_source"),
            Some("from-process".to_string())
        );
        env::remove_var("envcast_test_source");
        assert_eq!(ProcessEnv.var("envcast_test_source"), None);
    }
}
