//! Best-effort conversion of [`Value`]s into concrete types
//!
//! # Rules
//!
//! - **Strings** keep strings; booleans render as `true`/`false`, numbers in
//!   decimal.
//! - **Booleans** accept `1 t T TRUE true True` and `0 f F FALSE false False`;
//!   numbers are `true` when non-zero.
//! - **Integers** accept an optional sign and the `0x`, `0o` (or bare leading
//!   `0`) and `0b` prefixes. A trailing all-zero fraction such as `10.00` is
//!   ignored. Floats truncate toward zero. Values that do not fit the target
//!   width are rejected.
//! - **Unsigned integers** follow the integer rules but reject any negative
//!   input instead of wrapping.
//!
//! Maps have no scalar form and never coerce.

use crate::error::{CoerceError, CoerceReason};
use crate::value::Value;

/// Types that can be produced from a configuration [`Value`].
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Result<Self, CoerceError>;
}

impl Value {
    /// Convert this value to `T`.
    ///
    /// ```rust
    /// use envcast::Value;
    ///
    /// assert_eq!(Value::from("0x1F").coerce::<u8>().unwrap(), 31);
    /// assert!(Value::from("-1").coerce::<u32>().is_err());
    /// ```
    pub fn coerce<T: FromValue>(&self) -> Result<T, CoerceError> {
        T::from_value(self)
    }
}

fn fail<T>(target: &'static str, value: &Value, reason: CoerceReason) -> Result<T, CoerceError> {
    Err(CoerceError {
        target,
        value: format!("{:?}", value),
        reason,
    })
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Result<Self, CoerceError> {
        Ok(value.clone())
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self, CoerceError> {
        match value {
            Value::String(s) => Ok(s.clone()),
            Value::Bool(b) => Ok(b.to_string()),
            Value::Int(i) => Ok(i.to_string()),
            Value::Uint(u) => Ok(u.to_string()),
            Value::Float(f) => Ok(f.to_string()),
            Value::Map(_) => fail("string", value, CoerceReason::Map),
        }
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Result<Self, CoerceError> {
        match value {
            Value::Bool(b) => Ok(*b),
            Value::String(s) => match parse_bool(s) {
                Some(b) => Ok(b),
                None => fail("bool", value, CoerceReason::Invalid),
            },
            Value::Int(i) => Ok(*i != 0),
            Value::Uint(u) => Ok(*u != 0),
            Value::Float(f) => Ok(*f != 0.0),
            Value::Map(_) => fail("bool", value, CoerceReason::Map),
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Result<Self, CoerceError> {
        match value {
            Value::Float(f) => Ok(*f),
            Value::Int(i) => Ok(*i as f64),
            Value::Uint(u) => Ok(*u as f64),
            Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
            Value::String(s) => s
                .parse::<f64>()
                .or_else(|_| fail("f64", value, CoerceReason::Invalid)),
            Value::Map(_) => fail("f64", value, CoerceReason::Map),
        }
    }
}

macro_rules! impl_from_value_int {
    ($($t:ty),*) => {
        $(
            impl FromValue for $t {
                fn from_value(value: &Value) -> Result<Self, CoerceError> {
                    let target = stringify!($t);
                    let unsigned = <$t>::MIN == 0;
                    let wide = integer_of(value).or_else(|reason| fail(target, value, reason))?;
                    // -0.5 truncates to 0 but is still negative
                    let negative_float = matches!(value, Value::Float(f) if *f < 0.0);
                    if unsigned && (wide < 0 || negative_float) {
                        return fail(target, value, CoerceReason::Negative);
                    }
                    <$t>::try_from(wide).or_else(|_| fail(target, value, CoerceReason::OutOfRange))
                }
            }
        )*
    };
}

impl_from_value_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

/// Widen any scalar to `i128` following the integer rules.
fn integer_of(value: &Value) -> Result<i128, CoerceReason> {
    match value {
        Value::Int(i) => Ok(i128::from(*i)),
        Value::Uint(u) => Ok(i128::from(*u)),
        Value::Bool(b) => Ok(i128::from(*b)),
        Value::Float(f) => truncate_float(*f),
        Value::String(s) => parse_int(s),
        Value::Map(_) => Err(CoerceReason::Map),
    }
}

fn truncate_float(f: f64) -> Result<i128, CoerceReason> {
    if !f.is_finite() {
        return Err(CoerceReason::Invalid);
    }
    let t = f.trunc();
    if t < i128::MIN as f64 || t >= i128::MAX as f64 {
        return Err(CoerceReason::OutOfRange);
    }
    Ok(t as i128)
}

/// Parse the literal booleans.
pub(crate) fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Parse an integer literal with optional sign and base prefix.
pub(crate) fn parse_int(s: &str) -> Result<i128, CoerceReason> {
    let s = trim_zero_decimal(s);
    let (negative, s) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let (radix, digits) = if let Some(rest) = strip_prefix_ci(s, "0x") {
        (16, rest)
    } else if let Some(rest) = strip_prefix_ci(s, "0b") {
        (2, rest)
    } else if let Some(rest) = strip_prefix_ci(s, "0o") {
        (8, rest)
    } else if s.len() > 1 && s.starts_with('0') {
        (8, &s[1..])
    } else {
        (10, s)
    };

    let magnitude = parse_digits(digits, radix)?;
    if negative {
        Ok(-magnitude)
    } else {
        Ok(magnitude)
    }
}

fn strip_prefix_ci<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&s[prefix.len()..])
    } else {
        None
    }
}

/// Accumulate digits of `radix`; `_` is only allowed between two digits.
fn parse_digits(digits: &str, radix: u32) -> Result<i128, CoerceReason> {
    if digits.is_empty() {
        return Err(CoerceReason::Invalid);
    }

    let bytes = digits.as_bytes();
    let mut acc: i128 = 0;
    for (i, &b) in bytes.iter().enumerate() {
        if b == b'_' {
            let between = i > 0
                && i + 1 < bytes.len()
                && bytes[i - 1] != b'_'
                && bytes[i + 1] != b'_';
            if !between {
                return Err(CoerceReason::Invalid);
            }
            continue;
        }
        let d = (b as char).to_digit(radix).ok_or(CoerceReason::Invalid)?;
        acc = acc
            .checked_mul(i128::from(radix))
            .and_then(|v| v.checked_add(i128::from(d)))
            .ok_or(CoerceReason::OutOfRange)?;
        if acc > i128::from(u64::MAX) {
            return Err(CoerceReason::OutOfRange);
        }
    }
    Ok(acc)
}

/// Drop a trailing `.000…` fraction, so `"10.00"` reads as `"10"`.
///
/// Anything else (including `"10."` or `"10.5"`) is returned unchanged.
fn trim_zero_decimal(s: &str) -> &str {
    let mut found_zero = false;
    for (i, b) in s.bytes().enumerate().rev() {
        match b {
            b'.' if found_zero => return &s[..i],
            b'0' => found_zero = true,
            _ => return s,
        }
    }
    s
}
