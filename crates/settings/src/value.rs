//! Per-type value conversions between setting values and JSON.

use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    #[error("number does not fit in {target}")]
    OutOfRange { target: &'static str },
    #[error("invalid value: {0}")]
    Invalid(String),
}

/// Conversions and equivalence for one setting value type.
///
/// Implemented once per type and resolved at compile time; there is no
/// type-erased fallback, so every `T` stored in a setting node supplies all
/// three operations. `eq_values` is the equivalence used to suppress
/// redundant change notifications — it does not have to be bit-equality.
pub trait SettingValue: Clone + 'static {
    fn to_json(&self) -> Value;

    fn from_json(value: &Value) -> Result<Self, ValueError>;

    fn eq_values(&self, other: &Self) -> bool;
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn type_mismatch(expected: &'static str, found: &Value) -> ValueError {
    ValueError::TypeMismatch {
        expected,
        found: json_type_name(found),
    }
}

impl SettingValue for bool {
    fn to_json(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_json(value: &Value) -> Result<Self, ValueError> {
        value.as_bool().ok_or_else(|| type_mismatch("boolean", value))
    }

    fn eq_values(&self, other: &Self) -> bool {
        self == other
    }
}

macro_rules! impl_setting_value_signed {
    ($($ty:ty),* $(,)?) => {$(
        impl SettingValue for $ty {
            fn to_json(&self) -> Value {
                Value::from(*self)
            }

            fn from_json(value: &Value) -> Result<Self, ValueError> {
                if let Some(n) = value.as_i64() {
                    return Self::try_from(n).map_err(|_| ValueError::OutOfRange {
                        target: stringify!($ty),
                    });
                }
                if value.as_u64().is_some() {
                    return Err(ValueError::OutOfRange {
                        target: stringify!($ty),
                    });
                }
                Err(type_mismatch("integer", value))
            }

            fn eq_values(&self, other: &Self) -> bool {
                self == other
            }
        }
    )*};
}

macro_rules! impl_setting_value_unsigned {
    ($($ty:ty),* $(,)?) => {$(
        impl SettingValue for $ty {
            fn to_json(&self) -> Value {
                Value::from(*self)
            }

            fn from_json(value: &Value) -> Result<Self, ValueError> {
                if let Some(n) = value.as_u64() {
                    return Self::try_from(n).map_err(|_| ValueError::OutOfRange {
                        target: stringify!($ty),
                    });
                }
                if value.as_i64().is_some() {
                    // Negative numbers never fit an unsigned target.
                    return Err(ValueError::OutOfRange {
                        target: stringify!($ty),
                    });
                }
                Err(type_mismatch("integer", value))
            }

            fn eq_values(&self, other: &Self) -> bool {
                self == other
            }
        }
    )*};
}

impl_setting_value_signed!(i8, i16, i32, i64, isize);
impl_setting_value_unsigned!(u8, u16, u32, u64, usize);

impl SettingValue for f64 {
    fn to_json(&self) -> Value {
        Value::from(*self)
    }

    fn from_json(value: &Value) -> Result<Self, ValueError> {
        value.as_f64().ok_or_else(|| type_mismatch("number", value))
    }

    fn eq_values(&self, other: &Self) -> bool {
        self == other
    }
}

impl SettingValue for f32 {
    fn to_json(&self) -> Value {
        Value::from(*self)
    }

    fn from_json(value: &Value) -> Result<Self, ValueError> {
        value
            .as_f64()
            .map(|n| n as f32)
            .ok_or_else(|| type_mismatch("number", value))
    }

    fn eq_values(&self, other: &Self) -> bool {
        self == other
    }
}

impl SettingValue for String {
    fn to_json(&self) -> Value {
        Value::String(self.clone())
    }

    fn from_json(value: &Value) -> Result<Self, ValueError> {
        value
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| type_mismatch("string", value))
    }

    fn eq_values(&self, other: &Self) -> bool {
        self == other
    }
}

impl SettingValue for Value {
    fn to_json(&self) -> Value {
        self.clone()
    }

    fn from_json(value: &Value) -> Result<Self, ValueError> {
        Ok(value.clone())
    }

    fn eq_values(&self, other: &Self) -> bool {
        self == other
    }
}

/// `None` marshals to JSON null; null unmarshals to `None`.
impl<T: SettingValue> SettingValue for Option<T> {
    fn to_json(&self) -> Value {
        match self {
            Some(inner) => inner.to_json(),
            None => Value::Null,
        }
    }

    fn from_json(value: &Value) -> Result<Self, ValueError> {
        if value.is_null() {
            return Ok(None);
        }
        T::from_json(value).map(Some)
    }

    fn eq_values(&self, other: &Self) -> bool {
        match (self, other) {
            (None, None) => true,
            (Some(a), Some(b)) => a.eq_values(b),
            _ => false,
        }
    }
}

impl<T: SettingValue> SettingValue for Vec<T> {
    fn to_json(&self) -> Value {
        Value::Array(self.iter().map(SettingValue::to_json).collect())
    }

    fn from_json(value: &Value) -> Result<Self, ValueError> {
        let arr = value.as_array().ok_or_else(|| type_mismatch("array", value))?;
        arr.iter().map(T::from_json).collect()
    }

    fn eq_values(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.iter().zip(other.iter()).all(|(a, b)| a.eq_values(b))
    }
}

impl<T: SettingValue> SettingValue for BTreeMap<String, T> {
    fn to_json(&self) -> Value {
        Value::Object(
            self.iter()
                .map(|(key, value)| (key.clone(), value.to_json()))
                .collect(),
        )
    }

    fn from_json(value: &Value) -> Result<Self, ValueError> {
        let map = value.as_object().ok_or_else(|| type_mismatch("object", value))?;
        map.iter()
            .map(|(key, value)| Ok((key.clone(), T::from_json(value)?)))
            .collect()
    }

    fn eq_values(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, a)| other.get(key).is_some_and(|b| a.eq_values(b)))
    }
}
