//! Sx descriptions and the values they hold.
//!
//! An [`SxDescription`] is an ordered bag of style properties. Each property
//! holds an [`SxValue`]: a plain [`Literal`] (which may double as a theme
//! token name), a responsive sequence with one entry per breakpoint tier, or
//! a nested description scoped under the property name.
//!
//! Descriptions can be built in code or loaded from JSON/YAML:
//!
//! ```rust
//! use sxstyle::{SxDescription, SxValue};
//!
//! let built = SxDescription::new()
//!     .with("color", "primary")
//!     .with("margin", SxValue::responsive([4, 8]));
//!
//! let parsed = SxDescription::from_json(r#"{"color": "primary", "margin": [4, 8]}"#).unwrap();
//! assert_eq!(built, parsed);
//! ```

use std::borrow::Cow;
use std::fmt;

use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use serde_json::Value;

use crate::error::SxError;

/// A concrete style value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Bool(bool),
    Number(f64),
    String(String),
}

impl Literal {
    /// Returns the name under which this literal is looked up in a theme scale.
    ///
    /// Integral numbers use their integer form so that `margin: 2` finds the
    /// token `"2"` of an array scale. Booleans are never tokens.
    pub fn token_key(&self) -> Option<Cow<'_, str>> {
        match self {
            Literal::String(s) => Some(Cow::Borrowed(s)),
            Literal::Number(n) => Some(Cow::Owned(format_number(*n))),
            Literal::Bool(_) => None,
        }
    }

    /// Returns the string payload, if this is a string literal.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Literal::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the numeric payload, if this is a number literal.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Literal::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Negates the literal: numbers flip sign, strings gain a leading `-`.
    pub(crate) fn negated(&self) -> Self {
        match self {
            Literal::Number(n) => Literal::Number(-n),
            Literal::String(s) => match s.strip_prefix('-') {
                Some(rest) => Literal::String(rest.to_string()),
                None => Literal::String(format!("-{}", s)),
            },
            Literal::Bool(b) => Literal::Bool(*b),
        }
    }

    pub(crate) fn from_json(value: &Value, path: &str) -> Result<Self, SxError> {
        match value {
            Value::Bool(b) => Ok(Literal::Bool(*b)),
            Value::Number(n) => n
                .as_f64()
                .map(Literal::Number)
                .ok_or_else(|| SxError::invalid_sx(path, "number is out of range")),
            Value::String(s) => Ok(Literal::String(s.clone())),
            Value::Null => Err(SxError::invalid_sx(
                path,
                "null is only allowed inside responsive arrays",
            )),
            Value::Array(_) => Err(SxError::invalid_sx(path, "expected a literal, found an array")),
            Value::Object(_) => Err(SxError::invalid_sx(
                path,
                "expected a literal, found an object",
            )),
        }
    }
}

/// Whole numbers that fit an `i64` are written without a fraction.
pub(crate) fn is_integral(n: f64) -> bool {
    n.is_finite() && n.fract() == 0.0 && n.abs() < i64::MAX as f64
}

fn format_number(n: f64) -> String {
    if is_integral(n) {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Number(n) => f.write_str(&format_number(*n)),
            Literal::String(s) => f.write_str(s),
        }
    }
}

impl Serialize for Literal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Literal::Bool(b) => serializer.serialize_bool(*b),
            Literal::Number(n) if is_integral(*n) => serializer.serialize_i64(*n as i64),
            Literal::Number(n) => serializer.serialize_f64(*n),
            Literal::String(s) => serializer.serialize_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for Literal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Literal::from_json(&value, "").map_err(de::Error::custom)
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::String(s.to_string())
    }
}

impl From<String> for Literal {
    fn from(s: String) -> Self {
        Literal::String(s)
    }
}

impl From<f64> for Literal {
    fn from(n: f64) -> Self {
        Literal::Number(n)
    }
}

impl From<i32> for Literal {
    fn from(n: i32) -> Self {
        Literal::Number(f64::from(n))
    }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Literal::Bool(b)
    }
}

/// The value of a single sx property.
#[derive(Debug, Clone, PartialEq)]
pub enum SxValue {
    /// A literal, or the name of a token in the property's theme scale.
    Literal(Literal),
    /// One entry per breakpoint tier, narrowest first. `None` leaves the
    /// property unset at that tier.
    Responsive(Vec<Option<Literal>>),
    /// A nested description, e.g. a pseudo-state scope such as `":hover"`.
    Nested(SxDescription),
}

impl SxValue {
    /// Builds a responsive value from per-tier entries.
    pub fn responsive<I, T>(entries: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Literal>,
    {
        SxValue::Responsive(entries.into_iter().map(|e| Some(e.into())).collect())
    }

    /// Builds a responsive value where some tiers leave the property unset.
    pub fn responsive_sparse<I, T>(entries: I) -> Self
    where
        I: IntoIterator<Item = Option<T>>,
        T: Into<Literal>,
    {
        SxValue::Responsive(entries.into_iter().map(|e| e.map(Into::into)).collect())
    }

    fn from_json(value: &Value, path: &str) -> Result<Self, SxError> {
        match value {
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| match item {
                    Value::Null => Ok(None),
                    Value::Array(_) | Value::Object(_) => Err(SxError::invalid_sx(
                        format!("{}.{}", path, i),
                        "responsive entries must be literals",
                    )),
                    other => Literal::from_json(other, path).map(Some),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(SxValue::Responsive),
            Value::Object(_) => SxDescription::from_value_at(value, path).map(SxValue::Nested),
            other => Literal::from_json(other, path).map(SxValue::Literal),
        }
    }
}

impl From<Literal> for SxValue {
    fn from(literal: Literal) -> Self {
        SxValue::Literal(literal)
    }
}

macro_rules! literal_sx_value {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for SxValue {
                fn from(value: $ty) -> Self {
                    SxValue::Literal(Literal::from(value))
                }
            }
        )*
    };
}

literal_sx_value!(&str, String, f64, i32, bool);

impl From<SxDescription> for SxValue {
    fn from(sx: SxDescription) -> Self {
        SxValue::Nested(sx)
    }
}

/// An ordered mapping from style property to [`SxValue`].
///
/// Order matters: when the same property is produced twice (directly, via an
/// alias, or through a variant) the later entry wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SxDescription {
    entries: Vec<(String, SxValue)>,
}

impl SxDescription {
    /// Creates an empty description.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a property, returning the description for chaining.
    pub fn with<V: Into<SxValue>>(mut self, property: &str, value: V) -> Self {
        self.push(property, value);
        self
    }

    /// Appends a property.
    pub fn push<V: Into<SxValue>>(&mut self, property: &str, value: V) {
        self.entries.push((property.to_string(), value.into()));
    }

    /// Returns the last value set for `property`.
    pub fn get(&self, property: &str) -> Option<&SxValue> {
        self.entries
            .iter()
            .rev()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value)
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SxValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parses a description from JSON.
    pub fn from_json(source: &str) -> Result<Self, SxError> {
        let value: Value = serde_json::from_str(source)?;
        Self::from_value(&value)
    }

    /// Parses a description from YAML.
    pub fn from_yaml(source: &str) -> Result<Self, SxError> {
        let value: Value = serde_yaml::from_str(source)?;
        Self::from_value(&value)
    }

    /// Converts a JSON value, which must be an object.
    pub fn from_value(value: &Value) -> Result<Self, SxError> {
        Self::from_value_at(value, "")
    }

    fn from_value_at(value: &Value, path: &str) -> Result<Self, SxError> {
        let Value::Object(map) = value else {
            return Err(SxError::invalid_sx(
                if path.is_empty() { "<root>" } else { path },
                "expected an object",
            ));
        };

        let mut entries = Vec::with_capacity(map.len());
        for (key, value) in map {
            let child = if path.is_empty() {
                key.clone()
            } else {
                format!("{}.{}", path, key)
            };
            entries.push((key.clone(), SxValue::from_json(value, &child)?));
        }
        Ok(Self { entries })
    }
}

impl<K: Into<String>, V: Into<SxValue>> FromIterator<(K, V)> for SxDescription {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<'de> Deserialize<'de> for SxDescription {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        SxDescription::from_value(&value).map_err(de::Error::custom)
    }
}
