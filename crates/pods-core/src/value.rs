//! # Field Values: Dynamic Value Model
//!
//! Defines [`Value`], the closed set of runtime values a caller can supply
//! as a keyword argument and a resolved field can hold.
//!
//! ## Display
//!
//! `Display` renders the value the way it appears inside a record's string
//! representation: text is written bare at the top level and quoted inside
//! sequences, floats always carry a fractional part or exponent, enum
//! members are written as `Enum.MEMBER`.
//!
//! ## Conversions
//!
//! - `From<T>` for the Rust primitives, `Vec<T>` (a list), `Option<T>`
//!   (`None` is absence) and `ArrayD<f64>`.
//! - `TryFrom<serde_json::Value>` so keyword maps can be written with
//!   `serde_json::json!`. JSON objects have no counterpart and are rejected.
//! - [`FromValue`] extracts a typed Rust value from a resolved field.

use std::fmt;

use ndarray::ArrayD;
use serde::{Deserialize, Serialize};

use crate::error::ValueConversionError;

/// A member of a declared enumeration, identified by enum and member name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnumValue {
    /// Name of the enumeration this member belongs to.
    pub enum_name: String,
    /// Declared name of the member.
    pub member: String,
}

impl EnumValue {
    /// Create a member reference.
    pub fn new(enum_name: impl Into<String>, member: impl Into<String>) -> Self {
        Self {
            enum_name: enum_name.into(),
            member: member.into(),
        }
    }
}

impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.enum_name, self.member)
    }
}

/// Runtime kind of a [`Value`], without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    None,
    Bool,
    Int,
    Float,
    Str,
    Tuple,
    List,
    Array,
    Enum,
}

impl ValueKind {
    /// Short lowercase name used in messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Str => "str",
            Self::Tuple => "tuple",
            Self::List => "list",
            Self::Array => "ndarray",
            Self::Enum => "enum",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dynamically typed field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absence of a value.
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Fixed-size sequence.
    Tuple(Vec<Value>),
    /// Growable sequence.
    List(Vec<Value>),
    /// Numeric array of any dimension.
    Array(ArrayD<f64>),
    Enum(EnumValue),
}

impl Value {
    /// Build a tuple from any sequence of convertible items.
    pub fn tuple<T: Into<Value>>(items: impl IntoIterator<Item = T>) -> Self {
        Self::Tuple(items.into_iter().map(Into::into).collect())
    }

    /// Build a list from any sequence of convertible items.
    pub fn list<T: Into<Value>>(items: impl IntoIterator<Item = T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// The runtime kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::None => ValueKind::None,
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
            Self::Str(_) => ValueKind::Str,
            Self::Tuple(_) => ValueKind::Tuple,
            Self::List(_) => ValueKind::List,
            Self::Array(_) => ValueKind::Array,
            Self::Enum(_) => ValueKind::Enum,
        }
    }

    /// Name of the runtime type; for enum members this is the enum name.
    pub fn type_name(&self) -> &str {
        match self {
            Self::Enum(e) => &e.enum_name,
            other => other.kind().as_str(),
        }
    }

    /// Returns true for [`Value::None`].
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Nested rendering: text is quoted.
    fn fmt_nested(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "'{}'", s.replace('\'', "\\'")),
            other => fmt::Display::fmt(other, f),
        }
    }
}

fn fmt_float(x: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if x.is_nan() {
        f.write_str("nan")
    } else if x.is_infinite() {
        f.write_str(if x > 0.0 { "inf" } else { "-inf" })
    } else {
        // Debug keeps the trailing `.0` on integral floats.
        write!(f, "{x:?}")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => fmt_float(*x, f),
            Self::Str(s) => f.write_str(s),
            Self::Tuple(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    item.fmt_nested(f)?;
                }
                if items.len() == 1 {
                    f.write_str(",")?;
                }
                f.write_str(")")
            }
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    item.fmt_nested(f)?;
                }
                f.write_str("]")
            }
            Self::Array(a) => write!(f, "{a}"),
            Self::Enum(e) => write!(f, "{e}"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<EnumValue> for Value {
    fn from(e: EnumValue) -> Self {
        Self::Enum(e)
    }
}

impl From<ArrayD<f64>> for Value {
    fn from(a: ArrayD<f64>) -> Self {
        Self::Array(a)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::list(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::None, Into::into)
    }
}

impl TryFrom<serde_json::Value> for Value {
    type Error = ValueConversionError;

    fn try_from(json: serde_json::Value) -> Result<Self, Self::Error> {
        match json {
            serde_json::Value::Null => Ok(Self::None),
            serde_json::Value::Bool(b) => Ok(Self::Bool(b)),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Self::Int(i))
                } else if n.is_u64() {
                    Err(ValueConversionError::NumberOutOfRange(n.to_string()))
                } else {
                    n.as_f64()
                        .map(Self::Float)
                        .ok_or_else(|| ValueConversionError::NumberOutOfRange(n.to_string()))
                }
            }
            serde_json::Value::String(s) => Ok(Self::Str(s)),
            serde_json::Value::Array(items) => {
                let items: Result<Vec<Value>, _> =
                    items.into_iter().map(Value::try_from).collect();
                Ok(Self::List(items?))
            }
            serde_json::Value::Object(_) => Err(ValueConversionError::UnsupportedJson("object")),
        }
    }
}

/// Extraction of a typed Rust value from a resolved field value.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Result<Self, ValueConversionError>;
}

fn unexpected(expected: &str, found: &Value) -> ValueConversionError {
    ValueConversionError::UnexpectedKind {
        expected: expected.to_string(),
        found: found.type_name().to_string(),
    }
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Result<Self, ValueConversionError> {
        Ok(value.clone())
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Result<Self, ValueConversionError> {
        match value {
            Value::Bool(b) => Ok(*b),
            other => Err(unexpected("bool", other)),
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: &Value) -> Result<Self, ValueConversionError> {
        match value {
            Value::Int(i) => Ok(*i),
            other => Err(unexpected("int", other)),
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Result<Self, ValueConversionError> {
        match value {
            Value::Float(x) => Ok(*x),
            other => Err(unexpected("float", other)),
        }
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self, ValueConversionError> {
        match value {
            Value::Str(s) => Ok(s.clone()),
            other => Err(unexpected("str", other)),
        }
    }
}

impl FromValue for EnumValue {
    fn from_value(value: &Value) -> Result<Self, ValueConversionError> {
        match value {
            Value::Enum(e) => Ok(e.clone()),
            other => Err(unexpected("enum member", other)),
        }
    }
}

impl FromValue for ArrayD<f64> {
    fn from_value(value: &Value) -> Result<Self, ValueConversionError> {
        match value {
            Value::Array(a) => Ok(a.clone()),
            other => Err(unexpected("ndarray", other)),
        }
    }
}

impl FromValue for Vec<Value> {
    /// Accepts both tuples and lists.
    fn from_value(value: &Value) -> Result<Self, ValueConversionError> {
        match value {
            Value::Tuple(items) | Value::List(items) => Ok(items.clone()),
            other => Err(unexpected("tuple or list", other)),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Result<Self, ValueConversionError> {
        match value {
            Value::None => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr1;
    use serde_json::json;

    #[test]
    fn test_display_scalars() {
        assert_eq!(Value::Int(2).to_string(), "2");
        assert_eq!(Value::Float(2.0).to_string(), "2.0");
        assert_eq!(Value::Float(0.25).to_string(), "0.25");
        assert_eq!(Value::Float(f64::INFINITY).to_string(), "inf");
        assert_eq!(Value::Float(f64::NAN).to_string(), "nan");
        assert_eq!(Value::Bool(true).to_string(), "True");
        assert_eq!(Value::None.to_string(), "None");
        assert_eq!(Value::from("hello").to_string(), "hello");
    }

    #[test]
    fn test_display_sequences_quote_text() {
        let t = Value::tuple(vec![Value::Int(1), Value::from("a")]);
        assert_eq!(t.to_string(), "(1, 'a')");
        assert_eq!(Value::tuple(vec![1i64]).to_string(), "(1,)");
        assert_eq!(Value::list(vec![1i64, 2, 3]).to_string(), "[1, 2, 3]");
        assert_eq!(Value::List(vec![]).to_string(), "[]");
    }

    #[test]
    fn test_display_enum_member() {
        let v = Value::from(EnumValue::new("DummyEnum", "E1"));
        assert_eq!(v.to_string(), "DummyEnum.E1");
        assert_eq!(v.type_name(), "DummyEnum");
    }

    #[test]
    fn test_from_option() {
        assert_eq!(Value::from(None::<i64>), Value::None);
        assert_eq!(Value::from(Some(3i64)), Value::Int(3));
    }

    #[test]
    fn test_from_json_scalars() {
        assert_eq!(Value::try_from(json!(null)).unwrap(), Value::None);
        assert_eq!(Value::try_from(json!(2)).unwrap(), Value::Int(2));
        assert_eq!(Value::try_from(json!(2.0)).unwrap(), Value::Float(2.0));
        assert_eq!(Value::try_from(json!("2")).unwrap(), Value::from("2"));
        assert_eq!(Value::try_from(json!(true)).unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_from_json_array_is_list() {
        let v = Value::try_from(json!([1, "a", [2.5]])).unwrap();
        assert_eq!(
            v,
            Value::List(vec![
                Value::Int(1),
                Value::from("a"),
                Value::List(vec![Value::Float(2.5)]),
            ])
        );
    }

    #[test]
    fn test_from_json_rejects_object_and_huge_numbers() {
        assert!(matches!(
            Value::try_from(json!({"a": 1})),
            Err(ValueConversionError::UnsupportedJson("object"))
        ));
        assert!(matches!(
            Value::try_from(json!(u64::MAX)),
            Err(ValueConversionError::NumberOutOfRange(_))
        ));
    }

    #[test]
    fn test_from_value_typed_extraction() {
        assert_eq!(i64::from_value(&Value::Int(7)).unwrap(), 7);
        assert_eq!(String::from_value(&Value::from("x")).unwrap(), "x");
        assert_eq!(Option::<i64>::from_value(&Value::None).unwrap(), None);
        assert_eq!(Option::<i64>::from_value(&Value::Int(1)).unwrap(), Some(1));
        let err = i64::from_value(&Value::from("x")).unwrap_err();
        assert_eq!(err.to_string(), "expected int, found str");
    }

    #[test]
    fn test_from_value_array() {
        let a = arr1(&[1.0, 2.0]).into_dyn();
        let got = ArrayD::<f64>::from_value(&Value::Array(a.clone())).unwrap();
        assert_eq!(got, a);
        assert_eq!(got.shape(), &[2]);
    }
}
