//! # Value Constructors: Constructor-from-Value per Declared Type
//!
//! Each primitive and composite type has one constructor that builds a
//! value of that type from an arbitrary [`Value`]. The resolver calls these
//! for every non-enum, non-union field; a failure carries the reason that
//! ends up after `error message:` in the field's cast problem.
//!
//! ## Rules
//!
//! | Target | Accepted input |
//! |--------|----------------|
//! | int    | int; finite float (truncated toward zero); bool; integer text |
//! | float  | int; float; bool; float text (including `inf`, `nan`) |
//! | bool   | anything by truthiness; only empty text is false |
//! | str    | anything, via its display form |
//! | tuple / list | tuple; list; array (outer axis); text (characters) |
//! | ndarray | see [`crate::array::to_array`] |

use crate::array::to_array;
use crate::declared::{CompositeKind, PrimitiveKind};
use crate::error::CastError;
use crate::value::Value;

impl PrimitiveKind {
    /// Build a value of this primitive type from `value`.
    pub fn construct(&self, value: &Value) -> Result<Value, CastError> {
        match self {
            Self::Int => to_int(value).map(Value::Int),
            Self::Float => to_float(value).map(Value::Float),
            Self::Bool => to_bool(value).map(Value::Bool),
            Self::Str => Ok(Value::Str(value.to_string())),
        }
    }
}

impl CompositeKind {
    /// Build a value of this composite type from `value`.
    pub fn construct(&self, value: &Value) -> Result<Value, CastError> {
        match self {
            Self::Tuple => to_items(value).map(Value::Tuple),
            Self::List => to_items(value).map(Value::List),
            Self::Array => to_array(value).map(Value::Array),
        }
    }
}

fn to_int(value: &Value) -> Result<i64, CastError> {
    match value {
        Value::Int(i) => Ok(*i),
        Value::Bool(b) => Ok(i64::from(*b)),
        Value::Float(x) => {
            if !x.is_finite() {
                return Err(CastError::new(format!("cannot convert float {} to int", Value::Float(*x))));
            }
            let t = x.trunc();
            if t < i64::MIN as f64 || t >= i64::MAX as f64 {
                return Err(CastError::new(format!("float {t} is out of range for int")));
            }
            Ok(t as i64)
        }
        Value::Str(s) => parse_int(s),
        other => Err(not_buildable("int", other)),
    }
}

fn parse_int(text: &str) -> Result<i64, CastError> {
    let is_sign = |c: char| c == '+' || c == '-';
    let trimmed = text.trim();
    let body = trimmed.strip_prefix(is_sign).unwrap_or(trimmed);
    // At most one leading sign.
    let single_sign = !body.starts_with(is_sign);
    let separators_ok = !body.starts_with('_') && !body.ends_with('_') && !body.contains("__");
    let cleaned: String = trimmed.chars().filter(|c| *c != '_').collect();
    match cleaned.parse::<i64>() {
        Ok(i) if single_sign && separators_ok => Ok(i),
        _ => Err(CastError::new(format!("invalid integer literal '{text}'"))),
    }
}

fn to_float(value: &Value) -> Result<f64, CastError> {
    match value {
        Value::Float(x) => Ok(*x),
        Value::Int(i) => Ok(*i as f64),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::Str(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| CastError::new(format!("invalid float literal '{s}'"))),
        other => Err(not_buildable("float", other)),
    }
}

fn to_bool(value: &Value) -> Result<bool, CastError> {
    match value {
        Value::None => Ok(false),
        Value::Bool(b) => Ok(*b),
        Value::Int(i) => Ok(*i != 0),
        Value::Float(x) => Ok(*x != 0.0),
        Value::Str(s) => Ok(!s.is_empty()),
        Value::Tuple(items) | Value::List(items) => Ok(!items.is_empty()),
        Value::Array(a) => match a.len() {
            0 => Ok(false),
            1 => Ok(a.iter().any(|x| *x != 0.0)),
            _ => Err(CastError::new(
                "the truth value of an array with more than one element is ambiguous",
            )),
        },
        Value::Enum(_) => Ok(true),
    }
}

fn to_items(value: &Value) -> Result<Vec<Value>, CastError> {
    match value {
        Value::Tuple(items) | Value::List(items) => Ok(items.clone()),
        Value::Str(s) => Ok(s.chars().map(|c| Value::Str(c.to_string())).collect()),
        Value::Array(a) => {
            if a.ndim() == 0 {
                return Err(CastError::new("iteration over a 0-d array"));
            }
            Ok(a.outer_iter()
                .map(|sub| {
                    if sub.ndim() == 0 {
                        Value::Float(sub.iter().next().copied().unwrap_or(0.0))
                    } else {
                        Value::Array(sub.to_owned())
                    }
                })
                .collect())
        }
        other => Err(CastError::new(format!("{} value is not iterable", other.type_name()))),
    }
}

fn not_buildable(target: &str, value: &Value) -> CastError {
    CastError::new(format!("{target} cannot be built from a {} value", value.type_name()))
}
