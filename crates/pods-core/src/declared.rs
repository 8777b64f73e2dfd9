//! # Declared Types: Closed Shape of a Field's Type
//!
//! A field's declared type is one of a closed set of shapes. The shape is
//! fixed when the type is built, so the resolver matches on it exhaustively
//! instead of inspecting types per value.
//!
//! ## Union Normalization
//!
//! [`DeclaredType::union`] flattens nested unions, drops duplicate members,
//! collapses a single member to itself and turns exactly `{T, None}` into
//! [`DeclaredType::Optional`]. A union that still contains `None` after
//! normalization has more than one non-none member; the resolver rejects
//! values for it as an unsupported shape.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::{EnumValue, Value};

/// Scalar primitive types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveKind {
    Int,
    Float,
    Bool,
    Str,
}

impl PrimitiveKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Str => "str",
        }
    }
}

/// Opaque composite types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositeKind {
    /// Fixed-size sequence.
    Tuple,
    /// Growable sequence.
    List,
    /// Numeric array.
    Array,
}

impl CompositeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tuple => "tuple",
            Self::List => "list",
            Self::Array => "ndarray",
        }
    }
}

/// A closed set of named members.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnumType {
    name: String,
    members: Vec<String>,
}

impl EnumType {
    /// Create an enumeration. Duplicate member names keep their first position.
    pub fn new<S: Into<String>>(name: impl Into<String>, members: impl IntoIterator<Item = S>) -> Self {
        let mut unique: Vec<String> = Vec::new();
        for m in members {
            let m = m.into();
            if !unique.contains(&m) {
                unique.push(m);
            }
        }
        Self {
            name: name.into(),
            members: unique,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Member names in declaration order.
    pub fn members(&self) -> &[String] {
        &self.members
    }

    /// Look up a member by its declared name (case-sensitive).
    pub fn member(&self, name: &str) -> Option<EnumValue> {
        self.members
            .iter()
            .find(|m| m.as_str() == name)
            .map(|m| EnumValue::new(self.name.clone(), m.clone()))
    }

    /// Returns true if `value` is a member of this enumeration.
    pub fn contains(&self, value: &EnumValue) -> bool {
        value.enum_name == self.name && self.members.iter().any(|m| *m == value.member)
    }
}

/// The shape of a field's declared type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", content = "of", rename_all = "snake_case")]
pub enum DeclaredType {
    Primitive(PrimitiveKind),
    Composite(CompositeKind),
    Enum(EnumType),
    /// The inner type or absence.
    Optional(Box<DeclaredType>),
    /// Exactly one of several types. Never holds exactly `{T, None}`.
    Union(Vec<DeclaredType>),
    /// The type of absence. Only meaningful as a union member.
    NoneType,
}

impl DeclaredType {
    pub const INT: Self = Self::Primitive(PrimitiveKind::Int);
    pub const FLOAT: Self = Self::Primitive(PrimitiveKind::Float);
    pub const BOOL: Self = Self::Primitive(PrimitiveKind::Bool);
    pub const STR: Self = Self::Primitive(PrimitiveKind::Str);
    pub const TUPLE: Self = Self::Composite(CompositeKind::Tuple);
    pub const LIST: Self = Self::Composite(CompositeKind::List);
    pub const ARRAY: Self = Self::Composite(CompositeKind::Array);

    /// An enumeration type.
    pub fn enumeration(e: EnumType) -> Self {
        Self::Enum(e)
    }

    /// `inner` or absence. Same as `union([inner, NoneType])`.
    pub fn optional(inner: DeclaredType) -> Self {
        Self::union([inner, Self::NoneType])
    }

    /// Build a normalized union of `members`.
    pub fn union(members: impl IntoIterator<Item = DeclaredType>) -> Self {
        let mut flat = Vec::new();
        for m in members {
            push_flat(&mut flat, m);
        }
        match flat.len() {
            0 => Self::NoneType,
            1 => flat.remove(0),
            2 if flat.contains(&Self::NoneType) => {
                let inner = flat
                    .into_iter()
                    .find(|t| *t != Self::NoneType)
                    .unwrap_or(Self::NoneType);
                Self::Optional(Box::new(inner))
            }
            _ => Self::Union(flat),
        }
    }

    /// True when absence is an accepted value: optionals and unions with `None`.
    pub fn is_optional(&self) -> bool {
        match self {
            Self::Optional(_) => true,
            Self::Union(members) => members.contains(&Self::NoneType),
            _ => false,
        }
    }

    /// True for optionals and unions.
    pub fn is_union(&self) -> bool {
        matches!(self, Self::Optional(_) | Self::Union(_))
    }

    pub fn is_enum(&self) -> bool {
        matches!(self, Self::Enum(_))
    }

    /// True when `value` already has exactly this type, with no coercion.
    pub fn matches_exactly(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::Primitive(PrimitiveKind::Int), Value::Int(_))
            | (Self::Primitive(PrimitiveKind::Float), Value::Float(_))
            | (Self::Primitive(PrimitiveKind::Bool), Value::Bool(_))
            | (Self::Primitive(PrimitiveKind::Str), Value::Str(_))
            | (Self::Composite(CompositeKind::Tuple), Value::Tuple(_))
            | (Self::Composite(CompositeKind::List), Value::List(_))
            | (Self::Composite(CompositeKind::Array), Value::Array(_))
            | (Self::NoneType, Value::None) => true,
            (Self::Enum(e), Value::Enum(v)) => e.contains(v),
            (Self::Optional(inner), v) => v.is_none() || inner.matches_exactly(v),
            (Self::Union(members), v) => members.iter().any(|m| m.matches_exactly(v)),
            _ => false,
        }
    }
}

fn push_flat(flat: &mut Vec<DeclaredType>, ty: DeclaredType) {
    match ty {
        DeclaredType::Union(members) => {
            for m in members {
                push_flat(flat, m);
            }
        }
        DeclaredType::Optional(inner) => {
            push_flat(flat, *inner);
            push_flat(flat, DeclaredType::NoneType);
        }
        other => {
            if !flat.contains(&other) {
                flat.push(other);
            }
        }
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(p) => f.write_str(p.as_str()),
            Self::Composite(c) => f.write_str(c.as_str()),
            Self::Enum(e) => f.write_str(e.name()),
            Self::Optional(inner) => write!(f, "Optional[{inner}]"),
            Self::Union(members) => {
                f.write_str("Union[")?;
                for (i, m) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{m}")?;
                }
                f.write_str("]")
            }
            Self::NoneType => f.write_str("None"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy_enum() -> EnumType {
        EnumType::new("E", ["E0", "E1"])
    }

    #[test]
    fn test_optional_is_union_of_none() {
        let opt = DeclaredType::optional(DeclaredType::INT);
        assert_eq!(opt, DeclaredType::Optional(Box::new(DeclaredType::INT)));
        assert_eq!(
            DeclaredType::union([DeclaredType::NoneType, DeclaredType::INT]),
            opt
        );
    }

    #[test]
    fn test_union_flattens_and_dedups() {
        let u = DeclaredType::union([
            DeclaredType::union([DeclaredType::INT, DeclaredType::STR]),
            DeclaredType::INT,
            DeclaredType::FLOAT,
        ]);
        assert_eq!(
            u,
            DeclaredType::Union(vec![
                DeclaredType::INT,
                DeclaredType::STR,
                DeclaredType::FLOAT
            ])
        );
        assert_eq!(DeclaredType::union([DeclaredType::BOOL]), DeclaredType::BOOL);
    }

    #[test]
    fn test_optional_of_union_keeps_none_member() {
        let u = DeclaredType::optional(DeclaredType::union([
            DeclaredType::INT,
            DeclaredType::STR,
        ]));
        assert!(matches!(u, DeclaredType::Union(ref m) if m.len() == 3));
        assert!(u.is_optional());
    }

    #[test]
    fn test_is_optional() {
        assert!(DeclaredType::optional(DeclaredType::INT).is_optional());
        assert!(DeclaredType::union([DeclaredType::INT, DeclaredType::NoneType]).is_optional());
        assert!(!DeclaredType::INT.is_optional());
        assert!(!DeclaredType::union([DeclaredType::INT, DeclaredType::STR]).is_optional());
    }

    #[test]
    fn test_is_enum() {
        assert!(DeclaredType::enumeration(dummy_enum()).is_enum());
        assert!(!DeclaredType::INT.is_enum());
    }

    #[test]
    fn test_is_union() {
        assert!(DeclaredType::union([DeclaredType::INT, DeclaredType::STR]).is_union());
        assert!(!DeclaredType::INT.is_union());
        assert!(DeclaredType::optional(DeclaredType::INT).is_union());
    }

    #[test]
    fn test_matches_exactly() {
        assert!(DeclaredType::INT.matches_exactly(&Value::Int(2)));
        assert!(!DeclaredType::INT.matches_exactly(&Value::Float(2.0)));
        assert!(!DeclaredType::INT.matches_exactly(&Value::Bool(true)));
        let e = DeclaredType::enumeration(dummy_enum());
        assert!(e.matches_exactly(&Value::Enum(EnumValue::new("E", "E0"))));
        assert!(!e.matches_exactly(&Value::Enum(EnumValue::new("F", "E0"))));
        assert!(!e.matches_exactly(&Value::from("E0")));
    }

    #[test]
    fn test_enum_member_lookup() {
        let e = dummy_enum();
        assert_eq!(e.member("E1"), Some(EnumValue::new("E", "E1")));
        assert_eq!(e.member("e1"), None);
        assert_eq!(EnumType::new("D", ["A", "A", "B"]).members().len(), 2);
    }

    #[test]
    fn test_display() {
        assert_eq!(DeclaredType::INT.to_string(), "int");
        assert_eq!(DeclaredType::ARRAY.to_string(), "ndarray");
        assert_eq!(
            DeclaredType::optional(DeclaredType::FLOAT).to_string(),
            "Optional[float]"
        );
        assert_eq!(
            DeclaredType::union([DeclaredType::INT, DeclaredType::FLOAT, DeclaredType::STR])
                .to_string(),
            "Union[int, float, str]"
        );
        assert_eq!(DeclaredType::enumeration(dummy_enum()).to_string(), "E");
    }

    #[test]
    fn test_serde_roundtrip() {
        let ty = DeclaredType::union([
            DeclaredType::INT,
            DeclaredType::enumeration(dummy_enum()),
            DeclaredType::NoneType,
        ]);
        let json = serde_json::to_string(&ty).unwrap();
        let back: DeclaredType = serde_json::from_str(&json).unwrap();
        assert_eq!(ty, back);
    }
}
