//! # Field Resolution
//!
//! Turns a keyword map into resolved field values for one record
//! description. Fields not declared locally are handed back untouched in
//! [`Resolution::remaining`] so the caller can forward them to the parent.
//!
//! Every problem goes through [`Reporter::signal`]. Under `Raise` the first
//! problem aborts with `Err`; under `Warn` and `Silent` the offending field
//! is left unresolved and resolution moves on to the next field.

use std::collections::{BTreeMap, BTreeSet};

use pods_core::{
    CastError, DeclaredType, EnumType, ErrorKind, PodsError, Reporter, Value,
    ValueConversionError, WarningKind,
};

use crate::schema::RecordSchema;

/// Keyword values supplied to a construction, keyed by field name.
pub type Kwargs = BTreeMap<String, Value>;

const UNSUPPORTED_UNION: &str =
    "We don't support types of the form Union[None, ...] that are not optionals.";

/// Build a keyword map from a JSON object.
///
/// # Errors
///
/// Fails when `json` is not an object or holds a value with no
/// [`Value`] counterpart.
pub fn kwargs_from_json(json: serde_json::Value) -> Result<Kwargs, ValueConversionError> {
    match json {
        serde_json::Value::Object(map) => map
            .into_iter()
            .map(|(k, v)| Value::try_from(v).map(|v| (k, v)))
            .collect(),
        other => Err(ValueConversionError::ExpectedObject(json_kind(&other))),
    }
}

fn json_kind(json: &serde_json::Value) -> &'static str {
    match json {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Outcome of resolving one description.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Resolution {
    /// Resolved fields in declaration order. Fields left unresolved, or
    /// whose default stands, are absent.
    pub values: Vec<(String, Value)>,
    /// Keywords naming no local field.
    pub remaining: Kwargs,
}

/// Resolve `kwargs` against the fields declared locally on `schema`.
///
/// # Errors
///
/// Returns the first problem as a [`PodsError`] when `reporter` is at the
/// `Raise` level.
pub fn resolve_fields(
    schema: &RecordSchema,
    kwargs: Kwargs,
    reporter: &mut Reporter,
) -> Result<Resolution, PodsError> {
    resolve_excluding(schema, kwargs, &BTreeSet::new(), reporter)
}

/// Like [`resolve_fields`], but skips fields already set by a descendant.
pub(crate) fn resolve_excluding(
    schema: &RecordSchema,
    mut kwargs: Kwargs,
    already_set: &BTreeSet<String>,
    reporter: &mut Reporter,
) -> Result<Resolution, PodsError> {
    let mut values = Vec::new();
    for field in schema.fields() {
        if already_set.contains(&field.name) {
            continue;
        }
        match kwargs.remove(&field.name) {
            None => {
                if schema.default_for(&field.name).is_some() {
                    continue;
                }
                if field.ty.is_optional() {
                    values.push((field.name.clone(), Value::None));
                } else {
                    reporter.signal(
                        format!(
                            "value for field {} was not provided and the field is not optional and has no default value",
                            field.name
                        ),
                        WarningKind::User,
                        ErrorKind::Value,
                    )?;
                }
            }
            Some(value) => {
                if let Some(resolved) = coerce_field(&field.name, &field.ty, value, reporter)? {
                    values.push((field.name.clone(), resolved));
                }
            }
        }
    }
    tracing::trace!(
        record = schema.name(),
        resolved = values.len(),
        remaining = kwargs.len(),
        "fields resolved"
    );
    Ok(Resolution {
        values,
        remaining: kwargs,
    })
}

/// Coerce a supplied value into `ty`. `Ok(None)` leaves the field unresolved.
fn coerce_field(
    name: &str,
    ty: &DeclaredType,
    value: Value,
    reporter: &mut Reporter,
) -> Result<Option<Value>, PodsError> {
    match ty {
        DeclaredType::Optional(inner) => {
            if value.is_none() {
                Ok(Some(Value::None))
            } else {
                coerce_field(name, inner, value, reporter)
            }
        }
        DeclaredType::Union(members) => coerce_union(name, members, value, reporter),
        DeclaredType::Enum(e) => coerce_enum(name, e, value, reporter),
        other => match construct(other, &value) {
            Ok(v) => Ok(Some(v)),
            Err(e) => {
                reporter.signal(cast_message(name, other, &e), WarningKind::User, ErrorKind::Type)?;
                Ok(None)
            }
        },
    }
}

fn coerce_union(
    name: &str,
    members: &[DeclaredType],
    value: Value,
    reporter: &mut Reporter,
) -> Result<Option<Value>, PodsError> {
    let nones = members.iter().filter(|m| **m == DeclaredType::NoneType).count();
    if nones == 1 && members.len() - nones > 1 {
        reporter.signal(UNSUPPORTED_UNION, WarningKind::User, ErrorKind::NotImplemented)?;
        return Ok(None);
    }
    if members.iter().any(|m| m.matches_exactly(&value)) {
        return Ok(Some(value));
    }
    for member in members {
        match construct(member, &value) {
            Ok(v) => return Ok(Some(v)),
            Err(e) => {
                reporter.signal(cast_message(name, member, &e), WarningKind::User, ErrorKind::Type)?
            }
        }
    }
    Ok(None)
}

fn coerce_enum(
    name: &str,
    e: &EnumType,
    value: Value,
    reporter: &mut Reporter,
) -> Result<Option<Value>, PodsError> {
    match value {
        Value::Enum(v) if e.contains(&v) => Ok(Some(Value::Enum(v))),
        Value::Str(text) => match e.member(&text) {
            Some(member) => Ok(Some(Value::Enum(member))),
            None => {
                reporter.signal(
                    format!(
                        "value for field {name} cannot be cast to {}, error message: '{text}'",
                        e.name()
                    ),
                    WarningKind::User,
                    ErrorKind::Key,
                )?;
                Ok(None)
            }
        },
        _ => {
            reporter.signal(
                format!("value for field {name} cannot be cast to {} or str", e.name()),
                WarningKind::User,
                ErrorKind::Type,
            )?;
            Ok(None)
        }
    }
}

/// The constructor-from-value of a single, non-optional type.
fn construct(ty: &DeclaredType, value: &Value) -> Result<Value, CastError> {
    match ty {
        DeclaredType::Primitive(p) => p.construct(value),
        DeclaredType::Composite(c) => c.construct(value),
        DeclaredType::Enum(e) => match value {
            Value::Enum(v) if e.contains(v) => Ok(value.clone()),
            Value::Str(text) => e
                .member(text)
                .map(Value::Enum)
                .ok_or_else(|| CastError(format!("'{text}'"))),
            other => Err(CastError(format!(
                "{} is not a member of {}",
                other,
                e.name()
            ))),
        },
        DeclaredType::NoneType if value.is_none() => Ok(Value::None),
        DeclaredType::NoneType => Err(CastError(format!("{value} is not None"))),
        DeclaredType::Optional(_) | DeclaredType::Union(_) => {
            Err(CastError(format!("nested {ty} is not constructible")))
        }
    }
}

fn cast_message(name: &str, ty: &DeclaredType, err: &CastError) -> String {
    format!("value for field {name} cannot be cast to {ty}, error message: {err}")
}
