//! # Record Descriptions
//!
//! A [`ClassDescription`] is a plain description: a name, ordered fields
//! with declared types, optional defaults and at most one parent record.
//! Turning it into a [`RecordSchema`] (through [`record`] or
//! [`ClassDescription::build`]) checks its invariants and marks it as a
//! resolvable record. [`is_record`] tells the two apart.
//!
//! ## Invariants
//!
//! - The record name and every field name are non-empty.
//! - Field names are unique within one description. A child may redeclare
//!   a field of its parent.
//! - Inheritance is a single chain: each record has at most one parent.

use std::sync::Arc;

use pods_core::{DeclaredType, EnumType, Value};
use thiserror::Error;

/// Error building a record description.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The record has an empty name.
    #[error("record name must not be empty")]
    EmptyName,

    /// A field has an empty name.
    #[error("record '{record}' declares a field with an empty name")]
    EmptyFieldName {
        /// Name of the record being built.
        record: String,
    },

    /// Two fields share a name.
    #[error("record '{record}' declares field '{field}' more than once")]
    DuplicateField {
        /// Name of the record being built.
        record: String,
        /// The repeated field name.
        field: String,
    },

    /// An enumeration used by a field has no members.
    #[error("field '{field}' uses enumeration '{enumeration}' with no members")]
    EmptyEnum {
        /// The field whose declared type names the enumeration.
        field: String,
        /// Name of the empty enumeration.
        enumeration: String,
    },
}

/// One declared field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub ty: DeclaredType,
    /// Value the field takes when the caller does not supply one.
    pub default: Option<Value>,
}

/// Anything that describes a record-like type.
pub trait Description {
    /// The type name used in string representations.
    fn name(&self) -> &str;

    /// Declared fields in declaration order.
    fn fields(&self) -> &[FieldSpec];

    /// The processed record, if this description has been processed.
    fn as_record(&self) -> Option<&RecordSchema> {
        None
    }
}

/// Returns true if `description` has been processed into a record.
pub fn is_record(description: &dyn Description) -> bool {
    description.as_record().is_some()
}

/// Process a plain description into a resolvable record.
///
/// # Errors
///
/// See [`ClassDescription::build`].
pub fn record(description: ClassDescription) -> Result<Arc<RecordSchema>, SchemaError> {
    description.build()
}

/// A plain, unprocessed record description.
#[derive(Debug, Clone)]
pub struct ClassDescription {
    name: String,
    fields: Vec<FieldSpec>,
    parent: Option<Arc<RecordSchema>>,
}

impl ClassDescription {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            parent: None,
        }
    }

    /// Declare a field without a default.
    pub fn field(mut self, name: impl Into<String>, ty: DeclaredType) -> Self {
        self.fields.push(FieldSpec {
            name: name.into(),
            ty,
            default: None,
        });
        self
    }

    /// Declare a field with a default value. The default is stored as given.
    pub fn field_with_default(
        mut self,
        name: impl Into<String>,
        ty: DeclaredType,
        default: impl Into<Value>,
    ) -> Self {
        self.fields.push(FieldSpec {
            name: name.into(),
            ty,
            default: Some(default.into()),
        });
        self
    }

    /// Set the parent record. Replaces any previous parent.
    pub fn extends(mut self, parent: Arc<RecordSchema>) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Check the description's invariants and produce a record.
    ///
    /// # Errors
    ///
    /// Returns the first [`SchemaError`] found, checking fields in
    /// declaration order.
    pub fn build(self) -> Result<Arc<RecordSchema>, SchemaError> {
        if self.name.is_empty() {
            return Err(SchemaError::EmptyName);
        }
        for (i, field) in self.fields.iter().enumerate() {
            if field.name.is_empty() {
                return Err(SchemaError::EmptyFieldName { record: self.name });
            }
            if self.fields[..i].iter().any(|f| f.name == field.name) {
                return Err(SchemaError::DuplicateField {
                    record: self.name.clone(),
                    field: field.name.clone(),
                });
            }
            if let Some(e) = empty_enum(&field.ty) {
                return Err(SchemaError::EmptyEnum {
                    field: field.name.clone(),
                    enumeration: e.name().to_string(),
                });
            }
        }
        tracing::debug!(
            record = %self.name,
            fields = self.fields.len(),
            parent = self.parent.as_ref().map(|p| p.name()),
            "record processed"
        );
        Ok(Arc::new(RecordSchema {
            name: self.name,
            fields: self.fields,
            parent: self.parent,
        }))
    }
}

fn empty_enum(ty: &DeclaredType) -> Option<&EnumType> {
    match ty {
        DeclaredType::Enum(e) if e.members().is_empty() => Some(e),
        DeclaredType::Optional(inner) => empty_enum(inner),
        DeclaredType::Union(members) => members.iter().find_map(empty_enum),
        _ => None,
    }
}

impl Description for ClassDescription {
    fn name(&self) -> &str {
        &self.name
    }

    fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }
}

/// A processed record description. Immutable and shared through `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSchema {
    name: String,
    fields: Vec<FieldSpec>,
    parent: Option<Arc<RecordSchema>>,
}

impl RecordSchema {
    /// Start a new description; same as [`ClassDescription::new`].
    pub fn builder(name: impl Into<String>) -> ClassDescription {
        ClassDescription::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn parent(&self) -> Option<&Arc<RecordSchema>> {
        self.parent.as_ref()
    }

    /// Look up a locally declared field.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// This record followed by its ancestors, most-derived first.
    pub fn chain(&self) -> impl Iterator<Item = &RecordSchema> {
        std::iter::successors(Some(self), |s| s.parent.as_deref())
    }

    /// The default for `name`, searched from this record up the chain.
    pub fn default_for(&self, name: &str) -> Option<&Value> {
        self.chain()
            .filter_map(|s| s.field(name))
            .find_map(|f| f.default.as_ref())
    }
}

impl Description for RecordSchema {
    fn name(&self) -> &str {
        &self.name
    }

    fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    fn as_record(&self) -> Option<&RecordSchema> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_record() {
        let plain = ClassDescription::new("T2").field("a", DeclaredType::INT);
        let processed = record(ClassDescription::new("T").field("a", DeclaredType::INT)).unwrap();
        assert!(is_record(processed.as_ref()));
        assert!(!is_record(&plain));
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let err = RecordSchema::builder("T")
            .field("a", DeclaredType::INT)
            .field("a", DeclaredType::STR)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicateField {
                record: "T".to_string(),
                field: "a".to_string()
            }
        );
    }

    #[test]
    fn test_empty_names_rejected() {
        assert_eq!(RecordSchema::builder("").build().unwrap_err(), SchemaError::EmptyName);
        assert!(matches!(
            RecordSchema::builder("T").field("", DeclaredType::INT).build(),
            Err(SchemaError::EmptyFieldName { .. })
        ));
    }

    #[test]
    fn test_empty_enum_rejected() {
        let empty = EnumType::new("E", Vec::<String>::new());
        let err = RecordSchema::builder("T")
            .field("e", DeclaredType::optional(DeclaredType::enumeration(empty)))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::EmptyEnum {
                field: "e".to_string(),
                enumeration: "E".to_string()
            }
        );
    }

    #[test]
    fn test_child_may_redeclare_parent_field() {
        let parent = RecordSchema::builder("P")
            .field("a", DeclaredType::INT)
            .build()
            .unwrap();
        let child = RecordSchema::builder("C")
            .field("a", DeclaredType::FLOAT)
            .extends(parent)
            .build();
        assert!(child.is_ok());
    }

    #[test]
    fn test_chain_and_defaults() {
        let parent = RecordSchema::builder("P")
            .field_with_default("a", DeclaredType::INT, 3i64)
            .build()
            .unwrap();
        let child = RecordSchema::builder("C")
            .field("j", DeclaredType::INT)
            .extends(Arc::clone(&parent))
            .build()
            .unwrap();
        let names: Vec<&str> = child.chain().map(|s| s.name()).collect();
        assert_eq!(names, vec!["C", "P"]);
        assert_eq!(child.default_for("a"), Some(&Value::Int(3)));
        assert_eq!(child.default_for("j"), None);
        assert_eq!(child.parent().map(|p| p.name()), Some("P"));
    }
}
