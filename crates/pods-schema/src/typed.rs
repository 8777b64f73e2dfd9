//! Typed records.
//!
//! A Rust struct implements [`Record`] by naming its schema and reading
//! its fields out of a resolved [`Instance`]. [`Record::build`] then runs
//! the same resolution as [`RecordSchema::construct`] and hands back the
//! struct.

use std::sync::Arc;

use pods_core::ResolveOptions;

use crate::instance::{AttributeError, ConstructError, Instance};
use crate::resolve::Kwargs;
use crate::schema::RecordSchema;

pub trait Record: Sized {
    /// The schema values of this type are resolved against.
    fn schema() -> Arc<RecordSchema>;

    /// Read the struct's fields out of a resolved instance.
    fn from_instance(instance: &Instance) -> Result<Self, AttributeError>;

    /// Resolve `kwargs` at the process-wide verbosity level.
    fn build(kwargs: Kwargs) -> Result<Self, ConstructError> {
        Self::build_with(kwargs, &ResolveOptions::current())
    }

    fn build_with(kwargs: Kwargs, options: &ResolveOptions) -> Result<Self, ConstructError> {
        let instance = Self::schema().construct_with(kwargs, options)?;
        Ok(Self::from_instance(&instance)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::OnceLock;

    use pods_core::{DeclaredType, VerbosityLevel};

    use crate::resolve::kwargs_from_json;

    #[derive(Debug, PartialEq)]
    struct Point {
        x: f64,
        y: f64,
        label: Option<String>,
    }

    impl Record for Point {
        fn schema() -> Arc<RecordSchema> {
            static SCHEMA: OnceLock<Arc<RecordSchema>> = OnceLock::new();
            Arc::clone(SCHEMA.get_or_init(|| {
                RecordSchema::builder("Point")
                    .field("x", DeclaredType::FLOAT)
                    .field_with_default("y", DeclaredType::FLOAT, 0.0)
                    .field("label", DeclaredType::optional(DeclaredType::STR))
                    .build()
                    .unwrap()
            }))
        }

        fn from_instance(instance: &Instance) -> Result<Self, AttributeError> {
            Ok(Self {
                x: instance.get_as("x")?,
                y: instance.get_as("y")?,
                label: instance.get_as("label")?,
            })
        }
    }

    #[test]
    fn test_build_typed_record() {
        let kwargs = kwargs_from_json(serde_json::json!({"x": "1.5"})).unwrap();
        let p = Point::build_with(kwargs, &ResolveOptions::new(VerbosityLevel::Raise)).unwrap();
        assert_eq!(
            p,
            Point {
                x: 1.5,
                y: 0.0,
                label: None
            }
        );
    }

    #[test]
    fn test_missing_field_surfaces_as_resolve_error() {
        let err = Point::build_with(Kwargs::new(), &ResolveOptions::new(VerbosityLevel::Raise))
            .unwrap_err();
        assert!(matches!(err, ConstructError::Resolve(_)));
    }

    #[test]
    fn test_warn_level_surfaces_missing_attribute() {
        let err = Point::build_with(Kwargs::new(), &ResolveOptions::new(VerbosityLevel::Warn))
            .unwrap_err();
        assert!(matches!(err, ConstructError::Attribute(AttributeError::Missing { .. })));
    }
}
