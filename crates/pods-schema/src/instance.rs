//! Record instances and their construction.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use pods_core::{FromValue, PodsError, ResolveOptions, Value, ValueConversionError, Warning};
use thiserror::Error;

use crate::resolve::{resolve_excluding, Kwargs};
use crate::schema::RecordSchema;

/// Error reading a typed attribute from an [`Instance`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttributeError {
    /// Neither set on the instance nor defaulted anywhere on the chain.
    #[error("'{record}' object has no attribute '{field}'")]
    Missing { record: String, field: String },

    /// The attribute holds a value of the wrong kind.
    #[error("attribute '{field}': {source}")]
    Conversion {
        field: String,
        #[source]
        source: ValueConversionError,
    },
}

/// A constructed record: its schema and the attributes actually set.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    schema: Arc<RecordSchema>,
    attributes: Vec<(String, Value)>,
    warnings: Vec<Warning>,
}

impl Instance {
    pub fn schema(&self) -> &Arc<RecordSchema> {
        &self.schema
    }

    /// Attributes in the order they were set.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// True when `name` was set during construction or by [`Instance::set`].
    pub fn is_set(&self, name: &str) -> bool {
        self.attributes.iter().any(|(k, _)| k == name)
    }

    /// The attribute, or the field default along the chain when unset.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
            .or_else(|| self.schema.default_for(name))
    }

    /// Read an attribute as a typed Rust value.
    ///
    /// # Errors
    ///
    /// [`AttributeError::Missing`] when the attribute is neither set nor
    /// defaulted, [`AttributeError::Conversion`] when its kind differs.
    pub fn get_as<T: FromValue>(&self, name: &str) -> Result<T, AttributeError> {
        let value = self.get(name).ok_or_else(|| AttributeError::Missing {
            record: self.schema.name().to_string(),
            field: name.to_string(),
        })?;
        T::from_value(value).map_err(|source| AttributeError::Conversion {
            field: name.to_string(),
            source,
        })
    }

    /// Set an attribute without any type checking.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == name) {
            Some((_, slot)) => *slot = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Warnings collected during construction under the `Warn` level.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.schema.name())?;
        let mut first = true;
        for (name, value) in self.attributes.iter().filter(|(_, v)| !v.is_none()) {
            if !first {
                f.write_str(",")?;
            }
            first = false;
            write!(f, "{name}={value}")?;
        }
        f.write_str(")")
    }
}

impl RecordSchema {
    /// Construct an instance at the process-wide verbosity level.
    ///
    /// # Errors
    ///
    /// Returns the first problem when the level is `Raise`.
    pub fn construct(self: &Arc<Self>, kwargs: Kwargs) -> Result<Instance, PodsError> {
        self.construct_with(kwargs, &ResolveOptions::current())
    }

    /// Construct an instance with explicit options.
    ///
    /// Resolution runs on this record first, then on each ancestor with
    /// the keywords nobody has consumed yet. Keywords left over at the
    /// root are dropped.
    ///
    /// # Errors
    ///
    /// Returns the first problem when `options.verbosity` is `Raise`.
    pub fn construct_with(
        self: &Arc<Self>,
        kwargs: Kwargs,
        options: &ResolveOptions,
    ) -> Result<Instance, PodsError> {
        let mut reporter = options.reporter();
        let mut attributes: Vec<(String, Value)> = Vec::new();
        let mut set = BTreeSet::new();
        let mut remaining = kwargs;
        for schema in self.chain() {
            let resolution = resolve_excluding(schema, remaining, &set, &mut reporter)?;
            for (name, value) in resolution.values {
                set.insert(name.clone());
                attributes.push((name, value));
            }
            remaining = resolution.remaining;
        }
        if !remaining.is_empty() {
            let dropped: Vec<&str> = remaining.keys().map(String::as_str).collect();
            tracing::trace!(record = self.name(), ?dropped, "unused keywords dropped");
        }
        Ok(Instance {
            schema: Arc::clone(self),
            attributes,
            warnings: reporter.into_warnings(),
        })
    }

    /// Construct from a JSON object of keyword values.
    ///
    /// # Errors
    ///
    /// Fails when the JSON cannot be converted, or as [`Self::construct_with`].
    pub fn construct_json(
        self: &Arc<Self>,
        json: serde_json::Value,
        options: &ResolveOptions,
    ) -> Result<Instance, ConstructError> {
        let kwargs = crate::resolve::kwargs_from_json(json)?;
        Ok(self.construct_with(kwargs, options)?)
    }
}

/// Failure of [`RecordSchema::construct_json`] and [`crate::Record::build`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConstructError {
    #[error(transparent)]
    Resolve(#[from] PodsError),

    #[error("invalid keyword arguments: {0}")]
    Kwargs(#[from] ValueConversionError),

    #[error(transparent)]
    Attribute(#[from] AttributeError),
}
