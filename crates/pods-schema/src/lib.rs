//! # pods-schema: Record Descriptions and Field Resolution
//!
//! Builds typed, plain-old-data records from keyword values. A record is
//! described once as a [`RecordSchema`]: ordered fields with declared
//! types, optional defaults and at most one parent. Constructing an
//! instance resolves each supplied value against its declared type, then
//! forwards the unconsumed keywords to the parent.
//!
//! ## Crate Policy
//!
//! - Depends only on `pods-core` within the workspace.
//! - Schemas are immutable once built and shared through `Arc`.
//! - Problems are signalled through `pods_core::Reporter`; nothing here
//!   decides on its own whether a problem is fatal.

pub mod instance;
pub mod resolve;
pub mod schema;
pub mod typed;

pub use instance::{AttributeError, ConstructError, Instance};
pub use resolve::{kwargs_from_json, resolve_fields, Kwargs, Resolution};
pub use schema::{is_record, record, ClassDescription, Description, FieldSpec, RecordSchema, SchemaError};
pub use typed::Record;
