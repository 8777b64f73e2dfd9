//! # pods-core: Values, Declared Types and Verbosity for strongpods
//!
//! The leaf crate of the workspace. It defines everything the record
//! resolver in `pods-schema` works with, but not the resolver itself.
//!
//! ## Key Design Principles
//!
//! 1. **Closed value model.** [`Value`] enumerates every runtime value a
//!    field can receive or hold. Exact-type matching is a `match`, not a
//!    runtime type inspection.
//!
//! 2. **Closed declared-type shape.** [`DeclaredType`] is fixed when a
//!    schema is built. Unions are normalized once, so `{T, None}` is always
//!    [`DeclaredType::Optional`].
//!
//! 3. **One signalling path.** Every problem goes through
//!    [`Reporter::signal`], which applies the [`VerbosityLevel`].
//!
//! ## Crate Policy
//!
//! - No dependencies on other workspace crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod array;
pub mod coerce;
pub mod config;
pub mod declared;
pub mod error;
pub mod value;
pub mod verbosity;

pub use array::to_array;
pub use config::{ConfigError, ResolveOptions, VERBOSITY_ENV_VAR};
pub use declared::{CompositeKind, DeclaredType, EnumType, PrimitiveKind};
pub use error::{CastError, ErrorKind, PodsError, ValueConversionError};
pub use value::{EnumValue, FromValue, Value, ValueKind};
pub use verbosity::{
    set_verbosity_level, verbosity_level, Reporter, VerbosityLevel, Warning, WarningKind,
};
