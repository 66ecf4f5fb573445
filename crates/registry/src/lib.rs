//! Configuration registration and variant resolution.
//!
//! Schemas describe configurations as named parameters with optional
//! alternative values and validity conditions. A [`Registry`] binds schema
//! types to compound identities ([`RegistrationKey`]) and can expand one
//! registration into many: either through a schema type's named variants or
//! through the cartesian product of its parameter alternatives, recursing
//! into referenced schemas.
//!
//! # Modules
//!
//! - [`key`] - Compound identities and their canonical string form
//! - [`value`] - Parameter values and type hints
//! - [`schema`] - Schemas, parameters, conditions, and schema type definitions
//! - [`component`] - Consumers of validated schemas
//! - [`registry`] - Binding, deferred requests, graph checks, and expansion
//! - [`config`] - TOML-loaded registry tunables

pub mod component;
pub mod config;
pub mod key;
pub mod registry;
pub mod schema;
pub mod value;

pub use component::{BasicComponent, Component, ComponentType};
pub use config::{ConfigError, RegistryConfig};
pub use key::{KeyParseError, RegistrationKey};
pub use registry::{
	Constructor, DuplicatePolicy, InsertAction, KeySet, PendingRegistration, RegistrationMode,
	Registry, RegistryEntry, RegistryError, VariantFlags, global,
};
pub use schema::{
	Condition, NamedVariant, Parameter, Schema, SchemaDef, SchemaError, SchemaFactory,
};
pub use value::{TypeHint, Value};
