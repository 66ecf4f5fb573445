//! Shared fixtures for the registry integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use rstest::fixture;
use varion_registry::{
	BasicComponent, ComponentType, Parameter, RegistrationKey, Registry, RegistryEntry, Schema,
	SchemaDef, SchemaError, TypeHint,
};

pub const NS: &str = "testing";

/// Routes `tracing` output through the test harness.
pub fn init_tracing() {
	let _ = tracing_subscriber::fmt()
		.with_test_writer()
		.with_max_level(tracing::Level::TRACE)
		.try_init();
}

/// Fresh registry with tracing enabled.
#[fixture]
pub fn registry() -> Registry {
	init_tracing();
	Registry::new()
}

pub fn key(name: &str) -> RegistrationKey {
	RegistrationKey::new(name, NS)
}

pub fn entry(name: &str, def: SchemaDef) -> RegistryEntry {
	RegistryEntry::new(key(name), Arc::new(def), ComponentType::of::<BasicComponent>())
}

/// Two boolean parameters, each with alternatives `{false, true}`.
pub fn flags() -> Result<Schema, SchemaError> {
	let mut schema = Schema::new();
	schema.add_parameter(
		Parameter::new("param_1", false)
			.with_type_hint(TypeHint::Bool)
			.with_variants([false, true]),
	);
	schema.add_parameter(
		Parameter::new("param_2", true)
			.with_type_hint(TypeHint::Bool)
			.with_variants([false, true]),
	);
	Ok(schema)
}

pub fn flags_variant1() -> Result<Schema, SchemaError> {
	let mut schema = flags()?;
	schema.set_value("param_1", true)?;
	Ok(schema)
}

pub fn flags_variant2() -> Result<Schema, SchemaError> {
	let mut schema = flags()?;
	schema.set_value("param_2", false)?;
	Ok(schema)
}

/// [`flags`] restricted to assignments where both parameters agree.
pub fn equal_flags() -> Result<Schema, SchemaError> {
	let mut schema = flags()?;
	schema.add_condition("params_equal", |s| s.get("param_1") == s.get("param_2"));
	Ok(schema)
}

pub fn flags_def() -> SchemaDef {
	SchemaDef::new("flags", flags)
}

pub fn named_flags_def() -> SchemaDef {
	SchemaDef::with_variant_support("flags", flags)
		.named_variant("variant1", flags_variant1)
		.and_then(|def| def.named_variant("variant2", flags_variant2))
		.unwrap()
}

/// Schema without parameters.
pub fn empty() -> Result<Schema, SchemaError> {
	Ok(Schema::new())
}

/// `count` integer alternatives for `param`, defaulting to the first.
pub fn ranged(param: &str, count: i64) -> Schema {
	let mut schema = Schema::new();
	schema.add_parameter(Parameter::new(param, 0).with_variants(0..count));
	schema
}
