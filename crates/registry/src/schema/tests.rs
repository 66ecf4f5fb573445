use pretty_assertions::assert_eq;

use super::*;
use crate::value::TypeHint;

fn flags_default() -> Result<Schema, SchemaError> {
	let mut schema = Schema::new();
	schema.add_parameter(
		Parameter::new("param_1", false)
			.with_type_hint(TypeHint::Bool)
			.with_variants([false, true]),
	);
	schema.add_parameter(Parameter::new("param_2", true).with_variants([false, true]));
	Ok(schema)
}

fn flags_variant() -> Result<Schema, SchemaError> {
	let mut schema = flags_default()?;
	schema.set_value("param_1", true)?;
	Ok(schema)
}

/// Re-adding a parameter overwrites it without moving it.
#[test]
fn test_add_parameter_overwrites_in_place() {
	let mut schema = flags_default().unwrap();
	schema.add_parameter(Parameter::new("param_1", 7));

	let names: Vec<_> = schema.parameters().map(|p| p.name.as_str()).collect();
	assert_eq!(names, ["param_1", "param_2"]);
	assert_eq!(schema.get("param_1"), Some(&Value::Int(7)));
	assert!(!schema.param("param_1").unwrap().has_variants());
	assert_eq!(schema.len(), 2);
}

#[test]
fn test_set_value_unknown_parameter() {
	let mut schema = flags_default().unwrap();
	assert_eq!(
		schema.set_value("missing", 1),
		Err(SchemaError::UnknownParameter {
			parameter: "missing".into()
		})
	);
}

/// Reference parameters only accept keys or null.
#[test]
fn test_set_value_reference_expects_key() {
	let mut schema = Schema::new();
	schema.add_parameter(Parameter::reference(
		"child",
		RegistrationKey::new("child", "testing"),
	));

	assert_eq!(
		schema.set_value("child", "not a key"),
		Err(SchemaError::ReferenceExpected {
			parameter: "child".into(),
			got: "string",
		})
	);
	schema
		.set_value("child", RegistrationKey::new("other", "testing"))
		.unwrap();
	schema.set_value("child", Value::Null).unwrap();
	assert!(schema.get("child").unwrap().is_null());
}

/// Delta copies leave the source schema untouched.
#[test]
fn test_delta_copy_is_independent() {
	let schema = flags_default().unwrap();
	let copy = schema
		.delta_copy(&[("param_1".into(), Value::Bool(true))])
		.unwrap();

	assert_eq!(copy.get("param_1"), Some(&Value::Bool(true)));
	assert_eq!(schema.get("param_1"), Some(&Value::Bool(false)));
}

/// Factories return fresh instances and variants override through set_value.
#[test]
fn test_factories_are_fresh() {
	let def = SchemaDef::with_variant_support("flags", flags_default)
		.named_variant("variant1", flags_variant)
		.unwrap();

	let mut first = def.get_default().unwrap();
	first.set_value("param_2", false).unwrap();
	let second = def.get_default().unwrap();
	assert_eq!(second.get("param_2"), Some(&Value::Bool(true)));

	let variant = (def.named_variants()[0].factory)().unwrap();
	assert_eq!(variant.get("param_1"), Some(&Value::Bool(true)));
}

#[test]
fn test_named_variants_require_support() {
	let mut def = SchemaDef::new("flags", flags_default);
	assert_eq!(
		def.declare_named_variant("variant1", flags_variant),
		Err(SchemaError::VariantsUnsupported {
			schema: "flags".into(),
			label: "variant1".into(),
		})
	);
	assert!(def.named_variants().is_empty());
}

#[test]
fn test_duplicate_named_variant() {
	let mut def = SchemaDef::with_variant_support("flags", flags_default);
	def.declare_named_variant("variant1", flags_variant).unwrap();
	assert_eq!(
		def.declare(NamedVariant::new("variant1", flags_default).with_tags(["x"])),
		Err(SchemaError::DuplicateVariant {
			schema: "flags".into(),
			label: "variant1".into(),
		})
	);
	assert_eq!(def.named_variants().len(), 1);
}

/// Conditions are conjunctive and validation names the first rejecting one.
#[test]
fn test_conditions() {
	let mut schema = flags_default().unwrap();
	schema.add_condition("always", |_| true);
	schema.add_condition("params_equal", |s| s.get("param_1") == s.get("param_2"));

	assert!(!schema.accepts().unwrap());
	assert_eq!(
		schema.validate(),
		Err(SchemaError::ValidationFailed {
			condition: "params_equal".into()
		})
	);

	schema.set_value("param_2", false).unwrap();
	assert!(schema.accepts().unwrap());
	assert_eq!(schema.validate(), Ok(()));
}

#[test]
fn test_predicate_error_propagates() {
	let mut schema = flags_default().unwrap();
	schema.add_fallible_condition("broken", |s| {
		s.get("param_1")
			.and_then(Value::as_int)
			.map(|v| v > 0)
			.ok_or_else(|| "param_1 is not an integer".to_string())
	});

	assert_eq!(
		schema.accepts(),
		Err(SchemaError::Predicate {
			condition: "broken".into(),
			reason: "param_1 is not an integer".into(),
		})
	);
}

#[test]
fn test_required_parameter() {
	let mut schema = Schema::new();
	schema.add_parameter(Parameter::new("lr", Value::Null).required());
	assert_eq!(schema.conditions().len(), 1);
	assert_eq!(schema.conditions()[0].name(), "lr_is_required");
	assert!(!schema.accepts().unwrap());

	schema.set_value("lr", 0.1).unwrap();
	assert!(schema.accepts().unwrap());

	// Redeclaring does not stack a second condition.
	schema.add_parameter(Parameter::new("lr", 0.2).required());
	assert_eq!(schema.conditions().len(), 1);
}

/// Redeclaring a required parameter as optional drops its requirement.
#[test]
fn test_redeclared_optional_parameter() {
	let mut schema = Schema::new();
	schema.add_parameter(Parameter::new("lr", Value::Null).required());
	schema.add_condition("positive", |_| true);
	assert!(!schema.accepts().unwrap());

	schema.add_parameter(Parameter::new("lr", Value::Null));
	assert_eq!(schema.conditions().len(), 1);
	assert_eq!(schema.conditions()[0].name(), "positive");
	assert!(schema.accepts().unwrap());
	assert!(schema.validate().is_ok());
}

/// References list the current value first, then declared variants, deduplicated.
#[test]
fn test_references() {
	let b = RegistrationKey::new("b", "testing");
	let c = RegistrationKey::new("c", "testing");
	let mut schema = Schema::new();
	schema.add_parameter(Parameter::new("plain", 1).with_variants([1, 2]));
	schema.add_parameter(
		Parameter::reference("child", b.clone()).with_variants([c.clone(), b.clone()]),
	);

	assert_eq!(schema.references().unwrap(), vec![b, c]);
}

#[test]
fn test_reference_variants_must_be_keys() {
	let mut schema = Schema::new();
	schema.add_parameter(
		Parameter::reference("child", RegistrationKey::new("b", "testing")).with_variants([1]),
	);
	assert_eq!(
		schema.references(),
		Err(SchemaError::ReferenceExpected {
			parameter: "child".into(),
			got: "int",
		})
	);
}
