/// Errors raised while declaring, building, or validating a schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
	/// A named variant was declared on a schema type without variant support.
	#[error("schema {schema} does not support named variants (declaring {label:?})")]
	VariantsUnsupported { schema: String, label: String },
	/// A named variant label was declared twice on the same schema type.
	#[error("schema {schema} already declares a named variant {label:?}")]
	DuplicateVariant { schema: String, label: String },
	/// An override targeted a parameter the schema does not declare.
	#[error("unknown parameter {parameter:?}")]
	UnknownParameter { parameter: String },
	/// A reference-typed parameter received something other than a key.
	#[error("parameter {parameter:?} is a reference and expects a registration key, got {got}")]
	ReferenceExpected {
		parameter: String,
		got: &'static str,
	},
	/// A condition predicate failed to evaluate.
	#[error("condition {condition:?} failed to evaluate: {reason}")]
	Predicate { condition: String, reason: String },
	/// A condition rejected the schema during validation.
	#[error("condition {condition:?} rejected the configuration")]
	ValidationFailed { condition: String },
	/// A schema factory reported a failure of its own.
	#[error("factory for schema {schema} failed: {reason}")]
	Factory { schema: String, reason: String },
}
