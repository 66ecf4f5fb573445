use crate::key::RegistrationKey;
use crate::schema::SchemaError;

/// Registry operation result.
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Errors raised while binding, checking, or resolving registrations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
	/// The identity has an empty name or namespace.
	#[error("invalid registration key: {key}")]
	InvalidKey { key: RegistrationKey },
	/// The identity is already bound, or queued when binding immediately.
	#[error("already registered: {key}")]
	AlreadyRegistered { key: RegistrationKey },
	/// A deferred request for the identity is already pending.
	#[error("already queued: {key}")]
	AlreadyQueued { key: RegistrationKey },
	#[error("not registered: {key}")]
	NotRegistered { key: RegistrationKey },
	/// A reference-typed parameter names an identity that will never be bound.
	#[error("{parent} references unregistered {child}")]
	UnresolvedReference {
		parent: RegistrationKey,
		child: RegistrationKey,
	},
	/// Reference-typed parameters form a loop.
	#[error("reference cycle: {}", display_path(path))]
	Cycle { path: Vec<RegistrationKey> },
	#[error("{key} expands to {count} combinations, exceeding the limit of {limit}")]
	CombinationLimit {
		key: RegistrationKey,
		count: usize,
		limit: usize,
	},
	/// Building, overriding, or validating the schema of `key` failed.
	#[error("schema error for {key}")]
	Schema {
		key: RegistrationKey,
		#[source]
		source: SchemaError,
	},
}

impl RegistryError {
	pub(crate) fn schema(key: &RegistrationKey) -> impl FnOnce(SchemaError) -> Self + '_ {
		move |source| Self::Schema {
			key: key.clone(),
			source,
		}
	}
}

fn display_path(path: &[RegistrationKey]) -> String {
	path.iter()
		.map(ToString::to_string)
		.collect::<Vec<_>>()
		.join(" -> ")
}
