//! Registry entries and deferred requests.

use std::sync::Arc;

use crate::component::ComponentType;
use crate::key::RegistrationKey;
use crate::schema::{Schema, SchemaDef, SchemaError, SchemaFactory};
use crate::value::Value;

/// How a bound identity produces its schema.
#[derive(Debug, Clone)]
pub enum Constructor {
	/// The schema type's default factory.
	Default,
	/// An explicit factory, such as a named variant's.
	Factory(SchemaFactory),
	/// A base constructor followed by parameter overrides.
	Delta {
		base: Box<Constructor>,
		overrides: Vec<(String, Value)>,
	},
}

impl Constructor {
	/// Produces a fresh schema instance.
	pub fn construct(&self, def: &SchemaDef) -> Result<Schema, SchemaError> {
		match self {
			Constructor::Default => def.get_default(),
			Constructor::Factory(factory) => factory(),
			Constructor::Delta { base, overrides } => base.construct(def)?.delta_copy(overrides),
		}
	}

	pub fn is_default(&self) -> bool {
		matches!(self, Constructor::Default)
	}

	/// Wraps this constructor with parameter overrides.
	pub fn with_overrides(&self, overrides: Vec<(String, Value)>) -> Self {
		Constructor::Delta {
			base: Box::new(self.clone()),
			overrides,
		}
	}
}

/// A schema type bound to an identity and a component type.
#[derive(Debug, Clone)]
pub struct RegistryEntry {
	pub key: RegistrationKey,
	pub schema: Arc<SchemaDef>,
	pub constructor: Constructor,
	pub component: ComponentType,
}

impl RegistryEntry {
	/// Creates an entry using the schema type's default factory.
	pub fn new(key: RegistrationKey, schema: Arc<SchemaDef>, component: ComponentType) -> Self {
		Self {
			key,
			schema,
			constructor: Constructor::Default,
			component,
		}
	}

	pub fn with_constructor(mut self, constructor: Constructor) -> Self {
		self.constructor = constructor;
		self
	}

	/// Constructs a fresh schema for this entry.
	pub fn construct(&self) -> Result<Schema, SchemaError> {
		self.constructor.construct(&self.schema)
	}

	/// Derives an entry for another identity sharing this schema type and component.
	pub(crate) fn derive(&self, key: RegistrationKey, constructor: Constructor) -> Self {
		Self {
			key,
			schema: Arc::clone(&self.schema),
			constructor,
			component: self.component,
		}
	}

	/// Returns true if expansion with `flags` takes the named-variant path.
	pub fn takes_named_path(&self, flags: VariantFlags) -> bool {
		!flags.parameter_variants_only
			&& self.schema.supports_variants()
			&& !self.schema.named_variants().is_empty()
			&& self.constructor.is_default()
	}

	/// Identities the named-variant path binds, excluding the base.
	pub fn named_variant_keys(&self) -> impl Iterator<Item = (RegistrationKey, SchemaFactory)> + '_ {
		self.schema.named_variants().iter().map(|variant| {
			let mut key = self
				.key
				.clone()
				.with_tag(variant.label.clone())
				.with_tags(variant.tags.iter().cloned());
			if let Some(namespace) = &variant.namespace {
				key = key.in_namespace(namespace.clone());
			}
			(key, variant.factory)
		})
	}
}

/// Expansion switches for variant registrations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VariantFlags {
	/// Skip named variants and always expand parameter alternatives.
	pub parameter_variants_only: bool,
	/// Expand parameter alternatives when no named variants apply.
	pub allow_parameter_variants: bool,
}

impl VariantFlags {
	/// Named variants only.
	pub fn named() -> Self {
		Self::default()
	}

	/// Named variants when declared, parameter alternatives otherwise.
	pub fn with_parameter_variants() -> Self {
		Self {
			allow_parameter_variants: true,
			..Self::default()
		}
	}

	/// Parameter alternatives only.
	pub fn parameter_variants_only() -> Self {
		Self {
			parameter_variants_only: true,
			allow_parameter_variants: true,
		}
	}
}

/// Requested handling of a deferred registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationMode {
	Single,
	Variants(VariantFlags),
}

/// A registration recorded by `add_and_bind*` awaiting resolution.
#[derive(Debug, Clone)]
pub struct PendingRegistration {
	pub entry: RegistryEntry,
	pub mode: RegistrationMode,
}

impl PendingRegistration {
	/// Returns true if resolving this request will bind named variants.
	pub fn takes_named_path(&self) -> bool {
		match self.mode {
			RegistrationMode::Single => false,
			RegistrationMode::Variants(flags) => self.entry.takes_named_path(flags),
		}
	}

	/// Returns true if resolving this request will bind parameter combinations.
	pub fn takes_combinatorial_path(&self) -> bool {
		match self.mode {
			RegistrationMode::Single => false,
			RegistrationMode::Variants(flags) => {
				!self.entry.takes_named_path(flags)
					&& (flags.parameter_variants_only || flags.allow_parameter_variants)
			}
		}
	}
}
