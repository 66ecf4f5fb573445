//! Schema type definitions and named variants.

use std::collections::BTreeSet;

use super::{Schema, SchemaError};

/// Produces a fresh, independent schema instance on every call.
pub type SchemaFactory = fn() -> Result<Schema, SchemaError>;

/// A labelled alternative configuration of a schema type.
///
/// The factory usually starts from the schema's default factory and overrides
/// fields through [`Schema::set_value`].
#[derive(Debug, Clone)]
pub struct NamedVariant {
	pub label: String,
	pub factory: SchemaFactory,
	/// Extra tags added to the variant's identity beside the label.
	pub tags: BTreeSet<String>,
	/// Namespace the variant binds into instead of the base namespace.
	pub namespace: Option<String>,
}

impl NamedVariant {
	pub fn new(label: impl Into<String>, factory: SchemaFactory) -> Self {
		Self {
			label: label.into(),
			factory,
			tags: BTreeSet::new(),
			namespace: None,
		}
	}

	pub fn with_tags<I, S>(mut self, tags: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.tags.extend(tags.into_iter().map(Into::into));
		self
	}

	pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self {
		self.namespace = Some(namespace.into());
		self
	}
}

/// Metadata describing a schema type.
///
/// Registry entries share a definition through `Arc<SchemaDef>`.
#[derive(Debug, Clone)]
pub struct SchemaDef {
	name: &'static str,
	default: SchemaFactory,
	supports_variants: bool,
	variants: Vec<NamedVariant>,
}

impl SchemaDef {
	/// Defines a schema type without named-variant support.
	pub fn new(name: &'static str, default: SchemaFactory) -> Self {
		Self {
			name,
			default,
			supports_variants: false,
			variants: Vec::new(),
		}
	}

	/// Defines a schema type that may declare named variants.
	pub fn with_variant_support(name: &'static str, default: SchemaFactory) -> Self {
		Self {
			supports_variants: true,
			..Self::new(name, default)
		}
	}

	pub fn name(&self) -> &'static str {
		self.name
	}

	pub fn supports_variants(&self) -> bool {
		self.supports_variants
	}

	/// Invokes the default factory.
	pub fn get_default(&self) -> Result<Schema, SchemaError> {
		(self.default)()
	}

	/// Named variants in declaration order.
	pub fn named_variants(&self) -> &[NamedVariant] {
		&self.variants
	}

	/// Declares a named variant with no extra tags.
	pub fn declare_named_variant(
		&mut self,
		label: impl Into<String>,
		factory: SchemaFactory,
	) -> Result<(), SchemaError> {
		self.declare(NamedVariant::new(label, factory))
	}

	/// Declares a fully described named variant.
	pub fn declare(&mut self, variant: NamedVariant) -> Result<(), SchemaError> {
		if !self.supports_variants {
			return Err(SchemaError::VariantsUnsupported {
				schema: self.name.to_string(),
				label: variant.label,
			});
		}
		if self.variants.iter().any(|v| v.label == variant.label) {
			return Err(SchemaError::DuplicateVariant {
				schema: self.name.to_string(),
				label: variant.label,
			});
		}
		self.variants.push(variant);
		Ok(())
	}

	/// Chaining form of [`declare_named_variant`](Self::declare_named_variant).
	pub fn named_variant(
		mut self,
		label: impl Into<String>,
		factory: SchemaFactory,
	) -> Result<Self, SchemaError> {
		self.declare_named_variant(label, factory)?;
		Ok(self)
	}
}
