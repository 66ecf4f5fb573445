//! Configuration schemas.
//!
//! A [`Schema`] is an insertion-ordered set of [`Parameter`]s plus a list of
//! [`Condition`]s that every concrete assignment must satisfy. Schema *types*
//! are described by [`SchemaDef`], which owns the default factory and any
//! named variants.
//!
//! Parameters may carry alternative values (`variants`). A parameter marked
//! as a registration holds a [`RegistrationKey`] pointing at another
//! registered schema; during expansion those references are followed and the
//! child's own alternatives multiply into the parent's product.

mod def;
mod error;

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

pub use def::{NamedVariant, SchemaDef, SchemaFactory};
pub use error::SchemaError;

use crate::key::RegistrationKey;
use crate::value::{TypeHint, Value};

#[cfg(test)]
mod tests;

/// A single declared parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
	pub name: String,
	pub value: Value,
	pub type_hint: TypeHint,
	pub description: Option<String>,
	/// Alternative values explored by combinatorial expansion. Empty means fixed.
	pub variants: Vec<Value>,
	/// The value is a reference to another registered schema.
	pub is_registration: bool,
	/// A `Null` value is rejected by validation.
	pub is_required: bool,
}

impl Parameter {
	/// Creates a fixed parameter.
	pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
		Self {
			name: name.into(),
			value: value.into(),
			type_hint: TypeHint::Any,
			description: None,
			variants: Vec::new(),
			is_registration: false,
			is_required: false,
		}
	}

	/// Creates a reference-typed parameter pointing at `key`.
	pub fn reference(name: impl Into<String>, key: RegistrationKey) -> Self {
		Self::new(name, key).with_type_hint(TypeHint::Key).registration()
	}

	pub fn with_type_hint(mut self, hint: TypeHint) -> Self {
		self.type_hint = hint;
		self
	}

	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());
		self
	}

	/// Sets the alternative values explored by combinatorial expansion.
	pub fn with_variants<I, V>(mut self, variants: I) -> Self
	where
		I: IntoIterator<Item = V>,
		V: Into<Value>,
	{
		self.variants = variants.into_iter().map(Into::into).collect();
		self
	}

	pub fn required(mut self) -> Self {
		self.is_required = true;
		self
	}

	/// Marks the parameter as a reference to another registered schema.
	pub fn registration(mut self) -> Self {
		self.is_registration = true;
		self
	}

	pub fn has_variants(&self) -> bool {
		!self.variants.is_empty()
	}

	/// Values this parameter can take: the declared variants, or the current
	/// value when none were declared.
	pub fn alternatives(&self) -> Vec<Value> {
		if self.has_variants() {
			self.variants.clone()
		} else {
			vec![self.value.clone()]
		}
	}

	/// Identities named by a reference-typed parameter, current value first.
	///
	/// Returns an empty list for literal parameters.
	pub fn reference_targets(&self) -> Result<Vec<RegistrationKey>, SchemaError> {
		if !self.is_registration {
			return Ok(Vec::new());
		}

		let mut targets: Vec<RegistrationKey> = Vec::with_capacity(self.variants.len() + 1);
		let candidates = std::iter::once(&self.value).chain(self.variants.iter());
		for candidate in candidates {
			match candidate {
				Value::Key(key) => {
					if !targets.contains(key) {
						targets.push(key.clone());
					}
				}
				Value::Null => {}
				other => {
					return Err(SchemaError::ReferenceExpected {
						parameter: self.name.clone(),
						got: other.type_name(),
					});
				}
			}
		}
		Ok(targets)
	}
}

/// Predicate signature shared by every [`Condition`].
pub type Predicate = dyn Fn(&Schema) -> Result<bool, String> + Send + Sync;

/// A named validity predicate over a fully assigned schema.
#[derive(Clone)]
pub struct Condition {
	name: String,
	predicate: Arc<Predicate>,
}

impl Condition {
	/// Creates a condition that cannot fail to evaluate.
	pub fn new<F>(name: impl Into<String>, predicate: F) -> Self
	where
		F: Fn(&Schema) -> bool + Send + Sync + 'static,
	{
		Self::fallible(name, move |schema| Ok(predicate(schema)))
	}

	/// Creates a condition whose `Err` marks a malformed predicate.
	pub fn fallible<F>(name: impl Into<String>, predicate: F) -> Self
	where
		F: Fn(&Schema) -> Result<bool, String> + Send + Sync + 'static,
	{
		Self {
			name: name.into(),
			predicate: Arc::new(predicate),
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// Evaluates the predicate against `schema`.
	pub fn evaluate(&self, schema: &Schema) -> Result<bool, SchemaError> {
		(self.predicate)(schema).map_err(|reason| SchemaError::Predicate {
			condition: self.name.clone(),
			reason,
		})
	}
}

impl fmt::Debug for Condition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Condition").field(&self.name).finish()
	}
}

/// A concrete configuration: parameters plus validity conditions.
#[derive(Debug, Clone, Default)]
pub struct Schema {
	params: IndexMap<String, Parameter, FxBuildHasher>,
	conditions: Vec<Condition>,
}

impl Schema {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a parameter, replacing any parameter with the same name in place.
	///
	/// The `<name>_is_required` condition follows the latest declaration.
	pub fn add_parameter(&mut self, param: Parameter) {
		let name = param.name.clone();
		let condition = format!("{name}_is_required");
		if param.is_required {
			if !self.conditions.iter().any(|c| c.name == condition) {
				self.add_condition(condition, move |schema| {
					schema.get(&name).is_some_and(|value| !value.is_null())
				});
			}
		} else {
			self.conditions.retain(|c| c.name != condition);
		}
		self.params.insert(param.name.clone(), param);
	}

	/// Appends a condition. All conditions must accept an assignment.
	pub fn add_condition<F>(&mut self, name: impl Into<String>, predicate: F)
	where
		F: Fn(&Schema) -> bool + Send + Sync + 'static,
	{
		self.conditions.push(Condition::new(name, predicate));
	}

	/// Appends a condition whose predicate may fail to evaluate.
	pub fn add_fallible_condition<F>(&mut self, name: impl Into<String>, predicate: F)
	where
		F: Fn(&Schema) -> Result<bool, String> + Send + Sync + 'static,
	{
		self.conditions.push(Condition::fallible(name, predicate));
	}

	/// Overrides the value of an existing parameter.
	pub fn set_value(&mut self, name: &str, value: impl Into<Value>) -> Result<(), SchemaError> {
		let param = self
			.params
			.get_mut(name)
			.ok_or_else(|| SchemaError::UnknownParameter {
				parameter: name.to_string(),
			})?;
		let value = value.into();
		if param.is_registration && !matches!(value, Value::Key(_) | Value::Null) {
			return Err(SchemaError::ReferenceExpected {
				parameter: name.to_string(),
				got: value.type_name(),
			});
		}
		param.value = value;
		Ok(())
	}

	/// Returns an independent copy with the given values overridden.
	pub fn delta_copy(&self, overrides: &[(String, Value)]) -> Result<Schema, SchemaError> {
		let mut copy = self.clone();
		for (name, value) in overrides {
			copy.set_value(name, value.clone())?;
		}
		Ok(copy)
	}

	/// Returns the current value of a parameter.
	pub fn get(&self, name: &str) -> Option<&Value> {
		self.params.get(name).map(|param| &param.value)
	}

	pub fn param(&self, name: &str) -> Option<&Parameter> {
		self.params.get(name)
	}

	/// Parameters in declaration order.
	pub fn parameters(&self) -> impl Iterator<Item = &Parameter> {
		self.params.values()
	}

	pub fn conditions(&self) -> &[Condition] {
		&self.conditions
	}

	pub fn contains(&self, name: &str) -> bool {
		self.params.contains_key(name)
	}

	pub fn len(&self) -> usize {
		self.params.len()
	}

	pub fn is_empty(&self) -> bool {
		self.params.is_empty()
	}

	/// Every identity referenced by reference-typed parameters, deduplicated.
	pub fn references(&self) -> Result<Vec<RegistrationKey>, SchemaError> {
		let mut refs = Vec::new();
		for param in self.parameters() {
			for key in param.reference_targets()? {
				if !refs.contains(&key) {
					refs.push(key);
				}
			}
		}
		Ok(refs)
	}

	/// Returns the name of the first condition rejecting this assignment.
	pub fn first_rejection(&self) -> Result<Option<&str>, SchemaError> {
		for condition in &self.conditions {
			if !condition.evaluate(self)? {
				return Ok(Some(condition.name()));
			}
		}
		Ok(None)
	}

	/// Returns true if every condition accepts this assignment.
	pub fn accepts(&self) -> Result<bool, SchemaError> {
		Ok(self.first_rejection()?.is_none())
	}

	/// Fails with [`SchemaError::ValidationFailed`] naming the first rejecting condition.
	pub fn validate(&self) -> Result<(), SchemaError> {
		match self.first_rejection()? {
			Some(condition) => Err(SchemaError::ValidationFailed {
				condition: condition.to_string(),
			}),
			None => Ok(()),
		}
	}
}
