//! Variant expansion.
//!
//! An entry expands either through its schema type's named variants or
//! through the cartesian product of its parameter alternatives. Reference
//! parameters recurse into the referenced entry, whose own combinations
//! become the parameter's alternatives.

use itertools::Itertools;
use tracing::{debug, trace, warn};

use super::entry::{Constructor, RegistryEntry, VariantFlags};
use super::error::{RegistryError, Result};
use super::insert::{DuplicatePolicy, InsertAction};
use super::{KeySet, Registry};
use crate::key::RegistrationKey;
use crate::schema::{Parameter, Schema};
use crate::value::Value;

/// One parameter's alternatives in the product.
struct Dimension {
	param: String,
	choices: Vec<Choice>,
}

struct Choice {
	value: Value,
	tags: Vec<String>,
}

impl Registry {
	/// Binds the base identity of `entry`, then its named variants or
	/// parameter combinations as `flags` select.
	pub(crate) fn expand_variants(
		&mut self,
		entry: RegistryEntry,
		flags: VariantFlags,
	) -> Result<KeySet> {
		let base = entry.key.clone();
		entry.construct().map_err(RegistryError::schema(&base))?;
		self.insert_entry(entry.clone(), DuplicatePolicy::Error)?;

		let mut created = KeySet::default();
		created.insert(base.clone());

		if entry.takes_named_path(flags) {
			for (key, factory) in entry.named_variant_keys() {
				self.insert_entry(
					entry.derive(key.clone(), Constructor::Factory(factory)),
					DuplicatePolicy::Error,
				)?;
				created.insert(key);
			}
			debug!(key = %base, variants = created.len() - 1, "bound named variants");
			return Ok(created);
		}

		if !flags.parameter_variants_only
			&& !entry.constructor.is_default()
			&& !entry.schema.named_variants().is_empty()
		{
			warn!(
				key = %base,
				schema = entry.schema.name(),
				"custom constructor, skipping named variants"
			);
		}

		if flags.parameter_variants_only || flags.allow_parameter_variants {
			let mut stack = Vec::new();
			let combinations = self.bind_combinations(&entry, DuplicatePolicy::Error, &mut stack)?;
			debug!(key = %base, combinations = combinations.len(), "bound parameter combinations");
			created.extend(combinations);
		}

		Ok(created)
	}

	/// Binds every accepted combination of `entry`'s parameter alternatives
	/// and returns their identities, excluding the base.
	fn bind_combinations(
		&mut self,
		entry: &RegistryEntry,
		policy: DuplicatePolicy,
		stack: &mut Vec<RegistrationKey>,
	) -> Result<Vec<RegistrationKey>> {
		if let Some(start) = stack.iter().position(|key| *key == entry.key) {
			let mut path = stack[start..].to_vec();
			path.push(entry.key.clone());
			return Err(RegistryError::Cycle { path });
		}

		let schema = entry.construct().map_err(RegistryError::schema(&entry.key))?;
		stack.push(entry.key.clone());
		let dimensions = self.dimensions(entry, &schema, stack);
		stack.pop();
		let dimensions = dimensions?;

		let combinations = accepted_combinations(entry, &schema, &dimensions, self.config.max_combinations)?;
		let mut keys = Vec::with_capacity(combinations.len());
		for (key, overrides) in combinations {
			let combination = entry.derive(key.clone(), entry.constructor.with_overrides(overrides));
			if self.insert_entry(combination, policy)? == InsertAction::KeptExisting {
				trace!(%key, "combination already bound");
			}
			keys.push(key);
		}

		Ok(keys)
	}

	/// Combination identities a pending request will bind from its own
	/// declared alternatives, without folding referenced entries.
	pub(crate) fn declared_combination_keys(&self, entry: &RegistryEntry) -> Result<Vec<RegistrationKey>> {
		let schema = entry.construct().map_err(RegistryError::schema(&entry.key))?;
		let mut dimensions = Vec::new();
		for param in schema.parameters().filter(|param| param.has_variants()) {
			if param.is_registration {
				param
					.reference_targets()
					.map_err(RegistryError::schema(&entry.key))?;
				let choices = param
					.variants
					.iter()
					.filter_map(Value::as_key)
					.map(|alt| reference_choice(&param.name, alt.clone(), entry.key.namespace()))
					.collect();
				dimensions.push(Dimension {
					param: param.name.clone(),
					choices,
				});
			} else {
				dimensions.push(literal_dimension(param));
			}
		}

		let combinations = accepted_combinations(entry, &schema, &dimensions, self.config.max_combinations)?;
		Ok(combinations.into_iter().map(|(key, _)| key).collect())
	}

	fn dimensions(
		&mut self,
		entry: &RegistryEntry,
		schema: &Schema,
		stack: &mut Vec<RegistrationKey>,
	) -> Result<Vec<Dimension>> {
		let mut dimensions = Vec::new();
		for param in schema.parameters() {
			if param.is_registration {
				if let Some(dim) = self.reference_dimension(entry, param, stack)? {
					dimensions.push(dim);
				}
			} else if param.has_variants() {
				dimensions.push(literal_dimension(param));
			}
		}
		Ok(dimensions)
	}

	/// Folds every referenced entry and collects the resulting identities.
	fn reference_dimension(
		&mut self,
		entry: &RegistryEntry,
		param: &Parameter,
		stack: &mut Vec<RegistrationKey>,
	) -> Result<Option<Dimension>> {
		let targets = param
			.reference_targets()
			.map_err(RegistryError::schema(&entry.key))?;

		let mut alternatives: Vec<RegistrationKey> = Vec::new();
		for target in targets {
			let child = self.bound.get(&target).cloned().ok_or_else(|| {
				RegistryError::UnresolvedReference {
					parent: entry.key.clone(),
					child: target.clone(),
				}
			})?;

			let mut folded = self.bind_combinations(&child, DuplicatePolicy::KeepExisting, stack)?;
			if folded.is_empty() {
				folded.push(target);
			}
			for key in folded {
				if !alternatives.contains(&key) {
					alternatives.push(key);
				}
			}
		}

		if !param.has_variants() && alternatives.iter().eq(param.value.as_key()) {
			return Ok(None);
		}

		let choices = alternatives
			.into_iter()
			.map(|alt| reference_choice(&param.name, alt, entry.key.namespace()))
			.collect();

		Ok(Some(Dimension {
			param: param.name.clone(),
			choices,
		}))
	}
}

fn literal_dimension(param: &Parameter) -> Dimension {
	Dimension {
		param: param.name.clone(),
		choices: param
			.variants
			.iter()
			.map(|value| Choice {
				value: value.clone(),
				tags: vec![format!("{}={value}", param.name)],
			})
			.collect(),
	}
}

/// Tags a referenced identity with its own tags and, when it lives
/// elsewhere, its namespace, both prefixed by the parameter name.
fn reference_choice(param: &str, alt: RegistrationKey, namespace: &str) -> Choice {
	let mut tags: Vec<String> = alt
		.tags()
		.iter()
		.map(|tag| format!("{param}.{tag}"))
		.collect();
	if alt.namespace() != namespace {
		tags.push(format!("{param}.{}", alt.namespace()));
	}
	Choice {
		value: Value::Key(alt),
		tags,
	}
}

/// Enumerates the product of `dimensions` and keeps every tuple accepted by
/// all conditions, paired with the overrides that build it.
///
/// Fails before enumerating when the product exceeds `limit`. Tuples that
/// render to the base identity or to an identity already produced are skipped.
fn accepted_combinations(
	entry: &RegistryEntry,
	schema: &Schema,
	dimensions: &[Dimension],
	limit: usize,
) -> Result<Vec<(RegistrationKey, Vec<(String, Value)>)>> {
	if dimensions.is_empty() {
		return Ok(Vec::new());
	}

	let count = dimensions
		.iter()
		.try_fold(1usize, |acc, dim| acc.checked_mul(dim.choices.len()));
	match count {
		Some(count) if count <= limit => {}
		count => {
			return Err(RegistryError::CombinationLimit {
				key: entry.key.clone(),
				count: count.unwrap_or(usize::MAX),
				limit,
			});
		}
	}

	let mut accepted: Vec<(RegistrationKey, Vec<(String, Value)>)> = Vec::new();
	let tuples = dimensions
		.iter()
		.map(|dim| dim.choices.iter())
		.multi_cartesian_product();
	for tuple in tuples {
		let overrides: Vec<(String, Value)> = dimensions
			.iter()
			.zip(&tuple)
			.map(|(dim, choice)| (dim.param.clone(), choice.value.clone()))
			.collect();

		let candidate = schema
			.delta_copy(&overrides)
			.map_err(RegistryError::schema(&entry.key))?;
		let rejection = candidate
			.first_rejection()
			.map_err(RegistryError::schema(&entry.key))?;
		if let Some(condition) = rejection {
			trace!(key = %entry.key, condition, ?overrides, "combination rejected");
			continue;
		}

		let key = entry
			.key
			.clone()
			.with_tags(tuple.iter().flat_map(|choice| choice.tags.iter().cloned()));
		if key == entry.key || accepted.iter().any(|(seen, _)| *seen == key) {
			continue;
		}
		accepted.push((key, overrides));
	}

	Ok(accepted)
}
