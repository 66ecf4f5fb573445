//! Registration identities.
//!
//! A [`RegistrationKey`] names one concrete, bindable configuration. Tags are
//! kept in an ordered set, so equality, hashing, and the canonical string form
//! never depend on the order tags were supplied in.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

const NAME_PREFIX: &str = "name:";
const TAGS_MARKER: &str = "--tags:";
const NAMESPACE_MARKER: &str = "--namespace:";

/// Compound identity of a registered configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RegistrationKey {
	name: String,
	namespace: String,
	#[serde(default)]
	tags: BTreeSet<String>,
}

impl RegistrationKey {
	/// Creates an untagged identity.
	pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			namespace: namespace.into(),
			tags: BTreeSet::new(),
		}
	}

	/// Returns this identity with additional tags.
	pub fn with_tags<I, S>(mut self, tags: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.tags.extend(tags.into_iter().map(Into::into));
		self
	}

	/// Returns this identity with one additional tag.
	pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
		self.tags.insert(tag.into());
		self
	}

	/// Returns this identity moved into another namespace.
	pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self {
		self.namespace = namespace.into();
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn namespace(&self) -> &str {
		&self.namespace
	}

	/// Tags in sorted order.
	pub fn tags(&self) -> &BTreeSet<String> {
		&self.tags
	}

	pub fn is_tagged(&self) -> bool {
		!self.tags.is_empty()
	}

	/// Returns true if both name and namespace are non-empty.
	pub fn is_valid(&self) -> bool {
		!self.name.is_empty() && !self.namespace.is_empty()
	}

	/// Loose identity comparison.
	///
	/// Name and namespace must match exactly; the tag sets match when either
	/// one is a subset of the other. An untagged key therefore partially
	/// matches every tagged variant sharing its name and namespace.
	pub fn partial_match(&self, other: &RegistrationKey) -> bool {
		self.name == other.name
			&& self.namespace == other.namespace
			&& (self.tags.is_subset(&other.tags) || other.tags.is_subset(&self.tags))
	}
}

impl fmt::Display for RegistrationKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let tags = serde_json::to_string(&self.tags).map_err(|_| fmt::Error)?;
		write!(
			f,
			"{NAME_PREFIX}{}{TAGS_MARKER}{tags}{NAMESPACE_MARKER}{}",
			self.name, self.namespace
		)
	}
}

/// Failure to parse the canonical string form of a [`RegistrationKey`].
#[derive(Debug, thiserror::Error)]
pub enum KeyParseError {
	#[error("malformed registration key {input:?}: missing {field}")]
	MissingField { field: &'static str, input: String },
	#[error("malformed tag list in registration key {input:?}")]
	Tags {
		input: String,
		#[source]
		source: serde_json::Error,
	},
}

impl FromStr for RegistrationKey {
	type Err = KeyParseError;

	fn from_str(input: &str) -> Result<Self, Self::Err> {
		let missing = |field| KeyParseError::MissingField {
			field,
			input: input.to_string(),
		};

		let rest = input.strip_prefix(NAME_PREFIX).ok_or_else(|| missing("name"))?;
		let (name, rest) = rest.split_once(TAGS_MARKER).ok_or_else(|| missing("tags"))?;
		let (tags, namespace) = rest
			.rsplit_once(NAMESPACE_MARKER)
			.ok_or_else(|| missing("namespace"))?;
		let tags = serde_json::from_str(tags).map_err(|source| KeyParseError::Tags {
			input: input.to_string(),
			source,
		})?;

		Ok(Self {
			name: name.to_string(),
			namespace: namespace.to_string(),
			tags,
		})
	}
}
