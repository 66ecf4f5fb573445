//! The registry: bound identities, deferred requests, and their resolution.
//!
//! Identities are bound either immediately (`register_and_bind*`) or recorded
//! as pending requests (`add_and_bind*`) and bound later by
//! [`Registry::expand_and_resolve_registration`], which orders the requests so
//! that every referenced schema is bound before the schemas that reference it.

mod entry;
mod error;
mod expand;
mod graph;
mod insert;

use std::sync::LazyLock;

use indexmap::{IndexMap, IndexSet};
use parking_lot::Mutex;
use rustc_hash::FxBuildHasher;
use tracing::{debug, info};

pub use entry::{Constructor, PendingRegistration, RegistrationMode, RegistryEntry, VariantFlags};
pub use error::{RegistryError, Result};
pub use insert::{DuplicatePolicy, InsertAction};

use crate::component::Component;
use crate::config::RegistryConfig;
use crate::key::RegistrationKey;
use crate::schema::Schema;


/// Insertion-ordered set of identities returned by registration calls.
pub type KeySet = IndexSet<RegistrationKey, FxBuildHasher>;

/// Registry of bound configurations and pending registration requests.
#[derive(Debug, Default)]
pub struct Registry {
	bound: IndexMap<RegistrationKey, RegistryEntry, FxBuildHasher>,
	pending: IndexMap<RegistrationKey, PendingRegistration, FxBuildHasher>,
	config: RegistryConfig,
}

static GLOBAL: LazyLock<Mutex<Registry>> = LazyLock::new(|| Mutex::new(Registry::new()));

/// Process-wide registry, initialized empty on first use.
pub fn global() -> &'static Mutex<Registry> {
	&GLOBAL
}

impl Registry {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_config(config: RegistryConfig) -> Self {
		Self {
			config,
			..Self::default()
		}
	}

	pub fn config(&self) -> &RegistryConfig {
		&self.config
	}

	/// Binds `entry` under its identity immediately.
	pub fn register_and_bind(&mut self, entry: RegistryEntry) -> Result<RegistrationKey> {
		self.ensure_not_pending(&entry.key)?;
		let key = entry.key.clone();
		self.insert_entry(entry, DuplicatePolicy::Error)?;
		Ok(key)
	}

	/// Binds `entry` and every variant it expands to immediately.
	///
	/// The returned set always contains the base identity. On failure nothing
	/// this call bound stays bound.
	pub fn register_and_bind_variants(
		&mut self,
		entry: RegistryEntry,
		flags: VariantFlags,
	) -> Result<KeySet> {
		self.ensure_not_pending(&entry.key)?;
		self.atomically(|registry| registry.expand_variants(entry, flags))
	}

	/// Records a single registration for later resolution.
	pub fn add_and_bind(&mut self, entry: RegistryEntry) -> Result<()> {
		self.enqueue(entry, RegistrationMode::Single)
	}

	/// Records a variant registration for later resolution.
	pub fn add_and_bind_variants(&mut self, entry: RegistryEntry, flags: VariantFlags) -> Result<()> {
		self.enqueue(entry, RegistrationMode::Variants(flags))
	}

	fn enqueue(&mut self, entry: RegistryEntry, mode: RegistrationMode) -> Result<()> {
		if !entry.key.is_valid() {
			return Err(RegistryError::InvalidKey { key: entry.key });
		}
		if self.bound.contains_key(&entry.key) {
			return Err(RegistryError::AlreadyRegistered { key: entry.key });
		}
		if self.pending.contains_key(&entry.key) {
			return Err(RegistryError::AlreadyQueued { key: entry.key });
		}

		debug!(key = %entry.key, ?mode, "queued registration");
		self.pending
			.insert(entry.key.clone(), PendingRegistration { entry, mode });
		Ok(())
	}

	fn ensure_not_pending(&self, key: &RegistrationKey) -> Result<()> {
		if self.pending.contains_key(key) {
			return Err(RegistryError::AlreadyRegistered { key: key.clone() });
		}
		Ok(())
	}

	/// Verifies that every reference resolves and that references are acyclic.
	///
	/// Has no effect on the registry.
	pub fn check_registration_graph(&self) -> Result<()> {
		self.dependency_order().map(drop)
	}

	/// Resolves every pending request, referenced schemas first.
	///
	/// Requests resolved before a failure stay bound and leave the pending
	/// list. The failing request leaves nothing bound and, with those after
	/// it, remains pending.
	pub fn expand_and_resolve_registration(&mut self) -> Result<KeySet> {
		let order = self.dependency_order()?;
		let mut created = KeySet::default();

		for key in &order {
			let Some(request) = self.pending.get(key).cloned() else {
				continue;
			};
			let resolved = self.atomically(|registry| match request.mode {
				RegistrationMode::Single => registry
					.insert_entry(request.entry, DuplicatePolicy::Error)
					.map(|_| std::iter::once(key.clone()).collect::<KeySet>()),
				RegistrationMode::Variants(flags) => registry.expand_variants(request.entry, flags),
			})?;
			created.extend(resolved);
			self.pending.shift_remove(key);
		}

		info!(
			resolved = order.len(),
			created = created.len(),
			bound = self.bound.len(),
			"resolved pending registrations"
		);
		Ok(created)
	}

	/// Discards every bound entry and pending request.
	pub fn clear(&mut self) {
		debug!(
			bound = self.bound.len(),
			pending = self.pending.len(),
			"clearing registry"
		);
		self.bound.clear();
		self.pending.clear();
	}

	pub fn get(&self, key: &RegistrationKey) -> Option<&RegistryEntry> {
		self.bound.get(key)
	}

	pub fn contains(&self, key: &RegistrationKey) -> bool {
		self.bound.contains_key(key)
	}

	pub fn is_pending(&self, key: &RegistrationKey) -> bool {
		self.pending.contains_key(key)
	}

	/// Number of bound identities.
	pub fn len(&self) -> usize {
		self.bound.len()
	}

	pub fn is_empty(&self) -> bool {
		self.bound.is_empty()
	}

	pub fn pending_len(&self) -> usize {
		self.pending.len()
	}

	/// Bound identities in binding order.
	pub fn keys(&self) -> impl Iterator<Item = &RegistrationKey> {
		self.bound.keys()
	}

	/// Bound identities partially matching `key`.
	pub fn partial_matches<'a>(
		&'a self,
		key: &'a RegistrationKey,
	) -> impl Iterator<Item = &'a RegistrationKey> {
		self.bound.keys().filter(move |bound| bound.partial_match(key))
	}

	/// Untagged identity for `name` in the configured default namespace.
	pub fn key(&self, name: impl Into<String>) -> RegistrationKey {
		RegistrationKey::new(name, self.config.default_namespace.clone())
	}

	/// Constructs a fresh schema for a bound identity.
	pub fn build_schema(&self, key: &RegistrationKey) -> Result<Schema> {
		self.bound_entry(key)?
			.construct()
			.map_err(RegistryError::schema(key))
	}

	/// Constructs and validates the schema, then builds the bound component.
	pub fn build_component(&self, key: &RegistrationKey) -> Result<Box<dyn Component>> {
		let entry = self.bound_entry(key)?;
		let schema = entry.construct().map_err(RegistryError::schema(key))?;
		schema.validate().map_err(RegistryError::schema(key))?;
		debug!(%key, component = entry.component.name(), "building component");
		Ok(entry.component.build(schema))
	}

	fn bound_entry(&self, key: &RegistrationKey) -> Result<&RegistryEntry> {
		self.bound
			.get(key)
			.ok_or_else(|| RegistryError::NotRegistered { key: key.clone() })
	}
}
