//! Insertion into the bound set.

use tracing::debug;

use super::entry::RegistryEntry;
use super::error::{RegistryError, Result};
use super::Registry;

/// What to do when an identity is already bound.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
	/// Fail with [`RegistryError::AlreadyRegistered`].
	#[default]
	Error,
	/// Keep the existing binding and drop the incoming one.
	KeepExisting,
}

/// Result of a successful insertion.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum InsertAction {
	/// Identity was new; entry inserted.
	InsertedNew,
	/// Identity existed; kept the existing entry.
	KeptExisting,
}

impl Registry {
	/// Binds `entry` under its identity according to `policy`.
	pub(crate) fn insert_entry(
		&mut self,
		entry: RegistryEntry,
		policy: DuplicatePolicy,
	) -> Result<InsertAction> {
		if !entry.key.is_valid() {
			return Err(RegistryError::InvalidKey { key: entry.key });
		}

		if self.bound.contains_key(&entry.key) {
			return match policy {
				DuplicatePolicy::Error => Err(RegistryError::AlreadyRegistered { key: entry.key }),
				DuplicatePolicy::KeepExisting => {
					debug!(key = %entry.key, "reusing bound entry");
					Ok(InsertAction::KeptExisting)
				}
			};
		}

		debug!(key = %entry.key, schema = entry.schema.name(), "bound entry");
		self.bound.insert(entry.key.clone(), entry);
		Ok(InsertAction::InsertedNew)
	}

	/// Runs `op`, unbinding everything it bound if it fails.
	///
	/// Relies on the bound set being append-only: `insert_entry` never
	/// replaces or reorders an existing entry.
	pub(crate) fn atomically<T>(&mut self, op: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
		let mark = self.bound.len();
		let result = op(self);
		if let Err(err) = &result {
			let discarded = self.bound.len() - mark;
			self.bound.truncate(mark);
			debug!(discarded, %err, "rolled back failed registration");
		}
		result
	}
}
