//! Reference graph over bound entries and pending requests.
//!
//! Nodes are bound identities and pending request identities. Identities a
//! pending request will bind, through its named variants or through the
//! combinations of its own declared alternatives, resolve to the request that
//! owns them. Edges point from a referencing node to the node
//! owning the referenced identity.

use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashMap};
use tracing::debug;

use super::error::{RegistryError, Result};
use super::Registry;
use crate::key::RegistrationKey;

type Edges = IndexMap<RegistrationKey, Vec<RegistrationKey>, FxBuildHasher>;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
	Visiting,
	Done,
}

impl Registry {
	/// Pending identities ordered so that referenced requests come first.
	pub(crate) fn dependency_order(&self) -> Result<Vec<RegistrationKey>> {
		let edges = self.reference_edges()?;
		let mut marks = FxHashMap::default();
		let mut path = Vec::new();
		let mut order = Vec::with_capacity(edges.len());

		for node in edges.keys() {
			visit(&edges, node, &mut marks, &mut path, &mut order)?;
		}

		order.retain(|key| self.pending.contains_key(key));
		Ok(order)
	}

	fn reference_edges(&self) -> Result<Edges> {
		let mut owners: FxHashMap<RegistrationKey, RegistrationKey> = FxHashMap::default();
		for key in self.bound.keys().chain(self.pending.keys()) {
			owners.insert(key.clone(), key.clone());
		}
		for request in self.pending.values() {
			let produced: Vec<RegistrationKey> = if request.takes_named_path() {
				request.entry.named_variant_keys().map(|(key, _)| key).collect()
			} else if request.takes_combinatorial_path() {
				self.declared_combination_keys(&request.entry)?
			} else {
				continue;
			};
			for key in produced {
				owners
					.entry(key)
					.or_insert_with(|| request.entry.key.clone());
			}
		}

		let nodes = self
			.bound
			.values()
			.map(|entry| (entry, false))
			.chain(self.pending.values().map(|r| (&r.entry, r.takes_named_path())));

		let mut edges = Edges::default();
		for (entry, named) in nodes {
			let mut schemas = vec![entry.construct().map_err(RegistryError::schema(&entry.key))?];
			if named {
				for (key, factory) in entry.named_variant_keys() {
					schemas.push(factory().map_err(RegistryError::schema(&key))?);
				}
			}

			let mut deps: Vec<RegistrationKey> = Vec::new();
			for schema in &schemas {
				let refs = schema
					.references()
					.map_err(RegistryError::schema(&entry.key))?;
				for child in refs {
					let owner = owners.get(&child).ok_or_else(|| {
						RegistryError::UnresolvedReference {
							parent: entry.key.clone(),
							child: child.clone(),
						}
					})?;
					if !deps.contains(owner) {
						deps.push(owner.clone());
					}
				}
			}
			edges.insert(entry.key.clone(), deps);
		}

		debug!(
			nodes = edges.len(),
			edges = edges.values().map(Vec::len).sum::<usize>(),
			"built reference graph"
		);
		Ok(edges)
	}
}

fn visit<'a>(
	edges: &'a Edges,
	node: &'a RegistrationKey,
	marks: &mut FxHashMap<&'a RegistrationKey, Mark>,
	path: &mut Vec<&'a RegistrationKey>,
	order: &mut Vec<RegistrationKey>,
) -> Result<()> {
	match marks.get(node) {
		Some(Mark::Done) => return Ok(()),
		Some(Mark::Visiting) => {
			let start = path.iter().position(|key| *key == node).unwrap_or(0);
			let mut cycle: Vec<RegistrationKey> = path[start..].iter().map(|key| (*key).clone()).collect();
			cycle.push(node.clone());
			return Err(RegistryError::Cycle { path: cycle });
		}
		None => {}
	}

	marks.insert(node, Mark::Visiting);
	path.push(node);
	for dep in edges.get(node).into_iter().flatten() {
		visit(edges, dep, marks, path, order)?;
	}
	path.pop();
	marks.insert(node, Mark::Done);
	order.push(node.clone());
	Ok(())
}
