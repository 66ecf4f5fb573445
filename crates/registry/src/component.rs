//! Components bound to registered configurations.
//!
//! A component is whatever consumes a validated [`Schema`]. The registry only
//! records which component type an identity is bound to and hands the schema
//! over on [`Registry::build_component`](crate::Registry::build_component).

use std::fmt;

use crate::schema::Schema;

/// A consumer constructed from a validated schema.
pub trait Component: 'static {
	fn new(schema: Schema) -> Self
	where
		Self: Sized;

	fn schema(&self) -> &Schema;
}

/// Type-erased handle to a [`Component`] implementation.
#[derive(Clone, Copy)]
pub struct ComponentType {
	name: &'static str,
	build: fn(Schema) -> Box<dyn Component>,
}

fn build_boxed<C: Component>(schema: Schema) -> Box<dyn Component> {
	Box::new(C::new(schema))
}

impl ComponentType {
	pub fn of<C: Component>() -> Self {
		Self {
			name: std::any::type_name::<C>(),
			build: build_boxed::<C>,
		}
	}

	/// Fully qualified type name of the component.
	pub fn name(&self) -> &'static str {
		self.name
	}

	pub fn build(&self, schema: Schema) -> Box<dyn Component> {
		(self.build)(schema)
	}
}

impl PartialEq for ComponentType {
	fn eq(&self, other: &Self) -> bool {
		self.name == other.name
	}
}

impl Eq for ComponentType {}

impl fmt::Debug for ComponentType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("ComponentType").field(&self.name).finish()
	}
}

/// Stock component that only owns its schema.
#[derive(Debug, Clone)]
pub struct BasicComponent {
	schema: Schema,
}

impl Component for BasicComponent {
	fn new(schema: Schema) -> Self {
		Self { schema }
	}

	fn schema(&self) -> &Schema {
		&self.schema
	}
}
