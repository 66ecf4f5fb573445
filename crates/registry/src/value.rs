//! Concrete parameter values.
//!
//! [`TypeHint`] is informational. The registry never checks values against it;
//! [`Value::matches_hint`] is provided for external type checkers.

use std::fmt;

use crate::key::RegistrationKey;

/// The value of a schema parameter.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
	/// No value.
	#[default]
	Null,
	/// Boolean value.
	Bool(bool),
	/// Integer value.
	Int(i64),
	/// Floating point value.
	Float(f64),
	/// String value.
	Str(String),
	/// Ordered list of values.
	List(Vec<Value>),
	/// Reference to another registered configuration.
	Key(RegistrationKey),
}

impl Value {
	pub fn is_null(&self) -> bool {
		matches!(self, Value::Null)
	}

	/// Returns the boolean value if this is a `Bool` variant.
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Value::Bool(v) => Some(*v),
			_ => None,
		}
	}

	/// Returns the integer value if this is an `Int` variant.
	pub fn as_int(&self) -> Option<i64> {
		match self {
			Value::Int(v) => Some(*v),
			_ => None,
		}
	}

	/// Returns the float value if this is a `Float` variant.
	pub fn as_float(&self) -> Option<f64> {
		match self {
			Value::Float(v) => Some(*v),
			_ => None,
		}
	}

	/// Returns the string value if this is a `Str` variant.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::Str(v) => Some(v),
			_ => None,
		}
	}

	/// Returns the list items if this is a `List` variant.
	pub fn as_list(&self) -> Option<&[Value]> {
		match self {
			Value::List(v) => Some(v),
			_ => None,
		}
	}

	/// Returns the referenced identity if this is a `Key` variant.
	pub fn as_key(&self) -> Option<&RegistrationKey> {
		match self {
			Value::Key(v) => Some(v),
			_ => None,
		}
	}

	/// Returns the type name of this value.
	pub fn type_name(&self) -> &'static str {
		match self {
			Value::Null => "null",
			Value::Bool(_) => "bool",
			Value::Int(_) => "int",
			Value::Float(_) => "float",
			Value::Str(_) => "string",
			Value::List(_) => "list",
			Value::Key(_) => "key",
		}
	}

	/// Returns true if this value is compatible with the given hint.
	///
	/// The registry never calls this; it exists for external checkers that
	/// enforce declared hints. `Null` satisfies every hint.
	pub fn matches_hint(&self, hint: TypeHint) -> bool {
		matches!(
			(self, hint),
			(_, TypeHint::Any)
				| (Value::Null, _)
				| (Value::Bool(_), TypeHint::Bool)
				| (Value::Int(_), TypeHint::Int)
				| (Value::Float(_), TypeHint::Float)
				| (Value::Str(_), TypeHint::Str)
				| (Value::List(_), TypeHint::List)
				| (Value::Key(_), TypeHint::Key)
		)
	}
}

/// Renders the value as it appears inside `param=value` tags.
impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Value::Null => f.write_str("none"),
			Value::Bool(v) => write!(f, "{v}"),
			Value::Int(v) => write!(f, "{v}"),
			Value::Float(v) => write!(f, "{v}"),
			Value::Str(v) => f.write_str(v),
			Value::List(items) => {
				f.write_str("[")?;
				for (i, item) in items.iter().enumerate() {
					if i > 0 {
						f.write_str(",")?;
					}
					write!(f, "{item}")?;
				}
				f.write_str("]")
			}
			Value::Key(key) => write!(f, "{key}"),
		}
	}
}

/// Declared expected type of a parameter. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeHint {
	#[default]
	Any,
	Bool,
	Int,
	Float,
	Str,
	List,
	Key,
}

impl From<bool> for Value {
	fn from(v: bool) -> Self {
		Value::Bool(v)
	}
}

impl From<i64> for Value {
	fn from(v: i64) -> Self {
		Value::Int(v)
	}
}

impl From<i32> for Value {
	fn from(v: i32) -> Self {
		Value::Int(i64::from(v))
	}
}

impl From<f64> for Value {
	fn from(v: f64) -> Self {
		Value::Float(v)
	}
}

impl From<String> for Value {
	fn from(v: String) -> Self {
		Value::Str(v)
	}
}

impl From<&str> for Value {
	fn from(v: &str) -> Self {
		Value::Str(v.to_string())
	}
}

impl From<RegistrationKey> for Value {
	fn from(v: RegistrationKey) -> Self {
		Value::Key(v)
	}
}

impl<T: Into<Value>> From<Vec<T>> for Value {
	fn from(v: Vec<T>) -> Self {
		Value::List(v.into_iter().map(Into::into).collect())
	}
}

impl<T: Into<Value>> From<Option<T>> for Value {
	fn from(v: Option<T>) -> Self {
		v.map_or(Value::Null, Into::into)
	}
}
