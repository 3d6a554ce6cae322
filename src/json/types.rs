//! JSON value types.
//!
//! [`Value`] is a closed tagged union. Objects are stored in an
//! [`OrderedMap`], so member order is the order in which members were parsed
//! or inserted, and duplicate keys survive unless the caller avoids them.
//!
//! Variants are chosen explicitly through the named constructors or the
//! `From` conversions below; there is no implicit inference beyond them.

use std::fmt;

use serde::ser::{Serialize, Serializer};

use super::serialize;
use crate::map::OrderedMap;

/// JSON object: members in insertion order.
pub type Object = OrderedMap<String, Value>;

/// JSON array.
pub type Array = Vec<Value>;

/// The active variant of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Text
    String,
    /// 64-bit float
    Number,
    /// `true` / `false`
    Bool,
    /// `null`
    Null,
    /// Ordered key/value members
    Object,
    /// Ordered elements
    Array,
}

impl Kind {
    /// The type name used in messages.
    pub fn name(self) -> &'static str {
        match self {
            Kind::String => "string",
            Kind::Number => "number",
            Kind::Bool => "boolean",
            Kind::Null => "null",
            Kind::Object => "object",
            Kind::Array => "array",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A JSON value.
///
/// Values are owned by whatever holds them: an array, an object member or a
/// standalone root. Cloning deep-copies the whole tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// JSON string, stored unescaped
    String(String),
    /// JSON number
    Number(f64),
    /// JSON boolean
    Bool(bool),
    /// JSON null literal
    #[default]
    Null,
    /// JSON object
    Object(Object),
    /// JSON array
    Array(Array),
}

impl Value {
    /// A string value.
    pub fn from_string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    /// A number value.
    pub fn from_number(n: f64) -> Self {
        Value::Number(n)
    }

    /// A boolean value.
    pub fn from_bool(b: bool) -> Self {
        Value::Bool(b)
    }

    /// The null value.
    pub fn null() -> Self {
        Value::Null
    }

    /// An object value.
    pub fn from_object(object: Object) -> Self {
        Value::Object(object)
    }

    /// An array value.
    pub fn from_array(array: Array) -> Self {
        Value::Array(array)
    }

    /// The active variant.
    pub fn kind(&self) -> Kind {
        match self {
            Value::String(_) => Kind::String,
            Value::Number(_) => Kind::Number,
            Value::Bool(_) => Kind::Bool,
            Value::Null => Kind::Null,
            Value::Object(_) => Kind::Object,
            Value::Array(_) => Kind::Array,
        }
    }

    /// Returns the type name as a string for error messages.
    pub fn type_name(&self) -> &'static str {
        self.kind().name()
    }

    /// Returns true if this is a string value.
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Returns true if this is a number value.
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    /// Returns true if this is a boolean value.
    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    /// Returns true if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns true if this is an object value.
    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Returns true if this is an array value.
    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Returns a reference to the string if this is a String, None otherwise.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the number if this is a Number, None otherwise.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the boolean value if this is a Bool, None otherwise.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns a reference to the object if this is an Object, None otherwise.
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Mutable counterpart of [`Value::as_object`].
    pub fn as_object_mut(&mut self) -> Option<&mut Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Returns a reference to the array if this is an Array, None otherwise.
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Mutable counterpart of [`Value::as_array`].
    pub fn as_array_mut(&mut self) -> Option<&mut Array> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// First member stored under `key`, if this is an object.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object()?.get(key)
    }

    /// Element at `index`, if this is an array.
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.as_array()?.get(index)
    }
}

/// Pretty-printed JSON, same as [`serialize::to_string`].
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&serialize::to_string(self))
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::String(s) => serializer.serialize_str(s),
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Null => serializer.serialize_unit(),
            Value::Object(o) => o.serialize(serializer),
            Value::Array(a) => a.serialize(serializer),
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::String(s.clone())
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::String(c.to_string())
    }
}

macro_rules! impl_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Value::Number(n as f64)
                }
            }
        )*
    };
}

impl_from_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Value::Object(object)
    }
}

impl From<Array> for Value {
    fn from(array: Array) -> Self {
        Value::Array(array)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(option: Option<T>) -> Self {
        option.map_or(Value::Null, Into::into)
    }
}
