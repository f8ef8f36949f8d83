use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::renderer::{render, render_object, repr_flat, ReprOptions};

/// Shared, mutable container storage. Sharing is what lets a list or dict
/// end up containing itself.
pub type Shared<T> = Rc<RefCell<T>>;

/// A renderable value.
///
/// Containers are reference counted so that cloning a `Value` clones the
/// handle, not the contents. Two handles to the same container have the same
/// identity, which is what the cycle guard tracks.
#[derive(Clone)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Shared<Vec<Value>>),
    Tuple(Rc<[Value]>),
    Dict(Shared<Vec<(Value, Value)>>),
    Object(Rc<dyn Describe>),
    /// A preformatted default representation, e.g. `<function f>`.
    Opaque(String),
}

impl Value {
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Rc::new(RefCell::new(items)))
    }

    pub fn tuple(items: Vec<Value>) -> Self {
        Value::Tuple(items.into())
    }

    pub fn dict<K, V, I>(entries: I) -> Self
    where
        K: Into<Value>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let dict = Value::Dict(Rc::new(RefCell::new(Vec::new())));
        for (key, value) in entries {
            dict.insert(key, value);
        }
        dict
    }

    pub fn object<T: Describe + 'static>(object: T) -> Self {
        Value::Object(Rc::new(object))
    }

    pub fn opaque(repr: impl Into<String>) -> Self {
        Value::Opaque(repr.into())
    }

    /// Appends to a list. Returns `false` if this value is not a list.
    pub fn push(&self, item: impl Into<Value>) -> bool {
        match self {
            Value::List(items) => {
                items.borrow_mut().push(item.into());
                true
            }
            _ => false,
        }
    }

    /// Inserts into a dict, replacing the value of an equal key.
    /// Returns `false` if this value is not a dict.
    pub fn insert(&self, key: impl Into<Value>, value: impl Into<Value>) -> bool {
        let Value::Dict(entries) = self else {
            return false;
        };
        let key = key.into();
        let value = value.into();
        let mut entries = entries.borrow_mut();
        match entries.iter_mut().find(|(existing, _)| existing.same_key(&key)) {
            Some(entry) => entry.1 = value,
            None => entries.push((key, value)),
        }
        true
    }

    /// Number of direct children for containers and objects.
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::List(items) => Some(items.borrow().len()),
            Value::Tuple(items) => Some(items.len()),
            Value::Dict(entries) => Some(entries.borrow().len()),
            Value::Object(object) => Some(object.params().len()),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    pub fn type_name(&self) -> &str {
        match self {
            Value::None => "NoneType",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Tuple(_) => "tuple",
            Value::Dict(_) => "dict",
            Value::Object(object) => object.type_name(),
            Value::Opaque(_) => "object",
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Value::None | Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::Str(_)
        )
    }

    /// Address of the shared allocation behind a container or object.
    pub fn identity(&self) -> Option<usize> {
        match self {
            Value::List(items) => Some(Rc::as_ptr(items) as *const () as usize),
            Value::Tuple(items) => Some(Rc::as_ptr(items) as *const () as usize),
            Value::Dict(entries) => Some(Rc::as_ptr(entries) as *const () as usize),
            Value::Object(object) => Some(Rc::as_ptr(object) as *const () as usize),
            _ => None,
        }
    }

    /// Key equality for dict insertion: scalars and tuples by value,
    /// everything else by identity. Equal numbers are the same key whatever
    /// their kind, so `1`, `1.0` and `True` collide.
    pub fn same_key(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Bool(a), Value::Int(b)) | (Value::Int(b), Value::Bool(a)) => {
                i64::from(*a) == *b
            }
            (Value::Bool(a), Value::Float(b)) | (Value::Float(b), Value::Bool(a)) => {
                int_equals_float(i64::from(*a), *b)
            }
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => {
                int_equals_float(*a, *b)
            }
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Tuple(a), Value::Tuple(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.same_key(y))
            }
            (Value::Opaque(a), Value::Opaque(b)) => a == b,
            _ => match (self.identity(), other.identity()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}

/// Exact comparison; no rounding of large ints through `f64`.
fn int_equals_float(int: i64, float: f64) -> bool {
    float.fract() == 0.0
        && float >= i64::MIN as f64
        && float < -(i64::MIN as f64)
        && float as i64 == int
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value.into())
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Int(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::list(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::None, Into::into)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&repr_flat(self))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self, &ReprOptions::default()))
    }
}

/// Anything that renders constructor-style as `TypeName(key=value, ...)`.
pub trait Describe {
    fn type_name(&self) -> &str;

    /// Current keyword parameters, keyed by name.
    fn params(&self) -> BTreeMap<String, Value>;

    fn repr(&self) -> String
    where
        Self: Sized,
    {
        self.repr_with(&ReprOptions::default())
    }

    fn repr_with(&self, options: &ReprOptions) -> String
    where
        Self: Sized,
    {
        render_object(self, options)
    }
}

/// A named object built at runtime, e.g. from a JSON document.
#[derive(Clone)]
pub struct Record {
    name: String,
    params: BTreeMap<String, Value>,
}

impl Record {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: BTreeMap::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.params.insert(key.into(), value.into());
    }
}

impl Describe for Record {
    fn type_name(&self) -> &str {
        &self.name
    }

    fn params(&self) -> BTreeMap<String, Value> {
        self.params.clone()
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.repr())
    }
}
