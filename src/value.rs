// Dynamic view over field values

use crate::traits::Validate;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// Kind of a [`Value`], used in error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Absent,
    Bool,
    Int,
    Uint,
    Float,
    String,
    Struct,
    Seq,
    Map,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Absent => "absent",
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Uint => "uint",
            Kind::Float => "float",
            Kind::String => "string",
            Kind::Struct => "struct",
            Kind::Seq => "sequence",
            Kind::Map => "map",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Borrowed, dynamically typed view of a field value.
///
/// Rules never see concrete Rust types; every field is projected into a
/// `Value` through [`FieldValue`]. Containers are projected eagerly, one
/// level at a time, so nested structs stay borrowed behind `Struct`.
#[derive(Clone)]
pub enum Value<'a> {
    /// An optional holding nothing
    Absent,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Str(&'a str),
    Struct(&'a dyn Validate),
    Seq(Vec<Value<'a>>),
    Map(Vec<(Value<'a>, Value<'a>)>),
}

impl<'a> Value<'a> {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Absent => Kind::Absent,
            Value::Bool(_) => Kind::Bool,
            Value::Int(_) => Kind::Int,
            Value::Uint(_) => Kind::Uint,
            Value::Float(_) => Kind::Float,
            Value::Str(_) => Kind::String,
            Value::Struct(_) => Kind::Struct,
            Value::Seq(_) => Kind::Seq,
            Value::Map(_) => Kind::Map,
        }
    }

    /// Whether this is the zero value of its kind.
    ///
    /// Structs are never zero; an absent optional always is.
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Absent => true,
            Value::Bool(b) => !b,
            Value::Int(n) => *n == 0,
            Value::Uint(n) => *n == 0,
            Value::Float(n) => *n == 0.0,
            Value::Str(s) => s.is_empty(),
            Value::Struct(_) => false,
            Value::Seq(items) => items.is_empty(),
            Value::Map(entries) => entries.is_empty(),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Uint(_) | Value::Float(_))
    }

    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Value::Str(s) => Some(*s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Uint(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Length in characters for strings, element count for containers.
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::Str(s) => Some(s.chars().count()),
            Value::Seq(items) => Some(items.len()),
            Value::Map(entries) => Some(entries.len()),
            _ => None,
        }
    }

    /// Numeric measure used by the bound rules: value for numbers, length
    /// otherwise.
    pub fn measure(&self) -> Option<f64> {
        self.as_f64().or_else(|| self.len().map(|n| n as f64))
    }

    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;

        match self {
            Value::Absent => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Int(n) => Json::from(*n),
            Value::Uint(n) => Json::from(*n),
            Value::Float(n) => serde_json::Number::from_f64(*n)
                .map(Json::Number)
                .unwrap_or(Json::Null),
            Value::Str(s) => Json::String((*s).to_string()),
            Value::Struct(inner) => {
                let object = inner
                    .fields()
                    .iter()
                    .enumerate()
                    .map(|(index, field)| (field.name.to_string(), inner.field(index).to_json()))
                    .collect();
                Json::Object(object)
            }
            Value::Seq(items) => Json::Array(items.iter().map(Value::to_json).collect()),
            Value::Map(entries) => Json::Object(
                entries
                    .iter()
                    .map(|(key, value)| (key.to_string(), value.to_json()))
                    .collect(),
            ),
        }
    }
}

impl PartialEq for Value<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Absent, Value::Absent) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Uint(a), Value::Uint(b)) => a == b,
            (Value::Int(a), Value::Uint(b)) | (Value::Uint(b), Value::Int(a)) => {
                u64::try_from(*a).is_ok_and(|a| a == *b)
            }
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Seq(a), Value::Seq(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Struct(a), Value::Struct(b)) => {
                std::ptr::addr_eq(*a as *const dyn Validate, *b as *const dyn Validate)
            }
            _ => false,
        }
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Absent => f.write_str("Absent"),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Int(n) => f.debug_tuple("Int").field(n).finish(),
            Value::Uint(n) => f.debug_tuple("Uint").field(n).finish(),
            Value::Float(n) => f.debug_tuple("Float").field(n).finish(),
            Value::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Value::Struct(inner) => f.debug_tuple("Struct").field(&inner.type_name()).finish(),
            Value::Seq(items) => f.debug_list().entries(items).finish(),
            Value::Map(entries) => f
                .debug_map()
                .entries(entries.iter().map(|(k, v)| (k, v)))
                .finish(),
        }
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Absent => f.write_str("<absent>"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Uint(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Str(s) => f.write_str(s),
            Value::Struct(inner) => f.write_str(inner.type_name()),
            Value::Seq(_) | Value::Map(_) => write!(f, "{}", self.to_json()),
        }
    }
}

/// Projection of a Rust value into a [`Value`].
pub trait FieldValue {
    fn field_value(&self) -> Value<'_>;
}

macro_rules! impl_field_value {
    ($variant:ident as $target:ty: $($ty:ty),+) => {
        $(
            impl FieldValue for $ty {
                fn field_value(&self) -> Value<'_> {
                    Value::$variant(*self as $target)
                }
            }
        )+
    };
}

impl_field_value!(Int as i64: i8, i16, i32, i64, isize);
impl_field_value!(Uint as u64: u8, u16, u32, u64, usize);
impl_field_value!(Float as f64: f32, f64);

impl FieldValue for bool {
    fn field_value(&self) -> Value<'_> {
        Value::Bool(*self)
    }
}

impl FieldValue for str {
    fn field_value(&self) -> Value<'_> {
        Value::Str(self)
    }
}

impl FieldValue for String {
    fn field_value(&self) -> Value<'_> {
        Value::Str(self.as_str())
    }
}

impl<T: FieldValue + ?Sized> FieldValue for &T {
    fn field_value(&self) -> Value<'_> {
        (**self).field_value()
    }
}

impl<T: FieldValue + ?Sized> FieldValue for Box<T> {
    fn field_value(&self) -> Value<'_> {
        (**self).field_value()
    }
}

impl<T: FieldValue + ?Sized> FieldValue for Arc<T> {
    fn field_value(&self) -> Value<'_> {
        (**self).field_value()
    }
}

impl<T: FieldValue + ?Sized> FieldValue for Rc<T> {
    fn field_value(&self) -> Value<'_> {
        (**self).field_value()
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    fn field_value(&self) -> Value<'_> {
        match self {
            Some(inner) => inner.field_value(),
            None => Value::Absent,
        }
    }
}

impl<T: FieldValue> FieldValue for [T] {
    fn field_value(&self) -> Value<'_> {
        Value::Seq(self.iter().map(FieldValue::field_value).collect())
    }
}

impl<T: FieldValue, const N: usize> FieldValue for [T; N] {
    fn field_value(&self) -> Value<'_> {
        self.as_slice().field_value()
    }
}

impl<T: FieldValue> FieldValue for Vec<T> {
    fn field_value(&self) -> Value<'_> {
        self.as_slice().field_value()
    }
}

impl<K: FieldValue, V: FieldValue, S> FieldValue for HashMap<K, V, S> {
    fn field_value(&self) -> Value<'_> {
        Value::Map(
            self.iter()
                .map(|(k, v)| (k.field_value(), v.field_value()))
                .collect(),
        )
    }
}

impl<K: FieldValue, V: FieldValue> FieldValue for BTreeMap<K, V> {
    fn field_value(&self) -> Value<'_> {
        Value::Map(
            self.iter()
                .map(|(k, v)| (k.field_value(), v.field_value()))
                .collect(),
        )
    }
}
