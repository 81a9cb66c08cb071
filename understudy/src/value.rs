// vim: tw=80
//! The dynamic argument and result model.
//!
//! Understudy never sees the host program's static types.  Whatever binding
//! layer sits in front of it converts each argument into a [`Value`], and
//! describes each member's result with a [`ResultKind`].

use downcast::*;
use std::{
    collections::BTreeMap,
    fmt,
    sync::Arc
};

use crate::mock::Mock;

/// A user-defined value that can travel through a mock as an argument or a
/// result.
///
/// Implemented automatically for every `'static` type that is `PartialEq`,
/// `Debug`, `Send` and `Sync`.  Other types may implement it by hand.
pub trait AnyValue: Any + fmt::Debug + Send + Sync {
    /// Equality against another, possibly differently-typed, value.
    fn dyn_eq(&self, other: &dyn AnyValue) -> bool;
}
downcast!(dyn AnyValue);

impl<T> AnyValue for T
    where T: PartialEq + fmt::Debug + Send + Sync + 'static
{
    fn dyn_eq(&self, other: &dyn AnyValue) -> bool {
        other.downcast_ref::<T>().map_or(false, |o| self == o)
    }
}

/// A reference-counted [`AnyValue`], tagged with a type name that
/// [`ValueType::Object`] and [`ValueType::Interface`] match against.
#[derive(Clone)]
pub struct Object {
    type_name: Arc<str>,
    inner: Arc<dyn AnyValue>,
}

impl Object {
    /// Wrap `v`, naming it after its Rust type (without the module path).
    pub fn new<T: AnyValue>(v: T) -> Self {
        let full = std::any::type_name::<T>();
        let short = full.rsplit("::").next().unwrap_or(full);
        Object::named(short, v)
    }

    pub fn named<T: AnyValue>(type_name: &str, v: T) -> Self {
        Object {
            type_name: Arc::from(type_name),
            inner: Arc::new(v)
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn downcast_ref<T: AnyValue>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>().ok()
    }

    pub fn ptr_eq(&self, other: &Object) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(&*self.inner, f)
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Object) -> bool {
        self.ptr_eq(other) ||
            (self.type_name == other.type_name &&
             self.inner.dyn_eq(&*other.inner))
    }
}

/// One argument or result crossing the mock boundary.
#[derive(Clone, Debug, Default)]
pub enum Value {
    /// The absent reference
    #[default]
    Null,
    /// The result of a member that produces nothing
    Unit,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
    Object(Object),
    /// A substitute, usually a nested mock.  Compared by identity.
    Mock(Mock),
    /// An already-completed asynchronous result
    Ready(Box<Value>),
}

impl Value {
    pub fn object<T: AnyValue>(v: T) -> Self {
        Value::Object(Object::new(v))
    }

    pub fn ready<V: Into<Value>>(v: V) -> Self {
        Value::Ready(Box::new(v.into()))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(x) => Some(*x),
            _ => None
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None
        }
    }

    pub fn as_mock(&self) -> Option<&Mock> {
        match self {
            Value::Mock(m) => Some(m),
            _ => None
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None
        }
    }

    /// Unwrap an already-completed asynchronous result.
    pub fn into_ready(self) -> Option<Value> {
        match self {
            Value::Ready(v) => Some(*v),
            _ => None
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Unit, Value::Unit) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Mock(a), Value::Mock(b)) => a.ptr_eq(b),
            (Value::Ready(a), Value::Ready(b)) => a == b,
            _ => false
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Unit => f.write_str("()"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::List(l) => {
                f.write_str("[")?;
                for (i, v) in l.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                f.write_str("]")
            },
            Value::Map(m) => {
                f.write_str("{")?;
                for (i, (k, v)) in m.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{:?}: {}", k, v)?;
                }
                f.write_str("}")
            },
            Value::Object(o) => write!(f, "{:?}", o),
            Value::Mock(m) => write!(f, "Mock<{}>", m.name()),
            Value::Ready(v) => write!(f, "Ready({})", v),
        }
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Unit
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! from_int {
    ($($t:ty)*) => {
        $(
            impl From<$t> for Value {
                fn from(i: $t) -> Self {
                    Value::Int(i64::from(i))
                }
            }
        )*
    }
}
from_int!{i8 i16 i32 i64 u8 u16 u32}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl<V: Into<Value>> From<Vec<V>> for Value {
    fn from(v: Vec<V>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

impl<V: Into<Value>> From<Option<V>> for Value {
    fn from(o: Option<V>) -> Self {
        o.map_or(Value::Null, Into::into)
    }
}

impl From<Mock> for Value {
    fn from(m: Mock) -> Self {
        Value::Mock(m)
    }
}

impl From<Object> for Value {
    fn from(o: Object) -> Self {
        Value::Object(o)
    }
}

/// The declared type of a parameter or a result.
#[derive(Clone, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum ValueType {
    /// Accepts everything, including `Null`
    Any,
    Unit,
    Bool,
    Int,
    Float,
    Str,
    List,
    Map,
    /// A concrete user type, by [`Object::type_name`]
    Object(String),
    /// An abstract type that can be substituted by a mock
    Interface(String),
    /// An asynchronous wrapper of the inner type
    Async(Box<ValueType>),
    /// The inner type, or `Null`
    Nullable(Box<ValueType>),
}

impl ValueType {
    pub fn interface(name: &str) -> Self {
        ValueType::Interface(name.to_owned())
    }

    pub fn object(name: &str) -> Self {
        ValueType::Object(name.to_owned())
    }

    pub fn future(inner: ValueType) -> Self {
        ValueType::Async(Box::new(inner))
    }

    pub fn nullable(inner: ValueType) -> Self {
        ValueType::Nullable(Box::new(inner))
    }

    /// Reference-like types admit `Null`; value types never do.
    pub fn is_reference(&self) -> bool {
        !matches!(self,
            ValueType::Unit | ValueType::Bool | ValueType::Int |
            ValueType::Float | ValueType::Async(_))
    }

    /// Is `v`'s runtime type assignable to this type?
    pub fn accepts(&self, v: &Value) -> bool {
        match (self, v) {
            (ValueType::Any, _) => true,
            (t, Value::Null) => t.is_reference(),
            (ValueType::Unit, Value::Unit) => true,
            (ValueType::Bool, Value::Bool(_)) => true,
            (ValueType::Int, Value::Int(_)) => true,
            (ValueType::Float, Value::Float(_)) => true,
            (ValueType::Str, Value::Str(_)) => true,
            (ValueType::List, Value::List(_)) => true,
            (ValueType::Map, Value::Map(_)) => true,
            (ValueType::Object(n), Value::Object(o)) =>
                o.type_name() == n.as_str(),
            (ValueType::Interface(n), Value::Object(o)) =>
                o.type_name() == n.as_str(),
            (ValueType::Interface(n), Value::Mock(m)) =>
                m.interface_name() == n.as_str(),
            (ValueType::Async(t), Value::Ready(inner)) => t.accepts(inner),
            (ValueType::Nullable(t), v) => t.accepts(v),
            _ => false
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ValueType::Any => f.write_str("any"),
            ValueType::Unit => f.write_str("()"),
            ValueType::Bool => f.write_str("bool"),
            ValueType::Int => f.write_str("int"),
            ValueType::Float => f.write_str("float"),
            ValueType::Str => f.write_str("string"),
            ValueType::List => f.write_str("list"),
            ValueType::Map => f.write_str("map"),
            ValueType::Object(n) | ValueType::Interface(n) => f.write_str(n),
            ValueType::Async(t) => write!(f, "async {}", t),
            ValueType::Nullable(t) => write!(f, "{}?", t),
        }
    }
}

/// What a dispatched member produces.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ResultKind {
    /// The member is void-equivalent
    None,
    Value(ValueType),
}

impl ResultKind {
    pub fn value_type(&self) -> Option<&ValueType> {
        match self {
            ResultKind::None => None,
            ResultKind::Value(t) => Some(t),
        }
    }
}

impl From<ValueType> for ResultKind {
    fn from(t: ValueType) -> Self {
        ResultKind::Value(t)
    }
}

/// Render an argument list the way failure messages show it.
pub(crate) fn display_args(args: &[Value]) -> String {
    args.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod t {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Point {
        x: i32,
        y: i32
    }

    #[test]
    fn objects_compare_structurally() {
        let a = Value::object(Point{x: 1, y: 2});
        let b = Value::object(Point{x: 1, y: 2});
        let c = Value::object(Point{x: 1, y: 3});
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn objects_of_different_types_differ() {
        #[derive(Debug, PartialEq)]
        struct Other {
            x: i32,
            y: i32
        }
        let a = Value::object(Point{x: 1, y: 2});
        let b = Value::object(Other{x: 1, y: 2});
        assert_ne!(a, b);
    }

    #[test]
    fn object_short_type_name() {
        let o = Object::new(Point{x: 0, y: 0});
        assert_eq!("Point", o.type_name());
        assert_eq!(Some(&Point{x: 0, y: 0}), o.downcast_ref::<Point>());
    }

    #[test]
    fn null_is_assignable_to_reference_types_only() {
        assert!(ValueType::Str.accepts(&Value::Null));
        assert!(ValueType::interface("Foo").accepts(&Value::Null));
        assert!(ValueType::nullable(ValueType::Int).accepts(&Value::Null));
        assert!(!ValueType::Int.accepts(&Value::Null));
        assert!(!ValueType::Bool.accepts(&Value::Null));
    }

    #[test]
    fn display_args() {
        let args = [Value::from(1), Value::from("x"), Value::Null];
        assert_eq!("1, \"x\", null", super::display_args(&args));
    }
}
