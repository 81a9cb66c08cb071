// vim: tw=80
//! What a loose mock returns when nothing was set up.

use std::{
    collections::{BTreeMap, HashMap},
    fmt,
    sync::Arc
};

use crate::{
    Result,
    value::{ValueType, Value}
};

/// How a loose mock fills in results nobody configured.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DefaultValue {
    /// Zero for value types, empty strings and collections for the rest
    Empty,
    /// Like `Empty`, but interfaces get nested mocks, so that chains like
    /// `a.B.C.D` work without any setup
    Mock,
}

/// A pluggable source of default values, consulted before the built-in
/// rules.  Returning `None` defers to those rules.
pub trait DefaultValueProvider: Send + Sync {
    fn provide(&self, ty: &ValueType) -> Option<Value>;
}

impl<F> DefaultValueProvider for F
    where F: Fn(&ValueType) -> Option<Value> + Send + Sync
{
    fn provide(&self, ty: &ValueType) -> Option<Value> {
        self(ty)
    }
}

/// The zero value of a type, as if nothing at all had been configured:
/// `Null` for anything that can hold it.
pub fn natural_zero(ty: &ValueType) -> Value {
    match ty {
        ValueType::Unit => Value::Unit,
        ValueType::Bool => Value::Bool(false),
        ValueType::Int => Value::Int(0),
        ValueType::Float => Value::Float(0.0),
        ValueType::Async(inner) => Value::Ready(Box::new(natural_zero(inner))),
        _ => Value::Null
    }
}

/// The `Empty` default: like [`natural_zero`], except that strings and
/// collections are empty rather than `Null`.
pub fn empty(ty: &ValueType) -> Value {
    match ty {
        ValueType::Str => Value::Str(String::new()),
        ValueType::List => Value::List(Vec::new()),
        ValueType::Map => Value::Map(BTreeMap::new()),
        ValueType::Async(inner) => Value::Ready(Box::new(empty(inner))),
        t => natural_zero(t)
    }
}

/// A mock's default-value configuration.
#[derive(Clone, Default)]
pub struct DefaultValues {
    overrides: HashMap<ValueType, Value>,
    provider: Option<Arc<dyn DefaultValueProvider>>,
    /// `None` until a strategy is explicitly chosen
    strategy: Option<DefaultValue>,
}

impl DefaultValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strategy(mut self, strategy: DefaultValue) -> Self {
        self.strategy = Some(strategy);
        self
    }

    pub fn with_provider(mut self, provider: Arc<dyn DefaultValueProvider>)
        -> Self
    {
        self.provider = Some(provider);
        self
    }

    /// Always answer `v` for results of type `ty`.
    pub fn with_override(mut self, ty: ValueType, v: Value) -> Self {
        self.overrides.insert(ty, v);
        self
    }

    pub fn strategy(&self) -> Option<DefaultValue> {
        self.strategy
    }

    /// Will interface-typed results be filled with nested mocks?
    pub fn is_recursive(&self) -> bool {
        self.strategy == Some(DefaultValue::Mock)
    }

    /// Produce the default for `ty`.
    ///
    /// Explicit overrides come first, then the provider.  Asynchronous types
    /// resolve to a completed wrapper around the default of their inner type.
    /// If no strategy was ever chosen, the natural zero applies.  Otherwise
    /// the strategy does, calling `nested` for interfaces under
    /// [`DefaultValue::Mock`].
    pub fn resolve(&self,
                   ty: &ValueType,
                   nested: &dyn Fn(&str) -> Result<Value>) -> Result<Value>
    {
        if let Some(v) = self.overrides.get(ty) {
            return Ok(v.clone());
        }
        if let Some(v) = self.provider.as_ref().and_then(|p| p.provide(ty)) {
            return Ok(v);
        }
        if let ValueType::Async(inner) = ty {
            return Ok(Value::Ready(Box::new(self.resolve(inner, nested)?)));
        }
        match (self.strategy, ty) {
            (None, t) => Ok(natural_zero(t)),
            (Some(DefaultValue::Mock), ValueType::Interface(name)) =>
                nested(name),
            (Some(_), t) => Ok(empty(t)),
        }
    }
}

impl fmt::Debug for DefaultValues {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("DefaultValues")
            .field("overrides", &self.overrides)
            .field("provider", &self.provider.is_some())
            .field("strategy", &self.strategy)
            .finish()
    }
}

#[cfg(test)]
mod t {
    use super::*;

    fn no_nesting(_: &str) -> Result<Value> {
        panic!("should not have been asked for a nested mock");
    }

    #[test]
    fn natural_zero_without_strategy() {
        let d = DefaultValues::new();
        assert_eq!(Value::Null, d.resolve(&ValueType::Str, &no_nesting).unwrap());
        assert_eq!(Value::Int(0), d.resolve(&ValueType::Int, &no_nesting).unwrap());
        assert_eq!(Value::Null,
            d.resolve(&ValueType::interface("IFoo"), &no_nesting).unwrap());
    }

    #[test]
    fn empty_strategy() {
        let d = DefaultValues::new().with_strategy(DefaultValue::Empty);
        assert_eq!(Value::from(""), d.resolve(&ValueType::Str, &no_nesting).unwrap());
        assert_eq!(Value::List(vec![]),
            d.resolve(&ValueType::List, &no_nesting).unwrap());
        assert_eq!(Value::Null,
            d.resolve(&ValueType::interface("IFoo"), &no_nesting).unwrap());
    }

    #[test]
    fn async_wraps_inner_default() {
        let d = DefaultValues::new().with_strategy(DefaultValue::Empty);
        let ty = ValueType::future(ValueType::Str);
        assert_eq!(Value::ready(""), d.resolve(&ty, &no_nesting).unwrap());
    }

    #[test]
    fn override_beats_provider() {
        let d = DefaultValues::new()
            .with_provider(Arc::new(|_: &ValueType| Some(Value::from(1))))
            .with_override(ValueType::Int, Value::from(7));
        assert_eq!(Value::Int(7), d.resolve(&ValueType::Int, &no_nesting).unwrap());
        assert_eq!(Value::Int(1), d.resolve(&ValueType::Str, &no_nesting).unwrap());
    }

    #[test]
    fn provider_may_defer() {
        let d = DefaultValues::new()
            .with_provider(Arc::new(|t: &ValueType| {
                (*t == ValueType::Bool).then_some(Value::Bool(true))
            }));
        assert_eq!(Value::Bool(true),
            d.resolve(&ValueType::Bool, &no_nesting).unwrap());
        assert_eq!(Value::Null, d.resolve(&ValueType::Str, &no_nesting).unwrap());
    }

    #[test]
    fn mock_strategy_nests_interfaces() {
        let d = DefaultValues::new().with_strategy(DefaultValue::Mock);
        let v = d.resolve(&ValueType::interface("IFoo"),
                          &|name| Ok(Value::from(name))).unwrap();
        assert_eq!(Value::from("IFoo"), v);
        assert_eq!(Value::Int(0), d.resolve(&ValueType::Int, &no_nesting).unwrap());
    }
}
