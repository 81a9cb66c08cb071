// vim: tw=80
//! Per-argument matchers.
//!
//! Every parameter of a setup, and of a verification, carries one
//! [`ArgumentSpec`].  A call is selected only if every spec matches its
//! argument.

use predicates::reflection::{Case, PredicateReflection, Product};
use predicates_tree::CaseTreeExt;
use regex::Regex;
use std::{
    any::Any,
    fmt,
    panic::{self, AssertUnwindSafe},
    sync::Arc
};
use tracing::warn;

use crate::{
    Error,
    Predicate,
    Result,
    predicate,
    value::{Value, ValueType}
};

/// How a single argument is matched.
#[derive(Clone)]
pub enum Matcher {
    /// Structural equality
    Exact(Value),
    /// An arbitrary [`Predicate`]
    Predicate(Arc<dyn Predicate<Value> + Send + Sync>),
    /// Any value assignable to the type, `Null` included where the type
    /// admits it
    AnyOfType(ValueType),
    /// Equal to at least one member of the set
    InSet(Vec<Value>),
    NotNull,
    /// A string matching the pattern
    MatchesRegex(Regex),
}

impl Matcher {
    /// Does `v` satisfy this matcher?
    ///
    /// A [`Matcher::Predicate`] that panics does not match.  The panic is
    /// logged, not propagated.
    pub fn matches(&self, v: &Value) -> bool {
        match self {
            Matcher::Exact(e) => e == v,
            Matcher::Predicate(p) => {
                let r = panic::catch_unwind(AssertUnwindSafe(|| p.eval(v)));
                r.unwrap_or_else(|payload| {
                    warn!(predicate = %p, argument = %v,
                        panic = %panic_message(&*payload),
                        "argument predicate panicked; treating it as a mismatch");
                    false
                })
            },
            Matcher::AnyOfType(t) => t.accepts(v),
            Matcher::InSet(set) => set.iter().any(|e| e == v),
            Matcher::NotNull => !v.is_null(),
            Matcher::MatchesRegex(re) =>
                v.as_str().map_or(false, |s| re.is_match(s)),
        }
    }

    /// Describe why `v` does not satisfy this matcher, if it doesn't.
    pub fn explain(&self, v: &Value) -> Option<String> {
        if self.matches(v) {
            return None;
        }
        let case = match self {
            Matcher::Predicate(p) => {
                panic::catch_unwind(AssertUnwindSafe(|| {
                    p.find_case(false, v).map(|c| c.tree().to_string())
                })).ok().flatten()
            },
            _ => self.find_case(false, v).map(|c| c.tree().to_string())
        };
        Some(case.unwrap_or_else(|| format!("{} was rejected by {}", v, self)))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Box<dyn Any>".to_owned()
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Matcher::Exact(v) => write!(f, "{}", v),
            Matcher::Predicate(p) => write!(f, "is({})", p),
            Matcher::AnyOfType(t) => write!(f, "any {}", t),
            Matcher::InSet(set) => {
                write!(f, "in [{}]", crate::value::display_args(set))
            },
            Matcher::NotNull => f.write_str("not null"),
            Matcher::MatchesRegex(re) => write!(f, "matches /{}/", re),
        }
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl PredicateReflection for Matcher {}

/// A `Matcher` is itself a predicate, so it composes with the combinators of
/// [`PredicateBooleanExt`](predicates::prelude::PredicateBooleanExt).
impl Predicate<Value> for Matcher {
    fn eval(&self, v: &Value) -> bool {
        self.matches(v)
    }

    fn find_case<'a>(&'a self, expected: bool, v: &Value)
        -> Option<Case<'a>>
    {
        let actual = self.eval(v);
        (expected == actual).then(|| {
            Case::new(Some(self as &dyn PredicateReflection), actual)
                .add_product(Product::new("var", v.to_string()))
        })
    }
}

/// The specification of one formal parameter.
///
/// # Examples
/// ```
/// # use understudy::*;
/// let specs = [
///     ArgumentSpec::eq("key"),
///     ArgumentSpec::is(|v| v.as_int().map_or(false, |i| i > 0)),
///     ArgumentSpec::any(),
/// ];
/// let args = [Value::from("key"), Value::from(5), Value::Null];
/// assert!(matches_all("store", &specs, &args).unwrap());
/// ```
#[derive(Clone, Debug)]
pub struct ArgumentSpec {
    matcher: Matcher,
    output: bool,
}

impl ArgumentSpec {
    pub fn new(matcher: Matcher) -> Self {
        ArgumentSpec{matcher, output: false}
    }

    /// Exactly this value
    pub fn eq<V: Into<Value>>(v: V) -> Self {
        ArgumentSpec::new(Matcher::Exact(v.into()))
    }

    /// Anything at all
    pub fn any() -> Self {
        ArgumentSpec::any_of(ValueType::Any)
    }

    /// Any value of the given type
    pub fn any_of(t: ValueType) -> Self {
        ArgumentSpec::new(Matcher::AnyOfType(t))
    }

    /// Any value for which `f` returns true
    pub fn is<F>(f: F) -> Self
        where F: Fn(&Value) -> bool + Send + Sync + 'static
    {
        ArgumentSpec::predicate(predicate::function(f))
    }

    /// Any value satisfying the predicate
    pub fn predicate<P>(p: P) -> Self
        where P: Predicate<Value> + Send + Sync + 'static
    {
        ArgumentSpec::new(Matcher::Predicate(Arc::new(p)))
    }

    /// Any value equal to a member of `values`
    pub fn in_set<I, V>(values: I) -> Self
        where I: IntoIterator<Item=V>, V: Into<Value>
    {
        let set = values.into_iter().map(Into::into).collect();
        ArgumentSpec::new(Matcher::InSet(set))
    }

    pub fn not_null() -> Self {
        ArgumentSpec::new(Matcher::NotNull)
    }

    /// Any string matching `pattern`
    pub fn regex(pattern: &str) -> Result<Self> {
        let re = Regex::new(pattern).map_err(Error::from)?;
        Ok(ArgumentSpec::new(Matcher::MatchesRegex(re)))
    }

    /// Mark this parameter as an output (`out`/`ref`) channel.  The matcher
    /// still gates selection; the value written back comes from the setup.
    pub fn output(mut self) -> Self {
        self.output = true;
        self
    }

    /// An output parameter whose incoming value is ignored.
    pub fn out() -> Self {
        ArgumentSpec::any().output()
    }

    pub fn is_output(&self) -> bool {
        self.output
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    pub fn matches(&self, v: &Value) -> bool {
        self.matcher.matches(v)
    }
}

impl fmt::Display for ArgumentSpec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.output {
            f.write_str("out ")?;
        }
        fmt::Display::fmt(&self.matcher, f)
    }
}

impl From<Matcher> for ArgumentSpec {
    fn from(m: Matcher) -> Self {
        ArgumentSpec::new(m)
    }
}

impl From<Value> for ArgumentSpec {
    fn from(v: Value) -> Self {
        ArgumentSpec::new(Matcher::Exact(v))
    }
}

/// Do all `specs` match their respective `args`?
///
/// A disagreement in length is a bug in whatever built the call, so it is an
/// error rather than a mismatch.
pub fn matches_all(signature: &str, specs: &[ArgumentSpec], args: &[Value])
    -> Result<bool>
{
    check_arity(signature, specs, args)?;
    Ok(specs.iter().zip(args).all(|(s, a)| s.matches(a)))
}

pub(crate) fn check_arity(signature: &str, specs: &[ArgumentSpec],
                          args: &[Value]) -> Result<()>
{
    if specs.len() != args.len() {
        return Err(Error::ArityMismatch {
            signature: signature.to_owned(),
            expected: specs.len(),
            actual: args.len()
        });
    }
    Ok(())
}

/// Explain the first argument that `specs` rejects.
pub(crate) fn explain_mismatch(specs: &[ArgumentSpec], args: &[Value])
    -> Option<String>
{
    specs.iter()
        .zip(args)
        .enumerate()
        .find_map(|(i, (s, a))| {
            s.matcher.explain(a).map(|why| format!("argument {}: {}", i, why))
        })
}

pub(crate) fn display_specs(specs: &[ArgumentSpec]) -> String {
    specs.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
