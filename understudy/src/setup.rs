// vim: tw=80
//! Setups: registered behavior rules, and the resolver that turns a matched
//! setup into an outcome.

use fragile::Fragile;
use std::{
    collections::BTreeMap,
    fmt,
    sync::{
        Arc,
        Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering}
    }
};
use tracing::trace;

use crate::{
    Fault,
    Result,
    lock,
    matcher::{self, ArgumentSpec},
    sequence::{SeqHandle, Sequence},
    times::Times,
    value::{ResultKind, Value}
};

type ReturnFn = Arc<Mutex<dyn FnMut(&[Value]) -> Value + Send>>;
type CallbackFn = Arc<Mutex<dyn FnMut(&[Value]) + Send>>;
type OutputCallbackFn = Arc<Mutex<dyn FnMut(&mut [Value]) + Send>>;

/// How a matched setup produces its result.
#[derive(Default)]
pub enum ReturnStrategy {
    /// Nothing configured: the mock's default value for the result type
    #[default]
    None,
    Static(Value),
    /// Evaluated afresh on every call
    Computed(ReturnFn),
    /// Each call takes the next value; the last one repeats forever
    Sequential {
        values: Vec<Value>,
        cursor: usize,
    },
    /// Ask the caller to run the real implementation
    CallBase,
}

impl fmt::Debug for ReturnStrategy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ReturnStrategy::None => f.write_str("None"),
            ReturnStrategy::Static(v) => write!(f, "Static({})", v),
            ReturnStrategy::Computed(_) => f.write_str("Computed"),
            ReturnStrategy::Sequential{values, cursor} =>
                write!(f, "Sequential({:?}, {})", values, cursor),
            ReturnStrategy::CallBase => f.write_str("CallBase"),
        }
    }
}

/// The value written back into one output parameter.
#[derive(Clone)]
pub enum OutputSpec {
    Static(Value),
    /// Computed from the call's arguments
    Computed(ReturnFn),
}

impl OutputSpec {
    fn eval(&self, args: &[Value]) -> Value {
        match self {
            OutputSpec::Static(v) => v.clone(),
            OutputSpec::Computed(f) => (&mut *lock(f))(args),
        }
    }
}

/// A side-channel value produced by a matched setup: the binding layer must
/// store `value` into the caller's output parameter number `index`.
#[derive(Clone, Debug, PartialEq)]
pub struct OutputAssignment {
    pub index: usize,
    pub value: Value,
}

#[derive(Default)]
struct SetupConfig {
    returns: ReturnStrategy,
    thrown: Option<Fault>,
    callback: Option<CallbackFn>,
    outputs: BTreeMap<usize, OutputSpec>,
    output_callback: Option<OutputCallbackFn>,
    seq_handle: Option<SeqHandle>,
    /// Present iff the setup is verifiable
    expected: Option<Times>,
}

/// What a matched setup resolved to, before the mock turns it into a
/// [`DispatchOutcome`](crate::DispatchOutcome).
#[derive(Debug)]
pub(crate) enum Resolved {
    Value(Value),
    /// Nothing configured; the mock must supply a default
    Default,
    NoValue,
    CallBase,
}

#[derive(Debug)]
pub(crate) struct Resolution {
    pub resolved: Resolved,
    /// `Some` iff the setup has output-channel semantics
    pub outputs: Option<Vec<OutputAssignment>>,
}

/// One registered behavior rule.
pub struct Setup {
    signature: String,
    specs: Vec<ArgumentSpec>,
    config: Mutex<SetupConfig>,
    call_count: AtomicUsize,
    /// Set on first use.  Behavior can't be reconfigured afterwards.
    sealed: AtomicBool,
}

impl Setup {
    pub(crate) fn new(signature: &str, specs: Vec<ArgumentSpec>) -> Self {
        Setup {
            signature: signature.to_owned(),
            specs,
            config: Mutex::new(SetupConfig::default()),
            call_count: AtomicUsize::new(0),
            sealed: AtomicBool::new(false)
        }
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn argument_specs(&self) -> &[ArgumentSpec] {
        &self.specs
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    pub(crate) fn reset_call_count(&self) {
        self.call_count.store(0, Ordering::SeqCst);
    }

    pub fn is_verifiable(&self) -> bool {
        lock(&self.config).expected.is_some()
    }

    /// The call count this setup expects, if it is verifiable.
    pub fn expected_times(&self) -> Option<Times> {
        lock(&self.config).expected
    }

    /// Does this setup select a call of `signature` with `args`?
    pub fn matches(&self, signature: &str, args: &[Value]) -> Result<bool> {
        if signature != self.signature {
            return Ok(false);
        }
        matcher::matches_all(signature, &self.specs, args)
    }

    pub(crate) fn explain_mismatch(&self, args: &[Value]) -> Option<String> {
        matcher::explain_mismatch(&self.specs, args)
    }

    fn assert_unsealed(&self) {
        assert!(!self.sealed.load(Ordering::SeqCst),
            "Cannot reconfigure setup {} after it has been invoked", self);
    }

    fn configure<F>(&self, f: F)
        where F: FnOnce(&mut SetupConfig)
    {
        self.assert_unsealed();
        f(&mut lock(&self.config));
    }

    /// Produce the outcome of a call this setup matched.
    pub(crate) fn resolve(&self, args: &[Value], kind: &ResultKind)
        -> Result<Resolution>
    {
        self.sealed.store(true, Ordering::SeqCst);
        let (seq_handle, callback) = {
            let config = lock(&self.config);
            (config.seq_handle.clone(), config.callback.clone())
        };
        if let Some(handle) = seq_handle {
            handle.check_and_advance(&self.signature)?;
        }
        let n = self.call_count.fetch_add(1, Ordering::SeqCst) + 1;
        trace!(setup = %self, call_count = n, "setup matched");
        if let Some(cb) = callback {
            (&mut *lock(&cb))(args);
        }

        let (thrown, call_base, outputs, output_callback) = {
            let config = lock(&self.config);
            (config.thrown.clone(),
             matches!(config.returns, ReturnStrategy::CallBase),
             config.outputs.clone(),
             config.output_callback.clone())
        };
        if let Some(fault) = thrown {
            return Err(fault.into());
        }
        if call_base {
            return Ok(Resolution{resolved: Resolved::CallBase, outputs: None});
        }
        let outputs = if outputs.is_empty() && output_callback.is_none() {
            None
        } else {
            Some(self.assign_outputs(args, &outputs, output_callback))
        };

        let resolved = match kind {
            ResultKind::None => Resolved::NoValue,
            ResultKind::Value(_) => self.next_return(args)
        };
        Ok(Resolution{resolved, outputs})
    }

    fn assign_outputs(&self,
                      args: &[Value],
                      outputs: &BTreeMap<usize, OutputSpec>,
                      output_callback: Option<OutputCallbackFn>)
        -> Vec<OutputAssignment>
    {
        let mut assigned = BTreeMap::new();
        for (&index, spec) in outputs {
            assigned.insert(index, spec.eval(args));
        }
        if let Some(cb) = output_callback {
            let mut scratch = args.to_vec();
            for (&i, v) in &assigned {
                if let Some(slot) = scratch.get_mut(i) {
                    *slot = v.clone();
                }
            }
            (&mut *lock(&cb))(&mut scratch);
            for (i, v) in scratch.into_iter().enumerate() {
                let is_output = self.specs.get(i).map_or(false,
                    ArgumentSpec::is_output);
                if is_output || assigned.contains_key(&i) {
                    assigned.insert(i, v);
                }
            }
        }
        assigned.into_iter()
            .map(|(index, value)| OutputAssignment{index, value})
            .collect()
    }

    fn next_return(&self, args: &[Value]) -> Resolved {
        let computed = {
            let mut config = lock(&self.config);
            match &mut config.returns {
                ReturnStrategy::None => return Resolved::Default,
                ReturnStrategy::CallBase => return Resolved::CallBase,
                ReturnStrategy::Static(v) => return Resolved::Value(v.clone()),
                ReturnStrategy::Sequential{values, cursor} => {
                    let Some(v) = values.get(*cursor).cloned() else {
                        return Resolved::Default;
                    };
                    if *cursor + 1 < values.len() {
                        *cursor += 1;
                    }
                    return Resolved::Value(v);
                },
                ReturnStrategy::Computed(f) => f.clone(),
            }
        };
        // Outside the config lock, in case the closure reenters the mock
        let v = (&mut *lock(&computed))(args);
        Resolved::Value(v)
    }
}

impl fmt::Display for Setup {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}({})", self.signature,
               matcher::display_specs(&self.specs))
    }
}

impl fmt::Debug for Setup {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let config = lock(&self.config);
        f.debug_struct("Setup")
            .field("signature", &self.signature)
            .field("specs", &self.specs)
            .field("returns", &config.returns)
            .field("call_count", &self.call_count())
            .finish_non_exhaustive()
    }
}

/// Fluent configuration of a registered [`Setup`].
///
/// Returned by [`Mock::setup`](crate::Mock::setup).  Every method returns
/// `&Self`, so calls chain.  Behavior may only be configured until the setup
/// first fires; reconfiguring it afterwards panics.  Verification
/// expectations ([`times`](SetupHandle::times) and friends) may be changed at
/// any time.
///
/// # Examples
/// ```
/// # use understudy::*;
/// let mock = Mock::new("Calculator");
/// mock.setup("Add", vec![ArgumentSpec::eq(2), ArgumentSpec::any()])
///     .returns_with(|args| Value::from(2 + args[1].as_int().unwrap()))
///     .verifiable();
///
/// let r = mock.dispatch("Add", &[2.into(), 3.into()], ValueType::Int);
/// assert_eq!(DispatchOutcome::Returned(Value::Int(5)), r.unwrap());
/// mock.verify_all().unwrap();
/// ```
#[derive(Clone, Debug)]
pub struct SetupHandle(pub(crate) Arc<Setup>);

impl SetupHandle {
    pub fn setup(&self) -> &Setup {
        &self.0
    }

    /// Return a constant value from every matching call.
    pub fn returns<V: Into<Value>>(&self, v: V) -> &Self {
        let v = v.into();
        self.0.configure(|c| c.returns = ReturnStrategy::Static(v));
        self
    }

    /// Return an already-completed asynchronous result.
    pub fn returns_async<V: Into<Value>>(&self, v: V) -> &Self {
        self.returns(Value::ready(v))
    }

    /// Supply a closure that computes the return value from the call's
    /// arguments.  It runs on every matching call.
    pub fn returns_with<F>(&self, f: F) -> &Self
        where F: FnMut(&[Value]) -> Value + Send + 'static
    {
        let f: ReturnFn = Arc::new(Mutex::new(f));
        self.0.configure(|c| c.returns = ReturnStrategy::Computed(f));
        self
    }

    /// Single-threaded version of [`returns_with`](#method.returns_with).
    ///
    /// It is a runtime error to invoke the mock from a different thread than
    /// the one that called this method.
    pub fn returns_with_st<F>(&self, f: F) -> &Self
        where F: FnMut(&[Value]) -> Value + 'static
    {
        let mut fragile = Fragile::new(f);
        self.returns_with(move |args: &[Value]| (fragile.get_mut())(args))
    }

    /// Return each of `values` in turn.  Once they run out, keep returning
    /// the last one.
    pub fn returns_sequence<I, V>(&self, values: I) -> &Self
        where I: IntoIterator<Item=V>, V: Into<Value>
    {
        let values = values.into_iter().map(Into::into).collect();
        self.0.configure(|c|
            c.returns = ReturnStrategy::Sequential{values, cursor: 0}
        );
        self
    }

    /// Raise `e` from every matching call.
    pub fn throws<E>(&self, e: E) -> &Self
        where E: std::error::Error + Send + Sync + 'static
    {
        self.throws_fault(Fault::new(e))
    }

    pub fn throws_fault(&self, fault: Fault) -> &Self {
        self.0.configure(|c| c.thrown = Some(fault));
        self
    }

    /// Ask the caller to run the real implementation when this setup fires.
    pub fn call_base(&self) -> &Self {
        self.0.configure(|c| c.returns = ReturnStrategy::CallBase);
        self
    }

    /// Run `f` with the arguments of every matching call, before the result
    /// is produced.
    pub fn callback<F>(&self, f: F) -> &Self
        where F: FnMut(&[Value]) + Send + 'static
    {
        let f: CallbackFn = Arc::new(Mutex::new(f));
        self.0.configure(|c| c.callback = Some(f));
        self
    }

    /// Single-threaded version of [`callback`](#method.callback).
    pub fn callback_st<F>(&self, f: F) -> &Self
        where F: FnMut(&[Value]) + 'static
    {
        let mut fragile = Fragile::new(f);
        self.callback(move |args: &[Value]| (fragile.get_mut())(args))
    }

    /// Write `v` into output parameter `index` on every matching call.
    pub fn out_value<V: Into<Value>>(&self, index: usize, v: V) -> &Self {
        let spec = OutputSpec::Static(v.into());
        self.0.configure(|c| {
            c.outputs.insert(index, spec);
        });
        self
    }

    /// Compute output parameter `index` from the call's arguments.
    pub fn out_with<F>(&self, index: usize, f: F) -> &Self
        where F: FnMut(&[Value]) -> Value + Send + 'static
    {
        let spec = OutputSpec::Computed(Arc::new(Mutex::new(f)));
        self.0.configure(|c| {
            c.outputs.insert(index, spec);
        });
        self
    }

    /// Give `f` a mutable copy of the arguments.  Whatever it leaves in the
    /// output parameters is written back to the caller.
    pub fn out_callback<F>(&self, f: F) -> &Self
        where F: FnMut(&mut [Value]) + Send + 'static
    {
        let f: OutputCallbackFn = Arc::new(Mutex::new(f));
        self.0.configure(|c| c.output_callback = Some(f));
        self
    }

    /// Add this setup to a [`Sequence`].
    pub fn in_sequence(&self, seq: &Sequence) -> &Self {
        self.0.assert_unsealed();
        let handle = seq.next();
        self.0.configure(|c| c.seq_handle = Some(handle));
        self
    }

    /// Require this setup to be matched at least once by
    /// [`Mock::verify_all`](crate::Mock::verify_all).
    pub fn verifiable(&self) -> &Self {
        self.times(Times::at_least_once())
    }

    /// Require this setup to be matched a number of times that satisfies
    /// `times`.  Implies [`verifiable`](#method.verifiable).
    pub fn times<T: Into<Times>>(&self, times: T) -> &Self {
        let times = times.into();
        lock(&self.0.config).expected = Some(times);
        self
    }

    /// Shortcut for [`times(Times::once())`](#method.times).
    pub fn once(&self) -> &Self {
        self.times(Times::once())
    }

    /// Forbid this setup from ever being matched.
    pub fn never(&self) -> &Self {
        self.times(Times::never())
    }

    pub fn call_count(&self) -> usize {
        self.0.call_count()
    }
}

impl PartialEq for SetupHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}
