// vim: tw=80
//! The mock object, and the boundary contract that binding layers dispatch
//! through.

use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, Mutex, Weak}
};
use tracing::{debug, trace};

use crate::{
    Error,
    Result,
    chaos::{ChaosInjector, ChaosPolicy, ChaosStatistics},
    defaults::{DefaultValue, DefaultValueProvider, DefaultValues},
    events::{EventHandler, EventRegistry, Subscription},
    interface::{Catalog, Property},
    lock,
    matcher::ArgumentSpec,
    recorder::{Invocation, InvocationRecorder},
    registry::SetupRegistry,
    setup::{OutputAssignment, Resolution, Resolved, Setup, SetupHandle},
    times::Times,
    value::{self, ResultKind, Value, ValueType},
    verify
};

/// What a mock does with a call that no setup matches.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Behavior {
    /// Fail with [`Error::UnsetMember`]
    Strict,
    /// Return a default value
    #[default]
    Loose,
}

/// The synthesized members that back properties and events.  Their
/// signatures are the member name with a prefix: `get_Name`, `set_Name`,
/// `add_Changed` and `remove_Changed`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Accessor {
    Get,
    Set,
    Add,
    Remove,
}

impl Accessor {
    fn prefix(self) -> &'static str {
        match self {
            Accessor::Get => "get_",
            Accessor::Set => "set_",
            Accessor::Add => "add_",
            Accessor::Remove => "remove_",
        }
    }

    pub fn signature(self, name: &str) -> String {
        format!("{}{}", self.prefix(), name)
    }

    /// Split a signature into its accessor kind and member name.
    pub fn parse(signature: &str) -> Option<(Accessor, &str)> {
        [Accessor::Get, Accessor::Set, Accessor::Add, Accessor::Remove]
            .into_iter()
            .find_map(|a| {
                signature.strip_prefix(a.prefix())
                    .filter(|name| !name.is_empty())
                    .map(|name| (a, name))
            })
    }
}

/// The result of [`Mock::dispatch`], when it doesn't fail.
#[derive(Clone, Debug, PartialEq)]
pub enum DispatchOutcome {
    Returned(Value),
    /// The member produces nothing
    NoValue,
    /// The caller should run the real implementation instead
    CallBaseRequested,
    /// The caller must write `outputs` back into its output parameters, and
    /// then return `result`, if any.
    OutputChannelsApplied {
        result: Option<Value>,
        outputs: Vec<OutputAssignment>,
    },
}

impl DispatchOutcome {
    /// The returned value, if there is one.
    pub fn value(&self) -> Option<&Value> {
        match self {
            DispatchOutcome::Returned(v) => Some(v),
            DispatchOutcome::OutputChannelsApplied{result, ..} =>
                result.as_ref(),
            _ => None
        }
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            DispatchOutcome::Returned(v) => Some(v),
            DispatchOutcome::OutputChannelsApplied{result, ..} => result,
            _ => None
        }
    }
}

/// Creates the nested mocks that a [`DefaultValue::Mock`] strategy hands out.
///
/// `create` runs at most once per member of a parent.  It may dispatch calls
/// to the parent, except to `member` itself, which would deadlock.
pub trait MockFactory: Send + Sync {
    /// Build a mock of `interface`, to be returned from `member` of `parent`.
    fn create(&self, parent: &Mock, interface: &str, member: &str)
        -> Result<Mock>;
}

impl<F> MockFactory for F
    where F: Fn(&Mock, &str, &str) -> Result<Mock> + Send + Sync
{
    fn create(&self, parent: &Mock, interface: &str, member: &str)
        -> Result<Mock>
    {
        self(parent, interface, member)
    }
}

type CallBaseFn = Arc<dyn Fn(&str) -> bool + Send + Sync>;
/// Filled at most once, by whichever caller first asks for that member.
type NestedCell = Arc<Mutex<Option<Mock>>>;

#[derive(Clone)]
enum FactoryRef {
    Strong(Arc<dyn MockFactory>),
    /// Held by mocks that their own factory keeps alive
    Weak(Weak<dyn MockFactory>),
}

impl FactoryRef {
    fn get(&self) -> Option<Arc<dyn MockFactory>> {
        match self {
            FactoryRef::Strong(f) => Some(f.clone()),
            FactoryRef::Weak(f) => f.upgrade(),
        }
    }
}

/// Property storage.
#[derive(Clone)]
enum Slot {
    Stored(Value),
    /// A nested mock of this interface, created on first access.  Breaks
    /// cycles among interfaces whose properties refer to each other.
    Deferred(String),
}

/// Configures and builds a [`Mock`].
///
/// # Examples
/// ```
/// # use understudy::*;
/// let mock = Mock::builder("IClock")
///     .behavior(Behavior::Strict)
///     .default_value(DefaultValue::Empty)
///     .build();
/// assert_eq!(Behavior::Strict, mock.behavior());
/// ```
#[must_use]
pub struct MockBuilder {
    interface: String,
    name: Option<String>,
    behavior: Behavior,
    defaults: DefaultValues,
    call_base: Option<CallBaseFn>,
    catalog: Catalog,
    chaos: Option<ChaosPolicy>,
    factory: Option<FactoryRef>,
}

impl MockBuilder {
    fn new(interface: &str) -> Self {
        MockBuilder {
            interface: interface.to_owned(),
            name: None,
            behavior: Behavior::default(),
            defaults: DefaultValues::default(),
            call_base: None,
            catalog: Catalog::default(),
            chaos: None,
            factory: None
        }
    }

    /// Name the mock in diagnostics.  Defaults to the interface name.
    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_owned());
        self
    }

    pub fn behavior(mut self, behavior: Behavior) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn default_value(mut self, strategy: DefaultValue) -> Self {
        self.defaults = self.defaults.with_strategy(strategy);
        self
    }

    pub fn default_value_provider<P>(mut self, provider: P) -> Self
        where P: DefaultValueProvider + 'static
    {
        self.defaults = self.defaults.with_provider(Arc::new(provider));
        self
    }

    /// Return `v` for every unconfigured result of type `ty`.
    pub fn default_for<V: Into<Value>>(mut self, ty: ValueType, v: V) -> Self {
        self.defaults = self.defaults.with_override(ty, v.into());
        self
    }

    /// Ask the caller to run the real implementation of every member that no
    /// setup matches.
    pub fn call_base(self) -> Self {
        self.call_base_for(|_| true)
    }

    /// Like [`call_base`](#method.call_base), but only for the members whose
    /// signatures satisfy `f`.  Members without a real implementation, like
    /// abstract ones, should be excluded.
    pub fn call_base_for<F>(mut self, f: F) -> Self
        where F: Fn(&str) -> bool + Send + Sync + 'static
    {
        self.call_base = Some(Arc::new(f));
        self
    }

    pub fn catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn chaos(mut self, policy: ChaosPolicy) -> Self {
        self.chaos = Some(policy);
        self
    }

    pub fn factory(mut self, factory: Arc<dyn MockFactory>) -> Self {
        self.factory = Some(FactoryRef::Strong(factory));
        self
    }

    pub(crate) fn weak_factory(mut self, factory: Weak<dyn MockFactory>)
        -> Self
    {
        self.factory = Some(FactoryRef::Weak(factory));
        self
    }

    pub fn build(self) -> Mock {
        let name = self.name.unwrap_or_else(|| self.interface.clone());
        let chaos = self.chaos.map(|p| Arc::new(ChaosInjector::new(p)));
        trace!(mock = %name, behavior = ?self.behavior, "building mock");
        Mock(Arc::new(MockInner {
            name,
            interface: self.interface,
            behavior: self.behavior,
            defaults: self.defaults,
            call_base: self.call_base,
            catalog: self.catalog,
            factory: self.factory,
            registry: SetupRegistry::new(),
            recorder: InvocationRecorder::new(),
            chaos: Mutex::new(chaos),
            properties: Mutex::new(HashMap::new()),
            nested: Mutex::new(HashMap::new()),
            events: EventRegistry::new()
        }))
    }
}

struct MockInner {
    name: String,
    interface: String,
    behavior: Behavior,
    defaults: DefaultValues,
    call_base: Option<CallBaseFn>,
    catalog: Catalog,
    factory: Option<FactoryRef>,
    registry: SetupRegistry,
    recorder: InvocationRecorder,
    chaos: Mutex<Option<Arc<ChaosInjector>>>,
    properties: Mutex<HashMap<String, Slot>>,
    /// Nested mocks handed out as defaults, by member signature
    nested: Mutex<HashMap<String, NestedCell>>,
    events: EventRegistry,
}

/// A dynamic substitute for one interface.
///
/// A binding layer forwards each call of the substituted interface to
/// [`dispatch`](#method.dispatch), which consults the setups registered with
/// [`setup`](#method.setup).  Afterwards the test asks the mock what happened
/// with [`verify`](#method.verify) and friends.
///
/// `Mock` is a cheap handle: clones share all state, and every operation is
/// safe to call from any thread.
#[derive(Clone)]
pub struct Mock(Arc<MockInner>);

impl Mock {
    /// A loose mock of `interface` with every other setting at its default.
    pub fn new(interface: &str) -> Self {
        Self::builder(interface).build()
    }

    pub fn builder(interface: &str) -> MockBuilder {
        MockBuilder::new(interface)
    }

    /// A builder for a mock that inherits this one's behavior, default
    /// values, catalog and factory.  Useful to implementors of
    /// [`MockFactory`].
    pub fn child_builder(&self, interface: &str) -> MockBuilder {
        MockBuilder {
            interface: interface.to_owned(),
            name: None,
            behavior: self.0.behavior,
            defaults: self.0.defaults.clone(),
            call_base: None,
            catalog: self.0.catalog.clone(),
            chaos: None,
            factory: self.0.factory.clone()
        }
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn interface_name(&self) -> &str {
        &self.0.interface
    }

    pub fn behavior(&self) -> Behavior {
        self.0.behavior
    }

    pub fn default_value(&self) -> Option<DefaultValue> {
        self.0.defaults.strategy()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.0.catalog
    }

    /// Are both handles for the very same mock?
    pub fn ptr_eq(&self, other: &Mock) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    fn label(&self) -> String {
        format!("Mock<{}>", self.0.name)
    }

    /// Register a new setup for calls of `signature` whose arguments satisfy
    /// `specs`.  Setups are consulted oldest first.
    pub fn setup(&self, signature: &str, specs: Vec<ArgumentSpec>)
        -> SetupHandle
    {
        self.0.registry.register(signature, specs)
    }

    /// Set up the getter of property `name`.
    pub fn setup_get(&self, name: &str) -> SetupHandle {
        self.setup(&Accessor::Get.signature(name), Vec::new())
    }

    /// Set up the setter of property `name`, for values satisfying `spec`.
    pub fn setup_set(&self, name: &str, spec: ArgumentSpec) -> SetupHandle {
        self.setup(&Accessor::Set.signature(name), vec![spec])
    }

    /// Every setup, in registration order.
    pub fn setups(&self) -> Vec<Arc<Setup>> {
        self.0.registry.setups()
    }

    /// Handle one call of the substituted interface.
    ///
    /// The call is recorded first, then subjected to chaos injection.  Next
    /// the oldest matching setup, if any, resolves the outcome.  Calls that
    /// no setup matches fall through to property storage, event wiring, the
    /// real implementation, and finally to the mock's [`Behavior`].
    ///
    /// Errors configured by a setup or a [`ChaosPolicy`] come back as
    /// [`Error::Raised`], unaltered.
    pub fn dispatch<K>(&self, signature: &str, args: &[Value], kind: K)
        -> Result<DispatchOutcome>
        where K: Into<ResultKind>
    {
        let kind = kind.into();
        self.0.recorder.record(signature, args);
        let chaos = lock(&self.0.chaos).clone();
        if let Some(injector) = chaos {
            injector.inject(signature)?;
        }
        let outcome = match self.0.registry.find(signature, args)? {
            Some(setup) => self.matched(&setup, signature, args, &kind)?,
            None => self.unmatched(signature, args, &kind)?,
        };
        debug!(mock = %self.0.name, signature, ?outcome, "dispatched");
        Ok(outcome)
    }

    fn matched(&self,
               setup: &Setup,
               signature: &str,
               args: &[Value],
               kind: &ResultKind) -> Result<DispatchOutcome>
    {
        let Resolution{resolved, outputs} = setup.resolve(args, kind)?;
        let result = match resolved {
            Resolved::CallBase => return Ok(DispatchOutcome::CallBaseRequested),
            Resolved::Value(v) => Some(v),
            Resolved::Default => kind.value_type()
                .map(|t| self.default_for(t, signature))
                .transpose()?,
            Resolved::NoValue => None,
        };
        Ok(match (outputs, result) {
            (Some(outputs), result) =>
                DispatchOutcome::OutputChannelsApplied{result, outputs},
            (None, Some(v)) => DispatchOutcome::Returned(v),
            (None, None) => DispatchOutcome::NoValue,
        })
    }

    fn unmatched(&self, signature: &str, args: &[Value], kind: &ResultKind)
        -> Result<DispatchOutcome>
    {
        if let Some(outcome) = self.accessor(signature, args)? {
            return Ok(outcome);
        }
        if self.0.call_base.as_ref().map_or(false, |f| f(signature)) {
            return Ok(DispatchOutcome::CallBaseRequested);
        }
        if self.0.behavior == Behavior::Strict {
            return Err(self.unset_member(signature, args));
        }
        Ok(match kind.value_type() {
            None => DispatchOutcome::NoValue,
            Some(t) => DispatchOutcome::Returned(self.default_for(t, signature)?)
        })
    }

    /// Serve property storage and event wiring for unmatched accessors.
    fn accessor(&self, signature: &str, args: &[Value])
        -> Result<Option<DispatchOutcome>>
    {
        let Some((accessor, name)) = Accessor::parse(signature) else {
            return Ok(None);
        };
        match accessor {
            Accessor::Get => {
                let slot = lock(&self.0.properties).get(name).cloned();
                let v = match slot {
                    None => return Ok(None),
                    Some(Slot::Stored(v)) => v,
                    Some(Slot::Deferred(interface)) => {
                        let child = Value::Mock(
                            self.nested_mock(signature, &interface)?);
                        // A setter may have run while the child was built
                        let mut properties = lock(&self.0.properties);
                        let v = match properties.get_mut(name) {
                            Some(Slot::Stored(v)) => v.clone(),
                            Some(slot) => {
                                *slot = Slot::Stored(child.clone());
                                child
                            },
                            None => child
                        };
                        v
                    }
                };
                Ok(Some(DispatchOutcome::Returned(v)))
            },
            Accessor::Set => {
                let mut properties = lock(&self.0.properties);
                let Some(slot) = properties.get_mut(name) else {
                    return Ok(None);
                };
                *slot = Slot::Stored(args.first().cloned().unwrap_or_default());
                Ok(Some(DispatchOutcome::NoValue))
            },
            Accessor::Add | Accessor::Remove => {
                let Some(handler) = args.first()
                    .and_then(Value::as_object)
                    .and_then(|o| o.downcast_ref::<EventHandler>())
                else {
                    return Ok(None);
                };
                if accessor == Accessor::Add {
                    self.0.events.subscribe(name, handler.clone());
                } else {
                    self.0.events.unsubscribe_handler(name, handler);
                }
                Ok(Some(DispatchOutcome::NoValue))
            }
        }
    }

    fn unset_member(&self, signature: &str, args: &[Value]) -> Error {
        let detail = self.0.registry.candidates(signature)
            .iter()
            .find_map(|s| {
                s.explain_mismatch(args).map(|why|
                    format!("\nSetup {} rejected the call:\n{}", s, why)
                )
            }).unwrap_or_default();
        debug!(mock = %self.0.name, signature, "strict mock has no setup");
        Error::UnsetMember {
            mock: self.label(),
            signature: signature.to_owned(),
            arguments: value::display_args(args),
            detail
        }
    }

    fn default_for(&self, ty: &ValueType, member: &str) -> Result<Value> {
        self.0.defaults.resolve(ty, &|interface| {
            self.nested_mock(member, interface).map(Value::Mock)
        })
    }

    /// The nested mock returned from `member`, created on first request.
    fn nested_mock(&self, member: &str, interface: &str) -> Result<Mock> {
        let cell = lock(&self.0.nested)
            .entry(member.to_owned())
            .or_default()
            .clone();
        let mut nested = lock(&cell);
        if let Some(m) = nested.as_ref() {
            return Ok(m.clone());
        }
        let child = match self.0.factory.as_ref().and_then(FactoryRef::get) {
            Some(factory) => factory.create(self, interface, member)?,
            None => self.child_builder(interface)
                .name(&format!("{}.{}", self.0.name, member))
                .build()
        };
        debug!(mock = %self.0.name, member, nested = %child.name(),
               "created nested mock");
        *nested = Some(child.clone());
        Ok(child)
    }

    /// Give property `name` stored-value semantics: its getter returns
    /// whatever its setter last received, starting with `initial`.
    ///
    /// Explicit setups of either accessor still take precedence.
    pub fn setup_property<V: Into<Value>>(&self, name: &str, initial: V) {
        lock(&self.0.properties).insert(name.to_owned(),
            Slot::Stored(initial.into()));
    }

    /// Give every property of the mock's interface stored-value semantics,
    /// starting from its default value.
    ///
    /// Under [`DefaultValue::Mock`], interface-typed properties are filled
    /// eagerly with nested mocks, whose own properties are stubbed in turn.
    /// Where interfaces refer to each other in a cycle, the property that
    /// closes the cycle is only filled on first access.
    pub fn setup_all_properties(&self) -> Result<()> {
        self.stub_properties(&mut Vec::new())
    }

    fn stub_properties(&self, in_progress: &mut Vec<String>) -> Result<()> {
        let interface = self.0.catalog.resolve(&self.0.interface)?;
        in_progress.push(self.0.interface.clone());
        let r = interface.properties()
            .iter()
            .try_for_each(|p| self.stub_property(p, in_progress));
        in_progress.pop();
        r
    }

    fn stub_property(&self, property: &Property, in_progress: &mut Vec<String>)
        -> Result<()>
    {
        let getter = Accessor::Get.signature(&property.name);
        let slot = match &property.ty {
            ValueType::Interface(n) if self.0.defaults.is_recursive() => {
                if in_progress.contains(n) {
                    debug!(mock = %self.0.name, property = %property.name,
                           interface = %n, "deferring cyclic property");
                    Slot::Deferred(n.clone())
                } else {
                    let child = self.nested_mock(&getter, n)?;
                    if child.catalog().get(child.interface_name()).is_some() {
                        child.stub_properties(in_progress)?;
                    }
                    Slot::Stored(Value::Mock(child))
                }
            },
            ty => Slot::Stored(self.default_for(ty, &getter)?)
        };
        lock(&self.0.properties).insert(property.name.clone(), slot);
        Ok(())
    }

    /// Check that calls of `signature` with arguments satisfying `specs`
    /// happened a number of times satisfying `times`.
    pub fn verify<T: Into<Times>>(&self,
                                  signature: &str,
                                  specs: &[ArgumentSpec],
                                  times: T) -> Result<()>
    {
        verify::verify_calls(&self.label(), &self.0.recorder, signature, specs,
                             times.into())
    }

    pub fn verify_get<T: Into<Times>>(&self, name: &str, times: T)
        -> Result<()>
    {
        self.verify(&Accessor::Get.signature(name), &[], times)
    }

    pub fn verify_set<T: Into<Times>>(&self,
                                      name: &str,
                                      spec: ArgumentSpec,
                                      times: T) -> Result<()>
    {
        self.verify(&Accessor::Set.signature(name), &[spec], times)
    }

    /// Fail if any call has not been matched by an earlier successful
    /// [`verify`](#method.verify).
    pub fn verify_no_other_calls(&self) -> Result<()> {
        verify::verify_no_other_calls(&self.label(), &self.0.recorder)
    }

    /// Check every verifiable setup against its expected call count.
    pub fn verify_all(&self) -> Result<()> {
        verify::verify_setups(&self.label(), &self.0.registry.setups(), false)
    }

    /// Like [`verify_all`](#method.verify_all), but setups that were never
    /// marked verifiable must have been matched at least once, too.
    pub fn verify_all_setups(&self) -> Result<()> {
        verify::verify_setups(&self.label(), &self.0.registry.setups(), true)
    }

    /// A snapshot of every recorded call, oldest first.
    pub fn invocations(&self) -> Vec<Arc<Invocation>> {
        self.0.recorder.invocations()
    }

    /// Forget every call, and every setup's call count.  Setups stay.
    pub fn reset_calls(&self) {
        self.0.recorder.clear();
        for setup in self.0.registry.setups() {
            setup.reset_call_count();
        }
    }

    /// Return the mock to its freshly built state: no setups, calls, property
    /// values, nested mocks or event subscriptions.  Its configuration,
    /// including any chaos policy, remains.
    pub fn reset(&self) {
        trace!(mock = %self.0.name, "reset");
        self.0.registry.clear();
        self.0.recorder.clear();
        lock(&self.0.properties).clear();
        lock(&self.0.nested).clear();
        self.0.events.clear();
    }

    /// Subject every later call to `policy`.  Replaces any earlier policy,
    /// and zeroes the statistics.
    pub fn configure_chaos(&self, policy: ChaosPolicy) {
        *lock(&self.0.chaos) = Some(Arc::new(ChaosInjector::new(policy)));
    }

    pub fn clear_chaos(&self) {
        *lock(&self.0.chaos) = None;
    }

    pub fn chaos_statistics(&self) -> ChaosStatistics {
        lock(&self.0.chaos).as_ref()
            .map(|c| c.statistics())
            .unwrap_or_default()
    }

    pub fn reset_chaos_statistics(&self) {
        if let Some(c) = lock(&self.0.chaos).as_ref() {
            c.reset_statistics();
        }
    }

    pub fn events(&self) -> &EventRegistry {
        &self.0.events
    }

    pub fn subscribe(&self, event: &str, handler: EventHandler) -> Subscription
    {
        self.0.events.subscribe(event, handler)
    }

    /// Deliver `args` to every subscriber of `event`.  Returns the number of
    /// handlers invoked.
    pub fn raise(&self, event: &str, args: &[Value]) -> Result<usize> {
        self.0.events.raise(event, args)
    }
}

impl fmt::Debug for Mock {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Mock")
            .field("name", &self.0.name)
            .field("interface", &self.0.interface)
            .field("behavior", &self.0.behavior)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod t {
    use super::*;

    #[test]
    fn accessor_parse() {
        assert_eq!(Some((Accessor::Get, "Name")), Accessor::parse("get_Name"));
        assert_eq!(Some((Accessor::Remove, "Changed")),
                   Accessor::parse("remove_Changed"));
        assert_eq!(None, Accessor::parse("get_"));
        assert_eq!(None, Accessor::parse("Compute"));
    }

    #[test]
    fn nested_mock_is_cached_per_member() {
        let mock = Mock::builder("IOrder")
            .default_value(DefaultValue::Mock)
            .build();
        let a = mock.nested_mock("get_Customer", "ICustomer").unwrap();
        let b = mock.nested_mock("get_Customer", "ICustomer").unwrap();
        let c = mock.nested_mock("get_Supplier", "ICustomer").unwrap();
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&c));
        assert_eq!("IOrder.get_Customer", a.name());
        assert_eq!("ICustomer", a.interface_name());
    }

    #[test]
    fn child_inherits_configuration() {
        let mock = Mock::builder("IOrder")
            .behavior(Behavior::Strict)
            .default_value(DefaultValue::Mock)
            .chaos(ChaosPolicy::new().with_failure_rate(1.0))
            .build();
        let child = mock.child_builder("ICustomer").build();
        assert_eq!(Behavior::Strict, child.behavior());
        assert_eq!(Some(DefaultValue::Mock), child.default_value());
        assert!(lock(&child.0.chaos).is_none());
    }

    #[test]
    fn outcome_value() {
        let o = DispatchOutcome::OutputChannelsApplied {
            result: Some(Value::Bool(true)),
            outputs: vec![]
        };
        assert_eq!(Some(&Value::Bool(true)), o.value());
        assert_eq!(None, DispatchOutcome::CallBaseRequested.into_value());
    }
}
