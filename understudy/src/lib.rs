// vim: tw=80
//! A dynamic mock object engine.
//!
//! Understudy provides the runtime behind mock objects whose shape is only
//! known at runtime: a *binding layer* (generated code, a scripting bridge, a
//! proxy) forwards every call of the substituted interface to a [`Mock`],
//! naming the member by a signature string and passing its arguments as
//! [`Value`]s.  The engine decides what the call returns, records it, and
//! later answers the test's questions about what happened.
//!
//! # User Guide
//!
//! * [`Getting started`](#getting-started)
//! * [`Return values`](#return-values)
//! * [`Matching arguments`](#matching-arguments)
//! * [`Output parameters`](#output-parameters)
//! * [`Verification`](#verification)
//! * [`Sequences`](#sequences)
//! * [`Default values`](#default-values)
//! * [`Properties`](#properties)
//! * [`Events`](#events)
//! * [`Chaos`](#chaos)
//! * [`Repositories`](#repositories)
//! * [`Crate features`](#crate-features)
//!
//! ## Getting Started
//! ```
//! use understudy::*;
//!
//! let mock = Mock::builder("ICalculator")
//!     .behavior(Behavior::Strict)
//!     .build();
//! mock.setup("Add", vec![ArgumentSpec::any(), ArgumentSpec::any()])
//!     .returns_with(|args| {
//!         Value::from(args[0].as_int().unwrap() + args[1].as_int().unwrap())
//!     });
//!
//! let r = mock.dispatch("Add", &[2.into(), 3.into()], ValueType::Int);
//! assert_eq!(Some(&Value::Int(5)), r.unwrap().value());
//! mock.verify("Add", &[ArgumentSpec::eq(2), ArgumentSpec::any()], Times::once())
//!     .unwrap();
//! ```
//!
//! ## Return values
//!
//! A setup may return a constant with [`returns`], compute its result with
//! [`returns_with`], step through a list with [`returns_sequence`], or fail
//! with [`throws`].  Errors configured that way reach the caller as
//! [`Error::Raised`], carrying the very same error that was configured.
//!
//! ```
//! # use understudy::*;
//! let mock = Mock::new("IQueue");
//! mock.setup("Pop", vec![]).returns_sequence([1, 2, 3]);
//! let popped = (0..5)
//!     .map(|_| mock.dispatch("Pop", &[], ValueType::Int).unwrap())
//!     .map(|o| o.into_value().unwrap())
//!     .collect::<Vec<_>>();
//! assert_eq!(popped, [1, 2, 3, 3, 3].map(Value::from));
//! ```
//!
//! When more than one setup matches a call, the *oldest* one wins.  Register
//! specific setups before general ones.
//!
//! ## Matching arguments
//!
//! Each argument of a setup is described by an [`ArgumentSpec`]: an exact
//! value, any value of a type, a member of a set, a regular expression, or an
//! arbitrary [`Predicate`].  Predicates from the [`predicates`] crate work
//! directly.
//!
//! ```
//! # use understudy::*;
//! let mock = Mock::new("IStore");
//! mock.setup("Get", vec![ArgumentSpec::regex("^user:").unwrap()])
//!     .returns("someone");
//! mock.setup("Get", vec![ArgumentSpec::any()])
//!     .returns("something");
//! let r = mock.dispatch("Get", &["user:7".into()], ValueType::Str).unwrap();
//! assert_eq!(Some(&Value::from("someone")), r.value());
//! ```
//!
//! ## Output parameters
//!
//! Members with `out` or `ref` parameters receive their values back through
//! [`DispatchOutcome::OutputChannelsApplied`].  The binding layer writes each
//! [`OutputAssignment`] into the corresponding parameter.
//!
//! ```
//! # use understudy::*;
//! let mock = Mock::new("IParser");
//! mock.setup("TryParse", vec![ArgumentSpec::eq("42"), ArgumentSpec::out()])
//!     .out_value(1, 42)
//!     .returns(true);
//! let r = mock.dispatch("TryParse", &["42".into(), Value::Null],
//!                       ValueType::Bool).unwrap();
//! assert_eq!(r, DispatchOutcome::OutputChannelsApplied {
//!     result: Some(Value::Bool(true)),
//!     outputs: vec![OutputAssignment{index: 1, value: Value::Int(42)}]
//! });
//! ```
//!
//! ## Verification
//!
//! Every call is recorded, whatever happens to it.  [`Mock::verify`] counts
//! the recorded calls that match a signature and argument specs, and compares
//! the count against a [`Times`].  [`Mock::verify_no_other_calls`] then
//! fails if any call escaped verification.  Alternatively, mark setups
//! [`verifiable`] and check them all at once with [`Mock::verify_all`].
//!
//! ## Sequences
//!
//! A [`Sequence`] forces setups, possibly of different mocks, to fire in the
//! order they joined it.  A call that arrives out of turn fails with
//! [`Error::SequenceViolation`].
//!
//! ```
//! # use understudy::*;
//! let seq = Sequence::new();
//! let service = Mock::new("IService");
//! service.setup("Initialize", vec![]).in_sequence(&seq);
//! service.setup("Execute", vec![]).in_sequence(&seq);
//!
//! let e = service.dispatch("Execute", &[], ResultKind::None).unwrap_err();
//! assert!(e.to_string().starts_with("Method sequence violation"));
//! ```
//!
//! ## Default values
//!
//! A loose mock answers calls that no setup matches with a default value.
//! Without further configuration that is the natural zero of the result type:
//! `0`, `false`, or `Null`.  [`DefaultValue::Empty`] returns empty strings and
//! collections instead, and [`DefaultValue::Mock`] additionally returns a
//! nested mock for every interface-typed result.  The same member always
//! returns the same nested mock.
//!
//! ```
//! # use understudy::*;
//! let order = Mock::builder("IOrder")
//!     .default_value(DefaultValue::Mock)
//!     .build();
//! let ty = ValueType::interface("ICustomer");
//! let a = order.dispatch("get_Customer", &[], ty.clone()).unwrap();
//! let b = order.dispatch("get_Customer", &[], ty).unwrap();
//! assert_eq!(a, b);
//! assert_eq!("ICustomer", a.value().unwrap().as_mock().unwrap().interface_name());
//! ```
//!
//! ## Properties
//!
//! Properties are dispatched through their accessors, `get_Name` and
//! `set_Name`.  [`Mock::setup_property`] makes a property remember what was
//! last stored in it.  Given a [`Catalog`] describing the interface,
//! [`Mock::setup_all_properties`] does the same for every property at once.
//!
//! ## Events
//!
//! Subscribing an [`EventHandler`], either directly or by dispatching the
//! event's `add_` accessor, lets the test deliver the event later with
//! [`Mock::raise`].
//!
//! ## Chaos
//!
//! A [`ChaosPolicy`] makes a mock randomly fail, or delay, its calls.  Seeded
//! policies fail the same calls on every run.
//!
//! ## Repositories
//!
//! A [`MockRepository`] creates mocks with shared settings, tracks them along
//! with their nested mocks, and verifies them all with one call.
//!
//! ## Crate features
//!
//! * `serde`: Serialize and deserialize [`Times`], [`ChaosPolicy`],
//!   [`ChaosStatistics`], [`Behavior`] and [`DefaultValue`], so they may be
//!   loaded from configuration files.
//!
//! [`returns`]: SetupHandle::returns
//! [`returns_with`]: SetupHandle::returns_with
//! [`returns_sequence`]: SetupHandle::returns_sequence
//! [`throws`]: SetupHandle::throws
//! [`verifiable`]: SetupHandle::verifiable
//! [`predicates`]: predicate/index.html

use std::sync::{Mutex, MutexGuard, PoisonError};

mod chaos;
mod defaults;
mod error;
mod events;
mod interface;
mod matcher;
mod mock;
mod recorder;
mod registry;
mod repository;
mod sequence;
mod setup;
mod times;
mod value;
mod verify;

pub use chaos::{ChaosInjector, ChaosPolicy, ChaosStatistics};
pub use defaults::{
    DefaultValue,
    DefaultValueProvider,
    DefaultValues,
    empty,
    natural_zero
};
pub use error::{Error, Fault, Result};
pub use events::{EventHandler, EventRegistry, Subscription};
pub use interface::{Catalog, Interface, Property};
pub use matcher::{ArgumentSpec, Matcher, matches_all};
pub use mock::{
    Accessor,
    Behavior,
    DispatchOutcome,
    Mock,
    MockBuilder,
    MockFactory
};
pub use predicates::prelude::{Predicate, PredicateBooleanExt, predicate};
pub use recorder::{Invocation, InvocationRecorder};
pub use registry::SetupRegistry;
pub use repository::{MockRepository, RepositoryConfig};
pub use sequence::{SeqHandle, Sequence};
pub use setup::{OutputAssignment, OutputSpec, ReturnStrategy, Setup, SetupHandle};
pub use times::Times;
pub use value::{AnyValue, Object, ResultKind, Value, ValueType};

/// Lock a mutex, ignoring poison left by a panicking user closure.
pub(crate) fn lock<T: ?Sized>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}
