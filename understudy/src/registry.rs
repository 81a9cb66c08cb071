// vim: tw=80
//! The ordered collection of a mock's setups.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex}
};
use tracing::trace;

use crate::{
    Result,
    lock,
    matcher::ArgumentSpec,
    setup::{Setup, SetupHandle},
    value::Value
};

#[derive(Default)]
struct Inner {
    /// Every setup, in registration order
    ordered: Vec<Arc<Setup>>,
    /// The same setups, split by signature.  Each list keeps registration
    /// order, so first-match within a signature is first-match overall.
    by_signature: HashMap<String, Vec<Arc<Setup>>>,
}

/// Holds the setups of one mock.
///
/// Dispatch selects the *oldest* setup that matches, never the newest.
#[derive(Default)]
pub struct SetupRegistry {
    inner: Mutex<Inner>,
}

impl SetupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new setup and append it to the registry.
    pub fn register(&self, signature: &str, specs: Vec<ArgumentSpec>)
        -> SetupHandle
    {
        let setup = Arc::new(Setup::new(signature, specs));
        trace!(setup = %setup, "registering setup");
        let mut inner = lock(&self.inner);
        inner.ordered.push(setup.clone());
        inner.by_signature.entry(signature.to_owned())
            .or_default()
            .push(setup.clone());
        SetupHandle(setup)
    }

    /// Every setup registered for `signature`, oldest first.
    pub fn candidates(&self, signature: &str) -> Vec<Arc<Setup>> {
        lock(&self.inner).by_signature.get(signature)
            .cloned()
            .unwrap_or_default()
    }

    /// Select the first-registered setup that matches the call.
    ///
    /// Matchers run outside of the registry's lock, so a predicate may safely
    /// touch the mock.
    pub fn find(&self, signature: &str, args: &[Value])
        -> Result<Option<Arc<Setup>>>
    {
        for setup in self.candidates(signature) {
            if setup.matches(signature, args)? {
                return Ok(Some(setup));
            }
        }
        Ok(None)
    }

    /// Every setup, in registration order.
    pub fn setups(&self) -> Vec<Arc<Setup>> {
        lock(&self.inner).ordered.clone()
    }

    pub fn len(&self) -> usize {
        lock(&self.inner).ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut inner = lock(&self.inner);
        inner.ordered.clear();
        inner.by_signature.clear();
    }
}
