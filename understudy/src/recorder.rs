// vim: tw=80
//! The history of every call dispatched to a mock.

use std::{
    fmt,
    sync::{
        Arc,
        Mutex,
        atomic::{AtomicBool, Ordering}
    }
};

use crate::{
    Result,
    lock,
    matcher::{self, ArgumentSpec},
    value::{self, Value}
};

/// One dispatched call.  Immutable, except for its `verified` flag.
#[derive(Debug)]
pub struct Invocation {
    signature: String,
    arguments: Vec<Value>,
    verified: AtomicBool,
}

impl Invocation {
    pub(crate) fn new(signature: &str, arguments: &[Value]) -> Self {
        Invocation {
            signature: signature.to_owned(),
            arguments: arguments.to_vec(),
            verified: AtomicBool::new(false)
        }
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// The arguments, as they were when the call was made
    pub fn arguments(&self) -> &[Value] {
        &self.arguments
    }

    pub fn is_verified(&self) -> bool {
        self.verified.load(Ordering::SeqCst)
    }

    pub(crate) fn mark_verified(&self) {
        self.verified.store(true, Ordering::SeqCst);
    }

    /// Is this a call of `signature` whose arguments satisfy `specs`?
    pub fn matches(&self, signature: &str, specs: &[ArgumentSpec])
        -> Result<bool>
    {
        if signature != self.signature {
            return Ok(false);
        }
        matcher::matches_all(signature, specs, &self.arguments)
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}({})", self.signature,
               value::display_args(&self.arguments))
    }
}

/// An append-only log of invocations, in arrival order.
#[derive(Debug, Default)]
pub struct InvocationRecorder {
    calls: Mutex<Vec<Arc<Invocation>>>,
}

impl InvocationRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, signature: &str, arguments: &[Value])
        -> Arc<Invocation>
    {
        let invocation = Arc::new(Invocation::new(signature, arguments));
        lock(&self.calls).push(invocation.clone());
        invocation
    }

    /// A snapshot of the history.
    pub fn invocations(&self) -> Vec<Arc<Invocation>> {
        lock(&self.calls).clone()
    }

    pub fn len(&self) -> usize {
        lock(&self.calls).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        lock(&self.calls).clear();
    }
}
