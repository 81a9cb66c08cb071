// vim: tw=80
//! Everything that can go wrong while dispatching to, or verifying, a mock.

use std::{error, fmt, sync::Arc};

use crate::times::Times;

/// A user-supplied error that a mock raises instead of returning.
///
/// Configured with [`SetupHandle::throws`](crate::SetupHandle::throws) or
/// listed in a [`ChaosPolicy`](crate::ChaosPolicy).  The same `Fault` is
/// surfaced, unaltered, every time it fires, so it is reference counted.
#[derive(Clone)]
pub struct Fault(Arc<dyn error::Error + Send + Sync + 'static>);

impl Fault {
    pub fn new<E>(e: E) -> Self
        where E: error::Error + Send + Sync + 'static
    {
        Fault(Arc::new(e))
    }

    /// Recover the concrete error that was configured.
    pub fn downcast_ref<E: error::Error + 'static>(&self) -> Option<&E> {
        self.0.downcast_ref::<E>()
    }

    /// Do both `Fault`s refer to the very same configured error?
    pub fn ptr_eq(&self, other: &Fault) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Fault {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&*self.0, f)
    }
}

impl error::Error for Fault {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        self.0.source()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A strict mock received a call that no setup matched.
    #[error("{mock}: invocation {signature}({arguments}) failed with mock \
             behavior Strict; all invocations on the mock must have a \
             corresponding setup{detail}")]
    UnsetMember {
        mock: String,
        signature: String,
        arguments: String,
        /// Extra diagnostics, already formatted, possibly empty
        detail: String,
    },

    #[error("{mock}: expected invocation on the mock {expected}, but was \
             {actual} times: {signature}\nPerformed invocations:\n{performed}")]
    Verification {
        mock: String,
        signature: String,
        expected: Times,
        actual: usize,
        performed: String,
    },

    #[error("{mock}: the following invocations were not verified:\n{}",
            .calls.join("\n"))]
    UnverifiedCalls {
        mock: String,
        calls: Vec<String>,
    },

    #[error("{mock}: the following setups were not matched as expected:\n{}",
            .setups.join("\n"))]
    UnmetSetups {
        mock: String,
        setups: Vec<String>,
    },

    #[error("Method sequence violation: {signature} was invoked at step \
             {actual}, but step {expected} was expected next")]
    SequenceViolation {
        signature: String,
        expected: usize,
        actual: usize,
    },

    /// A configured error, either from a setup or from chaos injection.
    #[error(transparent)]
    Raised(Fault),

    /// The binding layer handed the engine an argument list whose length
    /// disagrees with a setup for the same member.
    #[error("{signature}: setup declares {expected} arguments but the call \
             supplied {actual}")]
    ArityMismatch {
        signature: String,
        expected: usize,
        actual: usize,
    },

    #[error("invalid argument pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("no interface named {0} in the catalog")]
    UnknownInterface(String),

    /// Batch verification collected one failure per offending mock.
    #[error("{} mock(s) failed verification:\n{}", .0.len(),
            .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("\n"))]
    Repository(Vec<Error>),
}

impl Error {
    /// The configured error carried by a [`Error::Raised`], if that's what
    /// this is.
    pub fn fault(&self) -> Option<&Fault> {
        match self {
            Error::Raised(f) => Some(f),
            _ => None
        }
    }
}

impl From<Fault> for Error {
    fn from(f: Fault) -> Self {
        Error::Raised(f)
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
