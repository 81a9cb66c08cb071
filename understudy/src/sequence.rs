// vim: tw=80
//! Ordering constraints across setups, and across mocks.

use std::sync::{Arc, Mutex};
use tracing::trace;

use crate::{Error, Result, lock};

#[derive(Debug, Default)]
struct SeqState {
    /// Step number the next setup to join this sequence will receive
    next_setup_step: usize,
    /// Step number that must fire next
    next_expected: usize,
}

#[derive(Debug, Default)]
struct SeqInner {
    state: Mutex<SeqState>,
    cyclic: bool,
}

impl SeqInner {
    fn register(&self) -> usize {
        let mut state = lock(&self.state);
        let step = state.next_setup_step;
        state.next_setup_step += 1;
        step
    }

    /// Compare and advance under a single lock, so that concurrent callers
    /// can never both claim the same step.
    fn check_and_advance(&self, step: usize, signature: &str) -> Result<()> {
        let mut state = lock(&self.state);
        if step != state.next_expected {
            return Err(Error::SequenceViolation {
                signature: signature.to_owned(),
                expected: state.next_expected,
                actual: step
            });
        }
        state.next_expected += 1;
        if self.cyclic && state.next_expected == state.next_setup_step {
            state.next_expected = 0;
        }
        trace!(signature, step, next = state.next_expected,
               "sequence advanced");
        Ok(())
    }
}

/// A setup's place in a [`Sequence`].
#[derive(Clone, Debug)]
pub struct SeqHandle {
    inner: Arc<SeqInner>,
    seq: usize
}

impl SeqHandle {
    /// The step this handle was assigned when its setup joined the sequence.
    pub fn step(&self) -> usize {
        self.seq
    }

    /// Fire this step.  Fails, without advancing, unless it is the step the
    /// sequence expects next.
    pub fn check_and_advance(&self, signature: &str) -> Result<()> {
        self.inner.check_and_advance(self.seq, signature)
    }
}

/// Used to enforce that setups fire in the order they joined the sequence.
///
/// Each setup joins with [`SetupHandle::in_sequence`], receiving the next step
/// number.  Invoking a sequenced setup when its step isn't the next one
/// expected fails with [`Error::SequenceViolation`].  A `Sequence` is a cheap
/// handle; clones share state, so one sequence may order calls across several
/// otherwise unrelated mocks.
///
/// # Examples
/// ```
/// # use understudy::*;
/// let seq = Sequence::new();
/// let first = seq.next();
/// let second = seq.next();
///
/// assert!(second.check_and_advance("Execute").is_err());
/// first.check_and_advance("Initialize").unwrap();
/// second.check_and_advance("Execute").unwrap();
/// ```
///
/// [`SetupHandle::in_sequence`]: crate::SetupHandle::in_sequence
#[derive(Clone, Debug, Default)]
pub struct Sequence {
    inner: Arc<SeqInner>,
}

impl Sequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sequence that starts over once its last step has fired.
    pub fn cyclic() -> Self {
        Sequence {
            inner: Arc::new(SeqInner{cyclic: true, ..SeqInner::default()})
        }
    }

    /// Assign the next step of this sequence.
    pub fn next(&self) -> SeqHandle {
        let seq = self.inner.register();
        trace!(step = seq, "setup joined sequence");
        SeqHandle{inner: self.inner.clone(), seq}
    }

    /// How many steps have been handed out.
    pub fn len(&self) -> usize {
        lock(&self.inner.state).next_setup_step
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The step that must fire next.
    pub fn expected_step(&self) -> usize {
        lock(&self.inner.state).next_expected
    }

    pub fn is_cyclic(&self) -> bool {
        self.inner.cyclic
    }
}
