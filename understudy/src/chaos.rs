// vim: tw=80
//! Fault injection.
//!
//! A mock configured with a [`ChaosPolicy`] may delay, or fail, any invocation
//! before it is even matched against a setup.  With a seed, the pattern of
//! injected faults is reproducible from run to run.

use rand::{Rng, SeedableRng, rngs::StdRng};
use std::{
    sync::{
        Mutex,
        atomic::{AtomicU64, Ordering}
    },
    thread,
    time::Duration
};
use tracing::{debug, warn};

use crate::{Error, Fault, Result, lock};

/// What faults to inject, and how often.
///
/// # Example
///
/// ```
/// # use understudy::*;
/// use std::io;
///
/// let policy = ChaosPolicy::new()
///     .with_seed(42)
///     .with_failure_rate(0.3)
///     .with_exception(io::Error::from(io::ErrorKind::ConnectionReset));
/// assert_eq!(Some(42), policy.seed);
/// ```
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ChaosPolicy {
    /// Probability, in `[0, 1]`, that an invocation fails.
    pub failure_rate: f64,
    /// Candidates for the error raised by a failing invocation, chosen
    /// uniformly.  If empty, a failing draw raises nothing.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub exceptions: Vec<Fault>,
    /// Artificial latency added to every invocation, in milliseconds.
    pub timeout_millis: u64,
    /// Seed for a private random number generator.  Without one, draws come
    /// from the thread's generator and are not reproducible.
    pub seed: Option<u64>,
}

impl ChaosPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the failure rate, clamped to `[0, 1]`.
    pub fn with_failure_rate(mut self, rate: f64) -> Self {
        self.failure_rate = if rate.is_nan() {
            0.0
        } else {
            rate.clamp(0.0, 1.0)
        };
        self
    }

    pub fn with_exception<E>(mut self, e: E) -> Self
        where E: std::error::Error + Send + Sync + 'static
    {
        self.exceptions.push(Fault::new(e));
        self
    }

    pub fn with_fault(mut self, f: Fault) -> Self {
        self.exceptions.push(f);
        self
    }

    pub fn with_timeout_millis(mut self, ms: u64) -> Self {
        self.timeout_millis = ms;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Counters of what a mock's [`ChaosInjector`] has done so far.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChaosStatistics {
    pub total_invocations: u64,
    /// Invocations whose draw fell below the failure rate
    pub chaos_triggered_count: u64,
    /// Invocations that were artificially delayed
    pub timeout_triggered_count: u64,
}

#[derive(Debug, Default)]
struct Counters {
    total: AtomicU64,
    triggered: AtomicU64,
    timeouts: AtomicU64,
}

/// Applies one [`ChaosPolicy`] to every invocation of a mock.
#[derive(Debug)]
pub struct ChaosInjector {
    policy: ChaosPolicy,
    /// Only present when the policy is seeded.  Draws must be serialized to
    /// keep the stream reproducible.
    rng: Option<Mutex<StdRng>>,
    counters: Counters,
}

/// The outcome of one draw: `None` if the invocation survives, otherwise the
/// index of the fault to raise, if any are configured.
type Draw = Option<Option<usize>>;

fn roll<R: Rng + ?Sized>(rng: &mut R, rate: f64, nfaults: usize) -> Draw {
    let x: f64 = rng.gen();
    if x < rate {
        Some((nfaults > 0).then(|| rng.gen_range(0..nfaults)))
    } else {
        None
    }
}

impl ChaosInjector {
    pub fn new(policy: ChaosPolicy) -> Self {
        let rng = policy.seed.map(|s| Mutex::new(StdRng::seed_from_u64(s)));
        ChaosInjector {
            policy,
            rng,
            counters: Counters::default()
        }
    }

    pub fn policy(&self) -> &ChaosPolicy {
        &self.policy
    }

    fn draw(&self) -> Draw {
        let rate = self.policy.failure_rate;
        let n = self.policy.exceptions.len();
        match &self.rng {
            Some(m) => roll(&mut *lock(m), rate, n),
            None => roll(&mut rand::thread_rng(), rate, n),
        }
    }

    /// Subject one invocation to the policy.
    ///
    /// Blocks the calling thread for the configured timeout, then fails with
    /// one of the configured faults if the draw says so.
    pub fn inject(&self, signature: &str) -> Result<()> {
        self.counters.total.fetch_add(1, Ordering::Relaxed);
        if self.policy.timeout_millis > 0 {
            self.counters.timeouts.fetch_add(1, Ordering::Relaxed);
            thread::sleep(Duration::from_millis(self.policy.timeout_millis));
        }
        match self.draw() {
            None => Ok(()),
            Some(pick) => {
                self.counters.triggered.fetch_add(1, Ordering::Relaxed);
                match pick {
                    Some(i) => {
                        let fault = self.policy.exceptions[i].clone();
                        debug!(signature, fault = %fault, "chaos fault injected");
                        Err(Error::Raised(fault))
                    },
                    None => {
                        warn!(signature,
                            "chaos triggered, but the policy lists no exceptions");
                        Ok(())
                    }
                }
            }
        }
    }

    pub fn statistics(&self) -> ChaosStatistics {
        ChaosStatistics {
            total_invocations: self.counters.total.load(Ordering::Relaxed),
            chaos_triggered_count:
                self.counters.triggered.load(Ordering::Relaxed),
            timeout_triggered_count:
                self.counters.timeouts.load(Ordering::Relaxed),
        }
    }

    /// Zero the counters.  The random stream is not rewound.
    pub fn reset_statistics(&self) {
        self.counters.total.store(0, Ordering::Relaxed);
        self.counters.triggered.store(0, Ordering::Relaxed);
        self.counters.timeouts.store(0, Ordering::Relaxed);
    }
}
