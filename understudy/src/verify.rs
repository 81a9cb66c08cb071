// vim: tw=80
//! Checking what a mock went through against what the test expected.

use std::sync::Arc;
use tracing::debug;

use crate::{
    Error,
    Result,
    matcher::{self, ArgumentSpec},
    recorder::{Invocation, InvocationRecorder},
    setup::Setup,
    times::Times
};

fn performed(calls: &[Arc<Invocation>]) -> String {
    if calls.is_empty() {
        return "No invocations performed.".to_owned();
    }
    calls.iter()
        .map(|c| format!("    {}", c))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Check that calls matching `signature` and `specs` were recorded a number
/// of times satisfying `times`.  On success, those calls become verified.
pub(crate) fn verify_calls(mock: &str,
                           recorder: &InvocationRecorder,
                           signature: &str,
                           specs: &[ArgumentSpec],
                           times: Times) -> Result<()>
{
    let calls = recorder.invocations();
    let mut matching = Vec::new();
    for call in calls.iter() {
        if call.matches(signature, specs)? {
            matching.push(call);
        }
    }
    let described = format!("{}({})", signature,
                            matcher::display_specs(specs));
    if !times.validate(matching.len()) {
        debug!(mock, call = %described, expected = %times,
               actual = matching.len(), "verification failed");
        return Err(Error::Verification {
            mock: mock.to_owned(),
            signature: described,
            expected: times,
            actual: matching.len(),
            performed: performed(&calls)
        });
    }
    for call in matching {
        call.mark_verified();
    }
    debug!(mock, call = %described, expected = %times, "verified");
    Ok(())
}

/// Fail if any recorded call has not been verified yet.
pub(crate) fn verify_no_other_calls(mock: &str,
                                    recorder: &InvocationRecorder)
    -> Result<()>
{
    let unverified = recorder.invocations()
        .iter()
        .filter(|c| !c.is_verified())
        .map(ToString::to_string)
        .collect::<Vec<_>>();
    if unverified.is_empty() {
        Ok(())
    } else {
        Err(Error::UnverifiedCalls {
            mock: mock.to_owned(),
            calls: unverified
        })
    }
}

/// Check every setup's call count against its expectation.
///
/// With `all`, setups that were never marked verifiable are checked too, and
/// must have been matched at least once.
pub(crate) fn verify_setups(mock: &str, setups: &[Arc<Setup>], all: bool)
    -> Result<()>
{
    let unmet = setups.iter()
        .filter_map(|s| {
            let times = match (s.expected_times(), all) {
                (Some(t), _) => t,
                (None, true) => Times::at_least_once(),
                (None, false) => return None,
            };
            let n = s.call_count();
            (!times.validate(n)).then(|| {
                format!("    {}: expected {}, but was {} times", s, times, n)
            })
        }).collect::<Vec<_>>();
    if unmet.is_empty() {
        Ok(())
    } else {
        debug!(mock, unmet = unmet.len(), "setup verification failed");
        Err(Error::UnmetSetups {
            mock: mock.to_owned(),
            setups: unmet
        })
    }
}
