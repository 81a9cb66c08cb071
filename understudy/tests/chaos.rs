// vim: tw=80
//! Fault injection ahead of setup matching.

use std::{
    io,
    time::{Duration, Instant}
};
use understudy::*;

fn reset_policy(seed: u64, rate: f64) -> ChaosPolicy {
    ChaosPolicy::new()
        .with_seed(seed)
        .with_failure_rate(rate)
        .with_exception(io::Error::from(io::ErrorKind::ConnectionReset))
}

fn outcomes(mock: &Mock, n: usize) -> Vec<bool> {
    (0..n).map(|_| mock.dispatch("Ping", &[], ResultKind::None).is_err())
        .collect()
}

#[test]
fn seeded_runs_are_reproducible() {
    let a = Mock::new("IService");
    let b = Mock::new("IService");
    a.configure_chaos(reset_policy(42, 0.3));
    b.configure_chaos(reset_policy(42, 0.3));
    let first = outcomes(&a, 100);
    let second = outcomes(&b, 100);
    pretty_assertions::assert_eq!(first, second);
    pretty_assertions::assert_eq!(a.chaos_statistics(), b.chaos_statistics());

    let stats = a.chaos_statistics();
    let failures = first.iter().filter(|f| **f).count() as u64;
    assert_eq!(100, stats.total_invocations);
    assert_eq!(failures, stats.chaos_triggered_count);
    assert!(failures > 0 && failures < 100);
    assert_eq!(0, stats.timeout_triggered_count);
}

#[test]
fn reconfiguring_restarts_the_stream() {
    let mock = Mock::new("IService");
    mock.configure_chaos(reset_policy(7, 0.5));
    let first = outcomes(&mock, 50);
    mock.configure_chaos(reset_policy(7, 0.5));
    assert_eq!(0, mock.chaos_statistics().total_invocations);
    let second = outcomes(&mock, 50);
    assert_eq!(first, second);
}

#[test]
fn raises_a_configured_fault() {
    let fault = Fault::new(io::Error::from(io::ErrorKind::BrokenPipe));
    let mock = Mock::new("IService");
    mock.setup("Ping", vec![]).returns(1);
    mock.configure_chaos(ChaosPolicy::new()
        .with_failure_rate(1.0)
        .with_fault(fault.clone()));
    let e = mock.dispatch("Ping", &[], ValueType::Int).unwrap_err();
    assert!(e.fault().unwrap().ptr_eq(&fault));
}

/// Chaos comes before the strictness check
#[test]
fn strict_mock_without_setup() {
    let mock = Mock::builder("IService")
        .behavior(Behavior::Strict)
        .chaos(reset_policy(1, 1.0))
        .build();
    let e = mock.dispatch("Ping", &[], ResultKind::None).unwrap_err();
    assert!(matches!(e, Error::Raised(_)));
}

/// A successful draw without any exceptions to raise is a no-op.
#[test_log::test]
fn no_exceptions() {
    let mock = Mock::new("IService");
    mock.configure_chaos(ChaosPolicy::new().with_failure_rate(1.0));
    assert!(outcomes(&mock, 10).iter().all(|failed| !failed));
    assert_eq!(10, mock.chaos_statistics().chaos_triggered_count);
}

#[test]
fn zero_rate() {
    let mock = Mock::new("IService");
    mock.configure_chaos(reset_policy(3, 0.0));
    assert!(outcomes(&mock, 20).iter().all(|failed| !failed));
    let stats = mock.chaos_statistics();
    assert_eq!(20, stats.total_invocations);
    assert_eq!(0, stats.chaos_triggered_count);
}

#[test]
fn unseeded() {
    let mock = Mock::new("IService");
    mock.configure_chaos(ChaosPolicy::new()
        .with_failure_rate(1.0)
        .with_exception(io::Error::from(io::ErrorKind::Other)));
    assert!(outcomes(&mock, 5).iter().all(|failed| *failed));
}

#[test]
fn timeout() {
    let mock = Mock::new("IService");
    mock.configure_chaos(ChaosPolicy::new().with_timeout_millis(20));
    let start = Instant::now();
    mock.dispatch("Ping", &[], ResultKind::None).unwrap();
    assert!(start.elapsed() >= Duration::from_millis(20));
    assert_eq!(1, mock.chaos_statistics().timeout_triggered_count);
}

#[test]
fn failed_calls_are_recorded() {
    let mock = Mock::new("IService");
    mock.configure_chaos(reset_policy(5, 1.0));
    outcomes(&mock, 3);
    mock.verify("Ping", &[], Times::exactly(3)).unwrap();
}

#[test]
fn reset_statistics() {
    let mock = Mock::new("IService");
    mock.configure_chaos(reset_policy(9, 0.5));
    outcomes(&mock, 10);
    mock.reset_chaos_statistics();
    assert_eq!(ChaosStatistics::default(), mock.chaos_statistics());
}

#[test]
fn no_policy() {
    let mock = Mock::new("IService");
    outcomes(&mock, 3);
    assert_eq!(ChaosStatistics::default(), mock.chaos_statistics());
    mock.configure_chaos(reset_policy(9, 1.0));
    mock.clear_chaos();
    assert!(mock.dispatch("Ping", &[], ResultKind::None).is_ok());
}

#[test]
fn failure_rate_is_clamped() {
    assert_eq!(1.0, ChaosPolicy::new().with_failure_rate(1.5).failure_rate);
    assert_eq!(0.0, ChaosPolicy::new().with_failure_rate(-1.0).failure_rate);
    assert_eq!(0.0, ChaosPolicy::new().with_failure_rate(f64::NAN).failure_rate);
}
