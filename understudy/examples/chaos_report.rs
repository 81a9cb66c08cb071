// vim: tw=80
//! Show which calls a seeded chaos policy fails
//!
//! Run with an optional seed and call count, for example
//! `cargo run --example chaos_report -- 42 20`.  Set `RUST_LOG=debug` to
//! watch each injected fault as it happens.  The same seed always fails the
//! same calls.
#![deny(warnings)]

use std::{env, io};
use tracing_subscriber::EnvFilter;
use understudy::*;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);
    let calls = args.next().and_then(|s| s.parse().ok()).unwrap_or(20usize);

    let gateway = Mock::builder("IPaymentGateway")
        .chaos(ChaosPolicy::new()
            .with_seed(seed)
            .with_failure_rate(0.3)
            .with_exception(io::Error::from(io::ErrorKind::ConnectionReset))
            .with_exception(io::Error::from(io::ErrorKind::TimedOut)))
        .build();
    gateway.setup("Charge", vec![ArgumentSpec::any_of(ValueType::Int)])
        .returns(true);

    for amount in 0..calls {
        let amount = i64::try_from(amount).unwrap_or(i64::MAX);
        match gateway.dispatch("Charge", &[amount.into()], ValueType::Bool) {
            Ok(outcome) => println!("{:>4}: {:?}", amount, outcome),
            Err(e) => println!("{:>4}: failed: {}", amount, e),
        }
    }

    let stats = gateway.chaos_statistics();
    println!("seed {}: {} of {} calls failed", seed,
             stats.chaos_triggered_count, stats.total_invocations);
}
