// vim: tw=80
//! Mocks may be shared among threads.

use std::{
    sync::{Arc, Barrier},
    thread
};
use understudy::*;

const THREADS: usize = 8;
const CALLS: usize = 50;

fn hammer<F>(f: F)
    where F: Fn(usize) + Send + Sync + 'static
{
    let f = Arc::new(f);
    let barrier = Arc::new(Barrier::new(THREADS));
    let handles = (0..THREADS).map(|i| {
        let f = f.clone();
        let barrier = barrier.clone();
        thread::spawn(move || {
            barrier.wait();
            f(i);
        })
    }).collect::<Vec<_>>();
    for h in handles {
        h.join().unwrap();
    }
}

#[test_log::test]
fn no_lost_invocations() {
    let mock = Mock::new("ICounter");
    let setup = mock.setup("Bump", vec![ArgumentSpec::any()]).clone();
    let m = mock.clone();
    hammer(move |i| {
        for _ in 0..CALLS {
            m.dispatch("Bump", &[i.to_string().into()], ResultKind::None)
                .unwrap();
        }
    });
    assert_eq!(THREADS * CALLS, mock.invocations().len());
    assert_eq!(THREADS * CALLS, setup.call_count());
    mock.verify("Bump", &[ArgumentSpec::eq("3")], Times::exactly(CALLS))
        .unwrap();
}

#[test]
fn sequential_returns_are_not_duplicated() {
    let mock = Mock::new("ITickets");
    let n = THREADS * 4;
    mock.setup("Take", vec![]).returns_sequence(0..n as i32);
    let taken = Arc::new(std::sync::Mutex::new(Vec::new()));
    let (m, t) = (mock.clone(), taken.clone());
    hammer(move |_| {
        for _ in 0..3 {
            let v = m.dispatch("Take", &[], ValueType::Int).unwrap();
            t.lock().unwrap().push(v.into_value().unwrap().as_int().unwrap());
        }
    });
    let mut taken = taken.lock().unwrap().clone();
    taken.sort_unstable();
    let expected = (0..(THREADS * 3) as i64).collect::<Vec<_>>();
    assert_eq!(expected, taken);
}

#[test]
fn nested_mock_created_once() {
    let order = Mock::builder("IOrder")
        .default_value(DefaultValue::Mock)
        .build();
    let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
    let (o, s) = (order.clone(), seen.clone());
    hammer(move |_| {
        let v = o.dispatch("get_Customer", &[],
                           ValueType::interface("ICustomer"))
            .unwrap()
            .into_value()
            .unwrap();
        s.lock().unwrap().push(v);
    });
    let seen = seen.lock().unwrap();
    assert_eq!(THREADS, seen.len());
    assert!(seen.iter().all(|v| *v == seen[0]));
}

#[test]
fn seeded_chaos_counts_every_call() {
    let mock = Mock::new("IService");
    mock.configure_chaos(ChaosPolicy::new()
        .with_seed(42)
        .with_failure_rate(0.3)
        .with_exception(std::io::Error::from(std::io::ErrorKind::Other)));
    let m = mock.clone();
    hammer(move |_| {
        for _ in 0..CALLS {
            let _ = m.dispatch("Ping", &[], ResultKind::None);
        }
    });
    let stats = mock.chaos_statistics();
    assert_eq!((THREADS * CALLS) as u64, stats.total_invocations);
    assert_eq!(THREADS * CALLS, mock.invocations().len());
}

#[test]
fn cross_thread_sequence() {
    let seq = Sequence::new();
    let mock = Mock::new("IPipeline");
    mock.setup("Stage", vec![ArgumentSpec::eq(0)]).in_sequence(&seq);
    mock.setup("Stage", vec![ArgumentSpec::eq(1)]).in_sequence(&seq);
    let m = mock.clone();
    thread::spawn(move || {
        m.dispatch("Stage", &[0.into()], ResultKind::None).unwrap();
    }).join().unwrap();
    mock.dispatch("Stage", &[1.into()], ResultKind::None).unwrap();
    assert_eq!(2, seq.expected_step());
}
