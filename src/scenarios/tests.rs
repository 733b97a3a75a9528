//! Tests for the scenario payloads and driver.

use super::*;
use crate::config::Config;
use crate::guard::{Guard, LocalGuard, NamedGuard, Timeout};
use serial_test::serial;
use std::sync::Barrier;
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;

fn test_config(temp_dir: &TempDir) -> Config {
    Config {
        lock_dir: Some(temp_dir.path().join("locks")),
        attempt_timeout_ms: 50,
        counter_workers: 200,
        ..Config::default()
    }
}

fn run_to_string(scenario: Scenario, config: &Config) -> String {
    let mut out = Vec::new();
    run_scenario(scenario, config, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_critical_section() {
    let guard = LocalGuard::new("cs");
    assert_eq!(critical_section(&guard).unwrap(), CRITICAL_SECTION_MESSAGE);
    assert!(!guard.is_held());
}

#[test]
fn test_counter_no_lost_updates() {
    const N: u64 = 1000;
    let counter = Counter::new(LocalGuard::new("counter"));

    thread::scope(|s| {
        for _ in 0..N {
            s.spawn(|| counter.increment().unwrap());
        }
    });

    assert_eq!(counter.get().unwrap(), N);
}

#[test]
fn test_resource_desk() {
    let desk = ResourceDesk::new(LocalGuard::new("desk"));
    assert_eq!(desk.access("ana").unwrap(), "ana accessed the resource");
}

#[test]
#[serial]
fn test_timed_attempt() {
    let guard = LocalGuard::new("timed");
    let wait = Duration::from_millis(60);

    assert_eq!(timed_attempt(&guard, wait).unwrap(), AttemptOutcome::Entered);
    assert!(!guard.is_held());

    let _held = guard.hold(Timeout::Infinite).unwrap().unwrap();
    let start = Instant::now();
    assert_eq!(
        timed_attempt(&guard, wait).unwrap(),
        AttemptOutcome::TimedOut
    );
    assert!(start.elapsed() >= wait);

    assert_eq!(AttemptOutcome::Entered.to_string(), "entered successfully");
}

#[test]
fn test_stock_three_of_five_succeed() {
    let stock = Stock::new(LocalGuard::new("stock"), 3);
    let barrier = &Barrier::new(5);
    let stock_ref = &stock;

    let outcomes: Vec<Purchase> = thread::scope(|s| {
        let handles: Vec<_> = (1..=5)
            .map(|i| {
                s.spawn(move || {
                    barrier.wait();
                    stock_ref.purchase(&format!("customer{}", i)).unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let bought = outcomes
        .iter()
        .filter(|p| matches!(p, Purchase::Bought { .. }))
        .count();
    let out_of_stock = outcomes
        .iter()
        .filter(|p| **p == Purchase::OutOfStock)
        .count();
    assert_eq!(bought, 3);
    assert_eq!(out_of_stock, 2);
    assert_eq!(stock.remaining().unwrap(), 0);

    // Every remaining count from 2 down to 0 was handed out exactly once.
    let mut remaining: Vec<u32> = outcomes
        .iter()
        .filter_map(|p| match p {
            Purchase::Bought { remaining } => Some(*remaining),
            Purchase::OutOfStock => None,
        })
        .collect();
    remaining.sort_unstable();
    assert_eq!(remaining, vec![0, 1, 2]);
}

#[test]
fn test_purchase_describe() {
    assert_eq!(
        Purchase::Bought { remaining: 2 }.describe("bo"),
        "bo bought one, remaining stock: 2"
    );
    assert_eq!(
        Purchase::OutOfStock.describe("bo"),
        "bo could not buy: out of stock"
    );
}

#[test]
fn test_queue_is_fifo() {
    let queue = WorkQueue::new(LocalGuard::new("queue"));
    assert!(queue.is_empty().unwrap());

    queue.enqueue("A").unwrap();
    queue.enqueue("B").unwrap();
    assert_eq!(queue.len().unwrap(), 2);

    assert_eq!(queue.dequeue().unwrap(), Some("A"));
    assert_eq!(queue.dequeue().unwrap(), Some("B"));
    assert_eq!(queue.dequeue().unwrap(), None);
}

#[test]
fn test_producer_consumer_single_item() {
    let queue: WorkQueue<i64, _> = WorkQueue::new(LocalGuard::new("mailbox"));

    // Consuming before anything was produced finds the queue empty.
    assert_eq!(queue.dequeue().unwrap(), None);

    queue.enqueue(123).unwrap();

    let queue_ref = &queue;
    let barrier = &Barrier::new(4);
    let results: Vec<Option<i64>> = thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                s.spawn(move || {
                    barrier.wait();
                    queue_ref.dequeue().unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let consumed: Vec<i64> = results.iter().flatten().copied().collect();
    assert_eq!(consumed, vec![123]);
    assert_eq!(results.iter().filter(|r| r.is_none()).count(), 3);
}

#[test]
fn test_resettable_value() {
    let value = ResettableValue::new(LocalGuard::new("reset"), 100);
    assert_eq!(value.get().unwrap(), 100);
    assert_eq!(value.reset().unwrap(), 0);
    assert_eq!(value.get().unwrap(), 0);
}

#[test]
fn test_journal_appends_lines_under_named_guard() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("logs").join("journal.log");
    let guard = NamedGuard::open(temp_dir.path(), "journal").unwrap();
    let journal = Journal::new(&path, guard);

    thread::scope(|s| {
        for i in 0..20 {
            let journal = &journal;
            s.spawn(move || journal.append(&format!("entry {}", i)).unwrap());
        }
    });

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 20);
    assert!(lines.iter().all(|l| l.starts_with("entry ")));
}

#[test]
fn test_console_log_writes_whole_lines() {
    let log = ConsoleLog::new(LocalGuard::new("log"), Vec::<u8>::new());

    thread::scope(|s| {
        for i in 0..10 {
            let log = &log;
            s.spawn(move || log.log(&format!("from thread {}", i)).unwrap());
        }
    });

    let text = String::from_utf8(log.into_inner()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 10);
    for line in lines {
        assert!(line.starts_with("[log] "));
        assert!(line.contains(": from thread "));
    }
}

#[test]
fn test_scenario_numbering() {
    assert_eq!(Scenario::from_number(0), None);
    assert_eq!(Scenario::from_number(1), Some(Scenario::CriticalSection));
    assert_eq!(Scenario::from_number(11), Some(Scenario::SingleInstance));
    assert_eq!(Scenario::from_number(12), None);

    for (i, scenario) in Scenario::ALL.iter().enumerate() {
        assert_eq!(usize::from(scenario.number()), i + 1);
        assert!(!scenario.title().is_empty());
    }
}

#[test]
fn test_driver_counter_output() {
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(&temp_dir);

    let output = run_to_string(Scenario::Counter, &config);
    assert!(output.starts_with("---------- Scenario 2: counter ----------"));
    assert!(output.contains("final count: 200"));
}

#[test]
fn test_driver_stock_output() {
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(&temp_dir);

    let output = run_to_string(Scenario::Stock, &config);
    assert_eq!(output.matches("bought one").count(), 3);
    assert_eq!(output.matches("out of stock").count(), 2);
}

#[test]
fn test_driver_producer_consumer_output() {
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(&temp_dir);

    let output = run_to_string(Scenario::ProducerConsumer, &config);
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines[1], "queue empty");
    assert_eq!(lines[2], "producing 123");
    assert_eq!(output.matches("consumed: 123").count(), 1);
    assert_eq!(output.matches("queue empty").count(), 3);
}

#[test]
fn test_driver_timed_attempt_output() {
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(&temp_dir);

    let output = run_to_string(Scenario::TimedAttempt, &config);
    assert!(output.contains("free guard: entered successfully"));
    assert!(output.contains("held guard: timed out waiting for the guard"));
}

#[test]
fn test_driver_single_instance_output() {
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(&temp_dir);

    let output = run_to_string(Scenario::SingleInstance, &config);
    assert!(output.contains("first instance: acquired, no other instance running"));
    assert!(output.contains("second instance: another instance is already running"));

    // Both handles were dropped, so the guard is free again.
    let (_guard, fresh) = NamedGuard::try_create(
        &config.lock_dir(),
        driver::SINGLE_INSTANCE_GUARD_NAME,
    )
    .unwrap();
    assert!(fresh);
}

#[test]
fn test_driver_journal_writes_file() {
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(&temp_dir);

    let output = run_to_string(Scenario::Journal, &config);
    assert!(output.contains("line appended to"));

    let content = std::fs::read_to_string(config.journal_file()).unwrap();
    assert!(content.contains(&format!("pid {}", std::process::id())));
}

#[test]
fn test_run_all_prints_every_banner() {
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(&temp_dir);

    let mut out = Vec::new();
    run_all(&config, &mut out).unwrap();
    let output = String::from_utf8(out).unwrap();

    for scenario in Scenario::ALL {
        let banner = format!(
            "---------- Scenario {}: {} ----------",
            scenario.number(),
            scenario.title()
        );
        assert!(output.contains(&banner), "missing banner: {}", banner);
    }
    assert!(output.contains("dequeued: A"));
    assert!(output.contains("resource reset, current value: 0"));
    assert_eq!(output.matches("[log] ").count(), 2);
}
