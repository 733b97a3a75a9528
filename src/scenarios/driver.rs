//! Runs the scenarios with worker threads and prints their results.

use super::access::{ResourceDesk, critical_section, timed_attempt};
use super::counter::{Counter, ResettableValue};
use super::journal::{ConsoleLog, Journal};
use super::queue::WorkQueue;
use super::stock::Stock;
use crate::config::Config;
use crate::error::{GuardError, Result};
use crate::guard::{Guard, LocalGuard, NamedGuard};
use std::io::Write;
use std::thread;

/// Named guard serializing journal appends across processes.
pub const JOURNAL_GUARD_NAME: &str = "muxguard-journal";

/// Named guard used by the single-instance scenario.
pub const SINGLE_INSTANCE_GUARD_NAME: &str = "muxguard-single-instance";

/// The runnable scenarios, numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    CriticalSection,
    Counter,
    ResourceAccess,
    Journal,
    Queue,
    Logger,
    TimedAttempt,
    Stock,
    ProducerConsumer,
    Reset,
    SingleInstance,
}

impl Scenario {
    pub const ALL: [Scenario; 11] = [
        Scenario::CriticalSection,
        Scenario::Counter,
        Scenario::ResourceAccess,
        Scenario::Journal,
        Scenario::Queue,
        Scenario::Logger,
        Scenario::TimedAttempt,
        Scenario::Stock,
        Scenario::ProducerConsumer,
        Scenario::Reset,
        Scenario::SingleInstance,
    ];

    /// Look a scenario up by its 1-based number.
    pub fn from_number(number: u8) -> Option<Self> {
        let index = usize::from(number).checked_sub(1)?;
        Self::ALL.get(index).copied()
    }

    pub fn number(&self) -> u8 {
        Self::ALL
            .iter()
            .position(|s| s == self)
            .map(|i| i as u8 + 1)
            .unwrap_or(0)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Scenario::CriticalSection => "critical section",
            Scenario::Counter => "counter",
            Scenario::ResourceAccess => "resource access",
            Scenario::Journal => "journal file",
            Scenario::Queue => "queue",
            Scenario::Logger => "logger",
            Scenario::TimedAttempt => "timed attempt",
            Scenario::Stock => "bounded stock",
            Scenario::ProducerConsumer => "producer-consumer",
            Scenario::Reset => "reset",
            Scenario::SingleInstance => "single instance",
        }
    }
}

/// Run every scenario in order.
pub fn run_all<W: Write + Send>(config: &Config, out: &mut W) -> Result<()> {
    for scenario in Scenario::ALL {
        run_scenario(scenario, config, out)?;
    }
    Ok(())
}

/// Run one scenario, printing a banner and its results to `out`.
pub fn run_scenario<W: Write + Send>(
    scenario: Scenario,
    config: &Config,
    out: &mut W,
) -> Result<()> {
    tracing::debug!(scenario = scenario.title(), "running scenario");
    emit(
        out,
        &format!(
            "---------- Scenario {}: {} ----------",
            scenario.number(),
            scenario.title()
        ),
    )?;

    match scenario {
        Scenario::CriticalSection => {
            let guard = local_guard(config, "critical-section");
            emit(out, critical_section(&guard)?)?;
        }
        Scenario::Counter => {
            let counter = Counter::new(local_guard(config, "counter"));
            thread::scope(|s| -> Result<()> {
                let workers: Vec<_> = (0..config.counter_workers)
                    .map(|_| s.spawn(|| counter.increment()))
                    .collect();
                for worker in workers {
                    join(worker)??;
                }
                Ok(())
            })?;
            emit(out, &format!("final count: {}", counter.get()?))?;
        }
        Scenario::ResourceAccess => {
            let desk = ResourceDesk::new(local_guard(config, "resource"));
            let lines = run_workers(5, |i| desk.access(&format!("user{}", i)))?;
            for line in lines {
                emit(out, &line)?;
            }
        }
        Scenario::Journal => {
            let guard = NamedGuard::open_with(
                &config.lock_dir(),
                JOURNAL_GUARD_NAME,
                config.poll_interval(),
            )?;
            let journal = Journal::new(config.journal_file(), guard);
            journal.append(&format!(
                "line written under guard by pid {}",
                std::process::id()
            ))?;
            emit(
                out,
                &format!("line appended to '{}'", journal.path().display()),
            )?;
        }
        Scenario::Queue => {
            let queue = WorkQueue::new(local_guard(config, "queue"));
            queue.enqueue("A")?;
            queue.enqueue("B")?;
            let item = queue.dequeue()?;
            emit(out, &format!("dequeued: {}", item.unwrap_or("<empty>")))?;
        }
        Scenario::Logger => {
            let log = ConsoleLog::new(local_guard(config, "logger"), &mut *out);
            run_workers(2, |i| log.log(&format!("from thread {}", i)))?;
        }
        Scenario::TimedAttempt => {
            let guard = local_guard(config, "timed");
            let wait = config.attempt_timeout();
            emit(out, &format!("free guard: {}", timed_attempt(&guard, wait)?))?;

            let _held = guard.hold_blocking()?;
            emit(out, &format!("held guard: {}", timed_attempt(&guard, wait)?))?;
        }
        Scenario::Stock => {
            let stock = Stock::new(local_guard(config, "stock"), config.initial_stock);
            let lines = run_workers(5, |i| {
                let customer = format!("customer{}", i);
                Ok(stock.purchase(&customer)?.describe(&customer))
            })?;
            for line in lines {
                emit(out, &line)?;
            }
        }
        Scenario::ProducerConsumer => {
            let queue: WorkQueue<i64, _> = WorkQueue::new(local_guard(config, "mailbox"));

            // The consumer runs to completion before anything is produced.
            let early = run_workers(1, |_| consume(&queue))?;
            for line in early {
                emit(out, &line)?;
            }

            emit(out, "producing 123")?;
            queue.enqueue(123)?;

            for line in run_workers(3, |_| consume(&queue))? {
                emit(out, &line)?;
            }
        }
        Scenario::Reset => {
            let value = ResettableValue::new(local_guard(config, "reset"), 100);
            emit(out, &format!("value before reset: {}", value.get()?))?;
            emit(
                out,
                &format!("resource reset, current value: {}", value.reset()?),
            )?;
        }
        Scenario::SingleInstance => {
            let lock_dir = config.lock_dir();
            let (_first, first_fresh) = NamedGuard::try_create_with(
                &lock_dir,
                SINGLE_INSTANCE_GUARD_NAME,
                config.poll_interval(),
            )?;
            emit(out, &describe_instance("first instance", first_fresh))?;

            let (_second, second_fresh) = NamedGuard::try_create_with(
                &lock_dir,
                SINGLE_INSTANCE_GUARD_NAME,
                config.poll_interval(),
            )?;
            emit(out, &describe_instance("second instance", second_fresh))?;
        }
    }

    emit(out, "")
}

fn local_guard(config: &Config, label: &str) -> LocalGuard {
    LocalGuard::with_policy(label, config.release_policy)
}

fn consume<G: Guard>(queue: &WorkQueue<i64, G>) -> Result<String> {
    Ok(match queue.dequeue()? {
        Some(value) => format!("consumed: {}", value),
        None => "queue empty".to_string(),
    })
}

fn describe_instance(label: &str, fresh: bool) -> String {
    if fresh {
        format!("{}: acquired, no other instance running", label)
    } else {
        format!("{}: another instance is already running", label)
    }
}

/// Run `count` scoped worker threads numbered from 1, returning results in
/// worker order.
fn run_workers<T, F>(count: usize, work: F) -> Result<Vec<T>>
where
    T: Send,
    F: Fn(usize) -> Result<T> + Sync,
{
    thread::scope(|s| {
        let work = &work;
        let handles: Vec<_> = (1..=count).map(|i| s.spawn(move || work(i))).collect();
        handles
            .into_iter()
            .map(|h| join(h).and_then(|result| result))
            .collect()
    })
}

fn join<T>(handle: thread::ScopedJoinHandle<'_, T>) -> Result<T> {
    handle
        .join()
        .map_err(|_| GuardError::UserError("scenario worker thread panicked".to_string()))
}

fn emit<W: Write + ?Sized>(out: &mut W, line: &str) -> Result<()> {
    writeln!(out, "{}", line)
        .map_err(|e| GuardError::UserError(format!("failed to write output: {}", e)))
}
