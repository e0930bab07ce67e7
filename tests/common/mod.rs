/*!
 * Process Simulation Harness
 * Drives the scheduler from one thread per simulated process and records session order
 */

#![allow(dead_code)]

use coop_sched::{Pid, Priority, ProcessScheduler, Scheduler};
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// How long a trace may take before the test gives up
pub const TRACE_TIMEOUT: Duration = Duration::from_secs(5);

/// One process in a scenario
#[derive(Debug, Clone, Copy)]
pub struct Plan {
    pub priority: Priority,
    /// Sleep while holding the processor after start()
    pub first_session_ms: u64,
    /// Delay after the previous process was launched
    pub launch_delay_ms: u64,
}

pub const fn plan(priority: Priority, first_session_ms: u64, launch_delay_ms: u64) -> Plan {
    Plan {
        priority,
        first_session_ms,
        launch_delay_ms,
    }
}

/// start, record session 0, sleep, schedule, record 1, schedule, record 2, terminate
pub fn run_process<S>(scheduler: &S, pid: Pid, first_session: Duration, events: &Mutex<Vec<String>>)
where
    S: ProcessScheduler + ?Sized,
{
    scheduler.start(pid).unwrap();
    events.lock().push(session(pid, 0));
    thread::sleep(first_session);

    scheduler.schedule(pid).unwrap();
    events.lock().push(session(pid, 1));

    scheduler.schedule(pid).unwrap();
    events.lock().push(session(pid, 2));

    scheduler.terminate(pid).unwrap();
}

pub fn session(pid: Pid, session: u32) -> String {
    format!("pid={}, session={}", pid, session)
}

/// Expected trace from (pid, session) pairs
pub fn expected(pairs: &[(Pid, u32)]) -> Vec<String> {
    pairs.iter().map(|&(pid, s)| session(pid, s)).collect()
}

/// Register every planned process, launch them with the planned delays and
/// return the recorded session order once all have terminated
pub fn run_trace(scheduler: &Scheduler, plans: &[Plan]) -> Vec<String> {
    let pids: Vec<Pid> = plans.iter().map(|p| scheduler.register(p.priority).unwrap()).collect();
    let events = Arc::new(Mutex::new(Vec::new()));

    let handles: Vec<_> = plans
        .iter()
        .zip(pids)
        .map(|(p, pid)| {
            thread::sleep(Duration::from_millis(p.launch_delay_ms));
            let scheduler = scheduler.clone();
            let events = Arc::clone(&events);
            let first_session = Duration::from_millis(p.first_session_ms);
            thread::spawn(move || run_process(&scheduler, pid, first_session, &events))
        })
        .collect();

    let deadline = Instant::now() + TRACE_TIMEOUT;
    for handle in handles {
        while !handle.is_finished() {
            assert!(Instant::now() < deadline, "process threads did not finish");
            thread::sleep(Duration::from_millis(5));
        }
        handle.join().unwrap();
    }

    let trace = events.lock().clone();
    trace
}

/// Spin until exactly `n` processes are parked in ready queues
pub fn wait_for_waiters(scheduler: &Scheduler, n: usize) {
    let deadline = Instant::now() + TRACE_TIMEOUT;
    while scheduler.waiting_count() != n {
        assert!(Instant::now() < deadline, "expected {} waiters", n);
        thread::sleep(Duration::from_millis(1));
    }
}
