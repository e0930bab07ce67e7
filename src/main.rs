/*!
 * Cooperative Scheduler - Demo Entry Point
 *
 * Runs two scenarios on real threads and prints the observed session order:
 * - round robin: 1 processor, 3 equal-priority processes
 * - multiprocessor: 2 processors, one process holding its processor for a long session
 */

use anyhow::{Context, Result};
use coop_sched::{init_tracing, EventCollector, Pid, ProcessScheduler, Scheduler, SchedulerConfig};
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::info;

/// One simulated process: start, yield twice, terminate
struct ProcessSim {
    pid: Pid,
    first_session: Duration,
    launch_delay: Duration,
}

fn run_process<S>(scheduler: &S, sim: &ProcessSim, sessions: &Mutex<Vec<String>>) -> Result<()>
where
    S: ProcessScheduler + ?Sized,
{
    let record = |session: u32| sessions.lock().push(format!("pid={}, session={}", sim.pid, session));

    scheduler.start(sim.pid)?;
    record(0);
    thread::sleep(sim.first_session);

    scheduler.schedule(sim.pid)?;
    record(1);

    scheduler.schedule(sim.pid)?;
    record(2);

    scheduler.terminate(sim.pid)?;
    Ok(())
}

fn run_scenario(name: &str, processors: usize, plan: &[(u32, u64, u64)]) -> Result<()> {
    info!(scenario = name, processors, "running scenario");

    let collector = Arc::new(EventCollector::new());
    let mut config = SchedulerConfig::from_env().context("reading scheduler configuration")?;
    config.processors = processors;
    let scheduler = Scheduler::with_config(config)?.with_collector(Arc::clone(&collector));
    let sessions = Arc::new(Mutex::new(Vec::new()));

    let handles = plan
        .iter()
        .map(|&(priority, first_session_ms, launch_delay_ms)| {
            let sim = ProcessSim {
                pid: scheduler.register(priority)?,
                first_session: Duration::from_millis(first_session_ms),
                launch_delay: Duration::from_millis(launch_delay_ms),
            };
            thread::sleep(sim.launch_delay);
            let scheduler = scheduler.clone();
            let sessions = Arc::clone(&sessions);
            thread::Builder::new()
                .name(format!("proc-{}", sim.pid))
                .spawn(move || run_process(&scheduler, &sim, &sessions))
                .context("spawning process thread")
        })
        .collect::<Result<Vec<_>>>()?;

    for handle in handles {
        handle
            .join()
            .map_err(|_| anyhow::anyhow!("process thread panicked"))??;
    }

    println!("\n== {} ({} processor(s))", name, processors);
    for session in sessions.lock().iter() {
        println!("  {}", session);
    }
    println!("  transitions recorded: {}", collector.pending());
    println!("  stats: {}", serde_json::to_string(&scheduler.stats())?);
    Ok(())
}

fn main() -> Result<()> {
    // Initialize structured tracing
    init_tracing();

    info!("Cooperative scheduler demo starting...");

    // (priority, first session ms, delay before launch ms)
    run_scenario("round robin", 1, &[(1, 150, 0), (1, 0, 50), (1, 0, 50)])?;
    run_scenario("multiprocessor", 2, &[(1, 250, 0), (1, 50, 20), (1, 0, 25)])?;

    info!("demo complete");
    Ok(())
}
