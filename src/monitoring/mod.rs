/*!
 * Monitoring Module
 * Tracing setup and the scheduler event stream
 */

pub mod events;
pub mod tracer;

pub use events::{EventCollector, SchedulerEvent};
pub use tracer::init_tracing;
