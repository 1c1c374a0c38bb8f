pub mod state;
pub mod poller;

pub use state::SchedulerState;
pub use poller::{PollScheduler, SchedulerError, UpdateCallback};
