pub mod config;
pub mod modules;
pub mod services;

pub use services::display::{DisplaySink, LogSink, StatusSummary};
pub use services::scheduler::{PollScheduler, SchedulerError, SchedulerState};
pub use services::swipe::{FetchError, HttpSwipeClient, Presence, SwipeStatus, TimeSource};
pub use services::tracker::{Component, SwipeTracker};
