use std::sync::Arc;

use crate::config::Config;
use crate::services::display::DisplaySink;
use crate::services::scheduler::{PollScheduler, SchedulerError, SchedulerState};
use crate::services::swipe::SwipeStatus;

/// Host-independent lifecycle hooks
pub trait Component {
    type Error;

    fn start(&self) -> Result<(), Self::Error>;
    fn stop(&self);
}

/// Polls the swipe service and forwards every update to a display sink
pub struct SwipeTracker {
    config: Config,
    scheduler: PollScheduler,
    sink: Arc<dyn DisplaySink>,
}

impl SwipeTracker {
    pub fn new(config: Config, scheduler: PollScheduler, sink: Arc<dyn DisplaySink>) -> Self {
        Self {
            config,
            scheduler,
            sink,
        }
    }

    /// Manual refresh; `false` when a fetch is already pending
    pub fn refresh_now(&self) -> bool {
        self.scheduler.refresh_now()
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    pub fn last_known_status(&self) -> Option<SwipeStatus> {
        self.scheduler.last_known_status()
    }

    pub fn state(&self) -> Option<SchedulerState> {
        self.scheduler.snapshot()
    }
}

impl Component for SwipeTracker {
    type Error = SchedulerError;

    fn start(&self) -> Result<(), SchedulerError> {
        let sink = Arc::clone(&self.sink);
        self.scheduler.start(
            self.config.poll_interval,
            self.config.swipe_endpoint.clone(),
            move |update| sink.on_update(update),
        )
    }

    fn stop(&self) {
        self.scheduler.stop();
    }
}
