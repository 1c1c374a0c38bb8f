use chrono::Utc;
use reqwest::Url;
use std::cell::Cell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::{Duration, Instant};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, MissedTickBehavior};

use super::state::SchedulerState;
use crate::services::metrics::FetchMetricsCollector;
use crate::services::swipe::{FetchError, SwipeStatus, TimeSource};

/// Receives every delivered fetch result, in completion order
pub type UpdateCallback = Arc<dyn Fn(Result<SwipeStatus, FetchError>) + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error("Scheduler is already running")]
    AlreadyRunning,
    #[error("Poll interval must be greater than zero")]
    InvalidInterval,
    #[error("No Tokio runtime available: {0}")]
    NoRuntime(String),
}

thread_local! {
    // Run currently invoking its callback on this thread (0 = none)
    static DELIVERING: Cell<usize> = const { Cell::new(0) };
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Periodic poller for a `TimeSource`
///
/// Cloning yields another handle to the same scheduler, so a display sink can
/// keep one and call `refresh_now()` or `stop()` from inside its callback.
/// At most one fetch is in flight at a time, across restarts too; extra
/// requests are dropped.
#[derive(Clone)]
pub struct PollScheduler {
    shared: Arc<Shared>,
}

struct Shared {
    source: Arc<dyn TimeSource>,
    timeout: Duration,
    metrics: Option<FetchMetricsCollector>,
    // Held until the fetch completes, even when its run was stopped
    in_flight: Arc<AtomicBool>,
    run: Mutex<Option<Arc<Run>>>,
}

impl Drop for Shared {
    fn drop(&mut self) {
        if let Some(run) = lock(&self.run).take() {
            run.shutdown();
        }
    }
}

/// One start/stop cycle. Late results from a finished run see `stopped` and are dropped.
struct Run {
    scheduler: Weak<Shared>,
    source: Arc<dyn TimeSource>,
    endpoint: Url,
    timeout: Duration,
    on_update: UpdateCallback,
    metrics: Option<FetchMetricsCollector>,
    runtime: Handle,
    state: Mutex<SchedulerState>,
    in_flight: Arc<AtomicBool>,
    stopped: AtomicBool,
    // Initial fetch blocked by a previous run's fetch; issued once that one ends
    deferred: AtomicBool,
    delivery: Mutex<()>,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl PollScheduler {
    pub fn new(source: Arc<dyn TimeSource>, timeout: Duration) -> Self {
        Self::build(source, timeout, None)
    }

    pub fn with_metrics(
        source: Arc<dyn TimeSource>,
        timeout: Duration,
        metrics: FetchMetricsCollector,
    ) -> Self {
        Self::build(source, timeout, Some(metrics))
    }

    fn build(
        source: Arc<dyn TimeSource>,
        timeout: Duration,
        metrics: Option<FetchMetricsCollector>,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                source,
                timeout,
                metrics,
                in_flight: Arc::new(AtomicBool::new(false)),
                run: Mutex::new(None),
            }),
        }
    }

    /// Begin polling `endpoint` every `interval`.
    ///
    /// One fetch is issued immediately; the first timer tick follows one full
    /// interval later. Must be called from within a Tokio runtime.
    pub fn start<F>(
        &self,
        interval: Duration,
        endpoint: Url,
        on_update: F,
    ) -> Result<(), SchedulerError>
    where
        F: Fn(Result<SwipeStatus, FetchError>) + Send + Sync + 'static,
    {
        if interval.is_zero() {
            return Err(SchedulerError::InvalidInterval);
        }

        let runtime =
            Handle::try_current().map_err(|e| SchedulerError::NoRuntime(e.to_string()))?;

        let mut slot = lock(&self.shared.run);
        if slot.is_some() {
            return Err(SchedulerError::AlreadyRunning);
        }

        let run = Arc::new(Run {
            scheduler: Arc::downgrade(&self.shared),
            source: Arc::clone(&self.shared.source),
            endpoint,
            timeout: self.shared.timeout,
            on_update: Arc::new(on_update),
            metrics: self.shared.metrics.clone(),
            runtime,
            state: Mutex::new(SchedulerState::default()),
            in_flight: Arc::clone(&self.shared.in_flight),
            stopped: AtomicBool::new(false),
            deferred: AtomicBool::new(false),
            delivery: Mutex::new(()),
            timer: Mutex::new(None),
        });

        tracing::info!(
            "[scheduler] Polling {} every {}s",
            run.endpoint,
            interval.as_secs_f64()
        );

        if !run.try_fetch() {
            tracing::debug!("[scheduler] Previous fetch still pending, deferring initial fetch");
            run.deferred.store(true, Ordering::SeqCst);
        }

        let ticking = Arc::clone(&run);
        let timer = run.runtime.spawn(async move {
            let mut ticker = interval_at(tokio::time::Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                ticking.try_fetch();
            }
        });
        *lock(&run.timer) = Some(timer);

        *slot = Some(run);
        Ok(())
    }

    /// Fetch now, outside the timer phase. Returns `false` when a fetch was
    /// already pending (the request is dropped) or the scheduler is not running.
    pub fn refresh_now(&self) -> bool {
        match self.current_run() {
            Some(run) => run.try_fetch(),
            None => {
                tracing::debug!("[scheduler] Refresh ignored, scheduler is not running");
                false
            }
        }
    }

    /// Cancel the timer and discard any fetch still in flight.
    ///
    /// Idempotent. When called from another thread while a callback is running,
    /// waits for that callback to return so none is delivered afterwards.
    pub fn stop(&self) {
        let Some(run) = lock(&self.shared.run).take() else {
            return;
        };

        run.shutdown();

        let run_id = run.id();
        if DELIVERING.with(|d| d.get()) != run_id {
            drop(lock(&run.delivery));
        }

        tracing::info!("[scheduler] Stopped polling {}", run.endpoint);
    }

    pub fn is_running(&self) -> bool {
        lock(&self.shared.run).is_some()
    }

    /// True while any fetch is outstanding, including one left over from a stopped run
    pub fn is_fetch_in_flight(&self) -> bool {
        self.shared.in_flight.load(Ordering::Acquire)
    }

    pub fn last_known_status(&self) -> Option<SwipeStatus> {
        self.current_run()
            .and_then(|run| lock(&run.state).last_known_status.clone())
    }

    pub fn last_error(&self) -> Option<FetchError> {
        self.current_run()
            .and_then(|run| lock(&run.state).last_error.clone())
    }

    /// Copy of the current run's state, `None` when not running
    pub fn snapshot(&self) -> Option<SchedulerState> {
        self.current_run().map(|run| lock(&run.state).clone())
    }

    fn current_run(&self) -> Option<Arc<Run>> {
        lock(&self.shared.run).clone()
    }
}

impl Run {
    fn id(self: &Arc<Self>) -> usize {
        Arc::as_ptr(self) as usize
    }

    fn shutdown(&self) {
        self.stopped.store(true, Ordering::SeqCst);
        if let Some(timer) = lock(&self.timer).take() {
            timer.abort();
        }
    }

    /// Spawn a fetch unless one is already in flight
    fn try_fetch(self: &Arc<Self>) -> bool {
        if self.stopped.load(Ordering::SeqCst) {
            return false;
        }

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("[scheduler] Fetch already in flight, dropping request");
            if let Some(metrics) = &self.metrics {
                metrics.record_coalesced();
            }
            return false;
        }

        let run = Arc::clone(self);
        self.runtime.spawn(async move {
            run.fetch_and_deliver().await;
        });
        true
    }

    async fn fetch_and_deliver(self: Arc<Self>) {
        let in_flight = InFlightGuard(&self.in_flight);
        let started = Instant::now();

        let result = self.source.fetch(&self.endpoint, self.timeout).await;
        let elapsed = started.elapsed();

        let delivery = lock(&self.delivery);

        if self.stopped.load(Ordering::SeqCst) {
            tracing::debug!("[scheduler] Discarding result that arrived after stop");
            if let Some(metrics) = &self.metrics {
                metrics.record_discarded();
            }
            drop(delivery);
            drop(in_flight);
            self.resume_successor();
            return;
        }

        if let Some(metrics) = &self.metrics {
            metrics.record_result(&result, elapsed);
        }

        match &result {
            Ok(status) => tracing::info!(
                "[scheduler] Update -> status: {}, total hours: {}",
                status.presence(),
                status.total_hours()
            ),
            Err(e) => tracing::warn!("[scheduler] Fetch failed: {}", e),
        }

        lock(&self.state).record(&result, Utc::now());

        // Free the slot before the callback so it may call refresh_now().
        drop(in_flight);

        let _marker = DeliveringMarker::enter(self.id());
        (self.on_update)(result);
        drop(delivery);
    }

    /// Issue the initial fetch a newer run had to defer while this one was in flight
    fn resume_successor(self: &Arc<Self>) {
        let Some(shared) = self.scheduler.upgrade() else {
            return;
        };
        let current = lock(&shared.run).clone();

        if let Some(next) = current {
            if !Arc::ptr_eq(&next, self) && next.deferred.swap(false, Ordering::SeqCst) {
                next.try_fetch();
            }
        }
    }
}

/// Clears the in-flight flag even if the fetch task is cancelled or panics
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

struct DeliveringMarker {
    previous: usize,
}

impl DeliveringMarker {
    fn enter(run_id: usize) -> Self {
        let previous = DELIVERING.with(|d| d.replace(run_id));
        Self { previous }
    }
}

impl Drop for DeliveringMarker {
    fn drop(&mut self) {
        DELIVERING.with(|d| d.set(self.previous));
    }
}
