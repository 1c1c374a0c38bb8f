use std::sync::Arc;

use dock_swipe_tracker::config::Config;
use dock_swipe_tracker::modules::metrics::metrics_routes;
use dock_swipe_tracker::services::display::LogSink;
use dock_swipe_tracker::services::metrics::{FetchMetricsCollector, PollMetrics};
use dock_swipe_tracker::services::scheduler::PollScheduler;
use dock_swipe_tracker::services::swipe::HttpSwipeClient;
use dock_swipe_tracker::services::tracker::{Component, SwipeTracker};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dock_swipe_tracker=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let metrics = PollMetrics::new()?;
    let scheduler = PollScheduler::with_metrics(
        Arc::new(HttpSwipeClient::new()),
        config.request_timeout,
        FetchMetricsCollector::new(metrics.clone()),
    );

    if let Some(addr) = config.metrics_addr {
        let app = metrics_routes(metrics.clone(), scheduler.clone());
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Metrics server running on http://{}", addr);
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("Metrics server error: {}", e);
            }
        });
    }

    let sink = Arc::new(LogSink::new(config.daily_target_hours));
    let tracker = SwipeTracker::new(config, scheduler, sink);
    tracker.start()?;

    wait_for_shutdown(&tracker).await;

    tracker.stop();
    Ok(())
}

/// Block until Ctrl-C or SIGTERM. On unix, SIGUSR1 triggers a manual refresh.
async fn wait_for_shutdown(tracker: &SwipeTracker) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let (mut sigterm, mut sigusr1) = match (
            signal(SignalKind::terminate()),
            signal(SignalKind::user_defined1()),
        ) {
            (Ok(term), Ok(usr1)) => (term, usr1),
            _ => {
                tracing::warn!("Failed to register signal handlers, waiting for Ctrl-C only");
                tokio::signal::ctrl_c().await.ok();
                return;
            }
        };

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Received SIGINT, shutting down");
                    return;
                }
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM, shutting down");
                    return;
                }
                _ = sigusr1.recv() => {
                    if !tracker.refresh_now() {
                        tracing::info!("Refresh requested while a fetch is pending, skipped");
                    }
                }
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tracker;
        tokio::signal::ctrl_c().await.ok();
        tracing::info!("Received Ctrl-C, shutting down");
    }
}
