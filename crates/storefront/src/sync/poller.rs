//! Periodic tracking refresh.
//!
//! Shipped orders are refreshed on a fixed period, five minutes unless configured
//! otherwise. The task is driven by [`tokio::time::interval_at`], so the first refresh
//! happens one full period after start. Stopping or dropping the [`PollerHandle`] ends
//! the task. Ticks never overlap: a slow round delays the next one.

use super::ShipmentSync;
use crate::model::OrderFilter;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(300);

/// Outcome of one refresh round.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PollReport {
    pub refreshed: usize,
    pub failed: usize,
}

pub struct TrackingPoller {
    sync: ShipmentSync,
    period: Duration,
}

impl TrackingPoller {
    pub fn new(sync: ShipmentSync, period: Duration) -> Self {
        Self { sync, period }
    }

    /// Refresh every shipped order that has not reached a terminal status.
    ///
    /// A failed refresh is logged and counted; the round carries on with the next order.
    pub async fn poll_once(&self) -> PollReport {
        let mut report = PollReport::default();
        let orders = match self
            .sync
            .orders()
            .list_orders(OrderFilter::awaiting_delivery())
            .await
        {
            Ok(orders) => orders,
            Err(e) => {
                warn!(error = %e, "Could not list orders to refresh");
                return report;
            }
        };

        for order in orders.iter().filter(|order| !order.status.is_terminal()) {
            match self.sync.refresh_tracking(order.id).await {
                Ok(_) => report.refreshed += 1,
                Err(e) => {
                    warn!(order_id = %order.id, error = %e, "Scheduled tracking refresh failed");
                    report.failed += 1;
                }
            }
        }
        report
    }

    /// Start the timer task.
    pub fn spawn(self) -> PollerHandle {
        let (stop, mut stopped) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + self.period, self.period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            info!(period_secs = self.period.as_secs(), "Tracking poller started");

            loop {
                tokio::select! {
                    // Fires on an explicit stop and when the handle is dropped.
                    _ = &mut stopped => break,
                    _ = ticker.tick() => {
                        let report = self.poll_once().await;
                        debug!(refreshed = report.refreshed, failed = report.failed, "Poll round done");
                    }
                }
            }
            info!("Tracking poller stopped");
        });

        PollerHandle {
            stop: Some(stop),
            task,
        }
    }
}

/// Owner of a running [`TrackingPoller`].
pub struct PollerHandle {
    stop: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Stop the poller and wait for an in-flight round to finish.
    pub async fn stop(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Err(e) = (&mut self.task).await {
            warn!(error = %e, "Tracking poller task ended abnormally");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carrier::mock::MockCarrier;
    use crate::carrier::PackageDimensions;
    use crate::clients::OrderClient;
    use crate::model::CarrierKind;
    use std::sync::Arc;

    fn idle_sync() -> ShipmentSync {
        let (actor, client) = crate::order_actor::new();
        tokio::spawn(actor.run(()));
        ShipmentSync::new(
            OrderClient::new(client),
            Arc::new(MockCarrier::new(CarrierKind::Shiprocket)),
            PackageDimensions::default(),
        )
    }

    #[tokio::test]
    async fn test_nothing_to_refresh_on_an_empty_store() {
        let poller = TrackingPoller::new(idle_sync(), DEFAULT_POLL_INTERVAL);
        assert_eq!(poller.poll_once().await, PollReport::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_the_handle_stops_the_task() {
        let handle = TrackingPoller::new(idle_sync(), DEFAULT_POLL_INTERVAL).spawn();
        let PollerHandle { stop, task } = handle;
        drop(stop);
        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .expect("poller exits once its handle is gone")
            .unwrap();
    }
}
