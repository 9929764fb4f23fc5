//! Periodic fetch of the status endpoint.
//!
//! The poller holds the latest successfully fetched snapshot and only ever
//! replaces it whole. Failed polls leave it untouched.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use futures::future::{abortable, AbortHandle};
use log::{debug, info, warn};
use reqwest::{
    header::{CACHE_CONTROL, PRAGMA},
    Client,
};
use tokio::{
    sync::watch,
    time::{interval, MissedTickBehavior},
};

use crate::structures::{errors::DashboardError, model::Snapshot};

/// `None` until the first successful poll.
pub type Latest = Option<Arc<Snapshot>>;

#[derive(Clone)]
pub struct Poller {
    client: Client,
    url: Arc<str>,
    interval: Duration,
    latest: Arc<watch::Sender<Latest>>,
    /// Cleared on teardown so late responses are dropped
    alive: Arc<AtomicBool>,
}

impl Poller {
    pub fn new(client: Client, url: impl Into<Arc<str>>, interval: Duration) -> Self {
        let (latest, _) = watch::channel(None);
        Self {
            client,
            url: url.into(),
            interval,
            latest: Arc::new(latest),
            alive: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Latest> {
        self.latest.subscribe()
    }

    /// Fetch once and replace the held snapshot on success.
    pub async fn poll_once(&self) -> Result<(), DashboardError> {
        let snapshot = fetch_snapshot(&self.client, &self.url).await?;
        if self.alive.load(Ordering::Acquire) {
            debug!(
                "status from {}: {} up, {} down",
                self.url, snapshot.summary.up_count, snapshot.summary.down_count
            );
            self.latest.send_replace(Some(Arc::new(snapshot)));
        } else {
            debug!("dropping status from {} after teardown", self.url);
        }
        Ok(())
    }

    /// Starts polling: once immediately, then every interval.
    ///
    /// Every tick spawns its own fetch, so a slow endpoint can have several
    /// requests in flight at once.
    pub fn spawn(self) -> PollerHandle {
        info!("Polling {} every {}s", self.url, self.interval.as_secs_f64());
        let alive = self.alive.clone();

        let (ticker, abort) = abortable(async move {
            let mut timer = interval(self.interval);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                // first tick completes immediately
                timer.tick().await;
                let poller = self.clone();
                actix_web::rt::spawn(async move {
                    if let Err(e) = poller.poll_once().await {
                        warn!("status fetch from {} failed: {}", poller.url, e);
                    }
                });
            }
        });
        actix_web::rt::spawn(ticker);

        PollerHandle { alive, abort }
    }
}

/// Owner of a running poller. Dropping it stops the polling.
pub struct PollerHandle {
    alive: Arc<AtomicBool>,
    abort: AbortHandle,
}

impl PollerHandle {
    /// Stops the timer. Requests already in flight finish, but their
    /// results are discarded.
    pub fn stop(&self) {
        if self.alive.swap(false, Ordering::AcqRel) {
            info!("Stopping status poller");
        }
        self.abort.abort();
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// `GET` the snapshot with caching disabled.
pub async fn fetch_snapshot(client: &Client, url: &str) -> Result<Snapshot, DashboardError> {
    let response = client
        .get(url)
        .header(CACHE_CONTROL, "no-store")
        .header(PRAGMA, "no-cache")
        .timeout(Duration::from_secs(10))
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(DashboardError::UpstreamStatus(status));
    }
    Ok(response.json::<Snapshot>().await?)
}
