use std::sync::Arc;
use std::time::Duration;

use roster_core::Revision;
use roster_util_error::FmtCompact as _;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, instrument, trace, warn};

use crate::api::TrustApi;
use crate::store::RosterStore;

const LOG_TARGET: &str = "roster::poller";

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);
/// Shorter intervals get raised to this
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Decides whether an observed revision calls for a refresh
///
/// Only a revision strictly above the cached one passes, and becomes the new
/// cached one. The cache starts out unknown, below every revision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RevisionGate {
    cached: Option<Revision>,
}

impl RevisionGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cached(&self) -> Option<Revision> {
        self.cached
    }

    pub fn observe(&mut self, revision: Revision) -> bool {
        if revision.is_newer_than(self.cached) {
            self.cached = Some(revision);
            true
        } else {
            false
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Newer revision, lists need a refresh
    Changed(Revision),
    Unchanged(Revision),
    /// Revision could not be fetched, cache untouched
    Failed,
}

/// Periodically checks the roster revision and refreshes both lists when
/// it moves
pub struct RevisionPoller {
    api: Arc<dyn TrustApi>,
    store: Arc<RosterStore>,
    gate: RevisionGate,
    interval: Duration,
    revision_tx: watch::Sender<Option<Revision>>,
}

impl RevisionPoller {
    pub fn new(api: Arc<dyn TrustApi>, store: Arc<RosterStore>, interval: Duration) -> Self {
        let (revision_tx, _) = watch::channel(None);
        if interval < MIN_POLL_INTERVAL {
            warn!(target: LOG_TARGET, ?interval, min = ?MIN_POLL_INTERVAL, "Poll interval too short, raising");
        }
        Self {
            api,
            store,
            gate: RevisionGate::new(),
            interval: interval.max(MIN_POLL_INTERVAL),
            revision_tx,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn cached(&self) -> Option<Revision> {
        self.gate.cached()
    }

    /// Get notified whenever the cached revision moves
    pub fn revision_subscribe(&self) -> watch::Receiver<Option<Revision>> {
        self.revision_tx.subscribe()
    }

    /// Fetch the revision and run it through the gate, without refreshing
    pub async fn poll_once(&mut self) -> PollOutcome {
        let revision = match self.api.fetch_revision().await {
            Ok(revision) => revision,
            Err(err) => {
                debug!(target: LOG_TARGET, err = %err.fmt_compact(), "Failed to fetch revision");
                return PollOutcome::Failed;
            }
        };

        if self.gate.observe(revision) {
            debug!(target: LOG_TARGET, %revision, "New revision");
            self.revision_tx.send_replace(Some(revision));
            PollOutcome::Changed(revision)
        } else {
            trace!(target: LOG_TARGET, %revision, "Revision unchanged");
            PollOutcome::Unchanged(revision)
        }
    }

    /// One poll, followed by a full refresh if the revision moved
    pub async fn tick(&mut self) -> PollOutcome {
        let outcome = self.poll_once().await;
        if let PollOutcome::Changed(_) = outcome {
            self.store.refresh_all().await;
        }
        outcome
    }

    /// Poll forever: right away, then every `interval`
    ///
    /// Refreshes run as separate tasks, so a slow list fetch does not hold up
    /// the next poll. Errors never end the loop.
    #[instrument(name = "revision-poller", skip(self), fields(interval = ?self.interval))]
    pub async fn run(mut self) {
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            trace!(target: LOG_TARGET, "Woke up");

            if let PollOutcome::Changed(_) = self.poll_once().await {
                let store = self.store.clone();
                tokio::spawn(async move {
                    store.refresh_all().await;
                });
            }
        }
    }
}
