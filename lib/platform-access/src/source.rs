//! The process-wide identity source.
//!
//! `IdentitySource` is a single observable cell holding the latest
//! [`SessionReport`]. The application creates one at start-up with
//! [`IdentitySource::init`], hands clones to whoever needs them, and calls
//! [`IdentitySource::teardown`] on shutdown. Route guards only subscribe;
//! they never publish.
//!
//! The cell has latest-value semantics: a subscriber that falls behind sees
//! the most recent report, never an intermediate one it missed.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::SessionCheckFailed;
use crate::identity::Identity;
use crate::session::{SessionReport, SessionState, report_kind};

/// Shared handle to the observable session cell.
#[derive(Clone)]
pub struct IdentitySource {
    inner: Arc<Inner>,
}

struct Inner {
    sender: watch::Sender<SessionReport>,
    torn_down: AtomicBool,
}

impl IdentitySource {
    /// Creates the cell in the `Pending` state.
    #[must_use]
    pub fn init() -> Self {
        let (sender, _) = watch::channel(Ok(SessionState::Pending));
        Self {
            inner: Arc::new(Inner {
                sender,
                torn_down: AtomicBool::new(false),
            }),
        }
    }

    /// Returns a copy of the latest report.
    #[must_use]
    pub fn current(&self) -> SessionReport {
        self.inner.sender.borrow().clone()
    }

    /// Subscribes to future reports.
    #[must_use]
    pub fn subscribe(&self) -> SessionSubscription {
        SessionSubscription {
            receiver: self.inner.sender.subscribe(),
        }
    }

    /// Marks a new identity check as in flight.
    pub fn begin_check(&self) {
        self.publish(Ok(SessionState::Pending));
    }

    /// Publishes the outcome of a successful identity check.
    pub fn resolve(&self, identity: Option<Identity>) {
        self.publish(Ok(SessionState::from(identity)));
    }

    /// Publishes a failed identity check.
    pub fn fail(&self, failure: SessionCheckFailed) {
        warn!(error = %failure, "identity check failed");
        self.publish(Err(failure));
    }

    /// Shuts the source down.
    ///
    /// Publishes `Unauthenticated` so any guard still mounted fails closed,
    /// then ignores every later publish.
    pub fn teardown(&self) {
        self.publish(Ok(SessionState::Unauthenticated));
        self.inner.torn_down.store(true, Ordering::Release);
        debug!("identity source torn down");
    }

    /// Returns true once [`teardown`](Self::teardown) has run.
    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.inner.torn_down.load(Ordering::Acquire)
    }

    fn publish(&self, report: SessionReport) {
        if self.is_torn_down() {
            debug!(kind = %report_kind(&report), "ignoring report after teardown");
            return;
        }
        let kind = report_kind(&report);
        let changed = self.inner.sender.send_if_modified(|current| {
            if *current == report {
                false
            } else {
                *current = report;
                true
            }
        });
        if changed {
            debug!(%kind, "session report published");
        }
    }
}

impl std::fmt::Debug for IdentitySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentitySource")
            .field("current", &report_kind(&self.current()))
            .field("torn_down", &self.is_torn_down())
            .finish()
    }
}

/// A subscriber's view of the identity source.
pub struct SessionSubscription {
    receiver: watch::Receiver<SessionReport>,
}

impl SessionSubscription {
    /// Returns the latest report and marks it as seen.
    pub fn latest(&mut self) -> SessionReport {
        self.receiver.borrow_and_update().clone()
    }

    /// Waits for the next report.
    ///
    /// Returns `None` once every handle to the source has been dropped.
    pub async fn changed(&mut self) -> Option<SessionReport> {
        self.receiver.changed().await.ok()?;
        Some(self.latest())
    }
}
