//! Browser-side session state.
//!
//! One [`IdentitySource`] exists per application instance. Its latest report
//! is mirrored into a signal so views and route guards re-render when the
//! session resolves or changes.

use crate::user::get_current_user;
use leptos::prelude::*;
use leptos::task::spawn_local;
use vibe_flow_platform_access::{
    Identity, IdentitySource, SessionCheckFailed, SessionReport, SessionState,
};

/// Shared handle to the session, provided as context by the app.
#[derive(Clone)]
pub struct SessionContext {
    source: IdentitySource,
    report: RwSignal<SessionReport>,
}

impl SessionContext {
    /// Creates the identity source and provides it as context.
    ///
    /// The first session check starts once the app is running in the
    /// browser; until then every report is pending.
    pub fn provide() -> Self {
        let source = IdentitySource::init();
        let context = Self {
            report: RwSignal::new(source.current()),
            source,
        };
        provide_context(context.clone());

        Effect::new({
            let context = context.clone();
            move |_| context.refresh()
        });

        on_cleanup({
            let source = context.source.clone();
            move || source.teardown()
        });

        context
    }

    /// Returns the session context provided by the app.
    pub fn expect() -> Self {
        expect_context::<Self>()
    }

    /// Returns the latest session report, tracked.
    pub fn report(&self) -> SessionReport {
        self.report.get()
    }

    /// Returns the signed-in identity, tracked.
    pub fn identity(&self) -> Option<Identity> {
        match self.report() {
            Ok(SessionState::Authenticated(identity)) => Some(identity),
            _ => None,
        }
    }

    /// Re-checks the session against the server.
    pub fn refresh(&self) {
        self.publish(IdentitySource::begin_check);

        let context = self.clone();
        spawn_local(async move {
            match get_current_user().await {
                Ok(identity) => context.publish(|source| source.resolve(identity)),
                Err(e) => {
                    let failure = SessionCheckFailed::new(e.to_string());
                    context.publish(|source| source.fail(failure));
                }
            }
        });
    }

    /// Records a successful sign-in.
    pub fn signed_in(&self, identity: Identity) {
        self.publish(|source| source.resolve(Some(identity)));
    }

    /// Records a sign-out.
    pub fn signed_out(&self) {
        self.publish(|source| source.resolve(None));
    }

    fn publish(&self, change: impl FnOnce(&IdentitySource)) {
        change(&self.source);
        let latest = self.source.current();
        if self.report.try_get_untracked().is_some_and(|current| current != latest) {
            self.report.try_set(latest);
        }
    }
}
