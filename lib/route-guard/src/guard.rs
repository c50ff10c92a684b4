//! The route guard state machine.
//!
//! One `RouteGuard` exists per mounted guarded view. It is fed session
//! reports, timer expiries and redirect failures, and answers each with an
//! [`Evaluation`]: what to render and which side effects the host must
//! perform (arm or cancel the fail-closed timer, redirect).
//!
//! ```text
//!                 Pending (fresh)
//!   ┌──────────┐ ───────────────► ┌──────────┐  Authenticated   ┌─────────┐
//!   │  (any)   │                  │ CHECKING │ ───────────────► │ GRANTED │
//!   └──────────┘                  └──────────┘                  └─────────┘
//!                                   │      │                        ▲
//!                 Unauthenticated / │      │ timeout                │ Authenticated
//!                 check failed      ▼      ▼                        │
//!                              ┌────────────────────┐ ──────────────┘
//!                              │ DENIED_REDIRECTING │
//!                              └────────────────────┘
//! ```
//!
//! The machine never performs I/O itself. Keeping the effects as data makes
//! the at-most-one-redirect guarantee independent of how often the host
//! re-evaluates.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use vibe_flow_platform_access::{SessionCheckFailed, SessionKind, SessionReport, SessionState};

use crate::config::GuardConfig;
use crate::location::{Location, NavigationError, NavigationIntent, NavigationMode};
use crate::return_url::login_redirect_url;

/// What a guarded view requires of the visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    /// Any signed-in account.
    #[default]
    SignedIn,
    /// A signed-in account with the admin role.
    Admin,
}

/// The three named guard states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    /// Waiting for the identity check to resolve.
    Checking,
    /// Access denied; a redirect has been (or is being) issued.
    DeniedRedirecting,
    /// Access granted; the wrapped view is rendered.
    Granted,
}

/// What the host should render for the guarded slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Render {
    /// A loading indicator. Neither children nor denial content.
    Loading,
    /// The wrapped view.
    Children,
    /// A neutral placeholder while the redirect takes effect.
    Redirecting,
    /// The guard's own redirect failed; show a message with a manual link.
    NavigationFailed { fallback_href: String },
}

/// Identifies one arming of the fail-closed timer.
///
/// Expiries carrying any other ticket are stale and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerTicket(u64);

/// Side effects the host must perform, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardEffect {
    /// Arm the fail-closed timer; call [`RouteGuard::on_timeout`] when it fires.
    StartTimer { ticket: TimerTicket, after: Duration },
    /// Disarm a previously armed timer.
    CancelTimer { ticket: TimerTicket },
    /// Navigate away from the guarded view.
    Redirect {
        destination: String,
        mode: NavigationMode,
    },
}

/// Why access was denied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenialReason {
    /// Nobody is signed in.
    Unauthenticated,
    /// The identity check did not resolve in time.
    TimedOut,
    /// The identity source could not determine the session.
    SessionCheckFailed(SessionCheckFailed),
    /// Signed in, but without the role the view requires.
    Forbidden,
}

/// The guard's answer to one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub state: GuardState,
    pub render: Render,
    pub effects: Vec<GuardEffect>,
    /// Set when this input caused (or re-confirmed) a denial.
    pub denial: Option<DenialReason>,
}

impl Evaluation {
    /// Returns the redirect destination issued by this evaluation, if any.
    #[must_use]
    pub fn redirect(&self) -> Option<&str> {
        self.effects.iter().find_map(|effect| match effect {
            GuardEffect::Redirect { destination, .. } => Some(destination.as_str()),
            _ => None,
        })
    }
}

/// Marks that a redirect was issued for one intent within one session cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RedirectRecord {
    cycle: u64,
    intent: NavigationIntent,
    destination: String,
}

/// Per-mount guard state machine.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    config: GuardConfig,
    requirement: Requirement,
    state: GuardState,
    mounted: bool,
    /// Incremented on every fresh entry into `Checking`.
    cycle: u64,
    next_ticket: u64,
    armed: Option<TimerTicket>,
    timed_out: bool,
    last_kind: Option<SessionKind>,
    redirect: Option<RedirectRecord>,
    failed_redirect: Option<String>,
}

impl RouteGuard {
    /// Creates a mounted guard in the `Checking` state.
    #[must_use]
    pub fn new(config: GuardConfig, requirement: Requirement) -> Self {
        Self {
            config,
            requirement,
            state: GuardState::Checking,
            mounted: true,
            cycle: 0,
            next_ticket: 0,
            armed: None,
            timed_out: false,
            last_kind: None,
            redirect: None,
            failed_redirect: None,
        }
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> GuardState {
        self.state
    }

    /// Returns what the host should currently render.
    #[must_use]
    pub fn render(&self) -> Render {
        match self.state {
            GuardState::Checking => Render::Loading,
            GuardState::Granted => Render::Children,
            GuardState::DeniedRedirecting => match &self.failed_redirect {
                Some(href) => Render::NavigationFailed {
                    fallback_href: href.clone(),
                },
                None => Render::Redirecting,
            },
        }
    }

    /// Returns false once [`unmount`](Self::unmount) has run.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Evaluates the latest session report against the current location.
    ///
    /// Hosts call this whenever either input changes, and may call it more
    /// often; repeated calls with the same inputs have no further effects.
    pub fn evaluate(&mut self, report: &SessionReport, location: &Location) -> Evaluation {
        if !self.mounted {
            return self.evaluation(Vec::new(), None);
        }

        let kind = vibe_flow_platform_access::report_kind(report);
        let previous = self.last_kind.replace(kind);
        let mut effects = Vec::new();

        match report {
            Ok(SessionState::Pending) => {
                if previous != Some(SessionKind::Pending) {
                    self.enter_checking(&mut effects);
                }
                if self.timed_out {
                    return self.deny(location, DenialReason::TimedOut, effects);
                }
                self.evaluation(effects, None)
            }
            Ok(SessionState::Authenticated(identity)) => {
                self.resolve(&mut effects);
                if self.requirement == Requirement::Admin && !identity.is_admin() {
                    return self.deny(location, DenialReason::Forbidden, effects);
                }
                if self.state != GuardState::Granted {
                    debug!(path = location.path(), "guard granted");
                }
                self.state = GuardState::Granted;
                self.redirect = None;
                self.failed_redirect = None;
                self.evaluation(effects, None)
            }
            Ok(SessionState::Unauthenticated) => {
                self.resolve(&mut effects);
                self.deny(location, DenialReason::Unauthenticated, effects)
            }
            Err(failure) => {
                if previous != Some(SessionKind::CheckFailed) {
                    warn!(error = %failure, path = location.path(), "session check failed, denying access");
                }
                self.resolve(&mut effects);
                self.deny(
                    location,
                    DenialReason::SessionCheckFailed(failure.clone()),
                    effects,
                )
            }
        }
    }

    /// Handles expiry of the fail-closed timer.
    ///
    /// Stale tickets, tickets for a resolved check and expiries after
    /// unmount are ignored.
    pub fn on_timeout(&mut self, ticket: TimerTicket, location: &Location) -> Evaluation {
        if !self.mounted || self.armed != Some(ticket) || self.state != GuardState::Checking {
            debug!(?ticket, "ignoring stale guard timer");
            return self.evaluation(Vec::new(), None);
        }
        self.armed = None;
        self.timed_out = true;
        info!(
            path = location.path(),
            waited_ms = self.config.session_timeout_ms,
            "identity check timed out, failing closed"
        );
        self.deny(location, DenialReason::TimedOut, Vec::new())
    }

    /// Records that the guard's own redirect failed.
    ///
    /// The guard stays denied and does not retry; the host shows a message
    /// with a manual link to the intended destination.
    pub fn on_redirect_failed(&mut self, destination: &str, error: &NavigationError) -> Evaluation {
        if !self.mounted || self.state != GuardState::DeniedRedirecting {
            return self.evaluation(Vec::new(), None);
        }
        warn!(destination, error = %error, "guard redirect failed");
        self.failed_redirect = Some(destination.to_string());
        self.evaluation(Vec::new(), None)
    }

    /// Unmounts the guard, returning the effects needed to release it.
    ///
    /// Every later input is ignored.
    pub fn unmount(&mut self) -> Vec<GuardEffect> {
        self.mounted = false;
        self.redirect = None;
        self.armed
            .take()
            .map(|ticket| GuardEffect::CancelTimer { ticket })
            .into_iter()
            .collect()
    }

    fn enter_checking(&mut self, effects: &mut Vec<GuardEffect>) {
        self.cycle += 1;
        self.timed_out = false;
        self.failed_redirect = None;
        self.state = GuardState::Checking;
        if let Some(ticket) = self.armed.take() {
            effects.push(GuardEffect::CancelTimer { ticket });
        }
        let ticket = TimerTicket(self.next_ticket);
        self.next_ticket += 1;
        self.armed = Some(ticket);
        effects.push(GuardEffect::StartTimer {
            ticket,
            after: self.config.session_timeout(),
        });
    }

    /// The check left `Pending`: the timer is no longer needed.
    fn resolve(&mut self, effects: &mut Vec<GuardEffect>) {
        self.timed_out = false;
        if let Some(ticket) = self.armed.take() {
            effects.push(GuardEffect::CancelTimer { ticket });
        }
    }

    fn deny(
        &mut self,
        location: &Location,
        reason: DenialReason,
        mut effects: Vec<GuardEffect>,
    ) -> Evaluation {
        let intent = NavigationIntent::capture(location);
        let destination = match reason {
            DenialReason::Forbidden => self.config.default_destination.clone(),
            _ => login_redirect_url(&self.config.login_path, &intent),
        };
        self.state = GuardState::DeniedRedirecting;

        let record = RedirectRecord {
            cycle: self.cycle,
            intent,
            destination,
        };
        if self.redirect.as_ref() != Some(&record) {
            debug!(
                intent = %record.intent,
                destination = %record.destination,
                ?reason,
                "guard redirecting"
            );
            effects.push(GuardEffect::Redirect {
                destination: record.destination.clone(),
                mode: NavigationMode::Replace,
            });
            self.failed_redirect = None;
            self.redirect = Some(record);
        }
        self.evaluation(effects, Some(reason))
    }

    fn evaluation(&self, effects: Vec<GuardEffect>, denial: Option<DenialReason>) -> Evaluation {
        Evaluation {
            state: self.state,
            render: self.render(),
            effects,
            denial,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vibe_flow_core::UserId;
    use vibe_flow_platform_access::{Identity, RoleSet};

    fn guard() -> RouteGuard {
        RouteGuard::new(GuardConfig::default(), Requirement::SignedIn)
    }

    fn pending() -> SessionReport {
        Ok(SessionState::Pending)
    }

    fn signed_out() -> SessionReport {
        Ok(SessionState::Unauthenticated)
    }

    fn signed_in(roles: RoleSet) -> SessionReport {
        Ok(SessionState::Authenticated(Identity::new(
            UserId::new("user-1"),
            roles,
        )))
    }

    fn redirects(evaluation: &Evaluation) -> Vec<(&str, NavigationMode)> {
        evaluation
            .effects
            .iter()
            .filter_map(|effect| match effect {
                GuardEffect::Redirect { destination, mode } => Some((destination.as_str(), *mode)),
                _ => None,
            })
            .collect()
    }

    fn armed_ticket(evaluation: &Evaluation) -> TimerTicket {
        evaluation
            .effects
            .iter()
            .find_map(|effect| match effect {
                GuardEffect::StartTimer { ticket, .. } => Some(*ticket),
                _ => None,
            })
            .expect("timer armed")
    }

    #[test]
    fn unauthenticated_visit_redirects_to_login_with_return_url() {
        let mut guard = guard();
        let blog = Location::new("/blog", "");

        let evaluation = guard.evaluate(&signed_out(), &blog);

        assert_eq!(evaluation.state, GuardState::DeniedRedirecting);
        assert_eq!(evaluation.render, Render::Redirecting);
        assert_eq!(
            redirects(&evaluation),
            vec![("/auth?returnUrl=%2Fblog", NavigationMode::Replace)]
        );
        assert_eq!(evaluation.denial, Some(DenialReason::Unauthenticated));
    }

    #[test]
    fn redirect_preserves_query_in_return_url() {
        let mut guard = guard();
        let evaluation = guard.evaluate(&signed_out(), &Location::new("/dashboard", "tab=chat"));
        assert_eq!(
            evaluation.redirect(),
            Some("/auth?returnUrl=%2Fdashboard%3Ftab%3Dchat")
        );
    }

    #[test]
    fn authenticated_visit_renders_children_without_redirect() {
        let mut guard = guard();
        let evaluation = guard.evaluate(&signed_in(RoleSet::user()), &Location::new("/blog", ""));

        assert_eq!(evaluation.state, GuardState::Granted);
        assert_eq!(evaluation.render, Render::Children);
        assert!(evaluation.effects.is_empty());
    }

    #[test]
    fn granted_is_idempotent() {
        let mut guard = guard();
        let location = Location::new("/blog", "");
        guard.evaluate(&signed_in(RoleSet::user()), &location);
        let again = guard.evaluate(&signed_in(RoleSet::user()), &location);
        assert_eq!(again.render, Render::Children);
        assert!(again.effects.is_empty());
    }

    #[test]
    fn pending_renders_only_loading_and_arms_timer() {
        let mut guard = guard();
        let evaluation = guard.evaluate(&pending(), &Location::new("/blog", ""));

        assert_eq!(evaluation.state, GuardState::Checking);
        assert_eq!(evaluation.render, Render::Loading);
        assert!(evaluation.redirect().is_none());
        assert_eq!(
            evaluation.effects,
            vec![GuardEffect::StartTimer {
                ticket: armed_ticket(&evaluation),
                after: Duration::from_secs(2),
            }]
        );
    }

    #[test]
    fn repeated_pending_evaluations_do_not_rearm() {
        let mut guard = guard();
        let location = Location::new("/blog", "");
        guard.evaluate(&pending(), &location);
        for _ in 0..5 {
            let evaluation = guard.evaluate(&pending(), &location);
            assert_eq!(evaluation.render, Render::Loading);
            assert!(evaluation.effects.is_empty());
        }
    }

    #[test]
    fn rapid_reevaluation_issues_exactly_one_redirect() {
        let mut guard = guard();
        let location = Location::new("/blog", "");

        let total: usize = (0..10)
            .map(|_| redirects(&guard.evaluate(&signed_out(), &location)).len())
            .sum();

        assert_eq!(total, 1);
        assert_eq!(guard.state(), GuardState::DeniedRedirecting);
    }

    #[test]
    fn distinct_intent_gets_its_own_redirect() {
        let mut guard = guard();
        guard.evaluate(&signed_out(), &Location::new("/blog", ""));
        let second = guard.evaluate(&signed_out(), &Location::new("/blog", "page=2"));
        assert_eq!(second.redirect(), Some("/auth?returnUrl=%2Fblog%3Fpage%3D2"));
    }

    #[test]
    fn timeout_fails_closed() {
        let mut guard = guard();
        let location = Location::new("/blog", "");
        let ticket = armed_ticket(&guard.evaluate(&pending(), &location));

        let evaluation = guard.on_timeout(ticket, &location);

        assert_eq!(evaluation.state, GuardState::DeniedRedirecting);
        assert_eq!(evaluation.denial, Some(DenialReason::TimedOut));
        assert_eq!(
            redirects(&evaluation),
            vec![("/auth?returnUrl=%2Fblog", NavigationMode::Replace)]
        );
    }

    #[test]
    fn pending_after_timeout_stays_denied_without_second_redirect() {
        let mut guard = guard();
        let location = Location::new("/blog", "");
        let ticket = armed_ticket(&guard.evaluate(&pending(), &location));
        guard.on_timeout(ticket, &location);

        let evaluation = guard.evaluate(&pending(), &location);
        assert_eq!(evaluation.state, GuardState::DeniedRedirecting);
        assert!(evaluation.effects.is_empty());
    }

    #[test]
    fn late_authentication_after_timeout_grants() {
        let mut guard = guard();
        let location = Location::new("/blog", "");
        let ticket = armed_ticket(&guard.evaluate(&pending(), &location));
        guard.on_timeout(ticket, &location);

        let evaluation = guard.evaluate(&signed_in(RoleSet::user()), &location);
        assert_eq!(evaluation.render, Render::Children);
    }

    #[test]
    fn timer_is_cancelled_when_check_resolves() {
        let mut guard = guard();
        let location = Location::new("/blog", "");
        let ticket = armed_ticket(&guard.evaluate(&pending(), &location));

        let evaluation = guard.evaluate(&signed_in(RoleSet::user()), &location);
        assert_eq!(evaluation.effects, vec![GuardEffect::CancelTimer { ticket }]);

        // A timer that fires anyway is stale and ignored.
        let late = guard.on_timeout(ticket, &location);
        assert_eq!(late.render, Render::Children);
        assert!(late.effects.is_empty());
    }

    #[test]
    fn each_fresh_pending_starts_a_new_timeout_window() {
        let mut guard = guard();
        let location = Location::new("/blog", "");
        let first = armed_ticket(&guard.evaluate(&pending(), &location));
        guard.evaluate(&signed_in(RoleSet::user()), &location);

        let second = armed_ticket(&guard.evaluate(&pending(), &location));
        assert_ne!(first, second);

        assert!(guard.on_timeout(first, &location).effects.is_empty());
        assert!(guard.on_timeout(second, &location).redirect().is_some());
    }

    #[test]
    fn check_failure_is_treated_as_unauthenticated() {
        let mut guard = guard();
        let failure = SessionCheckFailed::new("backend unreachable");
        let evaluation = guard.evaluate(&Err(failure.clone()), &Location::new("/blog", ""));

        assert_eq!(evaluation.state, GuardState::DeniedRedirecting);
        assert_eq!(evaluation.redirect(), Some("/auth?returnUrl=%2Fblog"));
        assert_eq!(evaluation.denial, Some(DenialReason::SessionCheckFailed(failure)));
    }

    #[test]
    fn becoming_authenticated_while_mounted_grants_in_one_evaluation() {
        let mut guard = guard();
        let location = Location::new("/blog", "");
        guard.evaluate(&pending(), &location);
        guard.evaluate(&signed_out(), &location);

        let evaluation = guard.evaluate(&signed_in(RoleSet::user()), &location);
        assert_eq!(evaluation.state, GuardState::Granted);
        assert_eq!(evaluation.render, Render::Children);
        assert!(evaluation.redirect().is_none());
    }

    #[test]
    fn sign_out_after_grant_redirects_again() {
        let mut guard = guard();
        let location = Location::new("/blog", "");
        guard.evaluate(&signed_out(), &location);
        guard.evaluate(&signed_in(RoleSet::user()), &location);

        let evaluation = guard.evaluate(&signed_out(), &location);
        assert_eq!(evaluation.redirect(), Some("/auth?returnUrl=%2Fblog"));
    }

    #[test]
    fn new_session_cycle_allows_new_redirect_for_same_intent() {
        let mut guard = guard();
        let location = Location::new("/blog", "");
        guard.evaluate(&signed_out(), &location);
        guard.evaluate(&pending(), &location);

        let evaluation = guard.evaluate(&signed_out(), &location);
        assert_eq!(redirects(&evaluation).len(), 1);
    }

    #[test]
    fn unmount_cancels_timer_and_ignores_later_inputs() {
        let mut guard = guard();
        let location = Location::new("/blog", "");
        let ticket = armed_ticket(&guard.evaluate(&pending(), &location));

        assert_eq!(guard.unmount(), vec![GuardEffect::CancelTimer { ticket }]);
        assert!(!guard.is_mounted());

        assert!(guard.on_timeout(ticket, &location).effects.is_empty());
        assert!(guard.evaluate(&signed_out(), &location).effects.is_empty());
    }

    #[test]
    fn failed_redirect_shows_fallback_link_without_retrying() {
        let mut guard = guard();
        let location = Location::new("/blog", "");
        let destination = guard
            .evaluate(&signed_out(), &location)
            .redirect()
            .map(str::to_string)
            .expect("redirect issued");

        let evaluation = guard.on_redirect_failed(
            &destination,
            &NavigationError::Rejected {
                destination: destination.clone(),
                reason: "router not ready".to_string(),
            },
        );
        assert_eq!(
            evaluation.render,
            Render::NavigationFailed {
                fallback_href: "/auth?returnUrl=%2Fblog".to_string()
            }
        );

        let again = guard.evaluate(&signed_out(), &location);
        assert!(again.effects.is_empty());
        assert!(matches!(again.render, Render::NavigationFailed { .. }));
    }

    #[test]
    fn admin_requirement_sends_non_admins_to_default_once() {
        let mut guard = RouteGuard::new(GuardConfig::default(), Requirement::Admin);
        let location = Location::new("/blog-manager", "");

        let first = guard.evaluate(&signed_in(RoleSet::user()), &location);
        assert_eq!(first.denial, Some(DenialReason::Forbidden));
        assert_eq!(redirects(&first), vec![("/dashboard", NavigationMode::Replace)]);

        let second = guard.evaluate(&signed_in(RoleSet::user()), &location);
        assert!(second.effects.is_empty());
    }

    #[test]
    fn admin_requirement_grants_admins() {
        let mut guard = RouteGuard::new(GuardConfig::default(), Requirement::Admin);
        let evaluation =
            guard.evaluate(&signed_in(RoleSet::admin()), &Location::new("/blog-manager", ""));
        assert_eq!(evaluation.render, Render::Children);
    }

    #[test]
    fn admin_requirement_redirects_anonymous_visitors_to_login() {
        let mut guard = RouteGuard::new(GuardConfig::default(), Requirement::Admin);
        let evaluation = guard.evaluate(&signed_out(), &Location::new("/contact-forms", ""));
        assert_eq!(evaluation.redirect(), Some("/auth?returnUrl=%2Fcontact-forms"));
    }
}
