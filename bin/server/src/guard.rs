//! Route guard components.
//!
//! [`RouteGuard`] and [`RequireAdmin`] wrap protected views. Each mounted
//! guard owns one [`vibe_flow_route_guard::RouteGuard`] state machine and
//! performs the effects it asks for: arming the session timeout and
//! redirecting through the router.

use crate::navigation::RouterNavigator;
use crate::session::SessionContext;
use crate::user::get_guard_config;
use leptos::prelude::*;
use leptos_router::hooks::{use_location, use_navigate};
use std::time::Duration;
use vibe_flow_route_guard::{
    self as guard, DenialReason, Evaluation, GuardConfig, GuardEffect, Navigator, Render,
    Requirement,
    TimerTicket,
};

/// Guard settings loaded from the server, provided as context by the app.
#[derive(Clone, Copy)]
pub struct GuardSettings(Resource<Result<GuardConfig, ServerFnError>>);

impl GuardSettings {
    /// Starts loading the settings and provides them as context.
    pub fn provide() -> Self {
        let settings = Self(Resource::new(|| (), |_| get_guard_config()));
        provide_context(settings);
        settings
    }

    /// Returns the settings once loaded, tracked.
    ///
    /// Falls back to the built-in defaults if the server cannot provide them.
    pub fn config(&self) -> Option<GuardConfig> {
        self.0.get().map(|result| {
            result.unwrap_or_else(|e| {
                leptos::logging::warn!("using default guard settings: {e}");
                GuardConfig::default()
            })
        })
    }
}

/// Renders its children only for a signed-in visitor.
///
/// Anyone else is sent to the login view with a return URL pointing back
/// at the current page.
#[component]
pub fn RouteGuard(children: ChildrenFn) -> impl IntoView {
    guarded(Requirement::SignedIn, children)
}

/// Renders its children only for a signed-in administrator.
///
/// Signed-in visitors without the admin role are sent to the default
/// destination instead of the login view.
#[component]
pub fn RequireAdmin(children: ChildrenFn) -> impl IntoView {
    guarded(Requirement::Admin, children)
}

fn guarded(requirement: Requirement, children: ChildrenFn) -> impl IntoView {
    let settings = expect_context::<GuardSettings>();

    view! {
        <Suspense fallback=|| view! { <GuardLoading/> }>
            {move || {
                let children = children.clone();
                settings
                    .config()
                    .map(move |config| untrack(move || mount_guard(config, requirement, children)))
            }}
        </Suspense>
    }
}

/// Drives one guard state machine for as long as the view is mounted.
#[derive(Clone)]
struct GuardHost {
    machine: StoredValue<guard::RouteGuard>,
    render: RwSignal<Render>,
    departed: StoredValue<bool>,
    navigator: RouterNavigator,
    pathname: Memo<String>,
    search: Memo<String>,
}

impl GuardHost {
    #[cfg(feature = "hydrate")]
    fn location(&self) -> Option<guard::Location> {
        Some(guard::Location::new(
            self.pathname.try_get_untracked()?,
            self.search.try_get_untracked()?,
        ))
    }

    fn apply(&self, step: impl FnOnce(&mut guard::RouteGuard) -> Evaluation) {
        // After a redirect, location changes belong to the destination view.
        if self.departed.try_get_value().unwrap_or(true) {
            return;
        }
        // The machine is gone once the view unmounts.
        let Some(evaluation) = self.machine.try_update_value(step) else {
            return;
        };

        if let Some(DenialReason::SessionCheckFailed(failure)) = &evaluation.denial {
            leptos::logging::warn!("treating failed session check as signed out: {failure}");
        }

        for effect in evaluation.effects {
            match effect {
                GuardEffect::StartTimer { ticket, after } => self.arm(ticket, after),
                // Disarmed tickets are ignored when they fire.
                GuardEffect::CancelTimer { .. } => {}
                GuardEffect::Redirect { destination, mode } => {
                    if let Err(error) = self.navigator.navigate(&destination, mode) {
                        leptos::logging::error!("guard redirect to {destination} failed: {error}");
                        // Boxed so the recursive call does not instantiate `apply` anew.
                        let retry: Box<dyn FnOnce(&mut guard::RouteGuard) -> Evaluation + '_> =
                            Box::new(|machine| machine.on_redirect_failed(&destination, &error));
                        self.apply(retry);
                        return;
                    }
                    self.departed.try_update_value(|departed| *departed = true);
                }
            }
        }

        if self
            .render
            .try_get_untracked()
            .is_some_and(|current| current != evaluation.render)
        {
            self.render.try_set(evaluation.render);
        }
    }

    #[cfg(feature = "hydrate")]
    fn arm(&self, ticket: TimerTicket, after: Duration) {
        let host = self.clone();
        leptos::task::spawn_local(async move {
            gloo_timers::future::sleep(after).await;
            if let Some(location) = host.location() {
                host.apply(|machine| machine.on_timeout(ticket, &location));
            }
        });
    }

    // Server rendering never waits on the session.
    #[cfg(not(feature = "hydrate"))]
    fn arm(&self, _ticket: TimerTicket, _after: Duration) {}
}

fn mount_guard(config: GuardConfig, requirement: Requirement, children: ChildrenFn) -> impl IntoView {
    let session = SessionContext::expect();
    let location = use_location();
    let host = GuardHost {
        machine: StoredValue::new(guard::RouteGuard::new(config, requirement)),
        render: RwSignal::new(Render::Loading),
        departed: StoredValue::new(false),
        navigator: RouterNavigator::new(use_navigate()),
        pathname: location.pathname,
        search: location.search,
    };

    Effect::new({
        let host = host.clone();
        move |_| {
            let report = session.report();
            let here = guard::Location::new(host.pathname.get(), host.search.get());
            host.apply(|machine| machine.evaluate(&report, &here));
        }
    });

    let machine = host.machine;
    on_cleanup(move || {
        machine.try_update_value(|machine| machine.unmount());
    });

    let render = host.render;
    move || match render.get() {
        Render::Loading => view! { <GuardLoading/> }.into_any(),
        Render::Children => children().into_any(),
        Render::Redirecting => view! { <GuardRedirecting/> }.into_any(),
        Render::NavigationFailed { fallback_href } => {
            view! { <GuardNavigationFailed href=fallback_href/> }.into_any()
        }
    }
}

/// Shown while the session is being checked.
#[component]
fn GuardLoading() -> impl IntoView {
    view! {
        <div class="guard-status" aria-busy="true">
            <div class="spinner"></div>
            <p>"Checking your session..."</p>
        </div>
    }
}

/// Shown while a denied visitor is being redirected.
#[component]
fn GuardRedirecting() -> impl IntoView {
    view! {
        <div class="guard-status">
            <p>"Redirecting..."</p>
        </div>
    }
}

/// Shown when the guard could not redirect on its own.
#[component]
fn GuardNavigationFailed(href: String) -> impl IntoView {
    view! {
        <div class="guard-status guard-error" role="alert">
            <p>"We couldn't redirect you automatically."</p>
            <a href=href class="cta-button">"Continue"</a>
        </div>
    }
}
