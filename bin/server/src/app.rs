//! Main Leptos application component and routing.

use crate::guard::{GuardSettings, RequireAdmin, RouteGuard};
use crate::pages::{
    AnalyticsPage, BlogManagerPage, BlogPage, BlogPostPage, ContactFormsPage, DashboardPage,
    HomePage, LoginPage, PortfolioPage,
};
use crate::session::SessionContext;
use crate::user::SignOut;
use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::{
    components::{Route, Router, Routes},
    path,
};

/// The main application component.
///
/// Routes listed here must also appear in [`crate::navigation::ROUTES`].
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();
    GuardSettings::provide();
    SessionContext::provide();

    view! {
        <Title text="Vibe Flow"/>
        <Router>
            <Header/>
            <main class="container">
                <Routes fallback=|| view! { <NotFound/> }>
                    <Route path=path!("/") view=HomePage/>
                    <Route path=path!("/portfolio") view=PortfolioPage/>
                    <Route path=path!("/auth") view=LoginPage/>
                    <Route
                        path=path!("/blog")
                        view=|| view! { <RouteGuard><BlogPage/></RouteGuard> }
                    />
                    <Route
                        path=path!("/blog/:slug")
                        view=|| view! { <RouteGuard><BlogPostPage/></RouteGuard> }
                    />
                    <Route
                        path=path!("/dashboard")
                        view=|| view! { <RouteGuard><DashboardPage/></RouteGuard> }
                    />
                    <Route
                        path=path!("/blog-manager")
                        view=|| view! { <RequireAdmin><BlogManagerPage/></RequireAdmin> }
                    />
                    <Route
                        path=path!("/contact-forms")
                        view=|| view! { <RequireAdmin><ContactFormsPage/></RequireAdmin> }
                    />
                    <Route
                        path=path!("/analytics")
                        view=|| view! { <RequireAdmin><AnalyticsPage/></RequireAdmin> }
                    />
                </Routes>
            </main>
        </Router>
    }
}

/// Header component with navigation and account menu.
#[component]
fn Header() -> impl IntoView {
    let session = SessionContext::expect();

    view! {
        <header class="header">
            <div class="header-left">
                <a href="/" class="logo">"Vibe Flow"</a>
                <a href="/portfolio">"Portfolio"</a>
                <a href="/blog">"Blog"</a>
            </div>
            <div class="header-right">
                {move || match session.identity() {
                    Some(identity) => view! {
                        <AccountMenu label=identity.label().to_string() is_admin=identity.is_admin()/>
                    }.into_any(),
                    None => view! {
                        <a href="/auth" class="login-button">"Sign in"</a>
                    }.into_any(),
                }}
            </div>
        </header>
    }
}

/// Account menu for a signed-in visitor.
#[component]
fn AccountMenu(label: String, is_admin: bool) -> impl IntoView {
    let session = SessionContext::expect();
    let sign_out = ServerAction::<SignOut>::new();

    Effect::new(move |_| {
        match sign_out.value().get() {
            Some(Ok(())) => session.signed_out(),
            Some(Err(e)) => leptos::logging::error!("sign-out failed: {e}"),
            None => {}
        }
    });

    view! {
        <div class="user-menu">
            <span class="user-name">{label}</span>
            <div class="user-dropdown">
                <a href="/dashboard">"Dashboard"</a>
                <Show when=move || is_admin>
                    <a href="/blog-manager">"Manage"</a>
                </Show>
                <button
                    type="button"
                    class="link-button"
                    disabled=move || sign_out.pending().get()
                    on:click=move |_| {
                        sign_out.dispatch(SignOut {});
                    }
                >
                    "Sign out"
                </button>
            </div>
        </div>
    }
}

/// Fallback for unknown paths.
#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="not-found">
            <h1>"Page not found"</h1>
            <a href="/" class="link-button">"Go home"</a>
        </div>
    }
}
