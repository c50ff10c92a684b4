//! Public pages.

use crate::session::SessionContext;
use leptos::prelude::*;

/// The home page component.
#[component]
pub fn HomePage() -> impl IntoView {
    let session = SessionContext::expect();

    view! {
        <div class="home-page">
            <h1>"Vibe Flow"</h1>
            <p>"Design, writing and the occasional experiment."</p>
            {move || match session.identity() {
                Some(identity) => view! {
                    <a href="/dashboard" class="cta-button">
                        {format!("Continue as {}", identity.label())}
                    </a>
                }.into_any(),
                None => view! {
                    <a href="/auth" class="cta-button">"Sign in"</a>
                }.into_any(),
            }}
        </div>
    }
}

/// Portfolio page; open to everyone.
#[component]
pub fn PortfolioPage() -> impl IntoView {
    view! {
        <div class="portfolio-page">
            <h1>"Portfolio"</h1>
            <p>"Selected work. Members can read the full write-ups on the blog."</p>
            <a href="/blog" class="link-button">"Read the blog"</a>
        </div>
    }
}
