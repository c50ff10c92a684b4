//! Dashboard page component.

use crate::session::SessionContext;
use leptos::prelude::*;

/// Landing page after sign-in.
#[component]
pub fn DashboardPage() -> impl IntoView {
    let session = SessionContext::expect();

    view! {
        <div class="dashboard-page">
            {move || session.identity().map(|identity| {
                let is_admin = identity.is_admin();
                view! {
                    <h1>{format!("Welcome, {}!", identity.label())}</h1>
                    <section class="dashboard-section">
                        <h2>"Reading"</h2>
                        <a href="/blog" class="link-button">"Blog"</a>
                    </section>
                    <Show when=move || is_admin>
                        <section class="dashboard-section">
                            <h2>"Manage"</h2>
                            <a href="/blog-manager" class="link-button">"Blog posts"</a>
                            <a href="/contact-forms" class="link-button">"Contact forms"</a>
                            <a href="/analytics" class="link-button">"Analytics"</a>
                        </section>
                    </Show>
                }
            })}
        </div>
    }
}
