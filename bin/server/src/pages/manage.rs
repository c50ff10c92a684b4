//! Management pages; admins only.

use leptos::prelude::*;

#[component]
fn ManagementPanel(title: &'static str, description: &'static str) -> impl IntoView {
    view! {
        <div class="manage-page">
            <h1>{title}</h1>
            <p>{description}</p>
            <a href="/dashboard" class="link-button">"Back to dashboard"</a>
        </div>
    }
}

/// Blog post management.
#[component]
pub fn BlogManagerPage() -> impl IntoView {
    view! { <ManagementPanel title="Blog manager" description="Draft, publish and retire posts."/> }
}

/// Contact form submissions.
#[component]
pub fn ContactFormsPage() -> impl IntoView {
    view! { <ManagementPanel title="Contact forms" description="Messages sent through the site."/> }
}

/// Site analytics.
#[component]
pub fn AnalyticsPage() -> impl IntoView {
    view! { <ManagementPanel title="Analytics" description="Traffic for the last thirty days."/> }
}
