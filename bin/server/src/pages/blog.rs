//! Members-only blog pages.

use leptos::prelude::*;
use leptos_router::hooks::use_params_map;

/// Blog index.
#[component]
pub fn BlogPage() -> impl IntoView {
    view! {
        <div class="blog-page">
            <h1>"Blog"</h1>
            <p>"Notes from the studio, for signed-in readers."</p>
        </div>
    }
}

/// A single blog post.
#[component]
pub fn BlogPostPage() -> impl IntoView {
    let params = use_params_map();
    let slug = move || params.read().get("slug").unwrap_or_default();

    view! {
        <article class="blog-post">
            <h1>{move || slug().replace('-', " ")}</h1>
            <a href="/blog" class="link-button">"Back to the blog"</a>
        </article>
    }
}
