//! Sign-in and sign-up page.
//!
//! Once the visitor is signed in, whether by submitting the form or by
//! arriving with a live session, the page hands its query string to
//! [`LoginCompletion`] to return them where they were headed.

use crate::guard::GuardSettings;
use crate::navigation::RouterNavigator;
use crate::session::SessionContext;
use crate::types::SignUpResult;
use crate::user::{SignIn, SignUp};
use leptos::form::ActionForm;
use leptos::prelude::*;
use leptos_router::hooks::{use_location, use_navigate};
use vibe_flow_route_guard::LoginCompletion;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormMode {
    SignIn,
    SignUp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Notice {
    Info(String),
    Error(String),
}

/// Strips the framework prefix from server function errors.
fn error_message(error: &ServerFnError) -> String {
    match error {
        ServerFnError::ServerError(message) => message.clone(),
        other => other.to_string(),
    }
}

/// Login page at `/auth`.
#[component]
pub fn LoginPage() -> impl IntoView {
    let session = SessionContext::expect();
    let settings = expect_context::<GuardSettings>();
    let location = use_location();
    let navigator = RouterNavigator::new(use_navigate());

    let mode = RwSignal::new(FormMode::SignIn);
    let notice = RwSignal::new(Option::<Notice>::None);
    let sign_in = ServerAction::<SignIn>::new();
    let sign_up = ServerAction::<SignUp>::new();
    let completed = StoredValue::new(false);

    Effect::new({
        let session = session.clone();
        move |_| {
            if let Some(result) = sign_in.value().get() {
                match result {
                    Ok(identity) => session.signed_in(identity),
                    Err(e) => notice.set(Some(Notice::Error(error_message(&e)))),
                }
            }
        }
    });

    Effect::new({
        let session = session.clone();
        move |_| {
            if let Some(result) = sign_up.value().get() {
                match result {
                    Ok(SignUpResult::SignedIn(identity)) => session.signed_in(identity),
                    Ok(SignUpResult::ConfirmationRequired) => {
                        mode.set(FormMode::SignIn);
                        notice.set(Some(Notice::Info(
                            "Check your inbox to confirm your email, then sign in.".to_string(),
                        )));
                    }
                    Err(e) => notice.set(Some(Notice::Error(error_message(&e)))),
                }
            }
        }
    });

    // Leave the page exactly once per visit, reading the return URL at the
    // moment sign-in is observed.
    Effect::new({
        let session = session.clone();
        move |_| {
            if session.identity().is_none() || completed.get_value() {
                return;
            }
            let Some(config) = settings.config() else {
                return;
            };
            completed.set_value(true);

            let query = location.search.get_untracked();
            match LoginCompletion::from_config(&config).complete(&query, &navigator) {
                Ok(completion) if completion.fell_back => leptos::logging::warn!(
                    "return url unavailable, sent to {}",
                    completion.navigated_to
                ),
                Ok(_) => {}
                Err(report) => {
                    leptos::logging::error!("post-login navigation failed: {report}");
                    notice.set(Some(Notice::Error(
                        "You're signed in, but we couldn't open your dashboard.".to_string(),
                    )));
                }
            }
        }
    });

    let pending = move || sign_in.pending().get() || sign_up.pending().get();

    view! {
        <div class="login-page">
            <div class="login-box">
                <h1>
                    {move || match mode.get() {
                        FormMode::SignIn => "Sign in to Vibe Flow",
                        FormMode::SignUp => "Create your account",
                    }}
                </h1>

                {move || notice.get().map(|notice| match notice {
                    Notice::Info(text) => view! { <p class="notice">{text}</p> }.into_any(),
                    Notice::Error(text) => {
                        view! { <p class="notice error" role="alert">{text}</p> }.into_any()
                    }
                })}

                <Show
                    when=move || mode.get() == FormMode::SignIn
                    fallback=move || view! {
                        <ActionForm action=sign_up>
                            <CredentialFields new_password=true/>
                            <button type="submit" class="login-button" disabled=pending>
                                "Sign up"
                            </button>
                        </ActionForm>
                    }
                >
                    <ActionForm action=sign_in>
                        <CredentialFields new_password=false/>
                        <button type="submit" class="login-button" disabled=pending>
                            "Sign in"
                        </button>
                    </ActionForm>
                </Show>

                <button
                    type="button"
                    class="link-button"
                    on:click=move |_| {
                        notice.set(None);
                        mode.update(|mode| {
                            *mode = match mode {
                                FormMode::SignIn => FormMode::SignUp,
                                FormMode::SignUp => FormMode::SignIn,
                            }
                        });
                    }
                >
                    {move || match mode.get() {
                        FormMode::SignIn => "Need an account? Sign up",
                        FormMode::SignUp => "Already have an account? Sign in",
                    }}
                </button>
            </div>
        </div>
    }
}

/// Email and password inputs named after the server function arguments.
#[component]
fn CredentialFields(new_password: bool) -> impl IntoView {
    let autocomplete = if new_password {
        "new-password"
    } else {
        "current-password"
    };

    view! {
        <div class="setting-row">
            <label for="email">"Email"</label>
            <input type="email" id="email" name="email" autocomplete="email" required/>
        </div>
        <div class="setting-row">
            <label for="password">"Password"</label>
            <input
                type="password"
                id="password"
                name="password"
                autocomplete=autocomplete
                required
            />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_lose_framework_prefix() {
        let error = ServerFnError::new("Invalid email or password");
        assert_eq!(error_message(&error), "Invalid email or password");
    }
}
