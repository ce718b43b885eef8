use crate::api::{BriefifyApi, use_api};
use crate::auth::use_auth;
use crate::error::{ApiError, ApiErrorStatus};
use crate::web::HttpClient;
use crate::web::router::{Link, use_router};
use briefify_shared::Credentials;
use leptos::prelude::*;
use leptos::task::spawn_local;

pub const MSG_FILL_ALL_FIELDS: &str = "Please fill in all fields";
const MSG_INVALID_CREDENTIALS: &str = "Invalid username or password.";
const MSG_LOGIN_FAILED: &str = "Login failed. Please try again later.";

/// 校验表单并登录，成功时返回令牌，失败时返回可展示的错误信息
pub async fn submit_login<C: HttpClient>(
    api: &BriefifyApi<C>,
    username: &str,
    password: &str,
) -> Result<String, String> {
    if username.trim().is_empty() || password.is_empty() {
        return Err(MSG_FILL_ALL_FIELDS.to_string());
    }

    api.login(&Credentials::new(username, password))
        .await
        .map_err(|e| login_error_message(&e))
}

fn login_error_message(err: &ApiError) -> String {
    match err.status {
        ApiErrorStatus::Unauthorized => MSG_INVALID_CREDENTIALS.to_string(),
        _ => MSG_LOGIN_FAILED.to_string(),
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let api = use_api();

    let (username, set_username) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (show_password, set_show_password) = signal(false);
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if is_submitting.get_untracked() {
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        let api = api.clone();
        spawn_local(async move {
            let result = submit_login(
                &api,
                &username.get_untracked(),
                &password.get_untracked(),
            )
            .await;
            match result {
                Ok(token) => {
                    auth.login(token);
                    router.navigate("/upload");
                }
                Err(msg) => {
                    let _ = set_error_msg.try_set(Some(msg));
                }
            }
            let _ = set_is_submitting.try_set(false);
        });
    };

    view! {
        <div class="auth-form-container">
            <h2>"Login to Briefify"</h2>
            <p class="auth-intro-text">"Welcome back! Please log in to continue."</p>
            <form on:submit=on_submit>
                <div class="form-group">
                    <label for="username">"Username or Email"</label>
                    <input
                        id="username"
                        type="text"
                        placeholder="Enter your username or email"
                        on:input=move |ev| set_username.set(event_target_value(&ev))
                        prop:value=username
                        required
                    />
                </div>
                <div class="form-group password-group">
                    <label for="password">"Password"</label>
                    <input
                        id="password"
                        type=move || if show_password.get() { "text" } else { "password" }
                        placeholder="Enter your password"
                        on:input=move |ev| set_password.set(event_target_value(&ev))
                        prop:value=password
                        required
                    />
                    <span
                        class="password-toggle"
                        on:click=move |_| set_show_password.update(|v| *v = !*v)
                    >
                        {move || if show_password.get() { "Hide" } else { "Show" }}
                    </span>
                </div>
                <Show when=move || error_msg.get().is_some()>
                    <p class="error-message">{move || error_msg.get().unwrap_or_default()}</p>
                </Show>
                <button
                    type="submit"
                    class="auth-button login-button"
                    disabled=move || is_submitting.get()
                >
                    {move || if is_submitting.get() { "Logging in..." } else { "Login" }}
                </button>
            </form>
            <p class="auth-link-text">
                "Don't have an account? "
                <Link to="/register">"Register here"</Link>
            </p>
        </div>
    }
}
