use crate::api::{BriefifyApi, use_api};
use crate::components::login::MSG_FILL_ALL_FIELDS;
use crate::web::router::{Link, use_router};
use crate::web::{HttpClient, Timeout};
use briefify_shared::Credentials;
use leptos::prelude::*;
use leptos::task::spawn_local;

const MSG_PASSWORD_MISMATCH: &str = "Passwords do not match.";
const MSG_REGISTERED: &str = "Registration successful! You can now log in.";
const MSG_REGISTER_FAILED: &str = "Registration failed. Please try again later.";
/// 注册成功后跳转登录页前的停留时间
const REDIRECT_DELAY_MS: u32 = 2000;

/// 注册表单状态
///
/// 使用 `RwSignal` 因为它实现了 `Copy` trait，可直接在闭包间传递。
#[derive(Clone, Copy)]
pub struct RegisterForm {
    pub username: RwSignal<String>,
    pub password: RwSignal<String>,
    pub confirm_password: RwSignal<String>,
    pub show_password: RwSignal<bool>,
}

impl RegisterForm {
    pub fn new() -> Self {
        Self {
            username: RwSignal::new(String::new()),
            password: RwSignal::new(String::new()),
            confirm_password: RwSignal::new(String::new()),
            show_password: RwSignal::new(false),
        }
    }

    /// 注册成功后清空表单
    pub fn reset(&self) {
        self.username.set(String::new());
        self.password.set(String::new());
        self.confirm_password.set(String::new());
        self.show_password.set(false);
    }

    /// 校验并转换为请求体
    pub fn to_credentials(&self) -> Result<Credentials, String> {
        validate_registration(
            &self.username.get_untracked(),
            &self.password.get_untracked(),
            &self.confirm_password.get_untracked(),
        )
    }
}

/// 网络请求前的表单校验
pub fn validate_registration(
    username: &str,
    password: &str,
    confirm_password: &str,
) -> Result<Credentials, String> {
    if username.trim().is_empty() || password.is_empty() || confirm_password.is_empty() {
        return Err(MSG_FILL_ALL_FIELDS.to_string());
    }
    if password != confirm_password {
        return Err(MSG_PASSWORD_MISMATCH.to_string());
    }
    Ok(Credentials::new(username, password))
}

/// 提交注册，成功与失败都返回可展示的信息
pub async fn submit_registration<C: HttpClient>(
    api: &BriefifyApi<C>,
    credentials: &Credentials,
) -> Result<String, String> {
    match api.register(credentials).await {
        Ok(_) => Ok(MSG_REGISTERED.to_string()),
        Err(e) => Err(e
            .textual_body()
            .map(str::to_string)
            .unwrap_or_else(|| MSG_REGISTER_FAILED.to_string())),
    }
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let router = use_router();
    let api = use_api();
    let form = RegisterForm::new();

    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let (success_msg, set_success_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if is_submitting.get_untracked() {
            return;
        }
        set_error_msg.set(None);
        set_success_msg.set(None);

        let credentials = match form.to_credentials() {
            Ok(credentials) => credentials,
            Err(msg) => {
                set_error_msg.set(Some(msg));
                return;
            }
        };

        set_is_submitting.set(true);
        let api = api.clone();
        spawn_local(async move {
            match submit_registration(&api, &credentials).await {
                Ok(msg) => {
                    let _ = set_success_msg.try_set(Some(msg));
                    form.reset();
                    Timeout::new(REDIRECT_DELAY_MS, move || router.navigate("/login")).forget();
                }
                Err(msg) => {
                    let _ = set_error_msg.try_set(Some(msg));
                }
            }
            let _ = set_is_submitting.try_set(false);
        });
    };

    let input_type = move || {
        if form.show_password.get() {
            "text"
        } else {
            "password"
        }
    };
    let toggle = move |_: leptos::ev::MouseEvent| form.show_password.update(|v| *v = !*v);
    let toggle_label = move || if form.show_password.get() { "Hide" } else { "Show" };

    view! {
        <div class="centered-content">
            <div class="auth-form-container">
                <h2>"Register for Briefify"</h2>
                <p class="auth-intro-text">
                    "Create your account and start summarizing documents!"
                </p>
                <form on:submit=on_submit>
                    <div class="form-group">
                        <label for="username">"Username or Email"</label>
                        <input
                            id="username"
                            type="text"
                            placeholder="Choose a username or email"
                            on:input=move |ev| form.username.set(event_target_value(&ev))
                            prop:value=form.username
                            required
                        />
                    </div>
                    <div class="form-group password-group">
                        <label for="password">"Password"</label>
                        <input
                            id="password"
                            type=input_type
                            placeholder="Choose a strong password"
                            on:input=move |ev| form.password.set(event_target_value(&ev))
                            prop:value=form.password
                            required
                        />
                        <span class="password-toggle" on:click=toggle>{toggle_label}</span>
                    </div>
                    <div class="form-group password-group">
                        <label for="confirmPassword">"Confirm Password"</label>
                        <input
                            id="confirmPassword"
                            type=input_type
                            placeholder="Confirm your password"
                            on:input=move |ev| form.confirm_password.set(event_target_value(&ev))
                            prop:value=form.confirm_password
                            required
                        />
                        <span class="password-toggle" on:click=toggle>{toggle_label}</span>
                    </div>
                    <Show when=move || error_msg.get().is_some()>
                        <p class="error-message">{move || error_msg.get().unwrap_or_default()}</p>
                    </Show>
                    <Show when=move || success_msg.get().is_some()>
                        <p class="success-message">{move || success_msg.get().unwrap_or_default()}</p>
                    </Show>
                    <button
                        type="submit"
                        class="auth-button register-button"
                        disabled=move || is_submitting.get()
                    >
                        {move || if is_submitting.get() { "Registering..." } else { "Register" }}
                    </button>
                </form>
                <p class="auth-link-text">
                    "Already have an account? "
                    <Link to="/login">"Login here"</Link>
                </p>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::http::MockHttpClient;
    use briefify_shared::protocol::HttpMethod;

    const REGISTER_URL: &str = "http://api.test/api/auth/register";

    #[test]
    fn test_password_mismatch_rejected() {
        assert_eq!(
            validate_registration("ann", "secret", "secreT"),
            Err("Passwords do not match.".to_string())
        );
    }

    #[test]
    fn test_missing_fields_rejected() {
        assert_eq!(
            validate_registration("", "a", "a"),
            Err(MSG_FILL_ALL_FIELDS.to_string())
        );
        assert_eq!(
            validate_registration("ann", "a", ""),
            Err(MSG_FILL_ALL_FIELDS.to_string())
        );
    }

    #[test]
    fn test_valid_form_builds_credentials() {
        assert_eq!(
            validate_registration("ann", "pw", "pw"),
            Ok(Credentials::new("ann", "pw"))
        );
    }

    #[tokio::test]
    async fn test_backend_text_is_shown() {
        let api = BriefifyApi::new("http://api.test", MockHttpClient::new());
        api.client().mock_response(
            HttpMethod::Post,
            REGISTER_URL,
            400,
            "Username already exists!",
        );

        let err = submit_registration(&api, &Credentials::new("ann", "pw"))
            .await
            .unwrap_err();
        assert_eq!(err, "Username already exists!");
    }

    #[tokio::test]
    async fn test_network_failure_shows_generic_message() {
        let api = BriefifyApi::new("http://api.test", MockHttpClient::new());
        api.client().mock_network_error(HttpMethod::Post, REGISTER_URL);

        let err = submit_registration(&api, &Credentials::new("ann", "pw"))
            .await
            .unwrap_err();
        assert_eq!(err, "Registration failed. Please try again later.");
    }

    #[tokio::test]
    async fn test_success_message() {
        let api = BriefifyApi::new("http://api.test", MockHttpClient::new());
        api.client().mock_response(
            HttpMethod::Post,
            REGISTER_URL,
            200,
            "User registered successfully: ann",
        );

        let msg = submit_registration(&api, &Credentials::new("ann", "pw"))
            .await
            .unwrap();
        assert_eq!(msg, "Registration successful! You can now log in.");
    }
}
