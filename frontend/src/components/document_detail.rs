use crate::api::{BriefifyApi, use_api};
use crate::auth::use_auth;
use crate::gate::RequestGate;
use crate::web::HttpClient;
use crate::web::route::AppRoute;
use crate::web::router::use_router;
use briefify_shared::DocumentRecord;
use leptos::prelude::*;
use leptos::task::spawn_local;


const MSG_ACCESS_DENIED: &str = "Document not found or you do not have permission to view it.";
const MSG_LOAD_FAILED: &str = "Failed to load document details. Please try again.";

/// 文档详情视图状态
#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Loading,
    /// 没有令牌，需要跳转登录页
    RedirectToLogin,
    Failed(String),
    Loaded(DocumentRecord),
}

/// 请求键：文档 id 与当前令牌
type DetailKey = (String, Option<String>);

/// 拉取单个文档
///
/// 403 / 404 统一提示"不存在或无权限"，其余失败一律提示重试。
pub async fn load_document<C: HttpClient>(
    api: &BriefifyApi<C>,
    token: Option<&str>,
    id: &str,
) -> DetailState {
    let Some(token) = token else {
        return DetailState::RedirectToLogin;
    };

    match api.get_document(token, id).await {
        Ok(record) => DetailState::Loaded(record),
        Err(e) if e.is_access_denied() => {
            log::warn!("[Detail] Document {} not accessible: {}", id, e);
            DetailState::Failed(MSG_ACCESS_DENIED.to_string())
        }
        Err(e) => {
            log::error!("[Detail] Failed to load document {}: {}", id, e);
            DetailState::Failed(MSG_LOAD_FAILED.to_string())
        }
    }
}

/// 按请求键拉取并把结果写入 `state`
///
/// 键变化时先把状态重置为加载中，避免旧文档停留在页面上；
/// 键未变化或响应到达时键已过期则不写入结果，返回 `false`。
pub async fn refresh_detail<C: HttpClient>(
    api: &BriefifyApi<C>,
    gate: StoredValue<RequestGate<DetailKey>>,
    state: RwSignal<DetailState>,
    key: DetailKey,
) -> bool {
    if !gate.try_update_value(|g| g.observe(key.clone())).unwrap_or(false) {
        return false;
    }
    let _ = state.try_set(DetailState::Loading);

    let next = load_document(api, key.1.as_deref(), &key.0).await;
    if !gate.try_with_value(|g| g.is_current(&key)).unwrap_or(false) {
        return false;
    }
    state.try_set(next).is_none()
}

#[component]
pub fn DocumentDetailPage(id: String) -> impl IntoView {
    let auth = use_auth();
    let api = use_api();
    let router = use_router();

    let state = RwSignal::new(DetailState::Loading);
    let gate = StoredValue::new(RequestGate::<DetailKey>::new());

    Effect::new(move |_| {
        let key = (id.clone(), auth.token());
        let api = api.clone();
        spawn_local(async move {
            let applied = refresh_detail(&api, gate, state, key).await;
            if applied && state.with_untracked(|s| *s == DetailState::RedirectToLogin) {
                router.redirect(AppRoute::Login);
            }
        });
    });

    let back = move |_: leptos::ev::MouseEvent| router.navigate("/history");
    let back_button = move || {
        view! {
            <button class="back-button" on:click=back>"Back to History"</button>
        }
    };

    let body = move || match state.get() {
        DetailState::Loading | DetailState::RedirectToLogin => view! {
            <div class="detail-status">
                <div class="modern-spinner" aria-label="Loading"></div>
                <p>"Loading document..."</p>
            </div>
        }
        .into_any(),
        DetailState::Failed(msg) => view! {
            <div class="detail-error">
                <p class="error-message">{msg}</p>
                {back_button()}
            </div>
        }
        .into_any(),
        DetailState::Loaded(doc) => {
            let extracted = doc.extracted_text().map(str::to_string);
            let summary = doc.summary().map(str::to_string);
            view! {
                <div class="detail-content">
                    <h2 class="main-dashboard-title">{doc.original_file_name.clone()}</h2>
                    {summary.map(|text| view! {
                        <section class="detail-section">
                            <h3>"Summary"</h3>
                            <p class="detail-summary">{text}</p>
                        </section>
                    })}
                    {extracted.map(|text| view! {
                        <section class="detail-section">
                            <h3>"Extracted Text"</h3>
                            <pre class="detail-extracted-text">{text}</pre>
                        </section>
                    })}
                    {back_button()}
                </div>
            }
            .into_any()
        }
    };

    view! {
        <div class="centered-content">
            <div class="detail-container">{body}</div>
        </div>
    }
}
