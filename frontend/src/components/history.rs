use crate::api::{BriefifyApi, use_api};
use crate::auth::use_auth;
use crate::gate::RequestGate;
use crate::web::HttpClient;
use crate::web::router::Link;
use briefify_shared::DocumentSummary;
use leptos::prelude::*;
use leptos::task::spawn_local;

const MSG_NOT_LOGGED_IN: &str = "You must be logged in to view document history.";
const MSG_LOAD_FAILED: &str = "Failed to load document history. Please try again.";

/// 历史列表视图状态
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryState {
    Loading,
    Failed(String),
    Empty,
    Loaded(Vec<DocumentSummary>),
}

/// 拉取当前用户的文档列表
///
/// 没有令牌时直接返回错误状态，不发请求。
pub async fn load_history<C: HttpClient>(
    api: &BriefifyApi<C>,
    token: Option<&str>,
) -> HistoryState {
    let Some(token) = token else {
        return HistoryState::Failed(MSG_NOT_LOGGED_IN.to_string());
    };

    match api.list_documents(token).await {
        Ok(records) if records.is_empty() => HistoryState::Empty,
        Ok(records) => {
            HistoryState::Loaded(records.into_iter().map(DocumentSummary::from).collect())
        }
        Err(e) => {
            log::error!("[History] Failed to load documents: {}", e);
            HistoryState::Failed(MSG_LOAD_FAILED.to_string())
        }
    }
}

#[component]
pub fn HistoryPage() -> impl IntoView {
    let auth = use_auth();
    let api = use_api();

    let state = RwSignal::new(HistoryState::Loading);
    let gate = StoredValue::new(RequestGate::<Option<String>>::new());

    // 令牌变化时重新拉取
    Effect::new(move |_| {
        let token = auth.token();
        if !gate.try_update_value(|g| g.observe(token.clone())).unwrap_or(false) {
            return;
        }
        state.set(HistoryState::Loading);

        let api = api.clone();
        spawn_local(async move {
            let next = load_history(&api, token.as_deref()).await;
            if gate.try_with_value(|g| g.is_current(&token)).unwrap_or(false) {
                let _ = state.try_set(next);
            }
        });
    });

    let body = move || match state.get() {
        HistoryState::Loading => view! {
            <div class="history-status">
                <div class="modern-spinner" aria-label="Loading"></div>
                <p>"Loading documents..."</p>
            </div>
        }
        .into_any(),
        HistoryState::Failed(msg) => view! { <p class="error-message">{msg}</p> }.into_any(),
        HistoryState::Empty => view! {
            <div class="history-empty">
                <p>"No documents uploaded yet."</p>
                <Link to="/upload" class="upload-new-link">"Upload your first document"</Link>
            </div>
        }
        .into_any(),
        HistoryState::Loaded(documents) => view! {
            <ul class="history-list">
                <For
                    each=move || documents.clone()
                    key=|doc| doc.id.clone()
                    children=move |doc| view! { <HistoryItem doc=doc /> }
                />
            </ul>
        }
        .into_any(),
    };

    view! {
        <div class="centered-content">
            <div class="history-container">
                <h2 class="main-dashboard-title">"Your Document History"</h2>
                {body}
                <div class="history-actions">
                    <Link to="/upload" class="upload-new-link">"Upload New Document"</Link>
                </div>
            </div>
        </div>
    }
}

#[component]
fn HistoryItem(doc: DocumentSummary) -> impl IntoView {
    let preview = doc.summary_preview();
    let detail_path = doc.detail_path();

    view! {
        <li class="history-item">
            <h3 class="history-file-name">{doc.original_file_name}</h3>
            <p class="history-summary">{preview}</p>
            <Link to=detail_path class="view-details-link">"View Details"</Link>
        </li>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::http::MockHttpClient;
    use briefify_shared::protocol::HttpMethod;

    const LIST_URL: &str = "http://api.test/api/documents/user";

    fn api() -> BriefifyApi<MockHttpClient> {
        BriefifyApi::new("http://api.test", MockHttpClient::new())
    }

    #[tokio::test]
    async fn test_anonymous_skips_network() {
        let api = api();
        let state = load_history(&api, None).await;
        assert_eq!(
            state,
            HistoryState::Failed("You must be logged in to view document history.".into())
        );
        assert_eq!(api.client().request_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_list() {
        let api = api();
        api.client().mock_response(HttpMethod::Get, LIST_URL, 200, "[]");
        assert_eq!(load_history(&api, Some("tok")).await, HistoryState::Empty);
    }

    #[tokio::test]
    async fn test_long_summaries_are_previewed() {
        let api = api();
        let long = "a".repeat(250);
        let body = format!(
            r#"[{{"id":"1","originalFileName":"one.pdf","summary":"{long}"}},{{"id":"2","originalFileName":"two.pdf","summary":"{long}","createdAt":"2024-05-01T10:00:00"}}]"#
        );
        api.client().mock_response(HttpMethod::Get, LIST_URL, 200, &body);

        let HistoryState::Loaded(docs) = load_history(&api, Some("tok")).await else {
            panic!("expected loaded state");
        };
        assert_eq!(docs.len(), 2);
        for doc in &docs {
            let preview = doc.summary_preview();
            assert_eq!(preview, format!("{}...", "a".repeat(200)));
        }
        assert_eq!(docs[1].detail_path(), "/document/2");
    }

    #[tokio::test]
    async fn test_missing_summary_placeholder() {
        let api = api();
        api.client().mock_response(
            HttpMethod::Get,
            LIST_URL,
            200,
            r#"[{"id":"9","originalFileName":"x.pdf","summary":null}]"#,
        );

        let HistoryState::Loaded(docs) = load_history(&api, Some("tok")).await else {
            panic!("expected loaded state");
        };
        assert_eq!(docs[0].summary_preview(), "No summary.");
    }

    #[tokio::test]
    async fn test_failure_message() {
        let api = api();
        api.client().mock_response(HttpMethod::Get, LIST_URL, 500, "boom");
        assert_eq!(
            load_history(&api, Some("tok")).await,
            HistoryState::Failed("Failed to load document history. Please try again.".into())
        );
    }
}
