use crate::api::{BriefifyApi, use_api};
use crate::auth::use_auth;
use crate::components::layout::LogoutButton;
use crate::web::{HttpClient, UploadFile};
use briefify_shared::{MAX_UPLOAD_BYTES, PDF_CONTENT_TYPE};
use leptos::html::Input;
use leptos::prelude::*;
use leptos::task::spawn_local;
use web_sys::HtmlInputElement;


const MSG_UPLOAD_FAILED_PREFIX: &str = "Upload failed: ";
const MSG_UPLOAD_FAILED_GENERIC: &str = "Upload failed. Please try again.";
const MSG_NOT_LOGGED_IN: &str = "You must be logged in to upload documents.";

/// 提交前校验失败的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadRejection {
    NoFile,
    NotPdf,
    TooLarge,
}

impl UploadRejection {
    pub fn message(&self) -> &'static str {
        match self {
            UploadRejection::NoFile => "Please select a PDF file to upload.",
            UploadRejection::NotPdf => "Only PDF files are allowed.",
            UploadRejection::TooLarge => "File size exceeds 50MB limit.",
        }
    }

    /// 类型或大小不合格时同时清空已选文件
    pub fn clears_selection(&self) -> bool {
        !matches!(self, UploadRejection::NoFile)
    }
}

/// 客户端校验：声明类型必须是 PDF，大小不超过 50 MiB
pub fn validate_upload(file: Option<UploadFile>) -> Result<UploadFile, UploadRejection> {
    let file = file.ok_or(UploadRejection::NoFile)?;
    if file.content_type != PDF_CONTENT_TYPE {
        return Err(UploadRejection::NotPdf);
    }
    if file.size > MAX_UPLOAD_BYTES {
        return Err(UploadRejection::TooLarge);
    }
    Ok(file)
}

/// 发送上传请求，成功时返回后端原始响应文本，失败时返回可展示的错误信息
///
/// 不做自动重试。
pub async fn submit_upload<C: HttpClient>(
    api: &BriefifyApi<C>,
    token: &str,
    file: UploadFile,
) -> Result<String, String> {
    log::info!("[Upload] Sending {} ({} bytes)", file.name, file.size);
    api.upload_document(token, file).await.map_err(|e| {
        match e.textual_body() {
            Some(text) => format!("{}{}", MSG_UPLOAD_FAILED_PREFIX, text),
            None => format!("{} {}", MSG_UPLOAD_FAILED_GENERIC, e.message),
        }
    })
}

/// 一次上传操作结束后的视图状态
#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    /// 提交前被拒绝，没有发出请求
    Rejected {
        message: String,
        clear_selection: bool,
    },
    /// 上传成功；响应体为空时没有可展示的结果
    Completed(Option<String>),
    Failed(String),
}

impl UploadOutcome {
    pub fn clears_selection(&self) -> bool {
        match self {
            UploadOutcome::Rejected {
                clear_selection, ..
            } => *clear_selection,
            UploadOutcome::Completed(_) => true,
            UploadOutcome::Failed(_) => false,
        }
    }
}

/// 校验当前选择的文件并上传
///
/// 校验失败或没有令牌时不发请求。
pub async fn upload_selection<C: HttpClient>(
    api: &BriefifyApi<C>,
    token: Option<&str>,
    selection: Option<UploadFile>,
) -> UploadOutcome {
    let file = match validate_upload(selection) {
        Ok(file) => file,
        Err(rejection) => {
            log::debug!("[Upload] Rejected before sending: {:?}", rejection);
            return UploadOutcome::Rejected {
                message: rejection.message().to_string(),
                clear_selection: rejection.clears_selection(),
            };
        }
    };
    let Some(token) = token else {
        return UploadOutcome::Rejected {
            message: MSG_NOT_LOGGED_IN.to_string(),
            clear_selection: false,
        };
    };

    match submit_upload(api, token, file).await {
        Ok(text) if text.trim().is_empty() => UploadOutcome::Completed(None),
        Ok(text) => UploadOutcome::Completed(Some(text)),
        Err(msg) => UploadOutcome::Failed(msg),
    }
}

#[component]
pub fn UploadPage() -> impl IntoView {
    let auth = use_auth();
    let api = use_api();

    let input_ref = NodeRef::<Input>::new();
    let selected = RwSignal::new_local(Option::<UploadFile>::None);
    let (uploading, set_uploading) = signal(false);
    let (response_msg, set_response_msg) = signal(Option::<String>::None);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let clear_selection = move || {
        let _ = selected.try_set(None);
        if let Some(input) = input_ref.get_untracked() {
            input.set_value("");
        }
    };

    let on_file_change = move |ev: leptos::ev::Event| {
        let input: HtmlInputElement = event_target(&ev);
        let file = input
            .files()
            .and_then(|files| files.get(0))
            .map(UploadFile::from_browser);
        selected.set(file);
        set_response_msg.set(None);
        set_error_msg.set(None);
    };

    let on_upload = move |_: leptos::ev::MouseEvent| {
        if uploading.get_untracked() {
            return;
        }
        set_uploading.set(true);
        set_error_msg.set(None);
        set_response_msg.set(None);

        let api = api.clone();
        let token = auth.token_untracked();
        let selection = selected.get_untracked();
        spawn_local(async move {
            let outcome = upload_selection(&api, token.as_deref(), selection).await;
            if outcome.clears_selection() {
                clear_selection();
            }
            match outcome {
                UploadOutcome::Completed(text) => {
                    let _ = set_response_msg.try_set(text);
                }
                UploadOutcome::Rejected { message, .. } | UploadOutcome::Failed(message) => {
                    let _ = set_error_msg.try_set(Some(message));
                }
            }
            let _ = set_uploading.try_set(false);
        });
    };

    view! {
        <div class="centered-content">
            <div class="main-dashboard-container">
                <h2 class="main-dashboard-title">"Upload Document for Summarization"</h2>

                <div class="upload-guidelines">
                    <p><strong>"Tips for best results:"</strong></p>
                    <ul>
                        <li>"Only PDF files are supported (maximum 50 MB)."</li>
                        <li>"For scanned documents, use clear, high-resolution scans of printed text."</li>
                        <li>"Handwritten notes may have limited accuracy due to OCR challenges."</li>
                        <li>"Long documents will be truncated for summarization (up to ~10,000 characters)."</li>
                    </ul>
                </div>

                <div class="upload-section">
                    <input
                        node_ref=input_ref
                        type="file"
                        accept=".pdf,application/pdf"
                        class="file-input"
                        on:change=on_file_change
                    />
                    <button
                        class="upload-button"
                        on:click=on_upload
                        disabled=move || uploading.get()
                    >
                        {move || if uploading.get() { "Uploading..." } else { "Upload PDF" }}
                    </button>
                    <Show when=move || uploading.get()>
                        <div class="modern-spinner" aria-label="Uploading, please wait..."></div>
                    </Show>
                </div>

                <Show when=move || error_msg.get().is_some()>
                    <p class="error-message">{move || error_msg.get().unwrap_or_default()}</p>
                </Show>

                <Show when=move || response_msg.get().is_some()>
                    <div class="response-display">
                        <h3>"Processing Complete!"</h3>
                        <pre>{move || response_msg.get().unwrap_or_default()}</pre>
                    </div>
                </Show>

                <div class="logout-button-wrapper">
                    <LogoutButton />
                </div>
            </div>
        </div>
    }
}
