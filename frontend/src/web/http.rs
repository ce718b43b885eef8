//! HTTP 请求封装模块
//!
//! 使用 `web_sys::fetch` 发送请求，并通过 `HttpClient` trait 与业务逻辑解耦：
//! 浏览器中使用 `FetchClient`，测试中使用 `MockHttpClient`。

use briefify_shared::protocol::HttpMethod;
use briefify_shared::{BEARER_PREFIX, HEADER_AUTHORIZATION};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, FormData, Headers, Request, RequestInit, Response};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::collections::HashMap;

// =========================================================
// 错误类型
// =========================================================

/// HTTP 错误类型
///
/// 只描述"没有拿到可用响应"的情况；拿到响应后的状态码由调用方解释。
#[derive(Debug, Clone, PartialEq)]
pub enum HttpError {
    /// 请求构建失败
    RequestBuildFailed(String),
    /// 网络请求失败（没有收到任何响应）
    NetworkError(String),
    /// 响应读取失败
    ResponseParseFailed(String),
}

impl core::fmt::Display for HttpError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            HttpError::RequestBuildFailed(msg) => write!(f, "request build failed: {}", msg),
            HttpError::NetworkError(msg) => write!(f, "network error: {}", msg),
            HttpError::ResponseParseFailed(msg) => write!(f, "response read failed: {}", msg),
        }
    }
}

impl std::error::Error for HttpError {}

// =========================================================
// 上传文件
// =========================================================

/// 上传文件的内容来源
#[derive(Debug, Clone, PartialEq)]
pub enum FileSource {
    /// 来自 `<input type="file">` 的浏览器文件句柄
    Browser(web_sys::File),
    /// 只有声明的元数据，没有内容
    #[cfg(test)]
    Declared,
}

/// 待上传的文件及其声明的元数据
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub name: String,
    /// 浏览器声明的 MIME 类型，可能为空
    pub content_type: String,
    pub size: u64,
    pub source: FileSource,
}

impl UploadFile {
    pub fn from_browser(file: web_sys::File) -> Self {
        Self {
            name: file.name(),
            content_type: file.type_(),
            size: file.size() as u64,
            source: FileSource::Browser(file),
        }
    }

    /// 只声明大小、不携带内容的文件，便于测试大文件校验
    #[cfg(test)]
    pub fn declared(name: &str, content_type: &str, size: u64) -> Self {
        Self {
            name: name.to_string(),
            content_type: content_type.to_string(),
            size,
            source: FileSource::Declared,
        }
    }

    fn to_blob(&self) -> Result<Blob, HttpError> {
        match &self.source {
            FileSource::Browser(file) => Ok(file.clone().into()),
            #[cfg(test)]
            FileSource::Declared => Err(HttpError::RequestBuildFailed(format!(
                "{} has no content",
                self.name
            ))),
        }
    }
}

// =========================================================
// 请求 / 响应
// =========================================================

/// 请求体
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// 已序列化的 JSON 文本
    Json(String),
    /// 单文件 multipart/form-data
    Multipart { field: String, file: UploadFile },
}

/// 通用 HTTP 请求结构
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    pub body: Option<RequestBody>,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.push((key.to_string(), value.to_string()));
        self
    }

    /// 附加 `Authorization: Bearer <token>`
    pub fn with_bearer(self, token: &str) -> Self {
        let value = format!("{}{}", BEARER_PREFIX, token);
        self.with_header(HEADER_AUTHORIZATION, &value)
    }

    pub fn with_json(self, json: String) -> Self {
        let mut req = self.with_header("Content-Type", "application/json");
        req.body = Some(RequestBody::Json(json));
        req
    }

    /// multipart 的 Content-Type（含 boundary）由浏览器生成，这里不设置
    pub fn with_multipart(mut self, field: &str, file: UploadFile) -> Self {
        self.body = Some(RequestBody::Multipart {
            field: field.to_string(),
            file,
        });
        self
    }

    /// 按名称（大小写不敏感）查找请求头
    #[cfg(test)]
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

/// 通用 HTTP 响应结构
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// 检查响应是否成功 (2xx)
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP 客户端特性
///
/// 浏览器中的 future 不是 `Send` 的，因此使用 `?Send`。
#[async_trait::async_trait(?Send)]
pub trait HttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, HttpError>;
}

// =========================================================
// 实现层: fetch 客户端
// =========================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct FetchClient;

impl FetchClient {
    fn build(req: &HttpRequest) -> Result<Request, HttpError> {
        let headers = Headers::new()
            .map_err(|e| HttpError::RequestBuildFailed(format!("Headers: {:?}", e)))?;

        for (key, value) in &req.headers {
            headers
                .set(key, value)
                .map_err(|e| HttpError::RequestBuildFailed(format!("header {}: {:?}", key, e)))?;
        }

        let opts = RequestInit::new();
        opts.set_method(req.method.as_str());
        opts.set_headers(&headers.into());

        match &req.body {
            Some(RequestBody::Json(json)) => opts.set_body(&JsValue::from_str(json)),
            Some(RequestBody::Multipart { field, file }) => {
                let form = FormData::new()
                    .map_err(|e| HttpError::RequestBuildFailed(format!("FormData: {:?}", e)))?;
                form.append_with_blob_and_filename(field, &file.to_blob()?, &file.name)
                    .map_err(|e| HttpError::RequestBuildFailed(format!("FormData: {:?}", e)))?;
                opts.set_body(&form.into());
            }
            None => {}
        }

        Request::new_with_str_and_init(&req.url, &opts)
            .map_err(|e| HttpError::RequestBuildFailed(format!("{:?}", e)))
    }

    async fn read_text(response: &Response) -> Result<String, HttpError> {
        let promise = response
            .text()
            .map_err(|e| HttpError::ResponseParseFailed(format!("{:?}", e)))?;

        let text = JsFuture::from(promise)
            .await
            .map_err(|e| HttpError::ResponseParseFailed(format!("{:?}", e)))?;

        text.as_string()
            .ok_or_else(|| HttpError::ResponseParseFailed("body is not a string".to_string()))
    }
}

#[async_trait::async_trait(?Send)]
impl HttpClient for FetchClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        let request = Self::build(&req)?;

        let window = web_sys::window()
            .ok_or_else(|| HttpError::NetworkError("no window object".to_string()))?;

        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| HttpError::NetworkError(format!("{:?}", e)))?;

        let response: Response = resp_value
            .dyn_into()
            .map_err(|e| HttpError::ResponseParseFailed(format!("not a Response: {:?}", e)))?;

        Ok(HttpResponse {
            status: response.status(),
            body: Self::read_text(&response).await?,
        })
    }
}

// =========================================================
// 测试工具: MockHttpClient
// =========================================================

#[cfg(test)]
#[derive(Debug, Clone)]
enum MockReply {
    Respond(u16, String),
    Fail(HttpError),
}

#[cfg(test)]
pub struct MockHttpClient {
    // (Method URL) -> reply
    replies: RefCell<HashMap<String, MockReply>>,
    /// 记录发出的全部请求
    pub requests: RefCell<Vec<HttpRequest>>,
}

#[cfg(test)]
impl MockHttpClient {
    pub fn new() -> Self {
        Self {
            replies: RefCell::new(HashMap::new()),
            requests: RefCell::new(Vec::new()),
        }
    }

    fn route(method: HttpMethod, url: &str) -> String {
        format!("{} {}", method.as_str(), url)
    }

    pub fn mock_response(&self, method: HttpMethod, url: &str, status: u16, body: &str) {
        self.replies.borrow_mut().insert(
            Self::route(method, url),
            MockReply::Respond(status, body.to_string()),
        );
    }

    /// 模拟没有任何响应的网络层失败
    pub fn mock_network_error(&self, method: HttpMethod, url: &str) {
        self.replies.borrow_mut().insert(
            Self::route(method, url),
            MockReply::Fail(HttpError::NetworkError("connection refused".to_string())),
        );
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

#[cfg(test)]
#[async_trait::async_trait(?Send)]
impl HttpClient for MockHttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        let key = Self::route(req.method, &req.url);
        self.requests.borrow_mut().push(req);

        match self.replies.borrow().get(&key).cloned() {
            Some(MockReply::Respond(status, body)) => Ok(HttpResponse { status, body }),
            Some(MockReply::Fail(err)) => Err(err),
            None => Ok(HttpResponse {
                status: 404,
                body: "Not Found".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_header() {
        let req = HttpRequest::new("http://x/api", HttpMethod::Get).with_bearer("t0k");
        assert_eq!(req.header("authorization"), Some("Bearer t0k"));
    }

    #[test]
    fn test_json_sets_content_type() {
        let req = HttpRequest::new("http://x/api", HttpMethod::Post).with_json("{}".into());
        assert_eq!(req.header("Content-Type"), Some("application/json"));
        assert_eq!(req.body, Some(RequestBody::Json("{}".into())));
    }

    #[test]
    fn test_multipart_leaves_content_type_to_browser() {
        let file = UploadFile::declared("a.pdf", "application/pdf", 3);
        let req = HttpRequest::new("http://x/up", HttpMethod::Post).with_multipart("file", file);
        assert!(req.header("Content-Type").is_none());
        assert!(matches!(req.body, Some(RequestBody::Multipart { ref field, .. }) if field == "file"));
    }

    #[test]
    fn test_response_ok_range() {
        let ok = HttpResponse { status: 204, body: String::new() };
        let not_ok = HttpResponse { status: 302, body: String::new() };
        assert!(ok.ok());
        assert!(!not_ok.ok());
    }

    #[test]
    fn test_declared_file_cannot_become_blob() {
        let file = UploadFile::declared("a.pdf", "application/pdf", 3);
        assert!(matches!(
            file.to_blob(),
            Err(HttpError::RequestBuildFailed(msg)) if msg.contains("a.pdf")
        ));
    }
}
