use briefify_shared::protocol::{
    ApiEndpoint, GetDocument, ListUserDocuments, Login, Register, UploadDocument,
};
use briefify_shared::{Credentials, DocumentRecord, LoginResponse, UPLOAD_FIELD_NAME};
use serde::de::DeserializeOwned;

use crate::error::{ApiError, ApiResult};
use crate::web::http::{FetchClient, HttpClient, HttpRequest, HttpResponse, UploadFile};

/// 浏览器中实际使用的 API 客户端
pub type AppApi = BriefifyApi<FetchClient>;

/// 从 Context 获取 API 客户端
pub fn use_api() -> AppApi {
    leptos::prelude::use_context::<AppApi>().expect("AppApi should be provided")
}

/// Briefify 后端 REST 客户端
///
/// 每个方法对应一个后端端点；令牌由调用方（视图）从会话中读取后传入。
#[derive(Clone, Debug, PartialEq)]
pub struct BriefifyApi<C> {
    pub base_url: String,
    client: C,
}

impl<C: HttpClient> BriefifyApi<C> {
    pub fn new(base_url: impl Into<String>, client: C) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    #[cfg(test)]
    pub fn client(&self) -> &C {
        &self.client
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn request<E: ApiEndpoint>(&self, path: &str, token: Option<&str>) -> HttpRequest {
        let req = HttpRequest::new(&self.url(path), E::METHOD);
        match (E::AUTHENTICATED, token) {
            (true, Some(token)) => req.with_bearer(token),
            _ => req,
        }
    }

    /// 发送请求；非 2xx 响应转换为 `ApiError`
    async fn execute(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        let method = req.method;
        let url = req.url.clone();
        let res = self.client.send(req).await.map_err(|e| {
            log::warn!("[Api] {} {} failed: {}", method.as_str(), url, e);
            ApiError::from(e)
        })?;

        if !res.ok() {
            log::warn!("[Api] {} {} -> {}", method.as_str(), url, res.status);
            return Err(ApiError::from_response(res.status, res.body));
        }
        log::debug!("[Api] {} {} -> {}", method.as_str(), url, res.status);
        Ok(res)
    }

    /// 发送请求并按端点声明的响应类型解码 JSON
    async fn fetch_json<E>(&self, req: HttpRequest) -> ApiResult<E::Response>
    where
        E: ApiEndpoint,
        E::Response: DeserializeOwned,
    {
        let res = self.execute(req).await?;
        Ok(serde_json_wasm::from_str::<E::Response>(&res.body)?)
    }

    /// 注册新用户，返回后端的状态文本
    pub async fn register(&self, credentials: &Credentials) -> ApiResult<String> {
        let body = serde_json_wasm::to_string(credentials)?;
        let req = self.request::<Register>(Register::PATH, None).with_json(body);
        Ok(self.execute(req).await?.body)
    }

    /// 用户名密码换取令牌
    pub async fn login(&self, credentials: &Credentials) -> ApiResult<String> {
        let body = serde_json_wasm::to_string(credentials)?;
        let req = self.request::<Login>(Login::PATH, None).with_json(body);
        let LoginResponse { token } = self.fetch_json::<Login>(req).await?;
        if token.is_empty() {
            return Err(ApiError::decode("login response carried an empty token"));
        }
        Ok(token)
    }

    /// 上传 PDF，返回后端的处理结果文本
    pub async fn upload_document(&self, token: &str, file: UploadFile) -> ApiResult<String> {
        let req = self
            .request::<UploadDocument>(UploadDocument::PATH, Some(token))
            .with_multipart(UPLOAD_FIELD_NAME, file);
        Ok(self.execute(req).await?.body)
    }

    /// 当前用户的全部文档
    pub async fn list_documents(&self, token: &str) -> ApiResult<Vec<DocumentRecord>> {
        let req = self.request::<ListUserDocuments>(ListUserDocuments::PATH, Some(token));
        self.fetch_json::<ListUserDocuments>(req).await
    }

    /// 单个文档的完整记录
    pub async fn get_document(&self, token: &str, id: &str) -> ApiResult<DocumentRecord> {
        let req = self.request::<GetDocument>(&GetDocument::path_for(id), Some(token));
        self.fetch_json::<GetDocument>(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiErrorStatus;
    use crate::web::http::{MockHttpClient, RequestBody};
    use briefify_shared::protocol::HttpMethod;

    const BASE: &str = "http://api.test";

    fn api() -> BriefifyApi<MockHttpClient> {
        BriefifyApi::new(format!("{}/", BASE), MockHttpClient::new())
    }

    #[tokio::test]
    async fn test_login_returns_token() {
        let api = api();
        api.client.mock_response(
            HttpMethod::Post,
            "http://api.test/api/auth/login",
            200,
            r#"{"token":"jwt-1"}"#,
        );

        let token = api.login(&Credentials::new("ann", "pw")).await.unwrap();
        assert_eq!(token, "jwt-1");

        let reqs = api.client.requests.borrow();
        assert_eq!(reqs.len(), 1);
        assert!(reqs[0].header("Authorization").is_none());
        assert_eq!(
            reqs[0].body,
            Some(RequestBody::Json(r#"{"username":"ann","password":"pw"}"#.into()))
        );
    }

    #[tokio::test]
    async fn test_login_unauthorized() {
        let api = api();
        api.client
            .mock_response(HttpMethod::Post, "http://api.test/api/auth/login", 401, "");

        let err = api.login(&Credentials::new("ann", "bad")).await.unwrap_err();
        assert_eq!(err.status, ApiErrorStatus::Unauthorized);
    }

    #[tokio::test]
    async fn test_list_documents_sends_bearer() {
        let api = api();
        api.client.mock_response(
            HttpMethod::Get,
            "http://api.test/api/documents/user",
            200,
            r#"[{"id":"1","originalFileName":"a.pdf","summary":"s"}]"#,
        );

        let docs = api.list_documents("tok").await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].original_file_name, "a.pdf");

        let reqs = api.client.requests.borrow();
        assert_eq!(reqs[0].header("Authorization"), Some("Bearer tok"));
    }

    #[tokio::test]
    async fn test_get_document_undecodable_body() {
        let api = api();
        api.client.mock_response(
            HttpMethod::Get,
            "http://api.test/api/documents/42",
            200,
            "<html>oops</html>",
        );

        let err = api.get_document("tok", "42").await.unwrap_err();
        assert_eq!(err.status, ApiErrorStatus::Decode);
    }

    #[tokio::test]
    async fn test_network_failure_maps_to_network_status() {
        let api = api();
        api.client
            .mock_network_error(HttpMethod::Get, "http://api.test/api/documents/user");

        let err = api.list_documents("tok").await.unwrap_err();
        assert_eq!(err.status, ApiErrorStatus::Network);
        assert_eq!(err.textual_body(), None);
    }

    #[tokio::test]
    async fn test_register_returns_status_text() {
        let api = api();
        api.client.mock_response(
            HttpMethod::Post,
            "http://api.test/api/auth/register",
            200,
            "User registered successfully: ann",
        );

        let text = api.register(&Credentials::new("ann", "pw")).await.unwrap();
        assert_eq!(text, "User registered successfully: ann");
    }

    #[tokio::test]
    async fn test_fetch_json_decodes_declared_response() {
        let api = api();
        api.client.mock_response(
            HttpMethod::Get,
            "http://api.test/api/documents/7",
            200,
            r#"{"id":"7","originalFileName":"b.pdf","summary":"ok"}"#,
        );

        let req = api.request::<GetDocument>(&GetDocument::path_for("7"), Some("tok"));
        let doc: DocumentRecord = api.fetch_json::<GetDocument>(req).await.unwrap();
        assert_eq!(doc.id, "7");
        assert_eq!(doc.summary(), Some("ok"));
    }

    #[tokio::test]
    async fn test_fetch_json_rejects_wrong_shape() {
        let api = api();
        api.client.mock_response(
            HttpMethod::Get,
            "http://api.test/api/documents/user",
            200,
            r#"{"id":"not-a-list"}"#,
        );

        let err = api.list_documents("tok").await.unwrap_err();
        assert_eq!(err.status, ApiErrorStatus::Decode);
    }
}
