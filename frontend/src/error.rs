use std::fmt;

use crate::web::http::HttpError;

// =========================================================
// 错误状态枚举
// =========================================================

/// API 调用失败的分类
///
/// 视图根据分类选择提示文案，分类本身不携带文案。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorStatus {
    /// 400: 后端校验失败
    BadRequest,
    /// 401: 凭据无效或已过期
    Unauthorized,
    /// 403: 无权访问该资源
    Forbidden,
    /// 404: 资源不存在
    NotFound,
    /// 其他非 2xx 响应
    Server,
    /// 没有收到响应
    Network,
    /// 响应体无法解析 / 请求体无法序列化
    Decode,
}

impl ApiErrorStatus {
    /// 将非 2xx 状态码映射为错误分类
    pub fn from_status_code(code: u16) -> Self {
        match code {
            400 => ApiErrorStatus::BadRequest,
            401 => ApiErrorStatus::Unauthorized,
            403 => ApiErrorStatus::Forbidden,
            404 => ApiErrorStatus::NotFound,
            _ => ApiErrorStatus::Server,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ApiErrorStatus::BadRequest => "BAD_REQUEST",
            ApiErrorStatus::Unauthorized => "UNAUTHORIZED",
            ApiErrorStatus::Forbidden => "FORBIDDEN",
            ApiErrorStatus::NotFound => "NOT_FOUND",
            ApiErrorStatus::Server => "SERVER_ERROR",
            ApiErrorStatus::Network => "NETWORK_ERROR",
            ApiErrorStatus::Decode => "DECODE_ERROR",
        }
    }
}

// =========================================================
// 核心错误类型
// =========================================================

/// API 调用错误
///
/// - status: 错误分类
/// - message: 面向日志的描述
/// - body: 收到响应时的原始响应体
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub status: ApiErrorStatus,
    pub message: String,
    body: Option<String>,
}

impl ApiError {
    pub fn new(status: ApiErrorStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            body: None,
        }
    }

    /// 由非 2xx 响应构造
    pub fn from_response(status_code: u16, body: String) -> Self {
        Self {
            status: ApiErrorStatus::from_status_code(status_code),
            message: format!("HTTP {}", status_code),
            body: Some(body),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ApiErrorStatus::Network, message)
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ApiErrorStatus::Decode, message)
    }

    // --- Accessors ---

    pub fn error_code(&self) -> &'static str {
        self.status.error_code()
    }

    /// 403 / 404：文档不存在或不属于当前用户
    pub fn is_access_denied(&self) -> bool {
        matches!(
            self.status,
            ApiErrorStatus::Forbidden | ApiErrorStatus::NotFound
        )
    }

    /// 后端返回的纯文本错误信息
    ///
    /// 仅当响应体非空且不是 JSON 对象 / 数组时才视为可直接展示的文本。
    pub fn textual_body(&self) -> Option<&str> {
        let body = self.body.as_deref()?.trim();
        if body.is_empty() || body.starts_with('{') || body.starts_with('[') {
            None
        } else {
            Some(body)
        }
    }
}

// =========================================================
// Display & Error trait 实现
// =========================================================

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.error_code(), self.message)
    }
}

impl std::error::Error for ApiError {}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

// =========================================================
// 类型转换实现
// =========================================================

impl From<HttpError> for ApiError {
    fn from(e: HttpError) -> Self {
        match e {
            HttpError::RequestBuildFailed(_) | HttpError::NetworkError(_) => {
                ApiError::network(e.to_string())
            }
            HttpError::ResponseParseFailed(_) => ApiError::decode(e.to_string()),
        }
    }
}

impl From<serde_json_wasm::de::Error> for ApiError {
    fn from(e: serde_json_wasm::de::Error) -> Self {
        ApiError::decode(e.to_string())
    }
}

impl From<serde_json_wasm::ser::Error> for ApiError {
    fn from(e: serde_json_wasm::ser::Error) -> Self {
        ApiError::decode(e.to_string())
    }
}
