use serde::{Deserialize, Serialize};

pub mod protocol;

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const BEARER_PREFIX: &str = "Bearer ";

/// multipart 上传时文件所在的表单字段名
pub const UPLOAD_FIELD_NAME: &str = "file";
pub const PDF_CONTENT_TYPE: &str = "application/pdf";
/// 单个上传文件的大小上限 (50 MiB)
pub const MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

/// 历史列表中摘要预览的最大字符数
pub const SUMMARY_PREVIEW_CHARS: usize = 200;
pub const SUMMARY_ELLIPSIS: &str = "...";
pub const NO_SUMMARY_PLACEHOLDER: &str = "No summary.";

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

/// 注册 / 登录共用的请求体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// 后端返回的完整文档记录
///
/// 客户端只读，从不缓存到视图生命周期之外。
/// 未知字段（如 `createdAt`）直接忽略。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    pub id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub original_file_name: String,
    #[serde(default)]
    pub extracted_text: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
}

impl DocumentRecord {
    /// 非空时才返回提取文本
    pub fn extracted_text(&self) -> Option<&str> {
        non_empty(self.extracted_text.as_deref())
    }

    /// 非空时才返回摘要
    pub fn summary(&self) -> Option<&str> {
        non_empty(self.summary.as_deref())
    }
}

/// 历史列表条目：文档记录的子集
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSummary {
    pub id: String,
    pub original_file_name: String,
    pub summary: Option<String>,
}

impl DocumentSummary {
    /// 用于展示的摘要预览
    ///
    /// 超过 [`SUMMARY_PREVIEW_CHARS`] 个字符时截断并追加省略号，
    /// 按字符而非字节截断，不会切开多字节字符。
    pub fn summary_preview(&self) -> String {
        match non_empty(self.summary.as_deref()) {
            Some(summary) => preview(summary, SUMMARY_PREVIEW_CHARS),
            None => NO_SUMMARY_PLACEHOLDER.to_string(),
        }
    }

    /// 详情页路径，id 按单个路径段编码
    pub fn detail_path(&self) -> String {
        format!("/document/{}", protocol::encode_path_segment(&self.id))
    }
}

impl From<DocumentRecord> for DocumentSummary {
    fn from(record: DocumentRecord) -> Self {
        Self {
            id: record.id,
            original_file_name: record.original_file_name,
            summary: record.summary,
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{}", &text[..cut], SUMMARY_ELLIPSIS),
        None => text.to_string(),
    }
}
