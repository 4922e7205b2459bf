use bytes::Bytes;
use serde_json::Value as JsonValue;

/// HTTP 方法
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Head,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
        }
    }
}

/// multipart 表单中的单个文件字段
#[derive(Debug, Clone)]
pub struct MultipartFile {
    pub field: String,
    pub file_name: String,
    pub mime: String,
    pub bytes: Bytes,
}

/// 请求体
#[derive(Debug, Clone)]
pub enum RequestBody {
    Empty,
    Json(JsonValue),
    Multipart(MultipartFile),
}

/// 发往网络的请求
///
/// 请求的身份就是 `url`（包含查询参数），缓存按它作为键。
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: HttpMethod,
    pub url: String,
    pub body: RequestBody,
}

impl OutboundRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            body: RequestBody::Empty,
        }
    }

    pub fn post_json(url: impl Into<String>, body: JsonValue) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            body: RequestBody::Json(body),
        }
    }

    pub fn post_multipart(url: impl Into<String>, file: MultipartFile) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            body: RequestBody::Multipart(file),
        }
    }

    pub fn is_get(&self) -> bool {
        self.method == HttpMethod::Get
    }
}
