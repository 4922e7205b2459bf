//! 网络访问能力

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method};
use tracing::debug;

use super::request::{HttpMethod, OutboundRequest, RequestBody};
use super::response::ResponseSnapshot;
use crate::error::NetworkError;

/// 发出一个请求并拿回完整响应
///
/// 只有"没有拿到响应"才算错误；4xx/5xx 是正常返回的响应。
#[async_trait]
pub trait NetworkFetcher: Send + Sync {
    async fn fetch(&self, request: &OutboundRequest) -> Result<ResponseSnapshot, NetworkError>;
}

/// 基于 reqwest 的网络访问实现
pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    pub fn new(timeout: Duration) -> Result<Self, NetworkError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NetworkError::InvalidRequest {
                url: String::new(),
                message: e.to_string(),
            })?;
        Ok(Self { client })
    }
}

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
        HttpMethod::Head => Method::HEAD,
    }
}

#[async_trait]
impl NetworkFetcher for ReqwestFetcher {
    async fn fetch(&self, request: &OutboundRequest) -> Result<ResponseSnapshot, NetworkError> {
        debug!("{} {}", request.method.as_str(), request.url);

        let mut builder = self
            .client
            .request(to_reqwest_method(request.method), &request.url);

        match &request.body {
            RequestBody::Empty => {}
            RequestBody::Json(value) => {
                builder = builder.json(value);
            }
            RequestBody::Multipart(file) => {
                let part = Part::bytes(file.bytes.to_vec())
                    .file_name(file.file_name.clone())
                    .mime_str(&file.mime)
                    .map_err(|e| NetworkError::InvalidRequest {
                        url: request.url.clone(),
                        message: format!("MIME error: {}", e),
                    })?;
                builder = builder.multipart(Form::new().part(file.field.clone(), part));
            }
        }

        let response = builder
            .send()
            .await
            .map_err(|e| NetworkError::unreachable(&request.url, e))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        // 读取响应体中途断开同样视为没有拿到响应
        let body = response
            .bytes()
            .await
            .map_err(|e| NetworkError::unreachable(&request.url, e))?;

        debug!(
            "{} {} -> {} ({} 字节)",
            request.method.as_str(),
            request.url,
            status,
            body.len()
        );

        Ok(ResponseSnapshot {
            url: request.url.clone(),
            status,
            headers,
            body,
            fetched_at: chrono::Utc::now(),
        })
    }
}
