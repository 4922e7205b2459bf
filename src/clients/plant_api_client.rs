//! 植物识别后端 API 客户端
//!
//! 封装四个后端接口，所有请求都经过离线缓存网关。

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::config::Config;
use crate::error::{ApiError, ConfigError, GatewayError};
use crate::gateway::OfflineCacheGateway;
use crate::infrastructure::{MultipartFile, OutboundRequest, ResponseSnapshot};
use crate::models::{ImagePayload, PlantInfo, PredictionResult};

const PREDICT: &str = "/predict";
const PLANT_INFO: &str = "/plant-info";
const TRANSLATE: &str = "/translate";
const CHAT: &str = "/chat";

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    text: &'a str,
    #[serde(rename = "targetLang")]
    target_lang: &'a str,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    text: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
    #[serde(rename = "contextPlant", skip_serializing_if = "Option::is_none")]
    context_plant: Option<&'a str>,
}

/// 聊天回复
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatReply {
    pub reply: String,
}

/// 植物识别后端客户端
pub struct PlantApiClient {
    base_url: String,
    gateway: Arc<OfflineCacheGateway>,
}

impl PlantApiClient {
    /// 创建新的客户端
    pub fn new(config: &Config, gateway: Arc<OfflineCacheGateway>) -> Result<Self, ConfigError> {
        if Url::parse(&config.api_base_url).is_err() {
            return Err(ConfigError::InvalidUrl {
                key: "api_base_url".to_string(),
                value: config.api_base_url.clone(),
            });
        }

        Ok(Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            gateway,
        })
    }

    /// 上传图片识别植物
    ///
    /// multipart 表单，字段名 `image`
    pub async fn predict(&self, image: &ImagePayload) -> Result<PredictionResult, ApiError> {
        debug!("上传图片识别: {} ({} 字节)", image.file_name, image.len());

        let request = OutboundRequest::post_multipart(
            self.endpoint(PREDICT),
            MultipartFile {
                field: "image".to_string(),
                file_name: image.file_name.clone(),
                mime: image.mime.clone(),
                bytes: image.bytes.clone(),
            },
        );

        self.send(PREDICT, &request).await
    }

    /// 获取植物补充信息
    pub async fn plant_info(&self, name: &str, lang: &str) -> Result<PlantInfo, ApiError> {
        let url = Url::parse_with_params(
            &self.endpoint(PLANT_INFO),
            &[("name", name), ("lang", lang)],
        )
        .map_err(|source| {
            ApiError::request_failed(
                PLANT_INFO,
                GatewayError::InvalidUrl {
                    url: self.endpoint(PLANT_INFO),
                    source,
                },
            )
        })?;

        self.send(PLANT_INFO, &OutboundRequest::get(url.to_string()))
            .await
    }

    /// 翻译单段文本
    pub async fn translate(&self, text: &str, target_lang: &str) -> Result<String, ApiError> {
        let body = encode(
            TRANSLATE,
            &TranslateRequest {
                text,
                target_lang,
            },
        )?;

        let response: TranslateResponse = self
            .send(TRANSLATE, &OutboundRequest::post_json(self.endpoint(TRANSLATE), body))
            .await?;
        Ok(response.text)
    }

    /// 发送聊天消息，`context_plant` 为当前识别出的植物
    pub async fn chat(
        &self,
        message: &str,
        context_plant: Option<&str>,
    ) -> Result<ChatReply, ApiError> {
        let body = encode(
            CHAT,
            &ChatRequest {
                message,
                context_plant,
            },
        )?;

        self.send(CHAT, &OutboundRequest::post_json(self.endpoint(CHAT), body))
            .await
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// 通过网关发送请求并解析 JSON 响应
    async fn send<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: &OutboundRequest,
    ) -> Result<T, ApiError> {
        let response = self
            .gateway
            .handle(request)
            .await
            .map_err(|e| ApiError::request_failed(endpoint, e))?;

        parse_response(endpoint, &response)
    }
}

fn encode<T: Serialize>(endpoint: &str, body: &T) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(body).map_err(|source| ApiError::EncodeFailed {
        endpoint: endpoint.to_string(),
        source,
    })
}

/// 检查状态码并解析响应体
fn parse_response<T: DeserializeOwned>(
    endpoint: &str,
    response: &ResponseSnapshot,
) -> Result<T, ApiError> {
    if !response.is_success() {
        return Err(ApiError::BadStatus {
            endpoint: endpoint.to_string(),
            status: response.status,
            body: crate::utils::logging::truncate_text(&response.text_lossy(), 200),
        });
    }

    response.json().map_err(|source| ApiError::MalformedBody {
        endpoint: endpoint.to_string(),
        source,
    })
}
