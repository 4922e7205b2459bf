//! 翻译服务 - 业务能力层
//!
//! 只负责"把文本翻译成目标语言"能力，不关心流程

use std::sync::Arc;

use futures::future::try_join_all;
use tracing::debug;

use crate::clients::PlantApiClient;
use crate::error::ApiError;

/// 翻译服务
///
/// 职责：
/// - 空字符串直接返回空字符串，不发请求
/// - 列表逐元素并发翻译，保持长度和顺序
/// - 任一元素失败则整个列表失败
#[derive(Clone)]
pub struct Translator {
    client: Arc<PlantApiClient>,
}

impl Translator {
    /// 创建新的翻译服务
    pub fn new(client: Arc<PlantApiClient>) -> Self {
        Self { client }
    }

    /// 翻译单段文本
    pub async fn translate_text(&self, text: &str, target_lang: &str) -> Result<String, ApiError> {
        if text.is_empty() {
            return Ok(String::new());
        }
        self.client.translate(text, target_lang).await
    }

    /// 逐元素翻译列表
    pub async fn translate_all(
        &self,
        texts: &[String],
        target_lang: &str,
    ) -> Result<Vec<String>, ApiError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!("并发翻译 {} 段文本 → {}", texts.len(), target_lang);
        try_join_all(
            texts
                .iter()
                .map(|text| self.translate_text(text, target_lang)),
        )
        .await
    }
}
