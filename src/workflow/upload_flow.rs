//! 上传处理流程 - 流程层
//!
//! 核心职责：定义"一次上传"的完整处理流程
//!
//! 流程顺序：
//! 1. predict → 识别结果
//! 2. plant-info → 与识别结果浅合并
//! 3. translate（仅当目标语言不是 en）→ 名称与三个列表并发翻译
//!
//! 每一步的输入都是上一步的输出，任一步失败整个流程失败，不产生部分结果。

use std::sync::Arc;

use tracing::{debug, info};

use crate::clients::PlantApiClient;
use crate::error::UploadError;
use crate::models::language;
use crate::models::plant::TranslatedFields;
use crate::models::{CombinedResult, ImagePayload, PredictionResult};
use crate::services::Translator;
use crate::workflow::upload_ctx::UploadCtx;

/// 上传处理流程
///
/// - 编排 predict → enrich → translate
/// - 不持有加载状态，不处理重复提交
/// - 只依赖业务能力（clients / services）
pub struct UploadFlow {
    client: Arc<PlantApiClient>,
    translator: Translator,
}

impl UploadFlow {
    /// 创建新的上传处理流程
    pub fn new(client: Arc<PlantApiClient>) -> Self {
        Self {
            translator: Translator::new(client.clone()),
            client,
        }
    }

    pub async fn run(
        &self,
        image: &ImagePayload,
        ctx: &UploadCtx,
    ) -> Result<CombinedResult, UploadError> {
        // ========== 第 1 步: 识别 ==========
        let prediction = self.predict(image, ctx).await?;
        let predicted_name = prediction.plant_name.clone();

        // ========== 第 2 步: 补充信息 ==========
        let combined = self.enrich(prediction, ctx).await?;

        // ========== 第 3 步: 翻译（可选） ==========
        if !language::needs_translation(&ctx.lang) {
            debug!("{} 目标语言为默认语言，跳过翻译", ctx);
            return Ok(combined);
        }

        self.translate(combined, &predicted_name, ctx).await
    }

    async fn predict(
        &self,
        image: &ImagePayload,
        ctx: &UploadCtx,
    ) -> Result<PredictionResult, UploadError> {
        info!("{} 🔍 正在识别植物...", ctx);
        let prediction = self
            .client
            .predict(image)
            .await
            .map_err(UploadError::Predict)?;
        info!("{} ✓ 识别结果: {}", ctx, prediction.plant_name);
        Ok(prediction)
    }

    async fn enrich(
        &self,
        prediction: PredictionResult,
        ctx: &UploadCtx,
    ) -> Result<CombinedResult, UploadError> {
        info!("{} 📖 正在获取植物信息...", ctx);
        let info = self
            .client
            .plant_info(&prediction.plant_name, &ctx.lang)
            .await
            .map_err(UploadError::Enrich)?;
        Ok(CombinedResult::merge(prediction, info))
    }

    /// 名称和三个列表同时翻译，全部完成后才产出结果
    async fn translate(
        &self,
        combined: CombinedResult,
        predicted_name: &str,
        ctx: &UploadCtx,
    ) -> Result<CombinedResult, UploadError> {
        info!("{} 🌐 正在翻译结果...", ctx);
        let lang = ctx.lang.as_str();

        let name_source = if combined.plant_name().is_empty() {
            predicted_name
        } else {
            combined.plant_name()
        };

        let (plant_name, medicinal_properties, regions, facts) = tokio::try_join!(
            self.translator.translate_text(name_source, lang),
            self.translator
                .translate_all(combined.medicinal_properties(), lang),
            self.translator.translate_all(combined.regions(), lang),
            self.translator.translate_all(combined.facts(), lang)
        )
        .map_err(UploadError::Translate)?;

        Ok(combined.with_translations(TranslatedFields {
            plant_name,
            medicinal_properties,
            regions,
            facts,
        }))
    }
}
