//! 识别结果相关的数据结构
//!
//! - `PredictionResult`：`/predict` 的返回
//! - `PlantInfo`：`/plant-info` 的返回
//! - `CombinedResult`：二者浅合并（可选翻译）后的最终结果

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value as JsonValue};

/// 识别结果
///
/// `scores` 的键值对客户端不做解释，原样保留。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub plant_name: String,
    #[serde(default)]
    pub scores: Map<String, JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medicinal_properties: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facts: Option<Vec<String>>,
    /// 其他未知字段
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

/// 植物补充信息
///
/// 所有字段都是可选的：缺失的字段在合并时不会覆盖识别结果。
/// 列表字段区分"缺失"（`None`）和"显式 null"（`Some(None)`），后者合并后为空列表。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlantInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plant_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scores: Option<Map<String, JsonValue>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub medicinal_properties: Option<Option<Vec<String>>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub regions: Option<Option<Vec<String>>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub facts: Option<Option<Vec<String>>>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

/// 最终展示结果
///
/// 构造后不可变，每次上传都会产生一个全新的实例。
/// 列表字段永远不会是 null，缺失时为空列表。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedResult {
    plant_name: String,
    #[serde(default)]
    scores: Map<String, JsonValue>,
    #[serde(default)]
    medicinal_properties: Vec<String>,
    #[serde(default)]
    regions: Vec<String>,
    #[serde(default)]
    facts: Vec<String>,
    #[serde(flatten)]
    extra: Map<String, JsonValue>,
}

impl CombinedResult {
    /// 浅合并：`info` 中存在的字段覆盖 `prediction` 中的同名字段
    pub fn merge(prediction: PredictionResult, info: PlantInfo) -> Self {
        let mut extra = prediction.extra;
        extra.extend(info.extra);

        Self {
            plant_name: info.plant_name.unwrap_or(prediction.plant_name),
            scores: info.scores.unwrap_or(prediction.scores),
            medicinal_properties: override_list(
                info.medicinal_properties,
                prediction.medicinal_properties,
            ),
            regions: override_list(info.regions, prediction.regions),
            facts: override_list(info.facts, prediction.facts),
            extra,
        }
    }

    /// 用翻译后的文本替换可翻译字段，其余字段保持不变
    pub(crate) fn with_translations(self, translated: TranslatedFields) -> Self {
        Self {
            plant_name: translated.plant_name,
            medicinal_properties: translated.medicinal_properties,
            regions: translated.regions,
            facts: translated.facts,
            ..self
        }
    }

    pub fn plant_name(&self) -> &str {
        &self.plant_name
    }

    pub fn scores(&self) -> &Map<String, JsonValue> {
        &self.scores
    }

    pub fn medicinal_properties(&self) -> &[String] {
        &self.medicinal_properties
    }

    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    pub fn facts(&self) -> &[String] {
        &self.facts
    }

    /// 后端返回的其他字段（如 `source`）
    pub fn extra(&self) -> &Map<String, JsonValue> {
        &self.extra
    }
}

/// 字段出现（包括 null）就反序列化为 `Some`
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// 补充信息中出现的列表覆盖识别结果，null 覆盖为空列表
fn override_list(
    info: Option<Option<Vec<String>>>,
    prediction: Option<Vec<String>>,
) -> Vec<String> {
    match info {
        Some(list) => list.unwrap_or_default(),
        None => prediction.unwrap_or_default(),
    }
}

/// 翻译后的可翻译字段
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TranslatedFields {
    pub plant_name: String,
    pub medicinal_properties: Vec<String>,
    pub regions: Vec<String>,
    pub facts: Vec<String>,
}
