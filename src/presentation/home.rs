use std::sync::Arc;

use crate::models::language::{self, DEFAULT_LANGUAGE};
use crate::models::CombinedResult;
use crate::orchestrator::{LoadingFlag, UploadOutcome};

/// 首页状态：当前语言、最新结果、失败提示、加载中标记
#[derive(Debug)]
pub struct HomeState {
    lang: String,
    result: Option<Arc<CombinedResult>>,
    alert: Option<String>,
    last_image: Option<String>,
    loading: LoadingFlag,
}

impl HomeState {
    pub fn new(lang: &str, loading: LoadingFlag) -> Self {
        let lang = if lang.trim().is_empty() {
            DEFAULT_LANGUAGE
        } else {
            lang.trim()
        };
        Self {
            lang: lang.to_string(),
            result: None,
            alert: None,
            last_image: None,
            loading,
        }
    }

    pub fn language(&self) -> &str {
        &self.lang
    }

    /// 切换语言，只影响之后的上传
    pub fn set_language(&mut self, lang: &str) {
        let lang = lang.trim();
        self.lang = if lang.is_empty() {
            DEFAULT_LANGUAGE.to_string()
        } else {
            lang.to_string()
        };
    }

    /// 当前语言的显示名称，未知语言返回代码本身
    pub fn language_label(&self) -> &str {
        match language::display_name(&self.lang) {
            Some(name) => name,
            None => &self.lang,
        }
    }

    /// 应用一次上传的结果
    ///
    /// 成功时整体替换结果；失败时只设置提示，保留之前的结果；被拒绝时什么也不变。
    pub fn apply(&mut self, outcome: UploadOutcome, image_name: impl Into<String>) {
        match outcome {
            UploadOutcome::Completed(result) => {
                self.result = Some(Arc::new(result));
                self.alert = None;
                self.last_image = Some(image_name.into());
            }
            UploadOutcome::Failed { alert, .. } => {
                self.alert = Some(alert);
                self.last_image = Some(image_name.into());
            }
            UploadOutcome::Rejected => {}
        }
    }

    pub fn result(&self) -> Option<&Arc<CombinedResult>> {
        self.result.as_ref()
    }

    /// 当前识别出的植物名，用作聊天上下文
    pub fn context_plant(&self) -> Option<&str> {
        self.result.as_ref().map(|r| r.plant_name())
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    /// 取走提示（展示一次后清除）
    pub fn take_alert(&mut self) -> Option<String> {
        self.alert.take()
    }

    pub fn last_image(&self) -> Option<&str> {
        self.last_image.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }
}
