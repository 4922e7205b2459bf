//! 上传编排器 - 编排层
//!
//! ## 职责
//!
//! 1. **加载状态**：流程开始前置为 true，流程结束（成功或失败）后置为 false
//! 2. **重复提交**：加载中再次提交直接拒绝，不取消正在进行的上传
//! 3. **失败折叠**：任何一步的错误都折叠成一个用户可见的失败状态
//! 4. **无重试**：失败后不会自动重试

use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{error, warn};

use crate::models::{CombinedResult, ImagePayload};
use crate::utils::logging::log_result_summary;
use crate::workflow::{UploadCtx, UploadFlow};

/// 上传失败时展示给用户的提示
pub const UPLOAD_FAILED_ALERT: &str = "Prediction failed. Check backend logs.";

/// 加载中标记
///
/// 展示层持有克隆，用来禁用上传按钮、显示等待提示。
#[derive(Debug, Clone, Default)]
pub struct LoadingFlag(Arc<AtomicBool>);

impl LoadingFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// 尝试进入加载状态，已在加载中时返回 None
    fn try_begin(&self) -> Option<LoadingGuard> {
        self.0
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| LoadingGuard(self.clone()))
    }
}

/// 离开作用域时清除加载状态
struct LoadingGuard(LoadingFlag);

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        (self.0).0.store(false, Ordering::SeqCst);
    }
}

/// 一次上传的最终结果
#[derive(Debug)]
pub enum UploadOutcome {
    /// 成功产出新结果
    Completed(CombinedResult),
    /// 失败，`alert` 为用户可见提示，`reason` 只用于日志
    Failed { alert: String, reason: String },
    /// 已有上传在进行中，本次提交被拒绝
    Rejected,
}

impl UploadOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, UploadOutcome::Completed(_))
    }

    fn failed(reason: impl ToString) -> Self {
        UploadOutcome::Failed {
            alert: UPLOAD_FAILED_ALERT.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// 上传编排器
pub struct UploadOrchestrator {
    flow: UploadFlow,
    loading: LoadingFlag,
    next_id: AtomicU64,
}

impl UploadOrchestrator {
    pub fn new(flow: UploadFlow, loading: LoadingFlag) -> Self {
        Self {
            flow,
            loading,
            next_id: AtomicU64::new(1),
        }
    }

    /// 共享的加载中标记
    pub fn loading_flag(&self) -> LoadingFlag {
        self.loading.clone()
    }

    /// 提交一张图片
    pub async fn submit(&self, image: ImagePayload, lang: &str) -> UploadOutcome {
        let Some(_guard) = self.loading.try_begin() else {
            warn!("⚠️ 已有上传正在进行，忽略本次提交");
            return UploadOutcome::Rejected;
        };

        let ctx = UploadCtx::new(
            self.next_id.fetch_add(1, Ordering::Relaxed),
            image.file_name.clone(),
            lang,
        );

        match self.flow.run(&image, &ctx).await {
            Ok(result) => {
                log_result_summary(&ctx, &result);
                UploadOutcome::Completed(result)
            }
            Err(e) => {
                error!("{} ❌ 处理失败: {}", ctx, e);
                UploadOutcome::failed(e)
            }
        }
    }

    /// 从文件读取图片后提交
    pub async fn submit_path(&self, path: &Path, lang: &str) -> UploadOutcome {
        match ImagePayload::from_path(path).await {
            Ok(image) => self.submit(image, lang).await,
            Err(e) => {
                error!("❌ {}", e);
                UploadOutcome::failed(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_clears_flag_on_drop() {
        let flag = LoadingFlag::new();
        {
            let guard = flag.try_begin();
            assert!(guard.is_some());
            assert!(flag.is_loading());
            assert!(flag.try_begin().is_none());
        }
        assert!(!flag.is_loading());
        assert!(flag.try_begin().is_some());
    }
}
