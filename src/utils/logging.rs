//! 日志工具模块
//!
//! 提供日志格式化和输出的辅助函数

use tracing::info;

use crate::config::Config;
use crate::models::CombinedResult;
use crate::workflow::UploadCtx;

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🌿 植物识别客户端启动");
    info!("🔗 后端地址: {}", config.api_base_url);
    info!("📦 缓存代号: {}", config.cache_generation);
    match &config.cache_dir {
        Some(dir) => info!("💾 缓存目录: {}", dir),
        None => info!("💾 缓存仅保存在内存中"),
    }
    info!("{}", "=".repeat(60));
}

/// 记录识别结果摘要
pub fn log_result_summary(ctx: &UploadCtx, result: &CombinedResult) {
    info!("{}", "─".repeat(60));
    info!("{} ✅ 处理完成: {}", ctx, result.plant_name());
    info!(
        "药用 {} 条 | 分布 {} 条 | 事实 {} 条",
        result.medicinal_properties().len(),
        result.regions().len(),
        result.facts().len()
    );
    info!("{}", "─".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（按字符计）
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
