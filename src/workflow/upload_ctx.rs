//! 上传处理上下文
//!
//! 封装"这是第几次上传、哪张图片、目标语言是什么"这一信息

use std::fmt::Display;

/// 上传处理上下文
#[derive(Debug, Clone)]
pub struct UploadCtx {
    /// 上传序号（仅用于日志显示）
    pub upload_id: u64,

    /// 图片文件名
    pub file_name: String,

    /// 目标语言
    pub lang: String,
}

impl UploadCtx {
    /// 创建新的上传上下文
    pub fn new(upload_id: u64, file_name: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            upload_id,
            file_name: file_name.into(),
            lang: lang.into(),
        }
    }
}

impl Display for UploadCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[上传 #{} 文件 {} 语言 {}]",
            self.upload_id, self.file_name, self.lang
        )
    }
}
