//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `app` - 应用装配
//! - 打开缓存存储、安装并激活离线缓存网关
//! - 持有网关和后端客户端
//! - 为命令行提供入口
//!
//! ### `upload_orchestrator` - 上传编排器
//! - 维护唯一的加载中标记
//! - 拒绝重复提交
//! - 把流程中的任何错误折叠成一个用户可见的失败状态
//!
//! ## 层次关系
//!
//! ```text
//! app (装配资源)
//!     ↓
//! upload_orchestrator (加载状态 / 失败折叠)
//!     ↓
//! workflow::UploadFlow (predict → enrich → translate)
//!     ↓
//! clients / services (能力层：API / 翻译)
//!     ↓
//! gateway (离线缓存网关)
//!     ↓
//! infrastructure (网络访问 / 缓存存储)
//! ```

pub mod app;
pub mod upload_orchestrator;

// 重新导出主要类型
pub use app::{open_storage, App};
pub use upload_orchestrator::{LoadingFlag, UploadOrchestrator, UploadOutcome, UPLOAD_FAILED_ALERT};
