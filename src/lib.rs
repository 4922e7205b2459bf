//! # Plant Identify Client
//!
//! 植物识别服务的客户端：上传图片、展示识别结果、按需翻译、围绕识别结果聊天，
//! 并通过离线缓存网关在断网时提供部分可用性。
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 网络访问（`NetworkFetcher`）和分代缓存存储（`CacheStorage`）
//!
//! ### ② 网关层（Gateway）
//! - `gateway/` - 离线缓存网关，拦截所有出站请求
//! - API 请求网络优先，静态资源缓存优先，非 GET 请求直连
//!
//! ### ③ 业务能力层（Clients / Services）
//! - `PlantApiClient` - predict / plant-info / translate / chat 四个接口
//! - `Translator` - 逐元素翻译，空文本不发请求
//!
//! ### ④ 流程层（Workflow）
//! - `UploadFlow` - 流程编排（predict → enrich → translate）
//!
//! ### ⑤ 编排层（Orchestration）
//! - `UploadOrchestrator` - 加载状态、重复提交、失败折叠
//! - `App` - 装配所有资源
//!
//! ### 展示层状态（Presentation）
//! - `HomeState` / `ChatSession` / `render_results`
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod gateway;
pub mod infrastructure;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod presentation;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::PlantApiClient;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use gateway::OfflineCacheGateway;
pub use models::{CombinedResult, ImagePayload, Message, PlantInfo, PredictionResult};
pub use orchestrator::{App, UploadOrchestrator, UploadOutcome};
pub use presentation::{ChatSession, HomeState};
pub use workflow::{UploadCtx, UploadFlow};
