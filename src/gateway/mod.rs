//! 离线缓存网关
//!
//! 拦截所有出站 GET 请求，按路由分类选择缓存策略：
//!
//! - API 请求（动态）：网络优先，失败时回退到缓存
//! - 其他资源（静态）：缓存优先，全部失败时回退到应用外壳页面
//!
//! 非 GET 请求直接走网络，既不读也不写缓存。

pub mod offline_gateway;
pub mod route;
pub mod strategy;

pub use offline_gateway::{GatewayPhase, OfflineCacheGateway};
pub use route::{RequestClass, RouteClassifier};
pub use strategy::{CacheStrategy, StrategyContext};
