//! 基础设施层
//!
//! 只暴露"发请求"和"存响应"两种能力，不认识任何业务数据。

pub mod cache_storage;
pub mod network;
pub mod request;
pub mod response;

pub use cache_storage::{CacheGeneration, CacheStorage};
pub use network::{NetworkFetcher, ReqwestFetcher};
pub use request::{HttpMethod, MultipartFile, OutboundRequest, RequestBody};
pub use response::ResponseSnapshot;
