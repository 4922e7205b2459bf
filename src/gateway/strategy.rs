//! 两种缓存策略
//!
//! 策略本身不关心路由分类，只依赖 `StrategyContext` 提供的网络和缓存能力，
//! 因此可以单独测试。

use tracing::{debug, warn};

use super::route::RequestClass;
use crate::error::GatewayError;
use crate::infrastructure::{CacheStorage, NetworkFetcher, OutboundRequest, ResponseSnapshot};

/// 缓存策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStrategy {
    /// 网络优先，网络失败时回退到缓存
    NetworkFirst,
    /// 缓存优先，未命中时走网络，全部失败时回退到应用外壳
    CacheFirst,
}

impl From<RequestClass> for CacheStrategy {
    fn from(class: RequestClass) -> Self {
        match class {
            RequestClass::Dynamic => CacheStrategy::NetworkFirst,
            RequestClass::Static => CacheStrategy::CacheFirst,
        }
    }
}

/// 策略执行所需的能力
pub struct StrategyContext<'a> {
    pub fetcher: &'a dyn NetworkFetcher,
    pub storage: &'a CacheStorage,
    /// 当前缓存代
    pub generation: &'a str,
    /// 应用外壳的缓存键
    pub shell_key: &'a str,
}

impl StrategyContext<'_> {
    fn lookup(&self, key: &str) -> Option<ResponseSnapshot> {
        self.storage.lookup(self.generation, key)
    }

    /// 存一份快照副本到当前缓存代，只缓存成功的响应
    async fn store(&self, key: &str, response: &ResponseSnapshot) {
        if !response.is_success() {
            debug!("不缓存非成功响应: {} ({})", key, response.status);
            return;
        }

        self.storage
            .open(self.generation)
            .put(key, response.clone());

        if let Err(e) = self.storage.persist(self.generation).await {
            warn!("⚠️ 缓存落盘失败: {}", e);
        }
    }
}

impl CacheStrategy {
    /// 按策略响应请求，`key` 为请求的缓存键
    pub async fn respond(
        self,
        ctx: &StrategyContext<'_>,
        request: &OutboundRequest,
        key: &str,
    ) -> Result<ResponseSnapshot, GatewayError> {
        match self {
            CacheStrategy::NetworkFirst => network_first(ctx, request, key).await,
            CacheStrategy::CacheFirst => cache_first(ctx, request, key).await,
        }
    }
}

async fn network_first(
    ctx: &StrategyContext<'_>,
    request: &OutboundRequest,
    key: &str,
) -> Result<ResponseSnapshot, GatewayError> {
    match ctx.fetcher.fetch(request).await {
        Ok(response) => {
            ctx.store(key, &response).await;
            Ok(response)
        }
        Err(e) => {
            warn!("⚠️ 网络请求失败，尝试缓存: {} ({})", key, e);
            match ctx.lookup(key) {
                Some(cached) => {
                    debug!("使用缓存响应: {}", key);
                    Ok(cached)
                }
                None => Err(GatewayError::Offline {
                    url: key.to_string(),
                }),
            }
        }
    }
}

async fn cache_first(
    ctx: &StrategyContext<'_>,
    request: &OutboundRequest,
    key: &str,
) -> Result<ResponseSnapshot, GatewayError> {
    if let Some(cached) = ctx.lookup(key) {
        debug!("缓存命中: {}", key);
        return Ok(cached);
    }

    match ctx.fetcher.fetch(request).await {
        Ok(response) => {
            ctx.store(key, &response).await;
            Ok(response)
        }
        Err(e) => {
            warn!("⚠️ 离线且未缓存，回退到应用外壳: {} ({})", key, e);
            ctx.lookup(ctx.shell_key).ok_or_else(|| GatewayError::Offline {
                url: key.to_string(),
            })
        }
    }
}
