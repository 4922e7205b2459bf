use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info, warn};
use url::Url;

use super::route::{RequestClass, RouteClassifier};
use super::strategy::{CacheStrategy, StrategyContext};
use crate::config::Config;
use crate::error::GatewayError;
use crate::infrastructure::{CacheStorage, NetworkFetcher, OutboundRequest, ResponseSnapshot};

/// 网关生命周期
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayPhase {
    /// 尚未安装，不拦截任何请求
    Idle,
    /// 预缓存完成，等待激活
    Installed,
    /// 已激活，接管所有请求
    Active,
}

/// 离线缓存网关
///
/// 职责：
/// - 唯一持有网络访问能力和缓存存储
/// - 安装时预缓存应用外壳
/// - 激活时清理旧缓存代并立即接管已打开的会话
/// - 按路由分类选择缓存策略
pub struct OfflineCacheGateway {
    fetcher: Arc<dyn NetworkFetcher>,
    storage: Arc<CacheStorage>,
    classifier: RouteClassifier,
    generation: String,
    precache_urls: Vec<String>,
    shell_key: String,
    skip_waiting: bool,
    phase: RwLock<GatewayPhase>,
    clients_claimed: AtomicBool,
}

impl OfflineCacheGateway {
    /// 创建网关，预缓存资源和外壳页面相对 `app_origin` 解析
    pub fn new(
        config: &Config,
        fetcher: Arc<dyn NetworkFetcher>,
        storage: Arc<CacheStorage>,
    ) -> Result<Self, GatewayError> {
        let origin = Url::parse(&config.app_origin).map_err(|source| GatewayError::InvalidUrl {
            url: config.app_origin.clone(),
            source,
        })?;

        let resolve = |path: &str| -> Result<String, GatewayError> {
            origin
                .join(path)
                .map(|u| u.to_string())
                .map_err(|source| GatewayError::InvalidUrl {
                    url: path.to_string(),
                    source,
                })
        };

        let precache_urls = config
            .precache_assets
            .iter()
            .map(|asset| resolve(asset.as_str()))
            .collect::<Result<Vec<_>, _>>()?;
        let shell_key = resolve(&config.shell_path)?;

        // 当前代已经在存储中，说明之前安装并激活过，重启后继续接管
        let resumed = storage.get(&config.cache_generation).is_some();
        let phase = if resumed {
            info!("♻️ 沿用已安装的缓存代: {}", config.cache_generation);
            GatewayPhase::Active
        } else {
            GatewayPhase::Idle
        };

        Ok(Self {
            fetcher,
            storage,
            classifier: RouteClassifier::new(config.dynamic_routes.iter().cloned()),
            generation: config.cache_generation.clone(),
            precache_urls,
            shell_key,
            skip_waiting: config.skip_waiting,
            phase: RwLock::new(phase),
            clients_claimed: AtomicBool::new(resumed),
        })
    }

    /// 安装：预缓存应用外壳
    ///
    /// 所有资源都成功获取后才一次性写入缓存，任一失败则安装失败、什么也不写。
    /// 设置了 `skip_waiting` 时安装完成后立即激活。
    ///
    /// 重新安装已激活的同一代时失败不影响接管，旧条目继续提供服务。
    pub async fn install(&self) -> Result<(), GatewayError> {
        info!(
            "🔧 安装缓存网关 {}，预缓存 {} 个资源",
            self.generation,
            self.precache_urls.len()
        );

        let mut fetched = Vec::with_capacity(self.precache_urls.len());
        for url in &self.precache_urls {
            let response = self
                .fetcher
                .fetch(&OutboundRequest::get(url.clone()))
                .await
                .map_err(|e| GatewayError::InstallFailed {
                    url: url.clone(),
                    reason: e.to_string(),
                })?;

            if !response.is_success() {
                return Err(GatewayError::InstallFailed {
                    url: url.clone(),
                    reason: format!("HTTP {}", response.status),
                });
            }
            fetched.push((url.clone(), response));
        }

        self.storage.open(&self.generation).put_all(fetched);
        self.storage.persist(&self.generation).await?;

        {
            let mut phase = self.phase.write();
            if *phase == GatewayPhase::Idle {
                *phase = GatewayPhase::Installed;
            }
        }
        info!("✓ 缓存网关安装完成: {}", self.generation);

        if self.skip_waiting {
            self.activate().await?;
        }
        Ok(())
    }

    /// 激活：删除其他所有缓存代，并立即接管已打开的会话
    pub async fn activate(&self) -> Result<(), GatewayError> {
        for name in self.storage.keys() {
            if name != self.generation {
                info!("🗑️ 删除旧缓存代: {}", name);
                self.storage.delete(&name).await?;
            }
        }

        *self.phase.write() = GatewayPhase::Active;
        self.clients_claimed.store(true, Ordering::SeqCst);
        info!("✓ 缓存网关已激活: {}", self.generation);
        Ok(())
    }

    /// 处理一个出站请求
    pub async fn handle(
        &self,
        request: &OutboundRequest,
    ) -> Result<ResponseSnapshot, GatewayError> {
        if !request.is_get() {
            debug!("非 GET 请求直连网络: {} {}", request.method.as_str(), request.url);
            return Ok(self.fetcher.fetch(request).await?);
        }

        if !self.is_controlling() {
            debug!("网关未接管，直连网络: {}", request.url);
            return Ok(self.fetcher.fetch(request).await?);
        }

        let key = cache_key(&request.url);
        let strategy = CacheStrategy::from(self.classify(&request.url));
        debug!("{:?}: {}", strategy, key);

        let ctx = StrategyContext {
            fetcher: self.fetcher.as_ref(),
            storage: &self.storage,
            generation: &self.generation,
            shell_key: &self.shell_key,
        };
        strategy.respond(&ctx, request, &key).await
    }

    /// 按路由分类请求
    pub fn classify(&self, url: &str) -> RequestClass {
        self.classifier.classify(url)
    }

    pub fn phase(&self) -> GatewayPhase {
        *self.phase.read()
    }

    /// 是否已激活并接管会话
    pub fn is_controlling(&self) -> bool {
        self.phase() == GatewayPhase::Active && self.clients_claimed.load(Ordering::SeqCst)
    }

    pub fn generation(&self) -> &str {
        &self.generation
    }

    pub fn storage(&self) -> &Arc<CacheStorage> {
        &self.storage
    }

    pub fn shell_key(&self) -> &str {
        &self.shell_key
    }

    /// 在当前缓存代中查找某个 URL
    pub fn cached(&self, url: &str) -> Option<ResponseSnapshot> {
        self.storage.lookup(&self.generation, &cache_key(url))
    }
}

/// 规范化后的 URL 作为缓存键，无法解析时原样使用
pub fn cache_key(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => parsed.to_string(),
        Err(_) => {
            warn!("无法解析的 URL，按原文缓存: {}", url);
            url.to_string()
        }
    }
}
