//! 应用装配 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：打开缓存存储、创建网络访问、安装并激活缓存网关
//! 2. **资源管理**：持有网关和客户端，确保生命周期正确
//! 3. **对外入口**：为命令行提供识别、聊天、缓存查看的能力
//!
//! 网关安装失败不会阻止程序运行：之前装过当前缓存代时继续使用已有缓存，
//! 否则所有请求直连网络。

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::clients::PlantApiClient;
use crate::config::Config;
use crate::error::AppResult;
use crate::gateway::OfflineCacheGateway;
use crate::infrastructure::{CacheStorage, NetworkFetcher, ReqwestFetcher};
use crate::orchestrator::upload_orchestrator::{LoadingFlag, UploadOrchestrator, UploadOutcome};
use crate::presentation::{ChatSession, HomeState};
use crate::utils::logging::log_startup;
use crate::workflow::UploadFlow;

/// 应用主结构
pub struct App {
    config: Config,
    gateway: Arc<OfflineCacheGateway>,
    client: Arc<PlantApiClient>,
    orchestrator: UploadOrchestrator,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> AppResult<Self> {
        config.validate()?;
        log_startup(&config);

        let fetcher: Arc<dyn NetworkFetcher> = Arc::new(ReqwestFetcher::new(Duration::from_secs(
            config.request_timeout_secs,
        ))?);

        Self::with_fetcher(config, fetcher).await
    }

    /// 使用指定的网络访问实现初始化应用
    pub async fn with_fetcher(config: Config, fetcher: Arc<dyn NetworkFetcher>) -> AppResult<Self> {
        let storage = open_storage(&config).await?;
        let gateway = Arc::new(OfflineCacheGateway::new(&config, fetcher, Arc::new(storage))?);

        if let Err(e) = gateway.install().await {
            if gateway.is_controlling() {
                warn!("⚠️ 缓存网关重新安装失败，继续使用已有缓存: {}", e);
            } else {
                warn!("⚠️ 缓存网关安装失败，所有请求将直连网络: {}", e);
            }
        }

        let client = Arc::new(PlantApiClient::new(&config, gateway.clone())?);
        let orchestrator =
            UploadOrchestrator::new(UploadFlow::new(client.clone()), LoadingFlag::new());

        Ok(Self {
            config,
            gateway,
            client,
            orchestrator,
        })
    }

    /// 创建首页状态
    pub fn home_state(&self) -> HomeState {
        HomeState::new(&self.config.default_language, self.orchestrator.loading_flag())
    }

    /// 创建聊天会话
    pub fn chat_session(&self) -> ChatSession {
        ChatSession::new(self.client.clone())
    }

    /// 识别一张图片并把结果写入首页状态
    pub async fn identify(&self, home: &mut HomeState, image_path: &Path) -> bool {
        let lang = home.language().to_string();
        let outcome = self.orchestrator.submit_path(image_path, &lang).await;
        let completed = matches!(outcome, UploadOutcome::Completed(_));
        home.apply(outcome, image_path.display().to_string());
        completed
    }

    /// 每一代缓存的条目数
    pub fn cache_report(&self) -> Vec<(String, usize)> {
        self.gateway.storage().report()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn gateway(&self) -> &Arc<OfflineCacheGateway> {
        &self.gateway
    }

    pub fn client(&self) -> &Arc<PlantApiClient> {
        &self.client
    }

    pub fn orchestrator(&self) -> &UploadOrchestrator {
        &self.orchestrator
    }
}

/// 按配置打开缓存存储：设置了 `cache_dir` 时从磁盘加载，否则只在内存中
pub async fn open_storage(config: &Config) -> AppResult<CacheStorage> {
    Ok(match &config.cache_dir {
        Some(dir) => CacheStorage::open_persistent(dir).await?,
        None => CacheStorage::in_memory(),
    })
}
