use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// 默认缓存代号，部署新版本时修改即可让旧缓存整体失效
pub const DEFAULT_CACHE_GENERATION: &str = "plantid-cache-v1";

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 后端 API 地址
    pub api_base_url: String,
    /// 前端应用的源（用于预缓存和离线兜底页面）
    pub app_origin: String,
    /// 当前缓存代号
    pub cache_generation: String,
    /// 安装时预缓存的应用外壳资源
    pub precache_assets: Vec<String>,
    /// 离线兜底页面路径
    pub shell_path: String,
    /// 走网络优先策略的 API 路由片段
    pub dynamic_routes: Vec<String>,
    /// 缓存持久化目录，不设置则只保存在内存中
    pub cache_dir: Option<String>,
    /// 默认目标语言
    pub default_language: String,
    /// 单个请求超时（秒）
    pub request_timeout_secs: u64,
    /// 安装后是否立即激活
    pub skip_waiting: bool,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            app_origin: "http://localhost:5173".to_string(),
            cache_generation: DEFAULT_CACHE_GENERATION.to_string(),
            precache_assets: vec![
                "/".to_string(),
                "/index.html".to_string(),
                "/manifest.json".to_string(),
            ],
            shell_path: "/index.html".to_string(),
            dynamic_routes: vec![
                "/predict".to_string(),
                "/plant-info".to_string(),
                "/translate".to_string(),
                "/chat".to_string(),
            ],
            cache_dir: None,
            default_language: "en".to_string(),
            request_timeout_secs: 30,
            skip_waiting: true,
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 从环境变量加载配置（会先尝试读取 `.env`）
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::default().merge_env()
    }

    /// 从 TOML 文件加载配置，缺省字段使用默认值，之后再叠加环境变量
    pub async fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| ConfigError::ReadFailed {
                    path: path.display().to_string(),
                    source,
                })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::TomlParseFailed {
                path: path.display().to_string(),
                source,
            })?;

        let _ = dotenvy::dotenv();
        Ok(config.merge_env())
    }

    fn merge_env(self) -> Self {
        let base = self;
        Self {
            api_base_url: std::env::var("PLANT_API_BASE_URL")
                .or_else(|_| std::env::var("VITE_API_BASE_URL"))
                .unwrap_or(base.api_base_url),
            app_origin: std::env::var("PLANT_APP_ORIGIN").unwrap_or(base.app_origin),
            cache_generation: std::env::var("PLANT_CACHE_GENERATION")
                .unwrap_or(base.cache_generation),
            precache_assets: match std::env::var("PLANT_PRECACHE") {
                Ok(list) => parse_list(&list),
                Err(_) => base.precache_assets,
            },
            cache_dir: std::env::var("PLANT_CACHE_DIR").ok().or(base.cache_dir),
            default_language: std::env::var("PLANT_LANG").unwrap_or(base.default_language),
            request_timeout_secs: std::env::var("PLANT_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(base.request_timeout_secs),
            verbose_logging: std::env::var("VERBOSE_LOGGING")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(base.verbose_logging),
            ..base
        }
    }

    /// 校验 URL 类配置项
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("api_base_url", &self.api_base_url),
            ("app_origin", &self.app_origin),
        ] {
            if url::Url::parse(value).is_err() {
                return Err(ConfigError::InvalidUrl {
                    key: key.to_string(),
                    value: value.clone(),
                });
            }
        }
        Ok(())
    }
}

/// 逗号分隔的列表，空字符串表示空列表
fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            api_base_url = "http://10.0.0.2:8000"
            precache_assets = []
            "#,
        )
        .unwrap();

        assert_eq!(config.api_base_url, "http://10.0.0.2:8000");
        assert!(config.precache_assets.is_empty());
        assert_eq!(config.cache_generation, DEFAULT_CACHE_GENERATION);
        assert_eq!(config.dynamic_routes.len(), 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let config = Config {
            api_base_url: "not a url".to_string(),
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn precache_list_parsing() {
        assert!(parse_list("").is_empty());
        assert_eq!(parse_list("/, /index.html ,"), vec!["/", "/index.html"]);
    }
}
