use thiserror::Error;

/// 应用程序错误类型（装配阶段）
#[derive(Debug, Error)]
pub enum AppError {
    /// 离线缓存网关错误
    #[error("网关错误: {0}")]
    Gateway(#[from] GatewayError),
    /// 网络访问无法创建
    #[error("网络错误: {0}")]
    Network(#[from] NetworkError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 网络层错误（没有拿到任何响应）
#[derive(Debug, Error)]
pub enum NetworkError {
    /// 请求发出后没有收到响应（断网、超时、连接被拒绝）
    #[error("网络请求失败 ({url}): {message}")]
    Unreachable { url: String, message: String },
    /// 请求无法构建（非法 URL、非法 MIME 等）
    #[error("无法构建请求 ({url}): {message}")]
    InvalidRequest { url: String, message: String },
}

/// 离线缓存网关错误
#[derive(Debug, Error)]
pub enum GatewayError {
    /// 直连网络失败（未经过缓存的请求）
    #[error(transparent)]
    Network(#[from] NetworkError),
    /// 网络不可用且缓存中没有可用条目
    #[error("离线且无缓存: {url}")]
    Offline { url: String },
    /// 预缓存资源失败，安装中止
    #[error("预缓存失败 ({url}): {reason}")]
    InstallFailed { url: String, reason: String },
    /// 非法 URL
    #[error("非法 URL ({url}): {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    /// 缓存持久化失败
    #[error("缓存持久化失败 ({path}): {source}")]
    Persistence {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 缓存文件解析失败
    #[error("缓存文件解析失败 ({path}): {source}")]
    CorruptCache {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// API 调用错误
#[derive(Debug, Error)]
pub enum ApiError {
    /// 请求没有拿到响应
    #[error("API请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: GatewayError,
    },
    /// 后端返回非 2xx 状态码
    #[error("API返回错误状态 ({endpoint}): {status} {body}")]
    BadStatus {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// 响应体不是预期的 JSON 结构
    #[error("响应解析失败 ({endpoint}): {source}")]
    MalformedBody {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
    /// 请求体序列化失败
    #[error("请求序列化失败 ({endpoint}): {source}")]
    EncodeFailed {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

/// 上传流程错误
///
/// 在编排层会被折叠成单一的用户可见失败状态，这里保留细节只用于日志。
#[derive(Debug, Error)]
pub enum UploadError {
    /// 读取图片失败
    #[error("读取图片失败 ({path}): {source}")]
    ImageRead {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 第一步：识别失败
    #[error("识别失败: {0}")]
    Predict(#[source] ApiError),
    /// 第二步：补充信息失败
    #[error("获取植物信息失败: {0}")]
    Enrich(#[source] ApiError),
    /// 第三步：翻译失败
    #[error("翻译失败: {0}")]
    Translate(#[source] ApiError),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 配置文件读取失败
    #[error("读取配置文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// URL 配置非法
    #[error("配置项 {key} 不是合法的 URL: {value}")]
    InvalidUrl { key: String, value: String },
}

// ========== 便捷构造函数 ==========

impl NetworkError {
    /// 创建网络不可达错误
    pub fn unreachable(url: impl Into<String>, source: impl std::fmt::Display) -> Self {
        NetworkError::Unreachable {
            url: url.into(),
            message: source.to_string(),
        }
    }
}

impl ApiError {
    /// 创建API请求失败错误
    pub fn request_failed(endpoint: impl Into<String>, source: GatewayError) -> Self {
        ApiError::RequestFailed {
            endpoint: endpoint.into(),
            source,
        }
    }

    /// 是否是网络层面的失败（没有拿到任何响应）
    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::RequestFailed { .. })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
