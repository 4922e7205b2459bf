#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use plant_identify_client::error::NetworkError;
use plant_identify_client::infrastructure::{
    NetworkFetcher, OutboundRequest, ReqwestFetcher, ResponseSnapshot,
};
use plant_identify_client::orchestrator::LoadingFlag;
use plant_identify_client::{App, Config};

// ========== 模拟后端 ==========

/// 模拟后端的可控状态
#[derive(Clone, Default)]
pub struct BackendState {
    pub predict_calls: Arc<AtomicUsize>,
    pub info_calls: Arc<AtomicUsize>,
    pub translate_calls: Arc<AtomicUsize>,
    pub chat_calls: Arc<AtomicUsize>,

    pub predict_fails: Arc<AtomicBool>,
    pub chat_fails: Arc<AtomicBool>,
    pub predict_delay_ms: Arc<AtomicUsize>,

    pub prediction: Arc<Mutex<Value>>,
    pub plant_info: Arc<Mutex<Value>>,
    /// 翻译到这段文本时返回 500
    pub translate_fail_on: Arc<Mutex<Option<String>>>,

    pub seen_queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
    pub seen_image: Arc<Mutex<Option<(String, usize)>>>,
    pub seen_chat: Arc<Mutex<Vec<Value>>>,

    pub loading_probe: Arc<Mutex<Option<LoadingFlag>>>,
    pub loading_seen: Arc<Mutex<Vec<bool>>>,
}

impl BackendState {
    pub fn with_data(prediction: Value, plant_info: Value) -> Self {
        let state = Self::default();
        *state.prediction.lock() = prediction;
        *state.plant_info.lock() = plant_info;
        state
    }

    pub fn calls(&self, counter: &Arc<AtomicUsize>) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

async fn predict(State(state): State<BackendState>, mut multipart: Multipart) -> Response {
    state.predict_calls.fetch_add(1, Ordering::SeqCst);

    if let Some(flag) = state.loading_probe.lock().as_ref() {
        state.loading_seen.lock().push(flag.is_loading());
    }

    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().unwrap_or_default().to_string();
        if let Ok(data) = field.bytes().await {
            if name == "image" {
                *state.seen_image.lock() = Some((file_name, data.len()));
            }
        }
    }

    let delay = state.predict_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay as u64)).await;
    }

    if state.predict_fails.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "model crashed").into_response();
    }
    let prediction = state.prediction.lock().clone();
    Json(prediction).into_response()
}

async fn plant_info(
    State(state): State<BackendState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.info_calls.fetch_add(1, Ordering::SeqCst);
    state.seen_queries.lock().push(params);
    let info = state.plant_info.lock().clone();
    Json(info).into_response()
}

async fn translate(State(state): State<BackendState>, Json(body): Json<Value>) -> Response {
    state.translate_calls.fetch_add(1, Ordering::SeqCst);

    let text = body["text"].as_str().unwrap_or_default().to_string();
    let lang = body["targetLang"].as_str().unwrap_or_default().to_string();

    if state.translate_fail_on.lock().as_deref() == Some(text.as_str()) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "translator down").into_response();
    }
    Json(json!({ "text": format!("[{}] {}", lang, text) })).into_response()
}

async fn chat(State(state): State<BackendState>, Json(body): Json<Value>) -> Response {
    state.chat_calls.fetch_add(1, Ordering::SeqCst);
    state.seen_chat.lock().push(body.clone());

    if state.chat_fails.load(Ordering::SeqCst) {
        return (StatusCode::BAD_GATEWAY, "llm unavailable").into_response();
    }

    let plant = body["contextPlant"].as_str().unwrap_or("plants");
    let message = body["message"].as_str().unwrap_or_default();
    Json(json!({ "reply": format!("About {}: {}", plant, message) })).into_response()
}

/// 启动模拟后端，返回基础地址
pub async fn spawn_backend(state: BackendState) -> String {
    let app = Router::new()
        .route("/predict", post(predict))
        .route("/plant-info", get(plant_info))
        .route("/translate", post(translate))
        .route("/chat", post(chat))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

/// 指向模拟后端的配置，不预缓存任何资源
pub fn test_config(api_base_url: &str) -> Config {
    Config {
        api_base_url: api_base_url.to_string(),
        app_origin: "http://app.local".to_string(),
        precache_assets: Vec::new(),
        request_timeout_secs: 5,
        ..Config::default()
    }
}

/// 使用真实 HTTP 客户端装配应用
pub async fn app_for(api_base_url: &str) -> App {
    let fetcher = Arc::new(ReqwestFetcher::new(Duration::from_secs(5)).unwrap());
    App::with_fetcher(test_config(api_base_url), fetcher)
        .await
        .unwrap()
}

// ========== 假网络 ==========

/// 可以随时断网的假网络
pub struct FakeFetcher {
    online: AtomicBool,
    routes: Mutex<HashMap<String, (u16, String)>>,
    calls: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            online: AtomicBool::new(true),
            routes: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn respond(&self, url: &str, status: u16, body: &str) {
        self.routes
            .lock()
            .insert(url.to_string(), (status, body.to_string()));
    }

    pub fn go_offline(&self) {
        self.online.store(false, Ordering::SeqCst);
    }

    pub fn go_online(&self) {
        self.online.store(true, Ordering::SeqCst);
    }

    /// 已发出的请求（"METHOD url"）
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl NetworkFetcher for FakeFetcher {
    async fn fetch(&self, request: &OutboundRequest) -> Result<ResponseSnapshot, NetworkError> {
        self.calls
            .lock()
            .push(format!("{} {}", request.method.as_str(), request.url));

        if !self.online.load(Ordering::SeqCst) {
            return Err(NetworkError::unreachable(&request.url, "offline"));
        }

        let route = self.routes.lock().get(&request.url).cloned();
        let (status, body) = route.unwrap_or((404, "not found".to_string()));
        Ok(ResponseSnapshot::new(request.url.clone(), status, body))
    }
}
