mod common;

use common::{test_config, FakeFetcher};
use plant_identify_client::error::{ApiError, GatewayError};
use plant_identify_client::orchestrator::open_storage;
use plant_identify_client::App;

const API: &str = "http://api.local";
const MINT_INFO: &str = "http://api.local/plant-info?name=Mint&lang=en";

#[tokio::test]
async fn plant_info_is_served_from_cache_when_offline() {
    let fetcher = FakeFetcher::new();
    fetcher.respond(MINT_INFO, 200, r#"{"facts":["aromatic"],"regions":["Europe"]}"#);
    let app = App::with_fetcher(test_config(API), fetcher.clone())
        .await
        .unwrap();
    assert!(app.gateway().is_controlling());

    let online = app.client().plant_info("Mint", "en").await.unwrap();
    fetcher.go_offline();
    let offline = app.client().plant_info("Mint", "en").await.unwrap();

    assert_eq!(online, offline);
    assert_eq!(offline.facts, Some(Some(vec!["aromatic".to_string()])));
    assert_eq!(app.cache_report(), vec![("plantid-cache-v1".to_string(), 1)]);
}

#[tokio::test]
async fn uncached_plant_info_fails_when_offline() {
    let fetcher = FakeFetcher::new();
    let app = App::with_fetcher(test_config(API), fetcher.clone())
        .await
        .unwrap();
    fetcher.go_offline();

    let err = app.client().plant_info("Fern", "en").await.unwrap_err();

    assert!(err.is_network());
    assert!(matches!(
        err,
        ApiError::RequestFailed {
            source: GatewayError::Offline { .. },
            ..
        }
    ));
}

#[tokio::test]
async fn chat_is_never_answered_from_cache() {
    let fetcher = FakeFetcher::new();
    fetcher.respond("http://api.local/chat", 200, r#"{"reply":"hi"}"#);
    let app = App::with_fetcher(test_config(API), fetcher.clone())
        .await
        .unwrap();

    app.client().chat("hello", None).await.unwrap();
    fetcher.go_offline();
    let err = app.client().chat("hello", None).await.unwrap_err();

    assert!(err.is_network());
    assert!(app.cache_report().iter().all(|(_, count)| *count == 0));
}

#[tokio::test]
async fn failed_precache_leaves_requests_on_the_network() {
    let fetcher = FakeFetcher::new();
    let config = plant_identify_client::Config {
        precache_assets: vec!["/".to_string()],
        ..test_config(API)
    };
    // 外壳资源没有注册，预缓存失败
    let app = App::with_fetcher(config, fetcher.clone()).await.unwrap();
    assert!(!app.gateway().is_controlling());

    fetcher.respond(MINT_INFO, 200, "{}");
    app.client().plant_info("Mint", "en").await.unwrap();
    fetcher.go_offline();

    assert!(app.client().plant_info("Mint", "en").await.is_err());
}

const SHELL_ASSETS: [&str; 3] = [
    "http://app.local/",
    "http://app.local/index.html",
    "http://app.local/manifest.json",
];

fn persistent_config(dir: &tempfile::TempDir) -> plant_identify_client::Config {
    plant_identify_client::Config {
        precache_assets: plant_identify_client::Config::default().precache_assets,
        cache_dir: Some(dir.path().display().to_string()),
        ..test_config(API)
    }
}

fn serve_shell(fetcher: &FakeFetcher) {
    for asset in SHELL_ASSETS {
        fetcher.respond(asset, 200, "<shell>");
    }
}

#[tokio::test]
async fn restart_while_offline_keeps_serving_saved_cache() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = FakeFetcher::new();
    serve_shell(&fetcher);
    fetcher.respond(MINT_INFO, 200, r#"{"facts":["aromatic"]}"#);

    let online = {
        let app = App::with_fetcher(persistent_config(&dir), fetcher.clone())
            .await
            .unwrap();
        assert!(app.gateway().is_controlling());
        app.client().plant_info("Mint", "en").await.unwrap()
    };

    fetcher.go_offline();
    let app = App::with_fetcher(persistent_config(&dir), fetcher.clone())
        .await
        .unwrap();

    assert!(app.gateway().is_controlling());
    let offline = app.client().plant_info("Mint", "en").await.unwrap();
    assert_eq!(offline, online);

    let shell = app
        .gateway()
        .handle(&plant_identify_client::infrastructure::OutboundRequest::get(
            "http://app.local/index.html",
        ))
        .await
        .unwrap();
    assert_eq!(shell.body.as_ref(), b"<shell>");
}

#[tokio::test]
async fn failed_reinstall_keeps_existing_generation() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = FakeFetcher::new();
    serve_shell(&fetcher);
    fetcher.respond(MINT_INFO, 200, "{}");

    {
        let app = App::with_fetcher(persistent_config(&dir), fetcher.clone())
            .await
            .unwrap();
        app.client().plant_info("Mint", "en").await.unwrap();
    }

    // 重启时清单文件不可用，重新预缓存失败
    fetcher.respond("http://app.local/manifest.json", 404, "gone");
    let app = App::with_fetcher(persistent_config(&dir), fetcher.clone())
        .await
        .unwrap();

    assert!(app.gateway().is_controlling());
    assert_eq!(app.cache_report(), vec![("plantid-cache-v1".to_string(), 4)]);
    let manifest = app
        .gateway()
        .cached("http://app.local/manifest.json")
        .unwrap();
    assert_eq!(manifest.status, 200);
}

#[tokio::test]
async fn invalid_base_url_is_a_config_error() {
    let config = plant_identify_client::Config {
        api_base_url: "not a url".to_string(),
        ..test_config(API)
    };

    let result = App::initialize(config).await;

    assert!(matches!(
        result,
        Err(plant_identify_client::AppError::Config(_))
    ));
}

#[tokio::test]
async fn opening_storage_for_a_report_keeps_old_generations() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = FakeFetcher::new();
    fetcher.respond(MINT_INFO, 200, "{}");
    {
        let old = plant_identify_client::Config {
            cache_generation: "plantid-cache-v0".to_string(),
            ..persistent_config(&dir)
        };
        serve_shell(&fetcher);
        let app = App::with_fetcher(old, fetcher.clone()).await.unwrap();
        app.client().plant_info("Mint", "en").await.unwrap();
    }
    fetcher.go_offline();

    let storage = open_storage(&persistent_config(&dir)).await.unwrap();

    assert_eq!(storage.report(), vec![("plantid-cache-v0".to_string(), 4)]);
    assert_eq!(fetcher.call_count(), 4);
}
