// 路由集成测试
//
// 用固定的上游响应驱动完整的路由，验证状态码、响应头、JSON 结构和缓存行为

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use maoyan_box_office::{
    api::{self, AppState},
    external::{CacheStore, MokaCacheStore, MovieSource},
    models::{placeholder, CatalogMovie},
    services::{CacheGate, MergePolicy, MovieService, ScrapeError, Upstream},
};

const NEZHA_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>哪吒之魔童降世 - 猫眼专业版</title></head>
<body>
  <img src="//p0.pipi.cn/mmdb/nezha.jpg" alt="哪吒" class="need-handle-pic">
  <span class="info-title-content">哪吒之魔童降世</span>
  <p class="info-category">动画</p>
  <span class="rating-num">9.6</span>
  <p class="info-detail-title">累计票房</p>
  <p class="info-detail-content"><span class="detail-num">12.3</span><span class="detail-unit">亿</span></p>
  <p>导演：饺子</p>
</body>
</html>"#;

/// 按 movieId 返回固定内容的上游
struct FixtureSource {
    page_calls: AtomicUsize,
    catalog_calls: AtomicUsize,
    catalog_down: bool,
}

impl FixtureSource {
    fn new() -> Self {
        Self {
            page_calls: AtomicUsize::new(0),
            catalog_calls: AtomicUsize::new(0),
            catalog_down: false,
        }
    }

    fn with_catalog_down() -> Self {
        Self {
            catalog_down: true,
            ..Self::new()
        }
    }
}

#[async_trait]
impl MovieSource for FixtureSource {
    async fn fetch_page(&self, movie_id: &str) -> Result<String, ScrapeError> {
        self.page_calls.fetch_add(1, Ordering::SeqCst);
        match movie_id {
            "1413252" => Ok(NEZHA_PAGE.to_string()),
            "888" => Ok(
                "<html><head><title>猫眼专业版-实时票房</title></head><body>页面已下线</body></html>"
                    .to_string(),
            ),
            "panic" => panic!("parser exploded"),
            _ => Err(ScrapeError::UpstreamNon2xx {
                upstream: Upstream::BoxOfficePage,
                status: 404,
            }),
        }
    }

    async fn fetch_catalog(&self, movie_id: &str) -> Result<CatalogMovie, ScrapeError> {
        self.catalog_calls.fetch_add(1, Ordering::SeqCst);
        if self.catalog_down {
            return Err(ScrapeError::UpstreamUnreachable {
                upstream: Upstream::CatalogApi,
                message: "timed out".to_string(),
            });
        }
        match movie_id {
            "1413252" => Ok(CatalogMovie {
                id: Some("1413252".to_string()),
                nm: Some("哪吒之魔童降世".to_string()),
                enm: Some("Ne Zha".to_string()),
                cat: Some("动画,奇幻".to_string()),
                rt: Some("2019-07-26 08:00".to_string()),
                dur: Some(110),
                src: Some("中国大陆".to_string()),
                dra: Some("天地灵气孕育出一颗能量巨大的混元珠".to_string()),
                ..CatalogMovie::default()
            }),
            _ => Err(ScrapeError::UpstreamNon2xx {
                upstream: Upstream::CatalogApi,
                status: 404,
            }),
        }
    }

    fn page_host(&self) -> &str {
        "piaofang.maoyan.com"
    }

    fn api_host(&self) -> &str {
        "api.maoyan.com"
    }
}

struct TestApp {
    router: Router,
    source: Arc<FixtureSource>,
    store: Arc<dyn CacheStore>,
    cache: CacheGate,
}

fn test_app(source: FixtureSource) -> TestApp {
    let source = Arc::new(source);
    let store: Arc<dyn CacheStore> = Arc::new(MokaCacheStore::new(100));
    let cache = CacheGate::new(Some(store.clone()), Duration::from_secs(60), "test");
    let service = MovieService::new(source.clone(), cache.clone(), MergePolicy::default());
    TestApp {
        router: api::router(AppState::new(service)),
        source,
        store,
        cache,
    }
}

async fn send(router: &Router, method: Method, uri: &str, accept: Option<&str>) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(accept) = accept {
        builder = builder.header(header::ACCEPT, accept);
    }
    let response = router
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec();
    (status, headers, body)
}

async fn get_json(router: &Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Value) {
    let (status, headers, body) = send(router, Method::GET, uri, None).await;
    (status, headers, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_movie_lookup_with_both_sources() {
    let app = test_app(FixtureSource::new());

    let (status, headers, body) = get_json(&app.router, "/api/movie/1413252").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        headers.get(header::CONTENT_TYPE).unwrap(),
        "application/json; charset=utf-8"
    );
    assert_eq!(headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), "*");

    assert_eq!(body["movieId"], "1413252");
    assert_eq!(body["hasData"], true);
    assert_eq!(body["basic"]["movieName"], "哪吒之魔童降世");
    assert_ne!(body["basic"]["movieName"], placeholder::MOVIE_NAME);
    assert_eq!(body["basic"]["movieEnName"], "Ne Zha");
    assert_eq!(body["basic"]["movieImg"], "https://p0.pipi.cn/mmdb/nezha.jpg");
    assert_eq!(body["basic"]["director"], "饺子");
    assert_eq!(body["basic"]["category"], "动画,奇幻");
    assert_eq!(body["basic"]["releaseDate"], "2019-07-26");
    assert_eq!(body["basic"]["boxOffice"], "12.3亿");
    assert_eq!(body["basic"]["duration"], "110分钟");
    assert_eq!(body["basic"]["region"], "中国大陆");
    assert_eq!(body["rating"]["MaoYanRating"], "9.6");
    assert!(body["rating"]["IMDBRating"].is_null());
    assert_eq!(body["plot"]["summary"], "天地灵气孕育出一颗能量巨大的混元珠");
    assert_eq!(body["castCrew"]["actors"], serde_json::json!([]));
    assert_eq!(body["castCrew"]["note"], placeholder::CAST_CREW_NOTE);
    assert_eq!(body["castCrew"]["limitation"], placeholder::SOURCE_LIMITATION);
    assert_eq!(body["awards"]["list"], serde_json::json!([]));
    assert_eq!(body["awards"]["note"], placeholder::AWARDS_NOTE);
    assert_eq!(body["_meta"]["success"], true);
    assert_eq!(body["_meta"]["fromCache"], false);
    assert_eq!(body["_meta"]["dataType"], "complete");
    assert_eq!(
        body["_meta"]["dataSources"],
        serde_json::json!(["piaofang.maoyan.com", "api.maoyan.com"])
    );
}

#[tokio::test]
async fn test_repeat_lookup_is_served_from_cache() {
    let app = test_app(FixtureSource::new());

    let (_, _, first) = get_json(&app.router, "/api/movie/1413252").await;
    let (status, _, second) = get_json(&app.router, "/api/movie/1413252").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.source.page_calls.load(Ordering::SeqCst), 1);
    assert_eq!(app.source.catalog_calls.load(Ordering::SeqCst), 1);
    assert_eq!(second["_meta"]["fromCache"], true);
    assert!(second["_meta"]["cacheTime"].is_string());
    assert_eq!(second["basic"], first["basic"]);
    assert_eq!(second["_meta"]["requestTime"], first["_meta"]["requestTime"]);
}

#[tokio::test]
async fn test_page_failure_returns_error_record() {
    let app = test_app(FixtureSource::new());

    let (status, headers, body) = get_json(&app.router, "/api/movie/999999999").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), "*");
    assert_eq!(body["movieId"], "999999999");
    assert_eq!(body["hasData"], false);
    assert!(!body["error"].as_str().unwrap().is_empty());

    // 失败的请求不写缓存
    let key = app.cache.key("999999999");
    assert!(app.store.get(&key).await.unwrap().is_none());
}

#[tokio::test]
async fn test_catalog_failure_keeps_page_data() {
    let app = test_app(FixtureSource::with_catalog_down());

    let (status, _, body) = get_json(&app.router, "/api/movie/1413252").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["hasData"], true);
    assert_eq!(body["basic"]["movieName"], "哪吒之魔童降世");
    assert_eq!(body["basic"]["category"], "动画");
    assert_eq!(body["basic"]["boxOffice"], "12.3亿");
    assert_eq!(body["plot"]["error"], placeholder::SECONDARY_MISSING);
    assert!(body["plot"]["summary"].is_null());
    assert!(body["_meta"]["secondaryError"]
        .as_str()
        .unwrap()
        .contains("timed out"));
    assert_eq!(
        body["_meta"]["dataSources"],
        serde_json::json!(["piaofang.maoyan.com"])
    );
}

#[tokio::test]
async fn test_unknown_movie_is_not_cached() {
    let app = test_app(FixtureSource::new());

    let (status, _, body) = get_json(&app.router, "/api/movie/888").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["movieId"], "888");
    assert_eq!(body["hasData"], false);
    assert_eq!(body["basic"]["movieName"], placeholder::MOVIE_NAME);
    assert_eq!(body["basic"]["boxOffice"], placeholder::BOX_OFFICE);

    // 站点标题不能当作片名
    assert_ne!(body["basic"]["movieName"], "猫眼专业版");
    assert!(app.store.get(&app.cache.key("888")).await.unwrap().is_none());

    get_json(&app.router, "/api/movie/888").await;
    assert_eq!(app.source.page_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_panicking_lookup_still_reports_movie_id() {
    let app = test_app(FixtureSource::new());

    let (status, _, body) = get_json(&app.router, "/api/movie/panic").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["movieId"], "panic");
    assert_eq!(body["hasData"], false);
    assert!(!body["error"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_options_preflight_on_any_path() {
    let app = test_app(FixtureSource::new());

    for uri in ["/api/movie/1413252", "/", "/whatever/else"] {
        let (status, headers, body) = send(&app.router, Method::OPTIONS, uri, None).await;
        assert_eq!(status, StatusCode::OK, "{}", uri);
        assert!(body.is_empty(), "{}", uri);
        assert_eq!(headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), "*");
        assert!(headers.contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));
        assert!(headers.contains_key(header::ACCESS_CONTROL_ALLOW_HEADERS));
    }
    assert_eq!(app.source.page_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_index_and_unmatched_paths_return_usage() {
    let app = test_app(FixtureSource::new());

    for uri in ["/", "/api/unknown"] {
        let (status, headers, body) = get_json(&app.router, uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            headers.get(header::CONTENT_TYPE).unwrap(),
            "application/json; charset=utf-8"
        );
        assert!(body["endpoints"]["/api/movie/:id"].is_string());
        assert_eq!(body["examples"]["movie"], "/api/movie/1413252");
        assert!(body["status"].is_string());
    }
}

#[tokio::test]
async fn test_index_serves_page_to_browsers() {
    let app = test_app(FixtureSource::new());

    let (status, headers, body) = send(
        &app.router,
        Method::GET,
        "/",
        Some("text/html,application/xhtml+xml"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        headers.get(header::CONTENT_TYPE).unwrap(),
        "text/html; charset=utf-8"
    );
    let page = String::from_utf8(body).unwrap();
    assert!(page.contains("<form"));
}

#[tokio::test]
async fn test_status_reports_cache_and_upstreams() {
    let app = test_app(FixtureSource::new());
    get_json(&app.router, "/api/movie/1413252").await;

    let (status, _, body) = get_json(&app.router, "/api/status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["cache"]["enabled"], true);
    assert_eq!(body["cache"]["ttlSecs"], 60);
    assert_eq!(body["cache"]["version"], "test");
    assert_eq!(body["upstreams"]["page"], "piaofang.maoyan.com");
    assert_eq!(body["upstreams"]["api"], "api.maoyan.com");
}

#[tokio::test]
async fn test_disabled_cache_always_goes_upstream() {
    let source = Arc::new(FixtureSource::new());
    let service = MovieService::new(source.clone(), CacheGate::disabled(), MergePolicy::default());
    let router = api::router(AppState::new(service));

    for _ in 0..2 {
        let (status, _, body) = get_json(&router, "/api/movie/1413252").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["_meta"]["fromCache"], false);
    }
    assert_eq!(source.page_calls.load(Ordering::SeqCst), 2);
}
