use std::path::Path;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use remont_blog::{
    content::{reading::ReadingSpeed, source, PublicDir},
    metadata::SiteMeta,
    server::{self, AdminAuth, AppState},
    store::{MemorySessionStore, MemoryViewCounts},
};
use tempfile::TempDir;
use tower::ServiceExt;

const RU_POST: &str = r#"+++
title = "Покраска стен"
description = "Сколько краски нужно на комнату."
date = 2024-05-01
tags = ["краска"]
cover = "/images/cover.svg"
+++
## Подготовка

Грунтуйте стены.

## FAQ

### Сколько слоёв?

Два.
"#;

const EN_POST: &str = r#"+++
title = "Painting walls"
description = "How much paint a room needs."
date = 2024-05-02
tags = ["paint"]
cover = "/images/cover.svg"
translation_of = "pokraska"
+++
## Preparation

Prime the walls.
"#;

const DRAFT: &str = r#"+++
title = "Черновик"
description = "Ещё не готово."
date = 2024-05-03
cover = "/images/cover.svg"
draft = true
+++
Текст.
"#;

fn write(root: &Path, relative: &str, text: &str) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, text).unwrap();
}

struct TestApp {
    router: Router,
    _dir: TempDir,
}

fn app() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let content_root = dir.path().join("content");
    let public = dir.path().join("public");
    write(&content_root, "posts/pokraska.md", RU_POST);
    write(&content_root, "posts/en/painting.md", EN_POST);
    write(&content_root, "posts/chernovik.md", DRAFT);
    write(&public, "images/cover.svg", "<svg xmlns=\"http://www.w3.org/2000/svg\"/>");

    let (content, errors) = source::load_dir(&content_root, &ReadingSpeed::default()).unwrap();
    assert!(errors.is_empty());

    let site = SiteMeta {
        base_url: "https://remont.example".to_string(),
        name: "Ремонт".to_string(),
        default_cover: "/images/cover.svg".to_string(),
        twitter_site: None,
        description: Default::default(),
    };

    let state = AppState {
        content: Arc::new(content),
        site: Arc::new(site),
        templates: Arc::new(server::templates().unwrap()),
        sessions: Arc::new(MemorySessionStore::new()),
        views: Arc::new(MemoryViewCounts::new()),
        assets: Arc::new(PublicDir(public.clone())),
        admin: Arc::new(AdminAuth {
            password: "secret".to_string(),
            session_ttl: time::Duration::hours(1),
        }),
    };

    TestApp {
        router: server::router(state, &public),
        _dir: dir,
    }
}

async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, body.to_vec())
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, json: serde_json::Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json.to_string()))
        .unwrap()
}

fn json(body: &[u8]) -> serde_json::Value {
    serde_json::from_slice(body).unwrap()
}

#[tokio::test]
async fn test_post_pages() {
    let app = app();

    let (status, _, body) = send(&app, get("/posts/pokraska")).await;
    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("<title>Покраска стен</title>"));
    assert!(html.contains("hreflang=\"en\" href=\"https://remont.example/en/posts/painting\""));
    assert!(html.contains("application/ld+json"));
    assert!(html.contains("Сколько слоёв?"));

    let (status, _, body) = send(&app, get("/en/posts/painting")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(body).unwrap().contains("<html lang=\"en\">"));

    let (status, _, _) = send(&app, get("/posts/chernovik")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, _) = send(&app, get("/en/posts/pokraska")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_index_lists_published_posts_of_locale() {
    let app = app();

    let (status, _, body) = send(&app, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("/posts/pokraska"));
    assert!(!html.contains("/posts/chernovik"));
    assert!(!html.contains("href=\"/en/posts/painting\""));
    assert!(html.contains("data-tag=\"kraska\""));

    let (status, _, body) = send(&app, get("/en")).await;
    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("href=\"/en/posts/painting\""));
    assert!(html.contains("data-tag=\"paint\""));
    assert!(!html.contains("data-tag=\"kraska\""));
}

#[tokio::test]
async fn test_page_metadata() {
    let app = app();

    let (status, _, body) = send(&app, get("/api/meta?path=/en/posts/painting")).await;
    assert_eq!(status, StatusCode::OK);
    let metadata = json(&body);
    assert_eq!(metadata["canonical_url"], "https://remont.example/en/posts/painting");
    assert_eq!(metadata["languages"]["ru"], "https://remont.example/posts/pokraska");
    assert_eq!(metadata["languages"]["x-default"], "https://remont.example/posts/pokraska");
    assert_eq!(metadata["open_graph"]["type"], "article");

    let (status, _, _) = send(&app, get("/api/meta?path=/posts/chernovik")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_view_counts() {
    let app = app();

    for expected in 1..=2 {
        let request = Request::post("/api/views?url=/posts/pokraska").body(Body::empty()).unwrap();
        let (status, _, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body)["views"], expected);
    }

    let (_, _, body) = send(&app, get("/api/views?url=/posts/pokraska/")).await;
    assert_eq!(json(&body), serde_json::json!({"url": "/posts/pokraska", "views": 2}));

    let (_, _, body) = send(&app, get("/api/views/top?limit=5")).await;
    assert_eq!(json(&body), serde_json::json!([{"url": "/posts/pokraska", "views": 2}]));

    let request = Request::post("/api/views?url=/posts/chernovik").body(Body::empty()).unwrap();
    let (status, _, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_calculators() {
    let app = app();

    let paint = serde_json::json!({
        "length": 4.0, "width": 4.0, "height": 2.7,
        "doors": 2, "windows": 1, "layers": 2, "coverage": 10.0
    });
    let (status, _, body) = send(&app, post_json("/api/calc/paint", paint)).await;
    assert_eq!(status, StatusCode::OK);
    let liters = json(&body)["liters"].as_f64().unwrap();
    assert!((liters - 7.54).abs() < 1e-9);

    let tile = serde_json::json!({
        "surface_type": "floor", "length": 3.0, "width": 2.5,
        "tile_length_cm": 30.0, "tile_width_cm": 30.0, "tiles_per_pack": 11
    });
    let (_, _, body) = send(&app, post_json("/api/calc/tile", tile)).await;
    let tile = json(&body);
    assert_eq!(tile["tiles_needed"], 92);
    assert_eq!(tile["packs_needed"], 9);

    let (_, _, body) = send(&app, post_json("/api/calc/tile", serde_json::json!({"length": 0.0}))).await;
    assert_eq!(json(&body), serde_json::Value::Null);

    let oversized = serde_json::json!({
        "length": 1e150, "width": 1e150,
        "tile_length_cm": 30.0, "tile_width_cm": 30.0, "tiles_per_pack": 11
    });
    let (status, _, body) = send(&app, post_json("/api/calc/tile", oversized)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body), serde_json::Value::Null);

    let budget = serde_json::json!({"items": [100000, 200000, 50000], "reserve_percent": 20});
    let (_, _, body) = send(&app, post_json("/api/calc/budget", budget)).await;
    assert_eq!(json(&body)["total"], 420000.0);

    let (status, _, body) = send(&app, post_json("/api/calc/paint", serde_json::json!({"length": "four"}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json(&body)["err"].is_string());
}

#[tokio::test]
async fn test_admin_session() {
    let app = app();

    let (status, _, _) = send(&app, get("/api/admin/validate")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let wrong = Request::post("/api/admin/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("password=nope"))
        .unwrap();
    let (status, _, _) = send(&app, wrong).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let login = Request::post("/api/admin/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("password=secret"))
        .unwrap();
    let (status, headers, _) = send(&app, login).await;
    assert_eq!(status, StatusCode::OK);
    let set_cookie = headers.get(header::SET_COOKIE).unwrap().to_str().unwrap();
    assert!(set_cookie.contains("HttpOnly"));
    let cookie = set_cookie.split(';').next().unwrap().to_string();

    let with_cookie = |uri: &str| {
        Request::get(uri)
            .header(header::COOKIE, cookie.as_str())
            .body(Body::empty())
            .unwrap()
    };

    let (status, _, _) = send(&app, with_cookie("/api/admin/session")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, body) = send(&app, with_cookie("/api/admin/validate")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body), serde_json::json!([]));

    let logout = Request::post("/api/admin/logout")
        .header(header::COOKIE, cookie.as_str())
        .body(Body::empty())
        .unwrap();
    let (status, _, _) = send(&app, logout).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _, _) = send(&app, with_cookie("/api/admin/session")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_public_files_are_served() {
    let app = app();

    let (status, _, body) = send(&app, get("/images/cover.svg")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(body).unwrap().starts_with("<svg"));
}
