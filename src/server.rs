//! HTTP surface: rendered index and post pages, the metadata and view-count
//! APIs, calculator endpoints, and the admin session endpoints.

use std::path::Path as FsPath;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tera::{Context, Tera};
use time::OffsetDateTime;
use tokio::task::JoinHandle;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{debug, info, warn};

use crate::calc::{
    compute_budget, compute_paint_liters, compute_tile, compute_wallpaper, BudgetInput, BudgetResult, PaintInput,
    TileInput, TileResult, WallpaperInput, WallpaperResult,
};
use crate::compat::{ApiForm, ApiJson};
use crate::content::listing::{tag_index, TagSummary};
use crate::content::{ContentSet, PublicDir, ValidationError};
use crate::error::{ApiError, ApiResult};
use crate::locale::{self, Locale};
use crate::metadata::{build_page_metadata, MetadataOverrides, MetadataSubject, PageMetadata, SiteMeta, StaticPage};
use crate::page::{PostSummary, PostView};
use crate::store::{Session, SessionStore, ViewCountStore};

pub const SESSION_COOKIE: &str = "admin_session";

const TOP_DEFAULT: usize = 10;
const TOP_MAX: usize = 100;

/// HTML escaping that leaves `/` alone so URLs stay readable in attributes.
fn escape_html(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&quot;"),
            '\'' => output.push_str("&#x27;"),
            _ => output.push(c),
        }
    }
    output
}

pub fn templates() -> tera::Result<Tera> {
    let mut tera = Tera::default();
    tera.set_escape_fn(escape_html);
    tera.add_raw_templates(vec![
        ("base.html", include_str!("../templates/base.html")),
        ("index.html", include_str!("../templates/index.html")),
        ("post.html", include_str!("../templates/post.html")),
    ])?;
    Ok(tera)
}

pub struct AdminAuth {
    pub password: String,
    pub session_ttl: time::Duration,
}

#[derive(Clone)]
pub struct AppState {
    pub content: Arc<ContentSet>,
    pub site: Arc<SiteMeta>,
    pub templates: Arc<Tera>,
    pub sessions: Arc<dyn SessionStore>,
    pub views: Arc<dyn ViewCountStore>,
    pub assets: Arc<PublicDir>,
    pub admin: Arc<AdminAuth>,
}

pub fn router(state: AppState, public: &FsPath) -> Router {
    Router::new()
        .route("/", get(index_ru))
        .route("/en", get(index_en))
        .route("/posts/*slug", get(post_ru))
        .route("/en/posts/*slug", get(post_en))
        .route("/api/meta", get(page_meta))
        .route("/api/views", get(view_count).post(record_view))
        .route("/api/views/top", get(top_views))
        .route("/api/calc/paint", post(calc_paint))
        .route("/api/calc/tile", post(calc_tile))
        .route("/api/calc/wallpaper", post(calc_wallpaper))
        .route("/api/calc/budget", post(calc_budget))
        .route("/api/admin/login", post(login))
        .route("/api/admin/logout", post(logout))
        .route("/api/admin/session", get(session_status))
        .route("/api/admin/validate", get(validate_content))
        .fallback_service(ServeDir::new(public))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Drops expired admin sessions every `every`.
pub fn spawn_session_sweeper(sessions: Arc<dyn SessionStore>, every: std::time::Duration) -> JoinHandle<()> {
    let every = every.max(std::time::Duration::from_secs(1));
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            let removed = sessions.sweep_expired().await;
            if removed > 0 {
                debug!(removed, "swept expired admin sessions");
            }
        }
    })
}

fn page_context(state: &AppState, locale: Locale, metadata: &PageMetadata) -> Context {
    let mut context = Context::new();
    context.insert("locale", &locale);
    context.insert("site_name", &state.site.name);
    context.insert("metadata", metadata);
    context
}

fn render_index(state: &AppState, locale: Locale) -> ApiResult<Html<String>> {
    let page = StaticPage {
        locale,
        path: "/".to_string(),
        title: state.site.name.clone(),
        description: state.site.description.get(locale).to_string(),
        translated: true,
    };
    let metadata = build_page_metadata(&MetadataSubject::Page(&page), &state.site, &MetadataOverrides::default());

    let posts: Vec<PostSummary> = state
        .content
        .published(Some(locale))
        .into_iter()
        .map(|entry| PostSummary::new(entry, &state.site))
        .collect();

    let tags: Vec<TagSummary> = tag_index(state.content.entries(), locale).into_values().collect();

    let mut context = page_context(state, locale, &metadata);
    context.insert("posts", &posts);
    context.insert("tags", &tags);
    Ok(Html(state.templates.render("index.html", &context)?))
}

async fn index_ru(State(state): State<AppState>) -> ApiResult<Html<String>> {
    render_index(&state, Locale::Ru)
}

async fn index_en(State(state): State<AppState>) -> ApiResult<Html<String>> {
    render_index(&state, Locale::En)
}

fn render_post(state: &AppState, locale: Locale, slug: &str) -> ApiResult<Html<String>> {
    let url = locale::resolve_url(locale, slug);
    let entry = state
        .content
        .published_by_url(&url)
        .ok_or_else(|| ApiError::NotFound(url.clone()))?;

    let view = PostView::new(entry, &state.content, &state.site);
    let mut context = page_context(state, locale, &view.metadata);
    context.insert("post", &view);
    Ok(Html(state.templates.render("post.html", &context)?))
}

async fn post_ru(State(state): State<AppState>, Path(slug): Path<String>) -> ApiResult<Html<String>> {
    render_post(&state, Locale::Ru, &slug)
}

async fn post_en(State(state): State<AppState>, Path(slug): Path<String>) -> ApiResult<Html<String>> {
    render_post(&state, Locale::En, &slug)
}

#[derive(Deserialize)]
struct MetaQuery {
    path: String,
}

async fn page_meta(State(state): State<AppState>, Query(query): Query<MetaQuery>) -> ApiResult<ApiJson<PageMetadata>> {
    let entry = state
        .content
        .published_by_url(&query.path)
        .ok_or_else(|| ApiError::NotFound(query.path.clone()))?;

    Ok(ApiJson(build_page_metadata(
        &MetadataSubject::Post {
            entry,
            entries: state.content.entries(),
        },
        &state.site,
        &MetadataOverrides::default(),
    )))
}

#[derive(Deserialize)]
struct ViewQuery {
    url: String,
}

#[derive(Serialize, Debug)]
struct ViewCount {
    url: String,
    views: u64,
}

/// Canonical URL of the published post at `url`; counts are only kept for those.
fn counted_url(state: &AppState, url: &str) -> ApiResult<String> {
    state
        .content
        .published_by_url(url)
        .map(|entry| entry.url.clone())
        .ok_or_else(|| ApiError::NotFound(url.to_string()))
}

async fn view_count(State(state): State<AppState>, Query(query): Query<ViewQuery>) -> ApiResult<ApiJson<ViewCount>> {
    let url = counted_url(&state, &query.url)?;
    let views = state.views.get(&url).await?;
    Ok(ApiJson(ViewCount { url, views }))
}

async fn record_view(State(state): State<AppState>, Query(query): Query<ViewQuery>) -> ApiResult<ApiJson<ViewCount>> {
    let url = counted_url(&state, &query.url)?;
    let views = state.views.increment(&url).await?;
    Ok(ApiJson(ViewCount { url, views }))
}

#[derive(Deserialize)]
struct TopQuery {
    limit: Option<usize>,
}

async fn top_views(State(state): State<AppState>, Query(query): Query<TopQuery>) -> ApiResult<ApiJson<Vec<ViewCount>>> {
    let limit = query.limit.unwrap_or(TOP_DEFAULT).min(TOP_MAX);
    let top = state
        .views
        .top(limit)
        .await?
        .into_iter()
        .map(|(url, views)| ViewCount { url, views })
        .collect();
    Ok(ApiJson(top))
}

#[derive(Serialize, Debug)]
struct PaintEstimate {
    paintable_area: f64,
    liters: f64,
}

async fn calc_paint(ApiJson(input): ApiJson<PaintInput>) -> ApiJson<PaintEstimate> {
    ApiJson(PaintEstimate {
        paintable_area: input.paintable_area(),
        liters: compute_paint_liters(&input),
    })
}

async fn calc_tile(ApiJson(input): ApiJson<TileInput>) -> ApiJson<Option<TileResult>> {
    ApiJson(compute_tile(&input))
}

async fn calc_wallpaper(ApiJson(input): ApiJson<WallpaperInput>) -> ApiJson<Option<WallpaperResult>> {
    ApiJson(compute_wallpaper(&input))
}

async fn calc_budget(ApiJson(input): ApiJson<BudgetInput>) -> ApiJson<BudgetResult> {
    ApiJson(compute_budget(&input))
}

fn session_cookie(token: &str, max_age: i64) -> String {
    format!("{SESSION_COOKIE}={token}; HttpOnly; Path=/; SameSite=Lax; Max-Age={max_age}")
}

fn session_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, token)| token)
}

async fn require_admin(state: &AppState, headers: &HeaderMap) -> ApiResult<Session> {
    let token = session_token(headers).ok_or(ApiError::Unauthorized)?;
    state.sessions.validate(token).await.ok_or(ApiError::Unauthorized)
}

#[derive(Deserialize)]
struct LoginForm {
    password: String,
}

#[derive(Serialize, Debug)]
struct SessionStatus {
    #[serde(with = "time::serde::iso8601")]
    expires: OffsetDateTime,
}

async fn login(State(state): State<AppState>, ApiForm(form): ApiForm<LoginForm>) -> ApiResult<impl IntoResponse> {
    if state.admin.password.is_empty() || form.password != state.admin.password {
        warn!("rejected admin login");
        return Err(ApiError::Unauthorized);
    }

    let session = state.sessions.create(state.admin.session_ttl).await;
    info!(expires = %session.expires, "admin signed in");

    let cookie = session_cookie(&session.token, state.admin.session_ttl.whole_seconds());
    Ok((
        [(header::SET_COOKIE, cookie)],
        ApiJson(SessionStatus {
            expires: session.expires,
        }),
    ))
}

async fn logout(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    if let Some(token) = session_token(&headers) {
        state.sessions.delete(token).await;
    }
    ([(header::SET_COOKIE, session_cookie("", 0))], StatusCode::NO_CONTENT)
}

async fn session_status(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<ApiJson<SessionStatus>> {
    let session = require_admin(&state, &headers).await?;
    Ok(ApiJson(SessionStatus {
        expires: session.expires,
    }))
}

async fn validate_content(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<ApiJson<Vec<ValidationError>>> {
    require_admin(&state, &headers).await?;
    Ok(ApiJson(state.content.validate(state.assets.as_ref())))
}
