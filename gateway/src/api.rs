use crate::config::{Config, UpstreamConfig};
use crate::error::{FetchError, GatewayError, LookupError};
use crate::fallback;
use crate::metrics_defs::{CONTACT_DELIVERED, CONTACT_FAILED, FALLBACK_SERVED};
use crate::normalize::{self, PageRequest};
use crate::proxy::{CachedProxy, EndpointPolicy};
use crate::request_query::RequestQuery;
use crate::upstream::ContentApi;
use axum::extract::{Path, State};
use axum::http::Uri;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use http::StatusCode;
use serde_json::{Value, json};
use shared::counter;
use std::sync::Arc;
use std::time::Duration;

// Time-to-live and per-request budgets per endpoint. Budgets are tiered by
// how critical the data is to rendering: footer address can give up fast,
// contact submission gets the longest leash.
const SITE_CONFIG: EndpointPolicy = EndpointPolicy {
    name: "site-config",
    ttl: Duration::from_secs(600),
    timeout: Duration::from_secs(10),
};
const HOMEPAGE: EndpointPolicy = EndpointPolicy {
    name: "homepage",
    ttl: Duration::from_secs(300),
    timeout: Duration::from_secs(10),
};
const CATEGORIES: EndpointPolicy = EndpointPolicy {
    name: "categories",
    ttl: Duration::from_secs(300),
    timeout: Duration::from_secs(5),
};
const MAIN_PAGES: EndpointPolicy = EndpointPolicy {
    name: "main-pages",
    ttl: Duration::from_secs(300),
    timeout: Duration::from_secs(5),
};
const FOOTER_MENU: EndpointPolicy = EndpointPolicy {
    name: "footer-menu",
    ttl: Duration::from_secs(300),
    timeout: Duration::from_secs(10),
};
const FOOTER_ADDRESS: EndpointPolicy = EndpointPolicy {
    name: "footer-address",
    ttl: Duration::from_secs(300),
    timeout: Duration::from_millis(1500),
};
const PAGES_WITH_CATEGORIES: EndpointPolicy = EndpointPolicy {
    name: "pages-with-categories",
    ttl: Duration::from_secs(300),
    timeout: Duration::from_secs(10),
};
const BLOGS: EndpointPolicy = EndpointPolicy {
    name: "blogs",
    ttl: Duration::from_secs(300),
    timeout: Duration::from_secs(5),
};

const LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);
const QUOTES_TIMEOUT: Duration = Duration::from_secs(10);
const CONTACT_TIMEOUT: Duration = Duration::from_secs(15);

/// Shared state for all endpoint handlers: the upstream client plus one
/// cached-proxy cell per listing endpoint. Built once at startup.
pub struct Gateway {
    api: ContentApi,
    upstream: UpstreamConfig,
    site_config: CachedProxy,
    homepage: CachedProxy,
    categories: CachedProxy,
    main_pages: CachedProxy,
    footer_menu: CachedProxy,
    footer_address: CachedProxy,
    pages_with_categories: CachedProxy,
    blogs: CachedProxy,
}

impl Gateway {
    pub fn new(config: &Config) -> Result<Self, GatewayError> {
        let api = ContentApi::new(
            &config.upstream.api_base,
            config.upstream.fallback_api_base.as_deref(),
        )?;

        Ok(Gateway {
            api,
            upstream: config.upstream.clone(),
            site_config: CachedProxy::new(SITE_CONFIG),
            homepage: CachedProxy::new(HOMEPAGE),
            categories: CachedProxy::new(CATEGORIES),
            main_pages: CachedProxy::new(MAIN_PAGES),
            footer_menu: CachedProxy::new(FOOTER_MENU),
            footer_address: CachedProxy::new(FOOTER_ADDRESS),
            pages_with_categories: CachedProxy::new(PAGES_WITH_CATEGORIES),
            blogs: CachedProxy::new(BLOGS),
        })
    }

    // Submission targets tried in order: the explicitly configured URL, then
    // the primary base, then the standby base.
    fn contact_candidates(&self) -> Vec<String> {
        let mut candidates = Vec::new();
        if let Some(direct) = &self.upstream.contact_submit_url {
            candidates.push(direct.clone());
        }
        candidates.push(self.api.url("/api/contact/submit/", &[]).to_string());
        if let Some(standby) = self.api.fallback_url("/api/contact/submit/", &[]) {
            candidates.push(standby.to_string());
        }
        candidates
    }
}

pub fn router(gateway: Arc<Gateway>) -> Router {
    Router::new()
        .route("/api/site-config", get(site_config))
        .route("/api/homepage", get(homepage))
        .route("/api/categories", get(categories))
        .route("/api/main-pages", get(main_pages))
        .route("/api/menu/footer", get(footer_menu))
        .route("/api/footer-address", get(footer_address))
        .route("/api/pages-with-categories", get(pages_with_categories))
        .route("/api/blogs", get(blogs))
        .route("/api/blogs/{slug}", get(blog_detail))
        .route("/api/team-member/{slug}", get(team_member))
        .route("/api/main-page/{slug}", get(main_page))
        .route("/api/page/{slug}", get(page))
        .route("/api/quotes", get(quotes))
        .route("/api/contact", post(contact))
        .route("/health", get(health))
        .route("/ready", get(ready))
        .with_state(gateway)
}

async fn site_config(State(gateway): State<Arc<Gateway>>) -> Json<Value> {
    let url = gateway.api.url("/api/site-config/", &[]);
    let payload = gateway
        .site_config
        .get(&gateway.api, url, |body| body, |_| false, fallback::site_config)
        .await;
    Json(payload.as_ref().clone())
}

async fn homepage(State(gateway): State<Arc<Gateway>>) -> Json<Value> {
    let url = gateway.api.url("/api/homepage/", &[]);
    let payload = gateway
        .homepage
        .get(&gateway.api, url, |body| body, |_| false, fallback::homepage)
        .await;
    Json(payload.as_ref().clone())
}

async fn categories(State(gateway): State<Arc<Gateway>>, uri: Uri) -> Json<Value> {
    let query = RequestQuery::from_uri(&uri);
    let mut pairs = Vec::new();
    if let Some(kind) = query.get("type") {
        pairs.push(("type".to_string(), kind));
    }

    let url = gateway.api.url("/api/categories/all/", &pairs);
    let payload = gateway
        .categories
        .get(&gateway.api, url, |body| body, |_| false, fallback::categories)
        .await;
    Json(payload.as_ref().clone())
}

async fn main_pages(State(gateway): State<Arc<Gateway>>) -> Json<Value> {
    let url = gateway.api.url("/api/main-pages/", &[]);
    let payload = gateway
        .main_pages
        .get(&gateway.api, url, |body| body, |_| false, fallback::main_pages)
        .await;
    Json(payload.as_ref().clone())
}

async fn footer_menu(State(gateway): State<Arc<Gateway>>) -> Json<Value> {
    let url = gateway.api.url("/api/menu/footer/", &[]);
    let payload = gateway
        .footer_menu
        .get(&gateway.api, url, |body| body, |_| false, fallback::footer_menu)
        .await;
    Json(payload.as_ref().clone())
}

async fn footer_address(State(gateway): State<Arc<Gateway>>) -> Json<Value> {
    let url = gateway.api.url("/api/footer-address/", &[]);
    let payload = gateway
        .footer_address
        .get(&gateway.api, url, |body| body, |_| false, fallback::footer_address)
        .await;
    Json(payload.as_ref().clone())
}

async fn pages_with_categories(State(gateway): State<Arc<Gateway>>, uri: Uri) -> Json<Value> {
    // The whole query string is forwarded; caching by resolved URL keeps
    // distinct parameterizations in distinct cells.
    let pairs = RequestQuery::from_uri(&uri).pairs();
    let url = gateway.api.url("/api/pages-with-categories/", &pairs);
    let payload = gateway
        .pages_with_categories
        .get(
            &gateway.api,
            url,
            |body| body,
            |_| false,
            fallback::pages_with_categories,
        )
        .await;
    Json(payload.as_ref().clone())
}

async fn blogs(State(gateway): State<Arc<Gateway>>, uri: Uri) -> Json<Value> {
    let query = RequestQuery::from_uri(&uri);
    let page = PageRequest::from_query(&query);

    let mut pairs = Vec::new();
    for name in ["search", "category", "page", "page_size"] {
        if let Some(value) = query.get(name) {
            pairs.push((name.to_string(), value));
        }
    }

    let url = gateway.api.url("/api/blogs/", &pairs);
    let payload = gateway
        .blogs
        .get(
            &gateway.api,
            url,
            |body| normalize::normalize_listing(body, "blogs", &page),
            |_| false,
            || normalize::empty_listing("blogs", &page),
        )
        .await;
    Json(payload.as_ref().clone())
}

// Soft lookup: a missing or failed article renders as `{blog: null}` rather
// than an error page; only a structurally bad slug is rejected.
async fn blog_detail(State(gateway): State<Arc<Gateway>>, Path(slug): Path<String>) -> Response {
    let slug = slug.trim();
    if slug.is_empty() || slug.eq_ignore_ascii_case("undefined") {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Missing article slug"})),
        )
            .into_response();
    }

    let url = gateway.api.slug_url("/api/blogs/", slug);
    match gateway.api.get_json(url, LOOKUP_TIMEOUT).await {
        Ok(body) => Json(body).into_response(),
        Err(err) => {
            tracing::warn!(slug = %slug, error = %err, "blog detail upstream failed");
            Json(json!({"blog": null})).into_response()
        }
    }
}

async fn team_member(
    State(gateway): State<Arc<Gateway>>,
    Path(slug): Path<String>,
) -> Result<Json<Value>, LookupError> {
    let url = gateway.api.slug_url("/api/team-member/", &slug);
    match gateway.api.get_json(url, LOOKUP_TIMEOUT).await {
        Ok(body) => Ok(Json(body)),
        Err(FetchError::Status(StatusCode::NOT_FOUND)) => {
            Err(LookupError::NotFound("Team member not found"))
        }
        Err(FetchError::Status(status)) => Err(LookupError::UpstreamStatus(
            status,
            "Failed to fetch team member",
        )),
        Err(err) => {
            tracing::warn!(slug = %slug, error = %err, "team member upstream failed");
            Err(LookupError::Internal("Internal Server Error"))
        }
    }
}

async fn main_page(
    State(gateway): State<Arc<Gateway>>,
    Path(slug): Path<String>,
) -> Result<Json<Value>, LookupError> {
    let url = gateway.api.slug_url("/api/main-page/", &slug);
    match gateway.api.get_json(url, LOOKUP_TIMEOUT).await {
        Ok(body) => Ok(Json(body)),
        Err(FetchError::Status(_)) => Err(LookupError::NotFound("Not found")),
        Err(err) => {
            tracing::warn!(slug = %slug, error = %err, "main page upstream failed");
            Err(LookupError::Internal("Error"))
        }
    }
}

async fn page(
    State(gateway): State<Arc<Gateway>>,
    Path(slug): Path<String>,
) -> Result<Json<Value>, LookupError> {
    let url = gateway.api.slug_url("/api/page/", &slug);
    match gateway.api.get_json(url, LOOKUP_TIMEOUT).await {
        Ok(body) => Ok(Json(body)),
        Err(FetchError::Status(StatusCode::NOT_FOUND)) => {
            Err(LookupError::NotFound("Page not found"))
        }
        Err(FetchError::Status(status)) => {
            Err(LookupError::UpstreamStatus(status, "Failed to fetch page"))
        }
        Err(err) => {
            tracing::warn!(slug = %slug, error = %err, "page upstream failed");
            Err(LookupError::Internal("Internal Server Error"))
        }
    }
}

async fn quotes(State(gateway): State<Arc<Gateway>>, uri: Uri) -> Json<Value> {
    let query = RequestQuery::from_uri(&uri);
    let zip = query.get("zip").unwrap_or_default();

    let mut pairs = Vec::new();
    if !zip.is_empty() {
        pairs.push(("zip".to_string(), zip.clone()));
    }

    let url = gateway.api.url("/api/quotes/", &pairs);
    match gateway.api.get_json(url, QUOTES_TIMEOUT).await {
        Ok(body) => Json(companies_or_fallback(body, &zip, "fallback_empty")),
        Err(FetchError::Status(status)) => {
            tracing::warn!(%status, "quotes upstream error, using fallback");
            counter!(FALLBACK_SERVED, "endpoint" => "quotes").increment(1);
            Json(fallback::quotes(&zip, "fallback_error", None))
        }
        Err(err) => {
            // Transport-level failure: one attempt against the standby base
            // before settling for the static list.
            tracing::warn!(error = %err, "quotes fetch failed, trying standby base");
            match gateway.api.fallback_url("/api/quotes/", &pairs) {
                Some(standby) => match gateway.api.get_json(standby, QUOTES_TIMEOUT).await {
                    Ok(body) => Json(companies_or_fallback(body, &zip, "fallback_alt_empty")),
                    Err(standby_err) => {
                        counter!(FALLBACK_SERVED, "endpoint" => "quotes").increment(1);
                        Json(fallback::quotes(
                            &zip,
                            "fallback_final",
                            Some(&standby_err.to_string()),
                        ))
                    }
                },
                None => {
                    counter!(FALLBACK_SERVED, "endpoint" => "quotes").increment(1);
                    Json(fallback::quotes(&zip, "fallback_final", Some(&err.to_string())))
                }
            }
        }
    }
}

// Zero companies is a soft failure: the comparison page must never render
// empty, so the static carriers take over while the rest of the upstream
// body is kept.
fn companies_or_fallback(mut body: Value, zip: &str, empty_marker: &str) -> Value {
    let empty = body
        .get("companies")
        .and_then(Value::as_array)
        .is_none_or(|companies| companies.is_empty());

    if empty {
        counter!(FALLBACK_SERVED, "endpoint" => "quotes").increment(1);
        if let Value::Object(map) = &mut body {
            map.insert("companies".to_string(), json!(fallback::companies()));
            map.insert("zip".to_string(), json!(zip));
            map.insert("_source".to_string(), json!(empty_marker));
            return body;
        }
        return fallback::quotes(zip, empty_marker, None);
    }

    if let Value::Object(map) = &mut body {
        map.insert("zip".to_string(), json!(zip));
    }
    body
}

async fn contact(State(gateway): State<Arc<Gateway>>, body: String) -> Json<Value> {
    for candidate in gateway.contact_candidates() {
        match gateway
            .api
            .post_json(&candidate, body.clone(), CONTACT_TIMEOUT)
            .await
        {
            Ok(status) if status.is_success() => {
                counter!(CONTACT_DELIVERED).increment(1);
                return Json(json!({"ok": true}));
            }
            Ok(status) => {
                tracing::warn!(candidate = %candidate, %status, "contact candidate rejected submission");
            }
            Err(err) => {
                tracing::warn!(candidate = %candidate, error = %err, "contact candidate unreachable");
            }
        }
    }

    counter!(CONTACT_FAILED).increment(1);
    Json(json!({"ok": false, "error": "Submission temporarily unavailable"}))
}

async fn health() -> &'static str {
    "ok\n"
}

async fn ready() -> &'static str {
    "ok\n"
}
