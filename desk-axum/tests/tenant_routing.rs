use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use desk_axum::negotiate::{FLASH_ALERT_HEADER, NOT_AUTHORIZED_ALERT};
use desk_axum::{axum as desk, DeskAxumError, RequestContext, TenantRequired};
use desk_core::current::{self, Current};
use desk_core::{DeskApp, DeskError, MemoryTenantDirectory, NewTenant, TenantStore};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn json_body(res: axum::response::Response) -> Value {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn text_body(res: axum::response::Response) -> String {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

struct Fixture {
    router: Router,
    tenant_hits: Arc<AtomicUsize>,
}

async fn fixture() -> Fixture {
    let directory = Arc::new(MemoryTenantDirectory::new());
    directory.create(NewTenant::new("acme")).await.unwrap();
    directory.create(NewTenant::new("beta")).await.unwrap();

    let app = DeskApp::new(directory);
    let tenant_hits = Arc::new(AtomicUsize::new(0));

    let scoped = Router::new()
        .route(
            "/tenant_health",
            get({
                let hits = Arc::clone(&tenant_hits);
                move |TenantRequired { tenant, .. }: TenantRequired| async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    Json(json!({"status": "ok", "tenant": tenant.subdomain}))
                }
            }),
        )
        .route(
            "/forbidden",
            get(|| async { Err::<(), _>(DeskAxumError::from(DeskError::access_denied("not yours"))) }),
        )
        .route(
            "/policy",
            get(|| async { Err::<(), _>(DeskAxumError::from(DeskError::not_authorized("role"))) }),
        );

    let open = Router::new()
        .route(
            "/whoami",
            get(|RequestContext(current): RequestContext| async move {
                Json(json!({
                    "tenant": current.tenant().map(|t| t.subdomain.clone()),
                    "user": current.user().map(|u| u.0.clone()),
                    "request_id": current.request_id(),
                }))
            }),
        )
        .route(
            "/needs_tenant",
            get(|TenantRequired { tenant, .. }: TenantRequired| async move { tenant.subdomain.clone() }),
        );

    let router = desk(app).use_router(open).tenant_scoped(scoped).into_router();
    Fixture { router, tenant_hits }
}

/// Sends `req` from inside an enclosing context and returns that context as
/// it reads once the request has finished.
async fn oneshot_within(router: &Router, req: Request<Body>) -> (axum::response::Response, Current) {
    let enclosing = Current::new().with_request_id("enclosing");
    current::scope(enclosing, async {
        let res = router.clone().oneshot(req).await.unwrap();
        (res, current::snapshot())
    })
    .await
}

fn get_req(host: &str, path: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(path)
        .header(header::HOST, host)
        .body(Body::empty())
        .unwrap()
}

fn get_json(host: &str, path: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(path)
        .header(header::HOST, host)
        .header(header::ACCEPT, "application/json")
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn resolves_tenant_for_known_subdomain_and_clears_it_afterwards() {
    let fx = fixture().await;

    let (res, after) = oneshot_within(&fx.router, get_req("acme.lvh.me", "/tenant_health")).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json_body(res).await["tenant"], "acme");
    assert_eq!(fx.tenant_hits.load(Ordering::SeqCst), 1);

    // the request ran in its own context; the enclosing one is untouched
    assert!(after.tenant().is_none());
    assert_eq!(after.request_id(), Some("enclosing"));

    // a follow-up request on the same task starts from an empty context
    let res = fx.router.clone().oneshot(get_req("lvh.me", "/whoami")).await.unwrap();
    let body = json_body(res).await;
    assert_eq!(body["tenant"], Value::Null);
    assert_eq!(body["user"], Value::Null);
}

#[tokio::test]
async fn unknown_subdomain_is_404_without_running_handlers() {
    let fx = fixture().await;

    let res = fx.router.clone().oneshot(get_req("unknown.lvh.me", "/tenant_health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let html = text_body(res).await;
    assert!(html.contains("doesn't exist"));
    assert_eq!(fx.tenant_hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unknown_subdomain_with_json_accept_gets_json_404() {
    let fx = fixture().await;

    let res = fx.router.clone().oneshot(get_json("nope.lvh.me", "/tenant_health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(res).await, json!({"error": "Not Found"}));
}

#[tokio::test]
async fn reserved_subdomain_is_404() {
    let fx = fixture().await;

    let res = fx.router.clone().oneshot(get_req("www.lvh.me", "/tenant_health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(fx.tenant_hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn apex_domain_on_tenant_route_is_404() {
    let fx = fixture().await;

    let res = fx.router.clone().oneshot(get_json("lvh.me", "/tenant_health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(res).await["error"], "Not Found");
    assert_eq!(fx.tenant_hits.load(Ordering::SeqCst), 0);

    // open routes still work on the apex, without a tenant
    let res = fx.router.clone().oneshot(get_req("lvh.me", "/whoami")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json_body(res).await["tenant"], Value::Null);
}

#[tokio::test]
async fn sequential_requests_never_see_each_others_tenant() {
    let fx = fixture().await;

    for (host, expected) in [
        ("acme.lvh.me", json!("acme")),
        ("beta.lvh.me", json!("beta")),
        ("lvh.me", Value::Null),
        ("ACME.lvh.me", json!("acme")),
    ] {
        let (res, after) = oneshot_within(&fx.router, get_req(host, "/whoami")).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(json_body(res).await["tenant"], expected, "host {host}");
        assert!(after.tenant().is_none(), "host {host}");
    }
}

#[tokio::test]
async fn request_id_reaches_context_and_response() {
    let fx = fixture().await;

    let req = Request::builder()
        .uri("/whoami")
        .header(header::HOST, "acme.lvh.me")
        .header("x-request-id", "req-test-123")
        .header("x-user-id", "user-42")
        .body(Body::empty())
        .unwrap();
    let res = fx.router.clone().oneshot(req).await.unwrap();

    assert_eq!(res.headers()["x-request-id"], "req-test-123");
    let body = json_body(res).await;
    assert_eq!(body["request_id"], "req-test-123");
    assert_eq!(body["user"], "user-42");
}

#[tokio::test]
async fn generated_request_id_is_returned() {
    let fx = fixture().await;
    let res = fx.router.clone().oneshot(get_req("acme.lvh.me", "/whoami")).await.unwrap();
    assert!(res.headers().get("x-request-id").is_some());
}

#[tokio::test]
async fn access_denied_is_negotiated() {
    let fx = fixture().await;

    let res = fx.router.clone().oneshot(get_json("acme.lvh.me", "/forbidden")).await.unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert!(res.headers().get("x-request-id").is_some());
    assert_eq!(json_body(res).await, json!({"error": "Forbidden"}));

    let res = fx.router.clone().oneshot(get_req("acme.lvh.me", "/forbidden")).await.unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert!(text_body(res).await.contains("don't have access"));
}

#[tokio::test]
async fn policy_denial_redirects_browsers_and_forbids_api_clients() {
    let fx = fixture().await;

    let req = Request::builder()
        .uri("/policy")
        .header(header::HOST, "acme.lvh.me")
        .header(header::ACCEPT, "text/html")
        .header(header::REFERER, "http://acme.lvh.me/dashboard")
        .body(Body::empty())
        .unwrap();
    let res = fx.router.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers()[header::LOCATION], "http://acme.lvh.me/dashboard");
    assert_eq!(res.headers()[FLASH_ALERT_HEADER], NOT_AUTHORIZED_ALERT);

    let res = fx.router.clone().oneshot(get_req("acme.lvh.me", "/policy")).await.unwrap();
    assert_eq!(res.headers()[header::LOCATION], "/");

    let res = fx.router.clone().oneshot(get_json("acme.lvh.me", "/policy")).await.unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(json_body(res).await, json!({"error": "forbidden"}));
}

#[tokio::test]
async fn handler_requiring_tenant_without_one_is_404() {
    let fx = fixture().await;

    let res = fx.router.clone().oneshot(get_json("lvh.me", "/needs_tenant")).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(res).await, json!({"error": "Not Found"}));
}

#[tokio::test]
async fn unmatched_paths_are_404() {
    let fx = fixture().await;

    let res = fx.router.clone().oneshot(get_json("acme.lvh.me", "/nowhere")).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(res).await["error"], "Not Found");
}

#[tokio::test]
async fn resolution_honours_configured_tld_length() {
    let directory = Arc::new(MemoryTenantDirectory::new());
    directory.create(NewTenant::new("acme")).await.unwrap();
    let app = DeskApp::new(directory);
    app.set("tenancy.tld_length", "2");

    let scoped = Router::new().route(
        "/tenant_health",
        get(|TenantRequired { tenant, .. }: TenantRequired| async move { tenant.subdomain.clone() }),
    );
    let router = desk(app).tenant_scoped(scoped).into_router();

    let res = router.clone().oneshot(get_req("acme.example.co.uk", "/tenant_health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(text_body(res).await, "acme");

    // with two TLD labels `acme.lvh.me` is an apex host
    let res = router.clone().oneshot(get_json("acme.lvh.me", "/tenant_health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
