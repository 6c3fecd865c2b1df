use axum::Json;
use chrono::{SecondsFormat, Utc};
use desk_axum::TenantRequired;
use serde_json::{json, Value};

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    }))
}

pub async fn tenant_health(TenantRequired { tenant, .. }: TenantRequired) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "tenant": tenant.subdomain,
    }))
}
