use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use desk_axum::{DeskAxumError, DeskAxumState, RequestContext, TenantRequired};
use desk_core::{assert_tenant, authorize, policy_scope, Action, DeskError};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::services::DeskState;

use super::SampleItemPolicy;

type AppState = DeskAxumState<DeskState>;

#[derive(Debug, Deserialize)]
pub struct CreateSampleItem {
    pub name: String,
}

fn map_json_rejection(rejection: JsonRejection) -> DeskAxumError {
    DeskError::bad_request("Failed to parse the request body as JSON")
        .with_errors(json!({"_schema": [rejection.body_text()]}))
        .into()
}

fn map_path_rejection(rejection: PathRejection) -> DeskAxumError {
    DeskError::bad_request("Invalid path parameters")
        .with_errors(json!({"id": [rejection.body_text()]}))
        .into()
}

/// Accepts `{id}` and `{id}.json`.
fn parse_id(path: Result<Path<String>, PathRejection>) -> Result<u64, DeskAxumError> {
    let Path(raw) = path.map_err(map_path_rejection)?;
    raw.strip_suffix(".json")
        .unwrap_or(raw.as_str())
        .parse::<u64>()
        .map_err(|_| {
            DeskAxumError::from(
                DeskError::bad_request(format!("Invalid sample item id: {raw}"))
                    .with_errors(json!({"id": ["is not a valid id"]})),
            )
        })
}

pub fn router(state: AppState) -> Router<()> {
    Router::new()
        .route("/sample_items", get(index).post(create))
        .route("/sample_items/{id}", get(show).delete(destroy))
        .with_state(state)
}

/// Tenant-scoped query: only the current tenant's items are ever read.
async fn index(
    State(state): State<AppState>,
    TenantRequired { tenant, current }: TenantRequired,
) -> Json<Value> {
    let owned = state.services.sample_items.list_for(tenant.id).await;
    let items = policy_scope(&SampleItemPolicy, &current, owned);
    Json(Value::Array(items.iter().map(|i| i.to_json()).collect()))
}

async fn create(
    State(state): State<AppState>,
    TenantRequired { tenant, .. }: TenantRequired,
    data: Result<Json<CreateSampleItem>, JsonRejection>,
) -> Result<Json<Value>, DeskAxumError> {
    let Json(data) = data.map_err(map_json_rejection)?;
    let item = state.services.sample_items.create(tenant.id, &data.name).await?;
    Ok(Json(item.to_json()))
}

/// Global lookup by id, then the ownership guard.
async fn show(
    State(state): State<AppState>,
    RequestContext(current): RequestContext,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Value>, DeskAxumError> {
    let id = parse_id(path)?;
    let item = state.services.sample_items.find(id).await;
    let item = assert_tenant(item.as_deref(), &current)?;
    authorize(&SampleItemPolicy, &current, item, Action::Show)?;
    Ok(Json(item.to_json()))
}

async fn destroy(
    State(state): State<AppState>,
    RequestContext(current): RequestContext,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Value>, DeskAxumError> {
    let id = parse_id(path)?;
    let item = state.services.sample_items.find(id).await;
    let item = assert_tenant(item.as_deref(), &current)?;
    authorize(&SampleItemPolicy, &current, item, Action::Destroy)?;

    state.services.sample_items.remove(item.id).await;
    tracing::info!(item_id = item.id, user = ?current.user(), "sample item removed");
    Ok(Json(item.to_json()))
}
