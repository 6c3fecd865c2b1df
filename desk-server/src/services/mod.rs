use axum::Router;
use desk_axum::DeskAxumState;

pub mod health;
pub mod sample_items;
pub mod types;

pub use types::DeskState;

/// Routes that only exist on tenant hosts.
pub fn tenant_routes(state: DeskAxumState<DeskState>) -> Router<()> {
    Router::new()
        .route("/tenant_health", axum::routing::get(health::tenant_health))
        .merge(sample_items::router(state))
}
