mod app;
mod seed;
mod services;
pub mod settings;

use anyhow::Result;
use desk_axum::{axum, AxumApp, DeskAxumState};

pub use app::ENV_PREFIX;
pub use services::sample_items::{SampleItem, SampleItemPolicy, SampleItemsService};
pub use settings::Settings;

/// Build the application from the process environment.
pub async fn build() -> Result<AxumApp> {
    build_with(std::env::vars()).await
}

/// Build the application from an explicit variable list.
pub async fn build_with<I>(vars: I) -> Result<AxumApp>
where
    I: IntoIterator<Item = (String, String)>,
{
    let app = app::desk_app(vars)?;

    let settings = Settings::from_config(&app.config_snapshot())?;
    settings.log_summary();

    seed::seed_tenants(&app).await?;

    let state = DeskAxumState::new(app.clone(), services::DeskState::default());

    let ax = axum(app)
        .use_get("/health", services::health::health)
        .tenant_scoped(services::tenant_routes(state));

    Ok(ax)
}
