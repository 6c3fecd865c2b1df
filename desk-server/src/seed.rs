use anyhow::{Context, Result};
use desk_core::{DeskApp, NewTenant};

/// Parse one `subdomain[:Display Name]` entry.
fn parse_entry(entry: &str) -> NewTenant {
    match entry.split_once(':') {
        Some((subdomain, name)) if !name.trim().is_empty() => {
            NewTenant::new(subdomain).with_name(name.trim())
        }
        Some((subdomain, _)) => NewTenant::new(subdomain),
        None => NewTenant::new(entry),
    }
}

/// Create the tenants listed under `tenants.seed`.
///
/// Entries that already exist are skipped; invalid entries abort startup.
pub async fn seed_tenants(app: &DeskApp) -> Result<usize> {
    let entries = app.config_snapshot().get_list("tenants.seed");
    let mut created = 0;

    for entry in entries {
        let new = parse_entry(&entry);
        if app.tenants().find_by_subdomain(&new.subdomain).await?.is_some() {
            tracing::debug!(entry = %entry, "seed tenant already present");
            continue;
        }
        app.tenants()
            .create(new)
            .await
            .with_context(|| format!("invalid tenant seed entry: {entry}"))?;
        created += 1;
    }

    if created > 0 {
        tracing::info!(created, "seeded tenants");
    }
    Ok(created)
}
