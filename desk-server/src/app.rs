use std::sync::Arc;

use anyhow::Result;
use desk_core::{DeskApp, MemoryTenantDirectory, MAX_TLD_LENGTH};

/// Prefix for configuration overrides, e.g. `WHISPERDESK__HTTP__PORT`.
pub const ENV_PREFIX: &str = "WHISPERDESK";

const DEFAULTS: &[(&str, &str)] = &[
    ("http.host", "127.0.0.1"),
    ("http.port", "3000"),
    ("tenancy.tld_length", "1"),
    ("auth.user_header", "x-user-id"),
    ("billing.business_name", "WhisperDesk"),
    ("billing.business_address", "123 Internet Road"),
    ("billing.application_name", "WhisperDesk"),
    ("billing.default_product_name", "WhisperDesk Subscription"),
    ("billing.default_plan_name", "Standard"),
    ("billing.support_email", "support@example.com"),
    ("mailer.sender", "no-reply@example.com"),
];

// Short variable names kept for deployments that already set them.
const LEGACY_VARS: &[(&str, &str)] = &[
    ("SUPPORT_EMAIL", "billing.support_email"),
    ("MAILER_SENDER", "mailer.sender"),
];

pub fn desk_app<I>(vars: I) -> Result<DeskApp>
where
    I: IntoIterator<Item = (String, String)>,
{
    let app = DeskApp::new(Arc::new(MemoryTenantDirectory::new()));
    let vars: Vec<(String, String)> = vars.into_iter().collect();

    app.configure(|config| {
        for (var, key) in LEGACY_VARS {
            if let Some((_, value)) = vars.iter().find(|(k, _)| k == var) {
                config.set(*key, value.clone());
            }
        }

        let applied = config.load_vars(ENV_PREFIX, vars.iter().cloned());
        if applied > 0 {
            tracing::info!(applied, "configuration overrides applied");
        }

        for (key, value) in DEFAULTS {
            config.set_default(*key, *value);
        }
    });

    let snapshot = app.config_snapshot();
    match snapshot.get_usize("tenancy.tld_length") {
        Some(n) if n <= MAX_TLD_LENGTH => {}
        _ => anyhow::bail!(
            "tenancy.tld_length must be an integer between 0 and {MAX_TLD_LENGTH}, got {:?}",
            snapshot.get("tenancy.tld_length")
        ),
    }

    Ok(app)
}
