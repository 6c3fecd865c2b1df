//! Typed views over the flat configuration.
//!
//! Billing and mailer settings are only loaded and checked here; the payment
//! processor and mail delivery live outside this service.

use anyhow::Result;
use desk_core::{DeskConfigSnapshot, DeskError};
use serde_json::{Map, Value};
use validator::{Validate, ValidationErrors};

#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Validate)]
pub struct BillingSettings {
    #[validate(length(min = 1, message = "business_name must not be empty"))]
    pub business_name: String,
    pub business_address: String,
    #[validate(length(min = 1, message = "application_name must not be empty"))]
    pub application_name: String,
    pub default_product_name: String,
    pub default_plan_name: String,
    #[validate(email(message = "support_email must be a valid email"))]
    pub support_email: String,
}

#[derive(Debug, Clone, Validate)]
pub struct MailerSettings {
    #[validate(email(message = "mailer sender must be a valid email"))]
    pub sender: String,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub http: HttpSettings,
    pub billing: BillingSettings,
    pub mailer: MailerSettings,
}

fn required(config: &DeskConfigSnapshot, key: &str) -> Result<String> {
    config
        .get_string(key)
        .ok_or_else(|| DeskError::bad_request(format!("missing configuration key: {key}")).into_anyhow())
}

fn invalid(section: &str, errors: &ValidationErrors) -> anyhow::Error {
    let mut fields = Map::new();
    for (field, errs) in errors.field_errors() {
        let messages = errs
            .iter()
            .map(|e| {
                Value::String(
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string()),
                )
            })
            .collect();
        fields.insert(format!("{section}.{field}"), Value::Array(messages));
    }

    DeskError::unprocessable(format!("invalid {section} settings"))
        .with_errors(Value::Object(fields))
        .into_anyhow()
}

impl Settings {
    pub fn from_config(config: &DeskConfigSnapshot) -> Result<Self> {
        let port = required(config, "http.port")?;
        let port = port.trim().parse::<u16>().map_err(|e| {
            DeskError::bad_request(format!("http.port is not a valid port: {port}"))
                .with_source(e.into())
                .into_anyhow()
        })?;

        let http = HttpSettings {
            host: required(config, "http.host")?,
            port,
        };

        let billing = BillingSettings {
            business_name: required(config, "billing.business_name")?,
            business_address: required(config, "billing.business_address")?,
            application_name: required(config, "billing.application_name")?,
            default_product_name: required(config, "billing.default_product_name")?,
            default_plan_name: required(config, "billing.default_plan_name")?,
            support_email: required(config, "billing.support_email")?,
        };
        billing.validate().map_err(|e| invalid("billing", &e))?;

        let mailer = MailerSettings {
            sender: required(config, "mailer.sender")?,
        };
        mailer.validate().map_err(|e| invalid("mailer", &e))?;

        Ok(Self { http, billing, mailer })
    }

    pub fn log_summary(&self) {
        tracing::info!(
            host = %self.http.host,
            port = self.http.port,
            application = %self.billing.application_name,
            plan = %self.billing.default_plan_name,
            support_email = %self.billing.support_email,
            mailer_sender = %self.mailer.sender,
            "settings loaded"
        );
    }
}
