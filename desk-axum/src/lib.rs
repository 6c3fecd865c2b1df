//! desk-axum: Axum adapter for the WhisperDesk tenancy core.
//!
//! Provides the tenant resolution layer, the tenant route constraint,
//! error translation and extractors for the request context.

pub mod app;
pub mod extract;
pub mod middlewares;
pub mod negotiate;
pub mod state;
mod error;
pub use error::{render, DeskAxumError, TranslatableError};
pub use extract::{RequestContext, TenantRequired};
pub use negotiate::ResponseFormat;
pub use state::DeskAxumState;

pub use app::{axum, AxumApp};
