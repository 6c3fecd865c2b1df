//! # Errors
//!
//! WhisperDesk keeps one structured error type for the whole request path.
//! Core goals:
//! - consistent status codes + names per kind
//! - tenancy failures are plain values, not control flow
//! - can be carried through `anyhow::Error` by application handlers
//! - transport-agnostic (the axum adapter decides how to render)

use std::fmt;

use anyhow::Error as AnyError;
use serde_json::Value;

/// Result type used by the core APIs.
pub type DeskResult<T> = std::result::Result<T, DeskError>;

/// Error classes + status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    BadRequest,     // 400
    NotAuthorized,  // 403, policy denial unrelated to tenancy
    AccessDenied,   // 403, resource owned by another tenant
    TenantNotFound, // 404, no tenant resolved where one is required
    NotFound,       // 404
    Conflict,       // 409
    Unprocessable,  // 422
    GeneralError,   // 500
}

impl ErrorKind {
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::BadRequest => 400,
            ErrorKind::NotAuthorized => 403,
            ErrorKind::AccessDenied => 403,
            ErrorKind::TenantNotFound => 404,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::Unprocessable => 422,
            ErrorKind::GeneralError => 500,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "BadRequest",
            ErrorKind::NotAuthorized => "NotAuthorized",
            ErrorKind::AccessDenied => "AccessDenied",
            ErrorKind::TenantNotFound => "TenantNotFound",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::Conflict => "Conflict",
            ErrorKind::Unprocessable => "Unprocessable",
            ErrorKind::GeneralError => "GeneralError",
        }
    }

    /// Kebab-cased class name used in JSON payloads.
    pub fn class_name(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "bad-request",
            ErrorKind::NotAuthorized => "not-authorized",
            ErrorKind::AccessDenied => "access-denied",
            ErrorKind::TenantNotFound => "tenant-not-found",
            ErrorKind::NotFound => "not-found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Unprocessable => "unprocessable",
            ErrorKind::GeneralError => "general-error",
        }
    }

    /// Kinds whose client representation is a fixed tenancy/authorization contract
    /// rather than the generic JSON payload.
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            ErrorKind::NotAuthorized | ErrorKind::AccessDenied | ErrorKind::TenantNotFound
        )
    }
}

/// A structured WhisperDesk error that can also live inside `anyhow::Error`.
///
/// Fields:
/// - kind (status + names)
/// - message
/// - errors (optional per-field details)
/// - source (never sent to clients)
#[derive(Debug)]
pub struct DeskError {
    pub kind: ErrorKind,
    pub message: String,
    pub errors: Option<Value>,
    pub source: Option<AnyError>,
}

impl DeskError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            errors: None,
            source: None,
        }
    }

    pub fn with_errors(mut self, errors: Value) -> Self {
        self.errors = Some(errors);
        self
    }

    pub fn with_source(mut self, source: AnyError) -> Self {
        self.source = Some(source);
        self
    }

    pub fn code(&self) -> u16 {
        self.kind.status_code()
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn class_name(&self) -> &'static str {
        self.kind.class_name()
    }

    /// Convert into `anyhow::Error` for handlers that return `anyhow::Result`.
    pub fn into_anyhow(self) -> AnyError {
        AnyError::new(self)
    }

    /// Turn any error into a DeskError:
    /// - if it's already a DeskError, keep it (lossless)
    /// - otherwise wrap as GeneralError
    pub fn normalize(err: AnyError) -> DeskError {
        match err.downcast::<DeskError>() {
            Ok(desk) => desk,
            Err(other) => {
                DeskError::new(ErrorKind::GeneralError, other.to_string()).with_source(other)
            }
        }
    }

    /// A copy suitable for clients: the `source` chain is dropped.
    pub fn sanitize_for_client(&self) -> DeskError {
        DeskError {
            kind: self.kind,
            message: self.message.clone(),
            errors: self.errors.clone(),
            source: None,
        }
    }

    /// JSON payload for the generic (non-tenancy) error kinds.
    pub fn to_json(&self) -> Value {
        use serde_json::json;

        let mut base = json!({
            "name": self.name(),
            "message": self.message,
            "code": self.code(),
            "className": self.class_name(),
        });

        if let Some(e) = &self.errors {
            base["errors"] = e.clone();
        }
        base
    }

    // ---- Constructors ----

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, msg)
    }
    pub fn not_authorized(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotAuthorized, msg)
    }
    pub fn access_denied(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::AccessDenied, msg)
    }
    pub fn tenant_not_found(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::TenantNotFound, msg)
    }
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, msg)
    }
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, msg)
    }
    pub fn unprocessable(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unprocessable, msg)
    }
    pub fn general_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::GeneralError, msg)
    }
}

impl fmt::Display for DeskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.name(), self.code(), self.message)
    }
}

impl std::error::Error for DeskError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}
