use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use desk_core::errors::{DeskError, ErrorKind};

use crate::negotiate::{self, ResponseFormat};

#[derive(Debug)]
pub struct DeskAxumError(pub anyhow::Error);

impl From<anyhow::Error> for DeskAxumError {
    fn from(e: anyhow::Error) -> Self {
        Self(e)
    }
}

impl From<DeskError> for DeskAxumError {
    fn from(e: DeskError) -> Self {
        Self(e.into_anyhow())
    }
}

/// Marks a response produced from a tenancy/authorization error so the
/// translation layer can re-render it for the requesting client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranslatableError(pub ErrorKind);

impl IntoResponse for DeskAxumError {
    fn into_response(self) -> Response {
        // Look through anyhow contexts for a DeskError first.
        let safe = match self.0.chain().find_map(|e| e.downcast_ref::<DeskError>()) {
            Some(desk) => desk.sanitize_for_client(),
            None => DeskError::general_error(self.0.to_string()),
        };

        if safe.kind == ErrorKind::GeneralError {
            tracing::error!(error = %self.0, "request failed");
        }

        if safe.kind.is_authorization() {
            // JSON rendering until the translation layer picks the final format.
            let mut res = render(safe.kind, ResponseFormat::Json, None);
            res.extensions_mut().insert(TranslatableError(safe.kind));
            return res;
        }

        let status =
            StatusCode::from_u16(safe.code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(safe.to_json())).into_response()
    }
}

/// Client response for a tenancy/authorization error kind.
pub fn render(kind: ErrorKind, format: ResponseFormat, referer: Option<&str>) -> Response {
    match kind {
        ErrorKind::TenantNotFound => negotiate::tenant_not_found(format),
        ErrorKind::AccessDenied => negotiate::access_denied(format),
        ErrorKind::NotAuthorized => negotiate::not_authorized(format, referer),
        other => {
            let desk = DeskError::new(other, other.name());
            let status =
                StatusCode::from_u16(desk.code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, Json(desk.to_json())).into_response()
        }
    }
}
