use axum::{
    extract::Request,
    http::header,
    middleware::Next,
    response::Response,
};

use crate::error::{render, TranslatableError};
use crate::negotiate::ResponseFormat;

/// Renders tenancy/authorization errors for the requesting client.
///
/// `Accept` and `Referer` are captured before the request moves downstream;
/// responses tagged with [`TranslatableError`] are rebuilt in the negotiated
/// format, everything else passes through untouched.
pub async fn translate_errors(req: Request, next: Next) -> Response {
    let format = ResponseFormat::negotiate(req.headers(), req.uri());
    let referer = req
        .headers()
        .get(header::REFERER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let res = next.run(req).await;

    match res.extensions().get::<TranslatableError>().copied() {
        Some(TranslatableError(kind)) => {
            tracing::debug!(error = kind.name(), ?format, "translating error response");
            render(kind, format, referer.as_deref())
        }
        None => res,
    }
}
