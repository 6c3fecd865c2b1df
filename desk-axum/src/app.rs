use axum::handler::Handler;
use axum::http::{HeaderMap, Uri};
use axum::middleware;
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use desk_core::DeskApp;
use tokio::net::{TcpListener, ToSocketAddrs};
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::middlewares::{require_subdomain, translate_errors, ResolveTenantLayer};
use crate::negotiate::{self, ResponseFormat};

/// Builder for the HTTP surface.
///
/// Routes are collected first; [`AxumApp::into_router`] then wraps them in
/// the request pipeline (outermost first):
/// request id → trace → request id propagation → error translation →
/// tenant resolution → routes.
pub struct AxumApp {
    pub app: DeskApp,
    pub router: Router<()>,
}

impl Clone for AxumApp {
    fn clone(&self) -> Self {
        Self {
            app: self.app.clone(),
            router: self.router.clone(),
        }
    }
}

async fn route_not_found(headers: HeaderMap, uri: Uri) -> Response {
    negotiate::tenant_not_found(ResponseFormat::negotiate(&headers, &uri))
}

impl AxumApp {
    pub fn new(app: DeskApp) -> Self {
        Self {
            app,
            router: Router::new(),
        }
    }

    /// Mount routes that work on any host.
    pub fn use_router(mut self, router: Router<()>) -> Self {
        self.router = self.router.merge(router);
        self
    }

    pub fn use_get<H, T>(self, path: &str, handler: H) -> Self
    where
        H: Handler<T, ()> + Clone + Send + Sync + 'static,
        T: 'static,
    {
        let router = Router::new().route(path, get(handler));
        self.use_router(router)
    }

    /// Mount routes that only exist on tenant hosts.
    pub fn tenant_scoped(mut self, router: Router<()>) -> Self {
        let constraint = self.app.subdomain_constraint();
        let scoped = router.route_layer(middleware::from_fn_with_state(
            constraint,
            require_subdomain,
        ));
        self.router = self.router.merge(scoped);
        self
    }

    pub fn into_router(self) -> Router<()> {
        self.router.fallback(route_not_found).layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(middleware::from_fn(translate_errors))
                .layer(ResolveTenantLayer::new(self.app)),
        )
    }

    pub async fn listen<A>(self, addr: A) -> anyhow::Result<()>
    where
        A: ToSocketAddrs,
    {
        let listener = TcpListener::bind(addr).await?;
        tracing::info!(addr = %listener.local_addr()?, "listening");
        axum::serve(listener, self.into_router()).await?;
        Ok(())
    }
}

pub fn axum(app: DeskApp) -> AxumApp {
    AxumApp::new(app)
}
