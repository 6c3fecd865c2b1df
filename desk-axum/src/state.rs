use std::sync::Arc;

use desk_core::DeskApp;

/// Router state: the shared app container plus application services.
pub struct DeskAxumState<S = ()>
where
    S: Send + Sync + 'static,
{
    pub app: DeskApp,
    pub services: Arc<S>,
}

impl<S> Clone for DeskAxumState<S>
where
    S: Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            app: self.app.clone(),
            services: Arc::clone(&self.services),
        }
    }
}

impl<S> DeskAxumState<S>
where
    S: Send + Sync + 'static,
{
    pub fn new(app: DeskApp, services: S) -> Self {
        Self {
            app,
            services: Arc::new(services),
        }
    }
}
