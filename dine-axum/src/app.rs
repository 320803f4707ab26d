use std::sync::Arc;

use axum::handler::Handler;
use axum::routing::get;
use axum::Router;
use dine_core::DineApp;
use dine_core::DineService;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::net::{TcpListener, ToSocketAddrs};

use crate::layers::with_request_tracing;
use crate::params::FromRestParams;
use crate::rest;

/// A `DineApp` plus the axum router serving it.
pub struct AxumApp<R, P = ()>
where
    R: Send + Sync + 'static,
    P: Send + Sync + Clone + 'static,
{
    pub app: Arc<DineApp<R, P>>,
    pub router: Router<()>,
}

impl<R, P> Clone for AxumApp<R, P>
where
    R: Send + Sync + 'static,
    P: Send + Sync + Clone + 'static,
{
    fn clone(&self) -> Self {
        Self {
            app: Arc::clone(&self.app),
            router: self.router.clone(),
        }
    }
}

impl<R, P> AxumApp<R, P>
where
    R: Send + Sync + 'static,
    P: Send + Sync + Clone + 'static,
{
    pub fn new(app: DineApp<R, P>) -> Self {
        Self {
            app: Arc::new(app),
            router: Router::new(),
        }
    }

    /// Nest `router` under `path`.
    pub fn use_router(mut self, path: &str, router: Router<()>) -> Self {
        self.router = self.router.nest(path, router);
        self
    }

    /// Add routes at the root (axum refuses to nest at `/`).
    pub fn merge(mut self, router: Router<()>) -> Self {
        self.router = self.router.merge(router);
        self
    }

    pub fn use_get<H, T>(self, path: &str, handler: H) -> Self
    where
        H: Handler<T, ()> + Clone + Send + Sync + 'static,
        T: 'static,
    {
        let router = Router::new().route(path, get(handler));
        self.merge(router)
    }

    /// Register `service` under the path's name and mount its REST routes.
    pub fn use_service(mut self, path: &'static str, service: Arc<dyn DineService<R, P>>) -> Self
    where
        R: Serialize + DeserializeOwned,
        P: FromRestParams,
    {
        let name = path.trim_start_matches('/');
        self.app.register_service(name, service);

        let service_name = Arc::new(name.to_string());
        let router = rest::service_router(Arc::clone(&service_name), Arc::clone(&self.app));

        self.router = self.router.nest(path, router);
        self
    }

    /// The final router with request-id and trace layers applied.
    pub fn into_router(self) -> Router<()> {
        with_request_tracing(self.router)
    }

    pub async fn listen<A>(self, addr: A) -> anyhow::Result<()>
    where
        A: ToSocketAddrs,
    {
        let listener = TcpListener::bind(addr).await?;
        if let Ok(local) = listener.local_addr() {
            tracing::info!(addr = %local, "listening");
        }
        axum::serve(listener, self.into_router()).await?;
        Ok(())
    }
}

pub fn axum<R, P>(app: DineApp<R, P>) -> AxumApp<R, P>
where
    R: Send + Sync + 'static,
    P: Send + Sync + Clone + 'static,
{
    AxumApp::new(app)
}
