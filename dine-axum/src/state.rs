use std::sync::Arc;

use dine_core::DineApp;

pub struct DineAxumState<R, P>
where
    R: Send + Sync + 'static,
    P: Send + Sync + Clone + 'static,
{
    pub app: Arc<DineApp<R, P>>,
}

impl<R, P> Clone for DineAxumState<R, P>
where
    R: Send + Sync + 'static,
    P: Send + Sync + Clone + 'static,
{
    fn clone(&self) -> Self {
        Self {
            app: Arc::clone(&self.app),
        }
    }
}

impl<R, P> DineAxumState<R, P>
where
    R: Send + Sync + 'static,
    P: Send + Sync + Clone + 'static,
{
    pub fn new(app: Arc<DineApp<R, P>>) -> Self {
        Self { app }
    }
}
