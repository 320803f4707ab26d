use std::collections::HashMap;

use axum::http::{HeaderMap, Uri};
use dine_core::ServiceMethodKind;

/// Provider name stamped on every call that arrives over REST.
pub const REST_PROVIDER: &str = "rest";

/// What a REST request carries into the service pipeline.
///
/// Header names are lowercase; values that are not visible ASCII are
/// dropped. `query` holds the row filters (`field=value`,
/// `field=in.(a,b)`).
#[derive(Debug, Clone, Default)]
pub struct RestParams {
    pub provider: String,
    pub headers: HashMap<String, String>,
    pub query: HashMap<String, String>,
    pub http_method: &'static str,
    pub path: String,
}

fn http_method(method: ServiceMethodKind) -> &'static str {
    match method {
        ServiceMethodKind::Find | ServiceMethodKind::Get => "GET",
        ServiceMethodKind::Create => "POST",
        ServiceMethodKind::Update => "PUT",
        ServiceMethodKind::Patch => "PATCH",
        ServiceMethodKind::Remove => "DELETE",
    }
}

impl RestParams {
    pub fn from_request(
        headers: &HeaderMap,
        query: HashMap<String, String>,
        method: ServiceMethodKind,
        uri: &Uri,
    ) -> Self {
        let headers = headers
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
            .collect();

        Self {
            provider: REST_PROVIDER.to_string(),
            headers,
            query,
            http_method: http_method(method),
            path: uri.path().to_string(),
        }
    }
}

/// Turns the transport params into whatever the app's services take.
pub trait FromRestParams: Sized {
    fn from_rest_params(params: RestParams) -> Self;
}

impl FromRestParams for RestParams {
    fn from_rest_params(params: RestParams) -> Self {
        params
    }
}

impl FromRestParams for () {
    fn from_rest_params(_params: RestParams) -> Self {}
}

/// REST calls start unauthenticated; the `authenticate` hook resolves
/// the identity from the copied headers.
#[cfg(feature = "auth")]
impl FromRestParams for dine_auth::hooks::authenticate::AuthParams<RestParams> {
    fn from_rest_params(params: RestParams) -> Self {
        Self {
            provider: Some(params.provider.clone()),
            headers: params.headers.clone(),
            inner: params,
            identity: None,
            authenticated: false,
        }
    }
}
