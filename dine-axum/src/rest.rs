use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::rejection::JsonRejection,
    extract::{OriginalUri, Path, Query, State},
    http::{HeaderMap, Uri},
    routing, Json, Router,
};
use dine_core::errors::DineError;
use dine_core::{tenant::TenantContext, DineApp, ServiceHandle, ServiceMethodKind};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;

use crate::{
    params::{FromRestParams, RestParams},
    DineAxumError, DineAxumState,
};

pub const TENANT_HEADER: &str = "x-tenant-id";
pub const DEFAULT_TENANT: &str = "default";

type QueryMap = Query<HashMap<String, String>>;

fn map_json_rejection(rejection: JsonRejection) -> DineAxumError {
    DineError::bad_request("Failed to parse the request body as JSON")
        .with_errors(json!({"_schema": [rejection.to_string()]}))
        .into()
}

pub fn tenant_from_headers(headers: &HeaderMap) -> TenantContext {
    headers
        .get(TENANT_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(TenantContext::new)
        .unwrap_or_else(|| TenantContext::new(DEFAULT_TENANT))
}

/// Everything a REST handler needs before calling the service.
struct Prepared<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    svc: ServiceHandle<R, P>,
    tenant: TenantContext,
    params: P,
}

fn prepare<R, P>(
    state: &DineAxumState<R, P>,
    service_name: &str,
    method: ServiceMethodKind,
    headers: &HeaderMap,
    query: HashMap<String, String>,
    uri: &Uri,
) -> Result<Prepared<R, P>, DineAxumError>
where
    R: Send + Sync + 'static,
    P: FromRestParams + Send + Sync + Clone + 'static,
{
    let svc = state.app.service(service_name)?;
    if !svc.capabilities().allows(method) {
        return Err(DineError::method_not_allowed(format!(
            "Method '{}' is not allowed on '{}'",
            method.as_str(),
            service_name
        ))
        .into());
    }

    let params = RestParams::from_request(headers, query, method, uri);

    Ok(Prepared {
        svc,
        tenant: tenant_from_headers(headers),
        params: P::from_rest_params(params),
    })
}

/// Feathers-style REST routes for one service:
///
/// - `GET /` find, `POST /` create
/// - `PATCH /` and `DELETE /` act on every row matching the query
/// - `GET|PUT|PATCH|DELETE /{id}` act on one row
///
/// Methods outside the service's capabilities answer 405.
pub fn service_router<R, P>(service_name: Arc<String>, app: Arc<DineApp<R, P>>) -> Router<()>
where
    R: Serialize + DeserializeOwned + Send + Sync + 'static,
    P: FromRestParams + Send + Sync + Clone + 'static,
{
    let state = DineAxumState::new(app);

    Router::new()
        .route(
            "/",
            routing::get({
                let service_name = Arc::clone(&service_name);
                move |State(state): State<DineAxumState<R, P>>,
                      headers: HeaderMap,
                      Query(query): QueryMap,
                      OriginalUri(uri): OriginalUri| async move {
                    let p = prepare(&state, &service_name, ServiceMethodKind::Find, &headers, query, &uri)?;
                    let res = p.svc.find(p.tenant, p.params).await?;
                    Ok::<_, DineAxumError>(Json(res))
                }
            })
            .post({
                let service_name = Arc::clone(&service_name);
                move |State(state): State<DineAxumState<R, P>>,
                      headers: HeaderMap,
                      Query(query): QueryMap,
                      OriginalUri(uri): OriginalUri,
                      data: Result<Json<R>, JsonRejection>| async move {
                    let p = prepare(&state, &service_name, ServiceMethodKind::Create, &headers, query, &uri)?;
                    let Json(data) = data.map_err(map_json_rejection)?;
                    let res = p.svc.create(p.tenant, data, p.params).await?;
                    Ok::<_, DineAxumError>(Json(res))
                }
            })
            .patch({
                let service_name = Arc::clone(&service_name);
                move |State(state): State<DineAxumState<R, P>>,
                      headers: HeaderMap,
                      Query(query): QueryMap,
                      OriginalUri(uri): OriginalUri,
                      data: Result<Json<R>, JsonRejection>| async move {
                    let p = prepare(&state, &service_name, ServiceMethodKind::Patch, &headers, query, &uri)?;
                    let Json(data) = data.map_err(map_json_rejection)?;
                    let res = p.svc.patch(p.tenant, None, data, p.params).await?;
                    Ok::<_, DineAxumError>(Json(res))
                }
            })
            .delete({
                let service_name = Arc::clone(&service_name);
                move |State(state): State<DineAxumState<R, P>>,
                      headers: HeaderMap,
                      Query(query): QueryMap,
                      OriginalUri(uri): OriginalUri| async move {
                    let p = prepare(&state, &service_name, ServiceMethodKind::Remove, &headers, query, &uri)?;
                    let res = p.svc.remove(p.tenant, None, p.params).await?;
                    Ok::<_, DineAxumError>(Json(res))
                }
            }),
        )
        .route(
            "/{id}",
            routing::get({
                let service_name = Arc::clone(&service_name);
                move |State(state): State<DineAxumState<R, P>>,
                      headers: HeaderMap,
                      Query(query): QueryMap,
                      OriginalUri(uri): OriginalUri,
                      Path(id): Path<String>| async move {
                    let p = prepare(&state, &service_name, ServiceMethodKind::Get, &headers, query, &uri)?;
                    let res = p.svc.get(p.tenant, &id, p.params).await?;
                    Ok::<_, DineAxumError>(Json(res))
                }
            })
            .put({
                let service_name = Arc::clone(&service_name);
                move |State(state): State<DineAxumState<R, P>>,
                      headers: HeaderMap,
                      Query(query): QueryMap,
                      OriginalUri(uri): OriginalUri,
                      Path(id): Path<String>,
                      data: Result<Json<R>, JsonRejection>| async move {
                    let p = prepare(&state, &service_name, ServiceMethodKind::Update, &headers, query, &uri)?;
                    let Json(data) = data.map_err(map_json_rejection)?;
                    let res = p.svc.update(p.tenant, &id, data, p.params).await?;
                    Ok::<_, DineAxumError>(Json(res))
                }
            })
            .patch({
                let service_name = Arc::clone(&service_name);
                move |State(state): State<DineAxumState<R, P>>,
                      headers: HeaderMap,
                      Query(query): QueryMap,
                      OriginalUri(uri): OriginalUri,
                      Path(id): Path<String>,
                      data: Result<Json<R>, JsonRejection>| async move {
                    let p = prepare(&state, &service_name, ServiceMethodKind::Patch, &headers, query, &uri)?;
                    let Json(data) = data.map_err(map_json_rejection)?;
                    let res = p.svc.patch(p.tenant, Some(&id), data, p.params).await?;
                    Ok::<_, DineAxumError>(Json(res))
                }
            })
            .delete({
                let service_name = Arc::clone(&service_name);
                move |State(state): State<DineAxumState<R, P>>,
                      headers: HeaderMap,
                      Query(query): QueryMap,
                      OriginalUri(uri): OriginalUri,
                      Path(id): Path<String>| async move {
                    let p = prepare(&state, &service_name, ServiceMethodKind::Remove, &headers, query, &uri)?;
                    let res = p.svc.remove(p.tenant, Some(&id), p.params).await?;
                    Ok::<_, DineAxumError>(Json(res))
                }
            }),
        )
        .with_state(state)
}
