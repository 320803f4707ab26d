use dine_core::TenantContext;

use crate::models::{from_row, Tenant};
use crate::services::{internal_params, App, ParamsExt};

#[derive(Clone, Debug, PartialEq)]
pub enum TenantResolution {
    Found(Tenant),
    /// Unregistered subdomain. Also what a failed lookup degrades to.
    NotFound { slug: String },
}

/// Exactly one tenant whose slug is `slug`, or `NotFound`.
pub async fn resolve_tenant(app: &App, slug: &str) -> TenantResolution {
    let not_found = || TenantResolution::NotFound {
        slug: slug.to_string(),
    };

    let tenants = match app.service("tenants") {
        Ok(svc) => svc,
        Err(err) => {
            tracing::warn!(%slug, error = %err, "tenant lookup unavailable");
            return not_found();
        }
    };

    let rows = match tenants
        .find(TenantContext::global(), internal_params().eq("slug", slug))
        .await
    {
        Ok(rows) => rows,
        Err(err) => {
            tracing::warn!(%slug, error = %err, "tenant lookup failed");
            return not_found();
        }
    };

    let mut rows = rows.into_iter();
    match (rows.next(), rows.next()) {
        (Some(row), None) => match from_row::<Tenant>("tenants", row) {
            Ok(tenant) => TenantResolution::Found(tenant),
            Err(err) => {
                tracing::warn!(%slug, error = %err, "tenant row unreadable");
                not_found()
            }
        },
        (None, _) => not_found(),
        (Some(_), Some(_)) => {
            tracing::warn!(%slug, "slug matches more than one tenant");
            not_found()
        }
    }
}
