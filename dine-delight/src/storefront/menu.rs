use dine_core::TenantContext;

use crate::models::{from_row, MenuItem};
use crate::services::{internal_params, App, ParamsExt};

use super::notice::Notice;

/// What the storefront shows. On failure the list is empty and the
/// notice says so; there is no automatic retry.
#[derive(Clone, Debug, Default)]
pub struct MenuLoad {
    pub items: Vec<MenuItem>,
    pub notice: Option<Notice>,
}

async fn fetch(app: &App, tenant_id: &str) -> anyhow::Result<Vec<MenuItem>> {
    let rows = app
        .service("menu_items")?
        .find(
            TenantContext::new(tenant_id),
            internal_params().eq("is_available", "true"),
        )
        .await?;
    rows.into_iter()
        .map(|row| from_row::<MenuItem>("menu_items", row))
        .collect()
}

/// Available menu items of one tenant.
pub async fn load_menu(app: &App, tenant_id: &str) -> MenuLoad {
    match fetch(app, tenant_id).await {
        Ok(items) => MenuLoad { items, notice: None },
        Err(err) => {
            tracing::warn!(%tenant_id, error = %err, "menu load failed");
            MenuLoad {
                items: Vec::new(),
                notice: Some(Notice::menu_load_failed()),
            }
        }
    }
}
