use std::sync::Arc;

use anyhow::Result;
use dine_core::DineService;
use serde_json::Value;

pub mod types;
pub use types::{internal_params, App, DineParams, DineState, ParamsExt};

pub mod access;
pub mod adapters;
pub mod validate;

pub mod directory;
pub mod menu_items;
pub mod orders;
pub mod staff;
pub mod tenants;

use adapters::{Table, TableAdapter};

type Service = Arc<dyn DineService<Value, DineParams>>;

const NO_UNIQUE: &[&str] = &[];

/// Services exposed over REST. The directory tables stay in-process.
pub struct DineServices {
    pub tenants: Service,
    pub menu_items: Service,
    pub orders: Service,
    pub staff: Service,
}

fn adapter(state: &Arc<DineState>, t: Table) -> TableAdapter {
    let (unique, capabilities) = match t {
        Table::Tenants => (tenants::tenants_shared::UNIQUE, tenants::tenants_shared::capabilities()),
        Table::MenuItems => (NO_UNIQUE, menu_items::menu_items_shared::capabilities()),
        Table::Orders => (NO_UNIQUE, orders::orders_shared::capabilities()),
        Table::Staff => (NO_UNIQUE, staff::staff_shared::capabilities()),
        Table::UserRoles | Table::Subscriptions | Table::Users => {
            (NO_UNIQUE, directory::directory_shared::capabilities())
        }
    };
    TableAdapter::new(Arc::clone(state), t, unique, capabilities)
}

fn register(app: &App, state: &Arc<DineState>, t: Table) -> Service {
    let svc: Service = Arc::new(adapter(state, t));
    app.register_service(t.name(), Arc::clone(&svc));
    svc
}

pub fn configure(app: &App, state: Arc<DineState>) -> Result<DineServices> {
    for t in [Table::UserRoles, Table::Subscriptions, Table::Users] {
        register(app, &state, t);
    }
    directory::directory_shared::register_hooks(app)?;

    let tenants = register(app, &state, Table::Tenants);
    tenants::tenants_shared::register_hooks(app)?;

    let menu_items = register(app, &state, Table::MenuItems);
    menu_items::menu_items_shared::register_hooks(app)?;

    let orders = register(app, &state, Table::Orders);
    orders::orders_shared::register_hooks(app)?;

    let staff = register(app, &state, Table::Staff);
    staff::staff_shared::register_hooks(app)?;

    Ok(DineServices {
        tenants,
        menu_items,
        orders,
        staff,
    })
}
