//! The public, host-resolved ordering site.

pub mod cart;
pub mod checkout;
pub mod lookup;
pub mod menu;
pub mod notice;
pub mod routes;

pub use cart::{Cart, CartLine};
pub use checkout::{submit_order, CheckoutDialog, CheckoutError, CheckoutForm, OrderSink};
pub use lookup::{resolve_tenant, TenantResolution};
pub use menu::{load_menu, MenuLoad};
pub use notice::{Notice, NoticeKind};
